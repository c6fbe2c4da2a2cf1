use serde::de::DeserializeOwned;
use std::fs;

use crate::error::Result;

/// Reads `file_path` and deserializes its JSON content into `T`.
///
/// An unreadable file surfaces as `Error::IoError`, invalid JSON or a shape mismatch
/// as `Error::DeserializationError`.
pub fn parse_json_file<T: DeserializeOwned>(file_path: &str) -> Result<T> {
    let data = fs::read_to_string(file_path)?;
    log::debug!("Parsing JSON from '{}' ({} bytes).", file_path, data.len());
    parse_json_str(&data)
}

pub fn parse_json_str<T: DeserializeOwned>(data: &str) -> Result<T> {
    Ok(serde_json::from_str(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config_dto::AnalysisConfigDto;
    use crate::error::ErrorKind;

    #[test]
    fn invalid_json_is_deserialization_error() {
        let err = parse_json_str::<AnalysisConfigDto>("{ delayModel: }").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Deserialization);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = parse_json_file::<AnalysisConfigDto>("no_such_config.json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
