use crate::api::config_dto::AnalysisConfigDto;
use crate::domain::delay::delay_model::DelayModelType;
use crate::domain::queue::admission::SharingPolicy;
use crate::domain::stream::priority::MAX_PRIORITY_CLASSES;
use crate::error::{Error, Result};
use crate::loader::parser::parse_json_file;
use std::fmt;
use std::str::FromStr;

/// 1 Gbit/s.
pub const DEFAULT_LINK_CAPACITY: f64 = 1e9;

/// 5 microseconds of switching latency per hop.
pub const DEFAULT_PROCESSING_DELAY: f64 = 5e-6;

/// Unit in which stream periods and deadlines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Milliseconds,
    Microseconds,
}

impl TimeUnit {
    pub fn to_seconds(&self, value: f64) -> f64 {
        match self {
            TimeUnit::Seconds => value,
            TimeUnit::Milliseconds => value * 1e-3,
            TimeUnit::Microseconds => value * 1e-6,
        }
    }
}

impl FromStr for TimeUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s" | "sec" | "seconds" => Ok(TimeUnit::Seconds),
            "ms" | "milliseconds" => Ok(TimeUnit::Milliseconds),
            "us" | "microseconds" => Ok(TimeUnit::Microseconds),
            _ => Err(Error::ConfigError(format!("unknown time unit '{}'", s))),
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeUnit::Seconds => write!(f, "s"),
            TimeUnit::Milliseconds => write!(f, "ms"),
            TimeUnit::Microseconds => write!(f, "us"),
        }
    }
}

/// Settings of one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Which per-hop delay formula is applied.
    pub delay_model: DelayModelType,

    /// Admission rule for streams sharing a (hop, priority) queue.
    pub sharing_policy: SharingPolicy,

    /// Link capacity in bit/s for links that do not specify one.
    pub link_capacity: f64,

    /// Per-hop processing delay in seconds, used by `DelayModelType::ProcessingBlocking`.
    pub processing_delay: f64,

    /// Reject links whose endpoints are not declared devices.
    pub strict_link_endpoints: bool,

    pub time_unit: TimeUnit,

    pub priority_classes: u8,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            delay_model: DelayModelType::RateReservation,
            sharing_policy: SharingPolicy::Strict,
            link_capacity: DEFAULT_LINK_CAPACITY,
            processing_delay: DEFAULT_PROCESSING_DELAY,
            strict_link_endpoints: true,
            time_unit: TimeUnit::Seconds,
            priority_classes: MAX_PRIORITY_CLASSES,
        }
    }
}

impl AnalysisConfig {
    pub fn from_json_file(file_path: &str) -> Result<Self> {
        let dto: AnalysisConfigDto = parse_json_file(file_path)?;
        Self::try_from(dto)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.link_capacity.is_finite() && self.link_capacity > 0.0) {
            return Err(Error::ConfigError(format!("link capacity must be positive, got {}", self.link_capacity)));
        }
        if !(self.processing_delay.is_finite() && self.processing_delay >= 0.0) {
            return Err(Error::ConfigError(format!("processing delay must be non-negative, got {}", self.processing_delay)));
        }
        if self.priority_classes == 0 || self.priority_classes > MAX_PRIORITY_CLASSES {
            return Err(Error::ConfigError(format!("priority classes must be within 1..={}, got {}", MAX_PRIORITY_CLASSES, self.priority_classes)));
        }
        Ok(())
    }
}

impl TryFrom<AnalysisConfigDto> for AnalysisConfig {
    type Error = Error;

    fn try_from(dto: AnalysisConfigDto) -> Result<Self> {
        let defaults = AnalysisConfig::default();

        let config = AnalysisConfig {
            delay_model: dto.delay_model.as_deref().map(str::parse).transpose()?.unwrap_or(defaults.delay_model),
            sharing_policy: dto.sharing_policy.as_deref().map(str::parse).transpose()?.unwrap_or(defaults.sharing_policy),
            link_capacity: dto.link_capacity.unwrap_or(defaults.link_capacity),
            processing_delay: dto.processing_delay.unwrap_or(defaults.processing_delay),
            strict_link_endpoints: dto.strict_link_endpoints.unwrap_or(defaults.strict_link_endpoints),
            time_unit: dto.time_unit.as_deref().map(str::parse).transpose()?.unwrap_or(defaults.time_unit),
            priority_classes: dto.priority_classes.unwrap_or(defaults.priority_classes),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn empty_dto_yields_defaults() {
        let config = AnalysisConfig::try_from(AnalysisConfigDto::default()).unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.processing_delay, 5e-6);
    }

    #[test]
    fn dto_values_override_defaults() {
        let dto: AnalysisConfigDto = serde_json::from_str(
            r#"{ "delayModel": "B", "sharingPolicy": "relaxed", "linkCapacity": 1e8, "timeUnit": "us", "strictLinkEndpoints": false }"#,
        )
        .unwrap();
        let config = AnalysisConfig::try_from(dto).unwrap();

        assert_eq!(config.delay_model, DelayModelType::ProcessingBlocking);
        assert_eq!(config.sharing_policy, SharingPolicy::Relaxed);
        assert_eq!(config.link_capacity, 1e8);
        assert_eq!(config.time_unit, TimeUnit::Microseconds);
        assert!(!config.strict_link_endpoints);
    }

    #[test]
    fn invalid_values_are_config_errors() {
        let dto = AnalysisConfigDto { link_capacity: Some(0.0), ..Default::default() };
        assert_eq!(AnalysisConfig::try_from(dto).unwrap_err().kind(), ErrorKind::Config);

        let dto = AnalysisConfigDto { delay_model: Some("C".to_string()), ..Default::default() };
        assert_eq!(AnalysisConfig::try_from(dto).unwrap_err().kind(), ErrorKind::Config);

        let dto = AnalysisConfigDto { priority_classes: Some(9), ..Default::default() };
        assert_eq!(AnalysisConfig::try_from(dto).unwrap_err().kind(), ErrorKind::Config);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let parsed: std::result::Result<AnalysisConfigDto, _> = serde_json::from_str(r#"{ "linkRate": 1 }"#);
        assert!(parsed.is_err());
    }
}
