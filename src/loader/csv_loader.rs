use std::fs::File;
use std::io::Read;

use crate::api::stream_dto::StreamRecordDto;
use crate::api::topology_dto::TopologyRecordDto;
use crate::error::Result;

/// Reads every row of a headerless, comma separated file as trimmed text fields.
///
/// Rows may have different lengths. Blank rows are dropped. The returned line numbers
/// are 1-based.
fn read_rows<R: Read>(reader: R) -> Result<Vec<(Option<u64>, Vec<String>)>> {
    let mut csv_reader = csv::ReaderBuilder::new().has_headers(false).flexible(true).trim(csv::Trim::All).from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        let line = record.position().map(|p| p.line());
        rows.push((line, record.iter().map(str::to_string).collect()));
    }

    Ok(rows)
}

pub fn read_topology_records<R: Read>(reader: R) -> Result<Vec<TopologyRecordDto>> {
    let rows = read_rows(reader)?;
    Ok(rows.into_iter().map(|(line, fields)| TopologyRecordDto::new(line, fields)).collect())
}

pub fn read_stream_records<R: Read>(reader: R) -> Result<Vec<StreamRecordDto>> {
    let rows = read_rows(reader)?;
    Ok(rows.into_iter().map(|(line, fields)| StreamRecordDto::new(line, fields)).collect())
}

pub fn read_topology_file(file_path: &str) -> Result<Vec<TopologyRecordDto>> {
    let records = read_topology_records(File::open(file_path)?)?;
    log::info!("Read {} topology records from '{}'.", records.len(), file_path);
    Ok(records)
}

pub fn read_stream_file(file_path: &str) -> Result<Vec<StreamRecordDto>> {
    let records = read_stream_records(File::open(file_path)?)?;
    log::info!("Read {} stream records from '{}'.", records.len(), file_path);
    Ok(records)
}
