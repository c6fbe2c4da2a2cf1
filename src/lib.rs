use crate::domain::analysis::{AnalysisReport, DelayAnalysis};
use crate::domain::config::AnalysisConfig;
use crate::error::Result;
use crate::loader::csv_loader::{read_stream_file, read_topology_file};

pub mod api;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;
pub mod report;

/// Reads a topology CSV and a stream CSV and runs one delay analysis over them.
///
/// Only an invalid configuration or unreadable inputs fail the call. Bad rows, unroutable streams, rejected queue
/// placements and oversubscribed links are reported inside the `AnalysisReport`.
pub fn analyze_files(topology_path: &str, streams_path: &str, config: AnalysisConfig) -> Result<AnalysisReport> {
    let analysis = DelayAnalysis::new(config)?;

    let topology_records = read_topology_file(topology_path)?;
    let stream_records = read_stream_file(streams_path)?;

    Ok(analysis.run(&topology_records, &stream_records))
}
