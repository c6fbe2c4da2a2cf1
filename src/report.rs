//! Result sinks: render an `AnalysisReport` for humans or other tools.
//!
//! Delays are carried in seconds throughout the engine and only converted to
//! microseconds here.

pub mod csv_report;
pub mod text_report;

use std::io::Write;

use crate::domain::analysis::AnalysisReport;
use crate::error::Result;

pub const MICROS_PER_SECOND: f64 = 1e6;

pub fn to_micros(seconds: f64) -> f64 {
    seconds * MICROS_PER_SECOND
}

/// Writes the complete report, including per-hop breakdowns, as pretty JSON.
pub fn write_json<W: Write>(report: &AnalysisReport, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}
