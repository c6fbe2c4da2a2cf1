use std::io::Write;

use serde::Serialize;

use crate::domain::analysis::AnalysisReport;
use crate::error::Result;
use crate::report::to_micros;

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct StreamRow<'a> {
    stream_name: &'a str,
    priority: Option<u8>,
    hops: Option<usize>,
    delay_us: Option<f64>,
    deadline_us: Option<f64>,
    deadline_met: Option<bool>,
    error_kind: Option<String>,
}

/// One `;`-separated row per ingested stream. Omitted streams have empty delay columns and
/// carry their error kind.
pub fn write_csv<W: Write>(report: &AnalysisReport, writer: W) -> Result<()> {
    let mut csv_wtr = csv::WriterBuilder::new().delimiter(b';').from_writer(writer);

    for (stream, bound) in &report.delays {
        csv_wtr.serialize(StreamRow {
            stream_name: stream.as_str(),
            priority: Some(bound.priority.value()),
            hops: Some(bound.hop_count()),
            delay_us: Some(to_micros(bound.total)),
            deadline_us: Some(to_micros(bound.deadline)),
            deadline_met: Some(bound.meets_deadline()),
            error_kind: None,
        })?;
    }

    for rejection in &report.rejected_streams {
        csv_wtr.serialize(StreamRow {
            stream_name: rejection.stream.as_str(),
            priority: None,
            hops: None,
            delay_us: None,
            deadline_us: None,
            deadline_met: None,
            error_kind: Some(rejection.kind.to_string()),
        })?;
    }

    csv_wtr.flush()?;
    Ok(())
}
