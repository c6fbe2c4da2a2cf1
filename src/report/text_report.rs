use std::io::Write;

use crate::domain::analysis::AnalysisReport;
use crate::error::Result;
use crate::report::to_micros;

/// Plain-text summary: runtime, aggregate statistics, one line per bounded stream and one
/// line per omitted stream or skipped record with its error kind.
pub fn write_summary<W: Write>(report: &AnalysisReport, mut out: W) -> Result<()> {
    let stats = &report.statistics;

    writeln!(out, "Delay model: {}", report.delay_model)?;
    writeln!(out, "Sharing policy: {}", report.sharing_policy)?;
    writeln!(out, "Runtime (seconds): {}", report.runtime.as_secs_f64())?;
    writeln!(out, "Streams bounded: {}", stats.overall.count)?;
    writeln!(out, "Mean E2E delay (us): {:.3}", to_micros(stats.overall.mean))?;
    writeln!(out, "Maximum E2E delay (us): {:.3}", to_micros(stats.overall.max))?;
    writeln!(out, "Deadline violations: {}", stats.deadline_violations)?;

    if !stats.per_priority.is_empty() {
        writeln!(out, "Per priority class:")?;
        for (priority, summary) in &stats.per_priority {
            writeln!(
                out,
                "  PCP {}: {} streams, mean {:.3} us, max {:.3} us",
                priority,
                summary.count,
                to_micros(summary.mean),
                to_micros(summary.max)
            )?;
        }
    }

    writeln!(out, "E2E delay per stream:")?;
    for (stream, bound) in &report.delays {
        let marker = if bound.meets_deadline() { "" } else { " (deadline missed)" };
        writeln!(out, "  {}: {:.3} us over {} hops{}", stream, to_micros(bound.total), bound.hop_count(), marker)?;
    }

    if !report.rejected_streams.is_empty() {
        writeln!(out, "Omitted streams:")?;
        for rejection in &report.rejected_streams {
            writeln!(out, "  {}: {} ({})", rejection.stream, rejection.kind, rejection.reason)?;
        }
    }

    if !report.skipped_records.is_empty() {
        writeln!(out, "Skipped records:")?;
        for record in &report.skipped_records {
            writeln!(out, "  {:?}: {} ({})", record.source, record.kind, record.reason)?;
        }
    }

    Ok(())
}
