use std::fs::File;
use std::io::{self, BufWriter};

use anyhow::Context;
use clap::Parser;

use tsn_delay_analysis::analyze_files;
use tsn_delay_analysis::domain::config::{AnalysisConfig, TimeUnit};
use tsn_delay_analysis::domain::delay::delay_model::DelayModelType;
use tsn_delay_analysis::domain::queue::admission::SharingPolicy;
use tsn_delay_analysis::logger;
use tsn_delay_analysis::report::{csv_report, text_report, write_json};

/// Worst-case end-to-end delay bounds for prioritized streams in a switched network.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Topology CSV (SW / ES / LINK rows).
    topology: String,

    /// Stream CSV (PCP,StreamName,StreamType,SourceNode,DestinationNode,Size,Period,Deadline).
    streams: String,

    /// JSON configuration file. Flags below override its values.
    #[arg(long)]
    config: Option<String>,

    /// Delay model: `a` (rate reservation) or `b` (processing + blocking).
    #[arg(long)]
    model: Option<DelayModelType>,

    /// Queue sharing policy: `strict` or `relaxed`.
    #[arg(long)]
    sharing_policy: Option<SharingPolicy>,

    /// Default link capacity in bit/s.
    #[arg(long)]
    link_capacity: Option<f64>,

    /// Per-hop processing delay in seconds (model b).
    #[arg(long)]
    processing_delay: Option<f64>,

    /// Unit of stream periods and deadlines: s, ms or us.
    #[arg(long)]
    time_unit: Option<TimeUnit>,

    /// Accept links whose endpoints were never declared as devices.
    #[arg(long)]
    lenient_links: bool,

    /// Write the text summary here instead of stdout.
    #[arg(short, long)]
    output: Option<String>,

    /// Also write a per-stream CSV table.
    #[arg(long)]
    csv: Option<String>,

    /// Also write the full report as JSON.
    #[arg(long)]
    json: Option<String>,
}

impl Cli {
    fn analysis_config(&self) -> anyhow::Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_json_file(path).with_context(|| format!("loading config '{}'", path))?,
            None => AnalysisConfig::default(),
        };

        if let Some(model) = self.model {
            config.delay_model = model;
        }
        if let Some(policy) = self.sharing_policy {
            config.sharing_policy = policy;
        }
        if let Some(capacity) = self.link_capacity {
            config.link_capacity = capacity;
        }
        if let Some(delay) = self.processing_delay {
            config.processing_delay = delay;
        }
        if let Some(unit) = self.time_unit {
            config.time_unit = unit;
        }
        if self.lenient_links {
            config.strict_link_endpoints = false;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    logger::init();

    let cli = Cli::parse();
    let config = cli.analysis_config()?;
    log::info!("Starting delay analysis of '{}' / '{}' with {:?}", cli.topology, cli.streams, config);

    let report = analyze_files(&cli.topology, &cli.streams, config).context("running delay analysis")?;

    match &cli.output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("creating '{}'", path))?;
            text_report::write_summary(&report, BufWriter::new(file))?;
            log::info!("Summary written to '{}'.", path);
        }
        None => text_report::write_summary(&report, io::stdout().lock())?,
    }

    if let Some(path) = &cli.csv {
        let file = File::create(path).with_context(|| format!("creating '{}'", path))?;
        csv_report::write_csv(&report, file)?;
        log::info!("Per-stream table written to '{}'.", path);
    }

    if let Some(path) = &cli.json {
        let file = File::create(path).with_context(|| format!("creating '{}'", path))?;
        write_json(&report, BufWriter::new(file))?;
        log::info!("JSON report written to '{}'.", path);
    }

    Ok(())
}
