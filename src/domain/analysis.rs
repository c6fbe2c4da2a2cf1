use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::api::stream_dto::StreamRecordDto;
use crate::api::topology_dto::TopologyRecordDto;
use crate::domain::config::AnalysisConfig;
use crate::domain::delay::calculator::{DelayBound, DelayBoundCalculator};
use crate::domain::delay::delay_model::DelayModelType;
use crate::domain::network::router::Router;
use crate::domain::network::topology::NetworkTopology;
use crate::domain::queue::admission::{QueueAssignmentEngine, SharingPolicy};
use crate::domain::stream::stream::Stream;
use crate::domain::stream::stream_store::{StreamKey, StreamStore};
use crate::domain::utils::id::StreamId;
use crate::domain::utils::statistics::DelayStatistics;
use crate::error::{Error, ErrorKind, Result};

/// `tracing` target of the per-stream analytics events.
pub const ANALYTICS_TARGET: &str = "delay_analytics";

/// Which input a skipped record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecordSource {
    Topology,
    Streams,
}

/// An input row that could not be used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordRejection {
    pub source: RecordSource,
    pub line: Option<u64>,
    #[serde(serialize_with = "serialize_kind")]
    pub kind: ErrorKind,
    pub reason: String,
}

/// A stream that was ingested but has no delay bound, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamRejection {
    pub stream: StreamId,
    #[serde(serialize_with = "serialize_kind")]
    pub kind: ErrorKind,
    pub reason: String,
}

fn serialize_kind<S: serde::Serializer>(kind: &ErrorKind, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(kind)
}

/// Result of one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub delay_model: DelayModelType,
    #[serde(serialize_with = "serialize_policy")]
    pub sharing_policy: SharingPolicy,

    /// Worst-case end-to-end delay per successfully analysed stream.
    pub delays: BTreeMap<StreamId, DelayBound>,

    /// Ingested streams without a bound.
    pub rejected_streams: Vec<StreamRejection>,

    /// Input rows that were skipped.
    pub skipped_records: Vec<RecordRejection>,

    /// Wall-clock time spent routing, assigning and computing.
    pub runtime: Duration,

    pub statistics: DelayStatistics,
}

fn serialize_policy<S: serde::Serializer>(policy: &SharingPolicy, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(policy)
}

impl AnalysisReport {
    /// Worst-case delay in seconds, keyed by stream name.
    pub fn delay_map(&self) -> BTreeMap<StreamId, f64> {
        self.delays.iter().map(|(id, bound)| (id.clone(), bound.total)).collect()
    }

    pub fn delay_of(&self, stream: &StreamId) -> Option<f64> {
        self.delays.get(stream).map(|bound| bound.total)
    }

    pub fn rejection_of(&self, stream: &StreamId) -> Option<&StreamRejection> {
        self.rejected_streams.iter().find(|r| &r.stream == stream)
    }

    pub fn deadline_violations(&self) -> impl Iterator<Item = &DelayBound> {
        self.delays.values().filter(|bound| !bound.meets_deadline())
    }
}

/// The complete batch pipeline: load, route, assign, compute.
///
/// All state (topology, streams, queues) is created fresh inside `run`, so consecutive
/// runs never share queue contents.
#[derive(Debug, Clone)]
pub struct DelayAnalysis {
    config: AnalysisConfig,
}

impl DelayAnalysis {
    /// Fails with `ConfigError` if the configuration does not pass `AnalysisConfig::validate`.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn run(&self, topology_records: &[TopologyRecordDto], stream_records: &[StreamRecordDto]) -> AnalysisReport {
        let mut skipped_records = Vec::new();
        let mut rejected_streams = Vec::new();

        // 1. Topology
        let mut topology = NetworkTopology::from_config(&self.config);
        let summary = topology.load(topology_records);
        skipped_records.extend(summary.skipped.into_iter().map(|e| record_rejection(RecordSource::Topology, e)));

        // 2. Streams
        let mut streams = self.ingest_streams(stream_records, &mut skipped_records);

        let start = Instant::now();

        // 3. Routing
        let mut routed: Vec<StreamKey> = Vec::with_capacity(streams.len());
        {
            let router = Router::new(&topology);
            for key in streams.keys() {
                let outcome = match streams.get_mut(key) {
                    Some(stream) => router.shortest_path(&stream.source, &stream.destination).and_then(|path| stream.set_path(path)),
                    None => continue,
                };
                match outcome {
                    Ok(()) => routed.push(key),
                    Err(e) => reject(&streams, key, e, &mut rejected_streams),
                }
            }
        }

        // 4. Queue assignment
        let mut engine = QueueAssignmentEngine::new(self.config.sharing_policy, self.config.priority_classes);
        let mut admitted: Vec<StreamKey> = Vec::with_capacity(routed.len());
        for key in routed {
            let Some(path) = streams.get(key).and_then(Stream::path) else {
                continue;
            };
            match engine.assign(&streams, key, path) {
                Ok(()) => admitted.push(key),
                Err(e) => reject(&streams, key, e, &mut rejected_streams),
            }
        }
        log::info!(
            "Queue assignment finished under {} sharing: {} streams admitted into {} queues.",
            self.config.sharing_policy,
            admitted.len(),
            engine.queues().num_of_queues()
        );
        let queues = engine.into_queues();

        // 5. Delay bounds
        let model = self.config.delay_model.get_instance(&self.config);
        let calculator = DelayBoundCalculator::new(&topology, &streams, &queues, model.as_ref());
        let (delays, failures) = calculator.calculate_worst_case_delay(&admitted);
        for (key, e) in failures {
            reject(&streams, key, e, &mut rejected_streams);
        }

        let runtime = start.elapsed();

        for bound in delays.values() {
            tracing::info!(
                target: ANALYTICS_TARGET,
                StreamName = %bound.stream,
                Priority = bound.priority.value(),
                Hops = bound.hop_count(),
                DelaySeconds = bound.total,
                DeadlineMet = bound.meets_deadline(),
            );
        }

        let statistics = DelayStatistics::from_bounds(delays.values());
        log::info!(
            "Analysis finished in {:?} using {} model: {} bounded, {} rejected, mean {:.3e} s, max {:.3e} s.",
            runtime,
            self.config.delay_model,
            delays.len(),
            rejected_streams.len(),
            statistics.overall.mean,
            statistics.overall.max
        );

        AnalysisReport {
            delay_model: self.config.delay_model,
            sharing_policy: self.config.sharing_policy,
            delays,
            rejected_streams,
            skipped_records,
            runtime,
            statistics,
        }
    }

    /// Parses stream records into a fresh store. A header row is only recognised as the
    /// first non-empty record.
    fn ingest_streams(&self, records: &[StreamRecordDto], skipped: &mut Vec<RecordRejection>) -> StreamStore {
        let mut streams = StreamStore::new();
        let mut first = true;

        for record in records {
            if record.fields.iter().all(|f| f.trim().is_empty()) {
                continue;
            }
            if std::mem::take(&mut first) && record.looks_like_header() {
                log::debug!("Skipping stream header row {:?}", record.fields);
                continue;
            }

            let outcome = Stream::from_record(record, self.config.time_unit, self.config.priority_classes).and_then(|stream| {
                streams.insert(stream).map_err(|e| match e {
                    Error::MalformedRecord { reason, .. } => Error::malformed(record.line, reason),
                    other => other,
                })
            });

            if let Err(e) = outcome {
                log::warn!("Skipping stream record: {}", e);
                skipped.push(record_rejection(RecordSource::Streams, e));
            }
        }

        log::info!("Ingested {} streams.", streams.len());
        streams
    }
}

fn record_rejection(source: RecordSource, error: Error) -> RecordRejection {
    let line = match &error {
        Error::MalformedRecord { line, .. } => *line,
        _ => None,
    };
    RecordRejection { source, line, kind: error.kind(), reason: error.to_string() }
}

fn reject(streams: &StreamStore, key: StreamKey, error: Error, rejected: &mut Vec<StreamRejection>) {
    let Some(stream) = streams.get(key) else {
        return;
    };

    log::warn!("Stream {} omitted: {}", stream.id, error);
    tracing::warn!(
        target: ANALYTICS_TARGET,
        StreamName = %stream.id,
        ErrorKind = %error.kind(),
    );

    rejected.push(StreamRejection { stream: stream.id.clone(), kind: error.kind(), reason: error.to_string() });
}
