use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::domain::network::router::Path;
use crate::domain::queue::queue_store::{QueueKey, QueueStore};
use crate::domain::stream::priority::Priority;
use crate::domain::stream::stream::Stream;
use crate::domain::stream::stream_store::{StreamKey, StreamStore};
use crate::error::{Error, Result};

/// Queue admission rule: which streams may share a (hop, priority) queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharingPolicy {
    /// A queue only holds streams of a single source device.
    Strict,
    /// Streams of different sources may share a queue, but one source may not place two
    /// streams of the same traffic class into it.
    Relaxed,
}

impl SharingPolicy {
    /// Returns the first queued stream that conflicts with `candidate`, if any.
    fn conflict<'s>(&self, candidate: &Stream, queued: impl Iterator<Item = &'s Stream>) -> Option<&'s Stream> {
        let mut queued = queued;
        match self {
            SharingPolicy::Strict => queued.find(|other| other.source != candidate.source),
            SharingPolicy::Relaxed => queued.find(|other| other.source == candidate.source && other.traffic_class == candidate.traffic_class),
        }
    }
}

impl FromStr for SharingPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" | "same-source-only" => Ok(SharingPolicy::Strict),
            "relaxed" => Ok(SharingPolicy::Relaxed),
            _ => Err(Error::ConfigError(format!("unknown sharing policy '{}'", s))),
        }
    }
}

impl fmt::Display for SharingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SharingPolicy::Strict => write!(f, "strict"),
            SharingPolicy::Relaxed => write!(f, "relaxed"),
        }
    }
}

/// Places routed streams into per-hop priority queues, enforcing the `SharingPolicy`.
///
/// The engine owns the `QueueStore` of the run. Once every stream has been offered, the
/// store is frozen with `into_queues` and only read afterwards.
#[derive(Debug, Clone)]
pub struct QueueAssignmentEngine {
    policy: SharingPolicy,
    queues: QueueStore,
}

impl QueueAssignmentEngine {
    pub fn new(policy: SharingPolicy, priority_classes: u8) -> Self {
        Self { policy, queues: QueueStore::new(priority_classes) }
    }

    /// Appends `stream` to the queue `(u, v, priority)` of every hop of `path`.
    ///
    /// All hops are checked before anything is inserted, so a rejected stream leaves no
    /// trace in any queue.
    pub fn assign(&mut self, streams: &StreamStore, stream: StreamKey, path: &Path) -> Result<()> {
        let candidate = streams
            .get(stream)
            .ok_or_else(|| Error::ModelConstructionError(format!("unknown stream key {:?} offered for queue assignment", stream)))?;

        let mut keys = Vec::with_capacity(path.hop_count());

        for hop in path.hops() {
            let key = QueueKey::new(hop.from, hop.to, candidate.priority);
            let queued = self.queues.queue(&key).iter().filter_map(|k| streams.get(*k));

            if let Some(other) = self.policy.conflict(candidate, queued) {
                log::debug!(
                    "QueueAdmission: {} rejected on {} -> {} priority {} ({} policy, conflicts with {})",
                    candidate.id,
                    hop.from,
                    hop.to,
                    candidate.priority,
                    self.policy,
                    other.id
                );
                return Err(Error::QueueAdmission {
                    stream: candidate.id.clone(),
                    conflicting: other.id.clone(),
                    from: hop.from.clone(),
                    to: hop.to.clone(),
                    priority: candidate.priority,
                });
            }
            keys.push(key);
        }

        for key in keys {
            self.queues.push(key, stream);
        }
        Ok(())
    }

    pub fn queues(&self) -> &QueueStore {
        &self.queues
    }

    pub fn into_queues(self) -> QueueStore {
        self.queues
    }
}

/// For every priority class, the union of all streams queued at that class on any
/// hop. Each stream appears once, in order of first occurrence.
pub fn aggregate_by_priority(queues: &QueueStore) -> BTreeMap<Priority, Vec<StreamKey>> {
    let mut aggregate: BTreeMap<Priority, Vec<StreamKey>> = Priority::all(queues.priority_classes()).map(|p| (p, Vec::new())).collect();
    let mut seen: HashSet<(Priority, StreamKey)> = HashSet::new();

    for (key, streams) in queues.iter() {
        for stream in streams {
            if seen.insert((key.priority, *stream)) {
                aggregate.entry(key.priority).or_default().push(*stream);
            }
        }
    }

    aggregate
}
