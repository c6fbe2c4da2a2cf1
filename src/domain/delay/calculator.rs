use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::delay::delay_model::{DelayModel, HopContext, HopDelay};
use crate::domain::network::topology::NetworkTopology;
use crate::domain::queue::admission::aggregate_by_priority;
use crate::domain::queue::queue_store::QueueStore;
use crate::domain::stream::priority::Priority;
use crate::domain::stream::stream_store::{StreamKey, StreamStore};
use crate::domain::utils::id::StreamId;
use crate::error::{Error, Result};

/// End-to-end worst-case delay bound of one stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelayBound {
    pub stream: StreamId,
    pub priority: Priority,

    /// Per-hop contributions in path order.
    pub hops: Vec<HopDelay>,

    /// Sum of the hop delays, in seconds.
    pub total: f64,

    /// Deadline of the stream, in seconds.
    pub deadline: f64,
}

impl DelayBound {
    pub fn meets_deadline(&self) -> bool {
        self.total <= self.deadline
    }

    pub fn hop_count(&self) -> usize {
        self.hops.len()
    }
}

/// Walks the path of every admitted stream and sums the per-hop bounds of the configured
/// `DelayModel`.
///
/// The calculator only reads the topology, the streams and the frozen queue state.
pub struct DelayBoundCalculator<'a> {
    topology: &'a NetworkTopology,
    streams: &'a StreamStore,
    queues: &'a QueueStore,
    model: &'a dyn DelayModel,
    class_aggregate: BTreeMap<Priority, Vec<StreamKey>>,
}

impl<'a> DelayBoundCalculator<'a> {
    pub fn new(topology: &'a NetworkTopology, streams: &'a StreamStore, queues: &'a QueueStore, model: &'a dyn DelayModel) -> Self {
        Self { topology, streams, queues, model, class_aggregate: aggregate_by_priority(queues) }
    }

    /// Bound of a single stream. The stream must have been routed.
    pub fn stream_delay(&self, key: StreamKey) -> Result<DelayBound> {
        let stream = self
            .streams
            .get(key)
            .ok_or_else(|| Error::ModelConstructionError(format!("unknown stream key {:?} in delay calculation", key)))?;
        let path = stream
            .path()
            .ok_or_else(|| Error::ModelConstructionError(format!("stream {} has no path", stream.id)))?;

        let mut hops = Vec::with_capacity(path.hop_count());
        for hop in path.hops() {
            let capacity = match self.topology.link_between(hop.from, hop.to) {
                Some(link) => link.capacity,
                None => return Err(Error::ModelConstructionError(format!("no link between {} and {} on path of {}", hop.from, hop.to, stream.id))),
            };

            let ctx = HopContext {
                stream,
                from: hop.from,
                to: hop.to,
                capacity,
                queues: self.queues,
                streams: self.streams,
                class_aggregate: &self.class_aggregate,
            };
            hops.push(self.model.hop_delay(&ctx)?);
        }

        let total = hops.iter().fold(0.0, |acc, hop| acc + hop.total());

        Ok(DelayBound { stream: stream.id.clone(), priority: stream.priority, hops, total, deadline: stream.deadline })
    }

    /// Bounds every stream in `admitted`. Streams whose computation fails are returned
    /// separately and are absent from the bound map.
    pub fn calculate_worst_case_delay(&self, admitted: &[StreamKey]) -> (BTreeMap<StreamId, DelayBound>, Vec<(StreamKey, Error)>) {
        let mut bounds = BTreeMap::new();
        let mut failures = Vec::new();

        for key in admitted {
            match self.stream_delay(*key) {
                Ok(bound) => {
                    bounds.insert(bound.stream.clone(), bound);
                }
                Err(e) => {
                    log::warn!("Delay computation failed: {}", e);
                    failures.push((*key, e));
                }
            }
        }

        (bounds, failures)
    }
}
