use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::domain::config::AnalysisConfig;
use crate::domain::delay::processing_blocking::ProcessingBlockingModel;
use crate::domain::delay::rate_reservation::RateReservationModel;
use crate::domain::queue::queue_store::QueueStore;
use crate::domain::stream::priority::Priority;
use crate::domain::stream::stream::Stream;
use crate::domain::stream::stream_store::{StreamKey, StreamStore};
use crate::domain::utils::id::DeviceId;
use crate::error::{Error, Result};

/// Everything a delay model may read while bounding one hop of one stream.
///
/// All references point into frozen state: queue assignment has completed before any
/// `HopContext` is built.
pub struct HopContext<'a> {
    pub stream: &'a Stream,
    pub from: &'a DeviceId,
    pub to: &'a DeviceId,

    /// Capacity of the link carrying the hop, in bit/s.
    pub capacity: f64,

    pub queues: &'a QueueStore,
    pub streams: &'a StreamStore,

    /// Class-wide union of queued streams, see `aggregate_by_priority`.
    pub class_aggregate: &'a BTreeMap<Priority, Vec<StreamKey>>,
}

impl<'a> HopContext<'a> {
    /// Streams queued on this hop at a strictly higher priority than the stream under analysis.
    pub fn higher_priority_on_hop(&self) -> impl Iterator<Item = &'a Stream> + '_ {
        let priority = self.stream.priority;
        let streams = self.streams;
        self.queues
            .hop_queues(self.from, self.to)
            .into_iter()
            .filter(move |(p, _)| p.is_higher_than(priority))
            .flat_map(|(_, keys)| keys.iter())
            .filter_map(move |key| streams.get(*key))
    }

    /// Streams of every strictly higher priority class, across all hops.
    pub fn higher_priority_in_network(&self) -> impl Iterator<Item = &'a Stream> + '_ {
        let priority = self.stream.priority;
        let streams = self.streams;
        self.class_aggregate
            .iter()
            .filter(move |(p, _)| p.is_higher_than(priority))
            .flat_map(|(_, keys)| keys.iter())
            .filter_map(move |key| streams.get(*key))
    }
}

/// Worst-case delay contribution of one hop, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HopDelay {
    pub from: DeviceId,
    pub to: DeviceId,
    pub queueing: f64,
    pub transmission: f64,
    pub blocking: f64,
    pub processing: f64,
}

impl HopDelay {
    pub fn new(from: &DeviceId, to: &DeviceId) -> Self {
        Self { from: from.clone(), to: to.clone(), queueing: 0.0, transmission: 0.0, blocking: 0.0, processing: 0.0 }
    }

    pub fn total(&self) -> f64 {
        self.processing + self.queueing + self.transmission + self.blocking
    }
}

/// A per-hop worst-case delay formula.
pub trait DelayModel: fmt::Debug {
    fn model_type(&self) -> DelayModelType;

    fn hop_delay(&self, ctx: &HopContext<'_>) -> Result<HopDelay>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DelayModelType {
    /// Model A: higher-priority burst served at the capacity left over by their reserved rates.
    RateReservation,
    /// Model B: fixed processing, own transmission, and transmission of every higher-priority
    /// stream in the network.
    ProcessingBlocking,
}

impl FromStr for DelayModelType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "rate-reservation" | "ratereservation" => Ok(DelayModelType::RateReservation),
            "b" | "processing-blocking" | "processingblocking" => Ok(DelayModelType::ProcessingBlocking),
            _ => Err(Error::ConfigError(format!("unknown delay model '{}'", s))),
        }
    }
}

impl fmt::Display for DelayModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DelayModelType::RateReservation => write!(f, "rate-reservation"),
            DelayModelType::ProcessingBlocking => write!(f, "processing-blocking"),
        }
    }
}

impl DelayModelType {
    // Factory method to create the concrete DelayModel of a run
    pub fn get_instance(&self, config: &AnalysisConfig) -> Box<dyn DelayModel> {
        match self {
            DelayModelType::RateReservation => Box::new(RateReservationModel),
            DelayModelType::ProcessingBlocking => Box::new(ProcessingBlockingModel::new(config.processing_delay)),
        }
    }
}
