use crate::api::stream_dto::StreamRecordDto;
use crate::domain::config::TimeUnit;
use crate::domain::network::router::Path;
use crate::domain::stream::priority::Priority;
use crate::domain::utils::id::{DeviceId, StreamId};
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

pub const BITS_PER_BYTE: f64 = 8.0;

/// How a stream is policed inside its priority class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrafficClass {
    /// Asynchronous Traffic Shaping: the stream is shaped to its sustained rate and burst.
    Ats,
    /// Best effort within the class, no rate reservation.
    Avb,
}

impl FromStr for TrafficClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ATS" => Ok(TrafficClass::Ats),
            "AVB" => Ok(TrafficClass::Avb),
            _ => Err(Error::malformed(None, format!("unknown traffic class '{}'", s))),
        }
    }
}

impl fmt::Display for TrafficClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrafficClass::Ats => write!(f, "ATS"),
            TrafficClass::Avb => write!(f, "AVB"),
        }
    }
}

/// A periodic flow of equally sized frames from one device to another.
#[derive(Debug, Clone, PartialEq)]
pub struct Stream {
    pub id: StreamId,
    pub priority: Priority,
    pub traffic_class: TrafficClass,
    pub source: DeviceId,
    pub destination: DeviceId,

    /// Frame size in bytes.
    pub size: u64,

    /// Period in seconds.
    pub period: f64,

    /// Deadline in seconds.
    pub deadline: f64,

    /// Set once by routing.
    path: Option<Path>,
}

impl Stream {
    pub fn new(
        id: StreamId,
        priority: Priority,
        traffic_class: TrafficClass,
        source: DeviceId,
        destination: DeviceId,
        size: u64,
        period: f64,
        deadline: f64,
    ) -> Self {
        Self { id, priority, traffic_class, source, destination, size, period, deadline, path: None }
    }

    /// Parses `PCP, name, ATS|AVB, source, destination, size, period, deadline`.
    ///
    /// Period and deadline are read in `time_unit` and stored in seconds.
    pub fn from_record(record: &StreamRecordDto, time_unit: TimeUnit, priority_classes: u8) -> Result<Self> {
        let line = record.line;
        let field = |index: usize, what: &'static str| record.field(index).ok_or_else(|| Error::malformed(line, format!("stream record has no {}", what)));

        let pcp_raw = field(0, "priority")?;
        let name = field(1, "name")?;

        let priority = pcp_raw
            .parse::<u8>()
            .ok()
            .and_then(|p| Priority::new(p, priority_classes))
            .ok_or_else(|| Error::malformed(line, format!("stream {} has priority '{}' outside 0..{}", name, pcp_raw, priority_classes)))?;

        let class_raw = field(2, "traffic class")?;
        let traffic_class = class_raw
            .parse::<TrafficClass>()
            .map_err(|_| Error::malformed(line, format!("stream {} has unknown traffic class '{}'", name, class_raw)))?;

        let source = field(3, "source device")?;
        let destination = field(4, "destination device")?;

        let size_raw = field(5, "size")?;
        let size = size_raw.parse::<u64>().map_err(|_| Error::malformed(line, format!("stream {} has invalid size '{}'", name, size_raw)))?;

        let period = parse_duration(field(6, "period")?, time_unit).ok_or_else(|| Error::malformed(line, format!("stream {} has invalid period", name)))?;
        if period <= 0.0 {
            return Err(Error::malformed(line, format!("stream {} has non-positive period", name)));
        }

        let deadline = parse_duration(field(7, "deadline")?, time_unit).ok_or_else(|| Error::malformed(line, format!("stream {} has invalid deadline", name)))?;

        Ok(Stream::new(StreamId::new(name), priority, traffic_class, DeviceId::new(source), DeviceId::new(destination), size, period, deadline))
    }

    pub fn size_in_bits(&self) -> f64 {
        self.size as f64 * BITS_PER_BYTE
    }

    pub fn is_shaped(&self) -> bool {
        self.traffic_class == TrafficClass::Ats
    }

    /// Sustained rate in bit/s. Only shaped streams reserve a rate.
    pub fn rate(&self) -> Option<f64> {
        self.is_shaped().then(|| self.size_in_bits() / self.period)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    /// Records the route of the stream. A path can only be assigned once.
    pub fn set_path(&mut self, path: Path) -> Result<()> {
        if self.path.is_some() {
            return Err(Error::ModelConstructionError(format!("stream {} already has a path", self.id)));
        }
        self.path = Some(path);
        Ok(())
    }
}

fn parse_duration(raw: &str, unit: TimeUnit) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0).map(|v| unit.to_seconds(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn record(fields: &[&str]) -> StreamRecordDto {
        StreamRecordDto::from_fields(fields)
    }

    #[test]
    fn shaped_stream_derives_rate() {
        let stream = Stream::from_record(&record(&["1", "s1", "ATS", "ES1", "ES2", "1000", "0.001", "0.01"]), TimeUnit::Seconds, 8).unwrap();

        assert_eq!(stream.priority.value(), 1);
        assert_eq!(stream.size_in_bits(), 8000.0);
        assert!((stream.rate().unwrap() - 8_000_000.0).abs() < 1e-6);
    }

    #[test]
    fn best_effort_stream_has_no_rate() {
        let stream = Stream::from_record(&record(&["5", "s2", "avb", "ES1", "ES2", "500", "1", "1"]), TimeUnit::Seconds, 8).unwrap();
        assert_eq!(stream.traffic_class, TrafficClass::Avb);
        assert_eq!(stream.rate(), None);
    }

    #[test]
    fn time_unit_converts_to_seconds() {
        let stream = Stream::from_record(&record(&["0", "s1", "ATS", "ES1", "ES2", "64", "1000", "500"]), TimeUnit::Microseconds, 8).unwrap();
        assert!((stream.period - 0.001).abs() < 1e-12);
        assert!((stream.deadline - 0.0005).abs() < 1e-12);
    }

    #[test]
    fn invalid_fields_are_malformed() {
        let cases: [&[&str]; 5] = [
            &["9", "s1", "ATS", "ES1", "ES2", "64", "1", "1"],
            &["0", "s1", "TSN", "ES1", "ES2", "64", "1", "1"],
            &["0", "s1", "ATS", "ES1", "ES2", "-64", "1", "1"],
            &["0", "s1", "ATS", "ES1", "ES2", "64", "0", "1"],
            &["0", "s1", "ATS", "ES1", "ES2", "64", "1"],
        ];

        for fields in cases {
            let err = Stream::from_record(&record(fields), TimeUnit::Seconds, 8).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedRecord, "{:?}", fields);
        }
    }

    #[test]
    fn path_is_assigned_only_once() {
        let mut stream = Stream::from_record(&record(&["0", "s1", "ATS", "ES1", "ES2", "64", "1", "1"]), TimeUnit::Seconds, 8).unwrap();
        let path = Path::new(vec![DeviceId::new("ES1"), DeviceId::new("ES2")]);

        stream.set_path(path.clone()).unwrap();
        assert!(stream.set_path(path).is_err());
        assert_eq!(stream.path().map(|p| p.hop_count()), Some(1));
    }
}
