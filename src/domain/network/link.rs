use crate::api::topology_dto::{TopologyRecordDto, TopologyRecordKind};
use crate::domain::utils::id::{DeviceId, LinkId};
use crate::error::{Error, Result};

/// Minimum number of fields in a link row: `LINK, id, src, src_port, dst, dst_port`.
pub const MIN_LINK_FIELDS: usize = 6;

/// A full-duplex link between two device ports.
///
/// Routing treats the link as undirected; queue assignment sees one egress queue set
/// per traversal direction.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: LinkId,
    pub source: DeviceId,
    pub source_port: u32,
    pub target: DeviceId,
    pub target_port: u32,
    pub domain: Option<String>,

    /// Nominal capacity in bit/s.
    pub capacity: f64,
}

impl Link {
    /// Parses `LINK, id, src, src_port, dst, dst_port[, domain[, capacity]]`.
    /// `default_capacity` applies when the row carries no capacity column.
    pub fn from_record(record: &TopologyRecordDto, default_capacity: f64) -> Result<Self> {
        if record.kind() != TopologyRecordKind::Link {
            return Err(Error::malformed(record.line, format!("expected a LINK record, got {:?}", record.fields.first())));
        }

        if record.fields.len() < MIN_LINK_FIELDS {
            return Err(Error::malformed(
                record.line,
                format!("link record needs at least {} fields, found {}", MIN_LINK_FIELDS, record.fields.len()),
            ));
        }

        let id = required_field(record, 1, "id")?;
        let source = required_field(record, 2, "source device")?;
        let source_port = port_field(record, 3, "source port")?;
        let target = required_field(record, 4, "destination device")?;
        let target_port = port_field(record, 5, "destination port")?;

        let capacity = match record.field(7) {
            Some(raw) => raw
                .parse::<f64>()
                .ok()
                .filter(|c| c.is_finite() && *c > 0.0)
                .ok_or_else(|| Error::malformed(record.line, format!("link {} has invalid capacity '{}'", id, raw)))?,
            None => default_capacity,
        };

        Ok(Link {
            id: LinkId::new(id),
            source: DeviceId::new(source),
            source_port,
            target: DeviceId::new(target),
            target_port,
            domain: record.field(6).map(str::to_string),
            capacity,
        })
    }
}

fn required_field<'a>(record: &'a TopologyRecordDto, index: usize, what: &str) -> Result<&'a str> {
    record.field(index).ok_or_else(|| Error::malformed(record.line, format!("link record has empty {}", what)))
}

fn port_field(record: &TopologyRecordDto, index: usize, what: &str) -> Result<u32> {
    let raw = required_field(record, index, what)?;
    raw.parse::<u32>().map_err(|_| Error::malformed(record.line, format!("link {} '{}' is not a port number", what, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn parses_link_with_default_capacity() {
        let record = TopologyRecordDto::from_fields(&["LINK", "L1", "ES1", "1", "SW1", "2", "dom"]);
        let link = Link::from_record(&record, 1e9).unwrap();

        assert_eq!(link.id, LinkId::new("L1"));
        assert_eq!(link.source_port, 1);
        assert_eq!(link.target_port, 2);
        assert_eq!(link.capacity, 1e9);
        assert_eq!(link.target, DeviceId::new("SW1"));
    }

    #[test]
    fn explicit_capacity_overrides_default() {
        let record = TopologyRecordDto::from_fields(&["LINK", "L1", "ES1", "1", "SW1", "2", "", "1e8"]);
        let link = Link::from_record(&record, 1e9).unwrap();
        assert_eq!(link.capacity, 1e8);
        assert_eq!(link.domain, None);
    }

    #[test]
    fn short_or_non_integral_records_are_malformed() {
        let short = TopologyRecordDto::from_fields(&["LINK", "L1", "ES1", "1", "SW1"]);
        assert_eq!(Link::from_record(&short, 1e9).unwrap_err().kind(), ErrorKind::MalformedRecord);

        let bad_port = TopologyRecordDto::from_fields(&["LINK", "L1", "ES1", "1.5", "SW1", "2"]);
        assert_eq!(Link::from_record(&bad_port, 1e9).unwrap_err().kind(), ErrorKind::MalformedRecord);
    }
}
