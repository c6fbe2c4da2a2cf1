use crate::api::topology_dto::{TopologyRecordDto, TopologyRecordKind};
use crate::domain::utils::id::DeviceId;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    Switch,
    EndSystem,
}

/// A switch or end system of the network.
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    pub id: DeviceId,
    pub kind: DeviceKind,
    pub ports: u32,
    pub domain: Option<String>,
}

impl TryFrom<&TopologyRecordDto> for Device {
    type Error = Error;

    /// Parses `SW|ES, name, ports[, domain]`.
    fn try_from(record: &TopologyRecordDto) -> Result<Self> {
        let kind = match record.kind() {
            TopologyRecordKind::Switch => DeviceKind::Switch,
            TopologyRecordKind::EndSystem => DeviceKind::EndSystem,
            _ => {
                return Err(Error::malformed(record.line, format!("expected a device record (SW or ES), got {:?}", record.fields.first())));
            }
        };

        let name = record.field(1).ok_or_else(|| Error::malformed(record.line, "device record without a name"))?;

        let ports_field = record.field(2).ok_or_else(|| Error::malformed(record.line, format!("device {} has no port count", name)))?;
        let ports = ports_field
            .parse::<u32>()
            .map_err(|_| Error::malformed(record.line, format!("device {} has invalid port count '{}'", name, ports_field)))?;

        Ok(Device { id: DeviceId::new(name), kind, ports, domain: record.field(3).map(str::to_string) })
    }
}
