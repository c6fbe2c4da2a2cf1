use crate::api::topology_dto::{TopologyRecordDto, TopologyRecordKind};
use crate::domain::config::AnalysisConfig;
use crate::domain::network::device::Device;
use crate::domain::network::link::Link;
use crate::domain::utils::id::{DeviceId, LinkId};
use crate::error::{Error, Result};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Models the switched network the streams traverse.
///
/// The `NetworkTopology` acts as the graph representation of the system. It manages:
/// * **Physical Layer**: Devices (switches, end systems) and Links.
/// * **Connectivity**: An undirected adjacency list used by the `Router`.
/// * **Link Lookup**: Resolving a hop `(u, v)` to the link carrying it and its capacity.
///
/// Devices and links are added once, at load time, before any stream is routed.
#[derive(Debug, Clone)]
pub struct NetworkTopology {
    /// All declared devices, indexed by name.
    devices: HashMap<DeviceId, Device>,

    /// All links, indexed by their id.
    links: HashMap<LinkId, Link>,

    /// Undirected adjacency. Neighbour sets are ordered so that graph traversal is
    /// deterministic.
    adjacency: BTreeMap<DeviceId, BTreeSet<DeviceId>>,

    /// Maps both traversal directions of a device pair to the link between them.
    /// Keyed by endpoints, so a reused link id never changes an existing edge.
    link_index: HashMap<(DeviceId, DeviceId), Link>,

    /// Capacity in bit/s for links whose record carries none.
    default_capacity: f64,

    /// Reject links whose endpoints were not declared as devices beforehand.
    strict_link_endpoints: bool,
}

/// Outcome of loading a batch of topology records.
#[derive(Debug, Default)]
pub struct TopologyLoadSummary {
    pub devices_added: usize,
    pub links_added: usize,
    pub skipped: Vec<Error>,
}

impl NetworkTopology {
    pub fn new(default_capacity: f64, strict_link_endpoints: bool) -> Self {
        Self {
            devices: HashMap::new(),
            links: HashMap::new(),
            adjacency: BTreeMap::new(),
            link_index: HashMap::new(),
            default_capacity,
            strict_link_endpoints,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.link_capacity, config.strict_link_endpoints)
    }

    /// Parses a device record and adds the device as a graph node.
    ///
    /// A device whose name is already known replaces the earlier declaration; its
    /// existing edges are kept.
    pub fn add_device(&mut self, record: &TopologyRecordDto) -> Result<DeviceId> {
        let device = Device::try_from(record)?;
        let id = device.id.clone();

        if self.devices.insert(id.clone(), device).is_some() {
            log::warn!("DuplicateDevice: {} declared more than once, keeping the latest declaration.", id);
        }
        self.adjacency.entry(id.clone()).or_default();

        log::debug!("Added device {}", id);
        Ok(id)
    }

    /// Parses a link record and adds an edge between its two endpoints.
    ///
    /// With strict endpoint validation an endpoint that was never declared as a device
    /// makes the record malformed. Otherwise the endpoint becomes an edge-only node.
    pub fn add_link(&mut self, record: &TopologyRecordDto) -> Result<LinkId> {
        let link = Link::from_record(record, self.default_capacity)?;

        for endpoint in [&link.source, &link.target] {
            if !self.devices.contains_key(endpoint) {
                if self.strict_link_endpoints {
                    return Err(Error::malformed(record.line, format!("link {} references undeclared device {}", link.id, endpoint)));
                }
                log::warn!("InValidLinkNetworkConfiguration: link {} references undeclared device {}, adding it as an edge-only node.", link.id, endpoint);
            }
        }

        if link.source == link.target {
            return Err(Error::malformed(record.line, format!("link {} connects {} to itself", link.id, link.source)));
        }

        let id = link.id.clone();
        self.adjacency.entry(link.source.clone()).or_default().insert(link.target.clone());
        self.adjacency.entry(link.target.clone()).or_default().insert(link.source.clone());

        let replaced = self.link_index.insert((link.source.clone(), link.target.clone()), link.clone());
        if let Some(parallel) = replaced.filter(|parallel| parallel.id != id) {
            log::warn!(
                "ParallelLink: {} and {} both connect {} and {}, hops between them use {}.",
                parallel.id,
                id,
                link.source,
                link.target,
                id
            );
        }
        self.link_index.insert((link.target.clone(), link.source.clone()), link.clone());

        if let Some(previous) = self.links.insert(id.clone(), link) {
            log::warn!(
                "DuplicateLink: link id {} declared more than once, the id now refers to the latest declaration. The edge {}-{} is kept.",
                id,
                previous.source,
                previous.target
            );
        }

        Ok(id)
    }

    /// Applies a sequence of topology records in order. Malformed records are logged and
    /// collected in the summary; they never abort the load.
    pub fn load<'a>(&mut self, records: impl IntoIterator<Item = &'a TopologyRecordDto>) -> TopologyLoadSummary {
        let mut summary = TopologyLoadSummary::default();

        for record in records {
            let outcome = match record.kind() {
                TopologyRecordKind::Switch | TopologyRecordKind::EndSystem => self.add_device(record).map(|_| summary.devices_added += 1),
                TopologyRecordKind::Link => self.add_link(record).map(|_| summary.links_added += 1),
                TopologyRecordKind::Unknown => Err(Error::malformed(record.line, format!("unknown topology record type {:?}", record.fields.first()))),
            };

            if let Err(e) = outcome {
                log::warn!("Skipping topology record: {}", e);
                summary.skipped.push(e);
            }
        }

        log::info!(
            "Topology loaded: {} devices ({} graph nodes), {} links, {} records skipped.",
            self.devices.len(),
            self.num_of_nodes(),
            self.links.len(),
            summary.skipped.len()
        );
        summary
    }

    pub fn device(&self, id: &DeviceId) -> Option<&Device> {
        self.devices.get(id)
    }

    /// True if `id` is a node of the graph, declared or edge-only.
    pub fn contains(&self, id: &DeviceId) -> bool {
        self.adjacency.contains_key(id)
    }

    /// Neighbours of `id` in lexicographic order.
    pub fn neighbours(&self, id: &DeviceId) -> impl Iterator<Item = &DeviceId> {
        self.adjacency.get(id).into_iter().flat_map(|set| set.iter())
    }

    pub fn link(&self, id: &LinkId) -> Option<&Link> {
        self.links.get(id)
    }

    /// The link carrying hop `from -> to`, if the devices are adjacent.
    pub fn link_between(&self, from: &DeviceId, to: &DeviceId) -> Option<&Link> {
        self.link_index.get(&(from.clone(), to.clone()))
    }

    pub fn num_of_devices(&self) -> usize {
        self.devices.len()
    }

    pub fn num_of_nodes(&self) -> usize {
        self.adjacency.len()
    }

    pub fn num_of_links(&self) -> usize {
        self.links.len()
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn rec(fields: &[&str]) -> TopologyRecordDto {
        TopologyRecordDto::from_fields(fields)
    }

    #[test]
    fn links_are_undirected_for_adjacency() {
        let mut topology = NetworkTopology::new(1e9, true);
        topology.add_device(&rec(&["ES", "ES1", "1"])).unwrap();
        topology.add_device(&rec(&["SW", "SW1", "2"])).unwrap();
        topology.add_link(&rec(&["LINK", "L1", "ES1", "1", "SW1", "1"])).unwrap();

        let es1 = DeviceId::new("ES1");
        let sw1 = DeviceId::new("SW1");
        assert_eq!(topology.neighbours(&es1).collect::<Vec<_>>(), vec![&sw1]);
        assert_eq!(topology.neighbours(&sw1).collect::<Vec<_>>(), vec![&es1]);
        assert_eq!(topology.link_between(&sw1, &es1).map(|l| l.id.clone()), Some(LinkId::new("L1")));
    }

    #[test]
    fn duplicate_device_last_write_wins() {
        let mut topology = NetworkTopology::new(1e9, true);
        topology.add_device(&rec(&["SW", "SW1", "2"])).unwrap();
        topology.add_device(&rec(&["SW", "SW1", "8"])).unwrap();

        assert_eq!(topology.num_of_devices(), 1);
        assert_eq!(topology.device(&DeviceId::new("SW1")).unwrap().ports, 8);
    }

    #[test]
    fn strict_mode_rejects_undeclared_endpoint() {
        let mut topology = NetworkTopology::new(1e9, true);
        topology.add_device(&rec(&["ES", "ES1", "1"])).unwrap();

        let err = topology.add_link(&rec(&["LINK", "L1", "ES1", "1", "SW9", "1"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRecord);
        assert!(!topology.contains(&DeviceId::new("SW9")));
        assert_eq!(topology.num_of_links(), 0);
    }

    #[test]
    fn lenient_mode_creates_edge_only_node() {
        let mut topology = NetworkTopology::new(1e9, false);
        topology.add_device(&rec(&["ES", "ES1", "1"])).unwrap();
        topology.add_link(&rec(&["LINK", "L1", "ES1", "1", "SW9", "1"])).unwrap();

        let sw9 = DeviceId::new("SW9");
        assert!(topology.contains(&sw9));
        assert!(topology.device(&sw9).is_none());
        assert_eq!(topology.num_of_nodes(), 2);
        assert_eq!(topology.num_of_devices(), 1);
    }

    #[test]
    fn load_skips_malformed_records_and_continues() {
        let records = vec![
            rec(&["SW", "SW1", "4"]),
            rec(&["ES", "ES1", "x"]),
            rec(&["ES", "ES2", "1"]),
            rec(&["ROUTER", "R1", "1"]),
            rec(&["LINK", "L1", "ES2", "1", "SW1"]),
            rec(&["LINK", "L2", "ES2", "1", "SW1", "1"]),
        ];

        let mut topology = NetworkTopology::new(1e9, true);
        let summary = topology.load(&records);

        assert_eq!(summary.devices_added, 2);
        assert_eq!(summary.links_added, 1);
        assert_eq!(summary.skipped.len(), 3);
        assert!(summary.skipped.iter().all(|e| e.kind() == ErrorKind::MalformedRecord));
    }

    fn four_devices() -> NetworkTopology {
        let mut topology = NetworkTopology::new(1e9, true);
        for name in ["A", "B", "C", "D"] {
            topology.add_device(&rec(&["SW", name, "2"])).unwrap();
        }
        topology
    }

    #[test]
    fn reused_link_id_keeps_both_edges_with_their_own_capacity() {
        let mut topology = four_devices();
        topology.add_link(&rec(&["LINK", "L1", "A", "1", "B", "1", "", "1e9"])).unwrap();
        topology.add_link(&rec(&["LINK", "L1", "C", "1", "D", "1", "", "1e6"])).unwrap();

        let (a, b, c, d) = (DeviceId::new("A"), DeviceId::new("B"), DeviceId::new("C"), DeviceId::new("D"));
        assert_eq!(topology.link_between(&a, &b).map(|l| l.capacity), Some(1e9));
        assert_eq!(topology.link_between(&b, &a).map(|l| l.capacity), Some(1e9));
        assert_eq!(topology.link_between(&d, &c).map(|l| l.capacity), Some(1e6));
        assert_eq!(topology.link(&LinkId::new("L1")).map(|l| l.source.clone()), Some(c));
        assert_eq!(topology.neighbours(&a).collect::<Vec<_>>(), vec![&b]);
    }

    #[test]
    fn parallel_links_resolve_to_the_latest_declaration() {
        let mut topology = four_devices();
        topology.add_link(&rec(&["LINK", "L1", "A", "1", "B", "1", "", "1e8"])).unwrap();
        topology.add_link(&rec(&["LINK", "L2", "B", "2", "A", "2", "", "1e9"])).unwrap();

        let (a, b) = (DeviceId::new("A"), DeviceId::new("B"));
        assert_eq!(topology.link_between(&a, &b).map(|l| l.id.clone()), Some(LinkId::new("L2")));
        assert_eq!(topology.link_between(&b, &a).map(|l| l.capacity), Some(1e9));
        assert_eq!(topology.num_of_links(), 2);
    }
}
