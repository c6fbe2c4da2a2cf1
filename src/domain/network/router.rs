use crate::domain::network::topology::NetworkTopology;
use crate::domain::utils::id::DeviceId;
use crate::error::{Error, Result};
use std::collections::{HashMap, VecDeque};

/// A route through the network as the ordered sequence of devices it visits.
///
/// A path of a single device (source equals destination) has no hops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub devices: Vec<DeviceId>,
}

/// One traversal of a link, in the direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hop<'a> {
    pub from: &'a DeviceId,
    pub to: &'a DeviceId,
}

impl Path {
    pub fn new(devices: Vec<DeviceId>) -> Self {
        Self { devices }
    }

    pub fn hop_count(&self) -> usize {
        self.devices.len().saturating_sub(1)
    }

    /// Consecutive device pairs, in path order.
    pub fn hops(&self) -> impl Iterator<Item = Hop<'_>> {
        self.devices.windows(2).map(|pair| Hop { from: &pair[0], to: &pair[1] })
    }
}

/// Computes minimum-hop routes over a `NetworkTopology`.
///
/// Neighbours are expanded in lexicographic order of device name, so among several
/// shortest paths the lexicographically smallest device sequence is returned.
pub struct Router<'a> {
    topology: &'a NetworkTopology,
}

impl<'a> Router<'a> {
    pub fn new(topology: &'a NetworkTopology) -> Self {
        Self { topology }
    }

    /// Breadth-first shortest path from `source` to `destination`.
    ///
    /// Fails with `Error::NoPath` if either endpoint is not in the graph or the two are not
    /// connected.
    pub fn shortest_path(&self, source: &DeviceId, destination: &DeviceId) -> Result<Path> {
        let no_path = || Error::NoPath { from: source.clone(), to: destination.clone() };

        if !self.topology.contains(source) || !self.topology.contains(destination) {
            log::debug!("NoPathFound: {} => {} (endpoint not in topology)", source, destination);
            return Err(no_path());
        }

        if source == destination {
            return Ok(Path::new(vec![source.clone()]));
        }

        let mut predecessor: HashMap<DeviceId, DeviceId> = HashMap::new();
        let mut queue: VecDeque<DeviceId> = VecDeque::new();
        queue.push_back(source.clone());

        while let Some(current) = queue.pop_front() {
            for neighbour in self.topology.neighbours(&current) {
                if neighbour == source || predecessor.contains_key(neighbour) {
                    continue;
                }
                predecessor.insert(neighbour.clone(), current.clone());

                if neighbour == destination {
                    let path = Self::backtrack(&predecessor, source, destination);
                    log::debug!("Path found {} => {}: {} hops", source, destination, path.hop_count());
                    return Ok(path);
                }
                queue.push_back(neighbour.clone());
            }
        }

        log::debug!("NoPathFound: {} => {}", source, destination);
        Err(no_path())
    }

    fn backtrack(predecessor: &HashMap<DeviceId, DeviceId>, source: &DeviceId, destination: &DeviceId) -> Path {
        let mut devices = vec![destination.clone()];
        let mut current = destination;

        while current != source {
            match predecessor.get(current) {
                Some(previous) => {
                    devices.push(previous.clone());
                    current = previous;
                }
                None => break,
            }
        }

        devices.reverse();
        Path::new(devices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::topology_dto::TopologyRecordDto;
    use crate::error::ErrorKind;

    /// ES1 - SW1 - SW2 - ES2 plus a parallel SW1 - SW3 - SW2 detour and an isolated ES3.
    fn topology() -> NetworkTopology {
        let records: Vec<TopologyRecordDto> = [
            vec!["ES", "ES1", "1"],
            vec!["ES", "ES2", "1"],
            vec!["ES", "ES3", "1"],
            vec!["SW", "SW1", "3"],
            vec!["SW", "SW2", "3"],
            vec!["SW", "SW3", "2"],
            vec!["LINK", "L1", "ES1", "1", "SW1", "1"],
            vec!["LINK", "L2", "SW1", "2", "SW2", "1"],
            vec!["LINK", "L3", "SW2", "2", "ES2", "1"],
            vec!["LINK", "L4", "SW1", "3", "SW3", "1"],
            vec!["LINK", "L5", "SW3", "2", "SW2", "3"],
        ]
        .iter()
        .map(|f| TopologyRecordDto::from_fields(f))
        .collect();

        let mut topology = NetworkTopology::new(1e9, true);
        let summary = topology.load(&records);
        assert!(summary.skipped.is_empty());
        topology
    }

    fn ids(names: &[&str]) -> Vec<DeviceId> {
        names.iter().map(|n| DeviceId::new(*n)).collect()
    }

    #[test]
    fn finds_minimum_hop_path() {
        let topology = topology();
        let router = Router::new(&topology);

        let path = router.shortest_path(&DeviceId::new("ES1"), &DeviceId::new("ES2")).unwrap();
        assert_eq!(path.devices, ids(&["ES1", "SW1", "SW2", "ES2"]));
        assert_eq!(path.hop_count(), 3);

        let hops: Vec<(String, String)> = path.hops().map(|h| (h.from.to_string(), h.to.to_string())).collect();
        assert_eq!(hops[0], ("ES1".to_string(), "SW1".to_string()));
        assert_eq!(hops[2], ("SW2".to_string(), "ES2".to_string()));
    }

    #[test]
    fn same_source_and_destination_has_no_hops() {
        let topology = topology();
        let path = Router::new(&topology).shortest_path(&DeviceId::new("SW1"), &DeviceId::new("SW1")).unwrap();
        assert_eq!(path.hop_count(), 0);
        assert_eq!(path.hops().count(), 0);
    }

    #[test]
    fn disconnected_or_unknown_endpoints_fail_with_no_path() {
        let topology = topology();
        let router = Router::new(&topology);

        let err = router.shortest_path(&DeviceId::new("ES1"), &DeviceId::new("ES3")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoPath);

        let err = router.shortest_path(&DeviceId::new("ES1"), &DeviceId::new("Nowhere")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoPath);
    }

    #[test]
    fn ties_break_lexicographically_and_repeat() {
        let records: Vec<TopologyRecordDto> = [
            vec!["SW", "A", "2"],
            vec!["SW", "B", "2"],
            vec!["SW", "C", "2"],
            vec!["SW", "D", "2"],
            vec!["LINK", "L1", "A", "1", "C", "1"],
            vec!["LINK", "L2", "A", "2", "B", "1"],
            vec!["LINK", "L3", "C", "2", "D", "1"],
            vec!["LINK", "L4", "B", "2", "D", "2"],
        ]
        .iter()
        .map(|f| TopologyRecordDto::from_fields(f))
        .collect();
        let mut topology = NetworkTopology::new(1e9, true);
        topology.load(&records);
        let router = Router::new(&topology);

        for _ in 0..5 {
            let path = router.shortest_path(&DeviceId::new("A"), &DeviceId::new("D")).unwrap();
            assert_eq!(path.devices, ids(&["A", "B", "D"]));
        }
    }
}
