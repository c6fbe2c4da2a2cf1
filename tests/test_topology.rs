use tsn_delay_analysis::domain::network::device::DeviceKind;
use tsn_delay_analysis::domain::network::router::Router;
use tsn_delay_analysis::domain::network::topology::NetworkTopology;
use tsn_delay_analysis::domain::utils::id::{DeviceId, LinkId};
use tsn_delay_analysis::error::ErrorKind;
use tsn_delay_analysis::loader::csv_loader::read_topology_records;

const RING_TOPOLOGY: &str = "\
SW,SW1,3,ring
SW,SW2,3,ring
SW,SW3,3,ring
SW,SW4,3,ring
ES,ES1,1,ring
ES,ES2,1,ring
LINK,L1,SW1,1,SW2,1,ring
LINK,L2,SW2,2,SW3,1,ring
LINK,L3,SW3,2,SW4,1,ring
LINK,L4,SW4,2,SW1,2,ring,100000000
LINK,L5,ES1,1,SW1,3,ring
LINK,L6,ES2,1,SW3,3,ring
";

fn ring() -> NetworkTopology {
    let records = read_topology_records(RING_TOPOLOGY.as_bytes()).unwrap();
    let mut topology = NetworkTopology::new(1e9, true);
    let summary = topology.load(&records);
    assert!(summary.skipped.is_empty(), "{:?}", summary.skipped);
    topology
}

#[test]
fn loads_devices_and_links_from_csv() {
    let topology = ring();

    assert_eq!(topology.num_of_devices(), 6);
    assert_eq!(topology.num_of_links(), 6);
    assert_eq!(topology.device(&DeviceId::new("ES1")).unwrap().kind, DeviceKind::EndSystem);
    assert_eq!(topology.device(&DeviceId::new("SW1")).unwrap().domain.as_deref(), Some("ring"));
    assert_eq!(topology.link(&LinkId::new("L4")).unwrap().capacity, 1e8);
    assert_eq!(topology.link(&LinkId::new("L1")).unwrap().capacity, 1e9);
}

#[test]
fn ring_routes_have_stable_hop_count_and_sequence() {
    let topology = ring();
    let router = Router::new(&topology);
    let es1 = DeviceId::new("ES1");
    let es2 = DeviceId::new("ES2");

    // Both ways around the ring take 4 hops; SW2 sorts before SW4.
    let first = router.shortest_path(&es1, &es2).unwrap();
    assert_eq!(first.hop_count(), 4);
    let names: Vec<&str> = first.devices.iter().map(|d| d.as_str()).collect();
    assert_eq!(names, vec!["ES1", "SW1", "SW2", "SW3", "ES2"]);

    for _ in 0..10 {
        assert_eq!(router.shortest_path(&es1, &es2).unwrap(), first);
    }
}

#[test]
fn every_hop_of_a_route_is_a_link() {
    let topology = ring();
    let router = Router::new(&topology);
    let path = router.shortest_path(&DeviceId::new("ES2"), &DeviceId::new("ES1")).unwrap();

    for hop in path.hops() {
        assert!(topology.link_between(hop.from, hop.to).is_some(), "{} -> {}", hop.from, hop.to);
    }
    assert_eq!(path.devices.first(), Some(&DeviceId::new("ES2")));
    assert_eq!(path.devices.last(), Some(&DeviceId::new("ES1")));
}

#[test]
fn lenient_topology_routes_through_undeclared_device() {
    let input = "ES,ES1,1\nES,ES2,1\nLINK,L1,ES1,1,SWX,1\nLINK,L2,SWX,2,ES2,1\n";
    let records = read_topology_records(input.as_bytes()).unwrap();

    let mut strict = NetworkTopology::new(1e9, true);
    let summary = strict.load(&records);
    assert_eq!(summary.skipped.len(), 2);
    let err = Router::new(&strict).shortest_path(&DeviceId::new("ES1"), &DeviceId::new("ES2")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoPath);

    let mut lenient = NetworkTopology::new(1e9, false);
    assert!(lenient.load(&records).skipped.is_empty());
    let path = Router::new(&lenient).shortest_path(&DeviceId::new("ES1"), &DeviceId::new("ES2")).unwrap();
    assert_eq!(path.hop_count(), 2);
}
