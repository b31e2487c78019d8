//! Integration tests for next-hop key parsing against a router interface table.

use pretty_assertions::assert_eq;
use sonic_nexthop::{
    EncodingFault, IntfsAliasResolver, NextHopEncoding, NextHopKey, RouterIntfsError,
    RouterIntfsTable,
};
use sonic_types::{IpAddress, MacAddress};
use std::collections::BTreeSet;
use std::io::Write;
use std::sync::Arc;
use std::thread;

const INTFS_CONFIG: &str = r#"{
    "interfaces": [
        { "alias": "Ethernet0", "ip_prefixes": ["10.0.0.0/31", "fc00::/126"] },
        { "alias": "Ethernet4", "ip_prefixes": ["10.0.0.2/31"] },
        { "alias": "Vlan100", "vrf": "VrfRed", "ip_prefixes": ["192.168.1.1/24"] },
        { "alias": "Vlan200", "vrf": "VrfBlue", "ip_prefixes": ["192.168.1.1/24"] }
    ]
}"#;

fn load_table() -> RouterIntfsTable {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(INTFS_CONFIG.as_bytes()).unwrap();
    RouterIntfsTable::load(file.path()).unwrap()
}

fn ip(s: &str) -> IpAddress {
    s.parse().unwrap()
}

#[test]
fn test_load_table_from_file() {
    let table = load_table();
    assert_eq!(table.len(), 4);
    assert_eq!(table.get("Vlan100").unwrap().vrf.as_deref(), Some("VrfRed"));
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = RouterIntfsTable::load(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, RouterIntfsError::Io { .. }));
}

#[test]
fn test_load_malformed_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(br#"{ "interfaces": [ { "alias": "Ethernet0", "ip_prefixes": ["10.0.0.0/99"] } ] }"#)
        .unwrap();
    let err = RouterIntfsTable::load(file.path()).unwrap_err();
    assert!(matches!(err, RouterIntfsError::Json(_)));
}

#[test]
fn test_implicit_interface_resolution() {
    let table = load_table();
    assert_eq!(
        NextHopKey::parse("10.0.0.3", &table).unwrap(),
        NextHopKey::new(ip("10.0.0.3"), "Ethernet4")
    );
    assert_eq!(
        NextHopKey::parse("fc00::2", &table).unwrap(),
        NextHopKey::new(ip("fc00::2"), "Ethernet0")
    );

    let err = NextHopKey::parse("172.16.0.1", &table).unwrap_err();
    assert_eq!(err.input(), "172.16.0.1");
    assert!(matches!(err.reason(), EncodingFault::Unresolved(_)));
}

#[test]
fn test_vrf_resolution_picks_vrf_interface() {
    let table = load_table();
    let red = NextHopKey::parse("192.168.1.10@VrfRed", &table).unwrap();
    let blue = NextHopKey::parse("192.168.1.10@VrfBlue", &table).unwrap();
    assert_eq!(red.alias(), "Vlan100");
    assert_eq!(blue.alias(), "Vlan200");
    assert_ne!(red, blue);

    // Same subnet is not reachable from the default VRF.
    assert!(NextHopKey::parse("192.168.1.10", &table).is_err());
    assert!(NextHopKey::parse("192.168.1.10@VrfGreen", &table).is_err());
}

#[test]
fn test_explicit_alias_passes_through() {
    let table = RouterIntfsTable::new();
    let nh = NextHopKey::parse("10.0.0.1@Ethernet0", &table).unwrap();
    assert_eq!(nh.to_string(), "10.0.0.1@Ethernet0");
    assert!(!nh.is_intf_nexthop());

    let intf = NextHopKey::parse("0.0.0.0@Ethernet0", &table).unwrap();
    assert!(intf.is_intf_nexthop());
}

#[test]
fn test_default_form_round_trip() {
    let table = RouterIntfsTable::new();
    for (addr, alias) in [("10.0.0.1", "Ethernet0"), ("2001:db8::1", "PortChannel0001")] {
        let nh = NextHopKey::new(ip(addr), alias);
        let s = nh.to_string();
        assert_eq!(s, format!("{}@{}", ip(addr), alias));
        assert_eq!(NextHopKey::parse(&s, &table).unwrap(), nh);
    }
}

#[test]
fn test_overlay_round_trip() {
    let mac: MacAddress = "aa:bb:cc:dd:ee:ff".parse().unwrap();
    let nh = NextHopKey::overlay(ip("10.0.0.1"), "Ethernet0", 100, mac)
        .unwrap()
        .with_weight(4);
    let s = nh.encode();
    assert_eq!(s, "10.0.0.1@Ethernet0@100@aa:bb:cc:dd:ee:ff");

    let back = NextHopKey::parse_with(&s, NextHopEncoding::Overlay).unwrap();
    assert_eq!(back.ip_address(), nh.ip_address());
    assert_eq!(back.alias(), "Ethernet0");
    assert_eq!(back.vni(), 100);
    assert_eq!(back.mac_address(), mac);
    // Weight does not travel in the encoding but does not affect identity.
    assert_eq!(back.weight(), 0);
    assert_eq!(back, nh);
}

#[test]
fn test_srv6_round_trip() {
    let nh = NextHopKey::srv6(ip("2001:db8::1"), "seg1", "src1").unwrap();
    let back = NextHopKey::parse_with(&nh.encode(), NextHopEncoding::Srv6).unwrap();
    assert_eq!(back.ip_address(), &ip("2001:db8::1"));
    assert_eq!(back.srv6_segment(), "seg1");
    assert_eq!(back.srv6_source(), "src1");
    assert_eq!(back, nh);
}

#[test]
fn test_group_string_rejected_everywhere() {
    let table = load_table();
    let group = "10.0.0.1,10.0.0.2@Ethernet0";
    let err = NextHopKey::parse(group, &table).unwrap_err();
    assert_eq!(err.reason(), &EncodingFault::GroupDelimiter);
    assert!(NextHopKey::parse_with(group, NextHopEncoding::Overlay).is_err());
    assert!(NextHopKey::parse_with(group, NextHopEncoding::Srv6).is_err());
}

#[test]
fn test_canonical_group_order() {
    let table = load_table();
    let members = ["10.0.0.3", "10.0.0.1@Ethernet0", "10.0.0.1", "192.168.1.5@VrfRed"];
    let set: BTreeSet<NextHopKey> = members
        .iter()
        .map(|s| NextHopKey::parse(s, &table).unwrap())
        .collect();
    let encoded: Vec<String> = set.iter().map(ToString::to_string).collect();
    assert_eq!(
        encoded,
        vec!["10.0.0.1@Ethernet0", "10.0.0.3@Ethernet4", "192.168.1.5@Vlan100"]
    );
}

#[test]
fn test_concurrent_parsing_with_shared_table() {
    let table: Arc<dyn IntfsAliasResolver> = Arc::new(load_table());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let table = Arc::clone(&table);
            thread::spawn(move || {
                let key = if i % 2 == 0 { "10.0.0.1" } else { "192.168.1.7@VrfBlue" };
                (0..100)
                    .map(|_| NextHopKey::parse(key, &table).unwrap())
                    .collect::<BTreeSet<_>>()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let keys = handle.join().unwrap();
        assert_eq!(keys.len(), 1);
        let expected = if i % 2 == 0 { "Ethernet0" } else { "Vlan200" };
        assert_eq!(keys.iter().next().unwrap().alias(), expected);
    }
}
