use std::net::{IpAddr, Ipv4Addr};

use crate::{
    ast::{
        Description, InterfaceAddress, InterfaceDeclaration, InterfaceTail,
        InterfaceType, IpPrefix,
    },
    parser::Parser,
};

use super::{meta::Spans, token::Keyword, ParseErrorKind, ParseResult};

fn parse_interface(s: &str) -> ParseResult<InterfaceDeclaration> {
    let mut spans = Spans::default();
    Parser::run_parser(Parser::interfaces, 0, &mut spans, s)
}

#[test]
fn static_address() {
    let decl =
        parse_interface("interfaces ethernet eth0 address 10.0.0.1/24")
            .unwrap();
    assert_eq!(*decl.ty, InterfaceType::Ethernet);
    assert_eq!(decl.name.as_str(), "eth0");

    let Some(InterfaceTail::Address(addr)) = decl.tail else {
        panic!("expected an address");
    };
    assert_eq!(
        *addr,
        InterfaceAddress::Static(IpPrefix {
            text: "10.0.0.1/24".into(),
            addr: IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)),
            len: 24,
        })
    );
}

#[test]
fn dynamic_addresses() {
    let decl =
        parse_interface("interfaces ethernet eth1 address dhcp").unwrap();
    assert!(matches!(
        decl.tail,
        Some(InterfaceTail::Address(ref a)) if **a == InterfaceAddress::Dhcp
    ));

    let decl =
        parse_interface("interfaces bonding bond0 address dhcpv6").unwrap();
    assert_eq!(*decl.ty, InterfaceType::Bonding);
    assert!(matches!(
        decl.tail,
        Some(InterfaceTail::Address(ref a)) if **a == InterfaceAddress::Dhcpv6
    ));
}

#[test]
fn ipv6_address() {
    let decl =
        parse_interface("interfaces ethernet eth0 address 2001:db8::1/64")
            .unwrap();
    let Some(InterfaceTail::Address(addr)) = decl.tail else {
        panic!("expected an address");
    };
    let InterfaceAddress::Static(prefix) = &*addr else {
        panic!("expected a static address");
    };
    assert_eq!(prefix.to_string(), "2001:db8::1/64");
}

#[test]
fn address_text_is_kept() {
    for text in ["2001:DB8:0::1/64", "10.0.0.1/024", "2001:0db8::0001/64"] {
        let decl =
            parse_interface(&format!("interfaces ethernet eth0 address {text}"))
                .unwrap();
        let Some(InterfaceTail::Address(addr)) = decl.tail else {
            panic!("expected an address");
        };
        let InterfaceAddress::Static(prefix) = &*addr else {
            panic!("expected a static address");
        };
        assert_eq!(prefix.text, text);
        assert_eq!(prefix.to_string(), text);
    }
}

#[test]
fn description() {
    let decl = parse_interface(
        "interfaces ethernet eth0 description 'uplink to ISP'",
    )
    .unwrap();
    let Some(InterfaceTail::Description(d)) = decl.tail else {
        panic!("expected a description");
    };
    assert_eq!(*d, Description(Some("uplink to ISP".into())));
}

#[test]
fn bare_declaration() {
    let decl = parse_interface("interfaces loopback lo").unwrap();
    assert_eq!(*decl.ty, InterfaceType::Loopback);
    assert_eq!(decl.tail, None);
}

#[test]
fn unmodeled_properties() {
    for tail in [
        "mtu 9000",
        "speed auto",
        "duplex full",
        "hw-id 00:11:22:33:44:55",
        "offload gro",
        "firewall in name WAN_IN",
    ] {
        let decl = parse_interface(&format!("interfaces ethernet eth0 {tail}"))
            .unwrap();
        let Some(InterfaceTail::Null(catch_all)) = decl.tail else {
            panic!("expected a catch-all for {tail:?}");
        };
        assert_eq!(
            catch_all.discarded,
            tail.split_whitespace().count() - 1,
            "{tail}"
        );
    }
}

#[test]
fn vif() {
    let decl =
        parse_interface("interfaces ethernet eth0 vif 100 address 10.1.0.1/24")
            .unwrap();
    let Some(InterfaceTail::Vif { vlan, tail }) = decl.tail else {
        panic!("expected a vif");
    };
    assert_eq!(*vlan, 100);
    assert!(matches!(tail.as_deref(), Some(InterfaceTail::Address(_))));

    let decl = parse_interface("interfaces ethernet eth0 vif 200").unwrap();
    assert!(matches!(
        decl.tail,
        Some(InterfaceTail::Vif { tail: None, .. })
    ));

    let decl = parse_interface("interfaces ethernet eth0 vif 200 mtu 1500")
        .unwrap();
    let Some(InterfaceTail::Vif {
        tail: Some(tail), ..
    }) = decl.tail
    else {
        panic!("expected a vif");
    };
    let InterfaceTail::Null(catch_all) = *tail else {
        panic!("expected a catch-all");
    };
    assert_eq!(*catch_all.keyword, Keyword::Mtu);
}

#[test]
fn nested_vif_is_rejected() {
    let err =
        parse_interface("interfaces ethernet eth0 vif 100 vif 200").unwrap_err();
    assert!(matches!(
        err.kind,
        ParseErrorKind::NoViableAlternative { .. }
    ));
}

#[test]
fn unknown_interface_type() {
    let err = parse_interface("interfaces ether eth0 address dhcp").unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::UnexpectedToken {
            expected: "an interface type".into(),
            got: "ether".into(),
        }
    );
    assert_eq!((err.location.start, err.location.end), (11, 16));
}

#[test]
fn bad_address() {
    let err =
        parse_interface("interfaces ethernet eth0 address 10.0.0.1").unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::UnexpectedToken { .. }));
}
