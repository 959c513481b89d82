use crate::{
    ast::{
        AddressMatch, FirewallAction, FirewallMatch, FirewallRuleSetTail,
        FirewallRuleTail, FirewallStatement, IcmpCode, IcmpMatch, IcmpType,
        IcmpTypeName, IpProtocol, NamedPort, Port, SubRange,
    },
    parser::Parser,
};

use super::{meta::Spans, token::Keyword, ParseErrorKind, ParseResult};

fn parse_firewall(s: &str) -> ParseResult<FirewallStatement> {
    let mut spans = Spans::default();
    Parser::run_parser(Parser::firewall, 0, &mut spans, s)
}

fn rule_tail(s: &str) -> FirewallRuleTail {
    let FirewallStatement::Name(rule_set) = parse_firewall(s).unwrap() else {
        panic!("expected a rule set");
    };
    assert_eq!(rule_set.name.as_str(), "WAN_IN");
    let FirewallRuleSetTail::Rule(rule) = rule_set.tail else {
        panic!("expected a rule");
    };
    rule.tail
}

#[test]
fn rule_set_properties() {
    let FirewallStatement::Name(rule_set) =
        parse_firewall("firewall name WAN_IN default-action drop").unwrap()
    else {
        panic!("expected a rule set");
    };
    assert!(matches!(
        rule_set.tail,
        FirewallRuleSetTail::DefaultAction(a) if *a == FirewallAction::Drop
    ));

    let FirewallStatement::Name(rule_set) =
        parse_firewall("firewall name WAN_IN enable-default-log").unwrap()
    else {
        panic!("expected a rule set");
    };
    assert!(matches!(rule_set.tail, FirewallRuleSetTail::Null(_)));
}

#[test]
fn rule_action_and_protocol() {
    assert!(matches!(
        rule_tail("firewall name WAN_IN rule 10 action accept"),
        FirewallRuleTail::Action(a) if *a == FirewallAction::Accept
    ));
    assert!(matches!(
        rule_tail("firewall name WAN_IN rule 10 protocol tcp_udp"),
        FirewallRuleTail::Protocol(p) if *p == IpProtocol::TcpUdp
    ));
    assert!(matches!(
        rule_tail("firewall name WAN_IN rule 10 protocol 47"),
        FirewallRuleTail::Protocol(p) if *p == IpProtocol::Number(47)
    ));
}

#[test]
fn rule_addresses() {
    let FirewallRuleTail::Source(FirewallMatch::Address(addr)) =
        rule_tail("firewall name WAN_IN rule 10 source address 192.0.2.0/24")
    else {
        panic!("expected a source address");
    };
    assert!(matches!(*addr, AddressMatch::Prefix(ref p) if p.len == 24));

    let FirewallRuleTail::Destination(FirewallMatch::Address(addr)) =
        rule_tail("firewall name WAN_IN rule 10 destination address 192.0.2.1")
    else {
        panic!("expected a destination address");
    };
    assert!(matches!(*addr, AddressMatch::Address(_)));
}

#[test]
fn negated_addresses() {
    let FirewallRuleTail::Source(FirewallMatch::Address(addr)) =
        rule_tail("firewall name WAN_IN rule 10 source address !10.0.0.0/8")
    else {
        panic!("expected a source address");
    };
    let AddressMatch::Negated(inner) = &*addr else {
        panic!("expected a negated address");
    };
    assert!(matches!(
        **inner,
        AddressMatch::Prefix(ref p) if p.to_string() == "10.0.0.0/8"
    ));

    let FirewallRuleTail::Destination(FirewallMatch::Address(addr)) =
        rule_tail("firewall name WAN_IN rule 10 destination address !192.0.2.1")
    else {
        panic!("expected a destination address");
    };
    assert!(matches!(
        &*addr,
        AddressMatch::Negated(inner) if matches!(**inner, AddressMatch::Address(_))
    ));

    let err = parse_firewall(
        "firewall name WAN_IN rule 10 source address !not-an-address",
    )
    .unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::UnexpectedToken {
            expected: "an IP address or prefix".into(),
            got: "!not-an-address".into(),
        }
    );
}

#[test]
fn rule_ports() {
    let FirewallRuleTail::Destination(FirewallMatch::Port(range)) = rule_tail(
        "firewall name WAN_IN rule 10 destination port ssh,8000-8080",
    ) else {
        panic!("expected a port range");
    };
    assert_eq!(
        range.0,
        vec![
            SubRange {
                low: Port::Named(NamedPort::Ssh),
                high: None,
            },
            SubRange {
                low: Port::Number(8000),
                high: Some(Port::Number(8080)),
            },
        ]
    );

    let FirewallRuleTail::Source(FirewallMatch::Port(range)) =
        rule_tail("firewall name WAN_IN rule 10 source port 53")
    else {
        panic!("expected a port");
    };
    assert_eq!(range.0.len(), 1);
}

#[test]
fn rule_icmp() {
    assert!(matches!(
        rule_tail("firewall name WAN_IN rule 10 icmp type-name echo-request"),
        FirewallRuleTail::Icmp(IcmpMatch::TypeName(t))
            if *t == IcmpTypeName::Type(IcmpType::EchoRequest)
    ));
    assert!(matches!(
        rule_tail("firewall name WAN_IN rule 10 icmp type-name port-unreachable"),
        FirewallRuleTail::Icmp(IcmpMatch::TypeName(t))
            if *t == IcmpTypeName::Code(IcmpCode::PortUnreachable)
    ));
    assert!(matches!(
        rule_tail("firewall name WAN_IN rule 10 icmp type 8"),
        FirewallRuleTail::Icmp(IcmpMatch::Type(t)) if *t == 8
    ));
    assert!(matches!(
        rule_tail("firewall name WAN_IN rule 10 icmp code 0"),
        FirewallRuleTail::Icmp(IcmpMatch::Code(c)) if *c == 0
    ));
}

#[test]
fn rule_unmodeled() {
    for (line, keyword) in [
        ("firewall name WAN_IN rule 10 state established enable", Keyword::State),
        ("firewall name WAN_IN rule 10 log enable", Keyword::Log),
        ("firewall name WAN_IN rule 10 recent count 4", Keyword::Recent),
    ] {
        let FirewallRuleTail::Null(catch_all) = rule_tail(line) else {
            panic!("expected a catch-all for {line:?}");
        };
        assert_eq!(*catch_all.keyword, keyword);
    }

    assert!(matches!(
        rule_tail("firewall name WAN_IN rule 10 source group address-group LAN"),
        FirewallRuleTail::Source(FirewallMatch::Null(_))
    ));
}

#[test]
fn global_options() {
    let FirewallStatement::Null(catch_all) =
        parse_firewall("firewall all-ping enable").unwrap()
    else {
        panic!("expected a catch-all");
    };
    assert_eq!(*catch_all.keyword, Keyword::AllPing);
    assert_eq!(catch_all.discarded, 1);
}

#[test]
fn bad_port() {
    let err = parse_firewall("firewall name WAN_IN rule 10 destination port http,")
        .unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::InvalidLiteral { .. }));
}

#[test]
fn bad_action() {
    let err =
        parse_firewall("firewall name WAN_IN rule 10 action permit").unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::UnexpectedToken {
            expected: "'accept', 'drop' or 'reject'".into(),
            got: "permit".into(),
        }
    );
}
