use std::net::IpAddr;

use crate::{
    ast::{
        Authentication, BgpNeighborTail, BgpTail, InterfaceAddress,
        InterfaceTail, InterfaceType, IpsecStatement, PolicyExpression,
        PolicyStatement, PrefixListRuleTail, PrefixListTail,
        ProtocolsStatement, RemoteAs, RouteMapRuleTail, RouteMapTail,
        SiteToSiteTail, Statement, SystemStatement, VpnStatement,
    },
    parser::{ParseOutput, Parser},
};

use super::{
    meta::{Span, Spans},
    token::{Keyword, Token, TokenStream},
    ParseErrorKind, ParseResult,
};

fn parse(s: &str) -> ParseResult<ParseOutput> {
    let mut spans = Spans::default();
    Parser::parse(0, &mut spans, s)
}

/// Parse input that must parse without any diagnostics
fn parse_clean(s: &str) -> Vec<Statement> {
    let output = parse(s).unwrap();
    assert!(output.diagnostics.is_empty(), "{s:?}");
    output
        .configuration
        .lines
        .into_iter()
        .map(|line| line.node)
        .collect()
}

fn single(s: &str) -> Statement {
    let mut lines = parse_clean(s);
    assert_eq!(lines.len(), 1);
    lines.remove(0)
}

//------------ Single lines -------------------------------------------------

#[test]
fn host_name() {
    let Statement::System(SystemStatement::HostName(name)) =
        single("set system host-name foo\n")
    else {
        panic!("expected a host name");
    };
    assert_eq!(name.as_str(), "foo");
}

#[test]
fn interface_address() {
    let Statement::Interfaces(decl) =
        single("set interfaces ethernet eth0 address 10.0.0.1/24\n")
    else {
        panic!("expected an interface");
    };
    assert_eq!(*decl.ty, InterfaceType::Ethernet);
    assert_eq!(decl.name.as_str(), "eth0");
    let Some(InterfaceTail::Address(address)) = decl.tail else {
        panic!("expected an address");
    };
    let InterfaceAddress::Static(prefix) = &*address else {
        panic!("expected a static address");
    };
    assert_eq!(prefix.to_string(), "10.0.0.1/24");
}

#[test]
fn bgp_neighbor() {
    let Statement::Protocols(ProtocolsStatement::Bgp(bgp)) =
        single("set protocols bgp 65000 neighbor 10.0.0.2 remote-as 65001\n")
    else {
        panic!("expected BGP");
    };
    assert_eq!(bgp.asn.as_deref(), Some(&65000));
    let BgpTail::Neighbor(neighbor) = bgp.tail else {
        panic!("expected a neighbor");
    };
    assert_eq!(*neighbor.address, "10.0.0.2".parse::<IpAddr>().unwrap());
    assert!(matches!(
        neighbor.tail,
        BgpNeighborTail::RemoteAs(r) if *r == RemoteAs::Number(65001)
    ));
}

#[test]
fn prefix_list_rule() {
    let Statement::Policy(PolicyStatement::PrefixList(pl)) =
        single("set policy prefix-list PL1 rule 10 prefix 10.0.0.0/24\n")
    else {
        panic!("expected a prefix list");
    };
    assert_eq!(pl.name.as_str(), "PL1");
    let PrefixListTail::Rule(rule) = pl.tail else {
        panic!("expected a rule");
    };
    assert_eq!(*rule.number, 10);
    assert!(matches!(
        rule.tail,
        PrefixListRuleTail::Prefix(p) if p.to_string() == "10.0.0.0/24"
    ));
}

#[test]
fn site_to_site_secret() {
    let Statement::Vpn(VpnStatement::Ipsec(IpsecStatement::SiteToSite(peer))) =
        single(
            "set vpn ipsec site-to-site peer 1.2.3.4 authentication pre-shared-secret abc\n",
        )
    else {
        panic!("expected a site-to-site peer");
    };
    assert_eq!(*peer.peer, "1.2.3.4".parse::<IpAddr>().unwrap());
    assert!(matches!(
        peer.tail,
        SiteToSiteTail::Authentication(Authentication::PreSharedSecret(s))
            if s.as_str() == "abc"
    ));
}

#[test]
fn route_map_call_without_spaces() {
    let Statement::Policy(PolicyStatement::RouteMap(rm)) =
        single("set policy route-map RM rule 10 call (A&&B)\n")
    else {
        panic!("expected a route map");
    };
    let RouteMapTail::Rule(rule) = rm.tail else {
        panic!("expected a rule");
    };
    assert!(matches!(
        rule.tail,
        RouteMapRuleTail::Call(ref e)
            if matches!(&e.node, PolicyExpression::Conjunction(o) if o.len() == 2)
    ));
}

#[test]
fn unmodeled_stanza() {
    let Statement::Null(catch_all) =
        single("set service ssh port 22 listen-address '0.0.0.0'\n")
    else {
        panic!("expected a catch-all");
    };
    assert_eq!(*catch_all.keyword, Keyword::Service);
    assert_eq!(catch_all.discarded, 5);
}

#[test]
fn line_span_excludes_terminator() {
    let mut spans = Spans::default();
    let output =
        Parser::parse(0, &mut spans, "set system host-name foo\n").unwrap();
    let line = &output.configuration.lines[0];
    assert_eq!(spans.get(line), Span::new(0, 0..24));
}

//------------ Recovery -----------------------------------------------------

#[test]
fn unknown_stanza_is_skipped() {
    let input = "set foobar some unrecognized tokens here\nset system host-name r1\n";
    let output = parse(input).unwrap();

    assert_eq!(output.diagnostics.len(), 1);
    let err = &output.diagnostics[0];
    assert_eq!(
        err.kind,
        ParseErrorKind::NoViableAlternative {
            expected: "a top-level stanza".into(),
            got: "foobar".into(),
        }
    );
    assert_eq!(err.location, Span::new(0, 4..10));
    assert_eq!(err.location.line_col(input), (1, 5));
    assert!(!err.is_fatal());

    assert_eq!(output.configuration.lines.len(), 1);
    assert!(matches!(
        output.configuration.lines[0].node,
        Statement::System(SystemStatement::HostName(_))
    ));
}

#[test]
fn error_inside_a_line_is_contained() {
    let output = parse(
        "set protocols bgp 65000 neighbor peer1 remote-as 1\n\
         set protocols bgp 65000 neighbor 10.0.0.2 remote-as 65001\n\
         set system host-name foo bar\n\
         set system time-zone UTC\n",
    )
    .unwrap();

    let kinds: Vec<_> = output.diagnostics.iter().map(|d| &d.kind).collect();
    assert_eq!(
        kinds,
        vec![
            &ParseErrorKind::UnexpectedToken {
                expected: "an IP address".into(),
                got: "peer1".into(),
            },
            &ParseErrorKind::UnexpectedToken {
                expected: "'end of line'".into(),
                got: "bar".into(),
            },
        ]
    );
    assert_eq!(output.configuration.lines.len(), 2);
}

#[test]
fn invalid_token_is_contained() {
    let output = parse(
        "set system host-name 'r1\nset system domain-name example.com\n",
    )
    .unwrap();
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].kind, ParseErrorKind::InvalidToken);
    assert!(matches!(
        output.configuration.lines[0].node,
        Statement::System(SystemStatement::DomainName(ref d)) if d.as_str() == "example.com"
    ));
}

#[test]
fn line_without_set() {
    let output =
        parse("delete system host-name\nset system host-name r1\n").unwrap();
    assert_eq!(
        output.diagnostics[0].kind,
        ParseErrorKind::UnexpectedToken {
            expected: "'set'".into(),
            got: "delete".into(),
        }
    );
    assert_eq!(output.configuration.lines.len(), 1);
}

#[test]
fn unterminated_last_line() {
    let input = "set system host-name r1\nset system time-zone UTC";
    let output = parse(input).unwrap();
    assert_eq!(output.configuration.lines.len(), 1);
    assert_eq!(output.diagnostics.len(), 1);
    let err = &output.diagnostics[0];
    assert_eq!(err.kind, ParseErrorKind::UnterminatedLine);
    assert_eq!(err.location, Span::new(0, input.len()..input.len()));
}

#[test]
fn unterminated_unmodeled_line() {
    let output = parse("set service ssh port 22").unwrap();
    assert!(output.configuration.lines.is_empty());
    assert_eq!(output.diagnostics[0].kind, ParseErrorKind::UnterminatedLine);
}

//------------ Blank lines and structure ------------------------------------

#[test]
fn blank_lines() {
    let lines = parse_clean(
        "\n\nset system host-name a\n\n\nset system time-zone UTC\n\n",
    );
    assert_eq!(lines.len(), 2);

    let lines = parse_clean("set system host-name a\r\n  \n");
    assert_eq!(lines.len(), 1);
}

#[test]
fn missing_set_line() {
    for input in ["", "\n\n", "delete system host-name\n"] {
        let err = parse(input).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingSetLine, "{input:?}");
        assert_eq!(err.location, Span::new(0, 0..input.len()));
        assert!(err.is_fatal());
        assert!(err.note.is_some());
    }
}

#[test]
fn failed_set_lines_still_count() {
    let output = parse("set foobar\n").unwrap();
    assert!(output.configuration.lines.is_empty());
    assert_eq!(output.diagnostics.len(), 1);
}

//------------ Properties ---------------------------------------------------

#[test]
fn parsing_is_idempotent() {
    let input = "set interfaces ethernet eth0 vif 10 address dhcp\n\
                 set foobar x\n\
                 set policy route-map RM rule 10 call (A && B)\n\
                 set nat source rule 10 outbound-interface eth0\n";

    let mut spans_a = Spans::default();
    let a = Parser::parse(0, &mut spans_a, input).unwrap();
    let mut spans_b = Spans::default();
    let b = Parser::parse(0, &mut spans_b, input).unwrap();

    assert_eq!(a, b);
    assert_eq!(a.configuration.lines.len(), 3);
    assert_eq!(spans_a.len(), spans_b.len());
}

#[test]
fn external_tokens() {
    let tokens = vec![
        (Ok(Token::Keyword(Keyword::Set)), 0..3),
        (Ok(Token::Keyword(Keyword::System)), 4..10),
        (Ok(Token::Keyword(Keyword::HostName)), 11..20),
        (Ok(Token::Variable("r1")), 21..23),
        (Ok(Token::Newline), 23..24),
    ];

    let mut spans = Spans::default();
    let output = Parser::parse_tokens(
        3,
        &mut spans,
        24,
        TokenStream::from_tokens(tokens),
    )
    .unwrap();

    assert!(output.diagnostics.is_empty());
    let line = &output.configuration.lines[0];
    assert_eq!(spans.get(line), Span::new(3, 0..23));
    assert!(matches!(
        line.node,
        Statement::System(SystemStatement::HostName(ref n)) if n.as_str() == "r1"
    ));
}
