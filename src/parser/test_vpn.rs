use std::net::IpAddr;

use crate::{
    ast::{
        Authentication, AuthenticationMode, ConnectionType,
        EncryptionAlgorithm, EspGroupTail, EspMode, EspProposalTail,
        HashAlgorithm, IkeGroupTail, IkeProposalTail, IkeVersion,
        IpsecStatement, PfsSetting, SiteToSitePeer, SiteToSiteTail, Vti,
        VpnStatement,
    },
    parser::Parser,
};

use super::{meta::Spans, token::Keyword, ParseErrorKind, ParseResult};

fn parse_vpn(s: &str) -> ParseResult<VpnStatement> {
    let mut spans = Spans::default();
    Parser::run_parser(Parser::vpn, 0, &mut spans, s)
}

fn ipsec(s: &str) -> IpsecStatement {
    match parse_vpn(s).unwrap() {
        VpnStatement::Ipsec(ipsec) => ipsec,
        other => panic!("expected IPsec, got {other:?}"),
    }
}

fn esp_group(s: &str) -> EspGroupTail {
    match ipsec(s) {
        IpsecStatement::EspGroup(group) => {
            assert_eq!(group.name.as_str(), "ESP-1");
            group.tail
        }
        other => panic!("expected an ESP group, got {other:?}"),
    }
}

fn ike_group(s: &str) -> IkeGroupTail {
    match ipsec(s) {
        IpsecStatement::IkeGroup(group) => {
            assert_eq!(group.name.as_str(), "IKE-1");
            group.tail
        }
        other => panic!("expected an IKE group, got {other:?}"),
    }
}

fn site_to_site(s: &str) -> SiteToSitePeer {
    match ipsec(s) {
        IpsecStatement::SiteToSite(peer) => peer,
        other => panic!("expected a site-to-site peer, got {other:?}"),
    }
}

//------------ ESP groups ---------------------------------------------------

#[test]
fn esp_group_proposals() {
    let EspGroupTail::Proposal(proposal) =
        esp_group("vpn ipsec esp-group ESP-1 proposal 1 encryption aes256")
    else {
        panic!("expected a proposal");
    };
    assert_eq!(*proposal.number, 1);
    assert!(matches!(
        proposal.tail,
        EspProposalTail::Encryption(e) if *e == EncryptionAlgorithm::Aes256
    ));

    let EspGroupTail::Proposal(proposal) =
        esp_group("vpn ipsec esp-group ESP-1 proposal 2 hash sha256")
    else {
        panic!("expected a proposal");
    };
    assert!(matches!(
        proposal.tail,
        EspProposalTail::Hash(h) if *h == HashAlgorithm::Sha256
    ));
}

#[test]
fn esp_group_settings() {
    assert!(matches!(
        esp_group("vpn ipsec esp-group ESP-1 compression disable"),
        EspGroupTail::Compression(c) if !*c
    ));
    assert!(matches!(
        esp_group("vpn ipsec esp-group ESP-1 lifetime 3600"),
        EspGroupTail::Lifetime(l) if *l == 3600
    ));
    assert!(matches!(
        esp_group("vpn ipsec esp-group ESP-1 mode tunnel"),
        EspGroupTail::Mode(m) if *m == EspMode::Tunnel
    ));
    assert!(matches!(
        esp_group("vpn ipsec esp-group ESP-1 pfs dh-group14"),
        EspGroupTail::Pfs(p) if *p == PfsSetting::DhGroup(14)
    ));
    assert!(matches!(
        esp_group("vpn ipsec esp-group ESP-1 pfs enable"),
        EspGroupTail::Pfs(p) if *p == PfsSetting::Enable
    ));
}

#[test]
fn esp_group_unknown_algorithm() {
    let err =
        parse_vpn("vpn ipsec esp-group ESP-1 proposal 1 encryption blowfish")
            .unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::UnexpectedToken {
            expected: "an encryption algorithm".into(),
            got: "blowfish".into(),
        }
    );
}

//------------ IKE groups ---------------------------------------------------

#[test]
fn ike_group_settings() {
    assert!(matches!(
        ike_group("vpn ipsec ike-group IKE-1 key-exchange ikev2"),
        IkeGroupTail::KeyExchange(v) if *v == IkeVersion::V2
    ));
    assert!(matches!(
        ike_group("vpn ipsec ike-group IKE-1 lifetime 28800"),
        IkeGroupTail::Lifetime(l) if *l == 28800
    ));

    let IkeGroupTail::Proposal(proposal) =
        ike_group("vpn ipsec ike-group IKE-1 proposal 1 dh-group 14")
    else {
        panic!("expected a proposal");
    };
    assert!(matches!(proposal.tail, IkeProposalTail::DhGroup(g) if *g == 14));

    let IkeGroupTail::Proposal(proposal) =
        ike_group("vpn ipsec ike-group IKE-1 proposal 1 hash sha1")
    else {
        panic!("expected a proposal");
    };
    assert!(matches!(
        proposal.tail,
        IkeProposalTail::Hash(h) if *h == HashAlgorithm::Sha1
    ));

    let IkeGroupTail::Proposal(proposal) =
        ike_group("vpn ipsec ike-group IKE-1 proposal 1 encryption 3des")
    else {
        panic!("expected a proposal");
    };
    assert!(matches!(
        proposal.tail,
        IkeProposalTail::Encryption(e) if *e == EncryptionAlgorithm::ThreeDes
    ));
}

#[test]
fn ike_group_unmodeled() {
    for (line, keyword) in [
        (
            "vpn ipsec ike-group IKE-1 dead-peer-detection action restart",
            Keyword::DeadPeerDetection,
        ),
        ("vpn ipsec ike-group IKE-1 ikev2-reauth no", Keyword::Ikev2Reauth),
        ("vpn ipsec ike-group IKE-1 close-action none", Keyword::CloseAction),
    ] {
        let IkeGroupTail::Null(catch_all) = ike_group(line) else {
            panic!("expected a catch-all for {line:?}");
        };
        assert_eq!(*catch_all.keyword, keyword);
    }
}

//------------ Site-to-site -------------------------------------------------

#[test]
fn pre_shared_secret() {
    let peer = site_to_site(
        "vpn ipsec site-to-site peer 1.2.3.4 authentication pre-shared-secret abc",
    );
    assert_eq!(*peer.peer, "1.2.3.4".parse::<IpAddr>().unwrap());
    let SiteToSiteTail::Authentication(Authentication::PreSharedSecret(secret)) =
        peer.tail
    else {
        panic!("expected a pre-shared secret");
    };
    assert_eq!(secret.as_str(), "abc");
}

#[test]
fn authentication_mode_is_decided_by_the_next_token() {
    let peer = site_to_site(
        "vpn ipsec site-to-site peer 1.2.3.4 authentication mode pre-shared-secret",
    );
    assert!(matches!(
        peer.tail,
        SiteToSiteTail::Authentication(Authentication::Mode(m))
            if *m == AuthenticationMode::PreSharedSecret
    ));

    let peer =
        site_to_site("vpn ipsec site-to-site peer 1.2.3.4 authentication id @left");
    assert!(matches!(
        peer.tail,
        SiteToSiteTail::Authentication(Authentication::Id(id)) if id.as_str() == "@left"
    ));

    let peer = site_to_site(
        "vpn ipsec site-to-site peer 1.2.3.4 authentication remote-id @right",
    );
    assert!(matches!(
        peer.tail,
        SiteToSiteTail::Authentication(Authentication::RemoteId(_))
    ));

    let peer = site_to_site(
        "vpn ipsec site-to-site peer 1.2.3.4 authentication rsa-key-name KEY",
    );
    assert!(matches!(
        peer.tail,
        SiteToSiteTail::Authentication(Authentication::Null(_))
    ));
}

#[test]
fn peer_properties() {
    assert!(matches!(
        site_to_site("vpn ipsec site-to-site peer 1.2.3.4 connection-type initiate").tail,
        SiteToSiteTail::ConnectionType(c) if *c == ConnectionType::Initiate
    ));
    assert!(matches!(
        site_to_site("vpn ipsec site-to-site peer 1.2.3.4 ike-group IKE-1").tail,
        SiteToSiteTail::IkeGroup(g) if g.as_str() == "IKE-1"
    ));
    assert!(matches!(
        site_to_site("vpn ipsec site-to-site peer 1.2.3.4 local-address 192.0.2.1").tail,
        SiteToSiteTail::LocalAddress(_)
    ));
    assert!(matches!(
        site_to_site("vpn ipsec site-to-site peer 1.2.3.4 description 'branch office'")
            .tail,
        SiteToSiteTail::Description(_)
    ));
    assert!(matches!(
        site_to_site("vpn ipsec site-to-site peer 1.2.3.4 vti bind vti0").tail,
        SiteToSiteTail::Vti(Vti::Bind(b)) if b.as_str() == "vti0"
    ));
    assert!(matches!(
        site_to_site("vpn ipsec site-to-site peer 1.2.3.4 vti esp-group ESP-1").tail,
        SiteToSiteTail::Vti(Vti::EspGroup(_))
    ));
    assert!(matches!(
        site_to_site("vpn ipsec site-to-site peer 1.2.3.4 ikev2-reauth inherit").tail,
        SiteToSiteTail::Null(_)
    ));
    assert!(matches!(
        site_to_site("vpn ipsec site-to-site peer 1.2.3.4 tunnel 1 local prefix 10.0.0.0/24")
            .tail,
        SiteToSiteTail::Null(_)
    ));
}

#[test]
fn peer_must_be_an_address() {
    let err = parse_vpn("vpn ipsec site-to-site peer any authentication id x")
        .unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::UnexpectedToken { .. }));
}

#[test]
fn unknown_authentication_property() {
    let err = parse_vpn(
        "vpn ipsec site-to-site peer 1.2.3.4 authentication secret abc",
    )
    .unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::NoViableAlternative {
            expected: "an authentication property".into(),
            got: "secret".into(),
        }
    );
}

//------------ Other --------------------------------------------------------

#[test]
fn ipsec_interfaces() {
    assert!(matches!(
        ipsec("vpn ipsec ipsec-interfaces interface eth0"),
        IpsecStatement::IpsecInterface(i) if i.as_str() == "eth0"
    ));
}

#[test]
fn unmodeled_vpn() {
    assert!(matches!(
        ipsec("vpn ipsec nat-traversal enable"),
        IpsecStatement::Null(_)
    ));
    assert!(matches!(
        parse_vpn("vpn l2tp remote-access outside-address 192.0.2.1").unwrap(),
        VpnStatement::Null(_)
    ));
}
