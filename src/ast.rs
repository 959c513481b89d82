//! Syntax tree of a flattened VyOS configuration
//!
//! Every `set` line becomes one [`Statement`]. The tree mirrors the grammar:
//! each stanza is a struct holding the literals captured on the way down and
//! a `*Tail` enum selecting the production that finished the line. Stanzas
//! that are accepted but not modeled end in a [`CatchAll`].
//!
//! Nothing is merged here. Two lines configuring the same interface are two
//! separate statements, in source order.

use std::{
    fmt,
    net::{IpAddr, Ipv4Addr},
};

use inetnum::{
    addr::{Prefix, PrefixError},
    asn::Asn,
};

use crate::parser::{meta::Meta, token::Keyword};

/// The root of the tree: one statement per successfully parsed line
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Configuration {
    pub lines: Vec<Meta<Statement>>,
}

//------------ Literals -----------------------------------------------------

/// A free-text name: interface names, list names, secrets, ...
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(String);

impl Identifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An IP address literal
///
/// `text` is the token as written. Comparing against an [`IpAddr`] uses the
/// parsed value, so `2001:DB8::1` equals `2001:db8::1`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IpAddress {
    pub text: String,
    pub addr: IpAddr,
}

impl std::ops::Deref for IpAddress {
    type Target = IpAddr;

    fn deref(&self) -> &Self::Target {
        &self.addr
    }
}

impl PartialEq<IpAddr> for IpAddress {
    fn eq(&self, other: &IpAddr) -> bool {
        self.addr == *other
    }
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// An address with a prefix length, as written in the configuration
///
/// Host bits may be set: `10.0.0.1/24` is an interface address, not a
/// network. Use [`IpPrefix::network`] to get a proper prefix.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IpPrefix {
    pub text: String,
    pub addr: IpAddr,
    pub len: u8,
}

impl IpPrefix {
    /// Interpret this literal as a network prefix
    pub fn network(&self) -> Result<Prefix, PrefixError> {
        Prefix::new(self.addr, self.len)
    }
}

impl fmt::Display for IpPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Convert a parsed number into an AS number, if it fits in 32 bits
pub fn to_asn(n: u64) -> Option<Asn> {
    u32::try_from(n).ok().map(Asn::from_u32)
}

/// The text of a `description` line, if any was given
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Description(pub Option<String>);

/// A stanza that is recognized but not modeled
///
/// `keyword` is the keyword that selected the catch-all, `discarded` the
/// number of tokens skipped after it up to the end of the line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatchAll {
    pub keyword: Meta<Keyword>,
    pub discarded: usize,
}

//------------ Vocabularies -------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineAction {
    Permit,
    Deny,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterfaceType {
    Bonding,
    Bridge,
    Dummy,
    Ethernet,
    Input,
    L2tpv3,
    Loopback,
    Openvpn,
    PseudoEthernet,
    Tunnel,
    Vti,
    Vxlan,
    Wireless,
    Wirelessmodem,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncryptionAlgorithm {
    ThreeDes,
    Aes128,
    Aes256,
    Aes128Gcm128,
    Aes256Gcm128,
    Chacha20Poly1305,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoutingProtocol {
    Connected,
    Kernel,
    Ospf,
    Rip,
    Static,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OriginType {
    Igp,
    Egp,
    Incomplete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WellKnownCommunity {
    Internet,
    LocalAs,
    NoAdvertise,
    NoExport,
    NoPeer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StandardCommunity {
    /// `asn:value`
    Literal { high: u64, low: u64 },
    Named(WellKnownCommunity),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtendedCommunityType {
    RouteTarget,
    SiteOfOrigin,
}

/// The administrator field of an extended community
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Administrator {
    /// A four octet AS number, written with an `L` suffix
    As(u64),
    /// An AS number in `high.low` notation
    DottedAs(u64, u64),
    Dec(u64),
    Ip(Ipv4Addr),
}

/// `type:administrator:value`
///
/// The type is optional in the configuration, in that case it is implied
/// by the statement (`extcommunity-rt` or `extcommunity-soo`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtendedCommunity {
    pub ty: Option<ExtendedCommunityType>,
    pub administrator: Administrator,
    pub value: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IpProtocol {
    All,
    Ah,
    Esp,
    Gre,
    Icmp,
    Igmp,
    Ipip,
    Ipv6Icmp,
    Ospf,
    Pim,
    Sctp,
    Tcp,
    TcpUdp,
    Udp,
    Vrrp,
    Number(u64),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NamedPort {
    Bgp,
    Domain,
    Ftp,
    Http,
    Https,
    Imap,
    Isakmp,
    Ldap,
    Ntp,
    Pop3,
    Smtp,
    Snmp,
    Ssh,
    Syslog,
    Telnet,
    Tftp,
}

impl NamedPort {
    /// The well-known port number of the service
    pub fn number(self) -> u16 {
        match self {
            Self::Ftp => 21,
            Self::Ssh => 22,
            Self::Telnet => 23,
            Self::Smtp => 25,
            Self::Domain => 53,
            Self::Tftp => 69,
            Self::Http => 80,
            Self::Pop3 => 110,
            Self::Ntp => 123,
            Self::Imap => 143,
            Self::Snmp => 161,
            Self::Bgp => 179,
            Self::Ldap => 389,
            Self::Https => 443,
            Self::Isakmp => 500,
            Self::Syslog => 514,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Port {
    Named(NamedPort),
    Number(u64),
}

/// `low` or `low-high`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubRange {
    pub low: Port,
    pub high: Option<Port>,
}

/// A comma separated list of sub ranges
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Range(pub Vec<SubRange>);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IcmpType {
    Any,
    DestinationUnreachable,
    EchoReply,
    EchoRequest,
    ParameterProblem,
    Redirect,
    RouterAdvertisement,
    RouterSolicitation,
    SourceQuench,
    TimeExceeded,
    TimestampReply,
    TimestampRequest,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IcmpCode {
    CommunicationProhibited,
    FragmentationNeeded,
    HostProhibited,
    HostUnknown,
    HostUnreachable,
    IpHeaderBad,
    NetworkProhibited,
    NetworkUnknown,
    NetworkUnreachable,
    PortUnreachable,
    ProtocolUnreachable,
    RequiredOptionMissing,
    SourceRouteFailed,
    TtlZeroDuringReassembly,
    TtlZeroDuringTransit,
}

/// A policy reference combining named policies
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PolicyExpression {
    /// `( a && b && ... )`
    Conjunction(Vec<Meta<PolicyExpression>>),
    /// `( a || b || ... )`
    Disjunction(Vec<Meta<PolicyExpression>>),
    /// `( a )`
    Nested(Box<Meta<PolicyExpression>>),
    Name(Meta<Identifier>),
}

//------------ Statements ---------------------------------------------------

/// One `set` line
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Statement {
    Firewall(FirewallStatement),
    Interfaces(InterfaceDeclaration),
    Policy(PolicyStatement),
    Protocols(ProtocolsStatement),
    System(SystemStatement),
    Vpn(VpnStatement),
    Null(CatchAll),
}

impl Statement {
    /// The keyword following `set`
    pub fn stanza(&self) -> Keyword {
        match self {
            Self::Firewall(_) => Keyword::Firewall,
            Self::Interfaces(_) => Keyword::Interfaces,
            Self::Policy(_) => Keyword::Policy,
            Self::Protocols(_) => Keyword::Protocols,
            Self::System(_) => Keyword::System,
            Self::Vpn(_) => Keyword::Vpn,
            Self::Null(catch_all) => *catch_all.keyword,
        }
    }

    /// Whether the line was accepted without being modeled
    pub fn is_catch_all(&self) -> bool {
        matches!(self, Self::Null(_))
    }
}

//------------ Interfaces ---------------------------------------------------

/// `interfaces <type> <name> [...]`
///
/// A line without a tail only declares that the interface exists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterfaceDeclaration {
    pub ty: Meta<InterfaceType>,
    pub name: Meta<Identifier>,
    pub tail: Option<InterfaceTail>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InterfaceTail {
    Address(Meta<InterfaceAddress>),
    Description(Meta<Description>),
    /// `vif <vlan> ...`, a tagged sub-interface
    Vif {
        vlan: Meta<u64>,
        tail: Option<Box<InterfaceTail>>,
    },
    Null(CatchAll),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InterfaceAddress {
    Dhcp,
    Dhcpv6,
    Static(IpPrefix),
}

//------------ System -------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SystemStatement {
    DefaultAddressSelection,
    DomainName(Meta<Identifier>),
    HostName(Meta<Identifier>),
    NameServer(Meta<IpAddress>),
    TimeZone(Meta<Identifier>),
    Null(CatchAll),
}

//------------ Protocols ----------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProtocolsStatement {
    Bgp(BgpStatement),
    Static(StaticStatement),
    Null(CatchAll),
}

/// `protocols bgp [<asn>] ...`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BgpStatement {
    pub asn: Option<Meta<u64>>,
    pub tail: BgpTail,
}

impl BgpStatement {
    /// The local AS number given on the line itself
    pub fn local_asn(&self) -> Option<Asn> {
        match &self.tail {
            BgpTail::SystemAs(asn) => to_asn(**asn),
            _ => self.asn.as_ref().and_then(|asn| to_asn(**asn)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BgpTail {
    Neighbor(BgpNeighbor),
    Network(Meta<IpPrefix>),
    Redistribute(Redistribute),
    RouterId(Meta<IpAddress>),
    SystemAs(Meta<u64>),
    Null(CatchAll),
}

/// `neighbor <ip> ...`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BgpNeighbor {
    pub address: Meta<IpAddress>,
    pub tail: BgpNeighborTail,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BgpNeighborTail {
    Description(Meta<Description>),
    NextHopSelf,
    RemoteAs(Meta<RemoteAs>),
    RouteMapExport(Meta<Identifier>),
    RouteMapImport(Meta<Identifier>),
    Null(CatchAll),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoteAs {
    Number(u64),
    External,
    Internal,
}

impl RemoteAs {
    pub fn asn(&self) -> Option<Asn> {
        match self {
            Self::Number(n) => to_asn(*n),
            _ => None,
        }
    }
}

/// `redistribute <protocol> [metric <n> | route-map <name>]`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Redistribute {
    pub protocol: Meta<RoutingProtocol>,
    pub metric: Option<Meta<u64>>,
    pub route_map: Option<Meta<Identifier>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StaticStatement {
    Route(StaticRoute),
    Null(CatchAll),
}

/// `route <prefix> ...`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticRoute {
    pub prefix: Meta<IpPrefix>,
    pub tail: StaticRouteTail,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StaticRouteTail {
    /// `blackhole`, anything after it is discarded
    Blackhole(CatchAll),
    NextHop {
        address: Meta<IpAddress>,
        tail: Option<NextHopTail>,
    },
    Null(CatchAll),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NextHopTail {
    Distance(Meta<u64>),
    Null(CatchAll),
}

//------------ Policy -------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PolicyStatement {
    PrefixList(PrefixList),
    RouteMap(RouteMap),
    Null(CatchAll),
}

/// `prefix-list <name> ...`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrefixList {
    pub name: Meta<Identifier>,
    pub tail: PrefixListTail,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PrefixListTail {
    Description(Meta<Description>),
    Rule(PrefixListRule),
}

/// `rule <n> ...` inside a prefix list
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrefixListRule {
    pub number: Meta<u64>,
    pub tail: PrefixListRuleTail,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PrefixListRuleTail {
    Action(Meta<LineAction>),
    Description(Meta<Description>),
    Ge(Meta<u64>),
    Le(Meta<u64>),
    Prefix(Meta<IpPrefix>),
}

/// `route-map <name> ...`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteMap {
    pub name: Meta<Identifier>,
    pub tail: RouteMapTail,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteMapTail {
    Description(Meta<Description>),
    Rule(RouteMapRule),
}

/// `rule <n> ...` inside a route map
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteMapRule {
    pub number: Meta<u64>,
    pub tail: RouteMapRuleTail,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteMapRuleTail {
    Action(Meta<LineAction>),
    Call(Meta<PolicyExpression>),
    Continue(Meta<u64>),
    Description(Meta<Description>),
    Match(RouteMapMatch),
    Set(RouteMapSet),
    Null(CatchAll),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteMapMatch {
    /// `ip address prefix-list <name>`
    IpAddressPrefixList(Meta<Identifier>),
    Null(CatchAll),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteMapSet {
    Community {
        communities: Vec<Meta<StandardCommunity>>,
        additive: bool,
    },
    ExtCommunityRt(Meta<ExtendedCommunity>),
    ExtCommunitySoo(Meta<ExtendedCommunity>),
    IpNextHop(Meta<IpAddress>),
    LocalPreference(Meta<u64>),
    Metric(Meta<u64>),
    Origin(Meta<OriginType>),
    Null(CatchAll),
}

//------------ VPN ----------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VpnStatement {
    Ipsec(IpsecStatement),
    Null(CatchAll),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IpsecStatement {
    EspGroup(EspGroup),
    IkeGroup(IkeGroup),
    /// `ipsec-interfaces interface <name>`
    IpsecInterface(Meta<Identifier>),
    SiteToSite(SiteToSitePeer),
    Null(CatchAll),
}

/// `esp-group <name> ...`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EspGroup {
    pub name: Meta<Identifier>,
    pub tail: EspGroupTail,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EspGroupTail {
    Compression(Meta<bool>),
    Lifetime(Meta<u64>),
    Mode(Meta<EspMode>),
    Pfs(Meta<PfsSetting>),
    Proposal(EspProposal),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EspMode {
    Transport,
    Tunnel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PfsSetting {
    /// Use the Diffie-Hellman group of the IKE group
    Enable,
    Disable,
    DhGroup(u8),
}

/// `proposal <n> ...` inside an ESP group
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EspProposal {
    pub number: Meta<u64>,
    pub tail: EspProposalTail,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EspProposalTail {
    Encryption(Meta<EncryptionAlgorithm>),
    Hash(Meta<HashAlgorithm>),
}

/// `ike-group <name> ...`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IkeGroup {
    pub name: Meta<Identifier>,
    pub tail: IkeGroupTail,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IkeGroupTail {
    KeyExchange(Meta<IkeVersion>),
    Lifetime(Meta<u64>),
    Proposal(IkeProposal),
    Null(CatchAll),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IkeVersion {
    V1,
    V2,
}

/// `proposal <n> ...` inside an IKE group
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IkeProposal {
    pub number: Meta<u64>,
    pub tail: IkeProposalTail,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IkeProposalTail {
    DhGroup(Meta<u64>),
    Encryption(Meta<EncryptionAlgorithm>),
    Hash(Meta<HashAlgorithm>),
}

/// `site-to-site peer <ip> ...`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteToSitePeer {
    pub peer: Meta<IpAddress>,
    pub tail: SiteToSiteTail,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SiteToSiteTail {
    Authentication(Authentication),
    ConnectionType(Meta<ConnectionType>),
    Description(Meta<Description>),
    IkeGroup(Meta<Identifier>),
    LocalAddress(Meta<IpAddress>),
    Vti(Vti),
    Null(CatchAll),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Authentication {
    Id(Meta<Identifier>),
    Mode(Meta<AuthenticationMode>),
    PreSharedSecret(Meta<Identifier>),
    RemoteId(Meta<Identifier>),
    Null(CatchAll),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthenticationMode {
    PreSharedSecret,
    Rsa,
    X509,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionType {
    Initiate,
    Respond,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Vti {
    Bind(Meta<Identifier>),
    EspGroup(Meta<Identifier>),
}

//------------ Firewall -----------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FirewallStatement {
    Name(FirewallRuleSet),
    Null(CatchAll),
}

/// `name <name> ...`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FirewallRuleSet {
    pub name: Meta<Identifier>,
    pub tail: FirewallRuleSetTail,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FirewallRuleSetTail {
    DefaultAction(Meta<FirewallAction>),
    Description(Meta<Description>),
    Rule(FirewallRule),
    Null(CatchAll),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FirewallAction {
    Accept,
    Drop,
    Reject,
}

/// `rule <n> ...` inside a firewall rule set
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FirewallRule {
    pub number: Meta<u64>,
    pub tail: FirewallRuleTail,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FirewallRuleTail {
    Action(Meta<FirewallAction>),
    Description(Meta<Description>),
    Destination(FirewallMatch),
    Icmp(IcmpMatch),
    Protocol(Meta<IpProtocol>),
    Source(FirewallMatch),
    Null(CatchAll),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FirewallMatch {
    Address(Meta<AddressMatch>),
    Port(Meta<Range>),
    Null(CatchAll),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddressMatch {
    Address(IpAddress),
    Prefix(IpPrefix),
    /// `!<address>` or `!<prefix>`: everything except the inner match
    Negated(Box<AddressMatch>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IcmpMatch {
    Code(Meta<u64>),
    Type(Meta<u64>),
    TypeName(Meta<IcmpTypeName>),
}

/// The names accepted by `icmp type-name`: types and codes alike
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IcmpTypeName {
    Type(IcmpType),
    Code(IcmpCode),
}
