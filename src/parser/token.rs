use core::ops::Range;
use std::{
    collections::VecDeque,
    fmt::Display,
    net::{Ipv4Addr, Ipv6Addr},
    ops::ControlFlow,
};

/// Generate the [`Keyword`] enum together with its text table
///
/// Every entry is `Variant = "text"`. The table is the only place where the
/// keyword vocabulary lives; both directions of the mapping are generated
/// from it.
macro_rules! keywords {
    ( $( $variant:ident = $text:literal ),* $(,)? ) => {
        /// A VyOS command keyword
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Keyword {
            $( $variant, )*
        }

        impl Keyword {
            /// All keywords, in table order
            pub const ALL: &'static [Keyword] = &[ $( Keyword::$variant, )* ];

            /// Look up the keyword spelled exactly as `text`
            pub fn from_text(text: &str) -> Option<Self> {
                match text {
                    $( $text => Some(Keyword::$variant), )*
                    _ => None,
                }
            }

            pub fn as_str(self) -> &'static str {
                match self {
                    $( Keyword::$variant => $text, )*
                }
            }
        }
    };
}

keywords! {
    // === Line structure ===
    Set = "set",

    // === Top-level stanzas ===
    Cluster = "cluster",
    Container = "container",
    Firewall = "firewall",
    HighAvailability = "high-availability",
    Interfaces = "interfaces",
    LoadBalancing = "load-balancing",
    Nat = "nat",
    Pki = "pki",
    Policy = "policy",
    Protocols = "protocols",
    Qos = "qos",
    Service = "service",
    System = "system",
    TrafficPolicy = "traffic-policy",
    Vpn = "vpn",
    Vrf = "vrf",
    ZonePolicy = "zone-policy",

    // === Shared ===
    Action = "action",
    Address = "address",
    Any = "any",
    Description = "description",
    Disable = "disable",
    Distance = "distance",
    Enable = "enable",
    Interface = "interface",
    Ip = "ip",
    Ipv6 = "ipv6",
    Lifetime = "lifetime",
    Log = "log",
    Match = "match",
    Mode = "mode",
    Name = "name",
    Parameters = "parameters",
    Peer = "peer",
    Prefix = "prefix",
    Rule = "rule",

    // === Interfaces ===
    Bonding = "bonding",
    Bridge = "bridge",
    Dummy = "dummy",
    Ethernet = "ethernet",
    Input = "input",
    L2tpv3 = "l2tpv3",
    Loopback = "loopback",
    Openvpn = "openvpn",
    PseudoEthernet = "pseudo-ethernet",
    Tunnel = "tunnel",
    Vti = "vti",
    Vxlan = "vxlan",
    Wireless = "wireless",
    Wirelessmodem = "wirelessmodem",
    BondGroup = "bond-group",
    Dhcp = "dhcp",
    Dhcpv6 = "dhcpv6",
    DhcpOptions = "dhcp-options",
    Dhcpv6Options = "dhcpv6-options",
    DisableFlowControl = "disable-flow-control",
    DisableLinkDetect = "disable-link-detect",
    Duplex = "duplex",
    Encapsulation = "encapsulation",
    HwId = "hw-id",
    LocalIp = "local-ip",
    Mac = "mac",
    Member = "member",
    Mirror = "mirror",
    Mtu = "mtu",
    Multicast = "multicast",
    Offload = "offload",
    Priority = "priority",
    Redirect = "redirect",
    RemoteIp = "remote-ip",
    RingBuffer = "ring-buffer",
    SmpAffinity = "smp-affinity",
    SourceAddress = "source-address",
    SourceInterface = "source-interface",
    Speed = "speed",
    Stp = "stp",
    Vif = "vif",
    VifC = "vif-c",
    VifS = "vif-s",
    Vni = "vni",

    // === System ===
    ConfigManagement = "config-management",
    Console = "console",
    Conntrack = "conntrack",
    DefaultAddressSelection = "default-address-selection",
    DomainName = "domain-name",
    FlowAccounting = "flow-accounting",
    GatewayAddress = "gateway-address",
    HostName = "host-name",
    Login = "login",
    NameServer = "name-server",
    Ntp = "ntp",
    Options = "options",
    Package = "package",
    StaticHostMapping = "static-host-mapping",
    Syslog = "syslog",
    TaskScheduler = "task-scheduler",
    TimeZone = "time-zone",

    // === Protocols ===
    Bfd = "bfd",
    Bgp = "bgp",
    IgmpProxy = "igmp-proxy",
    Isis = "isis",
    Mpls = "mpls",
    Ospf = "ospf",
    Ospfv3 = "ospfv3",
    Pim = "pim",
    Rip = "rip",
    Ripng = "ripng",
    Rpki = "rpki",
    Static = "static",

    // === BGP ===
    AddressFamily = "address-family",
    AggregateAddress = "aggregate-address",
    AllowasIn = "allowas-in",
    Capability = "capability",
    Connected = "connected",
    DefaultOriginate = "default-originate",
    DistributeList = "distribute-list",
    EbgpMultihop = "ebgp-multihop",
    Export = "export",
    External = "external",
    FilterList = "filter-list",
    Import = "import",
    Internal = "internal",
    Ipv4Unicast = "ipv4-unicast",
    Ipv6Unicast = "ipv6-unicast",
    Kernel = "kernel",
    Label = "label",
    Listen = "listen",
    MaximumPaths = "maximum-paths",
    MaximumPrefix = "maximum-prefix",
    Neighbor = "neighbor",
    Network = "network",
    NexthopSelf = "nexthop-self",
    Passive = "passive",
    Password = "password",
    PeerGroup = "peer-group",
    Rd = "rd",
    Redistribute = "redistribute",
    RemoteAs = "remote-as",
    RemovePrivateAs = "remove-private-as",
    RouteReflectorClient = "route-reflector-client",
    RouteTarget = "route-target",
    RouterId = "router-id",
    Shutdown = "shutdown",
    SoftReconfiguration = "soft-reconfiguration",
    SystemAs = "system-as",
    Timers = "timers",
    UpdateSource = "update-source",

    // === Static routes ===
    Blackhole = "blackhole",
    DhcpInterface = "dhcp-interface",
    InterfaceRoute = "interface-route",
    NextHop = "next-hop",
    Route = "route",
    Route6 = "route6",
    Table = "table",

    // === Policy ===
    AccessList = "access-list",
    AccessList6 = "access-list6",
    Additive = "additive",
    AsPath = "as-path",
    AsPathList = "as-path-list",
    AsPathPrepend = "as-path-prepend",
    Call = "call",
    Community = "community",
    CommunityList = "community-list",
    Continue = "continue",
    Deny = "deny",
    Egp = "egp",
    ExtcommunityList = "extcommunity-list",
    ExtcommunityRt = "extcommunity-rt",
    ExtcommunitySoo = "extcommunity-soo",
    Ge = "ge",
    Igp = "igp",
    Incomplete = "incomplete",
    Internet = "internet",
    IpNextHop = "ip-next-hop",
    LargeCommunity = "large-community",
    LargeCommunityList = "large-community-list",
    Le = "le",
    LocalAs = "local-as",
    LocalPreference = "local-preference",
    LocalRoute = "local-route",
    Metric = "metric",
    NoAdvertise = "no-advertise",
    NoExport = "no-export",
    NoPeer = "no-peer",
    OnMatch = "on-match",
    Origin = "origin",
    Permit = "permit",
    PrefixList = "prefix-list",
    PrefixList6 = "prefix-list6",
    RouteMap = "route-map",
    RouteSource = "route-source",
    Tag = "tag",
    Weight = "weight",

    // === VPN ===
    Authentication = "authentication",
    AutoUpdate = "auto-update",
    Bind = "bind",
    CloseAction = "close-action",
    Compression = "compression",
    ConnectionType = "connection-type",
    DeadPeerDetection = "dead-peer-detection",
    DefaultEspGroup = "default-esp-group",
    DhGroup = "dh-group",
    DisableUniqreqids = "disable-uniqreqids",
    Encryption = "encryption",
    EspGroup = "esp-group",
    Hash = "hash",
    Id = "id",
    IkeGroup = "ike-group",
    Ikev1 = "ikev1",
    Ikev2 = "ikev2",
    Ikev2Reauth = "ikev2-reauth",
    Initiate = "initiate",
    Ipsec = "ipsec",
    IpsecInterfaces = "ipsec-interfaces",
    KeyExchange = "key-exchange",
    L2tp = "l2tp",
    LocalAddress = "local-address",
    Logging = "logging",
    Mobike = "mobike",
    NatNetworks = "nat-networks",
    NatTraversal = "nat-traversal",
    Openconnect = "openconnect",
    Pfs = "pfs",
    Pptp = "pptp",
    PreSharedSecret = "pre-shared-secret",
    Proposal = "proposal",
    RemoteId = "remote-id",
    Respond = "respond",
    Rsa = "rsa",
    RsaKeyName = "rsa-key-name",
    SiteToSite = "site-to-site",
    Sstp = "sstp",
    Transport = "transport",
    X509 = "x509",

    // === Cryptographic vocabularies ===
    Aes128 = "aes128",
    Aes128gcm128 = "aes128gcm128",
    Aes256 = "aes256",
    Aes256gcm128 = "aes256gcm128",
    Chacha20poly1305 = "chacha20poly1305",
    DhGroup1 = "dh-group1",
    DhGroup2 = "dh-group2",
    DhGroup5 = "dh-group5",
    DhGroup14 = "dh-group14",
    DhGroup15 = "dh-group15",
    DhGroup16 = "dh-group16",
    DhGroup17 = "dh-group17",
    DhGroup18 = "dh-group18",
    DhGroup19 = "dh-group19",
    DhGroup20 = "dh-group20",
    DhGroup21 = "dh-group21",
    DhGroup22 = "dh-group22",
    DhGroup23 = "dh-group23",
    DhGroup24 = "dh-group24",
    DhGroup25 = "dh-group25",
    DhGroup26 = "dh-group26",
    DhGroup31 = "dh-group31",
    DhGroup32 = "dh-group32",
    Md5 = "md5",
    Sha1 = "sha1",
    Sha256 = "sha256",
    Sha384 = "sha384",
    Sha512 = "sha512",
    ThreeDes = "3des",

    // === Firewall ===
    Accept = "accept",
    AllPing = "all-ping",
    BroadcastPing = "broadcast-ping",
    Code = "code",
    ConfigTrap = "config-trap",
    DefaultAction = "default-action",
    Destination = "destination",
    Drop = "drop",
    EnableDefaultLog = "enable-default-log",
    Fragment = "fragment",
    Group = "group",
    Icmp = "icmp",
    Ipv6Name = "ipv6-name",
    Ipv6ReceiveRedirects = "ipv6-receive-redirects",
    Ipv6SrcRoute = "ipv6-src-route",
    IpSrcRoute = "ip-src-route",
    Limit = "limit",
    LogMartians = "log-martians",
    Port = "port",
    Protocol = "protocol",
    ReceiveRedirects = "receive-redirects",
    Recent = "recent",
    Reject = "reject",
    SendRedirects = "send-redirects",
    Source = "source",
    SourceValidation = "source-validation",
    State = "state",
    StatePolicy = "state-policy",
    SynCookies = "syn-cookies",
    Tcp = "tcp",
    Time = "time",
    TwaHazardsProtection = "twa-hazards-protection",
    Type = "type",
    TypeName = "type-name",

    // === IP protocols ===
    Ah = "ah",
    All = "all",
    Esp = "esp",
    Gre = "gre",
    Igmp = "igmp",
    Ipip = "ipip",
    Ipv6Icmp = "ipv6-icmp",
    Sctp = "sctp",
    TcpUdp = "tcp_udp",
    Udp = "udp",
    Vrrp = "vrrp",

    // === Named ports ===
    Domain = "domain",
    Ftp = "ftp",
    Http = "http",
    Https = "https",
    Imap = "imap",
    Isakmp = "isakmp",
    Ldap = "ldap",
    Pop3 = "pop3",
    Smtp = "smtp",
    Snmp = "snmp",
    Ssh = "ssh",
    Telnet = "telnet",
    Tftp = "tftp",

    // === ICMP types ===
    DestinationUnreachable = "destination-unreachable",
    EchoReply = "echo-reply",
    EchoRequest = "echo-request",
    ParameterProblem = "parameter-problem",
    RouterAdvertisement = "router-advertisement",
    RouterSolicitation = "router-solicitation",
    SourceQuench = "source-quench",
    TimeExceeded = "time-exceeded",
    TimestampReply = "timestamp-reply",
    TimestampRequest = "timestamp-request",

    // === ICMP codes ===
    CommunicationProhibited = "communication-prohibited",
    FragmentationNeeded = "fragmentation-needed",
    HostProhibited = "host-prohibited",
    HostUnknown = "host-unknown",
    HostUnreachable = "host-unreachable",
    IpHeaderBad = "ip-header-bad",
    NetworkProhibited = "network-prohibited",
    NetworkUnknown = "network-unknown",
    NetworkUnreachable = "network-unreachable",
    PortUnreachable = "port-unreachable",
    ProtocolUnreachable = "protocol-unreachable",
    RequiredOptionMissing = "required-option-missing",
    SourceRouteFailed = "source-route-failed",
    TtlZeroDuringReassembly = "ttl-zero-during-reassembly",
    TtlZeroDuringTransit = "ttl-zero-during-transit",
}

impl Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token<'s> {
    Keyword(Keyword),
    Newline,

    // === Punctuation ===
    AmpAmp,
    PipePipe,
    RoundLeft,
    RoundRight,

    // === Literals ===
    Dec(&'s str),
    IpAddress(&'s str),
    IpPrefix(&'s str),
    Ipv6Address(&'s str),
    Ipv6Prefix(&'s str),
    Variable(&'s str),
    DescriptionText(&'s str),
}

impl<'s> Token<'s> {
    /// The text of the token, without surrounding quotes
    pub fn text(&self) -> &'s str {
        match self {
            Token::Keyword(k) => k.as_str(),
            Token::Newline => "\n",
            Token::AmpAmp => "&&",
            Token::PipePipe => "||",
            Token::RoundLeft => "(",
            Token::RoundRight => ")",
            Token::Dec(s)
            | Token::IpAddress(s)
            | Token::IpPrefix(s)
            | Token::Ipv6Address(s)
            | Token::Ipv6Prefix(s)
            | Token::Variable(s)
            | Token::DescriptionText(s) => s,
        }
    }
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Newline => write!(f, "end of line"),
            t => write!(f, "{}", t.text()),
        }
    }
}

/// A token as produced by a lexer: the token, or `Err(())` for input that
/// could not be lexed, together with its byte range.
pub type Lexed<'s> = (Result<Token<'s>, ()>, Range<usize>);

/// Lexer for flattened VyOS configuration text
///
/// The input is split into whitespace separated words. Quoted values form a
/// single token. The text following a `description` keyword is taken as one
/// [`Token::DescriptionText`] up to the end of the line.
pub struct Lexer<'a> {
    input: &'a str,
    original_length: usize,
    after_description: bool,
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Lexed<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace();

        if self.is_empty() {
            return None;
        }

        let item = match self.next_token() {
            ControlFlow::Break(item) => item,
            ControlFlow::Continue(()) => {
                // Nothing matched, skip one char and report it.
                let c = self.input.chars().next().map_or(1, char::len_utf8);
                let (_, span) = self.bump(c);
                (Err(()), span)
            }
        };

        self.after_description =
            matches!(item.0, Ok(Token::Keyword(Keyword::Description)));

        Some(item)
    }
}

impl<'s> Lexer<'s> {
    pub fn new(input: &'s str) -> Self {
        Self {
            input,
            original_length: input.len(),
            after_description: false,
        }
    }

    fn bump(&mut self, n: usize) -> (&'s str, Range<usize>) {
        let start = self.original_length - self.input.len();
        let (a, b) = self.input.split_at(n);
        self.input = b;
        let end = self.original_length - self.input.len();
        (a, start..end)
    }

    fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    fn next_token(&mut self) -> ControlFlow<Lexed<'s>> {
        self.newline()?;
        if self.after_description {
            self.description_text()?;
        }
        self.punctuation()?;
        self.quoted()?;
        self.word()?;

        ControlFlow::Continue(())
    }

    fn skip_whitespace(&mut self) {
        self.input = self
            .input
            .trim_start_matches(|c: char| c.is_whitespace() && c != '\n');
    }

    fn newline(&mut self) -> ControlFlow<Lexed<'s>> {
        if self.input.starts_with('\n') {
            let (_, span) = self.bump(1);
            return ControlFlow::Break((Ok(Token::Newline), span));
        }
        ControlFlow::Continue(())
    }

    fn description_text(&mut self) -> ControlFlow<Lexed<'s>> {
        let end = self.input.find('\n').unwrap_or(self.input.len());
        let text = self.input[..end].trim_end();
        if text.is_empty() {
            return ControlFlow::Continue(());
        }

        let len = text.len();
        let (text, span) = self.bump(len);
        let text = strip_quotes(text).unwrap_or(text);
        ControlFlow::Break((Ok(Token::DescriptionText(text)), span))
    }

    fn punctuation(&mut self) -> ControlFlow<Lexed<'s>> {
        let tok = if self.input.starts_with("&&") {
            (Token::AmpAmp, 2)
        } else if self.input.starts_with("||") {
            (Token::PipePipe, 2)
        } else if self.input.starts_with('(') {
            (Token::RoundLeft, 1)
        } else if self.input.starts_with(')') {
            (Token::RoundRight, 1)
        } else {
            return ControlFlow::Continue(());
        };

        let (_, span) = self.bump(tok.1);
        ControlFlow::Break((Ok(tok.0), span))
    }

    fn quoted(&mut self) -> ControlFlow<Lexed<'s>> {
        let Some(quote) = self.input.chars().next() else {
            return ControlFlow::Continue(());
        };
        if quote != '\'' && quote != '"' {
            return ControlFlow::Continue(());
        }

        let line_end = self.input.find('\n').unwrap_or(self.input.len());
        let Some(close) = self.input[1..line_end].find(quote) else {
            // An unterminated quote swallows the rest of the line
            let (_, span) = self.bump(line_end);
            return ControlFlow::Break((Err(()), span));
        };

        let (text, span) = self.bump(close + 2);
        let inner = &text[1..text.len() - 1];
        let tok = if inner.is_empty() || inner.contains(char::is_whitespace) {
            Token::Variable(inner)
        } else {
            classify_word(inner)
        };
        ControlFlow::Break((Ok(tok), span))
    }

    fn word(&mut self) -> ControlFlow<Lexed<'s>> {
        // Operators end a word even without surrounding spaces: `(A&&B)`
        let input = self.input;
        let end = input
            .char_indices()
            .find(|&(i, c)| {
                c.is_whitespace()
                    || c == '('
                    || c == ')'
                    || input[i..].starts_with("&&")
                    || input[i..].starts_with("||")
            })
            .map_or(input.len(), |(i, _)| i);

        if end == 0 {
            return ControlFlow::Continue(());
        }

        let (word, span) = self.bump(end);
        ControlFlow::Break((Ok(classify_word(word)), span))
    }
}

fn strip_quotes(text: &str) -> Option<&str> {
    let first = text.chars().next()?;
    if (first == '\'' || first == '"')
        && text.len() >= 2
        && text.ends_with(first)
    {
        Some(&text[1..text.len() - 1])
    } else {
        None
    }
}

/// Decide the kind of a single word
///
/// Keywords win over everything else, then numbers, then addresses and
/// prefixes. Anything else is a free-text variable.
pub fn classify_word(word: &str) -> Token<'_> {
    if let Some(keyword) = Keyword::from_text(word) {
        return Token::Keyword(keyword);
    }

    if !word.is_empty() && word.bytes().all(|b| b.is_ascii_digit()) {
        return Token::Dec(word);
    }

    if word.parse::<Ipv4Addr>().is_ok() {
        return Token::IpAddress(word);
    }

    if let Some((addr, len)) = word.split_once('/') {
        if addr.parse::<Ipv4Addr>().is_ok() && is_prefix_length(len, 32) {
            return Token::IpPrefix(word);
        }
        if addr.parse::<Ipv6Addr>().is_ok() && is_prefix_length(len, 128) {
            return Token::Ipv6Prefix(word);
        }
    }

    if word.contains(':') && word.parse::<Ipv6Addr>().is_ok() {
        return Token::Ipv6Address(word);
    }

    Token::Variable(word)
}

fn is_prefix_length(s: &str, max: u8) -> bool {
    !s.is_empty()
        && s.len() <= 3
        && s.bytes().all(|b| b.is_ascii_digit())
        && s.parse::<u8>().is_ok_and(|len| len <= max)
}

/// Buffered cursor over a stream of lexed tokens
///
/// The cursor only moves forward. Any number of tokens can be inspected
/// with [`TokenStream::peek_nth`] before committing, but the grammar never
/// looks further than two tokens ahead.
pub struct TokenStream<'s> {
    source: Box<dyn Iterator<Item = Lexed<'s>> + 's>,
    buffer: VecDeque<Lexed<'s>>,
}

impl<'s> TokenStream<'s> {
    /// Lex `input` with the built-in [`Lexer`]
    pub fn new(input: &'s str) -> Self {
        Self::from_tokens(Lexer::new(input))
    }

    /// Wrap tokens produced by some other lexer
    pub fn from_tokens<I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = Lexed<'s>>,
        I::IntoIter: 's,
    {
        Self {
            source: Box::new(tokens.into_iter()),
            buffer: VecDeque::new(),
        }
    }

    /// Look at the token `k` positions ahead without consuming anything
    pub fn peek_nth(&mut self, k: usize) -> Option<&Lexed<'s>> {
        while self.buffer.len() <= k {
            let next = self.source.next()?;
            self.buffer.push_back(next);
        }
        self.buffer.get(k)
    }

    /// Consume and return the next token
    pub fn advance(&mut self) -> Option<Lexed<'s>> {
        self.buffer.pop_front().or_else(|| self.source.next())
    }
}
