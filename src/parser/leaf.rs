//! Leaf rules
//!
//! These rules consume a single token. Literal payloads are checked for
//! their shape only. Domain checks (is this AS number in range, does this
//! prefix list exist) are left to whoever consumes the tree.

use std::net::{IpAddr, Ipv4Addr};

use crate::ast::{
    AddressMatch, Administrator, Description, EncryptionAlgorithm,
    ExtendedCommunity, ExtendedCommunityType, FirewallAction, HashAlgorithm,
    IcmpCode, IcmpType, IcmpTypeName, Identifier, InterfaceType, IpAddress,
    IpPrefix, IpProtocol, LineAction, NamedPort, OriginType, PolicyExpression,
    Port, Range, RoutingProtocol, StandardCommunity, SubRange,
    WellKnownCommunity,
};

use super::{
    error::ParseError,
    meta::Meta,
    token::{classify_word, Keyword, Token},
    ParseResult, Parser,
};

/// # Literals
impl<'source> Parser<'source, '_> {
    /// Accept one keyword out of a fixed set
    ///
    /// `choose` maps the accepted keywords to their value. The token is only
    /// consumed if it is accepted.
    pub(super) fn keyword_choice<T>(
        &mut self,
        expected: &str,
        choose: impl FnOnce(Keyword) -> Option<T>,
    ) -> ParseResult<Meta<T>> {
        let (token, span) = self.lookahead()?;
        let Some(x) = (match token {
            Token::Keyword(keyword) => choose(keyword),
            _ => None,
        }) else {
            return self.unexpected(expected);
        };
        self.advance();
        Ok(self.add_span(span, x))
    }

    /// Parse a free-text name
    ///
    /// Names are not restricted to `VARIABLE` tokens. VyOS allows a name to
    /// be spelled like a keyword or a number, so any token but the line
    /// terminator is accepted.
    pub(super) fn variable(&mut self) -> ParseResult<Meta<Identifier>> {
        let (token, span) = self.lookahead()?;
        if token == Token::Newline {
            return self.unexpected("a name");
        }
        self.advance();
        Ok(self.add_span(span, Identifier::from(token.text())))
    }

    /// Parse an unsigned decimal number
    pub(super) fn dec(&mut self) -> ParseResult<Meta<u64>> {
        let (token, span) = self.lookahead()?;
        let Token::Dec(text) = token else {
            return self.unexpected("a number");
        };
        let value = text.parse::<u64>().map_err(|e| {
            ParseError::invalid_literal("decimal number", text, e, span)
        })?;
        self.advance();
        Ok(self.add_span(span, value))
    }

    /// Parse an IPv4 or IPv6 address
    pub(super) fn ip_address(&mut self) -> ParseResult<Meta<IpAddress>> {
        let (token, span) = self.lookahead()?;
        let (Token::IpAddress(text) | Token::Ipv6Address(text)) = token else {
            return self.unexpected("an IP address");
        };
        let addr = parse_address(text).map_err(|e| {
            ParseError::invalid_literal("IP address", text, e, span)
        })?;
        self.advance();
        Ok(self.add_span(span, addr))
    }

    /// Parse an IPv4 or IPv6 prefix
    pub(super) fn ip_prefix(&mut self) -> ParseResult<Meta<IpPrefix>> {
        let (token, span) = self.lookahead()?;
        let (Token::IpPrefix(text) | Token::Ipv6Prefix(text)) = token else {
            return self.unexpected("an IP prefix");
        };
        let prefix = parse_prefix(text).map_err(|e| {
            ParseError::invalid_literal("IP prefix", text, e, span)
        })?;
        self.advance();
        Ok(self.add_span(span, prefix))
    }

    /// Parse either an address or a prefix
    ///
    /// ```ebnf
    /// AddressMatch ::= IP_ADDRESS | IP_PREFIX | '!' (IP_ADDRESS | IP_PREFIX)
    /// ```
    ///
    /// The lexer keeps `!10.0.0.0/8` together as one word, so negation is
    /// recognized here.
    pub(super) fn address_match(&mut self) -> ParseResult<Meta<AddressMatch>> {
        match self.peek() {
            Some(Token::IpAddress(_) | Token::Ipv6Address(_)) => {
                let addr = self.ip_address()?;
                let span = self.spans.get(&addr);
                Ok(self.add_span(span, AddressMatch::Address(addr.node)))
            }
            Some(Token::IpPrefix(_) | Token::Ipv6Prefix(_)) => {
                let prefix = self.ip_prefix()?;
                let span = self.spans.get(&prefix);
                Ok(self.add_span(span, AddressMatch::Prefix(prefix.node)))
            }
            Some(Token::Variable(text)) if text.starts_with('!') => {
                let (_, span) = self.lookahead()?;
                let inner = &text[1..];
                let matched = match classify_word(inner) {
                    Token::IpAddress(_) | Token::Ipv6Address(_) => {
                        parse_address(inner).map(AddressMatch::Address)
                    }
                    Token::IpPrefix(_) | Token::Ipv6Prefix(_) => {
                        parse_prefix(inner).map(AddressMatch::Prefix)
                    }
                    _ => return self.unexpected("an IP address or prefix"),
                }
                .map_err(|e| {
                    ParseError::invalid_literal("address", text, e, span)
                })?;
                self.advance();
                let negated = AddressMatch::Negated(Box::new(matched));
                Ok(self.add_span(span, negated))
            }
            _ => self.unexpected("an IP address or prefix"),
        }
    }

    /// Parse a description
    ///
    /// ```ebnf
    /// Description ::= 'description' DESCRIPTION_TEXT?
    /// ```
    pub(super) fn description(&mut self) -> ParseResult<Meta<Description>> {
        let start = self.take_keyword(Keyword::Description)?;
        let text = match self.peek() {
            Some(Token::Newline) | None => None,
            Some(token) => {
                self.advance();
                Some(token.text().to_string())
            }
        };
        let span = self.span_from(start);
        Ok(self.add_span(span, Description(text)))
    }
}

/// # Vocabularies
impl Parser<'_, '_> {
    pub(super) fn line_action(&mut self) -> ParseResult<Meta<LineAction>> {
        self.keyword_choice("'permit' or 'deny'", |k| match k {
            Keyword::Permit => Some(LineAction::Permit),
            Keyword::Deny => Some(LineAction::Deny),
            _ => None,
        })
    }

    pub(super) fn interface_type(
        &mut self,
    ) -> ParseResult<Meta<InterfaceType>> {
        self.keyword_choice("an interface type", |k| {
            Some(match k {
                Keyword::Bonding => InterfaceType::Bonding,
                Keyword::Bridge => InterfaceType::Bridge,
                Keyword::Dummy => InterfaceType::Dummy,
                Keyword::Ethernet => InterfaceType::Ethernet,
                Keyword::Input => InterfaceType::Input,
                Keyword::L2tpv3 => InterfaceType::L2tpv3,
                Keyword::Loopback => InterfaceType::Loopback,
                Keyword::Openvpn => InterfaceType::Openvpn,
                Keyword::PseudoEthernet => InterfaceType::PseudoEthernet,
                Keyword::Tunnel => InterfaceType::Tunnel,
                Keyword::Vti => InterfaceType::Vti,
                Keyword::Vxlan => InterfaceType::Vxlan,
                Keyword::Wireless => InterfaceType::Wireless,
                Keyword::Wirelessmodem => InterfaceType::Wirelessmodem,
                _ => return None,
            })
        })
    }

    pub(super) fn hash_algorithm(
        &mut self,
    ) -> ParseResult<Meta<HashAlgorithm>> {
        self.keyword_choice("a hash algorithm", |k| {
            Some(match k {
                Keyword::Md5 => HashAlgorithm::Md5,
                Keyword::Sha1 => HashAlgorithm::Sha1,
                Keyword::Sha256 => HashAlgorithm::Sha256,
                Keyword::Sha384 => HashAlgorithm::Sha384,
                Keyword::Sha512 => HashAlgorithm::Sha512,
                _ => return None,
            })
        })
    }

    pub(super) fn encryption_algorithm(
        &mut self,
    ) -> ParseResult<Meta<EncryptionAlgorithm>> {
        self.keyword_choice("an encryption algorithm", |k| {
            Some(match k {
                Keyword::ThreeDes => EncryptionAlgorithm::ThreeDes,
                Keyword::Aes128 => EncryptionAlgorithm::Aes128,
                Keyword::Aes256 => EncryptionAlgorithm::Aes256,
                Keyword::Aes128gcm128 => EncryptionAlgorithm::Aes128Gcm128,
                Keyword::Aes256gcm128 => EncryptionAlgorithm::Aes256Gcm128,
                Keyword::Chacha20poly1305 => {
                    EncryptionAlgorithm::Chacha20Poly1305
                }
                _ => return None,
            })
        })
    }

    pub(super) fn routing_protocol(
        &mut self,
    ) -> ParseResult<Meta<RoutingProtocol>> {
        self.keyword_choice("a routing protocol", |k| {
            Some(match k {
                Keyword::Connected => RoutingProtocol::Connected,
                Keyword::Kernel => RoutingProtocol::Kernel,
                Keyword::Ospf => RoutingProtocol::Ospf,
                Keyword::Rip => RoutingProtocol::Rip,
                Keyword::Static => RoutingProtocol::Static,
                _ => return None,
            })
        })
    }

    pub(super) fn origin_type(&mut self) -> ParseResult<Meta<OriginType>> {
        self.keyword_choice("an origin", |k| {
            Some(match k {
                Keyword::Igp => OriginType::Igp,
                Keyword::Egp => OriginType::Egp,
                Keyword::Incomplete => OriginType::Incomplete,
                _ => return None,
            })
        })
    }

    pub(super) fn firewall_action(
        &mut self,
    ) -> ParseResult<Meta<FirewallAction>> {
        self.keyword_choice("'accept', 'drop' or 'reject'", |k| {
            Some(match k {
                Keyword::Accept => FirewallAction::Accept,
                Keyword::Drop => FirewallAction::Drop,
                Keyword::Reject => FirewallAction::Reject,
                _ => return None,
            })
        })
    }

    /// Parse a protocol by name or number
    pub(super) fn ip_protocol(&mut self) -> ParseResult<Meta<IpProtocol>> {
        if let Some(Token::Dec(_)) = self.peek() {
            let number = self.dec()?;
            let span = self.spans.get(&number);
            return Ok(self.add_span(span, IpProtocol::Number(number.node)));
        }

        self.keyword_choice("an IP protocol", |k| {
            Some(match k {
                Keyword::All => IpProtocol::All,
                Keyword::Ah => IpProtocol::Ah,
                Keyword::Esp => IpProtocol::Esp,
                Keyword::Gre => IpProtocol::Gre,
                Keyword::Icmp => IpProtocol::Icmp,
                Keyword::Igmp => IpProtocol::Igmp,
                Keyword::Ipip => IpProtocol::Ipip,
                Keyword::Ipv6Icmp => IpProtocol::Ipv6Icmp,
                Keyword::Ospf => IpProtocol::Ospf,
                Keyword::Pim => IpProtocol::Pim,
                Keyword::Sctp => IpProtocol::Sctp,
                Keyword::Tcp => IpProtocol::Tcp,
                Keyword::TcpUdp => IpProtocol::TcpUdp,
                Keyword::Udp => IpProtocol::Udp,
                Keyword::Vrrp => IpProtocol::Vrrp,
                _ => return None,
            })
        })
    }

    /// Parse an ICMP type or code name
    pub(super) fn icmp_type_name(
        &mut self,
    ) -> ParseResult<Meta<IcmpTypeName>> {
        self.keyword_choice("an ICMP type or code", |k| {
            icmp_type(k)
                .map(IcmpTypeName::Type)
                .or_else(|| icmp_code(k).map(IcmpTypeName::Code))
        })
    }

    /// Parse a list of ports and port ranges
    ///
    /// ```ebnf
    /// Range    ::= SubRange (',' SubRange)*
    /// SubRange ::= Port ('-' Port)?
    /// Port     ::= DEC | NAMED_PORT
    /// ```
    ///
    /// The whole list is a single token.
    pub(super) fn port_range(&mut self) -> ParseResult<Meta<Range>> {
        let (token, span) = self.lookahead()?;
        if token == Token::Newline {
            return self.unexpected("a port range");
        }
        let range = parse_range(token.text()).map_err(|e| {
            ParseError::invalid_literal("port range", token, e, span)
        })?;
        self.advance();
        Ok(self.add_span(span, range))
    }
}

/// # Communities
impl Parser<'_, '_> {
    /// Parse one or more standard communities
    ///
    /// ```ebnf
    /// Communities ::= StandardCommunity+ 'additive'?
    /// ```
    ///
    /// A quoted value may hold several whitespace separated communities.
    /// Returns the communities and whether `additive` was given.
    pub(super) fn standard_communities(
        &mut self,
    ) -> ParseResult<(Vec<Meta<StandardCommunity>>, bool)> {
        let mut communities = Vec::new();
        let mut additive = false;

        while !self.at_line_end() {
            let (token, span) = self.lookahead()?;
            if token == Token::Keyword(Keyword::Additive) {
                self.advance();
                additive = true;
                continue;
            }

            for word in token.text().split_whitespace() {
                if word == Keyword::Additive.as_str() {
                    additive = true;
                    continue;
                }
                let community = parse_standard_community(word).map_err(|e| {
                    ParseError::invalid_literal("community", word, e, span)
                })?;
                communities.push(self.add_span(span, community));
            }
            self.advance();
        }

        if communities.is_empty() {
            return self.unexpected("a community");
        }

        Ok((communities, additive))
    }

    /// Parse an extended community
    ///
    /// ```ebnf
    /// ExtendedCommunity ::= (TYPE ':')? Administrator ':' DEC
    /// Administrator     ::= DEC | DEC 'L' | DEC '.' DEC | IP_ADDRESS
    /// ```
    pub(super) fn extended_community(
        &mut self,
    ) -> ParseResult<Meta<ExtendedCommunity>> {
        let (token, span) = self.lookahead()?;
        if token == Token::Newline {
            return self.unexpected("an extended community");
        }
        let community = parse_extended_community(token.text()).map_err(|e| {
            ParseError::invalid_literal("extended community", token, e, span)
        })?;
        self.advance();
        Ok(self.add_span(span, community))
    }
}

/// # Policy expressions
impl Parser<'_, '_> {
    /// Parse a policy expression
    ///
    /// ```ebnf
    /// PolicyExpression ::= '(' PolicyExpression ')'
    ///                    | '(' PolicyExpression ('&&' PolicyExpression)+ ')'
    ///                    | '(' PolicyExpression ('||' PolicyExpression)+ ')'
    ///                    | VARIABLE
    /// ```
    ///
    /// After the opening parenthesis the first operand is parsed, then the
    /// token following it selects between conjunction, disjunction and a
    /// nested expression. All operators in one group must be the same.
    pub(super) fn policy_expression(
        &mut self,
    ) -> ParseResult<Meta<PolicyExpression>> {
        let (token, start) = self.lookahead()?;
        match token {
            Token::RoundLeft => self.advance(),
            Token::Newline
            | Token::RoundRight
            | Token::AmpAmp
            | Token::PipePipe => {
                return self.no_viable_alternative("a policy name or '('");
            }
            _ => {
                let name = self.variable()?;
                let span = self.spans.get(&name);
                return Ok(self.add_span(span, PolicyExpression::Name(name)));
            }
        }

        let first = self.policy_expression()?;
        let expr = match self.peek() {
            Some(op @ Token::AmpAmp) => {
                PolicyExpression::Conjunction(self.operands(first, op)?)
            }
            Some(op @ Token::PipePipe) => {
                PolicyExpression::Disjunction(self.operands(first, op)?)
            }
            _ => PolicyExpression::Nested(Box::new(first)),
        };
        self.take(Token::RoundRight)?;

        let span = self.span_from(start);
        Ok(self.add_span(span, expr))
    }

    fn operands(
        &mut self,
        first: Meta<PolicyExpression>,
        op: Token,
    ) -> ParseResult<Vec<Meta<PolicyExpression>>> {
        let mut operands = vec![first];
        while self.next_is(op) {
            operands.push(self.policy_expression()?);
        }
        Ok(operands)
    }
}

fn parse_u64(text: &str) -> Result<u64, String> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("`{text}` is not a number"));
    }
    text.parse().map_err(|e: std::num::ParseIntError| e.to_string())
}

fn parse_address(text: &str) -> Result<IpAddress, String> {
    let addr = text
        .parse::<IpAddr>()
        .map_err(|e: std::net::AddrParseError| e.to_string())?;
    Ok(IpAddress {
        text: text.to_string(),
        addr,
    })
}

fn parse_prefix(text: &str) -> Result<IpPrefix, String> {
    let (addr, len) = text.split_once('/').ok_or("missing prefix length")?;
    let addr = addr
        .parse::<IpAddr>()
        .map_err(|e: std::net::AddrParseError| e.to_string())?;
    let len = parse_u64(len)?;
    let max = if addr.is_ipv4() { 32 } else { 128 };
    if len > max {
        return Err(format!("prefix length {len} is larger than {max}"));
    }
    Ok(IpPrefix {
        text: text.to_string(),
        addr,
        len: len as u8,
    })
}

fn parse_range(text: &str) -> Result<Range, String> {
    text.split(',')
        .map(parse_sub_range)
        .collect::<Result<Vec<_>, _>>()
        .map(Range)
}

fn parse_sub_range(text: &str) -> Result<SubRange, String> {
    let (low, high) = match text.split_once('-') {
        Some((low, high)) => (low, Some(high)),
        None => (text, None),
    };
    Ok(SubRange {
        low: parse_port(low)?,
        high: high.map(parse_port).transpose()?,
    })
}

fn parse_port(text: &str) -> Result<Port, String> {
    if let Some(name) = Keyword::from_text(text).and_then(named_port) {
        return Ok(Port::Named(name));
    }
    parse_u64(text)
        .map(Port::Number)
        .map_err(|_| format!("`{text}` is not a port"))
}

fn named_port(keyword: Keyword) -> Option<NamedPort> {
    Some(match keyword {
        Keyword::Bgp => NamedPort::Bgp,
        Keyword::Domain => NamedPort::Domain,
        Keyword::Ftp => NamedPort::Ftp,
        Keyword::Http => NamedPort::Http,
        Keyword::Https => NamedPort::Https,
        Keyword::Imap => NamedPort::Imap,
        Keyword::Isakmp => NamedPort::Isakmp,
        Keyword::Ldap => NamedPort::Ldap,
        Keyword::Ntp => NamedPort::Ntp,
        Keyword::Pop3 => NamedPort::Pop3,
        Keyword::Smtp => NamedPort::Smtp,
        Keyword::Snmp => NamedPort::Snmp,
        Keyword::Ssh => NamedPort::Ssh,
        Keyword::Syslog => NamedPort::Syslog,
        Keyword::Telnet => NamedPort::Telnet,
        Keyword::Tftp => NamedPort::Tftp,
        _ => return None,
    })
}

fn icmp_type(keyword: Keyword) -> Option<IcmpType> {
    Some(match keyword {
        Keyword::Any => IcmpType::Any,
        Keyword::DestinationUnreachable => IcmpType::DestinationUnreachable,
        Keyword::EchoReply => IcmpType::EchoReply,
        Keyword::EchoRequest => IcmpType::EchoRequest,
        Keyword::ParameterProblem => IcmpType::ParameterProblem,
        Keyword::Redirect => IcmpType::Redirect,
        Keyword::RouterAdvertisement => IcmpType::RouterAdvertisement,
        Keyword::RouterSolicitation => IcmpType::RouterSolicitation,
        Keyword::SourceQuench => IcmpType::SourceQuench,
        Keyword::TimeExceeded => IcmpType::TimeExceeded,
        Keyword::TimestampReply => IcmpType::TimestampReply,
        Keyword::TimestampRequest => IcmpType::TimestampRequest,
        _ => return None,
    })
}

fn icmp_code(keyword: Keyword) -> Option<IcmpCode> {
    Some(match keyword {
        Keyword::CommunicationProhibited => IcmpCode::CommunicationProhibited,
        Keyword::FragmentationNeeded => IcmpCode::FragmentationNeeded,
        Keyword::HostProhibited => IcmpCode::HostProhibited,
        Keyword::HostUnknown => IcmpCode::HostUnknown,
        Keyword::HostUnreachable => IcmpCode::HostUnreachable,
        Keyword::IpHeaderBad => IcmpCode::IpHeaderBad,
        Keyword::NetworkProhibited => IcmpCode::NetworkProhibited,
        Keyword::NetworkUnknown => IcmpCode::NetworkUnknown,
        Keyword::NetworkUnreachable => IcmpCode::NetworkUnreachable,
        Keyword::PortUnreachable => IcmpCode::PortUnreachable,
        Keyword::ProtocolUnreachable => IcmpCode::ProtocolUnreachable,
        Keyword::RequiredOptionMissing => IcmpCode::RequiredOptionMissing,
        Keyword::SourceRouteFailed => IcmpCode::SourceRouteFailed,
        Keyword::TtlZeroDuringReassembly => {
            IcmpCode::TtlZeroDuringReassembly
        }
        Keyword::TtlZeroDuringTransit => IcmpCode::TtlZeroDuringTransit,
        _ => return None,
    })
}

fn parse_standard_community(text: &str) -> Result<StandardCommunity, String> {
    let well_known = Keyword::from_text(text).and_then(|k| {
        Some(match k {
            Keyword::Internet => WellKnownCommunity::Internet,
            Keyword::LocalAs => WellKnownCommunity::LocalAs,
            Keyword::NoAdvertise => WellKnownCommunity::NoAdvertise,
            Keyword::NoExport => WellKnownCommunity::NoExport,
            Keyword::NoPeer => WellKnownCommunity::NoPeer,
            _ => return None,
        })
    });
    if let Some(name) = well_known {
        return Ok(StandardCommunity::Named(name));
    }

    let (high, low) = text
        .split_once(':')
        .ok_or("expected `asn:value` or a well-known community")?;
    Ok(StandardCommunity::Literal {
        high: parse_u64(high)?,
        low: parse_u64(low)?,
    })
}

fn parse_extended_community(text: &str) -> Result<ExtendedCommunity, String> {
    let parts: Vec<&str> = text.split(':').collect();
    let (ty, administrator, value) = match parts.as_slice() {
        [administrator, value] => (None, *administrator, *value),
        [ty, administrator, value] => {
            let ty = match *ty {
                "rt" | "target" => ExtendedCommunityType::RouteTarget,
                "soo" | "origin" => ExtendedCommunityType::SiteOfOrigin,
                other => {
                    return Err(format!(
                        "unknown extended community type `{other}`"
                    ))
                }
            };
            (Some(ty), *administrator, *value)
        }
        _ => return Err("expected `[type:]administrator:value`".into()),
    };

    Ok(ExtendedCommunity {
        ty,
        administrator: parse_administrator(administrator)?,
        value: parse_u64(value)?,
    })
}

fn parse_administrator(text: &str) -> Result<Administrator, String> {
    if let Ok(n) = parse_u64(text) {
        return Ok(Administrator::Dec(n));
    }
    if let Some(asn) = text.strip_suffix('L') {
        return Ok(Administrator::As(parse_u64(asn)?));
    }
    if let Ok(ip) = text.parse::<Ipv4Addr>() {
        return Ok(Administrator::Ip(ip));
    }
    if let Some((high, low)) = text.split_once('.') {
        return Ok(Administrator::DottedAs(parse_u64(high)?, parse_u64(low)?));
    }
    Err(format!("`{text}` is not a valid administrator"))
}
