use crate::ast::{
    BgpNeighbor, BgpNeighborTail, BgpStatement, BgpTail, NextHopTail,
    ProtocolsStatement, Redistribute, RemoteAs, StaticRoute, StaticRouteTail,
    StaticStatement,
};

use super::{
    meta::Meta,
    token::{Keyword, Token},
    ParseResult, Parser,
};

impl Parser<'_, '_> {
    /// Parse a routing protocol statement
    ///
    /// ```ebnf
    /// Protocols ::= 'protocols' (Bgp | Static | NullFiller)
    /// ```
    pub(super) fn protocols(&mut self) -> ParseResult<ProtocolsStatement> {
        self.take_keyword(Keyword::Protocols)?;

        Ok(match self.peek_keyword() {
            Some(Keyword::Bgp) => ProtocolsStatement::Bgp(self.bgp()?),
            Some(Keyword::Static) => {
                ProtocolsStatement::Static(self.static_routes()?)
            }
            Some(
                Keyword::Bfd
                | Keyword::IgmpProxy
                | Keyword::Isis
                | Keyword::Mpls
                | Keyword::Ospf
                | Keyword::Ospfv3
                | Keyword::Pim
                | Keyword::Rip
                | Keyword::Ripng
                | Keyword::Rpki,
            ) => ProtocolsStatement::Null(self.null_filler()?),
            _ => return self.no_viable_alternative("a routing protocol"),
        })
    }
}

/// # BGP
impl Parser<'_, '_> {
    /// Parse a BGP statement
    ///
    /// ```ebnf
    /// Bgp ::= 'bgp' DEC? BgpTail
    /// ```
    ///
    /// Older releases put the local AS number right after `bgp`, newer ones
    /// configure it with `system-as`. Both are accepted.
    pub(super) fn bgp(&mut self) -> ParseResult<BgpStatement> {
        self.take_keyword(Keyword::Bgp)?;
        let asn = match self.peek() {
            Some(Token::Dec(_)) => Some(self.dec()?),
            _ => None,
        };
        let tail = self.bgp_tail()?;
        Ok(BgpStatement { asn, tail })
    }

    /// ```ebnf
    /// BgpTail ::= 'neighbor' IP BgpNeighborTail
    ///           | 'network' IP_PREFIX
    ///           | 'redistribute' Redistribute
    ///           | 'address-family' ('ipv4-unicast' | 'ipv6-unicast')
    ///             ('network' IP_PREFIX | 'redistribute' Redistribute | NullFiller)
    ///           | 'parameters' 'router-id' IP_ADDRESS
    ///           | 'system-as' DEC
    ///           | NullFiller
    /// ```
    fn bgp_tail(&mut self) -> ParseResult<BgpTail> {
        Ok(match self.peek_keyword() {
            Some(Keyword::Neighbor) => BgpTail::Neighbor(self.bgp_neighbor()?),
            Some(Keyword::Network) => {
                self.take_keyword(Keyword::Network)?;
                BgpTail::Network(self.ip_prefix()?)
            }
            Some(Keyword::Redistribute) => {
                BgpTail::Redistribute(self.redistribute()?)
            }
            Some(Keyword::AddressFamily) => {
                self.address_family()?;
                match self.peek_keyword() {
                    Some(Keyword::Network) => {
                        self.take_keyword(Keyword::Network)?;
                        BgpTail::Network(self.ip_prefix()?)
                    }
                    Some(Keyword::Redistribute) => {
                        BgpTail::Redistribute(self.redistribute()?)
                    }
                    Some(
                        Keyword::AggregateAddress
                        | Keyword::Distance
                        | Keyword::Export
                        | Keyword::Import
                        | Keyword::Label
                        | Keyword::MaximumPaths
                        | Keyword::Rd
                        | Keyword::RouteMap
                        | Keyword::RouteTarget,
                    ) => BgpTail::Null(self.null_filler()?),
                    _ => {
                        return self.no_viable_alternative(
                            "an address family property",
                        )
                    }
                }
            }
            // Only `router-id` is modeled, all other parameters share the
            // catch-all. Decided on the token after `parameters`.
            Some(Keyword::Parameters)
                if self.peek_keyword_nth(1) == Some(Keyword::RouterId) =>
            {
                self.take_keyword(Keyword::Parameters)?;
                self.take_keyword(Keyword::RouterId)?;
                BgpTail::RouterId(self.ip_address()?)
            }
            Some(Keyword::SystemAs) => {
                self.take_keyword(Keyword::SystemAs)?;
                BgpTail::SystemAs(self.dec()?)
            }
            Some(
                Keyword::Interface
                | Keyword::Listen
                | Keyword::MaximumPaths
                | Keyword::Parameters
                | Keyword::PeerGroup
                | Keyword::Timers,
            ) => BgpTail::Null(self.null_filler()?),
            _ => return self.no_viable_alternative("a BGP property"),
        })
    }

    /// `'address-family' ('ipv4-unicast' | 'ipv6-unicast')`
    fn address_family(&mut self) -> ParseResult<Meta<Keyword>> {
        self.take_keyword(Keyword::AddressFamily)?;
        self.keyword_choice("'ipv4-unicast' or 'ipv6-unicast'", |k| match k {
            Keyword::Ipv4Unicast | Keyword::Ipv6Unicast => Some(k),
            _ => None,
        })
    }

    /// ```ebnf
    /// Redistribute ::= 'redistribute' RoutingProtocol
    ///                  ('metric' DEC | 'route-map' VARIABLE)?
    /// ```
    fn redistribute(&mut self) -> ParseResult<Redistribute> {
        self.take_keyword(Keyword::Redistribute)?;
        let protocol = self.routing_protocol()?;
        let mut metric = None;
        let mut route_map = None;
        if self.next_is_keyword(Keyword::Metric) {
            metric = Some(self.dec()?);
        } else if self.next_is_keyword(Keyword::RouteMap) {
            route_map = Some(self.variable()?);
        }
        Ok(Redistribute {
            protocol,
            metric,
            route_map,
        })
    }

    /// ```ebnf
    /// BgpNeighbor ::= 'neighbor' IP BgpNeighborTail
    /// ```
    fn bgp_neighbor(&mut self) -> ParseResult<BgpNeighbor> {
        self.take_keyword(Keyword::Neighbor)?;
        let address = self.ip_address()?;
        let tail = self.bgp_neighbor_tail()?;
        Ok(BgpNeighbor { address, tail })
    }

    /// ```ebnf
    /// BgpNeighborTail ::= 'address-family' ('ipv4-unicast' | 'ipv6-unicast')
    ///                     AddressFamilyTail
    ///                   | AddressFamilyTail
    ///                   | 'remote-as' (DEC | 'external' | 'internal')
    ///                   | Description
    ///                   | NullFiller
    /// ```
    fn bgp_neighbor_tail(&mut self) -> ParseResult<BgpNeighborTail> {
        Ok(match self.peek_keyword() {
            Some(Keyword::AddressFamily) => {
                self.address_family()?;
                self.neighbor_address_family_tail()?
            }
            Some(
                Keyword::NexthopSelf
                | Keyword::RouteMap
                | Keyword::SoftReconfiguration,
            ) => self.neighbor_address_family_tail()?,
            Some(Keyword::RemoteAs) => {
                BgpNeighborTail::RemoteAs(self.remote_as()?)
            }
            Some(Keyword::Description) => {
                BgpNeighborTail::Description(self.description()?)
            }
            Some(
                Keyword::Capability
                | Keyword::EbgpMultihop
                | Keyword::Interface
                | Keyword::LocalAs
                | Keyword::Passive
                | Keyword::Password
                | Keyword::PeerGroup
                | Keyword::Shutdown
                | Keyword::Timers
                | Keyword::UpdateSource,
            ) => BgpNeighborTail::Null(self.null_filler()?),
            _ => return self.no_viable_alternative("a BGP neighbor property"),
        })
    }

    /// ```ebnf
    /// AddressFamilyTail ::= 'route-map' ('import' | 'export') VARIABLE
    ///                     | 'nexthop-self'
    ///                     | NullFiller
    /// ```
    fn neighbor_address_family_tail(
        &mut self,
    ) -> ParseResult<BgpNeighborTail> {
        Ok(match self.peek_keyword() {
            Some(Keyword::RouteMap) => {
                self.take_keyword(Keyword::RouteMap)?;
                match self.peek_keyword() {
                    Some(Keyword::Import) => {
                        self.take_keyword(Keyword::Import)?;
                        BgpNeighborTail::RouteMapImport(self.variable()?)
                    }
                    Some(Keyword::Export) => {
                        self.take_keyword(Keyword::Export)?;
                        BgpNeighborTail::RouteMapExport(self.variable()?)
                    }
                    _ => return self.unexpected("'import' or 'export'"),
                }
            }
            Some(Keyword::NexthopSelf) => {
                self.take_keyword(Keyword::NexthopSelf)?;
                BgpNeighborTail::NextHopSelf
            }
            Some(
                Keyword::AllowasIn
                | Keyword::Capability
                | Keyword::DefaultOriginate
                | Keyword::DistributeList
                | Keyword::FilterList
                | Keyword::MaximumPrefix
                | Keyword::PrefixList
                | Keyword::RemovePrivateAs
                | Keyword::RouteReflectorClient
                | Keyword::SoftReconfiguration
                | Keyword::Weight,
            ) => BgpNeighborTail::Null(self.null_filler()?),
            _ => {
                return self
                    .no_viable_alternative("an address family property")
            }
        })
    }

    fn remote_as(&mut self) -> ParseResult<Meta<RemoteAs>> {
        self.take_keyword(Keyword::RemoteAs)?;
        if let Some(Token::Dec(_)) = self.peek() {
            let asn = self.dec()?;
            let span = self.spans.get(&asn);
            return Ok(self.add_span(span, RemoteAs::Number(asn.node)));
        }
        self.keyword_choice("an AS number, 'external' or 'internal'", |k| {
            match k {
                Keyword::External => Some(RemoteAs::External),
                Keyword::Internal => Some(RemoteAs::Internal),
                _ => None,
            }
        })
    }
}

/// # Static routes
impl Parser<'_, '_> {
    /// Parse a static route statement
    ///
    /// ```ebnf
    /// Static ::= 'static' ( 'route' IP_PREFIX StaticRouteTail
    ///                     | NullFiller )
    /// ```
    pub(super) fn static_routes(&mut self) -> ParseResult<StaticStatement> {
        self.take_keyword(Keyword::Static)?;

        Ok(match self.peek_keyword() {
            Some(Keyword::Route) => {
                self.take_keyword(Keyword::Route)?;
                let prefix = self.ip_prefix()?;
                let tail = self.static_route_tail()?;
                StaticStatement::Route(StaticRoute { prefix, tail })
            }
            Some(
                Keyword::InterfaceRoute | Keyword::Route6 | Keyword::Table,
            ) => StaticStatement::Null(self.null_filler()?),
            _ => return self.no_viable_alternative("'route'"),
        })
    }

    /// ```ebnf
    /// StaticRouteTail ::= 'blackhole' (~NEWLINE)*
    ///                   | 'next-hop' IP_ADDRESS NextHopTail?
    ///                   | NullFiller
    /// NextHopTail     ::= 'distance' DEC | NullFiller
    /// ```
    fn static_route_tail(&mut self) -> ParseResult<StaticRouteTail> {
        Ok(match self.peek_keyword() {
            Some(Keyword::Blackhole) => {
                StaticRouteTail::Blackhole(self.null_filler()?)
            }
            Some(Keyword::NextHop) => {
                self.take_keyword(Keyword::NextHop)?;
                let address = self.ip_address()?;
                let tail = match self.peek_keyword() {
                    Some(Keyword::Distance) => {
                        self.take_keyword(Keyword::Distance)?;
                        Some(NextHopTail::Distance(self.dec()?))
                    }
                    Some(
                        Keyword::Disable | Keyword::Interface | Keyword::Vrf,
                    ) => Some(NextHopTail::Null(self.null_filler()?)),
                    _ if self.at_line_end() => None,
                    _ => {
                        return self
                            .no_viable_alternative("'distance' or end of line")
                    }
                };
                StaticRouteTail::NextHop { address, tail }
            }
            Some(Keyword::DhcpInterface | Keyword::Interface) => {
                StaticRouteTail::Null(self.null_filler()?)
            }
            _ => {
                return self
                    .no_viable_alternative("'blackhole' or 'next-hop'")
            }
        })
    }
}
