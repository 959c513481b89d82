use crate::ast::{InterfaceAddress, InterfaceDeclaration, InterfaceTail};

use super::{
    meta::Meta,
    token::{Keyword, Token},
    ParseResult, Parser,
};

impl Parser<'_, '_> {
    /// Parse an interface statement
    ///
    /// ```ebnf
    /// Interfaces ::= 'interfaces' InterfaceType VARIABLE InterfaceTail?
    /// ```
    pub(super) fn interfaces(&mut self) -> ParseResult<InterfaceDeclaration> {
        self.take_keyword(Keyword::Interfaces)?;
        let ty = self.interface_type()?;
        let name = self.variable()?;
        let tail = if self.at_line_end() {
            None
        } else {
            Some(self.interface_tail(true)?)
        };
        Ok(InterfaceDeclaration { ty, name, tail })
    }

    /// Parse what follows the name of an interface
    ///
    /// ```ebnf
    /// InterfaceTail ::= InterfaceAddress
    ///                 | Description
    ///                 | 'vif' DEC InterfaceTail?
    ///                 | NullFiller
    /// ```
    ///
    /// Sub-interfaces cannot be nested, `vif` is only accepted when
    /// `allow_vif` is set.
    fn interface_tail(&mut self, allow_vif: bool) -> ParseResult<InterfaceTail> {
        Ok(match self.peek_keyword() {
            Some(Keyword::Address) => {
                InterfaceTail::Address(self.interface_address()?)
            }
            Some(Keyword::Description) => {
                InterfaceTail::Description(self.description()?)
            }
            Some(Keyword::Vif) if allow_vif => {
                self.take_keyword(Keyword::Vif)?;
                let vlan = self.dec()?;
                let tail = if self.at_line_end() {
                    None
                } else {
                    Some(Box::new(self.interface_tail(false)?))
                };
                InterfaceTail::Vif { vlan, tail }
            }
            Some(
                Keyword::BondGroup
                | Keyword::DhcpOptions
                | Keyword::Dhcpv6Options
                | Keyword::Disable
                | Keyword::DisableFlowControl
                | Keyword::DisableLinkDetect
                | Keyword::Duplex
                | Keyword::Encapsulation
                | Keyword::Firewall
                | Keyword::HwId
                | Keyword::Ip
                | Keyword::Ipv6
                | Keyword::LocalIp
                | Keyword::Mac
                | Keyword::Member
                | Keyword::Mirror
                | Keyword::Mode
                | Keyword::Mtu
                | Keyword::Multicast
                | Keyword::Offload
                | Keyword::Parameters
                | Keyword::Policy
                | Keyword::Priority
                | Keyword::Redirect
                | Keyword::RemoteIp
                | Keyword::RingBuffer
                | Keyword::SmpAffinity
                | Keyword::SourceAddress
                | Keyword::SourceInterface
                | Keyword::Speed
                | Keyword::Stp
                | Keyword::VifC
                | Keyword::VifS
                | Keyword::Vni,
            ) => InterfaceTail::Null(self.null_filler()?),
            _ => {
                return self.no_viable_alternative(
                    "an interface property such as 'address' or 'description'",
                )
            }
        })
    }

    /// Parse the address of an interface
    ///
    /// ```ebnf
    /// InterfaceAddress ::= 'address' ('dhcp' | 'dhcpv6' | IP_PREFIX | IPV6_PREFIX)
    /// ```
    pub(super) fn interface_address(
        &mut self,
    ) -> ParseResult<Meta<InterfaceAddress>> {
        self.take_keyword(Keyword::Address)?;
        match self.peek() {
            Some(Token::Keyword(Keyword::Dhcp)) => {
                let (_, span) = self.next()?;
                Ok(self.add_span(span, InterfaceAddress::Dhcp))
            }
            Some(Token::Keyword(Keyword::Dhcpv6)) => {
                let (_, span) = self.next()?;
                Ok(self.add_span(span, InterfaceAddress::Dhcpv6))
            }
            Some(Token::IpPrefix(_) | Token::Ipv6Prefix(_)) => {
                let prefix = self.ip_prefix()?;
                let span = self.spans.get(&prefix);
                Ok(self.add_span(span, InterfaceAddress::Static(prefix.node)))
            }
            _ => self.unexpected("'dhcp', 'dhcpv6' or an IP prefix"),
        }
    }
}
