use crate::ast::{
    FirewallMatch, FirewallRule, FirewallRuleSet, FirewallRuleSetTail,
    FirewallRuleTail, FirewallStatement, IcmpMatch,
};

use super::{token::Keyword, ParseResult, Parser};

impl Parser<'_, '_> {
    /// Parse a firewall statement
    ///
    /// ```ebnf
    /// Firewall ::= 'firewall' ('name' VARIABLE FirewallRuleSetTail | NullFiller)
    /// ```
    pub(super) fn firewall(&mut self) -> ParseResult<FirewallStatement> {
        self.take_keyword(Keyword::Firewall)?;

        Ok(match self.peek_keyword() {
            Some(Keyword::Name) => {
                self.take_keyword(Keyword::Name)?;
                let name = self.variable()?;
                let tail = self.firewall_rule_set_tail()?;
                FirewallStatement::Name(FirewallRuleSet { name, tail })
            }
            Some(
                Keyword::AllPing
                | Keyword::BroadcastPing
                | Keyword::ConfigTrap
                | Keyword::Group
                | Keyword::IpSrcRoute
                | Keyword::Ipv6Name
                | Keyword::Ipv6ReceiveRedirects
                | Keyword::Ipv6SrcRoute
                | Keyword::LogMartians
                | Keyword::Options
                | Keyword::ReceiveRedirects
                | Keyword::SendRedirects
                | Keyword::SourceValidation
                | Keyword::StatePolicy
                | Keyword::SynCookies
                | Keyword::TwaHazardsProtection,
            ) => FirewallStatement::Null(self.null_filler()?),
            _ => return self.no_viable_alternative("a firewall property"),
        })
    }

    /// ```ebnf
    /// FirewallRuleSetTail ::= 'default-action' FirewallAction
    ///                       | Description
    ///                       | 'rule' DEC FirewallRuleTail
    ///                       | NullFiller
    /// ```
    fn firewall_rule_set_tail(&mut self) -> ParseResult<FirewallRuleSetTail> {
        Ok(match self.peek_keyword() {
            Some(Keyword::DefaultAction) => {
                self.take_keyword(Keyword::DefaultAction)?;
                FirewallRuleSetTail::DefaultAction(self.firewall_action()?)
            }
            Some(Keyword::Description) => {
                FirewallRuleSetTail::Description(self.description()?)
            }
            Some(Keyword::Rule) => {
                self.take_keyword(Keyword::Rule)?;
                let number = self.dec()?;
                let tail = self.firewall_rule_tail()?;
                FirewallRuleSetTail::Rule(FirewallRule { number, tail })
            }
            Some(Keyword::EnableDefaultLog) => {
                FirewallRuleSetTail::Null(self.null_filler()?)
            }
            _ => return self.no_viable_alternative("a rule set property"),
        })
    }

    /// ```ebnf
    /// FirewallRuleTail ::= 'action' FirewallAction
    ///                    | Description
    ///                    | 'destination' FirewallMatch
    ///                    | 'icmp' IcmpMatch
    ///                    | 'protocol' IpProtocol
    ///                    | 'source' FirewallMatch
    ///                    | NullFiller
    /// ```
    fn firewall_rule_tail(&mut self) -> ParseResult<FirewallRuleTail> {
        Ok(match self.peek_keyword() {
            Some(Keyword::Action) => {
                self.take_keyword(Keyword::Action)?;
                FirewallRuleTail::Action(self.firewall_action()?)
            }
            Some(Keyword::Description) => {
                FirewallRuleTail::Description(self.description()?)
            }
            Some(Keyword::Destination) => {
                self.take_keyword(Keyword::Destination)?;
                FirewallRuleTail::Destination(self.firewall_match()?)
            }
            Some(Keyword::Icmp) => {
                self.take_keyword(Keyword::Icmp)?;
                FirewallRuleTail::Icmp(self.icmp_match()?)
            }
            Some(Keyword::Protocol) => {
                self.take_keyword(Keyword::Protocol)?;
                FirewallRuleTail::Protocol(self.ip_protocol()?)
            }
            Some(Keyword::Source) => {
                self.take_keyword(Keyword::Source)?;
                FirewallRuleTail::Source(self.firewall_match()?)
            }
            Some(
                Keyword::Disable
                | Keyword::Fragment
                | Keyword::Ipsec
                | Keyword::Limit
                | Keyword::Log
                | Keyword::Recent
                | Keyword::State
                | Keyword::Tcp
                | Keyword::Time,
            ) => FirewallRuleTail::Null(self.null_filler()?),
            _ => return self.no_viable_alternative("a firewall rule property"),
        })
    }

    /// ```ebnf
    /// FirewallMatch ::= 'address' AddressMatch
    ///                 | 'port' Range
    ///                 | NullFiller
    /// ```
    fn firewall_match(&mut self) -> ParseResult<FirewallMatch> {
        Ok(match self.peek_keyword() {
            Some(Keyword::Address) => {
                self.take_keyword(Keyword::Address)?;
                FirewallMatch::Address(self.address_match()?)
            }
            Some(Keyword::Port) => {
                self.take_keyword(Keyword::Port)?;
                FirewallMatch::Port(self.port_range()?)
            }
            Some(Keyword::Group | Keyword::Mac) => {
                FirewallMatch::Null(self.null_filler()?)
            }
            _ => return self.no_viable_alternative("'address' or 'port'"),
        })
    }

    /// ```ebnf
    /// IcmpMatch ::= 'type-name' IcmpTypeName | 'type' DEC | 'code' DEC
    /// ```
    fn icmp_match(&mut self) -> ParseResult<IcmpMatch> {
        Ok(match self.peek_keyword() {
            Some(Keyword::TypeName) => {
                self.take_keyword(Keyword::TypeName)?;
                IcmpMatch::TypeName(self.icmp_type_name()?)
            }
            Some(Keyword::Type) => {
                self.take_keyword(Keyword::Type)?;
                IcmpMatch::Type(self.dec()?)
            }
            Some(Keyword::Code) => {
                self.take_keyword(Keyword::Code)?;
                IcmpMatch::Code(self.dec()?)
            }
            _ => {
                return self
                    .no_viable_alternative("'type-name', 'type' or 'code'")
            }
        })
    }
}
