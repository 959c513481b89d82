use crate::ast::{
    PolicyStatement, PrefixList, PrefixListRule, PrefixListRuleTail,
    PrefixListTail, RouteMap, RouteMapMatch, RouteMapRule, RouteMapRuleTail,
    RouteMapSet, RouteMapTail,
};

use super::{token::Keyword, ParseResult, Parser};

impl Parser<'_, '_> {
    /// Parse a policy statement
    ///
    /// ```ebnf
    /// Policy ::= 'policy' (PrefixList | RouteMap | NullFiller)
    /// ```
    pub(super) fn policy(&mut self) -> ParseResult<PolicyStatement> {
        self.take_keyword(Keyword::Policy)?;

        Ok(match self.peek_keyword() {
            Some(Keyword::PrefixList) => {
                PolicyStatement::PrefixList(self.prefix_list()?)
            }
            Some(Keyword::RouteMap) => {
                PolicyStatement::RouteMap(self.route_map()?)
            }
            Some(
                Keyword::AccessList
                | Keyword::AccessList6
                | Keyword::AsPathList
                | Keyword::CommunityList
                | Keyword::ExtcommunityList
                | Keyword::LargeCommunityList
                | Keyword::LocalRoute
                | Keyword::PrefixList6
                | Keyword::Route
                | Keyword::Route6,
            ) => PolicyStatement::Null(self.null_filler()?),
            _ => return self.no_viable_alternative("a policy type"),
        })
    }
}

/// # Prefix lists
impl Parser<'_, '_> {
    /// ```ebnf
    /// PrefixList ::= 'prefix-list' VARIABLE
    ///                (Description | 'rule' DEC PrefixListRuleTail)
    /// ```
    pub(super) fn prefix_list(&mut self) -> ParseResult<PrefixList> {
        self.take_keyword(Keyword::PrefixList)?;
        let name = self.variable()?;

        let tail = match self.peek_keyword() {
            Some(Keyword::Description) => {
                PrefixListTail::Description(self.description()?)
            }
            Some(Keyword::Rule) => {
                self.take_keyword(Keyword::Rule)?;
                let number = self.dec()?;
                let tail = self.prefix_list_rule_tail()?;
                PrefixListTail::Rule(PrefixListRule { number, tail })
            }
            _ => {
                return self.no_viable_alternative("'description' or 'rule'")
            }
        };

        Ok(PrefixList { name, tail })
    }

    /// ```ebnf
    /// PrefixListRuleTail ::= 'action' LineAction
    ///                      | Description
    ///                      | 'ge' DEC
    ///                      | 'le' DEC
    ///                      | 'prefix' IP_PREFIX
    /// ```
    fn prefix_list_rule_tail(&mut self) -> ParseResult<PrefixListRuleTail> {
        Ok(match self.peek_keyword() {
            Some(Keyword::Action) => {
                self.take_keyword(Keyword::Action)?;
                PrefixListRuleTail::Action(self.line_action()?)
            }
            Some(Keyword::Description) => {
                PrefixListRuleTail::Description(self.description()?)
            }
            Some(Keyword::Ge) => {
                self.take_keyword(Keyword::Ge)?;
                PrefixListRuleTail::Ge(self.dec()?)
            }
            Some(Keyword::Le) => {
                self.take_keyword(Keyword::Le)?;
                PrefixListRuleTail::Le(self.dec()?)
            }
            Some(Keyword::Prefix) => {
                self.take_keyword(Keyword::Prefix)?;
                PrefixListRuleTail::Prefix(self.ip_prefix()?)
            }
            _ => return self.no_viable_alternative("a prefix list rule property"),
        })
    }
}

/// # Route maps
impl Parser<'_, '_> {
    /// ```ebnf
    /// RouteMap ::= 'route-map' VARIABLE
    ///              (Description | 'rule' DEC RouteMapRuleTail)
    /// ```
    pub(super) fn route_map(&mut self) -> ParseResult<RouteMap> {
        self.take_keyword(Keyword::RouteMap)?;
        let name = self.variable()?;

        let tail = match self.peek_keyword() {
            Some(Keyword::Description) => {
                RouteMapTail::Description(self.description()?)
            }
            Some(Keyword::Rule) => {
                self.take_keyword(Keyword::Rule)?;
                let number = self.dec()?;
                let tail = self.route_map_rule_tail()?;
                RouteMapTail::Rule(RouteMapRule { number, tail })
            }
            _ => {
                return self.no_viable_alternative("'description' or 'rule'")
            }
        };

        Ok(RouteMap { name, tail })
    }

    /// ```ebnf
    /// RouteMapRuleTail ::= 'action' LineAction
    ///                    | 'call' PolicyExpression
    ///                    | 'continue' DEC
    ///                    | Description
    ///                    | 'match' RouteMapMatch
    ///                    | 'set' RouteMapSet
    ///                    | NullFiller
    /// ```
    fn route_map_rule_tail(&mut self) -> ParseResult<RouteMapRuleTail> {
        Ok(match self.peek_keyword() {
            Some(Keyword::Action) => {
                self.take_keyword(Keyword::Action)?;
                RouteMapRuleTail::Action(self.line_action()?)
            }
            Some(Keyword::Call) => {
                self.take_keyword(Keyword::Call)?;
                RouteMapRuleTail::Call(self.policy_expression()?)
            }
            Some(Keyword::Continue) => {
                self.take_keyword(Keyword::Continue)?;
                RouteMapRuleTail::Continue(self.dec()?)
            }
            Some(Keyword::Description) => {
                RouteMapRuleTail::Description(self.description()?)
            }
            Some(Keyword::Match) => {
                self.take_keyword(Keyword::Match)?;
                RouteMapRuleTail::Match(self.route_map_match()?)
            }
            Some(Keyword::Set) => {
                self.take_keyword(Keyword::Set)?;
                RouteMapRuleTail::Set(self.route_map_set()?)
            }
            Some(Keyword::OnMatch) => {
                RouteMapRuleTail::Null(self.null_filler()?)
            }
            _ => return self.no_viable_alternative("a route map rule property"),
        })
    }

    /// ```ebnf
    /// RouteMapMatch ::= 'ip' 'address' 'prefix-list' VARIABLE
    ///                 | NullFiller
    /// ```
    ///
    /// `ip` also starts other matches, so the two tokens after it decide
    /// whether this is the prefix list match.
    fn route_map_match(&mut self) -> ParseResult<RouteMapMatch> {
        let is_prefix_list = self.peek_keyword() == Some(Keyword::Ip)
            && self.peek_keyword_nth(1) == Some(Keyword::Address)
            && self.peek_keyword_nth(2) == Some(Keyword::PrefixList);

        if is_prefix_list {
            self.take_keyword(Keyword::Ip)?;
            self.take_keyword(Keyword::Address)?;
            self.take_keyword(Keyword::PrefixList)?;
            return Ok(RouteMapMatch::IpAddressPrefixList(self.variable()?));
        }

        match self.peek_keyword() {
            Some(
                Keyword::AsPath
                | Keyword::Community
                | Keyword::Interface
                | Keyword::Ip
                | Keyword::Ipv6
                | Keyword::LargeCommunity
                | Keyword::Metric
                | Keyword::Origin
                | Keyword::Peer
                | Keyword::Protocol
                | Keyword::RouteSource
                | Keyword::Tag,
            ) => Ok(RouteMapMatch::Null(self.null_filler()?)),
            _ => self.no_viable_alternative("a route map match"),
        }
    }

    /// ```ebnf
    /// RouteMapSet ::= 'community' Communities
    ///               | 'extcommunity-rt' ExtendedCommunity
    ///               | 'extcommunity-soo' ExtendedCommunity
    ///               | 'ip-next-hop' IP_ADDRESS
    ///               | 'local-preference' DEC
    ///               | 'metric' DEC
    ///               | 'origin' OriginType
    ///               | NullFiller
    /// ```
    fn route_map_set(&mut self) -> ParseResult<RouteMapSet> {
        Ok(match self.peek_keyword() {
            Some(Keyword::Community) => {
                self.take_keyword(Keyword::Community)?;
                let (communities, additive) = self.standard_communities()?;
                RouteMapSet::Community {
                    communities,
                    additive,
                }
            }
            Some(Keyword::ExtcommunityRt) => {
                self.take_keyword(Keyword::ExtcommunityRt)?;
                RouteMapSet::ExtCommunityRt(self.extended_community()?)
            }
            Some(Keyword::ExtcommunitySoo) => {
                self.take_keyword(Keyword::ExtcommunitySoo)?;
                RouteMapSet::ExtCommunitySoo(self.extended_community()?)
            }
            Some(Keyword::IpNextHop) => {
                self.take_keyword(Keyword::IpNextHop)?;
                RouteMapSet::IpNextHop(self.ip_address()?)
            }
            Some(Keyword::LocalPreference) => {
                self.take_keyword(Keyword::LocalPreference)?;
                RouteMapSet::LocalPreference(self.dec()?)
            }
            Some(Keyword::Metric) => {
                self.take_keyword(Keyword::Metric)?;
                RouteMapSet::Metric(self.dec()?)
            }
            Some(Keyword::Origin) => {
                self.take_keyword(Keyword::Origin)?;
                RouteMapSet::Origin(self.origin_type()?)
            }
            Some(
                Keyword::AsPathPrepend
                | Keyword::Distance
                | Keyword::Ipv6
                | Keyword::LargeCommunity
                | Keyword::Tag
                | Keyword::Weight,
            ) => RouteMapSet::Null(self.null_filler()?),
            _ => return self.no_viable_alternative("a route map action"),
        })
    }
}
