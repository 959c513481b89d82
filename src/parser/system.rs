use crate::ast::SystemStatement;

use super::{token::Keyword, ParseResult, Parser};

impl Parser<'_, '_> {
    /// Parse a system statement
    ///
    /// ```ebnf
    /// System ::= 'system' ( 'host-name' VARIABLE
    ///                     | 'domain-name' VARIABLE
    ///                     | 'name-server' IP_ADDRESS
    ///                     | 'time-zone' VARIABLE
    ///                     | 'default-address-selection'
    ///                     | NullFiller )
    /// ```
    pub(super) fn system(&mut self) -> ParseResult<SystemStatement> {
        self.take_keyword(Keyword::System)?;

        Ok(match self.peek_keyword() {
            Some(Keyword::HostName) => {
                self.take_keyword(Keyword::HostName)?;
                SystemStatement::HostName(self.variable()?)
            }
            Some(Keyword::DomainName) => {
                self.take_keyword(Keyword::DomainName)?;
                SystemStatement::DomainName(self.variable()?)
            }
            Some(Keyword::NameServer) => {
                self.take_keyword(Keyword::NameServer)?;
                SystemStatement::NameServer(self.ip_address()?)
            }
            Some(Keyword::TimeZone) => {
                self.take_keyword(Keyword::TimeZone)?;
                SystemStatement::TimeZone(self.variable()?)
            }
            Some(Keyword::DefaultAddressSelection) => {
                self.take_keyword(Keyword::DefaultAddressSelection)?;
                SystemStatement::DefaultAddressSelection
            }
            Some(
                Keyword::ConfigManagement
                | Keyword::Console
                | Keyword::Conntrack
                | Keyword::FlowAccounting
                | Keyword::GatewayAddress
                | Keyword::Ip
                | Keyword::Ipv6
                | Keyword::Login
                | Keyword::Ntp
                | Keyword::Options
                | Keyword::Package
                | Keyword::StaticHostMapping
                | Keyword::Syslog
                | Keyword::TaskScheduler,
            ) => SystemStatement::Null(self.null_filler()?),
            _ => return self.no_viable_alternative("a system property"),
        })
    }
}
