use crate::ast::{
    Authentication, AuthenticationMode, ConnectionType, EspGroup,
    EspGroupTail, EspMode, EspProposal, EspProposalTail, IkeGroup,
    IkeGroupTail, IkeProposal, IkeProposalTail, IkeVersion, IpsecStatement,
    PfsSetting, SiteToSitePeer, SiteToSiteTail, Vti, VpnStatement,
};

use super::{meta::Meta, token::Keyword, ParseResult, Parser};

impl Parser<'_, '_> {
    /// Parse a VPN statement
    ///
    /// ```ebnf
    /// Vpn ::= 'vpn' (Ipsec | NullFiller)
    /// ```
    pub(super) fn vpn(&mut self) -> ParseResult<VpnStatement> {
        self.take_keyword(Keyword::Vpn)?;

        Ok(match self.peek_keyword() {
            Some(Keyword::Ipsec) => VpnStatement::Ipsec(self.ipsec()?),
            Some(
                Keyword::L2tp
                | Keyword::Openconnect
                | Keyword::Pptp
                | Keyword::Sstp,
            ) => VpnStatement::Null(self.null_filler()?),
            _ => return self.no_viable_alternative("a VPN type"),
        })
    }

    /// ```ebnf
    /// Ipsec ::= 'ipsec' ( EspGroup
    ///                   | IkeGroup
    ///                   | 'ipsec-interfaces' 'interface' VARIABLE
    ///                   | 'site-to-site' SiteToSite
    ///                   | NullFiller )
    /// ```
    fn ipsec(&mut self) -> ParseResult<IpsecStatement> {
        self.take_keyword(Keyword::Ipsec)?;

        Ok(match self.peek_keyword() {
            Some(Keyword::EspGroup) => IpsecStatement::EspGroup(self.esp_group()?),
            Some(Keyword::IkeGroup) => IpsecStatement::IkeGroup(self.ike_group()?),
            Some(Keyword::IpsecInterfaces) => {
                self.take_keyword(Keyword::IpsecInterfaces)?;
                self.take_keyword(Keyword::Interface)?;
                IpsecStatement::IpsecInterface(self.variable()?)
            }
            Some(Keyword::SiteToSite) => {
                IpsecStatement::SiteToSite(self.site_to_site()?)
            }
            Some(
                Keyword::AutoUpdate
                | Keyword::DisableUniqreqids
                | Keyword::Log
                | Keyword::Logging
                | Keyword::NatNetworks
                | Keyword::NatTraversal,
            ) => IpsecStatement::Null(self.null_filler()?),
            _ => return self.no_viable_alternative("an IPsec property"),
        })
    }
}

/// # ESP and IKE groups
impl Parser<'_, '_> {
    /// ```ebnf
    /// EspGroup ::= 'esp-group' VARIABLE
    ///              ( 'compression' ('enable' | 'disable')
    ///              | 'lifetime' DEC
    ///              | 'mode' ('transport' | 'tunnel')
    ///              | 'pfs' Pfs
    ///              | 'proposal' DEC ('encryption' Encryption | 'hash' Hash) )
    /// ```
    fn esp_group(&mut self) -> ParseResult<EspGroup> {
        self.take_keyword(Keyword::EspGroup)?;
        let name = self.variable()?;

        let tail = match self.peek_keyword() {
            Some(Keyword::Compression) => {
                self.take_keyword(Keyword::Compression)?;
                EspGroupTail::Compression(self.keyword_choice(
                    "'enable' or 'disable'",
                    |k| match k {
                        Keyword::Enable => Some(true),
                        Keyword::Disable => Some(false),
                        _ => None,
                    },
                )?)
            }
            Some(Keyword::Lifetime) => {
                self.take_keyword(Keyword::Lifetime)?;
                EspGroupTail::Lifetime(self.dec()?)
            }
            Some(Keyword::Mode) => {
                self.take_keyword(Keyword::Mode)?;
                EspGroupTail::Mode(self.keyword_choice(
                    "'transport' or 'tunnel'",
                    |k| match k {
                        Keyword::Transport => Some(EspMode::Transport),
                        Keyword::Tunnel => Some(EspMode::Tunnel),
                        _ => None,
                    },
                )?)
            }
            Some(Keyword::Pfs) => {
                self.take_keyword(Keyword::Pfs)?;
                EspGroupTail::Pfs(self.pfs()?)
            }
            Some(Keyword::Proposal) => {
                self.take_keyword(Keyword::Proposal)?;
                let number = self.dec()?;
                let tail = match self.peek_keyword() {
                    Some(Keyword::Encryption) => {
                        self.take_keyword(Keyword::Encryption)?;
                        EspProposalTail::Encryption(self.encryption_algorithm()?)
                    }
                    Some(Keyword::Hash) => {
                        self.take_keyword(Keyword::Hash)?;
                        EspProposalTail::Hash(self.hash_algorithm()?)
                    }
                    _ => {
                        return self
                            .no_viable_alternative("'encryption' or 'hash'")
                    }
                };
                EspGroupTail::Proposal(EspProposal { number, tail })
            }
            _ => return self.no_viable_alternative("an ESP group property"),
        };

        Ok(EspGroup { name, tail })
    }

    /// ```ebnf
    /// Pfs ::= 'enable' | 'disable' | DH_GROUP
    /// ```
    fn pfs(&mut self) -> ParseResult<Meta<PfsSetting>> {
        self.keyword_choice("'enable', 'disable' or a DH group", |k| match k {
            Keyword::Enable => Some(PfsSetting::Enable),
            Keyword::Disable => Some(PfsSetting::Disable),
            k => dh_group(k).map(PfsSetting::DhGroup),
        })
    }

    /// ```ebnf
    /// IkeGroup ::= 'ike-group' VARIABLE
    ///              ( 'key-exchange' ('ikev1' | 'ikev2')
    ///              | 'lifetime' DEC
    ///              | 'proposal' DEC ( 'dh-group' DEC
    ///                               | 'encryption' Encryption
    ///                               | 'hash' Hash )
    ///              | NullFiller )
    /// ```
    fn ike_group(&mut self) -> ParseResult<IkeGroup> {
        self.take_keyword(Keyword::IkeGroup)?;
        let name = self.variable()?;

        let tail = match self.peek_keyword() {
            Some(Keyword::KeyExchange) => {
                self.take_keyword(Keyword::KeyExchange)?;
                IkeGroupTail::KeyExchange(self.keyword_choice(
                    "'ikev1' or 'ikev2'",
                    |k| match k {
                        Keyword::Ikev1 => Some(IkeVersion::V1),
                        Keyword::Ikev2 => Some(IkeVersion::V2),
                        _ => None,
                    },
                )?)
            }
            Some(Keyword::Lifetime) => {
                self.take_keyword(Keyword::Lifetime)?;
                IkeGroupTail::Lifetime(self.dec()?)
            }
            Some(Keyword::Proposal) => {
                self.take_keyword(Keyword::Proposal)?;
                let number = self.dec()?;
                let tail = match self.peek_keyword() {
                    Some(Keyword::DhGroup) => {
                        self.take_keyword(Keyword::DhGroup)?;
                        IkeProposalTail::DhGroup(self.dec()?)
                    }
                    Some(Keyword::Encryption) => {
                        self.take_keyword(Keyword::Encryption)?;
                        IkeProposalTail::Encryption(self.encryption_algorithm()?)
                    }
                    Some(Keyword::Hash) => {
                        self.take_keyword(Keyword::Hash)?;
                        IkeProposalTail::Hash(self.hash_algorithm()?)
                    }
                    _ => {
                        return self.no_viable_alternative(
                            "'dh-group', 'encryption' or 'hash'",
                        )
                    }
                };
                IkeGroupTail::Proposal(IkeProposal { number, tail })
            }
            Some(
                Keyword::CloseAction
                | Keyword::DeadPeerDetection
                | Keyword::Ikev2Reauth
                | Keyword::Mobike,
            ) => IkeGroupTail::Null(self.null_filler()?),
            _ => return self.no_viable_alternative("an IKE group property"),
        };

        Ok(IkeGroup { name, tail })
    }
}

/// # Site-to-site peers
impl Parser<'_, '_> {
    /// ```ebnf
    /// SiteToSite ::= 'site-to-site' 'peer' IP_ADDRESS SiteToSiteTail
    /// ```
    fn site_to_site(&mut self) -> ParseResult<SiteToSitePeer> {
        self.take_keyword(Keyword::SiteToSite)?;
        self.take_keyword(Keyword::Peer)?;
        let peer = self.ip_address()?;
        let tail = self.site_to_site_tail()?;
        Ok(SiteToSitePeer { peer, tail })
    }

    /// ```ebnf
    /// SiteToSiteTail ::= 'authentication' Authentication
    ///                  | 'connection-type' ('initiate' | 'respond')
    ///                  | Description
    ///                  | 'ike-group' VARIABLE
    ///                  | 'local-address' IP_ADDRESS
    ///                  | 'vti' ('bind' VARIABLE | 'esp-group' VARIABLE)
    ///                  | NullFiller
    /// ```
    fn site_to_site_tail(&mut self) -> ParseResult<SiteToSiteTail> {
        Ok(match self.peek_keyword() {
            Some(Keyword::Authentication) => {
                self.take_keyword(Keyword::Authentication)?;
                SiteToSiteTail::Authentication(self.authentication()?)
            }
            Some(Keyword::ConnectionType) => {
                self.take_keyword(Keyword::ConnectionType)?;
                SiteToSiteTail::ConnectionType(self.keyword_choice(
                    "'initiate' or 'respond'",
                    |k| match k {
                        Keyword::Initiate => Some(ConnectionType::Initiate),
                        Keyword::Respond => Some(ConnectionType::Respond),
                        _ => None,
                    },
                )?)
            }
            Some(Keyword::Description) => {
                SiteToSiteTail::Description(self.description()?)
            }
            Some(Keyword::IkeGroup) => {
                self.take_keyword(Keyword::IkeGroup)?;
                SiteToSiteTail::IkeGroup(self.variable()?)
            }
            Some(Keyword::LocalAddress) => {
                self.take_keyword(Keyword::LocalAddress)?;
                SiteToSiteTail::LocalAddress(self.ip_address()?)
            }
            Some(Keyword::Vti) => {
                self.take_keyword(Keyword::Vti)?;
                let vti = match self.peek_keyword() {
                    Some(Keyword::Bind) => {
                        self.take_keyword(Keyword::Bind)?;
                        Vti::Bind(self.variable()?)
                    }
                    Some(Keyword::EspGroup) => {
                        self.take_keyword(Keyword::EspGroup)?;
                        Vti::EspGroup(self.variable()?)
                    }
                    _ => {
                        return self
                            .no_viable_alternative("'bind' or 'esp-group'")
                    }
                };
                SiteToSiteTail::Vti(vti)
            }
            // `ikev2-reauth` is also accepted in IKE groups. Both places
            // keep their own dispatch and share the catch-all rule.
            Some(
                Keyword::DefaultEspGroup
                | Keyword::DhcpInterface
                | Keyword::Ikev2Reauth
                | Keyword::Tunnel,
            ) => SiteToSiteTail::Null(self.null_filler()?),
            _ => return self.no_viable_alternative("a site-to-site property"),
        })
    }

    /// Parse the tail of `authentication`
    ///
    /// ```ebnf
    /// Authentication ::= 'id' VARIABLE
    ///                  | 'mode' ('pre-shared-secret' | 'rsa' | 'x509')
    ///                  | 'pre-shared-secret' VARIABLE
    ///                  | 'remote-id' VARIABLE
    ///                  | NullFiller
    /// ```
    ///
    /// `pre-shared-secret` is both a mode and a property. The mode is only
    /// recognized after `mode`, so one token of lookahead is enough.
    fn authentication(&mut self) -> ParseResult<Authentication> {
        Ok(match self.peek_keyword() {
            Some(Keyword::Id) => {
                self.take_keyword(Keyword::Id)?;
                Authentication::Id(self.variable()?)
            }
            Some(Keyword::Mode) => {
                self.take_keyword(Keyword::Mode)?;
                Authentication::Mode(self.keyword_choice(
                    "'pre-shared-secret', 'rsa' or 'x509'",
                    |k| match k {
                        Keyword::PreSharedSecret => {
                            Some(AuthenticationMode::PreSharedSecret)
                        }
                        Keyword::Rsa => Some(AuthenticationMode::Rsa),
                        Keyword::X509 => Some(AuthenticationMode::X509),
                        _ => None,
                    },
                )?)
            }
            Some(Keyword::PreSharedSecret) => {
                self.take_keyword(Keyword::PreSharedSecret)?;
                Authentication::PreSharedSecret(self.variable()?)
            }
            Some(Keyword::RemoteId) => {
                self.take_keyword(Keyword::RemoteId)?;
                Authentication::RemoteId(self.variable()?)
            }
            Some(Keyword::RsaKeyName | Keyword::X509) => {
                Authentication::Null(self.null_filler()?)
            }
            _ => {
                return self
                    .no_viable_alternative("an authentication property")
            }
        })
    }
}

/// The group number of a `dh-groupN` keyword
fn dh_group(keyword: Keyword) -> Option<u8> {
    Some(match keyword {
        Keyword::DhGroup1 => 1,
        Keyword::DhGroup2 => 2,
        Keyword::DhGroup5 => 5,
        Keyword::DhGroup14 => 14,
        Keyword::DhGroup15 => 15,
        Keyword::DhGroup16 => 16,
        Keyword::DhGroup17 => 17,
        Keyword::DhGroup18 => 18,
        Keyword::DhGroup19 => 19,
        Keyword::DhGroup20 => 20,
        Keyword::DhGroup21 => 21,
        Keyword::DhGroup22 => 22,
        Keyword::DhGroup23 => 23,
        Keyword::DhGroup24 => 24,
        Keyword::DhGroup25 => 25,
        Keyword::DhGroup26 => 26,
        Keyword::DhGroup31 => 31,
        Keyword::DhGroup32 => 32,
        _ => return None,
    })
}
