//! Parser for flattened VyOS configurations
//!
//! The parser is a hand-written recursive descent parser over a
//! [`TokenStream`]. Every rule dispatches on at most a few tokens of
//! lookahead and never backtracks over consumed tokens.
//!
//! Errors are contained per line. When a `set` line fails to parse, the
//! error is recorded, the rest of the line is skipped and parsing continues
//! with the next line. Only structural problems with the file as a whole are
//! fatal.

use crate::ast::{Configuration, Statement};
use token::{Keyword, Token, TokenStream};

use self::meta::{Meta, Span, Spans};

mod error;
mod firewall;
mod interfaces;
mod leaf;
pub mod meta;
mod null;
mod policy;
mod protocols;
mod system;
pub mod token;
mod vpn;

pub use error::{ParseError, ParseErrorKind};

#[cfg(test)]
mod test_firewall;
#[cfg(test)]
mod test_interfaces;
#[cfg(test)]
mod test_recovery;
#[cfg(test)]
mod test_vpn;

type ParseResult<T> = Result<T, Box<ParseError>>;

/// The result of parsing one file
///
/// `configuration` holds every line that parsed, `diagnostics` an error for
/// every line that did not.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParseOutput {
    pub configuration: Configuration,
    pub diagnostics: Vec<ParseError>,
}

pub struct Parser<'source, 'spans> {
    file: usize,
    file_length: usize,
    tokens: TokenStream<'source>,
    /// End of the last consumed token
    last_end: usize,
    pub spans: &'spans mut Spans,
}

/// # Helper methods
///
/// None of these consume a token that does not match. The recovery after a
/// failed line relies on the line terminator still being in the stream.
impl<'source> Parser<'source, '_> {
    /// Look at the next token without consuming it
    ///
    /// Fails at the end of input and on input that could not be lexed.
    fn lookahead(&mut self) -> ParseResult<(Token<'source>, Span)> {
        let file = self.file;
        let end = self.file_length;
        match self.tokens.peek_nth(0) {
            None => Err(ParseError::new(
                ParseErrorKind::UnterminatedLine,
                Span::new(file, end..end),
            )
            .into()),
            Some((Err(()), span)) => Err(ParseError::new(
                ParseErrorKind::InvalidToken,
                Span::new(file, span.clone()),
            )
            .into()),
            Some((Ok(token), span)) => {
                Ok((*token, Span::new(file, span.clone())))
            }
        }
    }

    /// Consume the next token without looking at it
    fn advance(&mut self) {
        if let Some((_, span)) = self.tokens.advance() {
            self.last_end = span.end;
        }
    }

    /// Move the stream forward and return the token
    fn next(&mut self) -> ParseResult<(Token<'source>, Span)> {
        let next = self.lookahead()?;
        self.advance();
        Ok(next)
    }

    /// Peek the token `k` positions ahead
    fn peek_nth(&mut self, k: usize) -> Option<Token<'source>> {
        match self.tokens.peek_nth(k) {
            Some((Ok(token), _)) => Some(*token),
            _ => None,
        }
    }

    fn peek(&mut self) -> Option<Token<'source>> {
        self.peek_nth(0)
    }

    fn peek_is(&mut self, token: Token) -> bool {
        self.peek() == Some(token)
    }

    /// Peek the keyword `k` positions ahead, if that token is a keyword
    fn peek_keyword_nth(&mut self, k: usize) -> Option<Keyword> {
        match self.peek_nth(k) {
            Some(Token::Keyword(keyword)) => Some(keyword),
            _ => None,
        }
    }

    fn peek_keyword(&mut self) -> Option<Keyword> {
        self.peek_keyword_nth(0)
    }

    /// Whether the current line has no tokens left
    fn at_line_end(&mut self) -> bool {
        matches!(self.peek(), Some(Token::Newline) | None)
            && !matches!(self.tokens.peek_nth(0), Some((Err(()), _)))
    }

    /// Move the stream forward if the next token matches the given token
    fn next_is(&mut self, token: Token) -> bool {
        if self.peek_is(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Move the stream forward if the next token is the given keyword
    fn next_is_keyword(&mut self, keyword: Keyword) -> bool {
        self.next_is(Token::Keyword(keyword))
    }

    /// Move the stream forward and assert that it matches the token
    fn take(&mut self, token: Token) -> ParseResult<Span> {
        let (next, span) = self.lookahead()?;
        if next == token {
            self.advance();
            Ok(span)
        } else {
            Err(ParseError::expected(format!("'{token}'"), next, span).into())
        }
    }

    fn take_keyword(&mut self, keyword: Keyword) -> ParseResult<Span> {
        self.take(Token::Keyword(keyword))
    }

    /// Error for a leaf rule that does not accept the next token
    fn unexpected<T>(&mut self, expected: &str) -> ParseResult<T> {
        let (token, span) = self.lookahead()?;
        Err(ParseError::expected(expected, token, span).into())
    }

    /// Error for a dispatch point where no alternative starts with the
    /// next token
    fn no_viable_alternative<T>(&mut self, expected: &str) -> ParseResult<T> {
        let (token, span) = self.lookahead()?;
        Err(ParseError::no_viable_alternative(expected, token, span).into())
    }

    /// The span from `start` up to the end of the last consumed token
    fn span_from(&self, start: Span) -> Span {
        Span::new(self.file, start.start..self.last_end.max(start.end))
    }
}

/// # Parsing the configuration
impl<'source, 'spans> Parser<'source, 'spans> {
    /// Parse a whole configuration file
    ///
    /// Returns an error only if the file as a whole is malformed. Errors in
    /// individual lines end up in [`ParseOutput::diagnostics`].
    pub fn parse(
        file: usize,
        spans: &'spans mut Spans,
        input: &'source str,
    ) -> ParseResult<ParseOutput> {
        Self::parse_tokens(file, spans, input.len(), TokenStream::new(input))
    }

    /// Parse tokens produced by a lexer other than the built-in one
    pub fn parse_tokens(
        file: usize,
        spans: &'spans mut Spans,
        file_length: usize,
        tokens: TokenStream<'source>,
    ) -> ParseResult<ParseOutput> {
        let mut p = Self {
            file,
            file_length,
            tokens,
            last_end: 0,
            spans,
        };
        p.configuration()
    }

    /// Run a single rule on `input`, requiring that it consumes everything
    pub fn run_parser<T>(
        mut parser: impl FnMut(&mut Self) -> ParseResult<T>,
        file: usize,
        spans: &'spans mut Spans,
        input: &'source str,
    ) -> ParseResult<T> {
        let mut p = Self {
            file,
            file_length: input.len(),
            tokens: TokenStream::new(input),
            last_end: 0,
            spans,
        };
        let out = parser(&mut p)?;
        if let Some((_, s)) = p.tokens.advance() {
            return Err(ParseError::new(
                ParseErrorKind::FailedToParseEntireInput,
                Span::new(file, s),
            )
            .into());
        }
        Ok(out)
    }

    /// Parse the top level of a file
    ///
    /// ```ebnf
    /// Configuration ::= NEWLINE* (SetLine NEWLINE*)+ EOF
    /// ```
    ///
    /// Blank lines between set lines are accepted as well.
    fn configuration(&mut self) -> ParseResult<ParseOutput> {
        enum State {
            SkippingBlankLines,
            ReadingStatements,
            TrailingBlankLines,
            Done,
        }

        let mut output = ParseOutput::default();
        let mut seen_set_line = false;
        let mut state = State::SkippingBlankLines;

        loop {
            state = match state {
                State::SkippingBlankLines => {
                    while self.next_is(Token::Newline) {}
                    if self.tokens.peek_nth(0).is_none() {
                        State::Done
                    } else {
                        State::ReadingStatements
                    }
                }
                State::ReadingStatements => {
                    if self.tokens.peek_nth(0).is_none() {
                        State::Done
                    } else if self.peek_is(Token::Newline) {
                        State::TrailingBlankLines
                    } else {
                        if self.peek_is(Token::Keyword(Keyword::Set)) {
                            seen_set_line = true;
                        }
                        match self.set_line() {
                            Ok(line) => output.configuration.lines.push(line),
                            Err(err) => {
                                let skipped = self.recover();
                                log::debug!(
                                    "recovered from `{err}` by skipping {skipped} tokens"
                                );
                                output.diagnostics.push(*err);
                            }
                        }
                        State::ReadingStatements
                    }
                }
                State::TrailingBlankLines => {
                    while self.next_is(Token::Newline) {}
                    if self.tokens.peek_nth(0).is_none() {
                        State::Done
                    } else {
                        State::ReadingStatements
                    }
                }
                State::Done => break,
            };
        }

        if !seen_set_line {
            return Err(ParseError::new(
                ParseErrorKind::MissingSetLine,
                Span::new(self.file, 0..self.file_length),
            )
            .with_note(
                "expected commands as printed by `show configuration commands`",
            )
            .into());
        }

        Ok(output)
    }

    /// Skip the rest of a failed line, including its terminator
    ///
    /// Returns the number of tokens skipped before the terminator.
    fn recover(&mut self) -> usize {
        let mut skipped = 0;
        while let Some((token, span)) = self.tokens.advance() {
            self.last_end = span.end;
            if token == Ok(Token::Newline) {
                break;
            }
            skipped += 1;
        }
        skipped
    }

    /// Parse a single line
    ///
    /// ```ebnf
    /// SetLine ::= 'set' Statement NEWLINE
    /// ```
    fn set_line(&mut self) -> ParseResult<Meta<Statement>> {
        let start = self.take_keyword(Keyword::Set)?;
        let statement = self.statement()?;
        let span = self.span_from(start);
        self.take(Token::Newline)?;
        Ok(self.add_span(span, statement))
    }

    /// Parse the stanza following `set`
    ///
    /// ```ebnf
    /// Statement ::= Firewall | Interfaces | Policy | Protocols
    ///             | System | Vpn | NullFiller
    /// ```
    fn statement(&mut self) -> ParseResult<Statement> {
        let keyword = self.peek_keyword();
        log::trace!("dispatching statement on {keyword:?}");

        Ok(match keyword {
            Some(Keyword::Firewall) => Statement::Firewall(self.firewall()?),
            Some(Keyword::Interfaces) => {
                Statement::Interfaces(self.interfaces()?)
            }
            Some(Keyword::Policy) => Statement::Policy(self.policy()?),
            Some(Keyword::Protocols) => {
                Statement::Protocols(self.protocols()?)
            }
            Some(Keyword::System) => Statement::System(self.system()?),
            Some(Keyword::Vpn) => Statement::Vpn(self.vpn()?),
            Some(
                Keyword::Cluster
                | Keyword::Container
                | Keyword::HighAvailability
                | Keyword::LoadBalancing
                | Keyword::Nat
                | Keyword::Pki
                | Keyword::Qos
                | Keyword::Service
                | Keyword::TrafficPolicy
                | Keyword::Vrf
                | Keyword::ZonePolicy,
            ) => Statement::Null(self.null_filler()?),
            _ => {
                return self.no_viable_alternative("a top-level stanza");
            }
        })
    }
}

impl Parser<'_, '_> {
    fn add_span<T>(&mut self, span: Span, x: T) -> Meta<T> {
        self.spans.add(span, x)
    }
}
