use crate::ast::CatchAll;

use super::{token::Token, ParseResult, Parser};

impl Parser<'_, '_> {
    /// Accept an unmodeled stanza
    ///
    /// ```ebnf
    /// NullFiller ::= KEYWORD (~NEWLINE)*
    /// ```
    ///
    /// Consumes the keyword that selected this rule and every token after it
    /// up to, but not including, the line terminator. Tokens the lexer could
    /// not make sense of are skipped as well. A missing terminator is left
    /// for the caller to report.
    pub(super) fn null_filler(&mut self) -> ParseResult<CatchAll> {
        let (token, span) = self.lookahead()?;
        let Token::Keyword(keyword) = token else {
            return self.unexpected("a keyword");
        };
        self.advance();
        let keyword = self.add_span(span, keyword);

        let mut discarded = 0;
        loop {
            match self.tokens.peek_nth(0) {
                None | Some((Ok(Token::Newline), _)) => break,
                Some(_) => {
                    self.advance();
                    discarded += 1;
                }
            }
        }

        Ok(CatchAll { keyword, discarded })
    }
}
