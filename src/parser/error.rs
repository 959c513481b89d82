use std::fmt::Display;

use super::meta::Span;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub location: Span,
    pub kind: ParseErrorKind,
    pub note: Option<String>,
}

impl ParseError {
    pub(super) fn expected(
        expected: impl Display,
        got: impl Display,
        span: Span,
    ) -> Self {
        Self {
            kind: ParseErrorKind::UnexpectedToken {
                expected: expected.to_string(),
                got: got.to_string(),
            },
            location: span,
            note: None,
        }
    }

    pub(super) fn no_viable_alternative(
        expected: impl Display,
        got: impl Display,
        span: Span,
    ) -> Self {
        Self {
            kind: ParseErrorKind::NoViableAlternative {
                expected: expected.to_string(),
                got: got.to_string(),
            },
            location: span,
            note: None,
        }
    }

    pub(super) fn invalid_literal(
        description: impl Display,
        token: impl Display,
        inner: impl Display,
        span: Span,
    ) -> Self {
        Self {
            kind: ParseErrorKind::InvalidLiteral {
                description: description.to_string(),
                token: token.to_string(),
                inner_error: inner.to_string(),
            },
            location: span,
            note: None,
        }
    }

    pub(super) fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self {
            kind,
            location: span,
            note: None,
        }
    }

    pub(super) fn with_note(self, note: impl Into<String>) -> Self {
        Self {
            note: Some(note.into()),
            ..self
        }
    }

    /// Whether this error ends the whole parse instead of a single line
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind,
            ParseErrorKind::MissingSetLine
                | ParseErrorKind::FailedToParseEntireInput
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// No production at a dispatch point starts with the lookahead
    NoViableAlternative { expected: String, got: String },
    /// A leaf rule expected one of a fixed set of tokens
    UnexpectedToken { expected: String, got: String },
    /// The input ended in the middle of a line
    UnterminatedLine,
    /// The lexer could not make sense of the input
    InvalidToken,
    InvalidLiteral {
        description: String,
        token: String,
        inner_error: String,
    },
    /// The input does not contain a single `set` line
    MissingSetLine,
    FailedToParseEntireInput,
}

impl ParseErrorKind {
    pub fn label(&self) -> String {
        match self {
            Self::NoViableAlternative { expected, .. } => {
                format!("expected {expected}")
            }
            Self::UnexpectedToken { expected, .. } => {
                format!("expected {expected}")
            }
            Self::UnterminatedLine => "line is never terminated".into(),
            Self::InvalidToken => "invalid token".into(),
            Self::InvalidLiteral { description, .. } => {
                format!("invalid {description}")
            }
            Self::MissingSetLine => "no `set` line found".into(),
            Self::FailedToParseEntireInput => "parser got stuck here".into(),
        }
    }
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoViableAlternative { expected, got } => {
                write!(f, "no viable alternative at '{got}', expected {expected}")
            }
            Self::UnexpectedToken { expected, got } => {
                write!(f, "expected {expected} but got '{got}'")
            }
            Self::UnterminatedLine => {
                write!(f, "unexpected end of input before end of line")
            }
            Self::InvalidToken => write!(f, "invalid token"),
            Self::InvalidLiteral {
                description,
                token,
                inner_error,
            } => {
                write!(f, "found an invalid {description} literal '{token}': {inner_error}")
            }
            Self::MissingSetLine => {
                write!(f, "configuration does not contain any `set` line")
            }
            Self::FailedToParseEntireInput => {
                write!(f, "failed to parse entire input")
            }
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for ParseError {}
