//! Editor-facing diagnostics
//!
//! Flattens any [`AdtError`] into a serializable record with a stable code
//! and, for errors raised while reading text, a line/column range.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{
    AdtError, DispatchError, LexError, ParseError, RegistryError, RewriteError, SignatureError,
};
use crate::lexer::Span;

/// Diagnostic codes, one per error kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticCode {
    // =========================================================================
    // Lexical and grammar errors
    // =========================================================================
    MalformedQualifier,
    UnexpectedToken,
    UnexpectedEof,
    EmptyInput,

    // =========================================================================
    // Signature errors
    // =========================================================================
    UnknownSort,
    DuplicateOperation,
    VariablePattern,
    UnknownOperation,
    ArityMismatch,

    // =========================================================================
    // Call-time errors
    // =========================================================================
    ArgumentSortMismatch,
    SortNotFound,
    UnboundVariable,
    StepLimitExceeded,
}

impl DiagnosticCode {
    pub fn of(error: &AdtError) -> Self {
        match error {
            AdtError::Lex(LexError::TooManyQualifiers { .. } | LexError::EmptyQualifier { .. }) => {
                DiagnosticCode::MalformedQualifier
            }
            AdtError::Parse(ParseError::UnexpectedToken { .. }) => DiagnosticCode::UnexpectedToken,
            AdtError::Parse(ParseError::UnexpectedEof { .. }) => DiagnosticCode::UnexpectedEof,
            AdtError::Parse(ParseError::EmptyInput) => DiagnosticCode::EmptyInput,
            AdtError::Signature(
                SignatureError::UnknownArgumentSort { .. }
                | SignatureError::UnknownResultSort { .. }
                | SignatureError::UndeclaredSort { .. },
            ) => DiagnosticCode::UnknownSort,
            AdtError::Signature(SignatureError::DuplicateOperation(_)) => {
                DiagnosticCode::DuplicateOperation
            }
            AdtError::Signature(SignatureError::VariablePattern(_)) => DiagnosticCode::VariablePattern,
            AdtError::Signature(SignatureError::UnknownOperation { .. })
            | AdtError::Dispatch(DispatchError::UnknownOperation { .. }) => {
                DiagnosticCode::UnknownOperation
            }
            AdtError::Signature(SignatureError::ArityMismatch { .. })
            | AdtError::Dispatch(DispatchError::ArityMismatch { .. }) => DiagnosticCode::ArityMismatch,
            AdtError::Dispatch(DispatchError::ArgumentSortMismatch { .. }) => {
                DiagnosticCode::ArgumentSortMismatch
            }
            AdtError::Registry(RegistryError::SortNotFound(_)) => DiagnosticCode::SortNotFound,
            AdtError::Rewrite(RewriteError::UnboundVariable { .. }) => DiagnosticCode::UnboundVariable,
            AdtError::Rewrite(RewriteError::StepLimitExceeded { .. }) => {
                DiagnosticCode::StepLimitExceeded
            }
        }
    }
}

/// 1-based line/column range in the text that was read
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl SourceSpan {
    pub fn new(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Resolve a token span against the text it was lexed from
    pub fn locate(source: &str, span: Span) -> Self {
        let (start_line, start_col) = line_col(source, span.start);
        let (end_line, end_col) = line_col(source, span.end);
        Self::new(start_line, start_col, end_line, end_col)
    }
}

/// Line and column of a byte offset; columns count characters.
fn line_col(source: &str, offset: usize) -> (u32, u32) {
    let before = source.get(..offset.min(source.len())).unwrap_or(source);
    let line_start = before.rfind('\n').map_or(0, |newline| newline + 1);
    let line = before.matches('\n').count() + 1;
    let col = before[line_start..].chars().count() + 1;
    (line as u32, col as u32)
}

/// An error flattened for editors: stable code, message, optional location
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub message: String,
    pub span: Option<SourceSpan>,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            span: None,
        }
    }

    pub fn with_span(mut self, span: SourceSpan) -> Self {
        self.span = Some(span);
        self
    }

    /// Diagnostic for an engine error. `source` is the text that was being
    /// read, if any; it is needed to turn byte spans into lines and columns.
    pub fn from_error(error: &AdtError, source: Option<&str>) -> Self {
        let diagnostic = Self::new(DiagnosticCode::of(error), error.to_string());
        match (error.span(), source) {
            (Some(span), Some(source)) => diagnostic.with_span(SourceSpan::locate(source, span)),
            _ => diagnostic,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.span {
            Some(span) => write!(
                f,
                "error[{:?}] {}:{}: {}",
                self.code, span.start_line, span.start_col, self.message
            ),
            None => write!(f, "error[{:?}]: {}", self.code, self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_specification;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_line_col() {
        let source = "type: A\nsorts:\n  x";
        assert_eq!(line_col(source, 0), (1, 1));
        assert_eq!(line_col(source, 8), (2, 1));
        assert_eq!(line_col(source, 17), (3, 3));
        assert_eq!(line_col(source, 99), (3, 4));
    }

    #[test]
    fn test_columns_count_characters() {
        let source = "type: Größe sorts: x:y:z";
        let span = Span::new(21, 26);
        assert_eq!(&source[span.start..span.end], "x:y:z");
        assert_eq!(SourceSpan::locate(source, span), SourceSpan::new(1, 20, 1, 25));
    }

    #[test]
    fn test_from_parse_error() {
        let source = "type: A\nsorts:\noperations:\n  a() A\naxioms:";
        let err = parse_specification(source).unwrap_err();
        let diagnostic = Diagnostic::from_error(&err, Some(source));

        assert_eq!(diagnostic.code, DiagnosticCode::UnexpectedToken);
        assert_eq!(diagnostic.span, Some(SourceSpan::new(4, 7, 4, 8)));
        assert!(diagnostic.to_string().starts_with("error[UnexpectedToken] 4:7:"));
    }

    #[test]
    fn test_from_error_without_span() {
        let err = AdtError::from(RegistryError::SortNotFound("Queue".to_string()));
        let diagnostic = Diagnostic::from_error(&err, Some("irrelevant"));
        assert_eq!(diagnostic.code, DiagnosticCode::SortNotFound);
        assert_eq!(diagnostic.span, None);
        assert_eq!(
            diagnostic.to_string(),
            "error[SortNotFound]: Registry error: Undefined sort 'Queue'"
        );
    }

    #[test]
    fn test_serializes_for_editors() {
        let source = "type: a:b:c";
        let err = parse_specification(source).unwrap_err();
        let json = serde_json::to_value(Diagnostic::from_error(&err, Some(source))).unwrap();
        assert_eq!(json["code"], "MalformedQualifier");
        assert_eq!(json["span"]["start_col"], 7);
        assert_eq!(json["span"]["end_col"], 12);
    }
}
