//! Error taxonomy
//!
//! One enum per phase (lexing, parsing, signature checking, dispatch, registry
//! lookup, rewriting) plus [`AdtError`], which wraps them so callers can use
//! `?` across phase boundaries. Nothing here is recovered internally: every
//! error surfaces to the caller of the operation that raised it.

use thiserror::Error;

use crate::lexer::Span;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, AdtError>;

// =============================================================================
// PHASE ERRORS
// =============================================================================

/// Errors raised while splitting DSL text into tokens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("Too many type qualifiers in identifier '{text}' at {span}")]
    TooManyQualifiers { text: String, span: Span },

    #[error("Empty sort or name in qualified identifier '{text}' at {span}")]
    EmptyQualifier { text: String, span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::TooManyQualifiers { span, .. } | LexError::EmptyQualifier { span, .. } => {
                *span
            }
        }
    }
}

/// Grammar errors: the token at a decision point was not one the parser accepts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Expected {expected}, got '{found}' at {span}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("Expected {expected}, but reached end of input")]
    UnexpectedEof { expected: String },

    #[error("No statements to evaluate")]
    EmptyInput,
}

impl ParseError {
    pub fn unexpected(expected: impl Into<String>, found: impl Into<String>, span: Span) -> Self {
        Self::UnexpectedToken {
            expected: expected.into(),
            found: found.into(),
            span,
        }
    }

    pub fn eof(expected: impl Into<String>) -> Self {
        Self::UnexpectedEof {
            expected: expected.into(),
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::UnexpectedToken { span, .. } => Some(*span),
            ParseError::UnexpectedEof { .. } | ParseError::EmptyInput => None,
        }
    }
}

/// Load-time signature errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Error in operation '{operation}': argument sort '{sort}' is unknown")]
    UnknownArgumentSort { operation: String, sort: String },

    #[error("Error in operation '{operation}': result sort '{sort}' is unknown")]
    UnknownResultSort { operation: String, sort: String },

    #[error("Sort of identifier '{sort}:{name}' is not declared in sorts")]
    UndeclaredSort {
        sort: String,
        name: String,
        span: Option<Span>,
    },

    #[error("Operation '{0}' is already defined")]
    DuplicateOperation(String),

    #[error("Axiom pattern '{0}' has no operation head")]
    VariablePattern(String),

    #[error("Unknown operation '{operation}' in axiom of sort '{sort}'")]
    UnknownOperation { sort: String, operation: String },

    #[error("Wrong number of arguments in axiom for operation '{operation}', expected {expected} got {found}")]
    ArityMismatch {
        operation: String,
        expected: usize,
        found: usize,
    },
}

/// Call-time dispatch errors. None of them constructs a result term.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Operation '{operation}' not supported by sort '{sort}'")]
    UnknownOperation { sort: String, operation: String },

    #[error("Wrong number of arguments ({found} vs. {expected}) in call to '{operation}'")]
    ArityMismatch {
        operation: String,
        expected: usize,
        found: usize,
    },

    #[error("Incompatible sort of argument {position} in call to '{operation}', expected '{expected}' got '{found}'")]
    ArgumentSortMismatch {
        operation: String,
        position: usize,
        expected: String,
        found: String,
    },
}

/// Lookup of a sort with no registered specification.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Undefined sort '{0}'")]
    SortNotFound(String),
}

/// Errors raised while applying axioms.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RewriteError {
    #[error("Variable '{name}' of sort '{sort}' is not bound")]
    UnboundVariable { name: String, sort: String },

    #[error("Rewrite step limit of {limit} exceeded while normalizing sort '{sort}'")]
    StepLimitExceeded { sort: String, limit: u64 },
}

// =============================================================================
// CRATE ERROR
// =============================================================================

/// Any error the engine reports to a caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdtError {
    #[error("Lexical error: {0}")]
    Lex(#[from] LexError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Signature error: {0}")]
    Signature(#[from] SignatureError),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Rewrite error: {0}")]
    Rewrite(#[from] RewriteError),
}

impl AdtError {
    /// Source span of the offending token, for errors raised while reading text.
    pub fn span(&self) -> Option<Span> {
        match self {
            AdtError::Lex(e) => Some(e.span()),
            AdtError::Parse(e) => e.span(),
            AdtError::Signature(SignatureError::UndeclaredSort { span, .. }) => *span,
            _ => None,
        }
    }
}
