//! adt-spec: algebraic abstract data types defined in a text DSL
//!
//! A specification names a sort, the sorts it depends on, a signature of
//! operations and a list of axioms (`pattern = template` rewrite rules).
//! Calling an operation builds a term and rewrites it to normal form, so the
//! axioms alone define the behavior of the type.
//!
//! This crate contains:
//! - Hand-written tokenizer and recursive-descent parser for the DSL
//! - Term model with matching and substitution
//! - Rewrite engine with cross-sort delegation and an optional step budget
//! - Registry of loaded specifications with checked operation dispatch
//! - Serializer back to DSL text
//! - Literal transformers and pretty printers (Peano numbers, booleans)
//! - Statement evaluation sessions
//! - Diagnostics and YAML/environment configuration
//!
//! ```
//! use adt_spec::SpecRegistry;
//!
//! let mut registry = SpecRegistry::new();
//! registry
//!     .load(
//!         "type: Number
//!          sorts:
//!          operations:
//!              zero() -> Number
//!              inc(Number) -> Number
//!              add(Number, Number) -> Number
//!          axioms:
//!              add(zero(), Y) = Y
//!              add(inc(X), Y) = inc(add(X, Y))",
//!     )
//!     .unwrap();
//!
//! let zero = registry.call("Number", "zero", &[]).unwrap();
//! let one = registry.call_on(&zero, "inc", &[]).unwrap();
//! let two = registry.call("Number", "add", &[one.clone(), one]).unwrap();
//! assert_eq!(two.to_string(), "Number:inc(Number:inc(Number:zero()))");
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod extensions;
pub mod lexer;
pub mod model;
pub mod parser;
pub mod registry;
pub mod rewrite;
pub mod serializer;
pub mod session;
pub mod term;

// Re-export commonly used types
pub use config::EngineConfig;
pub use diagnostics::{Diagnostic, DiagnosticCode, SourceSpan};
pub use error::{
    AdtError, DispatchError, LexError, ParseError, RegistryError, Result, RewriteError,
    SignatureError,
};
pub use extensions::{
    BoolLiteral, BoolPrinter, LiteralTransformer, LiteralTransformers, PeanoLiteral,
    PeanoPrinter, PrettyPrinter, PrettyPrinters,
};
pub use lexer::{Span, Token, TokenKind, Tokenizer};
pub use model::{Axiom, Instance, Operation, Specification};
pub use parser::{
    parse_expression, parse_specification, parse_specification_with, parse_statements, Statement,
};
pub use registry::SpecRegistry;
pub use rewrite::{Rewriter, StepBudget};
pub use serializer::to_text;
pub use session::Session;
pub use term::{Bindings, Term};
