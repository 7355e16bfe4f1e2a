//! Literal transformers and pretty printers
//!
//! Both are strategies supplied by the host. A [`LiteralTransformer`] gets a
//! chance to replace every bare (non-parenthesized) identifier while an
//! expression is parsed; the first one that accepts wins. A [`PrettyPrinter`]
//! renders values of one sort in a friendlier notation.
//!
//! The stock implementations cover the two sorts almost every specification
//! set starts from: Peano numbers (`Number`) and booleans (`bool`).

use std::collections::HashMap;
use std::fmt;

use crate::term::Term;

/// Replaces a bare identifier with a term, or declines.
pub trait LiteralTransformer {
    /// `terminal` is always a [`Term::Variable`]. Return `None` to decline.
    fn transform(&self, terminal: &Term) -> Option<Term>;
}

/// Renders an application of one sort as text.
///
/// Printers may assume a well-formed value in the sort's canonical shape.
pub trait PrettyPrinter {
    fn print(&self, term: &Term) -> String;
}

/// Transformers in registration order.
#[derive(Default)]
pub struct LiteralTransformers {
    transformers: Vec<Box<dyn LiteralTransformer>>,
}

impl LiteralTransformers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Peano number and boolean literals
    pub fn standard() -> Self {
        let mut transformers = Self::new();
        transformers.push(PeanoLiteral);
        transformers.push(BoolLiteral);
        transformers
    }

    pub fn push(&mut self, transformer: impl LiteralTransformer + 'static) {
        self.transformers.push(Box::new(transformer));
    }

    /// First accepted replacement, if any
    pub fn transform(&self, terminal: &Term) -> Option<Term> {
        self.transformers.iter().find_map(|t| t.transform(terminal))
    }

    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }
}

impl fmt::Debug for LiteralTransformers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiteralTransformers")
            .field("count", &self.transformers.len())
            .finish()
    }
}

/// Printers keyed by sort name.
#[derive(Default)]
pub struct PrettyPrinters {
    printers: HashMap<String, Box<dyn PrettyPrinter>>,
}

impl PrettyPrinters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any printer already registered for `sort`
    pub fn insert(&mut self, sort: impl Into<String>, printer: impl PrettyPrinter + 'static) {
        self.printers.insert(sort.into(), Box::new(printer));
    }

    pub fn remove(&mut self, sort: &str) -> bool {
        self.printers.remove(sort).is_some()
    }

    pub fn get(&self, sort: &str) -> Option<&dyn PrettyPrinter> {
        self.printers.get(sort).map(|p| p.as_ref())
    }

    pub fn contains(&self, sort: &str) -> bool {
        self.printers.contains_key(sort)
    }
}

impl fmt::Debug for PrettyPrinters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sorts: Vec<_> = self.printers.keys().collect();
        sorts.sort();
        f.debug_struct("PrettyPrinters")
            .field("sorts", &sorts)
            .finish()
    }
}

// =============================================================================
// STOCK IMPLEMENTATIONS
// =============================================================================

pub const NUMBER_SORT: &str = "Number";
pub const BOOL_SORT: &str = "bool";

/// Decimal literal `n` becomes `inc(...inc(zero())...)` in sort `Number`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PeanoLiteral;

impl LiteralTransformer for PeanoLiteral {
    fn transform(&self, terminal: &Term) -> Option<Term> {
        let count: u32 = terminal.name().parse().ok()?;
        let mut number = Term::constant("zero", NUMBER_SORT);
        for _ in 0..count {
            number = Term::application("inc", NUMBER_SORT, vec![number]);
        }
        Some(number)
    }
}

/// `true` and `false` become nullary applications in sort `bool`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolLiteral;

impl LiteralTransformer for BoolLiteral {
    fn transform(&self, terminal: &Term) -> Option<Term> {
        match terminal.name() {
            "true" | "false" => Some(Term::constant(terminal.name(), BOOL_SORT)),
            _ => None,
        }
    }
}

/// Renders `inc(...inc(zero())...)` as its decimal count.
#[derive(Debug, Clone, Copy, Default)]
pub struct PeanoPrinter;

impl PrettyPrinter for PeanoPrinter {
    fn print(&self, term: &Term) -> String {
        let mut current = term;
        let mut count = 0u64;
        while current.name() == "inc" && current.arguments().len() == 1 {
            current = &current.arguments()[0];
            count += 1;
        }
        if current.is_application() && current.name() == "zero" {
            count.to_string()
        } else {
            term.render(None)
        }
    }
}

/// Renders a boolean by its operation name.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolPrinter;

impl PrettyPrinter for BoolPrinter {
    fn print(&self, term: &Term) -> String {
        term.name().to_string()
    }
}
