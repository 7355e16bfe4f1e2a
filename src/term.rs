//! Term model
//!
//! A term is either an operation [`Term::Application`] or a named
//! [`Term::Variable`]. Applications are both pattern heads and concrete
//! values; variables are pattern placeholders, or bare identifiers that no
//! literal transformer claimed.
//!
//! Terms are never mutated after construction. Matching only reads, and
//! substitution and rewriting always build new nodes.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RewriteError;
use crate::extensions::PrettyPrinters;

/// A value or pattern tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Term {
    /// Operation call with ordered arguments.
    Application {
        operation: String,
        sort: String,
        arguments: Vec<Term>,
    },
    /// Pattern placeholder or unresolved identifier.
    Variable { name: String, sort: String },
}

impl Term {
    pub fn application(
        operation: impl Into<String>,
        sort: impl Into<String>,
        arguments: Vec<Term>,
    ) -> Self {
        Term::Application {
            operation: operation.into(),
            sort: sort.into(),
            arguments,
        }
    }

    /// Nullary application, e.g. `zero()`
    pub fn constant(operation: impl Into<String>, sort: impl Into<String>) -> Self {
        Self::application(operation, sort, Vec::new())
    }

    pub fn variable(name: impl Into<String>, sort: impl Into<String>) -> Self {
        Term::Variable {
            name: name.into(),
            sort: sort.into(),
        }
    }

    /// Operation name for applications, variable name otherwise
    pub fn name(&self) -> &str {
        match self {
            Term::Application { operation, .. } => operation,
            Term::Variable { name, .. } => name,
        }
    }

    pub fn sort(&self) -> &str {
        match self {
            Term::Application { sort, .. } | Term::Variable { sort, .. } => sort,
        }
    }

    /// Arguments of an application; empty for variables
    pub fn arguments(&self) -> &[Term] {
        match self {
            Term::Application { arguments, .. } => arguments,
            Term::Variable { .. } => &[],
        }
    }

    pub fn is_application(&self) -> bool {
        matches!(self, Term::Application { .. })
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable { .. })
    }

    /// True if the tree contains no variables
    pub fn is_ground(&self) -> bool {
        match self {
            Term::Application { arguments, .. } => arguments.iter().all(Term::is_ground),
            Term::Variable { .. } => false,
        }
    }

    /// Match `candidate` against this term used as a pattern.
    ///
    /// On failure `bindings` is cleared; a failed match never leaves partial
    /// bindings behind. A variable that occurs twice must bind structurally
    /// identical subterms. Variable sorts are not checked at bind time.
    pub fn matches(&self, candidate: &Term, bindings: &mut Bindings) -> bool {
        let matched = match self {
            Term::Application {
                operation,
                sort,
                arguments,
            } => match candidate {
                Term::Application {
                    operation: other_operation,
                    sort: other_sort,
                    arguments: other_arguments,
                } if sort == other_sort
                    && operation == other_operation
                    && arguments.len() == other_arguments.len() =>
                {
                    arguments
                        .iter()
                        .zip(other_arguments)
                        .all(|(pattern, argument)| pattern.matches(argument, bindings))
                }
                _ => false,
            },
            Term::Variable { name, .. } => match bindings.get(name) {
                Some(bound) => bound.matches(candidate, &mut Bindings::new()),
                None => {
                    bindings.insert(name.clone(), candidate.clone());
                    true
                }
            },
        };

        if !matched {
            bindings.clear();
        }
        matched
    }

    /// Instantiate this term as a template, replacing every variable by a
    /// copy of its binding.
    pub fn substitute(&self, bindings: &Bindings) -> Result<Term, RewriteError> {
        match self {
            Term::Application {
                operation,
                sort,
                arguments,
            } => Ok(Term::Application {
                operation: operation.clone(),
                sort: sort.clone(),
                arguments: arguments
                    .iter()
                    .map(|argument| argument.substitute(bindings))
                    .collect::<Result<_, _>>()?,
            }),
            Term::Variable { name, sort } => {
                bindings
                    .get(name)
                    .cloned()
                    .ok_or_else(|| RewriteError::UnboundVariable {
                        name: name.clone(),
                        sort: sort.clone(),
                    })
            }
        }
    }

    /// Render as `sort:name(arg, ...)`, eliding `sort:` wherever it equals
    /// `omit_sort`.
    pub fn render(&self, omit_sort: Option<&str>) -> String {
        let mut out = String::new();
        self.write_to(&mut out, omit_sort, None);
        out
    }

    /// Render like [`Term::render`], handing applications to the printer
    /// registered for their sort when there is one.
    pub fn render_with(&self, omit_sort: Option<&str>, printers: &PrettyPrinters) -> String {
        let mut out = String::new();
        self.write_to(&mut out, omit_sort, Some(printers));
        out
    }

    fn write_to(&self, out: &mut String, omit_sort: Option<&str>, printers: Option<&PrettyPrinters>) {
        if self.is_application() {
            if let Some(printer) = printers.and_then(|p| p.get(self.sort())) {
                out.push_str(&printer.print(self));
                return;
            }
        }

        if omit_sort != Some(self.sort()) {
            out.push_str(self.sort());
            out.push(':');
        }
        out.push_str(self.name());

        if let Term::Application { arguments, .. } = self {
            out.push('(');
            for (i, argument) in arguments.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                argument.write_to(out, omit_sort, printers);
            }
            out.push(')');
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(None))
    }
}

/// Variable bindings for a single match attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    terms: HashMap<String, Term>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Term> {
        self.terms.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, term: Term) -> Option<Term> {
        self.terms.insert(name.into(), term)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.terms.contains_key(name)
    }

    pub fn clear(&mut self) {
        self.terms.clear();
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn zero() -> Term {
        Term::constant("zero", "Number")
    }

    fn inc(t: Term) -> Term {
        Term::application("inc", "Number", vec![t])
    }

    fn var(name: &str) -> Term {
        Term::variable(name, "Number")
    }

    fn eq(a: Term, b: Term) -> Term {
        Term::application("eq", "Number", vec![a, b])
    }

    #[test]
    fn test_repeated_variable_requires_identical_subterms() {
        let pattern = eq(var("X"), var("X"));

        let mut bindings = Bindings::new();
        assert!(pattern.matches(&eq(zero(), zero()), &mut bindings));
        assert_eq!(bindings.get("X"), Some(&zero()));

        let mut bindings = Bindings::new();
        assert!(!pattern.matches(&eq(zero(), inc(zero())), &mut bindings));
        assert!(bindings.is_empty());
    }

    #[test]
    fn test_failed_match_discards_partial_bindings() {
        let pattern = Term::application("add", "Number", vec![var("X"), zero()]);
        let candidate = Term::application("add", "Number", vec![inc(zero()), inc(zero())]);
        let mut bindings = Bindings::new();
        assert!(!pattern.matches(&candidate, &mut bindings));
        assert!(bindings.is_empty());
    }

    #[test]
    fn test_application_requires_same_sort_and_arity() {
        let mut bindings = Bindings::new();
        assert!(!zero().matches(&Term::constant("zero", "Other"), &mut bindings));
        assert!(!inc(var("X")).matches(&zero(), &mut bindings));
        assert!(!Term::constant("inc", "Number").matches(&inc(zero()), &mut bindings));
    }

    #[test]
    fn test_variable_binds_regardless_of_declared_sort() {
        let mut bindings = Bindings::new();
        let candidate = Term::constant("true", "bool");
        assert!(var("X").matches(&candidate, &mut bindings));
        assert_eq!(bindings.get("X"), Some(&candidate));
    }

    #[test]
    fn test_substitute_copies_bindings() {
        let mut bindings = Bindings::new();
        bindings.insert("X", inc(zero()));
        let template = inc(Term::application("add", "Number", vec![var("X"), var("X")]));
        let result = template.substitute(&bindings).unwrap();
        assert_eq!(
            result,
            inc(Term::application(
                "add",
                "Number",
                vec![inc(zero()), inc(zero())]
            ))
        );
        assert!(result.is_ground());
    }

    #[test]
    fn test_substitute_unbound_variable() {
        let err = var("Y").substitute(&Bindings::new()).unwrap_err();
        assert_eq!(
            err,
            RewriteError::UnboundVariable {
                name: "Y".to_string(),
                sort: "Number".to_string()
            }
        );
    }

    #[test]
    fn test_render_elides_default_sort() {
        let term = Term::application(
            "push",
            "Stack",
            vec![Term::constant("empty", "Stack"), inc(zero())],
        );
        assert_eq!(
            term.render(Some("Stack")),
            "push(empty(), Number:inc(Number:zero()))"
        );
        assert_eq!(
            term.to_string(),
            "Stack:push(Stack:empty(), Number:inc(Number:zero()))"
        );
        assert_eq!(var("X").render(Some("Number")), "X");
        assert_eq!(var("X").render(None), "Number:X");
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(inc(var("X"))).unwrap();
        assert_eq!(json["kind"], "application");
        assert_eq!(json["arguments"][0]["kind"], "variable");
        assert_eq!(json["arguments"][0]["name"], "X");
    }
}
