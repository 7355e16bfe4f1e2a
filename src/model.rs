//! Specification model
//!
//! A [`Specification`] defines one sort: the sorts it depends on, the
//! operations of its signature, and the axioms that give those operations
//! meaning. Specifications are only ever built by the parser, so the types
//! here keep their fields private and enforce the load-time invariants in
//! their constructors.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RewriteError, SignatureError};
use crate::term::{Bindings, Term};

/// A typed operation in a signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,
    pub argument_sorts: Vec<String>,
    pub result_sort: String,
}

impl Operation {
    pub fn new(
        name: impl Into<String>,
        argument_sorts: Vec<String>,
        result_sort: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            argument_sorts,
            result_sort: result_sort.into(),
        }
    }

    pub fn arity(&self) -> usize {
        self.argument_sorts.len()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}) -> {}",
            self.name,
            self.argument_sorts.join(", "),
            self.result_sort
        )
    }
}

/// A rewrite rule `pattern = template`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAxiom")]
pub struct Axiom {
    pattern: Term,
    template: Term,
}

impl Axiom {
    /// Rejects patterns with no operation head.
    pub fn new(pattern: Term, template: Term) -> Result<Self, SignatureError> {
        if pattern.is_variable() {
            return Err(SignatureError::VariablePattern(pattern.to_string()));
        }
        Ok(Self { pattern, template })
    }

    pub fn pattern(&self) -> &Term {
        &self.pattern
    }

    pub fn template(&self) -> &Term {
        &self.template
    }

    /// Rewrite `term` if the pattern matches it.
    pub fn apply(&self, term: &Term) -> Result<Option<Term>, RewriteError> {
        let mut bindings = Bindings::new();
        if self.pattern.matches(term, &mut bindings) {
            self.template.substitute(&bindings).map(Some)
        } else {
            Ok(None)
        }
    }
}

#[derive(Deserialize)]
struct RawAxiom {
    pattern: Term,
    template: Term,
}

impl TryFrom<RawAxiom> for Axiom {
    type Error = SignatureError;

    fn try_from(raw: RawAxiom) -> Result<Self, Self::Error> {
        Axiom::new(raw.pattern, raw.template)
    }
}

/// The full definition of one sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSpecification")]
pub struct Specification {
    name: String,
    dependency_sorts: Vec<String>,
    /// Declaration order
    operations: Vec<Operation>,
    axioms: Vec<Axiom>,
}

impl Specification {
    /// Assemble a specification, validating the signature and the axioms.
    ///
    /// Every argument and result sort must be the specification's own name or
    /// a declared dependency, and operation names must be unique. Axiom terms
    /// may only use known sorts, and applications of the own sort must name a
    /// declared operation with its declared arity.
    pub fn new(
        name: impl Into<String>,
        dependency_sorts: Vec<String>,
        operations: Vec<Operation>,
        axioms: Vec<Axiom>,
    ) -> Result<Self, SignatureError> {
        let spec = Self {
            name: name.into(),
            dependency_sorts,
            operations: Vec::with_capacity(operations.len()),
            axioms: Vec::new(),
        }
        .with_operations(operations)?;

        for axiom in &axioms {
            spec.check_term(axiom.pattern())?;
            spec.check_term(axiom.template())?;
        }
        Ok(spec.with_axioms(axioms))
    }

    fn with_operations(mut self, operations: Vec<Operation>) -> Result<Self, SignatureError> {
        for operation in operations {
            self.check_operation(&operation)?;
            self.operations.push(operation);
        }
        Ok(self)
    }

    /// Attach axioms parsed against this signature
    pub(crate) fn with_axioms(mut self, axioms: Vec<Axiom>) -> Self {
        self.axioms = axioms;
        self
    }

    fn check_operation(&self, operation: &Operation) -> Result<(), SignatureError> {
        if self.operation(&operation.name).is_some() {
            return Err(SignatureError::DuplicateOperation(operation.name.clone()));
        }
        if let Some(sort) = operation
            .argument_sorts
            .iter()
            .find(|sort| !self.knows_sort(sort))
        {
            return Err(SignatureError::UnknownArgumentSort {
                operation: operation.name.clone(),
                sort: sort.clone(),
            });
        }
        if !self.knows_sort(&operation.result_sort) {
            return Err(SignatureError::UnknownResultSort {
                operation: operation.name.clone(),
                sort: operation.result_sort.clone(),
            });
        }
        Ok(())
    }

    fn check_term(&self, term: &Term) -> Result<(), SignatureError> {
        if !self.knows_sort(term.sort()) {
            return Err(SignatureError::UndeclaredSort {
                sort: term.sort().to_string(),
                name: term.name().to_string(),
                span: None,
            });
        }
        if term.is_application() {
            self.check_application(term)?;
        }
        term.arguments()
            .iter()
            .try_for_each(|argument| self.check_term(argument))
    }

    /// Operation head and arity of an application of this specification's
    /// own sort. Applications of dependency sorts are left to their own
    /// specification.
    pub(crate) fn check_application(&self, term: &Term) -> Result<(), SignatureError> {
        if term.sort() != self.name {
            return Ok(());
        }
        let operation =
            self.operation(term.name())
                .ok_or_else(|| SignatureError::UnknownOperation {
                    sort: self.name.clone(),
                    operation: term.name().to_string(),
                })?;
        if operation.arity() != term.arguments().len() {
            return Err(SignatureError::ArityMismatch {
                operation: operation.name.clone(),
                expected: operation.arity(),
                found: term.arguments().len(),
            });
        }
        Ok(())
    }

    /// Nullary operation of the own sort called `name`, if declared
    pub fn constant(&self, name: &str) -> Option<&Operation> {
        self.operation(name).filter(|op| op.arity() == 0)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dependency_sorts(&self) -> &[String] {
        &self.dependency_sorts
    }

    /// True for the specification's own sort and its declared dependencies
    pub fn knows_sort(&self, sort: &str) -> bool {
        sort == self.name || self.dependency_sorts.iter().any(|s| s == sort)
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operations.iter().find(|op| op.name == name)
    }

    pub fn axioms(&self) -> &[Axiom] {
        &self.axioms
    }
}

impl fmt::Display for Specification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::serializer::to_text(self))
    }
}

#[derive(Deserialize)]
struct RawSpecification {
    name: String,
    dependency_sorts: Vec<String>,
    operations: Vec<Operation>,
    axioms: Vec<Axiom>,
}

impl TryFrom<RawSpecification> for Specification {
    type Error = SignatureError;

    fn try_from(raw: RawSpecification) -> Result<Self, Self::Error> {
        Specification::new(raw.name, raw.dependency_sorts, raw.operations, raw.axioms)
    }
}

/// A normalized value paired with the sort it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    sort: String,
    term: Term,
}

impl Instance {
    /// Callers are responsible for passing an already normalized term.
    pub(crate) fn new(sort: impl Into<String>, term: Term) -> Self {
        Self {
            sort: sort.into(),
            term,
        }
    }

    pub fn sort(&self) -> &str {
        &self.sort
    }

    pub fn term(&self) -> &Term {
        &self.term
    }

    pub fn into_term(self) -> Term {
        self.term
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.term, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sorts(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_variable_pattern_rejected() {
        let err = Axiom::new(
            Term::variable("X", "Number"),
            Term::constant("zero", "Number"),
        )
        .unwrap_err();
        assert_eq!(err, SignatureError::VariablePattern("Number:X".to_string()));
    }

    #[test]
    fn test_axiom_apply() {
        let axiom = Axiom::new(
            Term::application(
                "pop",
                "Stack",
                vec![Term::application(
                    "push",
                    "Stack",
                    vec![Term::variable("S", "Stack"), Term::variable("X", "Stack")],
                )],
            ),
            Term::variable("S", "Stack"),
        )
        .unwrap();

        let empty = Term::constant("empty", "Stack");
        let pushed = Term::application(
            "pop",
            "Stack",
            vec![Term::application(
                "push",
                "Stack",
                vec![empty.clone(), Term::constant("zero", "Number")],
            )],
        );
        assert_eq!(axiom.apply(&pushed).unwrap(), Some(empty.clone()));
        assert_eq!(axiom.apply(&empty).unwrap(), None);
    }

    #[test]
    fn test_unknown_sorts_rejected() {
        let err = Specification::new(
            "Stack",
            sorts(&["Number"]),
            vec![Operation::new("top", sorts(&["Stack"]), "Elem")],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, SignatureError::UnknownResultSort { ref sort, .. } if sort == "Elem"));

        let err = Specification::new(
            "Stack",
            vec![],
            vec![Operation::new("push", sorts(&["Stack", "Number"]), "Stack")],
            vec![],
        )
        .unwrap_err();
        assert!(
            matches!(err, SignatureError::UnknownArgumentSort { ref sort, .. } if sort == "Number")
        );
    }

    #[test]
    fn test_duplicate_operation_rejected() {
        let err = Specification::new(
            "Number",
            vec![],
            vec![
                Operation::new("zero", vec![], "Number"),
                Operation::new("zero", vec![], "Number"),
            ],
            vec![],
        )
        .unwrap_err();
        assert_eq!(err, SignatureError::DuplicateOperation("zero".to_string()));
    }

    #[test]
    fn test_operations_keep_declaration_order() {
        let spec = Specification::new(
            "Number",
            vec![],
            vec![
                Operation::new("zero", vec![], "Number"),
                Operation::new("inc", sorts(&["Number"]), "Number"),
            ],
            vec![],
        )
        .unwrap();
        let names: Vec<_> = spec.operations().iter().map(|op| op.name.as_str()).collect();
        assert_eq!(names, vec!["zero", "inc"]);
        assert_eq!(spec.operation("inc").map(Operation::arity), Some(1));
        assert_eq!(
            spec.operation("inc").unwrap().to_string(),
            "inc(Number) -> Number"
        );
    }

    #[test]
    fn test_deserialize_rejects_variable_pattern() {
        let json = r#"{
            "pattern": {"kind": "variable", "name": "X", "sort": "Number"},
            "template": {"kind": "application", "operation": "zero", "sort": "Number", "arguments": []}
        }"#;
        let err = serde_json::from_str::<Axiom>(json).unwrap_err();
        assert!(err.to_string().contains("has no operation head"));
    }

    #[test]
    fn test_deserialize_validates_specification() {
        let spec = Specification::new(
            "Number",
            vec![],
            vec![
                Operation::new("zero", vec![], "Number"),
                Operation::new("inc", sorts(&["Number"]), "Number"),
            ],
            vec![Axiom::new(
                Term::application("inc", "Number", vec![Term::variable("X", "Number")]),
                Term::variable("X", "Number"),
            )
            .unwrap()],
        )
        .unwrap();
        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(serde_json::from_str::<Specification>(&json).unwrap(), spec);

        let duplicate = json.replace(r#""name":"inc""#, r#""name":"zero""#);
        let err = serde_json::from_str::<Specification>(&duplicate).unwrap_err();
        assert!(err.to_string().contains("already defined"));

        let unknown = json.replace(r#""result_sort":"Number""#, r#""result_sort":"Elem""#);
        assert!(serde_json::from_str::<Specification>(&unknown).is_err());
    }

    #[test]
    fn test_axioms_checked_against_signature() {
        let operations = || vec![Operation::new("zero", vec![], "Number")];
        let arity = Axiom::new(
            Term::application("zero", "Number", vec![Term::variable("X", "Number")]),
            Term::constant("zero", "Number"),
        )
        .unwrap();
        let err = Specification::new("Number", vec![], operations(), vec![arity]).unwrap_err();
        assert!(matches!(err, SignatureError::ArityMismatch { expected: 0, found: 1, .. }));

        let foreign = Axiom::new(
            Term::constant("zero", "Number"),
            Term::constant("true", "bool"),
        )
        .unwrap();
        let err = Specification::new("Number", vec![], operations(), vec![foreign]).unwrap_err();
        assert_eq!(
            err,
            SignatureError::UndeclaredSort {
                sort: "bool".to_string(),
                name: "true".to_string(),
                span: None,
            }
        );
    }
}
