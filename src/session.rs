//! Ad hoc evaluation of statement sequences
//!
//! A [`Session`] evaluates text such as
//!
//! ```text
//! s = push(empty(), 2)
//! t = pop(s)
//! is_empty(t)
//! ```
//!
//! against a registry. Each assignment is instantiated with the variables
//! assigned so far, normalized, and bound; the value of the last statement is
//! returned. Variables persist across calls on the same session.

use tracing::debug;

use crate::error::{ParseError, Result};
use crate::model::Instance;
use crate::parser::{parse_statements, Statement};
use crate::registry::SpecRegistry;
use crate::term::{Bindings, Term};

#[derive(Debug, Default)]
pub struct Session {
    variables: Bindings,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate `input`; unqualified names take `default_sort`.
    pub fn evaluate(
        &mut self,
        registry: &SpecRegistry,
        input: &str,
        default_sort: &str,
    ) -> Result<Instance> {
        let statements = parse_statements(input, default_sort, registry.transformers())?;

        let mut last = None;
        for statement in statements {
            let value = self.evaluate_term(registry, statement.expression())?;
            if let Statement::Assignment { name, .. } = statement {
                debug!("Bound '{}' = {}", name, value);
                self.variables.insert(name, value.term().clone());
            }
            last = Some(value);
        }

        last.ok_or_else(|| ParseError::EmptyInput.into())
    }

    fn evaluate_term(&self, registry: &SpecRegistry, expression: &Term) -> Result<Instance> {
        let term = expression.substitute(&self.variables)?;
        let sort = registry.sort_of(&term);
        let normalized = registry.normalize(term)?;
        Ok(Instance::new(sort, normalized))
    }

    pub fn variable(&self, name: &str) -> Option<&Term> {
        self.variables.get(name)
    }

    /// Forget every assigned variable
    pub fn clear(&mut self) {
        self.variables.clear();
    }
}
