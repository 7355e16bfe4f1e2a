//! Rewrite engine
//!
//! Normalizes a term by applying its specification's axioms until nothing
//! fires. Each pass works per node:
//!
//! 1. A node whose sort is not the current specification's is handed to the
//!    specification registered for its sort. This holds even when the current
//!    specification has no axioms at all.
//! 2. Axioms are scanned in declaration order; the first match replaces the
//!    node and the scan restarts from the first axiom.
//! 3. Once no axiom fires at the node, each argument is normalized under the
//!    specification of its own sort.
//!
//! Passes repeat until one changes nothing, so a normalized term is a fixed
//! point: normalizing it again returns it unchanged.
//!
//! Termination is not guaranteed. An oscillating axiom set rewrites forever
//! unless a [`StepBudget`] bounds the number of axiom firings.

use tracing::{debug, debug_span, trace, warn};

use crate::error::{Result, RewriteError};
use crate::model::Specification;
use crate::registry::SpecRegistry;
use crate::term::Term;

/// Upper bound on axiom firings within one normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepBudget {
    limit: Option<u64>,
    used: u64,
}

impl StepBudget {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn limited(limit: u64) -> Self {
        Self {
            limit: Some(limit),
            used: 0,
        }
    }

    pub fn new(limit: Option<u64>) -> Self {
        Self { limit, used: 0 }
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// Axiom firings so far
    pub fn used(&self) -> u64 {
        self.used
    }

    fn consume(&mut self, sort: &str) -> std::result::Result<(), RewriteError> {
        if let Some(limit) = self.limit {
            if self.used >= limit {
                warn!("Rewrite step limit {} reached in sort '{}'", limit, sort);
                return Err(RewriteError::StepLimitExceeded {
                    sort: sort.to_string(),
                    limit,
                });
            }
        }
        self.used += 1;
        Ok(())
    }
}

/// Applies axioms from a registry's specifications.
pub struct Rewriter<'r> {
    registry: &'r SpecRegistry,
    budget: StepBudget,
}

impl<'r> Rewriter<'r> {
    pub fn new(registry: &'r SpecRegistry, budget: StepBudget) -> Self {
        Self { registry, budget }
    }

    pub fn budget(&self) -> &StepBudget {
        &self.budget
    }

    /// Normalize `term` under `spec`, delegating subterms of other sorts.
    pub fn normalize(&mut self, term: Term, spec: &Specification) -> Result<Term> {
        let mut term = term;
        loop {
            let (next, changed) = self.pass(term, spec)?;
            if !changed {
                return Ok(next);
            }
            term = next;
        }
    }

    /// One top-down pass. Returns the new term and whether any axiom fired.
    fn pass(&mut self, term: Term, spec: &Specification) -> Result<(Term, bool)> {
        let registry = self.registry;
        let _span = debug_span!("normalize", sort = spec.name()).entered();

        let mut term = term;
        let mut changed = false;

        loop {
            if term.sort() != spec.name() {
                let owner = registry.lookup(term.sort())?;
                let (term, delegated) = self.pass(term, owner)?;
                return Ok((term, changed || delegated));
            }
            match self.rewrite_node(&term, spec)? {
                Some(next) => {
                    term = next;
                    changed = true;
                }
                None => break,
            }
        }

        if let Term::Application {
            operation,
            sort,
            arguments,
        } = term
        {
            let mut normalized = Vec::with_capacity(arguments.len());
            for argument in arguments {
                let owner = registry.lookup(argument.sort())?;
                let (argument, argument_changed) = self.pass(argument, owner)?;
                changed |= argument_changed;
                normalized.push(argument);
            }
            term = Term::Application {
                operation,
                sort,
                arguments: normalized,
            };
        }

        Ok((term, changed))
    }

    /// First axiom that matches the node, applied.
    fn rewrite_node(&mut self, term: &Term, spec: &Specification) -> Result<Option<Term>> {
        for (index, axiom) in spec.axioms().iter().enumerate() {
            trace!("Trying axiom {} of '{}' on {}", index, spec.name(), term);
            if let Some(next) = axiom.apply(term)? {
                self.budget.consume(spec.name())?;
                debug!("Axiom {} of '{}' rewrote {} to {}", index, spec.name(), term, next);
                return Ok(Some(next));
            }
        }
        Ok(None)
    }
}
