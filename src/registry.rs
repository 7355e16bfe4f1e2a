//! Specification registry and operation dispatch
//!
//! Handles:
//! - Loading specifications from DSL text and registering them by sort name
//! - Resolving sorts for the rewrite engine
//! - Dispatching operation calls with signature checks, normalizing results
//! - The pretty-printer and literal-transformer tables
//!
//! The registry is an ordinary value owned by the host; nothing here is
//! global. It is not synchronized, so a host sharing one across threads must
//! serialize access to it.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::{DispatchError, RegistryError, Result};
use crate::extensions::{LiteralTransformer, LiteralTransformers, PrettyPrinter, PrettyPrinters};
use crate::model::{Instance, Specification};
use crate::parser::parse_specification_with;
use crate::rewrite::Rewriter;
use crate::serializer;
use crate::term::Term;

/// Registry of loaded specifications, keyed by sort name.
#[derive(Debug, Default)]
pub struct SpecRegistry {
    specs: HashMap<String, Specification>,
    printers: PrettyPrinters,
    transformers: LiteralTransformers,
    config: EngineConfig,
}

impl SpecRegistry {
    /// Create empty registry
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ------------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------------

    /// Parse `input` and register the result under its sort name.
    pub fn load(&mut self, input: &str) -> Result<&Specification> {
        self.load_with(input, &LiteralTransformers::new())
    }

    /// Like [`SpecRegistry::load`], offering bare identifiers in axioms to
    /// `transformers`.
    pub fn load_with(
        &mut self,
        input: &str,
        transformers: &LiteralTransformers,
    ) -> Result<&Specification> {
        let spec = parse_specification_with(input, transformers)?;
        Ok(self.register(spec))
    }

    /// Register a parsed specification, replacing any with the same name.
    pub fn register(&mut self, spec: Specification) -> &Specification {
        info!(
            "Registering sort '{}': {} operations, {} axioms",
            spec.name(),
            spec.operations().len(),
            spec.axioms().len()
        );
        match self.specs.entry(spec.name().to_string()) {
            Entry::Occupied(mut entry) => {
                warn!("Replacing previously loaded sort '{}'", entry.key());
                entry.insert(spec);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(spec),
        }
    }

    /// Remove a specification. Returns false if it was not loaded.
    pub fn unload(&mut self, name: &str) -> bool {
        let removed = self.specs.remove(name).is_some();
        if removed {
            info!("Unloaded sort '{}'", name);
        }
        removed
    }

    pub fn lookup(&self, name: &str) -> std::result::Result<&Specification, RegistryError> {
        self.specs
            .get(name)
            .ok_or_else(|| RegistryError::SortNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.specs.contains_key(name)
    }

    /// Registered sort names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.specs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// DSL text of a registered specification
    pub fn to_text(&self, name: &str) -> Result<String> {
        Ok(serializer::to_text(self.lookup(name)?))
    }

    // ------------------------------------------------------------------------
    // Extension tables
    // ------------------------------------------------------------------------

    pub fn add_pretty_printer(
        &mut self,
        sort: impl Into<String>,
        printer: impl PrettyPrinter + 'static,
    ) {
        self.printers.insert(sort, printer);
    }

    pub fn remove_pretty_printer(&mut self, sort: &str) -> bool {
        self.printers.remove(sort)
    }

    pub fn printers(&self) -> &PrettyPrinters {
        &self.printers
    }

    /// Transformers used by ad hoc expression parsing, in registration order
    pub fn add_literal_transformer(&mut self, transformer: impl LiteralTransformer + 'static) {
        self.transformers.push(transformer);
    }

    pub fn transformers(&self) -> &LiteralTransformers {
        &self.transformers
    }

    /// Render a term, using pretty printers when the config enables them.
    pub fn render(&self, term: &Term, omit_sort: Option<&str>) -> String {
        if self.config.pretty_print {
            term.render_with(omit_sort, &self.printers)
        } else {
            term.render(omit_sort)
        }
    }

    // ------------------------------------------------------------------------
    // Normalization and dispatch
    // ------------------------------------------------------------------------

    fn rewriter(&self) -> Rewriter<'_> {
        Rewriter::new(self, self.config.step_budget())
    }

    /// Normalize a term under the specification of its own sort.
    pub fn normalize(&self, term: Term) -> Result<Term> {
        let spec = self.lookup(term.sort())?;
        self.rewriter().normalize(term, spec)
    }

    /// Normalize a term under `spec`, delegating mismatched sorts.
    pub fn normalize_in(&self, term: Term, spec: &Specification) -> Result<Term> {
        self.rewriter().normalize(term, spec)
    }

    /// Sort of the value a term denotes: the declared result sort when the
    /// head is a known operation, the term's own sort otherwise.
    pub fn sort_of(&self, term: &Term) -> String {
        if term.is_application() {
            if let Some(operation) = self
                .specs
                .get(term.sort())
                .and_then(|spec| spec.operation(term.name()))
            {
                return operation.result_sort.clone();
            }
        }
        term.sort().to_string()
    }

    /// Call `operation` on the specification registered for `sort`.
    pub fn call(&self, sort: &str, operation: &str, arguments: &[Instance]) -> Result<Instance> {
        let spec = self.lookup(sort)?;
        self.dispatch(spec, operation, arguments)
    }

    /// Call `operation` with `receiver` as the implicit first argument,
    /// dispatched on the receiver's own sort.
    pub fn call_on(
        &self,
        receiver: &Instance,
        operation: &str,
        arguments: &[Instance],
    ) -> Result<Instance> {
        let mut all = Vec::with_capacity(arguments.len() + 1);
        all.push(receiver.clone());
        all.extend_from_slice(arguments);
        self.call(receiver.sort(), operation, &all)
    }

    /// Check the call against the operation's signature, build the
    /// application and normalize it. Nothing is built if a check fails.
    pub fn dispatch(
        &self,
        spec: &Specification,
        operation: &str,
        arguments: &[Instance],
    ) -> Result<Instance> {
        let op = spec
            .operation(operation)
            .ok_or_else(|| DispatchError::UnknownOperation {
                sort: spec.name().to_string(),
                operation: operation.to_string(),
            })?;

        if arguments.len() != op.arity() {
            return Err(DispatchError::ArityMismatch {
                operation: op.name.clone(),
                expected: op.arity(),
                found: arguments.len(),
            }
            .into());
        }

        for (position, (expected, argument)) in op.argument_sorts.iter().zip(arguments).enumerate()
        {
            if argument.sort() != expected.as_str() {
                return Err(DispatchError::ArgumentSortMismatch {
                    operation: op.name.clone(),
                    position,
                    expected: expected.clone(),
                    found: argument.sort().to_string(),
                }
                .into());
            }
        }

        let result_spec = self.lookup(&op.result_sort)?;
        let term = Term::application(
            op.name.clone(),
            spec.name(),
            arguments.iter().map(|a| a.term().clone()).collect(),
        );
        let normalized = self.normalize_in(term, result_spec)?;

        debug!(
            "Called {}:{} -> {}",
            spec.name(),
            op.name,
            self.render(&normalized, None)
        );

        Ok(Instance::new(op.result_sort.clone(), normalized))
    }
}
