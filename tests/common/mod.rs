//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::path::PathBuf;

use adt_spec::{BoolPrinter, Instance, PeanoPrinter, SpecRegistry};

pub const FIXTURES: [&str; 4] = ["number", "bool", "stack", "queue"];

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

pub fn fixture(name: &str) -> String {
    let path = fixtures_dir().join(format!("{}.adt", name));
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {}: {}", path.display(), e))
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("adt_spec=debug")
        .with_test_writer()
        .try_init();
}

/// Registry with every fixture loaded and the stock printers installed
pub fn registry() -> SpecRegistry {
    init_tracing();
    let mut registry = SpecRegistry::new();
    for name in FIXTURES {
        registry.load(&fixture(name)).expect("load fixture");
    }
    registry.add_pretty_printer("Number", PeanoPrinter);
    registry.add_pretty_printer("bool", BoolPrinter);
    registry
}

/// `n` built by dispatching `zero` and `inc`
pub fn number(registry: &SpecRegistry, n: u32) -> Instance {
    let mut value = registry.call("Number", "zero", &[]).expect("zero");
    for _ in 0..n {
        value = registry.call_on(&value, "inc", &[]).expect("inc");
    }
    value
}
