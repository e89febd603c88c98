#![allow(dead_code)]
use std::path::Path;

use nupy::ast::Program;
use test_support::bench_cases;

/// `(label, source)` for every case marked for benchmarking.
pub fn workloads() -> Vec<(String, String)> {
    bench_cases(Path::new("tests/programs"))
        .unwrap_or_else(|err| panic!("load bench cases: {err:#}"))
        .into_iter()
        .map(|case| {
            let source = case
                .source()
                .unwrap_or_else(|err| panic!("read {}: {err:#}", case.name));
            (case.name, source)
        })
        .collect()
}

pub fn load_program(source: &str) -> Program {
    nupy::compile(source).unwrap_or_else(|err| panic!("compile: {err}"))
}
