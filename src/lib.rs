use std::io::{BufRead, Write};
use std::sync::Once;

use thiserror::Error;

pub mod ast;
pub mod interpreter;
pub mod lexer;
pub mod memory;
pub mod parser;
pub mod token;
pub mod token_queue;

use ast::Program;
use interpreter::{ExecutionError, Executor};
use memory::Memory;
use parser::{GraphError, SyntaxError};

/// Any failure that ends a run. Displays as the one-line diagnostic shown to
/// the user.
#[derive(Debug, Error)]
pub enum Diagnostic {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

/// Validates `source` and builds its program graph.
pub fn compile(source: &str) -> Result<Program, Diagnostic> {
    let tokens = parser::parse(source)?;
    Ok(parser::graph::build(tokens)?)
}

/// Compiles and executes `source` against a fresh store. `input()` reads
/// lines from `input`; program text goes to `output`.
pub fn run<R: BufRead, W: Write>(source: &str, input: R, output: W) -> Result<Memory, Diagnostic> {
    let program = compile(source)?;
    let mut memory = Memory::new();
    Executor::new(&mut memory, input, output).execute(&program)?;
    Ok(memory)
}

static TRACING_INIT: Once = Once::new();

/// Installs a stderr `tracing` subscriber when `RUST_LOG` is set.
///
/// Enable with `RUST_LOG=nupy=debug`, or `RUST_LOG=nupy=trace` to also see
/// every matched token and store growth.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;
    use crate::memory::Value;

    fn run_source(source: &str) -> (Result<Memory, Diagnostic>, String) {
        let mut output = Vec::new();
        let result = run(source, &b""[..], &mut output);
        (result, String::from_utf8(output).expect("utf-8 output"))
    }

    #[test]
    fn runs_to_completion_and_returns_the_store() {
        let (result, output) = run_source(indoc! {"
            a = 2
            b = a ** 3
            print(b)
        "});
        let memory = result.expect("run failed");
        assert_eq!(output, "8\n");
        assert_eq!(memory.read_by_name("b"), Ok(Value::Int(8)));
    }

    #[test]
    fn syntax_errors_stop_before_execution() {
        let (result, output) = run_source("print(1)\nx = = 2\n");
        let diagnostic = result.expect_err("expected diagnostic");
        assert!(matches!(diagnostic, Diagnostic::Syntax(_)));
        assert_eq!(
            diagnostic.to_string(),
            "**SYNTAX ERROR @ (2,5): expecting unary expression, found '='"
        );
        assert_eq!(output, "");
    }

    #[test]
    fn execution_errors_keep_earlier_output() {
        let (result, output) = run_source("print(1)\nprint(q)\n");
        let diagnostic = result.expect_err("expected diagnostic");
        assert!(matches!(diagnostic, Diagnostic::Execution(_)));
        assert_eq!(output, "1\n");
    }

    #[test]
    fn compile_yields_program_graph() {
        let program = compile("x = 1\nprint(x)\n").expect("compile failed");
        assert_eq!(program.len(), 2);
        assert!(program.entry.is_some());
    }
}
