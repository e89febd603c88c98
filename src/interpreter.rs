//! Tree-walking executor over the program graph.
//!
//! Execution is a loop over statement ids: each step runs one statement
//! against the variable store and picks the successor, so a `while` body
//! re-enters its header through the graph's back-edge instead of through
//! recursion. The first error stops the run; writes already made stay in
//! the store.

use std::io::{BufRead, Write};

use tracing::debug;

use crate::ast::{
    AssignValue, Element, Expression, FunctionCall, Operand, Program, StatementKind, StmtId,
    UnaryOperator,
};
use crate::memory::{Memory, Value};

mod binary;
mod builtins;
mod error;

use builtins::BuiltinFunction;
pub use error::ExecutionError;

/// Runs programs against a borrowed store, reading `input()` lines from
/// `input` and writing `print`/prompt text to `output`.
pub struct Executor<'m, R, W> {
    memory: &'m mut Memory,
    input: R,
    output: W,
}

impl<'m, R: BufRead, W: Write> Executor<'m, R, W> {
    pub fn new(memory: &'m mut Memory, input: R, output: W) -> Self {
        Self {
            memory,
            input,
            output,
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(statements = program.len()))]
    pub fn execute(&mut self, program: &Program) -> Result<(), ExecutionError> {
        let mut current = program.entry;
        while let Some(id) = current {
            current = self.step(program, id)?;
        }
        self.output.flush()?;
        Ok(())
    }

    fn step(&mut self, program: &Program, id: StmtId) -> Result<Option<StmtId>, ExecutionError> {
        let statement = program.statement(id).ok_or_else(|| {
            ExecutionError::internal(format!("statement {} is not in the program", id.0))
        })?;
        let line = statement.line;
        debug!(id = id.0, line, kind = statement.kind.label(), "executing");

        match &statement.kind {
            StatementKind::Assignment {
                target,
                is_deref,
                value,
            } => {
                if *is_deref {
                    return Err(ExecutionError::unsupported("pointer assignment", line));
                }
                let value = match value {
                    AssignValue::Expr(expression) => self.eval_expression(expression, line)?,
                    AssignValue::Call(call) => self.eval_call(call, line)?,
                };
                self.memory.write_by_name(target, value);
                Ok(statement.next)
            }
            StatementKind::FunctionCall(call) => {
                self.exec_call(call, line)?;
                Ok(statement.next)
            }
            StatementKind::WhileLoop { condition, body } => {
                if self.eval_expression(condition, line)?.is_true() {
                    Ok(Some(*body))
                } else {
                    Ok(statement.next)
                }
            }
            StatementKind::IfThenElse { .. } => {
                Err(ExecutionError::unsupported("if/elif/else", line))
            }
            StatementKind::Pass => Ok(statement.next),
        }
    }

    /// Function call in statement position; only `print` has an effect there.
    fn exec_call(&mut self, call: &FunctionCall, line: usize) -> Result<(), ExecutionError> {
        if BuiltinFunction::from_name(&call.name) != Some(BuiltinFunction::Print) {
            return Err(ExecutionError::InvalidFunctionCall {
                name: call.name.clone(),
                line,
            });
        }
        match &call.parameter {
            None => writeln!(self.output)?,
            Some(element) => {
                let value = self.retrieve_value(element, line)?;
                let text = builtins::format_value(&value)?;
                writeln!(self.output, "{text}")?;
            }
        }
        Ok(())
    }

    /// Function call on the right of an assignment: `input`, `int` or `float`.
    fn eval_call(&mut self, call: &FunctionCall, line: usize) -> Result<Value, ExecutionError> {
        let builtin = match BuiltinFunction::from_name(&call.name) {
            Some(BuiltinFunction::Print) | None => {
                return Err(ExecutionError::InvalidFunctionCall {
                    name: call.name.clone(),
                    line,
                });
            }
            Some(builtin) => builtin,
        };
        let argument = call
            .parameter
            .as_ref()
            .map(|element| self.retrieve_value(element, line))
            .transpose()?;

        match (builtin, argument) {
            (BuiltinFunction::Input, argument) => self.read_input(argument.as_ref()),
            (BuiltinFunction::Int, Some(value)) => builtins::convert_to_int(value, line),
            (BuiltinFunction::Float, Some(value)) => builtins::convert_to_float(value, line),
            (function, _) => Err(ExecutionError::InvalidConversion {
                function: function.name(),
                line,
            }),
        }
    }

    fn read_input(&mut self, prompt: Option<&Value>) -> Result<Value, ExecutionError> {
        match prompt {
            Some(Value::Str(text)) => write!(self.output, "{text}")?,
            Some(value) => write!(self.output, "{}", builtins::format_value(value)?)?,
            None => {}
        }
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Value::Str(line))
    }

    fn eval_expression(
        &mut self,
        expression: &Expression,
        line: usize,
    ) -> Result<Value, ExecutionError> {
        let lhs = self.eval_operand(&expression.lhs, line)?;
        match &expression.binary {
            None => Ok(lhs),
            Some((op, rhs)) => {
                let rhs = self.eval_operand(rhs, line)?;
                binary::evaluate(lhs, *op, rhs, line)
            }
        }
    }

    fn eval_operand(&mut self, operand: &Operand, line: usize) -> Result<Value, ExecutionError> {
        let value = self.retrieve_value(&operand.element, line)?;
        match operand.unary {
            None => Ok(value),
            Some(UnaryOperator::Plus) => match value {
                Value::Int(_) | Value::Real(_) => Ok(value),
                _ => Err(ExecutionError::InvalidOperandTypes { line }),
            },
            Some(UnaryOperator::Minus) => match value {
                Value::Int(value) => Ok(Value::Int(value.wrapping_neg())),
                Value::Real(value) => Ok(Value::Real(-value)),
                _ => Err(ExecutionError::InvalidOperandTypes { line }),
            },
            Some(UnaryOperator::Deref) => {
                Err(ExecutionError::unsupported("pointer operator '*'", line))
            }
            Some(UnaryOperator::AddressOf) => {
                Err(ExecutionError::unsupported("pointer operator '&'", line))
            }
        }
    }

    fn retrieve_value(&self, element: &Element, line: usize) -> Result<Value, ExecutionError> {
        match element {
            Element::Identifier(name) => {
                self.memory
                    .read_by_name(name)
                    .map_err(|_| ExecutionError::UndefinedName {
                        name: name.clone(),
                        line,
                    })
            }
            Element::IntLiteral(text) => text.parse::<i64>().map(Value::Int).map_err(|_| {
                ExecutionError::IntegerOutOfRange {
                    text: text.clone(),
                    line,
                }
            }),
            Element::RealLiteral(text) => text.parse::<f64>().map(Value::Real).map_err(|_| {
                ExecutionError::internal(format!("malformed real literal '{text}'"))
            }),
            Element::StrLiteral(text) => Ok(Value::Str(text.clone())),
            Element::True => Ok(Value::Boolean(true)),
            Element::False => Ok(Value::Boolean(false)),
            Element::None => Ok(Value::None),
        }
    }
}
