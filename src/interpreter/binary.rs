//! Binary operator semantics.
//!
//! Operand kinds decide the rules: int with int stays integral, any mix of
//! int and real is promoted to real, and strings support `+` and the
//! relational operators. Every other pairing is an operand type error.

use std::cmp::Ordering;

use crate::ast::BinaryOperator;
use crate::memory::Value;

use super::ExecutionError;

pub(super) fn evaluate(
    lhs: Value,
    op: BinaryOperator,
    rhs: Value,
    line: usize,
) -> Result<Value, ExecutionError> {
    if matches!(op, BinaryOperator::Is | BinaryOperator::In) {
        return Err(ExecutionError::unsupported(
            format!("operator '{}'", op.symbol()),
            line,
        ));
    }

    match (lhs, rhs) {
        (Value::Int(lhs), Value::Int(rhs)) => int_int(lhs, op, rhs),
        (Value::Int(lhs), Value::Real(rhs)) => real_real(lhs as f64, op, rhs),
        (Value::Real(lhs), Value::Int(rhs)) => real_real(lhs, op, rhs as f64),
        (Value::Real(lhs), Value::Real(rhs)) => real_real(lhs, op, rhs),
        (Value::Str(lhs), Value::Str(rhs)) => str_str(lhs, op, &rhs, line),
        _ => Err(ExecutionError::InvalidOperandTypes { line }),
    }
}

fn int_int(lhs: i64, op: BinaryOperator, rhs: i64) -> Result<Value, ExecutionError> {
    let result = match op {
        BinaryOperator::Add => lhs.wrapping_add(rhs),
        BinaryOperator::Sub => lhs.wrapping_sub(rhs),
        BinaryOperator::Mul => lhs.wrapping_mul(rhs),
        // Computed in floating point and truncated toward zero.
        BinaryOperator::Pow => (lhs as f64).powf(rhs as f64) as i64,
        BinaryOperator::Mod => {
            if rhs == 0 {
                return Err(ExecutionError::ModuloByZero);
            }
            lhs.wrapping_rem(rhs)
        }
        BinaryOperator::Div => {
            if rhs == 0 {
                return Err(ExecutionError::DivisionByZero);
            }
            lhs.wrapping_div(rhs)
        }
        _ => return relational(lhs.cmp(&rhs), op),
    };
    Ok(Value::Int(result))
}

fn real_real(lhs: f64, op: BinaryOperator, rhs: f64) -> Result<Value, ExecutionError> {
    let result = match op {
        BinaryOperator::Add => lhs + rhs,
        BinaryOperator::Sub => lhs - rhs,
        BinaryOperator::Mul => lhs * rhs,
        BinaryOperator::Pow => lhs.powf(rhs),
        BinaryOperator::Mod => lhs % rhs,
        BinaryOperator::Div => {
            if rhs == 0.0 {
                return Err(ExecutionError::DivisionByZero);
            }
            lhs / rhs
        }
        BinaryOperator::Equal => return Ok(Value::Boolean(lhs == rhs)),
        BinaryOperator::NotEqual => return Ok(Value::Boolean(lhs != rhs)),
        BinaryOperator::LessThan => return Ok(Value::Boolean(lhs < rhs)),
        BinaryOperator::LessEqual => return Ok(Value::Boolean(lhs <= rhs)),
        BinaryOperator::GreaterThan => return Ok(Value::Boolean(lhs > rhs)),
        BinaryOperator::GreaterEqual => return Ok(Value::Boolean(lhs >= rhs)),
        BinaryOperator::Is | BinaryOperator::In => {
            return Err(unexpected_operator(op));
        }
    };
    Ok(Value::Real(result))
}

fn str_str(
    mut lhs: String,
    op: BinaryOperator,
    rhs: &str,
    line: usize,
) -> Result<Value, ExecutionError> {
    if op == BinaryOperator::Add {
        lhs.push_str(rhs);
        return Ok(Value::Str(lhs));
    }
    if !op.is_relational() {
        return Err(ExecutionError::InvalidOperandTypes { line });
    }
    relational(lhs.as_bytes().cmp(rhs.as_bytes()), op)
}

fn relational(ordering: Ordering, op: BinaryOperator) -> Result<Value, ExecutionError> {
    let result = match op {
        BinaryOperator::Equal => ordering.is_eq(),
        BinaryOperator::NotEqual => ordering.is_ne(),
        BinaryOperator::LessThan => ordering.is_lt(),
        BinaryOperator::LessEqual => ordering.is_le(),
        BinaryOperator::GreaterThan => ordering.is_gt(),
        BinaryOperator::GreaterEqual => ordering.is_ge(),
        _ => return Err(unexpected_operator(op)),
    };
    Ok(Value::Boolean(result))
}

fn unexpected_operator(op: BinaryOperator) -> ExecutionError {
    ExecutionError::internal(format!(
        "unexpected operator '{}' in binary expression",
        op.symbol()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(lhs: Value, op: BinaryOperator, rhs: Value) -> Value {
        evaluate(lhs, op, rhs, 1).expect("evaluation failed")
    }

    #[test]
    fn int_arithmetic_stays_integral() {
        assert_eq!(eval(Value::Int(7), BinaryOperator::Add, Value::Int(5)), Value::Int(12));
        assert_eq!(eval(Value::Int(7), BinaryOperator::Sub, Value::Int(9)), Value::Int(-2));
        assert_eq!(eval(Value::Int(7), BinaryOperator::Mul, Value::Int(6)), Value::Int(42));
        assert_eq!(eval(Value::Int(7), BinaryOperator::Mod, Value::Int(4)), Value::Int(3));
        assert_eq!(eval(Value::Int(7), BinaryOperator::Div, Value::Int(2)), Value::Int(3));
    }

    #[test]
    fn int_division_truncates_toward_zero() {
        assert_eq!(eval(Value::Int(-7), BinaryOperator::Div, Value::Int(2)), Value::Int(-3));
        assert_eq!(eval(Value::Int(-7), BinaryOperator::Mod, Value::Int(2)), Value::Int(-1));
    }

    #[test]
    fn int_power_truncates_float_result() {
        assert_eq!(eval(Value::Int(2), BinaryOperator::Pow, Value::Int(10)), Value::Int(1024));
        assert_eq!(eval(Value::Int(3), BinaryOperator::Pow, Value::Int(0)), Value::Int(1));
        assert_eq!(eval(Value::Int(2), BinaryOperator::Pow, Value::Int(-1)), Value::Int(0));
        assert_eq!(eval(Value::Int(-2), BinaryOperator::Pow, Value::Int(3)), Value::Int(-8));
    }

    #[test]
    fn mixed_operands_promote_to_real() {
        assert_eq!(eval(Value::Int(3), BinaryOperator::Add, Value::Real(2.5)), Value::Real(5.5));
        assert_eq!(eval(Value::Real(2.5), BinaryOperator::Add, Value::Int(3)), Value::Real(5.5));
        assert_eq!(eval(Value::Int(7), BinaryOperator::Div, Value::Real(2.0)), Value::Real(3.5));
        assert_eq!(eval(Value::Real(7.5), BinaryOperator::Mod, Value::Int(2)), Value::Real(1.5));
        assert_eq!(eval(Value::Real(2.0), BinaryOperator::Pow, Value::Int(3)), Value::Real(8.0));
        assert_eq!(
            eval(Value::Int(1), BinaryOperator::LessThan, Value::Real(1.5)),
            Value::Boolean(true)
        );
        assert_eq!(
            eval(Value::Real(2.0), BinaryOperator::Equal, Value::Int(2)),
            Value::Boolean(true)
        );
    }

    #[test]
    fn int_relational_operators() {
        let cases = [
            (BinaryOperator::Equal, false),
            (BinaryOperator::NotEqual, true),
            (BinaryOperator::LessThan, true),
            (BinaryOperator::LessEqual, true),
            (BinaryOperator::GreaterThan, false),
            (BinaryOperator::GreaterEqual, false),
        ];
        for (op, expected) in cases {
            assert_eq!(eval(Value::Int(1), op, Value::Int(2)), Value::Boolean(expected), "{op:?}");
        }
    }

    #[test]
    fn division_by_zero_fails_for_both_numeric_kinds() {
        for (lhs, rhs) in [
            (Value::Int(10), Value::Int(0)),
            (Value::Int(10), Value::Real(0.0)),
            (Value::Real(1.5), Value::Int(0)),
            (Value::Real(1.5), Value::Real(-0.0)),
        ] {
            let error = evaluate(lhs, BinaryOperator::Div, rhs, 3).expect_err("expected error");
            assert!(matches!(error, ExecutionError::DivisionByZero));
            assert_eq!(error.to_string(), "ZeroDivisionError: division by zero");
        }
    }

    #[test]
    fn int_modulo_by_zero_fails() {
        let error = evaluate(Value::Int(1), BinaryOperator::Mod, Value::Int(0), 1)
            .expect_err("expected error");
        assert!(matches!(error, ExecutionError::ModuloByZero));
    }

    #[test]
    fn real_modulo_by_zero_is_nan() {
        let Value::Real(result) = eval(Value::Real(1.5), BinaryOperator::Mod, Value::Int(0)) else {
            panic!("expected real");
        };
        assert!(result.is_nan());
    }

    #[test]
    fn strings_concatenate_and_compare_bytewise() {
        assert_eq!(
            eval(Value::from("ab"), BinaryOperator::Add, Value::from("cd")),
            Value::from("abcd")
        );
        assert_eq!(
            eval(Value::from("ab"), BinaryOperator::Equal, Value::from("ab")),
            Value::Boolean(true)
        );
        assert_eq!(
            eval(Value::from("Zebra"), BinaryOperator::LessThan, Value::from("apple")),
            Value::Boolean(true)
        );
        assert_eq!(
            eval(Value::from("abc"), BinaryOperator::GreaterThan, Value::from("ab")),
            Value::Boolean(true)
        );
        assert_eq!(
            eval(Value::from(""), BinaryOperator::LessEqual, Value::from("")),
            Value::Boolean(true)
        );
    }

    #[test]
    fn invalid_pairings_are_semantic_errors() {
        let cases = [
            (Value::from("a"), BinaryOperator::Mul, Value::from("b")),
            (Value::from("a"), BinaryOperator::Add, Value::Int(1)),
            (Value::Boolean(true), BinaryOperator::Add, Value::Int(1)),
            (Value::None, BinaryOperator::Equal, Value::None),
        ];
        for (lhs, op, rhs) in cases {
            let error = evaluate(lhs, op, rhs, 7).expect_err("expected error");
            assert_eq!(
                error.to_string(),
                "**SEMANTIC ERROR: invalid operand types (line 7)"
            );
        }
    }

    #[test]
    fn is_and_in_are_unsupported() {
        for op in [BinaryOperator::Is, BinaryOperator::In] {
            let error = evaluate(Value::Int(1), op, Value::Int(1), 2).expect_err("expected error");
            assert!(matches!(error, ExecutionError::Unsupported { line: 2, .. }));
        }
    }
}
