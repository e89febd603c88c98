use crate::memory::Value;

use super::ExecutionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinFunction {
    Print,
    Input,
    Int,
    Float,
}

impl BuiltinFunction {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "print" => Some(Self::Print),
            "input" => Some(Self::Input),
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Print => "print",
            Self::Input => "input",
            Self::Int => "int",
            Self::Float => "float",
        }
    }
}

/// Text `print` writes for a value, without the trailing newline.
pub(super) fn format_value(value: &Value) -> Result<String, ExecutionError> {
    match value {
        Value::Int(value) => Ok(value.to_string()),
        Value::Real(value) if value.is_nan() => Ok("nan".to_string()),
        Value::Real(value) => Ok(format!("{value:.6}")),
        Value::Str(value) => Ok(value.clone()),
        Value::Boolean(true) => Ok("True".to_string()),
        Value::Boolean(false) => Ok("False".to_string()),
        Value::None | Value::Ptr(_) => Err(ExecutionError::internal(format!(
            "cannot print value of type {}",
            value.type_name()
        ))),
    }
}

/// `int(...)`: strings parse by their leading integer prefix; text that
/// yields 0 must itself spell a zero.
pub(super) fn convert_to_int(value: Value, line: usize) -> Result<Value, ExecutionError> {
    match value {
        Value::Str(text) => {
            let parsed = parse_int_prefix(&text);
            if parsed == 0 && !is_zero_text(&text) {
                return Err(ExecutionError::InvalidConversion {
                    function: BuiltinFunction::Int.name(),
                    line,
                });
            }
            Ok(Value::Int(parsed))
        }
        Value::Int(value) => Ok(Value::Int(value)),
        Value::Real(value) => Ok(Value::Int(value.trunc() as i64)),
        Value::Boolean(value) => Ok(Value::Int(i64::from(value))),
        Value::None | Value::Ptr(_) => Err(ExecutionError::InvalidOperandTypes { line }),
    }
}

/// `float(...)`: same zero guard as `int(...)` over the leading real prefix.
pub(super) fn convert_to_float(value: Value, line: usize) -> Result<Value, ExecutionError> {
    match value {
        Value::Str(text) => {
            let parsed = parse_real_prefix(&text);
            if parsed == 0.0 && !is_zero_text(&text) {
                return Err(ExecutionError::InvalidConversion {
                    function: BuiltinFunction::Float.name(),
                    line,
                });
            }
            Ok(Value::Real(parsed))
        }
        Value::Int(value) => Ok(Value::Real(value as f64)),
        Value::Real(value) => Ok(Value::Real(value)),
        Value::Boolean(value) => Ok(Value::Real(f64::from(u8::from(value)))),
        Value::None | Value::Ptr(_) => Err(ExecutionError::InvalidOperandTypes { line }),
    }
}

/// Leading `[ws][sign]digits` of `text` as an integer, 0 when there is none.
/// Saturates instead of overflowing.
pub(super) fn parse_int_prefix(text: &str) -> i64 {
    let rest = text.trim_start();
    let (negative, rest) = split_sign(rest);
    let digits = leading_digits(rest);
    let magnitude = rest[..digits]
        .bytes()
        .fold(0i64, |acc, digit| {
            acc.saturating_mul(10).saturating_add(i64::from(digit - b'0'))
        });
    if negative { -magnitude } else { magnitude }
}

/// Leading `[ws][sign]digits[.digits][e[sign]digits]` of `text` as a real,
/// 0.0 when there is none.
pub(super) fn parse_real_prefix(text: &str) -> f64 {
    let rest = text.trim_start();
    let (negative, unsigned) = split_sign(rest);

    let mut end = leading_digits(unsigned);
    let mut mantissa_digits = end;
    if unsigned[end..].starts_with('.') {
        let fraction = leading_digits(&unsigned[end + 1..]);
        mantissa_digits += fraction;
        end += 1 + fraction;
    }
    if mantissa_digits == 0 {
        return 0.0;
    }
    if unsigned[end..].starts_with(['e', 'E']) {
        let (_, exponent) = split_sign(&unsigned[end + 1..]);
        let exponent_digits = leading_digits(exponent);
        if exponent_digits > 0 {
            let sign_len = unsigned.len() - end - 1 - exponent.len();
            end += 1 + sign_len + exponent_digits;
        }
    }

    let magnitude = unsigned[..end].parse::<f64>().unwrap_or(0.0);
    if negative { -magnitude } else { magnitude }
}

/// True when `text` consists only of `0`s and at most one `.`.
pub(super) fn is_zero_text(text: &str) -> bool {
    text.chars().all(|c| c == '0' || c == '.') && text.matches('.').count() <= 1
}

fn split_sign(text: &str) -> (bool, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = text.strip_prefix('+') {
        (false, rest)
    } else {
        (false, text)
    }
}

fn leading_digits(text: &str) -> usize {
    text.bytes().take_while(u8::is_ascii_digit).count()
}
