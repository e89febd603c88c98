use std::fmt;

/// A runtime value as held in memory or produced by evaluation.
///
/// Values are plain owned data: reading a cell hands out a clone, so a
/// caller can never alias the stored string.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    None,
    Int(i64),
    Real(f64),
    Str(String),
    Boolean(bool),
    /// Reserved for pointer support; nothing produces it yet.
    Ptr(i64),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Int(_) => "int",
            Value::Real(_) => "real",
            Value::Str(_) => "str",
            Value::Boolean(_) => "boolean",
            Value::Ptr(_) => "ptr",
        }
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Value::Boolean(true))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

/// `kind, value` rendering used by the memory dump.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "none, None"),
            Value::Int(value) => write!(f, "int, {value}"),
            Value::Real(value) if value.is_nan() => write!(f, "real, nan"),
            Value::Real(value) => write!(f, "real, {value:.6}"),
            Value::Str(value) => write!(f, "str, '{value}'"),
            Value::Boolean(true) => write!(f, "boolean, True"),
            Value::Boolean(false) => write!(f, "boolean, False"),
            Value::Ptr(value) => write!(f, "ptr, {value}"),
        }
    }
}
