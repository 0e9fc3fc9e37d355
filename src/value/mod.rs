pub mod error;
pub mod formatter;

use compact_str::{format_compact, CompactString};
use error::RuntimeErrorKind;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Int,
    Double,
    String,
    Bool,
    Char,
    Null,
    Array,
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ValueKind::Int => "int",
            ValueKind::Double => "double",
            ValueKind::String => "string",
            ValueKind::Bool => "bool",
            ValueKind::Char => "char",
            ValueKind::Null => "null",
            ValueKind::Array => "array",
        };
        write!(f, "{name}")
    }
}

/// A dynamically typed runtime value.
///
/// Arrays own their elements so cloning a value deep copies it.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Double(f64),
    String(CompactString),
    Bool(bool),
    Char(char),
    Null,
    Array(Vec<Value>),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::Int,
            Value::Double(_) => ValueKind::Double,
            Value::String(_) => ValueKind::String,
            Value::Bool(_) => ValueKind::Bool,
            Value::Char(_) => ValueKind::Char,
            Value::Null => ValueKind::Null,
            Value::Array(_) => ValueKind::Array,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Double(v) if v.is_nan() => write!(f, "nan"),
            Value::Double(v) => write!(f, "{v:.6}"),
            Value::String(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Char(v) => write!(f, "{v}"),
            Value::Null => write!(f, "null"),
            Value::Array(elements) => {
                write!(f, "[")?;
                for (index, element) in elements.iter().enumerate() {
                    if index > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{element}")?;
                }
                write!(f, "]")
            }
        }
    }
}

fn invalid_operands(operator: &'static str, lhs: &Value, rhs: &Value) -> RuntimeErrorKind {
    RuntimeErrorKind::InvalidOperands {
        operator,
        lhs: lhs.kind(),
        rhs: rhs.kind(),
    }
}

fn invalid_operand(operator: &'static str, operand: &Value) -> RuntimeErrorKind {
    RuntimeErrorKind::InvalidOperand {
        operator,
        operand: operand.kind(),
    }
}

/// Narrows a character code back into a character.
fn char_from_code(code: i64) -> Result<Value, RuntimeErrorKind> {
    u32::try_from(code)
        .ok()
        .and_then(char::from_u32)
        .map(Value::Char)
        .ok_or(RuntimeErrorKind::InvalidCharacter(code))
}

/// Upper bound on the length of a string or array built by repetition.
pub const MAX_REPEAT_LENGTH: usize = 1 << 28;

fn repeat_length(count: i64, length: usize) -> Result<usize, RuntimeErrorKind> {
    let count_usize = usize::try_from(count).unwrap_or(0);
    if count_usize == 0 || length == 0 {
        return Ok(0);
    }
    length
        .checked_mul(count_usize)
        .filter(|total| *total <= MAX_REPEAT_LENGTH)
        .ok_or(RuntimeErrorKind::RepeatTooLarge { length, count })
}

fn repeat_string(count: i64, text: &str) -> Result<Value, RuntimeErrorKind> {
    if repeat_length(count, text.len())? == 0 {
        return Ok(Value::String(CompactString::default()));
    }
    let count = usize::try_from(count).unwrap_or(0);
    Ok(Value::String(text.repeat(count).into()))
}

fn repeat_array(count: i64, elements: &[Value]) -> Result<Value, RuntimeErrorKind> {
    let total = repeat_length(count, elements.len())?;
    let mut result = Vec::with_capacity(total);
    while result.len() < total {
        result.extend(elements.iter().cloned());
    }
    Ok(Value::Array(result))
}

// Arithmetic
impl Value {
    pub fn add(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        match (self, other) {
            (Value::Int(lhs), Value::Int(rhs)) => Ok(Value::Int(lhs.wrapping_add(*rhs))),
            (Value::Double(lhs), Value::Double(rhs)) => Ok(Value::Double(lhs + rhs)),
            (Value::Int(lhs), Value::Double(rhs)) => Ok(Value::Double(*lhs as f64 + rhs)),
            (Value::Double(lhs), Value::Int(rhs)) => Ok(Value::Double(lhs + *rhs as f64)),
            (Value::Char(c), Value::Int(n)) | (Value::Int(n), Value::Char(c)) => {
                char_from_code((*c as i64).saturating_add(*n))
            }
            (Value::Char(lhs), Value::Char(rhs)) => char_from_code(*lhs as i64 + *rhs as i64),
            // Either side being a string turns this into concatenation
            (Value::String(_), _) | (_, Value::String(_)) => {
                Ok(Value::String(format_compact!("{self}{other}")))
            }
            (Value::Array(elements), rhs) => {
                let mut elements = elements.clone();
                elements.push(rhs.clone());
                Ok(Value::Array(elements))
            }
            (lhs, Value::Array(elements)) => {
                let mut elements = elements.clone();
                elements.push(lhs.clone());
                Ok(Value::Array(elements))
            }
            (lhs, rhs) => Err(invalid_operands("+", lhs, rhs)),
        }
    }

    pub fn subtract(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        match (self, other) {
            (Value::Int(lhs), Value::Int(rhs)) => Ok(Value::Int(lhs.wrapping_sub(*rhs))),
            (Value::Double(lhs), Value::Double(rhs)) => Ok(Value::Double(lhs - rhs)),
            (Value::Int(lhs), Value::Double(rhs)) => Ok(Value::Double(*lhs as f64 - rhs)),
            (Value::Double(lhs), Value::Int(rhs)) => Ok(Value::Double(lhs - *rhs as f64)),
            (Value::Char(lhs), Value::Int(rhs)) => char_from_code((*lhs as i64).saturating_sub(*rhs)),
            (Value::Int(lhs), Value::Char(rhs)) => char_from_code(lhs.saturating_sub(*rhs as i64)),
            (Value::Char(lhs), Value::Char(rhs)) => char_from_code(*lhs as i64 - *rhs as i64),
            (lhs, rhs) => Err(invalid_operands("-", lhs, rhs)),
        }
    }

    pub fn multiply(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        match (self, other) {
            (Value::Int(lhs), Value::Int(rhs)) => Ok(Value::Int(lhs.wrapping_mul(*rhs))),
            (Value::Double(lhs), Value::Double(rhs)) => Ok(Value::Double(lhs * rhs)),
            (Value::Int(lhs), Value::Double(rhs)) => Ok(Value::Double(*lhs as f64 * rhs)),
            (Value::Double(lhs), Value::Int(rhs)) => Ok(Value::Double(lhs * *rhs as f64)),
            (Value::String(text), Value::Int(count)) | (Value::Int(count), Value::String(text)) => {
                repeat_string(*count, text)
            }
            (Value::Array(elements), Value::Int(count))
            | (Value::Int(count), Value::Array(elements)) => repeat_array(*count, elements),
            (lhs, rhs) => Err(invalid_operands("*", lhs, rhs)),
        }
    }

    pub fn divide(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        match (self, other) {
            (Value::Int(_), Value::Int(0)) => Err(RuntimeErrorKind::DivisionByZero),
            (Value::Int(lhs), Value::Int(rhs)) => Ok(Value::Int(lhs.wrapping_div(*rhs))),
            (Value::Double(lhs), Value::Double(rhs)) => Ok(Value::Double(lhs / rhs)),
            (Value::Int(lhs), Value::Double(rhs)) => Ok(Value::Double(*lhs as f64 / rhs)),
            (Value::Double(lhs), Value::Int(rhs)) => Ok(Value::Double(lhs / *rhs as f64)),
            (lhs, rhs) => Err(invalid_operands("/", lhs, rhs)),
        }
    }

    pub fn modulo(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        match (self, other) {
            (Value::Int(_), Value::Int(0)) => Err(RuntimeErrorKind::DivisionByZero),
            (Value::Int(lhs), Value::Int(rhs)) => Ok(Value::Int(lhs.wrapping_rem(*rhs))),
            (lhs, rhs) => Err(invalid_operands("%", lhs, rhs)),
        }
    }
}

// Logical and bitwise
impl Value {
    pub fn logical_and(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        match (self, other) {
            (Value::Bool(lhs), Value::Bool(rhs)) => Ok(Value::Bool(*lhs && *rhs)),
            (lhs, rhs) => Err(invalid_operands("&&", lhs, rhs)),
        }
    }

    pub fn logical_or(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        match (self, other) {
            (Value::Bool(lhs), Value::Bool(rhs)) => Ok(Value::Bool(*lhs || *rhs)),
            (lhs, rhs) => Err(invalid_operands("||", lhs, rhs)),
        }
    }

    pub fn bit_and(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        match (self, other) {
            (Value::Int(lhs), Value::Int(rhs)) => Ok(Value::Int(lhs & rhs)),
            (lhs, rhs) => Err(invalid_operands("&", lhs, rhs)),
        }
    }

    pub fn bit_or(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        match (self, other) {
            (Value::Int(lhs), Value::Int(rhs)) => Ok(Value::Int(lhs | rhs)),
            (lhs, rhs) => Err(invalid_operands("|", lhs, rhs)),
        }
    }
}

// Equality
impl Value {
    fn equals(&self, other: &Value, operator: &'static str) -> Result<bool, RuntimeErrorKind> {
        match (self, other) {
            (Value::Int(lhs), Value::Int(rhs)) => Ok(lhs == rhs),
            (Value::Double(lhs), Value::Double(rhs)) => Ok(lhs == rhs),
            (Value::String(lhs), Value::String(rhs)) => Ok(lhs == rhs),
            (Value::Bool(lhs), Value::Bool(rhs)) => Ok(lhs == rhs),
            (Value::Char(lhs), Value::Char(rhs)) => Ok(lhs == rhs),
            (Value::Null, Value::Null) => Ok(true),
            (lhs, rhs) => Err(invalid_operands(operator, lhs, rhs)),
        }
    }

    pub fn is_equal(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        self.equals(other, "==").map(Value::Bool)
    }

    pub fn is_not_equal(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        self.equals(other, "!=").map(|equal| Value::Bool(!equal))
    }
}

// Comparison
impl Value {
    fn compare(
        &self,
        other: &Value,
        operator: &'static str,
    ) -> Result<Option<std::cmp::Ordering>, RuntimeErrorKind> {
        match (self, other) {
            (Value::Int(lhs), Value::Int(rhs)) => Ok(lhs.partial_cmp(rhs)),
            (Value::Double(lhs), Value::Double(rhs)) => Ok(lhs.partial_cmp(rhs)),
            (Value::String(lhs), Value::String(rhs)) => Ok(lhs.partial_cmp(rhs)),
            (Value::Char(lhs), Value::Char(rhs)) => Ok(lhs.partial_cmp(rhs)),
            (lhs, rhs) => Err(invalid_operands(operator, lhs, rhs)),
        }
    }

    pub fn greater_than(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        let ordering = self.compare(other, ">")?;
        Ok(Value::Bool(ordering.is_some_and(|o| o.is_gt())))
    }

    pub fn greater_than_or_equal(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        let ordering = self.compare(other, ">=")?;
        Ok(Value::Bool(ordering.is_some_and(|o| o.is_ge())))
    }

    pub fn less_than(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        let ordering = self.compare(other, "<")?;
        Ok(Value::Bool(ordering.is_some_and(|o| o.is_lt())))
    }

    pub fn less_than_or_equal(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        let ordering = self.compare(other, "<=")?;
        Ok(Value::Bool(ordering.is_some_and(|o| o.is_le())))
    }
}

// Unary operators
impl Value {
    pub fn negate(&self) -> Result<Value, RuntimeErrorKind> {
        match self {
            Value::Int(v) => Ok(Value::Int(v.wrapping_neg())),
            Value::Double(v) => Ok(Value::Double(-v)),
            v => Err(invalid_operand("-", v)),
        }
    }

    pub fn logical_not(&self) -> Result<Value, RuntimeErrorKind> {
        match self {
            Value::Bool(v) => Ok(Value::Bool(!v)),
            v => Err(invalid_operand("!", v)),
        }
    }

    pub fn bit_not(&self) -> Result<Value, RuntimeErrorKind> {
        match self {
            Value::Int(v) => Ok(Value::Int(!v)),
            v => Err(invalid_operand("~", v)),
        }
    }
}
