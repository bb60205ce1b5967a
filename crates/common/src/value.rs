//! Runtime value representation for the IPPcode24 interpreter.
//!
//! Values live in frame slots and on the data stack. They are copied on
//! assignment; operations never mutate a value in place, they produce a
//! new one.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{OpError, OperandError};

/// A runtime value.
///
/// `Uninitialized` marks a declared slot that has never been assigned.
/// Every read other than [`Value::is_initialized`] and
/// [`Value::type_name`] fails on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Value {
    /// Declared but never assigned.
    #[default]
    Uninitialized,
    /// Signed 64-bit integer.
    Int(i64),
    /// Boolean.
    Bool(bool),
    /// Unicode string, indexed by code point.
    Str(String),
    /// The `nil@nil` constant.
    Nil,
}

impl Value {
    /// Returns true unless this is [`Value::Uninitialized`].
    pub fn is_initialized(&self) -> bool {
        !matches!(self, Value::Uninitialized)
    }

    /// The type name as reported by the `TYPE` instruction.
    ///
    /// Uninitialized values report the empty string.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Uninitialized => "",
            Value::Int(_) => "int",
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
            Value::Nil => "nil",
        }
    }

    /// Fail with [`OpError::Uninitialized`] if this value was never assigned.
    pub fn require_initialized(&self) -> Result<&Self, OpError> {
        if self.is_initialized() {
            Ok(self)
        } else {
            Err(OpError::Uninitialized)
        }
    }

    pub fn as_int(&self, op: &'static str) -> Result<i64, OpError> {
        match self.require_initialized()? {
            Value::Int(n) => Ok(*n),
            other => Err(wrong_type(op, "int", other)),
        }
    }

    pub fn as_bool(&self, op: &'static str) -> Result<bool, OpError> {
        match self.require_initialized()? {
            Value::Bool(b) => Ok(*b),
            other => Err(wrong_type(op, "bool", other)),
        }
    }

    pub fn as_str(&self, op: &'static str) -> Result<&str, OpError> {
        match self.require_initialized()? {
            Value::Str(s) => Ok(s),
            other => Err(wrong_type(op, "string", other)),
        }
    }

    // ---- Arithmetic ----

    pub fn add(&self, other: &Value) -> Result<Value, OpError> {
        self.int_op("ADD", other, i64::wrapping_add)
    }

    pub fn sub(&self, other: &Value) -> Result<Value, OpError> {
        self.int_op("SUB", other, i64::wrapping_sub)
    }

    pub fn mul(&self, other: &Value) -> Result<Value, OpError> {
        self.int_op("MUL", other, i64::wrapping_mul)
    }

    /// Integer division, truncating toward zero.
    ///
    /// A zero divisor is reported only after both operands passed the
    /// initialization and type checks.
    pub fn idiv(&self, other: &Value) -> Result<Value, OpError> {
        both_initialized(self, other)?;
        match (self, other) {
            (Value::Int(_), Value::Int(0)) => Err(OpError::DivisionByZero),
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_div(*b))),
            _ => Err(mismatch("IDIV", self, other)),
        }
    }

    fn int_op(
        &self,
        op: &'static str,
        other: &Value,
        f: fn(i64, i64) -> i64,
    ) -> Result<Value, OpError> {
        both_initialized(self, other)?;
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(f(*a, *b))),
            _ => Err(mismatch(op, self, other)),
        }
    }

    // ---- Relational ----

    pub fn lt(&self, other: &Value) -> Result<Value, OpError> {
        Ok(Value::Bool(self.order("LT", other)? == Ordering::Less))
    }

    pub fn gt(&self, other: &Value) -> Result<Value, OpError> {
        Ok(Value::Bool(self.order("GT", other)? == Ordering::Greater))
    }

    /// Ordering for `LT`/`GT`: same-kind int, bool (false < true) or
    /// string (code point order). Nil is rejected.
    fn order(&self, op: &'static str, other: &Value) -> Result<Ordering, OpError> {
        both_initialized(self, other)?;
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Ok(a.cmp(b)),
            (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
            _ => Err(mismatch(op, self, other)),
        }
    }

    /// `EQ` semantics. Nil may be compared with anything and is equal
    /// only to nil; other kinds must match.
    pub fn equals(&self, other: &Value) -> Result<Value, OpError> {
        Ok(Value::Bool(self.is_equal("EQ", other)?))
    }

    /// Same as [`Value::equals`] but yields a plain `bool` and reports
    /// errors under the given opcode name. Used by the conditional jumps.
    pub fn is_equal(&self, op: &'static str, other: &Value) -> Result<bool, OpError> {
        both_initialized(self, other)?;
        match (self, other) {
            (Value::Nil, _) | (_, Value::Nil) => {
                Ok(matches!((self, other), (Value::Nil, Value::Nil)))
            }
            (Value::Int(a), Value::Int(b)) => Ok(a == b),
            (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
            (Value::Str(a), Value::Str(b)) => Ok(a == b),
            _ => Err(mismatch(op, self, other)),
        }
    }

    // ---- Logical ----

    /// Logical AND. Both operands are always evaluated.
    pub fn and(&self, other: &Value) -> Result<Value, OpError> {
        self.bool_op("AND", other, |a, b| a & b)
    }

    /// Logical OR. Both operands are always evaluated.
    pub fn or(&self, other: &Value) -> Result<Value, OpError> {
        self.bool_op("OR", other, |a, b| a | b)
    }

    pub fn not(&self) -> Result<Value, OpError> {
        Ok(Value::Bool(!self.as_bool("NOT")?))
    }

    fn bool_op(
        &self,
        op: &'static str,
        other: &Value,
        f: fn(bool, bool) -> bool,
    ) -> Result<Value, OpError> {
        both_initialized(self, other)?;
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(f(*a, *b))),
            _ => Err(mismatch(op, self, other)),
        }
    }

    // ---- Strings ----

    pub fn concat(&self, other: &Value) -> Result<Value, OpError> {
        both_initialized(self, other)?;
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => {
                let mut out = String::with_capacity(a.len() + b.len());
                out.push_str(a);
                out.push_str(b);
                Ok(Value::Str(out))
            }
            _ => Err(mismatch("CONCAT", self, other)),
        }
    }

    // ---- Literals ----

    /// Parse the text after `type@` of a constant operand.
    ///
    /// `ty` is one of `int`, `bool`, `string`, `nil`. String text may
    /// contain `\ddd` decimal escapes.
    pub fn parse_literal(ty: &str, text: &str) -> Result<Value, OperandError> {
        match ty {
            "int" => parse_int(text)
                .map(Value::Int)
                .ok_or_else(|| literal_error("int", text)),
            "bool" => match text {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(literal_error("bool", text)),
            },
            "string" => unescape(text)
                .map(Value::Str)
                .ok_or_else(|| literal_error("string", text)),
            "nil" if text == "nil" => Ok(Value::Nil),
            "nil" => Err(literal_error("nil", text)),
            _ => Err(literal_error("constant", text)),
        }
    }

    /// Canonical `type@value` notation, re-escaping strings.
    ///
    /// Uninitialized values render as `(uninitialized)`.
    pub fn literal(&self) -> String {
        match self {
            Value::Uninitialized => "(uninitialized)".to_string(),
            Value::Int(n) => format!("int@{n}"),
            Value::Bool(b) => format!("bool@{b}"),
            Value::Str(s) => format!("string@{}", escape(s)),
            Value::Nil => "nil@nil".to_string(),
        }
    }
}

/// The `WRITE` rendering: integers in decimal, `true`/`false`, raw
/// strings, nil as the empty string. Uninitialized renders as nothing.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Uninitialized | Value::Nil => Ok(()),
            Value::Int(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => f.write_str(s),
        }
    }
}

fn both_initialized(a: &Value, b: &Value) -> Result<(), OpError> {
    a.require_initialized()?;
    b.require_initialized()?;
    Ok(())
}

fn mismatch(op: &'static str, a: &Value, b: &Value) -> OpError {
    OpError::TypeMismatch {
        op,
        lhs: a.type_name(),
        rhs: b.type_name(),
    }
}

fn wrong_type(op: &'static str, expected: &'static str, found: &Value) -> OpError {
    OpError::WrongType {
        op,
        expected,
        found: found.type_name(),
    }
}

fn literal_error(ty: &'static str, text: &str) -> OperandError {
    OperandError::Literal {
        ty,
        text: text.to_string(),
    }
}

/// Decimal, `0x` hexadecimal or `0o` octal, with an optional sign.
fn parse_int(text: &str) -> Option<i64> {
    let (negative, rest) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };

    let (radix, digits) = if let Some(hex) = rest.strip_prefix("0x").or(rest.strip_prefix("0X")) {
        (16, hex)
    } else if let Some(oct) = rest.strip_prefix("0o").or(rest.strip_prefix("0O")) {
        (8, oct)
    } else {
        (10, rest)
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let magnitude = u64::from_str_radix(digits, radix).ok()?;
    if negative {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    }
}

/// Resolve `\ddd` escapes. Returns `None` for a malformed escape or a
/// raw ASCII whitespace character.
fn unescape(text: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let digits: String = chars.by_ref().take(3).collect();
                if digits.len() != 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                let code: u32 = digits.parse().ok()?;
                out.push(char::from_u32(code)?);
            }
            c if c.is_ascii_whitespace() => return None,
            c => out.push(c),
        }
    }

    Some(out)
}

/// Inverse of [`unescape`]: control characters, `#`, `\` and whitespace
/// below code point 1000 become `\ddd`. Wider whitespace stays raw,
/// since an escape holds exactly three digits.
pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        let code = c as u32;
        if code <= 32 || c == '#' || c == '\\' || (c.is_whitespace() && code <= 999) {
            out.push_str(&format!("\\{code:03}"));
        } else {
            out.push(c);
        }
    }
    out
}
