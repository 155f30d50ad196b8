use crate::error::Error;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use wasmtime::Val;

/// A value crossing the host/guest boundary: either an argument we pass in or
/// a result we read back out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    V128(u128),
    /// A reference result. Only its kind and nullness are observable from the host.
    Ref { kind: &'static str, null: bool },
}

impl Value {
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::I32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn into_val(self) -> Result<Val, Error> {
        Ok(match self {
            Value::I32(v) => Val::I32(v),
            Value::I64(v) => Val::I64(v),
            Value::F32(v) => Val::F32(v.to_bits()),
            Value::F64(v) => Val::F64(v.to_bits()),
            Value::V128(v) => Val::V128(v.into()),
            Value::Ref { kind, .. } => {
                return Err(Error::BadArgument(
                    kind.to_owned(),
                    "reference arguments cannot be passed from the host".to_owned(),
                ))
            }
        })
    }
}

impl From<&Val> for Value {
    #[allow(unreachable_patterns)]
    fn from(val: &Val) -> Value {
        match val {
            Val::I32(v) => Value::I32(*v),
            Val::I64(v) => Value::I64(*v),
            Val::F32(bits) => Value::F32(f32::from_bits(*bits)),
            Val::F64(bits) => Value::F64(f64::from_bits(*bits)),
            Val::V128(v) => Value::V128(v.as_u128()),
            Val::FuncRef(f) => Value::Ref {
                kind: "funcref",
                null: f.is_none(),
            },
            Val::ExternRef(r) => Value::Ref {
                kind: "externref",
                null: r.is_none(),
            },
            Val::AnyRef(r) => Value::Ref {
                kind: "anyref",
                null: r.is_none(),
            },
            _ => Value::Ref {
                kind: "ref",
                null: false,
            },
        }
    }
}

fn parse_int<T>(text: &str, from_radix: fn(&str, u32) -> Result<T, ParseIntError>) -> Option<T> {
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => from_radix(&format!("{}{}", sign, hex), 16).ok(),
        None => from_radix(text, 10).ok(),
    }
}

impl FromStr for Value {
    type Err = Error;

    /// Accepts `N` (an i32) or `type:literal` with type one of `i32`, `i64`,
    /// `f32`, `f64`. Integers may be written in hex with a `0x` prefix.
    fn from_str(s: &str) -> Result<Value, Error> {
        let bad = |why: &str| Error::BadArgument(s.to_owned(), why.to_owned());
        let (ty, literal) = match s.find(':') {
            Some(ix) => (&s[..ix], &s[ix + 1..]),
            None => ("i32", s),
        };
        let literal = literal.trim();
        match ty.trim() {
            "i32" => parse_int(literal, i32::from_str_radix)
                .map(Value::I32)
                .ok_or_else(|| bad("not a valid i32")),
            "i64" => parse_int(literal, i64::from_str_radix)
                .map(Value::I64)
                .ok_or_else(|| bad("not a valid i64")),
            "f32" => literal
                .parse::<f32>()
                .map(Value::F32)
                .map_err(|_| bad("not a valid f32")),
            "f64" => literal
                .parse::<f64>()
                .map(Value::F64)
                .map_err(|_| bad("not a valid f64")),
            other => Err(bad(&format!("unknown value type `{}`", other))),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::I32(v) => write!(f, "{}", v),
            Value::I64(v) => write!(f, "{}", v),
            Value::F32(v) => write!(f, "{}", v),
            Value::F64(v) => write!(f, "{}", v),
            Value::V128(v) => write!(f, "0x{:032x}", v),
            Value::Ref { kind, null: true } => write!(f, "null {}", kind),
            Value::Ref { kind, null: false } => write!(f, "{}", kind),
        }
    }
}

/// The results of one call, printed the way the fixture reports them: nothing
/// as `()`, a single result bare, several as a parenthesized list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReturnValues(pub Vec<Value>);

impl ReturnValues {
    pub fn from_vals(vals: &[Val]) -> Self {
        ReturnValues(vals.iter().map(Value::from).collect())
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }

    pub fn single(&self) -> Option<Value> {
        match self.0.as_slice() {
            [v] => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for ReturnValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [v] => write!(f, "{}", v),
            vals => {
                write!(f, "(")?;
                for (ix, v) in vals.iter().enumerate() {
                    if ix > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, ")")
            }
        }
    }
}
