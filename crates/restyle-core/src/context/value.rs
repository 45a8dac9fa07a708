use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use regex::Regex;

use super::expr::Function;
use crate::units::format_number;

#[derive(Debug, Clone)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    Array(Vec<Value>),
    Object(IndexMap<String, Value>),
    Function(Arc<Closure>),
    Builtin(Builtin),
    Regex(Arc<Pattern>),
}

/// A function value together with the locals visible where it was created.
#[derive(Debug)]
pub struct Closure {
    pub function: Arc<Function>,
    pub captured: IndexMap<String, Value>,
}

#[derive(Debug)]
pub struct Pattern {
    pub source: String,
    pub flags: String,
    pub regex: Regex,
}

impl Pattern {
    pub fn is_global(&self) -> bool {
        self.flags.contains('g')
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    MathRound,
    MathFloor,
    MathCeil,
    MathMin,
    MathMax,
    MathAbs,
    String,
    Number,
    ParseFloat,
    ParseInt,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Function(_) | Value::Builtin(_) => "function",
            Value::Array(_) | Value::Object(_) | Value::Regex(_) => "object",
        }
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
            _ => true,
        }
    }

    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::Str(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    crate::units::parse_number(trimmed).unwrap_or(f64::NAN)
                }
            }
            Value::Array(items) if items.is_empty() => 0.0,
            Value::Array(items) if items.len() == 1 => items[0].to_number(),
            _ => f64::NAN,
        }
    }

    /// Strict equality (`===`).
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Arc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a == b,
            _ => false,
        }
    }

    /// Loose equality (`==`) for the primitive cases.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (a, b) if a.is_nullish() && b.is_nullish() => true,
            (a, b) if a.is_nullish() || b.is_nullish() => false,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Number(_) | Value::Str(_) | Value::Bool(_), Value::Number(_) | Value::Str(_) | Value::Bool(_)) => {
                self.to_number() == other.to_number()
            }
            _ => self.strict_eq(other),
        }
    }
}

/// `String(value)`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Str(s) => f.write_str(s),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    if !item.is_nullish() {
                        write!(f, "{item}")?;
                    }
                }
                Ok(())
            }
            Value::Object(_) => f.write_str("[object Object]"),
            Value::Function(_) | Value::Builtin(_) => f.write_str("function () { [code] }"),
            Value::Regex(pattern) => write!(f, "/{}/{}", pattern.source, pattern.flags),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stringify_like_javascript() {
        assert_eq!(Value::Number(80.0).to_string(), "80");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(
            Value::Array(vec![Value::Number(1.0), Value::Null, Value::Str("a".into())]).to_string(),
            "1,,a"
        );
        assert_eq!(Value::Object(IndexMap::new()).to_string(), "[object Object]");
    }

    #[test]
    fn coercions() {
        assert!(Value::Str("0".into()).loose_eq(&Value::Number(0.0)));
        assert!(!Value::Str("0".into()).strict_eq(&Value::Number(0.0)));
        assert!(Value::Null.loose_eq(&Value::Undefined));
        assert!(!Value::Str(String::new()).truthy());
        assert_eq!(Value::Str(" 12 ".into()).to_number(), 12.0);
    }

    #[test]
    fn json_objects_convert() {
        let json: serde_json::Value = serde_json::json!({ "colors": { "info": "var(--bs-info)" }, "gap": 4 });
        let Value::Object(map) = Value::from(json) else {
            panic!("expected object");
        };
        assert!(matches!(map.get("gap"), Some(Value::Number(n)) if *n == 4.0));
    }
}
