use std::fs;
use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use regex::{NoExpand, Regex};
use tracing::{debug, warn};

use super::expr::{lower_declarators, lower_function, Expr, Function};
use super::value::{Builtin, Closure, Pattern, Value};
use super::EvalError;
use crate::source::{named_children, Dialect, Document};
use crate::units::format_number;

const MAX_CALL_DEPTH: usize = 64;

type Locals = IndexMap<String, Value>;

/// Top-level bindings of the context source.
#[derive(Debug, Default)]
pub struct Scope {
    bindings: IndexMap<String, Value>,
}

impl Scope {
    /// Load a context source. `.json` files are read as a static table, any
    /// other extension is interpreted as a JavaScript/TypeScript module.
    pub fn load(path: &Path) -> Result<Self, EvalError> {
        let data = fs::read_to_string(path)
            .map_err(|e| EvalError::Load(format!("Could not read {}: {}", path.display(), e)))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            return Self::from_json(&data)
                .map_err(|e| EvalError::Load(format!("Invalid JSON in {}: {}", path.display(), e)));
        }
        Self::from_source(&data, Dialect::from_path(path))
    }

    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        let table: IndexMap<String, serde_json::Value> = serde_json::from_str(data)?;
        Ok(Self {
            bindings: table.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
        })
    }

    /// Build the scope from module source. Function declarations are bound
    /// first (they are hoisted); variable bindings are evaluated in order.
    /// Statements outside the supported subset are skipped.
    pub fn from_source(data: &str, dialect: Dialect) -> Result<Self, EvalError> {
        let doc = Document::parse(data, dialect).map_err(|e| EvalError::Load(e.to_string()))?;
        let src = doc.text();
        let mut scope = Scope::default();

        let statements: Vec<_> = named_children(doc.root())
            .into_iter()
            .map(|statement| match statement.kind() {
                "export_statement" => statement.child_by_field_name("declaration").unwrap_or(statement),
                _ => statement,
            })
            .collect();

        for statement in &statements {
            if statement.kind() != "function_declaration" {
                continue;
            }
            let Some(name) = statement.child_by_field_name("name") else {
                continue;
            };
            match lower_function(*statement, src) {
                Ok(function) => {
                    let closure = Closure {
                        function: Arc::new(function),
                        captured: Locals::new(),
                    };
                    scope.bind(&src[name.byte_range()], Value::Function(Arc::new(closure)));
                }
                Err(err) => warn!(function = &src[name.byte_range()], %err, "skipping context function"),
            }
        }

        for statement in &statements {
            match statement.kind() {
                "function_declaration" | "hash_bang_line" | "empty_statement" => {}
                "lexical_declaration" | "variable_declaration" => {
                    let declarators = match lower_declarators(*statement, src) {
                        Ok(declarators) => declarators,
                        Err(err) => {
                            warn!(%err, "skipping context declaration");
                            continue;
                        }
                    };
                    for (name, init) in declarators {
                        match scope.eval(&init) {
                            Ok(value) => scope.bind(&name, value),
                            Err(err) => warn!(binding = %name, %err, "skipping context binding"),
                        }
                    }
                }
                kind => debug!(kind, "ignoring context statement"),
            }
        }

        Ok(scope)
    }

    pub fn bind(&mut self, name: &str, value: Value) {
        self.bindings.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn eval(&self, expr: &Expr) -> Result<Value, EvalError> {
        Interpreter { scope: self }.eval(expr, &Locals::new(), 0)
    }
}

struct Interpreter<'s> {
    scope: &'s Scope,
}

impl Interpreter<'_> {
    fn lookup(&self, name: &str, locals: &Locals) -> Result<Value, EvalError> {
        if let Some(value) = locals.get(name).or_else(|| self.scope.get(name)) {
            return Ok(value.clone());
        }
        global(name).ok_or_else(|| EvalError::NotDefined(name.to_string()))
    }

    fn eval(&self, expr: &Expr, locals: &Locals, depth: usize) -> Result<Value, EvalError> {
        let value = match expr {
            Expr::Undefined => Value::Undefined,
            Expr::Null => Value::Null,
            Expr::Bool(b) => Value::Bool(*b),
            Expr::Number(n) => Value::Number(*n),
            Expr::Str(s) => Value::Str(s.clone()),
            Expr::Template { quasis, exprs } => {
                let mut out = String::new();
                for (i, quasi) in quasis.iter().enumerate() {
                    out.push_str(quasi);
                    if let Some(expr) = exprs.get(i) {
                        out.push_str(&self.eval(expr, locals, depth)?.to_string());
                    }
                }
                Value::Str(out)
            }
            Expr::Regex { pattern, flags } => Value::Regex(Arc::new(compile_regex(pattern, flags)?)),
            Expr::Ident(name) => self.lookup(name, locals)?,
            Expr::Member { object, property } => {
                let object = self.eval(object, locals, depth)?;
                let property = self.eval(property, locals, depth)?.to_string();
                get_property(&object, &property)?
            }
            Expr::Call { callee, args } => self.eval_call(callee, args, locals, depth)?,
            Expr::Unary { operator, argument } => {
                let argument = self.eval(argument, locals, depth)?;
                match *operator {
                    "-" => Value::Number(-argument.to_number()),
                    "+" => Value::Number(argument.to_number()),
                    "!" => Value::Bool(!argument.truthy()),
                    "typeof" => Value::Str(argument.type_name().to_string()),
                    other => return Err(EvalError::Unsupported(format!("unary operator `{other}`"))),
                }
            }
            Expr::Binary { operator, left, right } => self.eval_binary(operator, left, right, locals, depth)?,
            Expr::Conditional { test, consequent, alternate } => {
                if self.eval(test, locals, depth)?.truthy() {
                    self.eval(consequent, locals, depth)?
                } else {
                    self.eval(alternate, locals, depth)?
                }
            }
            Expr::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.eval(item, locals, depth))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Expr::Object(entries) => {
                let mut map = IndexMap::new();
                for (key, value) in entries {
                    map.insert(key.clone(), self.eval(value, locals, depth)?);
                }
                Value::Object(map)
            }
            Expr::Function(function) => Value::Function(Arc::new(Closure {
                function: Arc::clone(function),
                captured: locals.clone(),
            })),
        };
        Ok(value)
    }

    fn eval_binary(
        &self,
        operator: &str,
        left: &Expr,
        right: &Expr,
        locals: &Locals,
        depth: usize,
    ) -> Result<Value, EvalError> {
        let left = self.eval(left, locals, depth)?;
        match operator {
            "&&" if !left.truthy() => return Ok(left),
            "||" if left.truthy() => return Ok(left),
            "??" if !left.is_nullish() => return Ok(left),
            "&&" | "||" | "??" => return self.eval(right, locals, depth),
            _ => {}
        }
        let right = self.eval(right, locals, depth)?;

        let number = |f: fn(f64, f64) -> f64| Value::Number(f(left.to_number(), right.to_number()));
        let value = match operator {
            "+" if is_numeric_operand(&left) && is_numeric_operand(&right) => {
                Value::Number(left.to_number() + right.to_number())
            }
            "+" => Value::Str(format!("{left}{right}")),
            "-" => number(|a, b| a - b),
            "*" => number(|a, b| a * b),
            "/" => number(|a, b| a / b),
            "%" => number(|a, b| a % b),
            "**" => number(f64::powf),
            "===" => Value::Bool(left.strict_eq(&right)),
            "!==" => Value::Bool(!left.strict_eq(&right)),
            "==" => Value::Bool(left.loose_eq(&right)),
            "!=" => Value::Bool(!left.loose_eq(&right)),
            "<" | ">" | "<=" | ">=" => Value::Bool(compare(operator, &left, &right)),
            other => return Err(EvalError::Unsupported(format!("binary operator `{other}`"))),
        };
        Ok(value)
    }

    fn eval_call(&self, callee: &Expr, args: &[Expr], locals: &Locals, depth: usize) -> Result<Value, EvalError> {
        let args = args
            .iter()
            .map(|arg| self.eval(arg, locals, depth))
            .collect::<Result<Vec<_>, _>>()?;

        if let Expr::Member { object, property } = callee {
            let receiver = self.eval(object, locals, depth)?;
            let method = self.eval(property, locals, depth)?.to_string();
            if let Some(result) = call_method(&receiver, &method, &args)? {
                return Ok(result);
            }
            let function = get_property(&receiver, &method)?;
            return self.apply(&function, &method, args, depth);
        }

        let function = self.eval(callee, locals, depth)?;
        let name = match callee {
            Expr::Ident(name) => name.as_str(),
            _ => "expression",
        };
        self.apply(&function, name, args, depth)
    }

    fn apply(&self, function: &Value, name: &str, args: Vec<Value>, depth: usize) -> Result<Value, EvalError> {
        match function {
            Value::Function(closure) => {
                if depth >= MAX_CALL_DEPTH {
                    return Err(EvalError::Unsupported(format!("call depth of `{name}` exceeds {MAX_CALL_DEPTH}")));
                }
                self.call_closure(closure, args, depth + 1)
            }
            Value::Builtin(builtin) => call_builtin(*builtin, &args),
            _ => Err(EvalError::NotCallable(name.to_string())),
        }
    }

    fn call_closure(&self, closure: &Closure, args: Vec<Value>, depth: usize) -> Result<Value, EvalError> {
        let Function { params, locals, body } = closure.function.as_ref();
        let mut frame = closure.captured.clone();
        let mut args = args.into_iter();
        for param in params {
            frame.insert(param.clone(), args.next().unwrap_or(Value::Undefined));
        }
        for (name, init) in locals {
            let value = self.eval(init, &frame, depth)?;
            frame.insert(name.clone(), value);
        }
        self.eval(body, &frame, depth)
    }
}

/// Operands `+` adds instead of concatenating.
fn is_numeric_operand(value: &Value) -> bool {
    matches!(value, Value::Number(_) | Value::Bool(_) | Value::Null | Value::Undefined)
}

fn global(name: &str) -> Option<Value> {
    let value = match name {
        "NaN" => Value::Number(f64::NAN),
        "Infinity" => Value::Number(f64::INFINITY),
        "String" => Value::Builtin(Builtin::String),
        "Number" => Value::Builtin(Builtin::Number),
        "parseFloat" => Value::Builtin(Builtin::ParseFloat),
        "parseInt" => Value::Builtin(Builtin::ParseInt),
        "Math" => Value::Object(IndexMap::from([
            ("round".to_string(), Value::Builtin(Builtin::MathRound)),
            ("floor".to_string(), Value::Builtin(Builtin::MathFloor)),
            ("ceil".to_string(), Value::Builtin(Builtin::MathCeil)),
            ("min".to_string(), Value::Builtin(Builtin::MathMin)),
            ("max".to_string(), Value::Builtin(Builtin::MathMax)),
            ("abs".to_string(), Value::Builtin(Builtin::MathAbs)),
            ("PI".to_string(), Value::Number(std::f64::consts::PI)),
        ])),
        _ => return None,
    };
    Some(value)
}

fn get_property(object: &Value, property: &str) -> Result<Value, EvalError> {
    let value = match object {
        Value::Undefined | Value::Null => {
            return Err(EvalError::ReadOfNullish {
                base: object.to_string(),
                property: property.to_string(),
            })
        }
        Value::Object(map) => map.get(property).cloned().unwrap_or(Value::Undefined),
        Value::Array(items) if property == "length" => Value::Number(items.len() as f64),
        Value::Array(items) => property
            .parse::<usize>()
            .ok()
            .and_then(|i| items.get(i).cloned())
            .unwrap_or(Value::Undefined),
        Value::Str(s) if property == "length" => Value::Number(s.encode_utf16().count() as f64),
        Value::Str(s) => property
            .parse::<usize>()
            .ok()
            .and_then(|i| s.chars().nth(i))
            .map_or(Value::Undefined, |c| Value::Str(c.to_string())),
        _ => Value::Undefined,
    };
    Ok(value)
}

fn compare(operator: &str, left: &Value, right: &Value) -> bool {
    if let (Value::Str(a), Value::Str(b)) = (left, right) {
        return match operator {
            "<" => a < b,
            ">" => a > b,
            "<=" => a <= b,
            _ => a >= b,
        };
    }
    let (a, b) = (left.to_number(), right.to_number());
    match operator {
        "<" => a < b,
        ">" => a > b,
        "<=" => a <= b,
        _ => a >= b,
    }
}

fn compile_regex(pattern: &str, flags: &str) -> Result<Pattern, EvalError> {
    let inline: String = flags.chars().filter(|f| matches!(f, 'i' | 'm' | 's')).collect();
    let source = if inline.is_empty() {
        pattern.to_string()
    } else {
        format!("(?{inline}){pattern}")
    };
    let regex = Regex::new(&source).map_err(|e| EvalError::Regex {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;
    Ok(Pattern {
        source: pattern.to_string(),
        flags: flags.to_string(),
        regex,
    })
}

/// Translate a JavaScript replacement string (`$&`, `$1`, `$$`) to the
/// `regex` crate's syntax.
fn js_replacement(replacement: &str) -> String {
    let mut out = String::with_capacity(replacement.len());
    let mut chars = replacement.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '$' {
            out.push(ch);
            continue;
        }
        match chars.peek().copied() {
            Some('$') => {
                chars.next();
                out.push_str("$$");
            }
            Some('&') => {
                chars.next();
                out.push_str("${0}");
            }
            Some(d) if d.is_ascii_digit() => {
                chars.next();
                out.push_str(&format!("${{{d}}}"));
            }
            _ => out.push_str("$$"),
        }
    }
    out
}

fn arg_str(args: &[Value], i: usize) -> Option<String> {
    args.get(i).filter(|v| !matches!(v, Value::Undefined)).map(Value::to_string)
}

fn arg_index(args: &[Value], i: usize, len: usize, default: usize) -> usize {
    match args.get(i) {
        None | Some(Value::Undefined) => default,
        Some(value) => {
            let n = value.to_number();
            if n.is_nan() {
                0
            } else if n < 0.0 {
                len.saturating_sub((-n) as usize)
            } else {
                (n as usize).min(len)
            }
        }
    }
}

/// String, number and array methods. `None` when the receiver has no such
/// built-in method.
fn call_method(receiver: &Value, method: &str, args: &[Value]) -> Result<Option<Value>, EvalError> {
    let value = match receiver {
        Value::Str(s) => match method {
            "replace" | "replaceAll" => Value::Str(replace(s, method == "replaceAll", args)?),
            "toUpperCase" => Value::Str(s.to_uppercase()),
            "toLowerCase" => Value::Str(s.to_lowercase()),
            "trim" => Value::Str(s.trim().to_string()),
            "trimStart" => Value::Str(s.trim_start().to_string()),
            "trimEnd" => Value::Str(s.trim_end().to_string()),
            "toString" | "valueOf" => Value::Str(s.clone()),
            "slice" | "substring" => {
                let chars: Vec<char> = s.chars().collect();
                let len = chars.len();
                let (mut start, mut end) = if method == "slice" {
                    (arg_index(args, 0, len, 0), arg_index(args, 1, len, len))
                } else {
                    let clamp = |i: usize| match args.get(i) {
                        None | Some(Value::Undefined) => if i == 0 { 0 } else { len },
                        Some(v) => v.to_number().max(0.0).min(len as f64) as usize,
                    };
                    (clamp(0), clamp(1))
                };
                if method == "substring" && start > end {
                    std::mem::swap(&mut start, &mut end);
                }
                Value::Str(if start < end { chars[start..end].iter().collect() } else { String::new() })
            }
            "padStart" | "padEnd" => {
                let target = args.first().map_or(0.0, Value::to_number).max(0.0) as usize;
                let fill = arg_str(args, 1).unwrap_or_else(|| " ".to_string());
                let current = s.chars().count();
                if target <= current || fill.is_empty() {
                    Value::Str(s.clone())
                } else {
                    let padding: String = fill.chars().cycle().take(target - current).collect();
                    Value::Str(if method == "padStart" { padding + s } else { format!("{s}{padding}") })
                }
            }
            "startsWith" => Value::Bool(s.starts_with(&arg_str(args, 0).unwrap_or_default())),
            "endsWith" => Value::Bool(s.ends_with(&arg_str(args, 0).unwrap_or_default())),
            "includes" => Value::Bool(s.contains(&arg_str(args, 0).unwrap_or_default())),
            "concat" => Value::Str(args.iter().fold(s.clone(), |acc, arg| format!("{acc}{arg}"))),
            "split" => match arg_str(args, 0) {
                Some(separator) if separator.is_empty() => {
                    Value::Array(s.chars().map(|c| Value::Str(c.to_string())).collect())
                }
                Some(separator) => Value::Array(s.split(separator.as_str()).map(|p| Value::Str(p.to_string())).collect()),
                None => Value::Array(vec![Value::Str(s.clone())]),
            },
            _ => return Ok(None),
        },
        Value::Number(n) => match method {
            "toFixed" => {
                let digits = args.first().map_or(0.0, Value::to_number).clamp(0.0, 100.0) as usize;
                Value::Str(format!("{n:.digits$}"))
            }
            "toString" => Value::Str(format_number(*n)),
            _ => return Ok(None),
        },
        Value::Array(items) => match method {
            "join" => {
                let separator = arg_str(args, 0).unwrap_or_else(|| ",".to_string());
                let parts: Vec<String> = items
                    .iter()
                    .map(|item| if item.is_nullish() { String::new() } else { item.to_string() })
                    .collect();
                Value::Str(parts.join(&separator))
            }
            _ => return Ok(None),
        },
        _ => return Ok(None),
    };
    Ok(Some(value))
}

fn replace(s: &str, all: bool, args: &[Value]) -> Result<String, EvalError> {
    let replacement = match args.get(1) {
        Some(Value::Function(_) | Value::Builtin(_)) => {
            return Err(EvalError::Unsupported("replace() with a replacer function".to_string()))
        }
        Some(value) => value.to_string(),
        None => "undefined".to_string(),
    };
    match args.first() {
        Some(Value::Regex(pattern)) => {
            let expanded = js_replacement(&replacement);
            if all || pattern.is_global() {
                Ok(pattern.regex.replace_all(s, expanded.as_str()).into_owned())
            } else {
                Ok(pattern.regex.replace(s, expanded.as_str()).into_owned())
            }
        }
        Some(needle) => {
            let needle = needle.to_string();
            let regex = Regex::new(&regex::escape(&needle)).map_err(|e| EvalError::Regex {
                pattern: needle.clone(),
                message: e.to_string(),
            })?;
            if all {
                Ok(regex.replace_all(s, NoExpand(&replacement)).into_owned())
            } else {
                Ok(regex.replace(s, NoExpand(&replacement)).into_owned())
            }
        }
        None => Ok(s.to_string()),
    }
}

fn call_builtin(builtin: Builtin, args: &[Value]) -> Result<Value, EvalError> {
    let first = || args.first().map_or(f64::NAN, Value::to_number);
    let value = match builtin {
        // JavaScript rounds halves towards +Infinity.
        Builtin::MathRound => Value::Number((first() + 0.5).floor()),
        Builtin::MathFloor => Value::Number(first().floor()),
        Builtin::MathCeil => Value::Number(first().ceil()),
        Builtin::MathAbs => Value::Number(first().abs()),
        Builtin::MathMin => Value::Number(args.iter().map(Value::to_number).fold(f64::INFINITY, f64::min)),
        Builtin::MathMax => Value::Number(args.iter().map(Value::to_number).fold(f64::NEG_INFINITY, f64::max)),
        Builtin::String => Value::Str(args.first().map_or_else(String::new, Value::to_string)),
        Builtin::Number => Value::Number(args.first().map_or(0.0, Value::to_number)),
        Builtin::ParseFloat | Builtin::ParseInt => {
            let text = arg_str(args, 0).unwrap_or_default();
            let trimmed = text.trim_start();
            let prefix: String = trimmed
                .char_indices()
                .take_while(|(i, c)| {
                    c.is_ascii_digit()
                        || (*i == 0 && (*c == '-' || *c == '+'))
                        || (builtin == Builtin::ParseFloat && *c == '.')
                })
                .map(|(_, c)| c)
                .collect();
            let parsed = prefix.parse::<f64>().unwrap_or(f64::NAN);
            Value::Number(if builtin == Builtin::ParseInt { parsed.trunc() } else { parsed })
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTEXT: &str = r#"
const colors = {
  danger: "var(--bs-danger)",
  info: "var(--bs-info)",
  primary: "var(--bs-primary)",
};

export const spacing = [0, 4, 8];

function hexToRgbA(hex, alpha) {
  return hex.replace(/\)$/, `-alpha${alpha * 100})`);
}

const gap = (n) => `${spacing[n]}px`;
module.exports = { colors };
"#;

    fn eval(scope: &Scope, src: &str) -> Result<Value, EvalError> {
        let doc = Document::parse(src, Dialect::JavaScript).expect("parse expression");
        let statement = named_children(doc.root())[0];
        let expr = named_children(statement)[0];
        let lowered = super::super::expr::lower(expr, doc.text())?;
        scope.eval(&lowered)
    }

    fn scope() -> Scope {
        Scope::from_source(CONTEXT, Dialect::JavaScript).expect("load context")
    }

    #[test]
    fn loads_supported_bindings() {
        let scope = scope();
        assert!(scope.get("colors").is_some());
        assert!(scope.get("spacing").is_some());
        assert!(scope.get("hexToRgbA").is_some());
        assert!(scope.get("gap").is_some());
        assert_eq!(scope.len(), 4);
    }

    #[test]
    fn member_access_and_templates() {
        let scope = scope();
        assert_eq!(eval(&scope, "colors.primary;").unwrap().to_string(), "var(--bs-primary)");
        assert_eq!(
            eval(&scope, "`${colors.info} !important`;").unwrap().to_string(),
            "var(--bs-info) !important"
        );
        assert_eq!(eval(&scope, "gap(2);").unwrap().to_string(), "8px");
    }

    #[test]
    fn function_call_with_regex_replace() {
        let scope = scope();
        assert_eq!(
            eval(&scope, "hexToRgbA(colors.danger, 0.8);").unwrap().to_string(),
            "var(--bs-danger-alpha80)"
        );
    }

    #[test]
    fn missing_bindings_and_properties() {
        let scope = scope();
        assert!(matches!(eval(&scope, "fonts.body;"), Err(EvalError::NotDefined(name)) if name == "fonts"));
        assert!(matches!(eval(&scope, "colors.nope;"), Ok(Value::Undefined)));
        let err = eval(&scope, "colors.nope.deeper;").unwrap_err();
        assert_eq!(err.to_string(), "TypeError: Cannot read properties of undefined (reading 'deeper')");
    }

    #[test]
    fn arithmetic_and_logic() {
        let scope = Scope::default();
        assert_eq!(eval(&scope, "1 + 2 * 3;").unwrap().to_string(), "7");
        assert_eq!(eval(&scope, "'a' + 1;").unwrap().to_string(), "a1");
        assert_eq!(eval(&scope, "null ?? 'x';").unwrap().to_string(), "x");
        assert_eq!(eval(&scope, "0 || 'y';").unwrap().to_string(), "y");
        assert_eq!(eval(&scope, "3 > 2 ? 'big' : 'small';").unwrap().to_string(), "big");
        assert_eq!(eval(&scope, "Math.max(1, 5, 3);").unwrap().to_string(), "5");
        assert_eq!(eval(&scope, "(0.1).toFixed(2);").unwrap().to_string(), "0.10");
    }

    #[test]
    fn string_methods() {
        let scope = Scope::default();
        assert_eq!(eval(&scope, "'abc'.toUpperCase();").unwrap().to_string(), "ABC");
        assert_eq!(eval(&scope, "'a-b-c'.replaceAll('-', '_');").unwrap().to_string(), "a_b_c");
        assert_eq!(eval(&scope, "'a-b-c'.replace('-', '_');").unwrap().to_string(), "a_b-c");
        assert_eq!(eval(&scope, "'7'.padStart(3, '0');").unwrap().to_string(), "007");
        assert_eq!(eval(&scope, "'hello'.slice(-3);").unwrap().to_string(), "llo");
        assert_eq!(eval(&scope, "'#fff'.replace(/#(f+)/, '[$1]');").unwrap().to_string(), "[fff]");
    }

    #[test]
    fn json_scope() {
        let scope = Scope::from_json(r#"{ "colors": { "warning": "var(--bs-warning)" } }"#).unwrap();
        assert_eq!(eval(&scope, "colors.warning;").unwrap().to_string(), "var(--bs-warning)");
    }

    #[test]
    fn replacement_translation() {
        assert_eq!(js_replacement("$1-$&-$$-$x"), "${1}-${0}-$$-$$x");
    }
}
