//! Runtime values and the expression evaluator.
//!
//! Expressions are evaluated fresh at every encounter, against the one
//! shared environment. Three forms exist:
//!
//! ```text
//!     random [a, b, c]      one option, chosen by the injected picker
//!     a + b + c             concatenation – never arithmetic: 2 + 3 is "23"
//!     token                 literal, boolean, number, or variable lookup
//! ```

use std::collections::HashMap;
use std::fmt;

use super::error::RunError;
use super::splitter::{split_concat, split_list, strip_quotes};

/// The one shared variable environment. Single global scope; function
/// bodies read and write the same map as their callers.
pub type Env = HashMap<String, Value>;

/// Source of choices for `random [...]`. Injected so tests and embedders
/// can pin the outcome; production uses a uniform rand-backed picker.
pub trait Picker {
    /// Pick an index in `0..len`. Never called with `len == 0`.
    fn pick(&mut self, len: usize) -> usize;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Num(f64),
    Bool(bool),
}

impl Value {
    /// `false`, `0`, and the empty string are falsy, everything else truthy.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Num(n) => *n != 0.0,
            Value::Str(s) => !s.is_empty(),
        }
    }

    /// Loose integer coercion: whole numbers and strings that parse as one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Num(n) if n.is_finite() && n.fract() == 0.0 => Some(*n as i64),
            Value::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Loose float coercion: numbers and strings that parse as one.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            Value::Str(s) => s.trim().parse().ok(),
            Value::Bool(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{s}"),
            Value::Num(n) => {
                if n.is_finite() && n.fract() == 0.0 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Evaluate one raw value expression against the environment.
pub fn evaluate(expr: &str, env: &Env, picker: &mut dyn Picker) -> Result<Value, RunError> {
    let expr = expr.trim();

    if let Some(list) = expr.strip_prefix("random ") {
        return random_choice(expr, list, picker);
    }

    let segments = split_concat(expr);
    let segments: Vec<&str> = segments
        .iter()
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .collect();

    match segments.as_slice() {
        [] => Ok(Value::Str(String::new())),
        // a lone segment keeps its native type
        [single] => single_token(single, env),
        many => {
            let mut out = String::new();
            for segment in many {
                out.push_str(&single_token(segment, env)?.to_string());
            }
            Ok(Value::Str(out))
        }
    }
}

/// `random [...]`: bracketed options, one chosen by the picker.
/// Zero options yield the empty string.
fn random_choice(expr: &str, list: &str, picker: &mut dyn Picker) -> Result<Value, RunError> {
    let list = list.trim();
    let inner = list
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| RunError::BadRandomList(expr.to_string()))?;

    let options: Vec<String> = split_list(inner)
        .iter()
        .map(|opt| strip_quotes(opt).unwrap_or(opt).to_string())
        .collect();

    if options.is_empty() {
        return Ok(Value::Str(String::new()));
    }
    let choice = picker.pick(options.len());
    Ok(Value::Str(options[choice].clone()))
}

/// One bare token: string literal, boolean, number, or variable.
fn single_token(token: &str, env: &Env) -> Result<Value, RunError> {
    if let Some(inner) = strip_quotes(token) {
        return Ok(Value::Str(inner.to_string()));
    }
    if token.eq_ignore_ascii_case("true") {
        return Ok(Value::Bool(true));
    }
    if token.eq_ignore_ascii_case("false") {
        return Ok(Value::Bool(false));
    }
    if let Ok(n) = token.parse::<f64>() {
        return Ok(Value::Num(n));
    }
    env.get(token)
        .cloned()
        .ok_or_else(|| RunError::UndefinedVariable(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Always picks the same slot, wrapping around the option count.
    struct FixedPicker(usize);

    impl Picker for FixedPicker {
        fn pick(&mut self, len: usize) -> usize {
            self.0 % len
        }
    }

    fn eval(expr: &str, env: &Env) -> Result<Value, RunError> {
        evaluate(expr, env, &mut FixedPicker(0))
    }

    #[test]
    fn test_single_tokens() {
        let mut env = Env::new();
        env.insert("name".into(), Value::Str("Ada".into()));

        let test_cases = vec![
            ("\"hello\"", Value::Str("hello".into())),
            ("'hello'", Value::Str("hello".into())),
            ("42", Value::Num(42.0)),
            ("2.5", Value::Num(2.5)),
            ("true", Value::Bool(true)),
            ("FALSE", Value::Bool(false)),
            ("name", Value::Str("Ada".into())),
        ];

        for (expr, expected) in test_cases {
            assert_eq!(eval(expr, &env).unwrap(), expected, "evaluating {expr:?}");
        }
    }

    #[test]
    fn test_undefined_variable_names_the_token() {
        let result = eval("nobody", &Env::new());
        match result {
            Err(RunError::UndefinedVariable(name)) => assert_eq!(name, "nobody"),
            other => panic!("expected undefined variable, got {other:?}"),
        }
    }

    #[test]
    fn test_concatenation_stringifies() {
        let mut env = Env::new();
        env.insert("name".into(), Value::Str("Ada".into()));

        let test_cases = vec![
            ("\"a\" + \"b\"", "ab"),
            ("\"x\" + 1", "x1"),
            ("2 + 3", "23"),
            ("\"hello, \" + name", "hello, Ada"),
            ("\"yes? \" + true", "yes? true"),
            ("\"a + b\" + \"!\"", "a + b!"),
        ];

        for (expr, expected) in test_cases {
            assert_eq!(
                eval(expr, &env).unwrap(),
                Value::Str(expected.into()),
                "evaluating {expr:?}"
            );
        }
    }

    #[test]
    fn test_lone_segment_keeps_native_type() {
        assert_eq!(eval("7", &Env::new()).unwrap(), Value::Num(7.0));
        assert_eq!(eval("true", &Env::new()).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_random_stays_inside_the_list() {
        let env = Env::new();
        for slot in 0..5 {
            let mut picker = FixedPicker(slot);
            let value = evaluate("random [\"a\", \"b\"]", &env, &mut picker).unwrap();
            assert!(
                value == Value::Str("a".into()) || value == Value::Str("b".into()),
                "got {value:?}"
            );
        }
    }

    #[test]
    fn test_random_quotes_commas_and_brackets() {
        let env = Env::new();
        let value = evaluate("random [\"a, b]\", 'c']", &env, &mut FixedPicker(0)).unwrap();
        assert_eq!(value, Value::Str("a, b]".into()));
    }

    #[test]
    fn test_random_empty_list_is_empty_string() {
        let value = evaluate("random []", &Env::new(), &mut FixedPicker(0)).unwrap();
        assert_eq!(value, Value::Str(String::new()));
    }

    #[test]
    fn test_random_without_brackets_fails() {
        let result = evaluate("random a, b", &Env::new(), &mut FixedPicker(0));
        assert!(matches!(result, Err(RunError::BadRandomList(_))));
    }

    #[test]
    fn test_display_collapses_whole_numbers() {
        assert_eq!(Value::Num(3.0).to_string(), "3");
        assert_eq!(Value::Num(2.5).to_string(), "2.5");
        assert_eq!(Value::Str("hi".into()).to_string(), "hi");
        assert_eq!(Value::Bool(true).to_string(), "true");
    }

    #[test]
    fn test_string_and_number_are_not_equal() {
        assert_ne!(Value::Str("5".into()), Value::Num(5.0));
        assert_eq!(Value::Num(5.0), Value::Num(5.0));
    }

    #[test]
    fn test_coercions() {
        assert_eq!(Value::Num(3.0).as_int(), Some(3));
        assert_eq!(Value::Num(3.5).as_int(), None);
        assert_eq!(Value::Str("4".into()).as_int(), Some(4));
        assert_eq!(Value::Str("four".into()).as_int(), None);
        assert_eq!(Value::Bool(true).as_int(), None);
        assert_eq!(Value::Str("0.5".into()).as_float(), Some(0.5));
        assert!(!Value::Num(0.0).truthy());
        assert!(!Value::Str(String::new()).truthy());
        assert!(Value::Str("no".into()).truthy());
    }
}
