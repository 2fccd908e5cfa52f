use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::NodeId;

/// Event delivered through the delegated handler registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub name: String,
    pub target: NodeId,
}

impl Event {
    pub fn new(name: impl Into<String>, target: NodeId) -> Self {
        Self { name: name.into(), target }
    }
}

/// Event callback: receives the bound argument (`Null` for plain handlers) and the event.
pub type HandlerFn = Rc<dyn Fn(&Value, &Event)>;
/// Element reference callback: `Some(element)` on mount, `None` on removal.
pub type RefFn = Rc<dyn Fn(Option<NodeId>)>;

/// A dynamic value held in a block's data array.
///
/// Comparison between render passes goes through [`Value::same`], which
/// mirrors strict identity: scalars and strings compare by value, everything
/// behind an `Rc` compares by pointer.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Str(Rc<str>),
    List(Rc<[Value]>),
    Map(Rc<IndexMap<String, Value>>),
    Handler(HandlerFn),
    Ref(RefFn),
    Display(Rc<dyn fmt::Display>),
}

impl Value {
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(items.into_iter().collect())
    }

    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Map(Rc::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    pub fn handler(f: impl Fn(&Value, &Event) + 'static) -> Self {
        Value::Handler(Rc::new(f))
    }

    pub fn callback_ref(f: impl Fn(Option<NodeId>) + 'static) -> Self {
        Value::Ref(Rc::new(f))
    }

    pub fn display(v: impl fmt::Display + 'static) -> Self {
        Value::Display(Rc::new(v))
    }

    /// Strict identity, as used to skip unchanged slots.
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
            (Value::Map(a), Value::Map(b)) => Rc::ptr_eq(a, b),
            (Value::Handler(a), Value::Handler(b)) => Rc::ptr_eq(a, b),
            (Value::Ref(a), Value::Ref(b)) => Rc::ptr_eq(a, b),
            (Value::Display(a), Value::Display(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
            _ => true,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Display string for text content and attribute values.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(true) => "true".to_string(),
            Value::Bool(false) => "false".to_string(),
            Value::Number(n) => number_to_text(*n),
            Value::Str(s) => s.to_string(),
            Value::List(items) => items
                .iter()
                .map(Value::to_text)
                .collect::<Vec<_>>()
                .join(","),
            Value::Map(_) => "[object Object]".to_string(),
            Value::Handler(_) | Value::Ref(_) => String::new(),
            Value::Display(d) => d.to_string(),
        }
    }
}

fn number_to_text(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let s = if n > 0.0 { "Infinity" } else { "-Infinity" };
        s.to_string()
    } else if n == 0.0 {
        // -0 prints as 0
        "0".to_string()
    } else if (1e-6..1e21).contains(&n.abs()) {
        n.to_string()
    } else {
        // exponent form with an explicit sign: 1e+21, 1.5e-7
        let exp = format!("{n:e}");
        match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
            _ => exp,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Value::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Value::List(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Map(map) => f.debug_map().entries(map.iter()).finish(),
            Value::Handler(h) => write!(f, "Handler({:p})", Rc::as_ptr(h)),
            Value::Ref(r) => write!(f, "Ref({:p})", Rc::as_ptr(r)),
            Value::Display(d) => write!(f, "Display({d})"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}
impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}
impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}
impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n.into())
    }
}
impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}
impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.into())
    }
}
impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s.into())
    }
}
impl From<Rc<str>> for Value {
    fn from(s: Rc<str>) -> Self {
        Value::Str(s)
    }
}
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_coercion() {
        assert_eq!(Value::from(1).to_text(), "1");
        assert_eq!(Value::from(1.5).to_text(), "1.5");
        assert_eq!(Value::Number(f64::NAN).to_text(), "NaN");
        assert_eq!(Value::Number(f64::NEG_INFINITY).to_text(), "-Infinity");
        assert_eq!(Value::from(true).to_text(), "true");
        assert_eq!(Value::Null.to_text(), "");
        assert_eq!(Value::list([1.into(), "a".into()]).to_text(), "1,a");
        assert_eq!(Value::map([("a", Value::Null)]).to_text(), "[object Object]");
        assert_eq!(Value::display(42u8).to_text(), "42");
    }

    #[test]
    fn large_and_tiny_numbers_use_exponent_form() {
        assert_eq!(Value::Number(1e21).to_text(), "1e+21");
        assert_eq!(Value::Number(-2.5e22).to_text(), "-2.5e+22");
        assert_eq!(Value::Number(1e-7).to_text(), "1e-7");
        assert_eq!(Value::Number(1.5e-7).to_text(), "1.5e-7");
        assert_eq!(Value::Number(1e20).to_text(), "100000000000000000000");
        assert_eq!(Value::Number(0.000001).to_text(), "0.000001");
    }

    #[test]
    fn identity() {
        assert!(Value::from("a").same(&Value::from("a")));
        assert!(!Value::Number(f64::NAN).same(&Value::Number(f64::NAN)));
        let list = Value::list([1.into()]);
        assert!(list.same(&list.clone()));
        assert!(!list.same(&Value::list([1.into()])));
        assert!(!Value::from(0).same(&Value::from(false)));
    }
}
