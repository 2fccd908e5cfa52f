//! Setters and updaters for every dynamic location in a block: text,
//! attributes, IDL properties, classes, handlers and refs.

use indexmap::IndexSet;
use kiln_dom::{Document, NodeId, Value};

/// How a data value reaches the node captured for a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    Text,
    /// IDL property, for the attributes in [`is_prop`].
    Prop(String),
    Class,
    Attr(String),
    /// A `[name, value]` pair or a map of attributes.
    Attrs,
    Handler(String),
    Ref,
}

impl Binding {
    /// Binding for `block-attribute-N="name"` on `tag`.
    pub fn for_attribute(tag: &str, name: &str) -> Self {
        if is_prop(tag, name) {
            Binding::Prop(name.to_string())
        } else if name == "class" {
            Binding::Class
        } else {
            Binding::Attr(name.to_string())
        }
    }

    /// Applies `value` on mount.
    pub fn set(&self, dom: &mut Document, node: NodeId, value: &Value) {
        match self {
            Binding::Text => dom.set_text(node, &value.to_text()),
            Binding::Prop(name) => dom.set_property(node, name, value.clone()),
            Binding::Class => {
                for token in class_tokens(value) {
                    dom.add_class(node, &token);
                }
            }
            Binding::Attr(name) => set_attr(dom, node, name, value),
            Binding::Attrs => set_attrs(dom, node, value),
            Binding::Handler(event) => dom.set_handler(node, event, value.clone()),
            Binding::Ref => {
                if let Value::Ref(f) = value {
                    f(Some(node));
                }
            }
        }
    }

    /// Applies `value` on patch; `old` is the value from the previous render.
    pub fn update(&self, dom: &mut Document, node: NodeId, value: &Value, old: &Value) {
        match self {
            Binding::Class => update_class(dom, node, value, old),
            Binding::Attrs => update_attrs(dom, node, value, old),
            // ref callbacks only fire on mount and removal
            Binding::Ref => {}
            _ => self.set(dom, node, value),
        }
    }
}

/// Attributes that are assigned as IDL properties rather than attributes.
pub fn is_prop(tag: &str, name: &str) -> bool {
    match tag {
        "input" => matches!(
            name,
            "checked" | "indeterminate" | "value" | "readonly" | "disabled"
        ),
        "option" => matches!(name, "selected" | "disabled"),
        "textarea" => matches!(name, "readonly" | "disabled"),
        "button" | "select" | "optgroup" => name == "disabled",
        _ => false,
    }
}

fn set_attr(dom: &mut Document, node: NodeId, name: &str, value: &Value) {
    match value {
        Value::Bool(false) => dom.remove_attribute(node, name),
        Value::Bool(true) => dom.set_attribute(node, name, ""),
        v => dom.set_attribute(node, name, v.to_text()),
    }
}

fn set_attrs(dom: &mut Document, node: NodeId, attrs: &Value) {
    match attrs {
        Value::List(pair) => {
            if let Some((name, value)) = as_pair(pair) {
                set_attr(dom, node, name, value);
            }
        }
        Value::Map(map) => {
            for (name, value) in map.iter() {
                set_attr(dom, node, name, value);
            }
        }
        Value::Null => {}
        other => tracing::warn!("attribute bag {:?} is neither a pair nor a map", other),
    }
}

fn update_attrs(dom: &mut Document, node: NodeId, attrs: &Value, old: &Value) {
    match (attrs, old) {
        (Value::List(pair), Value::List(old_pair)) => {
            let (Some((name, value)), Some((old_name, old_value))) = (as_pair(pair), as_pair(old_pair))
            else {
                return set_attrs(dom, node, attrs);
            };
            if name != old_name {
                dom.remove_attribute(node, old_name);
            } else if value.same(old_value) {
                return;
            }
            set_attr(dom, node, name, value);
        }
        (Value::Map(map), Value::Map(old_map)) => {
            for name in old_map.keys() {
                if !map.contains_key(name) {
                    dom.remove_attribute(node, name);
                }
            }
            for (name, value) in map.iter() {
                if !old_map.get(name).is_some_and(|old| old.same(value)) {
                    set_attr(dom, node, name, value);
                }
            }
        }
        _ => {
            for name in attr_names(old) {
                dom.remove_attribute(node, &name);
            }
            set_attrs(dom, node, attrs);
        }
    }
}

fn as_pair(items: &[Value]) -> Option<(&str, &Value)> {
    match items {
        [name, value, ..] => name.as_str().map(|n| (n, value)),
        _ => None,
    }
}

fn attr_names(attrs: &Value) -> Vec<String> {
    match attrs {
        Value::List(pair) => as_pair(pair)
            .map(|(name, _)| vec![name.to_string()])
            .unwrap_or_default(),
        Value::Map(map) => map.keys().cloned().collect(),
        _ => Vec::new(),
    }
}

/// Normalizes a class value into its set of tokens.
///
/// Strings are split on whitespace. Maps contribute the keys of truthy
/// entries, each key possibly holding several tokens. `Null` is empty; any
/// other value goes through its text form.
pub fn class_tokens(value: &Value) -> IndexSet<String> {
    fn split(s: &str, out: &mut IndexSet<String>) {
        out.extend(s.split_whitespace().map(str::to_string));
    }
    let mut tokens = IndexSet::new();
    match value {
        Value::Null => {}
        Value::Str(s) => split(s, &mut tokens),
        Value::Map(map) => {
            for (key, on) in map.iter() {
                if on.is_truthy() {
                    split(key, &mut tokens);
                }
            }
        }
        other => split(&other.to_text(), &mut tokens),
    }
    tokens
}

fn update_class(dom: &mut Document, node: NodeId, value: &Value, old: &Value) {
    let old = class_tokens(old);
    let new = class_tokens(value);
    for token in old.difference(&new) {
        dom.remove_class(node, token);
    }
    for token in new.difference(&old) {
        dom.add_class(node, token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prop_allow_list() {
        assert!(is_prop("input", "value"));
        assert!(is_prop("option", "selected"));
        assert!(is_prop("select", "disabled"));
        assert!(!is_prop("select", "value"));
        assert!(!is_prop("div", "value"));
        assert_eq!(Binding::for_attribute("div", "class"), Binding::Class);
        assert_eq!(Binding::for_attribute("a", "href"), Binding::Attr("href".into()));
    }

    #[test]
    fn class_tokens_from_values() {
        let t = |v: Value| class_tokens(&v).into_iter().collect::<Vec<_>>();
        assert_eq!(t(" a  b ".into()), ["a", "b"]);
        assert_eq!(
            t(Value::map([("a b", true.into()), ("c", false.into()), ("d", 1.into())])),
            ["a", "b", "d"]
        );
        assert_eq!(t(Value::Null), Vec::<String>::new());
        assert_eq!(t(3.into()), ["3"]);
    }
}
