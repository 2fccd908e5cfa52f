use pest::Parser;
use pest::error::LineColLocation;
use pest::iterators::Pair;
use thiserror::Error;

use crate::template_ast::{Node, TemplateAttr};

#[derive(pest_derive::Parser)]
#[grammar = "markup.pest"]
struct MarkupParser;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("malformed markup at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },
}

impl From<pest::error::Error<Rule>> for ParseError {
    fn from(e: pest::error::Error<Rule>) -> Self {
        let (line, column) = match e.line_col {
            LineColLocation::Pos(pos) => pos,
            LineColLocation::Span(start, _) => start,
        };
        ParseError::Syntax {
            line,
            column,
            message: e.variant.message().into_owned(),
        }
    }
}

/// Parses markup into a list of top-level nodes.
///
/// Text and attribute values have their character references decoded.
/// Whitespace is kept verbatim; see [`crate::normalize_whitespace`].
pub fn parse_markup(input: &str) -> Result<Vec<Node>, ParseError> {
    let mut pairs = MarkupParser::parse(Rule::document, input)?;
    let Some(document) = pairs.next() else {
        return Ok(Vec::new());
    };
    debug_assert!(document.as_rule() == Rule::document);
    Ok(document.into_inner().filter_map(build_node).collect())
}

fn build_node(pair: Pair<Rule>) -> Option<Node> {
    match pair.as_rule() {
        Rule::element | Rule::void_element => Some(build_element(pair)),
        Rule::text => Some(Node::Text(decode_entities(pair.as_str()))),
        Rule::comment => Some(Node::Comment(inner_str(pair))),
        Rule::cdata => Some(Node::CData(inner_str(pair))),
        Rule::doctype => Some(Node::Doctype(inner_str(pair).trim().to_string())),
        Rule::pi => Some(Node::ProcessingInstruction(inner_str(pair))),
        // EOI
        _ => None,
    }
}

fn inner_str(pair: Pair<Rule>) -> String {
    pair.into_inner()
        .next()
        .map(|p| p.as_str().to_string())
        .unwrap_or_default()
}

fn build_element(pair: Pair<Rule>) -> Node {
    let mut tag = String::new();
    let mut attrs = Vec::new();
    let mut children = Vec::new();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::tag_name | Rule::void_name => tag = inner.as_str().to_string(),
            Rule::attribute => attrs.push(build_attribute(inner)),
            _ => children.extend(build_node(inner)),
        }
    }
    Node::Element {
        tag,
        attrs,
        children,
    }
}

fn build_attribute(pair: Pair<Rule>) -> TemplateAttr {
    let mut name = String::new();
    let mut value = String::new();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::attr_name => name = inner.as_str().to_string(),
            Rule::dq_value | Rule::sq_value => value = decode_entities(inner.as_str()),
            _ => {}
        }
    }
    TemplateAttr { name, value }
}

/// Decodes the predefined XML entities, `&nbsp;` and numeric character
/// references. Unknown references are kept as written.
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest.find(';').and_then(|semi| {
            let c = match &rest[1..semi] {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                num => num.strip_prefix('#').and_then(|n| {
                    let code = match n.strip_prefix(['x', 'X']) {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => n.parse().ok(),
                    };
                    code.and_then(char::from_u32)
                }),
            };
            c.map(|c| (c, semi))
        });
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entities() {
        assert_eq!(decode_entities("a &amp; b"), "a & b");
        assert_eq!(decode_entities("&lt;p&gt;"), "<p>");
        assert_eq!(decode_entities("&#65;&#x42;"), "AB");
        assert_eq!(decode_entities("&bogus; &"), "&bogus; &");
    }
}
