//! Markup front end for block templates: a strict markup parser, whitespace
//! normalization and the marker grammar.

pub mod marker;
mod normalize;
pub mod template_ast;
pub mod template_parse;

pub use marker::{AttrMarker, MarkerError, TagMarker, attr_marker, tag_marker};
pub use normalize::normalize_whitespace;
pub use template_ast::{Node, TemplateAttr};
pub use template_parse::{ParseError, decode_entities, parse_markup};
