//! Classification of the marker tags and attributes that turn a plain
//! element tree into a template with dynamic points.

use thiserror::Error;

pub const TEXT_TAG: &str = "block-text-";
pub const CHILD_TAG: &str = "block-child-";
pub const HANDLER_ATTR: &str = "block-handler-";
pub const ATTRIBUTE_ATTR: &str = "block-attribute-";
pub const ATTRIBUTES_ATTR: &str = "block-attributes";
pub const REF_ATTR: &str = "block-ref";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkerError {
    #[error("invalid data index in marker `{0}`")]
    BadIndex(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagMarker {
    Text(usize),
    Child(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrMarker {
    Handler { index: usize, event: String },
    Attribute { index: usize, name: String },
    Attributes(usize),
    Ref(usize),
    Static,
}

fn parse_index(digits: &str, marker: &str) -> Result<usize, MarkerError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MarkerError::BadIndex(marker.to_string()));
    }
    digits
        .parse()
        .map_err(|_| MarkerError::BadIndex(marker.to_string()))
}

/// `Ok(None)` for ordinary tags.
pub fn tag_marker(tag: &str) -> Result<Option<TagMarker>, MarkerError> {
    if let Some(n) = tag.strip_prefix(TEXT_TAG) {
        return parse_index(n, tag).map(|i| Some(TagMarker::Text(i)));
    }
    if let Some(n) = tag.strip_prefix(CHILD_TAG) {
        return parse_index(n, tag).map(|i| Some(TagMarker::Child(i)));
    }
    Ok(None)
}

pub fn attr_marker(name: &str, value: &str) -> Result<AttrMarker, MarkerError> {
    if let Some(n) = name.strip_prefix(HANDLER_ATTR) {
        let index = parse_index(n, name)?;
        return Ok(AttrMarker::Handler {
            index,
            event: value.to_string(),
        });
    }
    if let Some(n) = name.strip_prefix(ATTRIBUTE_ATTR) {
        let index = parse_index(n, name)?;
        return Ok(AttrMarker::Attribute {
            index,
            name: value.to_string(),
        });
    }
    if name == ATTRIBUTES_ATTR {
        return parse_index(value.trim(), name).map(AttrMarker::Attributes);
    }
    if name == REF_ATTR {
        return parse_index(value.trim(), name).map(AttrMarker::Ref);
    }
    Ok(AttrMarker::Static)
}
