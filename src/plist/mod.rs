//! Minimal XML property-list reader.
//!
//! Supports the subset of the Apple plist vocabulary that texture-atlas
//! manifests use: `dict`, `array`, `string`, `integer`, `real`, `true` and
//! `false`. Dictionaries preserve document order, because downstream
//! consumers iterate frames in manifest order.

use std::path::Path;

use roxmltree::Node;

use crate::error::SheetsplitError;

/// One decoded property-list value.
#[derive(Clone, Debug, PartialEq)]
pub enum PlistValue {
    /// Key/value pairs in document order.
    Dict(Vec<(String, PlistValue)>),
    Array(Vec<PlistValue>),
    String(String),
    Integer(i64),
    Real(f64),
    Boolean(bool),
}

impl PlistValue {
    /// Look up a key in a dictionary value. Returns `None` for non-dicts.
    pub fn get(&self, key: &str) -> Option<&PlistValue> {
        match self {
            PlistValue::Dict(entries) => entries
                .iter()
                .find(|(entry_key, _)| entry_key == key)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&[(String, PlistValue)]> {
        match self {
            PlistValue::Dict(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PlistValue::String(value) => Some(value),
            _ => None,
        }
    }

    /// Numeric coercion: integers directly, reals truncated toward zero.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PlistValue::Integer(value) => Some(*value),
            PlistValue::Real(value) => Some(*value as i64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PlistValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }
}

/// Parse a property-list document from a UTF-8 string.
///
/// `path` is used for error context only; pass a placeholder for in-memory
/// input.
pub fn parse_plist_str(text: &str, path: &Path) -> Result<PlistValue, SheetsplitError> {
    // Apple plists open with a DOCTYPE declaration, which roxmltree rejects
    // unless DTDs are explicitly allowed.
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    let document = roxmltree::Document::parse_with_options(text, options).map_err(|source| {
        SheetsplitError::PlistParse {
            path: path.to_path_buf(),
            message: source.to_string(),
        }
    })?;

    let root = document.root_element();
    let value_node = if root.tag_name().name() == "plist" {
        first_element_child(root).ok_or_else(|| SheetsplitError::PlistParse {
            path: path.to_path_buf(),
            message: "empty <plist> document".to_string(),
        })?
    } else {
        // Some tools emit the top-level dict without the <plist> wrapper.
        root
    };

    parse_value(value_node, path)
}

fn parse_value(node: Node<'_, '_>, path: &Path) -> Result<PlistValue, SheetsplitError> {
    match node.tag_name().name() {
        "dict" => parse_dict(node, path),
        "array" => {
            let mut values = Vec::new();
            for child in node.children().filter(Node::is_element) {
                values.push(parse_value(child, path)?);
            }
            Ok(PlistValue::Array(values))
        }
        "string" => Ok(PlistValue::String(node.text().unwrap_or("").to_string())),
        "integer" => {
            let raw = node.text().unwrap_or("").trim();
            raw.parse::<i64>()
                .map(PlistValue::Integer)
                .map_err(|_| plist_error(path, format!("invalid <integer> value '{raw}'")))
        }
        "real" => {
            let raw = node.text().unwrap_or("").trim();
            raw.parse::<f64>()
                .map(PlistValue::Real)
                .map_err(|_| plist_error(path, format!("invalid <real> value '{raw}'")))
        }
        "true" => Ok(PlistValue::Boolean(true)),
        "false" => Ok(PlistValue::Boolean(false)),
        other => Err(plist_error(
            path,
            format!("unsupported plist element <{other}>"),
        )),
    }
}

fn parse_dict(node: Node<'_, '_>, path: &Path) -> Result<PlistValue, SheetsplitError> {
    let mut entries = Vec::new();
    let mut pending_key: Option<String> = None;

    for child in node.children().filter(Node::is_element) {
        if child.tag_name().name() == "key" {
            if pending_key.is_some() {
                return Err(plist_error(
                    path,
                    "<key> not followed by a value in <dict>".to_string(),
                ));
            }
            pending_key = Some(child.text().unwrap_or("").to_string());
        } else {
            let key = pending_key.take().ok_or_else(|| {
                plist_error(path, "value without preceding <key> in <dict>".to_string())
            })?;
            entries.push((key, parse_value(child, path)?));
        }
    }

    if let Some(key) = pending_key {
        return Err(plist_error(
            path,
            format!("dangling <key> '{key}' at end of <dict>"),
        ));
    }

    Ok(PlistValue::Dict(entries))
}

fn plist_error(path: &Path, message: String) -> SheetsplitError {
    SheetsplitError::PlistParse {
        path: path.to_path_buf(),
        message,
    }
}

fn first_element_child<'a, 'input>(node: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
    node.children().find(Node::is_element)
}
