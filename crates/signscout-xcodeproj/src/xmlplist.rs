//! XML property-list parser.
//!
//! Covers the subset emitted by Xcode and by `security cms -D`: `dict`,
//! `array`, `string`, `integer`, `real`, `true`/`false`, `date` and `data`
//! (the last three are carried as strings).

use crate::value::Value;
use roxmltree::{Document, Node, ParsingOptions};
use std::collections::BTreeMap;

#[derive(Debug, thiserror::Error)]
pub enum XmlPlistError {
    #[error("invalid XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("invalid plist: {0}")]
    Structure(String),
}

/// Parse an XML plist document into a [`Value`].
pub fn parse_xml_plist(text: &str) -> Result<Value, XmlPlistError> {
    let doc = Document::parse_with_options(
        text,
        ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        },
    )?;
    let root = doc.root_element();

    let payload = if root.has_tag_name("plist") {
        root.children()
            .find(|n| n.is_element())
            .ok_or_else(|| XmlPlistError::Structure("empty plist element".to_string()))?
    } else {
        root
    };

    convert(payload)
}

fn convert(node: Node) -> Result<Value, XmlPlistError> {
    match node.tag_name().name() {
        "dict" => {
            let mut entries = BTreeMap::new();
            let mut children = node.children().filter(|n| n.is_element());
            while let Some(key_node) = children.next() {
                if !key_node.has_tag_name("key") {
                    return Err(XmlPlistError::Structure(format!(
                        "expected <key>, found <{}>",
                        key_node.tag_name().name()
                    )));
                }
                let key = text_content(key_node);
                let value_node = children.next().ok_or_else(|| {
                    XmlPlistError::Structure(format!("key '{}' has no value", key))
                })?;
                entries.insert(key, convert(value_node)?);
            }
            Ok(Value::Dict(entries))
        }
        "array" => {
            let items = node
                .children()
                .filter(|n| n.is_element())
                .map(convert)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(items))
        }
        "string" | "date" | "data" => Ok(Value::String(text_content(node))),
        "integer" => {
            let text = text_content(node);
            text.trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| XmlPlistError::Structure(format!("invalid integer '{}'", text)))
        }
        "real" => Ok(Value::String(text_content(node))),
        "true" => Ok(Value::Bool(true)),
        "false" => Ok(Value::Bool(false)),
        other => Err(XmlPlistError::Structure(format!(
            "unsupported element <{}>",
            other
        ))),
    }
}

fn text_content(node: Node) -> String {
    node.children()
        .filter_map(|n| n.text())
        .collect::<String>()
        .trim()
        .to_string()
}
