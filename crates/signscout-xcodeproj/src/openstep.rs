//! OpenStep property-list parser.
//!
//! `.pbxproj` files are ASCII plists: one top-level dictionary of
//! `key = value;` entries, with `(..)` arrays, `{..}` dictionaries, quoted
//! and unquoted strings, and both `/* .. */` and `// ..` comments (Xcode
//! annotates nearly every identifier with a block comment).

use crate::value::Value;
use std::collections::BTreeMap;

/// Parse error with a 1-based line number.
#[derive(Debug, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct OpenStepError {
    pub line: usize,
    pub message: String,
}

/// Parse an OpenStep plist document. The top-level value must be a
/// dictionary, as it always is in `.pbxproj` files.
pub fn parse_pbxproj(input: &str) -> Result<Value, OpenStepError> {
    let mut parser = Parser {
        bytes: input.as_bytes(),
        pos: 0,
    };
    parser.skip_trivia();
    let value = parser.parse_value()?;
    parser.skip_trivia();
    if parser.pos != parser.bytes.len() {
        return Err(parser.error("trailing content after document"));
    }
    match value {
        Value::Dict(_) => Ok(value),
        _ => Err(OpenStepError {
            line: 1,
            message: "top-level value is not a dictionary".to_string(),
        }),
    }
}

/// Characters allowed in unquoted OpenStep strings.
fn is_bare_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'$' | b'+' | b'/' | b':' | b'.' | b'-' | b'@')
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, message: impl Into<String>) -> OpenStepError {
        let line = self.bytes[..self.pos.min(self.bytes.len())]
            .iter()
            .filter(|&&b| b == b'\n')
            .count()
            + 1;
        OpenStepError {
            line,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek();
        if b.is_some() {
            self.pos += 1;
        }
        b
    }

    /// Skip whitespace and both comment forms.
    fn skip_trivia(&mut self) {
        loop {
            while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
                self.pos += 1;
            }
            match (self.peek(), self.bytes.get(self.pos + 1).copied()) {
                (Some(b'/'), Some(b'/')) => {
                    while !matches!(self.peek(), None | Some(b'\n')) {
                        self.pos += 1;
                    }
                }
                (Some(b'/'), Some(b'*')) => {
                    self.pos += 2;
                    while self.pos + 1 < self.bytes.len()
                        && !(self.bytes[self.pos] == b'*' && self.bytes[self.pos + 1] == b'/')
                    {
                        self.pos += 1;
                    }
                    self.pos = (self.pos + 2).min(self.bytes.len());
                }
                _ => break,
            }
        }
    }

    fn parse_value(&mut self) -> Result<Value, OpenStepError> {
        match self.peek() {
            Some(b'{') => self.parse_dict(),
            Some(b'(') => self.parse_array(),
            Some(b'"') => Ok(Value::String(self.parse_quoted()?)),
            Some(b) if is_bare_char(b) => Ok(Value::String(self.parse_bare())),
            Some(b) => Err(self.error(format!("unexpected character '{}'", b as char))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn parse_dict(&mut self) -> Result<Value, OpenStepError> {
        self.bump(); // '{'
        let mut entries = BTreeMap::new();
        loop {
            self.skip_trivia();
            if self.peek() == Some(b'}') {
                self.bump();
                return Ok(Value::Dict(entries));
            }
            let key = match self.peek() {
                Some(b'"') => self.parse_quoted()?,
                Some(b) if is_bare_char(b) => self.parse_bare(),
                _ => return Err(self.error("expected dictionary key")),
            };
            self.skip_trivia();
            if self.bump() != Some(b'=') {
                return Err(self.error(format!("expected '=' after key '{}'", key)));
            }
            self.skip_trivia();
            let value = self.parse_value()?;
            self.skip_trivia();
            if self.bump() != Some(b';') {
                return Err(self.error(format!("expected ';' after value for key '{}'", key)));
            }
            entries.insert(key, value);
        }
    }

    fn parse_array(&mut self) -> Result<Value, OpenStepError> {
        self.bump(); // '('
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            match self.peek() {
                Some(b')') => {
                    self.bump();
                    return Ok(Value::Array(items));
                }
                None => return Err(self.error("unterminated array")),
                _ => {}
            }
            items.push(self.parse_value()?);
            self.skip_trivia();
            match self.peek() {
                Some(b',') => {
                    self.bump();
                }
                Some(b')') => {}
                _ => return Err(self.error("expected ',' or ')' in array")),
            }
        }
    }

    fn parse_bare(&mut self) -> String {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if is_bare_char(b)) {
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned()
    }

    fn parse_quoted(&mut self) -> Result<String, OpenStepError> {
        self.bump(); // '"'
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some(b'"') => return Ok(out),
                Some(b'\\') => match self.bump() {
                    Some(b'n') => out.push('\n'),
                    Some(b't') => out.push('\t'),
                    Some(b'r') => out.push('\r'),
                    Some(b'U') => {
                        let mut code = 0u32;
                        for _ in 0..4 {
                            match self.bump().and_then(|b| (b as char).to_digit(16)) {
                                Some(d) => code = code * 16 + d,
                                None => return Err(self.error("invalid \\U escape")),
                            }
                        }
                        out.push(char::from_u32(code).unwrap_or('\u{fffd}'));
                    }
                    Some(b) => out.push(b as char),
                    None => return Err(self.error("unterminated escape")),
                },
                Some(b) if b < 0x80 => out.push(b as char),
                Some(b) => {
                    // multi-byte UTF-8 sequence; copy it through verbatim
                    let len = match b {
                        0xc0..=0xdf => 2,
                        0xe0..=0xef => 3,
                        _ => 4,
                    };
                    let start = self.pos - 1;
                    let end = (start + len).min(self.bytes.len());
                    out.push_str(&String::from_utf8_lossy(&self.bytes[start..end]));
                    self.pos = end;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_document() {
        let doc = "// !$*UTF8*$!\n{ archiveVersion = 1; objects = {}; }";
        let value = parse_pbxproj(doc).unwrap();
        assert_eq!(value.get_str("archiveVersion"), Some("1"));
        assert!(value.get("objects").unwrap().as_dict().unwrap().is_empty());
    }

    #[test]
    fn test_parse_comments_and_arrays() {
        let doc = r#"{
            targets = (
                13B07F86 /* App */,
                00E8AA11 /* Ext */,
            );
        }"#;
        let value = parse_pbxproj(doc).unwrap();
        let targets = value.get("targets").unwrap().as_array().unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].as_str(), Some("13B07F86"));
    }

    #[test]
    fn test_parse_quoted_strings() {
        let doc = r#"{ productType = "com.apple.product-type.application";
                       name = "My \"App\""; }"#;
        let value = parse_pbxproj(doc).unwrap();
        assert_eq!(
            value.get_str("productType"),
            Some("com.apple.product-type.application")
        );
        assert_eq!(value.get_str("name"), Some("My \"App\""));
    }

    #[test]
    fn test_parse_nested_dict() {
        let doc = r#"{
            objects = {
                AA /* target */ = {
                    isa = PBXNativeTarget;
                    buildSettings = { PRODUCT_NAME = "$(TARGET_NAME)"; };
                };
            };
        }"#;
        let value = parse_pbxproj(doc).unwrap();
        let target = value.get("objects").unwrap().get("AA").unwrap();
        assert_eq!(target.get_str("isa"), Some("PBXNativeTarget"));
        assert_eq!(
            target.get("buildSettings").unwrap().get_str("PRODUCT_NAME"),
            Some("$(TARGET_NAME)")
        );
    }

    #[test]
    fn test_error_carries_line() {
        let err = parse_pbxproj("{\n  key = ;\n}").unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_rejects_non_dict_document() {
        assert!(parse_pbxproj("( a, b )").is_err());
    }
}
