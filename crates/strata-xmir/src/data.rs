//! Data node codec
//!
//! Immediates and literals travel as `<o base="KIND" data="bytes">HEX</o>`,
//! where HEX is upper-case byte pairs separated by single spaces.

use crate::error::{XmirError, XmirResult};
use crate::node::XmlNode;
use std::fmt;

/// A decoded data payload
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    /// 32- or 64-bit integer stored as 8 bytes
    Int(i64),
    /// 64-bit integer
    Long(i64),
    /// 32-bit float
    Float(f32),
    /// 64-bit float
    Double(f64),
    /// Boolean, one byte
    Bool(bool),
    /// UTF-8 string
    Str(String),
    /// Label identifier
    Label(String),
}

impl DataValue {
    /// Data kinds understood by the codec
    pub const BASES: [&'static str; 7] =
        ["int", "long", "float", "double", "bool", "string", "label"];

    /// Check if a `base` marker names a data kind
    pub fn is_data_base(base: &str) -> bool {
        Self::BASES.contains(&base)
    }

    /// The `base` marker of this value
    pub fn base(&self) -> &'static str {
        match self {
            DataValue::Int(_) => "int",
            DataValue::Long(_) => "long",
            DataValue::Float(_) => "float",
            DataValue::Double(_) => "double",
            DataValue::Bool(_) => "bool",
            DataValue::Str(_) => "string",
            DataValue::Label(_) => "label",
        }
    }

    /// Raw payload bytes
    pub fn bytes(&self) -> Vec<u8> {
        match self {
            DataValue::Int(v) | DataValue::Long(v) => v.to_be_bytes().to_vec(),
            DataValue::Float(v) => v.to_be_bytes().to_vec(),
            DataValue::Double(v) => v.to_be_bytes().to_vec(),
            DataValue::Bool(v) => vec![u8::from(*v)],
            DataValue::Str(s) | DataValue::Label(s) => s.as_bytes().to_vec(),
        }
    }

    /// Render as a data node
    pub fn to_node(&self) -> XmlNode {
        let node = XmlNode::object(self.base()).with_attr("data", "bytes");
        let payload = encode_hex(&self.bytes());
        if payload.is_empty() {
            node
        } else {
            node.with_text(payload)
        }
    }

    /// Decode a data node
    pub fn from_node(node: &XmlNode) -> XmirResult<Self> {
        let base = node.required_attribute("base")?;
        let bytes = decode_hex(node.text().unwrap_or(""))?;
        let value = match base {
            "int" => DataValue::Int(i64::from_be_bytes(fixed::<8>(base, &bytes)?)),
            "long" => DataValue::Long(i64::from_be_bytes(fixed::<8>(base, &bytes)?)),
            "float" => DataValue::Float(f32::from_be_bytes(fixed::<4>(base, &bytes)?)),
            "double" => DataValue::Double(f64::from_be_bytes(fixed::<8>(base, &bytes)?)),
            "bool" => DataValue::Bool(fixed::<1>(base, &bytes)?[0] != 0),
            "string" => DataValue::Str(String::from_utf8(bytes)?),
            "label" => DataValue::Label(String::from_utf8(bytes)?),
            other => {
                return Err(XmirError::UnknownDataKind {
                    base: other.to_string(),
                })
            }
        };
        Ok(value)
    }

    /// String payload, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer payload of `int` and `long` values
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DataValue::Int(v) | DataValue::Long(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Int(v) => write!(f, "{}", v),
            DataValue::Long(v) => write!(f, "{}L", v),
            DataValue::Float(v) => write!(f, "{}f", v),
            DataValue::Double(v) => write!(f, "{}d", v),
            DataValue::Bool(v) => write!(f, "{}", v),
            DataValue::Str(s) => write!(f, "\"{}\"", s.escape_default()),
            DataValue::Label(l) => write!(f, "{}", l),
        }
    }
}

/// Encode bytes as `62 61 7A`
pub fn encode_hex(bytes: &[u8]) -> String {
    let hex = hex::encode_upper(bytes);
    let mut out = String::with_capacity(hex.len() + hex.len() / 2);
    for (i, pair) in hex.as_bytes().chunks(2).enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push(pair[0] as char);
        out.push(pair[1] as char);
    }
    out
}

/// Decode `62 61 7A` (any whitespace layout, either case)
pub fn decode_hex(text: &str) -> XmirResult<Vec<u8>> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(hex::decode(compact)?)
}

fn fixed<const N: usize>(base: &str, bytes: &[u8]) -> XmirResult<[u8; N]> {
    bytes.try_into().map_err(|_| XmirError::PayloadWidth {
        base: base.to_string(),
        expected: N,
        actual: bytes.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_payload() {
        let node = DataValue::Str("baz".to_string()).to_node();
        assert_eq!(node.base(), Some("string"));
        assert_eq!(node.attribute("data"), Some("bytes"));
        assert_eq!(node.text(), Some("62 61 7A"));
    }

    #[test]
    fn test_empty_string_has_no_text() {
        let node = DataValue::Str(String::new()).to_node();
        assert_eq!(node.text(), None);
        assert_eq!(DataValue::from_node(&node).unwrap(), DataValue::Str(String::new()));
    }

    #[test]
    fn test_int_payload() {
        let node = DataValue::Int(1).to_node();
        assert_eq!(node.text(), Some("00 00 00 00 00 00 00 01"));
        let negative = DataValue::Int(-1).to_node();
        assert_eq!(negative.text(), Some("FF FF FF FF FF FF FF FF"));
        assert_eq!(DataValue::from_node(&negative).unwrap(), DataValue::Int(-1));
    }

    #[test]
    fn test_decode_lenient_layout() {
        let node = XmlNode::object("string")
            .with_attr("data", "bytes")
            .with_text("66 6f\n  6F");
        assert_eq!(DataValue::from_node(&node).unwrap(), DataValue::Str("foo".to_string()));
    }

    #[test]
    fn test_wrong_width() {
        let node = XmlNode::object("double").with_attr("data", "bytes").with_text("01 02");
        assert!(matches!(
            DataValue::from_node(&node),
            Err(XmirError::PayloadWidth { expected: 8, actual: 2, .. })
        ));
    }

    #[test]
    fn test_unknown_kind() {
        let node = XmlNode::object("tuple").with_attr("data", "bytes");
        assert!(matches!(
            DataValue::from_node(&node),
            Err(XmirError::UnknownDataKind { .. })
        ));
    }

    #[test]
    fn test_bad_hex() {
        let node = XmlNode::object("string").with_attr("data", "bytes").with_text("ZZ");
        assert!(matches!(DataValue::from_node(&node), Err(XmirError::InvalidHex(_))));
    }
}
