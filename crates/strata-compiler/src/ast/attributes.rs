//! Node attributes carried in the `scope` attribute
//!
//! Serialized as `key=value` pairs joined by `|`, keys sorted:
//! `descriptor=(I)V|name=foo|owner=Foo`.

use std::collections::BTreeMap;
use std::fmt;

use strata_bytecode::JvmType;
use strata_xmir::XmlNode;

use crate::error::{CompileError, CompileResult};

/// Name of the tree attribute holding the pairs
pub const SCOPE: &str = "scope";

pub const TYPE: &str = "type";
pub const DESCRIPTOR: &str = "descriptor";
pub const NAME: &str = "name";
pub const OWNER: &str = "owner";
pub const INTERFACED: &str = "interfaced";
pub const STATIC: &str = "static";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Attributes {
    entries: BTreeMap<String, String>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `key=value|key=value`; empty segments are skipped
    pub fn parse(raw: &str) -> CompileResult<Self> {
        let mut entries = BTreeMap::new();
        for pair in raw.split('|').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').ok_or_else(|| CompileError::MalformedNode {
                node: format!("{}=\"{}\"", SCOPE, raw),
                reason: format!("attribute '{}' has no value", pair),
            })?;
            entries.insert(key.trim().to_string(), value.trim().to_string());
        }
        Ok(Self { entries })
    }

    /// Attributes of a node, empty when it has no `scope`
    pub fn from_node(node: &XmlNode) -> CompileResult<Self> {
        match node.attribute(SCOPE) {
            Some(raw) => Self::parse(raw),
            None => Ok(Self::new()),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declared `type`, resolved from a keyword, descriptor or class name
    pub fn declared_type(&self) -> CompileResult<Option<JvmType>> {
        self.get(TYPE).map(JvmType::from_name).transpose().map_err(Into::into)
    }

    pub fn descriptor(&self) -> Option<&str> {
        self.get(DESCRIPTOR)
    }

    pub fn owner(&self) -> Option<&str> {
        self.get(OWNER)
    }

    pub fn is_interfaced(&self) -> bool {
        self.flag(INTERFACED)
    }

    pub fn is_static(&self) -> bool {
        self.flag(STATIC)
    }

    fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }

    /// Set `scope` on a node unless there is nothing to write
    pub fn apply(&self, node: XmlNode) -> XmlNode {
        if self.is_empty() {
            node
        } else {
            node.with_attr(SCOPE, self.to_string())
        }
    }
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            write!(f, "{}={}", key, value)?;
        }
        Ok(())
    }
}
