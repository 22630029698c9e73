//! Per-method label naming
//!
//! Source label identifiers are renamed to `L0`, `L1`, ... in first-seen
//! order. A fresh allocator is made for every method, so two methods never
//! share names and can be lowered independently.

use rustc_hash::FxHashMap;

#[derive(Debug, Clone)]
pub struct LabelAllocator {
    prefix: String,
    names: FxHashMap<String, String>,
}

impl LabelAllocator {
    pub fn new() -> Self {
        Self::with_prefix("L")
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            names: FxHashMap::default(),
        }
    }

    /// Canonical name of `source`, allocating the next one on first sight
    pub fn name(&mut self, source: &str) -> String {
        if let Some(name) = self.names.get(source) {
            return name.clone();
        }
        let name = format!("{}{}", self.prefix, self.names.len());
        self.names.insert(source.to_string(), name.clone());
        name
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for LabelAllocator {
    fn default() -> Self {
        Self::new()
    }
}
