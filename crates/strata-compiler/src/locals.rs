//! Local variable slot environment
//!
//! Mirrors the calling convention: the receiver (if any) in slot 0, then one
//! slot per parameter, two for `long` and `double`. The upper half of a wide
//! slot is never bound itself.

use rustc_hash::FxHashMap;
use strata_bytecode::{access, JvmType, MethodDescriptor};

use crate::ast::{AstNode, LocalVariable, This};
use crate::error::{CompileError, CompileResult};
use crate::typing;

/// Slot to node bindings of one method
#[derive(Debug, Clone)]
pub struct LocalVariables {
    slots: FxHashMap<u16, AstNode>,
}

impl LocalVariables {
    /// Environment with only the receiver bound
    pub fn new() -> Self {
        let mut slots = FxHashMap::default();
        slots.insert(0, AstNode::This(This::new()));
        Self { slots }
    }

    /// Environment from explicit bindings
    pub fn from_bindings(bindings: impl IntoIterator<Item = (u16, AstNode)>) -> Self {
        Self {
            slots: bindings.into_iter().collect(),
        }
    }

    /// Environment for a method's parameter frame
    pub fn from_method(access_flags: u32, descriptor: &str) -> CompileResult<Self> {
        let descriptor = MethodDescriptor::parse(descriptor)?;
        let mut slots = FxHashMap::default();
        let mut next: u16 = 0;
        if !access::is_static(access_flags) {
            slots.insert(0, AstNode::This(This::new()));
            next = 1;
        }
        for param in descriptor.params {
            let width = param.size();
            slots.insert(next, AstNode::LocalVariable(LocalVariable::new(next, param)));
            next = next.checked_add(width).ok_or_else(|| CompileError::MalformedNode {
                node: format!("local{}", next),
                reason: "parameter frame exceeds 65535 slots".to_string(),
            })?;
        }
        Ok(Self { slots })
    }

    /// Node bound to `index`
    ///
    /// The check is by binding, not by count: with sparse bindings a slot
    /// below `len()` may still be unbound, and a bound slot above it is
    /// readable. The second word of a long or double is never bound.
    pub fn variable(&self, index: u16) -> CompileResult<AstNode> {
        self.slots
            .get(&index)
            .cloned()
            .ok_or_else(|| CompileError::LocalOutOfRange {
                index,
                size: self.slots.len(),
                bindings: self.render(),
            })
    }

    /// Bind `index` to a fresh typed local, replacing any earlier binding
    pub fn variable_with_type(&mut self, index: u16, ty: JvmType) -> AstNode {
        let node = AstNode::LocalVariable(LocalVariable::new(index, ty));
        self.slots.insert(index, node.clone());
        node
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots needed to hold every binding: highest slot plus its width
    pub fn frame_size(&self) -> u16 {
        self.slots
            .iter()
            .map(|(slot, node)| {
                let width = typing::expression_type(node).map(|t| t.size()).unwrap_or(1);
                slot.saturating_add(width.max(1))
            })
            .max()
            .unwrap_or(0)
    }

    /// Bindings as `0: this, 1: local1`, in slot order
    fn render(&self) -> String {
        let mut slots: Vec<_> = self.slots.iter().collect();
        slots.sort_by_key(|(slot, _)| **slot);
        slots
            .into_iter()
            .map(|(slot, node)| format!("{}: {}", slot, node.print()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for LocalVariables {
    fn default() -> Self {
        Self::new()
    }
}
