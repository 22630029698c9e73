//! High-level node catalogue
//!
//! Every node renders a diagnostic string (`print`), serializes back to its
//! high-level tree form (`to_xmir`) and lowers itself into a flat sequence of
//! low-level instructions (`lower`). Composite nodes lower their operands
//! first, in declaration order, then append their own instruction.

pub mod add;
pub mod attributes;
pub mod cast;
pub mod constructor;
pub mod invocation;
pub mod literal;
pub mod opcode;
pub mod variable;

pub use add::Add;
pub use attributes::Attributes;
pub use cast::Cast;
pub use constructor::Constructor;
pub use invocation::Invocation;
pub use literal::Literal;
pub use opcode::{Instruction, LabelNode, OpcodeNode};
pub use variable::{local_index, LocalVariable, StoreLocal, This};

use strata_xmir::XmlNode;

use crate::error::CompileResult;

/// A node of the high-level tree
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    Add(Add),
    Cast(Cast),
    Invocation(Invocation),
    Constructor(Constructor),
    Literal(Literal),
    This(This),
    LocalVariable(LocalVariable),
    StoreLocal(StoreLocal),
    Opcode(OpcodeNode),
    Label(LabelNode),
}

impl AstNode {
    /// Human-readable rendering, for diagnostics only
    pub fn print(&self) -> String {
        match self {
            AstNode::Add(n) => n.print(),
            AstNode::Cast(n) => n.print(),
            AstNode::Invocation(n) => n.print(),
            AstNode::Constructor(n) => n.print(),
            AstNode::Literal(n) => n.print(),
            AstNode::This(n) => n.print(),
            AstNode::LocalVariable(n) => n.print(),
            AstNode::StoreLocal(n) => n.print(),
            AstNode::Opcode(n) => n.print(),
            AstNode::Label(n) => n.print(),
        }
    }

    /// High-level tree form
    pub fn to_xmir(&self) -> XmlNode {
        match self {
            AstNode::Add(n) => n.to_xmir(),
            AstNode::Cast(n) => n.to_xmir(),
            AstNode::Invocation(n) => n.to_xmir(),
            AstNode::Constructor(n) => n.to_xmir(),
            AstNode::Literal(n) => n.to_xmir(),
            AstNode::This(n) => n.to_xmir(),
            AstNode::LocalVariable(n) => n.to_xmir(),
            AstNode::StoreLocal(n) => n.to_xmir(),
            AstNode::Opcode(n) => n.to_xmir(),
            AstNode::Label(n) => n.to_xmir(),
        }
    }

    /// Ordered low-level instructions computing this node
    ///
    /// Fails as a whole: an error in any operand discards everything.
    pub fn lower(&self) -> CompileResult<Vec<Instruction>> {
        match self {
            AstNode::Add(n) => n.lower(),
            AstNode::Cast(n) => n.lower(),
            AstNode::Invocation(n) => n.lower(),
            AstNode::Constructor(n) => n.lower(),
            AstNode::Literal(n) => Ok(n.lower()),
            AstNode::This(n) => Ok(n.lower()),
            AstNode::LocalVariable(n) => n.lower(),
            AstNode::StoreLocal(n) => n.lower(),
            AstNode::Opcode(n) => Ok(vec![Instruction::Opcode(n.clone())]),
            AstNode::Label(n) => Ok(vec![Instruction::Label(n.clone())]),
        }
    }
}

impl From<Instruction> for AstNode {
    fn from(instruction: Instruction) -> Self {
        match instruction {
            Instruction::Opcode(n) => AstNode::Opcode(n),
            Instruction::Label(n) => AstNode::Label(n),
        }
    }
}

macro_rules! impl_from_node {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for AstNode {
                fn from(node: $ty) -> Self {
                    AstNode::$variant(node)
                }
            }
        )*
    };
}

impl_from_node!(
    Add(Add),
    Cast(Cast),
    Invocation(Invocation),
    Constructor(Constructor),
    Literal(Literal),
    This(This),
    LocalVariable(LocalVariable),
    StoreLocal(StoreLocal),
    Opcode(OpcodeNode),
    Label(LabelNode),
);

/// Lower a list of operands in order into one sequence
pub(crate) fn lower_all<'a>(
    nodes: impl IntoIterator<Item = &'a AstNode>,
) -> CompileResult<Vec<Instruction>> {
    let mut out = Vec::new();
    for node in nodes {
        out.extend(node.lower()?);
    }
    Ok(out)
}

/// Require exactly `count` children
pub(crate) fn expect_children(node: &XmlNode, count: usize) -> CompileResult<&[XmlNode]> {
    let children = node.children();
    if children.len() != count {
        return Err(crate::error::CompileError::malformed(
            node,
            format!("expected {} operands, found {}", count, children.len()),
        ));
    }
    Ok(children)
}
