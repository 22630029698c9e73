use strata_bytecode::JvmType;
use strata_xmir::XmlNode;

use super::attributes::{Attributes, TYPE};
use super::{expect_children, lower_all, AstNode, Instruction, OpcodeNode};
use crate::error::CompileResult;
use crate::select;

pub const MARKER: &str = ".plus";

/// Binary addition `left + right` of the declared `type` (default `int`)
#[derive(Debug, Clone, PartialEq)]
pub struct Add {
    left: Box<AstNode>,
    right: Box<AstNode>,
    attributes: Attributes,
}

impl Add {
    pub fn new(left: impl Into<AstNode>, right: impl Into<AstNode>) -> Self {
        Self::with_attributes(left, right, Attributes::new())
    }

    pub fn with_attributes(
        left: impl Into<AstNode>,
        right: impl Into<AstNode>,
        attributes: Attributes,
    ) -> Self {
        let attributes = match attributes.get(TYPE) {
            Some(_) => attributes,
            None => attributes.with(TYPE, "int"),
        };
        Self {
            left: Box::new(left.into()),
            right: Box::new(right.into()),
            attributes,
        }
    }

    /// Addition of `long` operands
    pub fn long(left: impl Into<AstNode>, right: impl Into<AstNode>) -> Self {
        Self::with_attributes(left, right, Attributes::new().with(TYPE, "long"))
    }

    pub fn from_xmir<F>(node: &XmlNode, resolver: &mut F) -> CompileResult<Self>
    where
        F: FnMut(&XmlNode) -> CompileResult<AstNode>,
    {
        let children = expect_children(node, 2)?;
        let left = resolver(&children[0])?;
        let right = resolver(&children[1])?;
        Ok(Self::with_attributes(left, right, Attributes::from_node(node)?))
    }

    pub fn left(&self) -> &AstNode {
        &self.left
    }

    pub fn right(&self) -> &AstNode {
        &self.right
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn declared_type(&self) -> CompileResult<JvmType> {
        Ok(self.attributes.declared_type()?.unwrap_or(JvmType::Int))
    }

    pub fn print(&self) -> String {
        format!("({}) + ({})", self.left.print(), self.right.print())
    }

    pub fn to_xmir(&self) -> XmlNode {
        self.attributes
            .apply(XmlNode::object(MARKER))
            .with_child(self.left.to_xmir())
            .with_child(self.right.to_xmir())
    }

    pub fn lower(&self) -> CompileResult<Vec<Instruction>> {
        let opcode = select::add(&self.declared_type()?)?;
        let mut out = lower_all([self.left.as_ref(), self.right.as_ref()])?;
        out.push(OpcodeNode::new(opcode).into());
        Ok(out)
    }
}
