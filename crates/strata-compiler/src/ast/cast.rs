use strata_bytecode::JvmType;
use strata_xmir::{DataValue, XmlNode};

use super::{expect_children, AstNode, Instruction, OpcodeNode};
use crate::error::{CompileError, CompileResult};
use crate::{select, typing};

pub const MARKER: &str = "cast";

/// Primitive conversion of `origin` to the target type
#[derive(Debug, Clone, PartialEq)]
pub struct Cast {
    target: JvmType,
    origin: Box<AstNode>,
}

impl Cast {
    pub fn new(target: JvmType, origin: impl Into<AstNode>) -> Self {
        Self {
            target,
            origin: Box::new(origin.into()),
        }
    }

    /// Read `<o base="cast">ORIGIN <o base="string" data="bytes">DESCRIPTOR</o></o>`
    pub fn from_xmir<F>(node: &XmlNode, resolver: &mut F) -> CompileResult<Self>
    where
        F: FnMut(&XmlNode) -> CompileResult<AstNode>,
    {
        let children = expect_children(node, 2)?;
        let target = match DataValue::from_node(&children[1])? {
            DataValue::Str(descriptor) => JvmType::from_descriptor(&descriptor)?,
            other => {
                return Err(CompileError::malformed(
                    node,
                    format!("cast target must be a string, found {}", other.base()),
                ))
            }
        };
        let origin = resolver(&children[0])?;
        Ok(Self::new(target, origin))
    }

    pub fn target(&self) -> &JvmType {
        &self.target
    }

    pub fn origin(&self) -> &AstNode {
        &self.origin
    }

    pub fn print(&self) -> String {
        format!("(({}) {})", self.target, self.origin.print())
    }

    pub fn to_xmir(&self) -> XmlNode {
        XmlNode::object(MARKER)
            .with_child(self.origin.to_xmir())
            .with_child(DataValue::Str(self.target.descriptor()).to_node())
    }

    pub fn lower(&self) -> CompileResult<Vec<Instruction>> {
        let from = typing::expression_type(&self.origin)?;
        let opcode = select::conversion(&from, &self.target)?;
        let mut out = self.origin.lower()?;
        out.push(OpcodeNode::new(opcode).into());
        Ok(out)
    }
}
