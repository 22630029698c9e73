//! Low-level leaves: raw instructions and labels
//!
//! These are the only nodes a lowering may produce. Both lower to themselves.

use std::fmt;

use strata_bytecode::Opcode;
use strata_xmir::{DataValue, XmlNode};

use crate::error::{CompileError, CompileResult};

pub const OPCODE: &str = "opcode";
pub const LABEL: &str = "label";

/// A single instruction with its immediate operands
#[derive(Debug, Clone, PartialEq)]
pub struct OpcodeNode {
    opcode: Opcode,
    operands: Vec<DataValue>,
}

impl OpcodeNode {
    pub fn new(opcode: Opcode) -> Self {
        Self {
            opcode,
            operands: Vec::new(),
        }
    }

    pub fn with_operand(mut self, operand: DataValue) -> Self {
        self.operands.push(operand);
        self
    }

    pub fn with_operands(mut self, operands: impl IntoIterator<Item = DataValue>) -> Self {
        self.operands.extend(operands);
        self
    }

    /// Instruction taking a local slot (loads, stores)
    pub fn slot(opcode: Opcode, index: u16) -> Self {
        Self::new(opcode).with_operand(DataValue::Int(i64::from(index)))
    }

    /// Instruction taking a class operand (`NEW`, `CHECKCAST`)
    pub fn typed(opcode: Opcode, internal_name: impl Into<String>) -> Self {
        Self::new(opcode).with_operand(DataValue::Str(internal_name.into()))
    }

    /// Invoke instruction: owner, name, descriptor, interface flag
    pub fn invoke(
        opcode: Opcode,
        owner: impl Into<String>,
        name: impl Into<String>,
        descriptor: impl Into<String>,
        interfaced: bool,
    ) -> Self {
        Self::new(opcode).with_operands([
            DataValue::Str(owner.into()),
            DataValue::Str(name.into()),
            DataValue::Str(descriptor.into()),
            DataValue::Bool(interfaced),
        ])
    }

    /// Jump to a label
    pub fn jump(opcode: Opcode, label: impl Into<String>) -> Self {
        Self::new(opcode).with_operand(DataValue::Label(label.into()))
    }

    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    pub fn operands(&self) -> &[DataValue] {
        &self.operands
    }

    /// First label operand, the target of a jump
    pub fn target(&self) -> Option<&str> {
        self.operands.iter().find_map(|op| match op {
            DataValue::Label(label) => Some(label.as_str()),
            _ => None,
        })
    }

    /// Read `<o base="opcode" name="IADD" code="96">`
    ///
    /// Either `name` or `code` identifies the instruction. When both are
    /// present they must agree.
    pub fn from_xmir(node: &XmlNode) -> CompileResult<Self> {
        let by_name = match node.attribute("name") {
            Some(name) => Some(Opcode::from_name(name).ok_or_else(|| {
                CompileError::unsupported(format!("unknown opcode '{}'", name))
            })?),
            None => None,
        };
        let by_code = match node.attribute("code") {
            Some(code) => {
                let byte = code
                    .trim()
                    .parse::<u8>()
                    .map_err(|_| {
                        CompileError::malformed(node, format!("invalid code '{}'", code))
                    })?;
                Some(Opcode::from_u8(byte).ok_or_else(|| {
                    CompileError::unsupported(format!("unknown opcode code {}", byte))
                })?)
            }
            None => None,
        };
        let opcode = match (by_name, by_code) {
            (Some(a), Some(b)) if a != b => {
                return Err(CompileError::malformed(
                    node,
                    format!("name {} does not match code {}", a, b.to_u8()),
                ))
            }
            (Some(op), _) | (None, Some(op)) => op,
            (None, None) => {
                return Err(CompileError::malformed(node, "opcode without name or code"))
            }
        };
        let operands = node
            .children()
            .iter()
            .map(DataValue::from_node)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { opcode, operands })
    }

    /// Same instruction with every label operand renamed
    pub fn rename_labels(mut self, mut rename: impl FnMut(&str) -> String) -> Self {
        for operand in &mut self.operands {
            if let DataValue::Label(label) = operand {
                *label = rename(label);
            }
        }
        self
    }

    pub fn print(&self) -> String {
        self.to_string()
    }

    pub fn to_xmir(&self) -> XmlNode {
        XmlNode::object(OPCODE)
            .with_attr("name", self.opcode.name())
            .with_attr("code", self.opcode.to_u8().to_string())
            .with_children(self.operands.iter().map(DataValue::to_node))
    }
}

impl fmt::Display for OpcodeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.opcode.name())?;
        for operand in &self.operands {
            write!(f, " {}", operand)?;
        }
        Ok(())
    }
}

/// Jump target marker
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LabelNode {
    id: String,
}

impl LabelNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn from_xmir(node: &XmlNode) -> CompileResult<Self> {
        match DataValue::from_node(node)? {
            DataValue::Label(id) => Ok(Self::new(id)),
            other => Err(CompileError::malformed(
                node,
                format!("expected a label, found {}", other.base()),
            )),
        }
    }

    pub fn renamed(self, rename: impl FnOnce(&str) -> String) -> Self {
        Self::new(rename(&self.id))
    }

    pub fn print(&self) -> String {
        format!("label {}", self.id)
    }

    pub fn to_xmir(&self) -> XmlNode {
        DataValue::Label(self.id.clone()).to_node()
    }
}

/// A node that is already low level
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Opcode(OpcodeNode),
    Label(LabelNode),
}

impl Instruction {
    pub fn print(&self) -> String {
        match self {
            Instruction::Opcode(op) => op.print(),
            Instruction::Label(label) => label.print(),
        }
    }

    pub fn to_xmir(&self) -> XmlNode {
        match self {
            Instruction::Opcode(op) => op.to_xmir(),
            Instruction::Label(label) => label.to_xmir(),
        }
    }

    pub fn as_opcode(&self) -> Option<&OpcodeNode> {
        match self {
            Instruction::Opcode(op) => Some(op),
            Instruction::Label(_) => None,
        }
    }
}

impl From<OpcodeNode> for Instruction {
    fn from(node: OpcodeNode) -> Self {
        Instruction::Opcode(node)
    }
}

impl From<LabelNode> for Instruction {
    fn from(node: LabelNode) -> Self {
        Instruction::Label(node)
    }
}

impl From<Opcode> for Instruction {
    fn from(opcode: Opcode) -> Self {
        Instruction::Opcode(OpcodeNode::new(opcode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_leaf_shape() {
        let node = OpcodeNode::slot(Opcode::Iload, 1).to_xmir();
        assert_eq!(node.base(), Some("opcode"));
        assert_eq!(node.attribute("name"), Some("ILOAD"));
        assert_eq!(node.attribute("code"), Some("21"));
        assert_eq!(node.children().len(), 1);
        assert_eq!(OpcodeNode::from_xmir(&node).unwrap(), OpcodeNode::slot(Opcode::Iload, 1));
    }

    #[test]
    fn test_from_xmir_by_code_only() {
        let node = XmlNode::object(OPCODE).with_attr("code", "96");
        assert_eq!(OpcodeNode::from_xmir(&node).unwrap().opcode(), Opcode::Iadd);
    }

    #[test]
    fn test_from_xmir_mismatch() {
        let node = XmlNode::object(OPCODE)
            .with_attr("name", "IADD")
            .with_attr("code", "97");
        assert!(matches!(
            OpcodeNode::from_xmir(&node),
            Err(CompileError::MalformedNode { .. })
        ));
    }

    #[test]
    fn test_unknown_mnemonic() {
        let node = XmlNode::object(OPCODE).with_attr("name", "FROB");
        assert!(matches!(
            OpcodeNode::from_xmir(&node),
            Err(CompileError::UnsupportedOperation { .. })
        ));
    }

    #[test]
    fn test_print() {
        let op = OpcodeNode::invoke(Opcode::Invokevirtual, "Foo", "bar", "()V", false);
        assert_eq!(op.print(), "INVOKEVIRTUAL \"Foo\" \"bar\" \"()V\" false");
        assert_eq!(LabelNode::new("L0").print(), "label L0");
    }

    #[test]
    fn test_rename_labels() {
        let op = OpcodeNode::jump(Opcode::Goto, "end").rename_labels(|l| format!("{}!", l));
        assert_eq!(op.target(), Some("end!"));
    }

    #[test]
    fn test_label_leaf() {
        let label = LabelNode::new("L3");
        let node = label.to_xmir();
        assert_eq!(node.base(), Some("label"));
        assert_eq!(LabelNode::from_xmir(&node).unwrap(), label);
    }
}
