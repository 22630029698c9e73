use strata_bytecode::{JvmType, Opcode};
use strata_xmir::{DataValue, XmlNode};

use super::{Instruction, OpcodeNode};
use crate::error::{CompileError, CompileResult};
use crate::select;

const STRING: &str = "java/lang/String";

/// Constant of a primitive type or a string
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    value: DataValue,
}

impl Literal {
    pub fn int(value: i32) -> Self {
        Self {
            value: DataValue::Int(i64::from(value)),
        }
    }

    pub fn long(value: i64) -> Self {
        Self {
            value: DataValue::Long(value),
        }
    }

    pub fn float(value: f32) -> Self {
        Self {
            value: DataValue::Float(value),
        }
    }

    pub fn double(value: f64) -> Self {
        Self {
            value: DataValue::Double(value),
        }
    }

    pub fn boolean(value: bool) -> Self {
        Self {
            value: DataValue::Bool(value),
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self {
            value: DataValue::Str(value.into()),
        }
    }

    /// Read a data node; labels and ints wider than 32 bits are rejected
    pub fn from_xmir(node: &XmlNode) -> CompileResult<Self> {
        let value = DataValue::from_node(node)?;
        match &value {
            DataValue::Label(_) => Err(CompileError::malformed(node, "a label is not a literal")),
            DataValue::Int(v) if i32::try_from(*v).is_err() => Err(CompileError::malformed(
                node,
                format!("int literal {} out of range", v),
            )),
            _ => Ok(Self { value }),
        }
    }

    pub fn value(&self) -> &DataValue {
        &self.value
    }

    pub fn ty(&self) -> JvmType {
        match self.value {
            DataValue::Int(_) => JvmType::Int,
            DataValue::Long(_) => JvmType::Long,
            DataValue::Float(_) => JvmType::Float,
            DataValue::Double(_) => JvmType::Double,
            DataValue::Bool(_) => JvmType::Boolean,
            DataValue::Str(_) | DataValue::Label(_) => JvmType::object(STRING),
        }
    }

    pub fn print(&self) -> String {
        self.value.to_string()
    }

    pub fn to_xmir(&self) -> XmlNode {
        self.value.to_node()
    }

    pub fn lower(&self) -> Vec<Instruction> {
        let node = match &self.value {
            // range checked on construction
            DataValue::Int(v) => select::push_int(*v as i32),
            DataValue::Long(v) => select::push_long(*v),
            DataValue::Float(v) => select::push_float(*v),
            DataValue::Double(v) => select::push_double(*v),
            DataValue::Bool(true) => OpcodeNode::new(Opcode::Iconst1),
            DataValue::Bool(false) => OpcodeNode::new(Opcode::Iconst0),
            DataValue::Str(s) | DataValue::Label(s) => select::push_string(s.as_str()),
        };
        vec![node.into()]
    }
}
