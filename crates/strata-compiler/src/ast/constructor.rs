use strata_bytecode::{JvmType, MethodDescriptor, Opcode};
use strata_xmir::{DataValue, XmlNode};

use super::attributes::{Attributes, DESCRIPTOR};
use super::{lower_all, AstNode, Instruction, OpcodeNode};
use crate::error::{CompileError, CompileResult};
use crate::typing;

pub const MARKER: &str = ".new";
pub const TYPE_MARKER: &str = ".new-type";

const INIT: &str = "<init>";

/// Object creation `new T(arguments)`
#[derive(Debug, Clone, PartialEq)]
pub struct Constructor {
    ty: JvmType,
    arguments: Vec<AstNode>,
    attributes: Attributes,
}

impl Constructor {
    /// `class` is an internal or dotted class name
    pub fn new(class: impl Into<String>, arguments: Vec<AstNode>) -> Self {
        Self {
            ty: JvmType::object(class),
            arguments,
            attributes: Attributes::new(),
        }
    }

    /// Use an explicit `<init>` descriptor instead of one built from the arguments
    pub fn with_descriptor(mut self, descriptor: impl Into<String>) -> Self {
        self.attributes = self.attributes.with(DESCRIPTOR, descriptor);
        self
    }

    /// Read `<o base=".new"><o base=".new-type">TYPE</o> ARG...</o>`
    pub fn from_xmir<F>(node: &XmlNode, resolver: &mut F) -> CompileResult<Self>
    where
        F: FnMut(&XmlNode) -> CompileResult<AstNode>,
    {
        let type_node = node
            .child(TYPE_MARKER)
            .ok_or_else(|| CompileError::malformed(node, format!("no '{}' child", TYPE_MARKER)))?;
        let class = match type_node.children().first().map(DataValue::from_node).transpose()? {
            Some(DataValue::Str(class)) if !class.is_empty() => class,
            _ => return Err(CompileError::malformed(type_node, "expected a class name string")),
        };
        let attributes = Attributes::from_node(node)?;
        if let Some(descriptor) = attributes.descriptor() {
            MethodDescriptor::parse(descriptor)?;
        }
        let arguments = node
            .children()
            .iter()
            .filter(|c| c.base() != Some(TYPE_MARKER))
            .map(|c| resolver(c))
            .collect::<CompileResult<Vec<_>>>()?;
        Ok(Self {
            ty: JvmType::object(class),
            arguments,
            attributes,
        })
    }

    pub fn ty(&self) -> &JvmType {
        &self.ty
    }

    pub fn arguments(&self) -> &[AstNode] {
        &self.arguments
    }

    /// Declared descriptor, else `(ARGS)V` from the arguments' types
    pub fn descriptor(&self) -> CompileResult<String> {
        if let Some(descriptor) = self.attributes.descriptor() {
            return Ok(descriptor.to_string());
        }
        let params = self
            .arguments
            .iter()
            .map(typing::expression_type)
            .collect::<CompileResult<Vec<_>>>()?;
        Ok(MethodDescriptor::new(params, JvmType::Void).to_string())
    }

    pub fn print(&self) -> String {
        let args: Vec<String> = self.arguments.iter().map(AstNode::print).collect();
        format!("new {}({})", self.ty.class_name(), args.join(", "))
    }

    pub fn to_xmir(&self) -> XmlNode {
        let type_node = XmlNode::object(TYPE_MARKER)
            .with_child(DataValue::Str(self.ty.internal_name()).to_node());
        self.attributes
            .apply(XmlNode::object(MARKER))
            .with_child(type_node)
            .with_children(self.arguments.iter().map(AstNode::to_xmir))
    }

    pub fn lower(&self) -> CompileResult<Vec<Instruction>> {
        let class = self.ty.internal_name();
        let descriptor = self.descriptor()?;
        let mut out = vec![
            OpcodeNode::typed(Opcode::New, class.as_str()).into(),
            Instruction::from(Opcode::Dup),
        ];
        out.extend(lower_all(&self.arguments)?);
        out.push(OpcodeNode::invoke(Opcode::Invokespecial, class, INIT, descriptor, false).into());
        Ok(out)
    }
}
