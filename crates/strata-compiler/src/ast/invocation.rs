use strata_bytecode::{JvmType, MethodDescriptor, OBJECT};
use strata_xmir::XmlNode;

use super::attributes::{Attributes, DESCRIPTOR, OWNER, STATIC};
use super::{lower_all, AstNode, Instruction, OpcodeNode};
use crate::error::{CompileError, CompileResult};
use crate::{select, typing};

/// Method call `receiver.name(arguments)`
///
/// Marked `.NAME` in the tree. A `static=true` call has no receiver and
/// every child is an argument.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    name: String,
    receiver: Option<Box<AstNode>>,
    arguments: Vec<AstNode>,
    attributes: Attributes,
}

impl Invocation {
    /// Instance call; `attributes` must carry a `descriptor`
    pub fn new(
        receiver: impl Into<AstNode>,
        name: impl Into<String>,
        arguments: Vec<AstNode>,
        attributes: Attributes,
    ) -> CompileResult<Self> {
        let name = name.into();
        Self::check(&name, &attributes, false)?;
        Ok(Self {
            name,
            receiver: Some(Box::new(receiver.into())),
            arguments,
            attributes,
        })
    }

    /// Static call on `owner`
    pub fn new_static(
        owner: impl Into<String>,
        name: impl Into<String>,
        arguments: Vec<AstNode>,
        descriptor: impl Into<String>,
    ) -> CompileResult<Self> {
        let name = name.into();
        let attributes = Attributes::new()
            .with(OWNER, owner)
            .with(DESCRIPTOR, descriptor)
            .with(STATIC, "true");
        Self::check(&name, &attributes, true)?;
        Ok(Self {
            name,
            receiver: None,
            arguments,
            attributes,
        })
    }

    pub fn from_xmir<F>(node: &XmlNode, resolver: &mut F) -> CompileResult<Self>
    where
        F: FnMut(&XmlNode) -> CompileResult<AstNode>,
    {
        let name = node
            .base()
            .and_then(|base| base.strip_prefix('.'))
            .filter(|name| !name.is_empty())
            .ok_or_else(|| CompileError::malformed(node, "invocation marker must be '.NAME'"))?
            .to_string();
        let attributes = Attributes::from_node(node)?;
        let descriptor = attributes
            .descriptor()
            .ok_or_else(|| CompileError::malformed(node, "invocation without a descriptor"))?;
        MethodDescriptor::parse(descriptor)?;
        let mut children = node.children().iter();
        let receiver = if attributes.is_static() {
            None
        } else {
            let first = children.next().ok_or_else(|| {
                CompileError::malformed(node, "instance invocation without a receiver")
            })?;
            Some(Box::new(resolver(first)?))
        };
        let arguments = children.map(|c| resolver(c)).collect::<CompileResult<Vec<_>>>()?;
        Ok(Self {
            name,
            receiver,
            arguments,
            attributes,
        })
    }

    fn check(name: &str, attributes: &Attributes, is_static: bool) -> CompileResult<()> {
        let descriptor = attributes.descriptor().ok_or_else(|| CompileError::MalformedNode {
            node: format!(".{}", name),
            reason: "invocation without a descriptor".to_string(),
        })?;
        MethodDescriptor::parse(descriptor)?;
        if attributes.is_static() != is_static {
            return Err(CompileError::MalformedNode {
                node: format!(".{}", name),
                reason: "static flag does not match the receiver".to_string(),
            });
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn receiver(&self) -> Option<&AstNode> {
        self.receiver.as_deref()
    }

    pub fn arguments(&self) -> &[AstNode] {
        &self.arguments
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn descriptor(&self) -> &str {
        // presence checked on construction
        self.attributes.descriptor().unwrap_or_default()
    }

    pub fn is_static(&self) -> bool {
        self.receiver.is_none()
    }

    pub fn is_interfaced(&self) -> bool {
        self.attributes.is_interfaced()
    }

    pub fn return_type(&self) -> CompileResult<JvmType> {
        Ok(strata_bytecode::types::return_type(self.descriptor())?)
    }

    /// Owning class: the declared owner, else the receiver's static type,
    /// else the universal base type. Static calls must declare it.
    pub fn owner(&self) -> CompileResult<String> {
        if let Some(owner) = self.attributes.owner() {
            return Ok(JvmType::object(owner).internal_name());
        }
        match &self.receiver {
            None => Err(CompileError::unsupported(format!(
                "static invocation of '{}' without an owner",
                self.name
            ))),
            Some(receiver) => match typing::expression_type(receiver) {
                Ok(ty) if ty.is_reference() => Ok(ty.internal_name()),
                _ => Ok(OBJECT.to_string()),
            },
        }
    }

    pub fn print(&self) -> String {
        let target = match &self.receiver {
            Some(receiver) => receiver.print(),
            None => self
                .attributes
                .owner()
                .map(|o| o.replace('/', "."))
                .unwrap_or_else(|| "?".to_string()),
        };
        let args: Vec<String> = self.arguments.iter().map(AstNode::print).collect();
        format!("{}.{}({})", target, self.name, args.join(", "))
    }

    pub fn to_xmir(&self) -> XmlNode {
        self.attributes
            .apply(XmlNode::object(format!(".{}", self.name)))
            .with_children(self.receiver.iter().map(|r| r.to_xmir()))
            .with_children(self.arguments.iter().map(AstNode::to_xmir))
    }

    pub fn lower(&self) -> CompileResult<Vec<Instruction>> {
        let owner = self.owner()?;
        let opcode = select::invoke(self.is_static(), self.is_interfaced());
        let mut out = lower_all(self.receiver.as_deref().into_iter().chain(&self.arguments))?;
        out.push(
            OpcodeNode::invoke(
                opcode,
                owner,
                self.name.as_str(),
                self.descriptor(),
                self.is_interfaced(),
            )
            .into(),
        );
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::attributes::INTERFACED;
    use crate::ast::{Literal, This};
    use strata_bytecode::Opcode;
    use strata_xmir::DataValue;

    fn no_children(_: &XmlNode) -> CompileResult<AstNode> {
        unreachable!("leaf node resolved a child")
    }

    fn prints(instructions: Vec<Instruction>) -> Vec<String> {
        instructions.into_iter().map(|i| i.print()).collect()
    }

    #[test]
    fn test_virtual_call_without_owner() {
        let call = Invocation::new(
            This::new(),
            "foo",
            vec![Literal::string("baz").into()],
            Attributes::new().with(DESCRIPTOR, "(Ljava/lang/String;)V"),
        )
        .unwrap();
        let out = call.lower().unwrap();
        assert_eq!(
            prints(out.clone()),
            vec![
                "ALOAD 0",
                "LDC \"baz\"",
                "INVOKEVIRTUAL \"java/lang/Object\" \"foo\" \"(Ljava/lang/String;)V\" false",
            ]
        );
        let invoke = out[2].as_opcode().unwrap();
        assert_eq!(invoke.opcode(), Opcode::Invokevirtual);
        assert_eq!(invoke.operands()[3], DataValue::Bool(false));
    }

    #[test]
    fn test_owner_from_receiver_type() {
        let call = Invocation::new(
            This::typed(JvmType::object("com.acme.Foo")),
            "bar",
            Vec::new(),
            Attributes::new().with(DESCRIPTOR, "()I"),
        )
        .unwrap();
        assert_eq!(call.owner().unwrap(), "com/acme/Foo");
        assert_eq!(call.return_type().unwrap(), JvmType::Int);
    }

    #[test]
    fn test_interface_call() {
        let call = Invocation::new(
            This::new(),
            "run",
            Vec::new(),
            Attributes::new()
                .with(DESCRIPTOR, "()V")
                .with(OWNER, "java/lang/Runnable")
                .with(INTERFACED, "true"),
        )
        .unwrap();
        let out = call.lower().unwrap();
        let invoke = out[1].as_opcode().unwrap();
        assert_eq!(invoke.opcode(), Opcode::Invokeinterface);
        assert_eq!(invoke.operands()[3], DataValue::Bool(true));
    }

    #[test]
    fn test_static_call() {
        let call = Invocation::new_static(
            "java/lang/Math",
            "abs",
            vec![Literal::int(-1).into()],
            "(I)I",
        )
        .unwrap();
        assert_eq!(
            prints(call.lower().unwrap()),
            vec!["ICONST_M1", "INVOKESTATIC \"java/lang/Math\" \"abs\" \"(I)I\" false"]
        );
        assert_eq!(call.print(), "java.lang.Math.abs(-1)");
        assert_eq!(call.to_xmir().children().len(), 1);
    }

    #[test]
    fn test_missing_descriptor() {
        assert!(matches!(
            Invocation::new(This::new(), "foo", Vec::new(), Attributes::new()),
            Err(CompileError::MalformedNode { .. })
        ));
    }

    #[test]
    fn test_static_without_owner() {
        let node = XmlNode::object(".now").with_attr("scope", "descriptor=()J|static=true");
        let call = Invocation::from_xmir(&node, &mut no_children).unwrap();
        assert!(matches!(
            call.lower(),
            Err(CompileError::UnsupportedOperation { .. })
        ));
    }

    #[test]
    fn test_print() {
        let call = Invocation::new(
            This::new(),
            "foo",
            vec![Literal::int(1).into(), Literal::int(2).into()],
            Attributes::new().with(DESCRIPTOR, "(II)V"),
        )
        .unwrap();
        assert_eq!(call.print(), "this.foo(1, 2)");
    }
}
