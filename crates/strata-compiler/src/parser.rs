//! High-level tree to AST
//!
//! Node kinds are chosen from the `base` marker by an explicit table.
//! Children are realised recursively through the parser itself, which reads
//! and writes the method's local slots and renames its labels.

use strata_xmir::{DataValue, XmlNode};

use crate::ast::{
    add, cast, constructor, local_index, opcode, variable, Add, AstNode, Cast, Constructor,
    Invocation, LabelNode, Literal, OpcodeNode, StoreLocal,
};
use crate::error::{CompileError, CompileResult};
use crate::labels::LabelAllocator;
use crate::locals::LocalVariables;

/// Kind of node named by a `base` marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Add,
    Cast,
    Invocation,
    Constructor,
    Literal,
    This,
    LocalVariable(u16),
    StoreLocal,
    Opcode,
    Label,
}

impl NodeKind {
    pub fn resolve(node: &XmlNode) -> CompileResult<NodeKind> {
        let base = node
            .base()
            .ok_or_else(|| CompileError::malformed(node, "node without a 'base' marker"))?;
        let kind = match base {
            add::MARKER => NodeKind::Add,
            cast::MARKER => NodeKind::Cast,
            constructor::MARKER => NodeKind::Constructor,
            variable::STORE_MARKER => NodeKind::StoreLocal,
            variable::THIS_MARKER => NodeKind::This,
            opcode::OPCODE => NodeKind::Opcode,
            opcode::LABEL => NodeKind::Label,
            constructor::TYPE_MARKER => {
                return Err(CompileError::unsupported(format!(
                    "'{}' outside of a constructor",
                    base
                )))
            }
            b if DataValue::is_data_base(b) => NodeKind::Literal,
            b if b.len() > 1 && b.starts_with('.') => NodeKind::Invocation,
            b => match local_index(b) {
                Some(index) => NodeKind::LocalVariable(index),
                None => {
                    return Err(CompileError::unsupported(format!(
                        "node with marker '{}'",
                        b
                    )))
                }
            },
        };
        Ok(kind)
    }
}

/// Parser for the body of one method
pub struct XmirParser<'a> {
    locals: &'a mut LocalVariables,
    labels: &'a mut LabelAllocator,
}

impl<'a> XmirParser<'a> {
    pub fn new(locals: &'a mut LocalVariables, labels: &'a mut LabelAllocator) -> Self {
        Self { locals, labels }
    }

    pub fn parse(&mut self, node: &XmlNode) -> CompileResult<AstNode> {
        let parsed = match NodeKind::resolve(node)? {
            NodeKind::Add => AstNode::Add(Add::from_xmir(node, &mut |n: &XmlNode| self.parse(n))?),
            NodeKind::Cast => {
                AstNode::Cast(Cast::from_xmir(node, &mut |n: &XmlNode| self.parse(n))?)
            }
            NodeKind::Invocation => AstNode::Invocation(Invocation::from_xmir(
                node,
                &mut |n: &XmlNode| self.parse(n),
            )?),
            NodeKind::Constructor => AstNode::Constructor(Constructor::from_xmir(
                node,
                &mut |n: &XmlNode| self.parse(n),
            )?),
            NodeKind::Literal => AstNode::Literal(Literal::from_xmir(node)?),
            NodeKind::This => match self.locals.variable(0) {
                Ok(AstNode::This(this)) => AstNode::This(this),
                Ok(other) => {
                    return Err(CompileError::unsupported(format!(
                        "receiver '$' while slot 0 holds {}",
                        other.print()
                    )))
                }
                Err(_) => return Err(CompileError::unsupported("receiver '$' in a static method")),
            },
            NodeKind::LocalVariable(index) => self.locals.variable(index)?,
            NodeKind::StoreLocal => {
                let store = StoreLocal::from_xmir(node, &mut |n: &XmlNode| self.parse(n))?;
                let target = store.target();
                self.locals.variable_with_type(target.index(), target.ty().clone());
                AstNode::StoreLocal(store)
            }
            NodeKind::Opcode => {
                let labels = &mut *self.labels;
                AstNode::Opcode(OpcodeNode::from_xmir(node)?.rename_labels(|l| labels.name(l)))
            }
            NodeKind::Label => {
                let labels = &mut *self.labels;
                AstNode::Label(LabelNode::from_xmir(node)?.renamed(|l| labels.name(l)))
            }
        };
        Ok(parsed)
    }

    pub fn parse_all(&mut self, nodes: &[XmlNode]) -> CompileResult<Vec<AstNode>> {
        nodes.iter().map(|n| self.parse(n)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_bytecode::JvmType;

    fn resolve(base: &str) -> CompileResult<NodeKind> {
        NodeKind::resolve(&XmlNode::object(base))
    }

    #[test]
    fn test_resolve_markers() {
        assert_eq!(resolve(".plus").unwrap(), NodeKind::Add);
        assert_eq!(resolve("cast").unwrap(), NodeKind::Cast);
        assert_eq!(resolve(".new").unwrap(), NodeKind::Constructor);
        assert_eq!(resolve(".write-local").unwrap(), NodeKind::StoreLocal);
        assert_eq!(resolve("$").unwrap(), NodeKind::This);
        assert_eq!(resolve("opcode").unwrap(), NodeKind::Opcode);
        assert_eq!(resolve("label").unwrap(), NodeKind::Label);
        assert_eq!(resolve("string").unwrap(), NodeKind::Literal);
        assert_eq!(resolve("long").unwrap(), NodeKind::Literal);
        assert_eq!(resolve(".foo").unwrap(), NodeKind::Invocation);
        assert_eq!(resolve("local3").unwrap(), NodeKind::LocalVariable(3));
    }

    #[test]
    fn test_resolve_unknown() {
        assert!(matches!(
            resolve("while"),
            Err(CompileError::UnsupportedOperation { .. })
        ));
        assert!(resolve(".").is_err());
        assert!(resolve(".new-type").is_err());
        assert!(matches!(
            NodeKind::resolve(&XmlNode::new("o")),
            Err(CompileError::MalformedNode { .. })
        ));
    }

    #[test]
    fn test_store_binds_later_reads() {
        let mut locals = LocalVariables::from_method(0, "()V").unwrap();
        let mut labels = LabelAllocator::new();
        let body = XmlNode::parse(
            r#"<o base="seq">
                 <o base=".write-local" scope="descriptor=J">
                   <o base="local1"/>
                   <o base="long" data="bytes">00 00 00 00 00 00 00 07</o>
                 </o>
                 <o base="local1"/>
               </o>"#,
        )
        .unwrap();
        let nodes = XmirParser::new(&mut locals, &mut labels)
            .parse_all(body.children())
            .unwrap();
        assert!(matches!(nodes[0], AstNode::StoreLocal(_)));
        assert_eq!(
            nodes[1],
            AstNode::LocalVariable(crate::ast::LocalVariable::new(1, JvmType::Long))
        );
        assert_eq!(locals.frame_size(), 3);
    }

    #[test]
    fn test_labels_renamed_per_parser() {
        let mut locals = LocalVariables::new();
        let mut labels = LabelAllocator::new();
        let jump = OpcodeNode::jump(strata_bytecode::Opcode::Goto, "exit").to_xmir();
        let target = LabelNode::new("exit").to_xmir();
        let mut parser = XmirParser::new(&mut locals, &mut labels);
        let nodes = parser.parse_all(&[jump, target]).unwrap();
        assert_eq!(nodes[0].print(), "GOTO L0");
        assert_eq!(nodes[1].print(), "label L0");
    }

    #[test]
    fn test_unbound_local() {
        let mut locals = LocalVariables::from_method(0x0008, "(I)V").unwrap();
        let mut labels = LabelAllocator::new();
        let mut parser = XmirParser::new(&mut locals, &mut labels);
        assert!(matches!(
            parser.parse(&XmlNode::object("local1")),
            Err(CompileError::LocalOutOfRange { index: 1, .. })
        ));
    }
}
