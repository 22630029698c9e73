//! Static type of an expression node
//!
//! Purely local: each node's type comes from its declared attributes, its
//! literal kind, its cast target, the binding of its local slot, its
//! constructed class or the return type of its descriptor. No symbol table.

use strata_bytecode::JvmType;

use crate::ast::AstNode;
use crate::error::{CompileError, CompileResult};

pub fn expression_type(node: &AstNode) -> CompileResult<JvmType> {
    match node {
        AstNode::Add(add) => add.declared_type(),
        AstNode::Cast(cast) => Ok(cast.target().clone()),
        AstNode::Invocation(call) => call.return_type(),
        AstNode::Constructor(ctor) => Ok(ctor.ty().clone()),
        AstNode::Literal(literal) => Ok(literal.ty()),
        AstNode::This(this) => Ok(this.ty().clone()),
        AstNode::LocalVariable(local) => Ok(local.ty().clone()),
        AstNode::StoreLocal(_) | AstNode::Opcode(_) | AstNode::Label(_) => {
            Err(CompileError::UntypedOperand { node: node.print() })
        }
    }
}
