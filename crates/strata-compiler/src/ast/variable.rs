//! Receiver, local variable reads and local variable writes

use strata_bytecode::{JvmType, Opcode, OBJECT};
use strata_xmir::XmlNode;

use super::attributes::{Attributes, DESCRIPTOR};
use super::{expect_children, AstNode, Instruction, OpcodeNode};
use crate::error::{CompileError, CompileResult};
use crate::{select, typing};

pub const THIS_MARKER: &str = "$";
pub const STORE_MARKER: &str = ".write-local";
const LOCAL_PREFIX: &str = "local";

/// Slot number of a `localN` marker
pub fn local_index(base: &str) -> Option<u16> {
    let digits = base.strip_prefix(LOCAL_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// The receiver, always slot 0
#[derive(Debug, Clone, PartialEq)]
pub struct This {
    ty: JvmType,
}

impl This {
    /// Receiver of unknown class, typed as the universal base type
    pub fn new() -> Self {
        Self::typed(JvmType::Object(OBJECT.to_string()))
    }

    pub fn typed(ty: JvmType) -> Self {
        Self { ty }
    }

    pub fn ty(&self) -> &JvmType {
        &self.ty
    }

    pub fn print(&self) -> String {
        "this".to_string()
    }

    pub fn to_xmir(&self) -> XmlNode {
        XmlNode::object(THIS_MARKER)
    }

    pub fn lower(&self) -> Vec<Instruction> {
        vec![OpcodeNode::slot(Opcode::Aload, 0).into()]
    }
}

impl Default for This {
    fn default() -> Self {
        Self::new()
    }
}

/// Typed read of a local slot
#[derive(Debug, Clone, PartialEq)]
pub struct LocalVariable {
    index: u16,
    ty: JvmType,
}

impl LocalVariable {
    pub fn new(index: u16, ty: JvmType) -> Self {
        Self { index, ty }
    }

    pub fn index(&self) -> u16 {
        self.index
    }

    pub fn ty(&self) -> &JvmType {
        &self.ty
    }

    pub fn print(&self) -> String {
        format!("{}{}", LOCAL_PREFIX, self.index)
    }

    pub fn to_xmir(&self) -> XmlNode {
        XmlNode::object(self.print())
    }

    pub fn lower(&self) -> CompileResult<Vec<Instruction>> {
        let opcode = select::load(&self.ty)?;
        Ok(vec![OpcodeNode::slot(opcode, self.index).into()])
    }
}

/// Write of a value into a local slot
#[derive(Debug, Clone, PartialEq)]
pub struct StoreLocal {
    target: LocalVariable,
    value: Box<AstNode>,
    attributes: Attributes,
}

impl StoreLocal {
    /// Store declaring the target's type as its `descriptor`
    pub fn new(target: LocalVariable, value: impl Into<AstNode>) -> Self {
        let attributes = Attributes::new().with(DESCRIPTOR, target.ty.descriptor());
        Self {
            target,
            value: Box::new(value.into()),
            attributes,
        }
    }

    /// Read `<o base=".write-local" scope="descriptor=T"><o base="localN"/> VALUE</o>`
    ///
    /// Without a descriptor the slot takes the value's static type. The
    /// source attributes are kept as read, so `to_xmir` writes no descriptor
    /// for an inferred store. Binding the slot for later reads is up to the
    /// caller.
    pub fn from_xmir<F>(node: &XmlNode, resolver: &mut F) -> CompileResult<Self>
    where
        F: FnMut(&XmlNode) -> CompileResult<AstNode>,
    {
        let children = expect_children(node, 2)?;
        let index = children[0]
            .base()
            .and_then(local_index)
            .ok_or_else(|| CompileError::malformed(node, "store target must be a 'localN' node"))?;
        let value = resolver(&children[1])?;
        let attributes = Attributes::from_node(node)?;
        let ty = match attributes.descriptor() {
            Some(descriptor) => JvmType::from_descriptor(descriptor)?,
            None => typing::expression_type(&value)?,
        };
        Ok(Self {
            target: LocalVariable::new(index, ty),
            value: Box::new(value),
            attributes,
        })
    }

    pub fn target(&self) -> &LocalVariable {
        &self.target
    }

    pub fn value(&self) -> &AstNode {
        &self.value
    }

    pub fn print(&self) -> String {
        format!("{} = ({})", self.target.print(), self.value.print())
    }

    pub fn to_xmir(&self) -> XmlNode {
        self.attributes
            .apply(XmlNode::object(STORE_MARKER))
            .with_child(self.target.to_xmir())
            .with_child(self.value.to_xmir())
    }

    pub fn lower(&self) -> CompileResult<Vec<Instruction>> {
        let opcode = select::store(&self.target.ty)?;
        let mut out = self.value.lower()?;
        out.push(OpcodeNode::slot(opcode, self.target.index).into());
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Add, Literal};

    #[test]
    fn test_local_index() {
        assert_eq!(local_index("local0"), Some(0));
        assert_eq!(local_index("local12"), Some(12));
        assert_eq!(local_index("local"), None);
        assert_eq!(local_index("local+1"), None);
        assert_eq!(local_index("localx"), None);
        assert_eq!(local_index("local70000"), None);
    }

    #[test]
    fn test_this() {
        let this = This::new();
        assert_eq!(this.ty(), &JvmType::object(OBJECT));
        assert_eq!(this.print(), "this");
        assert_eq!(this.to_xmir().base(), Some("$"));
        assert_eq!(this.lower()[0].print(), "ALOAD 0");
    }

    #[test]
    fn test_typed_loads() {
        let cases = [
            (JvmType::Int, "ILOAD 2"),
            (JvmType::Char, "ILOAD 2"),
            (JvmType::Long, "LLOAD 2"),
            (JvmType::Float, "FLOAD 2"),
            (JvmType::Double, "DLOAD 2"),
            (JvmType::object("java/lang/String"), "ALOAD 2"),
        ];
        for (ty, expected) in cases {
            let local = LocalVariable::new(2, ty);
            assert_eq!(local.lower().unwrap()[0].print(), expected);
        }
    }

    #[test]
    fn test_store() {
        let store = StoreLocal::new(
            LocalVariable::new(3, JvmType::Int),
            Add::new(LocalVariable::new(1, JvmType::Int), Literal::int(1)),
        );
        let ops: Vec<_> = store.lower().unwrap().into_iter().map(|i| i.print()).collect();
        assert_eq!(ops, vec!["ILOAD 1", "ICONST_1", "IADD", "ISTORE 3"]);
        assert_eq!(store.print(), "local3 = ((local1) + (1))");
        assert_eq!(store.to_xmir().attribute("scope"), Some("descriptor=I"));
    }

    #[test]
    fn test_inferred_store_keeps_source_shape() {
        let source = XmlNode::object(STORE_MARKER)
            .with_child(XmlNode::object("local2"))
            .with_child(Literal::long(7).to_xmir());
        let mut resolve = |n: &XmlNode| Literal::from_xmir(n).map(AstNode::from);
        let store = StoreLocal::from_xmir(&source, &mut resolve).unwrap();
        assert_eq!(store.target().ty(), &JvmType::Long);
        assert_eq!(store.to_xmir(), source);
    }
}
