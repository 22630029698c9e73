//! Low-level program model
//!
//! ```xml
//! <program name="app">
//!   <objects>
//!     <o base="class" name="Foo" access="33" supername="java/lang/Object">
//!       <o base="method" name="bar" access="1" descriptor="(I)V" max-stack="2" max-locals="2">
//!         <o base="seq" name="@"> ... </o>
//!       </o>
//!     </o>
//!   </objects>
//! </program>
//! ```
//!
//! Edits never touch the receiver; each one returns a rebuilt value.

use crate::error::{XmirError, XmirResult};
use crate::node::XmlNode;
use strata_bytecode::access;

const OBJECTS: &str = "objects";
const CLASS: &str = "class";
const METHOD: &str = "method";
const SEQ: &str = "seq";

const MAX_STACK: &str = "max-stack";
const MAX_LOCALS: &str = "max-locals";
const MAXS: &str = "maxs";
const STALE: &str = "stale";

/// Operand stack and local frame limits of a method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Maxs {
    /// Limits that match the current instruction sequence
    Computed {
        /// Maximum operand stack depth in words
        stack: u16,
        /// Number of local variable slots
        locals: u16,
    },
    /// Instructions changed since the limits were last computed
    Stale,
}

/// A whole program tree
#[derive(Debug, Clone, PartialEq)]
pub struct XmlProgram {
    root: XmlNode,
}

impl XmlProgram {
    /// Wrap a `<program>` root
    pub fn new(root: XmlNode) -> Self {
        Self { root }
    }

    /// Parse a program document
    pub fn parse(xml: &str) -> XmirResult<Self> {
        Ok(Self::new(XmlNode::parse(xml)?))
    }

    /// Program name, if declared
    pub fn name(&self) -> Option<&str> {
        self.root.attribute("name")
    }

    /// The first class under `objects`
    pub fn top(&self) -> XmirResult<XmlClass> {
        let objects = self.objects()?;
        objects
            .children()
            .iter()
            .find(|c| c.base() == Some(CLASS))
            .map(|c| XmlClass::new(c.clone()))
            .ok_or_else(|| XmirError::MissingChild {
                node: objects.marker(),
                child: CLASS.to_string(),
            })
    }

    /// Program with its first class replaced
    ///
    /// A program without an `objects` element or without a class gets one
    /// appended.
    pub fn replace_top_class(&self, class: XmlClass) -> XmlProgram {
        let mut class = Some(class.into_node());
        let mut children: Vec<XmlNode> = self
            .root
            .children()
            .iter()
            .map(|child| {
                if child.name() != OBJECTS || class.is_none() {
                    return child.clone();
                }
                let mut inner = child.children().to_vec();
                match inner.iter().position(|c| c.base() == Some(CLASS)) {
                    Some(index) => {
                        if let Some(class) = class.take() {
                            inner[index] = class;
                        }
                    }
                    None => inner.extend(class.take()),
                }
                child.clone().replace_children(inner)
            })
            .collect();
        if let Some(class) = class {
            children.push(XmlNode::new(OBJECTS).with_child(class));
        }
        Self::new(self.root.clone().replace_children(children))
    }

    /// Root node
    pub fn to_node(&self) -> &XmlNode {
        &self.root
    }

    /// Consume into the root node
    pub fn into_node(self) -> XmlNode {
        self.root
    }

    /// Serialize to compact XML
    pub fn to_xml_string(&self) -> XmirResult<String> {
        self.root.to_xml_string()
    }

    fn objects(&self) -> XmirResult<&XmlNode> {
        self.root
            .children()
            .iter()
            .find(|c| c.name() == OBJECTS)
            .ok_or_else(|| XmirError::MissingChild {
                node: self.root.marker(),
                child: OBJECTS.to_string(),
            })
    }
}

/// A `<o base="class">` node
#[derive(Debug, Clone, PartialEq)]
pub struct XmlClass {
    node: XmlNode,
}

impl XmlClass {
    /// Wrap a class node
    pub fn new(node: XmlNode) -> Self {
        Self { node }
    }

    /// Class name
    pub fn name(&self) -> XmirResult<&str> {
        self.node.required_attribute("name")
    }

    /// Method children in document order
    pub fn methods(&self) -> Vec<XmlMethod> {
        self.node
            .children()
            .iter()
            .filter(|c| c.base() == Some(METHOD))
            .map(|c| XmlMethod::new(c.clone()))
            .collect()
    }

    /// Class with its methods replaced in order
    ///
    /// Non-method children keep their positions. Surplus old methods are
    /// dropped, surplus new methods are appended.
    pub fn replace_methods(&self, methods: Vec<XmlMethod>) -> XmlClass {
        let mut methods = methods.into_iter();
        let mut children = Vec::with_capacity(self.node.children().len());
        for child in self.node.children() {
            if child.base() == Some(METHOD) {
                if let Some(method) = methods.next() {
                    children.push(method.into_node());
                }
            } else {
                children.push(child.clone());
            }
        }
        children.extend(methods.map(XmlMethod::into_node));
        Self::new(self.node.clone().replace_children(children))
    }

    /// Underlying node
    pub fn node(&self) -> &XmlNode {
        &self.node
    }

    /// Consume into the underlying node
    pub fn into_node(self) -> XmlNode {
        self.node
    }
}

/// A `<o base="method">` node
#[derive(Debug, Clone, PartialEq)]
pub struct XmlMethod {
    node: XmlNode,
}

impl XmlMethod {
    /// Wrap a method node
    pub fn new(node: XmlNode) -> Self {
        Self { node }
    }

    /// Method name
    pub fn name(&self) -> XmirResult<&str> {
        self.node.required_attribute("name")
    }

    /// Access flags
    pub fn access(&self) -> XmirResult<u32> {
        let raw = self.node.required_attribute("access")?;
        raw.trim().parse().map_err(|_| XmirError::InvalidAttribute {
            attribute: "access".to_string(),
            value: raw.to_string(),
        })
    }

    /// Method descriptor
    pub fn descriptor(&self) -> XmirResult<&str> {
        self.node.required_attribute("descriptor")
    }

    /// Check the static flag
    pub fn is_static(&self) -> XmirResult<bool> {
        Ok(access::is_static(self.access()?))
    }

    /// Instruction nodes of the body, empty when the method has no `seq`
    pub fn nodes(&self) -> &[XmlNode] {
        self.node.child(SEQ).map(XmlNode::children).unwrap_or(&[])
    }

    /// Current limits
    pub fn maxs(&self) -> Maxs {
        if self.node.attribute(MAXS) == Some(STALE) {
            return Maxs::Stale;
        }
        let stack = self.node.attribute(MAX_STACK).and_then(|v| v.parse().ok());
        let locals = self.node.attribute(MAX_LOCALS).and_then(|v| v.parse().ok());
        match (stack, locals) {
            (Some(stack), Some(locals)) => Maxs::Computed { stack, locals },
            _ => Maxs::Stale,
        }
    }

    /// Method with a new body, always marked stale
    pub fn replace_instructions(&self, instructions: Vec<XmlNode>) -> XmlMethod {
        let mut body = Some(instructions);
        let mut children = Vec::with_capacity(self.node.children().len() + 1);
        for child in self.node.children() {
            match body.take() {
                Some(instructions) if child.base() == Some(SEQ) => {
                    children.push(child.clone().replace_children(instructions));
                }
                rest => {
                    body = rest;
                    children.push(child.clone());
                }
            }
        }
        if let Some(instructions) = body {
            children.push(
                XmlNode::object(SEQ)
                    .with_attr("name", "@")
                    .with_children(instructions),
            );
        }
        let node = self.node.clone().replace_children(children);
        Self::new(node).with_maxs(Maxs::Stale)
    }

    /// Method with the given limits written out
    pub fn with_maxs(&self, maxs: Maxs) -> XmlMethod {
        let node = self
            .node
            .clone()
            .without_attr(MAX_STACK)
            .without_attr(MAX_LOCALS)
            .without_attr(MAXS);
        let node = match maxs {
            Maxs::Computed { stack, locals } => node
                .with_attr(MAX_STACK, stack.to_string())
                .with_attr(MAX_LOCALS, locals.to_string()),
            Maxs::Stale => node.with_attr(MAXS, STALE),
        };
        Self::new(node)
    }

    /// Underlying node
    pub fn node(&self) -> &XmlNode {
        &self.node
    }

    /// Consume into the underlying node
    pub fn into_node(self) -> XmlNode {
        self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method() -> XmlMethod {
        XmlMethod::new(
            XmlNode::object(METHOD)
                .with_attr("name", "bar")
                .with_attr("access", "1")
                .with_attr("descriptor", "(I)V")
                .with_attr(MAX_STACK, "2")
                .with_attr(MAX_LOCALS, "2")
                .with_child(
                    XmlNode::object(SEQ)
                        .with_attr("name", "@")
                        .with_child(XmlNode::object("$")),
                ),
        )
    }

    #[test]
    fn test_method_accessors() {
        let m = method();
        assert_eq!(m.name().unwrap(), "bar");
        assert_eq!(m.access().unwrap(), 1);
        assert_eq!(m.descriptor().unwrap(), "(I)V");
        assert!(!m.is_static().unwrap());
        assert_eq!(m.nodes().len(), 1);
        assert_eq!(m.maxs(), Maxs::Computed { stack: 2, locals: 2 });
    }

    #[test]
    fn test_replace_instructions_marks_stale() {
        let m = method();
        let edited = m.replace_instructions(vec![XmlNode::object("opcode")]);
        assert_eq!(edited.maxs(), Maxs::Stale);
        assert_eq!(edited.node().attribute(MAX_STACK), None);
        assert_eq!(edited.node().attribute(MAXS), Some(STALE));
        assert_eq!(edited.nodes()[0].base(), Some("opcode"));
        // source untouched
        assert_eq!(m.nodes()[0].base(), Some("$"));
        assert_eq!(m.maxs(), Maxs::Computed { stack: 2, locals: 2 });
    }

    #[test]
    fn test_with_maxs_restores_numbers() {
        let m = method()
            .replace_instructions(Vec::new())
            .with_maxs(Maxs::Computed { stack: 0, locals: 2 });
        assert_eq!(m.maxs(), Maxs::Computed { stack: 0, locals: 2 });
        assert_eq!(m.node().attribute(MAXS), None);
    }

    #[test]
    fn test_replace_instructions_without_seq() {
        let m = XmlMethod::new(XmlNode::object(METHOD).with_attr("name", "f"));
        assert!(m.nodes().is_empty());
        let edited = m.replace_instructions(vec![XmlNode::object("opcode")]);
        assert_eq!(edited.nodes().len(), 1);
        assert_eq!(edited.node().child(SEQ).unwrap().attribute("name"), Some("@"));
    }

    #[test]
    fn test_invalid_access() {
        let m = XmlMethod::new(XmlNode::object(METHOD).with_attr("access", "public"));
        assert!(matches!(m.access(), Err(XmirError::InvalidAttribute { .. })));
        let m = XmlMethod::new(XmlNode::object(METHOD));
        assert!(matches!(m.access(), Err(XmirError::MissingAttribute { .. })));
    }

    #[test]
    fn test_replace_methods_keeps_other_children() {
        let class = XmlClass::new(
            XmlNode::object(CLASS)
                .with_attr("name", "Foo")
                .with_child(XmlNode::object("field").with_attr("name", "x"))
                .with_child(method().into_node())
                .with_child(XmlNode::object("field").with_attr("name", "y")),
        );
        let renamed = XmlMethod::new(method().into_node().with_attr("name", "baz"));
        let edited = class.replace_methods(vec![renamed]);
        let children = edited.node().children();
        assert_eq!(children.len(), 3);
        assert_eq!(children[0].attribute("name"), Some("x"));
        assert_eq!(children[1].attribute("name"), Some("baz"));
        assert_eq!(children[2].attribute("name"), Some("y"));
        assert_eq!(class.methods()[0].name().unwrap(), "bar");
    }

    #[test]
    fn test_top_requires_objects() {
        let program = XmlProgram::new(XmlNode::new("program"));
        assert!(matches!(program.top(), Err(XmirError::MissingChild { .. })));
    }
}
