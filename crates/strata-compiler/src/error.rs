//! Compilation errors

use strata_bytecode::DescriptorError;
use strata_xmir::XmirError;
use thiserror::Error;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Unsupported conversion from {from} to {to}")]
    UnsupportedConversion { from: String, to: String },

    #[error("Unsupported operation: {operation}")]
    UnsupportedOperation { operation: String },

    /// Read of a slot nothing was bound to
    #[error("Local variable {index} is out of range (size {size}), bound: [{bindings}]")]
    LocalOutOfRange {
        index: u16,
        size: usize,
        /// Current bindings rendered in slot order
        bindings: String,
    },

    #[error("Operand has no static type: {node}")]
    UntypedOperand { node: String },

    #[error("Malformed node <{node}>: {reason}")]
    MalformedNode { node: String, reason: String },

    /// A method failed to lower; `rendering` holds the method's input tree
    #[error("Failed to compile method {name}{descriptor}: {source}")]
    Method {
        name: String,
        descriptor: String,
        rendering: String,
        #[source]
        source: Box<CompileError>,
    },

    #[error(transparent)]
    Xmir(#[from] XmirError),

    #[error("Invalid descriptor: {0}")]
    Descriptor(#[from] DescriptorError),

    #[error("Invalid configuration: {message}")]
    Config { message: String },
}

impl CompileError {
    pub(crate) fn malformed(node: &strata_xmir::XmlNode, reason: impl Into<String>) -> Self {
        CompileError::MalformedNode {
            node: node.marker(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported(operation: impl Into<String>) -> Self {
        CompileError::UnsupportedOperation {
            operation: operation.into(),
        }
    }
}
