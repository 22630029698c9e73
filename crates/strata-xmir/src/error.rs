//! Tree model errors

use thiserror::Error;

/// Result alias for tree operations
pub type XmirResult<T> = Result<T, XmirError>;

/// Errors raised while reading, decoding or editing a tree
#[derive(Debug, Error)]
pub enum XmirError {
    /// The underlying XML could not be read
    #[error("Malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Document without a root element
    #[error("Document has no root element")]
    Empty,

    /// Required attribute is absent
    #[error("Node <{node}> has no '{attribute}' attribute")]
    MissingAttribute {
        /// Rendering of the node's marker
        node: String,
        /// Attribute name
        attribute: String,
    },

    /// Attribute present but unusable
    #[error("Invalid value '{value}' for attribute '{attribute}'")]
    InvalidAttribute {
        /// Attribute name
        attribute: String,
        /// Offending value
        value: String,
    },

    /// Required child is absent
    #[error("Node <{node}> has no '{child}' child")]
    MissingChild {
        /// Rendering of the parent's marker
        node: String,
        /// Marker of the missing child
        child: String,
    },

    /// Data node with a base this codec does not know
    #[error("Unknown data kind '{base}'")]
    UnknownDataKind {
        /// The `base` attribute
        base: String,
    },

    /// Payload is not a sequence of hex byte pairs
    #[error("Invalid hex payload: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Payload has the wrong number of bytes for its kind
    #[error("Payload of '{base}' must be {expected} bytes, got {actual}")]
    PayloadWidth {
        /// Data kind
        base: String,
        /// Required width
        expected: usize,
        /// Actual width
        actual: usize,
    },

    /// Text payload is not valid UTF-8
    #[error("Invalid UTF-8 payload: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Writing the tree failed
    #[error("Failed to write XML: {0}")]
    Write(String),
}
