//! Labeled tree model
//!
//! Both the high-level and the low-level representations are serialized as
//! labeled trees of `<o>` elements. This crate provides:
//! - **Nodes**: an immutable element tree with quick-xml parsing and writing (`node`)
//! - **Data**: the hex-encoded `data="bytes"` payload codec (`data`)
//! - **Program**: the program/class/method model with replace-style edits (`program`)

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod data;
pub mod error;
pub mod node;
pub mod program;

pub use data::DataValue;
pub use error::{XmirError, XmirResult};
pub use node::XmlNode;
pub use program::{Maxs, XmlClass, XmlMethod, XmlProgram};
