//! Strata Compiler - high-level object trees to flat instruction sequences
//!
//! This crate parses the high-level tree of each method into AST nodes,
//! selects typed instructions for them and writes the lowered body back into
//! the low-level program model.
//!
//! # Pipeline
//!
//! ```text
//! XmlProgram → XmirParser → AstNode::lower → Instruction → XmlProgram
//! ```

pub mod analysis;
pub mod ast;
pub mod compiler;
pub mod config;
pub mod error;
pub mod labels;
pub mod locals;
pub mod parser;
pub mod select;
pub mod typing;

pub use ast::{AstNode, Instruction};
pub use compiler::Compiler;
pub use config::CompileOptions;
pub use error::{CompileError, CompileResult};
pub use labels::LabelAllocator;
pub use locals::LocalVariables;
pub use parser::{NodeKind, XmirParser};
