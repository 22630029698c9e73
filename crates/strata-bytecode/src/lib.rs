//! Strata Bytecode Definitions
//!
//! This crate provides the typed value model (primitive and reference types,
//! field and method descriptors), the opcode table and the access flags shared
//! by the low-level and high-level representations.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod access;
pub mod opcode;
pub mod types;

pub use opcode::Opcode;
pub use types::{DescriptorError, JvmType, MethodDescriptor, OBJECT};
