//! # Native Functions
//!
//! Functions callable from expressions are described by a
//! [`FunctionDescriptor`] and collected into a [`FunctionRegistry`] before
//! any expression is parsed. The registry is read-only afterwards.

pub mod builtins;
pub mod registry;
pub mod types;

pub use registry::{FunctionRegistry, FunctionRegistryBuilder};
pub use types::{
    CallArgs, FunctionDescriptor, KeywordSpec, NativeFn, RegistryError, RegistryResult,
};
