//! The JVM class file model: a class, its constant pool, fields, methods,
//! attributes, and bytecode, fully resolved from a byte source.

pub mod annotation;
pub mod attribute;
pub mod class;
pub mod code;
pub mod constant_pool;
pub mod descriptor;
pub mod document;
pub mod field;
pub mod method;
pub mod module;
pub(crate) mod parsing;
pub mod references;

pub use class::Class;
pub use parsing::Error;
