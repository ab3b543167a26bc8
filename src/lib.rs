//! Parses Java Virtual Machine class files into a fully resolved, navigable
//! in-memory model.
//!
//! The entry points are [`jvm::Class::from_reader`] and
//! [`jvm::Class::from_bytes`], which turn a byte source into a [`jvm::Class`]
//! whose fields, methods, constant pool, and bytecode are all eagerly
//! resolved — there are no unresolved indices left in the returned model.
//!
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod jvm;
