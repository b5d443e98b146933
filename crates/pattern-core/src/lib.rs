//! Core types, AST definitions, and errors for the pattern analyzer.
//!
//! This crate provides the foundational types shared by the other crates:
//! - AST node types for parsed declaration files
//! - Pattern identifiers, patterns, and the property schema
//! - Error types

pub mod ast;
pub mod errors;
pub mod identifier;
pub mod pattern;
pub mod property;

pub use ast::*;
pub use errors::*;
pub use identifier::*;
pub use pattern::*;
pub use property::*;
