//! Parser for TypeScript declaration files.
//!
//! This crate turns `.d.ts` source text into the declaration AST from
//! `pattern-core`. Tokens are recognized with `nom` combinators and a
//! recursive-descent grammar builds the tree.

mod doc;
mod grammar;
mod lexer;

pub use doc::parse_doc_comment;
pub use grammar::parse;

use pattern_core::{Module, ParseError};

/// Parse a declaration file from source text.
///
/// # Example
///
/// ```
/// use pattern_parser::parse_module;
///
/// let source = r#"
/// import * as React from 'react';
/// export interface ButtonProps {
///     label: string;
/// }
/// export declare const Button: React.StatelessComponent<ButtonProps>;
/// "#;
///
/// let module = parse_module(source)?;
/// assert_eq!(module.statements.len(), 3);
/// # Ok::<(), pattern_core::ParseError>(())
/// ```
pub fn parse_module(source: &str) -> Result<Module, ParseError> {
    parse(source)
}
