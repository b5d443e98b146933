//! Error types for the pattern analyzer.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the pattern analyzer.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Identifier(#[from] IdentifierError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// Errors while parsing a declaration file.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Unexpected token at line {line}, column {column}: expected {expected}, found {found:?}")]
    UnexpectedToken {
        found: String,
        expected: String,
        line: u32,
        column: u32,
    },

    #[error("Unterminated string starting at line {line}, column {column}")]
    UnterminatedString { line: u32, column: u32 },

    #[error("Unterminated comment starting at line {line}")]
    UnterminatedComment { line: u32 },

    #[error("Unbalanced '{delimiter}' at line {line}, column {column}")]
    UnbalancedDelimiter {
        delimiter: char,
        line: u32,
        column: u32,
    },

    #[error("Unexpected character {found:?} at line {line}, column {column}")]
    UnexpectedCharacter { found: char, line: u32, column: u32 },

    #[error("Unexpected end of input: expected {expected}")]
    UnexpectedEof { expected: String },
}

/// Errors while parsing a pattern identifier from its string form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("Malformed pattern identifier {input:?}: expected <collection>@<analyzer>:<pattern>")]
    Malformed { input: String },
}

/// Errors raised by the type analysis context.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Failed to read declaration file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Declaration file {} could not be type-checked: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("Declaration file {} is not part of the analysis context", .path.display())]
    FileNotLoaded { path: PathBuf },
}

/// Errors during an analysis pass.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Collection root {} does not exist or is not a directory", .path.display())]
    RootNotFound { path: PathBuf },

    #[error("Failed to walk {}: {reason}", .path.display())]
    Walk { path: PathBuf, reason: String },

    #[error("Analysis context error: {0}")]
    Context(#[from] ResolveError),

    #[error("Invalid analyzer options: {0}")]
    InvalidOptions(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
