/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for reading and writing XML trees.

use crate::SourceLocation;
use thiserror::Error;

/// Result type alias for xmlkit-tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;

/// Errors that can occur while parsing or serializing a tree.
#[derive(Debug, Error)]
pub enum TreeError {
    /// XML syntax error reported by quick-xml.
    #[error("XML syntax error: {message}{}", .location.as_ref().map(|l| format!(" at {}", l)).unwrap_or_default())]
    XmlSyntax {
        message: String,
        location: Option<SourceLocation>,
    },

    /// Input ended while elements were still open.
    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEof {
        expected: String,
        location: Option<SourceLocation>,
    },

    /// End tag does not close the innermost open element.
    #[error("Mismatched end tag: expected </{expected}>, found </{found}>")]
    MismatchedEndTag {
        expected: String,
        found: String,
        location: Option<SourceLocation>,
    },

    /// The input has no root element.
    #[error("Empty XML document: no root element found")]
    EmptyDocument,

    /// More than one top-level element.
    #[error("Invalid XML: multiple root elements")]
    MultipleRoots { location: Option<SourceLocation> },

    /// Input bytes are not valid UTF-8.
    #[error("Invalid UTF-8 in XML input: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// Serialization failed.
    #[error("Failed to write XML: {message}")]
    Write { message: String },

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TreeError {
    /// Source position the error refers to, when known.
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            TreeError::XmlSyntax { location, .. }
            | TreeError::UnexpectedEof { location, .. }
            | TreeError::MismatchedEndTag { location, .. }
            | TreeError::MultipleRoots { location } => *location,
            _ => None,
        }
    }

    pub(crate) fn write(err: impl std::fmt::Display) -> Self {
        TreeError::Write {
            message: err.to_string(),
        }
    }
}
