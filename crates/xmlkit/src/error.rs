/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The single failure type raised by every xmlkit operation.

use std::fmt;
use thiserror::Error;
use xmlkit_tree::{NodeId, SourceLocation, TreeError};

/// Result type alias for xmlkit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// What went wrong, coarse enough to branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required node or attribute does not exist.
    Absence,
    /// Stored text cannot be read as the requested type.
    Conversion,
    /// The node is not of the kind the handle or request expects.
    KindMismatch,
    /// A mutation argument is not related to the target as required.
    StructuralViolation,
    /// The handle refers to a node that has been removed.
    StaleHandle,
    /// A cursor was dereferenced before its first or after its last item.
    InvalidCursor,
    /// Document text could not be parsed.
    Load,
    /// A file could not be read or written.
    Io,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Absence => "absence",
            ErrorKind::Conversion => "conversion",
            ErrorKind::KindMismatch => "kind mismatch",
            ErrorKind::StructuralViolation => "structural violation",
            ErrorKind::StaleHandle => "stale handle",
            ErrorKind::InvalidCursor => "invalid cursor",
            ErrorKind::Load => "load",
            ErrorKind::Io => "i/o",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an error happened: the node involved, its source position, and a
/// short description such as `attribute 'id' on <item>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Origin {
    pub node: Option<NodeId>,
    pub location: Option<SourceLocation>,
    pub context: Option<String>,
}

impl Origin {
    pub fn node(node: NodeId, location: Option<SourceLocation>) -> Self {
        Self {
            node: Some(node),
            location,
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    fn is_empty(&self) -> bool {
        self.location.is_none() && self.context.is_none()
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.location, &self.context) {
            (Some(location), Some(context)) => write!(f, "at {}, {}", location, context),
            (Some(location), None) => write!(f, "at {}", location),
            (None, Some(context)) => f.write_str(context),
            (None, None) => Ok(()),
        }
    }
}

fn origin_suffix(origin: &Option<Origin>) -> String {
    match origin {
        Some(origin) if !origin.is_empty() => format!(" ({})", origin),
        _ => String::new(),
    }
}

/// Failure raised when an operation cannot meet its contract.
///
/// Every fallible operation in this crate returns this one type, so a caller
/// can wrap a whole unit of work in a single `?` chain and report the
/// message at the end:
///
/// ```rust
/// use xmlkit::{Document, ErrorKind};
///
/// fn port(xml: &str) -> xmlkit::Result<u16> {
///     let doc = Document::parse(xml)?;
///     let server = doc.root_element()?.first_child_element(&doc, "server")?;
///     server.attribute::<u16>(&doc, "port")
/// }
///
/// assert_eq!(port(r#"<cfg><server port="8080"/></cfg>"#).unwrap(), 8080);
/// let err = port(r#"<cfg><server port="http"/></cfg>"#).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::Conversion);
/// ```
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}{}", origin_suffix(.origin))]
pub struct Error {
    kind: ErrorKind,
    message: String,
    origin: Option<Origin>,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            origin: None,
        }
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn absence(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Absence, message)
    }

    pub fn conversion(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conversion, message)
    }

    pub fn kind_mismatch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::KindMismatch, message)
    }

    pub fn structural(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StructuralViolation, message)
    }

    pub fn stale(node: NodeId) -> Self {
        Self::new(
            ErrorKind::StaleHandle,
            "handle refers to a node that is no longer in the document",
        )
        .with_origin(Origin::node(node, None))
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn origin(&self) -> Option<&Origin> {
        self.origin.as_ref()
    }

    pub fn is_absence(&self) -> bool {
        self.kind == ErrorKind::Absence
    }

    pub fn is_conversion(&self) -> bool {
        self.kind == ErrorKind::Conversion
    }
}

impl From<TreeError> for Error {
    fn from(err: TreeError) -> Self {
        let kind = match err {
            TreeError::Io(_) => ErrorKind::Io,
            _ => ErrorKind::Load,
        };
        let location = err.location();
        let error = Error::new(kind, err.to_string());
        match location {
            Some(location) => error.with_origin(Origin {
                location: Some(location),
                ..Origin::default()
            }),
            None => error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_without_origin() {
        let err = Error::absence("no attribute 'id'");
        assert_eq!(err.to_string(), "absence: no attribute 'id'");
        assert!(err.is_absence());
        assert!(!err.is_conversion());
    }

    #[test]
    fn test_display_with_location_and_context() {
        let err = Error::conversion("'12abc' is not a valid i32").with_origin(Origin {
            node: None,
            location: Some(SourceLocation { line: 4, column: 9 }),
            context: Some("attribute 'count' on <item>".to_string()),
        });
        assert_eq!(
            err.to_string(),
            "conversion: '12abc' is not a valid i32 (at 4:9, attribute 'count' on <item>)"
        );
    }

    #[test]
    fn test_empty_origin_is_not_rendered() {
        let err = Error::structural("not a child").with_origin(Origin::default());
        assert_eq!(err.to_string(), "structural violation: not a child");
    }

    #[test]
    fn test_tree_errors_become_load_errors() {
        let err: Error = TreeError::EmptyDocument.into();
        assert_eq!(err.kind(), ErrorKind::Load);
        assert_eq!(
            err.to_string(),
            "load: Empty XML document: no root element found"
        );

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.xml");
        let err: Error = TreeError::Io(io).into();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_error_is_std_error() {
        let err = Error::kind_mismatch("expected comment");
        let _: &dyn std::error::Error = &err;
    }
}
