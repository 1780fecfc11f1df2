//! Command implementations for the xmlkit CLI
//!
//! Each command loads a document, does its work through `xmlkit` handles,
//! and returns the text to print so it can be tested without a process.

pub mod dump;
pub mod fmt;
pub mod get;
pub mod set;

use clap::ValueEnum;
use xmlkit::{Document, ElementHandle};

/// Value types the CLI can read and write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ValueType {
    Str,
    Int,
    Float,
    Bool,
}

impl ValueType {
    /// Reads `text` as this type and returns its canonical form.
    pub fn canonical(self, text: &str) -> xmlkit::Result<String> {
        Ok(match self {
            ValueType::Str => text.to_string(),
            ValueType::Int => xmlkit::value::format(&xmlkit::value::parse::<i64>(text)?),
            ValueType::Float => xmlkit::value::format(&xmlkit::value::parse::<f64>(text)?),
            ValueType::Bool => xmlkit::value::format(&xmlkit::value::parse::<bool>(text)?),
        })
    }
}

/// Resolves a `/`-separated element path. The first segment names the root
/// element; each later segment is the first child element with that name.
pub fn resolve(doc: &Document, path: &str) -> xmlkit::Result<ElementHandle> {
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    let root = doc.root_element()?;
    let Some(first) = segments.next() else {
        return Ok(root);
    };
    if root.name(doc)? != first {
        return Err(xmlkit::Error::absence(format!(
            "root element is <{}>, not <{}>",
            root.name(doc)?,
            first
        )));
    }
    let mut current = root;
    for segment in segments {
        current = current.first_child_element(doc, segment)?;
    }
    tracing::debug!(path, "resolved element path");
    Ok(current)
}
