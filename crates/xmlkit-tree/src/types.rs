/*
 * types.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Node payloads stored in the tree arena.

use std::fmt;

/// 1-based position of a node's first character in the parsed source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number, counted in characters.
    pub column: u32,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A name/value pair attached to an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Qualified attribute name, prefix included (e.g. `xml:lang`).
    pub name: String,
    /// Attribute value after entity expansion.
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Coarse node classification, without payload.
///
/// `DocType` and processing instructions other than `xml-stylesheet` are
/// both reported as [`NodeType::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Document,
    Element,
    Text,
    Comment,
    Declaration,
    StylesheetReference,
    Unknown,
}

impl NodeType {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Document => "document",
            NodeType::Element => "element",
            NodeType::Text => "text",
            NodeType::Comment => "comment",
            NodeType::Declaration => "declaration",
            NodeType::StylesheetReference => "stylesheet reference",
            NodeType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of a node together with its payload.
///
/// Tree links (parent, children, siblings) live in the arena, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The document node. Exactly one per tree, always the arena root.
    Document,

    /// An element such as `<item id="3">`.
    Element {
        /// Qualified element name, prefix included.
        name: String,
        /// Attributes in insertion order. Names are unique.
        attributes: Vec<Attribute>,
    },

    /// Character data. `cdata` marks text read from (or written as) a
    /// `<![CDATA[...]]>` section.
    Text { content: String, cdata: bool },

    /// A comment, without the `<!--`/`-->` delimiters.
    Comment { content: String },

    /// The `<?xml ...?>` declaration.
    Declaration {
        version: Option<String>,
        encoding: Option<String>,
        standalone: Option<String>,
    },

    /// An `<?xml-stylesheet type=".." href=".."?>` instruction.
    StylesheetReference { stylesheet_type: String, href: String },

    /// A `<!DOCTYPE ...>` declaration, kept verbatim.
    DocType { content: String },

    /// Any other processing instruction.
    ProcessingInstruction { target: String, data: String },
}

impl NodeKind {
    pub fn element(name: impl Into<String>) -> Self {
        NodeKind::Element {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        NodeKind::Text {
            content: content.into(),
            cdata: false,
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Document => NodeType::Document,
            NodeKind::Element { .. } => NodeType::Element,
            NodeKind::Text { .. } => NodeType::Text,
            NodeKind::Comment { .. } => NodeType::Comment,
            NodeKind::Declaration { .. } => NodeType::Declaration,
            NodeKind::StylesheetReference { .. } => NodeType::StylesheetReference,
            NodeKind::DocType { .. } | NodeKind::ProcessingInstruction { .. } => {
                NodeType::Unknown
            }
        }
    }

    /// Whether nodes of this kind may have children.
    pub fn is_container(&self) -> bool {
        matches!(self, NodeKind::Document | NodeKind::Element { .. })
    }
}

/// Storage for a single node in the arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    pub kind: NodeKind,
    /// Where the node started in the parsed source. `None` for nodes
    /// created programmatically.
    pub location: Option<SourceLocation>,
}

impl NodeData {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            location: None,
        }
    }

    pub fn with_location(kind: NodeKind, location: SourceLocation) -> Self {
        Self {
            kind,
            location: Some(location),
        }
    }
}

/// Whether `name` can be written as an element or attribute name
/// (the XML 1.0 `Name` production).
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(is_name_start_char) && chars.all(is_name_char)
}

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | 'A'..='Z' | '_' | 'a'..='z' |
        '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}' |
        '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}' |
        '\u{200C}'..='\u{200D}' | '\u{2070}'..='\u{218F}' |
        '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}' |
        '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}' |
        '\u{10000}'..='\u{EFFFF}'
    )
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}' |
            '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}'
        )
}

/// Whether `content` can be written between `<!--` and `-->`.
pub fn is_valid_comment(content: &str) -> bool {
    !content.contains("--") && !content.ends_with('-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        for name in ["a", "_x", "ns:item", "a-b.c_1", "été"] {
            assert!(is_valid_name(name), "{name:?} should be valid");
        }
        for name in ["", "a b", "1a", "-a", "a<b", "a=b", "a\tb"] {
            assert!(!is_valid_name(name), "{name:?} should be invalid");
        }
    }

    #[test]
    fn test_valid_comments() {
        assert!(is_valid_comment(" note "));
        assert!(is_valid_comment("a - b"));
        assert!(is_valid_comment(""));
        assert!(!is_valid_comment("a -- b"));
        assert!(!is_valid_comment("a --> b"));
        assert!(!is_valid_comment("trailing-"));
    }

    #[test]
    fn test_node_type_classification() {
        assert_eq!(NodeKind::element("a").node_type(), NodeType::Element);
        assert_eq!(NodeKind::text("x").node_type(), NodeType::Text);
        assert_eq!(
            NodeKind::DocType {
                content: "html".to_string()
            }
            .node_type(),
            NodeType::Unknown
        );
        assert_eq!(
            NodeKind::ProcessingInstruction {
                target: "php".to_string(),
                data: String::new(),
            }
            .node_type(),
            NodeType::Unknown
        );
    }

    #[test]
    fn test_containers() {
        assert!(NodeKind::Document.is_container());
        assert!(NodeKind::element("a").is_container());
        assert!(!NodeKind::text("a").is_container());
    }

    #[test]
    fn test_source_location_display() {
        let loc = SourceLocation { line: 3, column: 7 };
        assert_eq!(loc.to_string(), "3:7");
    }
}
