/*
 * kind.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Node categories used as type-level filters.
//!
//! A [`Handle<K>`](crate::Handle) carries its category `K` in its type, and
//! navigation methods take the category of the node they look for as a type
//! parameter. [`Any`] matches every node.

use xmlkit_tree::NodeType;

mod sealed {
    pub trait Sealed {}
}

/// A node category. Implemented only by the marker types in this module.
pub trait Category: sealed::Sealed + Copy + Eq + std::hash::Hash + std::fmt::Debug + 'static {
    /// Human-readable name used in error messages.
    const NAME: &'static str;

    /// Whether a node of `node_type` belongs to this category.
    fn matches(node_type: NodeType) -> bool;
}

/// Categories whose nodes hold literal text (`value`/`set_value`).
pub trait Valued: Category {}

macro_rules! categories {
    ($($(#[$doc:meta])* $name:ident => $label:literal, $pat:pat,)*) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            pub struct $name;

            impl sealed::Sealed for $name {}

            impl Category for $name {
                const NAME: &'static str = $label;

                fn matches(node_type: NodeType) -> bool {
                    matches!(node_type, $pat)
                }
            }
        )*
    };
}

categories! {
    /// Wildcard: any node.
    Any => "node", _,
    Document => "document", NodeType::Document,
    Element => "element", NodeType::Element,
    Text => "text", NodeType::Text,
    Comment => "comment", NodeType::Comment,
    Declaration => "declaration", NodeType::Declaration,
    StylesheetReference => "stylesheet reference", NodeType::StylesheetReference,
    /// DOCTYPE declarations and processing instructions.
    Unknown => "unknown", NodeType::Unknown,
}

impl Valued for Text {}
impl Valued for Comment {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_matches_everything() {
        for node_type in [
            NodeType::Document,
            NodeType::Element,
            NodeType::Text,
            NodeType::Comment,
            NodeType::Declaration,
            NodeType::StylesheetReference,
            NodeType::Unknown,
        ] {
            assert!(Any::matches(node_type));
        }
    }

    #[test]
    fn test_specific_categories() {
        assert!(Element::matches(NodeType::Element));
        assert!(!Element::matches(NodeType::Text));
        assert!(Comment::matches(NodeType::Comment));
        assert!(!Comment::matches(NodeType::Element));
        assert_eq!(StylesheetReference::NAME, "stylesheet reference");
    }
}
