//! Arena-backed XML document tree.
//!
//! This crate owns the storage side of xmlkit: a [`Tree`] of typed nodes in
//! an [`indextree`] arena, a reader built on [`quick-xml`] events, and a
//! writer that turns the tree back into text. Its API is deliberately raw:
//! navigation returns `Option<NodeId>` and mutations return `bool`. The
//! `xmlkit` crate layers typed handles and failing accessors on top.
//!
//! # Example
//!
//! ```rust
//! use xmlkit_tree::{NodeType, parse};
//!
//! let mut tree = parse(r#"<config><entry key="a">1</entry></config>"#).unwrap();
//! let config = tree.root_element().unwrap();
//! let entry = tree.first_child(config).unwrap();
//!
//! assert_eq!(tree.node_type(entry), Some(NodeType::Element));
//! assert_eq!(tree.attribute(entry, "key"), Some("a"));
//! assert_eq!(tree.attribute(entry, "missing"), None);
//!
//! tree.set_attribute(entry, "key", "b");
//! assert_eq!(
//!     tree.to_xml_string().unwrap(),
//!     r#"<config><entry key="b">1</entry></config>"#
//! );
//! ```

pub mod error;
pub mod options;
pub mod parser;
pub mod tree;
pub mod types;
mod writer;

pub use error::{Result, TreeError};
pub use indextree::NodeId;
pub use options::{ParseOptions, WriteOptions};
pub use parser::{load_file, parse, parse_bytes, parse_with_options};
pub use tree::{Children, Tree};
pub use types::{
    Attribute, NodeData, NodeKind, NodeType, SourceLocation, is_valid_comment, is_valid_name,
};
