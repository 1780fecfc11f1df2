//! Typed, failure-raising access to XML documents.
//!
//! `xmlkit` sits on top of the raw [`xmlkit_tree`] API. Where the tree
//! answers "is there a first child?" with an `Option`, this crate answers
//! with a typed [`Handle`] or an [`Error`] that says what was missing and
//! where, so a chain of lookups reads as one `?` sequence:
//!
//! ```rust
//! use xmlkit::{kind, Document};
//!
//! let mut doc = Document::parse(
//!     r#"<config><server port="8080"><name>main</name></server></config>"#,
//! )?;
//! let server = doc.root_element()?.first_child_element(&doc, "server")?;
//!
//! let port: u16 = server.attribute(&doc, "port")?;
//! let name: String = server.first_child_element(&doc, "name")?.text(&doc)?;
//! assert_eq!((port, name.as_str()), (8080, "main"));
//!
//! server.set_attribute(&mut doc, "port", port + 1)?;
//! server.set_attribute(&mut doc, "secure", true)?;
//! assert_eq!(server.child_count::<kind::Element>(&doc)?, 1);
//! assert_eq!(
//!     server.to_xml_string(&doc)?,
//!     r#"<server port="8081" secure="true"><name>main</name></server>"#
//! );
//! # Ok::<(), xmlkit::Error>(())
//! ```
//!
//! Handles are plain copyable ids. They never borrow the [`Document`];
//! each call takes `&Document` or `&mut Document`, and a handle whose node
//! has been removed fails with [`ErrorKind::StaleHandle`].

pub mod document;
pub mod error;
pub mod handle;
pub mod iter;
pub mod kind;
pub mod value;

pub use document::Document;
pub use error::{Error, ErrorKind, Origin, Result};
pub use handle::{
    AttributeHandle, CommentHandle, DeclarationHandle, DocumentHandle, ElementHandle, Handle,
    NodeHandle, StylesheetHandle, TextHandle, UnknownHandle,
};
pub use iter::{AttributeCursor, Attributes, ChildCursor, Children, End, State};
pub use value::{FromXmlText, ToXmlText};
pub use xmlkit_tree::{NodeId, NodeType, ParseOptions, SourceLocation, WriteOptions};
