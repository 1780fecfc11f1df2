/*
 * document.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Loading, saving and node creation at the document level.

use crate::handle::{
    CommentHandle, DeclarationHandle, DocumentHandle, ElementHandle, Handle, NodeHandle,
    StylesheetHandle, TextHandle,
};
use crate::kind::{self, Category};
use crate::value::{self, ToXmlText};
use crate::{Error, Result};
use std::path::Path;
use xmlkit_tree::{NodeId, ParseOptions, Tree, WriteOptions};

/// An XML document: the owner of every node that handles refer to.
///
/// Handles borrow the document per call (`&Document` to read,
/// `&mut Document` to modify), so one document can hand out any number of
/// handles without lifetimes tying them together.
#[derive(Debug, Clone, Default)]
pub struct Document {
    tree: Tree,
}

impl Document {
    /// An empty document with no root element.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses XML text.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::Load`](crate::ErrorKind::Load) if the text
    /// is not well-formed or has no single root element.
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_with_options(text, &ParseOptions::default())
    }

    pub fn parse_with_options(text: &str, options: &ParseOptions) -> Result<Self> {
        let tree = xmlkit_tree::parse_with_options(text, options)?;
        Ok(Self { tree })
    }

    /// Reads and parses a file.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_file_with_options(path, &ParseOptions::default())
    }

    pub fn load_file_with_options(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        let tree = xmlkit_tree::load_file(path, options).map_err(|err| {
            let context = format!("file '{}'", path.display());
            let err = Error::from(err);
            let origin = err.origin().cloned().unwrap_or_default().with_context(context);
            err.with_origin(origin)
        })?;
        tracing::debug!(path = %path.display(), nodes = tree.len(), "loaded document");
        Ok(Self { tree })
    }

    /// Writes the document to a file using compact formatting.
    pub fn save_file(&self, path: impl AsRef<Path>) -> Result<()> {
        self.save_file_with_options(path, &WriteOptions::default())
    }

    pub fn save_file_with_options(
        &self,
        path: impl AsRef<Path>,
        options: &WriteOptions,
    ) -> Result<()> {
        self.tree.save_file(path, options)?;
        Ok(())
    }

    /// Serializes the document as compact XML.
    pub fn to_xml_string(&self) -> Result<String> {
        Ok(self.tree.to_xml_string()?)
    }

    pub fn to_xml_string_with(&self, options: &WriteOptions) -> Result<String> {
        Ok(self.tree.to_xml_string_with(options)?)
    }

    /// Handle to the document node itself.
    pub fn root(&self) -> DocumentHandle {
        Handle::new_unchecked(self.tree.root())
    }

    /// The single top-level element.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::Absence`](crate::ErrorKind::Absence) for a
    /// document without one.
    pub fn root_element(&self) -> Result<ElementHandle> {
        self.root().first_child::<kind::Element>(self)
    }

    /// Wraps a raw node id, checking that it is live and of category `K`.
    pub fn handle<K: Category>(&self, id: NodeId) -> Result<Handle<K>> {
        Handle::from_id(self, id)
    }

    /// Wraps a raw node id without a category restriction.
    pub fn node(&self, id: NodeId) -> Result<NodeHandle> {
        self.handle::<kind::Any>(id)
    }

    // ---- node creation. New nodes are detached until inserted. -------------

    /// Creates a detached element.
    ///
    /// # Errors
    ///
    /// `Conversion` if `name` is not a valid XML name.
    pub fn create_element(&mut self, name: &str) -> Result<ElementHandle> {
        value::check_name(name)?;
        Ok(Handle::new_unchecked(self.tree.new_element(name)))
    }

    pub fn create_text<V: ToXmlText>(&mut self, value: V) -> TextHandle {
        Handle::new_unchecked(self.tree.new_text(value::format(&value)))
    }

    pub fn create_cdata(&mut self, content: &str) -> TextHandle {
        Handle::new_unchecked(self.tree.new_cdata(content))
    }

    /// Creates a detached comment, failing with `Conversion` when `content`
    /// holds `--` or ends with `-`.
    pub fn create_comment(&mut self, content: &str) -> Result<CommentHandle> {
        value::check_comment(content)?;
        Ok(Handle::new_unchecked(self.tree.new_comment(content)))
    }

    pub fn create_declaration(
        &mut self,
        version: &str,
        encoding: Option<&str>,
        standalone: Option<&str>,
    ) -> DeclarationHandle {
        Handle::new_unchecked(self.tree.new_declaration(Some(version), encoding, standalone))
    }

    pub fn create_stylesheet_reference(
        &mut self,
        stylesheet_type: &str,
        href: &str,
    ) -> Result<StylesheetHandle> {
        value::check_pseudo_attribute(stylesheet_type)?;
        value::check_pseudo_attribute(href)?;
        Ok(Handle::new_unchecked(
            self.tree.new_stylesheet_reference(stylesheet_type, href),
        ))
    }

    /// The underlying tree, for operations this layer does not wrap.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub fn into_tree(self) -> Tree {
        self.tree
    }
}

impl From<Tree> for Document {
    fn from(tree: Tree) -> Self {
        Self { tree }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_parse_and_root_element() {
        let doc = Document::parse("<root><a/></root>").unwrap();
        let root = doc.root_element().unwrap();
        assert_eq!(root.name(&doc).unwrap(), "root");
    }

    #[test]
    fn test_parse_failure_is_load_error() {
        let err = Document::parse("<root><a></root>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Load);
    }

    #[test]
    fn test_empty_document_has_no_root_element() {
        let doc = Document::new();
        let err = doc.root_element().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Absence);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Document::load_file("/definitely/not/here.xml").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(
            err.origin().and_then(|o| o.context.as_deref()),
            Some("file '/definitely/not/here.xml'")
        );
    }

    #[test]
    fn test_handle_from_raw_id() {
        let doc = Document::parse("<root><!--c--></root>").unwrap();
        let root = doc.root_element().unwrap();
        let comment_id = doc.tree().first_child(root.id()).unwrap();
        assert!(doc.handle::<kind::Comment>(comment_id).is_ok());
        let err = doc.handle::<kind::Element>(comment_id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KindMismatch);
    }

    #[test]
    fn test_created_nodes_are_detached() {
        let mut doc = Document::new();
        let element = doc.create_element("lonely").unwrap();
        assert_eq!(element.parent_or_none(&doc).unwrap(), None);
        assert_eq!(doc.to_xml_string().unwrap(), "");
    }

    #[test]
    fn test_creation_rejects_unwritable_content() {
        let mut doc = Document::new();
        for name in ["", "a b", "1st", "a<b"] {
            let err = doc.create_element(name).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Conversion, "{name:?}");
        }
        for content in ["a -- b", "a --> b", "dash-"] {
            let err = doc.create_comment(content).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Conversion, "{content:?}");
        }
        let err = doc
            .create_stylesheet_reference("text/xsl", "a\"b'c.xsl")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conversion);
        assert!(doc.create_stylesheet_reference("text/xsl", "?>.xsl").is_err());
        assert!(doc.create_comment("a - b").is_ok());
    }
}
