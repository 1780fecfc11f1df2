/*
 * handle.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Typed, failing navigation and mutation over single nodes.
//!
//! A [`Handle<K>`] is a copyable id of one node plus its category `K`.
//! It does not borrow the [`Document`]; every method takes the document
//! explicitly, the same way `indextree` node ids take their arena. Methods
//! that look for a node fail with [`ErrorKind::Absence`] when there is
//! none; the `_or_none` variants return `Ok(None)` instead.

use crate::iter::{Attributes, ChildCursor, Children};
use crate::kind::{self, Category, Valued};
use crate::value::{self, FromXmlText, ToXmlText};
use crate::{Document, Error, ErrorKind, Origin, Result};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use xmlkit_tree::{NodeData, NodeId, NodeKind, NodeType, SourceLocation, Tree, WriteOptions};

/// Handle to a node of category `K`.
pub struct Handle<K> {
    id: NodeId,
    _kind: PhantomData<K>,
}

pub type NodeHandle = Handle<kind::Any>;
pub type DocumentHandle = Handle<kind::Document>;
pub type ElementHandle = Handle<kind::Element>;
pub type TextHandle = Handle<kind::Text>;
pub type CommentHandle = Handle<kind::Comment>;
pub type DeclarationHandle = Handle<kind::Declaration>;
pub type StylesheetHandle = Handle<kind::StylesheetReference>;
pub type UnknownHandle = Handle<kind::Unknown>;

// Manual impls: derives would demand the same traits of `K`.
impl<K> Clone for Handle<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for Handle<K> {}

impl<K> PartialEq for Handle<K> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<K> Eq for Handle<K> {}

impl<K> Hash for Handle<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<K: Category> fmt::Debug for Handle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle<{}>({})", K::NAME, self.id)
    }
}

/// Short description of a node for error messages, e.g. `<item>`.
pub(crate) fn describe(tree: &Tree, id: NodeId) -> String {
    match tree.kind(id) {
        Some(NodeKind::Element { name, .. }) => format!("<{}>", name),
        Some(kind) => kind.node_type().to_string(),
        None => "removed node".to_string(),
    }
}

pub(crate) fn origin_of(tree: &Tree, id: NodeId) -> Origin {
    Origin::node(id, tree.get(id).and_then(|data| data.location))
}

/// Walks from `start` along `step` until a node of category `C` (and,
/// for element searches, the wanted name) turns up.
fn find_along<C: Category>(
    tree: &Tree,
    start: Option<NodeId>,
    name: Option<&str>,
    step: impl Fn(&Tree, NodeId) -> Option<NodeId>,
) -> Option<Handle<C>> {
    let mut current = start;
    while let Some(id) = current {
        if matches_filter::<C>(tree, id, name) {
            return Some(Handle::new_unchecked(id));
        }
        current = step(tree, id);
    }
    None
}

pub(crate) fn matches_filter<C: Category>(tree: &Tree, id: NodeId, name: Option<&str>) -> bool {
    let Some(node_type) = tree.node_type(id) else {
        return false;
    };
    C::matches(node_type) && name.is_none_or(|wanted| tree.element_name(id) == Some(wanted))
}

fn filter_label<C: Category>(name: Option<&str>) -> String {
    match name {
        Some(name) => format!("<{}> element", name),
        None => C::NAME.to_string(),
    }
}

impl<K: Category> Handle<K> {
    pub(crate) fn new_unchecked(id: NodeId) -> Self {
        Self {
            id,
            _kind: PhantomData,
        }
    }

    /// Wraps `id`, checking that it is live and belongs to `K`.
    pub fn from_id(doc: &Document, id: NodeId) -> Result<Self> {
        let handle = Self::new_unchecked(id);
        handle.data(doc)?;
        Ok(handle)
    }

    /// The raw id in the underlying tree.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Node data, after checking liveness and category.
    pub(crate) fn data<'d>(&self, doc: &'d Document) -> Result<&'d NodeData> {
        let tree = doc.tree();
        let data = tree.get(self.id).ok_or_else(|| Error::stale(self.id))?;
        let node_type = data.kind.node_type();
        if !K::matches(node_type) {
            return Err(Error::kind_mismatch(format!(
                "expected {} but found {}",
                K::NAME,
                describe(tree, self.id)
            ))
            .with_origin(origin_of(tree, self.id)));
        }
        Ok(data)
    }

    /// Live-and-category check for mutating calls.
    fn check(&self, doc: &Document) -> Result<()> {
        self.data(doc).map(|_| ())
    }

    fn origin(&self, doc: &Document) -> Origin {
        origin_of(doc.tree(), self.id)
    }

    fn absence(&self, doc: &Document, message: String) -> Error {
        Error::absence(message).with_origin(self.origin(doc))
    }

    /// Whether the node is still part of the document's arena.
    pub fn is_alive(&self, doc: &Document) -> bool {
        doc.tree().contains(self.id)
    }

    /// The node's actual kind, which may be narrower than `K`.
    pub fn kind(&self, doc: &Document) -> Result<NodeType> {
        Ok(self.data(doc)?.kind.node_type())
    }

    pub fn kind_name(&self, doc: &Document) -> Result<&'static str> {
        Ok(self.kind(doc)?.as_str())
    }

    /// Where the node started in the parsed source, if it was parsed.
    pub fn location(&self, doc: &Document) -> Result<Option<SourceLocation>> {
        Ok(self.data(doc)?.location)
    }

    /// The same node without a category restriction.
    pub fn as_node(&self) -> NodeHandle {
        Handle::new_unchecked(self.id)
    }

    /// Whether the node belongs to category `C`.
    pub fn is<C: Category>(&self, doc: &Document) -> Result<bool> {
        Ok(C::matches(self.kind(doc)?))
    }

    /// Re-types the handle, failing with `KindMismatch` if the node does not
    /// belong to `C`.
    pub fn cast<C: Category>(&self, doc: &Document) -> Result<Handle<C>> {
        self.check(doc)?;
        Handle::<C>::from_id(doc, self.id)
    }

    // ---- navigation -------------------------------------------------------

    pub fn parent_or_none(&self, doc: &Document) -> Result<Option<NodeHandle>> {
        self.check(doc)?;
        Ok(doc.tree().parent(self.id).map(Handle::new_unchecked))
    }

    pub fn parent(&self, doc: &Document) -> Result<NodeHandle> {
        self.parent_or_none(doc)?.ok_or_else(|| {
            let what = describe(doc.tree(), self.id);
            self.absence(doc, format!("{} has no parent", what))
        })
    }

    pub fn first_child_or_none<C: Category>(&self, doc: &Document) -> Result<Option<Handle<C>>> {
        self.check(doc)?;
        let tree = doc.tree();
        Ok(find_along(tree, tree.first_child(self.id), None, Tree::next_sibling))
    }

    pub fn first_child<C: Category>(&self, doc: &Document) -> Result<Handle<C>> {
        self.first_child_or_none(doc)?
            .ok_or_else(|| self.missing_child::<C>(doc, None))
    }

    pub fn last_child_or_none<C: Category>(&self, doc: &Document) -> Result<Option<Handle<C>>> {
        self.check(doc)?;
        let tree = doc.tree();
        Ok(find_along(tree, tree.last_child(self.id), None, Tree::previous_sibling))
    }

    pub fn last_child<C: Category>(&self, doc: &Document) -> Result<Handle<C>> {
        self.last_child_or_none(doc)?
            .ok_or_else(|| self.missing_child::<C>(doc, None))
    }

    pub fn next_sibling_or_none<C: Category>(&self, doc: &Document) -> Result<Option<Handle<C>>> {
        self.check(doc)?;
        let tree = doc.tree();
        Ok(find_along(tree, tree.next_sibling(self.id), None, Tree::next_sibling))
    }

    pub fn next_sibling<C: Category>(&self, doc: &Document) -> Result<Handle<C>> {
        self.next_sibling_or_none(doc)?
            .ok_or_else(|| self.missing_sibling::<C>(doc, "after", None))
    }

    pub fn previous_sibling_or_none<C: Category>(
        &self,
        doc: &Document,
    ) -> Result<Option<Handle<C>>> {
        self.check(doc)?;
        let tree = doc.tree();
        Ok(find_along(
            tree,
            tree.previous_sibling(self.id),
            None,
            Tree::previous_sibling,
        ))
    }

    pub fn previous_sibling<C: Category>(&self, doc: &Document) -> Result<Handle<C>> {
        self.previous_sibling_or_none(doc)?
            .ok_or_else(|| self.missing_sibling::<C>(doc, "before", None))
    }

    /// First child element called `name`.
    pub fn first_child_element_or_none(
        &self,
        doc: &Document,
        name: &str,
    ) -> Result<Option<ElementHandle>> {
        self.check(doc)?;
        let tree = doc.tree();
        Ok(find_along(
            tree,
            tree.first_child(self.id),
            Some(name),
            Tree::next_sibling,
        ))
    }

    pub fn first_child_element(&self, doc: &Document, name: &str) -> Result<ElementHandle> {
        self.first_child_element_or_none(doc, name)?
            .ok_or_else(|| self.missing_child::<kind::Element>(doc, Some(name)))
    }

    /// Next sibling element called `name`.
    pub fn next_sibling_element_or_none(
        &self,
        doc: &Document,
        name: &str,
    ) -> Result<Option<ElementHandle>> {
        self.check(doc)?;
        let tree = doc.tree();
        Ok(find_along(
            tree,
            tree.next_sibling(self.id),
            Some(name),
            Tree::next_sibling,
        ))
    }

    pub fn next_sibling_element(&self, doc: &Document, name: &str) -> Result<ElementHandle> {
        self.next_sibling_element_or_none(doc, name)?
            .ok_or_else(|| self.missing_sibling::<kind::Element>(doc, "after", Some(name)))
    }

    fn missing_child<C: Category>(&self, doc: &Document, name: Option<&str>) -> Error {
        let what = describe(doc.tree(), self.id);
        self.absence(
            doc,
            format!("{} has no {} child", what, filter_label::<C>(name)),
        )
    }

    fn missing_sibling<C: Category>(
        &self,
        doc: &Document,
        direction: &str,
        name: Option<&str>,
    ) -> Error {
        let what = describe(doc.tree(), self.id);
        self.absence(
            doc,
            format!("no {} sibling {} {}", filter_label::<C>(name), direction, what),
        )
    }

    /// Children of category `C`, in document order.
    pub fn children<'d, C: Category>(&self, doc: &'d Document) -> Result<Children<'d, C>> {
        self.check(doc)?;
        Ok(Children::new(doc, ChildCursor::new(*self)))
    }

    /// Child elements called `name`, in document order.
    pub fn child_elements<'d>(
        &self,
        doc: &'d Document,
        name: &str,
    ) -> Result<Children<'d, kind::Element>> {
        self.check(doc)?;
        Ok(Children::new(
            doc,
            ChildCursor::<kind::Element>::new(*self).named(name),
        ))
    }

    /// A cursor over children of category `C`, positioned before the first.
    pub fn cursor<C: Category>(&self) -> ChildCursor<C> {
        ChildCursor::new(*self)
    }

    pub fn has_children(&self, doc: &Document) -> Result<bool> {
        self.check(doc)?;
        Ok(doc.tree().first_child(self.id).is_some())
    }

    pub fn child_count<C: Category>(&self, doc: &Document) -> Result<usize> {
        Ok(self.children::<C>(doc)?.count())
    }

    /// Concatenated text of the node and all its descendants.
    pub fn text_content(&self, doc: &Document) -> Result<String> {
        self.check(doc)?;
        Ok(doc.tree().text_content(self.id))
    }

    /// Serializes this node and its subtree as compact XML.
    pub fn to_xml_string(&self, doc: &Document) -> Result<String> {
        self.check(doc)?;
        Ok(doc
            .tree()
            .node_to_xml_string(self.id, &WriteOptions::default())?)
    }

    // ---- structural mutation ----------------------------------------------

    /// Checks that `new` may become a child of this node.
    fn check_adoptable(&self, doc: &Document, new: NodeId) -> Result<()> {
        let tree = doc.tree();
        if !tree.contains(new) {
            return Err(Error::stale(new));
        }
        if !tree.kind(self.id).is_some_and(NodeKind::is_container) {
            return Err(Error::structural(format!(
                "{} cannot have children",
                describe(tree, self.id)
            ))
            .with_origin(self.origin(doc)));
        }
        if tree.node_type(new) == Some(NodeType::Document) {
            return Err(Error::structural("the document node cannot be inserted")
                .with_origin(self.origin(doc)));
        }
        if tree.is_ancestor_or_self(new, self.id) {
            return Err(Error::structural(format!(
                "cannot insert {} into its own subtree",
                describe(tree, new)
            ))
            .with_origin(self.origin(doc)));
        }
        if tree.node_type(self.id) == Some(NodeType::Document) {
            self.check_document_child(doc, new)?;
        }
        Ok(())
    }

    /// The document node holds at most one element and no text.
    fn check_document_child(&self, doc: &Document, new: NodeId) -> Result<()> {
        let tree = doc.tree();
        match tree.node_type(new) {
            Some(NodeType::Text) => Err(Error::structural(
                "text cannot be a child of the document node",
            )
            .with_origin(self.origin(doc))),
            Some(NodeType::Element) => match tree.root_element() {
                Some(existing) if existing != new => Err(Error::structural(format!(
                    "the document already has root element {}",
                    describe(tree, existing)
                ))
                .with_origin(self.origin(doc))),
                _ => Ok(()),
            },
            _ => Ok(()),
        }
    }

    /// Checks that `child` is a direct child of this node.
    fn check_child(&self, doc: &Document, child: NodeId) -> Result<()> {
        let tree = doc.tree();
        if !tree.contains(child) {
            return Err(Error::stale(child));
        }
        if tree.parent(child) != Some(self.id) {
            return Err(Error::structural(format!(
                "{} is not a child of {}",
                describe(tree, child),
                describe(tree, self.id)
            ))
            .with_origin(self.origin(doc)));
        }
        Ok(())
    }

    /// Moves `child` to the end of this node's children. A node that is
    /// already in the tree is detached from its old place first.
    pub fn append_child<C: Category>(
        &self,
        doc: &mut Document,
        child: Handle<C>,
    ) -> Result<Handle<C>> {
        self.check(doc)?;
        child.check(doc)?;
        self.check_adoptable(doc, child.id)?;
        if !doc.tree_mut().append_child(self.id, child.id) {
            return Err(Error::structural("append rejected by the tree")
                .with_origin(self.origin(doc)));
        }
        tracing::trace!(parent = %self.id, child = %child.id, "append child");
        Ok(child)
    }

    /// Moves `child` to the front of this node's children.
    pub fn prepend_child<C: Category>(
        &self,
        doc: &mut Document,
        child: Handle<C>,
    ) -> Result<Handle<C>> {
        self.check(doc)?;
        child.check(doc)?;
        self.check_adoptable(doc, child.id)?;
        if !doc.tree_mut().prepend_child(self.id, child.id) {
            return Err(Error::structural("prepend rejected by the tree")
                .with_origin(self.origin(doc)));
        }
        tracing::trace!(parent = %self.id, child = %child.id, "prepend child");
        Ok(child)
    }

    /// Inserts `new` before `reference`, which must be a child of this node.
    pub fn insert_before<R: Category, C: Category>(
        &self,
        doc: &mut Document,
        reference: Handle<R>,
        new: Handle<C>,
    ) -> Result<Handle<C>> {
        self.insert_next_to(doc, reference.id, new, true)
    }

    /// Inserts `new` after `reference`, which must be a child of this node.
    pub fn insert_after<R: Category, C: Category>(
        &self,
        doc: &mut Document,
        reference: Handle<R>,
        new: Handle<C>,
    ) -> Result<Handle<C>> {
        self.insert_next_to(doc, reference.id, new, false)
    }

    fn insert_next_to<C: Category>(
        &self,
        doc: &mut Document,
        reference: NodeId,
        new: Handle<C>,
        before: bool,
    ) -> Result<Handle<C>> {
        self.check(doc)?;
        new.check(doc)?;
        self.check_child(doc, reference)?;
        self.check_adoptable(doc, new.id)?;
        if reference == new.id {
            return Err(Error::structural("cannot insert a node next to itself")
                .with_origin(self.origin(doc)));
        }
        let tree = doc.tree_mut();
        let inserted = if before {
            tree.insert_before(reference, new.id)
        } else {
            tree.insert_after(reference, new.id)
        };
        if !inserted {
            return Err(Error::structural("insert rejected by the tree")
                .with_origin(self.origin(doc)));
        }
        tracing::trace!(parent = %self.id, node = %new.id, before, "insert child");
        Ok(new)
    }

    /// Removes `child` and its subtree from the document. Handles into the
    /// removed subtree become stale.
    ///
    /// # Errors
    ///
    /// `StructuralViolation` if `child` is not a child of this node; the
    /// tree is left untouched in that case.
    pub fn remove_child<C: Category>(&self, doc: &mut Document, child: Handle<C>) -> Result<()> {
        self.check(doc)?;
        self.check_child(doc, child.id)?;
        doc.tree_mut().remove(child.id);
        tracing::trace!(parent = %self.id, child = %child.id, "remove child");
        Ok(())
    }

    /// Removes every child of this node.
    pub fn clear(&self, doc: &mut Document) -> Result<()> {
        self.check(doc)?;
        doc.tree_mut().clear_children(self.id);
        Ok(())
    }

    /// Unlinks this node from its parent, keeping it alive for reinsertion.
    pub fn detach(&self, doc: &mut Document) -> Result<()> {
        self.check(doc)?;
        if !doc.tree_mut().detach(self.id) {
            return Err(Error::structural("the document node cannot be detached")
                .with_origin(self.origin(doc)));
        }
        Ok(())
    }

    /// Creates an element called `name` and appends it.
    pub fn append_element(&self, doc: &mut Document, name: &str) -> Result<ElementHandle> {
        self.check(doc)?;
        let element = doc.create_element(name)?;
        self.append_child(doc, element)
    }

    /// Creates a text node holding `value` and appends it.
    pub fn append_text<V: ToXmlText>(&self, doc: &mut Document, value: V) -> Result<TextHandle> {
        self.check(doc)?;
        let text = doc.create_text(value);
        self.append_child(doc, text)
    }

    /// Creates a comment and appends it.
    pub fn append_comment(&self, doc: &mut Document, content: &str) -> Result<CommentHandle> {
        self.check(doc)?;
        let comment = doc.create_comment(content)?;
        self.append_child(doc, comment)
    }
}

impl DocumentHandle {
    pub fn root_element(&self, doc: &Document) -> Result<ElementHandle> {
        self.first_child::<kind::Element>(doc)
    }
}

impl ElementHandle {
    pub fn name<'d>(&self, doc: &'d Document) -> Result<&'d str> {
        match &self.data(doc)?.kind {
            NodeKind::Element { name, .. } => Ok(name.as_str()),
            _ => Err(Error::kind_mismatch("expected element")),
        }
    }

    /// Renames the element, failing with `Conversion` for an invalid name.
    pub fn set_name(&self, doc: &mut Document, name: &str) -> Result<()> {
        self.check(doc)?;
        value::check_name(name)?;
        doc.tree_mut().set_element_name(self.id, name);
        Ok(())
    }

    fn attribute_context(&self, doc: &Document, name: &str) -> Origin {
        let what = describe(doc.tree(), self.id);
        self.origin(doc)
            .with_context(format!("attribute '{}' on {}", name, what))
    }

    /// Raw text of attribute `name`, or `None` when absent.
    pub fn attribute_text<'d>(&self, doc: &'d Document, name: &str) -> Result<Option<&'d str>> {
        self.check(doc)?;
        Ok(doc.tree().attribute(self.id, name))
    }

    pub fn has_attribute(&self, doc: &Document, name: &str) -> Result<bool> {
        Ok(self.attribute_text(doc, name)?.is_some())
    }

    /// Reads attribute `name` as a `T`.
    ///
    /// # Errors
    ///
    /// `Absence` if the attribute does not exist, `Conversion` if its text
    /// is not a valid `T`.
    pub fn attribute<T: FromXmlText>(&self, doc: &Document, name: &str) -> Result<T> {
        let Some(text) = self.attribute_text(doc, name)? else {
            let what = describe(doc.tree(), self.id);
            return Err(Error::absence(format!("{} has no attribute '{}'", what, name))
                .with_origin(self.origin(doc)));
        };
        value::parse(text).map_err(|err| err.with_origin(self.attribute_context(doc, name)))
    }

    /// Reads attribute `name` as a `T`, returning `default` when it is
    /// absent. Present but malformed text still fails.
    pub fn attribute_or<T: FromXmlText>(
        &self,
        doc: &Document,
        name: &str,
        default: T,
    ) -> Result<T> {
        match self.attribute_text(doc, name)? {
            Some(text) => value::parse(text)
                .map_err(|err| err.with_origin(self.attribute_context(doc, name))),
            None => Ok(default),
        }
    }

    /// Writes `value` in its canonical text form, replacing an existing
    /// value or adding the attribute at the end. A `name` that is not a
    /// valid XML name fails with `Conversion`.
    pub fn set_attribute<V: ToXmlText>(
        &self,
        doc: &mut Document,
        name: &str,
        value: V,
    ) -> Result<()> {
        self.check(doc)?;
        value::check_name(name)?;
        doc.tree_mut()
            .set_attribute(self.id, name, value::format(&value));
        Ok(())
    }

    /// Removes attribute `name`, failing with `Absence` if there is none.
    pub fn remove_attribute(&self, doc: &mut Document, name: &str) -> Result<()> {
        self.check(doc)?;
        if !doc.tree_mut().remove_attribute(self.id, name) {
            let what = describe(doc.tree(), self.id);
            return Err(Error::absence(format!("{} has no attribute '{}'", what, name))
                .with_origin(self.origin(doc)));
        }
        Ok(())
    }

    pub fn first_attribute_or_none(&self, doc: &Document) -> Result<Option<AttributeHandle>> {
        self.check(doc)?;
        Ok(doc
            .tree()
            .first_attribute(self.id)
            .map(|attr| AttributeHandle::new(*self, &attr.name)))
    }

    pub fn first_attribute(&self, doc: &Document) -> Result<AttributeHandle> {
        self.first_attribute_or_none(doc)?.ok_or_else(|| {
            let what = describe(doc.tree(), self.id);
            self.absence(doc, format!("{} has no attributes", what))
        })
    }

    /// Handle to attribute `name`.
    pub fn attribute_handle(&self, doc: &Document, name: &str) -> Result<AttributeHandle> {
        if self.has_attribute(doc, name)? {
            Ok(AttributeHandle::new(*self, name))
        } else {
            let what = describe(doc.tree(), self.id);
            Err(self.absence(doc, format!("{} has no attribute '{}'", what, name)))
        }
    }

    pub fn next_attribute_or_none(
        &self,
        doc: &Document,
        name: &str,
    ) -> Result<Option<AttributeHandle>> {
        // The named attribute itself must exist.
        self.attribute_handle(doc, name)?;
        Ok(doc
            .tree()
            .next_attribute(self.id, name)
            .map(|attr| AttributeHandle::new(*self, &attr.name)))
    }

    /// The attribute after `name`, in insertion order.
    pub fn next_attribute(&self, doc: &Document, name: &str) -> Result<AttributeHandle> {
        self.next_attribute_or_none(doc, name)?.ok_or_else(|| {
            let what = describe(doc.tree(), self.id);
            self.absence(doc, format!("no attribute after '{}' on {}", name, what))
        })
    }

    /// Attributes in insertion order.
    pub fn attributes<'d>(&self, doc: &'d Document) -> Result<Attributes<'d>> {
        self.check(doc)?;
        Ok(Attributes::new(doc, *self))
    }

    /// Reads the element's first text child as a `T`.
    ///
    /// # Errors
    ///
    /// `Absence` if the element has no text child, `Conversion` if the text
    /// is not a valid `T`.
    pub fn text<T: FromXmlText>(&self, doc: &Document) -> Result<T> {
        let text = self.first_child::<kind::Text>(doc)?;
        text.value_as(doc)
    }

    /// Like [`text`](Self::text), but returns `default` when there is no
    /// text child.
    pub fn text_or<T: FromXmlText>(&self, doc: &Document, default: T) -> Result<T> {
        match self.first_child_or_none::<kind::Text>(doc)? {
            Some(text) => text.value_as(doc),
            None => Ok(default),
        }
    }

    /// Sets the element's first text child to `value`, appending a text
    /// node when there is none.
    pub fn set_text<V: ToXmlText>(&self, doc: &mut Document, value: V) -> Result<TextHandle> {
        match self.first_child_or_none::<kind::Text>(doc)? {
            Some(text) => {
                text.set_value(doc, value)?;
                Ok(text)
            }
            None => self.append_text(doc, value),
        }
    }
}

impl<K: Valued> Handle<K> {
    /// The literal stored text.
    pub fn value<'d>(&self, doc: &'d Document) -> Result<&'d str> {
        self.data(doc)?;
        doc.tree()
            .value(self.id)
            .ok_or_else(|| Error::kind_mismatch(format!("{} has no value", K::NAME)))
    }

    /// The stored text read as a `T`.
    pub fn value_as<T: FromXmlText>(&self, doc: &Document) -> Result<T> {
        let text = self.value(doc)?;
        value::parse(text).map_err(|err| {
            let what = describe(doc.tree(), self.id);
            err.with_origin(self.origin(doc).with_context(format!("{} content", what)))
        })
    }

    /// Replaces the stored text with `value` in canonical form.
    ///
    /// # Errors
    ///
    /// `Conversion` on a comment when the text holds `--` or ends with `-`.
    pub fn set_value<V: ToXmlText>(&self, doc: &mut Document, value: V) -> Result<()> {
        self.check(doc)?;
        let text = value::format(&value);
        if doc.tree().node_type(self.id) == Some(NodeType::Comment) {
            value::check_comment(&text)?;
        }
        doc.tree_mut().set_value(self.id, text);
        Ok(())
    }
}

impl TextHandle {
    /// Whether the text is written as a CDATA section.
    pub fn is_cdata(&self, doc: &Document) -> Result<bool> {
        match &self.data(doc)?.kind {
            NodeKind::Text { cdata, .. } => Ok(*cdata),
            _ => Err(Error::kind_mismatch("expected text")),
        }
    }
}

impl DeclarationHandle {
    fn fields<'d>(&self, doc: &'d Document) -> Result<[Option<&'d str>; 3]> {
        match &self.data(doc)?.kind {
            NodeKind::Declaration {
                version,
                encoding,
                standalone,
            } => Ok([
                version.as_deref(),
                encoding.as_deref(),
                standalone.as_deref(),
            ]),
            _ => Err(Error::kind_mismatch("expected declaration")),
        }
    }

    pub fn version<'d>(&self, doc: &'d Document) -> Result<Option<&'d str>> {
        Ok(self.fields(doc)?[0])
    }

    pub fn encoding<'d>(&self, doc: &'d Document) -> Result<Option<&'d str>> {
        Ok(self.fields(doc)?[1])
    }

    pub fn standalone<'d>(&self, doc: &'d Document) -> Result<Option<&'d str>> {
        Ok(self.fields(doc)?[2])
    }
}

impl StylesheetHandle {
    fn fields<'d>(&self, doc: &'d Document) -> Result<(&'d str, &'d str)> {
        match &self.data(doc)?.kind {
            NodeKind::StylesheetReference {
                stylesheet_type,
                href,
            } => Ok((stylesheet_type.as_str(), href.as_str())),
            _ => Err(Error::kind_mismatch("expected stylesheet reference")),
        }
    }

    /// The `type` pseudo-attribute, e.g. `text/xsl`.
    pub fn stylesheet_type<'d>(&self, doc: &'d Document) -> Result<&'d str> {
        Ok(self.fields(doc)?.0)
    }

    pub fn href<'d>(&self, doc: &'d Document) -> Result<&'d str> {
        Ok(self.fields(doc)?.1)
    }
}

/// Handle to one attribute of an element, identified by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeHandle {
    element: ElementHandle,
    name: String,
}

impl AttributeHandle {
    pub(crate) fn new(element: ElementHandle, name: &str) -> Self {
        Self {
            element,
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The element the attribute belongs to.
    pub fn element(&self) -> ElementHandle {
        self.element
    }

    /// Raw attribute text.
    pub fn text<'d>(&self, doc: &'d Document) -> Result<&'d str> {
        self.element
            .attribute_text(doc, &self.name)?
            .ok_or_else(|| self.removed(doc))
    }

    pub fn value<T: FromXmlText>(&self, doc: &Document) -> Result<T> {
        self.element.attribute(doc, &self.name)
    }

    pub fn set_value<V: ToXmlText>(&self, doc: &mut Document, value: V) -> Result<()> {
        self.text(doc)?;
        self.element.set_attribute(doc, &self.name, value)
    }

    pub fn next_or_none(&self, doc: &Document) -> Result<Option<AttributeHandle>> {
        self.element.next_attribute_or_none(doc, &self.name)
    }

    pub fn next(&self, doc: &Document) -> Result<AttributeHandle> {
        self.element.next_attribute(doc, &self.name)
    }

    fn removed(&self, doc: &Document) -> Error {
        let what = describe(doc.tree(), self.element.id());
        Error::new(
            ErrorKind::Absence,
            format!("attribute '{}' no longer exists on {}", self.name, what),
        )
        .with_origin(origin_of(doc.tree(), self.element.id()))
    }
}
