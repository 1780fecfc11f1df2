/*
 * tree.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The arena that owns every node of a document.
//!
//! All navigation here is "raw": absence is reported as `None` and failed
//! mutations as `false`. Callers that want typed, failing access build it
//! on top of these primitives.

use crate::{Attribute, NodeData, NodeKind, NodeType};
use indextree::{Arena, NodeId};

/// An XML document tree.
///
/// Nodes live in an `indextree` arena and are addressed by [`NodeId`].
/// Removed nodes stay detectable: [`Tree::contains`] returns `false` for
/// them, and every accessor treats them as absent.
#[derive(Debug, Clone)]
pub struct Tree {
    arena: Arena<NodeData>,
    root: NodeId,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Creates a tree holding only the document node.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(NodeData::new(NodeKind::Document));
        Self { arena, root }
    }

    /// The document node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The first element child of the document node.
    pub fn root_element(&self) -> Option<NodeId> {
        self.children(self.root)
            .find(|&id| self.node_type(id) == Some(NodeType::Element))
    }

    /// Whether `id` refers to a live node of this tree.
    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.get(id).is_some() && !id.is_removed(&self.arena)
    }

    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        if self.contains(id) {
            Some(self.arena[id].get())
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        if self.contains(id) {
            Some(self.arena[id].get_mut())
        } else {
            None
        }
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.get(id).map(|data| &data.kind)
    }

    pub fn node_type(&self, id: NodeId) -> Option<NodeType> {
        self.kind(id).map(NodeKind::node_type)
    }

    /// Number of live nodes, the document node included.
    pub fn len(&self) -> usize {
        self.root.descendants(&self.arena).count()
    }

    pub fn is_empty(&self) -> bool {
        self.arena[self.root].first_child().is_none()
    }

    // ---- navigation -------------------------------------------------------

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.link(id, |node| node.parent())
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.link(id, |node| node.first_child())
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.link(id, |node| node.last_child())
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.link(id, |node| node.next_sibling())
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.link(id, |node| node.previous_sibling())
    }

    fn link(
        &self,
        id: NodeId,
        f: impl FnOnce(&indextree::Node<NodeData>) -> Option<NodeId>,
    ) -> Option<NodeId> {
        if self.contains(id) {
            f(&self.arena[id])
        } else {
            None
        }
    }

    /// Children of `id` in document order. Empty for removed nodes.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.first_child(id),
        }
    }

    /// Whether `ancestor` is `node` itself or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.contains(node) && node.ancestors(&self.arena).any(|id| id == ancestor)
    }

    // ---- node creation ----------------------------------------------------

    /// Adds a detached node to the arena.
    pub fn new_node(&mut self, data: NodeData) -> NodeId {
        self.arena.new_node(data)
    }

    pub fn new_element(&mut self, name: impl Into<String>) -> NodeId {
        self.new_node(NodeData::new(NodeKind::element(name)))
    }

    pub fn new_text(&mut self, content: impl Into<String>) -> NodeId {
        self.new_node(NodeData::new(NodeKind::text(content)))
    }

    pub fn new_cdata(&mut self, content: impl Into<String>) -> NodeId {
        self.new_node(NodeData::new(NodeKind::Text {
            content: content.into(),
            cdata: true,
        }))
    }

    pub fn new_comment(&mut self, content: impl Into<String>) -> NodeId {
        self.new_node(NodeData::new(NodeKind::Comment {
            content: content.into(),
        }))
    }

    pub fn new_declaration(
        &mut self,
        version: Option<&str>,
        encoding: Option<&str>,
        standalone: Option<&str>,
    ) -> NodeId {
        self.new_node(NodeData::new(NodeKind::Declaration {
            version: version.map(str::to_string),
            encoding: encoding.map(str::to_string),
            standalone: standalone.map(str::to_string),
        }))
    }

    pub fn new_stylesheet_reference(
        &mut self,
        stylesheet_type: impl Into<String>,
        href: impl Into<String>,
    ) -> NodeId {
        self.new_node(NodeData::new(NodeKind::StylesheetReference {
            stylesheet_type: stylesheet_type.into(),
            href: href.into(),
        }))
    }

    // ---- structural mutation ----------------------------------------------

    /// Appends `child` as the last child of `parent`, detaching it from any
    /// previous parent. Returns `false` if either node is not live, `parent`
    /// cannot hold children, or the move would create a cycle.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.can_adopt(parent, child) {
            return false;
        }
        parent.checked_append(child, &mut self.arena).is_ok()
    }

    /// Inserts `child` as the first child of `parent`.
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.can_adopt(parent, child) {
            return false;
        }
        parent.checked_prepend(child, &mut self.arena).is_ok()
    }

    /// Inserts `new` as the previous sibling of `reference`.
    pub fn insert_before(&mut self, reference: NodeId, new: NodeId) -> bool {
        match self.parent(reference) {
            Some(parent) if reference != new && self.can_adopt(parent, new) => {
                reference.checked_insert_before(new, &mut self.arena).is_ok()
            }
            _ => false,
        }
    }

    /// Inserts `new` as the next sibling of `reference`.
    pub fn insert_after(&mut self, reference: NodeId, new: NodeId) -> bool {
        match self.parent(reference) {
            Some(parent) if reference != new && self.can_adopt(parent, new) => {
                reference.checked_insert_after(new, &mut self.arena).is_ok()
            }
            _ => false,
        }
    }

    fn can_adopt(&self, parent: NodeId, child: NodeId) -> bool {
        self.kind(parent).is_some_and(NodeKind::is_container)
            && self.contains(child)
            && child != self.root
            && !self.is_ancestor_or_self(child, parent)
    }

    /// Unlinks `id` from its parent and siblings. The node and its subtree
    /// stay alive.
    pub fn detach(&mut self, id: NodeId) -> bool {
        if !self.contains(id) || id == self.root {
            return false;
        }
        id.detach(&mut self.arena);
        true
    }

    /// Removes `id` and its whole subtree from the arena.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if !self.contains(id) || id == self.root {
            return false;
        }
        id.remove_subtree(&mut self.arena);
        true
    }

    /// Removes every child of `id`. Returns `false` for removed nodes.
    pub fn clear_children(&mut self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        let children: Vec<NodeId> = self.children(id).collect();
        for child in children {
            child.remove_subtree(&mut self.arena);
        }
        true
    }

    // ---- element data -----------------------------------------------------

    /// Element name, `None` for other kinds.
    pub fn element_name(&self, id: NodeId) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn set_element_name(&mut self, id: NodeId, new_name: impl Into<String>) -> bool {
        match self.get_mut(id).map(|data| &mut data.kind) {
            Some(NodeKind::Element { name, .. }) => {
                *name = new_name.into();
                true
            }
            _ => false,
        }
    }

    /// Attributes of an element in insertion order.
    pub fn attributes(&self, id: NodeId) -> Option<&[Attribute]> {
        match self.kind(id)? {
            NodeKind::Element { attributes, .. } => Some(attributes),
            _ => None,
        }
    }

    fn attributes_mut(&mut self, id: NodeId) -> Option<&mut Vec<Attribute>> {
        match &mut self.get_mut(id)?.kind {
            NodeKind::Element { attributes, .. } => Some(attributes),
            _ => None,
        }
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attributes(id)?
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn first_attribute(&self, id: NodeId) -> Option<&Attribute> {
        self.attributes(id)?.first()
    }

    /// The attribute following the one called `name`.
    pub fn next_attribute(&self, id: NodeId, name: &str) -> Option<&Attribute> {
        let attributes = self.attributes(id)?;
        let index = attributes.iter().position(|a| a.name == name)?;
        attributes.get(index + 1)
    }

    /// Sets an attribute, overwriting an existing value in place or
    /// appending a new entry. Returns `false` if `id` is not an element.
    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> bool {
        let name = name.into();
        let Some(attributes) = self.attributes_mut(id) else {
            return false;
        };
        match attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value.into(),
            None => attributes.push(Attribute::new(name, value)),
        }
        true
    }

    /// Removes an attribute. Returns `false` if it did not exist.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> bool {
        let Some(attributes) = self.attributes_mut(id) else {
            return false;
        };
        let before = attributes.len();
        attributes.retain(|a| a.name != name);
        attributes.len() != before
    }

    // ---- character data ---------------------------------------------------

    /// Literal content of a text, comment or unknown node.
    pub fn value(&self, id: NodeId) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Text { content, .. }
            | NodeKind::Comment { content }
            | NodeKind::DocType { content } => Some(content),
            NodeKind::ProcessingInstruction { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Replaces the literal content of a text or comment node.
    pub fn set_value(&mut self, id: NodeId, value: impl Into<String>) -> bool {
        match self.get_mut(id).map(|data| &mut data.kind) {
            Some(NodeKind::Text { content, .. } | NodeKind::Comment { content }) => {
                *content = value.into();
                true
            }
            _ => false,
        }
    }

    /// Concatenated text of `id` and all its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut buf = String::new();
        if self.contains(id) {
            for node in id.descendants(&self.arena) {
                if let NodeKind::Text { content, .. } = &self.arena[node].get().kind {
                    buf.push_str(content);
                }
            }
        }
        buf
    }
}

/// Iterator over the children of a node, in document order.
pub struct Children<'a> {
    tree: &'a Tree,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.next_sibling(current);
        Some(current)
    }
}
