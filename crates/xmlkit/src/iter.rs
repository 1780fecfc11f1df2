/*
 * iter.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Kind-filtered cursors over sibling and attribute chains.
//!
//! A cursor starts before the first match, moves forward with `advance`,
//! and ends up exhausted; an exhausted cursor compares equal to [`End`].
//!
//! ```rust
//! use xmlkit::{kind, Document, End};
//!
//! let doc = Document::parse("<r><a/>text<b/></r>").unwrap();
//! let mut cursor = doc.root_element().unwrap().cursor::<kind::Element>();
//! let mut names = Vec::new();
//! cursor.advance(&doc).unwrap();
//! while cursor != End {
//!     names.push(cursor.current().unwrap().name(&doc).unwrap().to_string());
//!     cursor.advance(&doc).unwrap();
//! }
//! assert_eq!(names, ["a", "b"]);
//! ```

use crate::handle::{matches_filter, AttributeHandle, ElementHandle, Handle};
use crate::kind::{self, Category};
use crate::{Document, Error, ErrorKind, Result};
use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use xmlkit_tree::{NodeId, Tree};

/// The exhausted-cursor sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct End;

/// Position of a [`ChildCursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    BeforeStart,
    Positioned(NodeId),
    Exhausted,
}

fn invalid_cursor(state: &str) -> Error {
    Error::new(
        ErrorKind::InvalidCursor,
        format!("cursor dereferenced while {}", state),
    )
}

/// Cursor over the children of one node that match category `C` and,
/// optionally, an element name.
pub struct ChildCursor<C> {
    parent: Option<NodeId>,
    name: Option<String>,
    state: State,
    _kind: PhantomData<C>,
}

impl<C> Clone for ChildCursor<C> {
    fn clone(&self) -> Self {
        Self {
            parent: self.parent,
            name: self.name.clone(),
            state: self.state,
            _kind: PhantomData,
        }
    }
}

impl<C: Category> fmt::Debug for ChildCursor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildCursor")
            .field("kind", &C::NAME)
            .field("parent", &self.parent)
            .field("name", &self.name)
            .field("state", &self.state)
            .finish()
    }
}

impl<C: Category> ChildCursor<C> {
    /// A cursor before the first matching child of `parent`.
    pub fn new<P: Category>(parent: Handle<P>) -> Self {
        Self {
            parent: Some(parent.id()),
            name: None,
            state: State::BeforeStart,
            _kind: PhantomData,
        }
    }

    /// A cursor positioned on `start`. Advancing continues with the
    /// following siblings.
    pub fn starting_at(doc: &Document, start: Handle<C>) -> Result<Self> {
        let parent = start.parent_or_none(doc)?;
        Ok(Self {
            parent: parent.map(|p| p.id()),
            name: None,
            state: State::Positioned(start.id()),
            _kind: PhantomData,
        })
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == State::Exhausted
    }

    /// Moves back before the first child.
    pub fn reset(&mut self) {
        self.state = State::BeforeStart;
    }

    /// Moves to the next match, or to the exhausted state when there is
    /// none. Advancing an exhausted cursor does nothing.
    ///
    /// # Errors
    ///
    /// `StaleHandle` if the node the cursor walks from has been removed.
    pub fn advance(&mut self, doc: &Document) -> Result<()> {
        let tree = doc.tree();
        let start = match self.state {
            State::Exhausted => return Ok(()),
            State::BeforeStart => match self.parent {
                Some(parent) if !tree.contains(parent) => return Err(Error::stale(parent)),
                Some(parent) => tree.first_child(parent),
                None => None,
            },
            State::Positioned(id) => {
                if !tree.contains(id) {
                    return Err(Error::stale(id));
                }
                tree.next_sibling(id)
            }
        };
        self.state = match self.find(tree, start) {
            Some(id) => State::Positioned(id),
            None => State::Exhausted,
        };
        Ok(())
    }

    fn find(&self, tree: &Tree, mut current: Option<NodeId>) -> Option<NodeId> {
        while let Some(id) = current {
            if matches_filter::<C>(tree, id, self.name.as_deref()) {
                return Some(id);
            }
            current = tree.next_sibling(id);
        }
        None
    }

    /// The node the cursor is on.
    ///
    /// # Errors
    ///
    /// `InvalidCursor` before the first `advance` and once exhausted.
    pub fn current(&self) -> Result<Handle<C>> {
        match self.state {
            State::Positioned(id) => Ok(Handle::new_unchecked(id)),
            State::BeforeStart => Err(invalid_cursor("before the first item")),
            State::Exhausted => Err(invalid_cursor("exhausted")),
        }
    }

    /// Advances and returns the new position, or `None` once exhausted.
    pub fn next_match(&mut self, doc: &Document) -> Result<Option<Handle<C>>> {
        self.advance(doc)?;
        match self.state {
            State::Positioned(id) => Ok(Some(Handle::new_unchecked(id))),
            _ => Ok(None),
        }
    }
}

impl ChildCursor<kind::Element> {
    /// Restricts the cursor to elements called `name`.
    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }
}

impl<C> PartialEq<End> for ChildCursor<C> {
    fn eq(&self, _: &End) -> bool {
        self.state == State::Exhausted
    }
}

impl<C> PartialEq<ChildCursor<C>> for End {
    fn eq(&self, cursor: &ChildCursor<C>) -> bool {
        cursor == self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttributeState {
    BeforeStart,
    Positioned(String),
    Exhausted,
}

/// Cursor over the attributes of one element, in insertion order.
///
/// The position is kept by attribute name, so setting values between steps
/// is fine; removing the current attribute makes the next `advance` fail.
#[derive(Debug, Clone)]
pub struct AttributeCursor {
    element: ElementHandle,
    state: AttributeState,
}

impl AttributeCursor {
    pub fn new(element: ElementHandle) -> Self {
        Self {
            element,
            state: AttributeState::BeforeStart,
        }
    }

    pub fn starting_at(attribute: &AttributeHandle) -> Self {
        Self {
            element: attribute.element(),
            state: AttributeState::Positioned(attribute.name().to_string()),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == AttributeState::Exhausted
    }

    pub fn reset(&mut self) {
        self.state = AttributeState::BeforeStart;
    }

    pub fn advance(&mut self, doc: &Document) -> Result<()> {
        let next = match &self.state {
            AttributeState::Exhausted => return Ok(()),
            AttributeState::BeforeStart => self.element.first_attribute_or_none(doc)?,
            AttributeState::Positioned(name) => self.element.next_attribute_or_none(doc, name)?,
        };
        self.state = match next {
            Some(attribute) => AttributeState::Positioned(attribute.name().to_string()),
            None => AttributeState::Exhausted,
        };
        Ok(())
    }

    pub fn current(&self) -> Result<AttributeHandle> {
        match &self.state {
            AttributeState::Positioned(name) => Ok(AttributeHandle::new(self.element, name)),
            AttributeState::BeforeStart => Err(invalid_cursor("before the first item")),
            AttributeState::Exhausted => Err(invalid_cursor("exhausted")),
        }
    }

    pub fn next_match(&mut self, doc: &Document) -> Result<Option<AttributeHandle>> {
        self.advance(doc)?;
        match &self.state {
            AttributeState::Positioned(name) => Ok(Some(AttributeHandle::new(self.element, name))),
            _ => Ok(None),
        }
    }
}

impl PartialEq<End> for AttributeCursor {
    fn eq(&self, _: &End) -> bool {
        self.is_exhausted()
    }
}

impl PartialEq<AttributeCursor> for End {
    fn eq(&self, cursor: &AttributeCursor) -> bool {
        cursor.is_exhausted()
    }
}

/// Borrowing iterator over children of category `C`.
///
/// Created by [`Handle::children`] and [`Handle::child_elements`].
#[derive(Debug, Clone)]
pub struct Children<'d, C: Category> {
    doc: &'d Document,
    cursor: ChildCursor<C>,
}

impl<'d, C: Category> Children<'d, C> {
    pub(crate) fn new(doc: &'d Document, cursor: ChildCursor<C>) -> Self {
        Self { doc, cursor }
    }
}

impl<C: Category> Iterator for Children<'_, C> {
    type Item = Handle<C>;

    fn next(&mut self) -> Option<Handle<C>> {
        // The document is borrowed, so the chain cannot go stale mid-walk.
        self.cursor.next_match(self.doc).ok().flatten()
    }
}

impl<C: Category> FusedIterator for Children<'_, C> {}

/// Borrowing iterator over an element's attributes.
#[derive(Debug, Clone)]
pub struct Attributes<'d> {
    doc: &'d Document,
    cursor: AttributeCursor,
}

impl<'d> Attributes<'d> {
    pub(crate) fn new(doc: &'d Document, element: ElementHandle) -> Self {
        Self {
            doc,
            cursor: AttributeCursor::new(element),
        }
    }
}

impl Iterator for Attributes<'_> {
    type Item = AttributeHandle;

    fn next(&mut self) -> Option<AttributeHandle> {
        self.cursor.next_match(self.doc).ok().flatten()
    }
}

impl FusedIterator for Attributes<'_> {}
