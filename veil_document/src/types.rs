// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the document: node identifiers and element construction data.

use alloc::boxed::Box;
use kurbo::Rect;
use smallvec::SmallVec;

/// Identifier for an element in a [`Document`](crate::Document).
///
/// This is a small, copyable handle that stays stable across mutations but becomes
/// invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// Use [`Document::is_alive`](crate::Document::is_alive) to check whether a `NodeId` still
/// refers to a live element. Stale `NodeId`s never alias a different live element because the
/// generation must match.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

/// Attribute storage: `(name, value)` pairs in insertion order.
///
/// Names are stored ASCII-lowercased.
pub(crate) type Attributes = SmallVec<[(Box<str>, Box<str>); 4]>;

/// Data used to create an element with [`Document::insert`](crate::Document::insert).
///
/// ```
/// use kurbo::Rect;
/// use veil_document::ElementData;
///
/// let data = ElementData::new("button")
///     .with_attribute("class", "close")
///     .with_layout(Rect::new(0.0, 0.0, 80.0, 24.0));
/// assert_eq!(data.tag(), "button");
/// ```
#[derive(Clone, Debug)]
pub struct ElementData {
    pub(crate) tag: Box<str>,
    pub(crate) attributes: Attributes,
    pub(crate) layout: Rect,
}

impl ElementData {
    /// Start describing an element with the given tag name.
    ///
    /// The tag name is ASCII-lowercased.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase().into_boxed_str(),
            attributes: Attributes::new(),
            layout: Rect::ZERO,
        }
    }

    /// Add (or replace) an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        let name = name.to_ascii_lowercase();
        if let Some(slot) = self.attributes.iter_mut().find(|(n, _)| **n == *name) {
            slot.1 = value.into();
        } else {
            self.attributes.push((name.into_boxed_str(), value.into()));
        }
        self
    }

    /// Set the layout box, in offset coordinates (`y0` is the offset top).
    #[must_use]
    pub fn with_layout(mut self, layout: Rect) -> Self {
        self.layout = layout;
        self
    }

    /// The (lowercased) tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }
}
