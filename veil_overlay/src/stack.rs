// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The stack of open overlays.

use smallvec::SmallVec;

use crate::overlay::OverlayId;

/// Open overlays, most recently opened first.
///
/// Only the overlay at index 0 receives the global Escape key. Any overlay can be removed,
/// not just the topmost one.
///
/// ```
/// use veil_overlay::LayerStack;
/// # use veil_overlay::OverlayId;
/// # fn ids(a: OverlayId, b: OverlayId) {
/// let mut stack = LayerStack::new();
/// stack.push(a);
/// stack.push(b);
/// assert_eq!(stack.topmost(), Some(b));
/// stack.remove(b);
/// assert_eq!(stack.topmost(), Some(a));
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayerStack {
    layers: SmallVec<[OverlayId; 4]>,
}

impl LayerStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `id` the topmost layer. A layer already in the stack is moved to the top.
    pub fn push(&mut self, id: OverlayId) {
        self.remove(id);
        self.layers.insert(0, id);
    }

    /// Remove `id` from anywhere in the stack. Returns `false` if it was not there.
    pub fn remove(&mut self, id: OverlayId) -> bool {
        let Some(pos) = self.position(id) else {
            return false;
        };
        self.layers.remove(pos);
        true
    }

    /// The most recently opened layer.
    pub fn topmost(&self) -> Option<OverlayId> {
        self.layers.first().copied()
    }

    /// Depth of `id`, `0` being the topmost layer.
    pub fn position(&self, id: OverlayId) -> Option<usize> {
        self.layers.iter().position(|&l| l == id)
    }

    /// Returns `true` if `id` is in the stack.
    pub fn contains(&self, id: OverlayId) -> bool {
        self.layers.contains(&id)
    }

    /// Number of open layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` if no layer is open.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Layers from the topmost down.
    pub fn iter(&self) -> impl Iterator<Item = OverlayId> + '_ {
        self.layers.iter().copied()
    }

    /// Layers from the topmost down, as a slice.
    pub fn as_slice(&self) -> &[OverlayId] {
        &self.layers
    }

    pub(crate) fn clear(&mut self) {
        self.layers.clear();
    }
}
