// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-overlay state.

use alloc::string::String;
use alloc::vec::Vec;

use veil_document::NodeId;
use veil_focus::{FocusPick, ScanPolicy};

use crate::events::Listeners;
use crate::options::Role;

/// Identifier for an overlay in a [`Layers`](crate::Layers) registry.
///
/// Like [`NodeId`], it pairs a slot index with a generation, so the handle of a destroyed
/// overlay never refers to a later one.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct OverlayId(pub(crate) u32, pub(crate) u32);

impl OverlayId {
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

/// Whether an overlay is presented.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum OverlayState {
    /// Hidden; the initial state.
    #[default]
    Closed,
    /// Presented and in the layer stack.
    Open,
}

bitflags::bitflags! {
    /// Input routes an overlay listens to. All are bound on show and unbound on close.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Bindings: u8 {
        /// Escape (and Enter on the root of a dialog) while topmost.
        const KEYBOARD       = 0b0000_0001;
        /// Clicks on the root itself, i.e. on the backdrop.
        const BACKDROP       = 0b0000_0010;
        /// Clicks inside a close trigger.
        const CLOSE_TRIGGERS = 0b0000_0100;
    }
}

impl Default for Bindings {
    fn default() -> Self {
        Self::empty()
    }
}

/// One overlay: its root, its configuration and its open-cycle state.
#[derive(Debug)]
pub struct Overlay {
    pub(crate) root: NodeId,
    pub(crate) role: Option<Role>,
    pub(crate) modal: bool,
    pub(crate) close_on_cancel: bool,
    pub(crate) created: bool,
    pub(crate) configured_opener: Option<NodeId>,
    pub(crate) opener: Option<NodeId>,
    pub(crate) close_triggers: Vec<NodeId>,
    pub(crate) scan_policy: ScanPolicy,
    pub(crate) state: OverlayState,
    pub(crate) return_value: String,
    pub(crate) focus_pick: Option<FocusPick>,
    pub(crate) focus_target: Option<NodeId>,
    pub(crate) root_tab_index_assigned: bool,
    pub(crate) bindings: Bindings,
    pub(crate) listeners: Listeners,
}

impl Overlay {
    /// The root element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The resolved role.
    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// Returns `true` if opening makes the rest of the document inert.
    pub fn is_modal(&self) -> bool {
        self.modal
    }

    /// Returns `true` if Escape and backdrop clicks may close the overlay.
    pub fn closes_on_cancel(&self) -> bool {
        self.close_on_cancel
    }

    /// Returns `true` if the root was created by the registry rather than adopted.
    pub fn owns_root(&self) -> bool {
        self.created
    }

    /// Open or closed.
    pub fn state(&self) -> OverlayState {
        self.state
    }

    /// Returns `true` while open.
    pub fn is_open(&self) -> bool {
        self.state == OverlayState::Open
    }

    /// The result of the last close; reset to `""` by every show.
    pub fn return_value(&self) -> &str {
        &self.return_value
    }

    /// The opener given at construction, if any.
    pub fn configured_opener(&self) -> Option<NodeId> {
        self.configured_opener
    }

    /// The element focus returns to, as resolved by the latest show.
    pub fn opener(&self) -> Option<NodeId> {
        self.opener
    }

    /// Descendants that close the overlay when clicked.
    pub fn close_triggers(&self) -> &[NodeId] {
        &self.close_triggers
    }

    /// The initial focus chosen in the current open cycle.
    pub fn focus_pick(&self) -> Option<FocusPick> {
        self.focus_pick
    }

    /// The element that receives (or received) initial focus in the current open cycle.
    ///
    /// This is the root itself when the scan found nothing.
    pub fn focus_target(&self) -> Option<NodeId> {
        self.focus_target
    }

    /// Input routes currently bound.
    pub fn bindings(&self) -> Bindings {
        self.bindings
    }

    /// The scan rules used for initial focus.
    pub fn scan_policy(&self) -> ScanPolicy {
        self.scan_policy
    }

    /// Number of registered listeners, all events included.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
