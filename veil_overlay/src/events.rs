// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lifecycle notifications and input.
//!
//! Listeners run in registration order. A listener may stop the remaining listeners with
//! [`EventCx::stop_immediate_propagation`], and may veto a cancellation with
//! [`EventCx::prevent_default`].
//!
//! Listeners cannot reach the [`Layers`](crate::Layers) registry while it is in the middle of
//! a transition. Instead they queue follow-up transitions with [`EventCx::request_show`] and
//! [`EventCx::request_close`]; those run, in order, as soon as the current transition has
//! completed.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use veil_document::{Document, NodeId};

use crate::overlay::OverlayId;

/// A lifecycle notification.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The overlay is opening. Fired after it joined the stack, before focus moves.
    Show,
    /// The overlay is closing. Fired after its inputs were unbound.
    Close,
    /// Escape or a backdrop click asks the overlay to close. Cancelable.
    Cancel,
}

impl EventKind {
    /// Parse an event name. `"hide"` is an alias of `"close"`; unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "show" => Some(Self::Show),
            "close" | "hide" => Some(Self::Close),
            "cancel" => Some(Self::Cancel),
            _ => None,
        }
    }

    /// The canonical event name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Show => "show",
            Self::Close => "close",
            Self::Cancel => "cancel",
        }
    }
}

/// Why an overlay closed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CloseReason {
    /// A programmatic close.
    User,
    /// Escape or a backdrop click.
    Cancel,
    /// A click inside this close trigger.
    Trigger(NodeId),
    /// Enter pressed while the dialog root itself had focus.
    Submit,
}

/// Keys the layer stack reacts to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Cancels the topmost overlay.
    Escape,
    /// Submits the topmost dialog when its root has focus.
    Enter,
    /// Any other key; ignored.
    Other,
}

/// Handle of a registered listener, used to remove it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

/// A transition queued by a listener.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Request {
    Show(OverlayId),
    Close(OverlayId, Option<String>),
}

/// Context handed to listeners.
pub struct EventCx<'a> {
    overlay: OverlayId,
    root: NodeId,
    kind: EventKind,
    reason: Option<CloseReason>,
    return_value: &'a str,
    doc: &'a mut Document,
    requests: &'a mut Vec<Request>,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl fmt::Debug for EventCx<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventCx")
            .field("overlay", &self.overlay)
            .field("root", &self.root)
            .field("kind", &self.kind)
            .field("reason", &self.reason)
            .field("return_value", &self.return_value)
            .field("requests", &self.requests.len())
            .field("default_prevented", &self.default_prevented)
            .field("propagation_stopped", &self.propagation_stopped)
            .finish_non_exhaustive()
    }
}

impl<'a> EventCx<'a> {
    pub(crate) fn new(
        overlay: OverlayId,
        root: NodeId,
        kind: EventKind,
        reason: Option<CloseReason>,
        return_value: &'a str,
        doc: &'a mut Document,
        requests: &'a mut Vec<Request>,
    ) -> Self {
        Self {
            overlay,
            root,
            kind,
            reason,
            return_value,
            doc,
            requests,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// The overlay the event is about.
    pub fn overlay(&self) -> OverlayId {
        self.overlay
    }

    /// Root element of the overlay.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Which notification this is.
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// The close reason, for [`EventKind::Close`].
    pub fn reason(&self) -> Option<CloseReason> {
        self.reason
    }

    /// The return value of the overlay at the time of the event.
    pub fn return_value(&self) -> &str {
        self.return_value
    }

    /// The document.
    pub fn doc(&self) -> &Document {
        self.doc
    }

    /// The document, mutably. Content added by a show listener is seen by the focus scan.
    pub fn doc_mut(&mut self) -> &mut Document {
        self.doc
    }

    /// Veto the default action. Only [`EventKind::Cancel`] has one: the close.
    pub fn prevent_default(&mut self) {
        if self.kind == EventKind::Cancel {
            self.default_prevented = true;
        }
    }

    /// Returns `true` if a listener vetoed the default action.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Skip the listeners registered after this one.
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Open `overlay` once the current transition completes.
    pub fn request_show(&mut self, overlay: OverlayId) {
        self.requests.push(Request::Show(overlay));
    }

    /// Close `overlay` once the current transition completes, optionally setting its return
    /// value.
    pub fn request_close(&mut self, overlay: OverlayId, return_value: Option<&str>) {
        self.requests
            .push(Request::Close(overlay, return_value.map(String::from)));
    }
}

pub(crate) type Callback = Box<dyn FnMut(&mut EventCx<'_>)>;

struct Entry {
    id: ListenerId,
    kind: EventKind,
    callback: Callback,
}

/// Listeners of one overlay, in registration order.
#[derive(Default)]
pub(crate) struct Listeners {
    next: u32,
    entries: Vec<Entry>,
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("next", &self.next)
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl Listeners {
    pub(crate) fn add(&mut self, kind: EventKind, callback: Callback) -> ListenerId {
        let id = ListenerId(self.next);
        self.next = self.next.wrapping_add(1);
        self.entries.push(Entry { id, kind, callback });
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Call every listener of `cx.kind()` in order, honoring immediate-propagation stops.
    ///
    /// Returns `true` if the default action was prevented.
    pub(crate) fn dispatch(&mut self, cx: &mut EventCx<'_>) -> bool {
        let kind = cx.kind;
        for entry in self.entries.iter_mut().filter(|e| e.kind == kind) {
            (entry.callback)(cx);
            if cx.propagation_stopped {
                break;
            }
        }
        cx.default_prevented
    }
}
