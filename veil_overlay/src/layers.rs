// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The overlay registry and its transitions.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use smallvec::SmallVec;
use veil_document::{Document, ElementData, NodeId, Selector};
use veil_focus::{FocusPick, find_first_focusable, focusable_ancestor};
use veil_inert::{ARIA_HIDDEN, Inertness, TAB_INDEX};

use crate::error::ConfigError;
use crate::events::{CloseReason, EventCx, EventKind, Key, ListenerId, Listeners, Request};
use crate::frame::FrameQueue;
use crate::options::{
    DESCRIPTION_ATTRIBUTE, OverlayOptions, OverlaySource, Role, TITLE_ATTRIBUTE,
};
use crate::overlay::{Bindings, Overlay, OverlayId, OverlayState};
use crate::stack::LayerStack;

const TITLE_ID_PREFIX: &str = "layerTitle";
const DESCRIPTION_ID_PREFIX: &str = "layerDescription";

#[derive(Debug)]
struct Slot {
    generation: u32,
    overlay: Option<Overlay>,
}

/// Registry of the overlays of one document.
///
/// `Layers` owns every overlay, the [`LayerStack`] of open ones, the document-wide
/// [`Inertness`] bookkeeping and the queue of deferred focus requests. It is the single
/// receiver of global input: feed it key presses with [`Layers::handle_key`] and clicks with
/// [`Layers::handle_click`], and call [`Layers::run_frame`] once layout is up to date.
///
/// ```
/// use kurbo::Rect;
/// use veil_document::{Document, ElementData};
/// use veil_overlay::{CreateConfig, Key, Layers, OverlayOptions, OverlaySource, Role};
///
/// let mut doc = Document::new();
/// let body = doc.body();
/// let opener = doc.insert(
///     Some(body),
///     ElementData::new("button").with_layout(Rect::new(0.0, 0.0, 80.0, 24.0)),
/// );
/// doc.focus(opener);
///
/// // Detached content for the dialog.
/// let panel = doc.insert(None, ElementData::new("section"));
/// doc.insert(Some(panel), ElementData::new("h2").with_attribute("data-label", ""));
/// let ok = doc.insert(
///     Some(panel),
///     ElementData::new("button").with_layout(Rect::new(0.0, 40.0, 80.0, 64.0)),
/// );
///
/// let mut layers = Layers::new();
/// let dialog = layers
///     .create(
///         &mut doc,
///         OverlaySource::Create(CreateConfig::new(panel)),
///         OverlayOptions::default().with_role(Role::Dialog),
///     )
///     .unwrap();
///
/// assert!(layers.show(&mut doc, dialog));
/// layers.run_frame(&mut doc);
/// assert_eq!(doc.focused(), Some(ok));
/// assert_eq!(doc.attribute(opener, "tabindex"), Some("-1"));
///
/// assert!(layers.handle_key(&mut doc, Key::Escape));
/// assert!(!layers.is_open(dialog));
/// assert_eq!(doc.focused(), Some(opener));
/// assert_eq!(doc.attribute(opener, "tabindex"), None);
/// ```
#[derive(Debug, Default)]
pub struct Layers {
    slots: Vec<Slot>,
    free: Vec<u32>,
    stack: LayerStack,
    inert: Inertness,
    frames: FrameQueue,
    pending: Vec<Request>,
    draining: bool,
    created: u32,
}

impl Layers {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn get(&self, id: OverlayId) -> Option<&Overlay> {
        let slot = self.slots.get(id.idx())?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.overlay.as_ref()
    }

    fn get_mut(&mut self, id: OverlayId) -> Option<&mut Overlay> {
        let slot = self.slots.get_mut(id.idx())?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.overlay.as_mut()
    }

    fn alloc(&mut self, overlay: Overlay) -> OverlayId {
        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.overlay = Some(overlay);
            OverlayId::new(idx, slot.generation)
        } else {
            let idx = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
            self.slots.push(Slot {
                generation: 1,
                overlay: Some(overlay),
            });
            OverlayId::new(idx, 1)
        }
    }

    fn ids(&self) -> impl Iterator<Item = OverlayId> + '_ {
        self.slots.iter().enumerate().filter_map(|(idx, slot)| {
            slot.overlay.as_ref()?;
            let idx = u32::try_from(idx).ok()?;
            Some(OverlayId::new(idx, slot.generation))
        })
    }

    /// The overlay whose root is `root`.
    pub fn owner_of(&self, root: NodeId) -> Option<OverlayId> {
        self.ids()
            .find(|&id| self.get(id).is_some_and(|o| o.root == root))
    }

    /// Read access to an overlay.
    pub fn overlay(&self, id: OverlayId) -> Option<&Overlay> {
        self.get(id)
    }

    /// Returns `true` if `id` refers to a live overlay.
    pub fn contains(&self, id: OverlayId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live overlays, open or not.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.overlay.is_some()).count()
    }

    /// Returns `true` if no overlay is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `id` is open.
    pub fn is_open(&self, id: OverlayId) -> bool {
        self.get(id).is_some_and(Overlay::is_open)
    }

    /// The most recently opened overlay that is still open.
    pub fn topmost(&self) -> Option<OverlayId> {
        self.stack.topmost()
    }

    /// The open overlays, topmost first.
    pub fn stack(&self) -> &LayerStack {
        &self.stack
    }

    /// The document-wide inertness bookkeeping.
    pub fn inertness(&self) -> &Inertness {
        &self.inert
    }

    /// The focus target `id` will receive at the next [`Layers::run_frame`].
    pub fn pending_focus(&self, id: OverlayId) -> Option<NodeId> {
        self.frames.pending(id)
    }

    /// Build and register an overlay.
    ///
    /// Everything is validated before the document is touched; on error nothing changes.
    /// On success the root is a child of the body, hidden (`aria-hidden="true"`), carries
    /// `aria-modal`, `role` and `aria-label` as configured, and, when it has a role but no
    /// label, points `aria-labelledby` (and `aria-describedby`) at the title (and
    /// description) element, generating ids as needed.
    pub fn create(
        &mut self,
        doc: &mut Document,
        source: OverlaySource,
        options: OverlayOptions,
    ) -> Result<OverlayId, ConfigError> {
        let close_selector = options
            .close_selector
            .as_deref()
            .map(Selector::parse)
            .transpose()?;
        let title_selector = match options.title_selector.as_deref() {
            Some(s) => Selector::parse(s)?,
            None => Selector::attribute(TITLE_ATTRIBUTE),
        };
        let description_selector = Selector::attribute(DESCRIPTION_ATTRIBUTE);
        if let Some(opener) = options.opener
            && !doc.is_alive(opener)
        {
            return Err(ConfigError::StaleOpener(opener));
        }

        let view: &Document = doc;
        let body = view.body();
        // Elements the overlay will contain, in document order, before anything moves.
        let (adopted, candidates) = match &source {
            OverlaySource::Adopt(root) => {
                let root = *root;
                if !view.is_alive(root) || root == body {
                    return Err(ConfigError::StaleRoot(root));
                }
                if let Some(owner) = self.owner_of(root) {
                    return Err(ConfigError::AlreadyManaged(owner));
                }
                (Some(root), view.descendants(root).collect::<Vec<_>>())
            }
            OverlaySource::Create(config) => {
                let content = config.content.as_slice();
                if content.is_empty() {
                    return Err(ConfigError::MissingContent);
                }
                let mut candidates = Vec::new();
                for &node in content {
                    if !view.is_alive(node) || node == body || self.owner_of(node).is_some() {
                        return Err(ConfigError::StaleContent(node));
                    }
                    candidates.push(node);
                    candidates.extend(view.descendants(node));
                }
                (None, candidates)
            }
        };
        let find = |selector: &Selector| {
            candidates
                .iter()
                .copied()
                .find(|&n| selector.matches(view, n))
        };
        let refers_inside = |attribute: &str| {
            adopted
                .and_then(|root| view.attribute(root, attribute))
                .is_some_and(|refs| {
                    refs.split_ascii_whitespace().any(|r| {
                        candidates
                            .iter()
                            .any(|&n| view.attribute(n, "id") == Some(r))
                    })
                })
        };

        let role = options.role.or_else(|| {
            adopted
                .and_then(|root| view.attribute(root, "role"))
                .and_then(Role::from_attribute)
        });
        let label = options.label.as_deref().filter(|l| !l.trim().is_empty());

        let mut title = None;
        let mut description = None;
        if let Some(role) = role {
            let has_label = label.is_some()
                || adopted
                    .and_then(|root| view.attribute(root, "aria-label"))
                    .is_some_and(|l| !l.trim().is_empty());
            if !has_label && !refers_inside("aria-labelledby") {
                title = Some(find(&title_selector).ok_or(ConfigError::MissingLabel)?);
            }
            if !refers_inside("aria-describedby") {
                description = find(&description_selector);
                if role == Role::AlertDialog && description.is_none() {
                    return Err(ConfigError::MissingDescription);
                }
            }
        }

        let close_triggers: Vec<NodeId> = match &close_selector {
            Some(selector) => candidates
                .iter()
                .copied()
                .filter(|&n| selector.matches(view, n))
                .collect(),
            None => Vec::new(),
        };
        if options.require_close_trigger && close_triggers.is_empty() {
            return Err(ConfigError::MissingCloseTrigger);
        }

        // Validation passed: from here on the document is mutated.
        self.created = self.created.wrapping_add(1);
        let number = self.created;
        let root = match source {
            OverlaySource::Adopt(root) => root,
            OverlaySource::Create(config) => {
                let mut data = ElementData::new(config.root_tag.as_deref().unwrap_or("div"));
                if let Some(class) = config.root_class.as_deref() {
                    data = data.with_attribute("class", class);
                }
                let root = doc.insert(None, data);
                for &node in config.content.as_slice() {
                    doc.append_child(root, node);
                }
                root
            }
        };

        doc.set_attribute(root, ARIA_HIDDEN, "true");
        if options.modal {
            doc.set_attribute(root, "aria-modal", "true");
        }
        if let Some(role) = role {
            doc.set_attribute(root, "role", role.as_str());
        }
        if let Some(label) = label {
            doc.set_attribute(root, "aria-label", label);
        }
        if let Some(title) = title {
            let id = ensure_id(doc, title, TITLE_ID_PREFIX, number);
            doc.set_attribute(root, "aria-labelledby", &id);
        }
        if let Some(description) = description {
            let id = ensure_id(doc, description, DESCRIPTION_ID_PREFIX, number);
            doc.set_attribute(root, "aria-describedby", &id);
        }
        if adopted.is_none() && role.is_none() {
            // Last-resort focus target for overlays without a role.
            doc.set_attribute(root, TAB_INDEX, "-1");
        }
        if doc.parent(root) != Some(body) {
            doc.append_child(body, root);
        }

        let id = self.alloc(Overlay {
            root,
            role,
            modal: options.modal,
            close_on_cancel: options.close_on_cancel,
            created: adopted.is_none(),
            configured_opener: options.opener,
            opener: None,
            close_triggers,
            scan_policy: options.scan_policy,
            state: OverlayState::Closed,
            return_value: String::new(),
            focus_pick: None,
            focus_target: None,
            root_tab_index_assigned: false,
            bindings: Bindings::empty(),
            listeners: Listeners::default(),
        });

        #[cfg(feature = "tracing")]
        tracing::debug!(overlay = ?id, root = ?root, role = ?role, "created overlay");

        Ok(id)
    }

    /// Register a listener. Returns `None` when `id` is stale.
    pub fn on(
        &mut self,
        id: OverlayId,
        kind: EventKind,
        listener: impl FnMut(&mut EventCx<'_>) + 'static,
    ) -> Option<ListenerId> {
        let overlay = self.get_mut(id)?;
        Some(overlay.listeners.add(kind, Box::new(listener)))
    }

    /// Register a listener by event name (`"show"`, `"close"`/`"hide"`, `"cancel"`).
    ///
    /// Unknown names are ignored and yield `None`.
    pub fn on_named(
        &mut self,
        id: OverlayId,
        name: &str,
        listener: impl FnMut(&mut EventCx<'_>) + 'static,
    ) -> Option<ListenerId> {
        let kind = EventKind::from_name(name)?;
        self.on(id, kind, listener)
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn off(&mut self, id: OverlayId, listener: ListenerId) -> bool {
        self.get_mut(id)
            .is_some_and(|overlay| overlay.listeners.remove(listener))
    }

    /// Open an overlay.
    ///
    /// Returns `false` when `id` is stale, already open, or its root was removed from the
    /// document. Initial focus is applied by the next [`Layers::run_frame`].
    pub fn show(&mut self, doc: &mut Document, id: OverlayId) -> bool {
        let shown = self.show_now(doc, id);
        self.drain_requests(doc);
        shown
    }

    /// Close an overlay, setting its return value when `return_value` is given.
    ///
    /// A programmatic close is never vetoed, not even for an `alertdialog`.
    pub fn close(&mut self, doc: &mut Document, id: OverlayId, return_value: Option<&str>) -> bool {
        let closed = self.close_now(doc, id, CloseReason::User, return_value.map(String::from));
        self.drain_requests(doc);
        closed
    }

    /// Close an overlay without touching its return value.
    pub fn hide(&mut self, doc: &mut Document, id: OverlayId) -> bool {
        self.close(doc, id, None)
    }

    /// Ask an overlay to close as Escape or a backdrop click would.
    ///
    /// Nothing happens for an `alertdialog` or when `close_on_cancel` is off. Otherwise the
    /// cancel listeners run and, unless one of them prevents the default, the overlay closes
    /// with [`CloseReason::Cancel`].
    pub fn cancel(&mut self, doc: &mut Document, id: OverlayId) -> bool {
        let closed = self.cancel_now(doc, id);
        self.drain_requests(doc);
        closed
    }

    /// Route a key press. Returns `true` if it closed an overlay.
    ///
    /// Escape cancels the topmost overlay only. Enter closes the topmost `dialog` with
    /// [`CloseReason::Submit`] when focus is on its root.
    pub fn handle_key(&mut self, doc: &mut Document, key: Key) -> bool {
        let Some(top) = self.stack.topmost() else {
            return false;
        };
        let Some(overlay) = self.get(top) else {
            return false;
        };
        if !overlay.bindings.contains(Bindings::KEYBOARD) {
            return false;
        }
        match key {
            Key::Escape => self.cancel(doc, top),
            Key::Enter => {
                if overlay.role == Some(Role::Dialog) && doc.focused() == Some(overlay.root) {
                    let closed = self.close_now(doc, top, CloseReason::Submit, None);
                    self.drain_requests(doc);
                    closed
                } else {
                    false
                }
            }
            Key::Other => false,
        }
    }

    /// Route a click on `target`. Returns `true` if it closed an overlay.
    ///
    /// A click inside a close trigger closes its overlay, taking the trigger's `value`
    /// attribute as return value. A click on a root itself (the backdrop, not a descendant)
    /// cancels that overlay.
    pub fn handle_click(&mut self, doc: &mut Document, target: NodeId) -> bool {
        let open: SmallVec<[OverlayId; 4]> = self.stack.iter().collect();
        for id in open {
            let Some(overlay) = self.get(id) else {
                continue;
            };
            if overlay.bindings.contains(Bindings::CLOSE_TRIGGERS)
                && let Some(trigger) = overlay
                    .close_triggers
                    .iter()
                    .copied()
                    .find(|&t| doc.contains(t, target))
            {
                let closed = self.close_now(doc, id, CloseReason::Trigger(trigger), None);
                self.drain_requests(doc);
                return closed;
            }
            if overlay.bindings.contains(Bindings::BACKDROP) && overlay.root == target {
                return self.cancel(doc, id);
            }
        }
        false
    }

    /// Apply deferred focus requests. Call after layout.
    ///
    /// Requests of overlays closed in the meantime were already dropped. Returns the number
    /// of elements that accepted focus.
    pub fn run_frame(&mut self, doc: &mut Document) -> usize {
        let mut focused = 0;
        for (id, target) in self.frames.take() {
            if self.is_open(id) && doc.focus(target) {
                focused += 1;
            }
        }
        focused
    }

    /// Close (if needed) and unregister an overlay. A created root is removed from the
    /// document; an adopted one stays in place.
    pub fn destroy(&mut self, doc: &mut Document, id: OverlayId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.close_now(doc, id, CloseReason::User, None);
        let Some(overlay) = self.slots[id.idx()].overlay.take() else {
            return false;
        };
        self.free.push(id.0);
        if overlay.created {
            doc.remove(overlay.root);
        }
        self.drain_requests(doc);
        true
    }

    /// Close every open overlay, topmost first, and forget all overlays and bookkeeping.
    ///
    /// The registry is empty and reusable afterwards. Roots stay in the document.
    pub fn dispose(&mut self, doc: &mut Document) {
        let open: SmallVec<[OverlayId; 4]> = self.stack.iter().collect();
        for id in open {
            self.close_now(doc, id, CloseReason::User, None);
        }
        let body = doc.body();
        self.inert.enable(doc, body);
        // Slots are kept so their generations keep ids from before this call stale.
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if slot.overlay.take().is_some()
                && let Ok(idx) = u32::try_from(idx)
            {
                self.free.push(idx);
            }
        }
        self.stack.clear();
        self.frames.clear();
        self.pending.clear();

        #[cfg(feature = "tracing")]
        tracing::debug!("disposed layers");
    }

    fn show_now(&mut self, doc: &mut Document, id: OverlayId) -> bool {
        let Some(overlay) = self.get(id) else {
            return false;
        };
        if overlay.is_open() || !doc.is_alive(overlay.root) {
            return false;
        }
        let root = overlay.root;
        let configured_opener = overlay.configured_opener;

        // Joins the stack first, so overlays opened from a show listener end up above it.
        self.stack.push(id);
        let opener = resolve_opener(doc, configured_opener);
        if let Some(overlay) = self.get_mut(id) {
            overlay.state = OverlayState::Open;
            overlay.bindings = Bindings::all();
            overlay.opener = Some(opener);
            overlay.return_value.clear();
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(overlay = ?id, opener = ?opener, depth = self.stack.len(), "show");

        self.fire(doc, id, EventKind::Show, None);

        if doc.attribute(root, ARIA_HIDDEN) != Some("false") {
            doc.set_attribute(root, ARIA_HIDDEN, "false");
        }

        let Some(overlay) = self.get(id) else {
            return true;
        };
        let modal = overlay.modal;
        let pick = find_first_focusable(doc, root, &overlay.close_triggers, overlay.scan_policy);
        let target = pick.map_or(root, FocusPick::node);
        // A root without tab index cannot take the fallback focus.
        let root_tab_index_assigned = pick.is_none() && !doc.has_attribute(root, TAB_INDEX);
        if root_tab_index_assigned {
            doc.set_attribute(root, TAB_INDEX, "-1");
        }
        if let Some(overlay) = self.get_mut(id) {
            overlay.focus_pick = pick;
            overlay.focus_target = Some(target);
            overlay.root_tab_index_assigned = root_tab_index_assigned;
        }
        self.frames.schedule(id, target);

        let body = doc.body();
        if self.inert.is_disabled(body) {
            // Content inerted by the outer pass becomes interactive again.
            self.inert.enable_subtree(doc, root);
        } else if modal {
            self.inert.disable(doc, body, Some(root));
        }
        true
    }

    fn close_now(
        &mut self,
        doc: &mut Document,
        id: OverlayId,
        reason: CloseReason,
        return_value: Option<String>,
    ) -> bool {
        let Some(overlay) = self.get_mut(id) else {
            return false;
        };
        if !overlay.is_open() {
            return false;
        }
        if overlay.role == Some(Role::AlertDialog) && reason == CloseReason::Cancel {
            return false;
        }
        overlay.bindings = Bindings::empty();
        overlay.state = OverlayState::Closed;
        let root = overlay.root;
        let opener = overlay.opener;
        let pick = overlay.focus_pick.take();
        let root_tab_index_assigned = core::mem::take(&mut overlay.root_tab_index_assigned);
        overlay.focus_target = None;
        if let Some(value) = return_value {
            overlay.return_value = value;
        } else if let CloseReason::Trigger(trigger) = reason
            && let Some(value) = doc.attribute(trigger, "value")
        {
            overlay.return_value = String::from(value);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(overlay = ?id, reason = ?reason, "close");

        self.fire(doc, id, EventKind::Close, Some(reason));

        doc.set_attribute(root, ARIA_HIDDEN, "true");

        let body = doc.body();
        if self.inert.is_disabled(body) {
            if self.other_modal_open(id) {
                // The root stays hidden when the outer pass is undone later.
                self.inert.forget_hidden(root);
            } else {
                self.inert.enable(doc, body);
            }
        }
        self.stack.remove(id);
        self.frames.cancel(id);

        if let Some(FocusPick::Textual {
            node,
            assigned_tab_index: true,
        }) = pick
        {
            doc.remove_attribute(node, TAB_INDEX);
        }
        if root_tab_index_assigned {
            doc.remove_attribute(root, TAB_INDEX);
        }
        let restored = opener.is_some_and(|o| doc.focus(o));
        if !restored {
            doc.focus(body);
        }
        true
    }

    fn cancel_now(&mut self, doc: &mut Document, id: OverlayId) -> bool {
        let Some(overlay) = self.get(id) else {
            return false;
        };
        if !overlay.is_open()
            || !overlay.close_on_cancel
            || overlay.role == Some(Role::AlertDialog)
        {
            return false;
        }
        if self.fire(doc, id, EventKind::Cancel, Some(CloseReason::Cancel)) {
            #[cfg(feature = "tracing")]
            tracing::trace!(overlay = ?id, "cancel prevented");
            return false;
        }
        self.close_now(doc, id, CloseReason::Cancel, None)
    }

    /// Returns `true` if a modal overlay other than `except` is open.
    fn other_modal_open(&self, except: OverlayId) -> bool {
        self.stack
            .iter()
            .filter(|&o| o != except)
            .any(|o| self.get(o).is_some_and(|overlay| overlay.modal))
    }

    /// Run the listeners of `kind`. Returns `true` if the default action was prevented.
    fn fire(
        &mut self,
        doc: &mut Document,
        id: OverlayId,
        kind: EventKind,
        reason: Option<CloseReason>,
    ) -> bool {
        let Some(overlay) = self.get_mut(id) else {
            return false;
        };
        let root = overlay.root;
        let mut listeners = core::mem::take(&mut overlay.listeners);
        let return_value = core::mem::take(&mut overlay.return_value);

        #[cfg(feature = "tracing")]
        tracing::trace!(overlay = ?id, event = kind.name(), listeners = listeners.len(), "dispatch");

        let mut cx = EventCx::new(id, root, kind, reason, &return_value, doc, &mut self.pending);
        let prevented = listeners.dispatch(&mut cx);
        if let Some(overlay) = self.get_mut(id) {
            overlay.listeners = listeners;
            overlay.return_value = return_value;
        }
        prevented
    }

    /// Run the transitions queued by listeners, including those queued while draining.
    fn drain_requests(&mut self, doc: &mut Document) {
        if self.draining {
            return;
        }
        self.draining = true;
        while !self.pending.is_empty() {
            let batch = core::mem::take(&mut self.pending);
            for request in batch {
                match request {
                    Request::Show(id) => {
                        self.show_now(doc, id);
                    }
                    Request::Close(id, value) => {
                        self.close_now(doc, id, CloseReason::User, value);
                    }
                }
            }
        }
        self.draining = false;
    }
}

/// The element focus returns to: the configured opener, else the focused element, else the
/// body. Graphic primitives and elements that cannot take focus defer to the nearest
/// focusable ancestor.
fn resolve_opener(doc: &Document, configured: Option<NodeId>) -> NodeId {
    let body = doc.body();
    let candidate = configured
        .filter(|&n| doc.is_alive(n))
        .or_else(|| doc.focused())
        .unwrap_or(body);
    if doc.is_graphic(candidate) || !doc.can_focus(candidate) {
        return doc
            .parent(candidate)
            .and_then(|parent| focusable_ancestor(doc, parent))
            .unwrap_or(body);
    }
    candidate
}

/// The `id` of `node`, assigning `{prefix}{number}` when it has none.
fn ensure_id(doc: &mut Document, node: NodeId, prefix: &str, number: u32) -> String {
    if let Some(existing) = doc.attribute(node, "id").filter(|v| !v.is_empty()) {
        return String::from(existing);
    }
    let id = alloc::format!("{prefix}{number}");
    doc.set_attribute(node, "id", &id);
    id
}
