// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The element arena: structure, attributes, layout and focus.

use alloc::boxed::Box;
use alloc::vec::Vec;

use kurbo::{Rect, Size};

use crate::selector::Selector;
use crate::types::{Attributes, ElementData, NodeId};

/// Viewport used by [`Document::new`].
pub const DEFAULT_VIEWPORT: Size = Size::new(1280.0, 720.0);

/// Tags of the SVG family. Hosts commonly cannot focus these even when they hold focus
/// conceptually (for example an icon inside a button).
const GRAPHIC_TAGS: &[&str] = &[
    "svg", "g", "path", "use", "circle", "ellipse", "line", "polyline", "polygon", "rect", "text",
    "tspan", "image", "defs", "symbol",
];

#[derive(Clone, Debug)]
struct Element {
    tag: Box<str>,
    attributes: Attributes,
    layout: Rect,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Element {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| &**v)
    }

    fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Host focus rule, independent of ancestors.
    fn is_focusable(&self) -> bool {
        if self.has_attribute("tabindex") || self.has_attribute("contenteditable") {
            return true;
        }
        match &*self.tag {
            "a" | "area" => self.has_attribute("href"),
            "button" | "input" | "select" | "textarea" => !self.has_attribute("disabled"),
            "iframe" => true,
            _ => false,
        }
    }
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    element: Option<Element>,
}

/// An in-memory document: a tree of elements rooted at a `body` element.
///
/// The document plays the part of the host page. It owns structure, attributes, layout boxes
/// and the focused element; it performs no layout of its own. Hosts (or tests) describe
/// geometry with [`Document::set_layout`] in offset coordinates: `y0` is the offset top and
/// `height()` the offset height.
#[derive(Clone, Debug)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<u32>,
    body: NodeId,
    focused: Option<NodeId>,
    viewport: Size,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document holding only an empty `body`, with [`DEFAULT_VIEWPORT`].
    pub fn new() -> Self {
        let body = NodeId::new(0, 1);
        Self {
            slots: alloc::vec![Slot {
                generation: 1,
                element: Some(Element {
                    tag: "body".into(),
                    attributes: Attributes::new(),
                    layout: Rect::from_origin_size((0.0, 0.0), DEFAULT_VIEWPORT),
                    parent: None,
                    children: Vec::new(),
                }),
            }],
            free: Vec::new(),
            body,
            focused: None,
            viewport: DEFAULT_VIEWPORT,
        }
    }

    /// The root `body` element.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Returns `true` if `id` refers to a live element.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.slots
            .get(id.idx())
            .is_some_and(|s| s.generation == id.generation() && s.element.is_some())
    }

    fn get(&self, id: NodeId) -> Option<&Element> {
        let slot = self.slots.get(id.idx())?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.element.as_ref()
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        let slot = self.slots.get_mut(id.idx())?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.element.as_mut()
    }

    /// Create an element and append it to `parent`.
    ///
    /// When `parent` is `None` or stale, the element is created detached; attach it later with
    /// [`Document::append_child`].
    pub fn insert(&mut self, parent: Option<NodeId>, data: ElementData) -> NodeId {
        let element = Element {
            tag: data.tag,
            attributes: data.attributes,
            layout: data.layout,
            parent: None,
            children: Vec::new(),
        };
        let id = if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.element = Some(element);
            NodeId::new(idx, slot.generation)
        } else {
            let idx = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
            self.slots.push(Slot {
                generation: 1,
                element: Some(element),
            });
            NodeId::new(idx, 1)
        };
        if let Some(parent) = parent {
            self.append_child(parent, id);
        }
        id
    }

    /// Append `child` as the last child of `parent`, detaching it from its current parent.
    ///
    /// Returns `false` (and changes nothing) when either handle is stale, when `child` is the
    /// body, or when the move would create a cycle.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.is_alive(parent)
            || !self.is_alive(child)
            || child == self.body
            || self.contains(child, parent)
        {
            return false;
        }
        self.detach(child);
        if let Some(el) = self.get_mut(child) {
            el.parent = Some(parent);
        }
        if let Some(el) = self.get_mut(parent) {
            el.children.push(child);
        }
        true
    }

    fn detach(&mut self, child: NodeId) {
        let Some(old_parent) = self.get(child).and_then(|el| el.parent) else {
            return;
        };
        if let Some(el) = self.get_mut(old_parent) {
            el.children.retain(|&c| c != child);
        }
        if let Some(el) = self.get_mut(child) {
            el.parent = None;
        }
    }

    /// Remove an element and its whole subtree, freeing their slots.
    ///
    /// Focus is cleared when the focused element was inside the removed subtree.
    /// The body cannot be removed. Returns `false` for stale handles and the body.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if !self.is_alive(id) || id == self.body {
            return false;
        }
        if self.focused.is_some_and(|f| self.contains(id, f)) {
            self.focused = None;
        }
        self.detach(id);
        let mut doomed: Vec<NodeId> = self.descendants(id).collect();
        doomed.push(id);
        for node in doomed {
            self.slots[node.idx()].element = None;
            self.free.push(node.0);
        }
        true
    }

    /// The parent of `id`, if any.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    /// The children of `id` in document order (empty for stale handles).
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|el| el.children.as_slice()).unwrap_or(&[])
    }

    /// The (lowercased) tag name of `id`.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.get(id).map(|el| &*el.tag)
    }

    /// Returns `true` if `node` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.is_alive(ancestor) && self.ancestors(node).any(|a| a == ancestor)
    }

    /// Returns `true` if `id` is attached (directly or indirectly) to the body.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(self.body, id)
    }

    /// Walk from `id` up to the root, `id` included.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: self.is_alive(id).then_some(id),
        }
    }

    /// Pre-order (document order) traversal of the subtree under `root`, `root` excluded.
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        let mut stack = Vec::new();
        stack.extend(self.children(root).iter().rev().copied());
        Descendants { doc: self, stack }
    }

    /// The raw value of an attribute. Names are ASCII-case-insensitive.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id)?.attribute(name)
    }

    /// Returns `true` if the attribute is present (with any value, including `""`).
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.get(id).is_some_and(|el| el.has_attribute(name))
    }

    /// Set an attribute, replacing any previous value.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        let Some(el) = self.get_mut(id) else {
            return;
        };
        if let Some(slot) = el
            .attributes
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
        {
            slot.1 = value.into();
        } else {
            el.attributes
                .push((name.to_ascii_lowercase().into_boxed_str(), value.into()));
        }
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<Box<str>> {
        let el = self.get_mut(id)?;
        let pos = el
            .attributes
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(name))?;
        Some(el.attributes.remove(pos).1)
    }

    /// The explicit tab order of `id`, parsed from its trimmed `tabindex` attribute.
    ///
    /// `None` means the attribute is absent or not an integer; `Some(0)` is a real value.
    pub fn tab_index(&self, id: NodeId) -> Option<i32> {
        self.attribute(id, "tabindex")?.trim().parse().ok()
    }

    /// The layout box of `id` in offset coordinates.
    pub fn layout(&self, id: NodeId) -> Option<Rect> {
        self.get(id).map(|el| el.layout)
    }

    /// Update the layout box of `id`.
    pub fn set_layout(&mut self, id: NodeId, layout: Rect) {
        if let Some(el) = self.get_mut(id) {
            el.layout = layout;
        }
    }

    /// The viewport size.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Resize the viewport.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Returns `true` if `id` is focusable by host rules, ignoring hidden ancestors.
    ///
    /// An element is focusable when it carries a `tabindex` (any value) or
    /// `contenteditable`, or is natively focusable: `a`/`area` with `href`,
    /// `button`/`input`/`select`/`textarea` without `disabled`, or `iframe`.
    pub fn is_focusable(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Element::is_focusable)
    }

    /// Returns `true` if `id` or one of its ancestors carries `hidden`.
    pub fn is_hidden(&self, id: NodeId) -> bool {
        self.ancestors(id).any(|a| self.has_attribute(a, "hidden"))
    }

    /// Returns `true` if `id` belongs to the SVG family of graphic primitives.
    pub fn is_graphic(&self, id: NodeId) -> bool {
        self.tag(id).is_some_and(|t| GRAPHIC_TAGS.contains(&t))
    }

    /// The currently focused element.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused.filter(|&f| self.is_alive(f))
    }

    /// Returns `true` if [`Document::focus`] would accept `id`.
    ///
    /// The body always can; other elements must be connected, focusable, and outside
    /// `[hidden]` subtrees.
    pub fn can_focus(&self, id: NodeId) -> bool {
        id == self.body || (self.is_focusable(id) && !self.is_hidden(id) && self.is_connected(id))
    }

    /// Move focus to `id`. On failure focus is left unchanged.
    pub fn focus(&mut self, id: NodeId) -> bool {
        let accepted = self.can_focus(id);
        if accepted {
            self.focused = Some(id);
        }
        accepted
    }

    /// Clear focus.
    pub fn blur(&mut self) {
        self.focused = None;
    }

    /// The first element under `root` (excluded) matching `selector`, in document order.
    pub fn query_selector(&self, root: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(root).find(|&id| selector.matches(self, id))
    }

    /// Every element under `root` (excluded) matching `selector`, in document order.
    pub fn query_selector_all(&self, root: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(root)
            .filter(|&id| selector.matches(self, id))
            .collect()
    }

    /// The first element under `root` (excluded) whose `id` attribute equals `value`.
    pub fn element_by_id(&self, root: NodeId, value: &str) -> Option<NodeId> {
        if value.is_empty() {
            return None;
        }
        self.descendants(root)
            .find(|&id| self.attribute(id, "id") == Some(value))
    }
}

/// Iterator returned by [`Document::ancestors`].
#[derive(Clone, Debug)]
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.doc.parent(current);
        Some(current)
    }
}

/// Iterator returned by [`Document::descendants`].
#[derive(Clone, Debug)]
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        // Push children in reverse order so popping yields them left to right.
        self.stack
            .extend(self.doc.children(id).iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn button(doc: &mut Document, parent: NodeId) -> NodeId {
        doc.insert(Some(parent), ElementData::new("button"))
    }

    #[test]
    fn insert_appends_in_order() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = button(&mut doc, body);
        let b = button(&mut doc, body);
        assert_eq!(doc.children(body), &[a, b]);
        assert_eq!(doc.parent(a), Some(body));
    }

    #[test]
    fn descendants_are_in_document_order() {
        let mut doc = Document::new();
        let body = doc.body();
        let section = doc.insert(Some(body), ElementData::new("section"));
        let a = button(&mut doc, section);
        let b = button(&mut doc, body);
        let c = button(&mut doc, section);
        // `c` was appended to `section`, so it precedes `b` in document order.
        assert_eq!(
            doc.descendants(body).collect::<Vec<_>>(),
            vec![section, a, c, b]
        );
    }

    #[test]
    fn append_child_reparents_and_refuses_cycles() {
        let mut doc = Document::new();
        let body = doc.body();
        let outer = doc.insert(Some(body), ElementData::new("div"));
        let inner = doc.insert(Some(outer), ElementData::new("div"));
        assert!(!doc.append_child(inner, outer));
        assert!(doc.append_child(body, inner));
        assert_eq!(doc.children(body), &[outer, inner]);
        assert!(doc.children(outer).is_empty());
        assert!(!doc.append_child(inner, body));
    }

    #[test]
    fn removed_ids_go_stale_and_slots_are_reused() {
        let mut doc = Document::new();
        let body = doc.body();
        let div = doc.insert(Some(body), ElementData::new("div"));
        let child = button(&mut doc, div);
        assert!(doc.focus(child));
        assert!(doc.remove(div));
        assert!(!doc.is_alive(div));
        assert!(!doc.is_alive(child));
        assert_eq!(doc.focused(), None);

        let fresh = doc.insert(Some(body), ElementData::new("p"));
        assert_ne!(fresh, div);
        assert_ne!(fresh, child);
        assert!(!doc.remove(body));
    }

    #[test]
    fn attributes_are_case_insensitive_and_keep_zero() {
        let mut doc = Document::new();
        let body = doc.body();
        let el = doc.insert(
            Some(body),
            ElementData::new("DIV").with_attribute("TabIndex", "0"),
        );
        assert_eq!(doc.tag(el), Some("div"));
        assert_eq!(doc.attribute(el, "tabindex"), Some("0"));
        assert_eq!(doc.tab_index(el), Some(0));
        doc.set_attribute(el, "TABINDEX", " -1 ");
        assert_eq!(doc.tab_index(el), Some(-1));
        assert_eq!(doc.remove_attribute(el, "tabindex").as_deref(), Some(" -1 "));
        assert_eq!(doc.tab_index(el), None);
        assert!(!doc.has_attribute(el, "tabindex"));
    }

    #[test]
    fn focus_follows_host_rules() {
        let mut doc = Document::new();
        let body = doc.body();
        let div = doc.insert(Some(body), ElementData::new("div"));
        let link = doc.insert(Some(body), ElementData::new("a"));
        let href = doc.insert(Some(body), ElementData::new("a").with_attribute("href", "#"));
        let disabled = doc.insert(
            Some(body),
            ElementData::new("button").with_attribute("disabled", ""),
        );
        let hidden = doc.insert(Some(body), ElementData::new("div").with_attribute("hidden", ""));
        let inside_hidden = button(&mut doc, hidden);
        let detached = doc.insert(None, ElementData::new("button"));

        assert!(!doc.focus(div));
        assert!(!doc.focus(link));
        assert!(!doc.focus(disabled));
        assert!(!doc.focus(inside_hidden));
        assert!(!doc.focus(detached));
        assert_eq!(doc.focused(), None);
        assert!(doc.focus(href));
        assert_eq!(doc.focused(), Some(href));
        assert!(doc.focus(body));
        assert_eq!(doc.focused(), Some(body));
    }

    #[test]
    fn graphic_tags_are_detected() {
        let mut doc = Document::new();
        let body = doc.body();
        let svg = doc.insert(Some(body), ElementData::new("svg"));
        let path = doc.insert(Some(svg), ElementData::new("path"));
        let span = doc.insert(Some(body), ElementData::new("span"));
        assert!(doc.is_graphic(svg));
        assert!(doc.is_graphic(path));
        assert!(!doc.is_graphic(span));
    }
}
