// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=veil_focus --heading-base-level=0

//! Veil Focus: which elements are keyboard-interactive, and which one an overlay focuses first.
//!
//! ## Interactive elements
//!
//! An element is interactive when the host would focus it ([`Document::is_focusable`]) and it
//! is not inside a `[hidden]` subtree. [`focusables`] lists the interactive descendants of a
//! container in document order; this is the set the inertness controller neutralizes and the
//! set the scanner walks.
//!
//! ## Initial focus
//!
//! [`find_first_focusable`] picks the element that receives focus when an overlay opens.
//! Rules are tried in order and the first match wins:
//!
//! 1. A descendant carrying `autofocus`, unconditionally (even a close trigger).
//! 2. The first interactive descendant that is rendered (non-zero width or height), not in
//!    the exclusion list (typically the close triggers) and, under a strict
//!    [`ScanPolicy`], not below the viewport (`offsetTop + offsetHeight <= viewport height`).
//! 3. The first excluded element, subject to the same viewport rule.
//! 4. The first rendered textual element ([`TEXTUAL_TAGS`]); it is given `tabindex="-1"` when
//!    it has no explicit tab order, so assistive technology still announces the overlay.
//!
//! Ties are broken by document order. The scan is deterministic and can be repeated.
//!
//! ```
//! use kurbo::Rect;
//! use veil_document::{Document, ElementData};
//! use veil_focus::{FocusPick, ScanPolicy, find_first_focusable};
//!
//! let mut doc = Document::new();
//! let body = doc.body();
//! let dialog = doc.insert(Some(body), ElementData::new("div"));
//! let close = doc.insert(
//!     Some(dialog),
//!     ElementData::new("button").with_layout(Rect::new(0.0, 0.0, 20.0, 20.0)),
//! );
//! let ok = doc.insert(
//!     Some(dialog),
//!     ElementData::new("button").with_layout(Rect::new(0.0, 40.0, 80.0, 60.0)),
//! );
//!
//! let pick = find_first_focusable(&mut doc, dialog, &[close], ScanPolicy::default());
//! assert_eq!(pick, Some(FocusPick::Interactive(ok)));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

use veil_document::{Document, NodeId};

/// Structural and textual tags used as the last-resort focus target.
pub const TEXTUAL_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "ul", "dl", "figure", "img", "table", "canvas",
    "details",
];

/// Attribute marking the element that always receives initial focus.
pub const AUTOFOCUS_ATTRIBUTE: &str = "autofocus";

/// Knobs for [`find_first_focusable`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScanPolicy {
    /// Reject candidates whose bottom edge lies below the viewport.
    pub viewport_check: bool,
}

impl ScanPolicy {
    /// Apply the viewport rule.
    pub const STRICT: Self = Self {
        viewport_check: true,
    };
    /// Ignore the viewport.
    pub const LENIENT: Self = Self {
        viewport_check: false,
    };
}

impl Default for ScanPolicy {
    fn default() -> Self {
        Self::STRICT
    }
}

/// The element chosen by [`find_first_focusable`], tagged with the rule that chose it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FocusPick {
    /// A descendant carrying `autofocus`.
    AutoFocus(NodeId),
    /// The first suitable interactive descendant.
    Interactive(NodeId),
    /// The first excluded element (usually a close trigger).
    CloseTrigger(NodeId),
    /// A textual element made focusable as a last resort.
    Textual {
        /// The chosen element.
        node: NodeId,
        /// `true` when the scan assigned `tabindex="-1"` to it.
        assigned_tab_index: bool,
    },
}

impl FocusPick {
    /// The chosen element.
    pub fn node(self) -> NodeId {
        match self {
            Self::AutoFocus(node)
            | Self::Interactive(node)
            | Self::CloseTrigger(node)
            | Self::Textual { node, .. } => node,
        }
    }
}

/// Returns `true` if `node` is keyboard-interactive: host-focusable and not hidden.
pub fn is_interactive(doc: &Document, node: NodeId) -> bool {
    doc.is_focusable(node) && !doc.is_hidden(node)
}

/// Interactive descendants of `container` (excluded), in document order.
pub fn focusables(doc: &Document, container: NodeId) -> Vec<NodeId> {
    doc.descendants(container)
        .filter(|&id| is_interactive(doc, id))
        .collect()
}

/// Returns `true` if `node` is not hidden and has a non-zero width or height.
pub fn is_rendered(doc: &Document, node: NodeId) -> bool {
    if doc.is_hidden(node) {
        return false;
    }
    doc.layout(node)
        .is_some_and(|r| r.width() > 0.0 || r.height() > 0.0)
}

/// Returns `true` if the bottom edge of `node` is within the viewport height.
pub fn is_within_viewport(doc: &Document, node: NodeId) -> bool {
    doc.layout(node)
        .is_some_and(|r| r.y0 + r.height() <= doc.viewport().height)
}

/// The nearest inclusive ancestor of `node` that the host accepts focus on.
///
/// Used to replace openers that cannot take focus back, such as SVG icons.
pub fn focusable_ancestor(doc: &Document, node: NodeId) -> Option<NodeId> {
    doc.ancestors(node).find(|&a| doc.can_focus(a))
}

/// Pick the element to focus when `container` opens. See the crate docs for the rules.
///
/// Returns `None` only when `container` is stale or holds nothing focusable, rendered, or
/// textual. May assign `tabindex="-1"` to a textual fallback; see
/// [`FocusPick::Textual::assigned_tab_index`](FocusPick::Textual).
pub fn find_first_focusable(
    doc: &mut Document,
    container: NodeId,
    exclude: &[NodeId],
    policy: ScanPolicy,
) -> Option<FocusPick> {
    if let Some(pick) = scan_interactive(doc, container, exclude, policy) {
        return Some(pick);
    }
    let view: &Document = doc;
    let node = view.descendants(container).find(|&id| {
        view.tag(id).is_some_and(|t| TEXTUAL_TAGS.contains(&t)) && is_rendered(view, id)
    })?;
    let assigned_tab_index = !doc.has_attribute(node, "tabindex");
    if assigned_tab_index {
        doc.set_attribute(node, "tabindex", "-1");
    }
    Some(FocusPick::Textual {
        node,
        assigned_tab_index,
    })
}

/// Rules 1 to 3: everything that does not mutate the document.
fn scan_interactive(
    doc: &Document,
    container: NodeId,
    exclude: &[NodeId],
    policy: ScanPolicy,
) -> Option<FocusPick> {
    if !doc.is_alive(container) {
        return None;
    }

    if let Some(node) = doc
        .descendants(container)
        .find(|&id| doc.has_attribute(id, AUTOFOCUS_ATTRIBUTE))
    {
        return Some(FocusPick::AutoFocus(node));
    }

    let fits = |id: NodeId| !policy.viewport_check || is_within_viewport(doc, id);

    if let Some(node) = doc.descendants(container).find(|&id| {
        is_interactive(doc, id) && is_rendered(doc, id) && !exclude.contains(&id) && fits(id)
    }) {
        return Some(FocusPick::Interactive(node));
    }

    exclude
        .first()
        .copied()
        .filter(|&first| fits(first))
        .map(FocusPick::CloseTrigger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Rect, Size};
    use veil_document::ElementData;

    const BOX: Rect = Rect::new(0.0, 0.0, 50.0, 20.0);

    fn el(doc: &mut Document, parent: NodeId, tag: &str) -> NodeId {
        doc.insert(Some(parent), ElementData::new(tag).with_layout(BOX))
    }

    #[test]
    fn focusables_follow_document_order_and_skip_hidden() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = el(&mut doc, body, "button");
        let hidden = doc.insert(Some(body), ElementData::new("div").with_attribute("hidden", ""));
        let _inside_hidden = el(&mut doc, hidden, "button");
        let span = doc.insert(
            Some(body),
            ElementData::new("span").with_attribute("tabindex", "-1"),
        );
        let _plain = el(&mut doc, body, "div");
        let editable = doc.insert(
            Some(body),
            ElementData::new("div").with_attribute("contenteditable", "true"),
        );
        assert_eq!(focusables(&doc, body), alloc::vec![a, span, editable]);
    }

    #[test]
    fn autofocus_wins_even_on_a_close_trigger() {
        let mut doc = Document::new();
        let body = doc.body();
        let root = el(&mut doc, body, "div");
        let _first = el(&mut doc, root, "button");
        let close = doc.insert(
            Some(root),
            ElementData::new("button")
                .with_attribute("autofocus", "")
                .with_layout(BOX),
        );
        let pick = find_first_focusable(&mut doc, root, &[close], ScanPolicy::STRICT);
        assert_eq!(pick, Some(FocusPick::AutoFocus(close)));
    }

    #[test]
    fn skips_unrendered_and_below_the_fold_under_strict_policy() {
        let mut doc = Document::new();
        doc.set_viewport(Size::new(800.0, 100.0));
        let body = doc.body();
        let root = el(&mut doc, body, "div");
        let _collapsed = doc.insert(Some(root), ElementData::new("button"));
        let below = doc.insert(
            Some(root),
            ElementData::new("button").with_layout(Rect::new(0.0, 90.0, 50.0, 120.0)),
        );
        let visible = el(&mut doc, root, "input");

        let strict = find_first_focusable(&mut doc, root, &[], ScanPolicy::STRICT);
        assert_eq!(strict, Some(FocusPick::Interactive(visible)));
        let lenient = find_first_focusable(&mut doc, root, &[], ScanPolicy::LENIENT);
        assert_eq!(lenient, Some(FocusPick::Interactive(below)));
    }

    #[test]
    fn falls_back_to_first_close_trigger() {
        let mut doc = Document::new();
        let body = doc.body();
        let root = el(&mut doc, body, "div");
        let close_a = el(&mut doc, root, "button");
        let close_b = el(&mut doc, root, "button");
        let pick = find_first_focusable(&mut doc, root, &[close_a, close_b], ScanPolicy::STRICT);
        assert_eq!(pick, Some(FocusPick::CloseTrigger(close_a)));
    }

    #[test]
    fn textual_fallback_assigns_negative_tab_index_once() {
        let mut doc = Document::new();
        let body = doc.body();
        let root = el(&mut doc, body, "div");
        let _empty_p = doc.insert(Some(root), ElementData::new("p"));
        let heading = el(&mut doc, root, "h2");

        let first = find_first_focusable(&mut doc, root, &[], ScanPolicy::STRICT);
        assert_eq!(
            first,
            Some(FocusPick::Textual {
                node: heading,
                assigned_tab_index: true
            })
        );
        assert_eq!(doc.tab_index(heading), Some(-1));

        // The heading is now interactive (it has a tabindex), so a rescan picks it directly.
        let again = find_first_focusable(&mut doc, root, &[], ScanPolicy::STRICT);
        assert_eq!(again, Some(FocusPick::Interactive(heading)));
    }

    #[test]
    fn nothing_to_focus_yields_none() {
        let mut doc = Document::new();
        let body = doc.body();
        let root = el(&mut doc, body, "div");
        let _span = el(&mut doc, root, "span");
        assert_eq!(
            find_first_focusable(&mut doc, root, &[], ScanPolicy::STRICT),
            None
        );
    }

    #[test]
    fn graphic_openers_resolve_to_focusable_ancestor() {
        let mut doc = Document::new();
        let body = doc.body();
        let button = el(&mut doc, body, "button");
        let svg = el(&mut doc, button, "svg");
        let path = el(&mut doc, svg, "path");
        assert_eq!(focusable_ancestor(&doc, path), Some(button));

        let loose = el(&mut doc, body, "svg");
        assert_eq!(focusable_ancestor(&doc, loose), Some(body));
    }
}
