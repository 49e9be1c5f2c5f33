// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=veil_inert --heading-base-level=0

//! Veil Inert: reversibly take a region of a document out of keyboard navigation and out of
//! the accessibility tree.
//!
//! A modal overlay makes everything behind it inert. Two things happen:
//!
//! - every interactive element of the region (outside the overlay) gets `tabindex="-1"`, so
//!   sequential keyboard navigation skips it;
//! - the siblings of the overlay get `aria-hidden="true"`, so assistive technology ignores
//!   them. Without an overlay to keep visible, the region itself is hidden.
//!
//! Each change is recorded in a [`DisabledRegion`] together with the raw attribute value it
//! replaced, so [`Inertness::enable`] restores the document byte for byte: a `tabindex="0"`
//! comes back as `"0"`, and an absent attribute comes back absent.
//!
//! ## Rules
//!
//! - A region is disabled at most once. [`Inertness::disable`] on a disabled region does
//!   nothing and returns `false`, so nested overlays never double-record.
//! - Elements already out of sequence (negative tab index) and siblings already hidden are
//!   left untouched and are not recorded.
//! - [`Inertness::enable_subtree`] restores only the recorded elements inside a subtree. It is
//!   used when content that was inerted by an outer pass becomes the content of a new overlay.
//!
//! ```
//! use veil_document::{Document, ElementData};
//! use veil_inert::Inertness;
//!
//! let mut doc = Document::new();
//! let body = doc.body();
//! let link = doc.insert(
//!     Some(body),
//!     ElementData::new("a").with_attribute("href", "#").with_attribute("tabindex", "0"),
//! );
//! let dialog = doc.insert(Some(body), ElementData::new("div"));
//! let ok = doc.insert(Some(dialog), ElementData::new("button"));
//!
//! let mut inert = Inertness::new();
//! assert!(inert.disable(&mut doc, body, Some(dialog)));
//! assert_eq!(doc.attribute(link, "tabindex"), Some("-1"));
//! assert_eq!(doc.attribute(link, "aria-hidden"), Some("true"));
//! assert_eq!(doc.attribute(ok, "tabindex"), None);
//!
//! assert!(inert.enable(&mut doc, body));
//! assert_eq!(doc.attribute(link, "tabindex"), Some("0"));
//! assert_eq!(doc.attribute(link, "aria-hidden"), None);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec::Vec;

use hashbrown::HashMap;
use veil_document::{Document, NodeId};
use veil_focus::focusables;

/// Attribute controlling sequential keyboard navigation.
pub const TAB_INDEX: &str = "tabindex";

/// Attribute hiding a subtree from assistive technology.
pub const ARIA_HIDDEN: &str = "aria-hidden";

/// Tab index assigned to neutralized elements.
pub const NEUTRAL_TAB_INDEX: &str = "-1";

/// An element changed by a disable pass, and the raw attribute value it had before.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Remembered {
    /// The changed element.
    pub node: NodeId,
    /// The previous attribute value; `None` when the attribute was absent.
    pub prior: Option<Box<str>>,
}

/// The bookkeeping of one disabled region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisabledRegion {
    region: NodeId,
    neutralized: Vec<Remembered>,
    hidden: Vec<Remembered>,
}

impl DisabledRegion {
    /// The disabled container.
    pub fn region(&self) -> NodeId {
        self.region
    }

    /// Elements whose `tabindex` was set to `-1`, in document order.
    pub fn neutralized(&self) -> &[Remembered] {
        &self.neutralized
    }

    /// Elements whose `aria-hidden` was set to `true`, in document order.
    pub fn hidden(&self) -> &[Remembered] {
        &self.hidden
    }
}

/// Owner of every [`DisabledRegion`] of a document.
///
/// A region is disabled exactly when it has a record here.
#[derive(Clone, Debug, Default)]
pub struct Inertness {
    regions: HashMap<NodeId, DisabledRegion>,
}

impl Inertness {
    /// Create a controller with no disabled region.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `region` is currently disabled.
    pub fn is_disabled(&self, region: NodeId) -> bool {
        self.regions.contains_key(&region)
    }

    /// The record of `region`, if it is disabled.
    pub fn region(&self, region: NodeId) -> Option<&DisabledRegion> {
        self.regions.get(&region)
    }

    /// Returns `true` if no region is disabled.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Make `region` inert, keeping the subtree `exclude` interactive.
    ///
    /// Every interactive descendant of `region` outside `exclude` with a non-negative (or
    /// absent) tab index gets `tabindex="-1"`. With `exclude`, its siblings (except `script`
    /// elements) get `aria-hidden="true"`; without it, `region` itself does.
    ///
    /// Returns `false` and changes nothing when `region` is stale or already disabled.
    pub fn disable(&mut self, doc: &mut Document, region: NodeId, exclude: Option<NodeId>) -> bool {
        if !doc.is_alive(region) || self.is_disabled(region) {
            return false;
        }

        let mut neutralized = Vec::new();
        for node in focusables(doc, region) {
            if exclude.is_some_and(|ex| doc.contains(ex, node)) {
                continue;
            }
            // Already out of sequence; there is nothing to restore later.
            if doc.tab_index(node).is_some_and(|t| t < 0) {
                continue;
            }
            neutralized.push(remember(doc, node, TAB_INDEX, NEUTRAL_TAB_INDEX));
        }

        let mut hidden = Vec::new();
        match exclude {
            Some(ex) => {
                let siblings: Vec<NodeId> = doc
                    .parent(ex)
                    .map(|parent| doc.children(parent).to_vec())
                    .unwrap_or_default();
                for sibling in siblings {
                    if sibling == ex || doc.tag(sibling) == Some("script") {
                        continue;
                    }
                    if doc.attribute(sibling, ARIA_HIDDEN) == Some("true") {
                        continue;
                    }
                    hidden.push(remember(doc, sibling, ARIA_HIDDEN, "true"));
                }
            }
            None => {
                if doc.attribute(region, ARIA_HIDDEN) != Some("true") {
                    hidden.push(remember(doc, region, ARIA_HIDDEN, "true"));
                }
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            region = ?region,
            exclude = ?exclude,
            neutralized = neutralized.len(),
            hidden = hidden.len(),
            "disabled region"
        );

        self.regions.insert(
            region,
            DisabledRegion {
                region,
                neutralized,
                hidden,
            },
        );
        true
    }

    /// Undo the disable pass of `region`, restoring every recorded attribute exactly.
    ///
    /// Recorded elements removed from the document since are skipped.
    /// Returns `false` when `region` is not disabled.
    pub fn enable(&mut self, doc: &mut Document, region: NodeId) -> bool {
        let Some(record) = self.regions.remove(&region) else {
            return false;
        };
        for entry in &record.neutralized {
            restore(doc, entry, TAB_INDEX);
        }
        for entry in &record.hidden {
            restore(doc, entry, ARIA_HIDDEN);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            region = ?region,
            neutralized = record.neutralized.len(),
            hidden = record.hidden.len(),
            "enabled region"
        );

        true
    }

    /// Restore the recorded elements contained in `subtree` (inclusive), in every disabled
    /// region, and forget them. Everything outside `subtree` stays disabled and recorded.
    ///
    /// Returns the number of restored attributes.
    pub fn enable_subtree(&mut self, doc: &mut Document, subtree: NodeId) -> usize {
        let mut restored = 0;
        for record in self.regions.values_mut() {
            restored += restore_within(doc, subtree, &mut record.neutralized, TAB_INDEX);
            restored += restore_within(doc, subtree, &mut record.hidden, ARIA_HIDDEN);
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(subtree = ?subtree, restored, "enabled subtree");

        restored
    }

    /// Drop the recorded `aria-hidden` value of `node` in every disabled region, so enabling
    /// leaves its current value alone. Tab indexes stay recorded.
    ///
    /// Used when the owner of `node` hides it for its own reasons while a region is disabled.
    /// Returns the number of forgotten entries.
    pub fn forget_hidden(&mut self, node: NodeId) -> usize {
        let mut forgotten = 0;
        for record in self.regions.values_mut() {
            let before = record.hidden.len();
            record.hidden.retain(|entry| entry.node != node);
            forgotten += before - record.hidden.len();
        }
        forgotten
    }
}

fn remember(doc: &mut Document, node: NodeId, name: &str, value: &str) -> Remembered {
    let prior = doc.attribute(node, name).map(Box::from);
    doc.set_attribute(node, name, value);
    Remembered { node, prior }
}

fn restore(doc: &mut Document, entry: &Remembered, name: &str) {
    if !doc.is_alive(entry.node) {
        return;
    }
    match &entry.prior {
        Some(value) => doc.set_attribute(entry.node, name, value),
        None => {
            doc.remove_attribute(entry.node, name);
        }
    }
}

fn restore_within(
    doc: &mut Document,
    subtree: NodeId,
    entries: &mut Vec<Remembered>,
    name: &str,
) -> usize {
    let before = entries.len();
    entries.retain(|entry| {
        if !doc.contains(subtree, entry.node) {
            return true;
        }
        restore(doc, entry, name);
        false
    });
    before - entries.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;
    use veil_document::ElementData;

    fn page() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let body = doc.body();
        let nav = doc.insert(Some(body), ElementData::new("nav"));
        let dialog = doc.insert(Some(body), ElementData::new("div"));
        (doc, body, nav, dialog)
    }

    #[test]
    fn skips_negative_tab_indexes_and_hidden_subtrees() {
        let (mut doc, body, nav, dialog) = page();
        let skipped = doc.insert(
            Some(nav),
            ElementData::new("span").with_attribute("tabindex", "-2"),
        );
        let folded = doc.insert(Some(nav), ElementData::new("div").with_attribute("hidden", ""));
        let under_hidden = doc.insert(Some(folded), ElementData::new("button"));
        let button = doc.insert(Some(nav), ElementData::new("button"));

        let mut inert = Inertness::new();
        assert!(inert.disable(&mut doc, body, Some(dialog)));
        let record = inert.region(body).unwrap();
        assert_eq!(record.neutralized().len(), 1);
        assert_eq!(record.neutralized()[0].node, button);
        assert_eq!(doc.attribute(skipped, "tabindex"), Some("-2"));
        assert_eq!(doc.attribute(under_hidden, "tabindex"), None);
    }

    #[test]
    fn hides_siblings_but_not_scripts_or_the_overlay() {
        let (mut doc, body, nav, dialog) = page();
        let script = doc.insert(Some(body), ElementData::new("script"));
        let already = doc.insert(
            Some(body),
            ElementData::new("aside").with_attribute("aria-hidden", "true"),
        );
        let shown = doc.insert(
            Some(body),
            ElementData::new("main").with_attribute("aria-hidden", "false"),
        );

        let mut inert = Inertness::new();
        inert.disable(&mut doc, body, Some(dialog));
        let record = inert.region(body).unwrap();
        let hidden: Vec<NodeId> = record.hidden().iter().map(|r| r.node).collect();
        assert_eq!(hidden, alloc::vec![nav, shown]);
        assert_eq!(doc.attribute(script, "aria-hidden"), None);
        assert_eq!(doc.attribute(dialog, "aria-hidden"), None);

        inert.enable(&mut doc, body);
        assert_eq!(doc.attribute(nav, "aria-hidden"), None);
        assert_eq!(doc.attribute(already, "aria-hidden"), Some("true"));
        assert_eq!(doc.attribute(shown, "aria-hidden"), Some("false"));
    }

    #[test]
    fn without_exclusion_the_region_itself_is_hidden() {
        let (mut doc, _body, nav, _dialog) = page();
        let link = doc.insert(
            Some(nav),
            ElementData::new("a").with_attribute("href", "/"),
        );
        let mut inert = Inertness::new();
        assert!(inert.disable(&mut doc, nav, None));
        assert_eq!(doc.attribute(nav, "aria-hidden"), Some("true"));
        assert_eq!(doc.attribute(link, "tabindex"), Some("-1"));

        assert!(inert.enable(&mut doc, nav));
        assert!(!inert.is_disabled(nav));
        assert_eq!(doc.attribute(nav, "aria-hidden"), None);
        assert_eq!(doc.attribute(link, "tabindex"), None);
    }

    #[test]
    fn enable_without_record_changes_nothing() {
        let (mut doc, body, nav, _dialog) = page();
        let button = doc.insert(
            Some(nav),
            ElementData::new("button").with_attribute("tabindex", "3"),
        );
        let mut inert = Inertness::new();
        assert!(!inert.enable(&mut doc, body));
        assert_eq!(doc.attribute(button, "tabindex"), Some("3"));
    }

    #[test]
    fn enable_subtree_restores_only_inside() {
        let (mut doc, body, nav, dialog) = page();
        let outside = doc.insert(Some(nav), ElementData::new("button"));
        let panel = doc.insert(Some(nav), ElementData::new("section"));
        let inside = doc.insert(
            Some(panel),
            ElementData::new("input")
                .with_attribute("tabindex", "0")
                .with_layout(Rect::new(0.0, 0.0, 10.0, 10.0)),
        );

        let mut inert = Inertness::new();
        inert.disable(&mut doc, body, Some(dialog));
        assert_eq!(inert.enable_subtree(&mut doc, panel), 1);
        assert_eq!(doc.attribute(inside, "tabindex"), Some("0"));
        assert_eq!(doc.attribute(outside, "tabindex"), Some("-1"));
        assert!(inert.is_disabled(body));

        // Restored entries are forgotten; the final enable leaves them alone.
        doc.set_attribute(inside, "tabindex", "7");
        inert.enable(&mut doc, body);
        assert_eq!(doc.attribute(inside, "tabindex"), Some("7"));
        assert_eq!(doc.attribute(outside, "tabindex"), None);
    }

    #[test]
    fn forgotten_hidden_values_are_not_restored() {
        let (mut doc, body, nav, dialog) = page();
        doc.set_attribute(nav, ARIA_HIDDEN, "false");
        let link = doc.insert(
            Some(nav),
            ElementData::new("a")
                .with_attribute("href", "#")
                .with_attribute("tabindex", "0"),
        );
        let mut inert = Inertness::new();
        inert.disable(&mut doc, body, Some(dialog));
        assert_eq!(doc.attribute(nav, ARIA_HIDDEN), Some("true"));

        assert_eq!(inert.forget_hidden(nav), 1);
        assert_eq!(inert.forget_hidden(nav), 0);
        assert!(inert.enable(&mut doc, body));
        assert_eq!(doc.attribute(nav, ARIA_HIDDEN), Some("true"));
        assert_eq!(doc.attribute(link, "tabindex"), Some("0"));
    }

    #[test]
    fn removed_elements_are_skipped_on_restore() {
        let (mut doc, body, nav, dialog) = page();
        let button = doc.insert(Some(nav), ElementData::new("button"));
        let mut inert = Inertness::new();
        inert.disable(&mut doc, body, Some(dialog));
        doc.remove(button);
        let reused = doc.insert(Some(nav), ElementData::new("button"));
        assert!(inert.enable(&mut doc, body));
        assert_eq!(doc.attribute(reused, "tabindex"), None);
    }

    #[test]
    fn stale_region_is_rejected() {
        let (mut doc, _body, nav, _dialog) = page();
        doc.remove(nav);
        let mut inert = Inertness::new();
        assert!(!inert.disable(&mut doc, nav, None));
        assert!(inert.is_empty());
    }
}
