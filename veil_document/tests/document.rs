// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `veil_document` crate.
//!
//! These exercise the document as the overlay crates use it: moving detached content into a
//! page, finding markers with selectors, and the host focus rules.

use kurbo::Rect;
use veil_document::{Document, ElementData, Selector};

#[test]
fn detached_content_moves_into_the_page_in_document_order() {
    let mut doc = Document::new();
    let body = doc.body();
    let existing = doc.insert(Some(body), ElementData::new("main"));

    let root = doc.insert(None, ElementData::new("div"));
    let title = doc.insert(Some(root), ElementData::new("h2"));
    let text = doc.insert(Some(root), ElementData::new("p"));
    assert!(!doc.is_connected(title));

    assert!(doc.append_child(body, root));
    assert!(doc.is_connected(title));
    assert_eq!(doc.children(body), &[existing, root]);
    assert_eq!(
        doc.descendants(body).collect::<Vec<_>>(),
        vec![existing, root, title, text]
    );
    assert_eq!(
        doc.ancestors(text).collect::<Vec<_>>(),
        vec![text, root, body]
    );

    // A node cannot become its own descendant.
    assert!(!doc.append_child(title, root));
    assert_eq!(doc.parent(root), Some(body));
}

#[test]
fn removed_subtrees_leave_stale_handles_behind() {
    let mut doc = Document::new();
    let body = doc.body();
    let panel = doc.insert(Some(body), ElementData::new("section"));
    let button = doc.insert(
        Some(panel),
        ElementData::new("button").with_layout(Rect::new(0.0, 0.0, 10.0, 10.0)),
    );
    assert!(doc.focus(button));

    assert!(doc.remove(panel));
    assert!(!doc.is_alive(button));
    assert_eq!(doc.focused(), None);

    // Reused slots get a new generation.
    let fresh = doc.insert(Some(body), ElementData::new("div"));
    assert_ne!(fresh, button);
    assert_ne!(fresh, panel);
    assert_eq!(doc.attribute(button, "id"), None);
    assert!(!doc.remove(body));
}

#[test]
fn selectors_find_markers_inside_a_subtree() {
    let mut doc = Document::new();
    let body = doc.body();
    let outside = doc.insert(
        Some(body),
        ElementData::new("button").with_attribute("data-close", ""),
    );
    let dialog = doc.insert(Some(body), ElementData::new("div"));
    let close = doc.insert(
        Some(dialog),
        ElementData::new("button")
            .with_attribute("class", "btn close")
            .with_attribute("data-close", ""),
    );
    let cancel = doc.insert(
        Some(dialog),
        ElementData::new("a")
            .with_attribute("id", "cancel")
            .with_attribute("href", "#"),
    );

    let triggers = Selector::parse("[data-close], a#cancel").unwrap();
    assert_eq!(doc.query_selector_all(dialog, &triggers), vec![close, cancel]);
    assert_eq!(doc.query_selector(body, &triggers), Some(outside));
    assert!(Selector::parse("button.close").unwrap().matches(&doc, close));
    assert_eq!(doc.element_by_id(dialog, "cancel"), Some(cancel));
    assert_eq!(doc.element_by_id(dialog, "missing"), None);
    assert!(Selector::parse("[data-close").is_err());
}

#[test]
fn focus_follows_host_rules() {
    let mut doc = Document::new();
    let body = doc.body();
    let link = doc.insert(Some(body), ElementData::new("a"));
    let disabled = doc.insert(
        Some(body),
        ElementData::new("input").with_attribute("disabled", ""),
    );
    let hidden = doc.insert(Some(body), ElementData::new("div").with_attribute("hidden", ""));
    let inside_hidden = doc.insert(Some(hidden), ElementData::new("button"));
    let span = doc.insert(
        Some(body),
        ElementData::new("span").with_attribute("tabindex", " -1 "),
    );
    let detached = doc.insert(None, ElementData::new("button"));

    assert!(!doc.focus(link));
    assert!(!doc.focus(disabled));
    assert!(!doc.focus(inside_hidden));
    assert!(!doc.focus(detached));
    assert!(doc.focus(span));
    assert_eq!(doc.tab_index(span), Some(-1));
    assert!(doc.focus(body));
    assert_eq!(doc.focused(), Some(body));

    doc.set_attribute(link, "HREF", "/home");
    assert_eq!(doc.attribute(link, "href"), Some("/home"));
    assert!(doc.focus(link));
    doc.blur();
    assert_eq!(doc.focused(), None);
}
