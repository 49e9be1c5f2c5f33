// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=veil_document --heading-base-level=0

//! Veil Document: a small, in-memory host document for accessible overlays.
//!
//! The overlay crates of this workspace (`veil_focus`, `veil_inert`, `veil_overlay`) need a
//! page to act on: elements with tags and attributes, a tree with document order, layout
//! boxes for visibility checks, and a notion of the focused element.
//! This crate provides exactly that and nothing more.
//!
//! ## Not a browser
//!
//! There is no parser, no style system and no layout engine here.
//! Upstream code mirrors the structure it cares about into a [`Document`] and reports
//! geometry with [`Document::set_layout`]. Think of this as the accessibility-relevant
//! projection of a UI tree, in the same way a box tree is the geometric projection of it.
//!
//! ## API overview
//!
//! - [`Document`]: the element arena, rooted at a `body` element.
//! - [`NodeId`]: generational handle of an element.
//! - [`ElementData`]: tag, attributes and layout used by [`Document::insert`].
//! - [`Selector`]: single-element selectors with comma lists, used to find close triggers,
//!   title and description markers.
//!
//! Key operations:
//! - [`Document::insert`] / [`Document::append_child`] / [`Document::remove`]
//! - [`Document::descendants`] (document order) and [`Document::ancestors`]
//! - [`Document::attribute`] / [`Document::set_attribute`] / [`Document::remove_attribute`]
//! - [`Document::tab_index`]: distinguishes an absent attribute from an explicit `0`.
//! - [`Document::focus`] / [`Document::focused`]: host focus rules.
//!
//! ## Example
//!
//! ```
//! use kurbo::Rect;
//! use veil_document::{Document, ElementData};
//!
//! let mut doc = Document::new();
//! let body = doc.body();
//! let button = doc.insert(
//!     Some(body),
//!     ElementData::new("button").with_layout(Rect::new(10.0, 10.0, 90.0, 34.0)),
//! );
//! assert!(doc.focus(button));
//! assert_eq!(doc.focused(), Some(button));
//! assert_eq!(doc.tab_index(button), None);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod document;
pub mod selector;
mod types;

pub use document::{Ancestors, DEFAULT_VIEWPORT, Descendants, Document};
pub use selector::{Selector, SelectorError};
pub use types::{ElementData, NodeId};
