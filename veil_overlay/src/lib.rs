// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=veil_overlay --heading-base-level=0

//! Veil Overlay: accessible modal dialogs and a stack of overlay layers.
//!
//! This crate drives the open/close state machine of overlays following the WAI-ARIA dialog
//! pattern, on top of a [`veil_document::Document`]:
//!
//! - **Initial focus**: opening an overlay scans it with [`veil_focus::find_first_focusable`]
//!   and focuses the result on the next frame ([`Layers::run_frame`]).
//! - **Inertness**: opening a modal overlay takes the rest of the document out of the tab
//!   order and the accessibility tree ([`veil_inert::Inertness`]); closing the last modal
//!   overlay restores it exactly.
//! - **Layering**: open overlays form a [`LayerStack`]. Escape only reaches the topmost one,
//!   and any layer can be closed, not just the top.
//! - **Focus restoration**: closing returns focus to the opener, or to its nearest focusable
//!   ancestor when the opener was a graphic primitive.
//!
//! ## Lifecycle
//!
//! ```text
//! Closed --show--> Open --close / hide / cancel / trigger / Enter--> Closed
//! ```
//!
//! Showing pushes the overlay on the stack, binds its inputs, resolves the opener, fires
//! [`EventKind::Show`], exposes the root (`aria-hidden="false"`), picks the initial focus and
//! makes the document inert. Closing unbinds, records the return value, fires
//! [`EventKind::Close`], hides the root, re-enables the document once no other modal is
//! open, leaves the stack and focuses the opener.
//!
//! `alertdialog` overlays ignore Escape and backdrop clicks; they close through a close
//! trigger or a programmatic [`Layers::close`].
//!
//! ## Construction
//!
//! [`Layers::create`] either adopts an existing element ([`OverlaySource::Adopt`]) or builds a
//! root around detached content ([`OverlaySource::Create`]). Overlays with a role must be
//! labelled; `alertdialog` overlays must also be described. Violations are reported as
//! [`ConfigError`] and leave the document untouched.
//!
//! ## Example
//!
//! ```
//! use kurbo::Rect;
//! use veil_document::{Document, ElementData};
//! use veil_overlay::{CreateConfig, Layers, OverlayOptions, OverlaySource};
//!
//! let mut doc = Document::new();
//! let body = doc.body();
//! let save = doc.insert(
//!     Some(body),
//!     ElementData::new("button").with_layout(Rect::new(0.0, 0.0, 60.0, 20.0)),
//! );
//! doc.focus(save);
//!
//! let content = doc.insert(None, ElementData::new("form"));
//! let close = doc.insert(
//!     Some(content),
//!     ElementData::new("button")
//!         .with_attribute("class", "close")
//!         .with_layout(Rect::new(0.0, 0.0, 20.0, 20.0)),
//! );
//!
//! let mut layers = Layers::new();
//! let id = layers
//!     .create(
//!         &mut doc,
//!         OverlaySource::Create(CreateConfig::new(content)),
//!         OverlayOptions::default().with_close_selector(".close"),
//!     )
//!     .unwrap();
//!
//! layers.show(&mut doc, id);
//! layers.run_frame(&mut doc);
//! // The close button is the only interactive element, so it gets focus.
//! assert_eq!(doc.focused(), Some(close));
//!
//! layers.handle_click(&mut doc, close);
//! assert_eq!(doc.focused(), Some(save));
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards to the document crates.
//! - `libm`: `no_std` floating point support.
//! - `tracing`: emit `tracing` events for transitions and inertness passes.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod events;
mod frame;
mod layers;
mod options;
mod overlay;
mod stack;

pub use error::ConfigError;
pub use events::{CloseReason, EventCx, EventKind, Key, ListenerId};
pub use layers::Layers;
pub use options::{
    Content, CreateConfig, DESCRIPTION_ATTRIBUTE, OverlayOptions, OverlaySource, Role,
    TITLE_ATTRIBUTE,
};
pub use overlay::{Bindings, Overlay, OverlayId, OverlayState};
pub use stack::LayerStack;
