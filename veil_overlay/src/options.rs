// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction input: what to build an overlay from, and how it behaves.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::slice;

use veil_document::NodeId;
use veil_focus::ScanPolicy;

/// Attribute marking the element that labels an overlay, unless a title selector is given.
pub const TITLE_ATTRIBUTE: &str = "data-label";

/// Attribute marking the element that describes an overlay.
pub const DESCRIPTION_ATTRIBUTE: &str = "data-description";

/// The semantic role of an overlay.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// `role="dialog"`.
    Dialog,
    /// `role="alertdialog"`: cannot be dismissed by Escape or a backdrop click.
    AlertDialog,
}

impl Role {
    /// Parse a `role` attribute value. Unknown roles yield `None`.
    pub fn from_attribute(value: &str) -> Option<Self> {
        match value.trim() {
            v if v.eq_ignore_ascii_case("dialog") => Some(Self::Dialog),
            v if v.eq_ignore_ascii_case("alertdialog") => Some(Self::AlertDialog),
            _ => None,
        }
    }

    /// The `role` attribute value.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dialog => "dialog",
            Self::AlertDialog => "alertdialog",
        }
    }
}

/// Detached elements placed into a created overlay root, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Content {
    /// A single subtree.
    Node(NodeId),
    /// Several subtrees.
    Nodes(Vec<NodeId>),
}

impl Content {
    /// The content roots.
    pub fn as_slice(&self) -> &[NodeId] {
        match self {
            Self::Node(node) => slice::from_ref(node),
            Self::Nodes(nodes) => nodes,
        }
    }
}

impl From<NodeId> for Content {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

impl From<Vec<NodeId>> for Content {
    fn from(nodes: Vec<NodeId>) -> Self {
        Self::Nodes(nodes)
    }
}

/// How to build the root of a new overlay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateConfig {
    /// What goes inside the root.
    pub content: Content,
    /// Tag of the root element; `div` when `None`.
    pub root_tag: Option<Box<str>>,
    /// `class` attribute of the root element.
    pub root_class: Option<Box<str>>,
}

impl CreateConfig {
    /// A `div` root holding `content`.
    pub fn new(content: impl Into<Content>) -> Self {
        Self {
            content: content.into(),
            root_tag: None,
            root_class: None,
        }
    }

    /// Use `tag` for the root element.
    #[must_use]
    pub fn with_root_tag(mut self, tag: &str) -> Self {
        self.root_tag = Some(tag.into());
        self
    }

    /// Set the `class` attribute of the root element.
    #[must_use]
    pub fn with_root_class(mut self, class: &str) -> Self {
        self.root_class = Some(class.into());
        self
    }
}

/// Where the root of an overlay comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OverlaySource {
    /// Manage an element that already exists.
    Adopt(NodeId),
    /// Create a root element around detached content.
    Create(CreateConfig),
}

/// Behavior of an overlay.
///
/// The defaults describe a modal overlay without role, dismissible by Escape and by a
/// backdrop click:
///
/// ```
/// use veil_overlay::{OverlayOptions, Role};
///
/// let options = OverlayOptions::default()
///     .with_role(Role::Dialog)
///     .with_label("Settings")
///     .with_close_selector("[data-close]");
/// assert!(options.modal);
/// assert!(options.close_on_cancel);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlayOptions {
    /// Semantic role. Adopted roots fall back to their `role` attribute.
    pub role: Option<Role>,
    /// Explicit `aria-label`.
    pub label: Option<Box<str>>,
    /// Selector of the descendants that close the overlay when clicked.
    pub close_selector: Option<Box<str>>,
    /// Fail construction when `close_selector` matches nothing.
    pub require_close_trigger: bool,
    /// Make the rest of the document inert while open.
    pub modal: bool,
    /// Let Escape and backdrop clicks close the overlay.
    pub close_on_cancel: bool,
    /// Element that receives focus back on close, instead of the element focused at `show`.
    pub opener: Option<NodeId>,
    /// Selector of the labelling element; `[data-label]` when `None`.
    pub title_selector: Option<Box<str>>,
    /// Rules used to pick the initially focused element.
    pub scan_policy: ScanPolicy,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            role: None,
            label: None,
            close_selector: None,
            require_close_trigger: false,
            modal: true,
            close_on_cancel: true,
            opener: None,
            title_selector: None,
            scan_policy: ScanPolicy::default(),
        }
    }
}

impl OverlayOptions {
    /// Set the role.
    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Set the `aria-label`.
    #[must_use]
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the close trigger selector.
    #[must_use]
    pub fn with_close_selector(mut self, selector: &str) -> Self {
        self.close_selector = Some(selector.into());
        self
    }

    /// Require at least one close trigger.
    #[must_use]
    pub fn with_required_close_trigger(mut self, required: bool) -> Self {
        self.require_close_trigger = required;
        self
    }

    /// Choose between a modal and a non-modal overlay.
    #[must_use]
    pub fn with_modal(mut self, modal: bool) -> Self {
        self.modal = modal;
        self
    }

    /// Allow or forbid dismissal by Escape and backdrop clicks.
    #[must_use]
    pub fn with_close_on_cancel(mut self, close_on_cancel: bool) -> Self {
        self.close_on_cancel = close_on_cancel;
        self
    }

    /// Set the element focused again on close.
    #[must_use]
    pub fn with_opener(mut self, opener: NodeId) -> Self {
        self.opener = Some(opener);
        self
    }

    /// Set the selector of the labelling element.
    #[must_use]
    pub fn with_title_selector(mut self, selector: &str) -> Self {
        self.title_selector = Some(selector.into());
        self
    }

    /// Set the initial focus rules.
    #[must_use]
    pub fn with_scan_policy(mut self, policy: ScanPolicy) -> Self {
        self.scan_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_parse_case_insensitively() {
        assert_eq!(Role::from_attribute(" Dialog "), Some(Role::Dialog));
        assert_eq!(Role::from_attribute("ALERTDIALOG"), Some(Role::AlertDialog));
        assert_eq!(Role::from_attribute("menu"), None);
        assert_eq!(Role::AlertDialog.as_str(), "alertdialog");
    }
}
