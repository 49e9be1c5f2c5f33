// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction errors.

use core::fmt;

use veil_document::{NodeId, SelectorError};

use crate::overlay::OverlayId;

/// Why an overlay could not be created.
///
/// These are configuration mistakes: an overlay that fails validation is never registered and
/// the document is left untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A created overlay was given no content.
    MissingContent,
    /// The adopted root is stale, or is the body.
    StaleRoot(NodeId),
    /// A content node is stale, or is the body.
    StaleContent(NodeId),
    /// The configured opener is stale.
    StaleOpener(NodeId),
    /// The adopted root already belongs to an overlay.
    AlreadyManaged(OverlayId),
    /// An overlay with a role resolves to no label: no `label` option, no `aria-label`, no
    /// `aria-labelledby` pointing inside the root, and no title element.
    MissingLabel,
    /// An `alertdialog` resolves to no description element.
    MissingDescription,
    /// A close trigger is required and the close selector matched nothing.
    MissingCloseTrigger,
    /// A selector option failed to parse.
    InvalidSelector(SelectorError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingContent => f.write_str("overlay has no content"),
            Self::StaleRoot(id) => write!(f, "overlay root {id:?} is not a usable element"),
            Self::StaleContent(id) => write!(f, "overlay content {id:?} is not a usable element"),
            Self::StaleOpener(id) => write!(f, "overlay opener {id:?} is not a live element"),
            Self::AlreadyManaged(owner) => {
                write!(f, "element is already the root of overlay {owner:?}")
            }
            Self::MissingLabel => f.write_str(
                "overlay with a role needs a label, an aria-labelledby target, or a title element",
            ),
            Self::MissingDescription => {
                f.write_str("alertdialog overlay needs an aria-describedby target or a description element")
            }
            Self::MissingCloseTrigger => {
                f.write_str("overlay needs a close trigger, and the close selector matched nothing")
            }
            Self::InvalidSelector(err) => write!(f, "invalid selector option: {err}"),
        }
    }
}

impl core::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::InvalidSelector(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SelectorError> for ConfigError {
    fn from(err: SelectorError) -> Self {
        Self::InvalidSelector(err)
    }
}
