// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus requests deferred to the next frame.
//!
//! An element cannot take focus before it is laid out. Showing an overlay therefore only
//! schedules its initial focus; the host applies it after layout with
//! [`Layers::run_frame`](crate::Layers::run_frame).

use smallvec::SmallVec;
use veil_document::NodeId;

use crate::overlay::OverlayId;

/// At most one pending focus target per overlay, in scheduling order.
#[derive(Clone, Debug, Default)]
pub(crate) struct FrameQueue {
    entries: SmallVec<[(OverlayId, NodeId); 2]>,
}

impl FrameQueue {
    /// Schedule `target`, replacing any earlier request of `overlay`.
    pub(crate) fn schedule(&mut self, overlay: OverlayId, target: NodeId) {
        self.cancel(overlay);
        self.entries.push((overlay, target));
    }

    /// Drop the request of `overlay`.
    pub(crate) fn cancel(&mut self, overlay: OverlayId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(o, _)| *o != overlay);
        self.entries.len() != before
    }

    pub(crate) fn pending(&self, overlay: OverlayId) -> Option<NodeId> {
        self.entries
            .iter()
            .find(|(o, _)| *o == overlay)
            .map(|&(_, target)| target)
    }

    pub(crate) fn take(&mut self) -> SmallVec<[(OverlayId, NodeId); 2]> {
        core::mem::take(&mut self.entries)
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veil_document::{Document, ElementData};

    #[test]
    fn one_request_per_overlay() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = doc.insert(Some(body), ElementData::new("button"));
        let b = doc.insert(Some(body), ElementData::new("button"));
        let first = OverlayId::new(0, 1);
        let second = OverlayId::new(1, 1);

        let mut queue = FrameQueue::default();
        queue.schedule(first, a);
        queue.schedule(second, a);
        queue.schedule(first, b);
        assert_eq!(queue.pending(first), Some(b));

        assert!(queue.cancel(second));
        assert!(!queue.cancel(second));
        let taken = queue.take();
        assert_eq!(taken.as_slice(), &[(first, b)]);
        assert_eq!(queue.pending(first), None);
    }
}
