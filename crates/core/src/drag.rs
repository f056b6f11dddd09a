//! Pointer gesture tracking for dragging a single desk.
//!
//! A press only becomes a drag once the pointer has travelled past
//! [`DRAG_ACTIVATION_DISTANCE_PX`]; releasing before that is a plain click
//! and produces no commit.

use crate::placement::{Delta, Point};
use crate::types::ClientId;

/// Pointer travel (pixels, Euclidean) required before a press becomes a drag.
pub const DRAG_ACTIVATION_DISTANCE_PX: f64 = 5.0;

/// An in-progress pointer gesture on one desk.
#[derive(Debug, Clone, PartialEq)]
pub struct DragGesture {
    client_id: ClientId,
    origin: Point,
    delta: Delta,
    activated: bool,
}

impl DragGesture {
    /// Pointer pressed on a desk at `origin` (client coordinates).
    pub fn start(client_id: ClientId, origin: Point) -> Self {
        Self {
            client_id,
            origin,
            delta: Delta::ZERO,
            activated: false,
        }
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    /// Delta to render for live feedback. Zero until the drag activates.
    pub fn live_delta(&self) -> Delta {
        if self.activated {
            self.delta
        } else {
            Delta::ZERO
        }
    }

    /// Pointer moved. Returns the live delta.
    pub fn update(&mut self, pointer: Point) -> Delta {
        self.delta = Delta::new(pointer.x - self.origin.x, pointer.y - self.origin.y);
        if !self.activated && self.delta.distance() > DRAG_ACTIVATION_DISTANCE_PX {
            self.activated = true;
        }
        self.live_delta()
    }

    /// Pointer released. Returns the delta to commit, or `None` for a press
    /// that never activated.
    pub fn finish(mut self, pointer: Point) -> Option<Delta> {
        self.update(pointer);
        self.activated.then_some(self.delta)
    }
}
