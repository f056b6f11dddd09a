//! Derived view state for one desk on the canvas, and the per-item actions.

use serde::Serialize;

use crate::desk::Desk;
use crate::placement::Delta;
use crate::types::ClientId;

/// Actions exposed by a desk item's menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeskAction {
    /// Open the edit form pre-filled with this desk.
    Edit,
    /// Remove the desk (immediately, or after confirmation if persisted).
    Remove,
}

/// Everything a host needs to draw one desk.
///
/// Purely derived from the [`Desk`] plus the live drag delta; holds no state
/// of its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeskItemView {
    pub client_id: ClientId,
    pub label: String,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// Opacity as a `0.0..=1.0` fraction.
    pub opacity: f64,
    pub background_color: String,
    pub dragging: bool,
}

impl DeskItemView {
    /// Derive the view for `desk`, offset by `live_delta` while dragging.
    ///
    /// Unparsable sizes render as zero; the forms never produce them.
    pub fn derive(desk: &Desk, live_delta: Option<Delta>) -> Self {
        let delta = live_delta.unwrap_or(Delta::ZERO);
        Self {
            client_id: desk.client_id.clone(),
            label: desk.name.clone(),
            left: desk.position_x + delta.dx,
            top: desk.position_y + delta.dy,
            width: desk.width_px().unwrap_or(0.0),
            height: desk.height_px().unwrap_or(0.0),
            opacity: (desk.opacity / 100.0).clamp(0.0, 1.0),
            background_color: desk.background_color.clone(),
            dragging: live_delta.is_some(),
        }
    }
}
