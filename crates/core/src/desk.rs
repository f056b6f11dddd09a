//! Desk entity and its editable subset.

use serde::{Deserialize, Serialize};

use crate::placement::Point;
use crate::types::{ClientId, DbId};

/// A desk placed on a room canvas.
///
/// `client_id` is the stable identity for the whole editing session;
/// `desk_id` only appears once the backend has persisted the desk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Desk {
    /// Backends that never stored a client id get a fresh one on load.
    #[serde(default = "ClientId::generate")]
    pub client_id: ClientId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desk_id: Option<DbId>,
    pub name: String,
    pub position_x: f64,
    pub position_y: f64,
    /// Pixel width, kept string-encoded as the forms produce it.
    pub width: String,
    /// Pixel height, kept string-encoded as the forms produce it.
    pub height: String,
    /// Percentage in `[5, 100]`.
    pub opacity: f64,
    pub background_color: String,
    #[serde(default)]
    pub owner_id: Option<DbId>,
}

impl Desk {
    /// Top-left anchor in canvas coordinates.
    pub fn position(&self) -> Point {
        Point::new(self.position_x, self.position_y)
    }

    pub fn set_position(&mut self, point: Point) {
        self.position_x = point.x;
        self.position_y = point.y;
    }

    /// Whether the backend knows about this desk.
    pub fn is_persisted(&self) -> bool {
        self.desk_id.is_some()
    }

    /// Parsed pixel width, `None` if the stored string is not numeric.
    pub fn width_px(&self) -> Option<f64> {
        self.width.trim().parse().ok()
    }

    /// Parsed pixel height, `None` if the stored string is not numeric.
    pub fn height_px(&self) -> Option<f64> {
        self.height.trim().parse().ok()
    }

    #[cfg(test)]
    pub(crate) fn sample(client_id: &str) -> Self {
        Self {
            client_id: ClientId::from(client_id),
            desk_id: None,
            name: format!("Desk {client_id}"),
            position_x: 0.0,
            position_y: 0.0,
            width: "100".to_string(),
            height: "100".to_string(),
            opacity: 100.0,
            background_color: "#1677ff".to_string(),
            owner_id: None,
        }
    }
}

/// The mutable, form-editable fields of a desk.
///
/// Identity (`client_id`, `desk_id`) and position are never part of a patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeskPatch {
    pub name: String,
    pub owner_id: Option<DbId>,
    pub width: String,
    pub height: String,
    pub opacity: f64,
    pub background_color: String,
}

impl DeskPatch {
    /// Overwrite the desk's editable fields with this patch.
    pub fn apply_to(self, desk: &mut Desk) {
        desk.name = self.name;
        desk.owner_id = self.owner_id;
        desk.width = self.width;
        desk.height = self.height;
        desk.opacity = self.opacity;
        desk.background_color = self.background_color;
    }
}
