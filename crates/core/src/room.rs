//! Read-only room context and the owner list used by the desk forms.

use serde::{Deserialize, Serialize};

use crate::placement::CanvasBounds;
use crate::types::DbId;

/// The room a canvas is laid out on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: DbId,
    #[serde(default)]
    pub name: String,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub background_image_url: Option<String>,
}

impl Room {
    pub fn bounds(&self) -> CanvasBounds {
        CanvasBounds::new(self.width, self.height)
    }
}

/// One selectable owner, as returned by the desks combo-list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerOption {
    pub id: DbId,
    pub name: String,
}

/// Look up the display label for a desk owner.
pub fn resolve_owner_label(owner_id: Option<DbId>, owners: &[OwnerOption]) -> Option<&str> {
    let owner_id = owner_id?;
    owners
        .iter()
        .find(|o| o.id == owner_id)
        .map(|o| o.name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owners() -> Vec<OwnerOption> {
        vec![
            OwnerOption { id: 1, name: "Aziza".to_string() },
            OwnerOption { id: 2, name: "Bekzod".to_string() },
        ]
    }

    #[test]
    fn resolves_known_owner() {
        assert_eq!(resolve_owner_label(Some(2), &owners()), Some("Bekzod"));
    }

    #[test]
    fn unknown_or_missing_owner_has_no_label() {
        assert_eq!(resolve_owner_label(Some(99), &owners()), None);
        assert_eq!(resolve_owner_label(None, &owners()), None);
    }

    #[test]
    fn room_deserializes_from_camel_case() {
        let room: Room = serde_json::from_value(serde_json::json!({
            "id": 5,
            "name": "Open space",
            "width": 1400,
            "height": 800,
            "backgroundImageUrl": "https://cdn.example.com/plan.png"
        }))
        .unwrap();
        assert_eq!(room.bounds(), CanvasBounds::new(1400.0, 800.0));
        assert!(room.background_image_url.is_some());
    }
}
