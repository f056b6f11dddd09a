//! Persistence gateway for the desk editor.
//!
//! [`PersistenceGateway`] is the boundary the editor session talks to;
//! [`HttpGateway`] is the REST implementation. Room fetch, owner list,
//! bulk save and single delete are the only remote operations.

pub mod client;
pub mod config;
pub mod error;

use async_trait::async_trait;
use deskplan_core::desk::Desk;
use deskplan_core::room::{OwnerOption, Room};
use deskplan_core::types::DbId;
use serde::Serialize;

pub use client::HttpGateway;
pub use config::GatewayConfig;
pub use error::GatewayError;

/// Filters for the owner combo list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl OwnerQuery {
    pub fn for_room(room_id: DbId) -> Self {
        Self {
            room_id: Some(room_id),
            search: None,
        }
    }
}

/// Remote operations the desk editor depends on.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Fetch room dimensions and background.
    async fn get_room(&self, room_id: DbId) -> Result<Room, GatewayError>;

    /// Fetch the saved desks of a room.
    async fn list_desks(&self, room_id: DbId) -> Result<Vec<Desk>, GatewayError>;

    /// Fetch selectable desk owners.
    async fn owner_options(&self, query: &OwnerQuery) -> Result<Vec<OwnerOption>, GatewayError>;

    /// Replace the room's desks with `desks`. Returns the room id echoed by
    /// the backend.
    async fn save_desks(&self, room_id: DbId, desks: &[Desk]) -> Result<DbId, GatewayError>;

    /// Delete one persisted desk. Returns the deleted id.
    async fn delete_desk(&self, desk_id: DbId) -> Result<DbId, GatewayError>;
}
