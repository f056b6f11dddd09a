//! REST client for the desk backend.
//!
//! Wraps the room/desk HTTP endpoints using [`reqwest`]. Request and
//! response bodies are camelCase JSON.

use async_trait::async_trait;
use deskplan_core::desk::Desk;
use deskplan_core::room::{OwnerOption, Room};
use deskplan_core::types::DbId;
use serde::{Deserialize, Serialize};

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::{OwnerQuery, PersistenceGateway};

/// `{ "id": ... }` body returned by save and delete.
#[derive(Debug, Deserialize)]
struct IdResponse {
    id: DbId,
}

/// Body of the bulk save request.
#[derive(Debug, Serialize)]
struct SaveDesksRequest<'a> {
    desks: &'a [Desk],
}

/// HTTP implementation of [`PersistenceGateway`].
pub struct HttpGateway {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl HttpGateway {
    /// Build a gateway with its own connection pool and the configured
    /// request timeout.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self { client, config })
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: GatewayConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    /// Attach the bearer credential when one is configured.
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, GatewayError> {
        let response = self.authorize(request).send().await?;
        Self::ensure_success(response).await
    }

    /// Return the response unchanged on 2xx, or an [`GatewayError::Api`]
    /// carrying the status and body text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GatewayError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, GatewayError> {
        let response = self.send(request).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl PersistenceGateway for HttpGateway {
    async fn get_room(&self, room_id: DbId) -> Result<Room, GatewayError> {
        let request = self.client.get(self.url(&format!("/rooms/{room_id}")));
        self.parse_response(request).await
    }

    async fn list_desks(&self, room_id: DbId) -> Result<Vec<Desk>, GatewayError> {
        let request = self.client.get(self.url(&format!("/rooms/{room_id}/desks")));
        let desks: Vec<Desk> = self.parse_response(request).await?;
        tracing::debug!(room_id, count = desks.len(), "Desks fetched");
        Ok(desks)
    }

    async fn owner_options(&self, query: &OwnerQuery) -> Result<Vec<OwnerOption>, GatewayError> {
        let request = self.client.get(self.url("/desks/combo-list")).query(query);
        self.parse_response(request).await
    }

    async fn save_desks(&self, room_id: DbId, desks: &[Desk]) -> Result<DbId, GatewayError> {
        let request = self
            .client
            .post(self.url(&format!("/rooms/{room_id}/desks")))
            .json(&SaveDesksRequest { desks });
        let saved: IdResponse = self.parse_response(request).await?;
        tracing::info!(room_id, count = desks.len(), "Desks saved");
        Ok(saved.id)
    }

    async fn delete_desk(&self, desk_id: DbId) -> Result<DbId, GatewayError> {
        let request = self.client.delete(self.url(&format!("/desks/{desk_id}")));
        let deleted: IdResponse = self.parse_response(request).await?;
        tracing::info!(desk_id, "Desk deleted");
        Ok(deleted.id)
    }
}
