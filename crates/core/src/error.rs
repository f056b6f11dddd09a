#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl CoreError {
    /// Shorthand for a missing desk, keyed by its client id.
    pub fn desk_not_found(client_id: impl ToString) -> Self {
        Self::NotFound {
            entity: "Desk",
            id: client_id.to_string(),
        }
    }
}
