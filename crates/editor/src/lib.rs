//! `deskplan-editor` library crate.
//!
//! Exposes the [`DeskEditor`] session for hosts and integration tests. The
//! `deskplan-sync` binary lives in `main.rs`.

pub mod error;
pub mod session;

pub use error::{EditorError, EditorResult};
pub use session::{ActionOutcome, DeskEditor, PendingRemoval, RemoveRequest};
