use deskplan_core::error::CoreError;
use deskplan_core::form::FormErrors;
use deskplan_gateway::GatewayError;

/// Errors surfaced by a [`DeskEditor`](crate::DeskEditor) session.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// A domain-level error from `deskplan_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The form did not pass validation; the modal stays open.
    #[error("Invalid desk form: {0}")]
    Form(#[from] FormErrors),

    /// A remote call failed. A notice has already been published.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// `confirm_remove` was called with nothing awaiting confirmation.
    #[error("No desk removal is awaiting confirmation")]
    NoPendingRemoval,

    /// A submit was attempted while the modal was closed.
    #[error("The {0} desk modal is not open")]
    ModalClosed(&'static str),
}

/// Convenience alias for editor results.
pub type EditorResult<T> = Result<T, EditorError>;
