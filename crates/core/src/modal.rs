//! State machine for the add/edit desk modal.
//!
//! ```text
//! Closed -> Open(Add | Edit) -> submit ok          -> Closed (commit)
//!                            -> request_close dirty -> ConfirmDiscard
//!                                                      -> confirm_discard -> Closed
//!                                                      -> keep_editing    -> Open
//! ```
//!
//! Submitting is synchronous: validation and conversion happen within the
//! `submit` call, so there is no observable in-between state.

use crate::desk::{Desk, DeskPatch};
use crate::form::{DeskForm, FormErrors};
use crate::types::ClientId;

/// Which desk a modal is editing.
#[derive(Debug, Clone, PartialEq)]
pub enum ModalMode {
    Add,
    Edit(ClientId),
}

/// What a successful submit hands to the canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum ModalCommit {
    Add(Desk),
    Edit { client_id: ClientId, patch: DeskPatch },
}

/// Outcome of asking the modal to close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseRequest {
    Closed,
    /// The form has unsaved changes; the host must ask before discarding.
    NeedsConfirmation,
}

#[derive(Debug, Clone, PartialEq)]
enum ModalState {
    Closed,
    Open(OpenForm),
    ConfirmDiscard(OpenForm),
}

#[derive(Debug, Clone, PartialEq)]
struct OpenForm {
    mode: ModalMode,
    initial: DeskForm,
    current: DeskForm,
    errors: FormErrors,
}

impl OpenForm {
    fn new(mode: ModalMode, form: DeskForm) -> Self {
        Self {
            mode,
            initial: form.clone(),
            current: form,
            errors: FormErrors::default(),
        }
    }
}

/// One add or edit desk modal.
#[derive(Debug, Clone, PartialEq)]
pub struct DeskModal {
    state: ModalState,
}

impl Default for DeskModal {
    fn default() -> Self {
        Self::new()
    }
}

impl DeskModal {
    pub fn new() -> Self {
        Self {
            state: ModalState::Closed,
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, ModalState::Closed)
    }

    pub fn is_confirming_discard(&self) -> bool {
        matches!(self.state, ModalState::ConfirmDiscard(_))
    }

    pub fn mode(&self) -> Option<&ModalMode> {
        self.open_form().map(|f| &f.mode)
    }

    /// Current form values, if open.
    pub fn form(&self) -> Option<&DeskForm> {
        self.open_form().map(|f| &f.current)
    }

    /// Mutable access to the form values while the modal is open for editing.
    pub fn form_mut(&mut self) -> Option<&mut DeskForm> {
        match &mut self.state {
            ModalState::Open(f) => Some(&mut f.current),
            _ => None,
        }
    }

    /// Validation messages from the last failed submit.
    pub fn errors(&self) -> Option<&FormErrors> {
        self.open_form().map(|f| &f.errors)
    }

    /// Open a blank add form.
    pub fn open_add(&mut self) {
        self.state = ModalState::Open(OpenForm::new(ModalMode::Add, DeskForm::blank()));
    }

    /// Open the edit form pre-filled from `desk`.
    pub fn open_edit(&mut self, desk: &Desk) {
        self.state = ModalState::Open(OpenForm::new(
            ModalMode::Edit(desk.client_id.clone()),
            DeskForm::from_desk(desk),
        ));
    }

    /// Replace the form values. Ignored unless the modal is open.
    pub fn update(&mut self, form: DeskForm) {
        if let Some(current) = self.form_mut() {
            *current = form;
        }
    }

    /// Whether the form differs from what it was opened with.
    pub fn is_dirty(&self) -> bool {
        self.open_form().is_some_and(|f| f.current != f.initial)
    }

    /// Try to close. A dirty form moves to the discard confirmation.
    pub fn request_close(&mut self) -> CloseRequest {
        match std::mem::replace(&mut self.state, ModalState::Closed) {
            ModalState::Open(form) if form.current != form.initial => {
                self.state = ModalState::ConfirmDiscard(form);
                CloseRequest::NeedsConfirmation
            }
            ModalState::ConfirmDiscard(form) => {
                self.state = ModalState::ConfirmDiscard(form);
                CloseRequest::NeedsConfirmation
            }
            ModalState::Open(_) | ModalState::Closed => CloseRequest::Closed,
        }
    }

    /// Discard changes and close.
    pub fn confirm_discard(&mut self) {
        if self.is_confirming_discard() {
            self.state = ModalState::Closed;
        }
    }

    /// Back out of the discard prompt and keep the form open.
    pub fn keep_editing(&mut self) {
        if let ModalState::ConfirmDiscard(form) = std::mem::replace(&mut self.state, ModalState::Closed) {
            self.state = ModalState::Open(form);
        }
    }

    /// Validate and close with a commit, or stay open with inline errors.
    ///
    /// Returns `None` when the modal is not open for editing.
    pub fn submit(&mut self) -> Option<Result<ModalCommit, FormErrors>> {
        let ModalState::Open(open) = &mut self.state else {
            return None;
        };

        let commit = match &open.mode {
            ModalMode::Add => open.current.to_new_desk().map(ModalCommit::Add),
            ModalMode::Edit(client_id) => open.current.to_patch().map(|patch| ModalCommit::Edit {
                client_id: client_id.clone(),
                patch,
            }),
        };

        match commit {
            Ok(commit) => {
                self.state = ModalState::Closed;
                Some(Ok(commit))
            }
            Err(errors) => {
                open.errors = errors.clone();
                Some(Err(errors))
            }
        }
    }

    fn open_form(&self) -> Option<&OpenForm> {
        match &self.state {
            ModalState::Open(f) | ModalState::ConfirmDiscard(f) => Some(f),
            ModalState::Closed => None,
        }
    }
}
