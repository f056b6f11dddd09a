//! Desk editing session for one room.
//!
//! [`DeskEditor`] ties the in-memory [`LayoutCanvas`] to the add/edit
//! modals, pointer gestures, and the remote [`PersistenceGateway`]. Pure
//! canvas operations never suspend; only load, delete and save await the
//! gateway. A persisted desk is only dropped from the canvas after its
//! remote delete succeeds.

use std::fmt;
use std::sync::Arc;

use deskplan_core::canvas::{DragCommit, LayoutCanvas, Removal};
use deskplan_core::desk::Desk;
use deskplan_core::drag::DragGesture;
use deskplan_core::error::CoreError;
use deskplan_core::item::{DeskAction, DeskItemView};
use deskplan_core::modal::{DeskModal, ModalCommit, ModalMode};
use deskplan_core::placement::{CanvasBounds, Delta, Point};
use deskplan_core::room::{resolve_owner_label, OwnerOption, Room};
use deskplan_core::types::{ClientId, DbId};
use deskplan_events::{Notice, NoticeBus};
use deskplan_gateway::{OwnerQuery, PersistenceGateway};

use crate::error::{EditorError, EditorResult};

/// A persisted desk waiting for the user to confirm its deletion.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRemoval {
    pub client_id: ClientId,
    pub desk_id: DbId,
    pub name: String,
}

/// Outcome of asking to remove a desk.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoveRequest {
    /// Never persisted; already gone from the canvas.
    Removed(Desk),
    /// Persisted; call [`DeskEditor::confirm_remove`] or
    /// [`DeskEditor::cancel_remove`].
    AwaitingConfirmation(PendingRemoval),
}

/// Outcome of a per-item menu action.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    EditOpened,
    Remove(RemoveRequest),
}

/// Editing session for the desks of one room.
pub struct DeskEditor {
    room: Room,
    canvas: LayoutCanvas,
    owners: Vec<OwnerOption>,
    gateway: Arc<dyn PersistenceGateway>,
    notices: Arc<NoticeBus>,
    gesture: Option<DragGesture>,
    pending_removal: Option<PendingRemoval>,
    add_modal: DeskModal,
    edit_modal: DeskModal,
}

impl fmt::Debug for DeskEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeskEditor")
            .field("room", &self.room)
            .field("canvas", &self.canvas)
            .field("owners", &self.owners)
            .field("gesture", &self.gesture)
            .field("pending_removal", &self.pending_removal)
            .field("add_modal", &self.add_modal)
            .field("edit_modal", &self.edit_modal)
            .finish_non_exhaustive()
    }
}

impl DeskEditor {
    /// Build a session from already-fetched data.
    pub fn new(
        gateway: Arc<dyn PersistenceGateway>,
        room: Room,
        desks: Vec<Desk>,
        owners: Vec<OwnerOption>,
        notices: Arc<NoticeBus>,
    ) -> Self {
        let mut canvas = LayoutCanvas::new(room.bounds());
        canvas.initialize(desks);
        Self {
            room,
            canvas,
            owners,
            gateway,
            notices,
            gesture: None,
            pending_removal: None,
            add_modal: DeskModal::new(),
            edit_modal: DeskModal::new(),
        }
    }

    /// Fetch a room, its desks and the owner list, then open a session.
    pub async fn load(
        gateway: Arc<dyn PersistenceGateway>,
        room_id: DbId,
        notices: Arc<NoticeBus>,
    ) -> EditorResult<Self> {
        let owner_query = OwnerQuery::for_room(room_id);
        let fetched = tokio::try_join!(
            gateway.get_room(room_id),
            gateway.list_desks(room_id),
            gateway.owner_options(&owner_query),
        );

        let (room, desks, owners) = match fetched {
            Ok(parts) => parts,
            Err(e) => {
                tracing::error!(room_id, error = %e, "Failed to load room layout");
                notices.publish(Notice::error(format!("Failed to load room: {e}")));
                return Err(e.into());
            }
        };

        tracing::info!(
            room_id,
            desks = desks.len(),
            owners = owners.len(),
            "Room layout loaded",
        );

        Ok(Self::new(gateway, room, desks, owners, notices))
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn room(&self) -> &Room {
        &self.room
    }

    pub fn canvas(&self) -> &LayoutCanvas {
        &self.canvas
    }

    pub fn desks(&self) -> &[Desk] {
        self.canvas.desks()
    }

    pub fn owners(&self) -> &[OwnerOption] {
        &self.owners
    }

    /// Display label of a desk's owner, if it resolves against the list.
    pub fn owner_label(&self, desk: &Desk) -> Option<&str> {
        resolve_owner_label(desk.owner_id, &self.owners)
    }

    pub fn pending_removal(&self) -> Option<&PendingRemoval> {
        self.pending_removal.as_ref()
    }

    pub fn add_modal(&self) -> &DeskModal {
        &self.add_modal
    }

    pub fn add_modal_mut(&mut self) -> &mut DeskModal {
        &mut self.add_modal
    }

    pub fn edit_modal(&self) -> &DeskModal {
        &self.edit_modal
    }

    pub fn edit_modal_mut(&mut self) -> &mut DeskModal {
        &mut self.edit_modal
    }

    /// The rendered canvas container changed size.
    pub fn resize(&mut self, bounds: CanvasBounds) {
        self.canvas.set_bounds(bounds);
    }

    /// Render state for every desk, including live drag feedback.
    pub fn item_views(&self) -> Vec<DeskItemView> {
        self.canvas
            .desks()
            .iter()
            .map(|desk| DeskItemView::derive(desk, self.live_delta_for(&desk.client_id)))
            .collect()
    }

    fn live_delta_for(&self, client_id: &ClientId) -> Option<Delta> {
        self.gesture
            .as_ref()
            .filter(|g| g.client_id() == client_id && g.is_activated())
            .map(DragGesture::live_delta)
    }

    // -----------------------------------------------------------------------
    // Pointer drag
    // -----------------------------------------------------------------------

    /// Pointer pressed on a desk.
    pub fn pointer_down(&mut self, client_id: &ClientId, pointer: Point) -> EditorResult<()> {
        self.canvas.begin_drag(client_id)?;
        self.gesture = Some(DragGesture::start(client_id.clone(), pointer));
        Ok(())
    }

    /// Pointer moved. Returns the dragged desk's view once the drag is live.
    pub fn pointer_move(&mut self, pointer: Point) -> Option<DeskItemView> {
        let gesture = self.gesture.as_mut()?;
        gesture.update(pointer);
        let client_id = gesture.client_id().clone();
        let delta = self.live_delta_for(&client_id)?;
        let desk = self.canvas.desk(&client_id)?;
        Some(DeskItemView::derive(desk, Some(delta)))
    }

    /// Pointer released. Commits the drag if it ever activated.
    pub fn pointer_up(&mut self, pointer: Point) -> Option<DragCommit> {
        let gesture = self.gesture.take()?;
        let client_id = gesture.client_id().clone();
        let commit = gesture
            .finish(pointer)
            .map(|delta| self.canvas.commit_drag(&client_id, delta));
        self.canvas.end_drag();
        commit
    }

    /// Gesture aborted by the host (pointer lost, escape key).
    pub fn pointer_cancel(&mut self) {
        self.gesture = None;
        self.canvas.end_drag();
    }

    // -----------------------------------------------------------------------
    // Item actions
    // -----------------------------------------------------------------------

    /// Single dispatch point for per-item menu actions.
    pub fn handle_action(&mut self, client_id: &ClientId, action: DeskAction) -> EditorResult<ActionOutcome> {
        match action {
            DeskAction::Edit => {
                self.open_edit(client_id)?;
                Ok(ActionOutcome::EditOpened)
            }
            DeskAction::Remove => self.request_remove(client_id).map(ActionOutcome::Remove),
        }
    }

    // -----------------------------------------------------------------------
    // Add / edit
    // -----------------------------------------------------------------------

    pub fn open_add(&mut self) {
        self.add_modal.open_add();
    }

    /// Open the edit modal pre-filled from the selected desk.
    pub fn open_edit(&mut self, client_id: &ClientId) -> EditorResult<()> {
        let desk = self
            .canvas
            .desk(client_id)
            .ok_or_else(|| CoreError::desk_not_found(client_id))?;
        self.edit_modal.open_edit(desk);
        Ok(())
    }

    /// Submit the add modal. On success the new desk is on the canvas.
    pub fn submit_add(&mut self) -> EditorResult<ClientId> {
        let commit = self
            .add_modal
            .submit()
            .ok_or(EditorError::ModalClosed("add"))??;
        self.apply_commit(commit)
    }

    /// Submit the edit modal. On success the desk's fields are replaced.
    ///
    /// If the target desk is gone from the canvas the modal stays open with
    /// the typed values intact.
    pub fn submit_edit(&mut self) -> EditorResult<ClientId> {
        if let Some(ModalMode::Edit(client_id)) = self.edit_modal.mode() {
            if self.canvas.desk(client_id).is_none() {
                return Err(CoreError::desk_not_found(client_id).into());
            }
        }
        let commit = self
            .edit_modal
            .submit()
            .ok_or(EditorError::ModalClosed("edit"))??;
        self.apply_commit(commit)
    }

    fn apply_commit(&mut self, commit: ModalCommit) -> EditorResult<ClientId> {
        match commit {
            ModalCommit::Add(desk) => {
                let client_id = desk.client_id.clone();
                self.canvas.add_desk(desk)?;
                Ok(client_id)
            }
            ModalCommit::Edit { client_id, patch } => {
                self.canvas.edit_desk(&client_id, patch)?;
                Ok(client_id)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Remove
    // -----------------------------------------------------------------------

    /// Remove an unsaved desk now, or park a persisted one for confirmation.
    pub fn request_remove(&mut self, client_id: &ClientId) -> EditorResult<RemoveRequest> {
        match self.canvas.remove_desk(client_id)? {
            Removal::Removed(desk) => Ok(RemoveRequest::Removed(desk)),
            Removal::NeedsConfirmation { client_id, desk_id } => {
                let name = self
                    .canvas
                    .desk(&client_id)
                    .map(|d| d.name.clone())
                    .unwrap_or_default();
                let pending = PendingRemoval {
                    client_id,
                    desk_id,
                    name,
                };
                self.pending_removal = Some(pending.clone());
                Ok(RemoveRequest::AwaitingConfirmation(pending))
            }
        }
    }

    /// The user dismissed the delete confirmation.
    pub fn cancel_remove(&mut self) {
        self.pending_removal = None;
    }

    /// Delete the pending desk remotely, then drop it from the canvas.
    ///
    /// On failure the desk stays on the canvas and an error notice is
    /// published.
    pub async fn confirm_remove(&mut self) -> EditorResult<Desk> {
        let pending = self
            .pending_removal
            .take()
            .ok_or(EditorError::NoPendingRemoval)?;

        if let Err(e) = self.gateway.delete_desk(pending.desk_id).await {
            tracing::warn!(
                desk_id = pending.desk_id,
                client_id = %pending.client_id,
                error = %e,
                "Desk delete failed",
            );
            self.notices
                .publish(Notice::error(format!("Failed to delete desk \"{}\": {e}", pending.name)));
            return Err(e.into());
        }

        let desk = self
            .canvas
            .remove_confirmed(&pending.client_id)
            .ok_or_else(|| CoreError::desk_not_found(&pending.client_id))?;

        tracing::info!(desk_id = pending.desk_id, client_id = %pending.client_id, "Desk removed");
        self.notices
            .publish(Notice::success(format!("Desk \"{}\" deleted", pending.name)));
        Ok(desk)
    }

    // -----------------------------------------------------------------------
    // Save
    // -----------------------------------------------------------------------

    /// Send the whole working set to the backend. No retry on failure.
    pub async fn save(&self) -> EditorResult<DbId> {
        let room_id = self.room.id;
        match self.gateway.save_desks(room_id, self.canvas.desks()).await {
            Ok(id) => {
                tracing::info!(room_id, desks = self.canvas.desks().len(), "Layout saved");
                self.notices.publish(Notice::success("Layout saved"));
                Ok(id)
            }
            Err(e) => {
                tracing::error!(room_id, error = %e, "Layout save failed");
                self.notices
                    .publish(Notice::error(format!("Failed to save layout: {e}")));
                Err(e.into())
            }
        }
    }
}
