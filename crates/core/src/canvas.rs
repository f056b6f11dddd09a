//! Layout canvas: the single owner of a room's desk working set.
//!
//! Every mutation of the desk list goes through [`LayoutCanvas`]. Visual
//! items and forms only ever hand it a desk, a patch, or a client id.
//! Placement conflicts are not errors: a rejected drag leaves the desk where
//! it was and reports [`DragCommit::Rejected`].

use crate::desk::{Desk, DeskPatch};
use crate::error::CoreError;
use crate::placement::{self, CanvasBounds, Delta, Point};
use crate::types::{ClientId, DbId};

/// Result of committing a drag.
#[derive(Debug, Clone, PartialEq)]
pub enum DragCommit {
    /// The desk moved to the clamped candidate.
    Moved { from: Point, to: Point },
    /// The clamped candidate overlapped another desk; nothing changed.
    Rejected { from: Point, conflict_with: ClientId },
    /// The delta was NaN or infinite; nothing changed.
    Discarded { from: Point },
    /// No desk with that client id is on the canvas.
    Unknown,
}

impl DragCommit {
    pub fn is_moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

/// Result of asking the canvas to remove a desk.
#[derive(Debug, Clone, PartialEq)]
pub enum Removal {
    /// The desk was never persisted and has been dropped from the canvas.
    Removed(Desk),
    /// The desk exists on the backend. It stays on the canvas until a
    /// confirmed remote delete succeeds.
    NeedsConfirmation { client_id: ClientId, desk_id: DbId },
}

/// In-memory desk layout for one room.
#[derive(Debug, Clone)]
pub struct LayoutCanvas {
    bounds: CanvasBounds,
    desks: Vec<Desk>,
    active: Option<ClientId>,
}

impl LayoutCanvas {
    pub fn new(bounds: CanvasBounds) -> Self {
        Self {
            bounds,
            desks: Vec::new(),
            active: None,
        }
    }

    /// Replace the working set with desks loaded from storage.
    ///
    /// Loaded desks are trusted; no bounds or overlap checks run here.
    pub fn initialize(&mut self, desks: Vec<Desk>) {
        tracing::debug!(count = desks.len(), "Canvas initialized");
        self.desks = desks;
        self.active = None;
    }

    pub fn desks(&self) -> &[Desk] {
        &self.desks
    }

    pub fn into_desks(self) -> Vec<Desk> {
        self.desks
    }

    pub fn desk(&self, client_id: &ClientId) -> Option<&Desk> {
        self.desks.iter().find(|d| &d.client_id == client_id)
    }

    pub fn bounds(&self) -> CanvasBounds {
        self.bounds
    }

    /// Update the canvas size after the container was resized.
    pub fn set_bounds(&mut self, bounds: CanvasBounds) {
        self.bounds = bounds;
    }

    // -----------------------------------------------------------------------
    // Drag lifecycle
    // -----------------------------------------------------------------------

    pub fn active_drag(&self) -> Option<&ClientId> {
        self.active.as_ref()
    }

    /// Mark `client_id` as the desk being dragged.
    ///
    /// Only one desk is dragged at a time; starting a new drag replaces the
    /// previous marker.
    pub fn begin_drag(&mut self, client_id: &ClientId) -> Result<(), CoreError> {
        if self.desk(client_id).is_none() {
            return Err(CoreError::desk_not_found(client_id));
        }
        if let Some(previous) = self.active.replace(client_id.clone()) {
            if &previous != client_id {
                tracing::debug!(%previous, next = %client_id, "Replacing active drag");
            }
        }
        Ok(())
    }

    /// Apply a drag delta to a desk, subject to bounds and overlap rules.
    ///
    /// The candidate `position + delta` is clamped into the canvas, then
    /// checked against every other desk. An overlap leaves the desk's
    /// position untouched.
    pub fn commit_drag(&mut self, client_id: &ClientId, delta: Delta) -> DragCommit {
        let Some(index) = self.index_of(client_id) else {
            return DragCommit::Unknown;
        };

        let from = self.desks[index].position();
        if !delta.is_finite() {
            tracing::warn!(%client_id, dx = delta.dx, dy = delta.dy, "Drag discarded: non-finite delta");
            return DragCommit::Discarded { from };
        }
        let candidate = placement::clamp_to_bounds(from.offset(delta), self.bounds);

        if let Some(other) = placement::find_conflict(&self.desks, client_id, candidate) {
            tracing::debug!(
                %client_id,
                conflict_with = %other.client_id,
                x = candidate.x,
                y = candidate.y,
                "Drag rejected: overlap",
            );
            return DragCommit::Rejected {
                from,
                conflict_with: other.client_id.clone(),
            };
        }

        self.desks[index].set_position(candidate);
        tracing::debug!(%client_id, x = candidate.x, y = candidate.y, "Drag committed");

        DragCommit::Moved { from, to: candidate }
    }

    /// Clear the active drag marker, whatever the commit outcome was.
    pub fn end_drag(&mut self) {
        self.active = None;
    }

    // -----------------------------------------------------------------------
    // Add / edit / remove
    // -----------------------------------------------------------------------

    /// Append a new desk.
    ///
    /// No overlap check is made; a new desk may sit on top of another until
    /// it is dragged. A duplicate client id is refused.
    pub fn add_desk(&mut self, desk: Desk) -> Result<(), CoreError> {
        if self.desk(&desk.client_id).is_some() {
            return Err(CoreError::Conflict(format!(
                "Desk with client id {} already exists",
                desk.client_id
            )));
        }
        tracing::debug!(client_id = %desk.client_id, name = %desk.name, "Desk added");
        self.desks.push(desk);
        Ok(())
    }

    /// Replace a desk's editable fields. Identity and position are kept.
    pub fn edit_desk(&mut self, client_id: &ClientId, patch: DeskPatch) -> Result<&Desk, CoreError> {
        let index = self
            .index_of(client_id)
            .ok_or_else(|| CoreError::desk_not_found(client_id))?;

        let desk = &mut self.desks[index];
        patch.apply_to(desk);
        tracing::debug!(%client_id, name = %desk.name, "Desk edited");
        Ok(&*desk)
    }

    /// Remove a desk, or report that a confirmed remote delete is needed.
    pub fn remove_desk(&mut self, client_id: &ClientId) -> Result<Removal, CoreError> {
        let desk_id = self
            .desk(client_id)
            .ok_or_else(|| CoreError::desk_not_found(client_id))?
            .desk_id;

        match desk_id {
            Some(desk_id) => Ok(Removal::NeedsConfirmation {
                client_id: client_id.clone(),
                desk_id,
            }),
            None => {
                let removed = self.take(client_id).ok_or_else(|| CoreError::desk_not_found(client_id))?;
                tracing::debug!(%client_id, "Unsaved desk removed");
                Ok(Removal::Removed(removed))
            }
        }
    }

    /// Drop a desk after its remote delete succeeded.
    pub fn remove_confirmed(&mut self, client_id: &ClientId) -> Option<Desk> {
        let removed = self.take(client_id);
        if removed.is_some() {
            tracing::debug!(%client_id, "Persisted desk removed");
        }
        removed
    }

    fn index_of(&self, client_id: &ClientId) -> Option<usize> {
        self.desks.iter().position(|d| &d.client_id == client_id)
    }

    fn take(&mut self, client_id: &ClientId) -> Option<Desk> {
        let index = self.index_of(client_id)?;
        if self.active.as_ref() == Some(client_id) {
            self.active = None;
        }
        Some(self.desks.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn desk_at(id: &str, x: f64, y: f64) -> Desk {
        let mut d = Desk::sample(id);
        d.set_position(Point::new(x, y));
        d
    }

    fn canvas_with(desks: Vec<Desk>) -> LayoutCanvas {
        let mut canvas = LayoutCanvas::new(CanvasBounds::new(1400.0, 800.0));
        canvas.initialize(desks);
        canvas
    }

    fn id(s: &str) -> ClientId {
        ClientId::from(s)
    }

    fn assert_no_overlaps(canvas: &LayoutCanvas) {
        let desks = canvas.desks();
        for (i, a) in desks.iter().enumerate() {
            for b in &desks[i + 1..] {
                assert!(
                    !placement::overlaps(a.position(), b.position()),
                    "{} and {} overlap",
                    a.client_id,
                    b.client_id
                );
            }
        }
    }

    // -- Drag commits -------------------------------------------------------

    #[test]
    fn non_finite_delta_leaves_desk_in_place() {
        let mut canvas = canvas_with(vec![desk_at("a", 100.0, 100.0)]);

        for delta in [
            Delta::new(f64::NAN, 0.0),
            Delta::new(0.0, f64::INFINITY),
            Delta::new(f64::NEG_INFINITY, f64::NAN),
        ] {
            let commit = canvas.commit_drag(&id("a"), delta);
            assert_eq!(commit, DragCommit::Discarded { from: Point::new(100.0, 100.0) });
        }

        let pos = canvas.desk(&id("a")).unwrap().position();
        assert_eq!(pos, Point::new(100.0, 100.0));
        assert!(canvas.bounds().contains(pos));
    }

    #[test]
    fn drag_moves_then_clamps_to_origin() {
        let mut canvas = canvas_with(vec![desk_at("a", 100.0, 100.0)]);

        let first = canvas.commit_drag(&id("a"), Delta::new(50.0, 50.0));
        assert_eq!(
            first,
            DragCommit::Moved {
                from: Point::new(100.0, 100.0),
                to: Point::new(150.0, 150.0)
            }
        );

        canvas.commit_drag(&id("a"), Delta::new(-1400.0, -1400.0));
        assert_eq!(canvas.desk(&id("a")).unwrap().position(), Point::ORIGIN);
    }

    #[test]
    fn drag_past_far_edge_clamps_to_footprint_margin() {
        let mut canvas = canvas_with(vec![desk_at("a", 100.0, 100.0)]);
        canvas.commit_drag(&id("a"), Delta::new(5000.0, 5000.0));
        assert_eq!(canvas.desk(&id("a")).unwrap().position(), Point::new(1390.0, 790.0));
    }

    #[test]
    fn overlapping_drag_is_rejected_without_moving() {
        let mut canvas = canvas_with(vec![desk_at("a", 100.0, 100.0), desk_at("b", 300.0, 300.0)]);
        let before = canvas.desk(&id("b")).unwrap().clone();

        let outcome = canvas.commit_drag(&id("b"), Delta::new(-195.0, -195.0));

        assert_matches!(outcome, DragCommit::Rejected { ref conflict_with, .. } if conflict_with == &id("a"));
        let after = canvas.desk(&id("b")).unwrap();
        assert_eq!(after.position_x.to_bits(), before.position_x.to_bits());
        assert_eq!(after.position_y.to_bits(), before.position_y.to_bits());
    }

    #[test]
    fn rejection_is_checked_after_clamping() {
        // Candidate (-50, -50) clamps to (0, 0), where "a" already sits.
        let mut canvas = canvas_with(vec![desk_at("a", 0.0, 0.0), desk_at("b", 200.0, 200.0)]);
        let outcome = canvas.commit_drag(&id("b"), Delta::new(-250.0, -250.0));
        assert_matches!(outcome, DragCommit::Rejected { .. });
        assert_eq!(canvas.desk(&id("b")).unwrap().position(), Point::new(200.0, 200.0));
    }

    #[test]
    fn small_drag_onto_own_position_is_not_a_conflict() {
        let mut canvas = canvas_with(vec![desk_at("a", 100.0, 100.0)]);
        assert!(canvas.commit_drag(&id("a"), Delta::new(3.0, 3.0)).is_moved());
    }

    #[test]
    fn commit_preserves_size() {
        let mut desk = desk_at("a", 10.0, 10.0);
        desk.width = "180".to_string();
        desk.height = "25".to_string();
        let mut canvas = canvas_with(vec![desk]);

        canvas.commit_drag(&id("a"), Delta::new(40.0, 0.0));

        let desk = canvas.desk(&id("a")).unwrap();
        assert_eq!(desk.width, "180");
        assert_eq!(desk.height, "25");
    }

    #[test]
    fn unknown_desk_commit_is_silent() {
        let mut canvas = canvas_with(vec![desk_at("a", 0.0, 0.0)]);
        assert_eq!(canvas.commit_drag(&id("ghost"), Delta::new(1.0, 1.0)), DragCommit::Unknown);
    }

    #[test]
    fn sequential_drags_keep_invariants() {
        let mut canvas = canvas_with(vec![
            desk_at("a", 0.0, 0.0),
            desk_at("b", 50.0, 0.0),
            desk_at("c", 100.0, 0.0),
        ]);
        let moves = [
            ("a", Delta::new(52.0, 4.0)),
            ("b", Delta::new(-48.0, 1.0)),
            ("c", Delta::new(-95.0, 0.0)),
            ("c", Delta::new(2000.0, 2000.0)),
            ("b", Delta::new(1345.0, 789.0)),
            ("a", Delta::new(-9.0, -9.0)),
        ];

        for (desk, delta) in moves {
            canvas.commit_drag(&id(desk), delta);
            assert_no_overlaps(&canvas);
            for d in canvas.desks() {
                assert!(canvas.bounds().contains(d.position()), "{} out of bounds", d.client_id);
            }
        }
    }

    // -- Drag marker --------------------------------------------------------

    #[test]
    fn drag_marker_lifecycle() {
        let mut canvas = canvas_with(vec![desk_at("a", 0.0, 0.0), desk_at("b", 50.0, 50.0)]);
        assert!(canvas.active_drag().is_none());

        canvas.begin_drag(&id("a")).unwrap();
        assert_eq!(canvas.active_drag(), Some(&id("a")));

        canvas.begin_drag(&id("b")).unwrap();
        assert_eq!(canvas.active_drag(), Some(&id("b")));

        canvas.end_drag();
        assert!(canvas.active_drag().is_none());
    }

    #[test]
    fn begin_drag_on_unknown_desk_fails() {
        let mut canvas = canvas_with(vec![]);
        assert_matches!(canvas.begin_drag(&id("nope")), Err(CoreError::NotFound { .. }));
        assert!(canvas.active_drag().is_none());
    }

    // -- Add / edit ---------------------------------------------------------

    #[test]
    fn add_desk_allows_overlap() {
        let mut canvas = canvas_with(vec![desk_at("a", 0.0, 0.0)]);
        canvas.add_desk(desk_at("b", 0.0, 0.0)).unwrap();
        assert_eq!(canvas.desks().len(), 2);
    }

    #[test]
    fn add_desk_refuses_duplicate_client_id() {
        let mut canvas = canvas_with(vec![desk_at("a", 0.0, 0.0)]);
        assert_matches!(canvas.add_desk(desk_at("a", 50.0, 50.0)), Err(CoreError::Conflict(_)));
        assert_eq!(canvas.desks().len(), 1);
    }

    #[test]
    fn edit_desk_keeps_identity() {
        let mut persisted = desk_at("a", 20.0, 30.0);
        persisted.desk_id = Some(42);
        let mut canvas = canvas_with(vec![persisted]);

        let patch = DeskPatch {
            name: "Corner".to_string(),
            owner_id: Some(3),
            width: "120".to_string(),
            height: "80".to_string(),
            opacity: 60.0,
            background_color: "#00ff00".to_string(),
        };
        let desk = canvas.edit_desk(&id("a"), patch).unwrap();

        assert_eq!(desk.client_id, id("a"));
        assert_eq!(desk.desk_id, Some(42));
        assert_eq!(desk.position(), Point::new(20.0, 30.0));
        assert_eq!(desk.name, "Corner");
    }

    #[test]
    fn edit_unknown_desk_fails() {
        let mut canvas = canvas_with(vec![]);
        let patch = DeskPatch {
            name: "x".to_string(),
            owner_id: None,
            width: "20".to_string(),
            height: "20".to_string(),
            opacity: 5.0,
            background_color: "#fff".to_string(),
        };
        assert_matches!(canvas.edit_desk(&id("a"), patch), Err(CoreError::NotFound { .. }));
    }

    // -- Removal ------------------------------------------------------------

    #[test]
    fn unsaved_desk_is_removed_immediately() {
        let mut canvas = canvas_with(vec![desk_at("abc", 0.0, 0.0), desk_at("def", 50.0, 50.0)]);

        let removal = canvas.remove_desk(&id("abc")).unwrap();

        assert_matches!(removal, Removal::Removed(ref d) if d.client_id == id("abc"));
        assert!(canvas.desk(&id("abc")).is_none());
        assert_eq!(canvas.desks().len(), 1);
    }

    #[test]
    fn persisted_desk_needs_confirmation_and_stays() {
        let mut persisted = desk_at("p", 0.0, 0.0);
        persisted.desk_id = Some(42);
        let mut canvas = canvas_with(vec![persisted]);

        let removal = canvas.remove_desk(&id("p")).unwrap();

        assert_eq!(
            removal,
            Removal::NeedsConfirmation {
                client_id: id("p"),
                desk_id: 42
            }
        );
        assert!(canvas.desk(&id("p")).is_some());

        assert!(canvas.remove_confirmed(&id("p")).is_some());
        assert!(canvas.desks().is_empty());
    }

    #[test]
    fn removing_active_desk_clears_marker() {
        let mut canvas = canvas_with(vec![desk_at("a", 0.0, 0.0)]);
        canvas.begin_drag(&id("a")).unwrap();
        canvas.remove_desk(&id("a")).unwrap();
        assert!(canvas.active_drag().is_none());
    }

    #[test]
    fn initialize_skips_validation() {
        let canvas = canvas_with(vec![desk_at("a", 5.0, 5.0), desk_at("b", 6.0, 6.0)]);
        assert_eq!(canvas.desks().len(), 2);
    }
}
