// Gesture handling for the planner
//
// begin_* opens a session, hover/drag_edge update its preview, release
// commits or cancels it. The store is only touched on release.

use super::{CancelReason, GestureOutcome, Planner, PlannerError, Preview};
use crate::models::plan_item::PlanItemId;
use crate::models::time_range::Placement;
use crate::services::conflict::{Resolution, TrackSlot};
use crate::services::gesture::{GestureSession, MoveGesture, MoveOrigin, ResizeEdge, ResizeGesture};
use crate::services::grid::CellTarget;
use crate::services::notification::{Notice, NoticeKind, NoticeLevel};
use crate::services::resize::ResizeBounds;
use crate::services::schedule::StoreError;
use crate::utils::date::format_range;

impl Planner {
    /// Start dragging `id`, from the pool or from its day track.
    ///
    /// When `id` is the clone source the drop places a fresh copy.
    pub fn begin_move(&mut self, id: PlanItemId) -> Result<(), PlannerError> {
        let item = self.store.get(id).ok_or(StoreError::UnknownItem(id))?;
        let origin = match self.store.placement(id) {
            Some(placement) => MoveOrigin::Track(placement),
            None => MoveOrigin::Pool,
        };
        let gesture = MoveGesture {
            item_id: id,
            clone: self.clone_source == Some(id),
            origin,
            duration_minutes: item.duration_minutes,
            preview: None,
        };
        self.gestures.begin_move(gesture);
        Ok(())
    }

    /// Start dragging an edge of a scheduled item.
    pub fn begin_resize(&mut self, id: PlanItemId, edge: ResizeEdge) -> Result<(), PlannerError> {
        if !self.store.contains(id) {
            return Err(StoreError::UnknownItem(id).into());
        }
        let placement = self.store.placement(id).ok_or(StoreError::NotScheduled(id))?;
        self.gestures.begin_resize(ResizeGesture {
            item_id: id,
            day_index: placement.day_index,
            edge,
            original: placement.range,
            preview: placement.range,
            last_frame_rejected: false,
        });
        Ok(())
    }

    /// Pointer moved during a move gesture. `None` means the pointer is not
    /// over any day/hour cell.
    pub fn hover(&mut self, target: Option<CellTarget>) -> Option<Preview> {
        let target = self.on_grid(target);
        let GestureSession::Moving(gesture) = self.gestures.active() else {
            return None;
        };
        let preview = target.map(|target| {
            let candidate = self.placement_engine().candidate(gesture, target);
            let resolution = self
                .resolver
                .resolve(&candidate, &self.store.track(candidate.placement.day_index));
            let placement = Placement::new(candidate.placement.day_index, resolution.range());
            Preview {
                placement,
                label: format_range(&placement.range),
                resolution: (!resolution.is_clear()).then_some(resolution),
            }
        });
        self.gestures
            .update_move_preview(preview.as_ref().map(|p| p.placement));
        preview
    }

    /// Pointer moved during a resize gesture. `delta_px` is the total
    /// vertical distance since the gesture began, positive downwards.
    ///
    /// A frame that would go below the minimum duration is rejected and the
    /// last valid preview is returned again.
    pub fn drag_edge(&mut self, delta_px: f32) -> Option<Preview> {
        let GestureSession::Resizing(gesture) = self.gestures.active() else {
            return None;
        };
        let gesture = gesture.clone();
        let bounds = ResizeBounds::from_track(
            gesture.item_id,
            gesture.original,
            &self.store.track(gesture.day_index),
        );

        let range = match self
            .resize_controller()
            .resize_by_pixels(gesture.edge, gesture.original, delta_px, bounds)
        {
            Ok(range) => {
                self.gestures.update_resize_preview(range);
                range
            }
            Err(rejected) => {
                log::debug!("Resize frame rejected: {}", rejected);
                self.gestures.reject_resize_frame();
                gesture.preview
            }
        };
        let placement = Placement::new(gesture.day_index, range);
        Some(Preview {
            placement,
            label: format_range(&range),
            resolution: None,
        })
    }

    /// Pointer released. Commits the gesture or cancels it; the session is
    /// gone afterwards either way.
    pub fn release(&mut self, target: Option<CellTarget>) -> GestureOutcome {
        match self.gestures.finish() {
            GestureSession::Idle => GestureOutcome::Cancelled(CancelReason::NoSession),
            GestureSession::Moving(gesture) => self.finish_move(gesture, target),
            GestureSession::Resizing(gesture) => self.finish_resize(gesture),
        }
    }

    /// Abort the active gesture without touching the store.
    pub fn cancel(&mut self) -> bool {
        self.gestures.cancel()
    }

    /// Drop targets the grid does not show (hidden hours, missing days).
    fn on_grid(&self, target: Option<CellTarget>) -> Option<CellTarget> {
        target.and_then(|t| self.grid.locate(t.day_index, t.hour, t.pixel_offset))
    }

    fn finish_move(&mut self, gesture: MoveGesture, target: Option<CellTarget>) -> GestureOutcome {
        let Some(target) = self.on_grid(target) else {
            log::debug!("Move of item {} released outside the grid", gesture.item_id);
            return GestureOutcome::Cancelled(CancelReason::NoTarget);
        };
        if !self.store.contains(gesture.item_id) {
            return GestureOutcome::Cancelled(CancelReason::ItemGone);
        }

        let candidate = self.placement_engine().candidate(&gesture, target);
        let day_index = candidate.placement.day_index;
        let track: Vec<TrackSlot> = self.store.track(day_index);
        let resolution = self.resolver.resolve(&candidate, &track);

        let range = match resolution {
            Resolution::Clear(range) => range,
            Resolution::Shifted {
                original, resolved, ..
            } => {
                self.notices.push(Notice::new(
                    resolution.describe().unwrap_or_default(),
                    NoticeLevel::Info,
                    NoticeKind::ConflictShifted {
                        item_id: gesture.item_id,
                        day_index,
                        original_start: original.start_minutes,
                        resolved_start: resolved.start_minutes,
                    },
                ));
                resolved
            }
            Resolution::Blocked {
                original,
                shifted,
                blocker,
                ..
            } => {
                // Past midnight is never committable.
                let committed = self.settings.allow_residual_overlap && blocker.is_some();
                self.notices.push(Notice::new(
                    resolution.describe().unwrap_or_default(),
                    NoticeLevel::Warning,
                    NoticeKind::ConflictBlocked {
                        item_id: gesture.item_id,
                        day_index,
                        original_start: original.start_minutes,
                        committed,
                    },
                ));
                if !committed {
                    return GestureOutcome::Cancelled(CancelReason::Blocked);
                }
                log::warn!(
                    "Committing item {} at {:?} with a residual overlap",
                    gesture.item_id,
                    shifted
                );
                shifted
            }
        };

        let placement = Placement::new(day_index, range);
        let committed = if gesture.clone {
            self.store.commit_clone(gesture.item_id, placement)
        } else {
            self.store
                .commit_placement(gesture.item_id, placement)
                .map(|()| gesture.item_id)
        };

        match committed {
            Ok(item_id) => GestureOutcome::Placed {
                item_id,
                placement,
                resolution,
            },
            Err(err) => {
                log::warn!("Drop of item {} not committed: {}", gesture.item_id, err);
                match err {
                    StoreError::UnknownItem(_) => GestureOutcome::Cancelled(CancelReason::ItemGone),
                    _ => GestureOutcome::Cancelled(CancelReason::NoTarget),
                }
            }
        }
    }

    fn finish_resize(&mut self, gesture: ResizeGesture) -> GestureOutcome {
        if gesture.last_frame_rejected {
            self.notices.push(Notice::validation(format!(
                "Items must be at least {} minutes long",
                self.settings.min_duration_minutes
            )));
        }
        if !gesture.is_changed() {
            return GestureOutcome::Cancelled(CancelReason::Unchanged);
        }

        let placement = Placement::new(gesture.day_index, gesture.preview);
        match self.store.commit_resize(gesture.item_id, placement) {
            Ok(()) => GestureOutcome::Resized {
                item_id: gesture.item_id,
                placement,
            },
            Err(err) => {
                log::warn!("Resize of item {} not committed: {}", gesture.item_id, err);
                GestureOutcome::Cancelled(CancelReason::ItemGone)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{item, planner};
    use super::*;
    use crate::models::settings::PlannerSettings;
    use crate::models::time_range::TimeRange;
    use crate::models::trip::TripConfig;
    use pretty_assertions::assert_eq;

    fn place(
        planner: &mut Planner,
        id: PlanItemId,
        day: usize,
        hour: u32,
        offset: f32,
    ) -> GestureOutcome {
        planner.begin_move(id).unwrap();
        let target = planner.grid().locate(day, hour, offset);
        planner.hover(target);
        planner.release(target)
    }

    #[test]
    fn test_drop_snaps_to_twenty_past() {
        let mut planner = planner(1);
        let id = planner.add_item(item(60)).unwrap();

        let outcome = place(&mut planner, id, 0, 9, 25.0);
        assert_eq!(
            outcome,
            GestureOutcome::Placed {
                item_id: id,
                placement: Placement::new(0, TimeRange::from_clock(9, 20, 60)),
                resolution: Resolution::Clear(TimeRange::from_clock(9, 20, 60)),
            }
        );
        assert!(planner.session().is_idle());
        assert!(planner.drain_notices().is_empty());
    }

    #[test]
    fn test_overlapping_drop_is_shifted_with_notice() {
        let mut planner = planner(1);
        let a = planner.add_item(item(60)).unwrap();
        let b = planner.add_item(item(60)).unwrap();
        place(&mut planner, a, 0, 9, 0.0);

        let outcome = place(&mut planner, b, 0, 9, 30.0);
        assert!(outcome.is_committed());
        assert_eq!(
            planner.store().placement(b),
            Some(Placement::new(0, TimeRange::from_clock(10, 0, 60)))
        );

        let notices = planner.drain_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "Time conflict: moved from 09:30 to 10:00");
        assert_eq!(
            notices[0].kind,
            NoticeKind::ConflictShifted {
                item_id: b,
                day_index: 0,
                original_start: 570,
                resolved_start: 600,
            }
        );
    }

    #[test]
    fn test_hover_previews_resolved_interval() {
        let mut planner = planner(1);
        let a = planner.add_item(item(60)).unwrap();
        let b = planner.add_item(item(60)).unwrap();
        place(&mut planner, a, 0, 9, 0.0);

        planner.begin_move(b).unwrap();
        let preview = planner.hover(planner.grid().locate(0, 9, 30.0)).unwrap();
        assert_eq!(preview.label, "10:00–11:00");
        assert!(preview.resolution.is_some());

        assert_eq!(planner.hover(None), None);
        assert!(planner.cancel());
        assert!(!planner.store().is_scheduled(b));
    }

    #[test]
    fn test_release_outside_grid_leaves_store_untouched() {
        let mut planner = planner(1);
        let id = planner.add_item(item(60)).unwrap();
        let before = planner.store().clone();

        planner.begin_move(id).unwrap();
        let outcome = planner.release(planner.grid().locate(0, 2, 0.0));
        assert_eq!(outcome, GestureOutcome::Cancelled(CancelReason::NoTarget));
        assert_eq!(planner.store(), &before);
        assert!(planner.session().is_idle());
    }

    #[test]
    fn test_release_on_hidden_hour_is_a_no_op() {
        let mut planner = planner(1);
        let id = planner.add_item(item(60)).unwrap();
        let before = planner.store().clone();
        let night = CellTarget::new(0, 3, 0.0);
        assert_eq!(planner.grid().locate(0, 3, 0.0), None);

        planner.begin_move(id).unwrap();
        assert_eq!(planner.hover(Some(night)), None);
        let outcome = planner.release(Some(night));

        assert_eq!(outcome, GestureOutcome::Cancelled(CancelReason::NoTarget));
        assert_eq!(planner.store(), &before);
        assert!(!planner.store().is_scheduled(id));
    }

    #[test]
    fn test_release_on_missing_day_is_a_no_op() {
        let mut planner = planner(1);
        let id = planner.add_item(item(60)).unwrap();

        planner.begin_move(id).unwrap();
        let outcome = planner.release(Some(CellTarget::new(4, 10, 0.0)));

        assert_eq!(outcome, GestureOutcome::Cancelled(CancelReason::NoTarget));
        assert!(planner.store().track(0).is_empty());
    }

    #[test]
    fn test_blocked_drop_is_cancelled_by_default() {
        let mut planner = planner(1);
        let a = planner.add_item(item(60)).unwrap();
        let c = planner.add_item(item(60)).unwrap();
        let b = planner.add_item(item(60)).unwrap();
        place(&mut planner, a, 0, 9, 0.0);
        place(&mut planner, c, 0, 10, 30.0);
        planner.drain_notices();

        let outcome = place(&mut planner, b, 0, 9, 30.0);
        assert_eq!(outcome, GestureOutcome::Cancelled(CancelReason::Blocked));
        assert!(!planner.store().is_scheduled(b));
        assert!(planner.store().first_overlap().is_none());

        let notices = planner.drain_notices();
        assert_eq!(notices[0].level, NoticeLevel::Warning);
        assert!(matches!(
            notices[0].kind,
            NoticeKind::ConflictBlocked { committed: false, .. }
        ));
    }

    #[test]
    fn test_blocked_drop_commits_when_residual_overlap_allowed() {
        let day_one = super::super::tests::date(1);
        let trip = TripConfig::new("Porto", day_one, day_one).unwrap();
        let settings = PlannerSettings {
            allow_residual_overlap: true,
            ..Default::default()
        };
        let mut planner = Planner::new(trip, settings).unwrap();
        let a = planner.add_item(item(60)).unwrap();
        let c = planner.add_item(item(60)).unwrap();
        let b = planner.add_item(item(60)).unwrap();
        place(&mut planner, a, 0, 9, 0.0);
        place(&mut planner, c, 0, 10, 30.0);

        let outcome = place(&mut planner, b, 0, 9, 30.0);
        assert!(outcome.is_committed());
        assert_eq!(
            planner.store().placement(b),
            Some(Placement::new(0, TimeRange::from_clock(10, 0, 60)))
        );
        assert!(planner.store().first_overlap().is_some());
    }

    #[test]
    fn test_moving_item_never_conflicts_with_itself() {
        let mut planner = planner(1);
        let id = planner.add_item(item(60)).unwrap();
        place(&mut planner, id, 0, 9, 0.0);

        let outcome = place(&mut planner, id, 0, 9, 30.0);
        assert_eq!(
            outcome,
            GestureOutcome::Placed {
                item_id: id,
                placement: Placement::new(0, TimeRange::from_clock(9, 30, 60)),
                resolution: Resolution::Clear(TimeRange::from_clock(9, 30, 60)),
            }
        );
    }

    #[test]
    fn test_clone_mode_places_fresh_copies() {
        let mut planner = planner(2);
        let src = planner.add_item(item(40)).unwrap();
        planner.set_clone_source(Some(src)).unwrap();

        let first = place(&mut planner, src, 0, 9, 0.0);
        let second = place(&mut planner, src, 1, 9, 0.0);
        let ids: Vec<PlanItemId> = [first, second]
            .iter()
            .filter_map(|o| match o {
                GestureOutcome::Placed { item_id, .. } => Some(*item_id),
                _ => None,
            })
            .collect();

        assert_eq!(ids.len(), 2);
        assert!(!ids.contains(&src));
        assert!(!planner.store().is_scheduled(src));
        assert_eq!(planner.store().pool().count(), 1);

        planner.set_clone_source(None).unwrap();
        place(&mut planner, src, 0, 14, 0.0);
        assert!(planner.store().is_scheduled(src));
    }

    #[test]
    fn test_resize_bottom_edge_to_one_forty() {
        let mut planner = planner(1);
        let id = planner.add_item(item(60)).unwrap();
        place(&mut planner, id, 0, 9, 0.0);

        planner.begin_resize(id, ResizeEdge::Bottom).unwrap();
        let preview = planner.drag_edge(35.0).unwrap();
        assert_eq!(preview.label, "09:00–10:40");

        let outcome = planner.release(None);
        assert_eq!(
            outcome,
            GestureOutcome::Resized {
                item_id: id,
                placement: Placement::new(0, TimeRange::from_clock(9, 0, 100)),
            }
        );
        assert_eq!(planner.item(id).unwrap().duration_minutes, 100);
    }

    #[test]
    fn test_top_edge_stops_at_previous_item() {
        let mut planner = planner(1);
        let before = planner.add_item(item(30)).unwrap();
        let id = planner.add_item(item(30)).unwrap();
        place(&mut planner, before, 0, 10, 0.0);
        place(&mut planner, id, 0, 10, 30.0);

        planner.begin_resize(id, ResizeEdge::Top).unwrap();
        let preview = planner.drag_edge(-60.0).unwrap();
        assert_eq!(preview.label, "10:00–11:00");
        assert_eq!(
            planner.release(None),
            GestureOutcome::Resized {
                item_id: id,
                placement: Placement::new(0, TimeRange::from_clock(10, 0, 60)),
            }
        );
        assert!(planner.store().first_overlap().is_none());
    }

    #[test]
    fn test_resize_dragged_back_is_unchanged() {
        let mut planner = planner(1);
        let id = planner.add_item(item(60)).unwrap();
        place(&mut planner, id, 0, 9, 0.0);
        let before = planner.store().clone();

        planner.begin_resize(id, ResizeEdge::Top).unwrap();
        assert_eq!(planner.drag_edge(-20.0).unwrap().label, "08:40–10:00");
        assert_eq!(planner.drag_edge(2.0).unwrap().label, "09:00–10:00");
        assert_eq!(
            planner.release(None),
            GestureOutcome::Cancelled(CancelReason::Unchanged)
        );
        assert_eq!(planner.store(), &before);
    }

    #[test]
    fn test_bottom_edge_stops_at_next_item() {
        let mut planner = planner(1);
        let id = planner.add_item(item(30)).unwrap();
        let after = planner.add_item(item(30)).unwrap();
        place(&mut planner, id, 0, 10, 0.0);
        place(&mut planner, after, 0, 11, 0.0);

        planner.begin_resize(id, ResizeEdge::Bottom).unwrap();
        planner.drag_edge(300.0);
        assert_eq!(
            planner.release(None),
            GestureOutcome::Resized {
                item_id: id,
                placement: Placement::new(0, TimeRange::from_clock(10, 0, 60)),
            }
        );
        assert!(planner.store().first_overlap().is_none());
        assert!(planner.drain_notices().is_empty());
    }

    #[test]
    fn test_resize_requires_scheduled_item() {
        let mut planner = planner(1);
        let id = planner.add_item(item(60)).unwrap();
        assert_eq!(
            planner.begin_resize(id, ResizeEdge::Top),
            Err(PlannerError::Store(StoreError::NotScheduled(id)))
        );
        assert!(planner.session().is_idle());
    }

    #[test]
    fn test_new_gesture_resets_stale_session() {
        let mut planner = planner(1);
        let a = planner.add_item(item(60)).unwrap();
        let b = planner.add_item(item(60)).unwrap();
        place(&mut planner, a, 0, 9, 0.0);

        planner.begin_resize(a, ResizeEdge::Bottom).unwrap();
        planner.drag_edge(60.0);
        planner.begin_move(b).unwrap();

        assert_eq!(planner.drag_edge(30.0), None, "stale resize must not react");
        assert_eq!(planner.session().item_id(), Some(b));
        planner.release(None);
        assert_eq!(planner.item(a).unwrap().duration_minutes, 60);
    }

    #[test]
    fn test_removing_dragged_item_cancels_gesture() {
        let mut planner = planner(1);
        let id = planner.add_item(item(60)).unwrap();
        planner.begin_move(id).unwrap();
        planner.remove(id).unwrap();

        assert!(planner.session().is_idle());
        assert_eq!(
            planner.release(planner.grid().locate(0, 9, 0.0)),
            GestureOutcome::Cancelled(CancelReason::NoSession)
        );
    }

    #[test]
    fn test_teardown_drops_open_resize() {
        let mut planner = planner(1);
        let id = planner.add_item(item(60)).unwrap();
        place(&mut planner, id, 0, 9, 0.0);
        planner.begin_resize(id, ResizeEdge::Bottom).unwrap();
        planner.drag_edge(60.0);

        planner.teardown();
        assert!(planner.session().is_idle());
        assert_eq!(planner.drag_edge(90.0), None);
        assert_eq!(planner.item(id).unwrap().duration_minutes, 60);
    }
}
