// Property-based tests for the placement engine
// Random gesture sequences must never break the track invariants

mod fixtures;

use fixtures::{drop_at, items, planner};
use proptest::prelude::*;
use trip_planner::models::plan_item::PlanItemId;
use trip_planner::models::time_range::{snap, Placement, SnapRules, TimeRange};
use trip_planner::services::conflict::{ConflictResolver, TrackSlot};
use trip_planner::services::gesture::ResizeEdge;
use trip_planner::services::grid::{coordinates::pixel_to_minute, CoordinateMapper};
use trip_planner::services::placement::Candidate;
use trip_planner::services::planner::Planner;
use trip_planner::services::resize::{ResizeBounds, ResizeController};

#[derive(Debug, Clone)]
enum Action {
    Drop {
        item: usize,
        day: usize,
        hour: u32,
        offset: f32,
    },
    Resize {
        item: usize,
        top: bool,
        delta: f32,
    },
    Unschedule { item: usize },
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        (0..6usize, 0..3usize, 7..24u32, 0.0..60.0f32).prop_map(|(item, day, hour, offset)| {
            Action::Drop { item, day, hour, offset }
        }),
        (0..6usize, any::<bool>(), -300.0..300.0f32)
            .prop_map(|(item, top, delta)| Action::Resize { item, top, delta }),
        (0..6usize).prop_map(|item| Action::Unschedule { item }),
    ]
}

fn apply(planner: &mut Planner, ids: &[PlanItemId], action: &Action) {
    match *action {
        Action::Drop { item, day, hour, offset } => {
            drop_at(planner, ids[item], day, hour, offset);
        }
        Action::Resize { item, top, delta } => {
            let edge = if top { ResizeEdge::Top } else { ResizeEdge::Bottom };
            if planner.begin_resize(ids[item], edge).is_ok() {
                planner.drag_edge(delta / 2.0);
                planner.drag_edge(delta);
                planner.release(None);
            }
        }
        Action::Unschedule { item } => {
            planner.unschedule(ids[item]).unwrap();
        }
    }
}

proptest! {
    /// Property: no two items on a day track ever overlap, and every
    /// committed interval stays on the grid inside the day.
    #[test]
    fn prop_tracks_never_overlap(
        durations in prop::collection::vec(10..240u32, 6),
        actions in prop::collection::vec(action(), 1..40),
    ) {
        let mut planner = planner(3);
        let ids: Vec<PlanItemId> = durations
            .iter()
            .map(|minutes| planner.add_item(items::with_minutes("Stop", *minutes)).unwrap())
            .collect();
        let rules = SnapRules::default();

        for action in &actions {
            apply(&mut planner, &ids, action);
            prop_assert!(planner.session().is_idle());
            prop_assert_eq!(planner.store().first_overlap(), None);
        }

        for day in 0..3 {
            for slot in planner.store().track(day) {
                prop_assert!(rules.admits(&slot.range), "off-grid {:?}", slot.range);
                prop_assert!(slot.range.end_minutes() <= 24 * 60);
            }
        }
    }

    /// Property: snapping is idempotent and lands on the tick
    #[test]
    fn prop_snap_idempotent(
        value in -5000..5000i32,
        tick in prop::sample::select(vec![5u32, 10, 15, 20, 30]),
    ) {
        let once = snap(value, tick);
        prop_assert_eq!(snap(once, tick), once);
        prop_assert_eq!(once.rem_euclid(tick as i32), 0);
        prop_assert!((once - value).abs() <= tick as i32 / 2);
    }

    /// Property: pixel mapping always yields a tick inside the hour
    #[test]
    fn prop_pixel_to_minute_on_tick(offset in -100.0..200.0f32, height in 20.0..200.0f32) {
        let minute = pixel_to_minute(offset, height, 10);
        prop_assert_eq!(minute % 10, 0);
        prop_assert!(minute <= 50);
    }

    /// Property: resizing never commits less than the minimum duration
    #[test]
    fn prop_resize_respects_minimum(
        start_tick in 0..100u32,
        duration_ticks in 3..30u32,
        delta in -2000..2000i32,
        top in any::<bool>(),
    ) {
        let original = TimeRange::new(start_tick * 10, duration_ticks * 10);
        let controller =
            ResizeController::new(SnapRules::default(), CoordinateMapper::new(60.0, 10));
        let edge = if top { ResizeEdge::Top } else { ResizeEdge::Bottom };

        if let Ok(range) = controller.resize(edge, original, delta, ResizeBounds::default()) {
            prop_assert!(range.duration_minutes >= 30);
            prop_assert!(range.end_minutes() <= 24 * 60);
            match edge {
                ResizeEdge::Top => prop_assert_eq!(range.end_minutes(), original.end_minutes()),
                ResizeEdge::Bottom => prop_assert_eq!(range.start_minutes, original.start_minutes),
            }
        }
    }

    /// Property: resolution is a pure function of candidate and track
    #[test]
    fn prop_resolve_deterministic(
        slots in prop::collection::vec((0..138u32, 3..12u32), 0..8),
        start in 0..138u32,
        duration in 3..12u32,
    ) {
        let track: Vec<TrackSlot> = slots
            .iter()
            .enumerate()
            .map(|(i, (s, d))| TrackSlot {
                item_id: PlanItemId(i as u64 + 1),
                range: TimeRange::new(s * 10, d * 10),
            })
            .collect();
        let candidate = Candidate {
            placement: Placement::new(0, TimeRange::new(start * 10, duration * 10)),
            exclude: None,
        };

        let resolver = ConflictResolver::new();
        let first = resolver.resolve(&candidate, &track);
        prop_assert_eq!(resolver.resolve(&candidate, &track), first);
        prop_assert_eq!(first.range().duration_minutes, duration * 10);
    }
}
