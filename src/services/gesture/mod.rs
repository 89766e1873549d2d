// Gesture session tracking
//
// One pointer gesture at a time: moving an item (from the pool or from a
// day track) or dragging the top/bottom edge of a scheduled item. The
// session only changes through the tracker's begin/update/finish/cancel.

use crate::models::plan_item::PlanItemId;
use crate::models::time_range::{Placement, TimeRange};

/// Which edge of a scheduled item is being dragged
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeEdge {
    /// Top edge - moves the start, end stays fixed
    Top,
    /// Bottom edge - changes the duration, start stays fixed
    Bottom,
}

/// Where a moved item came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOrigin {
    Pool,
    Track(Placement),
}

/// State of an in-progress move.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveGesture {
    pub item_id: PlanItemId,
    /// Drop a fresh copy instead of transferring `item_id`.
    pub clone: bool,
    pub origin: MoveOrigin,
    pub duration_minutes: u32,
    /// Candidate under the pointer, `None` while outside the grid.
    pub preview: Option<Placement>,
}

/// State of an in-progress edge drag.
#[derive(Clone, Debug, PartialEq)]
pub struct ResizeGesture {
    pub item_id: PlanItemId,
    pub day_index: usize,
    pub edge: ResizeEdge,
    pub original: TimeRange,
    /// Last valid interval; rejected frames leave it untouched.
    pub preview: TimeRange,
    /// The most recent frame was below the minimum duration.
    pub last_frame_rejected: bool,
}

impl ResizeGesture {
    pub fn is_changed(&self) -> bool {
        self.preview != self.original
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub enum GestureSession {
    #[default]
    Idle,
    Moving(MoveGesture),
    Resizing(ResizeGesture),
}

impl GestureSession {
    pub fn is_idle(&self) -> bool {
        matches!(self, GestureSession::Idle)
    }

    /// Item the session acts on, if any.
    pub fn item_id(&self) -> Option<PlanItemId> {
        match self {
            GestureSession::Idle => None,
            GestureSession::Moving(m) => Some(m.item_id),
            GestureSession::Resizing(r) => Some(r.item_id),
        }
    }
}

/// Owner of the single active gesture session.
#[derive(Debug, Default)]
pub struct GestureTracker {
    session: GestureSession,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> &GestureSession {
        &self.session
    }

    pub fn is_active(&self) -> bool {
        !self.session.is_idle()
    }

    /// Start a move. A session still open is torn down first and returned.
    pub fn begin_move(&mut self, gesture: MoveGesture) -> Option<GestureSession> {
        log::debug!("Begin move of item {} from {:?}", gesture.item_id, gesture.origin);
        self.replace(GestureSession::Moving(gesture))
    }

    /// Start an edge drag. A session still open is torn down first and returned.
    pub fn begin_resize(&mut self, gesture: ResizeGesture) -> Option<GestureSession> {
        log::debug!(
            "Begin {:?} resize of item {} on day {}",
            gesture.edge,
            gesture.item_id,
            gesture.day_index
        );
        self.replace(GestureSession::Resizing(gesture))
    }

    fn replace(&mut self, next: GestureSession) -> Option<GestureSession> {
        let stale = std::mem::replace(&mut self.session, next);
        if stale.is_idle() {
            None
        } else {
            log::warn!("Gesture started while another was active; resetting {:?}", stale);
            Some(stale)
        }
    }

    /// Record the move candidate under the pointer. Ignored unless a move is
    /// active.
    pub fn update_move_preview(&mut self, preview: Option<Placement>) -> bool {
        match &mut self.session {
            GestureSession::Moving(gesture) => {
                gesture.preview = preview;
                true
            }
            _ => false,
        }
    }

    /// Record a valid resize frame. Ignored unless a resize is active.
    pub fn update_resize_preview(&mut self, preview: TimeRange) -> bool {
        match &mut self.session {
            GestureSession::Resizing(gesture) => {
                gesture.preview = preview;
                gesture.last_frame_rejected = false;
                true
            }
            _ => false,
        }
    }

    /// Note a rejected resize frame; the last valid preview stays.
    pub fn reject_resize_frame(&mut self) -> bool {
        match &mut self.session {
            GestureSession::Resizing(gesture) => {
                gesture.last_frame_rejected = true;
                true
            }
            _ => false,
        }
    }

    /// End the gesture, handing its final state to the caller.
    pub fn finish(&mut self) -> GestureSession {
        std::mem::take(&mut self.session)
    }

    /// Drop the gesture without a commit. Returns false when idle.
    pub fn cancel(&mut self) -> bool {
        let was_active = self.is_active();
        if was_active {
            log::debug!("Gesture cancelled: {:?}", self.session);
        }
        self.session = GestureSession::Idle;
        was_active
    }
}
