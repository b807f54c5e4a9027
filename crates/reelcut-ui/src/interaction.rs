//! The timeline interaction state machine.
//!
//! ```text
//! idle ──down on clip body──▶ dragging ──up──▶ idle
//! idle ──down on clip edge──▶ resizing ──up──▶ idle
//! ```
//!
//! Moves while a gesture is active become `move_clip` / `resize_clip` on the
//! store. Release ends the gesture wherever the pointer is; leaving the
//! timeline does not. A click on a track background while idle selects the
//! track and asks for a seek.

use std::sync::Arc;

use reelcut_timeline::{ClipEdge, ClipStore, Timeline};
use tracing::debug;
use uuid::Uuid;

use crate::gesture::{Gesture, GestureSubscription, GestureToken};
use crate::hit::PointerTarget;
use crate::view::TimelineView;

/// Pointer input, with x relative to the left edge of the timeline viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f64, target: PointerTarget },
    /// `token` names the gesture the move belongs to; `None` means the
    /// current one.
    Move { x: f64, token: Option<GestureToken> },
    Up { x: f64 },
    Click { x: f64, target: PointerTarget },
    /// The pointer left the timeline element.
    Leave,
    /// Escape pressed.
    Cancel,
}

/// Observable interaction state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionState {
    Idle,
    Dragging { clip_id: Uuid, anchor_offset: f64 },
    Resizing { clip_id: Uuid, edge: ClipEdge },
}

/// What handling an event did, for the host to react to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionAction {
    /// Move the playhead here.
    Seek(f64),
    SelectTrack(Uuid),
    GestureStarted(GestureToken),
    /// A clip's span changed in the store.
    ClipChanged(Uuid),
    GestureEnded,
    /// The gesture was abandoned and its edits rolled back.
    Cancelled,
}

/// Turns pointer events into clip store edits.
#[derive(Debug)]
pub struct InteractionMachine {
    view: TimelineView,
    gesture: GestureSubscription,
    /// Snapshot at pointer-down, restored on cancel.
    gesture_start: Option<Arc<Timeline>>,
    swallow_click: bool,
}

impl InteractionMachine {
    pub fn new(view: TimelineView) -> Self {
        Self {
            view,
            gesture: GestureSubscription::new(),
            gesture_start: None,
            swallow_click: false,
        }
    }

    pub fn view(&self) -> &TimelineView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut TimelineView {
        &mut self.view
    }

    pub fn state(&self) -> InteractionState {
        match self.gesture.current() {
            None => InteractionState::Idle,
            Some(Gesture::Drag {
                clip_id,
                anchor_offset,
            }) => InteractionState::Dragging {
                clip_id,
                anchor_offset,
            },
            Some(Gesture::Resize { clip_id, edge }) => InteractionState::Resizing { clip_id, edge },
        }
    }

    /// Handle one pointer event against `store`.
    pub fn handle(&mut self, event: PointerEvent, store: &mut ClipStore) -> Vec<InteractionAction> {
        match event {
            PointerEvent::Down { x, target } => self.pointer_down(x, target, store),
            PointerEvent::Move { x, token } => self.pointer_move(x, token, store),
            PointerEvent::Up { .. } => self.pointer_up(),
            PointerEvent::Click { x, target } => self.click(x, target, store),
            PointerEvent::Leave => Vec::new(),
            PointerEvent::Cancel => self.cancel(store),
        }
    }

    /// Forget any gesture without touching the store, e.g. after the
    /// timeline was replaced.
    pub fn reset(&mut self) {
        self.gesture.end();
        self.gesture_start = None;
        self.swallow_click = false;
    }

    fn pointer_down(
        &mut self,
        x: f64,
        target: PointerTarget,
        store: &mut ClipStore,
    ) -> Vec<InteractionAction> {
        self.swallow_click = false;
        let (track_id, gesture) = match target {
            PointerTarget::ClipBody { track_id, clip_id } => {
                let Some((_, _, clip)) = store.timeline().find_clip(clip_id) else {
                    return Vec::new();
                };
                let pointer_time = self.pointer_time(x, store);
                let gesture = Gesture::Drag {
                    clip_id,
                    anchor_offset: pointer_time - clip.start_time,
                };
                (track_id, gesture)
            }
            PointerTarget::ClipEdge {
                track_id,
                clip_id,
                edge,
            } => {
                if store.timeline().find_clip(clip_id).is_none() {
                    return Vec::new();
                }
                (track_id, Gesture::Resize { clip_id, edge })
            }
            PointerTarget::TrackBackground { .. } | PointerTarget::Outside => return Vec::new(),
        };

        let mut actions = Vec::new();
        if self.gesture.end().is_some() {
            actions.push(InteractionAction::GestureEnded);
        }
        if store.select_track(Some(track_id)) {
            actions.push(InteractionAction::SelectTrack(track_id));
        }
        store.checkpoint();
        self.gesture_start = Some(store.snapshot());
        let token = self.gesture.start(gesture);
        debug!(?gesture, "Gesture started");
        actions.push(InteractionAction::GestureStarted(token));
        actions
    }

    fn pointer_move(
        &mut self,
        x: f64,
        token: Option<GestureToken>,
        store: &mut ClipStore,
    ) -> Vec<InteractionAction> {
        let Some(gesture) = self.gesture.current() else {
            return Vec::new();
        };
        if let Some(token) = token {
            if !self.gesture.is_current(token) {
                debug!(?token, "Ignoring move from a stale gesture");
                return Vec::new();
            }
        }

        let pointer_time = self.pointer_time(x, store);
        let changed = match gesture {
            Gesture::Drag {
                clip_id,
                anchor_offset,
            } => store.move_clip(clip_id, pointer_time - anchor_offset),
            Gesture::Resize { clip_id, edge } => store.resize_clip(clip_id, edge, pointer_time),
        };
        if changed {
            vec![InteractionAction::ClipChanged(gesture.clip_id())]
        } else {
            Vec::new()
        }
    }

    fn pointer_up(&mut self) -> Vec<InteractionAction> {
        match self.gesture.end() {
            Some(gesture) => {
                self.gesture_start = None;
                self.swallow_click = true;
                debug!(?gesture, "Gesture ended");
                vec![InteractionAction::GestureEnded]
            }
            None => Vec::new(),
        }
    }

    fn click(
        &mut self,
        x: f64,
        target: PointerTarget,
        store: &mut ClipStore,
    ) -> Vec<InteractionAction> {
        if std::mem::take(&mut self.swallow_click) || self.gesture.is_active() {
            return Vec::new();
        }
        let PointerTarget::TrackBackground { track_id } = target else {
            return Vec::new();
        };
        let mut actions = Vec::new();
        if store.select_track(Some(track_id)) {
            actions.push(InteractionAction::SelectTrack(track_id));
        }
        actions.push(InteractionAction::Seek(self.pointer_time(x, store)));
        actions
    }

    fn cancel(&mut self, store: &mut ClipStore) -> Vec<InteractionAction> {
        let Some(gesture) = self.gesture.end() else {
            return Vec::new();
        };
        if let Some(snapshot) = self.gesture_start.take() {
            store.rollback_to(snapshot);
        }
        self.swallow_click = true;
        debug!(?gesture, "Gesture cancelled");
        vec![InteractionAction::Cancelled]
    }

    fn pointer_time(&self, x: f64, store: &ClipStore) -> f64 {
        self.view.pointer_time(x, store.timeline().duration)
    }
}

impl Default for InteractionMachine {
    fn default() -> Self {
        Self::new(TimelineView::default())
    }
}
