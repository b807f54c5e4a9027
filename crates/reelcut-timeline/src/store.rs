//! The clip store: owner of the current timeline snapshot.
//!
//! Every edit publishes a new `Arc<Timeline>`. Only the touched track and
//! clip are reallocated; everything else is shared with the previous
//! snapshot, so observers can diff with `Arc::ptr_eq`. Edits that change
//! nothing keep the snapshot itself and report `false` (or `None`).
//!
//! Undo/redo keeps whole snapshots rather than inverse commands; with
//! structural sharing a snapshot costs one allocation per touched object.

use std::sync::Arc;

use reelcut_core::{ReelcutError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::clip::Clip;
use crate::timeline::Timeline;
use crate::track::{Track, TrackKind};

/// Shortest clip a resize may produce, in seconds.
pub const MIN_CLIP_LENGTH: f64 = 0.1;

/// Default number of undo steps kept.
pub const DEFAULT_HISTORY_DEPTH: usize = 200;

/// Which edge of a clip a resize moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipEdge {
    Left,
    Right,
}

/// What the store does with an edit that would make two clips on one track
/// overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Overlapping clips are kept as they are.
    #[default]
    Allow,
    /// The edit is refused and the snapshot is left untouched.
    Reject,
}

/// Tunables for move and resize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditPolicy {
    /// Keep moved clips inside `[0, duration]`.
    pub clamp_moves: bool,
    pub overlap: OverlapPolicy,
    /// Resize never shrinks a clip below this many seconds.
    pub min_clip_length: f64,
}

impl EditPolicy {
    /// Moves are not clamped, so a clip may be dragged past either end of
    /// the timeline.
    pub fn compatible() -> Self {
        Self {
            clamp_moves: false,
            ..Self::default()
        }
    }

    /// Reject a minimum clip length that is not a number or is below
    /// [`MIN_CLIP_LENGTH`].
    pub fn validate(&self) -> Result<()> {
        if !self.min_clip_length.is_finite() || self.min_clip_length < MIN_CLIP_LENGTH {
            return Err(ReelcutError::InvalidParameter(format!(
                "minClipLength {} must be at least {}",
                self.min_clip_length, MIN_CLIP_LENGTH
            )));
        }
        Ok(())
    }

    /// The same policy with the minimum clip length raised to
    /// [`MIN_CLIP_LENGTH`] where it falls short.
    pub fn sanitized(self) -> Self {
        if self.validate().is_ok() {
            return self;
        }
        debug!(
            min_clip_length = self.min_clip_length,
            "Raising minimum clip length"
        );
        Self {
            min_clip_length: MIN_CLIP_LENGTH,
            ..self
        }
    }
}

impl Default for EditPolicy {
    fn default() -> Self {
        Self {
            clamp_moves: true,
            overlap: OverlapPolicy::Allow,
            min_clip_length: MIN_CLIP_LENGTH,
        }
    }
}

// ── History ─────────────────────────────────────────────────────

#[derive(Debug)]
struct History {
    undo: Vec<Arc<Timeline>>,
    redo: Vec<Arc<Timeline>>,
    max_depth: usize,
}

impl History {
    fn new(max_depth: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            max_depth,
        }
    }

    fn record(&mut self, snapshot: Arc<Timeline>) {
        self.redo.clear();
        if self.undo.last().is_some_and(|top| Arc::ptr_eq(top, &snapshot)) {
            return;
        }
        self.undo.push(snapshot);
        if self.undo.len() > self.max_depth {
            self.undo.remove(0);
        }
    }

    fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

// ── Store ───────────────────────────────────────────────────────

/// Ordered tracks and clips, edited by replacing immutable snapshots.
#[derive(Debug)]
pub struct ClipStore {
    current: Arc<Timeline>,
    selected_track: Option<Uuid>,
    policy: EditPolicy,
    history: History,
}

impl ClipStore {
    /// Create a store with the default policy and history depth.
    pub fn new(timeline: Timeline) -> Self {
        Self::with_policy(timeline, EditPolicy::default(), DEFAULT_HISTORY_DEPTH)
    }

    /// Create a store with an explicit policy and history depth.
    pub fn with_policy(timeline: Timeline, policy: EditPolicy, history_depth: usize) -> Self {
        Self {
            current: Arc::new(timeline),
            selected_track: None,
            policy: policy.sanitized(),
            history: History::new(history_depth),
        }
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<Timeline> {
        Arc::clone(&self.current)
    }

    /// Borrow the current timeline.
    pub fn timeline(&self) -> &Timeline {
        &self.current
    }

    pub fn policy(&self) -> &EditPolicy {
        &self.policy
    }

    /// Replace the policy. A minimum clip length below
    /// [`MIN_CLIP_LENGTH`] is raised to it.
    pub fn set_policy(&mut self, policy: EditPolicy) {
        self.policy = policy.sanitized();
    }

    pub fn selected_track(&self) -> Option<Uuid> {
        self.selected_track
    }

    /// Select a track, or clear the selection with `None`.
    ///
    /// Selecting an ID that is not on the timeline is ignored.
    pub fn select_track(&mut self, track_id: Option<Uuid>) -> bool {
        if let Some(id) = track_id {
            if self.current.find_track(id).is_none() {
                debug!(track = %id, "Ignoring selection of unknown track");
                return false;
            }
        }
        if self.selected_track == track_id {
            return false;
        }
        self.selected_track = track_id;
        true
    }

    /// Replace the whole timeline, dropping history and selection.
    pub fn replace(&mut self, timeline: Timeline) {
        self.current = Arc::new(timeline);
        self.selected_track = None;
        self.history.clear();
    }

    // ── Edits ───────────────────────────────────────────────────

    /// Split the clip of `track_id` that contains `at` into two.
    ///
    /// Returns the ID of the new right-hand clip. Nothing happens when the
    /// track is unknown, no clip contains `at`, or `at` sits on a clip
    /// boundary.
    pub fn cut(&mut self, track_id: Uuid, at: f64) -> Option<Uuid> {
        let (ti, track) = self.current.find_track(track_id)?;
        let (ci, clip) = track.clip_at_time(at)?;
        let (left, right) = clip.split_at(at)?;
        let right_id = right.id;

        let mut track = Track::clone(track);
        track.clips[ci] = Arc::new(left);
        track.clips.insert(ci + 1, Arc::new(right));
        let next = self.with_track(ti, track);

        self.checkpoint();
        self.publish(next);
        debug!(track = %track_id, at, clip = %right_id, "Cut clip");
        Some(right_id)
    }

    /// Move a clip so it starts at `new_start`, keeping its duration.
    pub fn move_clip(&mut self, clip_id: Uuid, new_start: f64) -> bool {
        if !new_start.is_finite() {
            return false;
        }
        let Some((ti, ci, clip)) = self.current.find_clip(clip_id) else {
            return false;
        };

        let mut start = new_start;
        if self.policy.clamp_moves {
            let latest = (self.current.duration - clip.duration()).max(0.0);
            start = start.clamp(0.0, latest);
        }
        if start == clip.start_time {
            return false;
        }

        let moved = clip.moved_to(start);
        self.commit_clip(ti, ci, moved)
    }

    /// Drag one edge of a clip to `new_time`.
    ///
    /// The target is clamped to `[0, duration]`, then limited so the clip
    /// stays at least `min_clip_length` long.
    pub fn resize_clip(&mut self, clip_id: Uuid, edge: ClipEdge, new_time: f64) -> bool {
        if !new_time.is_finite() {
            return false;
        }
        let Some((ti, ci, clip)) = self.current.find_clip(clip_id) else {
            return false;
        };

        let target = self.current.clamp_time(new_time);
        let min_len = self.policy.min_clip_length;
        let resized = match edge {
            ClipEdge::Left => Clip {
                start_time: target.min(clip.end_time - min_len),
                ..Clip::clone(clip)
            },
            ClipEdge::Right => Clip {
                end_time: target.max(clip.start_time + min_len),
                ..Clip::clone(clip)
            },
        };
        if resized == **clip {
            return false;
        }
        self.commit_clip(ti, ci, resized)
    }

    /// Remove a clip from whichever track holds it.
    pub fn remove_clip(&mut self, clip_id: Uuid) -> bool {
        let Some((ti, ci, _)) = self.current.find_clip(clip_id) else {
            return false;
        };
        let mut track = Track::clone(&self.current.tracks[ti]);
        track.clips.remove(ci);
        let next = self.with_track(ti, track);

        self.checkpoint();
        self.publish(next);
        debug!(clip = %clip_id, "Removed clip");
        true
    }

    /// Append an empty track spanning the whole timeline. Returns its ID.
    pub fn add_track(&mut self, kind: TrackKind) -> Uuid {
        let track = Track::new(kind, 0.0, self.current.duration);
        let id = track.id;
        let mut next = Timeline::clone(&self.current);
        next.tracks.push(Arc::new(track));

        self.checkpoint();
        self.publish(next);
        debug!(track = %id, kind = ?kind, "Added track");
        id
    }

    /// Remove a track and its clips. Clears the selection if it pointed there.
    pub fn remove_track(&mut self, track_id: Uuid) -> bool {
        let Some((ti, _)) = self.current.find_track(track_id) else {
            return false;
        };
        let mut next = Timeline::clone(&self.current);
        next.tracks.remove(ti);

        self.checkpoint();
        self.publish(next);
        if self.selected_track == Some(track_id) {
            self.selected_track = None;
        }
        debug!(track = %track_id, "Removed track");
        true
    }

    // ── History ─────────────────────────────────────────────────

    /// Record the current snapshot as an undo step and clear redo.
    pub fn checkpoint(&mut self) {
        self.history.record(Arc::clone(&self.current));
    }

    /// Go back to the most recent checkpoint that differs from now.
    pub fn undo(&mut self) -> bool {
        while self
            .history
            .undo
            .last()
            .is_some_and(|top| Arc::ptr_eq(top, &self.current))
        {
            self.history.undo.pop();
        }
        let Some(previous) = self.history.undo.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.current, previous);
        self.history.redo.push(current);
        self.drop_stale_selection();
        true
    }

    /// Re-apply the most recently undone snapshot.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.history.redo.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.current, next);
        self.history.undo.push(current);
        self.drop_stale_selection();
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history
            .undo
            .iter()
            .any(|snapshot| !Arc::ptr_eq(snapshot, &self.current))
    }

    pub fn can_redo(&self) -> bool {
        !self.history.redo.is_empty()
    }

    /// Restore `snapshot`, discarding every edit made since it was taken.
    ///
    /// If `snapshot` is the newest undo step it is consumed, so an abandoned
    /// gesture leaves no trace in history.
    pub fn rollback_to(&mut self, snapshot: Arc<Timeline>) {
        if self
            .history
            .undo
            .last()
            .is_some_and(|top| Arc::ptr_eq(top, &snapshot))
        {
            self.history.undo.pop();
        }
        self.current = snapshot;
        self.drop_stale_selection();
    }

    // ── Helpers ─────────────────────────────────────────────────

    fn publish(&mut self, timeline: Timeline) {
        self.current = Arc::new(timeline);
    }

    fn with_track(&self, index: usize, track: Track) -> Timeline {
        let mut next = Timeline::clone(&self.current);
        next.tracks[index] = Arc::new(track);
        next
    }

    fn commit_clip(&mut self, ti: usize, ci: usize, clip: Clip) -> bool {
        let track = &self.current.tracks[ti];
        if self.policy.overlap == OverlapPolicy::Reject && track.overlaps_others(&clip) {
            debug!(clip = %clip.id, "Refusing edit that would overlap another clip");
            return false;
        }
        let clip_id = clip.id;
        let (start, end) = (clip.start_time, clip.end_time);
        let mut track = Track::clone(track);
        track.clips[ci] = Arc::new(clip);
        let next = self.with_track(ti, track);
        self.publish(next);
        debug!(clip = %clip_id, start, end, "Updated clip");
        true
    }

    fn drop_stale_selection(&mut self) {
        if let Some(id) = self.selected_track {
            if self.current.find_track(id).is_none() {
                self.selected_track = None;
            }
        }
    }
}
