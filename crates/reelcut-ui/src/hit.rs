//! Hit testing pointer positions against clips.

use reelcut_timeline::{ClipEdge, Track};
use uuid::Uuid;

use crate::view::TimelineView;

/// Horizontal pixel span a clip occupies, viewport-relative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipExtent {
    pub left: f64,
    pub right: f64,
}

impl ClipExtent {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.left && x <= self.right
    }
}

/// Which part of a clip the pointer is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipHit {
    Body,
    Edge(ClipEdge),
}

/// What a pointer event landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    ClipBody { track_id: Uuid, clip_id: Uuid },
    ClipEdge { track_id: Uuid, clip_id: Uuid, edge: ClipEdge },
    TrackBackground { track_id: Uuid },
    Outside,
}

/// Hit test a pointer x against a clip's handles and body.
///
/// The left handle wins when a narrow clip makes the handles overlap.
pub fn hit_test_clip(extent: ClipExtent, x: f64, handle_width: f64) -> Option<ClipHit> {
    if !extent.contains(x) {
        return None;
    }
    if x < extent.left + handle_width {
        return Some(ClipHit::Edge(ClipEdge::Left));
    }
    if x > extent.right - handle_width {
        return Some(ClipHit::Edge(ClipEdge::Right));
    }
    Some(ClipHit::Body)
}

/// Resolve a pointer x on `track` to a target.
///
/// Later clips are drawn on top of earlier ones, so they are tested first.
pub fn target_at(view: &TimelineView, track: &Track, duration: f64, x: f64) -> PointerTarget {
    for clip in track.clips.iter().rev() {
        let extent = view.clip_extent(clip, duration);
        match hit_test_clip(extent, x, view.handle_width) {
            Some(ClipHit::Body) => {
                return PointerTarget::ClipBody {
                    track_id: track.id,
                    clip_id: clip.id,
                }
            }
            Some(ClipHit::Edge(edge)) => {
                return PointerTarget::ClipEdge {
                    track_id: track.id,
                    clip_id: clip.id,
                    edge,
                }
            }
            None => {}
        }
    }
    PointerTarget::TrackBackground { track_id: track.id }
}
