//! Track types for the timeline.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clip::Clip;

/// Kind of track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
    Text,
}

/// A lane of one media kind holding an ordered set of clips.
///
/// Clips sit behind `Arc` so that edits can replace one clip and share the
/// rest with the previous snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Unique track ID
    pub id: Uuid,
    /// Track kind
    #[serde(rename = "type")]
    pub kind: TrackKind,
    pub start_time: f64,
    pub end_time: f64,
    /// Clips in display order
    pub clips: Vec<Arc<Clip>>,
}

impl Track {
    /// Create an empty track spanning `[start_time, end_time]`.
    pub fn new(kind: TrackKind, start_time: f64, end_time: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            start_time,
            end_time,
            clips: Vec::new(),
        }
    }

    /// Find a clip by UUID. Returns (index, &Clip).
    pub fn find_clip(&self, id: Uuid) -> Option<(usize, &Arc<Clip>)> {
        self.clips.iter().enumerate().find(|(_, clip)| clip.id == id)
    }

    /// First clip, in display order, whose `[start, end)` contains `time`.
    pub fn clip_at_time(&self, time: f64) -> Option<(usize, &Arc<Clip>)> {
        self.clips
            .iter()
            .enumerate()
            .find(|(_, clip)| clip.span().contains(time))
    }

    /// Check whether `clip` would overlap any other clip on this track.
    pub fn overlaps_others(&self, clip: &Clip) -> bool {
        self.clips
            .iter()
            .any(|other| other.id != clip.id && other.span().overlaps(clip.span()))
    }

    /// Number of clips in this track.
    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }
}
