//! Clip types for the timeline.

use reelcut_core::TimeSpan;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::effect::Effect;

/// A time-bounded reference into a media source.
///
/// `start_time < end_time` holds for every clip the store publishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    /// Unique clip ID
    pub id: Uuid,
    /// Opaque reference to the media resource
    pub source: String,
    /// Timeline start in seconds (inclusive)
    pub start_time: f64,
    /// Timeline end in seconds (exclusive)
    pub end_time: f64,
    /// Effects applied to this clip, in order
    #[serde(default)]
    pub effects: Vec<Effect>,
}

impl Clip {
    /// Create a new clip with a fresh ID.
    pub fn new(source: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            source: source.into(),
            start_time,
            end_time,
            effects: Vec::new(),
        }
    }

    /// Get the timeline span.
    pub fn span(&self) -> TimeSpan {
        TimeSpan::new(self.start_time, self.end_time)
    }

    /// Length in seconds.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Split at `at`, which must lie strictly inside the clip.
    ///
    /// The left half keeps this clip's ID; the right half gets a new one and
    /// a copy of the effects.
    pub fn split_at(&self, at: f64) -> Option<(Clip, Clip)> {
        if !self.span().contains_strictly(at) {
            return None;
        }
        let left = Clip {
            end_time: at,
            ..self.clone()
        };
        let right = Clip {
            id: Uuid::new_v4(),
            start_time: at,
            ..self.clone()
        };
        Some((left, right))
    }

    /// The same clip starting at `start`, duration unchanged.
    pub fn moved_to(&self, start: f64) -> Clip {
        let duration = self.duration();
        Clip {
            start_time: start,
            end_time: start + duration,
            ..self.clone()
        }
    }
}
