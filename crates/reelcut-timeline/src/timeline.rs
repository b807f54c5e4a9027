//! The timeline: ordered tracks plus an authoritative duration.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clip::Clip;
use crate::track::{Track, TrackKind};

/// Ordered tracks over `[0, duration]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    /// Tracks in display order
    pub tracks: Vec<Arc<Track>>,
    /// Duration in seconds of the media the timeline was built from
    pub duration: f64,
}

impl Timeline {
    /// Create an empty timeline.
    pub fn new(duration: f64) -> Self {
        Self {
            tracks: Vec::new(),
            duration,
        }
    }

    /// The timeline an import produces: one video track with one clip
    /// spanning the whole media.
    pub fn from_media(source: impl Into<String>, duration: f64) -> Self {
        let mut track = Track::new(TrackKind::Video, 0.0, duration);
        track.clips.push(Arc::new(Clip::new(source, 0.0, duration)));
        Self {
            tracks: vec![Arc::new(track)],
            duration,
        }
    }

    /// Find a track by UUID. Returns (index, &Track).
    pub fn find_track(&self, id: Uuid) -> Option<(usize, &Arc<Track>)> {
        self.tracks.iter().enumerate().find(|(_, track)| track.id == id)
    }

    /// Find a clip by UUID anywhere on the timeline.
    ///
    /// Returns (track index, clip index, &Clip).
    pub fn find_clip(&self, id: Uuid) -> Option<(usize, usize, &Arc<Clip>)> {
        self.tracks.iter().enumerate().find_map(|(ti, track)| {
            track.find_clip(id).map(|(ci, clip)| (ti, ci, clip))
        })
    }

    /// First track of the given kind.
    pub fn first_track_of(&self, kind: TrackKind) -> Option<&Arc<Track>> {
        self.tracks.iter().find(|track| track.kind == kind)
    }

    /// Total number of clips across all tracks.
    pub fn clip_count(&self) -> usize {
        self.tracks.iter().map(|track| track.clip_count()).sum()
    }

    /// Clamp a time into `[0, duration]`.
    pub fn clamp_time(&self, time: f64) -> f64 {
        if time.is_nan() {
            return 0.0;
        }
        time.clamp(0.0, self.duration.max(0.0))
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_media() {
        let timeline = Timeline::from_media("blob:x", 10.0);
        assert_eq!(timeline.tracks.len(), 1);
        let track = &timeline.tracks[0];
        assert_eq!(track.kind, TrackKind::Video);
        assert_eq!((track.start_time, track.end_time), (0.0, 10.0));
        assert_eq!(track.clips.len(), 1);
        assert_eq!((track.clips[0].start_time, track.clips[0].end_time), (0.0, 10.0));
    }

    #[test]
    fn test_find_clip_reports_indices() {
        let mut timeline = Timeline::from_media("blob:x", 10.0);
        let mut audio = Track::new(TrackKind::Audio, 0.0, 10.0);
        let clip = Arc::new(Clip::new("blob:x", 1.0, 2.0));
        let clip_id = clip.id;
        audio.clips.push(clip);
        timeline.tracks.push(Arc::new(audio));

        let (ti, ci, found) = timeline.find_clip(clip_id).unwrap();
        assert_eq!((ti, ci), (1, 0));
        assert_eq!(found.start_time, 1.0);
        assert_eq!(timeline.clip_count(), 2);
    }

    #[test]
    fn test_clamp_time() {
        let timeline = Timeline::new(5.0);
        assert_eq!(timeline.clamp_time(-1.0), 0.0);
        assert_eq!(timeline.clamp_time(7.0), 5.0);
        assert_eq!(timeline.clamp_time(f64::NAN), 0.0);
    }

    #[test]
    fn test_json_shape_matches_saved_projects() {
        let json = r#"{
            "tracks": [{
                "id": "6f1c2a8e-8a9e-4f57-9e34-0d7b1f3e5a11",
                "type": "video",
                "startTime": 0,
                "endTime": 10,
                "clips": [{
                    "id": "0b5d6c7e-2f43-4a1b-8c9d-112233445566",
                    "source": "blob:reelcut/1",
                    "startTime": 0,
                    "endTime": 10
                }]
            }],
            "duration": 10
        }"#;
        let timeline: Timeline = serde_json::from_str(json).unwrap();
        assert_eq!(timeline.duration, 10.0);
        assert_eq!(timeline.clip_count(), 1);
    }
}
