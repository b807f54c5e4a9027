//! Keeps a media handle and the editor's playback state in step.

use std::sync::Arc;

use crossbeam_channel::Receiver;
use reelcut_core::Result;
use reelcut_media::{MediaEvent, MediaHandle, MediaUrl};
use tracing::{debug, info, warn};

use crate::notify::{NotificationSink, Toast};

/// Playhead and play flag as the editor sees them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackState {
    pub current_time: f64,
    pub is_playing: bool,
}

/// Drives a [`MediaHandle`] and mirrors what it reports.
pub struct PlaybackSync<H: MediaHandle> {
    handle: H,
    events: Receiver<MediaEvent>,
    state: PlaybackState,
    duration: f64,
    sink: Arc<dyn NotificationSink>,
    error_reported: bool,
}

impl<H: MediaHandle> PlaybackSync<H> {
    pub fn new(handle: H, sink: Arc<dyn NotificationSink>) -> Self {
        let events = handle.events();
        Self {
            handle,
            events,
            state: PlaybackState::default(),
            duration: 0.0,
            sink,
            error_reported: false,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Duration of the loaded media, `0` before metadata arrives.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }

    pub fn handle_mut(&mut self) -> &mut H {
        &mut self.handle
    }

    /// Move the playhead, clamped to `[0, duration]`. Returns the time used.
    pub fn seek(&mut self, time: f64) -> f64 {
        let time = if time.is_finite() {
            time.clamp(0.0, self.duration.max(0.0))
        } else {
            0.0
        };
        self.handle.seek(time);
        self.state.current_time = time;
        debug!(time, "Seek");
        time
    }

    /// Play if paused, pause if playing.
    ///
    /// The flag only flips once the handle confirms. A refusal raises a
    /// "Playback error" toast and leaves the state as it was.
    pub async fn toggle_play(&mut self) -> Result<()> {
        let outcome = if self.state.is_playing {
            self.handle.pause().await
        } else {
            self.handle.play().await
        };
        match outcome {
            Ok(()) => {
                self.state.is_playing = !self.state.is_playing;
                debug!(playing = self.state.is_playing, "Toggled playback");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Playback request failed");
                self.sink.notify(Toast::destructive(
                    "Playback error",
                    "There was an error playing the video",
                ));
                Err(e)
            }
        }
    }

    /// Point the handle at a new resource and wait for its metadata.
    ///
    /// Playhead and play flag reset before anything is awaited, and events
    /// still queued from the previous resource are discarded. On failure the
    /// user gets one "Video Error" toast.
    pub async fn load(&mut self, url: &MediaUrl) -> Result<f64> {
        self.state = PlaybackState::default();
        self.duration = 0.0;
        self.error_reported = false;
        let stale = self.events.try_iter().count();
        if stale > 0 {
            debug!(stale, "Dropped events from the previous media");
        }
        self.handle.load(url);

        let result = self.handle.wait_metadata().await;
        self.pump();
        match result {
            Ok(duration) => {
                self.duration = duration;
                info!(url = %url, duration, "Media ready");
                Ok(duration)
            }
            Err(e) => {
                if !self.error_reported {
                    self.report_media_error(&e.to_string());
                }
                Err(e)
            }
        }
    }

    /// Apply every event the handle has reported since the last call.
    ///
    /// Returns how many events were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            applied += 1;
            match event {
                MediaEvent::TimeUpdate(time) => self.state.current_time = time,
                MediaEvent::LoadedMetadata { duration } => self.duration = duration,
                MediaEvent::Ended => self.state.is_playing = false,
                MediaEvent::Error(message) => self.report_media_error(&message),
            }
        }
        applied
    }

    fn report_media_error(&mut self, message: &str) {
        warn!(error = %message, "Media error");
        self.error_reported = true;
        self.sink
            .notify(Toast::destructive("Video Error", "Failed to load video"));
    }
}
