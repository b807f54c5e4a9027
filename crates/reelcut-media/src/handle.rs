//! The media handle contract.

use std::future::Future;

use crossbeam_channel::Receiver;
use reelcut_core::Result;

use crate::resource::MediaUrl;

/// Something a media handle reports without being asked.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Playback position moved (seconds).
    TimeUpdate(f64),
    /// Metadata finished loading.
    LoadedMetadata { duration: f64 },
    /// Playback reached the end of the media.
    Ended,
    /// The resource failed to load or decode.
    Error(String),
}

/// A playback element bound to one media resource at a time.
///
/// Position changes and metadata arrive as [`MediaEvent`]s on the channel
/// returned by [`events`](MediaHandle::events), in the order they happened.
pub trait MediaHandle: Send {
    /// Current playback position in seconds.
    fn current_time(&self) -> f64;

    /// Move the playback position.
    fn seek(&mut self, time: f64);

    /// Media duration, `None` until metadata has loaded.
    fn duration(&self) -> Option<f64>;

    fn is_paused(&self) -> bool;

    /// Point the handle at a new resource. Resets position and pauses.
    fn load(&mut self, url: &MediaUrl);

    /// Resolve once metadata for the current resource is known.
    fn wait_metadata(&mut self) -> impl Future<Output = Result<f64>> + Send;

    /// Start playback. May be refused.
    fn play(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Pause playback.
    fn pause(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Event stream for this handle.
    fn events(&self) -> Receiver<MediaEvent>;
}
