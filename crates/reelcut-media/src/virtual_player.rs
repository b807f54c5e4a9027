//! Deterministic in-process media handle.
//!
//! Decodes nothing. Metadata comes from the registered [`MediaSource`],
//! and the clock only moves when [`VirtualPlayer::advance`] is called, so
//! tests and the CLI can drive playback step by step.

use crossbeam_channel::{unbounded, Receiver, Sender};
use reelcut_core::{ReelcutError, Result};
use tracing::{debug, info, warn};

use crate::handle::{MediaEvent, MediaHandle};
use crate::resource::{MediaUrl, ResourceRegistry};

const LOAD_FAILURE: &str = "Failed to load video";

#[derive(Debug, Clone, PartialEq)]
enum LoadState {
    Empty,
    /// `load` was called; metadata not delivered yet.
    Pending(std::result::Result<f64, String>),
    Ready(f64),
    Failed(String),
}

/// Media handle backed by a [`ResourceRegistry`].
pub struct VirtualPlayer {
    registry: ResourceRegistry,
    url: Option<MediaUrl>,
    state: LoadState,
    current_time: f64,
    paused: bool,
    refuse_play: bool,
    events_tx: Sender<MediaEvent>,
    events_rx: Receiver<MediaEvent>,
}

impl VirtualPlayer {
    /// Create a player that resolves URLs through `registry`.
    pub fn new(registry: ResourceRegistry) -> Self {
        let (events_tx, events_rx) = unbounded();
        Self {
            registry,
            url: None,
            state: LoadState::Empty,
            current_time: 0.0,
            paused: true,
            refuse_play: false,
            events_tx,
            events_rx,
        }
    }

    /// Make every following `play` fail, as an autoplay policy would.
    pub fn set_refuse_play(&mut self, refuse: bool) {
        self.refuse_play = refuse;
    }

    /// URL of the loaded resource.
    pub fn url(&self) -> Option<&MediaUrl> {
        self.url.as_ref()
    }

    /// Advance the playback clock by `dt` seconds if playing.
    ///
    /// Emits `TimeUpdate`, and `Ended` once the end is reached.
    pub fn advance(&mut self, dt: f64) {
        let LoadState::Ready(duration) = self.state else {
            return;
        };
        if self.paused || dt <= 0.0 {
            return;
        }
        self.current_time = (self.current_time + dt).min(duration);
        self.emit(MediaEvent::TimeUpdate(self.current_time));
        if self.current_time >= duration {
            self.paused = true;
            debug!(duration, "Playback reached the end");
            self.emit(MediaEvent::Ended);
        }
    }

    /// Simulate a decode failure in the middle of playback.
    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(error = %message, "Media error");
        self.paused = true;
        self.state = LoadState::Failed(message.clone());
        self.emit(MediaEvent::Error(message));
    }

    fn emit(&self, event: MediaEvent) {
        // The receiver lives as long as `self`, so sending cannot fail.
        let _ = self.events_tx.send(event);
    }
}

impl MediaHandle for VirtualPlayer {
    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn seek(&mut self, time: f64) {
        let end = match self.state {
            LoadState::Ready(duration) => duration,
            _ => 0.0,
        };
        let time = if time.is_finite() { time.clamp(0.0, end) } else { 0.0 };
        self.current_time = time;
        self.emit(MediaEvent::TimeUpdate(time));
    }

    fn duration(&self) -> Option<f64> {
        match self.state {
            LoadState::Ready(duration) => Some(duration),
            _ => None,
        }
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn load(&mut self, url: &MediaUrl) {
        self.current_time = 0.0;
        self.paused = true;
        self.url = Some(url.clone());

        let outcome = match self.registry.resolve(url) {
            Some(source) => match source.duration {
                Some(d) if d.is_finite() && d > 0.0 => Ok(d),
                _ => Err(LOAD_FAILURE.to_string()),
            },
            None => Err(format!("{LOAD_FAILURE}: {url} is not a live resource")),
        };
        info!(url = %url, "Loading media");
        self.state = LoadState::Pending(outcome);
    }

    async fn wait_metadata(&mut self) -> Result<f64> {
        tokio::task::yield_now().await;
        match std::mem::replace(&mut self.state, LoadState::Empty) {
            LoadState::Ready(duration) => {
                self.state = LoadState::Ready(duration);
                Ok(duration)
            }
            LoadState::Pending(Ok(duration)) => {
                self.state = LoadState::Ready(duration);
                self.emit(MediaEvent::LoadedMetadata { duration });
                Ok(duration)
            }
            LoadState::Pending(Err(message)) => {
                self.state = LoadState::Failed(message.clone());
                self.emit(MediaEvent::Error(message.clone()));
                Err(ReelcutError::Load(message))
            }
            LoadState::Failed(message) => {
                self.state = LoadState::Failed(message.clone());
                Err(ReelcutError::Load(message))
            }
            LoadState::Empty => Err(ReelcutError::Load("no media loaded".into())),
        }
    }

    async fn play(&mut self) -> Result<()> {
        tokio::task::yield_now().await;
        if self.refuse_play {
            return Err(ReelcutError::Playback("play() request was refused".into()));
        }
        let LoadState::Ready(duration) = self.state else {
            return Err(ReelcutError::Playback("no media loaded".into()));
        };
        if self.current_time >= duration {
            self.current_time = 0.0;
        }
        self.paused = false;
        Ok(())
    }

    async fn pause(&mut self) -> Result<()> {
        tokio::task::yield_now().await;
        self.paused = true;
        Ok(())
    }

    fn events(&self) -> Receiver<MediaEvent> {
        self.events_rx.clone()
    }
}
