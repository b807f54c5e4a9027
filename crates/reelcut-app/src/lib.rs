//! Reelcut App - editor session, playback and command line
//!
//! Ties the timeline model, the interaction machine and a media handle
//! together behind user-level verbs, and provides the `reelcut` commands.

pub mod cli;
pub mod config;
pub mod editor;
pub mod notify;
pub mod playback;

pub use config::{EditorConfig, CONFIG_ENV};
pub use editor::EditorSession;
pub use notify::{CollectingSink, NotificationSink, Toast, ToastVariant, TracingSink};
pub use playback::{PlaybackState, PlaybackSync};
