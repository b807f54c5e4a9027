//! Reelcut Media - playback handles and media resources
//!
//! This crate handles:
//! - The contract a playback element fulfils (`MediaHandle`)
//! - Events a handle reports back (`MediaEvent`)
//! - Object-URL style resource lifetimes (`ResourceRegistry`)
//! - A deterministic in-process player for tests and the CLI

pub mod handle;
pub mod resource;
pub mod virtual_player;

pub use handle::{MediaEvent, MediaHandle};
pub use resource::{MediaSource, MediaUrl, ResourceRegistry};
pub use virtual_player::VirtualPlayer;
