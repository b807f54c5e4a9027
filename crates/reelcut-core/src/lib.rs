//! Reelcut Core - Foundation types for the timeline editor
//!
//! This crate provides the types every other Reelcut crate agrees on:
//! - Time/geometry mapping between media seconds and ruler pixels
//! - Zoom and viewport state
//! - Timecode formatting
//! - The shared error type

pub mod error;
pub mod time;

pub use error::{ReelcutError, Result};
pub use time::{
    format_short, format_timecode, format_timecode_at, position_to_time, time_to_position,
    FrameRate, TimeSpan, TimelineViewport, Zoom,
};
