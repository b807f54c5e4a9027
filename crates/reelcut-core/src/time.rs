//! Time and ruler geometry.
//!
//! Media time is kept in seconds as `f64`, the unit the playback handle
//! reports. Everything that turns time into screen space (or back) lives here
//! so the timeline and the interaction layer agree on one mapping.

use serde::{Deserialize, Serialize};
use std::fmt;

// ── Frame rate ──────────────────────────────────────────────────

/// Frame rate as a rational number (e.g., 30000/1001 for 29.97 fps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRate {
    /// Numerator (e.g., 30000)
    pub numerator: u32,
    /// Denominator (e.g., 1001)
    pub denominator: u32,
}

impl FrameRate {
    /// Create a new frame rate.
    #[inline]
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Convert to frames per second as f64.
    #[inline]
    pub fn to_fps_f64(self) -> f64 {
        self.numerator as f64 / self.denominator.max(1) as f64
    }

    /// Duration of a single frame in seconds.
    #[inline]
    pub fn frame_duration(self) -> f64 {
        1.0 / self.to_fps_f64()
    }

    /// Common frame rates
    pub const FPS_24: Self = Self::new(24, 1);
    pub const FPS_25: Self = Self::new(25, 1);
    pub const FPS_29_97: Self = Self::new(30000, 1001);
    pub const FPS_30: Self = Self::new(30, 1);
    pub const FPS_60: Self = Self::new(60, 1);
}

impl Default for FrameRate {
    /// Timecodes assume 30 fps unless configured otherwise.
    fn default() -> Self {
        Self::FPS_30
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fps = self.to_fps_f64();
        if (fps - fps.round()).abs() < 0.001 {
            write!(f, "{} fps", fps.round() as u32)
        } else {
            write!(f, "{:.3} fps", fps)
        }
    }
}

// ── Spans ───────────────────────────────────────────────────────

/// A half-open span of media time, `[start, end)`, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeSpan {
    /// Start time (inclusive)
    pub start: f64,
    /// End time (exclusive)
    pub end: f64,
}

impl TimeSpan {
    /// Create a span from start and end times.
    #[inline]
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Length of the span.
    #[inline]
    pub fn duration(self) -> f64 {
        self.end - self.start
    }

    /// Check if a time is within `[start, end)`.
    #[inline]
    pub fn contains(self, time: f64) -> bool {
        time >= self.start && time < self.end
    }

    /// Check if a time lies strictly between the two boundaries.
    #[inline]
    pub fn contains_strictly(self, time: f64) -> bool {
        time > self.start && time < self.end
    }

    /// Check if two spans overlap.
    pub fn overlaps(self, other: Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The same span moved by `delta` seconds.
    #[inline]
    pub fn shifted(self, delta: f64) -> Self {
        Self {
            start: self.start + delta,
            end: self.end + delta,
        }
    }
}

// ── Zoom ────────────────────────────────────────────────────────

/// Horizontal zoom factor of the timeline ruler.
///
/// Always inside `[MIN, MAX]` and on the `STEP` grid, so stepping in and out
/// repeatedly lands on the same values.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Zoom(f64);

impl Zoom {
    pub const MIN: f64 = 0.5;
    pub const MAX: f64 = 2.0;
    pub const STEP: f64 = 0.1;
    pub const DEFAULT: f64 = 1.0;

    /// Create a zoom level, clamping into range and snapping to the step grid.
    pub fn new(value: f64) -> Self {
        if !value.is_finite() {
            return Self(Self::DEFAULT);
        }
        let steps = (value.clamp(Self::MIN, Self::MAX) / Self::STEP).round();
        Self(Self::from_steps(steps))
    }

    /// The raw factor.
    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }

    /// One step closer in.
    pub fn zoom_in(self) -> Self {
        Self::new(self.0 + Self::STEP)
    }

    /// One step further out.
    pub fn zoom_out(self) -> Self {
        Self::new(self.0 - Self::STEP)
    }

    fn from_steps(steps: f64) -> f64 {
        // Dividing by 10 instead of multiplying by 0.1 keeps 1.0 exact.
        steps / (1.0 / Self::STEP).round()
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl From<f64> for Zoom {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Zoom> for f64 {
    fn from(value: Zoom) -> Self {
        value.0
    }
}

// ── Mapping ─────────────────────────────────────────────────────

/// Position of `time` along the ruler, as a percentage of the viewport width.
///
/// `(time / duration) * 100 * zoom`. A timeline without duration maps
/// everything to `0`.
pub fn time_to_position(time: f64, duration: f64, zoom: f64) -> f64 {
    if duration <= 0.0 || !duration.is_finite() {
        return 0.0;
    }
    (time / duration) * 100.0 * zoom
}

/// Media time under a pointer at `pixel_x` (relative to the viewport's left edge).
///
/// The result is clamped to `[0, duration]`.
pub fn position_to_time(
    pixel_x: f64,
    viewport_width: f64,
    scroll_offset: f64,
    duration: f64,
    zoom: f64,
) -> f64 {
    let content_width = viewport_width * zoom;
    if content_width <= 0.0 || duration <= 0.0 || !duration.is_finite() {
        return 0.0;
    }
    let fraction = (pixel_x + scroll_offset) / content_width;
    (fraction * duration).clamp(0.0, duration)
}

/// The mapper inputs that change while the user works: size, scroll and zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineViewport {
    /// Visible width in pixels
    pub width: f64,
    /// Horizontal scroll offset in pixels
    pub scroll: f64,
    /// Ruler zoom
    pub zoom: Zoom,
}

impl TimelineViewport {
    /// Create a viewport of the given width, unscrolled at default zoom.
    pub fn new(width: f64) -> Self {
        Self {
            width,
            scroll: 0.0,
            zoom: Zoom::default(),
        }
    }

    /// Width of the whole ruler content in pixels.
    #[inline]
    pub fn content_width(&self) -> f64 {
        self.width * self.zoom.get()
    }

    /// Percentage offset of `time` for a timeline of `duration`.
    pub fn time_to_percent(&self, time: f64, duration: f64) -> f64 {
        time_to_position(time, duration, self.zoom.get())
    }

    /// Viewport-relative pixel x of `time`.
    pub fn time_to_pixel(&self, time: f64, duration: f64) -> f64 {
        self.time_to_percent(time, duration) / 100.0 * self.width - self.scroll
    }

    /// Time under a viewport-relative pixel x, clamped to `[0, duration]`.
    pub fn pixel_to_time(&self, pixel_x: f64, duration: f64) -> f64 {
        position_to_time(pixel_x, self.width, self.scroll, duration, self.zoom.get())
    }

    /// Largest scroll offset that still shows content.
    pub fn max_scroll(&self) -> f64 {
        (self.content_width() - self.width).max(0.0)
    }

    /// Set the scroll offset, clamped to the scrollable range.
    pub fn scroll_to(&mut self, offset: f64) {
        self.scroll = offset.clamp(0.0, self.max_scroll());
    }
}

impl Default for TimelineViewport {
    fn default() -> Self {
        Self::new(1000.0)
    }
}

// ── Formatting ──────────────────────────────────────────────────

fn sanitize(seconds: f64) -> f64 {
    if seconds.is_finite() {
        seconds.max(0.0)
    } else {
        0.0
    }
}

/// Format as `HH:MM:SS:FF` at 30 fps.
pub fn format_timecode(seconds: f64) -> String {
    format_timecode_at(seconds, FrameRate::FPS_30)
}

/// Format as `HH:MM:SS:FF` where `FF` is the frame index at `rate`.
///
/// Every field is floored, never rounded.
pub fn format_timecode_at(seconds: f64, rate: FrameRate) -> String {
    let t = sanitize(seconds);
    let hours = (t / 3600.0).floor() as u64;
    let minutes = ((t % 3600.0) / 60.0).floor() as u64;
    let secs = (t % 60.0).floor() as u64;
    let frames = ((t % 1.0) * rate.to_fps_f64()).floor() as u64;
    format!("{hours:02}:{minutes:02}:{secs:02}:{frames:02}")
}

/// Format as `M:SS.mmm` for the transport bar.
pub fn format_short(seconds: f64) -> String {
    let t = sanitize(seconds);
    let minutes = (t / 60.0).floor() as u64;
    let secs = (t % 60.0).floor() as u64;
    let millis = ((t % 1.0) * 1000.0).floor() as u64;
    format!("{minutes}:{secs:02}.{millis:03}")
}
