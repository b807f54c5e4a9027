//! Viewport state for the timeline ruler.

use reelcut_core::{format_timecode_at, FrameRate, TimelineViewport, Zoom};
use reelcut_timeline::Clip;

use crate::hit::ClipExtent;

/// Width in pixels of the grab area at each end of a clip.
pub const DEFAULT_HANDLE_WIDTH: f64 = 8.0;

/// Minor ticks closer together than this are not emitted.
const MIN_TICK_SPACING: f64 = 2.0;

/// Major marks closer together than this switch to a coarser stride.
pub const MIN_MAJOR_SPACING: f64 = 8.0;

/// Candidate spacings between major marks, in seconds.
const MAJOR_STRIDES: [f64; 12] = [
    1.0, 2.0, 5.0, 10.0, 15.0, 30.0, 60.0, 300.0, 600.0, 900.0, 1800.0, 3600.0,
];

/// Seconds between major marks when one second spans `second_px` pixels.
fn major_stride(second_px: f64) -> f64 {
    if !second_px.is_finite() || second_px <= 0.0 {
        return f64::MAX;
    }
    let needed = MIN_MAJOR_SPACING / second_px;
    MAJOR_STRIDES
        .iter()
        .copied()
        .find(|&stride| stride >= needed)
        .unwrap_or_else(|| (needed / 3600.0).ceil() * 3600.0)
}

/// A tick on the time ruler.
#[derive(Debug, Clone, PartialEq)]
pub struct RulerMark {
    pub time: f64,
    /// Offset as a percentage of the viewport width
    pub percent: f64,
    /// Whole-second marks are major and carry a timecode label
    pub major: bool,
    pub label: Option<String>,
}

/// Everything the host needs to place the ruler, clips and playhead.
#[derive(Debug, Clone)]
pub struct TimelineView {
    pub viewport: TimelineViewport,
    pub handle_width: f64,
    pub frame_rate: FrameRate,
}

impl TimelineView {
    pub fn new(width: f64) -> Self {
        Self {
            viewport: TimelineViewport::new(width),
            handle_width: DEFAULT_HANDLE_WIDTH,
            frame_rate: FrameRate::default(),
        }
    }

    pub fn zoom(&self) -> Zoom {
        self.viewport.zoom
    }

    /// Set the zoom (clamped and snapped), keeping the scroll in range.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.viewport.zoom = Zoom::new(zoom);
        self.viewport.scroll_to(self.viewport.scroll);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.viewport.zoom.zoom_in().get());
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.viewport.zoom.zoom_out().get());
    }

    /// The host resized the timeline.
    pub fn set_width(&mut self, width: f64) {
        self.viewport.width = width.max(0.0);
        self.viewport.scroll_to(self.viewport.scroll);
    }

    pub fn scroll_to(&mut self, offset: f64) {
        self.viewport.scroll_to(offset);
    }

    /// Media time under a viewport-relative pointer x.
    pub fn pointer_time(&self, x: f64, duration: f64) -> f64 {
        self.viewport.pixel_to_time(x, duration)
    }

    /// Viewport-relative pixel extent of a clip.
    pub fn clip_extent(&self, clip: &Clip, duration: f64) -> ClipExtent {
        ClipExtent {
            left: self.viewport.time_to_pixel(clip.start_time, duration),
            right: self.viewport.time_to_pixel(clip.end_time, duration),
        }
    }

    /// Playhead offset as a percentage of the viewport width.
    pub fn playhead_percent(&self, time: f64, duration: f64) -> f64 {
        self.viewport.time_to_percent(time, duration)
    }

    /// `current / duration` as two timecodes, for the timeline header.
    pub fn header_label(&self, current: f64, duration: f64) -> String {
        format!(
            "{} / {}",
            format_timecode_at(current, self.frame_rate),
            format_timecode_at(duration, self.frame_rate)
        )
    }

    /// Ruler ticks: labelled major marks plus one minor tick per frame.
    ///
    /// Major marks fall every second, widening to a coarser stride when
    /// seconds are packed tighter than [`MIN_MAJOR_SPACING`]. Frame ticks are
    /// dropped when they would be closer than a couple of pixels.
    pub fn ruler_marks(&self, duration: f64) -> Vec<RulerMark> {
        if duration <= 0.0 || !duration.is_finite() {
            return Vec::new();
        }
        let mut marks = Vec::new();
        let second_px = self.viewport.content_width() / duration;
        let stride = major_stride(second_px);
        let last = (duration.ceil() / stride).floor() as u64;
        for k in 0..=last {
            let time = k as f64 * stride;
            marks.push(RulerMark {
                time,
                percent: self.viewport.time_to_percent(time, duration),
                major: true,
                label: Some(format_timecode_at(time, self.frame_rate)),
            });
        }

        let fps = self.frame_rate.to_fps_f64();
        let frame_px = self.viewport.content_width() / (duration * fps);
        if frame_px >= MIN_TICK_SPACING {
            let frames = (duration * fps).ceil() as u64;
            for f in 0..frames {
                let time = f as f64 / fps;
                if time.fract() == 0.0 {
                    continue;
                }
                marks.push(RulerMark {
                    time,
                    percent: self.viewport.time_to_percent(time, duration),
                    major: false,
                    label: None,
                });
            }
        }
        marks
    }
}

impl Default for TimelineView {
    fn default() -> Self {
        Self::new(TimelineViewport::default().width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_controls_stay_in_range() {
        let mut view = TimelineView::new(1000.0);
        for _ in 0..20 {
            view.zoom_in();
        }
        assert_eq!(view.zoom().get(), 2.0);
        for _ in 0..20 {
            view.zoom_out();
        }
        assert_eq!(view.zoom().get(), 0.5);
    }

    #[test]
    fn test_zoom_out_pulls_scroll_back() {
        let mut view = TimelineView::new(1000.0);
        view.set_zoom(2.0);
        view.scroll_to(1000.0);
        view.set_zoom(1.0);
        assert_eq!(view.viewport.scroll, 0.0);
    }

    #[test]
    fn test_clip_extent() {
        let view = TimelineView::new(1000.0);
        let clip = Clip::new("blob:a", 2.0, 5.0);
        let extent = view.clip_extent(&clip, 10.0);
        assert_eq!(extent.left, 200.0);
        assert_eq!(extent.right, 500.0);
    }

    #[test]
    fn test_header_label() {
        let view = TimelineView::new(1000.0);
        assert_eq!(view.header_label(90.5, 3661.033), "00:01:30:15 / 01:01:01:00");
    }

    #[test]
    fn test_ruler_marks_major_every_second() {
        let view = TimelineView::new(1000.0);
        let marks = view.ruler_marks(2.5);
        let majors: Vec<_> = marks.iter().filter(|m| m.major).collect();
        assert_eq!(majors.len(), 4);
        assert_eq!(majors[1].label.as_deref(), Some("00:00:01:00"));
        // 1000px over 75 frames leaves room for frame ticks
        assert!(marks.iter().any(|m| !m.major));
    }

    #[test]
    fn test_ruler_drops_dense_frame_ticks() {
        let view = TimelineView::new(1000.0);
        let marks = view.ruler_marks(120.0);
        assert!(marks.iter().all(|m| m.major));
        assert_eq!(marks.len(), 121);
    }

    #[test]
    fn test_ruler_widens_major_stride() {
        let view = TimelineView::new(1000.0);
        // 600 s over 1000 px is under 2 px per second: every 5 s instead
        let marks = view.ruler_marks(600.0);
        assert_eq!(marks.len(), 121);
        assert_eq!(marks[1].time, 5.0);
        assert_eq!(marks[1].label.as_deref(), Some("00:00:05:00"));
        assert_eq!(marks.last().unwrap().time, 600.0);
    }

    #[test]
    fn test_ruler_bounded_for_long_timelines() {
        let view = TimelineView::new(1000.0);
        for duration in [86_400.0, 1.0e9, 1.0e300] {
            let marks = view.ruler_marks(duration);
            assert!(!marks.is_empty());
            // 1000 px / 8 px per mark, plus both ends
            assert!(marks.len() <= 127);
            assert!(marks.iter().all(|m| m.time.is_finite()));
        }
    }

    #[test]
    fn test_ruler_with_zero_width() {
        let view = TimelineView::new(0.0);
        let marks = view.ruler_marks(10.0);
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].time, 0.0);
    }
}
