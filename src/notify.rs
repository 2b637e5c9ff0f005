//! Single-slot toast notifications. Every user-visible outcome funnels through
//! one floating message that slides in from the right edge and back out after
//! a fixed hold. Showing a new message while one is up destroys the old one
//! outright, there is no queue.
//!
//! All timing methods take the current instant as a parameter so tests can
//! drive the lifecycle with a simulated clock.

use std::time::{Duration, Instant};

use ratatui::style::Color;

/// Delay between creation and the start of the slide-in.
pub const ENTER_DELAY: Duration = Duration::from_millis(100);
/// Duration of each slide, in and out.
pub const SLIDE: Duration = Duration::from_millis(300);
/// How long the toast rests fully visible.
pub const HOLD: Duration = Duration::from_millis(3000);

/// Message severity. Controls only the background color; timing and placement
/// are identical across severities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    /// Fixed severity-to-color table.
    pub fn color(self) -> Color {
        match self {
            Severity::Success => Color::Rgb(0x10, 0xb9, 0x81),
            Severity::Error => Color::Rgb(0xef, 0x44, 0x44),
            Severity::Warning => Color::Rgb(0xf5, 0x9e, 0x0b),
            Severity::Info => Color::Rgb(0x3b, 0x82, 0xf6),
        }
    }
}

/// Where a toast is in its lifecycle at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    /// Created but still off-screen, waiting out [`ENTER_DELAY`].
    Pending,
    /// Sliding in from the right edge.
    SlideIn,
    /// Fully visible.
    Hold,
    /// Sliding back out.
    SlideOut,
}

/// One on-screen notification.
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub severity: Severity,
    shown_at: Instant,
}

impl Toast {
    pub fn show(message: impl Into<String>, severity: Severity, now: Instant) -> Toast {
        Toast {
            message: message.into(),
            severity,
            shown_at: now,
        }
    }

    /// The lifecycle phase at `now`, or `None` once the slide-out has
    /// finished and the toast should be dropped.
    pub fn phase(&self, now: Instant) -> Option<ToastPhase> {
        let elapsed = now.saturating_duration_since(self.shown_at);
        if elapsed < ENTER_DELAY {
            Some(ToastPhase::Pending)
        } else if elapsed < ENTER_DELAY + SLIDE {
            Some(ToastPhase::SlideIn)
        } else if elapsed < ENTER_DELAY + SLIDE + HOLD {
            Some(ToastPhase::Hold)
        } else if elapsed < ENTER_DELAY + SLIDE + HOLD + SLIDE {
            Some(ToastPhase::SlideOut)
        } else {
            None
        }
    }

    /// How far off-screen the toast sits at `now`, as a fraction of its own
    /// width. `Some(0.0)` is fully visible, `Some(1.0)` fully off the right
    /// edge, `None` means expired. The renderer multiplies this by the toast
    /// width to decide how many columns have entered the frame.
    pub fn offset_fraction(&self, now: Instant) -> Option<f64> {
        let elapsed = now.saturating_duration_since(self.shown_at);
        match self.phase(now)? {
            ToastPhase::Pending => Some(1.0),
            ToastPhase::SlideIn => {
                let into = elapsed - ENTER_DELAY;
                Some(1.0 - into.as_secs_f64() / SLIDE.as_secs_f64())
            }
            ToastPhase::Hold => Some(0.0),
            ToastPhase::SlideOut => {
                let into = elapsed - (ENTER_DELAY + SLIDE + HOLD);
                Some(into.as_secs_f64() / SLIDE.as_secs_f64())
            }
        }
    }

    /// Whether the toast has finished its slide-out and can be dropped.
    pub fn is_expired(&self, now: Instant) -> bool {
        self.phase(now).is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(start: Instant, ms: u64) -> Instant {
        start + Duration::from_millis(ms)
    }

    #[test]
    fn lifecycle_walks_through_every_phase() {
        let start = Instant::now();
        let toast = Toast::show("hello", Severity::Info, start);

        assert_eq!(toast.phase(at(start, 50)), Some(ToastPhase::Pending));
        assert_eq!(toast.phase(at(start, 250)), Some(ToastPhase::SlideIn));
        assert_eq!(toast.phase(at(start, 1000)), Some(ToastPhase::Hold));
        assert_eq!(toast.phase(at(start, 3550)), Some(ToastPhase::SlideOut));
        assert_eq!(toast.phase(at(start, 3800)), None);
        assert!(toast.is_expired(at(start, 3800)));
    }

    #[test]
    fn offset_fraction_tracks_the_slides() {
        let start = Instant::now();
        let toast = Toast::show("hello", Severity::Success, start);

        assert_eq!(toast.offset_fraction(at(start, 50)), Some(1.0));

        // Halfway through the slide-in: 150 ms of a 300 ms slide.
        let mid_in = toast.offset_fraction(at(start, 250)).unwrap();
        assert!((mid_in - 0.5).abs() < 1e-9);

        assert_eq!(toast.offset_fraction(at(start, 2000)), Some(0.0));

        // Halfway back out again.
        let mid_out = toast.offset_fraction(at(start, 3550)).unwrap();
        assert!((mid_out - 0.5).abs() < 1e-9);

        assert_eq!(toast.offset_fraction(at(start, 4000)), None);
    }

    #[test]
    fn times_before_creation_read_as_pending() {
        let start = Instant::now();
        let toast = Toast::show("hello", Severity::Warning, at(start, 500));
        assert_eq!(toast.phase(start), Some(ToastPhase::Pending));
        assert_eq!(toast.offset_fraction(start), Some(1.0));
    }

    #[test]
    fn severity_colors_match_the_fixed_table() {
        assert_eq!(Severity::Success.color(), Color::Rgb(0x10, 0xb9, 0x81));
        assert_eq!(Severity::Error.color(), Color::Rgb(0xef, 0x44, 0x44));
        assert_eq!(Severity::Warning.color(), Color::Rgb(0xf5, 0x9e, 0x0b));
        assert_eq!(Severity::Info.color(), Color::Rgb(0x3b, 0x82, 0xf6));
    }
}
