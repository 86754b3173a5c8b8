//! Slide Motion
//!
//! Frame-rate independent interpolation of a node's vertical offset between
//! two transforms.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Easing curves for slides
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EasingFunction {
    /// Constant speed
    Linear,
    /// Slow start, fast end
    EaseIn,
    /// Fast start, slow end
    EaseOut,
    /// Slow start and end
    #[default]
    EaseInOut,
}

impl EasingFunction {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t).powi(2),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

impl fmt::Display for EasingFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Linear => "linear",
            Self::EaseIn => "ease-in",
            Self::EaseOut => "ease-out",
            Self::EaseInOut => "ease-in-out",
        };
        f.write_str(name)
    }
}

impl FromStr for EasingFunction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "linear" => Ok(Self::Linear),
            "ease-in" => Ok(Self::EaseIn),
            "ease-out" => Ok(Self::EaseOut),
            "ease-in-out" => Ok(Self::EaseInOut),
            other => Err(format!(
                "unknown easing '{other}' (expected linear, ease-in, ease-out, ease-in-out)"
            )),
        }
    }
}

/// A node's vertical position, possibly mid-slide
#[derive(Clone, Copy, Debug)]
pub struct Slide {
    from_px: f32,
    to_px: f32,
    started: Instant,
    duration: Duration,
    easing: EasingFunction,
    /// Set once the completion has been reported
    settled: bool,
}

impl Slide {
    /// A node placed at `px` with no animation
    pub fn placed(px: f32, now: Instant) -> Self {
        Self {
            from_px: px,
            to_px: px,
            started: now,
            duration: Duration::ZERO,
            easing: EasingFunction::Linear,
            settled: true,
        }
    }

    /// Start a new slide from wherever this one currently is
    pub fn retarget(
        &self,
        to_px: f32,
        now: Instant,
        duration: Duration,
        easing: EasingFunction,
    ) -> Self {
        Self {
            from_px: self.offset_at(now),
            to_px,
            started: now,
            duration,
            easing,
            settled: false,
        }
    }

    /// Progress through the slide (0.0 to 1.0)
    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    /// Offset in pixels at `now`
    pub fn offset_at(&self, now: Instant) -> f32 {
        let eased = self.easing.apply(self.progress(now));
        self.from_px + (self.to_px - self.from_px) * eased
    }

    /// Whether the slide has reached its target but not yet been reported
    pub fn just_finished(&self, now: Instant) -> bool {
        !self.settled && self.progress(now) >= 1.0
    }

    /// Mark completion as reported
    pub fn settle(&mut self) {
        self.settled = true;
    }

    /// Whether the slide is still running
    pub fn is_moving(&self) -> bool {
        !self.settled
    }
}
