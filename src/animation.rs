//! Glyphs for the animated frontier cell.
//!
//! The frontier is the single cell between the filled and empty parts of an
//! unfinished bar. An [`Animation`] picks the glyph drawn there from the time
//! elapsed since the bar started and, optionally, the current percentage.

use std::{fmt, sync::Arc, time::Duration};

use compact_str::CompactString;

const PULSE_FRAMES: [&str; 14] = [
    "▁", "▂", "▃", "▄", "▅", "▆", "▇", "█", "▇", "▆", "▅", "▄", "▃", "▂",
];

const RAINBOW_FRAMES: [&str; 5] = ["🌈", "ROYGBIV", "🌟", "✨", "⚡"];

/// Signature of a user-supplied animation: `(elapsed, percent) -> glyph`.
pub type AnimationFn = dyn Fn(Duration, u32) -> CompactString + Send + Sync;

/// Frame selection strategy for the frontier cell.
#[derive(Clone, Default)]
pub enum Animation {
    /// A block that rises and falls at ten frames per second.
    #[default]
    Pulse,
    /// A static full block; the frontier looks like part of the filled bar.
    SolidBlock,
    /// Emoji cycle at two frames per second, nudged forward every 20%.
    Rainbow,
    /// Caller-provided frame function.
    Custom(Arc<AnimationFn>),
}

impl Animation {
    /// Wraps a closure as a custom animation.
    ///
    /// The closure runs while the bar's state is locked; calling back into the
    /// same [`ProgressBar`](crate::ProgressBar) from it deadlocks.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(Duration, u32) -> CompactString + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Returns the glyph to draw at `elapsed` into the run with `percent` complete.
    #[must_use]
    pub fn frame(&self, elapsed: Duration, percent: u32) -> CompactString {
        let secs = elapsed.as_secs_f64();
        match self {
            Self::Pulse => {
                let idx = (secs * 10.0) as usize % PULSE_FRAMES.len();
                PULSE_FRAMES[idx].into()
            }
            Self::SolidBlock => "█".into(),
            Self::Rainbow => {
                let idx = (secs * 2.0 + f64::from(percent) / 20.0) as usize % RAINBOW_FRAMES.len();
                RAINBOW_FRAMES[idx].into()
            }
            Self::Custom(f) => f(elapsed, percent),
        }
    }
}

impl fmt::Debug for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pulse => f.write_str("Pulse"),
            Self::SolidBlock => f.write_str("SolidBlock"),
            Self::Rainbow => f.write_str("Rainbow"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::Animation;

    /// Pulse Cycle
    /// The pulse advances one frame per 100ms and wraps after 14 frames.
    #[test]
    fn test_pulse_cycle() {
        let pulse = Animation::Pulse;
        assert_eq!(pulse.frame(Duration::ZERO, 0), "▁");
        assert_eq!(pulse.frame(Duration::from_millis(750), 0), "█");
        assert_eq!(pulse.frame(Duration::from_millis(1350), 99), "▂");
        assert_eq!(pulse.frame(Duration::from_millis(1450), 99), "▁");
    }

    /// Rainbow Percent Offset
    /// Percent shifts the rainbow cycle one frame per 20%.
    #[test]
    fn test_rainbow_offset() {
        let rainbow = Animation::Rainbow;
        assert_eq!(rainbow.frame(Duration::ZERO, 0), "🌈");
        assert_eq!(rainbow.frame(Duration::ZERO, 20), "ROYGBIV");
        assert_eq!(rainbow.frame(Duration::from_millis(500), 20), "🌟");
        assert_eq!(rainbow.frame(Duration::ZERO, 100), "🌈");
    }

    /// Custom Strategy
    /// Closures receive both elapsed time and percent.
    #[test]
    fn test_custom_animation() {
        let anim = Animation::custom(|elapsed, percent| {
            format!("{}:{percent}", elapsed.as_secs()).into()
        });
        assert_eq!(anim.frame(Duration::from_secs(3), 42), "3:42");
        assert_eq!(Animation::SolidBlock.frame(Duration::from_secs(9), 1), "█");
        assert_eq!(format!("{anim:?}"), "Custom(..)");
    }
}
