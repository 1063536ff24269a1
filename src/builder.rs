//! Fluent interface for constructing [`ProgressBar`] instances.
//!
//! [`ProgressBar::new`] covers the common case. The [`ProgressBuilder`] exposes
//! every knob: geometry, colors, strategies, the redraw throttle and the ETA
//! smoothing factor.
//!
//! # Time Travel
//!
//! The start instant can be set explicitly, which is useful when resuming a task
//! that started earlier or lining up the clocks of a batch of bars.

use std::time::Duration;

use compact_str::CompactString;
use web_time::Instant;

use crate::{
    Animation, Brackets, Color, ColorBlend, LineRegistry,
    error::{Error, Result},
    estimator::DEFAULT_SMOOTHING,
    progress::ProgressBar,
    style::Style,
};

/// Default bar width in cells.
pub const DEFAULT_WIDTH: usize = 50;

/// Default label text.
pub const DEFAULT_LABEL: &str = "Progress";

/// Default minimum time between two redraws.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Default minimum progress between two redraws.
pub const DEFAULT_MIN_DELTA: u64 = 1;

/// A builder for [`ProgressBar`] instances.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use pulse_progress::{Animation, Color, LineRegistry, ProgressBuilder};
///
/// let registry = LineRegistry::with_writer(std::io::sink());
/// let bar = ProgressBuilder::new(200u64)
///     .label("Downloading")
///     .width(30)
///     .bar_color(Color::from_hex("#44aa88")?)
///     .animation(Animation::Rainbow)
///     .min_interval(Duration::from_millis(50))
///     .build(&registry)?;
///
/// bar.update(100);
/// bar.complete();
/// # Ok::<(), pulse_progress::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct ProgressBuilder {
    pub(crate) total: u64,
    pub(crate) width: usize,
    pub(crate) label: CompactString,
    pub(crate) style: Style,
    pub(crate) min_interval: Duration,
    pub(crate) min_delta: u64,
    pub(crate) smoothing: f64,
    pub(crate) start: Option<Instant>,
}

impl ProgressBuilder {
    /// Starts building a bar that completes at `total` units.
    #[must_use]
    pub fn new(total: impl Into<u64>) -> Self {
        Self {
            total: total.into(),
            width: DEFAULT_WIDTH,
            label: DEFAULT_LABEL.into(),
            style: Style::default(),
            min_interval: DEFAULT_MIN_INTERVAL,
            min_delta: DEFAULT_MIN_DELTA,
            smoothing: DEFAULT_SMOOTHING,
            start: None,
        }
    }

    /// Sets the number of cells in the bar body.
    #[must_use]
    pub const fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Sets the label shown before the bar.
    #[must_use]
    pub fn label(mut self, label: impl Into<CompactString>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the cell color used when no blend strategy is set.
    #[must_use]
    pub const fn bar_color(mut self, color: Color) -> Self {
        self.style.bar_color = color;
        self
    }

    /// Sets the label color.
    #[must_use]
    pub const fn label_color(mut self, color: Color) -> Self {
        self.style.label_color = color;
        self
    }

    /// Sets the color of the time/throughput annotation.
    #[must_use]
    pub const fn time_color(mut self, color: Color) -> Self {
        self.style.time_color = color;
        self
    }

    /// Sets the frontier animation.
    #[must_use]
    pub fn animation(mut self, animation: Animation) -> Self {
        self.style.animation = animation;
        self
    }

    /// Sets the bracket strategy.
    #[must_use]
    pub fn brackets(mut self, brackets: Brackets) -> Self {
        self.style.brackets = brackets;
        self
    }

    /// Sets the per-cell color strategy.
    #[must_use]
    pub fn color_blend(mut self, blend: ColorBlend) -> Self {
        self.style.color_blend = Some(blend);
        self
    }

    /// Sets the time template (`%S` seconds, `%3N` milliseconds).
    #[must_use]
    pub fn time_format(mut self, format: impl Into<CompactString>) -> Self {
        self.style.time_format = Some(format.into());
        self
    }

    /// Replaces the whole style at once.
    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Minimum time between two throttled redraws.
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }

    /// Minimum progress between two throttled redraws.
    #[must_use]
    pub const fn min_delta(mut self, delta: u64) -> Self {
        self.min_delta = delta;
        self
    }

    /// Weight of the newest sample in the ETA moving average, in `(0, 1)`.
    #[must_use]
    pub const fn smoothing(mut self, alpha: f64) -> Self {
        self.smoothing = alpha;
        self
    }

    /// Sets the start time explicitly.
    #[must_use]
    pub const fn with_start_time(mut self, start: Instant) -> Self {
        self.start = Some(start);
        self
    }

    /// Sets the start time to `Instant::now()`.
    #[must_use]
    pub fn with_start_time_now(self) -> Self {
        self.with_start_time(Instant::now())
    }

    /// Validates the configuration, reserves a row in `registry` and returns the bar.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroTotal`] if the total is zero. No row is reserved in
    /// that case.
    pub fn build(self, registry: &LineRegistry) -> Result<ProgressBar> {
        if self.total == 0 {
            return Err(Error::ZeroTotal);
        }

        Ok(ProgressBar::from_builder(self, registry.clone()))
    }
}
