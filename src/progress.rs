//! The progress bar state machine.
//!
//! A [`ProgressBar`] owns one row of a [`LineRegistry`] and redraws it as the
//! caller reports progress. It moves through three states:
//!
//! * **Active:** reports are accepted and redrawn, subject to the throttle.
//! * **Completed:** [`ProgressBar::complete`] drew the final frame and moved the
//!   cursor below the row. Later reports are ignored; the row stays reserved.
//! * **Dropped:** the row is cleared. If it was the last allocated row the cursor
//!   is left at column 0 so no blank line dangles below the other bars.
//!
//! # Throttling
//!
//! A report only redraws when *both* at least `min_interval` has passed and the
//! position advanced by at least `min_delta` since the previous redraw. The
//! position is stored either way, so the next redraw shows it. Completion and
//! label changes always redraw.
//!
//! # Concurrency
//!
//! All methods take `&self`; share a bar between threads with an [`Arc`](std::sync::Arc).
//! The bar's own state is behind a [`Mutex`](parking_lot::Mutex), and every
//! terminal write happens inside one [`LineRegistry::with_exclusive_access`]
//! section, so redraws of different bars never interleave.

use std::time::Duration;

use compact_str::CompactString;
use parking_lot::Mutex;
use tracing::{debug, trace};
use web_time::Instant;

use crate::{
    Animation, Brackets, Color, ColorBlend, ProgressBuilder,
    error::Result,
    estimator::{RateEstimator, RateSample},
    frame::{self, Frame, FrameBuilder},
    registry::{LineRegistry, RegistryGuard},
    style::Style,
};

/// A live progress bar drawn on its own terminal row.
pub struct ProgressBar {
    registry: LineRegistry,
    row: usize,
    total: u64,
    width: usize,
    start: Instant,
    min_interval: Duration,
    min_delta: u64,
    state: Mutex<State>,
}

/// Mutable state, guarded by the bar's mutex.
struct State {
    label: CompactString,
    position: u64,
    style: Style,
    estimator: RateEstimator,
    last_render_time: Duration,
    last_render_pos: u64,
    rate: RateSample,
    finished: bool,
}

impl ProgressBar {
    /// Creates a bar with default settings that completes at `total` units.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroTotal`](crate::Error::ZeroTotal) if `total` is zero.
    pub fn new(total: impl Into<u64>, registry: &LineRegistry) -> Result<Self> {
        ProgressBuilder::new(total).build(registry)
    }

    /// Returns a builder for a bar that completes at `total` units.
    #[must_use]
    pub fn builder(total: impl Into<u64>) -> ProgressBuilder {
        ProgressBuilder::new(total)
    }

    pub(crate) fn from_builder(builder: ProgressBuilder, registry: LineRegistry) -> Self {
        let row = registry.allocate_row();
        debug!(row, total = builder.total, label = %builder.label, "created progress bar");

        Self {
            row,
            total: builder.total,
            width: builder.width,
            start: builder.start.unwrap_or_else(Instant::now),
            min_interval: builder.min_interval,
            min_delta: builder.min_delta,
            state: Mutex::new(State {
                label: builder.label,
                position: 0,
                style: builder.style,
                estimator: RateEstimator::new(builder.smoothing),
                last_render_time: Duration::ZERO,
                last_render_pos: 0,
                rate: RateSample::default(),
                finished: false,
            }),
            registry,
        }
    }

    // ========================================================================
    // Reporting
    // ========================================================================

    /// Reports the absolute position, clamped to the total.
    ///
    /// Redraws only when the throttle allows it. Ignored after completion.
    pub fn update(&self, position: u64) {
        self.update_with(position, false);
    }

    /// Like [`update`](Self::update); `force_complete` moves the position to the
    /// total regardless of `position`.
    ///
    /// The throttle still applies. Use [`complete`](Self::complete) to finish
    /// unconditionally.
    pub fn update_with(&self, position: u64, force_complete: bool) {
        let mut state = self.state.lock();
        if state.finished {
            return;
        }

        state.position = if force_complete {
            self.total
        } else {
            position.min(self.total)
        };
        self.report(&mut state);
    }

    /// Advances the position by `delta`.
    ///
    /// The read and the write happen under one lock, so concurrent calls never
    /// lose increments.
    pub fn inc(&self, delta: u64) {
        let mut state = self.state.lock();
        if state.finished {
            return;
        }

        state.position = state.position.saturating_add(delta).min(self.total);
        self.report(&mut state);
    }

    /// Draws the final frame at 100% and moves the cursor below this row.
    ///
    /// Bypasses the throttle. Calling it again has no effect, so the trailing
    /// newline is emitted exactly once.
    pub fn complete(&self) {
        let mut state = self.state.lock();
        if state.finished {
            return;
        }
        state.position = self.total;

        let elapsed = self.elapsed();
        self.registry.with_exclusive_access(|g| {
            self.redraw(&mut state, g, elapsed);
            g.finish_row(self.row);
        });
        state.finished = true;
        debug!(row = self.row, elapsed = ?elapsed, "progress bar completed");
    }

    // ========================================================================
    // Styling
    // ========================================================================

    /// Replaces the label and immediately redraws at the current position.
    pub fn set_label(&self, label: impl Into<CompactString>) {
        let mut state = self.state.lock();
        state.label = label.into();
        if !state.finished {
            let elapsed = self.elapsed();
            self.registry
                .with_exclusive_access(|g| self.redraw(&mut state, g, elapsed));
        }
    }

    /// Sets the bracket strategy used from the next redraw on.
    pub fn set_brackets(&self, brackets: Brackets) {
        self.state.lock().style.brackets = brackets;
    }

    /// Sets the per-cell color strategy used from the next redraw on.
    pub fn set_color_blend(&self, blend: ColorBlend) {
        self.state.lock().style.color_blend = Some(blend);
    }

    /// Sets the solid cell color; only visible while no blend strategy is set.
    pub fn set_bar_color(&self, color: Color) {
        self.state.lock().style.bar_color = color;
    }

    /// Sets the color of the time/throughput annotation.
    pub fn set_time_color(&self, color: Color) {
        self.state.lock().style.time_color = color;
    }

    /// Sets the time template (`%S` seconds, `%3N` milliseconds).
    pub fn set_time_format(&self, format: impl Into<CompactString>) {
        self.state.lock().style.time_format = Some(format.into());
    }

    /// Returns to plain whole-second time figures.
    pub fn clear_time_format(&self) {
        self.state.lock().style.time_format = None;
    }

    /// Sets the frontier animation.
    pub fn set_animation(&self, animation: Animation) {
        self.state.lock().style.animation = animation;
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The terminal row this bar draws on.
    #[must_use]
    pub const fn row(&self) -> usize {
        self.row
    }

    /// Units at completion.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Bar width in cells.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Current position.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.state.lock().position
    }

    /// Current label.
    #[must_use]
    pub fn label(&self) -> CompactString {
        self.state.lock().label.clone()
    }

    /// Whether [`complete`](Self::complete) has run.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state.lock().finished
    }

    /// Time since the bar started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Creates a consistent snapshot of the current state.
    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        let state = self.state.lock();
        ProgressSnapshot {
            label: state.label.clone(),
            row: self.row,
            position: state.position,
            total: self.total,
            elapsed: self.elapsed(),
            eta: state.rate.eta,
            throughput: state.rate.throughput,
            finished: state.finished,
        }
    }

    // Applies the throttle to a position already stored in `state`.
    fn report(&self, state: &mut State) {
        let elapsed = self.elapsed();
        let since_time = elapsed.saturating_sub(state.last_render_time);
        let since_pos = state.position.saturating_sub(state.last_render_pos);
        if since_time >= self.min_interval && since_pos >= self.min_delta {
            self.registry
                .with_exclusive_access(|g| self.redraw(state, g, elapsed));
        } else {
            trace!(row = self.row, position = state.position, "redraw throttled");
        }
    }

    // Must run inside the registry lock; `state` is the caller's guard.
    fn redraw(&self, state: &mut State, g: &RegistryGuard<'_>, elapsed: Duration) {
        state.rate = state.estimator.sample(
            elapsed,
            state.position,
            state.last_render_time,
            state.last_render_pos,
            self.total,
        );

        let frame = Frame {
            label: &state.label,
            current: state.position,
            total: self.total,
            width: self.width,
            elapsed,
            rate: state.rate,
        };
        let line = FrameBuilder::new(&state.style).render(&frame);
        g.draw_row(self.row, &line);

        trace!(
            row = self.row,
            position = state.position,
            percent = frame.percent(),
            "redrew progress bar"
        );
        state.last_render_time = elapsed;
        state.last_render_pos = state.position;
    }
}

impl Drop for ProgressBar {
    fn drop(&mut self) {
        self.registry.with_exclusive_access(|g| g.release_row(self.row));
    }
}

impl std::fmt::Debug for ProgressBar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressBar")
            .field("row", &self.row)
            .field("total", &self.total)
            .field("position", &self.position())
            .finish_non_exhaustive()
    }
}

/// A plain-data snapshot of a [`ProgressBar`] at a specific point in time.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressSnapshot {
    label: CompactString,
    row: usize,
    position: u64,
    total: u64,
    elapsed: Duration,
    eta: Duration,
    throughput: f64,
    finished: bool,
}

impl ProgressSnapshot {
    /// Returns the label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the terminal row.
    #[must_use]
    pub const fn row(&self) -> usize {
        self.row
    }

    /// Returns the position.
    #[must_use]
    pub const fn position(&self) -> u64 {
        self.position
    }

    /// Returns the total.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Returns the integer percentage complete.
    #[must_use]
    pub fn percent(&self) -> u32 {
        frame::percent(self.position, self.total)
    }

    /// Returns the time since the bar started.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Returns the ETA computed at the last redraw.
    #[must_use]
    pub const fn eta(&self) -> Duration {
        self.eta
    }

    /// Returns the throughput computed at the last redraw, in units per second.
    #[must_use]
    pub const fn throughput(&self) -> f64 {
        self.throughput
    }

    /// Returns whether the bar completed.
    #[must_use]
    pub const fn finished(&self) -> bool {
        self.finished
    }
}
