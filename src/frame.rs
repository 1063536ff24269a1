//! Composition of one rendered progress line.
//!
//! A line is made of three segments, concatenated in order:
//!
//! 1. the colored label,
//! 2. the bar body between brackets, followed by the percentage,
//! 3. the time/throughput annotation (see [`time_annotation`]).
//!
//! Percent and filled width are integer truncations: 1 of 3 is `33%`, never a
//! rounded `34%`.

use std::time::Duration;

use crate::{color::RESET, estimator::RateSample, style::Style};

const FILLED: &str = "█";

/// `floor(current * 100 / total)`; zero when `total` is zero.
#[must_use]
pub fn percent(current: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    (u128::from(current) * 100 / u128::from(total)) as u32
}

/// `floor(current * width / total)`; zero when `total` is zero.
#[must_use]
pub fn filled_cells(current: u64, total: u64, width: usize) -> usize {
    if total == 0 {
        return 0;
    }
    (u128::from(current) * width as u128 / u128::from(total)) as usize
}

/// The figures one line is rendered from.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    /// Label text.
    pub label: &'a str,
    /// Completed units.
    pub current: u64,
    /// Units at completion.
    pub total: u64,
    /// Bar width in cells.
    pub width: usize,
    /// Time since the bar started.
    pub elapsed: Duration,
    /// Latest ETA and throughput.
    pub rate: RateSample,
}

impl Frame<'_> {
    /// Whether the bar is full.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.current >= self.total
    }

    /// Integer percentage complete.
    #[must_use]
    pub fn percent(&self) -> u32 {
        percent(self.current, self.total)
    }
}

/// Renders [`Frame`]s with a given [`Style`].
#[derive(Clone, Copy, Debug)]
pub struct FrameBuilder<'a> {
    style: &'a Style,
}

impl<'a> FrameBuilder<'a> {
    /// Creates a builder that renders with `style`.
    #[must_use]
    pub const fn new(style: &'a Style) -> Self {
        Self { style }
    }

    /// Renders the complete line for `frame`.
    #[must_use]
    pub fn render(&self, frame: &Frame<'_>) -> String {
        let mut line = self.label(frame.label);
        line.push_str(&self.bar(frame));
        line.push_str(&time_annotation(
            self.style,
            frame.elapsed,
            frame.rate,
            frame.is_complete(),
        ));
        line
    }

    /// The colored label followed by a space and a reset.
    #[must_use]
    pub fn label(&self, label: &str) -> String {
        format!("{}{label} {RESET}", self.style.label_color)
    }

    /// Brackets, cells and percentage.
    #[must_use]
    pub fn bar(&self, frame: &Frame<'_>) -> String {
        let style = self.style;
        let percent = frame.percent();
        let filled = filled_cells(frame.current, frame.total, frame.width);
        let (open, close) = style.brackets.pair(percent);

        let mut bar = String::with_capacity(frame.width * 8 + 32);
        bar.push_str(&open);
        for cell in 0..frame.width {
            if cell < filled {
                let color = style.cell_color(cell, frame.width, percent);
                bar.push_str(&color.ansi_code());
                bar.push_str(FILLED);
            } else if cell == filled && !frame.is_complete() {
                let color = style.cell_color(cell, frame.width, percent);
                let glyph = style.animation.frame(frame.elapsed, percent);
                bar.push_str(&color.ansi_code());
                bar.push_str(&glyph);
            } else {
                bar.push_str(RESET);
                bar.push(' ');
            }
        }
        bar.push_str(RESET);
        bar.push_str(&close);
        bar.push(' ');
        bar.push_str(&style.percent_color.ansi_code());
        bar.push_str(&percent.to_string());
        bar.push('%');
        bar.push_str(RESET);
        bar
    }
}

/// Renders the ETA (or elapsed time, once complete) and throughput.
///
/// Without a template the time is whole seconds. A template replaces the first
/// `%S` with whole seconds and the first `%3N` with zero-padded milliseconds;
/// later occurrences are left as they are.
#[must_use]
pub fn time_annotation(style: &Style, elapsed: Duration, rate: RateSample, complete: bool) -> String {
    let (prefix, time) = if complete {
        ("Elapsed", elapsed)
    } else {
        ("ETA", rate.eta)
    };

    let figure = match &style.time_format {
        Some(template) => template
            .replacen("%S", &time.as_secs().to_string(), 1)
            .replacen("%3N", &format!("{:03}", time.subsec_millis()), 1),
        None => time.as_secs().to_string(),
    };

    format!(
        "{} {prefix}: {figure}s [{:.2} it/s]{RESET}",
        style.time_color, rate.throughput
    )
}
