//! Visual configuration of a progress bar.
//!
//! A [`Style`] bundles colors, the [`Animation`] for the frontier cell and two
//! pluggable strategies: [`Brackets`] chooses the glyphs around the bar from the
//! current percentage, and [`ColorBlend`] colors each cell individually.
//!
//! ```
//! use pulse_progress::{Brackets, Color, ColorBlend};
//!
//! // Blue left half, red right half.
//! let blend = ColorBlend::custom(|cell, width, _percent| {
//!     if cell < width / 2 { Color::BrightBlue } else { Color::BrightRed }
//! });
//!
//! // Brackets that change as the bar fills.
//! let brackets = Brackets::custom(|percent| match percent {
//!     0..30 => ("<<".into(), ">>".into()),
//!     30..70 => ("{".into(), "}".into()),
//!     _ => ("⟪".into(), "⟫".into()),
//! });
//! # let _ = (blend, brackets);
//! ```

use std::{fmt, sync::Arc};

use compact_str::CompactString;

use crate::{Animation, Color};

/// Signature of a user-supplied bracket strategy: `percent -> (open, close)`.
pub type BracketFn = dyn Fn(u32) -> (CompactString, CompactString) + Send + Sync;

/// Signature of a user-supplied cell color strategy: `(cell, width, percent) -> color`.
pub type ColorBlendFn = dyn Fn(usize, usize, u32) -> Color + Send + Sync;

/// Glyphs drawn on either side of the bar.
#[derive(Clone)]
pub enum Brackets {
    /// The same pair regardless of progress.
    Fixed(CompactString, CompactString),
    /// A pair chosen from the current percentage.
    Custom(Arc<BracketFn>),
}

impl Default for Brackets {
    fn default() -> Self {
        Self::Fixed("[".into(), "]".into())
    }
}

impl Brackets {
    /// Wraps a closure as a percent-dependent bracket strategy.
    ///
    /// The closure runs while the bar's state is locked; calling back into the
    /// same [`ProgressBar`](crate::ProgressBar) from it deadlocks.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(u32) -> (CompactString, CompactString) + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Returns the `(open, close)` pair for `percent`.
    #[must_use]
    pub fn pair(&self, percent: u32) -> (CompactString, CompactString) {
        match self {
            Self::Fixed(open, close) => (open.clone(), close.clone()),
            Self::Custom(f) => f(percent),
        }
    }
}

impl fmt::Debug for Brackets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(open, close) => f.debug_tuple("Fixed").field(open).field(close).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Per-cell color of the filled part of the bar and its frontier.
#[derive(Clone)]
pub enum ColorBlend {
    /// Every cell in one color.
    Solid(Color),
    /// A color chosen per cell from `(cell, width, percent)`.
    Custom(Arc<ColorBlendFn>),
}

impl ColorBlend {
    /// Wraps a closure as a per-cell color strategy.
    ///
    /// The closure runs while the bar's state is locked; calling back into the
    /// same [`ProgressBar`](crate::ProgressBar) from it deadlocks.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(usize, usize, u32) -> Color + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Returns the color of `cell` in a bar `width` cells wide at `percent`.
    #[must_use]
    pub fn color_at(&self, cell: usize, width: usize, percent: u32) -> Color {
        match self {
            Self::Solid(color) => *color,
            Self::Custom(f) => f(cell, width, percent),
        }
    }
}

impl fmt::Debug for ColorBlend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Solid(color) => f.debug_tuple("Solid").field(color).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Everything that affects how a bar looks, as opposed to where it is.
#[derive(Clone, Debug)]
pub struct Style {
    /// Cell color used when no [`ColorBlend`] is set.
    pub bar_color: Color,
    /// Color of the label prefix.
    pub label_color: Color,
    /// Color of the ETA/elapsed and throughput annotation.
    pub time_color: Color,
    /// Color of the percentage figure.
    pub percent_color: Color,
    /// Bracket strategy.
    pub brackets: Brackets,
    /// Per-cell color strategy; `None` paints every cell with `bar_color`.
    pub color_blend: Option<ColorBlend>,
    /// Frontier animation.
    pub animation: Animation,
    /// Template for the time figure, with `%S` (seconds) and `%3N` (milliseconds).
    pub time_format: Option<CompactString>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            bar_color: Color::BrightCyan,
            label_color: Color::BrightWhite,
            time_color: Color::Magenta,
            percent_color: Color::BrightGreen,
            brackets: Brackets::default(),
            color_blend: None,
            animation: Animation::default(),
            time_format: None,
        }
    }
}

impl Style {
    /// Color of `cell`, honoring the blend strategy when one is set.
    #[must_use]
    pub fn cell_color(&self, cell: usize, width: usize, percent: u32) -> Color {
        self.color_blend
            .as_ref()
            .map_or(self.bar_color, |blend| blend.color_at(cell, width, percent))
    }
}

#[cfg(test)]
mod tests {
    use super::{Brackets, ColorBlend, Style};
    use crate::Color;

    /// Bracket Boundaries
    /// A percent-dependent strategy flips exactly at its thresholds.
    #[test]
    fn test_bracket_thresholds() {
        let brackets = Brackets::custom(|p| {
            if p < 30 {
                ("<<".into(), ">>".into())
            } else {
                ("{".into(), "}".into())
            }
        });
        assert_eq!(brackets.pair(29), ("<<".into(), ">>".into()));
        assert_eq!(brackets.pair(30), ("{".into(), "}".into()));
        assert_eq!(Brackets::default().pair(99), ("[".into(), "]".into()));
    }

    /// Blend Fallback
    /// Without a blend the bar color is used; setting one overrides it.
    #[test]
    fn test_cell_color() {
        let mut style = Style {
            bar_color: Color::Yellow,
            ..Style::default()
        };
        assert_eq!(style.cell_color(7, 10, 50), Color::Yellow);

        style.color_blend = Some(ColorBlend::custom(|cell, width, _| {
            if cell < width / 2 { Color::Blue } else { Color::Red }
        }));
        assert_eq!(style.cell_color(4, 10, 50), Color::Blue);
        assert_eq!(style.cell_color(5, 10, 50), Color::Red);
        assert_eq!(ColorBlend::Solid(Color::Gray).color_at(0, 1, 0), Color::Gray);
    }
}
