//! Error types for misconfigured progress bars.
//!
//! Only configuration mistakes are reported as errors. Reporting a position past
//! the total is normal usage and is clamped silently; terminal write failures are
//! logged by the [`LineRegistry`](crate::LineRegistry) and never surface here.

use compact_str::CompactString;
use thiserror::Error;

/// Errors raised while configuring colors or constructing a progress bar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A hex color was not of the form `#RRGGBB`.
    #[error("invalid hex color {input:?}: expected format #RRGGBB")]
    InvalidHexColor {
        /// The rejected input.
        input: CompactString,
    },

    /// A progress bar was configured with a total of zero.
    #[error("progress bar total must be greater than zero")]
    ZeroTotal,

    /// An iterator without an exact size hint was used where a total is required.
    #[error("iterator length is unknown; use `progress_with` and an explicit total")]
    UnknownLength,
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
