//! # `pulse_progress`
//!
//! Thread-safe, multi-line, animated progress bars for ANSI terminals.
//!
//! `pulse_progress` draws any number of bars at once, each on its own terminal row,
//! updated in place from any number of threads. It is designed to be:
//!
//! * **Coordinated**: A shared [`LineRegistry`] assigns every bar a fixed row and
//!   serializes all terminal writes, so concurrent redraws never clobber each other.
//! * **Throttled**: Redraws only happen when both a minimum interval and a minimum
//!   progress delta have passed, so tight loops can report on every iteration.
//! * **Pluggable**: Brackets, per-cell colors and the animated frontier glyph are
//!   strategies that can be swapped for closures at any time.
//!
//! ## Modules
//!
//! * [`animation`]: Frame selection for the animated frontier cell.
//! * [`builder`]: Fluent interface for constructing [`ProgressBar`] instances.
//! * [`color`]: ANSI color codes, including `#RRGGBB` truecolor.
//! * [`estimator`]: Exponential-moving-average ETA and throughput.
//! * [`frame`]: Composition of a rendered line.
//! * [`io`]: Wrappers for [`std::io::Read`] and [`std::io::Write`] that report bytes.
//! * [`iter`]: Extension traits for tracking progress on Iterators.
//! * [`progress`]: The [`ProgressBar`] state machine and snapshots.
//! * [`registry`]: Row allocation and serialized terminal output.
//! * [`style`]: Colors and strategies that make up a bar's look.
//!
//! ## Example
//!
//! ```no_run
//! use std::thread;
//! use pulse_progress::{LineRegistry, ProgressBar};
//!
//! let registry = LineRegistry::stdout();
//! let workers: Vec<_> = (0..3)
//!     .map(|i| {
//!         let bar = ProgressBar::builder(100u64)
//!             .label(format!("worker {i}"))
//!             .build(&registry)?;
//!         Ok(thread::spawn(move || {
//!             for n in 0..=100 {
//!                 bar.update(n);
//!             }
//!             bar.complete();
//!         }))
//!     })
//!     .collect::<Result<_, pulse_progress::Error>>()?;
//!
//! for worker in workers {
//!     worker.join().unwrap();
//! }
//! # Ok::<(), pulse_progress::Error>(())
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod animation;
pub mod builder;
pub mod color;
pub mod error;
pub mod estimator;
pub mod frame;
pub mod io;
pub mod iter;
pub mod progress;
pub mod registry;
pub mod style;

#[cfg(test)]
mod testing;

pub use animation::Animation;
pub use builder::ProgressBuilder;
pub use color::Color;
pub use error::{Error, Result};
pub use estimator::{RateEstimator, RateSample};
pub use frame::{Frame, FrameBuilder};
pub use io::{ProgressReader, ProgressWriter};
pub use iter::{ProgressIter, ProgressIteratorExt};
pub use progress::{ProgressBar, ProgressSnapshot};
pub use registry::{LineRegistry, RegistryGuard};
pub use style::{Brackets, ColorBlend, Style};
