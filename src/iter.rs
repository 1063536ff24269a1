//! Iterator adapters that drive a progress bar.
//!
//! [`ProgressIteratorExt`] attaches a [`ProgressBar`] to any iterator: every
//! yielded item advances the bar by one and exhaustion completes it.
//!
//! # Totals
//!
//! [`progress_in`](ProgressIteratorExt::progress_in) takes the total from
//! [`Iterator::size_hint`] and therefore needs an exact bound. For iterators of
//! unknown length, build a bar with an explicit total and use
//! [`progress_with`](ProgressIteratorExt::progress_with).
//!
//! # Example
//!
//! ```
//! use pulse_progress::{LineRegistry, ProgressIteratorExt};
//!
//! let registry = LineRegistry::with_writer(std::io::sink());
//! let sum: u32 = vec![1, 2, 3].into_iter().progress_in(&registry)?.sum();
//! assert_eq!(sum, 6);
//! # Ok::<(), pulse_progress::Error>(())
//! ```

use compact_str::CompactString;

use crate::{
    LineRegistry,
    error::{Error, Result},
    progress::ProgressBar,
};

/// An iterator adapter that advances a [`ProgressBar`] on every item.
pub struct ProgressIter<I> {
    iter: I,
    bar: ProgressBar,
}

impl<I> ProgressIter<I> {
    /// Creates a new `ProgressIter`.
    ///
    /// Note: This is usually constructed via [`ProgressIteratorExt`] methods.
    pub const fn new(iter: I, bar: ProgressBar) -> Self {
        Self { iter, bar }
    }

    /// The bar being driven.
    pub const fn bar(&self) -> &ProgressBar {
        &self.bar
    }
}

impl<I: Iterator> Iterator for ProgressIter<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.iter.next();

        if item.is_some() {
            self.bar.inc(1);
        } else {
            self.bar.complete();
        }

        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

/// Extension trait to attach a progress bar to any iterator.
pub trait ProgressIteratorExt: Iterator + Sized {
    /// Creates a bar in `registry` sized from the iterator's exact length.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownLength`] if the size hint is not exact, and
    /// [`Error::ZeroTotal`] for an empty iterator.
    fn progress_in(self, registry: &LineRegistry) -> Result<ProgressIter<Self>> {
        let total = self.exact_len()?;
        let bar = ProgressBar::new(total, registry)?;
        Ok(ProgressIter::new(self, bar))
    }

    /// Like [`progress_in`](Self::progress_in) with a label.
    ///
    /// # Errors
    ///
    /// Same as [`progress_in`](Self::progress_in).
    fn progress_with_label(
        self,
        registry: &LineRegistry,
        label: impl Into<CompactString>,
    ) -> Result<ProgressIter<Self>> {
        let total = self.exact_len()?;
        let bar = ProgressBar::builder(total).label(label).build(registry)?;
        Ok(ProgressIter::new(self, bar))
    }

    /// Wraps the iterator using an existing bar.
    fn progress_with(self, bar: ProgressBar) -> ProgressIter<Self> {
        ProgressIter::new(self, bar)
    }

    /// Exact length from `size_hint`, if the bounds agree.
    fn exact_len(&self) -> Result<u64> {
        match self.size_hint() {
            (lower, Some(upper)) if lower == upper => Ok(lower as u64),
            _ => Err(Error::UnknownLength),
        }
    }
}

impl<I: Iterator> ProgressIteratorExt for I {}

#[cfg(test)]
mod tests {
    use super::ProgressIteratorExt as _;
    use crate::{Error, ProgressBar, testing::capture};

    /// Iterator Integration
    /// Wrapping tracks every item and completes the bar on exhaustion.
    #[test]
    fn test_iterator_adapter() {
        let (registry, buf) = capture();
        let data = [1, 2, 3, 4, 5];

        let mut iter = data.iter().progress_with_label(&registry, "iter_test").unwrap();
        assert_eq!(iter.bar().total(), 5, "total should be inferred from the slice length");

        let mut count = 0;
        for _ in iter.by_ref() {
            count += 1;
        }

        assert_eq!(count, 5);
        assert_eq!(iter.bar().position(), 5);
        assert!(iter.bar().is_finished(), "exhaustion should complete the bar");
        assert!(buf.contents().contains("iter_test"));
    }

    /// Unknown Length
    /// Iterators without an exact bound are rejected before a row is taken.
    #[test]
    fn test_unknown_length() {
        let (registry, _buf) = capture();
        let filtered = (0..10).filter(|n| n % 2 == 0);
        assert!(matches!(filtered.progress_in(&registry), Err(Error::UnknownLength)));
        assert!(matches!(std::iter::empty::<u8>().progress_in(&registry), Err(Error::ZeroTotal)));
        assert_eq!(registry.rows_allocated(), 0);

        let bar = ProgressBar::new(5u64, &registry).unwrap();
        let evens: Vec<_> = (0..10).filter(|n| n % 2 == 0).progress_with(bar).collect();
        assert_eq!(evens.len(), 5);
    }
}
