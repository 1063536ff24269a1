//! I/O wrappers that report transferred bytes to a progress bar.
//!
//! [`ProgressReader`] and [`ProgressWriter`] wrap any [`Read`] or [`Write`] and
//! advance a borrowed [`ProgressBar`] by the number of bytes that actually went
//! through, e.g. while copying or hashing a file of known size.

use std::io::{self, Read, Write};

use crate::ProgressBar;

/// A wrapper around [`Read`] that advances a [`ProgressBar`] by bytes read.
pub struct ProgressReader<'a, R> {
    inner: R,
    bar: &'a ProgressBar,
}

impl<'a, R> ProgressReader<'a, R> {
    /// Creates a new `ProgressReader` wrapping `inner`.
    pub const fn new(inner: R, bar: &'a ProgressBar) -> Self {
        Self { inner, bar }
    }

    /// Returns the wrapped reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for ProgressReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.bar.inc(n as u64);
        Ok(n)
    }
}

/// A wrapper around [`Write`] that advances a [`ProgressBar`] by bytes written.
pub struct ProgressWriter<'a, W> {
    inner: W,
    bar: &'a ProgressBar,
}

impl<'a, W> ProgressWriter<'a, W> {
    /// Creates a new `ProgressWriter` wrapping `inner`.
    pub const fn new(inner: W, bar: &'a ProgressBar) -> Self {
        Self { inner, bar }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for ProgressWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.bar.inc(n as u64);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
