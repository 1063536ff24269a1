//! Terminal row allocation and serialized output.
//!
//! The [`LineRegistry`] is the arbiter shared by every [`ProgressBar`](crate::ProgressBar)
//! drawing to one terminal. It hands each bar a fixed row, tracks where the cursor
//! is, and serializes all output so concurrent redraws never interleave.
//!
//! # Synchronization Strategy
//!
//! A single re-entrant lock ([`parking_lot::ReentrantMutex`]) guards the row
//! counter, the cursor position and the output sink. Callers acquire it once per
//! redraw through [`LineRegistry::with_exclusive_access`], which makes the
//! sequence "move to row, clear row, write line" atomic. Re-entrancy lets a
//! thread that already holds the lock call back into the registry.
//!
//! # Cursor Model
//!
//! Rows are numbered from the line the cursor was on when the first row was
//! allocated. Rows are never recycled: reserving a new row moves to the bottom
//! row and emits a newline, so row `n` is always directly below row `n - 1`.

use std::{
    cell::{RefCell, RefMut},
    cmp::Ordering,
    fmt,
    io::{self, Write},
    sync::Arc,
};

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use tracing::{debug, warn};

/// Erases the entire line the cursor is on.
pub const CLEAR_LINE: &str = "\x1b[2K";

struct Terminal {
    out: Box<dyn Write + Send>,
    next_row: usize,
    cursor_row: usize,
}

impl Terminal {
    fn emit(&mut self, s: &str) {
        if let Err(error) = self.out.write_all(s.as_bytes()) {
            warn!(%error, "failed to write to terminal");
        }
    }

    fn flush(&mut self) {
        if let Err(error) = self.out.flush() {
            warn!(%error, "failed to flush terminal");
        }
    }
}

/// A cheaply cloneable handle to a shared terminal and its row assignments.
///
/// Clones refer to the same terminal state. Tests usually build one registry per
/// case over an in-memory writer with [`LineRegistry::with_writer`].
#[derive(Clone)]
pub struct LineRegistry {
    inner: Arc<ReentrantMutex<RefCell<Terminal>>>,
}

impl fmt::Debug for LineRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineRegistry")
            .field("rows_allocated", &self.rows_allocated())
            .field("cursor_row", &self.cursor_row())
            .finish_non_exhaustive()
    }
}

impl LineRegistry {
    /// Creates a registry drawing to standard output.
    ///
    /// On Windows, virtual terminal processing must already be enabled for the
    /// console, otherwise escape sequences are printed literally.
    #[must_use]
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }

    /// Creates a registry drawing to an arbitrary sink.
    pub fn with_writer<W>(out: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            inner: Arc::new(ReentrantMutex::new(RefCell::new(Terminal {
                out: Box::new(out),
                next_row: 0,
                cursor_row: 0,
            }))),
        }
    }

    /// Runs `body` while holding the terminal lock.
    ///
    /// Everything done through the [`RegistryGuard`] inside `body` appears on the
    /// terminal without any other thread's output in between. Nested calls from
    /// the same thread do not deadlock.
    pub fn with_exclusive_access<R>(&self, body: impl FnOnce(&RegistryGuard<'_>) -> R) -> R {
        let guard = RegistryGuard {
            lock: self.inner.lock(),
        };
        body(&guard)
    }

    /// Reserves the next row; see [`RegistryGuard::allocate_row`].
    pub fn allocate_row(&self) -> usize {
        self.with_exclusive_access(|g| g.allocate_row())
    }

    /// Moves the cursor to `row`; see [`RegistryGuard::move_cursor_to`].
    pub fn move_cursor_to(&self, row: usize) {
        self.with_exclusive_access(|g| g.move_cursor_to(row));
    }

    /// Erases `row`; see [`RegistryGuard::clear_row`].
    pub fn clear_row(&self, row: usize) {
        self.with_exclusive_access(|g| g.clear_row(row));
    }

    /// Reserves a blank spacer row that no bar owns.
    ///
    /// Useful to separate a finished group of bars from the next one.
    pub fn newline(&self) {
        self.with_exclusive_access(|g| {
            let row = g.reserve_row();
            debug!(row, "reserved spacer row");
        });
    }

    /// Number of rows handed out so far, spacer rows included.
    #[must_use]
    pub fn rows_allocated(&self) -> usize {
        self.with_exclusive_access(|g| g.terminal().next_row)
    }

    /// The row the registry believes the cursor is on.
    #[must_use]
    pub fn cursor_row(&self) -> usize {
        self.with_exclusive_access(|g| g.terminal().cursor_row)
    }

    /// The most recently allocated row, if any.
    #[must_use]
    pub fn last_row(&self) -> Option<usize> {
        self.with_exclusive_access(|g| g.last_row())
    }
}

/// Exclusive access to the terminal, obtained via [`LineRegistry::with_exclusive_access`].
pub struct RegistryGuard<'a> {
    lock: ReentrantMutexGuard<'a, RefCell<Terminal>>,
}

impl RegistryGuard<'_> {
    // Borrows are kept short so nested guards on the same thread never overlap.
    fn terminal(&self) -> RefMut<'_, Terminal> {
        self.lock.borrow_mut()
    }

    fn reserve_row(&self) -> usize {
        let row = {
            let mut t = self.terminal();
            let row = t.next_row;
            t.next_row += 1;
            row
        };
        if row > 0 {
            self.move_cursor_to(row - 1);
            let mut t = self.terminal();
            t.emit("\n");
            t.cursor_row = row;
        }
        row
    }

    /// Hands out the next row number.
    ///
    /// Every row except the first is opened with a newline below the previous
    /// row, so bars should be created in top-to-bottom display order.
    pub fn allocate_row(&self) -> usize {
        let row = self.reserve_row();
        self.flush();
        debug!(row, "allocated row");
        row
    }

    /// The most recently allocated row, if any.
    #[must_use]
    pub fn last_row(&self) -> Option<usize> {
        self.terminal().next_row.checked_sub(1)
    }

    /// Moves the cursor to column 0 of `row` with a relative up/down sequence.
    pub fn move_cursor_to(&self, row: usize) {
        let mut t = self.terminal();
        match row.cmp(&t.cursor_row) {
            Ordering::Less => {
                let up = format!("\x1b[{}A", t.cursor_row - row);
                t.emit(&up);
            }
            Ordering::Greater => {
                let down = format!("\x1b[{}B", row - t.cursor_row);
                t.emit(&down);
            }
            Ordering::Equal => {}
        }
        t.emit("\r");
        t.cursor_row = row;
    }

    /// Erases the contents of `row`, leaving the cursor at its start.
    pub fn clear_row(&self, row: usize) {
        self.move_cursor_to(row);
        self.write_str(CLEAR_LINE);
    }

    /// Replaces the contents of `row` with `line`.
    pub fn draw_row(&self, row: usize, line: &str) {
        self.clear_row(row);
        self.write_str(line);
        self.flush();
    }

    /// Moves past `row` onto the line below it.
    pub fn finish_row(&self, row: usize) {
        self.move_cursor_to(row);
        let mut t = self.terminal();
        t.emit("\n");
        t.cursor_row = row + 1;
        t.flush();
    }

    /// Clears `row` for good.
    ///
    /// When `row` is the last allocated one the cursor is also returned to
    /// column 0, so no dangling blank line is left at the bottom.
    pub fn release_row(&self, row: usize) {
        self.clear_row(row);
        if self.last_row() == Some(row) {
            self.write_str("\r");
        }
        self.flush();
        debug!(row, "released row");
    }

    /// Writes raw text at the current cursor position.
    pub fn write_str(&self, s: &str) {
        self.terminal().emit(s);
    }

    /// Flushes the underlying sink.
    pub fn flush(&self) {
        self.terminal().flush();
    }

    /// The row the cursor is on.
    #[must_use]
    pub fn cursor_row(&self) -> usize {
        self.terminal().cursor_row
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io::{self, Write},
        sync::Arc,
        thread,
    };

    use super::LineRegistry;
    use crate::testing::capture;

    /// A terminal that rejects every write.
    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    /// Sequential Allocation
    /// Rows are handed out in creation order, each after a newline except row 0.
    #[test]
    fn test_sequential_allocation() {
        let (registry, buf) = capture();

        let rows: Vec<usize> = (0..4).map(|_| registry.allocate_row()).collect();
        assert_eq!(rows, vec![0, 1, 2, 3]);
        assert_eq!(registry.rows_allocated(), 4);
        assert_eq!(registry.last_row(), Some(3));
        assert_eq!(registry.cursor_row(), 3);
        assert_eq!(buf.contents(), "\r\n\r\n\r\n");
    }

    /// Relative Cursor Movement
    /// Up/down deltas are computed from the tracked cursor row.
    #[test]
    fn test_cursor_movement() {
        let (registry, buf) = capture();
        for _ in 0..5 {
            registry.allocate_row();
        }
        buf.clear();

        registry.move_cursor_to(1);
        assert_eq!(buf.contents(), "\x1b[3A\r");
        buf.clear();

        registry.move_cursor_to(4);
        assert_eq!(buf.contents(), "\x1b[3B\r");
        buf.clear();

        registry.move_cursor_to(4);
        assert_eq!(buf.contents(), "\r");
        assert_eq!(registry.cursor_row(), 4);
    }

    /// Spacer Rows
    /// `newline` consumes a row number without any owner.
    #[test]
    fn test_spacer_rows() {
        let (registry, buf) = capture();
        assert_eq!(registry.last_row(), None);

        assert_eq!(registry.allocate_row(), 0);
        registry.newline();
        assert_eq!(registry.allocate_row(), 2);
        assert_eq!(buf.contents(), "\r\n\r\n");
    }

    /// Release Of The Last Row
    /// Only the bottom row gets the extra carriage return.
    #[test]
    fn test_release_rows() {
        let (registry, buf) = capture();
        for _ in 0..3 {
            registry.allocate_row();
        }
        buf.clear();

        registry.with_exclusive_access(|g| g.release_row(0));
        assert_eq!(buf.contents(), "\x1b[2A\r\x1b[2K");
        buf.clear();

        registry.with_exclusive_access(|g| g.release_row(2));
        assert_eq!(buf.contents(), "\x1b[2B\r\x1b[2K\r");
    }

    /// Re-entrant Locking
    /// A nested acquisition from the same thread does not deadlock.
    #[test]
    fn test_reentrant_access() {
        let (registry, buf) = capture();
        let row = registry.with_exclusive_access(|outer| {
            let row = registry.with_exclusive_access(|inner| inner.allocate_row());
            outer.draw_row(row, "nested");
            row
        });
        assert_eq!(row, 0);
        assert_eq!(buf.contents(), "\r\x1b[2Knested");
    }

    /// Failing Terminal
    /// Write errors are logged and bookkeeping carries on.
    #[test]
    fn test_write_errors_are_not_fatal() {
        let registry = LineRegistry::with_writer(BrokenPipe);
        assert_eq!(registry.allocate_row(), 0);
        assert_eq!(registry.allocate_row(), 1);
        registry.newline();
        assert_eq!(registry.rows_allocated(), 3);
        assert_eq!(registry.cursor_row(), 2);

        registry.with_exclusive_access(|g| {
            g.draw_row(0, "lost");
            g.flush();
        });
        assert_eq!(registry.cursor_row(), 0);

        registry.with_exclusive_access(|g| g.finish_row(1));
        assert_eq!(registry.cursor_row(), 2);
        assert_eq!(registry.rows_allocated(), 3);
    }

    /// Atomic Redraws
    /// Lines drawn from many threads never interleave inside one locked section.
    #[test]
    fn test_concurrent_draws_do_not_interleave() {
        let (registry, buf) = capture();
        let rows: Arc<Vec<usize>> = Arc::new((0..4).map(|_| registry.allocate_row()).collect());
        buf.clear();

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let registry = registry.clone();
                let rows = Arc::clone(&rows);
                thread::spawn(move || {
                    for n in 0..50 {
                        let line = format!("<bar{i}:{n:03}>");
                        registry.with_exclusive_access(|g| g.draw_row(rows[i], &line));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let out = buf.contents();
        for segment in out.split("\x1b[2K").skip(1) {
            let text: String = segment.chars().take_while(|c| *c != '\x1b' && *c != '\r').collect();
            assert!(text.starts_with("<bar") && text.ends_with('>') && text.len() == 10, "{text:?}");
        }
        assert_eq!(out.matches("\x1b[2K").count(), 200);
    }
}
