//! Shared helpers for unit tests.

use std::{io, sync::Arc};

use parking_lot::Mutex;

use crate::LineRegistry;

/// In-memory terminal sink whose contents stay readable after being handed to a registry.
#[derive(Clone, Default)]
pub(crate) struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }

    pub(crate) fn clear(&self) {
        self.0.lock().clear();
    }
}

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A registry writing into a fresh buffer.
pub(crate) fn capture() -> (LineRegistry, SharedBuffer) {
    let buf = SharedBuffer::default();
    (LineRegistry::with_writer(buf.clone()), buf)
}

/// Removes ANSI escape sequences, leaving the visible text.
pub(crate) fn strip_ansi(s: &str) -> String {
    console::strip_ansi_codes(s).into_owned()
}

/// Number of line-clear sequences, one per redraw or row release.
pub(crate) fn clears(s: &str) -> usize {
    s.matches("\x1b[2K").count()
}
