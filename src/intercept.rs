use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::trace;

use crate::error::{Error, Result};
use crate::stream::{MockFile, MockStream};

/// How the caller intends to use the file it is opening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Read,
    Write,
}

/// One installed scope: the tracked filename, what to serve for it, and the
/// bookkeeping of every open seen while the scope was on top of the stack.
#[derive(Debug)]
pub(crate) struct Layer {
    filename: PathBuf,
    contents: Vec<u8>,
    mode: OpenMode,
    opened: RefCell<BTreeSet<PathBuf>>,
}

impl Layer {
    pub(crate) fn new(filename: PathBuf, contents: Vec<u8>, mode: OpenMode) -> Self {
        Self {
            filename,
            contents,
            mode,
            opened: RefCell::new(BTreeSet::new()),
        }
    }

    pub(crate) fn take_opened(&self) -> BTreeSet<PathBuf> {
        self.opened.take()
    }

    fn note_open(&self, path: &Path) {
        self.opened.borrow_mut().insert(path.to_path_buf());
    }
}

// One override chain per thread: concurrent test threads cannot observe each
// other's mocks, and restoration is strictly LIFO within a thread.
thread_local! {
    static LAYERS: RefCell<Vec<Rc<Layer>>> = const { RefCell::new(Vec::new()) };
}

pub(crate) fn install(layer: Rc<Layer>) -> Installed {
    LAYERS.with(|stack| stack.borrow_mut().push(layer));
    Installed
}

/// Pops the owning layer when dropped, so the enclosing opener chain is
/// restored even if the scope body panics.
pub(crate) struct Installed;

impl Drop for Installed {
    fn drop(&mut self) {
        LAYERS.with(|stack| stack.borrow_mut().pop());
    }
}

/// Open `path` through the mock-aware dispatch.
///
/// With no scope active this is a plain filesystem open (`File::open` for
/// [`OpenMode::Read`], `File::create` for [`OpenMode::Write`]). Inside a
/// scope, the tracked filename gets a fresh in-memory stream seeded from the
/// scope configuration, and every other filename falls through to the next
/// opener down the stack.
///
/// # Errors
///
/// Returns [`Error::Io`] if a pass-through open fails.
pub fn open(path: impl AsRef<Path>, mode: OpenMode) -> Result<MockFile> {
    dispatch(path.as_ref(), mode)
}

fn dispatch(path: &Path, mode: OpenMode) -> Result<MockFile> {
    let Some(layer) = LAYERS.with(|stack| stack.borrow_mut().pop()) else {
        return real_open(path, mode);
    };

    let result = if path == layer.filename.as_path() {
        trace!(file = %path.display(), mode = ?layer.mode, "serving mocked open");
        layer.note_open(path);
        Ok(MockFile::Mock(MockStream::new(
            layer.filename.clone(),
            layer.contents.clone(),
            layer.mode,
        )))
    } else {
        // The layer stays off the stack while the call falls through, so
        // opens made during delegation reach the enclosing openers and are
        // never routed back into this one.
        trace!(file = %path.display(), "passing open through");
        let delegated = dispatch(path, mode);
        if delegated.is_ok() {
            layer.note_open(path);
        }
        delegated
    };

    LAYERS.with(|stack| stack.borrow_mut().push(layer));
    result
}

fn real_open(path: &Path, mode: OpenMode) -> Result<MockFile> {
    let file = match mode {
        OpenMode::Read => File::open(path),
        OpenMode::Write => File::create(path),
    }
    .map_err(Error::Io)?;
    Ok(MockFile::Real {
        path: path.to_path_buf(),
        file,
    })
}
