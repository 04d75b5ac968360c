use std::path::PathBuf;
use std::rc::Rc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::intercept::{self, Layer, OpenMode};

/// Configuration for one mocked-open scope.
///
/// Built with [`MockOpen::new`] and executed with [`run`](MockOpen::run).
/// While the scope is active, [`open`](crate::open) serves an in-memory
/// stream for the tracked filename and passes every other filename through;
/// on exit the scope checks that the tracked filename was opened and that no
/// untracked filename was.
///
/// ```
/// use std::io::Read;
/// use mock_open::{open, MockOpen, OpenMode};
///
/// MockOpen::new("settings.conf").contents("answer = 42").run(|| {
///     let mut file = open("settings.conf", OpenMode::Read)?;
///     let mut conf = String::new();
///     file.read_to_string(&mut conf)?;
///     assert_eq!(conf, "answer = 42");
///     Ok(())
/// })
/// .unwrap();
/// ```
#[derive(Debug)]
pub struct MockOpen {
    filename: PathBuf,
    contents: Vec<u8>,
    complain: bool,
    mode: OpenMode,
}

impl MockOpen {
    /// Start configuring a scope that intercepts opens of `filename`.
    pub fn new(filename: impl Into<PathBuf>) -> Self {
        Self {
            filename: filename.into(),
            contents: Vec::new(),
            complain: true,
            mode: OpenMode::Read,
        }
    }

    /// Seed content (read mode) or expected content (write mode). Defaults
    /// to empty, simulating an empty file.
    pub fn contents(mut self, contents: impl Into<Vec<u8>>) -> Self {
        self.contents = contents.into();
        self
    }

    /// Whether reconciliation failures are reported. Defaults to true; when
    /// disabled, an unopened tracked file and unmocked opens exit silently.
    pub fn complain(mut self, complain: bool) -> Self {
        self.complain = complain;
        self
    }

    /// Read-mock vs write-verify behavior for the tracked filename. Defaults
    /// to [`OpenMode::Read`]. The scope's mode decides which stream variant
    /// an open of the tracked filename gets, whatever mode that call asks
    /// for.
    pub fn mode(mut self, mode: OpenMode) -> Self {
        self.mode = mode;
        self
    }

    /// Install the interceptor, execute `body`, restore the previous opener,
    /// and reconcile the opens seen during the scope.
    ///
    /// The interceptor is removed before reconciliation even if `body`
    /// errors or panics, so nested scopes always unwind in LIFO order.
    ///
    /// # Errors
    ///
    /// Returns the body's error unchanged, except that an
    /// [`Error::UnmockedAccess`] naming this scope's own tracked filename is
    /// absorbed: an inner scope complained about a file this scope mocks.
    /// After a clean or absorbed exit, reconciliation fails with
    /// [`Error::NotOpened`] if the tracked filename was never opened, or
    /// [`Error::UnmockedAccess`] naming the first untracked filename that
    /// was, unless complaints are disabled.
    pub fn run(self, body: impl FnOnce() -> Result<()>) -> Result<()> {
        let MockOpen {
            filename,
            contents,
            complain,
            mode,
        } = self;

        debug!(file = %filename.display(), mode = ?mode, "installing mock open scope");
        let layer = Rc::new(Layer::new(filename.clone(), contents, mode));
        let installed = intercept::install(Rc::clone(&layer));
        let result = body();
        drop(installed);
        debug!(file = %filename.display(), "mock open scope removed");

        match result {
            Ok(()) => {}
            // An inner scope complained about this scope's own file; it is
            // mocked here, so the complaint is expected.
            Err(Error::UnmockedAccess { filename: ref complained }) if *complained == filename => {}
            Err(err) => return Err(err),
        }

        let mut opened = layer.take_opened();
        if !opened.remove(&filename) && complain {
            return Err(Error::NotOpened { filename });
        }
        if complain {
            if let Some(stray) = opened.into_iter().next() {
                return Err(Error::UnmockedAccess { filename: stray });
            }
        }
        Ok(())
    }
}
