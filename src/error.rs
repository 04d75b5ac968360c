use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Verification failures raised by the mock, plus pass-through I/O errors.
///
/// All verification variants are assertion-style failures meant to fail the
/// enclosing test; nothing recovers or retries them internally.
#[derive(Debug, Error)]
pub enum Error {
    /// A write-mode stream received bytes differing from the next expected
    /// slice.
    #[error(
        "unexpected contents written to {}: expected {:?}, got {:?}",
        .filename.display(),
        String::from_utf8_lossy(.expected),
        String::from_utf8_lossy(.written)
    )]
    ContentMismatch {
        filename: PathBuf,
        expected: Vec<u8>,
        written: Vec<u8>,
    },

    /// A write-mode stream was closed with expected content still unwritten.
    #[error(
        "expected data not written to {}: {:?} remains",
        .filename.display(),
        String::from_utf8_lossy(.remaining)
    )]
    IncompleteWrite {
        filename: PathBuf,
        remaining: Vec<u8>,
    },

    /// The scope exited without the tracked filename ever being opened.
    #[error("the file {} was never opened", .filename.display())]
    NotOpened { filename: PathBuf },

    /// A filename other than the tracked one was opened during the scope.
    #[error("the file {} was opened, but not mocked", .filename.display())]
    UnmockedAccess { filename: PathBuf },

    /// A pass-through open against the real filesystem failed.
    #[error(transparent)]
    Io(io::Error),
}

// Verification errors cross the `io::Write` boundary wrapped in an
// `io::Error`; unwrap them back to the typed variant so a `?` in a scope
// body preserves the error kind.
impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        match err.downcast::<Error>() {
            Ok(mock) => mock,
            Err(err) => Error::Io(err),
        }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(err) => err,
            err => io::Error::other(err),
        }
    }
}
