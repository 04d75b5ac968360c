use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::intercept::OpenMode;

/// In-memory stand-in handed out for the tracked filename.
///
/// In read mode the stream serves the seeded contents. In write mode the
/// seeded contents are an oracle rather than a sink: each incoming write
/// consumes the matching slice from the front of the still-unread buffer and
/// fails at the first divergence, and closing fails if anything is left
/// unconsumed.
#[derive(Debug)]
pub struct MockStream {
    filename: PathBuf,
    cursor: Cursor<Vec<u8>>,
    mode: OpenMode,
}

impl MockStream {
    pub(crate) fn new(filename: PathBuf, contents: Vec<u8>, mode: OpenMode) -> Self {
        Self {
            filename,
            cursor: Cursor::new(contents),
            mode,
        }
    }

    /// Filename this stream stands in for.
    pub fn filename(&self) -> &Path {
        &self.filename
    }

    fn verify_write(&mut self, written: &[u8]) -> io::Result<usize> {
        let mut expected = vec![0u8; written.len()];
        let read = self.cursor.read(&mut expected)?;
        expected.truncate(read);
        if expected != written {
            return Err(Error::ContentMismatch {
                filename: self.filename.clone(),
                expected,
                written: written.to_vec(),
            }
            .into());
        }
        Ok(written.len())
    }

    fn verify_drained(&mut self) -> Result<()> {
        let mut remaining = Vec::new();
        self.cursor.read_to_end(&mut remaining)?;
        if remaining.is_empty() {
            Ok(())
        } else {
            Err(Error::IncompleteWrite {
                filename: self.filename.clone(),
                remaining,
            })
        }
    }
}

impl Read for MockStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl Write for MockStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.mode {
            OpenMode::Write => self.verify_write(buf),
            OpenMode::Read => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("{} is mocked for reading", self.filename.display()),
            )),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for MockStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.cursor.seek(pos)
    }
}

/// Handle returned by [`open`](crate::open): either the in-memory stand-in
/// for the tracked filename or a real file reached by pass-through. Both
/// variants honor the same `Read + Write + Seek` contract.
#[derive(Debug)]
pub enum MockFile {
    Mock(MockStream),
    Real { path: PathBuf, file: File },
}

impl MockFile {
    /// Path this handle was opened with.
    pub fn path(&self) -> &Path {
        match self {
            MockFile::Mock(stream) => stream.filename(),
            MockFile::Real { path, .. } => path,
        }
    }

    /// Close the handle, running the write-mode leftover check for mocks.
    ///
    /// Dropping a write-mode mock without closing skips this check; the
    /// enclosing scope still reconciles which files were opened.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompleteWrite`] if this is a write-mode mock with
    /// expected content still unconsumed.
    pub fn close(self) -> Result<()> {
        match self {
            MockFile::Mock(mut stream) => match stream.mode {
                OpenMode::Write => stream.verify_drained(),
                OpenMode::Read => Ok(()),
            },
            MockFile::Real { .. } => Ok(()),
        }
    }
}

impl Read for MockFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            MockFile::Mock(stream) => stream.read(buf),
            MockFile::Real { file, .. } => file.read(buf),
        }
    }
}

impl Write for MockFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            MockFile::Mock(stream) => stream.write(buf),
            MockFile::Real { file, .. } => file.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            MockFile::Mock(stream) => stream.flush(),
            MockFile::Real { file, .. } => file.flush(),
        }
    }
}

impl Seek for MockFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            MockFile::Mock(stream) => stream.seek(pos),
            MockFile::Real { file, .. } => file.seek(pos),
        }
    }
}
