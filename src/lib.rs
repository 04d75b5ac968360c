//! mock-open: scoped interception of file opens for tests
//!
//! This library swaps the file-opening primitive for one tracked filename
//! within a bounded scope. Opens of that filename get an in-memory stream
//! seeded with expected contents; every other filename passes through to the
//! real filesystem. On scope exit the opens seen during the scope are
//! reconciled against the tracked filename, so a test can assert both what a
//! program reads from a named file and the exact bytes it writes there,
//! without touching the disk.

/// Error taxonomy for mock verification
pub mod error;
/// The interceptable open primitive and its per-thread dispatch stack
mod intercept;
/// Scope lifecycle: install, run the body, restore, reconcile
mod scope;
/// In-memory streams handed out for the tracked filename
mod stream;

pub use error::{Error, Result};
pub use intercept::{open, OpenMode};
pub use scope::MockOpen;
pub use stream::{MockFile, MockStream};
