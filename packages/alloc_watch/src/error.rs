use std::fmt;

use thiserror::Error;

/// The kind of allocator event announcements that a flag controls.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum MessageKind {
    /// A line is printed for every allocation.
    Allocation,

    /// A line is printed for every deallocation.
    Deallocation,
}

impl fmt::Display for MessageKind {
    #[cfg_attr(test, mutants::skip)] // Covered by the error message test below.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allocation => write!(f, "allocation"),
            Self::Deallocation => write!(f, "deallocation"),
        }
    }
}

/// Errors that can occur when controlling allocation tracking.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// An announcement flag was enabled while it was already enabled, which means two
    /// announcing trackers tried to be active at the same time.
    #[error("tried to enable {messages} messages a second time, this is not allowed")]
    AlreadyEnabled {
        /// The flag that was already enabled.
        messages: MessageKind,
    },
}

/// A specialized `Result` type for allocation tracking operations, returning the crate's
/// [`Error`] type as the error value.
pub type Result<T> = std::result::Result<T, Error>;
