use std::io;

use thiserror::Error;

/// Errors that can end a probe or a probe run early.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Allocation tracking could not be set up, typically because two trackers tried to
    /// announce allocations at the same time.
    #[error(transparent)]
    Tracking(#[from] alloc_watch::Error),

    /// Probe observations could not be written to the output.
    #[error("failed to write probe output: {0}")]
    Output(#[from] io::Error),

    /// A probe was requested by a name that is not in the catalog.
    #[error("unknown probe '{name}', use --list to see the available probes")]
    UnknownProbe {
        /// The name that was requested.
        name: String,
    },
}

/// A specialized `Result` type for probe operations, returning the crate's [`Error`] type as
/// the error value.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fmt::Debug;

    use alloc_watch::MessageKind;
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync, Debug);

    #[test]
    fn tracking_error_is_transparent() {
        let error = Error::from(alloc_watch::Error::AlreadyEnabled {
            messages: MessageKind::Allocation,
        });

        assert_eq!(
            error.to_string(),
            "tried to enable allocation messages a second time, this is not allowed"
        );
    }

    #[test]
    fn unknown_probe_names_the_probe() {
        let error = Error::UnknownProbe {
            name: "nonsense".to_string(),
        };

        assert!(error.to_string().contains("'nonsense'"));
    }
}
