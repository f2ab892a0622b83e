#![warn(missing_docs)]
//! Transport types shared by the multishare control-plane components.
//!
//! The cloud file API is the sole source of truth for instances, shares and
//! their long-running operations; this crate holds the in-memory renditions
//! of those resources plus the resource URI and filter plumbing the agents
//! rely on.

/// Driver-wide constants.
pub mod constants;
/// Common types for the resources managed by the control-plane.
pub mod types;

/// Report the full chain of an error, from the outermost failure down to the
/// root cause, separated by ": ".
pub trait ErrorChain: std::error::Error {
    /// Outer error and its sources as a single line.
    fn full_string(&self) -> String {
        let mut msg = self.to_string();
        let mut source = self.source();
        while let Some(error) = source {
            msg = format!("{msg}: {error}");
            source = error.source();
        }
        msg
    }
}

impl<T: std::error::Error> ErrorChain for T {}
