//! Error types for probe execution.

use thiserror::Error;

/// Errors that can occur while a probe runs its technique.
///
/// These are recorded on the probe's result for diagnostics; an error never
/// aborts a detection pass, it simply leaves that probe unmatched.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// HTTP request failed (connection refused, reset, protocol error).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Reverse DNS lookup failed for a reason other than a missing record.
    #[error("reverse lookup failed: {0}")]
    ReverseLookup(String),

    /// No local address could be discovered to reverse-resolve.
    #[error("no local address to reverse-resolve")]
    NoLocalAddress,

    /// Probe did not finish before the detection deadline.
    #[error("probe timed out")]
    DeadlineExceeded,
}
