//! Error types for form submission.
//!
//! # Design
//! A missing receiver is not an error: the submission is simply aborted and
//! reported as [`Submission::Aborted`](crate::submit::Submission::Aborted).
//! Everything that can go wrong after serialization starts lands here and is
//! delivered to the caller's failure handler.

use std::io;

use thiserror::Error;

/// Boxed error returned by [`Transport`](crate::transport::Transport) implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by `FormSubmitter` and `SubmissionRequest::complete`.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// An attached file could not be read. The other reads of the same
    /// submission were still drained; no request was sent.
    #[error("failed to read file {file:?} of field {field:?}: {source}")]
    FileRead {
        field: String,
        file: String,
        #[source]
        source: io::Error,
    },

    /// The transport failed to deliver the request or receive a response.
    #[error("transport failed: {0}")]
    Transport(#[source] BoxError),
}
