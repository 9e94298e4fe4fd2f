//! Form serialization and submission engine.
//!
//! # Overview
//! Turns an HTML-like form into one of the four browser submission
//! encodings (GET query, urlencoded, text/plain, multipart), reads attached
//! files asynchronously and sends exactly one request once every read has
//! finished.
//!
//! # Design
//! - The engine only talks to capabilities: [`HtmlForm`]/[`FormField`] for
//!   input, [`FileSource`] for file bytes and [`Transport`] for the network.
//! - [`Technique`] is an enum matched exhaustively wherever the encoding
//!   matters.
//! - Submission is staged ([`SubmissionRequest`] → [`SerializedForm`] →
//!   [`HttpRequest`]) so hosts can also do the I/O themselves.
//! - A missing action aborts silently; file read and transport failures are
//!   reported through [`SubmitError`].

pub mod client;
pub mod error;
pub mod escape;
pub mod files;
mod gate;
pub mod http;
mod segment;
pub mod submission;
pub mod technique;
pub mod transport;
pub mod types;

pub use client::{FormSubmitter, Submission};
pub use error::{BoxError, SubmitError};
pub use files::{FileSource, LocalFiles};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use submission::{SerializedForm, SubmissionRequest};
pub use technique::Technique;
pub use transport::Transport;
pub use types::{Field, FieldKind, FileAttachment, FileContent, Form, FormField, HtmlForm};
