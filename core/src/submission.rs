//! One form submission, from field walk to wire-ready request.
//!
//! # Design
//! Submission is split into explicit stages so hosts that do their own I/O
//! can drive it step by step:
//!
//! 1. [`SubmissionRequest::from_form`] selects the technique and walks the
//!    fields. Segment slots are allocated here and never move afterwards.
//! 2. [`SubmissionRequest::complete`] drains the pending file reads through
//!    the completion gate and consumes the request.
//! 3. [`SerializedForm::into_request`] joins the segments per technique into
//!    an [`HttpRequest`].
//!
//! Because each stage consumes the previous one, a request can be sent at
//! most once and never before every file read has finished.

use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

use crate::error::SubmitError;
use crate::files::FileSource;
use crate::gate::CompletionGate;
use crate::http::{HttpMethod, HttpRequest};
use crate::segment;
use crate::technique::{Technique, MULTIPART};
use crate::types::HtmlForm;

/// A form that has been walked but may still be waiting on file reads.
#[derive(Debug)]
pub struct SubmissionRequest<'a> {
    technique: Technique,
    receiver: String,
    segments: Vec<Vec<u8>>,
    gate: CompletionGate<'a>,
}

impl<'a> SubmissionRequest<'a> {
    /// Walk `form` and reserve its segments.
    ///
    /// Returns `None` when the form has no action to submit to.
    pub fn from_form<F: HtmlForm>(form: &'a F) -> Option<Self> {
        let receiver = form.action().filter(|a| !a.is_empty())?;
        let technique = Technique::select(form.method(), form.enctype());
        let built = segment::build(technique, form.fields());

        tracing::debug!(
            receiver,
            ?technique,
            segments = built.slots.len(),
            pending = built.pending.len(),
            "form serialized"
        );

        Some(Self {
            technique,
            receiver: receiver.to_string(),
            segments: built.slots,
            gate: CompletionGate::new(built.pending),
        })
    }

    pub fn technique(&self) -> Technique {
        self.technique
    }

    pub fn content_type(&self) -> &'static str {
        self.technique.content_type()
    }

    pub fn receiver(&self) -> &str {
        &self.receiver
    }

    /// Number of file reads that still have to complete.
    pub fn pending_count(&self) -> usize {
        self.gate.pending()
    }

    /// Segments as they stand; file slots only hold their part header until
    /// [`complete`](Self::complete) runs.
    pub fn segments(&self) -> &[Vec<u8>] {
        &self.segments
    }

    /// Wait for every pending file read and release the serialized form.
    pub async fn complete<S>(self, files: &S) -> Result<SerializedForm, SubmitError>
    where
        S: FileSource + ?Sized,
    {
        let Self {
            technique,
            receiver,
            mut segments,
            gate,
        } = self;
        gate.open(&mut segments, files).await?;
        Ok(SerializedForm {
            technique,
            receiver,
            segments,
        })
    }
}

/// A fully serialized form, ready to be turned into a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedForm {
    technique: Technique,
    receiver: String,
    segments: Vec<Vec<u8>>,
}

impl SerializedForm {
    pub fn technique(&self) -> Technique {
        self.technique
    }

    pub fn receiver(&self) -> &str {
        &self.receiver
    }

    pub fn segments(&self) -> &[Vec<u8>] {
        &self.segments
    }

    /// Build the request, generating a fresh multipart boundary.
    pub fn into_request(self) -> HttpRequest {
        let boundary = generate_boundary();
        self.into_request_with_boundary(&boundary)
    }

    /// Build the request with a caller-chosen multipart boundary. The
    /// boundary is ignored by the other techniques.
    pub fn into_request_with_boundary(self, boundary: &str) -> HttpRequest {
        match self.technique {
            Technique::Get => {
                let query = self.segments.join(&b'&');
                HttpRequest {
                    method: HttpMethod::Get,
                    path: replace_query(&self.receiver, &String::from_utf8_lossy(&query)),
                    headers: Vec::new(),
                    body: None,
                }
            }
            Technique::PostUrlEncoded | Technique::PostPlainText => {
                let separator: &[u8] = match self.technique {
                    Technique::PostPlainText => b"\r\n",
                    _ => b"&",
                };
                let body = self.segments.join(separator);
                post(self.receiver, self.technique.content_type().to_string(), body)
            }
            Technique::PostMultipart => {
                let delimiter = format!("--{boundary}\r\n");
                let mut body = delimiter.clone().into_bytes();
                body.extend_from_slice(&self.segments.join(delimiter.as_bytes()));
                body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
                post(
                    self.receiver,
                    format!("{MULTIPART}; boundary={boundary}"),
                    body,
                )
            }
        }
    }
}

fn post(path: String, content_type: String, body: Vec<u8>) -> HttpRequest {
    HttpRequest {
        method: HttpMethod::Post,
        path,
        headers: vec![("content-type".to_string(), content_type)],
        body: Some(body),
    }
}

/// Drop any existing query string from `receiver` and attach `query`, if any.
fn replace_query(receiver: &str, query: &str) -> String {
    let base = receiver.split_once('?').map_or(receiver, |(base, _)| base);
    if query.is_empty() {
        base.to_string()
    } else {
        format!("{base}?{query}")
    }
}

/// Boundary derived from the current time, with a random suffix so
/// concurrent submissions never share one.
pub fn generate_boundary() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("---------------------------{millis:x}{}", &suffix[..8])
}
