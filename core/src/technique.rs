//! Submission encoding selection.
//!
//! A form's `method` and `enctype` pick exactly one of four encodings. The
//! choice is a pure function of those two attributes; anything unrecognized
//! falls back to URL encoding.

use crate::http::HttpMethod;

pub const URL_ENCODED: &str = "application/x-www-form-urlencoded";
pub const PLAIN_TEXT: &str = "text/plain";
pub const MULTIPART: &str = "multipart/form-data";

/// How a form's fields are laid out on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Technique {
    /// Fields travel in the query string of a GET request.
    Get,
    /// `application/x-www-form-urlencoded` POST body.
    PostUrlEncoded,
    /// `text/plain` POST body, one field per line.
    PostPlainText,
    /// `multipart/form-data` POST body; the only encoding that carries file contents.
    PostMultipart,
}

impl Technique {
    /// Pick the encoding for a form.
    ///
    /// `method` is compared case-insensitively against `post`; every other
    /// method submits as GET. `enctype` is only consulted for POST.
    pub fn select(method: &str, enctype: Option<&str>) -> Self {
        if !method.eq_ignore_ascii_case("post") {
            return Technique::Get;
        }
        match enctype {
            Some(e) if e.eq_ignore_ascii_case(MULTIPART) => Technique::PostMultipart,
            Some(e) if e.eq_ignore_ascii_case(PLAIN_TEXT) => Technique::PostPlainText,
            _ => Technique::PostUrlEncoded,
        }
    }

    /// Content type announced for the body. GET reports the urlencoded
    /// default even though it sends no body.
    pub fn content_type(&self) -> &'static str {
        match self {
            Technique::Get | Technique::PostUrlEncoded => URL_ENCODED,
            Technique::PostPlainText => PLAIN_TEXT,
            Technique::PostMultipart => MULTIPART,
        }
    }

    pub fn method(&self) -> HttpMethod {
        match self {
            Technique::Get => HttpMethod::Get,
            Technique::PostUrlEncoded | Technique::PostPlainText | Technique::PostMultipart => {
                HttpMethod::Post
            }
        }
    }

    /// Escape a field name or value for the non-multipart encodings.
    ///
    /// Multipart parts are written verbatim, so this returns the input
    /// unchanged for [`Technique::PostMultipart`].
    pub fn escape(&self, text: &str) -> String {
        match self {
            Technique::Get | Technique::PostUrlEncoded => crate::escape::url_escape(text),
            Technique::PostPlainText => crate::escape::plain_escape(text),
            Technique::PostMultipart => text.to_string(),
        }
    }
}
