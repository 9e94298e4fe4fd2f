//! Decoding of received form submissions.

use std::convert::Infallible;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::InspectError;

/// One decoded name/value pair. File parts also carry their file name and
/// declared content type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormValue {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl FormValue {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            filename: None,
            content_type: None,
        }
    }
}

/// Split `src` into `(key, value)` pairs on `&` and `=`.
///
/// Pieces without a `=` are ignored; the value keeps any further `=`.
pub fn split_pairs(src: &str) -> Vec<(&str, &str)> {
    src.split('&').filter_map(|piece| piece.split_once('=')).collect()
}

/// Decode a query string or urlencoded body.
pub fn decode_urlencoded(src: &str) -> Vec<FormValue> {
    split_pairs(src)
        .into_iter()
        .map(|(k, v)| FormValue::new(&percent_decode(k), &percent_decode(v)))
        .collect()
}

fn percent_decode(text: &str) -> String {
    let text = text.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(text.as_bytes())).into_owned()
}

/// Decode a `text/plain` body: one backslash-escaped `name=value` per line.
pub fn decode_plain_text(src: &str) -> Vec<FormValue> {
    src.split("\r\n")
        .filter_map(split_escaped_line)
        .map(|(k, v)| FormValue::new(&unescape(k), &unescape(v)))
        .collect()
}

/// Split at the first `=` not preceded by an escaping backslash.
fn split_escaped_line(line: &str) -> Option<(&str, &str)> {
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '=' => return Some((&line[..i], &line[i + 1..])),
            _ => {}
        }
    }
    None
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push(chars.next().unwrap_or('\\')),
            _ => out.push(c),
        }
    }
    out
}

/// Decode a `multipart/form-data` body.
pub async fn decode_multipart(content_type: &str, body: Bytes) -> Result<Vec<FormValue>, InspectError> {
    let boundary = multer::parse_boundary(content_type)?;
    let stream = futures_util::stream::once(async move { Ok::<Bytes, Infallible>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut values = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(|m| m.to_string());
        let bytes = field.bytes().await?;
        values.push(FormValue {
            name,
            value: String::from_utf8_lossy(&bytes).into_owned(),
            filename,
            content_type,
        });
    }
    Ok(values)
}
