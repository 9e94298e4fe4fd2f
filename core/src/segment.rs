//! Field walk that turns a form into ordered payload segments.
//!
//! Each named, applicable field yields one segment per value (one per file
//! for file inputs). Under multipart a file's segment starts as its part
//! header and is completed later by the gate; the slot index is fixed when it
//! is reserved.

use crate::gate::PendingRead;
use crate::technique::Technique;
use crate::types::{FieldKind, FileAttachment, FormField};

const DEFAULT_FILE_TYPE: &str = "application/octet-stream";

/// Output of the field walk: segment slots plus the reads that still have to
/// fill some of them.
#[derive(Debug)]
pub(crate) struct Segments<'a> {
    pub slots: Vec<Vec<u8>>,
    pub pending: Vec<PendingRead<'a>>,
}

pub(crate) fn build<'a, F: FormField>(technique: Technique, fields: &'a [F]) -> Segments<'a> {
    let mut slots = Vec::with_capacity(fields.len());
    let mut pending = Vec::new();

    for field in fields {
        let Some(name) = field.name() else {
            continue;
        };
        let kind = field.kind();

        if kind == FieldKind::File && !field.files().is_empty() {
            for file in field.files() {
                match technique {
                    Technique::PostMultipart => {
                        pending.push(PendingRead {
                            slot: slots.len(),
                            field: name.to_string(),
                            file,
                        });
                        slots.push(file_part_header(name, file).into_bytes());
                    }
                    // These encodings cannot carry file contents; only the file
                    // name is sent.
                    Technique::Get | Technique::PostUrlEncoded | Technique::PostPlainText => {
                        slots.push(pair(technique, name, &file.name).into_bytes());
                    }
                }
            }
        } else if !kind.is_checkable() || field.is_checked() {
            let segment = match technique {
                Technique::PostMultipart => value_part(name, field.value()),
                Technique::Get | Technique::PostUrlEncoded | Technique::PostPlainText => {
                    pair(technique, name, field.value())
                }
            };
            slots.push(segment.into_bytes());
        } else {
            tracing::trace!(field = name, kind = %kind, "skipping unchecked field");
        }
    }

    Segments { slots, pending }
}

fn pair(technique: Technique, name: &str, value: &str) -> String {
    format!("{}={}", technique.escape(name), technique.escape(value))
}

fn value_part(name: &str, value: &str) -> String {
    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
}

fn file_part_header(name: &str, file: &FileAttachment) -> String {
    let mime = if file.mime_type.is_empty() {
        DEFAULT_FILE_TYPE
    } else {
        file.mime_type.as_str()
    };
    format!(
        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{}\"\r\nContent-Type: {mime}\r\n\r\n",
        file.name
    )
}
