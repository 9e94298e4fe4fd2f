//! Completion gate for the asynchronous file reads of a submission.
//!
//! # Design
//! All reads are started together and polled as one `FuturesUnordered`, so
//! they complete in whatever order the [`FileSource`] finishes them. Each
//! completion writes into the slot reserved for it by the field walk and
//! counts down. `open` only returns once the count is zero, and it consumes
//! the gate, so the serialized form can be released at most once.
//!
//! A failed read still counts down. The remaining reads are drained and the
//! first failure is returned.

use futures_util::stream::{FuturesUnordered, StreamExt};

use crate::error::SubmitError;
use crate::files::FileSource;
use crate::types::FileAttachment;

/// A read that will fill `slot` with the contents of `file`.
#[derive(Debug)]
pub(crate) struct PendingRead<'a> {
    pub slot: usize,
    pub field: String,
    pub file: &'a FileAttachment,
}

#[derive(Debug)]
pub(crate) struct CompletionGate<'a> {
    pending: Vec<PendingRead<'a>>,
}

impl<'a> CompletionGate<'a> {
    pub fn new(pending: Vec<PendingRead<'a>>) -> Self {
        Self { pending }
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Run every pending read and write the results into `slots`.
    pub async fn open<S>(self, slots: &mut [Vec<u8>], files: &S) -> Result<(), SubmitError>
    where
        S: FileSource + ?Sized,
    {
        let mut remaining = self.pending.len();
        if remaining == 0 {
            return Ok(());
        }

        let mut reads: FuturesUnordered<_> = self
            .pending
            .into_iter()
            .map(|read| async move {
                let result = files.read(read.file).await;
                (read, result)
            })
            .collect();

        let mut failure = None;
        while let Some((read, result)) = reads.next().await {
            remaining -= 1;
            match result {
                Ok(bytes) => {
                    tracing::trace!(
                        field = %read.field,
                        file = %read.file.name,
                        len = bytes.len(),
                        remaining,
                        "file read complete"
                    );
                    if let Some(slot) = slots.get_mut(read.slot) {
                        slot.extend_from_slice(&bytes);
                        slot.extend_from_slice(b"\r\n");
                    }
                }
                Err(source) => {
                    tracing::warn!(
                        field = %read.field,
                        file = %read.file.name,
                        remaining,
                        error = %source,
                        "file read failed"
                    );
                    if failure.is_none() {
                        failure = Some(SubmitError::FileRead {
                            field: read.field,
                            file: read.file.name.clone(),
                            source,
                        });
                    }
                }
            }
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
