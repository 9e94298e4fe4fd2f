//! Asynchronous file reads.

use std::future::Future;
use std::io;

use crate::types::{FileAttachment, FileContent};

/// Reads the raw bytes of an attached file.
///
/// Reads for one submission are polled together and may complete in any
/// order.
pub trait FileSource {
    fn read(&self, file: &FileAttachment) -> impl Future<Output = io::Result<Vec<u8>>> + Send;
}

/// Reads inline bytes directly and paths through `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFiles;

impl FileSource for LocalFiles {
    fn read(&self, file: &FileAttachment) -> impl Future<Output = io::Result<Vec<u8>>> + Send {
        let content = file.content.clone();
        async move {
            match content {
                FileContent::Bytes(bytes) => Ok(bytes),
                FileContent::Path(path) => tokio::fs::read(&path).await,
            }
        }
    }
}

impl<S: FileSource + ?Sized> FileSource for &S {
    fn read(&self, file: &FileAttachment) -> impl Future<Output = io::Result<Vec<u8>>> + Send {
        (**self).read(file)
    }
}
