//! Network capability used by [`FormSubmitter`](crate::client::FormSubmitter).

use std::future::Future;
use std::sync::Arc;

use crate::error::BoxError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes one HTTP round-trip.
///
/// Any response the server produces, whatever its status, is a success from
/// the engine's point of view. Only failing to get a response at all is an
/// error. Request bodies may contain arbitrary bytes.
pub trait Transport {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, BoxError>> + Send;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, BoxError>> + Send {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, BoxError>> + Send {
        (**self).send(request)
    }
}
