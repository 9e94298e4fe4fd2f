//! Form submitter: serialize, wait for file reads, send once.
//!
//! # Design
//! `FormSubmitter` owns its two capabilities, a [`FileSource`] and a
//! [`Transport`], and nothing else. Each call to [`FormSubmitter::submit`]
//! builds a fresh [`SubmissionRequest`], drives it to completion and drops
//! it once the transport returns, so one submitter can serve any number of
//! forms concurrently.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::error::SubmitError;
use crate::files::FileSource;
use crate::http::HttpResponse;
use crate::submission::SubmissionRequest;
use crate::transport::Transport;
use crate::types::HtmlForm;

/// Outcome of a submission that did not fail.
#[derive(Debug)]
pub enum Submission {
    /// The form had no action; nothing was read or sent.
    Aborted,
    /// The request was sent and the server answered.
    Sent(HttpResponse),
}

#[derive(Debug, Clone)]
pub struct FormSubmitter<S, T> {
    files: S,
    transport: T,
}

impl<S, T> FormSubmitter<S, T>
where
    S: FileSource,
    T: Transport,
{
    pub fn new(files: S, transport: T) -> Self {
        Self { files, transport }
    }

    /// Serialize `form`, wait for its file reads and send it.
    pub async fn submit<F: HtmlForm>(&self, form: &F) -> Result<Submission, SubmitError> {
        let Some(request) = SubmissionRequest::from_form(form) else {
            tracing::debug!("form has no action, submission aborted");
            return Ok(Submission::Aborted);
        };

        let request = request.complete(&self.files).await?.into_request();
        tracing::debug!(method = %request.method, path = %request.path, "sending form");

        let response = self
            .transport
            .send(request)
            .await
            .map_err(SubmitError::Transport)?;
        tracing::debug!(status = response.status, "form submitted");
        Ok(Submission::Sent(response))
    }

    /// Callback flavour of [`submit`](Self::submit).
    ///
    /// `on_success` receives the raw response body. `on_failure` receives
    /// file read and transport errors. Neither is called when the submission
    /// is aborted for lack of an action.
    pub async fn submit_with<F, OnSuccess, OnFailure>(
        &self,
        form: &F,
        on_success: OnSuccess,
        on_failure: OnFailure,
    ) where
        F: HtmlForm,
        OnSuccess: FnOnce(String),
        OnFailure: FnOnce(SubmitError),
    {
        match self.submit(form).await {
            Ok(Submission::Sent(response)) => on_success(response.body),
            Ok(Submission::Aborted) => {}
            Err(err) => on_failure(err),
        }
    }
}

impl<S, T> FormSubmitter<S, T>
where
    S: FileSource + Send + Sync + 'static,
    T: Transport + Send + Sync + 'static,
{
    /// Fire-and-forget submission on the current tokio runtime.
    pub fn dispatch<F, OnSuccess, OnFailure>(
        self: &Arc<Self>,
        form: F,
        on_success: OnSuccess,
        on_failure: OnFailure,
    ) -> JoinHandle<()>
    where
        F: HtmlForm + Send + Sync + 'static,
        OnSuccess: FnOnce(String) + Send + 'static,
        OnFailure: FnOnce(SubmitError) + Send + 'static,
    {
        let submitter = Arc::clone(self);
        tokio::spawn(async move {
            submitter.submit_with(&form, on_success, on_failure).await;
        })
    }
}
