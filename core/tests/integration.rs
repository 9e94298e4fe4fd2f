//! End-to-end submissions against the live echo server.
//!
//! # Design
//! Starts the echo server on a random port and submits forms over real HTTP
//! with a ureq-backed `Transport`. The server decodes every submission it
//! receives, so each test checks what actually arrived on the wire.

use std::future::Future;
use std::net::SocketAddr;

use echo_server::Inspection;
use formpost_core::{
    BoxError, Field, FileAttachment, FileContent, Form, FormSubmitter, HttpMethod, HttpRequest,
    HttpResponse, LocalFiles, Submission, SubmitError, Transport,
};

/// Executes requests with ureq on the blocking pool.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`.
#[derive(Clone)]
struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

fn execute(agent: &ureq::Agent, req: HttpRequest) -> Result<HttpResponse, BoxError> {
    let mut response = match req.method {
        HttpMethod::Get => agent.get(&req.path).call()?,
        HttpMethod::Post => {
            let mut builder = agent.post(&req.path);
            for (name, value) in &req.headers {
                builder = builder.header(name, value);
            }
            let body = req.body.unwrap_or_default();
            builder.send(&body[..])?
        }
    };

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string()?;
    Ok(HttpResponse {
        status,
        headers: Vec::new(),
        body,
    })
}

impl Transport for UreqTransport {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, BoxError>> + Send {
        let agent = self.agent.clone();
        async move { tokio::task::spawn_blocking(move || execute(&agent, request)).await? }
    }
}

async fn start_server() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(echo_server::run(listener));
    addr
}

fn submitter() -> FormSubmitter<LocalFiles, UreqTransport> {
    FormSubmitter::new(LocalFiles, UreqTransport::new())
}

async fn submit(form: &Form) -> Inspection {
    match submitter().submit(form).await.unwrap() {
        Submission::Sent(response) => {
            assert_eq!(response.status, 200, "server said: {}", response.body);
            serde_json::from_str(&response.body).unwrap()
        }
        Submission::Aborted => panic!("submission aborted"),
    }
}

async fn recorded(addr: SocketAddr) -> Vec<Inspection> {
    let path = format!("http://{addr}/submissions");
    let response = UreqTransport::new()
        .send(HttpRequest {
            method: HttpMethod::Get,
            path,
            headers: Vec::new(),
            body: None,
        })
        .await
        .unwrap();
    serde_json::from_str(&response.body).unwrap()
}

fn text_file(name: &str, content: &[u8]) -> FileAttachment {
    FileAttachment {
        name: name.to_string(),
        mime_type: "text/plain".to_string(),
        content: FileContent::Bytes(content.to_vec()),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn get_form_arrives_as_query() {
    let addr = start_server().await;
    let form = Form::new("get", &format!("http://{addr}/inspect?stale=1"))
        .with_field(Field::text("q", "hello world"))
        .with_field(Field::radio("size", "M", true))
        .with_field(Field::radio("size", "L", false));

    let inspection = submit(&form).await;
    assert_eq!(inspection.method, "GET");
    let query: Vec<_> = inspection
        .query
        .iter()
        .map(|v| (v.name.as_str(), v.value.as_str()))
        .collect();
    assert_eq!(query, [("q", "hello world"), ("size", "M")]);
    assert!(inspection.fields.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn urlencoded_form_round_trips() {
    let addr = start_server().await;
    let form = Form::new("post", &format!("http://{addr}/inspect"))
        .with_field(Field::text("q", "hello world"))
        .with_field(Field::text("sym", "a&b=c é"));

    let inspection = submit(&form).await;
    assert_eq!(
        inspection.content_type.as_deref(),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(inspection.fields[0].value, "hello world");
    assert_eq!(inspection.fields[1].value, "a&b=c é");
}

#[tokio::test(flavor = "multi_thread")]
async fn plain_text_form_round_trips() {
    let addr = start_server().await;
    let quote = r"4\3\7 - Einstein said E=mc2";
    let form = Form::new("post", &format!("http://{addr}/inspect"))
        .with_enctype("text/plain")
        .with_field(Field::text("quote", quote));

    let inspection = submit(&form).await;
    assert_eq!(inspection.content_type.as_deref(), Some("text/plain"));
    assert_eq!(inspection.fields.len(), 1);
    assert_eq!(inspection.fields[0].value, quote);
}

#[tokio::test(flavor = "multi_thread")]
async fn multipart_form_is_sent_exactly_once() {
    let addr = start_server().await;

    let path = std::env::temp_dir().join(format!("formpost-{}.txt", uuid::Uuid::new_v4()));
    tokio::fs::write(&path, b"from disk").await.unwrap();

    let form = Form::new("post", &format!("http://{addr}/inspect"))
        .with_enctype("multipart/form-data")
        .with_field(Field::text("title", "report"))
        .with_field(Field::checkbox("draft", "yes", false))
        .with_field(Field::file(
            "docs",
            vec![
                text_file("a.txt", b"hi"),
                FileAttachment {
                    name: "disk.txt".to_string(),
                    mime_type: "text/plain".to_string(),
                    content: FileContent::Path(path.clone()),
                },
            ],
        ));

    let inspection = submit(&form).await;
    tokio::fs::remove_file(&path).await.unwrap();

    assert_eq!(inspection.fields.len(), 3);
    assert_eq!(inspection.fields[0].name, "title");
    assert_eq!(inspection.fields[0].value, "report");
    assert_eq!(inspection.fields[1].filename.as_deref(), Some("a.txt"));
    assert_eq!(inspection.fields[1].content_type.as_deref(), Some("text/plain"));
    assert_eq!(inspection.fields[1].value, "hi");
    assert_eq!(inspection.fields[2].filename.as_deref(), Some("disk.txt"));
    assert_eq!(inspection.fields[2].value, "from disk");

    assert_eq!(recorded(addr).await.len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_file_read_sends_nothing() {
    let addr = start_server().await;
    let form = Form::new("post", &format!("http://{addr}/inspect"))
        .with_enctype("multipart/form-data")
        .with_field(Field::file(
            "docs",
            vec![
                text_file("ok.txt", b"fine"),
                FileAttachment {
                    name: "gone.txt".to_string(),
                    mime_type: String::new(),
                    content: FileContent::Path("/no/such/dir/gone.txt".into()),
                },
            ],
        ));

    let err = submitter().submit(&form).await.unwrap_err();
    assert!(matches!(err, SubmitError::FileRead { ref file, .. } if file == "gone.txt"));
    assert!(recorded(addr).await.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_action_is_a_no_op() {
    let addr = start_server().await;
    let mut form = Form::new("post", "").with_field(Field::text("q", "x"));
    assert!(matches!(
        submitter().submit(&form).await.unwrap(),
        Submission::Aborted
    ));
    form.action = None;
    assert!(matches!(
        submitter().submit(&form).await.unwrap(),
        Submission::Aborted
    ));
    assert!(recorded(addr).await.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_receiver_reports_transport_error() {
    // bind then drop to get a port nobody listens on
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let form = Form::new("post", &format!("http://{addr}/inspect"))
        .with_field(Field::text("q", "x"));

    let (tx, rx) = tokio::sync::oneshot::channel();
    submitter()
        .submit_with(&form, |_| panic!("must not succeed"), move |err| {
            let _ = tx.send(err);
        })
        .await;
    assert!(matches!(rx.await.unwrap(), SubmitError::Transport(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn echo_route_returns_raw_body() {
    let addr = start_server().await;
    let form = Form::new("post", &format!("http://{addr}/echo"))
        .with_enctype("text/plain")
        .with_field(Field::text("a", "1"))
        .with_field(Field::text("b", "x y"));

    let (tx, rx) = tokio::sync::oneshot::channel();
    submitter()
        .submit_with(
            &form,
            move |body| {
                let _ = tx.send(body);
            },
            |err| panic!("unexpected failure: {err}"),
        )
        .await;
    assert_eq!(rx.await.unwrap(), "a=1\r\nb=x\\ y");
}
