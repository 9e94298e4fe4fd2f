pub mod decode;
pub mod error;

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, Method, Uri},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub use decode::{split_pairs, FormValue};
pub use error::InspectError;

/// A received submission, decoded according to its content type.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Inspection {
    pub id: Uuid,
    pub method: String,
    pub path: String,
    pub query: Vec<FormValue>,
    pub content_type: Option<String>,
    pub fields: Vec<FormValue>,
}

pub type Db = Arc<RwLock<Vec<Inspection>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route("/echo", any(echo))
        .route("/inspect", any(inspect))
        .route("/submissions", get(list_submissions))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Send the request body straight back.
async fn echo(method: Method, uri: Uri, body: Bytes) -> Bytes {
    tracing::info!(%method, %uri, path = uri.path(), len = body.len(), "echo request");
    body
}

async fn inspect(
    State(db): State<Db>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Inspection>, InspectError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let query = uri.query().map(decode::decode_urlencoded).unwrap_or_default();
    let fields = decode_body(content_type.as_deref(), body).await?;

    let inspection = Inspection {
        id: Uuid::new_v4(),
        method: method.to_string(),
        path: uri.path().to_string(),
        query,
        content_type,
        fields,
    };
    tracing::info!(
        id = %inspection.id,
        method = %inspection.method,
        path = %inspection.path,
        query = inspection.query.len(),
        fields = inspection.fields.len(),
        "submission received"
    );
    db.write().await.push(inspection.clone());
    Ok(Json(inspection))
}

async fn decode_body(content_type: Option<&str>, body: Bytes) -> Result<Vec<FormValue>, InspectError> {
    let Some(content_type) = content_type else {
        return Ok(decode::decode_urlencoded(&String::from_utf8_lossy(&body)));
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        "multipart/form-data" => decode::decode_multipart(content_type, body).await,
        "text/plain" => Ok(decode::decode_plain_text(&String::from_utf8_lossy(&body))),
        "application/x-www-form-urlencoded" => {
            Ok(decode::decode_urlencoded(&String::from_utf8_lossy(&body)))
        }
        _ => Err(InspectError::UnsupportedContentType(content_type.to_string())),
    }
}

async fn list_submissions(State(db): State<Db>) -> Json<Vec<Inspection>> {
    Json(db.read().await.clone())
}
