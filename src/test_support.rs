//! Shared fixtures: a local slug suggestion endpoint and sample data.

use crate::model::{FilterRecord, SessionConfig};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Form, Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

/// `/slugs` answers with `[tag, tag_<columns>]` from the posted report context,
/// sleeping `delay_ms` first. `/broken` fails, `/wrong-shape` returns no `options`.
pub(crate) async fn spawn_slug_server() -> String {
    let app = Router::new()
        .route("/slugs", post(suggest))
        .route("/broken", post(broken))
        .route("/wrong-shape", post(wrong_shape));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve slug endpoint");
    });
    format!("http://{addr}")
}

async fn suggest(Form(form): Form<HashMap<String, String>>) -> Json<Value> {
    let context: Value = form
        .get("reportContext")
        .and_then(|raw| serde_json::from_str(raw).ok())
        .unwrap_or(Value::Null);
    if let Some(ms) = context.get("delay_ms").and_then(Value::as_u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
    let tag = context
        .get("tag")
        .and_then(Value::as_str)
        .unwrap_or("column")
        .to_string();
    let mut options = vec![tag.clone()];
    if let Some(n) = context.get("columns").and_then(Value::as_u64) {
        options.push(format!("{tag}_{n}"));
    }
    Json(json!({ "options": options }))
}

async fn broken() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn wrong_shape() -> Json<Value> {
    Json(json!({ "slugs": ["nope"] }))
}

pub(crate) fn config_for(url: &str) -> SessionConfig {
    SessionConfig {
        slug_endpoint: url.to_string(),
        request_timeout: Duration::from_secs(5),
        user_agent: "column-editor-tests".to_string(),
    }
}

pub(crate) fn catalog_records() -> Vec<FilterRecord> {
    vec![
        FilterRecord::new("status", "choice"),
        FilterRecord::new("owner", "user"),
        FilterRecord::new("opened_on", "date"),
    ]
}
