//! HTTP surface for the triage webhook.
//!
//! A single POST endpoint accepts a JSON body from either caller protocol;
//! the method router answers 405 for anything else on the route. The handler
//! does nothing but glue: parse, normalize, run the pipeline, render.

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::Value;
use tracing::{error, info, instrument};

use crate::{
    base::{
        error::TriageError,
        types::{Protocol, Void},
    },
    interaction::{
        normalize,
        respond::{self, ErrorBody},
        triage,
    },
    runtime::Runtime,
};

/// Build the application router.
pub fn router(runtime: Runtime) -> Router {
    Router::new().route("/", post(handle_triage)).with_state(runtime)
}

/// Bind the configured address and serve requests until shutdown.
pub async fn serve(runtime: Runtime) -> Void {
    let addr = runtime.config.bind_address.clone();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Listening on {addr} ...");

    axum::serve(listener, router(runtime)).await?;

    Ok(())
}

/// Handle one triage request.
#[instrument(skip_all)]
pub async fn handle_triage(State(runtime): State<Runtime>, body: Bytes) -> Response {
    // Unparsable JSON, a non-object, and an empty object all count as an
    // invalid body; protocol detection never ran, so the error is plain text.
    let body: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(_) => return render_error(&TriageError::InvalidBody, None),
    };

    if !body.as_object().is_some_and(|map| !map.is_empty()) {
        return render_error(&TriageError::InvalidBody, None);
    }

    let incoming = match normalize::normalize(&body) {
        Ok(incoming) => incoming,
        Err(err) => return render_error(&err, None),
    };

    let protocol = incoming.protocol();

    match triage::process(incoming.text(), &runtime.extractor, &runtime.classifier, &runtime.db).await {
        Ok(result) => {
            let (status, value) = respond::format_response(&result, protocol);
            (status, Json(value)).into_response()
        }
        Err(err) => {
            error!("Triage request failed: {err}");
            render_error(&err, Some(protocol))
        }
    }
}

fn render_error(err: &TriageError, protocol: Option<Protocol>) -> Response {
    match respond::format_error(err, protocol) {
        (status, ErrorBody::Json(value)) => (status, Json(value)).into_response(),
        (status, ErrorBody::Text(text)) => (status, text).into_response(),
    }
}
