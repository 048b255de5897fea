use axum::{Extension, response::Json};
use serde_json::{Value, json};

use crate::types::SharedFragment;

/// Reports liveness and whether a login fragment is waiting to be consumed.
pub async fn health(Extension(shared_state): Extension<SharedFragment>) -> Json<Value> {
    let pending = shared_state.lock().await.is_some();
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "token_pending": pending
    }))
}
