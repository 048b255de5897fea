use axum::{
    Extension, Router,
    routing::{get, post},
};
use std::{net::SocketAddr, str::FromStr};

use crate::{Res, api, config, types::SharedFragment};

pub fn router(state: SharedFragment) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback))
        .route("/token", post(api::token))
        .layer(Extension(state))
}

/// Serves the callback routes on `SERVER_ADDRESS` until the task is aborted.
pub async fn start_api_server(state: SharedFragment) -> Res<()> {
    let addr = SocketAddr::from_str(&config::server_addr())
        .map_err(|e| format!("Failed to parse server address: {}", e))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await?;
    Ok(())
}
