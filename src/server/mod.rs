// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Algoflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Algoflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! HTTP surface.
//!
//! `POST /convert` is stateless: one description in, one diagram out, no classifier gate.
//! The `/session/*` routes drive the shared [`SessionController`] and answer with its snapshot.

mod routes;

use std::future::Future;
use std::io;
use std::net::SocketAddr;

use axum::routing::{get, post};
use axum::Router;
use log::info;
use tokio::net::TcpListener;

use crate::convert::Converter;
use crate::session::SessionController;

pub use routes::{ConvertRequest, ConvertResponse, ErrorBody};

/// Message returned with every 400 from `/convert`.
pub const TEXT_REQUIRED: &str = "Algorithm text is required";

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("failed to bind 127.0.0.1:{port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: io::Error,
    },
    #[error("HTTP server error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub converter: Converter,
    pub controller: SessionController,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/convert", post(routes::convert))
        .route("/session", get(routes::session))
        .route("/session/submit", post(routes::submit))
        .route("/session/regenerate", post(routes::regenerate))
        .route("/session/clear", post(routes::clear))
        .route("/session/render-error", post(routes::render_error))
        .with_state(state)
}

/// Binds on loopback. Port `0` picks an ephemeral port.
pub async fn bind(port: u16) -> Result<TcpListener, ServeError> {
    TcpListener::bind(("127.0.0.1", port)).await.map_err(|source| ServeError::Bind { port, source })
}

pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), ServeError> {
    let addr: SocketAddr = listener.local_addr()?;
    info!(addr:% = addr; "listening");
    axum::serve(listener, create_router(state)).with_graceful_shutdown(shutdown).await?;
    info!("server stopped");
    Ok(())
}
