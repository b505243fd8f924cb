//! HTTP endpoint for bucket notifications.
//!
//! The server is built using axum and provides a `POST /event` endpoint that
//! feeds the request body to the [`Pipeline`].

pub mod event;

use std::sync::Arc;

use axum::{Router, routing::post};
use lakeshore_pipeline::Pipeline;
use tower_http::trace::TraceLayer;

use crate::event::event_handler;

/// HTTP server that receives notifications via HTTP POST requests.
pub struct HttpServer {
    pipeline: Arc<Pipeline>,
}

impl HttpServer {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    pub fn into_router(self) -> Router {
        Router::new()
            .route("/event", post(event_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(self.pipeline)
    }
}
