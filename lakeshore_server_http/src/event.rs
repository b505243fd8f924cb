use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use lakeshore_pipeline::Pipeline;
use tracing::error;

const ACK: &str = "OK";

/// Handler for the /event endpoint.
///
/// Answers `200 OK` once the notification decodes, whatever happened to its
/// records. A notification that cannot be decoded is a server error.
pub async fn event_handler(State(pipeline): State<Arc<Pipeline>>, body: Bytes) -> Response {
    match pipeline.handle_notification(&body).await {
        Ok(_report) => (StatusCode::OK, ACK).into_response(),
        Err(err) => {
            let report = snafu::Report::from_error(err);
            error!(error = %report, "Failed to decode notification");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal Server Error: {report}"),
            )
                .into_response()
        }
    }
}
