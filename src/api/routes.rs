use axum::{
    routing::post,
    Router,
    extract::{Json, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::error::{Result, AppError};
use crate::api::models::SummaryRequest;
use crate::api::response;
use crate::extractor::extract_text_blocking;
use crate::llm::summarize;
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/generate-summary", post(generate_summary_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn generate_summary_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SummaryRequest>, JsonRejection>,
) -> Response {
    // An unreadable body is treated the same as one without a url.
    let url = match payload {
        Ok(Json(req)) => req.url.unwrap_or_default(),
        Err(rejection) => {
            warn!(
                kind = rejection_kind(&rejection),
                %rejection,
                "Rejected request body; treating url as missing"
            );
            String::new()
        }
    };

    let start_time = Instant::now();
    match process_summary_request(&state, &url).await {
        Ok(summary) => {
            info!(url = %url, elapsed = ?start_time.elapsed(), "Summary generated");
            response::success(summary).into_response()
        }
        Err(err) => {
            error!(url = %url, kind = err.kind(), error = %err, "Summary generation error");
            err.into_response()
        }
    }
}

async fn process_summary_request(state: &AppState, url: &str) -> Result<String> {
    if url.is_empty() {
        return Err(AppError::ValidationError("No PDF URL provided".to_string()));
    }

    info!(url = %url, "Generating summary");

    let bytes = state.fetcher.fetch(url).await?;
    info!(bytes = bytes.len(), "PDF downloaded");

    let text = extract_text_blocking(bytes).await?;
    if text.trim().is_empty() {
        return Err(AppError::ValidationError("Extracted text is empty".to_string()));
    }
    info!(chars = text.chars().count(), "Text extracted");

    summarize(state.generator.as_ref(), &text).await
}

/// Names why a body could not be read as `SummaryRequest`.
fn rejection_kind(rejection: &JsonRejection) -> &'static str {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => "missing_json_content_type",
        JsonRejection::JsonSyntaxError(_) => "json_syntax",
        JsonRejection::JsonDataError(_) => "json_data",
        JsonRejection::BytesRejection(_) => "unreadable_body",
        _ => "other",
    }
}
