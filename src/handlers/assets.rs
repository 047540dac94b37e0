use axum::{
    extract::State,
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
};

use crate::{middleware::SwaggerState, storage::FailureStore};

/// Serves a file from an in-memory [`AssetSource`](crate::AssetSource).
/// Directory sources are served by `tower_http::services::ServeDir` instead.
pub async fn serve_asset<S: FailureStore>(
    State(state): State<SwaggerState<S>>,
    uri: Uri,
) -> Response {
    let Some(file) = state.assets.resolve(uri.path()).await else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match file.content().await {
        Ok(content) => ([(header::CONTENT_TYPE, file.content_type())], content).into_response(),
        Err(err) => err.into_response(),
    }
}
