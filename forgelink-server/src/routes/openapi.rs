use std::sync::Arc;

use crate::{app_state::AppState, openapi::ApiDoc};
use axum::{Router, http::StatusCode, response::IntoResponse, routing::get};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

async fn openapi_yaml() -> impl IntoResponse {
    match ApiDoc::openapi().to_yaml() {
        Ok(yaml) => (StatusCode::OK, yaml),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("YAML error: {e}"),
        ),
    }
}

pub fn openapi_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/openapi/forgelink.json", ApiDoc::openapi()))
        .route("/openapi/forgelink.yaml", get(openapi_yaml))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_includes_the_chat_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/chat/channels"));
        assert!(
            doc.paths
                .paths
                .contains_key("/chat/channels/{channel_id}/messages")
        );
    }
}
