use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::ApiState;

/// Report whether the server can reach its storage.
pub async fn get_health(State(state): State<ApiState>) -> Response {
    match state.store.check_health() {
        Ok(()) => Json(json!({ "status": "ok", "database": "connected" })).into_response(),
        Err(error) => {
            tracing::error!("health check failed: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "error", "database": "disconnected" })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod health_tests {
    use axum::{Router, routing::get};
    use axum_test::TestServer;
    use serde_json::json;

    use crate::{endpoints, test_utils::get_test_state};

    use super::get_health;

    #[tokio::test]
    async fn reports_connected_database() {
        let app = Router::new()
            .route(endpoints::HEALTH_API, get(get_health))
            .with_state(get_test_state());
        let server = TestServer::try_new(app).expect("Could not create test server.");

        let response = server.get(endpoints::HEALTH_API).await;

        response.assert_status_ok();
        response.assert_json(&json!({ "status": "ok", "database": "connected" }));
    }
}
