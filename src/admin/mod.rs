//! Bearer-protected status endpoints under `/_gateway/`.

pub mod handlers;
pub mod auth;

use axum::{
    routing::{get, post},
    Router,
    middleware,
};
use crate::http::server::AppState;
use self::handlers::*;
use self::auth::admin_auth_middleware;

pub fn admin_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/_gateway/status", get(get_status))
        .route("/_gateway/preference/reset", post(reset_preference))
        .route_layer(middleware::from_fn_with_state(state, admin_auth_middleware))
}

#[cfg(test)]
mod tests {
    use crate::config::GatewayConfig;
    use crate::http::GatewayServer;
    use crate::upstream::Role;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    fn server() -> GatewayServer {
        let mut config = GatewayConfig::default();
        config.admin.enabled = true;
        config.admin.api_key = "test-key".into();
        GatewayServer::new(config).unwrap()
    }

    fn admin_request(method: Method, uri: &str, key: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(key) = key {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", key));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_status_requires_key() {
        let server = server();

        let res = server
            .router()
            .oneshot(admin_request(Method::GET, "/_gateway/status", None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = server
            .router()
            .oneshot(admin_request(Method::GET, "/_gateway/status", Some("wrong")))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_status_reports_order() {
        let server = server();
        server.gateway().state().record_success(Role::Secondary);

        let res = server
            .router()
            .oneshot(admin_request(Method::GET, "/_gateway/status", Some("test-key")))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = serde_json::from_slice(&to_bytes(res.into_body(), usize::MAX).await.unwrap()).unwrap();
        assert_eq!(body["mode"], "production");
        assert_eq!(body["preferred"], "secondary");
        assert_eq!(body["candidates"][0]["role"], "secondary");
        assert_eq!(body["candidates"][1]["target"], "http://127.0.0.1:7860");
        assert_eq!(body["attempt_timeout_ms"], 15000);
    }

    #[tokio::test]
    async fn test_reset_preference() {
        let server = server();
        server.gateway().state().record_success(Role::Secondary);

        let res = server
            .router()
            .oneshot(admin_request(Method::POST, "/_gateway/preference/reset", Some("test-key")))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = serde_json::from_slice(&to_bytes(res.into_body(), usize::MAX).await.unwrap()).unwrap();
        assert_eq!(body["previous"], "secondary");
        assert_eq!(body["preferred"], "primary");
    }
}
