pub mod dto;
pub mod errors;
pub mod handlers;

use anyhow::{Context, Result};
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use crate::store::SharedStore;
use handlers::ApiDoc;

pub fn router(store: SharedStore) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .route("/", get(handlers::root))
        .route("/container/{id}", post(handlers::ingest_reading))
        .route("/containers", get(handlers::list_containers))
        .route("/containers/{id}/history", get(handlers::container_history))
        .route("/stats", get(handlers::fleet_stats))
        .route("/health", get(handlers::health))
        .with_state(store)
        .split_for_parts();

    router.route(
        "/api-docs/openapi.json",
        get(move || async move { axum::Json(api) }),
    )
}

/// Allow any origin when `origins` is empty, otherwise only the listed ones.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        let values = origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin: {o:?}"))
            })
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(values)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::{HeaderName, HeaderValue};
    use axum_test::TestServer;

    use super::*;
    use crate::store::MemoryReadingStore;

    fn server_with_cors(origins: &[String]) -> TestServer {
        let app = router(Arc::new(MemoryReadingStore::new())).layer(cors_layer(origins).unwrap());
        TestServer::new(app).unwrap()
    }

    async fn allow_origin_header(server: &TestServer, origin: &'static str) -> Option<HeaderValue> {
        let resp = server
            .get("/containers")
            .add_header(
                HeaderName::from_static("origin"),
                HeaderValue::from_static(origin),
            )
            .await;
        resp.assert_status_ok();
        resp.headers().get("access-control-allow-origin").cloned()
    }

    #[tokio::test]
    async fn empty_origin_list_allows_any_origin() {
        let server = server_with_cors(&[]);
        let header = allow_origin_header(&server, "http://dashboard.local").await;
        assert_eq!(header.unwrap(), "*");
    }

    #[tokio::test]
    async fn listed_origin_is_echoed_back() {
        let server = server_with_cors(&["http://dashboard.local".to_owned()]);
        let header = allow_origin_header(&server, "http://dashboard.local").await;
        assert_eq!(header.unwrap(), "http://dashboard.local");
    }

    #[tokio::test]
    async fn unlisted_origin_gets_no_cors_header() {
        let server = server_with_cors(&["http://dashboard.local".to_owned()]);
        let header = allow_origin_header(&server, "http://evil.local").await;
        assert!(header.is_none());
    }

    #[test]
    fn invalid_origin_is_rejected() {
        let err = cors_layer(&["bad\norigin".to_owned()]).unwrap_err();
        assert!(err.to_string().contains("invalid CORS origin"));
    }
}
