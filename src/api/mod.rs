// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    body::Body,
    http::{header::InvalidHeaderValue, HeaderValue, Request},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::require_bearer,
    metrics::track_metrics,
    models::{Donation, NotificationRequest, NotificationResponse},
    state::AppState,
};

pub mod donations;
pub mod health;
pub mod images;
pub mod metrics;
pub mod notifications;

pub fn router(state: AppState, cors: CorsLayer) -> Router {
    let guard = from_fn_with_state(state.auth.clone(), require_bearer);

    let protected = Router::new()
        .route("/filteredDonations", get(donations::filtered_donations))
        .route("/sendNotification", post(notifications::send_notification))
        .route_layer(guard.clone());

    let mut image_routes =
        Router::new().route("/proxy-image/{filename}", get(images::proxy_image));
    if state.image_proxy_requires_auth {
        image_routes = image_routes.route_layer(guard);
    }

    let public = Router::new()
        .route("/metrics", get(metrics::metrics))
        .route("/health", get(health::liveness));

    Router::new()
        .merge(protected)
        .merge(image_routes)
        .merge(public)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Applied with `layer` so the 404 fallback is counted too.
        .layer(from_fn_with_state(state.metrics.clone(), track_metrics))
        .with_state(state)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get("x-request-id")
                .and_then(|value| value.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        }))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors)
}

/// CORS policy: a single allowed origin when configured, any origin
/// otherwise.
pub fn cors_layer(allowed_origin: Option<&str>) -> Result<CorsLayer, InvalidHeaderValue> {
    let origin = match allowed_origin {
        Some(origin) => CorsLayer::new().allow_origin(origin.parse::<HeaderValue>()?),
        None => CorsLayer::new().allow_origin(Any),
    };
    Ok(origin.allow_methods(Any).allow_headers(Any))
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Donations Gateway",
        description = "Filtering, donor notifications and image proxying in front of the donations backend."
    ),
    paths(
        donations::filtered_donations,
        notifications::send_notification,
        images::proxy_image,
        metrics::metrics,
        health::liveness
    ),
    components(
        schemas(
            Donation,
            NotificationRequest,
            NotificationResponse,
            health::HealthResponse
        )
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = "Donations", description = "Donation listing"),
        (name = "Notifications", description = "Donor notifications"),
        (name = "Images", description = "Uploaded image proxy"),
        (name = "Observability", description = "Metrics and health")
    )
)]
pub struct ApiDoc;

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{sync::Arc, time::Duration};

    use async_trait::async_trait;
    use axum::{
        body::to_bytes,
        http::{header::AUTHORIZATION, Method, StatusCode},
    };
    use tower::ServiceExt;
    use url::Url;

    use crate::{
        auth::{AuthGuard, JwtVerifier},
        metrics::{tests::sample, GatewayMetrics, REQUESTS_TOTAL, REQUEST_ERRORS_TOTAL},
        models::NotificationEmail,
        providers::{BackendClient, MailError, NotificationMailer},
    };

    /// Fails the test if any delivery is attempted.
    struct UnreachableMailer;

    #[async_trait]
    impl NotificationMailer for UnreachableMailer {
        async fn send(&self, _email: &NotificationEmail) -> Result<(), MailError> {
            panic!("mail relay must not be called");
        }
    }

    fn state() -> AppState {
        // Nothing listens on the discard port: any backend call would fail
        // with a 502, which the assertions below would catch.
        let backend =
            BackendClient::new(Url::parse("http://127.0.0.1:9").unwrap(), Duration::from_secs(1))
                .unwrap();
        AppState::new(
            backend,
            Arc::new(UnreachableMailer),
            GatewayMetrics::new().unwrap(),
            AuthGuard::new(JwtVerifier::hs256(b"router-secret", 0)),
        )
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let app = router(state(), cors_layer(None).unwrap());
        let _ = app.into_make_service();
    }

    #[test]
    fn cors_origin_must_be_a_valid_header() {
        assert!(cors_layer(Some("http://localhost:3000")).is_ok());
        assert!(cors_layer(Some("bad\norigin")).is_err());
    }

    #[test]
    fn openapi_documents_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/filteredDonations",
            "/sendNotification",
            "/proxy-image/{filename}",
            "/metrics",
            "/health",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{path} is not documented");
        }
    }

    #[tokio::test]
    async fn protected_routes_reject_missing_token() {
        let app = router(state(), cors_layer(None).unwrap());

        let (status, body) = send(
            app.clone(),
            Request::get("/filteredDonations").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("missing_auth_header"));

        let (status, _) = send(
            app,
            Request::builder()
                .method(Method::POST)
                .uri("/sendNotification")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"email":"a@b.com","id":"1","description":"x"}"#))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn forged_token_never_reaches_the_handler() {
        let app = router(state(), cors_layer(None).unwrap());
        let (status, body) = send(
            app,
            Request::get("/filteredDonations?city=Bogota")
                .header(AUTHORIZATION, "Bearer not.a.token")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("malformed_token"));
    }

    #[tokio::test]
    async fn image_proxy_can_require_auth() {
        let app = router(state().with_image_proxy_auth(true), cors_layer(None).unwrap());
        let (status, _) = send(
            app,
            Request::get("/proxy-image/perro.png").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn metrics_route_is_public_and_counts_rejections() {
        let state = state();
        let app = router(state.clone(), cors_layer(None).unwrap());

        let (status, _) = send(
            app.clone(),
            Request::get("/filteredDonations").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));

        let rendered = state.metrics.render();
        assert_eq!(
            sample(&rendered, REQUESTS_TOTAL, r#"route="/filteredDonations""#),
            Some(1.0)
        );
        assert_eq!(
            sample(&rendered, REQUEST_ERRORS_TOTAL, r#"route="/filteredDonations""#),
            Some(1.0)
        );
    }

    #[tokio::test]
    async fn unknown_paths_are_counted_as_unmatched() {
        let state = state();
        let app = router(state.clone(), cors_layer(None).unwrap());

        let (status, _) = send(
            app,
            Request::get("/no-such-route").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let rendered = state.metrics.render();
        assert_eq!(
            sample(&rendered, REQUESTS_TOTAL, r#"route="unmatched""#),
            Some(1.0)
        );
        assert_eq!(
            sample(&rendered, REQUEST_ERRORS_TOTAL, r#"route="unmatched""#),
            Some(1.0)
        );
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = router(state(), cors_layer(None).unwrap());
        let (status, body) = send(app, Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"status":"ok"}"#);
    }
}
