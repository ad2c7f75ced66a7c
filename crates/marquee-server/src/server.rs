//! Router assembly and server lifecycle.

use std::any::Any;
use std::net::SocketAddr;

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use marquee_auth::{Role, require_auth, require_role};

use crate::bootstrap;
use crate::config::AppConfig;
use crate::handlers::{auditoriums, cinemas, shows, system, users};
use crate::state::AppState;

/// Roles allowed to manage cinemas and auditoriums.
const CATALOG_MANAGERS: &[Role] = &[Role::Admin, Role::CinemaOwner];

/// Builds the application router.
///
/// Route protection mirrors the gate chain: public reads, authenticated
/// writes, and manager-only catalog creation.
pub fn build_app(state: AppState, cfg: &AppConfig) -> Router {
    let auth = middleware::from_fn_with_state(state.auth.clone(), require_auth);

    let public = Router::new()
        .route("/cinemas", get(cinemas::list))
        .route("/cinemas/{id}", get(cinemas::get_by_id))
        .route("/cinemas/name/{name}", get(cinemas::get_by_name))
        .route("/cinemas/{id}/auditoriums", get(cinemas::list_auditoriums))
        .route(
            "/cinemas/name/{name}/auditoriums",
            get(cinemas::list_auditoriums_by_name),
        )
        .route("/auditoriums/{id}", get(auditoriums::get_by_id))
        .route("/shows", get(shows::list))
        .route("/shows/{id}", get(shows::get_by_id))
        .route("/register", post(users::register))
        .route("/login", post(users::login));

    let managed = Router::new()
        .route("/cinemas", post(cinemas::create))
        .route("/auditoriums", post(auditoriums::create))
        .route_layer(middleware::from_fn(require_role(CATALOG_MANAGERS)))
        .route_layer(auth.clone());

    let authenticated = Router::new()
        .route("/shows", post(shows::create))
        .route(
            "/profile",
            get(users::get_profile).put(users::update_profile),
        )
        .route_layer(auth);

    let v1 = public.merge(managed).merge(authenticated);

    Router::new()
        .route("/healthz", get(system::healthz))
        .route("/ping", get(system::ping))
        .nest("/v1", v1)
        .layer(DefaultBodyLimit::max(cfg.server.body_limit_bytes))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http.request",
                    http.method = %req.method(),
                    http.target = %req.uri()
                )
            }),
        )
        .layer(CorsLayer::permissive())
        // Outermost: a panic anywhere downstream becomes a logged 500 instead
        // of tearing down the connection task.
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    tracing::error!(panic = %detail, "request handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": {
                "code": "internal",
                "message": "internal server error",
            }
        })),
    )
        .into_response()
}

// =============================================================================
// Server lifecycle
// =============================================================================

/// A built server ready to run.
pub struct MarqueeServer {
    addr: SocketAddr,
    app: Router,
}

/// Builder wiring configuration and state into a runnable server.
pub struct ServerBuilder {
    config: AppConfig,
    state: Option<AppState>,
}

impl ServerBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            state: None,
        }
    }

    #[must_use]
    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.config = cfg;
        self
    }

    /// Injects pre-built state (used by tests to supply stub stores).
    #[must_use]
    pub fn with_state(mut self, state: AppState) -> Self {
        self.state = Some(state);
        self
    }

    /// Builds the server, constructing default state from the configuration
    /// when none was injected.
    ///
    /// # Errors
    ///
    /// Returns an error if state construction fails.
    pub async fn build(self) -> anyhow::Result<MarqueeServer> {
        let state = match self.state {
            Some(state) => state,
            None => bootstrap::build_state(&self.config).await?,
        };
        let app = build_app(state, &self.config);
        Ok(MarqueeServer {
            addr: self.config.addr(),
            app,
        })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MarqueeServer {
    /// Binds the listener and serves until shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if binding or serving fails.
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_panic_is_converted_to_500() {
        async fn boom() -> &'static str {
            panic!("handler exploded");
        }

        let app = Router::new()
            .route("/boom", get(boom))
            .layer(CatchPanicLayer::custom(handle_panic));

        let res = app
            .oneshot(Request::builder().uri("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "internal");
    }
}
