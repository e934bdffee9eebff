//! Router assembly and the shared request context.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::http::{header, HeaderValue, Method};
use axum::middleware::Next;
use axum::response::Response;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::api;
use crate::config::Config;
use crate::store::Store;

/// State handed to every handler: the store handle plus configuration.
///
/// Built once at startup; clones share the underlying connection pool.
#[derive(Clone)]
pub struct AppContext {
    /// Document store handle.
    pub store: Store,
    /// Process configuration (signing secret, environment, CORS origin).
    pub config: Arc<Config>,
}

/// Assemble the full route table with middleware applied.
pub fn router(ctx: AppContext) -> Router {
    let cors = cors_layer(&ctx.config);

    Router::new()
        .route("/", get(liveness))
        .route("/jwt", post(api::session::issue_session))
        .route("/logout", get(api::session::end_session))
        .route("/service", post(api::services::create_service))
        .route("/services", get(api::services::list_services))
        .route(
            "/service/:id",
            get(api::services::get_service).delete(api::services::delete_service),
        )
        .route("/updateService/:id", put(api::services::update_service))
        .route("/reviews", post(api::reviews::create_review))
        .route("/reviews/:service_id", get(api::reviews::reviews_for_service))
        .route("/user/reviews", get(api::reviews::user_reviews))
        .route("/updateReview/:id", put(api::reviews::update_review))
        .route("/deleteReview/:id", delete(api::reviews::delete_review))
        .route("/platform-stats", get(api::stats::platform_stats))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(ctx)
}

/// `GET /` - plaintext liveness message.
async fn liveness() -> &'static str {
    "Service hub backend is up and running"
}

/// Cross-origin policy: exactly the configured frontend origin, with
/// credentialed (cookie) requests allowed.
fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    match HeaderValue::try_from(config.cors.allowed_origin.as_str()) {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            warn!(
                origin = %config.cors.allowed_origin,
                "ALLOWED_ORIGIN is not a valid header value, cross-origin requests will be refused"
            );
            layer
        }
    }
}

/// Tag each request with a unique id, log its completion, and carry the id in
/// a tracing span covering the handler.
async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let span = info_span!("request", request_id = %request_id, method = %method, uri = %uri);
    let response = next.run(request).instrument(span).await;

    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = response.status().as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        "request completed"
    );

    response
}

#[cfg(test)]
pub(crate) mod testing {
    //! Context fixtures for handler-level tests.

    use std::sync::Arc;

    use tempfile::TempDir;

    use crate::config::{AuthConfig, Config, CorsConfig, Environment, ServerConfig, StoreConfig};
    use crate::store::testing::temp_store;

    use super::AppContext;

    /// Configuration pointing nowhere in particular, with a fixed secret.
    pub(crate) fn config(environment: Environment) -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            store: StoreConfig {
                database_path: String::new(),
            },
            auth: AuthConfig {
                secret_key: "test-secret".to_string(),
            },
            cors: CorsConfig {
                allowed_origin: "http://localhost:5174".to_string(),
            },
            environment,
        }
    }

    /// Context over a fresh throwaway store, in the given environment.
    pub(crate) async fn context_in(environment: Environment) -> (AppContext, TempDir) {
        let (store, dir) = temp_store().await;
        let ctx = AppContext {
            store,
            config: Arc::new(config(environment)),
        };
        (ctx, dir)
    }

    /// Development-environment context over a fresh throwaway store.
    pub(crate) async fn context() -> (AppContext, TempDir) {
        context_in(Environment::Development).await
    }
}
