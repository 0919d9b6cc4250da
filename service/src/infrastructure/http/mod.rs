use anyhow::Context;
use axum::Router;
use axum::routing::{get, post};
use axum_prometheus::PrometheusMetricLayer;
use tokio::net;

use crate::domain::AppState;
use crate::infrastructure::http::handlers::health_check;
use crate::infrastructure::http::handlers::posts::{
    find_post_by_slug, list_categories, list_category_posts, list_featured, list_posts,
};
use crate::infrastructure::http::handlers::sessions::{
    close_session, create_session, get_session, run_command,
};

mod api;
mod handlers;
mod querystring;

/// Configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpServerConfig<'a> {
    pub port: &'a str,
}

/// The application's HTTP server. The underlying HTTP package is opaque to module consumers.
pub struct HttpServer {
    router: axum::Router,
    listener: net::TcpListener,
}

impl HttpServer {
    /// Returns a new HTTP server bound to the port specified in `config`.
    pub async fn new(state: impl AppState, config: HttpServerConfig<'_>) -> anyhow::Result<Self> {
        let trace_layer = tower_http::trace::TraceLayer::new_for_http().make_span_with(
            |request: &axum::extract::Request<_>| {
                let uri = request.uri().to_string();
                tracing::info_span!("http_request", method = ?request.method(), uri)
            },
        );
        // see: https://github.com/Ptrskay3/axum-prometheus
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

        let router = routes(state)
            .route("/metrics", get(|| async move { metric_handle.render() }))
            .layer(trace_layer)
            .layer(prometheus_layer);

        let listener = net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
            .await
            .with_context(|| format!("failed to listen on {}", config.port))?;

        Ok(Self { router, listener })
    }

    /// Runs the HTTP server.
    pub async fn run(self) -> anyhow::Result<()> {
        let address = self
            .listener
            .local_addr()
            .context("listener has no local address")?;
        tracing::info!("listening on {}", address);
        axum::serve(self.listener, self.router)
            .await
            .context("received error from running server")?;
        Ok(())
    }
}

/// Health check and API routes, without the metrics endpoint.
fn routes<S: AppState>(state: S) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .with_state(state)
}

fn api_routes<S: AppState>() -> Router<S> {
    Router::new()
        .route("/sessions", post(create_session::<S>))
        .route("/sessions/{id}", get(get_session::<S>).delete(close_session::<S>))
        .route("/sessions/{id}/commands", post(run_command::<S>))
        .route("/posts", get(list_posts::<S>))
        .route("/posts/{slug}", get(find_post_by_slug::<S>))
        .route("/categories", get(list_categories::<S>))
        .route("/categories/{slug}/posts", get(list_category_posts::<S>))
        .route("/featured", get(list_featured::<S>))
}
