use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use hively_common::Config;
use hively_events::OutboxStore;
use hively_graph::{GraphClient, GraphProjector, GraphWriter, RecommendationReader};

mod db;
mod rest;
mod tailer;

use db::PgStore;

pub struct AppState {
    pub client: GraphClient,
    pub reader: RecommendationReader,
    pub writer: GraphWriter,
    pub store: Arc<PgStore>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("hively=info".parse()?))
        .init();

    let config = Config::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;

    let outbox = OutboxStore::new(pool.clone());
    outbox.migrate().await?;

    let client =
        GraphClient::connect(&config.neo4j_uri, &config.neo4j_user, &config.neo4j_password)
            .await?;

    // The pool is lazy; ping to learn whether the graph is actually up.
    // An unreachable graph store degrades recommendations, it does not
    // stop the service.
    if let Err(e) = client.ping().await {
        warn!(error = %e, "graph store unreachable at startup; recommendations degraded");
    }

    let store = Arc::new(PgStore::new(pool));

    let tailer_projector = GraphProjector::new(GraphWriter::new(client.clone()));
    tokio::spawn(tailer::run(outbox, tailer_projector));

    let state = Arc::new(AppState {
        reader: RecommendationReader::new(client.clone()),
        writer: GraphWriter::new(client.clone()),
        client,
        store,
    });

    let app = Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        // Recommendations
        .route(
            "/api/users/{id}/recommendations/posts",
            get(rest::api_recommend_posts),
        )
        .route(
            "/api/users/{id}/recommendations/friends",
            get(rest::api_recommend_friends),
        )
        // Admin
        .route("/api/admin/resync", post(rest::api_admin_resync))
        .with_state(state)
        // CORS
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // Logging layer: method + path + status + latency only
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        );

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("Hively recommendation API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
