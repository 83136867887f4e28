// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use axum::http::HeaderName;
use clap::Parser;
use server::{
    config::Config,
    database,
    handlers::AppState,
    routes,
    store::{LoadOutcome, TaskStore},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::parse();
    tracing::info!("Starting up the server...");

    let db_pool = match database::establish_connection_pool(&config.db_url).await {
        Ok(pool) => {
            tracing::info!("Database connection was made successfully.");
            pool
        }
        Err(e) => {
            tracing::error!("Failed to connect with the database: {:?}", e);
            std::process::exit(1);
        }
    };

    let store = match TaskStore::open(db_pool).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to load the task list: {:?}", e);
            std::process::exit(1);
        }
    };
    if store.load_outcome() == LoadOutcome::Recovered {
        tracing::warn!("Started from the seed list because the saved task list was unreadable.");
    }

    let app_routes = routes::create_router(AppState::new(store));

    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("accept"),
        ])
        .allow_origin(Any);

    let app = app_routes.layer(cors).layer(TraceLayer::new_for_http());

    let listener = match tokio::net::TcpListener::bind(config.addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", config.addr, e);
            std::process::exit(1);
        }
    };
    tracing::info!("The server listens on http://{}", config.addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
