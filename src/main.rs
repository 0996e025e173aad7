use std::{net::SocketAddr, sync::Arc};

use axum::http::{header::CONTENT_TYPE, Method};
use tower_http::cors::{Any, CorsLayer};

use pomodoro_todo_api::{route::create_router, store::SqliteTodoStore, AppState};

// Entry point of the application
#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let db_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://todo.db".to_string());

    // Connect to the database, creating it on first run
    let store = match SqliteTodoStore::connect(&db_url).await {
        Ok(store) => store,
        Err(err) => {
            tracing::error!(error = %err, "failed to connect to the database");
            std::process::exit(1);
        }
    };

    let app_state = Arc::new(AppState {
        store: Box::new(store),
    });

    // The web client is served from a different origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    let app = create_router(app_state).layer(cors);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    tracing::info!(%addr, "server started");

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
