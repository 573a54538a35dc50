use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

mod config;
mod database;
mod error;
mod handlers;
mod services;
mod slug;
mod types;

use handlers::AppState;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = crate::config::config();

    tracing_subscriber::fmt::init();
    tracing::info!("Starting Atelier API in {:?} mode", config.environment);

    let pool = database::manager::DatabaseManager::connect()
        .await
        .unwrap_or_else(|e| panic!("failed to connect to catalog database: {}", e));

    sqlx::migrate!()
        .run(&pool)
        .await
        .unwrap_or_else(|e| panic!("failed to apply migrations: {}", e));

    let app = app(AppState::new(pool));

    // Allow tests or deployments to override port via env
    let port = std::env::var("ATELIER_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Atelier API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Category management
        .merge(category_routes())
        .merge(attribute_routes())
        .merge(report_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn category_routes() -> Router<AppState> {
    use axum::routing::patch;
    use handlers::categories;

    Router::new()
        // Collection: hierarchy/flat listing and creation
        .route(
            "/api/categories",
            get(categories::category_list).post(categories::category_create),
        )
        // Batch operations (static segments before :id)
        .route("/api/categories/reorder", patch(categories::category_reorder))
        .route(
            "/api/categories/bulk-update",
            patch(categories::category_bulk_update),
        )
        // Individual category
        .route(
            "/api/categories/:id",
            get(categories::category_show)
                .put(categories::category_update)
                .delete(categories::category_delete),
        )
        .route("/api/categories/:id/status", patch(categories::category_status))
        .route("/api/categories/:id/move", patch(categories::category_move))
}

fn attribute_routes() -> Router<AppState> {
    use axum::routing::put;
    use handlers::categories;

    Router::new()
        .route(
            "/api/categories/:id/attributes",
            get(categories::attribute_list).post(categories::attribute_create),
        )
        .route(
            "/api/categories/:id/attributes/:attribute_id",
            put(categories::attribute_update).delete(categories::attribute_delete),
        )
}

fn report_routes() -> Router<AppState> {
    use handlers::categories;

    Router::new()
        .route("/api/categories/search", get(categories::category_search))
        .route("/api/categories/stats", get(categories::category_stats))
        .route(
            "/api/categories/:id/breadcrumb",
            get(categories::category_breadcrumb),
        )
        .route(
            "/api/categories/export/csv",
            get(categories::category_export),
        )
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Atelier API",
            "version": version,
            "description": "Headless e-commerce catalog admin API built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "categories": "/api/categories[/:id] (list, create, update, delete)",
                "hierarchy": "/api/categories?flat=false (nested tree)",
                "attributes": "/api/categories/:id/attributes[/:attributeId]",
                "search": "/api/categories/search?q=...",
                "breadcrumb": "/api/categories/:id/breadcrumb",
                "stats": "/api/categories/stats",
                "export": "/api/categories/export/csv",
            }
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::manager::DatabaseManager::health_check(&state.pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
