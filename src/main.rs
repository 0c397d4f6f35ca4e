use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post, put};
use axum::{middleware as axum_middleware, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use atelier_api::config;
use atelier_api::database;
use atelier_api::handlers::{elevated, protected, public};
use atelier_api::middleware::{self, RateLimiter};
use atelier_api::state::AppState;
use atelier_api::storage::S3Store;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting atelier-api in {:?} mode", config.environment);

    let pool = database::connect()
        .await
        .unwrap_or_else(|e| panic!("failed to connect to database: {}", e));

    let store = S3Store::from_env().await;
    let state = AppState::new(pool, Arc::new(store), Arc::new(RateLimiter::from_config()));
    let app = app(state);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("listening on http://{}", bind_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("server");
}

fn app(state: AppState) -> Router {
    let router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        .merge(authenticated_routes())
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(
            config::config().api.max_upload_bytes + 64 * 1024,
        ));

    let router = if config::config().security.enable_cors {
        router.layer(cors_layer())
    } else {
        router
    };

    router.with_state(state)
}

fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = config::config()
        .security
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ])
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(public::auth::register))
        .route("/auth/login", post(public::auth::login))
}

/// Everything behind bearer auth and the approval gate. Paths that mix
/// read and mutation methods keep reads open to any approved account;
/// mutation handlers demand the admin role through their extractor.
fn authenticated_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(protected::me::me))
        .route(
            "/designs",
            get(protected::designs::list).post(elevated::designs::create),
        )
        .route("/designs/user/favorites", get(protected::favorites::list))
        .route(
            "/designs/:id",
            get(protected::designs::get)
                .put(elevated::designs::update)
                .delete(elevated::designs::delete),
        )
        .route(
            "/designs/:id/favorite",
            post(protected::favorites::add).delete(protected::favorites::remove),
        )
        .route(
            "/designs/:id/images",
            get(protected::designs::list_images).post(elevated::images::add),
        )
        .route(
            "/designs/:id/images/reorder",
            put(elevated::images::reorder),
        )
        .route(
            "/designs/:id/images/:image_id",
            put(elevated::images::update).delete(elevated::images::delete),
        )
        .route(
            "/designs/:id/images/:image_id/primary",
            put(elevated::images::set_primary),
        )
        .route(
            "/cart",
            get(protected::cart::view).delete(protected::cart::clear),
        )
        .route("/cart/items", post(protected::cart::add_item))
        .route(
            "/cart/items/:id",
            put(protected::cart::update_item).delete(protected::cart::remove_item),
        )
        .route("/cart/share", post(protected::cart::share))
        .route("/upload/image", post(elevated::uploads::upload_image))
        .route("/upload/batch", post(elevated::uploads::upload_batch))
        .route(
            "/upload/design/:id/images",
            post(elevated::uploads::upload_design_image),
        )
        .route("/admin/users", get(elevated::admin::list_users))
        .route(
            "/admin/users/:id/approval",
            put(elevated::admin::set_approval),
        )
        .route("/admin/users/:id/role", put(elevated::admin::set_role))
        .route(
            "/admin/users/:id",
            axum::routing::delete(elevated::admin::delete_user),
        )
        .route("/admin/stats", get(elevated::admin::stats))
        .route("/admin/settings", get(elevated::admin::list_settings))
        .route(
            "/admin/settings/:key",
            put(elevated::admin::upsert_setting).delete(elevated::admin::delete_setting),
        )
        .layer(axum_middleware::from_fn(middleware::require_approved))
        .layer(axum_middleware::from_fn(middleware::require_auth))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Atelier API",
            "version": version,
            "description": "Design catalog backend",
            "endpoints": {
                "auth": "/auth/register, /auth/login (public), /auth/me (authenticated)",
                "catalog": "/designs[/:id] (authenticated; mutations admin-only)",
                "favorites": "/designs/:id/favorite, /designs/user/favorites (authenticated)",
                "cart": "/cart, /cart/items[/:id], /cart/share (authenticated)",
                "uploads": "/upload/image, /upload/batch, /upload/design/:id/images (admin)",
                "admin": "/admin/users, /admin/settings, /admin/stats (admin)",
            }
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match database::health_check(&state.pool).await {
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
        Err(e) => {
            tracing::error!("health check failed: {}", e);
            (
                axum::http::StatusCode::SERVICE_UNAVAILABLE,
                axum::response::Json(json!({
                    "success": false,
                    "message": "database unavailable",
                    "error": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
