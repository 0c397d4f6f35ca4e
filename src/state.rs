use sqlx::PgPool;
use std::sync::Arc;

use crate::middleware::RateLimiter;
use crate::storage::ObjectStore;

/// Shared per-process state handed to handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub store: Arc<dyn ObjectStore>,
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(pool: PgPool, store: Arc<dyn ObjectStore>, limiter: Arc<RateLimiter>) -> Self {
        Self {
            pool,
            store,
            limiter,
        }
    }
}
