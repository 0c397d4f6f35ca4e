// Shared fixtures for the database-backed tests. They run only when
// DATABASE_URL points at a reachable Postgres; without it every test
// returns early so the suite stays green on machines without one.

use std::sync::Mutex;

use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};
use uuid::Uuid;

static SCHEMA_GUARD: Mutex<()> = Mutex::new(());

pub async fn try_pool() -> Option<PgPool> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("skipping: DATABASE_URL is not set");
            return None;
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("DATABASE_URL is set but the database is unreachable");

    // Serialize schema creation across test threads on a fresh database
    let _guard = SCHEMA_GUARD.lock().expect("schema guard");
    let present: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM information_schema.tables WHERE table_name = 'designs')",
    )
    .fetch_one(&pool)
    .await
    .expect("schema probe");
    if !present {
        pool.execute(include_str!("../../migrations/0001_init.sql"))
            .await
            .expect("apply schema");
    }

    Some(pool)
}

/// Insert an approved non-admin user with a throwaway username.
pub async fn seed_user(pool: &PgPool) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO users (id, username, password_hash, is_approved) VALUES ($1, $2, 'test-hash', true)",
    )
    .bind(id)
    .bind(format!("user_{}", id.simple()))
    .execute(pool)
    .await
    .expect("seed user");
    id
}

/// Insert a minimal design in the given lifecycle status.
pub async fn seed_design(pool: &PgPool, status: &str) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO designs (id, title, category, design_number, status, object_key)
        VALUES ($1, 'Banarasi silk saree', 'saree', $2, $3, $4)
        "#,
    )
    .bind(id)
    .bind(format!("TST-{}", &id.simple().to_string()[..8]))
    .bind(status)
    .bind(format!("designs/{}.jpg", id))
    .execute(pool)
    .await
    .expect("seed design");
    id
}

#[allow(dead_code)]
pub async fn like_count(pool: &PgPool, design_id: Uuid) -> i32 {
    sqlx::query_scalar("SELECT like_count FROM designs WHERE id = $1")
        .bind(design_id)
        .fetch_one(pool)
        .await
        .expect("like_count")
}

/// Delete a seeded design; image, favorite and cart item rows cascade.
pub async fn remove_design(pool: &PgPool, id: Uuid) {
    sqlx::query("DELETE FROM designs WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .expect("remove design");
}

/// Delete a seeded user; their cart cascades.
pub async fn remove_user(pool: &PgPool, id: Uuid) {
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .expect("remove user");
}
