use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{hash_password, issue_token, verify_password, Claims};
use crate::config;
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /auth/register
///
/// Creates a pending account. New accounts cannot log in until an admin
/// approves them, so registration returns the profile but no token.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> ApiResult<Value> {
    let username = body.username.trim().to_lowercase();
    if username.len() < 3 || username.len() > 50 {
        return Err(ApiError::validation_error(
            "Username must be between 3 and 50 characters",
            None,
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
    {
        return Err(ApiError::validation_error(
            "Username may only contain letters, digits, underscores and dots",
            None,
        ));
    }
    if body.password.len() < 8 {
        return Err(ApiError::validation_error(
            "Password must be at least 8 characters",
            None,
        ));
    }

    let password_hash = hash_password(&body.password)?;

    let user: User = sqlx::query_as(
        r#"
        INSERT INTO users (id, username, password_hash, is_admin, is_approved, created_at, updated_at)
        VALUES ($1, $2, $3, false, false, NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(uuid::Uuid::new_v4())
    .bind(&username)
    .bind(&password_hash)
    .fetch_one(&state.pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return ApiError::conflict("Username is already taken");
            }
        }
        ApiError::from(e)
    })?;

    tracing::info!("registered user {} pending approval", user.username);
    Ok(ApiResponse::created(
        "Account created and awaiting approval",
        user.to_profile(),
    ))
}

/// POST /auth/login
///
/// Wrong username, wrong password and unapproved account all produce the
/// same 401 so the endpoint cannot be used to probe which part failed.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Value> {
    let username = body.username.trim().to_lowercase();

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE username = $1")
        .bind(&username)
        .fetch_optional(&state.pool)
        .await?;

    let user = match user {
        Some(u) if verify_password(&body.password, &u.password_hash) => u,
        _ => return Err(invalid_credentials()),
    };

    if !user.is_approved && !user.is_admin {
        return Err(invalid_credentials());
    }

    let ttl = config::config().security.jwt_expiry_secs;
    let claims = Claims::new(
        user.id,
        user.username.clone(),
        user.is_admin,
        user.is_approved,
        ttl,
    );
    let token = issue_token(&claims)?;

    Ok(ApiResponse::success(
        "Login successful",
        json!({
            "access_token": token,
            "token_type": "bearer",
            "expires_in": ttl,
            "user": user.to_profile(),
        }),
    ))
}

fn invalid_credentials() -> ApiError {
    ApiError::unauthorized("Invalid username or password")
}
