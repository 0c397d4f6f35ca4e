use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::config;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window request counter keyed by client identifier.
///
/// Injected through AppState rather than held as a module singleton so tests
/// can construct and reset their own instances. Counters live for the process
/// lifetime and reset on restart; exactness under concurrent races is not
/// required, only that the counter is safe to touch from many requests.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config() -> Self {
        let api = &config::config().api;
        Self::new(
            api.rate_limit_requests,
            Duration::from_secs(api.rate_limit_window_secs),
        )
    }

    /// Record one request for `key`. Returns `Err(retry_after_secs)` when the
    /// window's budget is exhausted. The window resets exactly at
    /// `started + window`, not on a sliding basis.
    pub fn check(&self, key: &str) -> Result<(), u64> {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> Result<(), u64> {
        let mut windows = self.windows.lock().expect("rate limiter lock");
        let window = windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(window.started) >= self.window {
            window.started = now;
            window.count = 0;
        }

        window.count += 1;
        if window.count > self.max_requests {
            let elapsed = now.duration_since(window.started);
            let remaining = self.window.saturating_sub(elapsed);
            return Err(remaining.as_secs().max(1));
        }

        Ok(())
    }
}

/// Per-request rate limiting, keyed by client IP.
pub async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !config::config().api.enable_rate_limiting {
        return Ok(next.run(request).await);
    }

    let key = client_key(&request);
    if let Err(retry_after) = state.limiter.check(&key) {
        tracing::warn!("Rate limit exceeded for {}", key);
        return Err(ApiError::too_many_requests(
            "Too many requests, please retry later",
            retry_after,
        ));
    }

    Ok(next.run(request).await)
}

/// Client identifier: first X-Forwarded-For hop when present (the expected
/// deployment sits behind a proxy), otherwise the socket address.
fn client_key(request: &Request) -> String {
    if let Some(forwarded) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let trimmed = first.trim();
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_after_budget_and_reports_retry_after() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let now = Instant::now();

        assert!(limiter.check_at("1.2.3.4", now).is_ok());
        assert!(limiter.check_at("1.2.3.4", now).is_ok());

        let retry_after = limiter.check_at("1.2.3.4", now).unwrap_err();
        assert!(retry_after >= 1 && retry_after <= 60);

        // Other clients are unaffected
        assert!(limiter.check_at("5.6.7.8", now).is_ok());
    }

    #[test]
    fn window_resets_at_boundary_not_sliding() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let start = Instant::now();

        assert!(limiter.check_at("client", start).is_ok());
        assert!(limiter
            .check_at("client", start + Duration::from_secs(59))
            .is_err());
        assert!(limiter
            .check_at("client", start + Duration::from_secs(60))
            .is_ok());
    }
}
