//! API rate limiting middleware.
//!
//! Per-user and per-IP fixed-window limiting. State lives in process memory
//! and resets on restart; there is no cross-node coordination.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::RwLock;

/// Rate limit configuration for different endpoint types.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per window.
    pub max_requests: u32,
    /// Time window duration in seconds.
    pub window_secs: u64,
}

impl RateLimitConfig {
    /// Create a new rate limit config.
    #[must_use]
    pub const fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
        }
    }
}

/// Default rate limits for different endpoint categories.
pub mod limits {
    use super::RateLimitConfig;

    /// Standard API endpoints.
    pub const STANDARD: RateLimitConfig = RateLimitConfig::new(300, 60);

    /// Write operations (workflow advances, contact form).
    pub const WRITE: RateLimitConfig = RateLimitConfig::new(30, 60);

    /// Heavy operations (photo upload, payment creation).
    pub const HEAVY: RateLimitConfig = RateLimitConfig::new(10, 60);
}

/// Rate limit state for a single key.
#[derive(Debug, Clone)]
struct WindowState {
    count: u32,
    window_start: Instant,
}

impl WindowState {
    fn new() -> Self {
        Self {
            count: 0,
            window_start: Instant::now(),
        }
    }
}

/// API rate limiter.
#[derive(Clone)]
pub struct ApiRateLimiter {
    /// State per key (user ID or IP address).
    states: Arc<RwLock<HashMap<String, WindowState>>>,
}

impl Default for ApiRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiRateLimiter {
    /// Create a new rate limiter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            states: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Check if a request is allowed and record it.
    pub async fn check(&self, key: &str, config: &RateLimitConfig) -> RateLimitResult {
        let mut states = self.states.write().await;
        let now = Instant::now();
        let window = Duration::from_secs(config.window_secs);

        let state = states.entry(key.to_string()).or_insert_with(WindowState::new);

        if now.duration_since(state.window_start) >= window {
            state.count = 0;
            state.window_start = now;
        }

        if state.count >= config.max_requests {
            let retry_after = window
                .saturating_sub(now.duration_since(state.window_start))
                .as_secs();
            return RateLimitResult::Limited { retry_after };
        }

        state.count += 1;
        RateLimitResult::Allowed {
            remaining: config.max_requests.saturating_sub(state.count),
            limit: config.max_requests,
            reset: window
                .saturating_sub(now.duration_since(state.window_start))
                .as_secs(),
        }
    }

    /// Clean up expired entries.
    pub async fn cleanup(&self, max_window_secs: u64) {
        let mut states = self.states.write().await;
        let now = Instant::now();
        let max_window = Duration::from_secs(max_window_secs * 2);

        states.retain(|_, state| now.duration_since(state.window_start) < max_window);
    }

    /// Number of tracked keys.
    pub async fn key_count(&self) -> usize {
        self.states.read().await.len()
    }
}

/// Rate limit check result.
#[derive(Debug, Clone)]
pub enum RateLimitResult {
    /// Request is allowed.
    Allowed {
        /// Remaining requests in window.
        remaining: u32,
        /// Total limit.
        limit: u32,
        /// Seconds until window reset.
        reset: u64,
    },
    /// Request is rate limited.
    Limited {
        /// Seconds until the limit resets.
        retry_after: u64,
    },
}

/// Rate limiter state for middleware.
#[derive(Clone, Default)]
pub struct RateLimiterState {
    /// Per-user rate limiter.
    pub user_limiter: ApiRateLimiter,
    /// Per-IP rate limiter (unauthenticated requests).
    pub ip_limiter: ApiRateLimiter,
}

impl RateLimiterState {
    /// Create a new rate limiter state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop state for keys whose window has long expired. Called from a
    /// periodic task; without it the key maps grow until restart.
    pub async fn cleanup(&self) {
        self.user_limiter.cleanup(limits::STANDARD.window_secs).await;
        self.ip_limiter.cleanup(limits::STANDARD.window_secs).await;
    }
}

/// Rate limit error response.
#[derive(Debug)]
pub struct RateLimitError {
    pub retry_after: u64,
}

impl IntoResponse for RateLimitError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": {
                "code": "RATE_LIMITED",
                "message": "Too many requests",
                "retryAfter": self.retry_after
            }
        });

        (
            StatusCode::TOO_MANY_REQUESTS,
            [
                ("Retry-After", self.retry_after.to_string()),
                ("Content-Type", "application/json".to_string()),
            ],
            body.to_string(),
        )
            .into_response()
    }
}

/// Extract client IP from proxy headers.
fn extract_client_ip(req: &Request<Body>) -> Option<IpAddr> {
    if let Some(xff) = req.headers().get("x-forwarded-for")
        && let Ok(xff_str) = xff.to_str()
        && let Some(first_ip) = xff_str.split(',').next()
        && let Ok(ip) = first_ip.trim().parse::<IpAddr>()
    {
        return Some(ip);
    }

    if let Some(real_ip) = req.headers().get("x-real-ip")
        && let Ok(ip_str) = real_ip.to_str()
        && let Ok(ip) = ip_str.parse::<IpAddr>()
    {
        return Some(ip);
    }

    None
}

/// Rate limiting middleware.
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiterState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, RateLimitError> {
    rate_limit_with_config(limiter, req, next, "standard", &limits::STANDARD).await
}

/// Rate limiting middleware for write operations.
pub async fn rate_limit_write_middleware(
    State(limiter): State<RateLimiterState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, RateLimitError> {
    rate_limit_with_config(limiter, req, next, "write", &limits::WRITE).await
}

/// Rate limiting middleware for heavy operations.
pub async fn rate_limit_heavy_middleware(
    State(limiter): State<RateLimiterState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, RateLimitError> {
    rate_limit_with_config(limiter, req, next, "heavy", &limits::HEAVY).await
}

async fn rate_limit_with_config(
    limiter: RateLimiterState,
    req: Request<Body>,
    next: Next,
    scope: &str,
    config: &RateLimitConfig,
) -> Result<Response, RateLimitError> {
    // Keyed by account when authenticated, client IP otherwise. The scope
    // keeps each tier's window separate for the same caller.
    let result = if let Some(user) = req.extensions().get::<salonkit_db::entities::user::Model>() {
        let key = format!("{scope}:user:{}", user.id);
        limiter.user_limiter.check(&key, config).await
    } else {
        let key = match extract_client_ip(&req) {
            Some(ip) => format!("{scope}:ip:{ip}"),
            None => format!("{scope}:unknown"),
        };
        limiter.ip_limiter.check(&key, config).await
    };

    match result {
        RateLimitResult::Allowed {
            remaining,
            limit,
            reset,
        } => {
            let mut response = next.run(req).await;

            let headers = response.headers_mut();
            headers.insert("X-RateLimit-Limit", limit.into());
            headers.insert("X-RateLimit-Remaining", remaining.into());
            headers.insert("X-RateLimit-Reset", reset.into());

            Ok(response)
        }
        RateLimitResult::Limited { retry_after } => Err(RateLimitError { retry_after }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_allows_under_limit() {
        let limiter = ApiRateLimiter::new();
        let config = RateLimitConfig::new(3, 60);

        for _ in 0..3 {
            assert!(matches!(
                limiter.check("user:u1", &config).await,
                RateLimitResult::Allowed { .. }
            ));
        }
    }

    #[tokio::test]
    async fn test_limits_over_limit() {
        let limiter = ApiRateLimiter::new();
        let config = RateLimitConfig::new(2, 60);

        limiter.check("user:u1", &config).await;
        limiter.check("user:u1", &config).await;

        assert!(matches!(
            limiter.check("user:u1", &config).await,
            RateLimitResult::Limited { .. }
        ));
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let limiter = ApiRateLimiter::new();
        let config = RateLimitConfig::new(1, 60);

        limiter.check("user:u1", &config).await;

        assert!(matches!(
            limiter.check("user:u2", &config).await,
            RateLimitResult::Allowed { .. }
        ));
        assert_eq!(limiter.key_count().await, 2);
    }

    #[tokio::test]
    async fn test_cleanup_drops_stale_keys() {
        let limiter = ApiRateLimiter::new();
        let config = RateLimitConfig::new(5, 0);

        limiter.check("ip:10.0.0.1", &config).await;
        limiter.cleanup(0).await;

        assert_eq!(limiter.key_count().await, 0);
    }

    #[tokio::test]
    async fn test_state_cleanup_keeps_live_keys() {
        let state = RateLimiterState::new();

        state.user_limiter.check("user:u1", &limits::STANDARD).await;
        state.ip_limiter.check("ip:10.0.0.1", &limits::STANDARD).await;
        state.cleanup().await;

        assert_eq!(state.user_limiter.key_count().await, 1);
        assert_eq!(state.ip_limiter.key_count().await, 1);
    }
}
