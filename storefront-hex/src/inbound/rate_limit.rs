//! Rate limiting middleware using Governor.
//!
//! Implements per-client rate limiting with a token bucket algorithm.
//! Clients are identified by the first `X-Forwarded-For` hop.

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use serde_json::json;
use std::{
    num::NonZeroU32,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

/// Client key used when no forwarding header is present.
const ANONYMOUS: &str = "anonymous";

/// Checks between sweeps of clients whose buckets have fully refilled.
const PRUNE_EVERY: u64 = 1024;

/// Rate limiter state shared across requests.
pub struct RateLimiterState {
    /// One token bucket per client key
    limiter: DefaultKeyedRateLimiter<String>,
    /// Length of the quota window, reported back on 429
    period: Duration,
    checks: AtomicU64,
}

impl Default for RateLimiterState {
    fn default() -> Self {
        Self::new(100, Duration::from_secs(60))
    }
}

impl RateLimiterState {
    /// Creates a new rate limiter state.
    ///
    /// # Arguments
    /// * `requests` - Number of requests allowed per period (at least 1)
    /// * `period` - Time period for the quota
    pub fn new(requests: u32, period: Duration) -> Self {
        let burst = NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN);
        let replenish = period / burst.get();
        let quota = Quota::with_period(replenish)
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst);

        Self {
            limiter: RateLimiter::keyed(quota),
            period,
            checks: AtomicU64::new(0),
        }
    }

    /// Checks if a request should be rate limited.
    /// Returns true if the request is allowed, false if rate limited.
    pub fn check(&self, key: &str) -> bool {
        let allowed = self.limiter.check_key(&key.to_string()).is_ok();

        if self.checks.fetch_add(1, Ordering::Relaxed) % PRUNE_EVERY == PRUNE_EVERY - 1 {
            self.prune();
        }

        allowed
    }

    /// Drops clients whose buckets are full again; they behave as new clients.
    pub fn prune(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }

    pub fn retry_after_seconds(&self) -> u64 {
        self.period.as_secs().max(1)
    }
}

/// Extracts the client identifier from `X-Forwarded-For`.
fn client_key(request: &Request<Body>) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(ANONYMOUS)
        .to_string()
}

/// Rate limiting middleware.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiterState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    // Skip rate limiting for health endpoint
    if request.uri().path() == "/health" {
        return next.run(request).await;
    }

    let key = client_key(&request);

    if !limiter.check(&key) {
        tracing::warn!(client = %key, "rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "success": false,
                "message": "Too many requests. Please try again later.",
                "retry_after_seconds": limiter.retry_after_seconds()
            })),
        )
            .into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_then_reject() {
        let limiter = RateLimiterState::new(3, Duration::from_secs(60));

        assert!(limiter.check("10.0.0.1"));
        assert!(limiter.check("10.0.0.1"));
        assert!(limiter.check("10.0.0.1"));
        assert!(!limiter.check("10.0.0.1"));
    }

    #[test]
    fn test_clients_are_independent() {
        let limiter = RateLimiterState::new(1, Duration::from_secs(60));

        assert!(limiter.check("10.0.0.1"));
        assert!(limiter.check("10.0.0.2"));
        assert!(!limiter.check("10.0.0.1"));
    }

    #[test]
    fn test_prune_drops_refilled_clients() {
        let limiter = RateLimiterState::new(5, Duration::from_millis(50));
        for i in 0..20 {
            assert!(limiter.check(&format!("198.51.100.{i}")));
        }
        assert_eq!(limiter.tracked_clients(), 20);

        std::thread::sleep(Duration::from_millis(120));
        limiter.prune();

        assert_eq!(limiter.tracked_clients(), 0);
    }

    #[test]
    fn test_prune_keeps_limited_clients() {
        let limiter = RateLimiterState::new(1, Duration::from_secs(60));
        assert!(limiter.check("10.0.0.1"));

        limiter.prune();

        assert_eq!(limiter.tracked_clients(), 1);
        assert!(!limiter.check("10.0.0.1"));
    }

    #[test]
    fn test_zero_requests_allows_one() {
        let limiter = RateLimiterState::new(0, Duration::from_secs(60));

        assert!(limiter.check(ANONYMOUS));
        assert!(!limiter.check(ANONYMOUS));
    }

    #[test]
    fn test_client_key_uses_first_hop() {
        let request = Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(Body::empty())
            .unwrap();

        assert_eq!(client_key(&request), "203.0.113.7");
    }

    #[test]
    fn test_client_key_defaults_to_anonymous() {
        let request = Request::builder().body(Body::empty()).unwrap();

        assert_eq!(client_key(&request), ANONYMOUS);
    }
}
