use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use axum::extract::{ConnectInfo, MatchedPath, Request, State};
use axum::http::{header, HeaderMap, HeaderValue, Method};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use governor::clock::Clock;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};

use crate::api::rest::error::RATE_LIMITED;
use crate::config::RateLimitConfig;

/// (method, matched route, client)
type RateLimitKey = (Method, String, String);

/// Idle buckets are dropped once every this many checks.
const PRUNE_EVERY: u64 = 1024;

/// Keyed token bucket shared by every contact route.
#[derive(Clone)]
pub struct RouteRateLimiter {
    limiter: Arc<DefaultKeyedRateLimiter<RateLimitKey>>,
    checks: Arc<AtomicU64>,
}

impl RouteRateLimiter {
    /// # Errors
    /// Returns an error if `requests` or `per_seconds` is zero.
    pub fn from_config(cfg: &RateLimitConfig) -> Result<Self> {
        let requests =
            NonZeroU32::new(cfg.requests).with_context(|| anyhow!("rate_limit.requests is zero"))?;
        if cfg.per_seconds == 0 {
            return Err(anyhow!("rate_limit.per_seconds is zero"));
        }
        let replenish = Duration::from_secs(cfg.per_seconds) / requests.get();
        let quota = Quota::with_period(replenish)
            .with_context(|| anyhow!("rate_limit period is too short"))?
            .allow_burst(requests);

        Ok(Self {
            limiter: Arc::new(RateLimiter::keyed(quota)),
            checks: Arc::new(AtomicU64::new(0)),
        })
    }

    /// `Err(wait)` when the key is over quota.
    fn check(&self, key: &RateLimitKey) -> Result<(), Duration> {
        if (self.checks.fetch_add(1, Ordering::Relaxed) + 1) % PRUNE_EVERY == 0 {
            self.prune();
        }
        self.limiter
            .check_key(key)
            .map_err(|not_until| not_until.wait_time_from(self.limiter.clock().now()))
    }

    /// Forget keys whose bucket has fully refilled.
    fn prune(&self) {
        let before = self.limiter.len();
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
        tracing::debug!(before, after = self.limiter.len(), "Pruned rate limit buckets");
    }
}

fn client_key(req: &Request) -> String {
    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }
    forwarded_for(req.headers()).unwrap_or_else(|| "unknown".to_owned())
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

fn retry_after_secs(wait: Duration) -> u64 {
    wait.as_secs() + u64::from(wait.subsec_nanos() > 0)
}

pub async fn rate_limit_middleware(
    State(limiter): State<RouteRateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| req.uri().path().to_owned(), |p| p.as_str().to_owned());
    let key = (req.method().clone(), path, client_key(&req));

    if let Err(wait) = limiter.check(&key) {
        let secs = retry_after_secs(wait);
        tracing::warn!(method = %key.0, route = %key.1, client = %key.2, retry_after = secs, "Rate limit exceeded");
        let mut resp = RATE_LIMITED
            .to_response(
                format!("Rate limit exceeded, retry in {secs} seconds"),
                req.uri().path(),
            )
            .into_response();
        resp.headers_mut()
            .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        return resp;
    }

    next.run(req).await
}
