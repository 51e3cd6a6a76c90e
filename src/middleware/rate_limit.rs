//! Rate limiting middleware
//!
//! Per-client token bucket keyed by the peer IP address. Requests over the
//! quota are answered with 429 before reaching any handler. A background task
//! drops the buckets of clients that have gone quiet.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::{Arc, Weak};
use std::time::Duration;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use governor::clock::DefaultClock;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::RateLimitConfig;
use crate::utils::errors::ColectaError;

type KeyedLimiter = RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>;

/// How often idle client buckets are dropped
pub const CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Shared limiter state, cheap to clone into the router
#[derive(Clone)]
pub struct RateLimitMiddleware {
    limiter: Option<Arc<KeyedLimiter>>,
}

impl RateLimitMiddleware {
    /// Create a limiter from configuration; disabled configs let everything through
    pub fn new(config: &RateLimitConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }

        let per_minute = NonZeroU32::new(config.requests_per_minute).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(config.burst).unwrap_or(per_minute);
        let quota = Quota::per_minute(per_minute).allow_burst(burst);

        Self {
            limiter: Some(Arc::new(RateLimiter::keyed(quota))),
        }
    }

    pub fn disabled() -> Self {
        Self { limiter: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.limiter.is_some()
    }

    /// Check and consume one request for `client`
    pub fn check_rate_limit(&self, client: IpAddr) -> Result<(), ColectaError> {
        let Some(limiter) = &self.limiter else {
            return Ok(());
        };

        match limiter.check_key(&client) {
            Ok(()) => Ok(()),
            Err(_) => {
                warn!(client = %client, "Rate limit exceeded");
                Err(ColectaError::RateLimitExceeded)
            }
        }
    }

    /// Number of clients currently holding a bucket
    pub fn tracked_clients(&self) -> usize {
        self.limiter.as_ref().map_or(0, |limiter| limiter.len())
    }

    /// Drop buckets that are full again
    pub fn cleanup_old_entries(&self) {
        if let Some(limiter) = &self.limiter {
            cleanup(limiter);
        }
    }

    /// Run `cleanup_old_entries` every `period` until the last clone is dropped
    ///
    /// Returns `None` when limiting is disabled or no tokio runtime is running.
    pub fn start_cleanup(&self, period: Duration) -> Option<JoinHandle<()>> {
        let limiter = Arc::downgrade(self.limiter.as_ref()?);
        let runtime = tokio::runtime::Handle::try_current().ok()?;

        let handle = runtime.spawn(cleanup_loop(limiter, period));
        info!(interval = ?period, "Started rate limit cleanup task");
        Some(handle)
    }
}

fn cleanup(limiter: &KeyedLimiter) {
    limiter.retain_recent();
    limiter.shrink_to_fit();
    debug!(tracked_clients = limiter.len(), "Rate limit entries cleaned up");
}

async fn cleanup_loop(limiter: Weak<KeyedLimiter>, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    // the first tick completes immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let Some(limiter) = limiter.upgrade() else {
            debug!("Rate limiter dropped, stopping cleanup task");
            return;
        };
        cleanup(&limiter);
    }
}

fn client_ip(request: &Request) -> IpAddr {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

/// axum middleware function, installed with `from_fn_with_state`
pub async fn rate_limit(
    State(limiter): State<RateLimitMiddleware>,
    request: Request,
    next: Next,
) -> Response {
    match limiter.check_rate_limit(client_ip(&request)) {
        Ok(()) => next.run(request).await,
        Err(e) => e.into_response(),
    }
}
