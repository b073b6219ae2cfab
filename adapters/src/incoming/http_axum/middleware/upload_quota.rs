use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use axum::{
    extract::Request,
    http::{HeaderValue, header::RETRY_AFTER},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use tokio::time::Instant;
use tracing::warn;

use crate::incoming::http_axum::{core::extractors::caller_id_hint, error_mapper::HttpError};
use domain::auth::UserId;
use photo_revive_application::{error::AppError, infrastructure_config::UploadQuotaConfig};

/// Idle callers are dropped from the map once every this many checks.
const SWEEP_EVERY: u64 = 1024;

#[derive(Debug, PartialEq, Eq)]
pub enum QuotaDecision {
    Allowed { remaining: u32 },
    Denied { retry_after: Duration },
}

/// Rolling-window upload counter per caller. Every upload attempt that names a
/// valid caller counts, whatever the outcome of the upload itself.
#[derive(Debug)]
pub struct UploadQuota {
    started: DashMap<UserId, VecDeque<Instant>>,
    max_uploads: u32,
    window: Duration,
    checks: AtomicU64,
}

impl UploadQuota {
    pub fn new(max_uploads: u32, window: Duration) -> Self {
        Self {
            started: DashMap::new(),
            max_uploads,
            window,
            checks: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &UploadQuotaConfig) -> Arc<Self> {
        Arc::new(Self::new(
            config.max_uploads,
            Duration::from_secs(config.window_secs),
        ))
    }

    pub fn check(&self, caller: &UserId, now: Instant) -> QuotaDecision {
        if self.checks.fetch_add(1, Ordering::Relaxed) % SWEEP_EVERY == SWEEP_EVERY - 1 {
            self.sweep(now);
        }

        let mut started = self.started.entry(caller.clone()).or_default();
        while started
            .front()
            .is_some_and(|at| now.saturating_duration_since(*at) >= self.window)
        {
            started.pop_front();
        }

        let used = u32::try_from(started.len()).unwrap_or(u32::MAX);
        if used < self.max_uploads {
            started.push_back(now);
            return QuotaDecision::Allowed {
                remaining: self.max_uploads - used - 1,
            };
        }

        let retry_after = started.front().map_or(self.window, |oldest| {
            self.window
                .saturating_sub(now.saturating_duration_since(*oldest))
        });
        QuotaDecision::Denied { retry_after }
    }

    fn sweep(&self, now: Instant) {
        self.started.retain(|_, started| {
            started
                .back()
                .is_some_and(|at| now.saturating_duration_since(*at) < self.window)
        });
    }

    pub fn tracked_callers(&self) -> usize {
        self.started.len()
    }
}

fn whole_seconds_ceil(duration: Duration) -> u64 {
    let secs = duration.as_secs() + u64::from(duration.subsec_nanos() > 0);
    secs.max(1)
}

/// Requests without a usable caller id pass through; the handler rejects them.
pub async fn upload_quota_middleware(
    quota: Arc<UploadQuota>,
    request: Request,
    next: Next,
) -> Response {
    let Some(caller) = caller_id_hint(request.headers()).and_then(|raw| UserId::parse(raw).ok())
    else {
        return next.run(request).await;
    };

    match quota.check(&caller, Instant::now()) {
        QuotaDecision::Allowed { .. } => next.run(request).await,
        QuotaDecision::Denied { retry_after } => {
            let retry_after_secs = whole_seconds_ceil(retry_after);
            warn!(user_id = %caller, retry_after_secs, "Upload quota exceeded");

            let mut response =
                HttpError(AppError::QuotaExceeded { retry_after_secs }).into_response();
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(retry_after_secs));
            response
        }
    }
}
