use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

/// Process-wide chat counters. Every update is mirrored to the `metrics`
/// facade so an installed recorder sees the same numbers.
#[derive(Debug, Default)]
pub struct AppMetrics {
    chat_requests_total: AtomicU64,
    remote_replies_total: AtomicU64,
    fallback_replies_total: AtomicU64,
    error_replies_total: AtomicU64,
    total_latency_millis: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub chat_requests_total: u64,
    pub remote_replies_total: u64,
    pub fallback_replies_total: u64,
    pub error_replies_total: u64,
    pub avg_latency_millis: f64,
}

impl AppMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_request(&self) {
        self.chat_requests_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("raahi_chat_requests_total").increment(1);
    }

    pub fn inc_remote(&self) {
        self.remote_replies_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("raahi_chat_replies_total", "mode" => "remote").increment(1);
    }

    pub fn inc_fallback(&self, reason: &'static str) {
        self.fallback_replies_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!(
            "raahi_chat_replies_total",
            "mode" => "fallback",
            "reason" => reason
        )
        .increment(1);
    }

    pub fn inc_error(&self) {
        self.error_replies_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("raahi_chat_replies_total", "mode" => "error").increment(1);
    }

    pub fn observe_latency(&self, duration: Duration) {
        let millis = duration.as_millis() as u64;
        self.total_latency_millis
            .fetch_add(millis, Ordering::Relaxed);
        metrics::histogram!("raahi_chat_latency_millis").record(millis as f64);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let requests = self.chat_requests_total.load(Ordering::Relaxed);
        let latency = self.total_latency_millis.load(Ordering::Relaxed);

        MetricsSnapshot {
            chat_requests_total: requests,
            remote_replies_total: self.remote_replies_total.load(Ordering::Relaxed),
            fallback_replies_total: self.fallback_replies_total.load(Ordering::Relaxed),
            error_replies_total: self.error_replies_total.load(Ordering::Relaxed),
            avg_latency_millis: if requests == 0 {
                0.0
            } else {
                latency as f64 / requests as f64
            },
        }
    }
}

/// Installs the JSON subscriber once; later calls are no-ops. `RUST_LOG`
/// overrides the default filter.
pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,raahi_api=info,raahi_agents=info,tower_http=info",
                service_name.replace('-', "_")
            ))
        });

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .init();
    });
}
