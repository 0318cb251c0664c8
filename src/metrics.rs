// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Prometheus metrics for the gateway routes.
//!
//! The recorder is owned by [`GatewayMetrics`] and injected through the
//! application state; nothing is installed globally, so independent
//! instances (one per test, for example) never share counters.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::{
    BuildError, Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder,
};

pub const REQUESTS_TOTAL: &str = "gateway_http_requests_total";
pub const REQUEST_ERRORS_TOTAL: &str = "gateway_http_request_errors_total";
pub const REQUEST_DURATION_SECONDS: &str = "gateway_http_request_duration_seconds";

const LATENCY_BUCKETS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Route label used when a request did not match any route.
const UNMATCHED_ROUTE: &str = "unmatched";

/// Process-wide request counters and latency histograms.
#[derive(Clone)]
pub struct GatewayMetrics {
    recorder: Arc<PrometheusRecorder>,
    handle: PrometheusHandle,
}

impl GatewayMetrics {
    pub fn new() -> Result<Self, BuildError> {
        let recorder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Full(REQUEST_DURATION_SECONDS.to_string()),
                &LATENCY_BUCKETS,
            )?
            .build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            describe_counter!(REQUESTS_TOTAL, "Total number of requests per route and method");
            describe_counter!(
                REQUEST_ERRORS_TOTAL,
                "Total number of requests per route that ended in an error"
            );
            describe_histogram!(
                REQUEST_DURATION_SECONDS,
                Unit::Seconds,
                "Request latency per route in seconds"
            );
        });

        Ok(Self {
            recorder: Arc::new(recorder),
            handle,
        })
    }

    pub fn record_request(&self, method: &str, route: &str) {
        self.with_recorder(|| {
            counter!(
                REQUESTS_TOTAL,
                "method" => method.to_string(),
                "route" => route.to_string()
            )
            .increment(1);
        });
    }

    pub fn record_error(&self, route: &str) {
        self.with_recorder(|| {
            counter!(REQUEST_ERRORS_TOTAL, "route" => route.to_string()).increment(1);
        });
    }

    pub fn record_latency(&self, route: &str, elapsed: Duration) {
        self.with_recorder(|| {
            histogram!(REQUEST_DURATION_SECONDS, "route" => route.to_string())
                .record(elapsed.as_secs_f64());
        });
    }

    /// Snapshot of every series in the Prometheus text exposition format.
    pub fn render(&self) -> String {
        self.handle.render()
    }

    /// Drain buffered histogram samples. Call periodically.
    pub fn run_upkeep(&self) {
        self.handle.run_upkeep();
    }

    fn with_recorder(&self, f: impl FnOnce()) {
        metrics::with_local_recorder(self.recorder.as_ref(), f);
    }
}

/// Middleware recording every routed request.
///
/// Counts the request before the inner service runs, counts an error when
/// the response is a 4xx/5xx, and observes the latency in all cases. The
/// response itself is passed through untouched.
pub async fn track_metrics(
    State(metrics): State<GatewayMetrics>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string());

    metrics.record_request(request.method().as_str(), &route);

    let response = next.run(request).await;

    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        metrics.record_error(&route);
    }
    metrics.record_latency(&route, start.elapsed());

    response
}
