use prometheus_client::{
    metrics::{
        counter::Counter,
        family::Family,
        histogram::{Histogram, exponential_buckets},
    },
    registry::Registry,
};
use prometheus_client_derive_encode::{EncodeLabelSet, EncodeLabelValue};

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, EncodeLabelValue)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, EncodeLabelValue)]
pub enum Status {
    Success,
    Error,
}

#[derive(Debug, Clone, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct MethodLabels {
    pub method: Method,
    pub status: Status,
}

/// Request counters and latency histograms shared by every service.
///
/// Cloning shares the underlying series.
#[derive(Debug, Clone)]
pub struct Metrics {
    pub requests: Family<MethodLabels, Counter>,
    pub request_duration: Family<MethodLabels, Histogram>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            requests: Family::default(),
            request_duration: Family::new_with_constructor(|| {
                Histogram::new(exponential_buckets(0.005, 2.0, 12))
            }),
        }
    }

    pub fn register(&self, registry: &mut Registry) {
        registry.register(
            "oneday_requests",
            "Total number of service operations",
            self.requests.clone(),
        );
        registry.register(
            "oneday_request_duration_seconds",
            "Service operation latency in seconds",
            self.request_duration.clone(),
        );
    }

    pub fn record(&self, method: Method, status: Status, elapsed: f64) {
        let labels = MethodLabels { method, status };
        self.requests.get_or_create(&labels).inc();
        self.request_duration
            .get_or_create(&labels)
            .observe(elapsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus_client::encoding::text::encode;

    #[test]
    fn recorded_operations_show_up_in_registry() {
        let metrics = Metrics::new();
        let mut registry = Registry::default();
        metrics.register(&mut registry);

        metrics.record(Method::Post, Status::Success, 0.02);
        metrics.record(Method::Post, Status::Success, 0.03);
        metrics.record(Method::Get, Status::Error, 0.01);

        let labels = MethodLabels {
            method: Method::Post,
            status: Status::Success,
        };
        assert_eq!(metrics.requests.get_or_create(&labels).get(), 2);

        let mut buffer = String::new();
        encode(&mut buffer, &registry).unwrap();
        assert!(buffer.contains("oneday_requests_total"));
        assert!(buffer.contains("method=\"Post\""));
    }
}
