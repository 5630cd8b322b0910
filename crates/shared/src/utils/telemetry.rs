use crate::utils::metrics::{Method, Metrics, Status};
use opentelemetry::{
    Context, KeyValue,
    global::{self, BoxedTracer},
    trace::{Span, SpanKind, TraceContextExt, Tracer},
};
use tokio::time::Instant;
use tracing::{error, info};

pub struct TracingContext {
    pub cx: Context,
    pub start_time: Instant,
}

/// Span and metric bookkeeping for one service.
#[derive(Debug, Clone)]
pub struct Telemetry {
    tracer_name: &'static str,
    metrics: Metrics,
}

impl Telemetry {
    pub fn new(tracer_name: &'static str, metrics: Metrics) -> Self {
        Self {
            tracer_name,
            metrics,
        }
    }

    fn get_tracer(&self) -> BoxedTracer {
        global::tracer(self.tracer_name)
    }

    pub fn start_tracing(&self, operation_name: &str, attributes: Vec<KeyValue>) -> TracingContext {
        let start_time = Instant::now();
        let tracer = self.get_tracer();
        let mut span = tracer
            .span_builder(operation_name.to_string())
            .with_kind(SpanKind::Server)
            .with_attributes(attributes)
            .start(&tracer);

        info!("Starting operation: {operation_name}");

        span.add_event(
            "Operation started",
            vec![KeyValue::new("operation", operation_name.to_string())],
        );

        let cx = Context::current_with_span(span);
        TracingContext { cx, start_time }
    }

    pub fn complete_tracing_success(&self, ctx: &TracingContext, method: Method, message: &str) {
        self.complete_tracing_internal(ctx, method, true, message);
    }

    pub fn complete_tracing_error(&self, ctx: &TracingContext, method: Method, message: &str) {
        self.complete_tracing_internal(ctx, method, false, message);
    }

    fn complete_tracing_internal(
        &self,
        ctx: &TracingContext,
        method: Method,
        is_success: bool,
        message: &str,
    ) {
        let (status_str, status) = if is_success {
            ("SUCCESS", Status::Success)
        } else {
            ("ERROR", Status::Error)
        };
        let elapsed = ctx.start_time.elapsed().as_secs_f64();

        ctx.cx.span().add_event(
            "Operation completed",
            vec![
                KeyValue::new("status", status_str),
                KeyValue::new("duration_secs", elapsed.to_string()),
                KeyValue::new("message", message.to_string()),
            ],
        );

        if is_success {
            info!("Operation completed successfully: {message}");
        } else {
            error!("Operation failed: {message}");
        }

        self.metrics.record(method, status, elapsed);

        ctx.cx.span().end();
    }
}
