//! Observability wiring.
//!
//! Every crate in the workspace emits `tracing` spans and events; this module
//! installs the one subscriber they flow into: an `EnvFilter`, a text or JSON
//! formatter, and an OpenTelemetry OTLP exporter when an endpoint is set.

use anyhow::{Context, Result};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::TracerProvider;
use opentelemetry_sdk::{runtime, Resource};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer, Registry};

use crate::config::LogFormat;

const SERVICE_NAME: &str = "issue-workflow";

/// Keeps the exporter alive; flushes pending spans on drop.
pub struct TelemetryGuard {
    provider: Option<TracerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take() {
            if let Err(e) = provider.shutdown() {
                eprintln!("failed to flush traces: {e}");
            }
        }
    }
}

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "info,tower_http=debug";

/// Enables the dispatcher's verified-payload lines.
const PAYLOAD_DIRECTIVE: &str = "listener::dispatch=debug";

fn env_filter(debug_payloads: bool) -> Result<EnvFilter> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    if !debug_payloads {
        return Ok(filter);
    }
    let directive = PAYLOAD_DIRECTIVE
        .parse::<Directive>()
        .context("parsing payload log directive")?;
    Ok(filter.add_directive(directive))
}

fn otlp_provider(endpoint: &str) -> Result<TracerProvider> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .context("building OTLP span exporter")?;
    Ok(TracerProvider::builder()
        .with_batch_exporter(exporter, runtime::Tokio)
        .with_resource(Resource::new(vec![KeyValue::new(
            "service.name",
            SERVICE_NAME,
        )]))
        .build())
}

/// Installs the global subscriber. Must be called from within the tokio
/// runtime when `otlp_endpoint` is set. `debug_payloads` turns on payload
/// logging whatever `RUST_LOG` says.
pub fn init(
    format: LogFormat,
    otlp_endpoint: Option<&str>,
    debug_payloads: bool,
) -> Result<TelemetryGuard> {
    let provider = otlp_endpoint.map(otlp_provider).transpose()?;
    let otel_layer = provider.as_ref().map(|provider| {
        tracing_opentelemetry::layer().with_tracer(provider.tracer(SERVICE_NAME))
    });

    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = match format {
        LogFormat::Json => fmt::layer().json().with_current_span(true).boxed(),
        LogFormat::Text => fmt::layer().boxed(),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(otel_layer)
        .with(env_filter(debug_payloads)?)
        .try_init()
        .context("installing tracing subscriber")?;

    Ok(TelemetryGuard { provider })
}

#[cfg(test)]
#[path = "telemetry_tests.rs"]
mod tests;
