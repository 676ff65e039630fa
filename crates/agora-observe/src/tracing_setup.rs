//! Global tracing subscriber setup.
//!
//! One `fmt` layer for structured logs, and optionally an OpenTelemetry
//! bridge that exports spans to stdout. The CLI decides the default filter
//! from its verbosity flags; `RUST_LOG` overrides it when set.
//!
//! # Usage
//!
//! ```no_run
//! // Structured logging only
//! agora_observe::tracing_setup::init_tracing("warn", false).unwrap();
//!
//! // With span export for local development
//! agora_observe::tracing_setup::init_tracing("info,agora=debug", true).unwrap();
//! ```

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use std::sync::OnceLock;

/// Provider handle kept for the flush on exit.
static OTEL_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// Install the global subscriber.
///
/// `default_filter` applies when `RUST_LOG` is unset. With `enable_otel`,
/// spans also flow to an OpenTelemetry stdout exporter (swap in OTLP for a
/// real collector). Fails if a global subscriber is already installed.
pub fn init_tracing(
    default_filter: &str,
    enable_otel: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE);

    if enable_otel {
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .build();
        let otel_layer = tracing_opentelemetry::layer().with_tracer(provider.tracer("agora"));

        // Keep a handle for shutdown_tracing before handing the provider to
        // the global registry.
        let _ = OTEL_PROVIDER.set(provider.clone());
        opentelemetry::global::set_tracer_provider(provider);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .init();
    }

    Ok(())
}

/// Flush buffered spans and tear down the OTel provider.
///
/// No-op when `init_tracing` ran without OTel.
pub fn shutdown_tracing() {
    if let Some(provider) = OTEL_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            eprintln!("Warning: OTel provider shutdown failed: {e}");
        }
    }
}
