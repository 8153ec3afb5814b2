//! `converse-gateway` binary: runs the gateway's websocket server standalone,
//! outside of the CLI's `serve` subcommand.
//!
//! Logs go to stdout only (`RUST_LOG` selects the filter). When
//! `OTEL_EXPORTER_OTLP_ENDPOINT` is set, spans are additionally exported over
//! OTLP; otherwise tracing stays on the stdout fmt layer alone.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(filter);

    let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
        .ok()
        .and_then(|endpoint| build_otel_layer(&endpoint).ok());

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(otel_layer)
        .init();
}

fn build_otel_layer(
    endpoint: &str,
) -> Result<
    tracing_opentelemetry::OpenTelemetryLayer<
        tracing_subscriber::Registry,
        opentelemetry_sdk::trace::Tracer,
    >,
    opentelemetry::trace::TraceError,
> {
    use opentelemetry::trace::TracerProvider;
    use opentelemetry_otlp::WithExportConfig;

    let service_name =
        std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| "converse-gateway".to_string());

    let provider = opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(
            opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(endpoint),
        )
        .with_trace_config(opentelemetry_sdk::trace::config().with_resource(
            opentelemetry_sdk::Resource::new(vec![opentelemetry::KeyValue::new(
                "service.name",
                service_name,
            )]),
        ))
        .install_batch(opentelemetry_sdk::runtime::Tokio)?;

    let tracer = provider.tracer("converse-gateway");
    Ok(tracing_opentelemetry::layer().with_tracer(tracer))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    config::load_and_apply("converse", None::<&std::path::Path>).ok();
    init_logging();

    let addr = std::env::var("CONVERSE_GATEWAY_ADDR").ok();
    if let Err(e) = gateway::run_serve(addr.as_deref(), false).await {
        tracing::error!(error = %e, "gateway exited with error");
        std::process::exit(1);
    }
    Ok(())
}
