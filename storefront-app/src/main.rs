//! # Storefront Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the rate store adapter
//! - Create the currency and cart services
//! - Start the HTTP server

mod config;

use opentelemetry::global;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_hex::{CartService, CurrencyService, inbound::HttpServer};
use storefront_repo::build_repo;

/// Builds the OTLP tracer when `OTEL_EXPORTER_OTLP_ENDPOINT` is set.
fn init_tracer() -> anyhow::Result<Option<(sdktrace::Tracer, sdktrace::SdkTracerProvider)>> {
    if std::env::var_os("OTEL_EXPORTER_OTLP_ENDPOINT").is_none() {
        return Ok(None);
    }

    global::set_text_map_propagator(TraceContextPropagator::new());

    // Use gRPC exporter with batch processing (non-blocking)
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok(Some((provider.tracer("storefront-service"), provider)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize OpenTelemetry tracing
    let otel = init_tracer()?;
    let (telemetry, otel_provider) = match otel {
        Some((tracer, provider)) => (
            Some(tracing_opentelemetry::layer().with_tracer(tracer)),
            Some(provider),
        ),
        None => (None, None),
    };

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,storefront_app=debug,storefront_hex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry)
        .init();

    // Load configuration
    let config = config::Config::from_env()?;

    tracing::info!("Starting storefront server on port {}", config.port);
    tracing::info!(
        base = %config.default_base_currency,
        tax_rate_bps = config.pricing.tax_rate_bps,
        rate_limit = config.rate_limit_per_minute,
        "pricing configuration loaded"
    );

    // Build repository (handles connection and migration)
    let repo = build_repo(&config.database_url).await?;

    let currency = CurrencyService::new(repo).with_default_base(&config.default_base_currency)?;
    let cart = CartService::new(config.pricing);

    // Create and run the HTTP server
    let server = HttpServer::with_rate_limit(currency, cart, config.rate_limit_per_minute);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    // Ensure traces are flushed before exit
    if let Some(provider) = otel_provider {
        let _ = provider.shutdown();
    }
    Ok(())
}
