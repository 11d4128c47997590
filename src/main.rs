use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use reserva::config::AppConfig;
use reserva::error::AppError;
use reserva::marketplace::reservations::pricing::{price_booking, validated_nights};
use reserva::marketplace::reservations::{
    reservation_router, AdmissionService, AdmissionSettings, BookingShape, ChannelActivityLog,
    CommercialMode, PricingModel, Resource, ResourceId, StaticTaxonomy, UserAccount, UserId,
};
use reserva::marketplace::reservations::memory::{
    MemoryFeatureService, MemoryIdentityProvider, MemoryReservationStore, MemoryResourceStore,
};
use reserva::telemetry;
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct OpsState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Reserva",
    about = "Run the reservation admission engine or price a booking from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Price a hypothetical date-range booking without touching any store
    Quote(QuoteArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
    /// Seed a demo resource and verified guest for local exploration
    #[arg(long)]
    demo: bool,
}

#[derive(Args, Debug)]
struct QuoteArgs {
    /// Listed price of the resource
    #[arg(long)]
    price: Decimal,
    /// Pricing model: per_night, per_day, or fixed
    #[arg(long, default_value = "per_night", value_parser = parse_pricing_model)]
    pricing_model: PricingModel,
    /// Settlement currency
    #[arg(long, default_value = "USD")]
    currency: String,
    /// Check-in date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    check_in: NaiveDate,
    /// Check-out date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    check_out: NaiveDate,
    /// Additional fees charged to the guest
    #[arg(long)]
    fees: Option<Decimal>,
    /// Tax charged to the guest
    #[arg(long)]
    tax: Option<Decimal>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Quote(args) => run_quote(args),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn parse_pricing_model(raw: &str) -> Result<PricingModel, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "per_night" => Ok(PricingModel::PerNight),
        "per_day" => Ok(PricingModel::PerDay),
        "fixed" | "total" => Ok(PricingModel::Fixed),
        other => Err(format!(
            "unknown pricing model '{other}' (expected per_night, per_day, or fixed)"
        )),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let ops_state = OpsState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let resources = Arc::new(MemoryResourceStore::default());
    let reservations = Arc::new(MemoryReservationStore::default());
    let identity = Arc::new(MemoryIdentityProvider::default());
    let features = Arc::new(MemoryFeatureService::default());

    if args.demo {
        seed_demo(&resources, &identity);
    }

    let (activity, activity_rx) = ChannelActivityLog::with_capacity(256);
    ChannelActivityLog::spawn_tracing_drain(activity_rx);

    let settings = AdmissionSettings {
        hold_minutes: config.admission.hold_minutes,
        ..AdmissionSettings::default()
    };
    let service = Arc::new(AdmissionService::new(
        resources,
        reservations,
        identity,
        features,
        Arc::new(StaticTaxonomy),
        Arc::new(activity),
        settings,
    ));

    let ops = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(ops_state);

    let app = reservation_router(service)
        .merge(ops)
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "reservation admission engine ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn seed_demo(resources: &MemoryResourceStore, identity: &MemoryIdentityProvider) {
    resources.insert(Resource {
        id: ResourceId("demo-cabin".to_string()),
        owner_id: Some(UserId("demo-owner".to_string())),
        enabled: true,
        published: true,
        price: Decimal::from_str("180.00").expect("valid demo price"),
        pricing_model: PricingModel::PerNight,
        currency: "USD".to_string(),
        max_guests: 4,
        slot_buffer_minutes: 0,
        manual_contact_only: false,
        commercial_mode: CommercialMode::ShortTermRent,
        reservation_count: 0,
    });
    identity.insert(
        UserId("demo-guest".to_string()),
        UserAccount {
            email: Some("guest@example.com".to_string()),
            email_verified: true,
            name: Some("Demo Guest".to_string()),
            phone: None,
        },
    );
    info!("seeded demo resource 'demo-cabin' and guest 'demo-guest'");
}

fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let shape = BookingShape::DateRange {
        check_in: args.check_in,
        check_out: args.check_out,
    };
    let resource = Resource {
        id: ResourceId("quote".to_string()),
        owner_id: None,
        enabled: true,
        published: true,
        price: args.price,
        pricing_model: args.pricing_model,
        currency: args.currency.clone(),
        max_guests: u32::MAX,
        slot_buffer_minutes: 0,
        manual_contact_only: false,
        commercial_mode: CommercialMode::ShortTermRent,
        reservation_count: 0,
    };

    let nights = validated_nights(&shape)?;
    let quote = price_booking(&resource, &shape, nights, args.fees, args.tax, None)?;

    println!("Booking quote");
    println!(
        "Stay: {} -> {} ({} night(s), {})",
        args.check_in,
        args.check_out,
        quote.nights,
        args.pricing_model.label()
    );
    println!("Unit amount: {} {}", quote.unit_amount, quote.currency);
    println!("Base amount: {} {}", quote.base_amount, quote.currency);
    println!("Fees:        {} {}", quote.fees_amount, quote.currency);
    println!("Tax:         {} {}", quote.tax_amount, quote.currency);
    println!("Total:       {} {}", quote.total_amount, quote.currency);

    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<OpsState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<OpsState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
