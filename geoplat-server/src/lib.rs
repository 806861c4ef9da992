use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use axum_prometheus::PrometheusMetricLayer;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod data;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

use models::{
    CityInfo, ClickAnalysis, ClickRequest, ClickResponse, ErrorResponse, LocationAggregate,
    PopularCity, Recommendation, RecommendationBasis, StateInfo, TrendPoint, VpnServer,
    VpnSuggestion,
};
use services::{
    clicks::ClickTracker,
    ibge::IbgeClient,
    resolver::LocationResolver,
    trends::{HttpInterestSource, InterestSource, TrendFetcher},
};

pub struct AppState {
    pub settings: config::Settings,
    pub http: reqwest::Client,
    pub resolver: LocationResolver,
    pub ibge: IbgeClient,
    pub trends: TrendFetcher,
    pub clicks: Arc<ClickTracker>,
}

impl AppState {
    pub fn new(settings: config::Settings) -> anyhow::Result<Self> {
        let http = services::http_client(&settings.upstream).context("Failed to build HTTP client")?;

        let trends_url = settings.upstream.trends_url.trim();
        let source: Option<Arc<dyn InterestSource>> = if trends_url.is_empty() {
            tracing::info!("No trend source configured, interest data will be synthetic");
            None
        } else {
            Some(Arc::new(HttpInterestSource::new(http.clone(), trends_url)))
        };

        Ok(Self {
            resolver: LocationResolver::brazil()?,
            ibge: IbgeClient::new(http.clone(), &settings.upstream.ibge_url),
            trends: TrendFetcher::new(source, settings.demo.enabled),
            clicks: Arc::new(ClickTracker::in_memory(&settings.demo)),
            http,
            settings,
        })
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::geo::get_states,
        handlers::geo::get_cities,
        handlers::geo::get_vpn_ip,
        handlers::geo::get_vpn_servers,
        handlers::trends::get_trends,
        handlers::trends::get_most_popular_city,
        handlers::clicks::record_click,
        handlers::clicks::get_click_analysis,
        handlers::clicks::get_recommendation,
    ),
    components(
        schemas(
            StateInfo,
            CityInfo,
            VpnServer,
            VpnSuggestion,
            TrendPoint,
            PopularCity,
            ClickRequest,
            ClickResponse,
            LocationAggregate,
            ClickAnalysis,
            Recommendation,
            RecommendationBasis,
            ErrorResponse,
        )
    ),
    tags(
        (name = "geoplat", description = "Platform analysis by location")
    )
)]
struct ApiDoc;

fn init_tracing(settings: &config::ServerSettings) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("geoplat_server={},tower_http=info", settings.log_level).into()
    });
    let registry = tracing_subscriber::registry().with(filter);

    if settings.log_format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = config::Settings::new().context("Failed to load configuration")?;
    init_tracing(&settings.server);

    let state = Arc::new(AppState::new(settings.clone())?);

    if !settings.keepalive.url.is_empty() {
        tracing::info!(
            "Keep-alive ping to {} every {}s",
            settings.keepalive.url,
            settings.keepalive.interval_secs
        );
        services::keepalive::spawn(
            state.http.clone(),
            settings.keepalive.url.clone(),
            Duration::from_secs(settings.keepalive.interval_secs),
        );
    }

    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(settings.server.rate_limit_per_second)
            .burst_size(settings.server.rate_limit_burst)
            .finish()
            .context("Invalid rate limit configuration")?,
    );

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health_check))
        .route(
            "/metrics",
            get(move || {
                let handle = metric_handle.clone();
                async move { handle.render() }
            }),
        )
        .nest("/api", api_routes())
        .layer(prometheus_layer)
        .layer(GovernorLayer {
            config: governor_config,
        })
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri().path(),
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: Duration,
                     _span: &tracing::Span| {
                        tracing::info!(
                            status = %response.status(),
                            latency = ?latency,
                            "finished processing request"
                        )
                    },
                ),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            settings.server.request_timeout_secs,
        )))
        .with_state(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("geoplat server listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/states", get(handlers::geo::get_states))
        .route("/cities/:state_code", get(handlers::geo::get_cities))
        .route(
            "/vpn-ip/:state_code/:city_name",
            get(handlers::geo::get_vpn_ip),
        )
        .route("/vpn-servers", get(handlers::geo::get_vpn_servers))
        .route("/trends/:keyword", get(handlers::trends::get_trends))
        .route(
            "/most-popular-city/:keyword/:state_code",
            get(handlers::trends::get_most_popular_city),
        )
        .route("/clicks", post(handlers::clicks::record_click))
        .route(
            "/click-analysis/:platform",
            get(handlers::clicks::get_click_analysis),
        )
        .route(
            "/recommendation/:platform",
            get(handlers::clicks::get_recommendation),
        )
}

async fn health_check() -> &'static str {
    "OK"
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down gracefully...");
}
