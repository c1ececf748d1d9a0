use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use zodiac_match::config::{LoggingSettings, ScoringBackendKind, Settings};
use zodiac_match::core::{AffinityMatcher, WeightedScoringModel};
use zodiac_match::models::ScoringWeights;
use zodiac_match::pipeline::SubmissionPipeline;
use zodiac_match::routes::{self, AppState};
use zodiac_match::services::{HttpScoringModel, MatchSession, RecordStore, ScoringBackend};

/// JSON error response for payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle urlencoded form errors
fn handle_form_payload_error(err: error::UrlencodedError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("Form payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_form".to_string(),
        message: format!("Invalid form: {}", err),
        status_code: 400,
    }
    .into()
}

fn init_logging(logging: &LoggingSettings) {
    // RUST_LOG takes precedence over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.is_pretty() {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

fn build_scoring_backend(settings: &Settings) -> std::io::Result<ScoringBackend> {
    let scoring = &settings.scoring;

    match scoring.backend {
        ScoringBackendKind::Weighted => {
            let model = WeightedScoringModel::new(ScoringWeights::from(&scoring.weights));
            info!("Using weighted scoring model: {:?}", model.weights());
            Ok(ScoringBackend::Weighted(model))
        }
        ScoringBackendKind::Remote => {
            let endpoint = scoring.endpoint.clone().ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "scoring.endpoint is required for the remote backend",
                )
            })?;
            let model = HttpScoringModel::new(endpoint, scoring.timeout_secs)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
            info!("Using remote scoring model at {}", model.endpoint());
            Ok(ScoringBackend::Remote(model))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            init_logging(&LoggingSettings::default());
            error!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_logging(&settings.logging);

    info!("Starting Zodiac Match service...");
    info!("Configuration loaded successfully");

    let store = RecordStore::connect(
        &settings.database.url,
        settings.database.max_connections.unwrap_or(5),
        settings.database.acquire_timeout_secs.unwrap_or(5),
    )
    .await
    .map_err(|e| {
        error!("Failed to open record store: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    let backend = build_scoring_backend(&settings)?;

    let matcher = AffinityMatcher::new(settings.matching.self_match);
    info!("Matcher initialized with self-match policy: {:?}", matcher.policy());

    let session = MatchSession::new(settings.session.max_entries, settings.session.ttl_secs);

    let app_state = AppState {
        pipeline: Arc::new(SubmissionPipeline::new(store, backend, matcher, session)),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::FormConfig::default().error_handler(handle_form_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
