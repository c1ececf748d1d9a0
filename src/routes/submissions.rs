use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::scoring::ScoringError;
use crate::core::zodiac;
use crate::models::{
    ErrorResponse, HealthResponse, MatchId, MatchResponse, SignResponse, SubmitRequest,
    SubmitResponse, ZodiacSign,
};
use crate::pipeline::{PipelineError, SubmissionPipeline};
use crate::services::ScoringBackend;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<SubmissionPipeline<ScoringBackend>>,
}

/// Configure all submission and match routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/submissions", web::post().to(submit))
        .route("/matches/latest", web::get().to(reveal_latest))
        .route("/matches/{match_id}", web::get().to(reveal))
        .route("/signs/{sign}", web::get().to(sign_details));
}

fn error_response(status_code: u16, error: &str, message: String) -> HttpResponse {
    let body = ErrorResponse {
        error: error.to_string(),
        message,
        status_code,
    };

    match status_code {
        400 => HttpResponse::BadRequest().json(body),
        404 => HttpResponse::NotFound().json(body),
        422 => HttpResponse::UnprocessableEntity().json(body),
        502 => HttpResponse::BadGateway().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

fn pipeline_error_response(err: &PipelineError) -> HttpResponse {
    match err {
        PipelineError::InvalidDate(_) => error_response(400, "Invalid date", err.to_string()),
        PipelineError::Scoring(
            ScoringError::InvalidField { .. }
            | ScoringError::NonFinite(_)
            | ScoringError::Upstream { status: 400..=499, .. },
        ) => error_response(422, "Questionnaire rejected", err.to_string()),
        PipelineError::Scoring(_) => error_response(502, "Scoring failed", err.to_string()),
        PipelineError::NoCandidates(_) | PipelineError::NoMatchAvailable(_) => {
            error_response(404, "No match available", err.to_string())
        }
        PipelineError::IncompleteSubmission(_) | PipelineError::Store(_) => {
            tracing::error!("Submission pipeline failure: {}", err);
            error_response(500, "Internal error", err.to_string())
        }
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store = state.pipeline.store();
    let healthy = store.health_check().await.unwrap_or(false);
    let submissions = if healthy { store.count().await.ok() } else { None };

    let sessions = state.pipeline.session().entry_count().await;
    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        submissions,
        sessions,
    })
}

/// Submit a questionnaire
///
/// POST /api/v1/submissions
///
/// Accepts JSON or an urlencoded form:
/// ```json
/// {
///   "Name": "string", "Phone": "string", "Insta": "string",
///   "month": 11, "day": 25,
///   "sex": "F", "sexorient": "S", "degree": "5", "sociability": "3", "acqmark": "1"
/// }
/// ```
///
/// Responds with the derived sign and the token used to reveal the match.
async fn submit(
    state: web::Data<AppState>,
    body: web::Either<web::Json<SubmitRequest>, web::Form<SubmitRequest>>,
) -> impl Responder {
    let req = match body {
        web::Either::Left(json) => json.into_inner(),
        web::Either::Right(form) => form.into_inner(),
    };

    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for submission: field_errors={:?}", errors);
        return error_response(400, "Validation failed", errors.to_string());
    }

    let (identity, answers) = req.into_parts();
    tracing::debug!("Received submission from {}", identity.name);

    match state.pipeline.submit(identity, answers).await {
        Ok(outcome) => HttpResponse::Created().json(SubmitResponse {
            zodiac: outcome.zodiac,
            match_id: outcome.match_id,
        }),
        Err(e) => {
            tracing::info!("Submission rejected: {}", e);
            pipeline_error_response(&e)
        }
    }
}

/// Reveal the match computed for a submission
///
/// GET /api/v1/matches/{match_id}
async fn reveal(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let match_id: MatchId = match path.parse() {
        Ok(id) => id,
        Err(_) => {
            return error_response(400, "Invalid match id", format!("{:?} is not a match id", path.as_str()));
        }
    };

    match state.pipeline.reveal(&match_id).await {
        Ok(result) => HttpResponse::Ok().json(MatchResponse { result }),
        Err(e) => pipeline_error_response(&e),
    }
}

/// Reveal the most recent match, whoever submitted it
///
/// GET /api/v1/matches/latest
async fn reveal_latest(state: web::Data<AppState>) -> impl Responder {
    match state.pipeline.reveal_latest().await {
        Ok(result) => HttpResponse::Ok().json(MatchResponse { result }),
        Err(e) => pipeline_error_response(&e),
    }
}

/// Sign name and calendar interval
///
/// GET /api/v1/signs/{sign}
async fn sign_details(path: web::Path<String>) -> impl Responder {
    match path.parse::<ZodiacSign>() {
        Ok(sign) => HttpResponse::Ok().json(SignResponse {
            sign,
            range: zodiac::date_range(sign),
        }),
        Err(e) => error_response(404, "Unknown sign", e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::matcher::MatcherError;
    use crate::core::zodiac::ZodiacError;
    use actix_web::http::StatusCode;

    #[test]
    fn test_error_status_mapping() {
        let invalid_date = PipelineError::InvalidDate(ZodiacError::InvalidDate { month: 2, day: 30 });
        assert_eq!(pipeline_error_response(&invalid_date).status(), StatusCode::BAD_REQUEST);

        let no_candidates = PipelineError::NoCandidates(MatcherError::NoCandidates);
        assert_eq!(pipeline_error_response(&no_candidates).status(), StatusCode::NOT_FOUND);

        let rejected = PipelineError::Scoring(ScoringError::Upstream {
            status: 422,
            body: "bad shape".to_string(),
        });
        assert_eq!(
            pipeline_error_response(&rejected).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );

        let non_finite = PipelineError::Scoring(ScoringError::NonFinite(f64::NAN));
        assert_eq!(
            pipeline_error_response(&non_finite).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );

        let model_down = PipelineError::Scoring(ScoringError::Upstream {
            status: 503,
            body: String::new(),
        });
        assert_eq!(pipeline_error_response(&model_down).status(), StatusCode::BAD_GATEWAY);

        let unreachable = PipelineError::Scoring(ScoringError::Transport("connection refused".to_string()));
        assert_eq!(pipeline_error_response(&unreachable).status(), StatusCode::BAD_GATEWAY);

        let incomplete = PipelineError::IncompleteSubmission("affinity_score");
        assert_eq!(
            pipeline_error_response(&incomplete).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
