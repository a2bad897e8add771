// Axum API Server Module
//
// Purpose: REST API over the flood predictor (scoring, feature mapping, safety guide)
// The predictor is built once at startup and shared read-only by all handlers.

#[cfg(feature = "api")]
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};

#[cfg(feature = "api")]
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};

#[cfg(feature = "api")]
use std::sync::Arc;

#[cfg(feature = "api")]
use crate::config::AppConfig;

#[cfg(feature = "api")]
use crate::error::FloodError;

#[cfg(feature = "api")]
use crate::features::map_inputs_to_features;

#[cfg(feature = "api")]
use crate::prediction::{FloodPredictor, Prediction};

#[cfg(feature = "api")]
use crate::readings::RawReadings;

/// Upper bound on readings per batch request
#[cfg(feature = "api")]
const MAX_BATCH: usize = 10_000;

// ============================================================================
// Application State
// ============================================================================

#[cfg(feature = "api")]
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<FloodPredictor>,
}

#[cfg(feature = "api")]
impl AppState {
    /// Build state from configuration (loads the model artifact if configured)
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        tracing::info!("Initializing flood predictor ({:?} scorer)...", config.scorer);
        let predictor = config.build_predictor()?;
        Ok(Self::from_predictor(predictor))
    }

    pub fn from_predictor(predictor: FloodPredictor) -> Self {
        Self {
            predictor: Arc::new(predictor),
        }
    }
}

// ============================================================================
// Router
// ============================================================================

#[cfg(feature = "api")]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Scoring endpoints
        .route("/api/predict", post(predict))
        .route("/api/predict/batch", post(predict_batch))
        .route("/api/features", post(mapped_features))

        // Safety guide endpoints
        // IMPORTANT: lookup route must come before any future :id route
        .route("/api/guidance/lookup", get(guidance_lookup))
        .route("/api/guidance", get(guidance_table))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new()) // gzip + brotli compression
        .layer(CorsLayer::permissive()) // Allow all origins (adjust for production)
        .layer(TraceLayer::new_for_http()) // Request logging
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

#[cfg(feature = "api")]
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "scorer": state.predictor.scorer().name(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

#[cfg(feature = "api")]
async fn predict(
    State(state): State<AppState>,
    Json(readings): Json<RawReadings>,
) -> Result<Json<Prediction>, AppError> {
    let prediction = state.predictor.predict(&readings)?;
    Ok(Json(prediction))
}

/// Request body for batch scoring
#[cfg(feature = "api")]
#[derive(Debug, serde::Deserialize)]
struct BatchRequest {
    readings: Vec<RawReadings>,
}

/// Score many readings; rows that fail carry an `error` instead of a prediction
#[cfg(feature = "api")]
async fn predict_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if request.readings.len() > MAX_BATCH {
        return Err(AppError::BadRequest(format!(
            "batch of {} readings exceeds limit of {}",
            request.readings.len(),
            MAX_BATCH
        )));
    }

    let start = std::time::Instant::now();
    let predictor = Arc::clone(&state.predictor);
    let readings = request.readings;

    // Rayon work stays off the async executor
    let results = tokio::task::spawn_blocking(move || predictor.predict_batch(&readings))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let data: Vec<serde_json::Value> = results
        .into_iter()
        .map(|result| match result {
            Ok(prediction) => serde_json::to_value(prediction)
                .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() })),
            Err(e) => serde_json::json!({ "error": e.to_string() }),
        })
        .collect();

    let elapsed = start.elapsed();
    tracing::debug!("Batch of {} predictions in {:?}", data.len(), elapsed);

    Ok(Json(serde_json::json!({
        "rows": data.len(),
        "data": data,
        "query_time_us": elapsed.as_micros(),
    })))
}

#[cfg(feature = "api")]
async fn mapped_features(Json(readings): Json<RawReadings>) -> Result<Json<serde_json::Value>, AppError> {
    readings.ensure_finite()?;
    let features = map_inputs_to_features(&readings);

    let data: Vec<serde_json::Value> = features
        .iter()
        .map(|(name, value)| {
            serde_json::json!({
                "name": name.as_str(),
                "value": value,
                "max": name.max_value(),
            })
        })
        .collect();

    Ok(Json(serde_json::json!({
        "rows": data.len(),
        "data": data,
    })))
}

#[cfg(feature = "api")]
async fn guidance_table(State(state): State<AppState>) -> impl IntoResponse {
    let guide = state.predictor.guide();
    Json(serde_json::json!({
        "rows": guide.len(),
        "data": guide,
    }))
}

/// Query params for guide lookup
#[cfg(feature = "api")]
#[derive(Debug, serde::Deserialize)]
struct GuidanceQuery {
    risk: f64,
}

#[cfg(feature = "api")]
async fn guidance_lookup(
    State(state): State<AppState>,
    Query(params): Query<GuidanceQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !params.risk.is_finite() {
        return Err(AppError::BadRequest("risk must be a finite number".to_string()));
    }

    match state.predictor.guidance_for(params.risk) {
        Some(tier) => Ok(Json(serde_json::json!({
            "risk": params.risk,
            "tier": tier,
        }))),
        None => Err(AppError::NotFound(format!(
            "No guidance tier covers {}% risk",
            params.risk
        ))),
    }
}

// ============================================================================
// Error Handling
// ============================================================================

#[cfg(feature = "api")]
#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Internal(String),
    NotFound(String),
}

#[cfg(feature = "api")]
impl From<FloodError> for AppError {
    fn from(err: FloodError) -> Self {
        match err {
            FloodError::NonFiniteReading { .. } => AppError::BadRequest(err.to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

#[cfg(feature = "api")]
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
