//! API routes.
//!
//! Every handler is a thin wrapper over `ProgressService`; failures to write
//! come back as `success: false` with a 500 status.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use culturo_core::model::{Activity, OverallStats, Region, RegionProgress};
use serde::{Deserialize, Serialize};
use services::StarsView;
use tracing::{error, info};

use crate::server::AppState;

type AppStateArc = Arc<AppState>;

#[derive(Debug, Deserialize)]
pub struct UpdateStarsRequest {
    pub region: String,
    pub activity: String,
    pub stars: i64,
}

#[derive(Debug, Serialize)]
pub struct UpdateStarsResponse {
    pub success: bool,
    pub region: String,
    pub activity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stars: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TotalResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub total: u32,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Default, Deserialize)]
pub struct RegionQuery {
    pub region: Option<String>,
}

impl RegionQuery {
    /// A blank `?region=` means "all regions".
    fn region(self) -> Option<Region> {
        self.region
            .filter(|name| !name.trim().is_empty())
            .map(Region::from)
    }
}

// ============================================================================
// Star Routes
// ============================================================================

pub fn star_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/stars", get(get_stars))
        .route("/api/stars/total", get(total_stars))
        .route("/api/stars/update", post(update_stars))
        .route("/api/stars/reset", post(reset_stars))
}

async fn get_stars(
    State(state): State<AppStateArc>,
    Query(query): Query<RegionQuery>,
) -> Json<StarsView> {
    let region = query.region();
    Json(state.progress.get_stars(region.as_ref()).await)
}

async fn total_stars(
    State(state): State<AppStateArc>,
    Query(query): Query<RegionQuery>,
) -> Json<TotalResponse> {
    let region = query.region();
    let total = state.progress.total_stars(region.as_ref()).await;
    Json(TotalResponse {
        region: region.map(|r| r.to_string()),
        total,
    })
}

async fn update_stars(
    State(state): State<AppStateArc>,
    Json(req): Json<UpdateStarsRequest>,
) -> (StatusCode, Json<UpdateStarsResponse>) {
    let region = Region::from(req.region.as_str());
    let activity = Activity::from(req.activity.as_str());

    match state
        .progress
        .try_set_stars(&region, &activity, req.stars)
        .await
    {
        Ok(stars) => {
            info!(%region, %activity, %stars, "stars updated");
            (
                StatusCode::OK,
                Json(UpdateStarsResponse {
                    success: true,
                    region: req.region,
                    activity: req.activity,
                    stars: Some(stars.value()),
                    error: None,
                }),
            )
        }
        Err(err) => {
            error!(%region, %activity, error = %err, "failed to update stars");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(UpdateStarsResponse {
                    success: false,
                    region: req.region,
                    activity: req.activity,
                    stars: None,
                    error: Some(err.to_string()),
                }),
            )
        }
    }
}

async fn reset_stars(State(state): State<AppStateArc>) -> (StatusCode, Json<ResetResponse>) {
    match state.progress.try_reset_all().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ResetResponse {
                success: true,
                error: None,
            }),
        ),
        Err(err) => {
            error!(error = %err, "failed to reset progress");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ResetResponse {
                    success: false,
                    error: Some(err.to_string()),
                }),
            )
        }
    }
}

// ============================================================================
// Stats Routes
// ============================================================================

pub fn stats_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/stats/overall", get(overall_stats))
        .route("/api/progress/{region}", get(region_progress))
}

async fn overall_stats(State(state): State<AppStateArc>) -> Json<OverallStats> {
    Json(state.progress.overall_stats().await)
}

async fn region_progress(
    State(state): State<AppStateArc>,
    Path(region): Path<String>,
) -> Json<RegionProgress> {
    Json(state.progress.region_progress(&Region::from(region)).await)
}

// ============================================================================
// Health Routes
// ============================================================================

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/api/health", get(health))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, header};
    use culturo_core::model::ProgressRecord;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use services::{AppServices, ProgressService};
    use storage::repository::{ProgressRepository, StorageError};
    use tower::ServiceExt;

    use crate::server::router;

    async fn app() -> Router {
        let services = AppServices::in_memory().await.unwrap();
        router(AppState::new(services.progress()))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_healthy() {
        let (status, body) = send(app().await, get("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn update_clamps_and_is_visible_in_reads() {
        let app = app().await;

        let (status, body) = send(
            app.clone(),
            post_json(
                "/api/stars/update",
                json!({"region": "China", "activity": "Food", "stars": 99}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["stars"], 3);

        let (_, stars) = send(app.clone(), get("/api/stars?region=China")).await;
        assert_eq!(stars["Food"], 3);
        assert_eq!(stars["Language"], 0);

        let (_, total) = send(app, get("/api/stars/total?region=China")).await;
        assert_eq!(total["total"], 3);
    }

    #[tokio::test]
    async fn stars_without_region_returns_every_region() {
        let (_, body) = send(app().await, get("/api/stars")).await;
        let regions = body.as_object().unwrap();
        assert_eq!(regions.len(), 3);
        assert!(regions.contains_key("Hong Kong"));
    }

    #[tokio::test]
    async fn unknown_region_reads_zero_without_being_created() {
        let app = app().await;
        let (_, mars) = send(app.clone(), get("/api/stars?region=Mars")).await;
        assert_eq!(mars.as_object().unwrap().len(), 4);

        let (_, all) = send(app, get("/api/stars")).await;
        assert!(all.get("Mars").is_none());
    }

    #[tokio::test]
    async fn overall_stats_reports_fixed_maximum() {
        let app = app().await;
        send(
            app.clone(),
            post_json(
                "/api/stars/update",
                json!({"region": "Vietnam", "activity": "Performance", "stars": 2}),
            ),
        )
        .await;

        let (status, body) = send(app, get("/api/stats/overall")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_stars"], 2);
        assert_eq!(body["max_total_stars"], 36);
        assert_eq!(body["all_stars"]["Vietnam"]["Performance"], 2);
    }

    #[tokio::test]
    async fn region_progress_decodes_path() {
        let app = app().await;
        send(
            app.clone(),
            post_json(
                "/api/stars/update",
                json!({"region": "Hong Kong", "activity": "Language", "stars": 3}),
            ),
        )
        .await;

        let (status, body) = send(app, get("/api/progress/Hong%20Kong")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["region"], "Hong Kong");
        assert_eq!(body["total"], 3);
        assert_eq!(body["max_stars"], 12);
        assert_eq!(body["progress_percentage"], 25.0);
    }

    #[tokio::test]
    async fn reset_zeroes_totals() {
        let app = app().await;
        send(
            app.clone(),
            post_json(
                "/api/stars/update",
                json!({"region": "China", "activity": "Food", "stars": 2}),
            ),
        )
        .await;

        let (status, body) = send(app.clone(), post_json("/api/stars/reset", json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (_, total) = send(app, get("/api/stars/total")).await;
        assert_eq!(total["total"], 0);
    }

    struct ReadOnlyRepository;

    #[async_trait::async_trait]
    impl ProgressRepository for ReadOnlyRepository {
        async fn load_progress(&self) -> Result<Option<ProgressRecord>, StorageError> {
            Ok(Some(ProgressRecord::default()))
        }

        async fn save_progress(&self, _record: &ProgressRecord) -> Result<(), StorageError> {
            Err(StorageError::Io("permission denied".into()))
        }

        async fn clear_progress(&self) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn write_failure_returns_success_false() {
        let progress = Arc::new(ProgressService::new(Arc::new(ReadOnlyRepository)));
        let app = router(AppState::new(progress));

        let (status, body) = send(
            app,
            post_json(
                "/api/stars/update",
                json!({"region": "China", "activity": "Food", "stars": 1}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("permission denied"));
    }
}
