//! Dashboard route handlers.
//!
//! `/` serves the rendered page and accepts form submissions; `/api/*`
//! endpoints return JSON. State is shared via `Arc<DashboardState>`.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, warn};

use crate::config::{DefaultsConfig, SliderConfig};
use crate::engine::{DemoContext, DemoView, FormInput};
use crate::render::render_document;
use crate::types::{ComponentStat, DemoError, Metrics, PerfProfile, Session, TrafficType};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct DashboardState {
    /// Loaded once at startup. `None` when the fixture fetch failed.
    pub context: Option<DemoContext>,
    pub view: RwLock<DemoView>,
}

impl DashboardState {
    pub fn new(context: Option<DemoContext>, view: DemoView) -> Self {
        Self {
            context,
            view: RwLock::new(view),
        }
    }

    /// Build state from the outcome of the startup fetch, running the
    /// initial simulation when the fixture is available.
    pub fn from_load(
        loaded: Result<DemoContext, DemoError>,
        defaults: &DefaultsConfig,
        slider: SliderConfig,
    ) -> Self {
        let mut view = DemoView::new(defaults, slider);
        match loaded {
            Ok(ctx) => {
                if let Err(e) = view.initialize(&ctx) {
                    warn!(error = %e, "Initial simulation failed");
                }
                Self::new(Some(ctx), view)
            }
            Err(e) => {
                error!(error = %e, "Fixture unavailable; serving empty page");
                view.last_error = Some(e);
                Self::new(None, view)
            }
        }
    }

    fn context(&self) -> Result<&DemoContext, ApiError> {
        self.context.as_ref().ok_or(ApiError(DemoError::NotLoaded))
    }
}

pub type AppState = Arc<DashboardState>;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// HTTP status for a domain error.
pub fn status_for(err: &DemoError) -> StatusCode {
    match err {
        DemoError::UnknownProfile(_) => StatusCode::NOT_FOUND,
        DemoError::UnknownTrafficType(_) | DemoError::InvalidConcurrency(_) => {
            StatusCode::BAD_REQUEST
        }
        DemoError::NotLoaded
        | DemoError::NoProfiles
        | DemoError::Fetch { .. }
        | DemoError::MalformedFixture { .. } => StatusCode::SERVICE_UNAVAILABLE,
        DemoError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// JSON error wrapper for API handlers.
#[derive(Debug)]
pub struct ApiError(pub DemoError);

impl From<DemoError> for ApiError {
    fn from(e: DemoError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        (status, Json(ErrorResponse { error: self.0.to_string() })).into_response()
    }
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct SimulateResponse {
    pub profile: String,
    pub traffic_type: TrafficType,
    pub concurrency: f64,
    pub generated_at: String,
    pub sessions: Vec<Session>,
    pub metrics: Metrics,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverviewResponse {
    pub repo: Option<String>,
    pub overview: Vec<String>,
    pub components: Vec<ComponentStat>,
}

// ---------------------------------------------------------------------------
// Page handlers
// ---------------------------------------------------------------------------

/// GET /
pub async fn get_page(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let view = state.view.read().await;
    Ok(Html(render_document(&view, state.context.as_ref()).to_html()?))
}

/// POST /
///
/// Form submission; re-runs the simulation.
pub async fn submit_form(
    State(state): State<AppState>,
    Form(input): Form<FormInput>,
) -> Result<(StatusCode, Html<String>), ApiError> {
    let mut view = state.view.write().await;
    let status = match state.context.as_ref() {
        Some(ctx) => match view.submit(ctx, input) {
            Ok(_) => StatusCode::OK,
            Err(e) => status_for(&e),
        },
        None => {
            view.last_error = Some(DemoError::NotLoaded);
            StatusCode::SERVICE_UNAVAILABLE
        }
    };
    let html = render_document(&view, state.context.as_ref()).to_html()?;
    Ok((status, Html(html)))
}

// ---------------------------------------------------------------------------
// API handlers
// ---------------------------------------------------------------------------

/// GET /api/simulate
///
/// Stateless. Does not touch the page view.
pub async fn get_simulation(
    State(state): State<AppState>,
    Query(input): Query<FormInput>,
) -> Result<Json<SimulateResponse>, ApiError> {
    let ctx = state.context()?;
    let slider = state.view.read().await.slider;
    let (selection, result) = ctx.run_simulation(&input, &slider)?;

    Ok(Json(SimulateResponse {
        profile: selection.profile,
        traffic_type: selection.traffic_type,
        concurrency: selection.concurrency,
        generated_at: chrono::Utc::now().to_rfc3339(),
        sessions: result.sessions,
        metrics: result.metrics,
    }))
}

/// GET /api/profiles
pub async fn get_profiles(
    State(state): State<AppState>,
) -> Result<Json<Vec<PerfProfile>>, ApiError> {
    Ok(Json(state.context()?.data.perf_profiles.clone()))
}

/// GET /api/overview
pub async fn get_overview(State(state): State<AppState>) -> Result<Json<OverviewResponse>, ApiError> {
    let data = &state.context()?.data;
    Ok(Json(OverviewResponse {
        repo: data.repo.clone(),
        overview: data.overview.clone(),
        components: data.components.clone(),
    }))
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
