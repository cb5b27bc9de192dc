use std::net::SocketAddr;

use anyhow::Result;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use sqlx::PgPool;
use tower_http::cors::CorsLayer;

use goalsplit_core::decompose::DecomposerSource;
use goalsplit_core::service::{self, GoalError, NewGoalRequest};
use goalsplit_db::models::Goal;
use goalsplit_db::queries::goals::{self as goal_db, GoalFilter};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn internal(err: anyhow::Error) -> Self {
        tracing::error!(error = %format!("{err:#}"), "request failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("{err:#}"),
        }
    }
}

impl From<GoalError> for AppError {
    fn from(err: GoalError) -> Self {
        match err {
            GoalError::EmptyGoal | GoalError::UserIdTooLong => Self::bad_request(err.to_string()),
            GoalError::Database(e) => Self::internal(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub decomposers: DecomposerSource,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub user_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/goals", get(list_goals).post(create_goal))
        .route("/goals/{id}", get(get_goal).delete(delete_goal))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(state: AppState, bind: &str, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("goalsplit serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("goalsplit serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn create_goal(
    State(state): State<AppState>,
    Json(request): Json<NewGoalRequest>,
) -> Result<Json<Goal>, AppError> {
    let decomposer = state.decomposers.current();
    tracing::debug!(
        backend = decomposer.backend_name(),
        goal_len = request.goal.chars().count(),
        "decomposing goal"
    );
    let goal = service::create_goal(&state.pool, &decomposer, &request).await?;
    Ok(Json(goal))
}

async fn list_goals(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Goal>>, AppError> {
    let filter = GoalFilter::new(params.skip, params.limit, params.user_id);
    let goals = goal_db::list_goals(&state.pool, &filter)
        .await
        .map_err(AppError::internal)?;
    Ok(Json(goals))
}

async fn get_goal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Goal>, AppError> {
    goal_db::get_goal(&state.pool, id)
        .await
        .map_err(AppError::internal)?
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("goal {id} not found")))
}

async fn delete_goal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let deleted = goal_db::delete_goal(&state.pool, id)
        .await
        .map_err(AppError::internal)?;
    if !deleted {
        return Err(AppError::not_found(format!("goal {id} not found")));
    }
    tracing::info!(goal_id = id, "goal deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
