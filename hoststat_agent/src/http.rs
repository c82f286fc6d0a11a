//! HTTP routes. Each route runs one collector in the request task and
//! serializes the record; collection errors become 500s.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tracing::error;

use crate::error::CollectError;
use crate::metrics::{
    collect_cpu, collect_disks, collect_docker, collect_kernel, collect_memory, collect_nvme,
};
use crate::snapshot::collect_snapshot;
use crate::state::AppState;
use crate::types::{
    CpuStatus, DiskStatus, DockerContainerStatus, KernelStatus, MemoryStatus, NvmeStatus,
    SystemSnapshot,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/status", get(status))
        .route("/cpu", get(cpu))
        .route("/nvme", get(nvme))
        .route("/memory", get(memory))
        .route("/disks", get(disks))
        .route("/kernel", get(kernel))
        .route("/docker", get(docker))
        .with_state(state)
}

pub struct ApiError(CollectError);

impl From<CollectError> for ApiError {
    fn from(e: CollectError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("collection failed: {}", self.0);
        let body = Json(json!({ "error": self.0.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

async fn status(State(state): State<AppState>) -> ApiResult<SystemSnapshot> {
    Ok(Json(collect_snapshot(&state.config).await?))
}

async fn cpu(State(state): State<AppState>) -> ApiResult<CpuStatus> {
    Ok(Json(collect_cpu(&state.config).await?))
}

async fn nvme(State(state): State<AppState>) -> ApiResult<NvmeStatus> {
    Ok(Json(collect_nvme(&state.config).await?))
}

async fn memory(State(state): State<AppState>) -> ApiResult<MemoryStatus> {
    Ok(Json(collect_memory(&state.config).await?))
}

async fn disks(State(state): State<AppState>) -> Json<Vec<DiskStatus>> {
    Json(collect_disks(&state.config))
}

async fn kernel(State(state): State<AppState>) -> ApiResult<KernelStatus> {
    Ok(Json(collect_kernel(&state.config).await?))
}

async fn docker(State(state): State<AppState>) -> ApiResult<Vec<DockerContainerStatus>> {
    Ok(Json(collect_docker(&state.config).await?))
}
