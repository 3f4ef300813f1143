use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use tracing::info;
use utoipa::OpenApi;

use super::{
    dto::{
        ContainerSnapshotDto, HealthDto, HistoryEntryDto, HistoryParams, HistoryResponse,
        IngestRequest, IngestResponse, MessageDto, StatsResponse,
    },
    errors::AppError,
};
use crate::{fill_level::FillStatus, store::SharedStore};

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service banner", body = MessageDto),
    ),
    tag = "system"
)]
pub async fn root() -> Json<MessageDto> {
    Json(MessageDto {
        message: "Smart container telemetry API".to_owned(),
    })
}

/// Store one sensor transmission for container `id`.
#[utoipa::path(
    post,
    path = "/container/{id}",
    params(
        ("id" = i32, Path, description = "Numeric container id"),
    ),
    request_body = IngestRequest,
    responses(
        (status = 200, description = "Reading stored", body = IngestResponse),
        (status = 422, description = "Malformed body"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "containers"
)]
pub async fn ingest_reading(
    State(store): State<SharedStore>,
    Path(container_id): Path<i32>,
    Json(body): Json<IngestRequest>,
) -> Result<Json<IngestResponse>, AppError> {
    let reading = store
        .insert(container_id, body.into())
        .await
        .context("failed to store reading")?;

    info!(
        container_id,
        temperature = reading.temperature,
        humidity = reading.humidity,
        distance = reading.distance,
        "Reading stored"
    );

    Ok(Json(IngestResponse::stored(container_id)))
}

/// Latest snapshot of every container that has reported at least once.
#[utoipa::path(
    get,
    path = "/containers",
    responses(
        (
            status = 200,
            description = "Latest reading per container",
            body = Vec<ContainerSnapshotDto>
        ),
        (status = 500, description = "Internal server error"),
    ),
    tag = "containers"
)]
pub async fn list_containers(
    State(store): State<SharedStore>,
) -> Result<Json<Vec<ContainerSnapshotDto>>, AppError> {
    let rows = store
        .latest_per_container()
        .await
        .context("failed to fetch containers")?;

    Ok(Json(rows.iter().map(Into::into).collect()))
}

/// Most recent readings of one container, newest first.
#[utoipa::path(
    get,
    path = "/containers/{id}/history",
    params(
        ("id" = i32, Path, description = "Numeric container id"),
        ("limit" = Option<u32>, Query, description = "Maximum number of readings (default 100)"),
    ),
    responses(
        (status = 200, description = "Container history", body = HistoryResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "containers"
)]
pub async fn container_history(
    State(store): State<SharedStore>,
    Path(container_id): Path<i32>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<HistoryResponse>, AppError> {
    let rows = store
        .history(container_id, params.limit)
        .await
        .context("failed to fetch container history")?;

    Ok(Json(HistoryResponse::new(container_id, &rows)))
}

/// Fleet-wide counts per fill tier, over each container's latest reading.
#[utoipa::path(
    get,
    path = "/stats",
    responses(
        (status = 200, description = "Fleet statistics", body = StatsResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "containers"
)]
pub async fn fleet_stats(
    State(store): State<SharedStore>,
) -> Result<Json<StatsResponse>, AppError> {
    let rows = store
        .latest_per_container()
        .await
        .context("failed to compute statistics")?;

    Ok(Json(StatsResponse::from_latest(&rows, Utc::now())))
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Returns `200 OK` with `{"status":"ok"}` when the reading store answers.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthDto),
        (status = 500, description = "Reading store unavailable"),
    ),
    tag = "system"
)]
pub async fn health(State(store): State<SharedStore>) -> Result<Json<HealthDto>, AppError> {
    store.ping().await.context("reading store unavailable")?;
    Ok(Json(HealthDto {
        status: "ok".to_owned(),
    }))
}

// ---------------------------------------------------------------------------
// OpenAPI spec
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(root, ingest_reading, list_containers, container_history, fleet_stats, health),
    components(schemas(
        IngestRequest,
        IngestResponse,
        ContainerSnapshotDto,
        HistoryEntryDto,
        HistoryResponse,
        StatsResponse,
        FillStatus,
        MessageDto,
        HealthDto,
    )),
    tags(
        (name = "containers", description = "Container telemetry endpoints"),
        (name = "system", description = "System endpoints"),
    ),
    info(
        title = "Container Telemetry API",
        version = "0.1.0",
        description = "Ingest and dashboard API for smart container sensors"
    )
)]
pub struct ApiDoc;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
