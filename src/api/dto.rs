use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    db::models::{NewReading, Reading},
    fill_level::{round_to, FillStatus},
};

/// Base coordinates (Santiago) for the simulated map positions.
pub const BASE_LAT: f64 = -33.4489;
pub const BASE_LNG: f64 = -70.6693;
/// Per-id offset applied to both coordinates.
pub const COORDINATE_STEP: f64 = 0.001;

pub const DEFAULT_HISTORY_LIMIT: u32 = 100;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `1` → `"CONT001"`. Ids wider than three digits are kept whole.
pub fn format_container_code(container_id: i32) -> String {
    format!("CONT{container_id:03}")
}

/// Illustrative `(lat, lng)` for the dashboard map; not a real location.
pub fn placeholder_coordinates(container_id: i32) -> (f64, f64) {
    let offset = f64::from(container_id) * COORDINATE_STEP;
    (BASE_LAT + offset, BASE_LNG + offset)
}

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

// ---------------------------------------------------------------------------
// Ingest
// ---------------------------------------------------------------------------

/// Request body for `POST /container/{id}`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct IngestRequest {
    /// Degrees Celsius
    pub temperature: f64,
    /// Relative humidity percentage
    pub humidity: f64,
    /// Raw ultrasonic distance in centimeters
    pub level: f64,
}

impl From<IngestRequest> for NewReading {
    fn from(r: IngestRequest) -> Self {
        Self {
            temperature: r.temperature,
            humidity: r.humidity,
            distance: r.level,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IngestResponse {
    #[schema(example = "ok")]
    pub status: String,
    pub container_id: i32,
    pub message: String,
}

impl IngestResponse {
    pub fn stored(container_id: i32) -> Self {
        Self {
            status: "ok".to_owned(),
            container_id,
            message: format!("Reading for container {container_id} stored"),
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Latest state of one container as shown on the dashboard.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContainerSnapshotDto {
    #[schema(example = "CONT001")]
    pub id: String,
    pub container_id: i32,
    pub temperature: f64,
    pub humidity: f64,
    /// Raw sensor distance in centimeters
    pub distance: f64,
    /// Fill level, 0–100, rounded to a whole percent
    pub fill_percent: f64,
    pub status: FillStatus,
    #[schema(example = "2025-01-01 12:00:00")]
    pub timestamp: String,
    pub lat: f64,
    pub lng: f64,
}

impl From<&Reading> for ContainerSnapshotDto {
    fn from(r: &Reading) -> Self {
        let level = r.fill_level();
        let (lat, lng) = placeholder_coordinates(r.container_id);
        Self {
            id: format_container_code(r.container_id),
            container_id: r.container_id,
            temperature: round_to(r.temperature, 1),
            humidity: round_to(r.humidity, 1),
            distance: round_to(r.distance, 1),
            fill_percent: round_to(level.percent, 0),
            status: level.status,
            timestamp: format_timestamp(r.recorded_at),
            lat,
            lng,
        }
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    #[serde(default = "default_history_limit")]
    pub limit: u32,
}

fn default_history_limit() -> u32 {
    DEFAULT_HISTORY_LIMIT
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HistoryEntryDto {
    pub temperature: f64,
    pub humidity: f64,
    pub distance: f64,
    pub fill_percent: f64,
    pub status: FillStatus,
    pub timestamp: String,
}

impl From<&Reading> for HistoryEntryDto {
    fn from(r: &Reading) -> Self {
        let level = r.fill_level();
        Self {
            temperature: round_to(r.temperature, 1),
            humidity: round_to(r.humidity, 1),
            distance: round_to(r.distance, 1),
            fill_percent: round_to(level.percent, 0),
            status: level.status,
            timestamp: format_timestamp(r.recorded_at),
        }
    }
}

/// Response for `GET /containers/{id}/history`. Entries are newest first.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HistoryResponse {
    pub container_id: i32,
    /// Number of entries returned.
    pub total: usize,
    pub readings: Vec<HistoryEntryDto>,
}

impl HistoryResponse {
    pub fn new(container_id: i32, rows: &[Reading]) -> Self {
        let readings: Vec<HistoryEntryDto> = rows.iter().map(Into::into).collect();
        Self {
            container_id,
            total: readings.len(),
            readings,
        }
    }
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Fleet counters computed over each container's latest reading.
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct StatsResponse {
    pub total_containers: usize,
    pub containers_high: usize,
    pub containers_medium: usize,
    pub containers_low: usize,
    pub last_updated: String,
}

impl StatsResponse {
    /// `latest` must hold at most one reading per container.
    pub fn from_latest(latest: &[Reading], now: DateTime<Utc>) -> Self {
        let mut stats = Self {
            total_containers: latest.len(),
            containers_high: 0,
            containers_medium: 0,
            containers_low: 0,
            last_updated: format_timestamp(now),
        };

        for reading in latest {
            match reading.fill_level().status {
                FillStatus::High => stats.containers_high += 1,
                FillStatus::Medium => stats.containers_medium += 1,
                FillStatus::Low => stats.containers_low += 1,
            }
        }

        stats
    }
}

// ---------------------------------------------------------------------------
// Misc
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageDto {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthDto {
    #[schema(example = "ok")]
    pub status: String,
}
