use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::fill_level::{self, FillLevel};

/// One sensor transmission. Rows are never updated or deleted.
#[derive(Debug, Clone, FromRow)]
pub struct Reading {
    pub id: Uuid,
    pub container_id: i32,
    /// Degrees Celsius
    pub temperature: f64,
    /// Relative humidity percentage
    pub humidity: f64,
    /// Centimeters from the sensor to the container contents
    pub distance: f64,
    pub recorded_at: DateTime<Utc>,
}

impl Reading {
    pub fn fill_level(&self) -> FillLevel {
        fill_level::evaluate(self.distance)
    }
}

/// Values supplied by a sensor; identity and timestamp are assigned on insert.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewReading {
    pub temperature: f64,
    pub humidity: f64,
    pub distance: f64,
}
