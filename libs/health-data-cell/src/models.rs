use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use shared_models::error::{AppError, CoreError, ValidationError};

// =====================================================================================
// RECORDS
// =====================================================================================

/// A single vitals reading. Serialized in camelCase for clients; the
/// snake_case aliases accept rows straight from the `health_data` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecord {
    pub id: String,
    #[serde(alias = "user_id")]
    pub user_id: String,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    #[serde(alias = "blood_pressure")]
    pub blood_pressure: String,
    #[serde(alias = "heart_rate", default)]
    pub heart_rate: Option<f64>,
    #[serde(alias = "created_at")]
    pub created_at: DateTime<Utc>,
    #[serde(alias = "updated_at", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl HealthRecord {
    /// Column layout of the `health_data` table.
    pub fn to_row(&self) -> Value {
        json!({
            "id": self.id,
            "user_id": self.user_id,
            "weight": self.weight,
            "height": self.height,
            "blood_pressure": self.blood_pressure,
            "heart_rate": self.heart_rate,
            "created_at": self.created_at.to_rfc3339(),
            "updated_at": self.updated_at.map(|t| t.to_rfc3339()),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHealthRecordRequest {
    pub user_id: String,
    pub weight: f64,
    pub height: f64,
    pub blood_pressure: String,
    pub heart_rate: Option<f64>,
}

/// Partial update; only the fields that are present change.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHealthRecordRequest {
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub blood_pressure: Option<String>,
    pub heart_rate: Option<f64>,
}

impl UpdateHealthRecordRequest {
    pub fn is_empty(&self) -> bool {
        self.weight.is_none()
            && self.height.is_none()
            && self.blood_pressure.is_none()
            && self.heart_rate.is_none()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DateRangeQuery {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

// =====================================================================================
// DERIVED METRICS
// =====================================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedHealthMetrics {
    pub average_weight: f64,
    pub average_height: f64,
    pub record_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: DateTime<Utc>,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthTrends {
    pub weight: Vec<TrendPoint>,
    pub height: Vec<TrendPoint>,
    pub weight_change: Option<f64>,
    pub height_change: Option<f64>,
    pub record_count: usize,
}

// =====================================================================================
// ERRORS
// =====================================================================================

#[derive(Error, Debug)]
pub enum HealthDataError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Health record not found")]
    NotFound,

    #[error("Not authorized to access health data of another user")]
    Unauthorized,

    #[error("Error {context}: {source}")]
    Repository {
        context: &'static str,
        source: anyhow::Error,
    },
}

impl HealthDataError {
    pub fn repository(context: &'static str) -> impl FnOnce(anyhow::Error) -> Self {
        move |source| Self::Repository { context, source }
    }
}

impl From<ValidationError> for HealthDataError {
    fn from(err: ValidationError) -> Self {
        Self::Core(err.into())
    }
}

impl From<HealthDataError> for AppError {
    fn from(err: HealthDataError) -> Self {
        match err {
            HealthDataError::Core(core) => core.into(),
            HealthDataError::NotFound => AppError::NotFound(err.to_string()),
            HealthDataError::Unauthorized => AppError::Forbidden(err.to_string()),
            HealthDataError::Repository { .. } => AppError::Database(err.to_string()),
        }
    }
}
