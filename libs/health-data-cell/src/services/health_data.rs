use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use security_cell::validate_health_data;
use shared_models::auth::User;
use shared_models::error::ValidationError;

use crate::models::{
    AggregatedHealthMetrics, CreateHealthRecordRequest, HealthDataError, HealthRecord,
    HealthTrends, UpdateHealthRecordRequest,
};
use crate::services::aggregator;
use crate::services::repository::HealthDataRepository;

pub struct HealthDataService {
    repository: Arc<dyn HealthDataRepository>,
}

impl HealthDataService {
    pub fn new(repository: Arc<dyn HealthDataRepository>) -> Self {
        Self { repository }
    }

    fn ensure_owner(user: &User, user_id: &str) -> Result<(), HealthDataError> {
        if user.owns(user_id) {
            Ok(())
        } else {
            Err(HealthDataError::Unauthorized)
        }
    }

    pub async fn create_record(
        &self,
        user: &User,
        payload: &Value,
        auth_token: &str,
    ) -> Result<HealthRecord, HealthDataError> {
        validate_health_data(payload)?;

        let request: CreateHealthRecordRequest = serde_json::from_value(payload.clone())
            .map_err(|e| ValidationError::rule(format!("Invalid health data: {}", e)))?;
        Self::ensure_owner(user, &request.user_id)?;

        let now = Utc::now();
        let record = HealthRecord {
            id: Uuid::new_v4().to_string(),
            user_id: request.user_id,
            weight: Some(request.weight),
            height: Some(request.height),
            blood_pressure: request.blood_pressure,
            heart_rate: request.heart_rate,
            created_at: now,
            updated_at: Some(now),
        };

        let created = self.repository
            .insert(&record, auth_token)
            .await
            .map_err(HealthDataError::repository("adding health data"))?;

        info!("Health record {} created for user {}", created.id, created.user_id);
        Ok(created)
    }

    pub async fn list_records(
        &self,
        user: &User,
        user_id: &str,
        auth_token: &str,
    ) -> Result<Vec<HealthRecord>, HealthDataError> {
        Self::ensure_owner(user, user_id)?;

        self.repository
            .find_by_user(user_id, auth_token)
            .await
            .map_err(HealthDataError::repository("retrieving health data"))
    }

    pub async fn get_record(
        &self,
        user: &User,
        record_id: &str,
        auth_token: &str,
    ) -> Result<HealthRecord, HealthDataError> {
        let record = self.repository
            .find_by_id(record_id, auth_token)
            .await
            .map_err(HealthDataError::repository("retrieving health data"))?
            .ok_or(HealthDataError::NotFound)?;

        Self::ensure_owner(user, &record.user_id)?;
        Ok(record)
    }

    /// Merges the provided fields into the stored record and refreshes `updatedAt`.
    pub async fn update_record(
        &self,
        user: &User,
        record_id: &str,
        update: UpdateHealthRecordRequest,
        auth_token: &str,
    ) -> Result<HealthRecord, HealthDataError> {
        if update.is_empty() {
            return Err(ValidationError::rule(
                "At least one of weight, height, bloodPressure or heartRate must be provided",
            )
            .into());
        }
        if matches!(update.blood_pressure.as_deref(), Some("")) {
            return Err(ValidationError::field("bloodPressure", "Blood Pressure is required").into());
        }

        let mut record = self.get_record(user, record_id, auth_token).await?;

        if let Some(weight) = update.weight {
            record.weight = Some(weight);
        }
        if let Some(height) = update.height {
            record.height = Some(height);
        }
        if let Some(blood_pressure) = update.blood_pressure {
            record.blood_pressure = blood_pressure;
        }
        if let Some(heart_rate) = update.heart_rate {
            record.heart_rate = Some(heart_rate);
        }
        record.updated_at = Some(Utc::now());

        debug!("Writing merged health record {}", record.id);

        self.repository
            .update(&record, auth_token)
            .await
            .map_err(HealthDataError::repository("updating health data"))
    }

    pub async fn delete_record(
        &self,
        user: &User,
        record_id: &str,
        auth_token: &str,
    ) -> Result<(), HealthDataError> {
        let record = self.get_record(user, record_id, auth_token).await?;

        self.repository
            .delete(&record.id, auth_token)
            .await
            .map_err(HealthDataError::repository("deleting health data"))?;

        info!("Health record {} deleted", record.id);
        Ok(())
    }

    pub async fn records_in_range(
        &self,
        user: &User,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        auth_token: &str,
    ) -> Result<Vec<HealthRecord>, HealthDataError> {
        Self::ensure_owner(user, user_id)?;
        if start > end {
            return Err(ValidationError::rule("Start date must not be after end date").into());
        }

        self.repository
            .find_by_date_range(user_id, start, end, auth_token)
            .await
            .map_err(HealthDataError::repository("retrieving health data by date range"))
    }

    pub async fn metrics(
        &self,
        user: &User,
        user_id: &str,
        auth_token: &str,
    ) -> Result<AggregatedHealthMetrics, HealthDataError> {
        let records = self.list_records(user, user_id, auth_token).await?;
        Ok(aggregator::aggregate(&records)?)
    }

    pub async fn trends(
        &self,
        user: &User,
        user_id: &str,
        auth_token: &str,
    ) -> Result<HealthTrends, HealthDataError> {
        let records = self.list_records(user, user_id, auth_token).await?;
        Ok(aggregator::trends(&records))
    }
}
