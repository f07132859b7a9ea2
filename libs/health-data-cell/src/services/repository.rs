use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Method;
use tokio::sync::RwLock;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::HealthRecord;

const TABLE_PATH: &str = "/rest/v1/health_data";

/// Storage port for health records. Listings come back newest first.
#[async_trait]
pub trait HealthDataRepository: Send + Sync {
    async fn insert(&self, record: &HealthRecord, auth_token: &str) -> Result<HealthRecord>;

    async fn find_by_user(&self, user_id: &str, auth_token: &str) -> Result<Vec<HealthRecord>>;

    async fn find_by_id(&self, record_id: &str, auth_token: &str) -> Result<Option<HealthRecord>>;

    async fn update(&self, record: &HealthRecord, auth_token: &str) -> Result<HealthRecord>;

    async fn delete(&self, record_id: &str, auth_token: &str) -> Result<()>;

    async fn find_by_date_range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        auth_token: &str,
    ) -> Result<Vec<HealthRecord>>;
}

// =====================================================================================
// SUPABASE ADAPTER
// =====================================================================================

pub struct SupabaseHealthDataRepository {
    supabase: SupabaseClient,
}

impl SupabaseHealthDataRepository {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }
}

/// Keeps sub-second precision so range bounds match stored timestamps exactly.
fn query_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

#[async_trait]
impl HealthDataRepository for SupabaseHealthDataRepository {
    async fn insert(&self, record: &HealthRecord, auth_token: &str) -> Result<HealthRecord> {
        debug!("Inserting health record for user {}", record.user_id);

        let rows: Vec<HealthRecord> = self.supabase.request_with_headers(
            Method::POST,
            TABLE_PATH,
            Some(auth_token),
            Some(record.to_row()),
            Some(SupabaseClient::return_representation()),
        ).await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| anyhow!("Failed to create health record"))
    }

    async fn find_by_user(&self, user_id: &str, auth_token: &str) -> Result<Vec<HealthRecord>> {
        let path = format!("{}?user_id=eq.{}&order=created_at.desc", TABLE_PATH, user_id);
        self.supabase.request(Method::GET, &path, Some(auth_token), None).await
    }

    async fn find_by_id(&self, record_id: &str, auth_token: &str) -> Result<Option<HealthRecord>> {
        let path = format!("{}?id=eq.{}", TABLE_PATH, record_id);
        let rows: Vec<HealthRecord> = self.supabase.request(Method::GET, &path, Some(auth_token), None).await?;
        Ok(rows.into_iter().next())
    }

    async fn update(&self, record: &HealthRecord, auth_token: &str) -> Result<HealthRecord> {
        debug!("Updating health record {}", record.id);

        let path = format!("{}?id=eq.{}", TABLE_PATH, record.id);
        let rows: Vec<HealthRecord> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            Some(auth_token),
            Some(record.to_row()),
            Some(SupabaseClient::return_representation()),
        ).await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| anyhow!("Health record {} was not updated", record.id))
    }

    async fn delete(&self, record_id: &str, auth_token: &str) -> Result<()> {
        let path = format!("{}?id=eq.{}", TABLE_PATH, record_id);
        self.supabase.execute(Method::DELETE, &path, Some(auth_token), None).await
    }

    async fn find_by_date_range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        auth_token: &str,
    ) -> Result<Vec<HealthRecord>> {
        let path = format!(
            "{}?user_id=eq.{}&created_at=gte.{}&created_at=lte.{}&order=created_at.desc",
            TABLE_PATH,
            user_id,
            query_timestamp(start),
            query_timestamp(end),
        );
        self.supabase.request(Method::GET, &path, Some(auth_token), None).await
    }
}

// =====================================================================================
// IN-MEMORY ADAPTER
// =====================================================================================

/// Process-local store, used by tests and local runs without a database.
#[derive(Default)]
pub struct InMemoryHealthDataRepository {
    records: RwLock<Vec<HealthRecord>>,
}

impl InMemoryHealthDataRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(mut records: Vec<HealthRecord>) -> Vec<HealthRecord> {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    records
}

#[async_trait]
impl HealthDataRepository for InMemoryHealthDataRepository {
    async fn insert(&self, record: &HealthRecord, _auth_token: &str) -> Result<HealthRecord> {
        self.records.write().await.push(record.clone());
        Ok(record.clone())
    }

    async fn find_by_user(&self, user_id: &str, _auth_token: &str) -> Result<Vec<HealthRecord>> {
        let records = self.records.read().await;
        Ok(newest_first(
            records.iter().filter(|r| r.user_id == user_id).cloned().collect(),
        ))
    }

    async fn find_by_id(&self, record_id: &str, _auth_token: &str) -> Result<Option<HealthRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id == record_id).cloned())
    }

    async fn update(&self, record: &HealthRecord, _auth_token: &str) -> Result<HealthRecord> {
        let mut records = self.records.write().await;
        let slot = records
            .iter_mut()
            .find(|r| r.id == record.id)
            .ok_or_else(|| anyhow!("Health record {} was not updated", record.id))?;
        *slot = record.clone();
        Ok(record.clone())
    }

    async fn delete(&self, record_id: &str, _auth_token: &str) -> Result<()> {
        self.records.write().await.retain(|r| r.id != record_id);
        Ok(())
    }

    async fn find_by_date_range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        _auth_token: &str,
    ) -> Result<Vec<HealthRecord>> {
        let records = self.records.read().await;
        Ok(newest_first(
            records
                .iter()
                .filter(|r| r.user_id == user_id && r.created_at >= start && r.created_at <= end)
                .cloned()
                .collect(),
        ))
    }
}
