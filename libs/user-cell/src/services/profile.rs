use anyhow::anyhow;
use chrono::Utc;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Method,
};
use serde_json::json;
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::auth::User;

use crate::models::{ProfileRequest, UserError, UserProfile};

const USERS_PATH: &str = "/rest/v1/users";

pub struct UserProfileService {
    supabase: SupabaseClient,
}

impl UserProfileService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    fn ensure_owner(user: &User, user_id: &str) -> Result<(), UserError> {
        if user.owns(user_id) {
            Ok(())
        } else {
            Err(UserError::Unauthorized)
        }
    }

    /// Creates the caller's profile, or merges into it when it already exists.
    pub async fn upsert_profile(
        &self,
        user: &User,
        request: ProfileRequest,
        auth_token: &str,
    ) -> Result<UserProfile, UserError> {
        debug!("Upserting profile for user {}", user.id);

        let mut headers = HeaderMap::new();
        headers.insert(
            "Prefer",
            HeaderValue::from_static("resolution=merge-duplicates,return=representation"),
        );

        let now = Utc::now().to_rfc3339();
        let rows: Vec<UserProfile> = self.supabase.request_with_headers(
            Method::POST,
            USERS_PATH,
            Some(auth_token),
            Some(json!({
                "id": user.id,
                "name": request.name,
                "email": request.email,
                "updated_at": now,
            })),
            Some(headers),
        ).await.map_err(UserError::database("creating or updating user profile"))?;

        let profile = rows.into_iter().next().ok_or_else(|| UserError::Database {
            context: "creating or updating user profile",
            source: anyhow!("no row returned"),
        })?;

        info!("Profile saved for user {}", profile.id);
        Ok(profile)
    }

    pub async fn get_profile(&self, user_id: &str, auth_token: &str) -> Result<UserProfile, UserError> {
        let path = format!("{}?id=eq.{}", USERS_PATH, user_id);
        let rows: Vec<UserProfile> = self.supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(UserError::database("retrieving user profile"))?;

        rows.into_iter().next().ok_or(UserError::NotFound)
    }

    pub async fn list_profiles(&self, auth_token: &str) -> Result<Vec<UserProfile>, UserError> {
        let path = format!("{}?order=created_at.asc", USERS_PATH);
        self.supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(UserError::database("retrieving all user profiles"))
    }

    pub async fn update_profile(
        &self,
        user: &User,
        user_id: &str,
        request: ProfileRequest,
        auth_token: &str,
    ) -> Result<UserProfile, UserError> {
        Self::ensure_owner(user, user_id)?;

        let path = format!("{}?id=eq.{}", USERS_PATH, user_id);
        let rows: Vec<UserProfile> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            Some(auth_token),
            Some(json!({
                "name": request.name,
                "email": request.email,
                "updated_at": Utc::now().to_rfc3339(),
            })),
            Some(SupabaseClient::return_representation()),
        ).await.map_err(UserError::database("updating user profile"))?;

        rows.into_iter().next().ok_or(UserError::NotFound)
    }

    pub async fn delete_profile(&self, user: &User, user_id: &str, auth_token: &str) -> Result<(), UserError> {
        Self::ensure_owner(user, user_id)?;

        let path = format!("{}?id=eq.{}", USERS_PATH, user_id);
        self.supabase
            .execute(Method::DELETE, &path, Some(auth_token), None)
            .await
            .map_err(UserError::database("deleting user profile"))?;

        info!("Profile deleted for user {}", user_id);
        Ok(())
    }
}
