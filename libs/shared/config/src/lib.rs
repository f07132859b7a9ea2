use std::env;
use std::path::PathBuf;
use tracing::warn;

/// Where the notification store persists its serialized list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationStoreKind {
    Memory,
    File,
    Redis,
}

impl NotificationStoreKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Some(Self::Memory),
            "file" => Some(Self::File),
            "redis" => Some(Self::Redis),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_jwt_secret: String,
    pub redis_url: Option<String>,
    pub notification_store: NotificationStoreKind,
    pub notification_store_dir: PathBuf,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            supabase_jwt_secret: env::var("SUPABASE_JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_JWT_SECRET not set, using empty value");
                    String::new()
                }),
            redis_url: env::var("REDIS_URL").ok(),
            notification_store: env::var("NOTIFICATION_STORE")
                .ok()
                .and_then(|value| {
                    let kind = NotificationStoreKind::parse(&value);
                    if kind.is_none() {
                        warn!("Unknown NOTIFICATION_STORE '{}', using file store", value);
                    }
                    kind
                })
                .unwrap_or(NotificationStoreKind::File),
            notification_store_dir: env::var("NOTIFICATION_STORE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data/notifications")),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        if config.notification_store == NotificationStoreKind::Redis && config.redis_url.is_none() {
            warn!("NOTIFICATION_STORE=redis but REDIS_URL not set, using redis://localhost:6379");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_anon_key.is_empty()
            && !self.supabase_jwt_secret.is_empty()
    }
}
