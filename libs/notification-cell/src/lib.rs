// =====================================================================================
// NOTIFICATION CELL - PER-USER NOTIFICATION STORE
// =====================================================================================

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use router::notification_routes;
pub use services::format::{get_error_message, sort_notifications, RequestFailure};
pub use services::hub::NotificationHub;
pub use services::sink::{build_sink, KeyValueStore};
pub use services::store::NotificationStore;
