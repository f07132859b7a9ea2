pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use router::{health_data_routes, health_data_routes_with};
pub use services::aggregator::aggregate;
