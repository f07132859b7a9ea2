pub mod aggregator;
pub mod health_data;
pub mod repository;
