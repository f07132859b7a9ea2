pub mod format;
pub mod hub;
pub mod sink;
pub mod store;
