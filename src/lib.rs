// Public API for integration tests and the admin binary

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod store;
pub mod types;
pub mod views;
