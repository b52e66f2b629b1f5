//! Database models and configuration shared across the service.

pub mod client;
pub mod config;
