//! LabTrack laboratory instrument maintenance server
//!
//! Keeps an inventory of laboratory instruments and their maintenance
//! history, derives due/overdue status for the dashboard and forwards
//! instrument histories to a remote failure-prediction service.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod scheduler;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
