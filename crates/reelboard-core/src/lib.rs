//! Core library for reelboard.
//!
//! Client-side data layer for the clip-submission dashboard: the backend
//! bridge client, payload models, the per-entity `DashboardDataCache`,
//! spreadsheet date resolution, and the `Dashboard` that ties them together
//! for whatever front end renders the data.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod models;
pub mod utils;

pub use api::{ApiClient, ApiError, Backend};
pub use cache::{CacheError, CacheKey, DashboardDataCache};
pub use config::Config;
pub use dashboard::{Dashboard, DashboardError, WorkTable};
