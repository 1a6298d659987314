//! In-memory cache of dashboard data fetched from the backend bridge.
//!
//! Each payload type (project sheets, employee dashboards, monthly
//! summaries, the staff directory) lives in its own `DashboardDataCache`,
//! keyed by `CacheKey`. Entries stay until the user reloads.

pub mod key;
pub mod store;

pub use key::CacheKey;
pub use store::{CacheEntry, CacheError, DashboardDataCache};
