//! Admin-console client for a property-listing scraper backend.
//!
//! Mediates between operator commands and the backend HTTP API: every call
//! goes through one [`api::ApiClient`] chokepoint that never raises, outcomes
//! surface as transient [`notify`] banners, per-action controllers in
//! [`console`] guard destructive and long-running operations, [`poll`] keeps
//! the scheduler status fresh, and [`render`] turns heterogeneous property
//! records into a safe display fragment.

pub mod api;
pub mod boot;
pub mod console;
pub mod format;
pub mod model;
pub mod notify;
pub mod poll;
pub mod render;
pub mod store;
pub mod view;
