//! flowdeck-core — view-model layer for the workflows list screen.
//!
//! Provides:
//! - `models` — flow records and the enums the list screen filters on
//! - `fmt` — pure formatting helpers (relative age, node/edge counts)
//! - `gateway` — the Record Store boundary (`FlowGateway`) and its paging types
//! - `view` — view parameters, the pure `compute_view` reducer, the per-session
//!   `FlowListViewModel`, and the renderer-independent presentation model
//! - `error` — errors surfaced to the display layer
//!
//! With `memory` feature (default):
//! - `gateway::memory` — in-process Record Store
//!
//! With `api` feature:
//! - `api` — HTTP request DTOs and OpenAPI schemas

pub mod error;
pub mod fmt;
pub mod gateway;
pub mod models;
pub mod view;

#[cfg(feature = "api")]
pub mod api;

pub use error::FlowError;
pub use gateway::{FlowGateway, GatewayError, ListQuery, Page};
pub use models::{FlowId, FlowRecord, FlowStatus, StatusFilter, ViewMode};
pub use view::{DerivedView, FlowListViewModel, FlowStats, ViewParams, compute_view};

/// Crate version with the git revision it was built from.
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "-", env!("FLOWDECK_GIT_SHA"));
