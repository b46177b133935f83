//! Workflows list view model.
//!
//! `compute_view` is the pure reducer: records + view parameters in, visible
//! records + stats out. `FlowListViewModel` owns one session's parameters and
//! delegates mutations to a [`FlowGateway`](crate::gateway::FlowGateway).
//! `presentation` turns a derived view into renderer-independent cards.

mod model;
mod presentation;

pub use model::{CreateDraft, FlowAction, FlowListViewModel};
pub use presentation::{
    FlowCard, FlowListPresentation, PaginationInfo, StyleClass, build_presentation,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{FlowRecord, FlowStatus, StatusFilter, ViewMode};

/// User-controlled view parameters of one list session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
pub struct ViewParams {
    pub search_query: String,
    pub status_filter: StatusFilter,
    pub view_mode: ViewMode,
    /// 1-based page number, never 0.
    pub page_cursor: u32,
}

impl Default for ViewParams {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            status_filter: StatusFilter::All,
            view_mode: ViewMode::Grid,
            page_cursor: 1,
        }
    }
}

impl ViewParams {
    /// True if search or status filter can hide records.
    pub fn is_filtering(&self) -> bool {
        !self.search_query.is_empty() || self.status_filter != StatusFilter::All
    }
}

/// Aggregate counts over the unfiltered collection.
///
/// The view model hands `compute_view` one loaded page, so these are
/// page-scoped; see [`PaginationInfo::total`] for the store-wide count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
pub struct FlowStats {
    pub total: usize,
    pub active: usize,
    pub draft: usize,
}

impl FlowStats {
    pub fn from_records(records: &[FlowRecord]) -> Self {
        records.iter().fold(
            FlowStats {
                total: records.len(),
                ..Default::default()
            },
            |mut acc, r| {
                match r.status {
                    FlowStatus::Active => acc.active += 1,
                    FlowStatus::Draft => acc.draft += 1,
                    FlowStatus::Archived => {}
                }
                acc
            },
        )
    }
}

/// Result of [`compute_view`].
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedView {
    /// Records passing the filters, in input order.
    pub visible_records: Vec<FlowRecord>,
    pub stats: FlowStats,
}

/// Case-insensitive search over name and description.
///
/// An empty query matches everything; a missing description never matches a
/// non-empty query.
pub fn matches_search(record: &FlowRecord, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let q = query.to_lowercase();
    record.name.to_lowercase().contains(&q)
        || record.description_or_empty().to_lowercase().contains(&q)
}

/// Filters `collection` by `params` and computes stats.
///
/// Input order is preserved. Stats always cover the whole collection,
/// regardless of search text and status filter.
pub fn compute_view(collection: &[FlowRecord], params: &ViewParams) -> DerivedView {
    let visible_records: Vec<FlowRecord> = collection
        .iter()
        .filter(|r| params.status_filter.matches(r.status))
        .filter(|r| matches_search(r, &params.search_query))
        .cloned()
        .collect();

    debug!(
        input = collection.len(),
        visible = visible_records.len(),
        status = params.status_filter.as_str(),
        "computed flow view"
    );

    DerivedView {
        visible_records,
        stats: FlowStats::from_records(collection),
    }
}
