//! UI-agnostic presentation of the workflows list.
//!
//! These types carry display data without any dependency on a rendering
//! framework. The web API serializes them as-is; a terminal renderer would map
//! [`StyleClass`] to colors, a browser to CSS classes.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{DerivedView, FlowAction, FlowStats, ViewParams};
use crate::fmt::{format_counts, relative_age, single_line, truncate};
use crate::gateway::Page;
use crate::models::{FlowId, FlowRecord, FlowStatus, StatusFilter, ViewMode};

const DESCRIPTION_MAX_CHARS: usize = 120;

/// Card-level style classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum StyleClass {
    #[default]
    Normal,
    /// Running flow (TUI: green).
    Active,
    /// Archived flow (TUI: dark gray).
    Dimmed,
}

impl From<FlowStatus> for StyleClass {
    fn from(status: FlowStatus) -> Self {
        match status {
            FlowStatus::Draft => Self::Normal,
            FlowStatus::Active => Self::Active,
            FlowStatus::Archived => Self::Dimmed,
        }
    }
}

/// One flow as shown in the grid or list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
pub struct FlowCard {
    pub id: FlowId,
    pub title: String,
    /// Single-line, truncated description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: FlowStatus,
    pub style: StyleClass,
    /// `"3 nodes · 2 edges"`.
    pub meta: String,
    /// Relative age of the last update.
    pub age: String,
    pub actions: Vec<FlowAction>,
}

impl FlowCard {
    pub fn from_record(record: &FlowRecord, now: DateTime<Utc>) -> Self {
        Self {
            id: record.id.clone(),
            title: record.name.clone(),
            description: record
                .description
                .as_deref()
                .map(single_line)
                .filter(|d| !d.is_empty())
                .map(|d| truncate(&d, DESCRIPTION_MAX_CHARS)),
            status: record.status,
            style: record.status.into(),
            meta: format_counts(record.nodes_count, record.edges_count),
            age: relative_age(record.updated_at, now),
            actions: FlowAction::available_for(record),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
pub struct PaginationInfo {
    pub current_page: u32,
    pub last_page: u32,
    /// Records in the whole store, across all pages.
    pub total: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

impl<T> From<&Page<T>> for PaginationInfo {
    fn from(page: &Page<T>) -> Self {
        Self {
            current_page: page.current_page,
            last_page: page.last_page,
            total: page.total,
            has_prev: page.has_prev(),
            has_next: page.has_next(),
        }
    }
}

/// Complete list screen ready to be rendered by any frontend.
///
/// `title` and `stats` describe the loaded page. Store-wide figures are in
/// `pagination`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
pub struct FlowListPresentation {
    /// `"Workflows (shown of loaded)"` plus active filter tags.
    pub title: String,
    pub view_mode: ViewMode,
    pub cards: Vec<FlowCard>,
    /// Counts over the loaded page, before filtering.
    pub stats: FlowStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
}

/// Builds the presentation of `view`, which must have been computed from
/// `collection` with `params`.
pub fn build_presentation(
    collection: &[FlowRecord],
    view: &DerivedView,
    params: &ViewParams,
    page: Option<&Page<FlowRecord>>,
    now: DateTime<Utc>,
) -> FlowListPresentation {
    let cards: Vec<FlowCard> = view
        .visible_records
        .iter()
        .map(|r| FlowCard::from_record(r, now))
        .collect();

    let mut title = format!("Workflows ({} of {})", cards.len(), collection.len());
    if !params.search_query.is_empty() {
        title.push_str(&format!(" [filter: {}]", params.search_query));
    }
    if params.status_filter != StatusFilter::All {
        title.push_str(&format!(" [status: {}]", params.status_filter.as_str()));
    }

    // A page past the end is empty although the store is not.
    let store_empty = page.map_or(collection.is_empty(), |p| p.total == 0);
    let empty_message = if !cards.is_empty() {
        None
    } else if store_empty {
        Some("No workflows yet".to_string())
    } else if params.is_filtering() {
        Some("No workflows match the current filter".to_string())
    } else {
        Some("No workflows on this page".to_string())
    };

    FlowListPresentation {
        title,
        view_mode: params.view_mode,
        cards,
        stats: view.stats,
        pagination: page.map(PaginationInfo::from),
        empty_message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::compute_view;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap()
    }

    fn rec(id: &str, status: FlowStatus, description: Option<&str>) -> FlowRecord {
        FlowRecord {
            id: FlowId::from(id),
            name: format!("Flow {id}"),
            description: description.map(str::to_string),
            status,
            nodes_count: 3,
            edges_count: 1,
            updated_at: now() - Duration::minutes(90),
        }
    }

    fn present(collection: &[FlowRecord], params: &ViewParams) -> FlowListPresentation {
        let view = compute_view(collection, params);
        build_presentation(collection, &view, params, None, now())
    }

    #[test]
    fn card_fields() {
        let card = FlowCard::from_record(
            &rec("a", FlowStatus::Active, Some("line one\nline two")),
            now(),
        );
        assert_eq!(card.title, "Flow a");
        assert_eq!(card.description.as_deref(), Some("line one line two"));
        assert_eq!(card.style, StyleClass::Active);
        assert_eq!(card.meta, "3 nodes · 1 edge");
        assert_eq!(card.age, "1h");
    }

    #[test]
    fn blank_description_is_dropped() {
        let card = FlowCard::from_record(&rec("a", FlowStatus::Draft, Some(" \n ")), now());
        assert_eq!(card.description, None);
        assert_eq!(card.style, StyleClass::Normal);
    }

    #[test]
    fn title_reports_counts_and_filters() {
        let c = vec![
            rec("a", FlowStatus::Active, None),
            rec("b", FlowStatus::Archived, None),
        ];
        assert_eq!(present(&c, &ViewParams::default()).title, "Workflows (2 of 2)");

        let p = ViewParams {
            search_query: "flow".into(),
            status_filter: StatusFilter::Archived,
            ..Default::default()
        };
        let pres = present(&c, &p);
        assert_eq!(pres.title, "Workflows (1 of 2) [filter: flow] [status: archived]");
        assert_eq!(pres.cards[0].style, StyleClass::Dimmed);
        assert_eq!(pres.empty_message, None);
    }

    #[test]
    fn empty_messages() {
        assert_eq!(
            present(&[], &ViewParams::default()).empty_message.as_deref(),
            Some("No workflows yet")
        );
        let c = vec![rec("a", FlowStatus::Active, None)];
        let p = ViewParams {
            status_filter: StatusFilter::Draft,
            ..Default::default()
        };
        assert_eq!(
            present(&c, &p).empty_message.as_deref(),
            Some("No workflows match the current filter")
        );
    }

    #[test]
    fn pagination_reflects_cursor_presence() {
        let c = vec![rec("a", FlowStatus::Draft, None)];
        let page = Page {
            data: c.clone(),
            current_page: 2,
            last_page: 3,
            prev_page: Some(1),
            next_page: Some(3),
            total: 7,
        };
        let params = ViewParams {
            view_mode: ViewMode::List,
            ..Default::default()
        };
        let view = compute_view(&c, &params);
        let pres = build_presentation(&c, &view, &params, Some(&page), now());
        assert_eq!(pres.view_mode, ViewMode::List);
        assert_eq!(pres.stats.total, 1);
        assert_eq!(pres.title, "Workflows (1 of 1)");
        assert_eq!(
            pres.pagination,
            Some(PaginationInfo {
                current_page: 2,
                last_page: 3,
                total: 7,
                has_prev: true,
                has_next: true,
            })
        );
    }

    #[test]
    fn page_past_end_is_not_an_empty_store() {
        let page = Page {
            data: Vec::new(),
            current_page: 5,
            last_page: 2,
            prev_page: Some(2),
            next_page: None,
            total: 3,
        };
        let params = ViewParams::default();
        let view = compute_view(&[], &params);
        let pres = build_presentation(&[], &view, &params, Some(&page), now());
        assert_eq!(pres.empty_message.as_deref(), Some("No workflows on this page"));
        assert_eq!(pres.pagination.map(|p| p.total), Some(3));

        let page = Page { total: 0, ..page };
        let pres = build_presentation(&[], &view, &params, Some(&page), now());
        assert_eq!(pres.empty_message.as_deref(), Some("No workflows yet"));
    }
}
