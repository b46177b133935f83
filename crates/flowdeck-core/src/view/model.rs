//! Per-session list state and request delegation.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::{DerivedView, FlowListPresentation, ViewParams, build_presentation, compute_view};
use crate::error::FlowError;
use crate::gateway::{DEFAULT_PER_PAGE, FlowGateway, ListQuery, Page};
use crate::models::{FlowId, FlowRecord, FlowStatus, StatusFilter, ViewMode};

/// Actions the list screen offers on flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum FlowAction {
    Create,
    Duplicate,
    ToggleStatus,
    Delete,
}

impl FlowAction {
    /// Destructive actions need a confirmation step in the display layer.
    pub fn is_destructive(&self) -> bool {
        matches!(self, Self::Delete)
    }

    /// Per-record actions offered on a card.
    pub fn available_for(record: &FlowRecord) -> Vec<FlowAction> {
        let mut actions = vec![Self::Duplicate];
        if record.status.toggled().is_some() {
            actions.push(Self::ToggleStatus);
        }
        actions.push(Self::Delete);
        actions
    }
}

/// Transient state of the "new flow" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateDraft {
    pub open: bool,
    pub name: String,
    pub description: String,
}

/// View model of one workflows-list session.
///
/// Holds the view parameters, the last page loaded from the gateway and the
/// create-form draft. Derived state is recomputed on demand; nothing derived
/// is cached.
pub struct FlowListViewModel<G: FlowGateway> {
    gateway: G,
    per_page: u32,
    params: ViewParams,
    page: Option<Page<FlowRecord>>,
    draft: CreateDraft,
}

impl<G: FlowGateway> FlowListViewModel<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            per_page: DEFAULT_PER_PAGE,
            params: ViewParams::default(),
            page: None,
            draft: CreateDraft::default(),
        }
    }

    /// Sets the page size requested from the gateway (at least 1).
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    /// Starts from the given parameters instead of the defaults.
    pub fn with_params(mut self, params: ViewParams) -> Self {
        self.params = params;
        self.params.page_cursor = self.params.page_cursor.max(1);
        self
    }

    pub fn params(&self) -> &ViewParams {
        &self.params
    }

    /// Last page loaded by [`refresh`](Self::refresh).
    pub fn page(&self) -> Option<&Page<FlowRecord>> {
        self.page.as_ref()
    }

    // ------------------------------------------------------------------
    // View parameters
    // ------------------------------------------------------------------

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.params.search_query = query.into();
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.params.status_filter = filter;
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.params.view_mode = mode;
    }

    pub fn toggle_view_mode(&mut self) {
        self.params.view_mode = self.params.view_mode.toggled();
    }

    /// Moves the page cursor; 0 is treated as 1. Takes effect on the next
    /// [`refresh`](Self::refresh).
    pub fn go_to_page(&mut self, page: u32) {
        self.params.page_cursor = page.max(1);
    }

    /// Follows the loaded page's next cursor. Returns false if there is none.
    pub fn next_page(&mut self) -> bool {
        match self.page.as_ref().and_then(|p| p.next_page) {
            Some(n) => {
                self.go_to_page(n);
                true
            }
            None => false,
        }
    }

    /// Follows the loaded page's previous cursor. Returns false if there is none.
    pub fn prev_page(&mut self) -> bool {
        match self.page.as_ref().and_then(|p| p.prev_page) {
            Some(n) => {
                self.go_to_page(n);
                true
            }
            None => false,
        }
    }

    /// Drops all session state, as when navigating away from the screen.
    pub fn reset(&mut self) {
        self.params = ViewParams::default();
        self.page = None;
        self.draft = CreateDraft::default();
    }

    // ------------------------------------------------------------------
    // Derived state
    // ------------------------------------------------------------------

    /// Records of the loaded page, or an empty slice before the first refresh.
    pub fn records(&self) -> &[FlowRecord] {
        self.page.as_ref().map(|p| p.data.as_slice()).unwrap_or(&[])
    }

    pub fn view(&self) -> DerivedView {
        compute_view(self.records(), &self.params)
    }

    pub fn presentation(&self, now: DateTime<Utc>) -> FlowListPresentation {
        build_presentation(
            self.records(),
            &self.view(),
            &self.params,
            self.page.as_ref(),
            now,
        )
    }

    // ------------------------------------------------------------------
    // Gateway requests
    // ------------------------------------------------------------------

    /// Loads the page at the current cursor.
    pub async fn refresh(&mut self) -> Result<&Page<FlowRecord>, FlowError> {
        let query = ListQuery {
            page: self.params.page_cursor,
            per_page: self.per_page,
        };
        let page = self.gateway.list(&query).await.inspect_err(|e| {
            warn!(page = query.page, error = %e, "failed to load flows");
        })?;
        Ok(&*self.page.insert(page))
    }

    /// Creates a flow.
    ///
    /// A blank name is rejected before the gateway is called and leaves the
    /// draft untouched. Once the gateway answers, the draft is reset whether
    /// the call succeeded or not.
    pub async fn request_create(
        &mut self,
        name: &str,
        description: &str,
    ) -> Result<FlowRecord, FlowError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FlowError::InvalidInput("flow name must not be empty".into()));
        }
        let description = Some(description.trim()).filter(|d| !d.is_empty());

        let result = self.gateway.create(name, description).await;
        self.draft = CreateDraft::default();

        match result {
            Ok(record) => {
                info!(id = %record.id, name = %record.name, "flow created");
                Ok(record)
            }
            Err(e) => {
                warn!(name, error = %e, "create flow failed");
                Err(e.into())
            }
        }
    }

    pub async fn request_delete(&self, id: &FlowId) -> Result<(), FlowError> {
        self.gateway.delete(id).await.inspect_err(|e| {
            warn!(%id, error = %e, "delete flow failed");
        })?;
        info!(%id, "flow deleted");
        Ok(())
    }

    pub async fn request_duplicate(&self, id: &FlowId) -> Result<FlowRecord, FlowError> {
        let copy = self.gateway.duplicate(id).await.inspect_err(|e| {
            warn!(%id, error = %e, "duplicate flow failed");
        })?;
        info!(source = %id, id = %copy.id, "flow duplicated");
        Ok(copy)
    }

    /// Flips a flow between draft and active.
    ///
    /// Any other `current` status is rejected with
    /// [`FlowError::UnsupportedTransition`] and the gateway is not called.
    pub async fn request_toggle_status(
        &self,
        id: &FlowId,
        current: FlowStatus,
    ) -> Result<FlowRecord, FlowError> {
        let target = current
            .toggled()
            .ok_or(FlowError::UnsupportedTransition { from: current })?;
        let updated = self
            .gateway
            .update_status(id, target)
            .await
            .inspect_err(|e| {
                warn!(%id, error = %e, "status update failed");
            })?;
        info!(%id, from = %current, to = %updated.status, "flow status changed");
        Ok(updated)
    }

    /// Toggles a flow using the status held by the store.
    ///
    /// `expected` is the status the caller last saw. If the store disagrees
    /// the request fails with [`FlowError::StaleStatus`] and nothing changes,
    /// so an outdated client can never reactivate an archived flow.
    pub async fn request_toggle_stored(
        &self,
        id: &FlowId,
        expected: FlowStatus,
    ) -> Result<FlowRecord, FlowError> {
        let stored = self.gateway.get(id).await.inspect_err(|e| {
            warn!(%id, error = %e, "failed to load flow");
        })?;
        if stored.status != expected {
            warn!(%id, %expected, stored = %stored.status, "stale status toggle refused");
            return Err(FlowError::StaleStatus {
                expected,
                stored: stored.status,
            });
        }
        self.request_toggle_status(id, stored.status).await
    }

    // ------------------------------------------------------------------
    // Create form
    // ------------------------------------------------------------------

    pub fn open_create(&mut self) {
        self.draft.open = true;
    }

    pub fn cancel_create(&mut self) {
        self.draft = CreateDraft::default();
    }

    pub fn draft(&self) -> &CreateDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut CreateDraft {
        &mut self.draft
    }

    /// Submits the create form with its current values.
    pub async fn submit_draft(&mut self) -> Result<FlowRecord, FlowError> {
        let CreateDraft {
            name, description, ..
        } = self.draft.clone();
        self.request_create(&name, &description).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::GatewayError;
    use crate::gateway::memory::MemoryGateway;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Gateway that counts calls and fails every one of them.
    #[derive(Default)]
    struct FailingGateway {
        calls: AtomicUsize,
    }

    impl FailingGateway {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn fail<T>(&self) -> Result<T, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(GatewayError::Unavailable("connection refused".into()))
        }
    }

    #[async_trait]
    impl FlowGateway for FailingGateway {
        async fn list(&self, _: &ListQuery) -> Result<Page<FlowRecord>, GatewayError> {
            self.fail()
        }
        async fn get(&self, _: &FlowId) -> Result<FlowRecord, GatewayError> {
            self.fail()
        }
        async fn create(&self, _: &str, _: Option<&str>) -> Result<FlowRecord, GatewayError> {
            self.fail()
        }
        async fn delete(&self, _: &FlowId) -> Result<(), GatewayError> {
            self.fail()
        }
        async fn duplicate(&self, _: &FlowId) -> Result<FlowRecord, GatewayError> {
            self.fail()
        }
        async fn update_status(
            &self,
            _: &FlowId,
            _: FlowStatus,
        ) -> Result<FlowRecord, GatewayError> {
            self.fail()
        }
    }

    fn rec(id: &str, status: FlowStatus, minutes_ago: i64) -> FlowRecord {
        let now = Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();
        FlowRecord {
            id: FlowId::from(id),
            name: format!("Flow {id}"),
            description: None,
            status,
            nodes_count: 1,
            edges_count: 0,
            updated_at: now - Duration::minutes(minutes_ago),
        }
    }

    fn seeded(n: usize) -> Arc<MemoryGateway> {
        let records = (0..n)
            .map(|i| rec(&format!("f{i}"), FlowStatus::Draft, i as i64))
            .collect();
        Arc::new(MemoryGateway::with_records(records).unwrap())
    }

    #[tokio::test]
    async fn create_with_empty_name_skips_gateway() {
        let gw = Arc::new(FailingGateway::default());
        let mut vm = FlowListViewModel::new(gw.clone());

        let err = vm.request_create("", "desc").await.unwrap_err();
        assert!(matches!(err, FlowError::InvalidInput(_)));
        let err = vm.request_create("   ", "").await.unwrap_err();
        assert!(err.is_local());
        assert_eq!(gw.calls(), 0);
    }

    #[tokio::test]
    async fn toggle_archived_is_unsupported() {
        let gw = Arc::new(FailingGateway::default());
        let vm = FlowListViewModel::new(gw.clone());

        let err = vm
            .request_toggle_status(&FlowId::from("a"), FlowStatus::Archived)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            FlowError::UnsupportedTransition {
                from: FlowStatus::Archived
            }
        );
        assert_eq!(gw.calls(), 0);
    }

    #[tokio::test]
    async fn gateway_errors_pass_through_unchanged() {
        let gw = Arc::new(FailingGateway::default());
        let mut vm = FlowListViewModel::new(gw.clone());
        let expected = FlowError::Gateway(GatewayError::Unavailable("connection refused".into()));

        assert_eq!(vm.refresh().await.unwrap_err(), expected);
        assert_eq!(vm.request_delete(&FlowId::from("a")).await.unwrap_err(), expected);
        assert_eq!(
            vm.request_duplicate(&FlowId::from("a")).await.unwrap_err(),
            expected
        );
        assert_eq!(
            vm.request_toggle_status(&FlowId::from("a"), FlowStatus::Draft)
                .await
                .unwrap_err(),
            expected
        );
        // One call each, no retries.
        assert_eq!(gw.calls(), 4);
        assert_eq!(expected.to_string(), "record store unavailable: connection refused");
    }

    #[tokio::test]
    async fn failed_create_resets_draft() {
        let gw = Arc::new(FailingGateway::default());
        let mut vm = FlowListViewModel::new(gw.clone());
        vm.open_create();
        vm.draft_mut().name = "Billing".into();
        vm.draft_mut().description = "monthly".into();

        assert!(vm.submit_draft().await.is_err());
        assert_eq!(vm.draft(), &CreateDraft::default());
        assert_eq!(gw.calls(), 1);
    }

    #[tokio::test]
    async fn invalid_create_keeps_draft() {
        let mut vm = FlowListViewModel::new(seeded(0));
        vm.open_create();
        vm.draft_mut().description = "no name yet".into();

        assert!(vm.submit_draft().await.is_err());
        assert!(vm.draft().open);
        assert_eq!(vm.draft().description, "no name yet");
    }

    #[tokio::test]
    async fn create_then_refresh_shows_new_flow() {
        let gw = seeded(2);
        let mut vm = FlowListViewModel::new(gw.clone());
        vm.open_create();
        vm.draft_mut().name = "  Lead scoring ".into();

        let created = vm.submit_draft().await.unwrap();
        assert_eq!(created.name, "Lead scoring");
        assert_eq!(created.description, None);
        assert!(!vm.draft().open);

        vm.refresh().await.unwrap();
        // Newest first.
        assert_eq!(vm.records()[0].id, created.id);
        assert_eq!(vm.view().stats.total, 3);
    }

    #[tokio::test]
    async fn toggle_flips_draft_and_active() {
        let gw = Arc::new(
            MemoryGateway::with_records(vec![
                rec("d", FlowStatus::Draft, 0),
                rec("a", FlowStatus::Active, 1),
            ])
            .unwrap(),
        );
        let vm = FlowListViewModel::new(gw.clone());

        let d = vm
            .request_toggle_status(&FlowId::from("d"), FlowStatus::Draft)
            .await
            .unwrap();
        assert_eq!(d.status, FlowStatus::Active);
        let a = vm
            .request_toggle_status(&FlowId::from("a"), FlowStatus::Active)
            .await
            .unwrap();
        assert_eq!(a.status, FlowStatus::Draft);
    }

    #[tokio::test]
    async fn stored_status_wins_over_caller() {
        let gw = Arc::new(
            MemoryGateway::with_records(vec![
                rec("old", FlowStatus::Archived, 0),
                rec("d", FlowStatus::Draft, 1),
            ])
            .unwrap(),
        );
        let vm = FlowListViewModel::new(gw.clone());

        let err = vm
            .request_toggle_stored(&FlowId::from("old"), FlowStatus::Draft)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            FlowError::StaleStatus {
                expected: FlowStatus::Draft,
                stored: FlowStatus::Archived
            }
        );
        let err = vm
            .request_toggle_stored(&FlowId::from("old"), FlowStatus::Archived)
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::UnsupportedTransition { .. }));
        assert_eq!(
            gw.get(&FlowId::from("old")).await.unwrap().status,
            FlowStatus::Archived
        );

        let d = vm
            .request_toggle_stored(&FlowId::from("d"), FlowStatus::Draft)
            .await
            .unwrap();
        assert_eq!(d.status, FlowStatus::Active);
        assert!(matches!(
            vm.request_toggle_stored(&FlowId::from("nope"), FlowStatus::Draft)
                .await,
            Err(FlowError::Gateway(GatewayError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn delete_and_duplicate_delegate() {
        let gw = seeded(2);
        let vm = FlowListViewModel::new(gw.clone());

        let copy = vm.request_duplicate(&FlowId::from("f0")).await.unwrap();
        assert_eq!(gw.len().await, 3);
        vm.request_delete(&copy.id).await.unwrap();
        vm.request_delete(&FlowId::from("f1")).await.unwrap();
        assert_eq!(gw.len().await, 1);
        assert!(matches!(
            vm.request_delete(&FlowId::from("f1")).await,
            Err(FlowError::Gateway(GatewayError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn pagination_follows_cursors() {
        let mut vm = FlowListViewModel::new(seeded(5)).with_per_page(2);
        assert!(!vm.next_page(), "no page loaded yet");

        vm.refresh().await.unwrap();
        assert_eq!(vm.records().len(), 2);
        assert!(!vm.prev_page());

        assert!(vm.next_page());
        assert_eq!(vm.params().page_cursor, 2);
        vm.refresh().await.unwrap();
        assert!(vm.next_page());
        vm.refresh().await.unwrap();
        assert_eq!(vm.records().len(), 1);
        assert!(!vm.next_page());
        assert_eq!(vm.params().page_cursor, 3);

        assert!(vm.prev_page());
        assert_eq!(vm.params().page_cursor, 2);
    }

    #[test]
    fn page_cursor_never_zero() {
        let mut vm = FlowListViewModel::new(Arc::new(MemoryGateway::new()));
        vm.go_to_page(0);
        assert_eq!(vm.params().page_cursor, 1);
        let vm = FlowListViewModel::new(Arc::new(MemoryGateway::new())).with_params(ViewParams {
            page_cursor: 0,
            ..Default::default()
        });
        assert_eq!(vm.params().page_cursor, 1);
    }

    #[tokio::test]
    async fn view_stats_cover_whole_page() {
        let gw = Arc::new(
            MemoryGateway::with_records(vec![
                rec("a", FlowStatus::Active, 0),
                rec("b", FlowStatus::Draft, 1),
                rec("c", FlowStatus::Active, 2),
            ])
            .unwrap(),
        );
        let mut vm = FlowListViewModel::new(gw);
        vm.refresh().await.unwrap();
        vm.set_status_filter(StatusFilter::Draft);
        vm.set_search("flow b");

        let view = vm.view();
        assert_eq!(view.visible_records.len(), 1);
        assert_eq!(view.stats.total, 3);
        assert_eq!(view.stats.active, 2);
        assert_eq!(view.stats.draft, 1);
    }

    #[tokio::test]
    async fn reset_drops_session_state() {
        let mut vm = FlowListViewModel::new(seeded(3));
        vm.refresh().await.unwrap();
        vm.set_search("x");
        vm.toggle_view_mode();
        vm.go_to_page(4);
        vm.open_create();

        vm.reset();
        assert_eq!(vm.params(), &ViewParams::default());
        assert!(vm.page().is_none());
        assert!(vm.records().is_empty());
        assert!(!vm.draft().open);
    }

    #[test]
    fn only_delete_is_destructive() {
        assert!(FlowAction::Delete.is_destructive());
        assert!(!FlowAction::Create.is_destructive());
        assert!(!FlowAction::Duplicate.is_destructive());
        assert!(!FlowAction::ToggleStatus.is_destructive());
    }

    #[test]
    fn archived_cards_have_no_toggle() {
        assert_eq!(
            FlowAction::available_for(&rec("a", FlowStatus::Archived, 0)),
            vec![FlowAction::Duplicate, FlowAction::Delete]
        );
        assert_eq!(
            FlowAction::available_for(&rec("a", FlowStatus::Active, 0)),
            vec![
                FlowAction::Duplicate,
                FlowAction::ToggleStatus,
                FlowAction::Delete
            ]
        );
    }
}
