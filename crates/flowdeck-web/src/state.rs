//! Shared application state.

use std::sync::Arc;

use axum::extract::State;

use flowdeck_core::gateway::FlowGateway;
use flowdeck_core::view::{FlowListViewModel, ViewParams};

pub(crate) struct WebApp {
    pub(crate) gateway: Arc<dyn FlowGateway>,
    /// Page size requested from the gateway.
    pub(crate) per_page: u32,
}

impl WebApp {
    /// Fresh view model for one request, starting from `params`.
    pub(crate) fn view_model(&self, params: ViewParams) -> FlowListViewModel<Arc<dyn FlowGateway>> {
        FlowListViewModel::new(self.gateway.clone())
            .with_per_page(self.per_page)
            .with_params(params)
    }
}

pub(crate) type SharedState = Arc<WebApp>;

pub(crate) type AppState = State<SharedState>;
