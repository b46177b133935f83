//! Record Store abstraction.
//!
//! This module defines the `FlowGateway` trait through which the view model
//! reads and mutates flow records. The view model never talks to storage
//! directly; any backend (HTTP client, database, in-process store) plugs in
//! here.
//!
//! Gateway calls are the only asynchronous boundary of the crate. The view
//! model issues one call per user action and does not retry, order, or cancel
//! them.

#[cfg(feature = "memory")]
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{FlowId, FlowRecord, FlowStatus};

/// Default page size when none is configured.
pub const DEFAULT_PER_PAGE: u32 = 12;

/// Errors a Record Store can return.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// No record with this id.
    #[error("flow {0} not found")]
    NotFound(FlowId),
    /// The store refused the request (validation, conflict).
    #[error("request rejected: {0}")]
    Rejected(String),
    /// The store could not be reached or failed internally.
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

/// Parameters of a `list` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    /// 1-based page number.
    pub page: u32,
    pub per_page: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// One page of results with its navigation cursors.
///
/// The view model treats the cursors as opaque and only reports whether
/// they are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub current_page: u32,
    pub last_page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page: Option<u32>,
    /// Total number of records across all pages.
    pub total: usize,
}

impl<T> Page<T> {
    pub fn has_prev(&self) -> bool {
        self.prev_page.is_some()
    }

    pub fn has_next(&self) -> bool {
        self.next_page.is_some()
    }
}

/// Data-access boundary for flow records.
///
/// Implementations must be shareable across tasks; the trait is object-safe
/// and works with `Arc<dyn FlowGateway>`.
#[async_trait]
pub trait FlowGateway: Send + Sync {
    /// Returns one page of records in the store's display order.
    async fn list(&self, query: &ListQuery) -> Result<Page<FlowRecord>, GatewayError>;

    /// Returns the stored record with `id`.
    async fn get(&self, id: &FlowId) -> Result<FlowRecord, GatewayError>;

    /// Creates a new flow.
    async fn create(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<FlowRecord, GatewayError>;

    /// Deletes a flow.
    async fn delete(&self, id: &FlowId) -> Result<(), GatewayError>;

    /// Creates a copy of a flow and returns the copy.
    async fn duplicate(&self, id: &FlowId) -> Result<FlowRecord, GatewayError>;

    /// Sets a flow's status and returns the updated record.
    async fn update_status(
        &self,
        id: &FlowId,
        status: FlowStatus,
    ) -> Result<FlowRecord, GatewayError>;
}

#[async_trait]
impl<G: FlowGateway + ?Sized> FlowGateway for Arc<G> {
    async fn list(&self, query: &ListQuery) -> Result<Page<FlowRecord>, GatewayError> {
        (**self).list(query).await
    }

    async fn get(&self, id: &FlowId) -> Result<FlowRecord, GatewayError> {
        (**self).get(id).await
    }

    async fn create(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<FlowRecord, GatewayError> {
        (**self).create(name, description).await
    }

    async fn delete(&self, id: &FlowId) -> Result<(), GatewayError> {
        (**self).delete(id).await
    }

    async fn duplicate(&self, id: &FlowId) -> Result<FlowRecord, GatewayError> {
        (**self).duplicate(id).await
    }

    async fn update_status(
        &self,
        id: &FlowId,
        status: FlowStatus,
    ) -> Result<FlowRecord, GatewayError> {
        (**self).update_status(id, status).await
    }
}
