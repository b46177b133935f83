//! In-process Record Store.
//!
//! Keeps flow records in memory behind an async `RwLock`. Used by the web
//! server (optionally seeded from a JSON file) and by tests.

use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::{FlowGateway, GatewayError, ListQuery, Page};
use crate::models::{FlowId, FlowRecord, FlowStatus};

/// Error loading seed records.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse seed file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid seed record: {0}")]
    Invalid(String),
}

/// Record Store holding all flows in memory.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    records: RwLock<Vec<FlowRecord>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `records`.
    ///
    /// Records with an empty name or a repeated id are rejected.
    pub fn with_records(records: Vec<FlowRecord>) -> Result<Self, SeedError> {
        let mut seen = std::collections::HashSet::new();
        for rec in &records {
            if rec.name.trim().is_empty() {
                return Err(SeedError::Invalid(format!("flow {} has an empty name", rec.id)));
            }
            if !seen.insert(rec.id.clone()) {
                return Err(SeedError::Invalid(format!("duplicate flow id {}", rec.id)));
            }
        }
        Ok(Self {
            records: RwLock::new(records),
        })
    }

    /// Loads a JSON array of flow records.
    pub fn from_json_file(path: &Path) -> Result<Self, SeedError> {
        let raw = std::fs::read_to_string(path)?;
        let records: Vec<FlowRecord> = serde_json::from_str(&raw)?;
        info!(path = %path.display(), count = records.len(), "loaded seed flows");
        Self::with_records(records)
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

fn new_id() -> FlowId {
    FlowId(Uuid::new_v4().to_string())
}

#[async_trait]
impl FlowGateway for MemoryGateway {
    async fn list(&self, query: &ListQuery) -> Result<Page<FlowRecord>, GatewayError> {
        let per_page = query.per_page.max(1);
        let page = query.page.max(1);

        let mut sorted = self.records.read().await.clone();
        // Stable: records with equal timestamps keep insertion order.
        sorted.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        let total = sorted.len();
        let last_page = total.div_ceil(per_page as usize).max(1) as u32;
        let start = (page as usize - 1).saturating_mul(per_page as usize);
        let data: Vec<FlowRecord> = sorted
            .into_iter()
            .skip(start)
            .take(per_page as usize)
            .collect();

        debug!(page, per_page, total, returned = data.len(), "list flows");

        Ok(Page {
            data,
            current_page: page,
            last_page,
            prev_page: (page > 1).then(|| (page - 1).min(last_page)),
            next_page: (page < last_page).then_some(page + 1),
            total,
        })
    }

    async fn get(&self, id: &FlowId) -> Result<FlowRecord, GatewayError> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| &r.id == id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(id.clone()))
    }

    async fn create(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<FlowRecord, GatewayError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GatewayError::Rejected("name must not be empty".into()));
        }
        let record = FlowRecord {
            id: new_id(),
            name: name.to_string(),
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            status: FlowStatus::Draft,
            nodes_count: 0,
            edges_count: 0,
            updated_at: Utc::now(),
        };
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn delete(&self, id: &FlowId) -> Result<(), GatewayError> {
        let mut records = self.records.write().await;
        let idx = records
            .iter()
            .position(|r| &r.id == id)
            .ok_or_else(|| GatewayError::NotFound(id.clone()))?;
        records.remove(idx);
        Ok(())
    }

    async fn duplicate(&self, id: &FlowId) -> Result<FlowRecord, GatewayError> {
        let mut records = self.records.write().await;
        let source = records
            .iter()
            .find(|r| &r.id == id)
            .ok_or_else(|| GatewayError::NotFound(id.clone()))?;
        let copy = FlowRecord {
            id: new_id(),
            name: format!("{} (copy)", source.name),
            description: source.description.clone(),
            status: FlowStatus::Draft,
            nodes_count: source.nodes_count,
            edges_count: source.edges_count,
            updated_at: Utc::now(),
        };
        records.push(copy.clone());
        Ok(copy)
    }

    async fn update_status(
        &self,
        id: &FlowId,
        status: FlowStatus,
    ) -> Result<FlowRecord, GatewayError> {
        let mut records = self.records.write().await;
        let rec = records
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| GatewayError::NotFound(id.clone()))?;
        rec.status = status;
        rec.updated_at = Utc::now();
        Ok(rec.clone())
    }
}
