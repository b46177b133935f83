//! Flow records and the enums the list screen filters on.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque record identifier, stable for the record's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
#[serde(transparent)]
pub struct FlowId(pub String);

impl FlowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FlowId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Lifecycle status of a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum FlowStatus {
    #[default]
    Draft,
    Active,
    Archived,
}

impl FlowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }

    /// Status after the draft/active toggle. `None` for statuses the toggle
    /// does not cover.
    pub fn toggled(&self) -> Option<FlowStatus> {
        match self {
            Self::Draft => Some(Self::Active),
            Self::Active => Some(Self::Draft),
            Self::Archived => None,
        }
    }
}

impl fmt::Display for FlowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-authored automation record as returned by the Record Store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
pub struct FlowRecord {
    pub id: FlowId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: FlowStatus,
    #[serde(default)]
    pub nodes_count: u32,
    #[serde(default)]
    pub edges_count: u32,
    pub updated_at: DateTime<Utc>,
}

impl FlowRecord {
    /// Description or `""` when absent.
    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// Status filter selected on the list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Draft,
    Active,
    Archived,
}

impl StatusFilter {
    pub fn matches(&self, status: FlowStatus) -> bool {
        match self {
            Self::All => true,
            Self::Draft => status == FlowStatus::Draft,
            Self::Active => status == FlowStatus::Active,
            Self::Archived => status == FlowStatus::Archived,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }
}

impl From<FlowStatus> for StatusFilter {
    fn from(status: FlowStatus) -> Self {
        match status {
            FlowStatus::Draft => Self::Draft,
            FlowStatus::Active => Self::Active,
            FlowStatus::Archived => Self::Archived,
        }
    }
}

/// Layout of the list screen. Does not affect which records are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    /// Returns the other layout.
    pub fn toggled(&self) -> ViewMode {
        match self {
            Self::Grid => Self::List,
            Self::List => Self::Grid,
        }
    }
}
