//! Errors surfaced to the display layer.

use thiserror::Error;

use crate::gateway::GatewayError;
use crate::models::FlowStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    /// Request rejected locally, before reaching the gateway.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Status toggle requested from a status the toggle does not cover.
    #[error("unsupported status transition from {from}")]
    UnsupportedTransition { from: FlowStatus },
    /// The caller's view of a flow's status no longer matches the store.
    #[error("flow status is {stored}, not {expected}")]
    StaleStatus {
        expected: FlowStatus,
        stored: FlowStatus,
    },
    /// Gateway failure, passed through unchanged.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl FlowError {
    /// True if the request was refused without the gateway changing anything.
    pub fn is_local(&self) -> bool {
        !matches!(self, Self::Gateway(_))
    }
}
