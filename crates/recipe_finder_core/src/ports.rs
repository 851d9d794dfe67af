//! crates/recipe_finder_core/src/ports.rs
//!
//! Defines the service contracts (traits) the shim depends on.
//! These traits form the boundary of the hexagonal architecture: the core never
//! talks HTTP or probes the network itself, it only calls through these ports.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{HistoryKind, ImageRef};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors of the transport library.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("Transport failure: {0}")]
    Transport(String),
    #[error("Backend answered with status {0}")]
    Status(u16),
    #[error("Could not decode the backend response: {0}")]
    Decode(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The remote recipe backend, one method per endpoint.
///
/// JSON-returning calls hand back the parsed body as-is; interpreting its
/// shape is the shim's job.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeBackend: Send + Sync {
    /// `POST /search` with a form-encoded `query`.
    async fn search(&self, query: &str) -> PortResult<Value>;

    /// `POST /predict` with every image under the repeated `files` field.
    async fn predict(&self, images: &[ImageRef]) -> PortResult<Value>;

    /// `POST /recommend_llm` with the same multipart layout as `predict`.
    async fn recommend(&self, images: &[ImageRef]) -> PortResult<Value>;

    /// `POST /history/add`. The response body carries nothing the client needs.
    async fn add_history(&self, recipe_name: &str, kind: HistoryKind) -> PortResult<()>;

    /// `GET /history/latest`, a backend-bounded recent subset.
    async fn latest_history(&self) -> PortResult<Value>;

    /// `GET /history`.
    async fn all_history(&self) -> PortResult<Value>;
}

/// Answers whether the network looks usable right now.
///
/// The answer is a snapshot; the connection may change right after it is taken.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    async fn is_reachable(&self) -> bool;
}
