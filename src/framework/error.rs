//! Error types shared by the module builder, the executors and the store.

use thiserror::Error;

/// Errors produced by the HTTP layer.
///
/// These are handed to the error callback as-is; the executor never normalizes them.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum HttpError {
    /// The request never produced a response (connection refused, DNS, reset...).
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: serde_json::Value },

    /// The response body could not be read.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The request URL could not be resolved against the base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Errors raised while building or running a store module.
///
/// Everything except [`ModuleError::Http`] is a configuration error: it is raised
/// immediately and is not recoverable inside the action that hit it.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ModuleError {
    #[error("Unknown action kind: {0}")]
    UnknownActionKind(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Unknown module: {0}")]
    UnknownModule(String),

    #[error("Unknown mutation: {0}")]
    UnknownMutation(String),

    /// A collection mutation found something other than an array under its state key.
    #[error("{mutation}: state '{key}' is not a sequence")]
    CollectionNotSequence { mutation: String, key: String },

    /// The input data cannot be used as a URL id segment.
    #[error("{kind}: invalid id {value}")]
    InvalidId { kind: String, value: serde_json::Value },

    #[error("Input data has no usable '{0}' attribute")]
    MissingIdAttribute(String),

    #[error("Builder has no resource")]
    MissingResource,

    #[error("Store closed")]
    StoreClosed,

    #[error("Store dropped response channel")]
    StoreDropped,

    #[error("Store task failed: {0}")]
    TaskFailed(String),

    /// Only surfaced when the builder was configured to propagate HTTP failures.
    #[error(transparent)]
    Http(#[from] HttpError),
}
