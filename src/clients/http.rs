use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::framework::HttpError;
use crate::model::Method;

/// The request shape handed to an [`HttpCaller`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpCall {
    pub method: Method,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// A successful response. `data` is the parsed body (null when empty).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpResponse {
    pub status: u16,
    pub data: Value,
}

impl HttpResponse {
    pub fn ok(data: Value) -> Self {
        Self { status: 200, data }
    }
}

/// Performs HTTP calls for the executors.
///
/// Any network failure or non-success status must come back as `Err`; the
/// executor routes it to the error callback untouched.
#[async_trait]
pub trait HttpCaller: Send + Sync {
    async fn call(&self, request: HttpCall) -> Result<HttpResponse, HttpError>;
}
