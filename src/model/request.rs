//! Action kinds and the HTTP request descriptors generated for them.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::clients::HttpCall;
use crate::framework::ModuleError;

/// The five default CRUD operations. Determines HTTP method and URL shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    FetchItems,
    GetItem,
    CreateItem,
    UpdateItem,
    DeleteItem,
}

impl ActionKind {
    pub const ALL: [ActionKind; 5] = [
        ActionKind::FetchItems,
        ActionKind::GetItem,
        ActionKind::CreateItem,
        ActionKind::UpdateItem,
        ActionKind::DeleteItem,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            ActionKind::FetchItems => 0,
            ActionKind::GetItem => 1,
            ActionKind::CreateItem => 2,
            ActionKind::UpdateItem => 3,
            ActionKind::DeleteItem => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::FetchItems => "fetch-items",
            ActionKind::GetItem => "get-item",
            ActionKind::CreateItem => "create-item",
            ActionKind::UpdateItem => "update-item",
            ActionKind::DeleteItem => "delete-item",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = ModuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ModuleError::UnknownActionKind(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Maps a response body to the value committed to state or returned to the caller.
pub type ResponseMapper = Arc<dyn Fn(Value) -> Value + Send + Sync>;

pub fn identity() -> ResponseMapper {
    Arc::new(|value: Value| value)
}

/// Fully specified HTTP call for one action invocation, plus its response mappers.
#[derive(Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: String,
    pub params: Option<Map<String, Value>>,
    pub data: Option<Value>,
    /// Response body -> payload committed to state and passed to the success callback.
    pub map_state: ResponseMapper,
    /// Response body -> value returned to the caller of the action.
    pub map_data: ResponseMapper,
}

impl RequestDescriptor {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            params: None,
            data: None,
            map_state: identity(),
            map_data: identity(),
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_params(mut self, params: Map<String, Value>) -> Self {
        self.params = Some(params);
        self
    }

    pub fn map_state(mut self, f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        self.map_state = Arc::new(f);
        self
    }

    pub fn map_data(mut self, f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        self.map_data = Arc::new(f);
        self
    }

    pub fn to_call(&self) -> HttpCall {
        HttpCall {
            method: self.method,
            url: self.url.clone(),
            params: self.params.clone(),
            data: self.data.clone(),
        }
    }
}

impl fmt::Debug for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestDescriptor")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("params", &self.params)
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}

/// Replaces the generated descriptor: `(default, resource, kind, input) -> descriptor`.
pub type CustomRequestHook =
    Arc<dyn Fn(RequestDescriptor, &str, ActionKind, &Value) -> RequestDescriptor + Send + Sync>;

fn id_segment(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn item_id(kind: ActionKind, input: &Value, id_attribute: &str) -> Option<String> {
    match kind {
        ActionKind::FetchItems | ActionKind::CreateItem => None,
        ActionKind::GetItem | ActionKind::DeleteItem => id_segment(input),
        ActionKind::UpdateItem => input.get(id_attribute).and_then(id_segment),
    }
}

fn request_shape(resource: &str, kind: ActionKind, input: &Value, id: &str) -> RequestDescriptor {
    match kind {
        ActionKind::FetchItems => RequestDescriptor::new(Method::Get, format!("/{}", resource)),
        ActionKind::GetItem => RequestDescriptor::new(Method::Get, format!("/{}/{}", resource, id)),
        ActionKind::CreateItem => {
            RequestDescriptor::new(Method::Post, format!("/{}", resource)).with_data(input.clone())
        }
        ActionKind::UpdateItem => RequestDescriptor::new(Method::Put, format!("/{}/{}", resource, id))
            .with_data(input.clone()),
        ActionKind::DeleteItem => {
            RequestDescriptor::new(Method::Delete, format!("/{}/{}", resource, id))
        }
    }
}

/// Builds the default descriptor for `kind`.
///
/// get/delete take the id itself as input; update reads it from `input[id_attribute]`.
/// An id that is not a string or number fails here, before any call is made.
pub fn default_request(
    resource: &str,
    kind: ActionKind,
    input: &Value,
    id_attribute: &str,
) -> Result<RequestDescriptor, ModuleError> {
    let id = match kind {
        ActionKind::FetchItems | ActionKind::CreateItem => String::new(),
        ActionKind::GetItem | ActionKind::DeleteItem => {
            item_id(kind, input, id_attribute).ok_or_else(|| ModuleError::InvalidId {
                kind: kind.to_string(),
                value: input.clone(),
            })?
        }
        ActionKind::UpdateItem => item_id(kind, input, id_attribute)
            .ok_or_else(|| ModuleError::MissingIdAttribute(id_attribute.to_string()))?,
    };
    Ok(request_shape(resource, kind, input, &id))
}

/// The descriptor handed to a custom request hook. Never fails: an unusable id
/// leaves an empty segment (`/users/`) for the hook to replace.
pub fn base_request(
    resource: &str,
    kind: ActionKind,
    input: &Value,
    id_attribute: &str,
) -> RequestDescriptor {
    let id = item_id(kind, input, id_attribute).unwrap_or_default();
    request_shape(resource, kind, input, &id)
}
