use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::clients::HttpCaller;
use crate::framework::{HttpError, ModuleError};
use crate::model::{
    base_request, default_request, ActionKind, CustomRequestHook, RequestDescriptor, ResourceDescriptor,
};

/// `(kind, mapped_state_payload, resource)`
pub type SuccessHook = Arc<dyn Fn(ActionKind, &Value, &str) + Send + Sync>;

/// `(kind, error, resource)`
pub type ErrorHook = Arc<dyn Fn(ActionKind, &HttpError, &str) + Send + Sync>;

/// Everything an executor needs, shared read-only by the five executors of a module.
#[derive(Clone)]
pub struct ModuleConfig {
    pub resource: ResourceDescriptor,
    pub id_attribute: String,
    pub http: Arc<dyn HttpCaller>,
    pub commit_state: bool,
    /// Return HTTP failures as `Err` (after the error hook) instead of `Ok(None)`.
    pub propagate_errors: bool,
    pub custom_request: Option<CustomRequestHook>,
    pub on_success: Option<SuccessHook>,
    pub on_error: Option<ErrorHook>,
}

impl ModuleConfig {
    /// Generate the request for one invocation. Without a custom hook this is the
    /// default shape for `kind`, and an unusable id is an error. With a hook, the
    /// hook gets a best-effort default and has the final word.
    pub fn request(&self, kind: ActionKind, input: &Value) -> Result<RequestDescriptor, ModuleError> {
        let resource = self.resource.name();
        match &self.custom_request {
            Some(hook) => {
                let base = base_request(resource, kind, input, &self.id_attribute);
                Ok(hook(base, resource, kind, input))
            }
            None => default_request(resource, kind, input, &self.id_attribute),
        }
    }
}

impl fmt::Debug for ModuleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleConfig")
            .field("resource", &self.resource)
            .field("id_attribute", &self.id_attribute)
            .field("commit_state", &self.commit_state)
            .field("propagate_errors", &self.propagate_errors)
            .field("custom_request", &self.custom_request.is_some())
            .finish_non_exhaustive()
    }
}
