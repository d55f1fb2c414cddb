//! # Module Builder
//!
//! A [`ModuleBuilder`] is a template: HTTP caller, id attribute, flags, hooks and
//! any extra state/actions/mutations. [`ModuleBuilder::create`] copies the template,
//! attaches a fresh [`ResourceDescriptor`] and emits a [`ModuleDescriptor`], so
//! modules built from the same template never share naming or state.
//!
//! ```ignore
//! let template = ModuleBuilder::default()
//!     .id_attribute("uuid")
//!     .on_error(|kind, error, resource| eprintln!("{resource} {kind}: {error}"));
//!
//! let users = template.create("users");
//! let products = template.create("products");
//! ```

mod mutations;

pub use mutations::default_mutations;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::clients::{HttpCaller, ReqwestCaller};
use crate::executor::{ActionExecutor, ErrorHook, ModuleConfig, SuccessHook};
use crate::framework::{HttpError, ModuleError};
use crate::model::{
    derive_names, Action, ActionKind, CustomRequestHook, ModuleDescriptor, Mutation,
    RequestDescriptor, ResourceDescriptor, State,
};

#[derive(Clone)]
pub struct ModuleBuilder {
    resource: Option<ResourceDescriptor>,
    http: Arc<dyn HttpCaller>,
    id_attribute: String,
    commit_state: bool,
    propagate_errors: bool,
    custom_request: Option<CustomRequestHook>,
    on_success: Option<SuccessHook>,
    on_error: Option<ErrorHook>,
    state: State,
    actions: BTreeMap<String, Action>,
    mutations: BTreeMap<String, Mutation>,
}

impl ModuleBuilder {
    pub fn new(http: Arc<dyn HttpCaller>) -> Self {
        Self {
            resource: None,
            http,
            id_attribute: "id".to_string(),
            commit_state: true,
            propagate_errors: false,
            custom_request: None,
            on_success: None,
            on_error: None,
            state: State::new(),
            actions: BTreeMap::new(),
            mutations: BTreeMap::new(),
        }
    }

    pub fn http_caller(mut self, http: Arc<dyn HttpCaller>) -> Self {
        self.http = http;
        self
    }

    pub fn id_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.id_attribute = attribute.into();
        self
    }

    /// When false, actions still call the API but leave resource state alone.
    pub fn commit_state(mut self, enabled: bool) -> Self {
        self.commit_state = enabled;
        self
    }

    /// Return HTTP failures from actions as `Err(ModuleError::Http)` in addition to
    /// reporting them to the error hook. Off by default.
    pub fn propagate_errors(mut self, enabled: bool) -> Self {
        self.propagate_errors = enabled;
        self
    }

    pub fn custom_request(
        mut self,
        hook: impl Fn(RequestDescriptor, &str, ActionKind, &Value) -> RequestDescriptor
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.custom_request = Some(Arc::new(hook));
        self
    }

    pub fn on_success(
        mut self,
        hook: impl Fn(ActionKind, &Value, &str) + Send + Sync + 'static,
    ) -> Self {
        self.on_success = Some(Arc::new(hook));
        self
    }

    pub fn on_error(
        mut self,
        hook: impl Fn(ActionKind, &HttpError, &str) + Send + Sync + 'static,
    ) -> Self {
        self.on_error = Some(Arc::new(hook));
        self
    }

    /// Extra state; replaces a generated key of the same name.
    pub fn state(mut self, key: impl Into<String>, initial: Value) -> Self {
        self.state.insert(key.into(), initial);
        self
    }

    /// Extra action; replaces a generated action of the same name.
    pub fn action(mut self, name: impl Into<String>, action: Action) -> Self {
        self.actions.insert(name.into(), action);
        self
    }

    /// Extra mutation; replaces a generated mutation of the same name.
    pub fn mutation(mut self, name: impl Into<String>, mutation: Mutation) -> Self {
        self.mutations.insert(name.into(), mutation);
        self
    }

    pub fn resource(&self) -> Option<&ResourceDescriptor> {
        self.resource.as_ref()
    }

    /// A copy of this template bound to `name`. The template itself is untouched.
    pub fn with_resource(&self, name: &str) -> Self {
        let mut builder = self.clone();
        builder.resource = Some(ResourceDescriptor::new(name));
        builder
    }

    /// Copy the template for `name` and build its module.
    pub fn create(&self, name: &str) -> ModuleDescriptor {
        let resource = ResourceDescriptor::new(name);
        self.build_for(&resource)
    }

    /// Build the module for the bound resource.
    pub fn build_module(&self) -> Result<ModuleDescriptor, ModuleError> {
        self.resource
            .as_ref()
            .map(|resource| self.build_for(resource))
            .ok_or(ModuleError::MissingResource)
    }

    fn config(&self, resource: &ResourceDescriptor) -> ModuleConfig {
        ModuleConfig {
            resource: resource.clone(),
            id_attribute: self.id_attribute.clone(),
            http: Arc::clone(&self.http),
            commit_state: self.commit_state,
            propagate_errors: self.propagate_errors,
            custom_request: self.custom_request.clone(),
            on_success: self.on_success.clone(),
            on_error: self.on_error.clone(),
        }
    }

    // Merge order, later wins: executor contributions and the generated state,
    // default mutations, then user state, actions and mutations.
    fn build_for(&self, resource: &ResourceDescriptor) -> ModuleDescriptor {
        let names = derive_names(resource);
        let config = Arc::new(self.config(resource));
        let mut module = ModuleDescriptor::new();

        module.state.insert(names.items_key.clone(), Value::Null);
        module.state.insert(names.current_key.clone(), Value::Null);
        for kind in ActionKind::ALL {
            let executor = ActionExecutor::new(kind, &names, Arc::clone(&config));
            module.state.extend(executor.state());
            module.actions.extend(executor.actions());
            module.mutations.extend(executor.mutations());
        }
        module
            .mutations
            .extend(default_mutations(&names, &self.id_attribute));

        module.state.extend(self.state.clone());
        module.actions.extend(self.actions.clone());
        module.mutations.extend(self.mutations.clone());

        debug!(
            resource = resource.name(),
            state = module.state.len(),
            actions = module.actions.len(),
            mutations = module.mutations.len(),
            "Module built"
        );
        module
    }
}

impl Default for ModuleBuilder {
    /// Uses a [`ReqwestCaller`] configured from the environment, or one without a
    /// base URL when the environment is invalid.
    fn default() -> Self {
        let caller = ReqwestCaller::from_env().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Ignoring invalid HTTP client environment");
            ReqwestCaller::new(Default::default())
        });
        Self::new(Arc::new(caller))
    }
}

impl fmt::Debug for ModuleBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleBuilder")
            .field("resource", &self.resource)
            .field("id_attribute", &self.id_attribute)
            .field("commit_state", &self.commit_state)
            .field("propagate_errors", &self.propagate_errors)
            .field("state", &self.state)
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .field("mutations", &self.mutations.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::{MockHttpCaller, RecordingStore};
    use crate::model::{self, Method, StoreContext};
    use serde_json::json;
    use std::sync::Mutex;

    fn template() -> ModuleBuilder {
        ModuleBuilder::new(Arc::new(MockHttpCaller::new()))
    }

    fn keys<V>(map: &BTreeMap<String, V>) -> Vec<&str> {
        map.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_generated_module_shape() {
        let module = template().create("users");

        assert!(module.namespaced);
        assert!(module.getters.is_empty());
        assert_eq!(module.state["users"], Value::Null);
        assert_eq!(module.state["currentUser"], Value::Null);
        for flag in [
            "fetchUsersLoading",
            "getUserLoading",
            "createUserLoading",
            "updateUserLoading",
            "deleteUserLoading",
        ] {
            assert_eq!(module.state[flag], Value::Null, "{}", flag);
        }
        assert_eq!(
            keys(&module.actions),
            vec!["createUser", "deleteUser", "fetchUsers", "getUser", "updateUser"]
        );
        assert_eq!(
            keys(&module.mutations),
            vec![
                "ADD_USER",
                "DELETE_USER",
                "SET_CREATE_USER_LOADING",
                "SET_CURRENT_USER",
                "SET_DELETE_USER_LOADING",
                "SET_FETCH_USERS_LOADING",
                "SET_GET_USER_LOADING",
                "SET_UPDATE_USER_LOADING",
                "SET_USERS",
                "UPDATE_USER",
            ]
        );
    }

    #[test]
    fn test_singular_resource_name() {
        let module = template().create("category");
        assert!(module.state.contains_key("categories"));
        assert!(module.state.contains_key("currentCategory"));
        assert!(module.actions.contains_key("fetchCategories"));
        assert!(module.mutations.contains_key("SET_CATEGORIES"));
    }

    #[test]
    fn test_modules_from_one_template_are_independent() {
        let template = template().state("filter", json!(null));
        let users = template.create("users");
        let products = template.create("products");

        assert!(users.state.contains_key("users"));
        assert!(!users.state.contains_key("products"));
        assert!(products.state.contains_key("currentProduct"));
        assert!(!products.actions.contains_key("fetchUsers"));
        assert!(template.resource().is_none());
    }

    #[test]
    fn test_building_twice_is_structurally_identical() {
        let template = template();
        let first = template.with_resource("users").build_module().unwrap();
        let second = template.with_resource("users").build_module().unwrap();

        assert_eq!(first.state, second.state);
        assert_eq!(keys(&first.actions), keys(&second.actions));
        assert_eq!(keys(&first.mutations), keys(&second.mutations));
    }

    #[test]
    fn test_build_module_requires_resource() {
        assert_eq!(template().build_module().unwrap_err(), ModuleError::MissingResource);
    }

    #[test]
    fn test_user_state_and_actions_override_defaults() {
        let replaced = model::action(|_ctx, _input| async { Ok(Some(json!("custom"))) });
        let module = template()
            .state("users", json!([]))
            .state("filter", json!("all"))
            .action("fetchUsers", replaced)
            .create("users");

        assert_eq!(module.state["users"], json!([]));
        assert_eq!(module.state["filter"], json!("all"));
        assert_eq!(module.action_names().count(), 5);
        assert_eq!(module.mutation_names().count(), 10);
    }

    #[tokio::test]
    async fn test_overridden_action_is_the_one_dispatched() {
        let replaced = model::action(|ctx: Arc<dyn StoreContext>, input| async move {
            ctx.commit("SET_USERS", model::Commit::payload(json!([input]))).await?;
            Ok::<_, ModuleError>(None)
        });
        let module = template().action("fetchUsers", replaced).create("users");
        let store = Arc::new(RecordingStore::from_module(&module));

        let result = module.actions["fetchUsers"](store.clone(), json!({"id": 1})).await;
        assert_eq!(result, Ok(None));
        assert_eq!(store.state()["users"], json!([{"id": 1}]));
        assert_eq!(store.mutation_log(), vec!["SET_USERS"]);
    }

    #[tokio::test]
    async fn test_template_hooks_reach_every_module() {
        let mock = Arc::new(MockHttpCaller::new());
        mock.expect(Method::Get, "/users").return_ok(json!([]));
        mock.expect(Method::Get, "/products").return_ok(json!([]));

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let template = ModuleBuilder::new(mock.clone())
            .on_success(move |kind, _payload, resource| {
                sink.lock().unwrap().push(format!("{}:{}", resource, kind));
            });

        for (name, action) in [("users", "fetchUsers"), ("products", "fetchProducts")] {
            let module = template.create(name);
            let store = Arc::new(RecordingStore::from_module(&module));
            module.actions[action](store, Value::Null).await.unwrap();
        }

        assert_eq!(
            *seen.lock().unwrap(),
            vec!["users:fetch-items", "products:fetch-items"]
        );
        mock.verify();
    }

    #[tokio::test]
    async fn test_custom_id_attribute_flows_to_requests_and_mutations() {
        let mock = Arc::new(MockHttpCaller::new());
        mock.expect(Method::Put, "/users/u-1")
            .return_ok(json!({"uuid": "u-1", "name": "new"}));
        let module = ModuleBuilder::new(mock.clone())
            .id_attribute("uuid")
            .create("users");
        let store = Arc::new(RecordingStore::from_module(&module));
        store.set("users", json!([{"uuid": "u-1", "name": "old"}]));

        module.actions["updateUser"](store.clone(), json!({"uuid": "u-1", "name": "new"}))
            .await
            .unwrap();
        assert_eq!(store.state()["users"], json!([{"uuid": "u-1", "name": "new"}]));
    }
}
