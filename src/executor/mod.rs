//! # Action Executor
//!
//! One [`ActionExecutor`] per (resource, [`ActionKind`]) pair. It owns the only
//! asynchronous step of the system: the HTTP call.
//!
//! ## Pipeline
//!
//! 1. Commit the loading mutation with `true`.
//! 2. Generate the request (default shape, then the custom hook).
//! 3. Perform the call.
//! 4. On success: commit the primary mutation (if state commits are enabled),
//!    call the success hook, return the data-mapped body.
//! 5. On failure: call the error hook and resolve with `Ok(None)`.
//! 6. Always commit the loading mutation with `false`.
//!
//! Configuration errors (bad ids, collection state that is not a sequence) are
//! returned as `Err` but still go through step 6.

mod config;

pub use config::*;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::framework::ModuleError;
use crate::model::{
    self, truthy, Action, ActionKind, ActionNames, ActionResult, Commit, Mutation, ResourceNames, State,
    StoreContext,
};

pub struct ActionExecutor {
    kind: ActionKind,
    names: ActionNames,
    config: Arc<ModuleConfig>,
}

impl ActionExecutor {
    pub fn new(kind: ActionKind, names: &ResourceNames, config: Arc<ModuleConfig>) -> Arc<Self> {
        Arc::new(Self {
            kind,
            names: names.for_kind(kind).clone(),
            config,
        })
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn names(&self) -> &ActionNames {
        &self.names
    }

    /// The loading flag, initialized to null.
    pub fn state(&self) -> State {
        let mut state = State::new();
        state.insert(self.names.loading_key.clone(), Value::Null);
        state
    }

    /// The action entry, bound to this executor.
    pub fn actions(self: &Arc<Self>) -> BTreeMap<String, Action> {
        let executor = Arc::clone(self);
        let bound = model::action(move |ctx: Arc<dyn StoreContext>, input| {
            let executor = Arc::clone(&executor);
            async move { executor.execute(ctx.as_ref(), input).await }
        });
        BTreeMap::from([(self.names.action.clone(), bound)])
    }

    /// The loading mutation: stores the truthiness of the payload.
    pub fn mutations(&self) -> BTreeMap<String, Mutation> {
        let key = self.names.loading_key.clone();
        let set_loading = model::mutation(move |state, commit| {
            state.insert(key.clone(), Value::Bool(truthy(&commit.payload)));
            Ok(())
        });
        BTreeMap::from([(self.names.loading_mutation.clone(), set_loading)])
    }

    pub async fn execute(&self, store: &dyn StoreContext, input: Value) -> ActionResult {
        let resource = self.config.resource.name();
        let action = self.names.action.as_str();
        debug!(resource, action, ?input, "Execute");

        store
            .commit(&self.names.loading_mutation, Commit::payload(Value::Bool(true)))
            .await?;
        let outcome = self.run(store, input).await;
        let released = store
            .commit(&self.names.loading_mutation, Commit::payload(Value::Bool(false)))
            .await;

        let result = outcome?;
        released?;
        Ok(result)
    }

    async fn run(&self, store: &dyn StoreContext, input: Value) -> ActionResult {
        let resource = self.config.resource.name();
        let action = self.names.action.as_str();

        let request = self.config.request(self.kind, &input)?;
        let call = request.to_call();
        debug!(resource, action, method = ?call.method, url = %call.url, "Calling");

        match self.config.http.call(call).await {
            Ok(response) => {
                let payload = (request.map_state)(response.data.clone());
                if self.config.commit_state {
                    store
                        .commit(&self.names.mutation, Commit::new(payload.clone(), input))
                        .await?;
                }
                if let Some(on_success) = &self.config.on_success {
                    on_success(self.kind, &payload, resource);
                }
                info!(resource, action, status = response.status, "Action ok");
                Ok(Some((request.map_data)(response.data)))
            }
            Err(error) => {
                warn!(resource, action, %error, "Action failed");
                if let Some(on_error) = &self.config.on_error {
                    on_error(self.kind, &error, resource);
                }
                if self.config.propagate_errors {
                    Err(ModuleError::Http(error))
                } else {
                    Ok(None)
                }
            }
        }
    }
}
