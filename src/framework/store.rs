//! # Module Store
//!
//! A single-writer store for one module descriptor.
//!
//! ## Key Types
//!
//! - [`ModuleStore`]: owns the state and the mutations, applies commits in order.
//! - [`StoreClient`]: cloneable handle; commits, snapshots and dispatches actions.
//! - [`StoreRequest`]: the messages between them.
//!
//! ## Concurrency Model
//!
//! Actions run in the caller's task; only their commits travel to the store task.
//! The store handles one message at a time, so mutations never race even when
//! several actions are in flight. Two in-flight actions of the same kind may
//! interleave their loading-flag commits: the last commit wins.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

use crate::framework::ModuleError;
use crate::model::{Action, ActionResult, Commit, ModuleDescriptor, Mutation, State, StoreContext};

/// One-shot response channel used by the store.
pub type Response<T> = oneshot::Sender<Result<T, ModuleError>>;

#[derive(Debug)]
pub enum StoreRequest {
    Commit {
        mutation: String,
        commit: Commit,
        respond_to: Response<()>,
    },
    Snapshot {
        respond_to: Response<State>,
    },
}

pub struct ModuleStore {
    name: String,
    receiver: mpsc::Receiver<StoreRequest>,
    state: State,
    mutations: BTreeMap<String, Mutation>,
}

impl ModuleStore {
    pub fn new(
        name: impl Into<String>,
        buffer_size: usize,
        module: &ModuleDescriptor,
    ) -> (Self, StoreClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let store = Self {
            name: name.into(),
            receiver,
            state: module.state.clone(),
            mutations: module.mutations.clone(),
        };
        let client = StoreClient::new(sender, module.actions.clone());
        (store, client)
    }

    /// Runs the store's event loop until every client is dropped.
    pub async fn run(mut self) {
        let module = self.name.as_str();
        info!(module, "Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Commit {
                    mutation,
                    commit,
                    respond_to,
                } => {
                    debug!(module, %mutation, payload = ?commit.payload, "Commit");
                    let result = match self.mutations.get(&mutation) {
                        Some(apply) => apply(&mut self.state, commit),
                        None => Err(ModuleError::UnknownMutation(mutation.clone())),
                    };
                    if let Err(e) = &result {
                        warn!(module, %mutation, error = %e, "Commit failed");
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::Snapshot { respond_to } => {
                    let _ = respond_to.send(Ok(self.state.clone()));
                }
            }
        }

        info!(module, keys = self.state.len(), "Shutdown");
    }
}

/// Handle to a running [`ModuleStore`].
#[derive(Clone)]
pub struct StoreClient {
    sender: mpsc::Sender<StoreRequest>,
    actions: Arc<BTreeMap<String, Action>>,
}

impl StoreClient {
    pub fn new(sender: mpsc::Sender<StoreRequest>, actions: BTreeMap<String, Action>) -> Self {
        Self {
            sender,
            actions: Arc::new(actions),
        }
    }

    /// A copy of the current state.
    pub async fn state(&self) -> Result<State, ModuleError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Snapshot { respond_to })
            .await
            .map_err(|_| ModuleError::StoreClosed)?;
        response.await.map_err(|_| ModuleError::StoreDropped)?
    }

    pub fn has_action(&self, action: &str) -> bool {
        self.actions.contains_key(action)
    }

    /// Run an action against this store.
    #[instrument(skip(self, input))]
    pub async fn dispatch(&self, action: &str, input: Value) -> ActionResult {
        let run = self
            .actions
            .get(action)
            .cloned()
            .ok_or_else(|| ModuleError::UnknownAction(action.to_string()))?;
        run(Arc::new(self.clone()), input).await
    }
}

#[async_trait]
impl StoreContext for StoreClient {
    async fn commit(&self, mutation: &str, commit: Commit) -> Result<(), ModuleError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Commit {
                mutation: mutation.to_string(),
                commit,
                respond_to,
            })
            .await
            .map_err(|_| ModuleError::StoreClosed)?;
        response.await.map_err(|_| ModuleError::StoreDropped)?
    }
}
