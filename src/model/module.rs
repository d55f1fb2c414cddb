//! The module descriptor handed to a store: state, actions and mutations.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::{Map, Value};

use crate::framework::ModuleError;

/// A module's state tree: state key -> value.
pub type State = Map<String, Value>;

/// What a mutation receives besides the state.
#[derive(Debug, Clone, PartialEq)]
pub struct Commit {
    /// The (state-mapped) payload.
    pub payload: Value,
    /// The input data the action was dispatched with.
    pub input: Value,
}

impl Commit {
    pub fn new(payload: Value, input: Value) -> Self {
        Self { payload, input }
    }

    pub fn payload(payload: Value) -> Self {
        Self::new(payload, Value::Null)
    }
}

/// The part of the host store an action talks to.
#[async_trait]
pub trait StoreContext: Send + Sync {
    async fn commit(&self, mutation: &str, commit: Commit) -> Result<(), ModuleError>;
}

pub type ActionResult = Result<Option<Value>, ModuleError>;

pub type Action = Arc<dyn Fn(Arc<dyn StoreContext>, Value) -> BoxFuture<'static, ActionResult> + Send + Sync>;

pub type Mutation = Arc<dyn Fn(&mut State, Commit) -> Result<(), ModuleError> + Send + Sync>;

pub type Getter = Arc<dyn Fn(&State) -> Value + Send + Sync>;

/// Wrap an async closure as an [`Action`].
pub fn action<F, Fut>(f: F) -> Action
where
    F: Fn(Arc<dyn StoreContext>, Value) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = ActionResult> + Send + 'static,
{
    Arc::new(
        move |ctx: Arc<dyn StoreContext>, input: Value| -> BoxFuture<'static, ActionResult> {
            Box::pin(f(ctx, input))
        },
    )
}

pub fn mutation(
    f: impl Fn(&mut State, Commit) -> Result<(), ModuleError> + Send + Sync + 'static,
) -> Mutation {
    Arc::new(f)
}

/// The bundle registered with a store.
#[derive(Clone)]
pub struct ModuleDescriptor {
    pub namespaced: bool,
    pub state: State,
    pub getters: BTreeMap<String, Getter>,
    pub actions: BTreeMap<String, Action>,
    pub mutations: BTreeMap<String, Mutation>,
}

impl ModuleDescriptor {
    pub fn new() -> Self {
        Self {
            namespaced: true,
            state: State::new(),
            getters: BTreeMap::new(),
            actions: BTreeMap::new(),
            mutations: BTreeMap::new(),
        }
    }

    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    pub fn mutation_names(&self) -> impl Iterator<Item = &str> {
        self.mutations.keys().map(String::as_str)
    }
}

impl Default for ModuleDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ModuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleDescriptor")
            .field("namespaced", &self.namespaced)
            .field("state", &self.state)
            .field("getters", &self.getters.keys().collect::<Vec<_>>())
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .field("mutations", &self.mutations.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// JavaScript-style truthiness, used to coerce loading-flag payloads.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
