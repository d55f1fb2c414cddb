//! # Mock Framework
//!
//! Utilities for testing modules without a network or a running store.
//!
//! - [`MockHttpCaller`]: an [`HttpCaller`] driven by queued expectations.
//! - [`RecordingStore`]: a [`StoreContext`] that applies mutations in place and
//!   records every commit.
//! - [`create_mock_store`] / [`expect_commit`]: inspect raw store messages.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use crate::clients::{HttpCall, HttpCaller, HttpResponse};
use crate::framework::store::{Response, StoreClient, StoreRequest};
use crate::framework::{HttpError, ModuleError};
use crate::model::{Action, Commit, ModuleDescriptor, Mutation, State, StoreContext};

// =============================================================================
// HTTP EXPECTATIONS
// =============================================================================

struct Expectation {
    method: crate::model::Method,
    url: String,
    gate: Option<oneshot::Receiver<()>>,
    response: Result<HttpResponse, HttpError>,
}

/// An HTTP caller that answers from a queue of expectations, in order.
///
/// # Example
/// ```ignore
/// let mock = Arc::new(MockHttpCaller::new());
/// mock.expect(Method::Get, "/users").return_ok(json!([]));
///
/// let module = ModuleBuilder::new(mock.clone()).create("users");
/// // dispatch actions...
/// mock.verify(); // Ensures all expectations were met
/// ```
#[derive(Default)]
pub struct MockHttpCaller {
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
    calls: Arc<Mutex<Vec<HttpCall>>>,
}

impl MockHttpCaller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects a call with this method and URL.
    pub fn expect(&self, method: crate::model::Method, url: impl Into<String>) -> ExpectationBuilder {
        ExpectationBuilder {
            method,
            url: url.into(),
            gate: None,
            expectations: self.expectations.clone(),
        }
    }

    /// Every call received so far.
    pub fn calls(&self) -> Vec<HttpCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

#[async_trait]
impl HttpCaller for MockHttpCaller {
    async fn call(&self, request: HttpCall) -> Result<HttpResponse, HttpError> {
        self.calls.lock().unwrap().push(request.clone());
        let expectation = self.expectations.lock().unwrap().pop_front();

        let Some(expectation) = expectation else {
            panic!("Unexpected request: {:?} {}", request.method, request.url);
        };
        if expectation.method != request.method || expectation.url != request.url {
            panic!(
                "Expected {:?} {}, got {:?} {}",
                expectation.method, expectation.url, request.method, request.url
            );
        }
        if let Some(gate) = expectation.gate {
            let _ = gate.await;
        }
        expectation.response
    }
}

/// Builder for a single expectation.
pub struct ExpectationBuilder {
    method: crate::model::Method,
    url: String,
    gate: Option<oneshot::Receiver<()>>,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl ExpectationBuilder {
    /// Hold the call in flight until `gate` fires (or its sender is dropped).
    pub fn gated(mut self, gate: oneshot::Receiver<()>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Sets the expectation to return a 200 response with this body.
    pub fn return_ok(self, data: Value) {
        self.push(Ok(HttpResponse::ok(data)));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: HttpError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<HttpResponse, HttpError>) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation {
            method: self.method,
            url: self.url,
            gate: self.gate,
            response,
        });
    }
}

// =============================================================================
// RECORDING STORE
// =============================================================================

/// A [`StoreContext`] that applies commits synchronously and keeps a log.
pub struct RecordingStore {
    mutations: BTreeMap<String, Mutation>,
    state: Mutex<State>,
    log: Mutex<Vec<(String, Commit)>>,
}

impl RecordingStore {
    pub fn new(mutations: BTreeMap<String, Mutation>) -> Self {
        Self {
            mutations,
            state: Mutex::new(State::new()),
            log: Mutex::new(Vec::new()),
        }
    }

    /// Starts from the module's initial state and mutations.
    pub fn from_module(module: &ModuleDescriptor) -> Self {
        let store = Self::new(module.mutations.clone());
        *store.state.lock().unwrap() = module.state.clone();
        store
    }

    pub fn state(&self) -> State {
        self.state.lock().unwrap().clone()
    }

    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.state.lock().unwrap().insert(key.into(), value);
    }

    pub fn commits(&self) -> Vec<(String, Commit)> {
        self.log.lock().unwrap().clone()
    }

    /// Mutation names in commit order.
    pub fn mutation_log(&self) -> Vec<String> {
        self.log.lock().unwrap().iter().map(|(m, _)| m.clone()).collect()
    }
}

#[async_trait]
impl StoreContext for RecordingStore {
    async fn commit(&self, mutation: &str, commit: Commit) -> Result<(), ModuleError> {
        self.log.lock().unwrap().push((mutation.to_string(), commit.clone()));
        let apply = self
            .mutations
            .get(mutation)
            .ok_or_else(|| ModuleError::UnknownMutation(mutation.to_string()))?;
        let mut state = self.state.lock().unwrap();
        apply(&mut *state, commit)
    }
}

// =============================================================================
// CHANNEL HELPERS
// =============================================================================

/// Creates a store client and the receiver its messages arrive on.
///
/// # Testing Strategy
/// No `ModuleStore` is spawned: the test plays the store, reading requests from
/// the receiver and answering them through the included responders.
pub fn create_mock_store(
    buffer_size: usize,
    actions: BTreeMap<String, Action>,
) -> (StoreClient, mpsc::Receiver<StoreRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (StoreClient::new(sender, actions), receiver)
}

/// Helper to verify that the next message is a Commit request.
pub async fn expect_commit(
    receiver: &mut mpsc::Receiver<StoreRequest>,
) -> Option<(String, Commit, Response<()>)> {
    match receiver.recv().await {
        Some(StoreRequest::Commit {
            mutation,
            commit,
            respond_to,
        }) => Some((mutation, commit, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Snapshot request.
pub async fn expect_snapshot(receiver: &mut mpsc::Receiver<StoreRequest>) -> Option<Response<State>> {
    match receiver.recv().await {
        Some(StoreRequest::Snapshot { respond_to }) => Some(respond_to),
        _ => None,
    }
}
