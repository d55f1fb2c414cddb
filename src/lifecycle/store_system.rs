use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{error, info, instrument};

use crate::framework::{ModuleError, ModuleStore, StoreClient};
use crate::model::{ActionResult, ModuleDescriptor, State};

/// Channel capacity of each spawned store.
pub const STORE_BUFFER: usize = 64;

/// Hosts one [`ModuleStore`] per registered module.
///
/// Modules are namespaced: actions are addressed as `"<module>/<action>"`,
/// e.g. `"users/fetchUsers"`.
///
/// # Example
///
/// ```ignore
/// let template = ModuleBuilder::default();
/// let mut system = StoreSystem::new();
/// system.register("users", template.create("users"));
/// system.register("products", template.create("products"));
///
/// system.dispatch("users/fetchUsers", Value::Null).await?;
/// let users = system.state("users").await?;
///
/// system.shutdown().await?;
/// ```
#[derive(Default)]
pub struct StoreSystem {
    stores: BTreeMap<String, StoreClient>,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl StoreSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a store for `module` under `name`. Must be called inside a Tokio runtime.
    ///
    /// Registering a name twice replaces the previous client; its store stops once
    /// the last clone of the old client is dropped.
    pub fn register(&mut self, name: impl Into<String>, module: ModuleDescriptor) -> StoreClient {
        let name = name.into();
        let (store, client) = ModuleStore::new(name.clone(), STORE_BUFFER, &module);
        self.handles.push(tokio::spawn(store.run()));
        info!(module = %name, namespaced = module.namespaced, "Registered");
        self.stores.insert(name, client.clone());
        client
    }

    pub fn store(&self, name: &str) -> Option<&StoreClient> {
        self.stores.get(name)
    }

    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.stores.keys().map(String::as_str)
    }

    /// Dispatches `"<module>/<action>"`.
    #[instrument(skip(self, input))]
    pub async fn dispatch(&self, path: &str, input: Value) -> ActionResult {
        let (module, action) = path
            .split_once('/')
            .ok_or_else(|| ModuleError::UnknownAction(path.to_string()))?;
        let store = self
            .stores
            .get(module)
            .ok_or_else(|| ModuleError::UnknownModule(module.to_string()))?;
        store.dispatch(action, input).await
    }

    pub async fn state(&self, module: &str) -> Result<State, ModuleError> {
        let store = self
            .stores
            .get(module)
            .ok_or_else(|| ModuleError::UnknownModule(module.to_string()))?;
        store.state().await
    }

    /// Gracefully shuts down every store.
    ///
    /// Drops the system's clients, which closes the channels once no other clone
    /// is alive, then waits for each store task. Clients cloned out of the system
    /// must be dropped first or this waits for them.
    pub async fn shutdown(self) -> Result<(), ModuleError> {
        info!("Shutting down stores...");
        drop(self.stores);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Store task failed: {:?}", e);
                return Err(ModuleError::TaskFailed(e.to_string()));
            }
        }

        info!("Shutdown complete.");
        Ok(())
    }
}
