//! Runtime orchestration: hosting stores and initializing logging.
//!
//! - [`StoreSystem`] - spawns a store per module and routes namespaced dispatches
//! - [`setup_tracing`] - initializes the tracing/logging infrastructure

pub mod store_system;
pub mod tracing;

pub use self::store_system::*;
pub use self::tracing::*;
