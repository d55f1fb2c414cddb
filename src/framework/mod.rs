//! Runtime pieces shared by every generated module.
//!
//! # Main Components
//!
//! - [`ModuleStore`] / [`StoreClient`] - single-writer store for one module
//! - [`ModuleError`] / [`HttpError`] - error types
//!
//! # Testing
//!
//! See [`mock`] module for a scripted HTTP caller and a recording store.

pub mod error;
pub mod mock;
pub mod store;

pub use error::*;
pub use store::{ModuleStore, StoreClient, StoreRequest};
