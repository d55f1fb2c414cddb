//! # CRUD Store
//!
//! > **Generated CRUD store modules for REST resources.**
//!
//! Give the builder a resource name (`"users"`, `"products"`) and it emits a
//! [`ModuleDescriptor`](model::ModuleDescriptor): the state shape, five actions
//! that talk to the API, and the mutations those actions commit.
//!
//! ## 🚀 Core Concepts
//!
//! ### One template, many modules
//! A [`ModuleBuilder`](builder::ModuleBuilder) holds everything that is shared
//! (HTTP caller, id attribute, hooks, extra state). `create(name)` copies it and
//! derives the per-resource names, so modules never leak into one another.
//!
//! ### Deterministic names
//! For `users`:
//!
//! | kind        | action       | request            | mutation           |
//! |-------------|--------------|--------------------|--------------------|
//! | fetch-items | `fetchUsers` | `GET /users`       | `SET_USERS`        |
//! | get-item    | `getUser`    | `GET /users/{id}`  | `SET_CURRENT_USER` |
//! | create-item | `createUser` | `POST /users`      | `ADD_USER`         |
//! | update-item | `updateUser` | `PUT /users/{id}`  | `UPDATE_USER`      |
//! | delete-item | `deleteUser` | `DELETE /users/{id}` | `DELETE_USER`    |
//!
//! State keys are `users`, `currentUser` and one loading flag per action
//! (`fetchUsersLoading`, toggled by `SET_FETCH_USERS_LOADING`).
//!
//! ### Errors go to hooks
//! A failed HTTP call is reported to the `on_error` hook and the action resolves
//! with `Ok(None)`; state is left as it was. Configuration mistakes (bad ids, a
//! collection that is not an array) are returned as `Err`. The loading flag is
//! cleared either way.
//!
//! ## 🗺️ Module Tour
//!
//! - [`model`]: names, request descriptors, module descriptors.
//! - [`executor`]: the per-action pipeline (loading flag, request, commit, hooks).
//! - [`builder`]: templates and the default mutations.
//! - [`clients`]: the [`HttpCaller`](clients::HttpCaller) seam and its `reqwest` implementation.
//! - [`framework`]: a single-writer store to run modules in, errors, and test mocks.
//! - [`lifecycle`]: hosting several modules and setting up tracing.
//!
//! ## Quick Start
//!
//! ```ignore
//! use crud_store::prelude::*;
//!
//! setup_tracing();
//! let template = ModuleBuilder::default()
//!     .on_error(|kind, error, resource| tracing::error!(%kind, %error, resource));
//!
//! let mut system = StoreSystem::new();
//! system.register("users", template.create("users"));
//!
//! system.dispatch("users/fetchUsers", Value::Null).await?;
//! println!("{:?}", system.state("users").await?["users"]);
//! ```

pub mod builder;
pub mod clients;
pub mod executor;
pub mod framework;
pub mod lifecycle;
pub mod model;

/// Re-exports of commonly used types
pub mod prelude {
    pub use crate::builder::ModuleBuilder;
    pub use crate::clients::{ClientConfig, HttpCall, HttpCaller, HttpResponse, ReqwestCaller};
    pub use crate::executor::ActionExecutor;
    pub use crate::framework::{HttpError, ModuleError, ModuleStore, StoreClient};
    pub use crate::lifecycle::{setup_tracing, StoreSystem};
    pub use crate::model::{
        ActionKind, Commit, Method, ModuleDescriptor, RequestDescriptor, ResourceDescriptor, State,
        StoreContext,
    };
    pub use serde_json::{json, Value};
}
