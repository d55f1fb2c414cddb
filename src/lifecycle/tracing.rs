//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by
//! `RUST_LOG`. Module paths are hidden (`with_target(false)`); the structured
//! `module`, `resource` and `action` fields say where a line comes from.
//!
//! ## What Gets Traced
//!
//! - **Stores**: startup, shutdown, every commit at `debug`, failed commits at `warn`
//! - **Actions**: request shape at `debug`, `Action ok` at `info`, failures at `warn`
//! - **HTTP**: one span per call with method and URL
//!
//! ```bash
//! RUST_LOG=info cargo test
//! RUST_LOG=crud_store::framework=debug cargo test
//! ```
//!
//! With `RUST_LOG=debug` a fetch looks like:
//!
//! ```text
//! DEBUG Execute resource="users" action="fetchUsers" input=Null
//! DEBUG Commit module="users" mutation=SET_FETCH_USERS_LOADING payload=Bool(true)
//! DEBUG Calling resource="users" action="fetchUsers" method=Get url=/users
//! DEBUG Commit module="users" mutation=SET_USERS payload=Array [...]
//! INFO Action ok resource="users" action="fetchUsers" status=200
//! DEBUG Commit module="users" mutation=SET_FETCH_USERS_LOADING payload=Bool(false)
//! ```

/// Initializes the tracing subscriber. Call once, at startup.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}

/// Like [`setup_tracing`] but safe to call repeatedly, e.g. from several tests.
pub fn try_setup_tracing() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .with_test_writer()
        .try_init()
        .is_ok()
}
