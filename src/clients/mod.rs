//! HTTP callers used by the action executors.

pub mod config;
pub mod http;
pub mod reqwest_client;

pub use config::*;
pub use http::*;
pub use reqwest_client::*;
