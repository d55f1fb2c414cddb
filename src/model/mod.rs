//! Data types: resource naming, request descriptors and module descriptors.

pub mod module;
pub mod request;
pub mod resource;

pub use module::*;
pub use request::*;
pub use resource::*;
