//! Built-in tools
//!
//! The catalog of AI tools the canvas ships with, plus the HTTP clients that
//! reach the tool endpoints and the workflow persistence service.

mod catalog;
mod http;
mod response;
mod store;

pub use catalog::{builtin_registry, builtin_tools, register_all};
pub use http::HttpToolClient;
pub use store::HttpWorkflowStore;
