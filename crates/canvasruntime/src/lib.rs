//! Workspace runtime
//!
//! This crate provides the engine behind the canvas: the tool registry,
//! the node store with its spawn layout, per-node task runners, and the
//! gateway that saves and restores workflows.

mod config;
pub mod layout;
mod persistence;
mod registry;
mod runner;
mod store;
mod workspace;

pub use config::{WorkspaceConfig, API_URL_ENV};
pub use layout::{IdProvider, LayoutProjector, RandomIds, SequentialIds, Viewport, WirePath};
pub use persistence::{MemoryWorkflowStore, PersistenceGateway};
pub use registry::{ToolRegistry, ALL_CATEGORIES};
pub use runner::{RunnerConfig, TaskHandle, TaskRunner, MIN_PROGRESS_TICK};
pub use store::NodeStore;
pub use workspace::Workspace;
