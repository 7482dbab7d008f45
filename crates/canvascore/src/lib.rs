//! Core abstractions for the canvas workspace
//!
//! This crate provides the data model shared by every other crate: tools,
//! nodes, transient task state, workflow wire bodies, events, and the
//! transport traits that remote calls go through. It performs no I/O.

mod error;
pub mod events;
mod node;
mod payload;
mod task;
mod tool;
mod transport;
mod workflow;

pub use error::{CanvasError, PersistenceError, RegistryError, TaskError, WorkflowError};
pub use events::*;
pub use node::{Node, NodeId, Position};
pub use payload::{ImageFormat, Payload};
pub use task::{FailureKind, TaskPhase, TaskState};
pub use tool::{ResponseKind, ToolDescriptor, ToolId};
pub use transport::{ToolRequest, ToolResponse, ToolTransport, WorkflowStore};
pub use workflow::{
    Identity, SaveWorkflowRequest, Workflow, WorkflowId, WorkflowListing, WorkflowSnapshot,
    WorkflowSummary,
};
