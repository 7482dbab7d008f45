use crate::{
    PersistenceError, SaveWorkflowRequest, TaskError, WorkflowSnapshot, WorkflowSummary,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Body sent to every tool endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolRequest {
    pub content: String,
}

/// Success body of a tool endpoint. `result` is text for text tools and
/// base64 for image and audio tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResponse {
    pub result: String,
}

/// Issues the single request behind a node execution
#[async_trait]
pub trait ToolTransport: Send + Sync {
    /// POST `{content}` to `endpoint` and return the decoded success body.
    ///
    /// Failures must come back as [`TaskError::RequestFailed`] carrying the
    /// server's `detail` when one was sent.
    async fn invoke(&self, endpoint: &str, content: &str) -> Result<ToolResponse, TaskError>;
}

/// Remote workflow storage
#[async_trait]
pub trait WorkflowStore: Send + Sync {
    /// Upsert by workflow id.
    async fn save(&self, request: &SaveWorkflowRequest) -> Result<(), PersistenceError>;

    /// History for one owner, newest first.
    async fn list(&self, owner_id: &str) -> Result<Vec<WorkflowSummary>, PersistenceError>;

    async fn fetch(&self, workflow_id: &str) -> Result<WorkflowSnapshot, PersistenceError>;
}
