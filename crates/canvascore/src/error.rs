use thiserror::Error;

#[derive(Error, Debug)]
pub enum CanvasError {
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Task error: {0}")]
    Task(#[from] TaskError),

    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Duplicate tool id: {0}")]
    DuplicateTool(String),
}

/// Failures scoped to a single node's execution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TaskError {
    #[error("Input text is required")]
    EmptyInput,

    #[error("Node is already running")]
    Busy,

    /// Carries the detail message from the server if it sent one,
    /// otherwise the generic transport message.
    #[error("{0}")]
    RequestFailed(String),

    #[error("Generation timed out after {seconds}s")]
    GenerationTimeout { seconds: u64 },

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Cancelled")]
    Cancelled,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkflowError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Duplicate node id: {0}")]
    DuplicateNode(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PersistenceError {
    #[error("Sign in required")]
    Unauthenticated,

    #[error("Workflow not found: {0}")]
    NotFound(String),

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Server returned {status}: {detail}")]
    Server { status: u16, detail: String },

    #[error("Malformed response: {0}")]
    Decode(String),
}
