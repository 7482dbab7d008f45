#![allow(dead_code)]

use async_trait::async_trait;
use canvascore::{
    PersistenceError, ResponseKind, SaveWorkflowRequest, TaskError, ToolDescriptor, ToolResponse,
    ToolTransport, WorkflowSnapshot, WorkflowStore, WorkflowSummary,
};
use canvasruntime::ToolRegistry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Smallest valid PNG header, enough for signature checks
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

/// Initialize tracing for tests
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};
    let _ = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with_test_writer()
        .try_init();
}

pub fn test_registry() -> Arc<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    let tools = [
        ToolDescriptor::new("summarizer", "/api/summarize", ResponseKind::Text)
            .with_category("Content"),
        ToolDescriptor::new("bug-fixer", "/api/debug", ResponseKind::Text)
            .with_category("Development"),
        ToolDescriptor::new("humanizer", "/api/humanize", ResponseKind::Text)
            .with_category("Content"),
        ToolDescriptor::new("image", "/api/generate-image", ResponseKind::Image)
            .with_category("Creative"),
        ToolDescriptor::new("tts-gen", "/api/tts", ResponseKind::Audio).with_category("Creative"),
        ToolDescriptor::new("vision-api", "/api/vision", ResponseKind::Static)
            .with_name("Vision Analytics")
            .with_category("Creative")
            .with_notice("System Notice: Vision is not available yet."),
    ];
    for tool in tools {
        registry.register(tool).unwrap();
    }
    Arc::new(registry)
}

/// Answers each endpoint with a canned response
#[derive(Default)]
pub struct ScriptedTransport {
    responses: HashMap<String, Result<ToolResponse, TaskError>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, endpoint: &str, result: &str) -> Self {
        self.responses.insert(
            endpoint.to_string(),
            Ok(ToolResponse {
                result: result.to_string(),
            }),
        );
        self
    }

    pub fn fail(mut self, endpoint: &str, error: TaskError) -> Self {
        self.responses.insert(endpoint.to_string(), Err(error));
        self
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ToolTransport for ScriptedTransport {
    async fn invoke(&self, endpoint: &str, content: &str) -> Result<ToolResponse, TaskError> {
        self.calls
            .lock()
            .unwrap()
            .push((endpoint.to_string(), content.to_string()));
        self.responses.get(endpoint).cloned().unwrap_or_else(|| {
            Err(TaskError::RequestFailed(
                "Request failed with status code 404".to_string(),
            ))
        })
    }
}

/// Never answers
#[derive(Default)]
pub struct PendingTransport {
    calls: AtomicUsize,
}

impl PendingTransport {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ToolTransport for PendingTransport {
    async fn invoke(&self, _endpoint: &str, _content: &str) -> Result<ToolResponse, TaskError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }
}

/// Holds every request until `release` is called
#[derive(Default)]
pub struct GatedTransport {
    gate: Notify,
    result: String,
    calls: AtomicUsize,
}

impl GatedTransport {
    pub fn new(result: &str) -> Self {
        Self {
            result: result.to_string(),
            ..Self::default()
        }
    }

    pub fn release(&self) {
        self.gate.notify_waiters();
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ToolTransport for GatedTransport {
    async fn invoke(&self, _endpoint: &str, _content: &str) -> Result<ToolResponse, TaskError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        Ok(ToolResponse {
            result: self.result.clone(),
        })
    }
}

/// Store whose every call fails at the transport level
pub struct FailingStore;

#[async_trait]
impl WorkflowStore for FailingStore {
    async fn save(&self, _request: &SaveWorkflowRequest) -> Result<(), PersistenceError> {
        Err(PersistenceError::Transport("connection refused".to_string()))
    }

    async fn list(&self, _owner_id: &str) -> Result<Vec<WorkflowSummary>, PersistenceError> {
        Err(PersistenceError::Transport("connection refused".to_string()))
    }

    async fn fetch(&self, _workflow_id: &str) -> Result<WorkflowSnapshot, PersistenceError> {
        Err(PersistenceError::Transport("connection refused".to_string()))
    }
}
