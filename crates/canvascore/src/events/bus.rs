use crate::{FailureKind, NodeId, Position, WorkflowId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Events emitted while the workspace is edited and its nodes run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CanvasEvent {
    NodeAdded {
        node_id: NodeId,
        tool_id: String,
        position: Position,
        timestamp: DateTime<Utc>,
    },
    NodeRemoved {
        node_id: NodeId,
        timestamp: DateTime<Utc>,
    },
    NodeMoved {
        node_id: NodeId,
        position: Position,
        timestamp: DateTime<Utc>,
    },
    NodeEvent {
        node_id: NodeId,
        event: TaskEvent,
        timestamp: DateTime<Utc>,
    },
    WorkflowSaved {
        workflow_id: WorkflowId,
        timestamp: DateTime<Utc>,
    },
    WorkflowLoaded {
        workflow_id: WorkflowId,
        node_count: usize,
        timestamp: DateTime<Utc>,
    },
    WorkflowCleared {
        workflow_id: WorkflowId,
        timestamp: DateTime<Utc>,
    },
}

/// Lifecycle of a single node's task
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type")]
pub enum TaskEvent {
    Started { tool_id: String },
    Progress { elapsed_seconds: u64 },
    Succeeded { duration_ms: u64 },
    Failed { failure: FailureKind, message: String },
}

/// Per-node handle for sending task updates
#[derive(Clone)]
pub struct EventEmitter {
    node_id: NodeId,
    sender: broadcast::Sender<CanvasEvent>,
}

impl EventEmitter {
    pub fn new(node_id: NodeId, sender: broadcast::Sender<CanvasEvent>) -> Self {
        Self { node_id, sender }
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn emit(&self, event: TaskEvent) {
        let _ = self.sender.send(CanvasEvent::NodeEvent {
            node_id: self.node_id.clone(),
            event,
            timestamp: Utc::now(),
        });
    }

    pub fn started(&self, tool_id: impl Into<String>) {
        self.emit(TaskEvent::Started {
            tool_id: tool_id.into(),
        });
    }

    pub fn progress(&self, elapsed_seconds: u64) {
        self.emit(TaskEvent::Progress { elapsed_seconds });
    }

    pub fn succeeded(&self, duration_ms: u64) {
        self.emit(TaskEvent::Succeeded { duration_ms });
    }

    pub fn failed(&self, failure: FailureKind, message: impl Into<String>) {
        self.emit(TaskEvent::Failed {
            failure,
            message: message.into(),
        });
    }
}

/// Workspace-wide event bus
pub struct EventBus {
    sender: broadcast::Sender<CanvasEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CanvasEvent> {
        self.sender.subscribe()
    }

    pub fn emit(&self, event: CanvasEvent) {
        let _ = self.sender.send(event);
    }

    pub fn create_emitter(&self, node_id: NodeId) -> EventEmitter {
        EventEmitter::new(node_id, self.sender.clone())
    }
}
