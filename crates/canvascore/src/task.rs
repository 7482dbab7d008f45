use crate::{Payload, TaskError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TaskPhase {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
}

/// Why a task ended up `Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    Request,
    Timeout,
    InvalidPayload,
}

impl FailureKind {
    pub fn of(error: &TaskError) -> Self {
        match error {
            TaskError::GenerationTimeout { .. } => FailureKind::Timeout,
            TaskError::InvalidPayload(_) => FailureKind::InvalidPayload,
            _ => FailureKind::Request,
        }
    }
}

/// Transient execution state of one node. Never persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskState {
    pub phase: TaskPhase,
    pub payload: Payload,
    /// Seconds since the run started; only ticks for image tools.
    pub elapsed_seconds: u64,
    pub failure: Option<FailureKind>,
}

impl TaskState {
    pub fn running() -> Self {
        Self {
            phase: TaskPhase::Running,
            ..Self::default()
        }
    }

    pub fn succeeded(payload: Payload) -> Self {
        Self {
            phase: TaskPhase::Succeeded,
            payload,
            elapsed_seconds: 0,
            failure: None,
        }
    }

    pub fn failed(error: &TaskError) -> Self {
        Self {
            phase: TaskPhase::Failed,
            payload: Payload::Text(format!("Error: {}", error)),
            elapsed_seconds: 0,
            failure: Some(FailureKind::of(error)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == TaskPhase::Running
    }

    pub fn timed_out(&self) -> bool {
        self.failure == Some(FailureKind::Timeout)
    }
}
