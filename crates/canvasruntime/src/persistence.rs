use async_trait::async_trait;
use canvascore::{
    Identity, Node, PersistenceError, SaveWorkflowRequest, Workflow, WorkflowId, WorkflowSnapshot,
    WorkflowStore, WorkflowSummary,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Saves and restores workflows through a [`WorkflowStore`].
///
/// Failures are returned as-is; nothing here retries.
#[derive(Clone)]
pub struct PersistenceGateway {
    store: Arc<dyn WorkflowStore>,
}

impl PersistenceGateway {
    pub fn new(store: Arc<dyn WorkflowStore>) -> Self {
        Self { store }
    }

    /// Upsert `workflow` under the signed-in identity.
    pub async fn save(
        &self,
        workflow: &Workflow,
        identity: Option<&Identity>,
    ) -> Result<(), PersistenceError> {
        let identity = identity
            .filter(|i| i.is_signed_in)
            .ok_or(PersistenceError::Unauthenticated)?;

        let mut request = SaveWorkflowRequest::from(workflow);
        request.user_id = identity.id.clone();

        tracing::info!(
            "Saving workflow {} ({} nodes) for {}",
            request.id,
            request.nodes.len(),
            request.user_id
        );
        self.store.save(&request).await
    }

    pub async fn list_for_owner(
        &self,
        owner_id: &str,
    ) -> Result<Vec<WorkflowSummary>, PersistenceError> {
        self.store.list(owner_id).await
    }

    pub async fn load(&self, workflow_id: &str) -> Result<Workflow, PersistenceError> {
        let snapshot = self.store.fetch(workflow_id).await?;
        tracing::info!(
            "Fetched workflow {} ({} nodes)",
            workflow_id,
            snapshot.nodes.len()
        );
        Ok(Workflow {
            id: workflow_id.to_string(),
            owner_id: String::new(),
            name: snapshot.name,
            nodes: snapshot.nodes,
        })
    }
}

#[derive(Debug, Clone)]
struct StoredWorkflow {
    owner_id: String,
    name: String,
    nodes: Vec<Node>,
    created_at: DateTime<Utc>,
    sequence: u64,
}

#[derive(Debug, Default)]
struct MemoryState {
    workflows: HashMap<WorkflowId, StoredWorkflow>,
    next_sequence: u64,
}

/// In-process [`WorkflowStore`].
///
/// Saving an existing id replaces its name and nodes and keeps the original
/// owner and creation time.
#[derive(Debug, Default)]
pub struct MemoryWorkflowStore {
    state: RwLock<MemoryState>,
}

impl MemoryWorkflowStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.workflows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl WorkflowStore for MemoryWorkflowStore {
    async fn save(&self, request: &SaveWorkflowRequest) -> Result<(), PersistenceError> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.workflows.get_mut(&request.id) {
            existing.name = request.name.clone();
            existing.nodes = request.nodes.clone();
            return Ok(());
        }

        state.next_sequence += 1;
        let stored = StoredWorkflow {
            owner_id: request.user_id.clone(),
            name: request.name.clone(),
            nodes: request.nodes.clone(),
            created_at: Utc::now(),
            sequence: state.next_sequence,
        };
        state.workflows.insert(request.id.clone(), stored);
        Ok(())
    }

    async fn list(&self, owner_id: &str) -> Result<Vec<WorkflowSummary>, PersistenceError> {
        let state = self.state.read().await;
        let mut owned: Vec<(&WorkflowId, &StoredWorkflow)> = state
            .workflows
            .iter()
            .filter(|(_, w)| w.owner_id == owner_id)
            .collect();
        owned.sort_by(|a, b| {
            b.1.created_at
                .cmp(&a.1.created_at)
                .then(b.1.sequence.cmp(&a.1.sequence))
        });

        Ok(owned
            .into_iter()
            .map(|(id, w)| WorkflowSummary {
                id: id.clone(),
                name: w.name.clone(),
                created_at: w.created_at,
            })
            .collect())
    }

    async fn fetch(&self, workflow_id: &str) -> Result<WorkflowSnapshot, PersistenceError> {
        let state = self.state.read().await;
        state
            .workflows
            .get(workflow_id)
            .map(|w| WorkflowSnapshot {
                name: w.name.clone(),
                nodes: w.nodes.clone(),
            })
            .ok_or_else(|| PersistenceError::NotFound(workflow_id.to_string()))
    }
}
