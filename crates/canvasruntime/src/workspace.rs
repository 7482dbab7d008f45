use crate::config::WorkspaceConfig;
use crate::layout::{IdProvider, LayoutProjector, RandomIds, WirePath};
use crate::persistence::PersistenceGateway;
use crate::registry::ToolRegistry;
use crate::runner::{RunnerConfig, TaskHandle, TaskRunner};
use crate::store::NodeStore;
use canvascore::{
    CanvasError, CanvasEvent, EventBus, Identity, Node, NodeId, PersistenceError, Position,
    TaskState, ToolTransport, Workflow, WorkflowError, WorkflowId, WorkflowStore, WorkflowSummary,
};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};

/// The active canvas: its nodes, one task runner per node, and the
/// persistence gateway behind save/load.
pub struct Workspace {
    registry: Arc<ToolRegistry>,
    store: NodeStore,
    runners: HashMap<NodeId, TaskRunner>,
    transport: Arc<dyn ToolTransport>,
    gateway: PersistenceGateway,
    identity: Option<Identity>,
    event_bus: Arc<EventBus>,
    layout: LayoutProjector,
    runner_config: RunnerConfig,
    config: WorkspaceConfig,
}

impl Workspace {
    /// Create a workspace with random node and workflow ids
    pub fn new(
        registry: Arc<ToolRegistry>,
        transport: Arc<dyn ToolTransport>,
        workflow_store: Arc<dyn WorkflowStore>,
        config: WorkspaceConfig,
    ) -> Self {
        Self::with_ids(registry, transport, workflow_store, Arc::new(RandomIds), config)
    }

    /// Create a workspace with a caller-supplied id source
    pub fn with_ids(
        registry: Arc<ToolRegistry>,
        transport: Arc<dyn ToolTransport>,
        workflow_store: Arc<dyn WorkflowStore>,
        ids: Arc<dyn IdProvider>,
        config: WorkspaceConfig,
    ) -> Self {
        let layout = LayoutProjector::new(config.viewport);
        let store = NodeStore::new(
            Arc::clone(&registry),
            ids,
            layout,
            config.default_workflow_name.clone(),
        );

        Self {
            registry,
            store,
            runners: HashMap::new(),
            transport,
            gateway: PersistenceGateway::new(workflow_store),
            identity: None,
            event_bus: Arc::new(EventBus::new(config.event_buffer_size.max(1))),
            layout,
            runner_config: config.runner_config(),
            config,
        }
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    pub fn set_identity(&mut self, identity: Option<Identity>) {
        self.identity = identity;
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn workflow_id(&self) -> &WorkflowId {
        self.store.workflow_id()
    }

    pub fn name(&self) -> &str {
        self.store.name()
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.store.rename(name);
    }

    pub fn nodes(&self) -> &[Node] {
        self.store.list_nodes()
    }

    pub fn add_node(&mut self, tool_id: &str) -> Result<Node, CanvasError> {
        let node = self.store.add_node(tool_id)?;
        self.attach_runner(&node)?;

        tracing::info!("Node {} added for tool {}", node.id, node.tool_id);
        self.event_bus.emit(CanvasEvent::NodeAdded {
            node_id: node.id.clone(),
            tool_id: node.tool_id.clone(),
            position: node.position,
            timestamp: Utc::now(),
        });
        Ok(node)
    }

    /// Remove a node and cancel whatever its runner has in flight.
    /// Returns `false` if there was no such node.
    pub fn remove_node(&mut self, id: &str) -> bool {
        // Dropping the runner cancels its token.
        self.runners.remove(id);
        let removed = self.store.remove_node(id).is_some();
        if removed {
            tracing::info!("Node {} removed", id);
            self.event_bus.emit(CanvasEvent::NodeRemoved {
                node_id: id.to_string(),
                timestamp: Utc::now(),
            });
        }
        removed
    }

    pub fn update_position(&mut self, id: &str, x: f64, y: f64) -> bool {
        let moved = self.store.update_position(id, x, y);
        if moved {
            self.event_bus.emit(CanvasEvent::NodeMoved {
                node_id: id.to_string(),
                position: Position::new(x, y),
                timestamp: Utc::now(),
            });
        }
        moved
    }

    /// Run the node's tool with `input`.
    pub fn execute(&self, id: &str, input: &str) -> Result<TaskHandle, CanvasError> {
        let runner = self
            .runners
            .get(id)
            .ok_or_else(|| WorkflowError::NodeNotFound(id.to_string()))?;
        Ok(runner.execute(input)?)
    }

    pub fn task_state(&self, id: &str) -> Option<TaskState> {
        self.runners.get(id).map(|r| r.state())
    }

    pub fn watch_task(&self, id: &str) -> Option<watch::Receiver<TaskState>> {
        self.runners.get(id).map(|r| r.subscribe())
    }

    /// Start over with an empty canvas and a fresh workflow id.
    /// The caller is responsible for confirming with the user first.
    pub fn clear(&mut self) -> WorkflowId {
        self.runners.clear();
        let previous = self.store.workflow_id().clone();
        let workflow_id = self
            .store
            .clear(self.config.new_workflow_name.clone())
            .clone();

        tracing::info!("Cleared workflow {}, now {}", previous, workflow_id);
        self.event_bus.emit(CanvasEvent::WorkflowCleared {
            workflow_id: previous,
            timestamp: Utc::now(),
        });
        workflow_id
    }

    /// The durable part of the workspace, ready for persistence
    pub fn snapshot(&self) -> Workflow {
        let owner = self
            .identity
            .as_ref()
            .map(|i| i.id.clone())
            .unwrap_or_default();
        self.store.snapshot(owner)
    }

    pub async fn save(&self) -> Result<(), CanvasError> {
        let workflow = self.snapshot();
        self.gateway
            .save(&workflow, self.identity.as_ref())
            .await
            .inspect_err(|e| tracing::error!("Failed to save workflow {}: {}", workflow.id, e))?;

        self.event_bus.emit(CanvasEvent::WorkflowSaved {
            workflow_id: workflow.id,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Saved workflows of the signed-in user, newest first
    pub async fn history(&self) -> Result<Vec<WorkflowSummary>, CanvasError> {
        let identity = self
            .identity
            .as_ref()
            .filter(|i| i.is_signed_in)
            .ok_or(PersistenceError::Unauthenticated)?;
        Ok(self.gateway.list_for_owner(&identity.id).await?)
    }

    /// Replace the canvas with a saved workflow.
    ///
    /// All-or-nothing: on any failure the current nodes, id, name and task
    /// states are untouched. On success every task state starts over.
    pub async fn load(&mut self, workflow_id: &str) -> Result<(), CanvasError> {
        let workflow = self
            .gateway
            .load(workflow_id)
            .await
            .inspect_err(|e| tracing::error!("Failed to load workflow {}: {}", workflow_id, e))?;

        let runners = self.build_runners(&workflow.nodes)?;
        let node_count = workflow.nodes.len();
        self.store
            .replace(workflow.id.clone(), workflow.name, workflow.nodes)?;
        self.runners = runners;

        tracing::info!("Loaded workflow {} with {} nodes", workflow.id, node_count);
        self.event_bus.emit(CanvasEvent::WorkflowLoaded {
            workflow_id: workflow.id,
            node_count,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Wires from the canvas origin to every node, in node order
    pub fn wire_paths(&self) -> Vec<(NodeId, WirePath)> {
        self.store
            .list_nodes()
            .iter()
            .map(|n| (n.id.clone(), self.layout.wire_path(n.position)))
            .collect()
    }

    pub fn layout(&self) -> &LayoutProjector {
        &self.layout
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<CanvasEvent> {
        self.event_bus.subscribe()
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    fn new_runner(&self, node: &Node) -> Result<TaskRunner, CanvasError> {
        let tool = self.registry.lookup(&node.tool_id)?.clone();
        Ok(TaskRunner::new(
            node.id.clone(),
            tool,
            Arc::clone(&self.transport),
            self.event_bus.create_emitter(node.id.clone()),
            self.runner_config.clone(),
        ))
    }

    fn attach_runner(&mut self, node: &Node) -> Result<(), CanvasError> {
        let runner = self.new_runner(node)?;
        self.runners.insert(node.id.clone(), runner);
        Ok(())
    }

    fn build_runners(&self, nodes: &[Node]) -> Result<HashMap<NodeId, TaskRunner>, CanvasError> {
        nodes
            .iter()
            .map(|n| Ok((n.id.clone(), self.new_runner(n)?)))
            .collect()
    }
}
