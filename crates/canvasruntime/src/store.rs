use crate::layout::{IdProvider, LayoutProjector};
use crate::registry::ToolRegistry;
use canvascore::{CanvasError, Node, Position, Workflow, WorkflowError, WorkflowId};
use std::collections::HashSet;
use std::sync::Arc;

/// Ordered set of nodes making up the active workflow
pub struct NodeStore {
    registry: Arc<ToolRegistry>,
    ids: Arc<dyn IdProvider>,
    layout: LayoutProjector,
    workflow_id: WorkflowId,
    name: String,
    nodes: Vec<Node>,
}

impl NodeStore {
    pub fn new(
        registry: Arc<ToolRegistry>,
        ids: Arc<dyn IdProvider>,
        layout: LayoutProjector,
        name: impl Into<String>,
    ) -> Self {
        let workflow_id = ids.workflow_id();
        Self {
            registry,
            ids,
            layout,
            workflow_id,
            name: name.into(),
            nodes: Vec::new(),
        }
    }

    pub fn workflow_id(&self) -> &WorkflowId {
        &self.workflow_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Place a new node for `tool_id` at the next cascade position.
    pub fn add_node(&mut self, tool_id: &str) -> Result<Node, CanvasError> {
        self.registry.lookup(tool_id)?;

        let id = self.ids.node_id();
        if self.contains(&id) {
            return Err(WorkflowError::DuplicateNode(id).into());
        }

        let node = Node::new(id, tool_id, self.layout.spawn_position(self.nodes.len()));
        tracing::debug!(
            "Added node {} ({}) at ({}, {})",
            node.id,
            node.tool_id,
            node.position.x,
            node.position.y
        );
        self.nodes.push(node.clone());
        Ok(node)
    }

    /// Remove a node. Absent ids are ignored.
    pub fn remove_node(&mut self, id: &str) -> Option<Node> {
        let index = self.nodes.iter().position(|n| n.id == id)?;
        Some(self.nodes.remove(index))
    }

    /// Replace a node's position. Returns `false` (and changes nothing)
    /// when the id is unknown, which is how a late drag-end lands.
    pub fn update_position(&mut self, id: &str, x: f64, y: f64) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                node.position = Position::new(x, y);
                true
            }
            None => {
                tracing::debug!("Ignoring position update for missing node {}", id);
                false
            }
        }
    }

    pub fn list_nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every node and start a new workflow under `name`.
    /// Unsaved nodes are lost.
    pub fn clear(&mut self, name: impl Into<String>) -> &WorkflowId {
        self.nodes.clear();
        self.workflow_id = self.ids.workflow_id();
        self.name = name.into();
        &self.workflow_id
    }

    /// Swap in a complete workflow. Every node is checked first; on error
    /// the store is left exactly as it was.
    pub fn replace(
        &mut self,
        workflow_id: WorkflowId,
        name: String,
        nodes: Vec<Node>,
    ) -> Result<(), CanvasError> {
        let mut seen = HashSet::new();
        for node in &nodes {
            self.registry.lookup(&node.tool_id)?;
            if !seen.insert(node.id.as_str()) {
                return Err(WorkflowError::DuplicateNode(node.id.clone()).into());
            }
        }

        self.workflow_id = workflow_id;
        self.name = name;
        self.nodes = nodes;
        Ok(())
    }

    pub fn snapshot(&self, owner_id: impl Into<String>) -> Workflow {
        Workflow {
            id: self.workflow_id.clone(),
            owner_id: owner_id.into(),
            name: self.name.clone(),
            nodes: self.nodes.clone(),
        }
    }
}
