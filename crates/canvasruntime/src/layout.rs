//! Spawn placement, wire geometry and id generation.
//!
//! Nothing here reads ambient state: the viewport comes from config and ids
//! from an [`IdProvider`], so placement is a pure function of node count.

use canvascore::{NodeId, Position, WorkflowId};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Rendered node width is 450; spawns are centred on it.
pub const NODE_HALF_WIDTH: f64 = 225.0;
pub const SPAWN_LIFT: f64 = 200.0;
pub const SPAWN_SHIFT_LEFT: f64 = 100.0;
pub const CASCADE_STEP: usize = 30;
pub const CASCADE_SPAN: usize = 150;
/// Offset from a node's position to the point its wire attaches to
pub const ANCHOR_OFFSET: (f64, f64) = (NODE_HALF_WIDTH, 100.0);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Position {
        Position::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1440.0, 900.0)
    }
}

/// Quadratic curve from the canvas origin to a node anchor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WirePath {
    pub start: Position,
    pub control: Position,
    pub end: Position,
}

impl WirePath {
    pub fn to_svg_path(&self) -> String {
        format!(
            "M {} {} Q {} {} {} {}",
            self.start.x, self.start.y, self.control.x, self.control.y, self.end.x, self.end.y
        )
    }
}

/// Anchor point of a node placed at `position`
pub fn node_anchor(position: Position) -> Position {
    position.offset(ANCHOR_OFFSET.0, ANCHOR_OFFSET.1)
}

/// Wire from `origin` to the anchor of a node at `node_position`.
/// The control point sits halfway across, level with the origin.
pub fn wire_path(origin: Position, node_position: Position) -> WirePath {
    let end = node_anchor(node_position);
    WirePath {
        start: origin,
        control: Position::new(origin.x + (end.x - origin.x) / 2.0, origin.y),
        end,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutProjector {
    viewport: Viewport,
}

impl LayoutProjector {
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn origin(&self) -> Position {
        self.viewport.center()
    }

    /// Cascading spawn point for the node that will follow
    /// `existing_node_count` others. Repeats every `CASCADE_SPAN / CASCADE_STEP`
    /// nodes.
    pub fn spawn_position(&self, existing_node_count: usize) -> Position {
        let offset = ((existing_node_count * CASCADE_STEP) % CASCADE_SPAN) as f64;
        let center = self.viewport.center();
        Position::new(
            center.x - NODE_HALF_WIDTH + offset - SPAWN_SHIFT_LEFT,
            center.y - SPAWN_LIFT + offset,
        )
    }

    pub fn wire_path(&self, node_position: Position) -> WirePath {
        wire_path(self.origin(), node_position)
    }
}

impl Default for LayoutProjector {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

/// Source of node and workflow ids
pub trait IdProvider: Send + Sync {
    fn node_id(&self) -> NodeId;
    fn workflow_id(&self) -> WorkflowId;
}

/// Random ids, `node_<uuid>` / `flow_<uuid>`
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdProvider for RandomIds {
    fn node_id(&self) -> NodeId {
        format!("node_{}", Uuid::new_v4().simple())
    }

    fn workflow_id(&self) -> WorkflowId {
        format!("flow_{}", Uuid::new_v4().simple())
    }
}

/// Counter-based ids, `node_1`, `flow_2`, ...
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }

    fn bump(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl IdProvider for SequentialIds {
    fn node_id(&self) -> NodeId {
        format!("node_{}", self.bump())
    }

    fn workflow_id(&self) -> WorkflowId {
        format!("flow_{}", self.bump())
    }
}
