use serde::{Deserialize, Serialize};

pub type NodeId = String;

/// Canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// A placed tool instance. This is the durable half of a node; execution
/// state lives in [`crate::TaskState`] and is never serialized with it.
///
/// Serializes flat as `{"id", "toolId", "x", "y"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(rename = "toolId")]
    pub tool_id: String,
    #[serde(flatten)]
    pub position: Position,
}

impl Node {
    pub fn new(id: impl Into<String>, tool_id: impl Into<String>, position: Position) -> Self {
        Self {
            id: id.into(),
            tool_id: tool_id.into(),
            position,
        }
    }
}
