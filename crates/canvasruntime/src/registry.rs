use canvascore::{RegistryError, ToolDescriptor};
use std::collections::HashMap;

/// Category name that matches every tool
pub const ALL_CATEGORIES: &str = "All";

/// Catalog of available tools, in registration order.
///
/// Populated while building and then shared behind an `Arc`; there is no
/// mutation once a workspace holds it.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Ids must be unique.
    pub fn register(&mut self, tool: ToolDescriptor) -> Result<(), RegistryError> {
        if self.index.contains_key(&tool.id) {
            return Err(RegistryError::DuplicateTool(tool.id));
        }
        tracing::debug!("Registering tool: {} -> {}", tool.id, tool.endpoint);
        self.index.insert(tool.id.clone(), self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    pub fn lookup(&self, tool_id: &str) -> Result<&ToolDescriptor, RegistryError> {
        self.index
            .get(tool_id)
            .map(|&i| &self.tools[i])
            .ok_or_else(|| RegistryError::UnknownTool(tool_id.to_string()))
    }

    pub fn contains(&self, tool_id: &str) -> bool {
        self.index.contains_key(tool_id)
    }

    /// Tools in `category`, or every tool for [`ALL_CATEGORIES`].
    pub fn list_by_category(&self, category: &str) -> Vec<&ToolDescriptor> {
        self.tools
            .iter()
            .filter(|t| category == ALL_CATEGORIES || t.category == category)
            .collect()
    }

    /// `"All"` followed by each distinct category in first-seen order
    pub fn categories(&self) -> Vec<String> {
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        for tool in &self.tools {
            if !categories.contains(&tool.category) {
                categories.push(tool.category.clone());
            }
        }
        categories
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
