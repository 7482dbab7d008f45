use serde::{Deserialize, Serialize};

pub type ToolId = String;

/// How a tool's `result` field is interpreted once it arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    /// Plain text, stored verbatim.
    Text,
    /// Base64 image bytes. Runs are ticked once per second and capped by
    /// the generation ceiling.
    Image,
    /// Base64 audio bytes.
    Audio,
    /// Never hits the network; execution yields the tool's fixed notice.
    Static,
}

impl ResponseKind {
    pub fn is_binary(&self) -> bool {
        matches!(self, ResponseKind::Image | ResponseKind::Audio)
    }
}

/// Static definition of one remote AI capability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub id: ToolId,
    pub endpoint: String,
    pub response_kind: ResponseKind,
    pub name: String,
    pub description: String,
    pub category: String,
    pub placeholder: String,
    pub notice: Option<String>,
}

impl ToolDescriptor {
    pub fn new(
        id: impl Into<String>,
        endpoint: impl Into<String>,
        response_kind: ResponseKind,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            endpoint: endpoint.into(),
            response_kind,
            description: String::new(),
            category: "general".to_string(),
            placeholder: String::new(),
            notice: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }

    /// Informational text a static tool yields instead of calling out.
    pub fn static_notice(&self) -> String {
        self.notice.clone().unwrap_or_else(|| {
            format!(
                "System Notice: Module architecture for {} is currently being initialized.",
                self.name
            )
        })
    }
}
