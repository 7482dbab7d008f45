use crate::layout::Viewport;
use crate::runner::RunnerConfig;
use canvascore::CanvasError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding [`WorkspaceConfig::api_base_url`]
pub const API_URL_ENV: &str = "CANVAS_API_URL";

/// Configuration for a workspace
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Base URL the tool and workflow endpoints are resolved against
    pub api_base_url: String,
    pub viewport: Viewport,
    /// Hard ceiling for image generation
    pub image_timeout_secs: u64,
    pub progress_tick_ms: u64,
    /// Name given to the workflow a fresh workspace starts with
    pub default_workflow_name: String,
    /// Name given after `clear()`
    pub new_workflow_name: String,
    pub event_buffer_size: usize,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            viewport: Viewport::default(),
            image_timeout_secs: 35,
            progress_tick_ms: 1000,
            default_workflow_name: "My Neural Workflow".to_string(),
            new_workflow_name: "New Neural Workflow".to_string(),
            event_buffer_size: 1000,
        }
    }
}

impl WorkspaceConfig {
    /// The file at `path` if given, defaults otherwise. A set
    /// [`API_URL_ENV`] overrides the API URL either way.
    pub fn load(path: Option<&Path>) -> Result<Self, CanvasError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_api_url_override(std::env::var(API_URL_ENV).ok()))
    }

    /// Read a JSON config file. Missing fields fall back to defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CanvasError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_api_url_override(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url {
            self.api_base_url = url;
        }
        self
    }

    pub fn validate(&self) -> Result<(), CanvasError> {
        if self.progress_tick_ms == 0 {
            return Err(CanvasError::Config(
                "progress_tick_ms must be greater than zero".to_string(),
            ));
        }
        if self.image_timeout_secs == 0 {
            return Err(CanvasError::Config(
                "image_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.event_buffer_size == 0 {
            return Err(CanvasError::Config(
                "event_buffer_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn runner_config(&self) -> RunnerConfig {
        RunnerConfig {
            image_timeout: Duration::from_secs(self.image_timeout_secs),
            progress_tick: Duration::from_millis(self.progress_tick_ms),
        }
    }
}
