use crate::Node;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub type WorkflowId = String;

/// A named set of nodes under one owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub id: WorkflowId,
    pub owner_id: String,
    pub name: String,
    pub nodes: Vec<Node>,
}

impl Workflow {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            owner_id: String::new(),
            name: name.into(),
            nodes: Vec::new(),
        }
    }

    pub fn with_owner(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = owner_id.into();
        self
    }
}

/// Identity handed over by the external sign-in provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub is_signed_in: bool,
}

impl Identity {
    pub fn signed_in(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_signed_in: true,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            id: String::new(),
            is_signed_in: false,
        }
    }
}

/// History entry for one saved workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowSummary {
    pub id: WorkflowId,
    pub name: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

/// SQLite timestamp text, with and without fractional seconds. Always UTC.
const SQLITE_TIMESTAMPS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

/// Accepts RFC 3339 as well as the naive UTC timestamps SQLite stores.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    SQLITE_TIMESTAMPS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&raw, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp {:?}", raw)))
}

fn default_workflow_name() -> String {
    "Untitled Workflow".to_string()
}

/// Body of `POST /api/workflows/save`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveWorkflowRequest {
    pub id: WorkflowId,
    pub user_id: String,
    #[serde(default = "default_workflow_name")]
    pub name: String,
    pub nodes: Vec<Node>,
}

impl From<&Workflow> for SaveWorkflowRequest {
    fn from(workflow: &Workflow) -> Self {
        Self {
            id: workflow.id.clone(),
            user_id: workflow.owner_id.clone(),
            name: workflow.name.clone(),
            nodes: workflow.nodes.clone(),
        }
    }
}

/// Body of `GET /api/workflows/{user_id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowListing {
    pub workflows: Vec<WorkflowSummary>,
}

/// Body of `GET /api/workflow-data/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowSnapshot {
    pub name: String,
    pub nodes: Vec<Node>,
}
