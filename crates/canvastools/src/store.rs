use crate::response::failure_message;
use async_trait::async_trait;
use canvascore::{
    PersistenceError, SaveWorkflowRequest, WorkflowListing, WorkflowSnapshot, WorkflowStore,
    WorkflowSummary,
};
use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;

/// Workflow storage behind the persistence service's HTTP API
#[derive(Clone)]
pub struct HttpWorkflowStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpWorkflowStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// `<base>/api/<segments>`, each segment percent-encoded on its own
    fn url(&self, segments: &[&str]) -> Result<Url, PersistenceError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| PersistenceError::Transport(format!("invalid base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| {
                PersistenceError::Transport(format!("invalid base URL: {}", self.base_url))
            })?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, PersistenceError> {
        let url = self.url(segments)?;
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PersistenceError::Transport(e.to_string()))?;
        decode(check_status(response).await?).await
    }
}

async fn check_status(response: Response) -> Result<Response, PersistenceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(PersistenceError::Server {
        status: status.as_u16(),
        detail: failure_message(status.as_u16(), &body),
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, PersistenceError> {
    response
        .json::<T>()
        .await
        .map_err(|e| PersistenceError::Decode(e.to_string()))
}

#[async_trait]
impl WorkflowStore for HttpWorkflowStore {
    async fn save(&self, request: &SaveWorkflowRequest) -> Result<(), PersistenceError> {
        let url = self.url(&["workflows", "save"])?;
        tracing::debug!("POST {} ({} nodes)", url, request.nodes.len());
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| PersistenceError::Transport(e.to_string()))?;
        check_status(response).await?;
        Ok(())
    }

    async fn list(&self, owner_id: &str) -> Result<Vec<WorkflowSummary>, PersistenceError> {
        let listing: WorkflowListing = self.get(&["workflows", owner_id]).await?;
        Ok(listing.workflows)
    }

    async fn fetch(&self, workflow_id: &str) -> Result<WorkflowSnapshot, PersistenceError> {
        self.get(&["workflow-data", workflow_id])
            .await
            .map_err(|e| match e {
                PersistenceError::Server { status, .. } if status == StatusCode::NOT_FOUND.as_u16() => {
                    PersistenceError::NotFound(workflow_id.to_string())
                }
                other => other,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::error_detail;

    #[test]
    fn urls_carry_api_prefix() {
        let store = HttpWorkflowStore::new("http://localhost:8000/");

        assert_eq!(
            store.url(&["workflows", "save"]).unwrap().as_str(),
            "http://localhost:8000/api/workflows/save"
        );
    }

    #[test]
    fn ids_stay_inside_their_segment() {
        let store = HttpWorkflowStore::new("http://localhost:8000/service");

        assert_eq!(
            store.url(&["workflow-data", "flow/../x?y#z"]).unwrap().as_str(),
            "http://localhost:8000/service/api/workflow-data/flow%2F..%2Fx%3Fy%23z"
        );
    }

    #[test]
    fn bad_base_url_is_a_transport_error() {
        let store = HttpWorkflowStore::new("not a url");

        assert!(matches!(
            store.url(&["workflows", "save"]),
            Err(PersistenceError::Transport(_))
        ));
    }

    #[test]
    fn not_found_detail_is_readable() {
        assert_eq!(
            error_detail(r#"{"detail": "Workflow not found."}"#).as_deref(),
            Some("Workflow not found.")
        );
    }
}
