use crate::response::failure_message;
use async_trait::async_trait;
use canvascore::{TaskError, ToolRequest, ToolResponse, ToolTransport};

/// Tool transport over HTTP.
///
/// Each call is a single `POST <base_url><endpoint>` with a `{content}`
/// body. There are no retries; the runner decides what a failure means.
#[derive(Clone)]
pub struct HttpToolClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpToolClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

#[async_trait]
impl ToolTransport for HttpToolClient {
    async fn invoke(&self, endpoint: &str, content: &str) -> Result<ToolResponse, TaskError> {
        let url = self.url(endpoint);
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(&ToolRequest {
                content: content.to_string(),
            })
            .send()
            .await
            .map_err(|e| TaskError::RequestFailed(e.to_string()))?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TaskError::RequestFailed(failure_message(
                status.as_u16(),
                &body,
            )));
        }

        response
            .json::<ToolResponse>()
            .await
            .map_err(|e| TaskError::RequestFailed(format!("Failed to read response: {}", e)))
    }
}
