use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use triage_core::{ResetRequest, Transport, TriageError, TurnRequest, TurnResponse};

/// JSON-over-HTTP transport against the chat service's base URL.
///
/// No retries and no timeouts: a hung request stays pending.
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /`: the service's free-form status document.
    pub async fn status(&self) -> Result<serde_json::Value, TriageError> {
        let response = self
            .client
            .get(self.url("/"))
            .send()
            .await
            .map_err(transport_error)?;
        let body = success_body(response).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn send_turn(&self, request: &TurnRequest) -> Result<TurnResponse, TriageError> {
        debug!(
            session_id = %request.session_id,
            has_image = request.image_data.is_some(),
            "POST /chat"
        );

        let response = self
            .client
            .post(self.url("/chat"))
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let body = success_body(response).await?;
        serde_json::from_slice(&body).map_err(|e| TriageError::MalformedResponse(e.to_string()))
    }

    async fn reset_session(&self, request: &ResetRequest) -> Result<(), TriageError> {
        debug!(session_id = %request.session_id, "POST /reset");

        let response = self
            .client
            .post(self.url("/reset"))
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        success_body(response).await.map(|_| ())
    }
}

fn transport_error(err: reqwest::Error) -> TriageError {
    TriageError::Transport(err.to_string())
}

async fn success_body(response: reqwest::Response) -> Result<Vec<u8>, TriageError> {
    let status = response.status();
    if !status.is_success() {
        let error_body = response.text().await.unwrap_or_default();
        return Err(TriageError::Transport(format!(
            "service returned {}: {}",
            status, error_body
        )));
    }
    let body = response.bytes().await.map_err(transport_error)?;
    Ok(body.to_vec())
}
