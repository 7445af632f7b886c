//! HTTP access to the question-answering and document-lookup backend.

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT},
    Client, ClientBuilder, Response,
};
use serde::de::DeserializeOwned;
use shared::{
    domain::DocumentRecord,
    error::ApiErrorBody,
    protocol::{AskRequest, AskResponse, AskResponseBody, HealthStatus, VachanamrutQuery},
};
use tracing::{debug, warn};

use crate::{error::ClientError, settings::ClientSettings};

/// Backend operations the controllers depend on.
#[async_trait]
pub trait VachanamrutApi: Send + Sync {
    async fn ask(&self, request: &AskRequest) -> Result<AskResponse, ClientError>;
    async fn fetch_vachanamrut(
        &self,
        query: &VachanamrutQuery,
    ) -> Result<DocumentRecord, ClientError>;
    async fn health(&self) -> Result<HealthStatus, ClientError>;
}

pub struct HttpVachanamrutApi {
    http: Client,
    ask_url: String,
    vachanamrut_url: String,
    health_url: String,
}

impl HttpVachanamrutApi {
    pub fn new(settings: &ClientSettings) -> Result<Self, ClientError> {
        Self::with_builder(settings, Client::builder())
    }

    /// Client that ignores proxy environment variables, for loopback test servers.
    #[cfg(test)]
    pub(crate) fn without_proxy(settings: &ClientSettings) -> Result<Self, ClientError> {
        Self::with_builder(settings, Client::builder().no_proxy())
    }

    fn with_builder(settings: &ClientSettings, builder: ClientBuilder) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = builder
            .timeout(settings.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            http,
            ask_url: settings.endpoint("ask"),
            vachanamrut_url: settings.endpoint("vachanamrut"),
            health_url: settings.endpoint("health"),
        })
    }
}

#[async_trait]
impl VachanamrutApi for HttpVachanamrutApi {
    async fn ask(&self, request: &AskRequest) -> Result<AskResponse, ClientError> {
        debug!(history_len = request.history.len(), "backend: POST /ask");
        let response = self
            .http
            .post(&self.ask_url)
            .json(request)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                endpoint: "/ask",
                source,
            })?;

        let body: AskResponseBody = decode_json("/ask", response).await?;
        let (answer, rejected) = body.into_validated();
        for err in rejected {
            warn!("backend: dropping malformed citation from /ask: {err}");
        }
        Ok(answer)
    }

    async fn fetch_vachanamrut(
        &self,
        query: &VachanamrutQuery,
    ) -> Result<DocumentRecord, ClientError> {
        debug!(
            chapter = %query.chapter,
            section = %query.section,
            number = query.number,
            "backend: GET /vachanamrut"
        );
        let response = self
            .http
            .get(&self.vachanamrut_url)
            .query(query)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                endpoint: "/vachanamrut",
                source,
            })?;

        decode_json("/vachanamrut", response).await
    }

    async fn health(&self) -> Result<HealthStatus, ClientError> {
        let response = self
            .http
            .get(&self.health_url)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                endpoint: "/health",
                source,
            })?;

        decode_json("/health", response).await
    }
}

async fn decode_json<T: DeserializeOwned>(
    endpoint: &'static str,
    response: Response,
) -> Result<T, ClientError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|source| ClientError::Transport { endpoint, source })?;

    if !status.is_success() {
        let detail = serde_json::from_str::<ApiErrorBody>(&text)
            .ok()
            .and_then(|body| body.message())
            .or_else(|| {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            });
        return Err(ClientError::Status {
            endpoint,
            status,
            detail,
        });
    }

    serde_json::from_str(&text).map_err(|source| ClientError::Decode { endpoint, source })
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
