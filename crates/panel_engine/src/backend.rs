use std::time::Duration;

use panel_core::ServerStatus;
use panel_logging::panel_debug;
use serde::de::DeserializeOwned;

use crate::types::{FileRequest, ProcessRequest};
use crate::{
    ActionResponse, BackendError, FailureKind, LogRecord, LogsResponse, ProcessResponse,
    VerifyResponse,
};

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Upper bound for a single request. Operations can run for minutes on
    /// the server, so this is generous.
    pub request_timeout: Duration,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(600),
        }
    }
}

/// The scraping backend's HTTP surface.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn verify_largest_zip(&self, url: &str) -> Result<VerifyResponse, BackendError>;

    async fn process_complete(
        &self,
        url: &str,
        search: &str,
    ) -> Result<ProcessResponse, BackendError>;

    async fn download_zip(&self, file: Option<&str>) -> Result<ActionResponse, BackendError>;

    async fn read_content(&self, file: Option<&str>) -> Result<ActionResponse, BackendError>;

    async fn fetch_logs(&self) -> Result<Vec<LogRecord>, BackendError>;

    async fn clear_logs(&self) -> Result<(), BackendError>;

    /// Probes `/api/status`; never fails, transport errors map to
    /// [`ServerStatus::Offline`].
    async fn status(&self) -> ServerStatus;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    base_url: reqwest::Url,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, BackendError> {
        let base_url = reqwest::Url::parse(&settings.base_url)
            .map_err(|err| BackendError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| BackendError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { base_url, client })
    }

    fn endpoint(&self, path: &str) -> Result<reqwest::Url, BackendError> {
        self.base_url
            .join(path)
            .map_err(|err| BackendError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: reqwest::Url) -> Result<T, BackendError> {
        panel_debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_json(response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, BackendError>
    where
        B: serde::Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        panel_debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_json(response).await
    }
}

#[async_trait::async_trait]
impl Backend for ReqwestBackend {
    async fn verify_largest_zip(&self, url: &str) -> Result<VerifyResponse, BackendError> {
        let mut endpoint = self.endpoint("/api/verificar-maior-zip")?;
        endpoint.query_pairs_mut().append_pair("url", url);
        self.get_json(endpoint).await
    }

    async fn process_complete(
        &self,
        url: &str,
        search: &str,
    ) -> Result<ProcessResponse, BackendError> {
        let body = ProcessRequest {
            url,
            string_busca: search,
        };
        self.post_json("/api/processar-completo", &body).await
    }

    async fn download_zip(&self, file: Option<&str>) -> Result<ActionResponse, BackendError> {
        self.post_json("/api/baixar-zip", &FileRequest { arquivo: file }).await
    }

    async fn read_content(&self, file: Option<&str>) -> Result<ActionResponse, BackendError> {
        self.post_json("/api/ler-conteudo", &FileRequest { arquivo: file }).await
    }

    async fn fetch_logs(&self) -> Result<Vec<LogRecord>, BackendError> {
        let endpoint = self.endpoint("/api/logs")?;
        let response: LogsResponse = self.get_json(endpoint).await?;
        Ok(response.logs)
    }

    async fn clear_logs(&self) -> Result<(), BackendError> {
        let endpoint = self.endpoint("/api/clear-logs")?;
        let response = self
            .client
            .post(endpoint)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(BackendError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ))
        }
    }

    async fn status(&self) -> ServerStatus {
        let Ok(endpoint) = self.endpoint("/api/status") else {
            return ServerStatus::Offline;
        };
        match self.client.get(endpoint).send().await {
            Ok(response) if response.status().is_success() => ServerStatus::Online,
            Ok(_) => ServerStatus::Unstable,
            Err(_) => ServerStatus::Offline,
        }
    }
}

// The HTTP status is not checked: the backend reports failures in the body,
// and a body that is not the expected JSON is a transport failure.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
    let status = response.status();
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&body).map_err(|err| {
        BackendError::new(FailureKind::Decode, format!("{err} (http status {status})"))
    })
}

fn map_reqwest_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        return BackendError::new(FailureKind::Timeout, err.to_string());
    }
    BackendError::new(FailureKind::Network, err.to_string())
}
