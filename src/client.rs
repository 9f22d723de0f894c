use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::env;
use std::time::{Duration, Instant};
use url::Url;

use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS};
use crate::transport::Transport;
use crate::types::{HealthStatus, QueryRequest, QueryResponse};

/// Endpoint used when neither the caller nor `IMALI_ENDPOINT` provides one.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/predict";

/// Client for the Imali-Bot model server.
///
/// The server exposes `POST /predict` for queries and `GET /health` next to
/// it.  Requests have no timeout unless one is configured.
#[derive(Debug, Clone)]
pub struct InferenceClient {
    client: ReqwestClient,
    endpoint: Url,
    timeout: Option<Duration>,
}

impl InferenceClient {
    /// Create a client for the endpoint in `IMALI_ENDPOINT`, or the default
    /// local model server.
    pub fn new() -> Result<Self> {
        Self::with_options(None, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(endpoint: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let endpoint = match endpoint {
            Some(endpoint) => endpoint,
            None => env::var("IMALI_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
        };
        let endpoint = Url::parse(&endpoint)?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(Error::validation(
                format!("unsupported endpoint scheme: {}", endpoint.scheme()),
                Some("endpoint".to_string()),
            ));
        }

        let mut builder = ReqwestClient::builder().default_headers(default_headers());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            Error::http_client(
                format!("Failed to build HTTP client: {}", e),
                Some(Box::new(e)),
            )
        })?;

        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    /// The query endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The health endpoint, a sibling of the query endpoint.
    pub fn health_url(&self) -> Result<Url> {
        Ok(self.endpoint.join("health")?)
    }

    /// Send a query to the model server.
    pub async fn predict(&self, request: &QueryRequest) -> Result<QueryResponse> {
        CLIENT_REQUESTS.click();
        let start = Instant::now();
        let result = self.predict_inner(request).await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());
        if result.is_err() {
            CLIENT_REQUEST_ERRORS.click();
        }
        result
    }

    async fn predict_inner(&self, request: &QueryRequest) -> Result<QueryResponse> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        Self::parse_response(response).await
    }

    /// Ask the model server whether it is online.
    pub async fn health(&self) -> Result<HealthStatus> {
        let response = self
            .client
            .get(self.health_url()?)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        Self::parse_response(response).await
    }

    fn map_send_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {}", e),
                self.timeout.map(|t| t.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
        }
    }

    async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T> {
        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }
        let body = response.text().await.map_err(|e| {
            Error::http_client(
                format!("Failed to read response: {}", e),
                Some(Box::new(e)),
            )
        })?;
        serde_json::from_str::<T>(&body).map_err(|e| {
            Error::serialization(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })
    }

    /// Convert a non-success response into an error.
    ///
    /// The model server reports failures as `{"detail": "..."}`; anything else
    /// is kept verbatim.
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();

        #[derive(Deserialize)]
        struct ErrorResponse {
            detail: Option<String>,
        }

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };
        let message = serde_json::from_str::<ErrorResponse>(&error_body)
            .ok()
            .and_then(|e| e.detail)
            .unwrap_or(error_body);
        Error::api(status_code, message)
    }
}

#[async_trait::async_trait]
impl Transport for InferenceClient {
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse> {
        self.predict(request).await
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let client = InferenceClient::with_options(
            Some("http://models.internal:9000/predict".to_string()),
            Some(Duration::from_secs(30)),
        )
        .unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "http://models.internal:9000/predict"
        );
        assert_eq!(client.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn health_url_is_sibling() {
        let client =
            InferenceClient::with_options(Some(DEFAULT_ENDPOINT.to_string()), None).unwrap();
        assert_eq!(
            client.health_url().unwrap().as_str(),
            "http://localhost:8000/health"
        );
        assert_eq!(client.timeout, None);
    }

    #[test]
    fn rejects_bad_endpoints() {
        assert!(InferenceClient::with_options(Some("not a url".to_string()), None).is_err());
        let err =
            InferenceClient::with_options(Some("ftp://localhost/predict".to_string()), None)
                .unwrap_err();
        assert!(err.is_validation());
    }
}
