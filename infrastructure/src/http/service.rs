//! reqwest implementation of the analysis service port.

use super::wire::AnalyzeBody;
use async_trait::async_trait;
use captionkit_application::{AnalysisService, Credential, RawResponse, SubmitPayload, TransportError};
use captionkit_domain::JobHandle;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const USER_AGENT: &str = concat!("captionkit/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum HttpClientError {
    #[error("endpoint cannot be empty")]
    EmptyEndpoint,

    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// HTTP gateway to the remote analysis service.
///
/// Every call carries the credential as a bearer token and is bounded by the
/// client-wide timeout. Bodies are returned raw, whatever the status code.
#[derive(Debug, Clone)]
pub struct HttpAnalysisService {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpAnalysisService {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, HttpClientError> {
        let endpoint = endpoint.into().trim().trim_end_matches('/').to_string();
        if endpoint.is_empty() {
            return Err(HttpClientError::EmptyEndpoint);
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Absolute handles are used as-is; relative ones are resolved against the endpoint.
    pub fn poll_url(&self, handle: &JobHandle) -> String {
        let handle = handle.as_str();
        if handle.starts_with("http://") || handle.starts_with("https://") {
            handle.to_string()
        } else {
            format!("{}/{}", self.endpoint, handle.trim_start_matches('/'))
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<RawResponse, TransportError> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;
        debug!("HTTP {} ({} bytes)", status, body.len());
        Ok(RawResponse::new(status, body))
    }
}

fn transport_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout(e.to_string())
    } else if e.is_connect() {
        TransportError::Connection(e.to_string())
    } else {
        TransportError::Other(e.to_string())
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisService {
    async fn submit(
        &self,
        credential: &Credential,
        payload: &SubmitPayload,
    ) -> Result<RawResponse, TransportError> {
        let url = format!("{}/analyze", self.endpoint);
        debug!("POST {} ({} encoded bytes)", url, payload.image.data.len());
        let request = self
            .client
            .post(url)
            .bearer_auth(credential.expose())
            .json(&AnalyzeBody::from(payload));
        self.send(request).await
    }

    async fn poll(
        &self,
        credential: &Credential,
        handle: &JobHandle,
    ) -> Result<RawResponse, TransportError> {
        let request = self
            .client
            .get(self.poll_url(handle))
            .bearer_auth(credential.expose());
        self.send(request).await
    }

    async fn account(&self, credential: &Credential) -> Result<RawResponse, TransportError> {
        let request = self
            .client
            .get(format!("{}/account", self.endpoint))
            .bearer_auth(credential.expose());
        self.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn service(endpoint: &str) -> HttpAnalysisService {
        HttpAnalysisService::new(endpoint, Duration::from_secs(5)).unwrap()
    }

    /// Serve one canned response and hand back the raw request text.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 16 * 1024];
            let n = socket.read(&mut buf).await.unwrap();
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&buf[..n]).into_owned()
        });
        (format!("http://{addr}/v1"), task)
    }

    #[test]
    fn test_empty_endpoint_rejected() {
        assert!(matches!(
            HttpAnalysisService::new("  ", Duration::from_secs(1)),
            Err(HttpClientError::EmptyEndpoint)
        ));
    }

    #[test]
    fn test_poll_url_resolution() {
        let service = service("https://api.example.com/v1/");
        assert_eq!(service.endpoint(), "https://api.example.com/v1");
        assert_eq!(
            service.poll_url(&JobHandle::new("https://cdn.example.com/jobs/7")),
            "https://cdn.example.com/jobs/7"
        );
        assert_eq!(
            service.poll_url(&JobHandle::new("/jobs/7")),
            "https://api.example.com/v1/jobs/7"
        );
    }

    #[tokio::test]
    async fn test_account_sends_bearer_and_returns_raw_body() {
        let (endpoint, server) = serve_once("200 OK", r#"{"credits": 12}"#).await;
        let credential = Credential::new("sk-live").unwrap();

        let response = service(&endpoint).account(&credential).await.unwrap();
        let request = server.await.unwrap();

        assert_eq!(response, RawResponse::ok(r#"{"credits": 12}"#));
        assert!(request.starts_with("GET /v1/account"));
        assert!(request.to_ascii_lowercase().contains("authorization: bearer sk-live"));
    }

    #[tokio::test]
    async fn test_error_status_is_not_a_transport_error() {
        let (endpoint, server) = serve_once("403 Forbidden", r#"{"error": "Access denied."}"#).await;
        let credential = Credential::new("sk-live").unwrap();

        let response = service(&endpoint)
            .poll(&credential, &JobHandle::new("jobs/1"))
            .await
            .unwrap();
        let request = server.await.unwrap();

        assert_eq!(response.status, 403);
        assert!(!response.is_success());
        assert!(request.starts_with("GET /v1/jobs/1"));
    }

    #[tokio::test]
    async fn test_refused_connection_maps_to_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let credential = Credential::new("sk-live").unwrap();
        let result = service(&format!("http://{addr}"))
            .account(&credential)
            .await;

        assert!(matches!(result, Err(TransportError::Connection(_))));
    }
}
