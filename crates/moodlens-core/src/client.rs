// HTTP client for the emotion classification service.
//
// `Classifier` is the seam the controller talks to; `HttpClassifier` is the
// reqwest-backed implementation. Each call is a single attempt: no retries,
// no client-side timeout.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::protocol::{
    AnalysisRequest, AnalysisResponse, BatchRequest, BatchResponse, EmotionCatalog, HealthStatus,
};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifierError {
    /// The service answered with a non-2xx status.
    #[error("API error: {0}")]
    Status(u16),

    /// The request never produced a response (connection refused, DNS, ...).
    #[error("network error: {0}")]
    Transport(String),

    /// A 2xx response whose body did not match the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),
}

// ---------------------------------------------------------------------------
// Classifier trait
// ---------------------------------------------------------------------------

#[async_trait]
pub trait Classifier: Send + Sync {
    /// `POST /predict`
    async fn predict(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, ClassifierError>;

    /// `POST /predict_batch`, with probabilities rescaled to [0, 1].
    async fn predict_batch(&self, request: &BatchRequest) -> Result<BatchResponse, ClassifierError>;

    /// `GET /health`
    async fn health(&self) -> Result<HealthStatus, ClassifierError>;

    /// `GET /emotions`
    async fn emotions(&self) -> Result<EmotionCatalog, ClassifierError>;

    /// Base URL of the service, used in operator hints.
    fn base_url(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Tagged outcome
// ---------------------------------------------------------------------------

/// Result of one analysis attempt, as seen by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Success(AnalysisResponse),
    Failure { detail: String },
}

/// Run one prediction and fold any error into [`AnalysisOutcome::Failure`].
pub async fn analyze(classifier: &dyn Classifier, request: &AnalysisRequest) -> AnalysisOutcome {
    match classifier.predict(request).await {
        Ok(response) => AnalysisOutcome::Success(response),
        Err(e) => {
            warn!("prediction failed: {}", e);
            AnalysisOutcome::Failure {
                detail: e.to_string(),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// HttpClassifier
// ---------------------------------------------------------------------------

pub struct HttpClassifier {
    http: reqwest::Client,
    base_url: String,
}

impl HttpClassifier {
    /// Create a client for the service rooted at `base_url`
    /// (e.g. `http://localhost:5001`). A trailing slash is ignored.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.service.base_url.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClassifierError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ClassifierError::Status(status.as_u16()));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ClassifierError::Decode(e.to_string()))
    }
}

fn transport_error(e: reqwest::Error) -> ClassifierError {
    ClassifierError::Transport(e.to_string())
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn predict(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, ClassifierError> {
        debug!(
            chars = request.text.chars().count(),
            threshold = request.threshold,
            "POST /predict"
        );
        let response = self
            .http
            .post(self.url("/predict"))
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;
        Self::decode(response).await
    }

    async fn predict_batch(&self, request: &BatchRequest) -> Result<BatchResponse, ClassifierError> {
        debug!(texts = request.texts.len(), "POST /predict_batch");
        let response = self
            .http
            .post(self.url("/predict_batch"))
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;
        Self::decode::<BatchResponse>(response)
            .await
            .map(BatchResponse::into_fractions)
    }

    async fn health(&self) -> Result<HealthStatus, ClassifierError> {
        let response = self
            .http
            .get(self.url("/health"))
            .send()
            .await
            .map_err(transport_error)?;
        Self::decode(response).await
    }

    async fn emotions(&self) -> Result<EmotionCatalog, ClassifierError> {
        let response = self
            .http
            .get(self.url("/emotions"))
            .send()
            .await
            .map_err(transport_error)?;
        Self::decode(response).await
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one canned HTTP response on an ephemeral port and return
    /// the base URL plus a handle yielding the raw request that was received.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;

            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.flush().await.unwrap();
            request
        });

        (format!("http://{addr}"), handle)
    }

    /// Read request head and body (per Content-Length) from the socket.
    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);

            let text = String::from_utf8_lossy(&data).to_string();
            if let Some(head_end) = text.find("\r\n\r\n") {
                let content_length = text[..head_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if data.len() >= head_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&data).to_string()
    }

    fn request(text: &str) -> AnalysisRequest {
        AnalysisRequest {
            text: text.to_string(),
            threshold: 0.5,
        }
    }

    #[test]
    fn new_strips_trailing_slash() {
        let client = HttpClassifier::new("http://localhost:5001/");
        assert_eq!(client.base_url(), "http://localhost:5001");
        assert_eq!(client.url("/predict"), "http://localhost:5001/predict");
    }

    #[test]
    fn status_error_mentions_code() {
        assert_eq!(ClassifierError::Status(500).to_string(), "API error: 500");
    }

    #[tokio::test]
    async fn predict_posts_json_and_parses_response() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"emotions":[{"emotion":"joy","probability":0.8},{"emotion":"sadness","probability":0.4}]}"#,
        )
        .await;

        let client = HttpClassifier::new(base);
        let response = client.predict(&request("I am happy!")).await.unwrap();
        assert_eq!(response.emotions.len(), 2);
        assert_eq!(response.emotions[0].emotion, "joy");

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /predict "), "unexpected request line: {raw}");
        assert!(raw.to_ascii_lowercase().contains("content-type: application/json"));
        assert!(raw.contains(r#""text":"I am happy!""#));
        assert!(raw.contains(r#""threshold":0.5"#));
    }

    #[tokio::test]
    async fn predict_non_success_status_is_status_error() {
        let (base, server) = serve_once(
            "500 Internal Server Error",
            r#"{"error":"prediction failed"}"#,
        )
        .await;

        let client = HttpClassifier::new(base);
        let err = client.predict(&request("hello")).await.unwrap_err();
        assert_eq!(err, ClassifierError::Status(500));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn predict_malformed_body_is_decode_error() {
        let (base, server) = serve_once("200 OK", r#"{"unexpected": true}"#).await;

        let client = HttpClassifier::new(base);
        let err = client.predict(&request("hello")).await.unwrap_err();
        assert!(matches!(err, ClassifierError::Decode(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn predict_connection_refused_is_transport_error() {
        // Bind then drop to obtain a port nothing is listening on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpClassifier::new(format!("http://{addr}"));
        let err = client.predict(&request("hello")).await.unwrap_err();
        assert!(matches!(err, ClassifierError::Transport(_)));
    }

    #[tokio::test]
    async fn analyze_folds_errors_into_failure() {
        let (base, server) = serve_once("503 Service Unavailable", "{}").await;

        let client = HttpClassifier::new(base);
        let outcome = analyze(&client, &request("hello")).await;
        match outcome {
            AnalysisOutcome::Failure { detail } => assert!(detail.contains("503")),
            other => panic!("expected failure, got {other:?}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn predict_batch_rescales_probabilities() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"threshold":0.5,"results":[{"text":"yay","emotions":[{"emotion":"joy","probability":88.5}],"count":1}],"total":1}"#,
        )
        .await;

        let client = HttpClassifier::new(base);
        let batch = BatchRequest {
            texts: vec!["yay".to_string()],
            threshold: 0.5,
        };
        let response = client.predict_batch(&batch).await.unwrap();
        assert!((response.results[0].emotions[0].probability - 0.885).abs() < 1e-9);

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /predict_batch "));
    }

    #[tokio::test]
    async fn health_parses_status() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"status":"healthy","model":"bert_small_en_uncased","ready":true}"#,
        )
        .await;

        let client = HttpClassifier::new(base);
        let health = client.health().await.unwrap();
        assert!(health.is_healthy());

        let raw = server.await.unwrap();
        assert!(raw.starts_with("GET /health "));
    }

    #[tokio::test]
    async fn emotions_parses_catalog() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"count":2,"emotions":["joy","anger"]}"#,
        )
        .await;

        let client = HttpClassifier::new(base);
        let catalog = client.emotions().await.unwrap();
        assert_eq!(catalog.count, 2);
        assert_eq!(catalog.emotions, vec!["joy", "anger"]);
        server.await.unwrap();
    }
}
