// Wire types for the emotion classification HTTP API.
//
// Request bodies are serialized with serde_json; responses are decoded
// leniently: only `emotions` is required on a prediction, everything the
// service echoes back is optional.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// POST /predict
// ---------------------------------------------------------------------------

/// Body of a single-text prediction request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRequest {
    pub text: String,
    pub threshold: f64,
}

/// One (label, probability) pair returned by the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionScore {
    pub emotion: String,
    /// Probability in [0, 1].
    pub probability: f64,
}

/// Successful prediction response. Scores arrive already filtered by the
/// request threshold and are kept in received order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub emotions: Vec<EmotionScore>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub count: Option<usize>,
}

impl AnalysisResponse {
    /// Build a response holding only the given scores.
    pub fn from_scores(emotions: Vec<EmotionScore>) -> Self {
        AnalysisResponse {
            emotions,
            text: None,
            threshold: None,
            count: None,
        }
    }
}

// ---------------------------------------------------------------------------
// POST /predict_batch
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRequest {
    pub texts: Vec<String>,
    pub threshold: f64,
}

/// One entry of a batch response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BatchItem {
    pub text: String,
    pub emotions: Vec<EmotionScore>,
    #[serde(default)]
    pub count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BatchResponse {
    #[serde(default)]
    pub threshold: Option<f64>,
    pub results: Vec<BatchItem>,
    #[serde(default)]
    pub total: Option<usize>,
}

impl BatchResponse {
    /// The batch endpoint reports probabilities as percentages (0-100)
    /// while `/predict` reports fractions. Rescale every score to [0, 1].
    pub fn into_fractions(mut self) -> Self {
        for item in &mut self.results {
            for score in &mut item.emotions {
                score.probability /= 100.0;
            }
        }
        self
    }
}

// ---------------------------------------------------------------------------
// GET /health, GET /emotions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub ready: bool,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.ready && self.status == "healthy"
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmotionCatalog {
    pub count: usize,
    pub emotions: Vec<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
