use serde::{Deserialize, Serialize};

use super::{lenient_f64, lenient_string, Normalize};

pub const MIN_SUB_SCORE: f64 = 1.0;
pub const MAX_SUB_SCORE: f64 = 10.0;
const FALLBACK_SCORE: f64 = 8.0;
const FALLBACK_FEEDBACK: &str = "Well-crafted cover letter that addresses key requirements.";

/// Generated letter plus the evaluator's score of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetter {
    /// Plain text, used exactly as the model wrote it.
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<QualityScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityScore {
    #[serde(deserialize_with = "lenient_f64")]
    pub relevance: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub accuracy: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub effectiveness: f64,
    /// Mean of the three sub-scores, recomputed in `normalize`. Whatever the
    /// model claims is ignored.
    #[serde(default, skip_deserializing)]
    pub overall: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub feedback: String,
}

impl QualityScore {
    pub fn fallback() -> Self {
        Self {
            relevance: FALLBACK_SCORE,
            accuracy: FALLBACK_SCORE,
            effectiveness: FALLBACK_SCORE,
            overall: FALLBACK_SCORE,
            feedback: FALLBACK_FEEDBACK.to_string(),
        }
    }

    fn mean(&self) -> f64 {
        (self.relevance + self.accuracy + self.effectiveness) / 3.0
    }
}

impl Normalize for QualityScore {
    fn normalize(mut self) -> Option<Self> {
        let subs = [self.relevance, self.accuracy, self.effectiveness];
        if subs.iter().any(|s| !s.is_finite()) {
            return None;
        }
        self.relevance = self.relevance.clamp(MIN_SUB_SCORE, MAX_SUB_SCORE);
        self.accuracy = self.accuracy.clamp(MIN_SUB_SCORE, MAX_SUB_SCORE);
        self.effectiveness = self.effectiveness.clamp(MIN_SUB_SCORE, MAX_SUB_SCORE);
        self.overall = self.mean();
        self.feedback = self.feedback.trim().to_string();
        if self.feedback.is_empty() {
            self.feedback = FALLBACK_FEEDBACK.to_string();
        }
        Some(self)
    }
}
