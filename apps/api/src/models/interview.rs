use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{lenient_string, null_as_default, Normalize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    #[serde(alias = "Technical", alias = "TECHNICAL")]
    Technical,
    #[serde(alias = "Behavioral", alias = "BEHAVIORAL", alias = "behavioural")]
    Behavioral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewQuestion {
    #[serde(deserialize_with = "lenient_string")]
    pub question: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(default, deserialize_with = "lenient_string")]
    pub focus: String,
}

/// Envelope the model answers with: `{"questions": [...]}`.
///
/// Entries are held as raw JSON so that one malformed question drops alone
/// instead of failing the whole set.
#[derive(Debug, Clone, Deserialize)]
pub struct InterviewQuestionSet {
    #[serde(default, deserialize_with = "null_as_default")]
    questions: Vec<Value>,
    #[serde(skip)]
    parsed: Vec<InterviewQuestion>,
}

impl InterviewQuestionSet {
    /// The canonical set, already in parsed form.
    pub fn fallback() -> Self {
        Self {
            questions: Vec::new(),
            parsed: fallback_questions(),
        }
    }

    pub fn into_questions(self) -> Vec<InterviewQuestion> {
        self.parsed
    }
}

impl Normalize for InterviewQuestionSet {
    fn normalize(mut self) -> Option<Self> {
        self.parsed = std::mem::take(&mut self.questions)
            .into_iter()
            .filter_map(|raw| match serde_json::from_value::<InterviewQuestion>(raw) {
                Ok(q) if !q.question.trim().is_empty() => Some(q),
                Ok(_) => None,
                Err(e) => {
                    debug!("Dropping unreadable interview question: {e}");
                    None
                }
            })
            .collect();

        (!self.parsed.is_empty()).then_some(self)
    }
}

/// Canonical set used when no question could be read: 3 technical, 2 behavioral.
pub fn fallback_questions() -> Vec<InterviewQuestion> {
    [
        (
            "Tell me about your experience with the technologies in this role.",
            QuestionKind::Technical,
            "Technical depth",
        ),
        (
            "Describe a challenging project you've worked on.",
            QuestionKind::Technical,
            "Problem solving",
        ),
        (
            "How do you stay current with industry trends?",
            QuestionKind::Technical,
            "Learning ability",
        ),
        (
            "Tell me about a time you had a conflict with a teammate.",
            QuestionKind::Behavioral,
            "Conflict resolution",
        ),
        (
            "Why are you interested in this role?",
            QuestionKind::Behavioral,
            "Motivation",
        ),
    ]
    .into_iter()
    .map(|(question, kind, focus)| InterviewQuestion {
        question: question.to_string(),
        kind,
        focus: focus.to_string(),
    })
    .collect()
}
