use serde::{Deserialize, Serialize};

use super::{lenient_opt_string, lenient_string, lenient_string_list, null_as_default, Normalize};

/// Structured résumé produced by the parsing stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeProfile {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub email: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone: Option<String>,
    /// Unordered; duplicates are kept as the model wrote them.
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experience: Vec<Experience>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub education: Vec<Education>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub company: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub duration: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    #[serde(default, deserialize_with = "lenient_string")]
    pub degree: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub institution: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub year: String,
}

pub const FALLBACK_CANDIDATE_NAME: &str = "Unknown Candidate";
pub const FALLBACK_SKILL: &str = "Unable to parse skills";

impl ResumeProfile {
    /// Placeholder profile used when the parsing answer cannot be read.
    pub fn fallback() -> Self {
        Self {
            name: FALLBACK_CANDIDATE_NAME.to_string(),
            email: None,
            phone: None,
            skills: vec![FALLBACK_SKILL.to_string()],
            experience: Vec::new(),
            education: Vec::new(),
            summary: Some("Resume parsing encountered an issue. Please try again.".to_string()),
        }
    }
}

impl Normalize for ResumeProfile {
    fn normalize(mut self) -> Option<Self> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return None;
        }
        // Entries with nothing but blanks carry no information.
        self.experience
            .retain(|e| !(e.title.trim().is_empty() && e.company.trim().is_empty()));
        self.education
            .retain(|e| !(e.degree.trim().is_empty() && e.institution.trim().is_empty()));
        Some(self)
    }
}
