use serde::{de, Deserialize, Deserializer, Serialize};

use super::{lenient_f64, lenient_string, lenient_string_list, null_as_default, Normalize};

/// At most this many missing skills are reported, most important first.
pub const MAX_MISSING_SKILLS: usize = 5;
/// Learning paths cover only the top missing skills.
pub const MAX_LEARNING_PATHS: usize = 3;
/// Match percentage reported when the analysis answer cannot be read.
pub const FALLBACK_MATCH_PERCENTAGE: u8 = 70;
/// How many résumé skills the fallback reports as matched.
const FALLBACK_MATCHED_SKILLS: usize = 5;

/// Fit of a résumé against one job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGapAssessment {
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub matched_skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub missing_skills: Vec<String>,
    /// 0 – 100. Required: an answer without it is not an analysis.
    #[serde(deserialize_with = "percentage")]
    pub match_percentage: u8,
    #[serde(default, deserialize_with = "null_as_default")]
    pub learning_paths: Vec<LearningPath>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningPath {
    #[serde(default, deserialize_with = "lenient_string")]
    pub skill: String,
    /// Ordered resource labels.
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub resources: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub estimated_time: String,
}

impl SkillGapAssessment {
    /// Neutral assessment built from the résumé alone.
    pub fn fallback(resume_skills: &[String]) -> Self {
        Self {
            matched_skills: resume_skills
                .iter()
                .take(FALLBACK_MATCHED_SKILLS)
                .cloned()
                .collect(),
            missing_skills: vec!["Analysis pending".to_string()],
            match_percentage: FALLBACK_MATCH_PERCENTAGE,
            learning_paths: Vec::new(),
        }
    }
}

impl Normalize for SkillGapAssessment {
    fn normalize(mut self) -> Option<Self> {
        self.missing_skills.truncate(MAX_MISSING_SKILLS);
        self.learning_paths.retain(|p| !p.skill.trim().is_empty());
        self.learning_paths.truncate(MAX_LEARNING_PATHS);
        Some(self)
    }
}

/// Reads 82, 82.6, "82" or "82%" and clamps into 0 – 100.
fn percentage<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = lenient_f64(deserializer)
        .map_err(|e| de::Error::custom(format!("matchPercentage: {e}")))?;
    if !raw.is_finite() {
        return Err(de::Error::custom("matchPercentage is not a finite number"));
    }
    Ok(raw.round().clamp(0.0, 100.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn parse(value: Value) -> Result<SkillGapAssessment, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn test_camel_case_answer_deserializes() {
        let gap = parse(json!({
            "matchedSkills": ["Rust", "SQL"],
            "missingSkills": ["Kubernetes"],
            "matchPercentage": 78,
            "learningPaths": [
                {"skill": "Kubernetes", "resources": ["CKAD course", "k8s docs"], "estimatedTime": "6 weeks"}
            ]
        }))
        .unwrap()
        .normalize()
        .unwrap();

        assert_eq!(gap.match_percentage, 78);
        assert_eq!(gap.learning_paths[0].resources, vec!["CKAD course", "k8s docs"]);
        assert_eq!(gap.learning_paths[0].estimated_time, "6 weeks");
    }

    #[test]
    fn test_percentage_shapes_are_clamped() {
        assert_eq!(parse(json!({"matchPercentage": 82.6})).unwrap().match_percentage, 83);
        assert_eq!(parse(json!({"matchPercentage": "64%"})).unwrap().match_percentage, 64);
        assert_eq!(parse(json!({"matchPercentage": 140})).unwrap().match_percentage, 100);
        assert_eq!(parse(json!({"matchPercentage": -5})).unwrap().match_percentage, 0);
    }

    #[test]
    fn test_missing_or_garbage_percentage_fails() {
        assert!(parse(json!({"matchedSkills": ["Rust"]})).is_err());
        assert!(parse(json!({"matchPercentage": "high"})).is_err());
        assert!(parse(json!({"matchPercentage": [1]})).is_err());
    }

    #[test]
    fn test_lists_are_bounded() {
        let gap = parse(json!({
            "missingSkills": ["a", "b", "c", "d", "e", "f", "g"],
            "matchPercentage": 40,
            "learningPaths": [
                {"skill": "a"}, {"skill": "b"}, {"skill": "c"}, {"skill": "d"}
            ]
        }))
        .unwrap()
        .normalize()
        .unwrap();

        assert_eq!(gap.missing_skills, vec!["a", "b", "c", "d", "e"]);
        assert_eq!(gap.learning_paths.len(), MAX_LEARNING_PATHS);
        assert_eq!(gap.learning_paths[2].skill, "c");
    }

    #[test]
    fn test_fallback_takes_first_five_resume_skills() {
        let skills: Vec<String> = ["Rust", "Go", "SQL", "Docker", "AWS", "Kafka"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let gap = SkillGapAssessment::fallback(&skills);

        assert_eq!(gap.matched_skills, &skills[..5]);
        assert_eq!(gap.missing_skills, vec!["Analysis pending"]);
        assert_eq!(gap.match_percentage, 70);
        assert!(gap.learning_paths.is_empty());
    }

    #[test]
    fn test_fallback_with_few_skills() {
        let gap = SkillGapAssessment::fallback(&["Rust".to_string()]);
        assert_eq!(gap.matched_skills, vec!["Rust"]);
    }
}
