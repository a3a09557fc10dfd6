// Prompt templates and builders for every stage.
// Templates use `{placeholder}` markers filled in one pass by `fill_template`.

use crate::llm_client::prompts::{json_only_system, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{ContentPart, MessageContent};
use crate::models::document::ResumeDocument;
use crate::models::resume::ResumeProfile;
use crate::stages::StagePrompt;

pub const RESUME_PARSE_SYSTEM: &str = r#"You are an expert resume analyzer. Extract structured data from resumes with precision.

Your task is to analyze a resume and extract the following information in JSON format:
1. name: Full name of the candidate
2. email: Email address (if present)
3. phone: Phone number (if present)
4. skills: Array of technical and soft skills
5. experience: Array of work experience objects with {title, company, duration, description}
6. education: Array of education objects with {degree, institution, year}
7. summary: A brief professional summary (2-3 sentences)

Be thorough and extract ALL skills mentioned, including those embedded in job descriptions.
Respond with the JSON object only. Do NOT use markdown code fences."#;

pub const RESUME_PARSE_INSTRUCTION: &str =
    "Please analyze this resume and extract the structured data. Return ONLY valid JSON, no markdown or additional text.";

/// Header for the PDF text layer sent next to the inline document.
const TEXT_LAYER_HEADER: &str = "Text extracted from the document (may be incomplete):";

/// Replace: {skills_json}, {job_description}
pub const SKILL_GAP_PROMPT_TEMPLATE: &str = r#"You are an expert career advisor. Compare the candidate's skills against a job description.

RESUME SKILLS: {skills_json}

JOB DESCRIPTION:
{job_description}

Analyze and return JSON with:
1. matchedSkills: Array of skills from the resume that match the job requirements
2. missingSkills: Array of skills required by the job but not in the resume (max 5 most important, most important first)
3. matchPercentage: A number 0-100 representing how well the candidate matches
4. learningPaths: Array of {skill, resources: ["resource1", "resource2"], estimatedTime: "X weeks/months"} for the top 3 missing skills

{json_only}"#;

pub const COVER_LETTER_SYSTEM: &str =
    "You are a professional cover letter writer. Answer with the letter text only: no markdown, no commentary.";

/// Replace: {name}, {skills}, {experience_json}, {education_json}, {job_description}
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"You are an expert career coach and professional writer. Write a compelling, personalized cover letter.

CANDIDATE PROFILE:
Name: {name}
Skills: {skills}
Experience: {experience_json}
Education: {education_json}

JOB DESCRIPTION:
{job_description}

Write a professional cover letter that:
1. Opens with a strong, personalized hook
2. Highlights 2-3 most relevant experiences/skills
3. Shows enthusiasm and cultural fit
4. Closes with a confident call to action
5. Is approximately 300-400 words
6. Uses a professional but personable tone

Return the cover letter as plain text, properly formatted with paragraphs. Do not use markdown."#;

/// Replace: {cover_letter}, {job_description}
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"You are a hiring manager evaluating a cover letter. Score it on three metrics from 1-10:

COVER LETTER:
{cover_letter}

JOB DESCRIPTION:
{job_description}

Score:
1. Relevance (1-10): Does it address the job requirements?
2. Accuracy (1-10): Is it faithful to the candidate's actual experience?
3. Effectiveness (1-10): How persuasive and engaging is it?

Also provide a brief feedback sentence.

Return ONLY JSON in this format, no markdown:
{
  "relevance": number,
  "accuracy": number,
  "effectiveness": number,
  "overall": number (average of the three),
  "feedback": "string"
}"#;

/// Replace: {name}, {skills}, {experience_json}, {job_description}
pub const INTERVIEW_PROMPT_TEMPLATE: &str = r#"You are a senior technical interviewer. Generate 5 custom interview questions.

CANDIDATE PROFILE:
Name: {name}
Skills: {skills}
Experience: {experience_json}

JOB DESCRIPTION:
{job_description}

Generate exactly 5 questions:
- 3 Technical questions (test specific skills mentioned in the JD)
- 2 Behavioral questions (assess culture fit and soft skills)

Return ONLY JSON in this format, no markdown:
{
  "questions": [
    {
      "question": "string",
      "type": "technical" or "behavioral",
      "focus": "what skill/trait this tests"
    }
  ]
}"#;

/// Résumé parsing: the document travels inline as an image part, with the
/// PDF text layer appended when one was found.
pub fn resume_parse_prompt(document: &ResumeDocument, text_layer: Option<&str>) -> StagePrompt {
    let mut parts = vec![
        ContentPart::text(RESUME_PARSE_INSTRUCTION),
        ContentPart::image(document.data_url()),
    ];
    if let Some(text) = text_layer {
        parts.push(ContentPart::text(format!("{TEXT_LAYER_HEADER}\n{text}")));
    }

    StagePrompt {
        system: RESUME_PARSE_SYSTEM.to_string(),
        user: MessageContent::Parts(parts),
    }
}

pub fn skill_gap_prompt(profile: &ResumeProfile, job_description: &str) -> StagePrompt {
    let skills_json = serde_json::to_string(&profile.skills).unwrap_or_else(|_| "[]".to_string());

    StagePrompt {
        system: json_only_system("a career advisor"),
        user: MessageContent::Text(fill_template(
            SKILL_GAP_PROMPT_TEMPLATE,
            &[
                ("skills_json", &skills_json),
                ("job_description", job_description),
                ("json_only", JSON_ONLY_INSTRUCTION),
            ],
        )),
    }
}

pub fn cover_letter_prompt(profile: &ResumeProfile, job_description: &str) -> StagePrompt {
    let experience_json =
        serde_json::to_string(&profile.experience).unwrap_or_else(|_| "[]".to_string());
    let education_json =
        serde_json::to_string(&profile.education).unwrap_or_else(|_| "[]".to_string());

    StagePrompt {
        system: COVER_LETTER_SYSTEM.to_string(),
        user: MessageContent::Text(fill_template(
            COVER_LETTER_PROMPT_TEMPLATE,
            &[
                ("name", &profile.name),
                ("skills", &profile.skills.join(", ")),
                ("experience_json", &experience_json),
                ("education_json", &education_json),
                ("job_description", job_description),
            ],
        )),
    }
}

/// Embeds the generated letter verbatim, so it can only be built after generation.
pub fn evaluation_prompt(cover_letter: &str, job_description: &str) -> StagePrompt {
    StagePrompt {
        system: json_only_system("a hiring manager"),
        user: MessageContent::Text(fill_template(
            EVALUATION_PROMPT_TEMPLATE,
            &[
                ("cover_letter", cover_letter),
                ("job_description", job_description),
            ],
        )),
    }
}

pub fn interview_prompt(profile: &ResumeProfile, job_description: &str) -> StagePrompt {
    let experience_json =
        serde_json::to_string(&profile.experience).unwrap_or_else(|_| "[]".to_string());

    StagePrompt {
        system: json_only_system("a technical interviewer"),
        user: MessageContent::Text(fill_template(
            INTERVIEW_PROMPT_TEMPLATE,
            &[
                ("name", &profile.name),
                ("skills", &profile.skills.join(", ")),
                ("experience_json", &experience_json),
                ("job_description", job_description),
            ],
        )),
    }
}

/// Replaces each `{key}` marker of `template` in a single left-to-right pass.
/// Inserted values are never scanned again, so a value that looks like a
/// marker stays as written. Braces that do not name a key are kept.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let marker = values.iter().find(|(key, _)| {
            tail.strip_prefix(key)
                .is_some_and(|after| after.starts_with('}'))
        });
        match marker {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}
