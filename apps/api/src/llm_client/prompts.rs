// Shared prompt fragments.
// Each stage builds its own prompts in stages/prompts.rs; cross-cutting
// fragments live here.

/// Appended to every instruction that expects a structured answer.
pub const JSON_ONLY_INSTRUCTION: &str = "Return ONLY valid JSON, no markdown or additional text.";

/// System prompt used by the stages whose answer is a single JSON object.
pub fn json_only_system(role: &str) -> String {
    format!("You are {role}. {JSON_ONLY_INSTRUCTION}")
}
