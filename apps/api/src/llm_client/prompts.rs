// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it;
// this file holds the cross-cutting pieces.

/// Appended to every system prompt so JSON-object mode always has an instruction to follow.
pub const JSON_ONLY_INSTRUCTION: &str = "You MUST respond with a single valid JSON object. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Common no-fabrication rule shared by the resume and analysis prompts.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Use ONLY the data provided below. Never invent achievements, employers, \
    metrics, skills, or dates that are not present in the inputs. \
    If a field has no supporting data, leave it empty.";
