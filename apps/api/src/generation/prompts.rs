// All LLM prompt constants for the resume generation module.
// Reuses cross-cutting fragments from llm_client::prompts.
//
// Rule text is fixed; only the `{...}` data placeholders vary between requests.

/// Temperature for resume generation; low so reruns stay close to each other.
pub const GENERATION_TEMPERATURE: f32 = 0.2;
pub const GENERATION_MAX_TOKENS: u32 = 2000;

/// Characters of existing resume text embedded in the prompt.
pub const RESUME_TEXT_MAX_CHARS: usize = 15_000;

/// Output schema the model must follow.
pub const RESUME_OUTPUT_SCHEMA: &str = r#"{
  "name": "Candidate Name",
  "contact": { "email": "...", "location": "..." },
  "summary": "Professional summary...",
  "skills": [ { "skill": "Skill Name", "level": "familiar | working | strong", "description": "How the skill is used, with one concrete example from the data" } ],
  "experience": [ { "role": "...", "company": "...", "dates": "...", "bullets": ["..."] } ],
  "projects": [ { "name": "...", "short_desc": "...", "tech": ["..."], "bullets": ["..."], "url": "..." } ],
  "education": [ { "degree": "...", "school": "...", "year": "..." } ]
}"#;

/// System prompt for resume generation.
/// Replace: {grounding_instruction}, {json_only_instruction}, {output_schema}
pub const GENERATION_SYSTEM_TEMPLATE: &str = r#"You are an AI resume generator.
You will receive two inputs:
1. Extracted Resume Data (raw text exactly as parsed from the candidate's existing resume)
2. GitHub Project Data (repositories, languages, descriptions, stars, activity, README excerpts)

{grounding_instruction}

TASKS:
- Write a professional summary strictly based on the candidate's real experience, roles, skills and GitHub activity.
- Extract and rewrite skills using only what appears in the resume OR the GitHub data.
- Rewrite experience using the real job titles, dates, tools and tasks.
- Rewrite projects using the real GitHub data.

HARD RULES:
1. Never fabricate. If a field has no supporting data, return an empty string or empty array for it.
2. Prefer concrete examples: name a repository or a real responsibility instead of generic praise.
3. List at most 8 skills.
4. List at most 5 projects, ranked by stars (highest first) and then by commit activity.
5. Each project gets 2 to 3 bullets: purpose, key technology, and one outcome it demonstrates.
6. Match the requested tone without changing any facts.

OUTPUT FORMAT (strict JSON):
{output_schema}

{json_only_instruction}"#;

/// User message for resume generation.
/// Replace: {resume_text}, {github_json}, {tone}, {target_role}
pub const GENERATION_PROMPT_TEMPLATE: &str = r#"INPUTS:
Resume Data:
{resume_text}

GitHub Data:
{github_json}

Tone: {tone}
Target role: {target_role}"#;
