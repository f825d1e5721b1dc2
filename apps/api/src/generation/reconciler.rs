//! Response Reconciler: turns an LLM completion into a well-formed `GenerationResult`.
//!
//! Steps: resolve `Completion` into a JSON object → apply the field synonym table →
//! coerce the list fields → fill name/contact from the request profile.
//! Only adds missing structure; nothing the model produced is thrown away.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::llm_client::Completion;
use crate::models::lenient::value_to_string;
use crate::models::profile::{CandidateProfile, Contact};
use crate::models::result::{
    EducationEntry, ExperienceEntry, GenerationResult, ProjectEntry, SkillEntry,
};
use crate::text::truncate_chars;

/// `(synonym, canonical)` pairs. When the canonical field is missing or empty,
/// the synonym's value moves into it. Never applied in reverse.
pub const FIELD_SYNONYMS: &[(&str, &str)] = &[("executive_summary", "summary")];

/// `(list field, synonym, canonical)` for keys inside list entries, same rules as `FIELD_SYNONYMS`.
pub const ENTRY_SYNONYMS: &[(&str, &str, &str)] = &[("projects", "shortDesc", "short_desc")];

/// Fields that must always be arrays in the reconciled output.
pub const LIST_FIELDS: [&str; 4] = ["skills", "projects", "experience", "education"];

const DIAGNOSTIC_EXCERPT_CHARS: usize = 200;

/// Resolves a completion into a JSON object.
///
/// `Parsed` content is used as-is. `Raw` text is parsed directly, then by
/// extracting the first balanced top-level `{...}` span (prose or code fences
/// around the JSON are common).
pub fn parse_completion(completion: Completion) -> Result<Map<String, Value>, AppError> {
    let value = match completion {
        Completion::Parsed(value) => value,
        Completion::Raw(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Err(AppError::EmptyCompletion);
            }
            parse_raw(text)?
        }
    };

    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Err(AppError::EmptyCompletion),
        other => Err(AppError::UnparsableCompletion(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn parse_raw(text: &str) -> Result<Value, AppError> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Ok(value);
    }

    for candidate in object_spans(text) {
        if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(candidate) {
            debug!("Recovered JSON object embedded in completion text");
            return Ok(value);
        }
    }

    Err(AppError::UnparsableCompletion(format!(
        "no JSON object found in completion: {:?}",
        truncate_chars(text, DIAGNOSTIC_EXCERPT_CHARS)
    )))
}

/// Balanced `{...}` spans in `text`, outermost first, in order of appearance.
/// Braces inside JSON string literals are ignored.
fn object_spans(text: &str) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = idx;
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    spans.push(&text[start..=idx]);
                }
            }
            _ => {}
        }
    }
    spans
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Applies `FIELD_SYNONYMS` in place.
pub fn apply_synonyms(map: &mut Map<String, Value>) {
    for (synonym, canonical) in FIELD_SYNONYMS {
        move_synonym(map, synonym, canonical);
    }
}

/// Applies the `ENTRY_SYNONYMS` rows for `field` to one entry of that list.
fn apply_entry_synonyms(field: &str, entry: &mut Map<String, Value>) {
    for (_, synonym, canonical) in ENTRY_SYNONYMS.iter().filter(|(f, _, _)| *f == field) {
        move_synonym(entry, synonym, canonical);
    }
}

fn move_synonym(map: &mut Map<String, Value>, synonym: &str, canonical: &str) {
    let canonical_missing = map.get(canonical).map_or(true, is_blank);
    if canonical_missing && map.get(synonym).is_some_and(|v| !is_blank(v)) {
        if let Some(value) = map.remove(synonym) {
            map.insert(canonical.to_string(), value);
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Full reconciliation of one completion against the request profile.
pub fn reconcile_completion(
    completion: Completion,
    profile: &CandidateProfile,
) -> Result<GenerationResult, AppError> {
    let map = parse_completion(completion)?;
    Ok(reconcile(map, profile))
}

/// Builds a `GenerationResult` from a parsed reply. Never fails.
pub fn reconcile(mut map: Map<String, Value>, profile: &CandidateProfile) -> GenerationResult {
    apply_synonyms(&mut map);

    for field in LIST_FIELDS {
        if map.get(field).is_some_and(|v| !v.is_array()) {
            warn!("Model returned non-array `{field}`; replacing with an empty list");
            map.insert(field.to_string(), Value::Array(Vec::new()));
        }
    }

    let name = map
        .remove("name")
        .map(|v| value_to_string(&v))
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| profile.name.clone());

    let contact = reconcile_contact(map.remove("contact"), &profile.contact);

    let summary = map
        .remove("summary")
        .map(|v| value_to_string(&v))
        .unwrap_or_default();

    let skills = take_entries(&mut map, "skills", |text| SkillEntry {
        skill: text,
        ..Default::default()
    });
    let projects = take_entries(&mut map, "projects", |text| ProjectEntry {
        name: text,
        ..Default::default()
    });
    let experience = take_entries(&mut map, "experience", |text| ExperienceEntry {
        role: text,
        ..Default::default()
    });
    let education = take_entries(&mut map, "education", |text| EducationEntry {
        degree: text,
        ..Default::default()
    });

    let notes = map
        .remove("notes")
        .map(|v| value_to_string(&v))
        .filter(|n| !n.is_empty());

    // The fallback flag is ours to set, not the model's.
    map.remove("is_fallback");

    GenerationResult {
        name,
        contact,
        summary,
        skills,
        projects,
        experience,
        education,
        is_fallback: false,
        notes,
        extra: map,
    }
}

/// Model contact wins field by field; gaps are filled from the request.
fn reconcile_contact(value: Option<Value>, requested: &Contact) -> Contact {
    let Some(mut contact) = value
        .filter(Value::is_object)
        .and_then(|v| serde_json::from_value::<Contact>(v).ok())
    else {
        return requested.clone();
    };

    if contact.email.is_empty() {
        contact.email = requested.email.clone();
    }
    if contact.location.is_empty() {
        contact.location = requested.location.clone();
    }
    for (key, value) in &requested.extra {
        contact
            .extra
            .entry(key.clone())
            .or_insert_with(|| value.clone());
    }
    contact
}

/// Removes a list field and converts its items. Bare strings become the entry's
/// primary field; objects are read leniently; other scalars are skipped.
fn take_entries<T, F>(map: &mut Map<String, Value>, field: &str, from_text: F) -> Vec<T>
where
    T: DeserializeOwned,
    F: Fn(String) -> T,
{
    let Some(Value::Array(items)) = map.remove(field) else {
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(text) if !text.trim().is_empty() => {
                Some(from_text(text.trim().to_string()))
            }
            Value::Object(mut entry) => {
                apply_entry_synonyms(field, &mut entry);
                match serde_json::from_value::<T>(Value::Object(entry)) {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        warn!("Skipping malformed `{field}` entry: {e}");
                        None
                    }
                }
            }
            _ => None,
        })
        .collect()
}
