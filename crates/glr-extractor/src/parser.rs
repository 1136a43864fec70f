//! Parse model output into extracted data

use crate::error::GlrError;
use glr_domain::{ExtractedData, ExtractionField, FieldValue};
use serde_json::Value;
use tracing::{debug, warn};

/// Parse the field-extraction reply into a complete mapping
///
/// Keys the model left out become `NotFound`; unknown keys are ignored.
///
/// # Errors
///
/// Returns [`GlrError::ModelResponse`] if the reply is not a JSON object or
/// names none of the requested fields.
pub fn parse_extraction_response(
    response: &str,
    fields: &[ExtractionField],
) -> Result<ExtractedData, GlrError> {
    let json_str = extract_json(response)?;

    let json: Value = serde_json::from_str(&json_str)?;

    let object = json
        .as_object()
        .ok_or_else(|| GlrError::ModelResponse("Expected a JSON object".to_string()))?;

    let mut data = ExtractedData::not_found();
    let mut recognized = 0usize;

    for (key, value) in object {
        let Some(field) = ExtractionField::parse(key).filter(|f| fields.contains(f)) else {
            debug!("Ignoring unexpected key '{}'", key);
            continue;
        };
        recognized += 1;
        data.set(field, field_value(value));
    }

    if recognized == 0 && !fields.is_empty() {
        return Err(GlrError::ModelResponse(
            "Response contains none of the expected fields".to_string(),
        ));
    }

    let missing = fields.len().saturating_sub(recognized);
    if missing > 0 {
        warn!("Model omitted {} field(s); treating them as not found", missing);
    }

    Ok(data)
}

/// Extract JSON from a reply, handling markdown code fences
fn extract_json(response: &str) -> Result<String, GlrError> {
    let trimmed = response.trim();

    if trimmed.is_empty() {
        return Err(GlrError::ModelResponse("Empty response".to_string()));
    }

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(GlrError::ModelResponse("Empty code block".to_string()));
        }

        // Skip the opening fence and, when present, the closing one
        let end = if lines.len() > 2 && lines[lines.len() - 1].trim_start().starts_with("```") {
            lines.len() - 1
        } else {
            lines.len()
        };
        Ok(lines[1..end].join("\n"))
    } else {
        Ok(trimmed.to_string())
    }
}

fn field_value(value: &Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::NotFound,
        Value::String(s) => FieldValue::from_text(s.as_str()),
        Value::Bool(b) => FieldValue::from_text(b.to_string()),
        Value::Number(n) => FieldValue::from_text(n.to_string()),
        nested => FieldValue::from_text(nested.to_string()),
    }
}

/// Fields whose found value does not occur in the source text
///
/// Both sides are compared with runs of whitespace collapsed to one space, so
/// a value copied across a line break still counts as grounded.
pub fn unverified_fields(data: &ExtractedData, source: &str) -> Vec<ExtractionField> {
    let haystack = normalize_whitespace(source);
    data.found()
        .filter(|(_, value)| !haystack.contains(&normalize_whitespace(value)))
        .map(|(field, _)| field)
        .collect()
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
