//! Turning raw completions into artifact content

use crate::error::GeneratorError;
use clarity_model::{ArtifactContent, ArtifactKind};

/// Parse a raw completion for `kind`
///
/// Text kinds are trimmed. Structured kinds must parse as JSON of the
/// expected shape (array for competitors, object for surveys); a single
/// surrounding markdown code fence is tolerated.
pub fn parse(kind: ArtifactKind, raw: &str) -> Result<ArtifactContent, GeneratorError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(GeneratorError::EmptyResponse);
    }
    if !kind.is_structured() {
        return Ok(ArtifactContent::Text(text.to_string()));
    }

    let value: serde_json::Value = serde_json::from_str(strip_code_fence(text))
        .map_err(|_| GeneratorError::MalformedOutput("invalid JSON response".to_string()))?;

    let shape_ok = match kind {
        ArtifactKind::Competitors => value.is_array(),
        ArtifactKind::Survey => value.is_object(),
        ArtifactKind::Tweet | ArtifactKind::LandingPage => true,
    };
    if !shape_ok {
        return Err(GeneratorError::MalformedOutput(format!(
            "invalid JSON response: unexpected shape for {kind}"
        )));
    }
    Ok(ArtifactContent::Json(value))
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Skip the info string (e.g. "json") on the opening line
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.strip_suffix("```").unwrap_or(body).trim()
}
