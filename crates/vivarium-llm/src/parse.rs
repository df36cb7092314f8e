//! LLM response parsing into typed decisions.
//!
//! Models return text that is ideally JSON but often is not quite: wrapped
//! in a markdown code fence, or carrying trailing commas. Parsing tries
//! each recovery in turn and fails only when none of them yields JSON with
//! a known action name.

use vivarium_types::{Decision, TaskKind};

use crate::error::ProviderError;

/// Confidence assumed when the model omits the field.
const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Raw shape of the model's JSON answer.
#[derive(Debug, serde::Deserialize)]
struct RawDecision {
    action: String,
    #[serde(default)]
    reasoning: String,
    #[serde(default)]
    confidence: Option<f64>,
}

/// Parse a model response into a [`Decision`].
///
/// Recovery strategies, in order:
/// 1. direct JSON
/// 2. JSON inside a markdown code fence
/// 3. trailing commas stripped
/// 4. code fence content with trailing commas stripped
///
/// Confidence is clamped to `[0, 1]` and defaults to 0.5 when absent, so a
/// well-formed action without a stated confidence still clears the
/// engine's floor.
///
/// # Errors
///
/// Returns [`ProviderError::Parse`] when no strategy yields JSON, or when
/// the JSON names an action outside the task vocabulary.
pub fn parse_decision(raw: &str) -> Result<Decision, ProviderError> {
    let trimmed = raw.trim();

    if let Ok(parsed) = serde_json::from_str::<RawDecision>(trimmed) {
        return convert(parsed);
    }

    if let Some(inner) = fenced_block(trimmed)
        && let Ok(parsed) = serde_json::from_str::<RawDecision>(inner)
    {
        return convert(parsed);
    }

    let cleaned = strip_trailing_commas(trimmed);
    if let Ok(parsed) = serde_json::from_str::<RawDecision>(&cleaned) {
        return convert(parsed);
    }

    if let Some(inner) = fenced_block(trimmed) {
        let cleaned_inner = strip_trailing_commas(inner);
        if let Ok(parsed) = serde_json::from_str::<RawDecision>(&cleaned_inner) {
            return convert(parsed);
        }
    }

    Err(ProviderError::Parse(format!(
        "no parse strategy accepted the response: {trimmed}"
    )))
}

/// Turn a deserialized raw answer into a typed decision.
fn convert(raw: RawDecision) -> Result<Decision, ProviderError> {
    let action = TaskKind::parse(&raw.action)
        .ok_or_else(|| ProviderError::Parse(format!("unknown action: {}", raw.action)))?;
    Ok(Decision::new(
        action,
        raw.reasoning,
        raw.confidence.unwrap_or(DEFAULT_CONFIDENCE),
    ))
}

/// Pull the contents of the first markdown code fence, if any.
///
/// Handles both ```` ``` ```` and ```` ```json ```` openings by skipping to
/// the first newline after the fence.
fn fenced_block(text: &str) -> Option<&str> {
    let fence = text.find("```")?;
    let tail = text.get(fence..)?;
    let newline = tail.find('\n')?;
    let body = tail.get(newline.checked_add(1)?..)?;
    let close = body.find("```")?;
    body.get(..close).map(str::trim)
}

/// Drop commas that sit directly before a closing brace or bracket.
fn strip_trailing_commas(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ',' {
            // Peek past whitespace without consuming it.
            let mut lookahead = chars.clone();
            while lookahead.peek().is_some_and(|next| next.is_whitespace()) {
                lookahead.next();
            }
            if matches!(lookahead.peek().copied(), Some('}' | ']')) {
                continue;
            }
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn parses_clean_json() {
        let raw = r#"{"action": "gather", "reasoning": "food is low", "confidence": 0.8}"#;
        let decision = parse_decision(raw).ok();
        let Some(decision) = decision else { return };
        assert_eq!(decision.action, TaskKind::Gather);
        assert_eq!(decision.reasoning, "food is low");
        assert_eq!(decision.confidence, 0.8);
    }

    #[test]
    fn missing_confidence_defaults_to_midpoint() {
        let raw = r#"{"action": "explore", "reasoning": "curious"}"#;
        let decision = parse_decision(raw).ok();
        assert_eq!(decision.map(|d| d.confidence), Some(DEFAULT_CONFIDENCE));
    }

    #[test]
    fn missing_reasoning_defaults_to_empty() {
        let raw = r#"{"action": "defend", "confidence": 0.9}"#;
        let decision = parse_decision(raw).ok();
        assert_eq!(decision.map(|d| d.reasoning), Some(String::new()));
    }

    #[test]
    fn confidence_is_clamped() {
        let raw = r#"{"action": "build", "confidence": 3.5}"#;
        let decision = parse_decision(raw).ok();
        assert_eq!(decision.map(|d| d.confidence), Some(1.0));
    }

    #[test]
    fn action_case_is_forgiven() {
        let raw = r#"{"action": "GATHER", "confidence": 0.7}"#;
        let decision = parse_decision(raw).ok();
        assert_eq!(decision.map(|d| d.action), Some(TaskKind::Gather));
    }

    #[test]
    fn parses_from_json_fence() {
        let raw = "Here is my decision:\n\n```json\n{\"action\": \"communicate\", \"confidence\": 0.6}\n```\n\nI want to talk.";
        let decision = parse_decision(raw).ok();
        assert_eq!(decision.map(|d| d.action), Some(TaskKind::Communicate));
    }

    #[test]
    fn parses_from_bare_fence() {
        let raw = "```\n{\"action\": \"explore\"}\n```";
        let decision = parse_decision(raw).ok();
        assert_eq!(decision.map(|d| d.action), Some(TaskKind::Explore));
    }

    #[test]
    fn parses_with_trailing_comma() {
        let raw = r#"{"action": "gather", "reasoning": "hungry",}"#;
        let decision = parse_decision(raw).ok();
        assert_eq!(decision.map(|d| d.action), Some(TaskKind::Gather));
    }

    #[test]
    fn parses_fenced_json_with_trailing_comma() {
        let raw = "```json\n{\"action\": \"build\", \"confidence\": 0.7,}\n```";
        let decision = parse_decision(raw).ok();
        assert_eq!(decision.map(|d| d.action), Some(TaskKind::Build));
    }

    #[test]
    fn unknown_action_fails() {
        let raw = r#"{"action": "teleport", "confidence": 0.9}"#;
        assert!(parse_decision(raw).is_err());
    }

    #[test]
    fn prose_fails() {
        let raw = "I think the creature should gather some food now.";
        assert!(parse_decision(raw).is_err());
    }

    #[test]
    fn empty_response_fails() {
        assert!(parse_decision("").is_err());
    }

    #[test]
    fn fenced_block_extracts_between_fences() {
        let text = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(fenced_block(text), Some("{\"key\": \"value\"}"));
    }

    #[test]
    fn fenced_block_without_fence_is_none() {
        assert_eq!(fenced_block("{\"key\": \"value\"}"), None);
    }

    #[test]
    fn strip_trailing_commas_in_objects_and_arrays() {
        assert_eq!(strip_trailing_commas(r#"{"a": 1, "b": 2,}"#), r#"{"a": 1, "b": 2}"#);
        assert_eq!(strip_trailing_commas("[1, 2, 3, ]"), "[1, 2, 3 ]");
        assert_eq!(strip_trailing_commas(r#"{"a": [1,2,],}"#), r#"{"a": [1,2]}"#);
    }
}
