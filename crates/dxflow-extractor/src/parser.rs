//! Parse LLM replies into workflow graphs

use crate::error::AnalyzerError;
use dxflow_domain::{GraphEdge, GraphNode, ProblemListItem};
use serde::Deserialize;
use tracing::debug;

/// Graph portion of an inference reply
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferredGraph {
    /// Diagnosis and next-action nodes
    pub nodes: Vec<GraphNode>,
    /// Relationships between nodes
    pub edges: Vec<GraphEdge>,
    /// Coded problem list
    pub problem_list: Vec<ProblemListItem>,
}

/// Parse an LLM reply into a graph
///
/// The whole reply is rejected if any part fails to deserialize.
pub fn parse_llm_response(response: &str) -> Result<InferredGraph, AnalyzerError> {
    let json_str = extract_json(response)?;
    let value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| AnalyzerError::InvalidFormat(format!("Reply is not valid JSON: {}", e)))?;

    if !value.is_object() {
        return Err(AnalyzerError::InvalidFormat("Expected a JSON object".to_string()));
    }

    let graph: InferredGraph = serde_json::from_value(value)
        .map_err(|e| AnalyzerError::InvalidResult(format!("Reply does not match graph shape: {}", e)))?;

    debug!(
        "Parsed reply: {} nodes, {} edges, {} problems",
        graph.nodes.len(),
        graph.edges.len(),
        graph.problem_list.len()
    );
    Ok(graph)
}

/// Locate the JSON object in a reply
///
/// Accepts a bare object, an object inside a markdown code fence, or the
/// first balanced `{...}` embedded in prose.
pub fn extract_json(response: &str) -> Result<&str, AnalyzerError> {
    let trimmed = response.trim();

    if let Some(fenced) = fenced_block(trimmed) {
        if let Some(object) = balanced_object(fenced) {
            return Ok(object);
        }
    }

    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return Ok(trimmed);
    }

    balanced_object(trimmed)
        .ok_or_else(|| AnalyzerError::InvalidFormat("No JSON object found in reply".to_string()))
}

/// Contents of the first ``` fence, skipping an optional language tag
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")? + 3;
    let rest = &text[start..];
    let body_start = rest.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &rest[body_start..];
    let end = body.find("```").unwrap_or(body.len());
    Some(body[..end].trim())
}

/// First balanced `{...}` slice, ignoring braces inside JSON strings
fn balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
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
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}
