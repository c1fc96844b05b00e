//! Code explanation and question answering. A remote provider is asked for
//! a JSON object; any failure along the way lands on `HeuristicProvider`.

use serde::{Deserialize, Serialize};

use crate::debug_log;

use super::heuristic::HeuristicProvider;
use super::{AiProvider, AiRegistry};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum ExplanationSource {
    Provider(String),
    Heuristic,
}

impl std::fmt::Display for ExplanationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExplanationSource::Provider(name) => write!(f, "{}", name),
            ExplanationSource::Heuristic => write!(f, "heuristic"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeExplanation {
    pub summary: String,
    pub details: Vec<String>,
    pub suggestions: Vec<String>,
    pub source: ExplanationSource,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assistance {
    pub answer: String,
    pub suggestions: Vec<String>,
    pub source: ExplanationSource,
}

#[derive(Debug, Deserialize)]
struct RemoteExplanation {
    summary: String,
    #[serde(default)]
    details: Vec<String>,
    #[serde(default)]
    suggestions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RemoteAssistance {
    answer: String,
    #[serde(default)]
    suggestions: Vec<String>,
}

pub fn explain_code(source: &str, registry: &AiRegistry, provider: Option<&str>) -> CodeExplanation {
    let prompt = format!(
        "Explain the following Singularis Prime code. Respond with a JSON object \
         {{\"summary\": string, \"details\": [string], \"suggestions\": [string]}}.\n\n```\n{}\n```",
        source
    );
    if let Some((name, remote)) = ask::<RemoteExplanation>(registry, provider, &prompt) {
        return CodeExplanation {
            summary: remote.summary,
            details: remote.details,
            suggestions: remote.suggestions,
            source: ExplanationSource::Provider(name.to_string()),
        };
    }
    HeuristicProvider.explain(source)
}

pub fn assist(question: &str, source: Option<&str>, registry: &AiRegistry, provider: Option<&str>) -> Assistance {
    let mut prompt = format!(
        "Answer this question about the Singularis Prime language. Respond with a JSON object \
         {{\"answer\": string, \"suggestions\": [string]}}.\n\nQuestion: {}",
        question.trim()
    );
    if let Some(src) = source {
        prompt.push_str(&format!("\n\nContext code:\n```\n{}\n```", src));
    }
    if let Some((name, remote)) = ask::<RemoteAssistance>(registry, provider, &prompt) {
        return Assistance {
            answer: remote.answer,
            suggestions: remote.suggestions,
            source: ExplanationSource::Provider(name.to_string()),
        };
    }
    HeuristicProvider.assist(question, source)
}

fn ask<T: for<'de> Deserialize<'de>>(
    registry: &AiRegistry,
    provider: Option<&str>,
    prompt: &str,
) -> Option<(&'static str, T)> {
    let Some(p) = registry.select(provider) else {
        debug_log!("ai: no provider available ({:?}), using heuristic", provider);
        return None;
    };
    let reply = match p.chat(prompt) {
        Ok(r) => r,
        Err(e) => {
            debug_log!("ai: {} failed: {}; using heuristic", p.name(), e);
            return None;
        }
    };
    match serde_json::from_str::<T>(json_body(&reply)) {
        Ok(v) => Some((p.name(), v)),
        Err(e) => {
            debug_log!("ai: {} returned unusable JSON: {}; using heuristic", p.name(), e);
            None
        }
    }
}

// Models sometimes wrap the object in a fenced block.
fn json_body(reply: &str) -> &str {
    match (reply.find('{'), reply.rfind('}')) {
        (Some(start), Some(end)) if end > start => &reply[start..=end],
        _ => reply,
    }
}
