use anyhow::{bail, Result};
use singularis_prime::ai::{assist, explain_code, AiProvider, AiRegistry, ExplanationSource};

const SOURCE: &str = "contract Guard { enforce explainabilityThreshold(0.9); }\ndeployModel M to edge { replicas: 2; }\n";

struct Scripted {
    name: &'static str,
    reply: Option<&'static str>,
}

impl AiProvider for Scripted {
    fn name(&self) -> &'static str { self.name }
    fn chat(&self, _prompt: &str) -> Result<String> {
        match self.reply {
            Some(r) => Ok(r.to_string()),
            None => bail!("connection refused"),
        }
    }
}

fn registry_with(reply: Option<&'static str>) -> AiRegistry {
    let mut r = AiRegistry::empty();
    r.register(Box::new(Scripted { name: "scripted", reply }));
    r
}

#[test]
fn no_provider_uses_heuristic() {
    let e = explain_code(SOURCE, &AiRegistry::empty(), None);
    assert_eq!(e.source, ExplanationSource::Heuristic);
    assert_eq!(e.summary, "2 declaration(s): 1 contract, 1 model deployment.");
    assert_eq!(e.details.len(), 2);
}

#[test]
fn failing_provider_falls_back() {
    let e = explain_code(SOURCE, &registry_with(None), None);
    assert_eq!(e.source, ExplanationSource::Heuristic);
}

#[test]
fn malformed_reply_falls_back() {
    let e = explain_code(SOURCE, &registry_with(Some("Sure! Here is what it does...")), None);
    assert_eq!(e.source, ExplanationSource::Heuristic);
    let e = explain_code(SOURCE, &registry_with(Some("{\"details\": []}")), None);
    assert_eq!(e.source, ExplanationSource::Heuristic);
}

#[test]
fn well_formed_reply_is_used() {
    let reply = "```json\n{\"summary\": \"A guarded deployment.\", \"suggestions\": [\"Add monitoring\"]}\n```";
    let e = explain_code(SOURCE, &registry_with(Some(reply)), None);
    assert_eq!(e.source, ExplanationSource::Provider("scripted".into()));
    assert_eq!(e.summary, "A guarded deployment.");
    assert!(e.details.is_empty());
    assert_eq!(e.suggestions, vec!["Add monitoring".to_string()]);
}

#[test]
fn unknown_provider_name_falls_back() {
    let reply = "{\"summary\": \"remote\"}";
    let e = explain_code(SOURCE, &registry_with(Some(reply)), Some("openai"));
    assert_eq!(e.source, ExplanationSource::Heuristic);
}

#[test]
fn assist_uses_remote_answer_or_heuristic() {
    let a = assist("What is a contract?", None, &registry_with(Some("{\"answer\": \"A rule set.\"}")), None);
    assert_eq!(a.answer, "A rule set.");
    assert_eq!(a.source, ExplanationSource::Provider("scripted".into()));

    let a = assist("How do I deploy a model?", Some(SOURCE), &registry_with(None), None);
    assert_eq!(a.source, ExplanationSource::Heuristic);
    assert!(a.answer.contains("deployModel"));
}
