use anyhow::{Result, anyhow, bail};
use super::AiProvider;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gpt-4o";
const ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const SYSTEM_PROMPT: &str = "You are an assistant for the Singularis Prime language. \
Always answer with a single JSON object.";

#[derive(Default)]
pub struct OpenAi {
    model: Option<String>,
}

#[derive(serde::Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(serde::Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(serde::Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(serde::Deserialize, Debug)]
struct ChatResponse {
    choices: Vec<Choice>,
}
#[derive(serde::Deserialize, Debug)]
struct Choice { message: ChoiceMessage }
#[derive(serde::Deserialize, Debug)]
struct ChoiceMessage { content: Option<String> }

impl OpenAi {
    pub fn new(model: Option<String>) -> Self {
        Self { model }
    }

    /// Configured model, then `SINGULARIS_OPENAI_MODEL`, then the default.
    pub fn model(&self) -> String {
        self.model
            .clone()
            .or_else(|| std::env::var("SINGULARIS_OPENAI_MODEL").ok())
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }
}

impl AiProvider for OpenAi {
    fn name(&self) -> &'static str { "openai" }
    fn chat(&self, prompt: &str) -> Result<String> {
        let trimmed = prompt.trim();
        if trimmed.is_empty() { bail!("empty prompt"); }
        let key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow!("OPENAI_API_KEY not set in environment"))?;
        let model = self.model();
        let req = ChatRequest {
            model: &model,
            messages: vec![
                ChatMessage { role: "system", content: SYSTEM_PROMPT },
                ChatMessage { role: "user", content: trimmed },
            ],
            temperature: 0.2,
            response_format: ResponseFormat { kind: "json_object" },
        };
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(45))
            .build()?;
        let resp = client
            .post(ENDPOINT)
            .bearer_auth(&key)
            .header("Content-Type", "application/json")
            .json(&req)
            .send()?;
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().unwrap_or_default();
            bail!("openai http error {status}: {text}");
        }
        let cr: ChatResponse = resp.json()?;
        let content = cr.choices.into_iter().next()
            .and_then(|c| c.message.content)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow!("empty response"))?;
        Ok(content)
    }
}
