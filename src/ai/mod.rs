//! AI glue: provider abstraction, registry, and the explain/assist helpers
//! that fall back to a local heuristic whenever no provider answers.
use anyhow::Result;

pub mod explain;
pub mod heuristic;
#[cfg(feature = "ai-openai")]
pub mod openai;

pub use explain::{assist, explain_code, Assistance, CodeExplanation, ExplanationSource};

pub trait AiProvider: Send + Sync {
    fn name(&self) -> &'static str;
    fn chat(&self, prompt: &str) -> Result<String>;
    fn chat_stream(&self, prompt: &str, cb: &mut dyn FnMut(&str)) -> Result<()> {
        // Default fallback: call non-streaming and emit once
        let full = self.chat(prompt)?;
        cb(&full);
        Ok(())
    }
}

#[derive(Default)]
pub struct AiRegistry {
    providers: Vec<Box<dyn AiProvider>>,
}

impl AiRegistry {
    /// Registry with every provider compiled in; `model` overrides the
    /// provider's default model.
    #[allow(unused_mut, unused_variables)]
    pub fn new(model: Option<&str>) -> Self {
        let mut r = Self::default();
        #[cfg(feature = "ai-openai")]
        { r.register(Box::new(openai::OpenAi::new(model.map(str::to_string)))); }
        r
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider: Box<dyn AiProvider>) {
        self.providers.push(provider);
    }

    pub fn list(&self) -> Vec<&'static str> { self.providers.iter().map(|p| p.name()).collect() }
    pub fn first(&self) -> Option<&dyn AiProvider> { self.providers.first().map(|b| b.as_ref()) }
    pub fn get(&self, name: &str) -> Option<&dyn AiProvider> {
        self.providers.iter().find(|p| p.name() == name).map(|b| b.as_ref())
    }

    /// Named provider when given, otherwise the first one registered.
    pub fn select(&self, name: Option<&str>) -> Option<&dyn AiProvider> {
        match name {
            Some(n) => self.get(n),
            None => self.first(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;
    impl AiProvider for Echo {
        fn name(&self) -> &'static str { "echo" }
        fn chat(&self, prompt: &str) -> Result<String> { Ok(prompt.to_string()) }
    }

    #[test]
    fn registry_selection() {
        let mut reg = AiRegistry::empty();
        assert!(reg.select(None).is_none());
        reg.register(Box::new(Echo));
        assert_eq!(reg.list(), vec!["echo"]);
        assert_eq!(reg.select(None).map(|p| p.name()), Some("echo"));
        assert!(reg.select(Some("openai")).is_none());
    }

    #[test]
    fn default_stream_emits_once() {
        let mut chunks = Vec::new();
        Echo.chat_stream("hi", &mut |c| chunks.push(c.to_string())).unwrap();
        assert_eq!(chunks, vec!["hi".to_string()]);
    }
}
