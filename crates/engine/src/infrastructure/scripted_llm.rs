//! Offline `LlmPort` that replays canned replies.
//!
//! Used when `LLM_BACKEND=scripted` and by demos that must run without a
//! model server. Replies are handed out in order; once the script runs dry
//! every call gets the fallback line.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::infrastructure::ports::{FinishReason, LlmError, LlmPort, LlmRequest, LlmResponse};

const DEFAULT_FALLBACK: &str = "I'm afraid I can't help you with that.";

pub struct ScriptedLlm {
    script: Mutex<VecDeque<String>>,
    fallback: String,
}

impl ScriptedLlm {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: Mutex::new(replies.into_iter().map(Into::into).collect()),
            fallback: DEFAULT_FALLBACK.to_string(),
        }
    }

    /// A guardian that never gives anything away.
    pub fn stubborn() -> Self {
        Self::new(Vec::<String>::new())
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    pub fn remaining(&self) -> usize {
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    fn next_reply(&self) -> String {
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

#[async_trait]
impl LlmPort for ScriptedLlm {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        let content = self.next_reply();
        tracing::debug!(
            history = request.messages.len(),
            remaining = self.remaining(),
            "Scripted reply"
        );
        Ok(LlmResponse {
            content,
            finish_reason: FinishReason::Stop,
            usage: None,
        })
    }
}
