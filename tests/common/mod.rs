//! Scripted backends shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Semaphore;

use agent_chat::{Backend, Error, Model, Result};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub prompt: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Answers with `reply: <prompt>` unless a scripted result is queued.
///
/// When gated, every call waits for one permit released by the test.
#[derive(Default)]
pub struct ScriptedBackend {
    calls: Mutex<Vec<Call>>,
    script: Mutex<VecDeque<Result<String>>>,
    gate: Option<Semaphore>,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::default()
        }
    }

    pub fn then(self, result: Result<String>) -> Self {
        self.script.lock().unwrap().push_back(result);
        self
    }

    pub fn fail_with(self, error: Error) -> Self {
        self.then(Err(error))
    }

    /// Lets one gated call finish.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn max_concurrent_calls(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Backend for ScriptedBackend {
    async fn generate(
        &self,
        prompt: &str,
        model: &Model,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String> {
        self.calls.lock().unwrap().push(Call {
            prompt: prompt.to_string(),
            model: model.to_string(),
            temperature,
            max_tokens,
        });
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        self.active.fetch_sub(1, Ordering::SeqCst);
        let scripted = self.script.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| Ok(format!("reply: {prompt}")))
    }
}
