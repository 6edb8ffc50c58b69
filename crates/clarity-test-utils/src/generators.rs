//! Generators with scripted behaviour

use async_trait::async_trait;
use clarity_generation::{GenerationRequest, GeneratorError, TextGenerator};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Barrier;

/// Replays queued outcomes in order, then a default reply if one is set
pub struct ScriptedGenerator {
    tag: String,
    script: Mutex<VecDeque<Result<String, GeneratorError>>>,
    default_reply: Option<String>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            script: Mutex::new(VecDeque::new()),
            default_reply: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_default_reply(mut self, reply: impl Into<String>) -> Self {
        self.default_reply = Some(reply.into());
        self
    }

    pub fn then_ok(self, reply: impl Into<String>) -> Self {
        self.script.lock().push_back(Ok(reply.into()));
        self
    }

    pub fn then_err(self, err: GeneratorError) -> Self {
        self.script.lock().push_back(Err(err));
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GeneratorError> {
        self.requests.lock().push(request.clone());
        if let Some(next) = self.script.lock().pop_front() {
            return next;
        }
        self.default_reply.clone().ok_or(GeneratorError::Upstream {
            status: 500,
            body: "script exhausted".to_string(),
        })
    }

    fn backend_tag(&self) -> &str {
        &self.tag
    }
}

/// Answers after a fixed delay; pair with paused tokio time
pub struct SlowGenerator {
    delay: Duration,
    reply: String,
}

impl SlowGenerator {
    pub fn new(delay: Duration, reply: impl Into<String>) -> Self {
        Self {
            delay,
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl TextGenerator for SlowGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, GeneratorError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.reply.clone())
    }

    fn backend_tag(&self) -> &str {
        "slow-model"
    }
}

/// Holds every call until `parties` calls are in flight
///
/// Forces concurrent cache misses to overlap inside the generator.
pub struct GatedGenerator {
    barrier: Arc<Barrier>,
    calls: AtomicUsize,
}

impl GatedGenerator {
    pub fn new(parties: usize) -> Self {
        Self {
            barrier: Arc::new(Barrier::new(parties)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for GatedGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, GeneratorError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.barrier.wait().await;
        Ok(format!("reply #{n}"))
    }

    fn backend_tag(&self) -> &str {
        "gated-model"
    }
}
