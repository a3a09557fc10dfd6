//! In-memory backends for pipeline and workflow tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::{Notify, Semaphore};

use super::{CompletionRequest, LlmBackend, LlmError};

/// Replays canned replies in order and records every request it receives.
/// Once the script runs out, further calls fail with a 500.
#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedBackend {
    pub fn new(replies: Vec<Result<String, LlmError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
    }

    pub fn failure(status: u16, message: &str) -> Result<String, LlmError> {
        Err(LlmError::Api {
            status,
            message: message.to_string(),
        })
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmBackend for ScriptedBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Self::failure(500, "script exhausted"))
    }
}

/// A `ScriptedBackend` whose calls park until the test hands out permits.
pub struct GatedBackend {
    inner: ScriptedBackend,
    gate: Semaphore,
    entered: Notify,
    waiting: AtomicUsize,
}

impl GatedBackend {
    pub fn replying(texts: &[&str]) -> Self {
        Self {
            inner: ScriptedBackend::replying(texts),
            gate: Semaphore::new(0),
            entered: Notify::new(),
            waiting: AtomicUsize::new(0),
        }
    }

    /// Lets `n` parked (or future) calls proceed.
    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }

    /// Resolves once at least one call is parked at the gate.
    pub async fn wait_until_entered(&self) {
        loop {
            let notified = self.entered.notified();
            if self.waiting.load(Ordering::SeqCst) > 0 {
                return;
            }
            notified.await;
        }
    }

    pub fn call_count(&self) -> usize {
        self.inner.call_count()
    }
}

#[async_trait]
impl LlmBackend for GatedBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        self.waiting.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_waiters();
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| LlmError::Api {
                status: 503,
                message: "gate closed".to_string(),
            })?;
        permit.forget();
        self.waiting.fetch_sub(1, Ordering::SeqCst);
        self.inner.complete(request).await
    }
}

/// Panics on every call, standing in for a bug inside a pipeline.
#[derive(Default)]
pub struct PanickingBackend;

#[async_trait]
impl LlmBackend for PanickingBackend {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, LlmError> {
        panic!("backend blew up");
    }
}
