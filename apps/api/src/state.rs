use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::{LlmBackend, LlmClient};
use crate::stages::StageRunner;
use crate::workflow::Workflow;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Stateless pipelines (`/analyze`, `/generate`) call the runner directly.
    pub runner: StageRunner,
    pub workflow: Workflow,
}

impl AppState {
    pub fn new(config: Config, backend: Arc<dyn LlmBackend>) -> Self {
        let runner = StageRunner::new(backend, config.llm_model.clone());
        let workflow = Workflow::new(runner.clone(), config.min_job_description_chars);
        Self {
            config,
            runner,
            workflow,
        }
    }

    /// Production state backed by the HTTP chat-completions client.
    pub fn from_config(config: Config) -> Self {
        let client = LlmClient::new(&config);
        Self::new(config, Arc::new(client))
    }
}

#[cfg(test)]
impl AppState {
    pub fn for_tests(backend: Arc<dyn LlmBackend>) -> Self {
        Self::new(Config::for_tests(), backend)
    }
}
