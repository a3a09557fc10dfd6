//! Per-session workflow state and the async drivers for each transition.
//!
//! Every session sits behind its own `tokio::sync::Mutex`. A transition takes
//! the lock twice: once to check the busy flag and capture its inputs, and
//! once to settle the result. The backend round-trips run unlocked.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use anyhow::anyhow;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use super::{AnalyzeInputs, ProfileInputs, WorkflowContext, WorkflowPhase};
use crate::errors::AppError;
use crate::models::cover_letter::CoverLetter;
use crate::models::document::{DocumentSummary, ResumeDocument};
use crate::models::interview::InterviewQuestion;
use crate::models::resume::ResumeProfile;
use crate::models::skill_gap::SkillGapAssessment;
use crate::stages::analysis::{analyze, Analysis};
use crate::stages::cover_letter::generate_cover_letter;
use crate::stages::interview::generate_interview_questions;
use crate::stages::StageRunner;

// ────────────────────────────────────────────────────────────────────────────
// Session
// ────────────────────────────────────────────────────────────────────────────

pub struct Session {
    context: Arc<WorkflowContext>,
    /// Phase whose pipeline is in flight, if any.
    busy: Option<WorkflowPhase>,
    /// Bumped whenever navigation or reset moves the session; a pipeline
    /// whose ticket no longer matches has its result dropped.
    epoch: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    /// Last client access of any kind, reads included. Drives idle eviction.
    last_seen: DateTime<Utc>,
}

impl Session {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            context: Arc::new(WorkflowContext::default()),
            busy: None,
            epoch: 0,
            created_at: now,
            updated_at: now,
            last_seen: now,
        }
    }

    fn replace(&mut self, context: WorkflowContext) {
        self.context = Arc::new(context);
        self.updated_at = Utc::now();
        self.last_seen = self.updated_at;
    }

    fn snapshot(&self, session_id: Uuid) -> SessionSnapshot {
        let ctx = &self.context;
        SessionSnapshot {
            session_id,
            phase: ctx.phase,
            is_processing: self.busy.is_some(),
            processing_phase: self.busy,
            document: ctx.document.as_ref().map(ResumeDocument::summary),
            job_description: ctx.job_description.clone(),
            resume_data: ctx.resume_data.clone(),
            skill_gap: ctx.skill_gap.clone(),
            cover_letter: ctx.cover_letter.clone(),
            interview_questions: ctx.interview_questions.clone(),
            error: ctx.error.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// What clients see of a session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub phase: WorkflowPhase,
    pub is_processing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_phase: Option<WorkflowPhase>,
    pub document: Option<DocumentSummary>,
    pub job_description: String,
    pub resume_data: Option<ResumeProfile>,
    pub skill_gap: Option<SkillGapAssessment>,
    pub cover_letter: Option<CoverLetter>,
    pub interview_questions: Vec<InterviewQuestion>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// SessionStore
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<Mutex<Session>>>>>,
}

impl SessionStore {
    async fn insert(&self) -> (Uuid, Arc<Mutex<Session>>) {
        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(Session::new()));
        self.sessions.write().await.insert(id, session.clone());
        (id, session)
    }

    async fn get(&self, id: Uuid) -> Result<Arc<Mutex<Session>>, AppError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }

    async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops sessions not accessed for at least `ttl`. Sessions that are
    /// locked or have a pipeline in flight are kept.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| match session.try_lock() {
            Ok(s) => s.busy.is_some() || now - s.last_seen < ttl,
            Err(_) => true,
        });
        before - sessions.len()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Workflow
// ────────────────────────────────────────────────────────────────────────────

/// Drives session transitions through the stage pipelines.
#[derive(Clone)]
pub struct Workflow {
    store: SessionStore,
    runner: StageRunner,
    min_job_description_chars: usize,
}

impl Workflow {
    pub fn new(runner: StageRunner, min_job_description_chars: usize) -> Self {
        Self {
            store: SessionStore::default(),
            runner,
            min_job_description_chars,
        }
    }

    #[cfg(test)]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub async fn create(&self) -> SessionSnapshot {
        let (id, session) = self.store.insert().await;
        info!("Created session {id}");
        let snapshot = session.lock().await.snapshot(id);
        snapshot
    }

    /// Polling counts as activity for idle eviction.
    pub async fn snapshot(&self, id: Uuid) -> Result<SessionSnapshot, AppError> {
        let session = self.store.get(id).await?;
        let mut s = session.lock().await;
        s.last_seen = Utc::now();
        Ok(s.snapshot(id))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.store.remove(id).await {
            return Err(AppError::NotFound(format!("Session {id} not found")));
        }
        info!("Deleted session {id}");
        Ok(())
    }

    pub async fn set_document(
        &self,
        id: Uuid,
        document: ResumeDocument,
    ) -> Result<SessionSnapshot, AppError> {
        self.edit_inputs(id, |ctx| ctx.with_document(document)).await
    }

    pub async fn set_job_description(
        &self,
        id: Uuid,
        job_description: String,
    ) -> Result<SessionSnapshot, AppError> {
        self.edit_inputs(id, |ctx| ctx.with_job_description(job_description))
            .await
    }

    /// Inputs are frozen while a pipeline that read them is in flight.
    async fn edit_inputs<F>(&self, id: Uuid, edit: F) -> Result<SessionSnapshot, AppError>
    where
        F: FnOnce(&WorkflowContext) -> WorkflowContext,
    {
        let session = self.store.get(id).await?;
        let mut s = session.lock().await;
        if let Some(phase) = s.busy {
            return Err(AppError::Busy(phase));
        }
        let next = edit(&s.context);
        s.replace(next);
        Ok(s.snapshot(id))
    }

    /// Moves to `target` without running anything. Allowed mid-flight; the
    /// pending result is then discarded.
    pub async fn navigate(
        &self,
        id: Uuid,
        target: WorkflowPhase,
    ) -> Result<SessionSnapshot, AppError> {
        let session = self.store.get(id).await?;
        let mut s = session.lock().await;
        let next = s.context.navigate(target)?;
        if next.phase != s.context.phase {
            s.epoch += 1;
        }
        s.replace(next);
        Ok(s.snapshot(id))
    }

    /// Back to an empty upload phase. Any pending result is discarded.
    pub async fn reset(&self, id: Uuid) -> Result<SessionSnapshot, AppError> {
        let session = self.store.get(id).await?;
        let mut s = session.lock().await;
        s.epoch += 1;
        s.replace(WorkflowContext::default());
        info!("Reset session {id}");
        Ok(s.snapshot(id))
    }

    /// upload → analyze: résumé parsing then skill-gap analysis.
    pub async fn analyze(&self, id: Uuid) -> Result<SessionSnapshot, AppError> {
        let min_chars = self.min_job_description_chars;
        self.transition(
            id,
            WorkflowPhase::Analyze,
            Some(WorkflowPhase::Upload),
            move |ctx| ctx.analyze_inputs(min_chars),
            |runner, inputs: AnalyzeInputs| async move {
                analyze(&runner, &inputs.document, &inputs.job_description).await
            },
            |ctx, analysis: Analysis| ctx.with_analysis(analysis.resume_data, analysis.skill_gap),
        )
        .await
    }

    /// analyze → generate, or regeneration within generate.
    pub async fn cover_letter(&self, id: Uuid) -> Result<SessionSnapshot, AppError> {
        self.transition(
            id,
            WorkflowPhase::Generate,
            None,
            |ctx| ctx.profile_inputs(WorkflowPhase::Generate),
            |runner, inputs: ProfileInputs| async move {
                generate_cover_letter(&runner, &inputs.profile, &inputs.job_description).await
            },
            |ctx, letter: CoverLetter| ctx.with_cover_letter(letter),
        )
        .await
    }

    /// generate → refine, or regeneration within refine.
    pub async fn interview_questions(&self, id: Uuid) -> Result<SessionSnapshot, AppError> {
        self.transition(
            id,
            WorkflowPhase::Refine,
            None,
            |ctx| ctx.profile_inputs(WorkflowPhase::Refine),
            |runner, inputs: ProfileInputs| async move {
                generate_interview_questions(&runner, &inputs.profile, &inputs.job_description)
                    .await
            },
            |ctx, questions: Vec<InterviewQuestion>| ctx.with_interview_questions(questions),
        )
        .await
    }

    /// Shared driver for every pipeline-backed transition.
    ///
    /// On failure the session returns to `on_failure`, or to the phase it was
    /// in before the trigger when that is `None`. The pipeline runs on its own
    /// task so a dropped request still settles the session.
    async fn transition<I, T, Prep, Run, Fut, Commit>(
        &self,
        id: Uuid,
        target: WorkflowPhase,
        on_failure: Option<WorkflowPhase>,
        prepare: Prep,
        run: Run,
        commit: Commit,
    ) -> Result<SessionSnapshot, AppError>
    where
        I: Send + 'static,
        T: Send + 'static,
        Prep: FnOnce(&WorkflowContext) -> Result<I, AppError>,
        Run: FnOnce(StageRunner, I) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, AppError>> + Send + 'static,
        Commit: FnOnce(&WorkflowContext, T) -> WorkflowContext + Send + 'static,
    {
        let session = self.store.get(id).await?;

        let (inputs, ticket, origin) = {
            let mut s = session.lock().await;
            if let Some(phase) = s.busy {
                return Err(AppError::Busy(phase));
            }
            let inputs = prepare(&s.context)?;
            let origin = s.context.phase;
            let next = s.context.entering(target);
            s.replace(next);
            s.busy = Some(target);
            (inputs, s.epoch, origin)
        };
        info!("Session {id}: {origin} → {target} started");

        let runner = self.runner.clone();
        let settled = session.clone();
        let task = tokio::spawn(async move {
            let outcome = run(runner, inputs).await;

            let mut s = session.lock().await;
            s.busy = None;
            if s.epoch != ticket {
                warn!("Session {id}: discarding stale {target} result");
                return Err(AppError::Superseded(target));
            }
            match outcome {
                Ok(value) => {
                    let next = commit(&s.context, value);
                    s.replace(next);
                    info!("Session {id}: now in {}", s.context.phase);
                    Ok(s.snapshot(id))
                }
                Err(err) => {
                    let back = on_failure.unwrap_or(origin);
                    let next = s.context.with_failure(back, err.to_string());
                    s.replace(next);
                    warn!("Session {id}: {target} failed, back to {back}: {err}");
                    Err(err)
                }
            }
        });

        match task.await {
            Ok(result) => result,
            Err(e) => {
                // The task died before settling; release the session here.
                let err = AppError::Internal(anyhow!("{target} pipeline task failed: {e}"));
                let mut s = settled.lock().await;
                s.busy = None;
                if s.epoch == ticket {
                    let back = on_failure.unwrap_or(origin);
                    let next = s
                        .context
                        .with_failure(back, format!("The {target} step failed unexpectedly"));
                    s.replace(next);
                }
                warn!("Session {id}: {target} task aborted: {e}");
                Err(err)
            }
        }
    }

    /// Evicts idle sessions every `every` until the runtime shuts down.
    pub fn spawn_idle_sweeper(&self, ttl: Duration, every: std::time::Duration) -> JoinHandle<()> {
        let store = self.store.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                let evicted = store.evict_idle(ttl).await;
                if evicted > 0 {
                    info!(
                        "Evicted {evicted} idle session(s), {} remaining",
                        store.len().await
                    );
                }
            }
        })
    }
}
