//! Run observation hooks.
//!
//! The pipeline reports each finished stage and the end of each run to a
//! `PipelineTracer` chosen at construction time. The engine only sees the
//! trait; `NoopTracer` is the default.

use tracing::{debug, info, warn};

use crate::error::PipelineError;
use crate::types::{PipelineState, RunId, StageRecord};

/// Observer for pipeline runs.
pub trait PipelineTracer: Send + Sync {
    /// Called once per stage, after its record is appended.
    fn stage_completed(&self, run_id: RunId, record: &StageRecord);

    /// Called when a run reaches `Done`.
    fn run_completed(&self, run_id: RunId, state: &PipelineState);

    /// Called when a run terminates with an error.
    fn run_failed(&self, run_id: RunId, error: &PipelineError);
}

/// Tracer that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTracer;

impl PipelineTracer for NoopTracer {
    fn stage_completed(&self, _run_id: RunId, _record: &StageRecord) {}

    fn run_completed(&self, _run_id: RunId, _state: &PipelineState) {}

    fn run_failed(&self, _run_id: RunId, _error: &PipelineError) {}
}

/// Tracer that emits `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTracer;

impl PipelineTracer for LogTracer {
    fn stage_completed(&self, run_id: RunId, record: &StageRecord) {
        debug!(
            run_id = %run_id,
            stage = %record.stage(),
            output = %record.output().as_text(),
            reasoning = record.reasoning(),
            "Stage completed"
        );
    }

    fn run_completed(&self, run_id: RunId, state: &PipelineState) {
        info!(
            run_id = %run_id,
            in_scope = state.in_scope(),
            stages = state.stage_log().len(),
            answer_len = state.final_answer().len(),
            "Pipeline run completed"
        );
    }

    fn run_failed(&self, run_id: RunId, error: &PipelineError) {
        warn!(run_id = %run_id, error = %error, "Pipeline run failed");
    }
}
