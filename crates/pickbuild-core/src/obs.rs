//! Structured tracing events for the pipeline lifecycle.
//!
//! This module provides:
//! - A run-scoped span carrying the run id, attached with `Instrument`
//! - Emission functions for run start/finish/abort and per-step start/finish
//!
//! Events are emitted at `info!` level (hidden unless `--verbose` or
//! `RUST_LOG` enables them).

use crate::step::Step;
use std::path::Path;
use tracing::{info, warn, Span};

/// Span tagged with the run id; every event inside a run is nested under it.
///
/// ```ignore
/// pipeline.run_steps(request).instrument(obs::run_span(&run_id)).await
/// ```
pub fn run_span(run_id: &str) -> Span {
    tracing::info_span!("pickbuild.run", run_id = %run_id)
}

/// Emit event: run started.
pub fn emit_run_started(base_dir: &Path, repository: Option<&str>) {
    info!(
        event = "run.started",
        base_dir = %base_dir.display(),
        repository = repository.unwrap_or("-"),
    );
}

pub fn emit_step_started(step: Step) {
    info!(event = "step.started", step = step.name(), number = step.number());
}

pub fn emit_step_finished(step: Step) {
    info!(event = "step.finished", step = step.name(), number = step.number());
}

/// Emit event: all eight steps completed.
pub fn emit_run_finished(duration_ms: u64) {
    info!(event = "run.finished", duration_ms = duration_ms, success = true);
}

/// Emit event: the run aborted at `step` (warning level).
pub fn emit_run_aborted(step: Step, duration_ms: u64, error: &dyn std::fmt::Display) {
    warn!(
        event = "run.aborted",
        step = step.name(),
        duration_ms = duration_ms,
        error = %error,
    );
}
