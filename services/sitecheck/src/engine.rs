//! Engine: one pass of list, probe, and report, guarded against overlap

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::batch::BatchRunner;
use crate::check::CheckResult;
use crate::render::Summary;
use crate::report::Reporter;
use crate::source::TargetSource;

/// Whether a run is in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
}

/// Atomic Idle/Running flag owned by whatever triggers runs
#[derive(Debug, Default)]
pub struct RunGuard {
    running: AtomicBool,
}

impl RunGuard {
    pub fn state(&self) -> RunState {
        if self.running.load(Ordering::Acquire) {
            RunState::Running
        } else {
            RunState::Idle
        }
    }

    /// Move Idle -> Running. Returns `None` if a run is already in progress.
    pub fn try_start(&self) -> Option<RunTicket<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RunTicket { guard: self })
    }
}

/// Held for the duration of a run; returns the guard to Idle on drop
#[derive(Debug)]
pub struct RunTicket<'a> {
    guard: &'a RunGuard,
}

impl Drop for RunTicket<'_> {
    fn drop(&mut self) {
        self.guard.running.store(false, Ordering::Release);
    }
}

/// Outcome of one completed run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub results: Vec<CheckResult>,
    pub summary: Summary,
    /// True when the collector accepted the report
    pub reported: bool,
    /// When the run finished checking
    pub checked_at: Option<DateTime<Local>>,
}

/// Wires the target source, batch runner and reporter together
#[derive(Debug)]
pub struct Engine {
    source: Arc<dyn TargetSource>,
    runner: BatchRunner,
    reporter: Option<Arc<dyn Reporter>>,
    run_state: RunGuard,
}

impl Engine {
    pub fn new(
        source: Arc<dyn TargetSource>,
        runner: BatchRunner,
        reporter: Option<Arc<dyn Reporter>>,
    ) -> Self {
        Self {
            source,
            runner,
            reporter,
            run_state: RunGuard::default(),
        }
    }

    pub fn state(&self) -> RunState {
        self.run_state.state()
    }

    /// Run one pass. Fails only with `AlreadyRunning` when a pass is in progress.
    pub async fn run_once(&self) -> crate::Result<RunSummary> {
        let _ticket = self
            .run_state
            .try_start()
            .ok_or(crate::SitecheckError::AlreadyRunning)?;

        tracing::info!("Starting website checks");
        let targets = self.source.list_targets().await;
        if targets.is_empty() {
            tracing::info!("No websites to check");
            return Ok(RunSummary {
                checked_at: Some(Local::now()),
                ..RunSummary::default()
            });
        }

        let results = self.runner.run(&targets).await;
        let checked_at = Local::now();
        let summary = Summary::from_results(&results);
        tracing::info!("All checks completed: {}", summary);

        let reported = match &self.reporter {
            Some(reporter) => report_best_effort(reporter.as_ref(), &results).await,
            None => {
                tracing::debug!("No collector configured, skipping report");
                false
            }
        };

        Ok(RunSummary {
            results,
            summary,
            reported,
            checked_at: Some(checked_at),
        })
    }
}

/// Deliver results, logging instead of propagating any failure
pub async fn report_best_effort(reporter: &dyn Reporter, results: &[CheckResult]) -> bool {
    match reporter.report(results).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Failed to report results to the collector: {}", e);
            false
        }
    }
}
