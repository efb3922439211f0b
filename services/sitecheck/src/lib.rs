//! Sitecheck - website uptime checker
//!
//! Lists target websites, probes them under a concurrency limit, prints the
//! results, and reports a compact summary to a collector endpoint.

pub mod batch;
pub mod check;
pub mod config;
pub mod engine;
pub mod error;
pub mod io;
pub mod probe;
pub mod render;
pub mod report;
pub mod source;

pub use config::{load_config, Config};
pub use error::{Result, SitecheckError};

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::batch::BatchRunner;
use crate::config::RunMode;
use crate::engine::{Engine, RunSummary};
use crate::io::{HttpClient, ReqwestHttpClient};
use crate::probe::Prober;
use crate::report::{CollectorReporter, Reporter};
use crate::source::TargetSource;

/// Builds a [`Sitecheck`] from configuration, with optional injected parts
pub struct SitecheckBuilder {
    config: Config,
    http: Option<Arc<dyn HttpClient>>,
    source: Option<Arc<dyn TargetSource>>,
    reporter: Option<Arc<dyn Reporter>>,
    cancel: Option<CancellationToken>,
}

impl SitecheckBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http: None,
            source: None,
            reporter: None,
            cancel: None,
        }
    }

    /// Use this HTTP client for probes, list fetching and reporting
    pub fn with_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    /// Replace the configured target source
    pub fn with_source(mut self, source: Arc<dyn TargetSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Replace the configured collector reporter
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn with_cancellation_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn build(self) -> Result<Sitecheck> {
        self.config.validate()?;

        let http = self
            .http
            .unwrap_or_else(|| Arc::new(ReqwestHttpClient::new()) as Arc<dyn HttpClient>);

        let source = self.source.unwrap_or_else(|| {
            crate::source::from_config(&self.config.source, Arc::clone(&http))
        });

        let reporter = self.reporter.or_else(|| {
            self.config.collector.as_ref().map(|collector| {
                Arc::new(CollectorReporter::new(collector, Arc::clone(&http))) as Arc<dyn Reporter>
            })
        });

        let prober = Prober::new(&self.config.probe, Arc::clone(&http));
        let runner = BatchRunner::new(prober, &self.config.batch);

        tracing::debug!(
            "Built sitecheck: source={:?}, concurrency={:?}, scheduling={:?}, reporter={}",
            source,
            self.config.batch.concurrency,
            self.config.batch.scheduling,
            reporter.is_some()
        );

        Ok(Sitecheck {
            engine: Arc::new(Engine::new(source, runner, reporter)),
            mode: self.config.mode,
            cancel: self.cancel.unwrap_or_default(),
        })
    }
}

/// A configured checker, ready to run
#[derive(Debug)]
pub struct Sitecheck {
    engine: Arc<Engine>,
    mode: RunMode,
    cancel: CancellationToken,
}

impl Sitecheck {
    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    /// Run one pass and print its results
    pub async fn run_once(&self) -> Result<RunSummary> {
        let run = self.engine.run_once().await?;
        present(&run);
        Ok(run)
    }

    /// Run according to the configured mode, reading triggers from stdin
    pub async fn start(self) -> Result<()> {
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Shutdown signal received");
                    cancel.cancel();
                }
                Err(e) => tracing::warn!("Failed to listen for ctrl-c: {}", e),
            }
        });

        self.start_with_input(BufReader::new(tokio::io::stdin()))
            .await
    }

    /// Run according to the configured mode, reading triggers from `input`
    pub async fn start_with_input<R>(self, input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        match self.mode {
            RunMode::Once => {
                tokio::select! {
                    run = self.run_once() => { run?; }
                    _ = self.cancel.cancelled() => {
                        tracing::info!("Run cancelled before completion");
                    }
                }
            }
            RunMode::Interactive => self.interactive(input).await,
        }
        tracing::info!("Process finished");
        Ok(())
    }

    async fn interactive<R>(&self, input: R)
    where
        R: AsyncBufRead + Unpin,
    {
        let mut runs = JoinSet::new();
        runs.spawn(run_and_present(Arc::clone(&self.engine)));
        tracing::info!("Press Enter to check again, Ctrl-D to quit");

        let mut lines = input.lines();
        loop {
            tokio::select! {
                line = lines.next_line() => match line {
                    Ok(Some(_)) => {
                        reap_finished(&mut runs);
                        runs.spawn(run_and_present(Arc::clone(&self.engine)));
                    }
                    Ok(None) => break,
                    Err(e) => {
                        tracing::warn!("Failed to read trigger input: {}", e);
                        break;
                    }
                },
                _ = self.cancel.cancelled() => break,
            }
        }

        // In-flight runs are never cancelled
        while runs.join_next().await.is_some() {}
    }
}

/// Drop finished run tasks from the set, returning how many were removed
fn reap_finished(runs: &mut JoinSet<()>) -> usize {
    let mut reaped = 0;
    while let Some(joined) = runs.try_join_next() {
        if let Err(e) = joined {
            tracing::warn!("Check run task failed: {}", e);
        }
        reaped += 1;
    }
    reaped
}

async fn run_and_present(engine: Arc<Engine>) {
    match engine.run_once().await {
        Ok(run) => present(&run),
        Err(SitecheckError::AlreadyRunning) => {
            tracing::info!("A check is already running, ignoring trigger");
        }
        Err(e) => tracing::warn!("Check run failed: {}", e),
    }
}

fn present(run: &RunSummary) {
    if run.results.is_empty() {
        return;
    }
    println!("{}", render::render_table(&run.results));
    match run.checked_at {
        Some(checked_at) => println!("{}", render::summary_line(&run.summary, checked_at)),
        None => println!("{}", run.summary),
    }
}
