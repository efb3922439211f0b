//! Batch runner: probes a list of targets under a concurrency limit

use futures::future::join_all;
use futures::stream::{self, StreamExt};

use crate::check::{CheckResult, Target};
use crate::config::{BatchConfig, Scheduling};
use crate::probe::Prober;

/// Runs a [`Prober`] over many targets, returning results in input order
#[derive(Debug)]
pub struct BatchRunner {
    prober: Prober,
    concurrency: Option<usize>,
    scheduling: Scheduling,
}

impl BatchRunner {
    pub fn new(prober: Prober, config: &BatchConfig) -> Self {
        Self {
            prober,
            concurrency: config.concurrency.map(|limit| limit.max(1)),
            scheduling: config.scheduling,
        }
    }

    pub fn prober(&self) -> &Prober {
        &self.prober
    }

    /// Probe every target. Yields exactly one result per target, in input order.
    pub async fn run(&self, targets: &[Target]) -> Vec<CheckResult> {
        let Some(limit) = self.concurrency else {
            tracing::debug!("Probing {} targets without a concurrency limit", targets.len());
            return join_all(targets.iter().map(|t| self.prober.probe(t))).await;
        };

        match self.scheduling {
            Scheduling::Chunked => {
                let mut results = Vec::with_capacity(targets.len());
                for (index, chunk) in targets.chunks(limit).enumerate() {
                    tracing::debug!("Probing chunk {} ({} targets)", index + 1, chunk.len());
                    results.extend(join_all(chunk.iter().map(|t| self.prober.probe(t))).await);
                }
                results
            }
            Scheduling::Pooled => {
                tracing::debug!(
                    "Probing {} targets with up to {} in flight",
                    targets.len(),
                    limit
                );
                let probes: Vec<_> = targets
                    .iter()
                    .enumerate()
                    .map(|(index, t)| async move { (index, self.prober.probe(t).await) })
                    .collect();
                let mut results: Vec<(usize, CheckResult)> =
                    stream::iter(probes).buffer_unordered(limit).collect().await;
                results.sort_unstable_by_key(|(index, _)| *index);
                results.into_iter().map(|(_, result)| result).collect()
            }
        }
    }
}
