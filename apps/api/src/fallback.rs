//! Ordered provider fallback shared by the LLM analysis chain and the job
//! aggregation chain.
//!
//! Providers are tried strictly one after another, in priority order. A
//! provider that is unavailable is skipped; one that errors or times out is
//! logged and the chain moves on. The chain itself never fails: it reports
//! what happened and leaves the caller's [`Collector`] holding whatever output
//! was gathered.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Failure of a single provider call. Always recoverable by the chain.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("provider returned empty content")]
    EmptyContent,

    #[error("rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// A named external source queried by a fallback chain.
pub trait Provider: Send + Sync {
    fn name(&self) -> &str;

    /// Fixed at startup from configuration (e.g. credentials present).
    fn available(&self) -> bool;
}

/// Receives successful provider output and says how much more it wants.
pub trait Collector<T> {
    /// Items still wanted; zero ends the chain.
    fn remaining(&self) -> usize;

    fn collect(&mut self, provider: &str, output: T);
}

/// Keeps the first successful output and stops the chain.
#[derive(Debug)]
pub struct FirstSuccess<T> {
    pub value: Option<(String, T)>,
}

impl<T> Default for FirstSuccess<T> {
    fn default() -> Self {
        Self { value: None }
    }
}

impl<T> Collector<T> for FirstSuccess<T> {
    fn remaining(&self) -> usize {
        if self.value.is_some() {
            0
        } else {
            1
        }
    }

    fn collect(&mut self, provider: &str, output: T) {
        self.value.get_or_insert_with(|| (provider.to_string(), output));
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderFailure {
    pub provider: String,
    pub error: String,
}

/// What a chain run did, in provider order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChainReport {
    pub skipped: Vec<String>,
    pub succeeded: Vec<String>,
    pub failures: Vec<ProviderFailure>,
}

impl ChainReport {
    /// True when every provider was skipped as unavailable.
    pub fn nothing_available(&self) -> bool {
        self.succeeded.is_empty() && self.failures.is_empty()
    }

    /// `"groq: timed out after 60s; gemini: API error ..."`
    pub fn failure_summary(&self) -> String {
        self.failures
            .iter()
            .map(|f| format!("{}: {}", f.provider, f.error))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Walks `providers` in order until `collector` is satisfied or the list ends.
///
/// `call` receives the provider and the collector's current `remaining()`.
/// Each call is bounded by `call_timeout`; a timeout counts as a failure.
pub async fn run_chain<P, T, C, F, Fut>(
    providers: &[Arc<P>],
    call_timeout: Duration,
    collector: &mut C,
    mut call: F,
) -> ChainReport
where
    P: Provider + ?Sized,
    C: Collector<T>,
    F: FnMut(Arc<P>, usize) -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let mut report = ChainReport::default();

    for provider in providers {
        let remaining = collector.remaining();
        if remaining == 0 {
            break;
        }

        let name = provider.name().to_string();
        if !provider.available() {
            debug!("Skipping unavailable provider {name}");
            report.skipped.push(name);
            continue;
        }

        debug!("Trying provider {name} (remaining={remaining})");
        let outcome = tokio::time::timeout(call_timeout, call(Arc::clone(provider), remaining))
            .await
            .unwrap_or(Err(ProviderError::Timeout(call_timeout)));

        match outcome {
            Ok(output) => {
                info!("Provider {name} succeeded");
                collector.collect(&name, output);
                report.succeeded.push(name);
            }
            Err(e) => {
                warn!("Provider {name} failed: {e}");
                report.failures.push(ProviderFailure {
                    provider: name,
                    error: e.to_string(),
                });
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Stub {
        name: &'static str,
        available: bool,
        /// `None` fails, `Some(n)` yields n items.
        yields: Option<usize>,
        delay: Option<Duration>,
        calls: AtomicUsize,
    }

    impl Stub {
        fn new(name: &'static str, available: bool, yields: Option<usize>) -> Arc<Self> {
            Arc::new(Self {
                name,
                available,
                yields,
                delay: None,
                calls: AtomicUsize::new(0),
            })
        }

        async fn fetch(&self, limit: usize) -> Result<Vec<String>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match self.yields {
                Some(n) => Ok((0..n.min(limit)).map(|i| format!("{}-{i}", self.name)).collect()),
                None => Err(ProviderError::Malformed("boom".to_string())),
            }
        }
    }

    impl Provider for Stub {
        fn name(&self) -> &str {
            self.name
        }

        fn available(&self) -> bool {
            self.available
        }
    }

    struct Bucket {
        items: Vec<String>,
        limit: usize,
    }

    impl Collector<Vec<String>> for Bucket {
        fn remaining(&self) -> usize {
            self.limit.saturating_sub(self.items.len())
        }

        fn collect(&mut self, _provider: &str, output: Vec<String>) {
            let take = self.remaining();
            self.items.extend(output.into_iter().take(take));
        }
    }

    async fn run(providers: &[Arc<Stub>], limit: usize) -> (Bucket, ChainReport) {
        let mut bucket = Bucket {
            items: vec![],
            limit,
        };
        let report = run_chain(providers, Duration::from_secs(10), &mut bucket, |p, n| async move {
            p.fetch(n).await
        })
        .await;
        (bucket, report)
    }

    #[tokio::test]
    async fn test_failure_advances_to_next_provider() {
        let providers = vec![Stub::new("a", true, None), Stub::new("b", true, Some(4))];
        let (bucket, report) = run(&providers, 10).await;
        assert_eq!(bucket.items.len(), 4);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].provider, "a");
        assert_eq!(report.succeeded, vec!["b"]);
    }

    #[tokio::test]
    async fn test_stops_once_satisfied() {
        let providers = vec![Stub::new("a", true, Some(5)), Stub::new("b", true, Some(5))];
        let (bucket, report) = run(&providers, 5).await;
        assert_eq!(bucket.items.len(), 5);
        assert_eq!(report.succeeded, vec!["a"]);
        assert_eq!(providers[1].calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_remaining_is_passed_to_later_providers() {
        let providers = vec![Stub::new("a", true, Some(3)), Stub::new("b", true, Some(10))];
        let (bucket, _) = run(&providers, 5).await;
        assert_eq!(bucket.items, vec!["a-0", "a-1", "a-2", "b-0", "b-1"]);
    }

    #[tokio::test]
    async fn test_unavailable_providers_are_skipped_not_failed() {
        let providers = vec![Stub::new("a", false, Some(3)), Stub::new("b", false, None)];
        let (bucket, report) = run(&providers, 5).await;
        assert!(bucket.items.is_empty());
        assert_eq!(report.skipped, vec!["a", "b"]);
        assert!(report.failures.is_empty());
        assert!(report.nothing_available());
        assert_eq!(providers[0].calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_counts_as_failure() {
        let slow = Arc::new(Stub {
            name: "slow",
            available: true,
            yields: Some(3),
            delay: Some(Duration::from_secs(60)),
            calls: AtomicUsize::new(0),
        });
        let providers = vec![slow, Stub::new("fast", true, Some(2))];
        let (bucket, report) = run(&providers, 10).await;
        assert_eq!(bucket.items, vec!["fast-0", "fast-1"]);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].error.contains("timed out"));
    }

    #[tokio::test]
    async fn test_first_success_keeps_first_value() {
        let providers = vec![
            Stub::new("a", true, None),
            Stub::new("b", true, Some(1)),
            Stub::new("c", true, Some(1)),
        ];
        let mut first = FirstSuccess::default();
        let report = run_chain(&providers, Duration::from_secs(10), &mut first, |p, n| async move {
            p.fetch(n).await
        })
        .await;
        let (provider, value) = first.value.unwrap();
        assert_eq!(provider, "b");
        assert_eq!(value, vec!["b-0"]);
        assert_eq!(providers[2].calls.load(Ordering::SeqCst), 0);
        assert_eq!(report.failure_summary(), "a: malformed payload: boom");
    }
}
