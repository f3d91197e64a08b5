//! Job aggregation across providers in priority order.
//!
//! The result is never empty: when no provider yields a listing, a single
//! sentinel listing explains why.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::fallback::{run_chain, ChainReport, Collector, ProviderError};
use crate::jobs::providers::JobProvider;
use crate::models::job::{
    slug, truncate_description, JobListing, SETUP_GUIDE_SOURCE, SYSTEM_MESSAGE_SOURCE,
};

pub const MAX_LIMIT: usize = 50;

/// Accumulates normalized listings up to `limit`, keeping ids unique.
struct ListingCollector {
    listings: Vec<JobListing>,
    seen_ids: HashSet<String>,
    limit: usize,
}

impl ListingCollector {
    fn new(limit: usize) -> Self {
        Self {
            listings: Vec::with_capacity(limit),
            seen_ids: HashSet::new(),
            limit,
        }
    }
}

impl Collector<Vec<JobListing>> for ListingCollector {
    fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.listings.len())
    }

    fn collect(&mut self, provider: &str, output: Vec<JobListing>) {
        let take = self.remaining();
        for mut listing in output.into_iter().take(take) {
            let mut n = self.listings.len();
            while listing.id.is_empty() || self.seen_ids.contains(&listing.id) {
                listing.id = format!("{}-{n}", slug(provider));
                n += 1;
            }
            if listing.source.is_empty() {
                listing.source = provider.to_string();
            }
            self.seen_ids.insert(listing.id.clone());
            self.listings.push(listing);
        }
    }
}

pub struct JobAggregator {
    providers: Vec<Arc<dyn JobProvider>>,
    call_timeout: Duration,
}

impl JobAggregator {
    /// `providers` are queried in the given order.
    pub fn new(providers: Vec<Arc<dyn JobProvider>>, call_timeout: Duration) -> Self {
        Self {
            providers,
            call_timeout,
        }
    }

    /// Up to `limit` listings (clamped to `1..=MAX_LIMIT`), in provider priority
    /// order. Always returns at least one listing.
    pub async fn aggregate(&self, query: &str, limit: usize) -> Vec<JobListing> {
        let limit = limit.clamp(1, MAX_LIMIT);
        let mut collector = ListingCollector::new(limit);

        let report = run_chain(
            &self.providers,
            self.call_timeout,
            &mut collector,
            |provider, remaining| async move {
                let raw = provider.fetch(query, remaining).await?;
                let listings: Vec<JobListing> =
                    raw.iter().map(|item| provider.normalize(item)).collect();
                Ok::<_, ProviderError>(listings)
            },
        )
        .await;

        info!(
            "Aggregated {} listings for '{query}' (succeeded: {:?}, failed: {}, skipped: {:?})",
            collector.listings.len(),
            report.succeeded,
            report.failures.len(),
            report.skipped
        );

        if collector.listings.is_empty() {
            return vec![self.sentinel(query, &report)];
        }
        collector.listings
    }

    fn sentinel(&self, query: &str, report: &ChainReport) -> JobListing {
        if report.nothing_available() {
            let hints = self
                .providers
                .iter()
                .map(|p| p.setup_hint())
                .collect::<Vec<_>>()
                .join("; ");
            return JobListing::sentinel(
                SETUP_GUIDE_SOURCE,
                "Job search is not configured",
                &truncate_description(&format!(
                    "No job search provider is configured. Set one of: {hints}, then restart the service."
                )),
            );
        }

        let description = if report.failures.is_empty() {
            format!("No listings matched '{query}'. Try a broader search.")
        } else {
            format!(
                "No listings could be retrieved for '{query}'. Provider errors: {}",
                report.failure_summary()
            )
        };
        JobListing::sentinel(
            SYSTEM_MESSAGE_SOURCE,
            "No jobs found",
            &truncate_description(&description),
        )
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{aggregator, FakeProvider};
    use super::*;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_failed_primary_then_partial_results() {
        let providers = vec![
            FakeProvider::new("p1", true, None),
            FakeProvider::new("p2", true, Some(4)),
            FakeProvider::new("p3", true, Some(0)),
        ];
        let listings = aggregator(providers.clone()).aggregate("rust", 10).await;

        assert_eq!(listings.len(), 4);
        assert!(listings.iter().all(|l| l.source == "p2" || l.source == "p3"));
        assert_eq!(providers[1].last_limit.load(Ordering::SeqCst), 10);
        assert_eq!(providers[2].last_limit.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn test_priority_order_preserved_and_capped() {
        let providers = vec![
            FakeProvider::new("p1", true, Some(3)),
            FakeProvider::new("p2", true, Some(10)),
            FakeProvider::new("p3", true, Some(10)),
        ];
        let listings = aggregator(providers.clone()).aggregate("rust", 5).await;

        let sources: Vec<&str> = listings.iter().map(|l| l.source.as_str()).collect();
        assert_eq!(sources, vec!["p1", "p1", "p1", "p2", "p2"]);
        assert_eq!(providers[2].calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_ids_unique_within_response() {
        // Both providers emit "job-0", "job-1", ...
        let providers = vec![
            FakeProvider::new("p1", true, Some(2)),
            FakeProvider::new("p2", true, Some(2)),
        ];
        let listings = aggregator(providers).aggregate("rust", 10).await;

        let ids: HashSet<&str> = listings.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(listings.len(), 4);
        assert_eq!(ids.len(), 4);
    }

    #[tokio::test]
    async fn test_all_failing_yields_system_message() {
        let providers = vec![
            FakeProvider::new("p1", true, None),
            FakeProvider::new("p2", false, Some(3)),
        ];
        let listings = aggregator(providers).aggregate("rust", 10).await;

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].source, SYSTEM_MESSAGE_SOURCE);
        assert!(listings[0].description.contains("p1"));
    }

    #[tokio::test]
    async fn test_nothing_available_yields_setup_guide() {
        let providers = vec![
            FakeProvider::new("p1", false, Some(3)),
            FakeProvider::new("p2", false, Some(3)),
        ];
        let listings = aggregator(providers.clone()).aggregate("rust", 10).await;

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].source, SETUP_GUIDE_SOURCE);
        assert!(listings[0].description.contains("FAKE_KEY"));
        assert_eq!(providers[0].calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_results_yield_system_message() {
        let listings = aggregator(vec![FakeProvider::new("p1", true, Some(0))])
            .aggregate("cobol", 10)
            .await;
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].source, SYSTEM_MESSAGE_SOURCE);
        assert!(listings[0].description.contains("cobol"));
    }

    #[tokio::test]
    async fn test_zero_limit_is_clamped_to_one() {
        let listings = aggregator(vec![FakeProvider::new("p1", true, Some(5))])
            .aggregate("rust", 0)
            .await;
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].source, "p1");
    }
}
