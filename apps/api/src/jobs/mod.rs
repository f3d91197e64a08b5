pub mod aggregator;
pub mod handlers;
pub mod providers;
pub mod scraper;
