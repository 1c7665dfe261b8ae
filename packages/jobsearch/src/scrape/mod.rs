//! Scraping provider implementations.

pub mod scrapegraph;

pub use scrapegraph::ScrapeGraphScraper;
