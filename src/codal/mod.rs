//! Codal (Iranian capital market disclosure system) module
//!
//! Search, landing page scraping and file download against `codal.ir`.

pub mod client;
pub mod errors;
pub mod materializer;
pub mod resolver;
pub mod search;
pub mod types;

pub use client::{Fetch, HttpFetcher};
pub use errors::CodalError;
pub use types::*;

pub use materializer::{materialize, Materialized, Progress};
pub use resolver::{resolve_link, resolve_pending};
pub use search::{collect_entries, fetch_page};
