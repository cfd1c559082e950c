//! Paginated report search

use crate::codal::{CodalApi, CodalError, Fetch, SearchResponse};
use crate::config::Config;
use crate::models::ReportEntry;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// One page of search results
#[derive(Debug, Clone)]
pub struct SearchPage {
    pub total_pages: u32,
    pub entries: Vec<ReportEntry>,
}

/// Encode a symbol the way the search API expects it.
///
/// Words are encoded one by one and joined with a literal `+`, so a
/// single-word symbol is just its trimmed, percent-encoded self.
pub fn encode_symbol(symbol: &str) -> String {
    symbol
        .split_whitespace()
        .map(|part| urlencoding::encode(part).into_owned())
        .collect::<Vec<_>>()
        .join("+")
}

/// Search URL for a 1-indexed page
pub fn search_url(config: &Config, symbol: &str, page: u32) -> String {
    let filters = CodalApi::SEARCH_FILTERS
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}?{}&PageNumber={}&Symbol={}",
        config.codal.search_url,
        filters,
        page,
        encode_symbol(symbol)
    )
}

pub async fn fetch_page(
    fetcher: &dyn Fetch,
    config: &Config,
    symbol: &str,
    page: u32,
) -> Result<SearchPage, CodalError> {
    let url = search_url(config, symbol, page);
    debug!("Fetching search page {} for \"{}\"", page, symbol);

    let body = fetcher.fetch(&url).await?;
    let response: SearchResponse =
        serde_json::from_slice(&body).map_err(|source| CodalError::Json { url, source })?;

    let entries = response
        .letters
        .into_iter()
        .map(|letter| {
            ReportEntry::new(
                letter.attachment_url.unwrap_or_default(),
                &letter.title,
                letter.tracing_no.to_string(),
            )
        })
        .collect::<Vec<_>>();

    info!("Found {} links for page {}", entries.len(), page);

    Ok(SearchPage {
        total_pages: response.page,
        entries,
    })
}

/// Walk every page and collect entries keyed by tracing number.
///
/// Page 1 is fetched once; its `Page` field decides how many more follow.
pub async fn collect_entries(
    fetcher: &dyn Fetch,
    config: &Config,
    symbol: &str,
) -> Result<BTreeMap<String, ReportEntry>, CodalError> {
    let first = fetch_page(fetcher, config, symbol, 1).await?;
    let total_pages = first.total_pages;
    info!("Found {} pages for \"{}\"", total_pages, symbol);

    let mut entries = BTreeMap::new();
    if total_pages == 0 {
        return Ok(entries);
    }

    insert_entries(&mut entries, first.entries);

    for page in 2..=total_pages {
        let next = fetch_page(fetcher, config, symbol, page).await?;
        insert_entries(&mut entries, next.entries);
    }

    info!("Collected {} unique reports for \"{}\"", entries.len(), symbol);
    Ok(entries)
}

fn insert_entries(map: &mut BTreeMap<String, ReportEntry>, entries: Vec<ReportEntry>) {
    for entry in entries {
        map.insert(entry.tracing_number.clone(), entry);
    }
}
