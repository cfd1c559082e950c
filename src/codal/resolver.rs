//! Landing page scraping for the real download link

use crate::codal::{CodalApi, CodalError, Fetch};
use crate::config::Config;
use crate::models::{DownloadTarget, FailureKind, LinkResolution, ReportEntry};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::{debug, error, info};

fn download_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"DownloadFile\.aspx\?id=[^&#]+").expect("download id pattern is valid"))
}

/// File name, minus extension, that a report is saved under
pub fn target_stem(symbol: &str, entry: &ReportEntry) -> String {
    format!("{} {} {}", symbol, entry.title, entry.tracing_number)
}

/// First `DownloadFile.aspx?id=...` token, cut at the next `&` or `#`
pub fn extract_download_path(html: &str) -> Option<&str> {
    download_id_regex().find(html).map(|m| m.as_str())
}

pub fn landing_page_url(config: &Config, entry: &ReportEntry) -> String {
    format!("{}{}", config.codal.report_base_url, entry.attachment_url)
}

pub fn download_url(config: &Config, download_path: &str) -> String {
    format!(
        "{}{}{}",
        config.codal.report_base_url,
        CodalApi::REPORTS_PATH,
        download_path
    )
}

/// Fetch the landing page of `entry` and turn it into a download link
pub async fn resolve_link(
    fetcher: &dyn Fetch,
    config: &Config,
    entry: &ReportEntry,
) -> Result<LinkResolution, CodalError> {
    if entry.attachment_url.is_empty() {
        error!("Report {} has no landing page", entry.tracing_number);
        return Ok(LinkResolution::Unresolved(FailureKind::NoDownloadLink));
    }

    let url = landing_page_url(config, entry);
    let body = fetcher.fetch(&url).await?;
    let page_source = String::from_utf8_lossy(&body);

    match extract_download_path(&page_source) {
        Some(path) => {
            let link = download_url(config, path);
            debug!("Resolved {} -> {}", url, link);
            Ok(LinkResolution::Resolved(link))
        }
        None => {
            error!("Failed to get download link for {}", url);
            Ok(LinkResolution::Unresolved(FailureKind::LinkNotFound))
        }
    }
}

/// Resolve every entry not already on disk.
///
/// Returns the targets in entry order and the number of entries skipped.
pub async fn resolve_pending<'a, I>(
    fetcher: &dyn Fetch,
    config: &Config,
    symbol: &str,
    entries: I,
    existing: &HashSet<String>,
) -> Result<(Vec<DownloadTarget>, usize), CodalError>
where
    I: IntoIterator<Item = &'a ReportEntry>,
{
    let mut targets = Vec::new();
    let mut skipped = 0;

    for entry in entries {
        if existing.contains(&target_stem(symbol, entry)) {
            debug!("Skipping {}: already downloaded", target_stem(symbol, entry));
            skipped += 1;
            continue;
        }

        let link = resolve_link(fetcher, config, entry).await?;
        targets.push(DownloadTarget {
            entry: entry.clone(),
            link,
        });
    }

    info!(
        "Resolved {} download links for \"{}\" ({} already on disk)",
        targets.len(),
        symbol,
        skipped
    );
    Ok((targets, skipped))
}
