//! Downloading resolved links to disk

use crate::codal::resolver::target_stem;
use crate::codal::{CodalApi, CodalError, Fetch};
use crate::models::{DownloadTarget, FailureKind, FileFormat, LinkResolution};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error, info};

/// What happened to a single download target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Materialized {
    Saved { path: PathBuf, format: FileFormat },
    Failed(FailureKind),
}

/// Position of a target within the current batch, for progress lines
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

/// Leading characters of a body, decoded lossily
pub fn sniff_head(body: &[u8]) -> String {
    // A char is at most 4 bytes in UTF-8.
    let prefix = &body[..body.len().min(CodalApi::SNIFF_CHARS * 4)];
    String::from_utf8_lossy(prefix)
        .chars()
        .take(CodalApi::SNIFF_CHARS)
        .collect()
}

pub fn is_system_error_page(head: &str) -> bool {
    head.contains(CodalApi::SYSTEM_ERROR_MARKER)
}

pub fn sniff_format(head: &str) -> FileFormat {
    if head.contains(CodalApi::XLSX_MARKER) {
        FileFormat::Xlsx
    } else {
        FileFormat::Pdf
    }
}

/// Fetch a target and write it into `dir` unless it is a failure
pub async fn materialize(
    fetcher: &dyn Fetch,
    symbol: &str,
    dir: &Path,
    target: &DownloadTarget,
    progress: Progress,
) -> Result<Materialized, CodalError> {
    let stem = target_stem(symbol, &target.entry);

    let url = match &target.link {
        LinkResolution::Resolved(url) => url,
        LinkResolution::Unresolved(kind) => {
            error!(
                "Error: {} of {} there is no download link {}",
                progress.current, progress.total, stem
            );
            return Ok(Materialized::Failed(*kind));
        }
    };

    let body = fetcher.fetch(url).await?;
    let head = sniff_head(&body);

    if is_system_error_page(&head) {
        error!(
            "Error: {} of {} {} {}",
            progress.current,
            progress.total,
            CodalApi::SYSTEM_ERROR_MARKER,
            stem
        );
        return Ok(Materialized::Failed(FailureKind::ServerErrorPage));
    }

    let format = sniff_format(&head);
    let file_name = format!("{}.{}", stem, format.file_extension());
    let path = dir.join(&file_name);

    debug!("Writing {} bytes to {}", body.len(), path.display());
    fs::write(&path, &body).await?;
    info!("saved: {} of {} {}", progress.current, progress.total, file_name);

    Ok(Materialized::Saved { path, format })
}
