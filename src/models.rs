use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// A single report returned by the Codal search API
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    /// Relative landing page URL, empty when the API returned none
    pub attachment_url: String,
    /// Report title with slashes removed
    pub title: String,
    pub tracing_number: String,
}

impl ReportEntry {
    pub fn new(attachment_url: impl Into<String>, title: &str, tracing_number: impl Into<String>) -> Self {
        Self {
            attachment_url: attachment_url.into(),
            title: sanitize_title(title),
            tracing_number: tracing_number.into(),
        }
    }
}

/// Titles end up in file names, so path separators are dropped.
pub fn sanitize_title(title: &str) -> String {
    title.replace('/', "")
}

/// Outcome of scraping a landing page for its download link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkResolution {
    Resolved(String),
    Unresolved(FailureKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub entry: ReportEntry,
    pub link: LinkResolution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Pdf,
    Xlsx,
}

impl FileFormat {
    pub fn file_extension(&self) -> &str {
        match self {
            FileFormat::Pdf => "pdf",
            FileFormat::Xlsx => "xlsx",
        }
    }
}

/// The soft failures a run tolerates. Anything else aborts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Landing page had no `DownloadFile.aspx?id=` token
    LinkNotFound,
    /// Download endpoint answered with the Codal system error page
    ServerErrorPage,
    /// Search result carried no landing page URL at all
    NoDownloadLink,
}

impl FailureKind {
    pub fn as_str(&self) -> &str {
        match self {
            FailureKind::LinkNotFound => "download link not found on landing page",
            FailureKind::ServerErrorPage => "server returned a system error page",
            FailureKind::NoDownloadLink => "no download link",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    pub symbol: String,
    pub title: String,
    pub tracing_number: String,
    pub kind: FailureKind,
}

impl FailureRecord {
    pub fn new(symbol: &str, entry: &ReportEntry, kind: FailureKind) -> Self {
        Self {
            symbol: symbol.to_string(),
            title: entry.title.clone(),
            tracing_number: entry.tracing_number.clone(),
            kind,
        }
    }
}

impl fmt::Display for FailureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.symbol, self.title, self.tracing_number)
    }
}

/// Everything a single symbol's run produced
#[derive(Debug, Clone, Default)]
pub struct DownloadReport {
    pub symbol: String,
    pub directory: PathBuf,
    pub saved: Vec<PathBuf>,
    /// Entries skipped because their file was already on disk
    pub skipped: usize,
    pub failures: Vec<FailureRecord>,
}
