//! Shared Codal types and data structures

use serde::Deserialize;

/// Codal search API response
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    /// Total number of pages for the query
    #[serde(rename = "Page")]
    pub page: u32,
    /// Reports on the requested page
    #[serde(rename = "Letters")]
    pub letters: Vec<Letter>,
}

/// A single report ("letter") in a search response
#[derive(Debug, Deserialize, Clone)]
pub struct Letter {
    /// Landing page path relative to the report host
    #[serde(rename = "AttachmentUrl", default)]
    pub attachment_url: Option<String>,

    #[serde(rename = "Title")]
    pub title: String,

    #[serde(rename = "TracingNo")]
    pub tracing_no: TracingNo,
}

/// Tracing numbers come back as JSON numbers, but strings are tolerated.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum TracingNo {
    Number(u64),
    Text(String),
}

impl std::fmt::Display for TracingNo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TracingNo::Number(n) => write!(f, "{}", n),
            TracingNo::Text(s) => f.write_str(s),
        }
    }
}

/// Codal constants
pub struct CodalApi;

impl CodalApi {
    /// Fixed search filters sent with every query
    pub const SEARCH_FILTERS: &'static [(&'static str, &'static str)] = &[
        ("Audited", "true"),
        ("AuditorRef", "-1"),
        ("Category", "3"),
        ("Childs", "false"),
        ("CompanyState", "0"),
        ("CompanyType", "3"),
        ("Consolidatable", "true"),
        ("IsNotAudited", "false"),
        ("Isic", "46430613"),
        ("Length", "-1"),
        ("LetterType", "-1"),
        ("Mains", "true"),
        ("NotAudited", "true"),
        ("NotConsolidatable", "true"),
        ("Publisher", "false"),
        ("TracingNo", "-1"),
        ("search", "true"),
    ];
    /// Path on the report host that serves files
    pub const REPORTS_PATH: &'static str = "/Reports/";
    /// Body prefix of the page Codal serves instead of a file on failure
    pub const SYSTEM_ERROR_MARKER: &'static str = "خطای سیستمی | کدال";
    /// Present near the start of every OOXML (xlsx) package
    pub const XLSX_MARKER: &'static str = "[Content_Types].xml";
    /// How many leading characters of a download are inspected
    pub const SNIFF_CHARS: usize = 100;
}
