//! The per-symbol download pipeline

use crate::codal::{self, CodalError, Fetch, Materialized, Progress};
use crate::config::Config;
use crate::models::{DownloadReport, FailureRecord, ReportEntry};
use crate::storage;
use tracing::info;

/// Download every configured symbol in order.
///
/// `on_report` sees each report as soon as its symbol finishes, so results
/// of earlier symbols survive a hard error on a later one.
pub async fn download_all<F>(
    fetcher: &dyn Fetch,
    config: &Config,
    mut on_report: F,
) -> Result<Vec<DownloadReport>, CodalError>
where
    F: FnMut(&DownloadReport),
{
    let mut reports = Vec::with_capacity(config.symbols.len());
    for symbol in &config.symbols {
        let report = download_symbol(fetcher, config, symbol).await?;
        on_report(&report);
        reports.push(report);
    }
    Ok(reports)
}

/// Search, resolve and download all reports of one symbol
pub async fn download_symbol(
    fetcher: &dyn Fetch,
    config: &Config,
    symbol: &str,
) -> Result<DownloadReport, CodalError> {
    info!("Starting Codal download for symbol: {}", symbol);

    // Step 1: directory for this symbol
    let directory = storage::ensure_symbol_dir(&config.download_dir, symbol)?;

    // Step 2: every page, before any landing page is touched
    let entries = codal::collect_entries(fetcher, config, symbol).await?;

    // Step 3: resolve links for reports not yet on disk
    let existing = storage::existing_stems(&directory)?;
    let (targets, skipped) =
        codal::resolve_pending(fetcher, config, symbol, entries.values(), &existing).await?;

    let mut report = DownloadReport {
        symbol: symbol.to_string(),
        directory,
        skipped,
        ..DownloadReport::default()
    };

    // Step 4: download
    let total = targets.len();
    for (index, target) in targets.iter().enumerate() {
        let progress = Progress {
            current: index + 1,
            total,
        };
        match codal::materialize(fetcher, symbol, &report.directory, target, progress).await? {
            Materialized::Saved { path, .. } => report.saved.push(path),
            Materialized::Failed(kind) => report
                .failures
                .push(FailureRecord::new(symbol, &target.entry, kind)),
        }
    }

    info!(
        "Downloaded {} files for \"{}\" ({} skipped, {} failed)",
        report.saved.len(),
        symbol,
        report.skipped,
        report.failures.len()
    );
    Ok(report)
}

/// Aggregated search results for a symbol, without downloading anything
pub async fn list_reports(
    fetcher: &dyn Fetch,
    config: &Config,
    symbol: &str,
) -> Result<Vec<ReportEntry>, CodalError> {
    let entries = codal::collect_entries(fetcher, config, symbol).await?;
    Ok(entries.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codal::client::testing::StubFetcher;
    use crate::codal::resolver::{download_url, landing_page_url};
    use crate::codal::search::search_url;
    use crate::models::FailureKind;
    use tempfile::TempDir;

    const SEARCH_PAGE: &str = r#"{
        "Page": 1,
        "Letters": [
            {"TracingNo": 1001, "Title": "Annual 1402/12/29", "AttachmentUrl": "/Reports/Decision.aspx?LetterSerial=a"},
            {"TracingNo": 1002, "Title": "Monthly", "AttachmentUrl": "/Reports/Decision.aspx?LetterSerial=b"}
        ]
    }"#;

    fn test_config(temp_dir: &TempDir) -> Config {
        Config {
            symbols: vec!["X".to_string()],
            download_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        }
    }

    fn landing(config: &Config, tracing: &str, serial: &str) -> String {
        landing_page_url(
            config,
            &ReportEntry::new(format!("/Reports/Decision.aspx?LetterSerial={}", serial), "", tracing),
        )
    }

    fn stub(config: &Config) -> StubFetcher {
        StubFetcher::new()
            .with(search_url(config, "X", 1), SEARCH_PAGE)
            .with(
                landing(config, "1001", "a"),
                r#"<a href="DownloadFile.aspx?id=ABC123&foo=bar">PDF</a>"#,
            )
            .with(landing(config, "1002", "b"), "<html>no link here</html>")
            .with(download_url(config, "DownloadFile.aspx?id=ABC123"), b"%PDF-1.4".to_vec())
    }

    #[tokio::test]
    async fn test_download_symbol_end_to_end() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let fetcher = stub(&config);

        let report = download_symbol(&fetcher, &config, "X").await.unwrap();

        let expected = temp_dir.path().join("X").join("X Annual 14021229 1001.pdf");
        assert_eq!(report.saved, vec![expected.clone()]);
        assert!(expected.is_file());
        assert_eq!(std::fs::read_dir(temp_dir.path().join("X")).unwrap().count(), 1);

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].tracing_number, "1002");
        assert_eq!(report.failures[0].kind, FailureKind::LinkNotFound);
        assert_eq!(report.failures[0].to_string(), "X Monthly 1002");
    }

    #[tokio::test]
    async fn test_rerun_skips_existing_files() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let first = stub(&config);
        download_symbol(&first, &config, "X").await.unwrap();

        let saved = temp_dir.path().join("X").join("X Annual 14021229 1001.pdf");
        std::fs::write(&saved, b"local copy").unwrap();

        let second = stub(&config);
        let report = download_symbol(&second, &config, "X").await.unwrap();

        assert_eq!(report.skipped, 1);
        assert!(report.saved.is_empty());
        assert_eq!(second.request_count(&landing(&config, "1001", "a")), 0);
        assert_eq!(
            second.request_count(&download_url(&config, "DownloadFile.aspx?id=ABC123")),
            0
        );
        assert_eq!(std::fs::read(&saved).unwrap(), b"local copy");
        assert_eq!(report.failures.len(), 1);
    }

    #[tokio::test]
    async fn test_download_all_visits_symbols_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = test_config(&temp_dir);
        config.symbols = vec!["X".to_string(), "Y".to_string()];
        let fetcher = stub(&config).with(search_url(&config, "Y", 1), r#"{"Page": 0, "Letters": []}"#);

        let reports = download_all(&fetcher, &config, |_| {}).await.unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].symbol, "X");
        assert_eq!(reports[1].symbol, "Y");
        assert!(reports[1].saved.is_empty());
        assert!(temp_dir.path().join("Y").is_dir());
    }

    #[tokio::test]
    async fn test_download_all_hands_out_reports_before_a_later_error() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = test_config(&temp_dir);
        config.symbols = vec!["X".to_string(), "Y".to_string()];
        let fetcher = stub(&config).with(search_url(&config, "Y", 1), r#"{"Message": "Too many requests"}"#);

        let mut seen = Vec::new();
        let result = download_all(&fetcher, &config, |report| {
            seen.push((report.symbol.clone(), report.failures.len()))
        })
        .await;

        assert!(matches!(result, Err(CodalError::Json { .. })));
        assert_eq!(seen, vec![("X".to_string(), 1)]);
    }

    #[tokio::test]
    async fn test_list_reports() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let fetcher = StubFetcher::new().with(search_url(&config, "X", 1), SEARCH_PAGE);

        let reports = list_reports(&fetcher, &config, "X").await.unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].tracing_number, "1001");
        assert_eq!(reports[1].title, "Monthly");
    }
}
