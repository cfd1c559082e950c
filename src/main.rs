use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

mod cli;

use cli::{Cli, Commands};
use fastcodal::codal::HttpFetcher;
use fastcodal::config::Config;
use fastcodal::downloader;
use fastcodal::models::DownloadReport;

#[tokio::main]
async fn main() -> Result<()> {
    // Set default log level to INFO if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "fastcodal=info");
    }

    // Initialize logging to both console and file
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let file_appender = tracing_appender::rolling::never(".", "fastcodal.log");

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(EnvFilter::from_default_env()),
        )
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_filter(EnvFilter::from_default_env()),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;

    match &cli.command {
        Commands::Download {
            symbols,
            output,
            headers,
        } => {
            if !symbols.is_empty() {
                config.symbols = symbols.clone();
            }
            if let Some(output) = output {
                config.download_dir = output.into();
            }
            for header in headers {
                config.add_header(header)?;
            }
            config.validate()?;

            let fetcher = HttpFetcher::new(&config.http)?;
            info!("Downloading reports for {} symbols", config.symbols.len());

            match downloader::download_all(&fetcher, &config, print_summary).await {
                Ok(reports) => info!("Finished {} symbols", reports.len()),
                Err(e) => {
                    error!("Download failed: {}", e);
                    return Err(e.into());
                }
            }
        }

        Commands::List {
            symbol,
            json,
            headers,
        } => {
            for header in headers {
                config.add_header(header)?;
            }

            let fetcher = HttpFetcher::new(&config.http)?;
            match downloader::list_reports(&fetcher, &config, symbol).await {
                Ok(entries) if *json => {
                    println!("{}", serde_json::to_string_pretty(&entries)?);
                }
                Ok(entries) => {
                    println!("tracing_no\ttitle\tattachment_url");
                    for entry in entries {
                        println!(
                            "{}\t{}\t{}",
                            entry.tracing_number, entry.title, entry.attachment_url
                        );
                    }
                }
                Err(e) => {
                    error!("Search failed: {}", e);
                    return Err(e.into());
                }
            }
        }
    }

    Ok(())
}

fn print_summary(report: &DownloadReport) {
    println!(
        "Directory \"{}\" created for \"{}\"",
        report.directory.display(),
        report.symbol
    );
    println!(
        "saved: {}, skipped: {}, failed: {}",
        report.saved.len(),
        report.skipped,
        report.failures.len()
    );
    if !report.failures.is_empty() {
        println!("failed:");
        for failure in &report.failures {
            println!("  {} ({})", failure, failure.kind.as_str());
        }
    }
}
