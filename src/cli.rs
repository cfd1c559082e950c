use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fastcodal")]
#[command(about = "Fast CLI tool for downloading financial disclosure reports from Codal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download every report of the given symbols
    Download {
        /// Symbols to download (defaults to FASTCODAL_SYMBOLS or the built-in list)
        symbols: Vec<String>,

        /// Base output directory; each symbol gets a subdirectory
        #[arg(short, long)]
        output: Option<String>,

        /// Extra request header as 'Name: value' (repeatable)
        #[arg(long = "header")]
        headers: Vec<String>,
    },

    /// List the reports the search API returns for a symbol
    List {
        /// Symbol to search for
        symbol: String,

        /// Print reports as a JSON array instead of tab-separated lines
        #[arg(long)]
        json: bool,

        /// Extra request header as 'Name: value' (repeatable)
        #[arg(long = "header")]
        headers: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_download_command() {
        let cli = Cli::parse_from([
            "fastcodal", "download", "کاردان", "X", "-o", "/tmp/out", "--header", "Accept-Language: fa",
        ]);
        match cli.command {
            Commands::Download { symbols, output, headers } => {
                assert_eq!(symbols, vec!["کاردان", "X"]);
                assert_eq!(output.as_deref(), Some("/tmp/out"));
                assert_eq!(headers, vec!["Accept-Language: fa"]);
            }
            _ => panic!("expected download command"),
        }
    }

    #[test]
    fn test_parse_list_command() {
        let cli = Cli::parse_from(["fastcodal", "list", "X", "--json"]);
        assert!(matches!(cli.command, Commands::List { ref symbol, json: true, .. } if symbol == "X"));
    }

    #[test]
    fn test_download_without_symbols_uses_config() {
        let cli = Cli::parse_from(["fastcodal", "download"]);
        assert!(matches!(cli.command, Commands::Download { ref symbols, .. } if symbols.is_empty()));
    }
}
