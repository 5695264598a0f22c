//! sheetgrid CLI
//!
//! Command-line interface over the viewer: an interactive terminal client plus
//! non-interactive `print`, `show` and `url` commands.

mod basic;
mod view;

use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::{ViewerConfig, DEFAULT_HTTP_TIMEOUT_SECS, SHEET_URL_ENV};

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "SHEETGRID_LOG";

/// sheetgrid - browse a published spreadsheet as a searchable grid
#[derive(Parser)]
#[command(name = "sheetgrid")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the sheet interactively
    View {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Print the grid once and exit
    Print {
        #[command(flatten)]
        source: SourceArgs,
        /// Output width in columns
        #[arg(short, long, default_value = "100")]
        width: u16,
    },
    /// Select a displayed row and print its detail view
    Show {
        #[command(flatten)]
        source: SourceArgs,
        /// Position of the row among the displayed (filtered) rows
        index: usize,
        /// Output width in columns
        #[arg(short, long, default_value = "100")]
        width: u16,
    },
    /// Print the CSV export URL for a sheet link
    Url {
        /// Sheet link or CSV export URL
        url: String,
    },
}

/// Where the sheet comes from and how it is shaped
#[derive(Args, Debug, Clone)]
struct SourceArgs {
    /// Sheet URL or local CSV/JSON path
    #[arg(short = 'u', long = "source", env = SHEET_URL_ENV)]
    source: Option<String>,
    /// Initial search query
    #[arg(short, long)]
    search: Option<String>,
    /// Treat every CSV line as a data row (no header line)
    #[arg(long)]
    raw: bool,
    /// Keep the first row as the header even when the second looks better
    #[arg(long)]
    first_row_header: bool,
    /// HTTP timeout in seconds
    #[arg(long, default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)]
    timeout: u64,
}

impl SourceArgs {
    fn into_config(self) -> ViewerConfig {
        let mut config = ViewerConfig::from_env()
            .with_raw(self.raw)
            .with_second_row_as_header(!self.first_row_header)
            .with_http_timeout_secs(self.timeout);
        if let Some(source) = self.source {
            config = config.with_source(source);
        }
        if let Some(query) = self.search {
            config = config.with_initial_query(query);
        }
        config
    }
}

/// Install the stderr log subscriber, filtered by `SHEETGRID_LOG`.
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}

/// Run the CLI
pub fn run() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::View { source } => view::cmd_view(&source.into_config()),
        Commands::Print { source, width } => basic::cmd_print(&source.into_config(), width),
        Commands::Show {
            source,
            index,
            width,
        } => basic::cmd_show(&source.into_config(), index, width),
        Commands::Url { url } => basic::cmd_url(&url),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn f_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn f_print_args_map_to_config() {
        let cli = Cli::try_parse_from([
            "sheetgrid",
            "print",
            "--source",
            "data.csv",
            "--search",
            "widget",
            "--first-row-header",
            "--width",
            "60",
        ])
        .unwrap();
        let Commands::Print { source, width } = cli.command else {
            panic!("FALSIFIED: expected print command");
        };
        assert_eq!(width, 60);
        let config = source.into_config();
        assert_eq!(config.source, "data.csv");
        assert_eq!(config.initial_query, "widget");
        assert!(!config.second_row_as_header);
        assert!(!config.raw);
    }

    #[test]
    fn f_show_takes_positional_index() {
        let cli =
            Cli::try_parse_from(["sheetgrid", "show", "-u", "data.csv", "3", "--raw"]).unwrap();
        let Commands::Show { source, index, .. } = cli.command else {
            panic!("FALSIFIED: expected show command");
        };
        assert_eq!(index, 3);
        assert!(source.into_config().raw);
    }

    #[test]
    fn f_url_requires_argument() {
        assert!(Cli::try_parse_from(["sheetgrid", "url"]).is_err());
    }
}
