//! quote-merge
//!
//! Command line front end: reconciles a BoM against distributor stock and
//! extracts quote documents from worksheets.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use quotemerge_utils::{init_logging, AppConfig, DateMode, ErrorResponse, QuoteError};
use tracing::debug;

#[derive(Parser)]
#[command(name = "quote-merge")]
#[command(about = "Reconcile part lists and extract quote sheets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Match BoM demand against distributor supply")]
    Reconcile {
        #[arg(long, value_name = "FILE", help = "BoM part list (csv, json or xlsx)")]
        bom: PathBuf,
        #[arg(long, value_name = "FILE", help = "Distributor part list (csv, json or xlsx)")]
        disti: PathBuf,
        #[arg(long, short, value_enum, default_value = "table", help = "Output format")]
        format: OutputFormat,
    },
    #[command(about = "Extract the quote document from a worksheet")]
    Extract {
        #[arg(help = "Path to the workbook")]
        workbook: PathBuf,
        #[arg(long, help = "Worksheet to read (defaults to the first)")]
        sheet: Option<String>,
        #[arg(long, value_name = "1900|1904", help = "Date system of the workbook")]
        date_mode: Option<DateMode>,
    },
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => return report_error(QuoteError::from(e)),
    };

    if let Err(e) = init_logging(&config.logging) {
        return report_error(QuoteError::internal(format!("Failed to initialise logging: {:#}", e)));
    }
    debug!(?config, "Loaded configuration");

    let result = match cli.command {
        Commands::Reconcile { bom, disti, format } => commands::reconcile(&config, &bom, &disti, format),
        Commands::Extract {
            workbook,
            sheet,
            date_mode,
        } => commands::extract(&config, &workbook, sheet, date_mode),
    };

    match result {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => report_error(e),
    }
}

fn report_error(error: QuoteError) -> ExitCode {
    let code = error.exit_code();
    let response = ErrorResponse::from(error);

    match serde_json::to_string_pretty(&response) {
        Ok(json) => eprintln!("{}", json),
        Err(_) => eprintln!("Error: {}", response.message),
    }

    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
