// waybill - config-driven record linkage between shipment and logistics tables

mod exit_codes;
mod link;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "waybill")]
#[command(about = "Link pending shipments to logistics records by name, phone, address, and product")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a linkage pass from a TOML config file
    #[command(after_help = "\
Examples:
  waybill run shipment.link.toml
  waybill run shipment.link.toml --json
  waybill run shipment.link.toml -o merged.csv --report report.json
  waybill run shipment.link.toml --strict")]
    Run {
        /// Path to the .link.toml config file
        config: PathBuf,

        /// Print the report JSON to stdout instead of the human summary
        #[arg(long)]
        json: bool,

        /// Write the merged table as CSV to file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Write the report JSON to file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Exit non-zero when any destination row stays unmatched
        #[arg(long)]
        strict: bool,
    },

    /// Validate a link config without running
    #[command(after_help = "\
Examples:
  waybill validate shipment.link.toml")]
    Validate {
        /// Path to the .link.toml config file
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("warn"));

    let cli = Cli::parse();

    let result = match cli.command {
        None => {
            eprintln!("Usage: waybill <command> [options]");
            eprintln!("       waybill --help for more information");
            return ExitCode::from(EXIT_USAGE);
        }
        Some(Commands::Run { config, json, output, report, strict }) => {
            link::cmd_run(config, json, output, report, strict)
        }
        Some(Commands::Validate { config }) => link::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {message}");
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {hint}");
            }
            ExitCode::from(code)
        }
    }
}

/// Command failure carrying the exit code plus what to print on stderr.
#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    /// Attach a remediation line printed under the error message.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
