mod commands;
mod input;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::calendar::CalendarArgs;
use commands::loan::{LoanArgs, ValidateArgs};
use emi_core::policy::LoanPolicy;

/// EMI amortization schedules with decimal precision
#[derive(Parser)]
#[command(
    name = "emi",
    version,
    about = "EMI amortization schedules with decimal precision",
    long_about = "Computes month-by-month schedules for fixed-rate loans: the level \
                  payment (EMI), each period's interest and principal, and the \
                  remaining balance. Also derives totals, chart series and a \
                  calendar reminder link."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Request policy file (JSON or YAML) overriding the default bounds
    #[arg(long, global = true)]
    policy: Option<String>,

    /// Skip the request policy and pass terms straight to the engine
    #[arg(long, global = true, conflicts_with = "policy")]
    no_policy: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the full amortization schedule
    Schedule(LoanArgs),
    /// Totals and the principal/interest split
    Summary(LoanArgs),
    /// Per-month series for charting
    Chart(LoanArgs),
    /// Build a recurring calendar reminder link for the payments
    Calendar(CalendarArgs),
    /// Check loan terms against the request policy
    Validate(ValidateArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| format!("emi={level}").into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_policy(cli: &Cli) -> Result<Option<LoanPolicy>, Box<dyn std::error::Error>> {
    if cli.no_policy {
        tracing::info!("request policy disabled");
        return Ok(None);
    }
    let policy = match cli.policy {
        Some(ref path) => {
            let policy: LoanPolicy = input::file::read_config(path)?;
            policy.check_invariants()?;
            tracing::info!(path = %path, "loaded request policy");
            policy
        }
        None => LoanPolicy::default(),
    };
    tracing::debug!(?policy, "request policy");
    Ok(Some(policy))
}

fn run(cli: Cli) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let policy = load_policy(&cli)?;
    match cli.command {
        Commands::Schedule(args) => commands::loan::run_schedule(args, policy.as_ref()),
        Commands::Summary(args) => commands::loan::run_summary(args, policy.as_ref()),
        Commands::Chart(args) => commands::loan::run_chart(args, policy.as_ref()),
        Commands::Calendar(args) => commands::calendar::run_calendar(args, policy.as_ref()),
        Commands::Validate(args) => {
            let policy = policy.unwrap_or_default();
            commands::loan::run_validate(args, &policy)
        }
        Commands::Version => Ok(serde_json::json!({ "version": env!("CARGO_PKG_VERSION") })),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Commands::Version = cli.command {
        println!("emi {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let format = cli.output.clone();
    match run(cli) {
        Ok(value) => {
            output::format_output(&format, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
