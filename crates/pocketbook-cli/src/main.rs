mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::expression::EvalArgs;
use commands::loans::LoanArgs;

/// Amount expressions and loan projections for Pocketbook
#[derive(Parser)]
#[command(
    name = "pb",
    version,
    about = "Amount expressions and loan projections for Pocketbook",
    long_about = "Evaluates the arithmetic accepted by Pocketbook's amount fields and \
                  projects loan payoffs with decimal precision. Loan inputs can come \
                  from flags, a JSON file (--input) or JSON piped on stdin."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log calculation details to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an amount expression such as "120+35.50" or "50*10%"
    Eval(EvalArgs),
    /// Project remaining payments, interest and months to payoff for a loan
    LoanPayoff(LoanArgs),
    /// Month-by-month amortization schedule for a loan
    LoanSchedule(LoanArgs),
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

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Eval(args) => commands::expression::run_eval(args),
        Commands::LoanPayoff(args) => commands::loans::run_loan_payoff(args),
        Commands::LoanSchedule(args) => commands::loans::run_loan_schedule(args),
        Commands::Version => {
            println!("pb {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
