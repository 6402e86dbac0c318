mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use commands::benchmarks::{BenchmarksArgs, EvaluateArgs};
use commands::deal::AnalyzeArgs;
use commands::diligence::ChecklistArgs;
use commands::extraction::ExtractArgs;
use commands::financing::{CapRateArgs, CashOnCashArgs, DscrArgs, MortgageConstantArgs, ProformaArgs};

/// Commercial real estate deal analysis
#[derive(Parser)]
#[command(
    name = "cre",
    version,
    about = "Commercial real estate deal analysis",
    long_about = "Computes deal financing metrics with decimal precision and rates them \
                  against industry benchmarks by asset class and market tier. Supports \
                  mortgage constant, DSCR, cap rate, cash-on-cash, five-year pro forma, \
                  template overrides, OCR field drafting and due-diligence checklists."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log diagnostics to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Full deal analysis with benchmark ratings
    Analyze(AnalyzeArgs),
    /// Annual debt-service constant for a loan
    MortgageConstant(MortgageConstantArgs),
    /// Debt service coverage ratio
    Dscr(DscrArgs),
    /// Going-in cap rate
    CapRate(CapRateArgs),
    /// Cash-on-cash return
    CashOnCash(CashOnCashArgs),
    /// Multi-year NOI and cash-flow projection
    Proforma(ProformaArgs),
    /// Rate one metric against its benchmark
    Evaluate(EvaluateArgs),
    /// List benchmark ranges
    Benchmarks(BenchmarksArgs),
    /// Draft a deal from OCR field readings
    Extract(ExtractArgs),
    /// Due-diligence checklist for an asset class
    Checklist(ChecklistArgs),
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
    let default_level = if verbose { Level::DEBUG } else { Level::WARN };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_str()));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()
        .ok();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Analyze(args) => commands::deal::run_analyze(args),
        Commands::MortgageConstant(args) => commands::financing::run_mortgage_constant(args),
        Commands::Dscr(args) => commands::financing::run_dscr(args),
        Commands::CapRate(args) => commands::financing::run_cap_rate(args),
        Commands::CashOnCash(args) => commands::financing::run_cash_on_cash(args),
        Commands::Proforma(args) => commands::financing::run_proforma(args),
        Commands::Evaluate(args) => commands::benchmarks::run_evaluate(args),
        Commands::Benchmarks(args) => commands::benchmarks::run_benchmarks(args),
        Commands::Extract(args) => commands::extraction::run_extract(args),
        Commands::Checklist(args) => commands::diligence::run_checklist(args),
        Commands::Version => {
            println!("cre {}", env!("CARGO_PKG_VERSION"));
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
