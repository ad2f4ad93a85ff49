use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "shadow-audit",
    version,
    about = "Shadow efficiency audit and health scoring for pipeline inspection reports"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Project config file, used in place of ./shadow-audit.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Per-block shadow audit summaries
    Audit(PortfolioCommand),
    /// Roll-up across reports, spreads and dates
    Portfolio(PortfolioCommand),
    /// Cross-check efficiency claims against output and quality
    Verify(PortfolioCommand),
    /// Report health scores
    Health(HealthCommand),
    /// Delay documentation findings
    Lint(LintCommand),
    /// List the delay reason catalog
    Reasons(ReasonsCommand),
}

#[derive(Args)]
pub struct PortfolioCommand {
    /// Report file, JSON array of reports, or directory of exports
    pub input: PathBuf,
    /// First report date to include (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,
    /// Last report date to include (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
    #[arg(long)]
    pub spread: Option<String>,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct HealthCommand {
    pub input: PathBuf,
    /// Passing threshold, overriding report and config settings
    #[arg(long)]
    pub threshold: Option<f64>,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct LintCommand {
    pub input: PathBuf,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct ReasonsCommand {
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}
