mod cli;

use clap::Parser;
use shadow_audit::audit::{self, rates::RateLookup};
use shadow_audit::config;
use shadow_audit::error::Result;
use shadow_audit::health;
use shadow_audit::ingest::{self, ReportFilter};
use shadow_audit::lint;
use shadow_audit::portfolio;
use shadow_audit::report::{self, Output, OutputFormat};
use shadow_audit::types::reason;
use shadow_audit::types::report::ReportHealth;
use shadow_audit::verification::{self, Reliability};
use tracing_subscriber::EnvFilter;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const WARNINGS: i32 = 1;
    pub const BLOCKING: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn output_format(format: cli::ReportFormat) -> OutputFormat {
    match format {
        cli::ReportFormat::Json => OutputFormat::Json,
        cli::ReportFormat::Md => OutputFormat::Md,
    }
}

fn emit(output: &Output, format: cli::ReportFormat) -> Result<()> {
    let rendered = report::render(output, output_format(format))?;
    println!("{rendered}");
    Ok(())
}

fn run() -> Result<i32> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let root = std::env::current_dir()?;
    let config = config::load_config(&root, cli.config.as_deref())?;
    let rates = RateLookup::from_config(&config);

    match cli.command {
        cli::Commands::Audit(cmd) => {
            let filter =
                ReportFilter::new(cmd.from.as_deref(), cmd.to.as_deref(), cmd.spread.as_deref())?;
            let ingested = ingest::load_reports(&cmd.input)?;
            let reports = filter.apply(ingested.reports);
            let audits = audit::audit_reports(&reports, &ingested.cache, &rates);
            emit(&Output::Audit(audits), cmd.format)?;
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Portfolio(cmd) => {
            let filter =
                ReportFilter::new(cmd.from.as_deref(), cmd.to.as_deref(), cmd.spread.as_deref())?;
            let ingested = ingest::load_reports(&cmd.input)?;
            let reports = filter.apply(ingested.reports);
            let summary = portfolio::aggregate(&reports, &ingested.cache, &rates);
            emit(&Output::Portfolio(summary), cmd.format)?;
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Verify(cmd) => {
            let filter =
                ReportFilter::new(cmd.from.as_deref(), cmd.to.as_deref(), cmd.spread.as_deref())?;
            let ingested = ingest::load_reports(&cmd.input)?;
            let reports = filter.apply(ingested.reports);
            let verified = verification::verify(
                &reports,
                &ingested.cache,
                &rates,
                &config.verification_thresholds(),
            );
            let code = match verified.overall_reliability {
                Reliability::Unreliable => exit_code::BLOCKING,
                Reliability::Questionable => exit_code::WARNINGS,
                Reliability::Reliable => exit_code::SUCCESS,
            };
            emit(&Output::Verify(verified), cmd.format)?;
            Ok(code)
        }
        cli::Commands::Health(cmd) => {
            let ingested = ingest::load_reports(&cmd.input)?;
            let weights = config.weights();
            let scores = ingested
                .reports
                .iter()
                .map(|report| {
                    let threshold = health::resolve_threshold(cmd.threshold, report, &config);
                    ReportHealth {
                        report: report.label(),
                        health: health::score_report(report, &weights, threshold),
                    }
                })
                .collect::<Vec<_>>();
            let failing = scores.iter().any(|entry| !entry.health.passing);
            emit(&Output::Health(scores), cmd.format)?;
            if failing {
                Ok(exit_code::WARNINGS)
            } else {
                Ok(exit_code::SUCCESS)
            }
        }
        cli::Commands::Lint(cmd) => {
            let ingested = ingest::load_reports(&cmd.input)?;
            let weights = config.weights();
            let findings = ingested
                .reports
                .iter()
                .flat_map(|report| {
                    let threshold = health::resolve_threshold(None, report, &config);
                    lint::lint_report(report, &weights, threshold)
                })
                .collect::<Vec<_>>();
            let has_blocking = findings.iter().any(|finding| finding.blocking);
            let has_warnings = !findings.is_empty();
            emit(&Output::Lint(findings), cmd.format)?;

            if has_blocking {
                Ok(exit_code::BLOCKING)
            } else if has_warnings {
                Ok(exit_code::WARNINGS)
            } else {
                Ok(exit_code::SUCCESS)
            }
        }
        cli::Commands::Reasons(cmd) => {
            emit(&Output::Reasons(reason::catalog()), cmd.format)?;
            Ok(exit_code::SUCCESS)
        }
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}
