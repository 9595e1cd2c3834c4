use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::Parser;
use cwlogs_cost_estimator::prelude::*;
use cwlogs_cost_estimator::{
    write_report, AnalysisWindow, BillingPeriod, DailyAggregator, UsageLoader, DEFAULT_REGION,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
use config::{expand_path, load_config, resolve_region, EstimatorConfig, DEFAULT_CONFIG_FILE};

#[derive(Parser, Debug)]
#[clap(version, about)]
struct Args {
    /// Exported usage data: a .jsonl file or a directory of them
    #[arg(short = 'u', long = "usage")]
    usage: String,

    /// Pricing region; overrides AWS_REGION / AWS_DEFAULT_REGION
    #[arg(short = 'r', long = "region")]
    region: Option<String>,

    /// Pricing document to use instead of the bundled one
    #[arg(long = "pricing")]
    pricing: Option<String>,

    /// Account identifier used in the report file name
    #[arg(short = 'a', long = "account-id")]
    account_id: Option<String>,

    #[arg(long = "reports-dir")]
    reports_dir: Option<String>,

    /// Only count log groups with this prefix ("" counts every group)
    #[arg(long = "log-group-prefix")]
    log_group_prefix: Option<String>,

    /// Restrict the analysis to one month, as YYYY-MM
    #[arg(long = "month", conflicts_with = "last_month")]
    month: Option<String>,

    /// Restrict the analysis to the last complete month
    #[arg(long = "last-month")]
    last_month: bool,

    #[arg(long = "days-per-month")]
    days_per_month: Option<f64>,

    /// Print the comparison as JSON instead of the text report
    #[arg(long = "json")]
    json: bool,

    /// Do not write the report file
    #[arg(long = "no-save")]
    no_save: bool,

    #[arg(short = 'c', long = "config", default_value = DEFAULT_CONFIG_FILE)]
    config: String,

    #[arg(short = 'v')]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_month(value: &str) -> Result<AnalysisWindow> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", value))?;
    AnalysisWindow::month(first.year(), first.month())
        .ok_or_else(|| anyhow::anyhow!("Invalid month '{}'", value))
}

fn analysis_window(args: &Args, today: NaiveDate) -> Result<Option<AnalysisWindow>> {
    if let Some(month) = &args.month {
        return parse_month(month).map(Some);
    }
    if args.last_month {
        return AnalysisWindow::previous_full_month(today)
            .map(Some)
            .ok_or_else(|| anyhow::anyhow!("Cannot determine previous month from {}", today));
    }
    Ok(None)
}

fn load_catalog(args: &Args, config: &EstimatorConfig) -> Result<PricingCatalog> {
    let pricing_file = args.pricing.as_ref().or(config.pricing_file.as_ref());
    let catalog = match pricing_file {
        Some(path) => PricingCatalog::load(expand_path(path))?,
        None => PricingCatalog::builtin()?,
    };
    Ok(catalog)
}

fn run(args: Args) -> Result<()> {
    let config = load_config(&expand_path(&args.config))?;
    let today = Local::now().date_naive();

    let region = resolve_region(
        args.region.as_deref(),
        |key| std::env::var(key).ok(),
        &config,
        DEFAULT_REGION,
    );
    tracing::info!(%region, "starting CloudWatch Logs cost analysis");

    let catalog = load_catalog(&args, &config).context("Failed to load pricing data")?;

    let days_per_month = args.days_per_month.unwrap_or(config.days_per_month);
    let billing_period = BillingPeriod::new(days_per_month).ok_or_else(|| {
        anyhow::anyhow!("days per month must be positive, got {}", days_per_month)
    })?;

    let usage_path = expand_path(&args.usage);
    let observations = UsageLoader::new()
        .load(&usage_path)
        .with_context(|| format!("Failed to load usage data from {}", usage_path.display()))?;

    let prefix = args
        .log_group_prefix
        .clone()
        .unwrap_or_else(|| config.log_group_prefix.clone());
    let mut aggregator = DailyAggregator::new().with_log_group_prefix(prefix);
    if let Some(window) = analysis_window(&args, today)? {
        tracing::info!(
            start = %window.start(),
            end = %window.last_day(),
            "restricting analysis window"
        );
        aggregator = aggregator.with_window(window);
    }
    let records = aggregator.aggregate(&observations);
    tracing::info!(days = records.len(), "usage aggregated");

    let analysis = CostAnalyzer::with_billing_period(&catalog, billing_period)
        .analyze(&records, &region)?;

    let report = render_report(&analysis);

    if !args.no_save {
        let account_id = args
            .account_id
            .clone()
            .or_else(|| std::env::var("AWS_ACCOUNT_ID").ok())
            .unwrap_or_else(|| "unknown".to_string());
        let reports_dir: PathBuf =
            expand_path(args.reports_dir.as_deref().unwrap_or(&config.reports_dir));

        if let Err(e) = write_report(&reports_dir, today, &account_id, &report) {
            tracing::error!(error = %e, "failed to write report file");
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        println!("{}", report);
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    run(args)
}
