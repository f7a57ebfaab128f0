// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use training_dashboard::config::{Config, FitnessConfig, ReportSchedule};
use training_dashboard::constants::periods;
use training_dashboard::dashboard::{earliest_required_date, DashboardBuilder};
use training_dashboard::intelligence::periods::{period_boundaries, PeriodType};
use training_dashboard::logging::{AppLogger, LoggingConfig};
use training_dashboard::providers::create_source;
use training_dashboard::sink::{DashboardSink, JsonFileSink};

#[derive(Parser)]
#[command(name = "training-dashboard")]
#[command(about = "Build training and health dashboards with ACWR training-load analysis")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Reference date (YYYY-MM-DD), defaults to today
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the overview dashboard and periodic reports
    Dashboard {
        /// Print the results instead of writing them
        #[arg(long)]
        dry_run: bool,
    },
    /// Compute the full weekly history for charts
    Charts {
        /// Output file, defaults to data.json in the output directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Print the results instead of writing them
        #[arg(long)]
        dry_run: bool,
    },
    /// Show period boundaries for the reference date
    Boundaries,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        logging = logging.with_level("debug");
    }
    logging.init()?;

    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    info!(today = %today, "Reference date");

    match cli.command {
        Commands::Dashboard { dry_run } => run_dashboard(cli.config, today, dry_run).await,
        Commands::Charts { output, dry_run } => run_charts(cli.config, today, output, dry_run).await,
        Commands::Boundaries => {
            show_boundaries(today);
            Ok(())
        }
    }
}

async fn run_dashboard(config_path: Option<String>, today: NaiveDate, dry_run: bool) -> Result<()> {
    let config = Config::load(config_path)?;
    let fitness_config = FitnessConfig::load(config.fitness_config_path.clone())?;
    let source = create_source(&config.sources.kind, &config.sources)?;

    let since = earliest_required_date(today, config.overview_weeks, &config.reports);
    info!(since = %since, "Fetching records");

    let training = source.training_records(Some(since)).await?;
    let health = source.health_records(Some(since)).await?;
    AppLogger::log_records_loaded(source.source_name(), training.len(), health.len());

    let builder = DashboardBuilder::with_config(fitness_config, config.overview_weeks);
    let dashboard = builder.compute_dashboard(&training, &health, today);

    dashboard.training_weeks.iter().for_each(AppLogger::log_training_period);
    dashboard.running_periods.iter().for_each(AppLogger::log_running_period);
    dashboard.health_weeks.iter().for_each(AppLogger::log_health_period);
    AppLogger::log_training_load(&dashboard.training_load);
    for warning in &dashboard.overreaching_warnings {
        AppLogger::log_overreaching_warning(warning);
    }

    let reports: Vec<_> = config
        .reports
        .iter()
        .map(|schedule| builder.build_period_report(&training, &health, today, schedule))
        .collect();

    if dry_run {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
        for report in &reports {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
    } else {
        let sink = JsonFileSink::new(&config.output.directory);
        sink.publish_dashboard(&dashboard)
            .await
            .context("Failed to publish dashboard")?;
        for report in &reports {
            sink.publish_report(report)
                .await
                .with_context(|| format!("Failed to publish {}", report.title))?;
        }
    }

    AppLogger::log_output_published("dashboard", "Overview", dry_run);
    for report in &reports {
        AppLogger::log_output_published("report", &report.title, dry_run);
    }

    Ok(())
}

async fn run_charts(
    config_path: Option<String>,
    today: NaiveDate,
    output: Option<PathBuf>,
    dry_run: bool,
) -> Result<()> {
    let config = Config::load(config_path)?;
    let fitness_config = FitnessConfig::load(config.fitness_config_path.clone())?;
    let source = create_source(&config.sources.kind, &config.sources)?;

    let training = source.training_records(None).await?;
    let health = source.health_records(None).await?;
    AppLogger::log_records_loaded(source.source_name(), training.len(), health.len());

    let builder = DashboardBuilder::with_config(fitness_config, config.overview_weeks);
    let charts = builder.build_charts_data(&training, &health, today);

    if dry_run {
        println!("{}", serde_json::to_string_pretty(&charts)?);
    } else {
        let mut sink = JsonFileSink::new(&config.output.directory);
        if let Some(path) = output {
            sink = sink.with_charts_path(path);
        }
        sink.publish_charts(&charts)
            .await
            .context("Failed to publish charts data")?;
    }

    AppLogger::log_output_published("charts", "Charts", dry_run);
    Ok(())
}

fn show_boundaries(today: NaiveDate) {
    let overview = ReportSchedule {
        title: "Overview".to_string(),
        period_type: PeriodType::Week,
        count: periods::OVERVIEW_WEEKS,
    };
    for schedule in std::iter::once(overview).chain(ReportSchedule::default_schedule()) {
        for period in period_boundaries(today, schedule.period_type, schedule.count) {
            info!(
                report = %schedule.title,
                period.label = %period.label,
                period.start = %period.start,
                period.end = %period.end,
                "Period boundary"
            );
        }
    }
}
