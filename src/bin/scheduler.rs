use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use trialsheet::{
    ClinicalTrials, DailySchedule, Pipeline, PlaceholderJob, RefreshJob, TrialsConfig,
    normalize_output_path, parse_company_list, run_daily,
};

#[derive(Debug, Parser)]
#[command(name = "trialsheet-scheduler", version)]
#[command(about = "Run a trialsheet update once a day at a fixed time")]
struct Args {
    /// Local time of day to run at (HH:MM).
    #[arg(long, default_value = "10:00")]
    at: String,

    /// Comma-separated company names to refresh. Without them the job only logs.
    #[arg(long, requires = "output")]
    companies: Option<String>,

    /// Workbook the refresh appends to.
    #[arg(long, requires = "companies")]
    output: Option<PathBuf>,

    /// User agent sent with every request.
    #[arg(long)]
    user_agent: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let Some(at) = DailySchedule::parse_time(&args.at) else {
        bail!("invalid time of day {:?}; expected HH:MM", args.at);
    };
    let schedule = DailySchedule::new(at, Local::now().naive_local());

    match (args.companies, args.output) {
        (Some(list), Some(output)) => {
            let companies = parse_company_list(&list);
            let output = normalize_output_path(&output.to_string_lossy())
                .context("output path must not be empty")?;

            let mut config = TrialsConfig::default();
            if let Some(user_agent) = args.user_agent {
                config.user_agent = user_agent;
            }
            let client =
                ClinicalTrials::with_config(config).context("failed to create API client")?;

            let job = RefreshJob {
                pipeline: Pipeline::new(&client, output),
                companies,
            };
            run_daily(schedule, &job).await;
        }
        _ => run_daily(schedule, &PlaceholderJob).await,
    }

    Ok(())
}
