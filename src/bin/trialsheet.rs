use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;
use trialsheet::{
    ClinicalTrials, DEFAULT_PAGE_SIZE, InputProvider, PathProvider, Pipeline, RunReport,
    TerminalPrompt, TrialsConfig, normalize_output_path, parse_company_list,
};

#[derive(Debug, Parser)]
#[command(name = "trialsheet", version)]
#[command(about = "Fetch ClinicalTrials.gov studies per company into an Excel workbook")]
struct Args {
    /// Comma-separated company names; prompted for when omitted.
    #[arg(long)]
    companies: Option<String>,

    /// Output workbook; prompted for when omitted.
    #[arg(long)]
    output: Option<PathBuf>,

    /// User agent sent with every request.
    #[arg(long)]
    user_agent: Option<String>,

    /// Studies per page (1-1000).
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u32,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut prompt = TerminalPrompt::stdio();

    let raw_companies = match args.companies {
        Some(list) => list,
        None => prompt.company_list().context("failed to read company names")?,
    };
    let companies = parse_company_list(&raw_companies);
    if companies.is_empty() {
        println!("{}", style("No company names given; nothing to do.").yellow());
        return Ok(());
    }

    let output = match args.output {
        Some(path) => normalize_output_path(&path.to_string_lossy()),
        None => prompt.output_path().context("failed to read output path")?,
    };
    let Some(output) = output else {
        println!("{}", style("No output file chosen; nothing to do.").yellow());
        return Ok(());
    };

    let mut config = TrialsConfig::default().with_page_size(args.page_size);
    config.timeout = Duration::from_secs(args.timeout_secs);
    if let Some(user_agent) = args.user_agent {
        config.user_agent = user_agent;
    }
    let client = ClinicalTrials::with_config(config).context("failed to create API client")?;

    let report = Pipeline::new(&client, &output)
        .run(&companies)
        .await
        .with_context(|| format!("failed to write {}", output.display()))?;

    print_report(&report, &output);
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

fn print_report(report: &RunReport, output: &std::path::Path) {
    for company in &report.companies {
        let written = company.appended.as_ref().map_or(0, |a| a.rows_appended);
        println!(
            "{} {} studies fetched, {} rows written",
            style(format!("{}:", company.company)).bold(),
            style(company.studies_fetched).cyan(),
            style(written).magenta()
        );
        if let Some(error) = &company.fetch_error {
            println!("  {} {}", style("partial:").red().bold(), style(error).dim());
        }
    }

    println!(
        "{} {} rows across {} companies -> {}",
        style("Done.").green().bold(),
        report.rows_appended(),
        report.companies.len(),
        output.display()
    );
}
