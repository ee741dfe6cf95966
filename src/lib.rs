//! # Trialsheet - ClinicalTrials.gov studies into per-company spreadsheets
//!
//! Trialsheet searches the ClinicalTrials.gov Data API for the studies a company
//! sponsors, collaborates on or hosts, flattens every study into a fixed set of
//! columns, and appends the rows to a sheet named after the company in an
//! `.xlsx` workbook.
//!
//! ## Features
//!
//! - **Rate-limited HTTP client** - one attempt per page, bounded by a timeout
//! - **Pagination** - follows `nextPageToken` until the last page, keeping partial
//!   results when a page fails
//! - **Flattening** - a static extraction table from nested study sections to
//!   named columns
//! - **Workbook output** - one sheet per company, header written once, column
//!   widths fitted to content
//! - **Daily trigger** - a polling scheduler for unattended refreshes
//!
//! ## Basic Usage
//!
//! ```ignore
//! use trialsheet::{ClinicalTrials, Pipeline};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ClinicalTrials::new("YourAppName contact@example.com")?;
//!
//!     let report = Pipeline::new(&client, "trials.xlsx")
//!         .run(&["Moderna".to_string(), "BioNTech SE".to_string()])
//!         .await?;
//!
//!     println!("Wrote {} rows", report.rows_appended());
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod error;
mod format;
mod options;
mod pipeline;
mod prompt;
mod schedule;
mod search;
mod sheet;
mod traits;

#[cfg(test)]
mod testing;

pub use config::{DEFAULT_PAGE_SIZE, DEFAULT_STUDIES_URL, TrialsConfig};
pub use core::ClinicalTrials;
pub use error::{Result, TrialsError};
pub use format::{
    Extract, FIELD_TABLE, FieldRule, FormattedRow, LIST_SEPARATOR, format_studies, format_study,
    headers,
};
pub use options::{COMPANY_AREAS, DEFAULT_FIELDS, MAX_PAGE_SIZE, StudyQuery};
pub use pipeline::{CompanyReport, Pipeline, RunReport};
pub use prompt::{
    InputProvider, PathProvider, TerminalPrompt, normalize_output_path, parse_company_list,
};
pub use schedule::{DailySchedule, POLL_INTERVAL, PlaceholderJob, RefreshJob, ScheduledJob, run_daily};
pub use search::{FetchFailed, RawStudy, StudyPage, collect_pages};
pub use sheet::{AppendSummary, COLUMN_PADDING, MAX_SHEET_TITLE, SheetWriter, column_letter, sheet_title};
pub use traits::StudyOperations;

/// Current crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
