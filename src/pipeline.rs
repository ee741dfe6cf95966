//! Fetch, format and write, one company at a time.

use std::path::PathBuf;

use super::error::Result;
use super::format::format_studies;
use super::options::{DEFAULT_FIELDS, StudyQuery};
use super::sheet::{AppendSummary, SheetWriter};
use super::traits::StudyOperations;

/// Outcome for one company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyReport {
    pub company: String,
    pub studies_fetched: usize,
    /// `None` when nothing was written for this company
    pub appended: Option<AppendSummary>,
    /// Set when pagination stopped early; the fetched studies are the partial result
    pub fetch_error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub companies: Vec<CompanyReport>,
}

impl RunReport {
    pub fn studies_fetched(&self) -> usize {
        self.companies.iter().map(|c| c.studies_fetched).sum()
    }

    pub fn rows_appended(&self) -> usize {
        self.companies
            .iter()
            .filter_map(|c| c.appended.as_ref())
            .map(|a| a.rows_appended)
            .sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &CompanyReport> {
        self.companies.iter().filter(|c| c.fetch_error.is_some())
    }
}

/// Runs the fetch → format → write chain for each company in turn.
pub struct Pipeline<'a, S: StudyOperations + ?Sized> {
    source: &'a S,
    writer: SheetWriter,
    fields: Vec<String>,
    page_size: u32,
}

impl<'a, S: StudyOperations + ?Sized> Pipeline<'a, S> {
    /// Pipeline appending to `output`, asking `source` for its own page size.
    pub fn new(source: &'a S, output: impl Into<PathBuf>) -> Self {
        Self {
            source,
            writer: SheetWriter::new(output),
            fields: DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect(),
            page_size: source.page_size(),
        }
    }

    pub fn with_fields<I, T>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Overrides the page size taken from the source.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Studies per page requested for every company.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Processes every company sequentially.
    ///
    /// A failed fetch only truncates that company's results; the run moves on. A
    /// workbook error ends the run.
    pub async fn run(&self, companies: &[String]) -> Result<RunReport> {
        let mut report = RunReport::default();
        for company in companies {
            report.companies.push(self.run_company(company).await?);
        }
        Ok(report)
    }

    pub async fn run_company(&self, company: &str) -> Result<CompanyReport> {
        let query = StudyQuery::for_company(company)
            .with_fields(self.fields.iter().cloned())
            .with_page_size(self.page_size);

        let (studies, fetch_error) = match self.source.search_all(query).await {
            Ok(studies) => (studies, None),
            Err(failed) => {
                tracing::warn!(
                    "Pagination for {} stopped on page {} (status {:?}): {}",
                    failed.company,
                    failed.page,
                    failed.source.status(),
                    failed.source
                );
                let message = failed.to_string();
                (failed.into_partial(), Some(message))
            }
        };

        if studies.is_empty() {
            tracing::warn!("No studies found for {}", company);
        }

        let rows = format_studies(&studies);
        let appended = self.writer.append(company, &rows)?;

        tracing::info!(
            "{}: {} studies fetched, {} rows written",
            company,
            studies.len(),
            appended.as_ref().map_or(0, |a| a.rows_appended)
        );

        Ok(CompanyReport {
            company: company.to_string(),
            studies_fetched: studies.len(),
            appended,
            fetch_error,
        })
    }
}
