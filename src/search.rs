//! Studies search against the ClinicalTrials.gov Data API.
//!
//! A search for one company is a chain of page requests: each response carries
//! the studies of that page and, while more remain, a `nextPageToken` to send
//! with the following request. [`collect_pages`] walks that chain.
//!
//! # Examples
//!
//! ```ignore
//! use trialsheet::{ClinicalTrials, StudyOperations, StudyQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ClinicalTrials::new("your_app_name contact@example.com")?;
//!
//!     let studies = client
//!         .search_all(StudyQuery::for_company("Moderna").with_page_size(100))
//!         .await?;
//!
//!     println!("Found {} studies", studies.len());
//!     Ok(())
//! }
//! ```

use super::ClinicalTrials;
use super::error::{Result, TrialsError};
use super::options::StudyQuery;
use super::traits::StudyOperations;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

/// One study as returned by the API. No schema is imposed on it.
pub type RawStudy = Value;

/// One page of the studies search response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPage {
    #[serde(default)]
    pub studies: Vec<RawStudy>,
    /// Token for the next page; absent on the last page
    #[serde(default)]
    pub next_page_token: Option<String>,
    /// Only present when the query was built with `with_count_total`
    #[serde(default)]
    pub total_count: Option<u64>,
}

/// Pagination stopped before the last page.
#[derive(Debug, thiserror::Error)]
#[error("fetching studies for {company} failed on page {page}: {source}")]
pub struct FetchFailed {
    pub company: String,
    /// 1-based number of the page that failed
    pub page: usize,
    /// Studies from the pages that succeeded, in API order
    pub partial: Vec<RawStudy>,
    #[source]
    pub source: TrialsError,
}

impl FetchFailed {
    pub fn into_partial(self) -> Vec<RawStudy> {
        self.partial
    }
}

/// Requests pages until one comes back without a continuation token.
///
/// Exactly one request is issued per page. The first request carries the token
/// already present on `query` (normally none).
pub async fn collect_pages<S>(
    source: &S,
    mut query: StudyQuery,
) -> std::result::Result<Vec<RawStudy>, FetchFailed>
where
    S: StudyOperations + ?Sized,
{
    let mut studies = Vec::new();
    let mut page = 1;

    loop {
        match source.study_page(&query).await {
            Ok(response) => {
                tracing::debug!(
                    "Page {} for {} returned {} studies",
                    page,
                    query.company,
                    response.studies.len()
                );
                if let Some(total) = response.total_count {
                    tracing::info!("{} studies match {}", total, query.company);
                }
                studies.extend(response.studies);

                match response.next_page_token {
                    Some(token) => {
                        query.page_token = Some(token);
                        page += 1;
                    }
                    None => return Ok(studies),
                }
            }
            Err(err) => {
                return Err(FetchFailed {
                    company: query.company,
                    page,
                    partial: studies,
                    source: err,
                });
            }
        }
    }
}

#[async_trait]
impl StudyOperations for ClinicalTrials {
    async fn study_page(&self, query: &StudyQuery) -> Result<StudyPage> {
        let params = query.to_query_params();
        let query_string =
            serde_urlencoded::to_string(&params).map_err(|e| TrialsError::Query(e.to_string()))?;

        let url = format!("{}?{}", self.studies_url(), query_string);
        tracing::debug!("Requesting {}", url);

        let body = self.get(&url).await?;
        tracing::trace!("Response body: {}", body);

        Ok(serde_json::from_str(&body)?)
    }

    fn page_size(&self) -> u32 {
        self.page_size
    }
}
