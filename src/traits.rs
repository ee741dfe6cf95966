//! Trait definitions for study search operations.
//!
//! [`ClinicalTrials`](crate::ClinicalTrials) implements [`StudyOperations`] over
//! HTTP. The pagination loop and the driver only depend on the trait, so tests
//! and alternative transports can provide pages from memory.

use super::config::DEFAULT_PAGE_SIZE;
use super::error::Result;
use super::options::StudyQuery;
use super::search::{FetchFailed, RawStudy, StudyPage, collect_pages};
use async_trait::async_trait;

/// Operations for searching studies.
#[async_trait]
pub trait StudyOperations: Send + Sync {
    /// Fetches the single page described by `query`, including its continuation token.
    async fn study_page(&self, query: &StudyQuery) -> Result<StudyPage>;

    /// Studies per page that callers building queries for this source should ask for.
    fn page_size(&self) -> u32 {
        DEFAULT_PAGE_SIZE
    }

    /// Follows continuation tokens from the first page until the API stops returning one.
    ///
    /// Records are returned in API order. A failed page stops the loop and the
    /// records gathered so far are handed back inside [`FetchFailed`].
    async fn search_all(&self, query: StudyQuery) -> std::result::Result<Vec<RawStudy>, FetchFailed> {
        collect_pages(self, query).await
    }
}
