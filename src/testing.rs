//! In-memory page source for unit tests.

use crate::config::DEFAULT_PAGE_SIZE;
use crate::error::Result;
use crate::options::StudyQuery;
use crate::search::{RawStudy, StudyPage};
use crate::traits::StudyOperations;
use async_trait::async_trait;
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

const ANY_COMPANY: &str = "*";

/// Serves scripted pages in order and records every query it receives.
///
/// Once a company's script runs out, further requests get an empty last page.
pub struct ScriptedPages {
    scripts: Mutex<HashMap<String, VecDeque<Result<StudyPage>>>>,
    queries: Mutex<Vec<StudyQuery>>,
    page_size: u32,
}

impl ScriptedPages {
    pub fn new(pages: Vec<Result<StudyPage>>) -> Self {
        Self::per_company(vec![(ANY_COMPANY, pages)])
    }

    pub fn per_company(scripts: Vec<(&str, Vec<Result<StudyPage>>)>) -> Self {
        Self {
            scripts: Mutex::new(
                scripts
                    .into_iter()
                    .map(|(company, pages)| (company.to_string(), pages.into()))
                    .collect(),
            ),
            queries: Mutex::new(Vec::new()),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn requests(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn tokens_seen(&self) -> Vec<Option<String>> {
        self.queries
            .lock()
            .unwrap()
            .iter()
            .map(|q| q.page_token.clone())
            .collect()
    }

    pub fn page_sizes_seen(&self) -> Vec<u32> {
        self.queries.lock().unwrap().iter().map(|q| q.page_size).collect()
    }

    pub fn companies_seen(&self) -> Vec<String> {
        self.queries
            .lock()
            .unwrap()
            .iter()
            .map(|q| q.company.clone())
            .collect()
    }
}

#[async_trait]
impl StudyOperations for ScriptedPages {
    async fn study_page(&self, query: &StudyQuery) -> Result<StudyPage> {
        self.queries.lock().unwrap().push(query.clone());

        let mut scripts = self.scripts.lock().unwrap();
        let key = if scripts.contains_key(&query.company) {
            query.company.clone()
        } else {
            ANY_COMPANY.to_string()
        };

        scripts
            .get_mut(&key)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(StudyPage::default()))
    }

    fn page_size(&self) -> u32 {
        self.page_size
    }
}

/// A minimal study carrying only its NCT number.
pub fn study(nct_id: &str) -> RawStudy {
    json!({
        "protocolSection": {
            "identificationModule": { "nctId": nct_id }
        }
    })
}

pub fn page(nct_ids: &[&str], next: Option<&str>) -> StudyPage {
    StudyPage {
        studies: nct_ids.iter().map(|id| study(id)).collect(),
        next_page_token: next.map(str::to_string),
        total_count: None,
    }
}
