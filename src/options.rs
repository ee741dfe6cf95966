//! Query parameters for the studies search endpoint.

use super::config::DEFAULT_PAGE_SIZE;

/// Largest page size the studies endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Search areas a company name is matched against.
///
/// Each area is an Essie `AREA[...]` field of the studies index; a study matches
/// when any of them contains the company name.
pub const COMPANY_AREAS: &[&str] = &[
    "LeadSponsorName",
    "CollaboratorName",
    "OrgFullName",
    "LocationFacility",
];

/// Fields requested from the API when none are given explicitly.
pub const DEFAULT_FIELDS: &[&str] = &[
    "NCTId",
    "BriefTitle",
    "InterventionName",
    "Condition",
    "StudyType",
    "OverallStatus",
    "Phase",
    "EnrollmentCount",
    "LeadSponsorName",
    "ResultsFirstPostDate",
    "StartDate",
    "CompletionDate",
    "LastUpdatePostDate",
    "LocationFacility",
    "PrimaryOutcomeMeasure",
    "LocationStatus",
    "ResponsiblePartyInvestigatorAffiliation",
    "CollaboratorName",
    "OverallOfficialAffiliation",
];

/// Options for one studies search request
///
/// # Examples
///
/// ```rust
/// use trialsheet::StudyQuery;
///
/// let query = StudyQuery::for_company("Acme Bio")
///     .with_page_size(100)
///     .with_page_token("T1");
///
/// let params = query.to_query_params();
/// assert!(params.contains(&("pageToken".to_string(), "T1".to_string())));
/// ```
#[derive(Debug, Clone)]
pub struct StudyQuery {
    /// Company name, matched as free text against [`COMPANY_AREAS`]
    pub company: String,
    /// API field names to return
    pub fields: Vec<String>,
    /// Studies per page, clamped to `1..=MAX_PAGE_SIZE`
    pub page_size: u32,
    /// Continuation token from the previous page; absent on the first request
    pub page_token: Option<String>,
    /// Ask the API to report the total number of matching studies
    pub count_total: bool,
}

impl StudyQuery {
    /// Creates a query for a company using the default field list and page size.
    pub fn for_company(company: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            fields: DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect(),
            page_size: DEFAULT_PAGE_SIZE,
            page_token: None,
            count_total: false,
        }
    }

    /// Replaces the requested API fields.
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the studies per page, clamped to `1..=MAX_PAGE_SIZE`.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Continues from the page the token was issued for.
    pub fn with_page_token(mut self, token: impl Into<String>) -> Self {
        self.page_token = Some(token.into());
        self
    }

    /// Requests `totalCount` in the response. The API only reports it on the
    /// first page.
    pub fn with_count_total(mut self) -> Self {
        self.count_total = true;
        self
    }

    /// Builds the filter expression matching the company in any sponsor,
    /// collaborator, organization or facility area.
    ///
    /// Double quotes are removed from the name, and names containing whitespace
    /// are then quoted so they match as one phrase.
    pub fn filter_expression(&self) -> String {
        let name = self.company.trim().replace('"', "");
        let term = if name.chars().any(char::is_whitespace) {
            format!("\"{}\"", name)
        } else {
            name
        };

        COMPANY_AREAS
            .iter()
            .map(|area| format!("AREA[{}]{}", area, term))
            .collect::<Vec<_>>()
            .join(" OR ")
    }

    /// Converts the query into URL parameters for the studies endpoint.
    ///
    /// `pageToken` and `countTotal` are only included when set.
    pub fn to_query_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("query.term".to_string(), self.filter_expression()),
            ("fields".to_string(), self.fields.join(",")),
            ("pageSize".to_string(), self.page_size.to_string()),
            ("format".to_string(), "json".to_string()),
        ];

        if let Some(ref token) = self.page_token {
            params.push(("pageToken".to_string(), token.clone()));
        }

        if self.count_total {
            params.push(("countTotal".to_string(), "true".to_string()));
        }

        params
    }
}
