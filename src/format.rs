//! Flattening of raw studies into spreadsheet rows.
//!
//! Every output column is described by one [`FieldRule`] in [`FIELD_TABLE`]. A
//! rule names a path below the study's `protocolSection` and whether the value
//! there is taken as a scalar or is a list whose items are joined with
//! [`LIST_SEPARATOR`]. Missing sections, missing keys and `null` all resolve to
//! an empty string, so formatting never fails.
//!
//! A joined column keeps one entry per list element, empty ones included, so
//! columns read from the same list (facility and status of each location) stay
//! aligned by position.

use serde_json::Value;

use super::search::RawStudy;

/// Separator placed between the items of list-valued fields.
pub const LIST_SEPARATOR: &str = ", ";

const PROTOCOL_SECTION: &str = "protocolSection";

/// How a column's value is read from the study.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extract {
    /// A single value at `path`.
    Scalar(&'static [&'static str]),
    /// A list at `list`; `item` is read from every element and the results joined.
    /// An empty `item` path takes the elements themselves.
    Join {
        list: &'static [&'static str],
        item: &'static [&'static str],
    },
}

/// One output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub header: &'static str,
    pub extract: Extract,
}

const fn scalar(header: &'static str, path: &'static [&'static str]) -> FieldRule {
    FieldRule {
        header,
        extract: Extract::Scalar(path),
    }
}

const fn join(
    header: &'static str,
    list: &'static [&'static str],
    item: &'static [&'static str],
) -> FieldRule {
    FieldRule {
        header,
        extract: Extract::Join { list, item },
    }
}

/// Column order of every formatted row.
pub const FIELD_TABLE: &[FieldRule] = &[
    scalar("NCT Number", &["identificationModule", "nctId"]),
    scalar("Title", &["identificationModule", "briefTitle"]),
    scalar("Study Status", &["statusModule", "overallStatus"]),
    scalar(
        "Sponsor Name",
        &["sponsorCollaboratorsModule", "leadSponsor", "name"],
    ),
    join(
        "Collaborator",
        &["sponsorCollaboratorsModule", "collaborators"],
        &["name"],
    ),
    scalar("Study Type", &["designModule", "studyType"]),
    join("Phase", &["designModule", "phases"], &[]),
    scalar(
        "Enrollment Number",
        &["designModule", "enrollmentInfo", "count"],
    ),
    join("Condition/Disease", &["conditionsModule", "conditions"], &[]),
    join(
        "Intervention/Treatment",
        &["armsInterventionsModule", "interventions"],
        &["name"],
    ),
    join(
        "Primary Endpoint",
        &["outcomesModule", "primaryOutcomes"],
        &["measure"],
    ),
    join(
        "Location Facility",
        &["contactsLocationsModule", "locations"],
        &["facility"],
    ),
    join(
        "Location Status",
        &["contactsLocationsModule", "locations"],
        &["status"],
    ),
    scalar(
        "Investigator",
        &[
            "sponsorCollaboratorsModule",
            "responsibleParty",
            "investigatorAffiliation",
        ],
    ),
    join(
        "Affiliation",
        &["contactsLocationsModule", "overallOfficials"],
        &["affiliation"],
    ),
    scalar("Start Date", &["statusModule", "startDateStruct", "date"]),
    scalar(
        "Completion Date",
        &["statusModule", "completionDateStruct", "date"],
    ),
    scalar(
        "Last Update Post Date",
        &["statusModule", "lastUpdatePostDateStruct", "date"],
    ),
    scalar(
        "Results First Post Date",
        &["statusModule", "resultsFirstPostDateStruct", "date"],
    ),
];

/// Header names in column order.
pub fn headers() -> impl Iterator<Item = &'static str> {
    FIELD_TABLE.iter().map(|rule| rule.header)
}

/// A flattened study: one string per [`FIELD_TABLE`] column, in table order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedRow {
    cells: Vec<(&'static str, String)>,
}

impl FormattedRow {
    /// Value of the named column, if the row has it.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| *name == header)
            .map(|(_, value)| value.as_str())
    }

    pub fn headers(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.cells.iter().map(|(name, _)| *name)
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Values projected onto an existing header order. Unknown headers yield `""`.
    pub fn project<'a, I>(&'a self, columns: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        columns
            .into_iter()
            .map(|column| self.get(column).unwrap_or(""))
            .collect()
    }
}

/// Flattens one study.
pub fn format_study(study: &RawStudy) -> FormattedRow {
    let protocol = study.get(PROTOCOL_SECTION);

    let cells = FIELD_TABLE
        .iter()
        .map(|rule| {
            let value = match rule.extract {
                Extract::Scalar(path) => lookup(protocol, path).map(text).unwrap_or_default(),
                Extract::Join { list, item } => joined(lookup(protocol, list), item),
            };
            (rule.header, value)
        })
        .collect();

    FormattedRow { cells }
}

pub fn format_studies(studies: &[RawStudy]) -> Vec<FormattedRow> {
    studies.iter().map(format_study).collect()
}

fn lookup<'a>(root: Option<&'a Value>, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(root?, |node, key| node.get(*key))
        .filter(|v| !v.is_null())
}

fn joined(list: Option<&Value>, item: &[&str]) -> String {
    let Some(Value::Array(items)) = list else {
        return String::new();
    };

    items
        .iter()
        .map(|element| lookup(Some(element), item).map(text).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

/// Scalar rendering of a JSON value. Arrays are joined; objects have no scalar form.
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .map(text)
            .collect::<Vec<_>>()
            .join(LIST_SEPARATOR),
        Value::Null | Value::Object(_) => String::new(),
    }
}
