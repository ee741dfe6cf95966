use std::{
    fs,
    path::{Path, PathBuf},
};

use trialsheet::StudyPage;

pub fn fixture_path(relative: impl AsRef<Path>) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(relative)
}

pub fn read_fixture(relative: impl AsRef<Path>) -> String {
    fs::read_to_string(fixture_path(relative)).expect("fixture file should be readable")
}

#[allow(dead_code)]
pub fn read_page(relative: impl AsRef<Path>) -> StudyPage {
    serde_json::from_str(&read_fixture(relative)).expect("fixture should be a studies page")
}

#[allow(dead_code)]
pub fn client() -> trialsheet::ClinicalTrials {
    trialsheet::ClinicalTrials::new("trialsheet-tests example@example.com").unwrap()
}
