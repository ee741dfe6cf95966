//! Per-company sheets in an `.xlsx` workbook.
//!
//! Every append is a read-modify-write of the whole workbook: the file is loaded
//! (or started empty), one sheet is extended, and the workbook is saved back
//! over the same path. Concurrent writers to the same file will lose updates.

use std::path::{Path, PathBuf};

use umya_spreadsheet::{Spreadsheet, Worksheet};

use super::error::{Result, TrialsError};
use super::format::FormattedRow;

/// Longest sheet title the workbook format accepts.
pub const MAX_SHEET_TITLE: usize = 31;

/// Characters added to the widest cell of a column when sizing it.
pub const COLUMN_PADDING: usize = 2;

const FORBIDDEN_TITLE_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

/// Sheet title for a company: forbidden characters become `_`, then the result is
/// cut to [`MAX_SHEET_TITLE`] characters.
///
/// Names sharing their first 31 characters end up in the same sheet. Titles
/// are matched against existing sheets without regard to case, as workbooks
/// cannot hold two sheets whose names differ only in case.
pub fn sheet_title(company: &str) -> String {
    company
        .chars()
        .map(|c| if FORBIDDEN_TITLE_CHARS.contains(&c) { '_' } else { c })
        .take(MAX_SHEET_TITLE)
        .collect()
}

/// Spreadsheet column letters for a 1-based index (`1` → `A`, `27` → `AA`).
pub fn column_letter(mut index: u32) -> String {
    let mut letters = Vec::new();
    while index > 0 {
        let rem = ((index - 1) % 26) as u8;
        letters.push((b'A' + rem) as char);
        index = (index - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// What one append did to its sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendSummary {
    pub sheet: String,
    pub header_written: bool,
    pub rows_appended: usize,
    /// Rows in the sheet after the append, header included
    pub total_rows: u32,
}

/// Appends formatted rows to the company sheets of one workbook file.
#[derive(Debug, Clone)]
pub struct SheetWriter {
    path: PathBuf,
}

impl SheetWriter {
    /// Creates a writer for the workbook at `path`. Nothing is read or created
    /// until the first non-empty append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the workbook path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `rows` to the sheet named after `company`.
    ///
    /// The header row is written only when the sheet is still empty; later rows
    /// are aligned to whatever header the sheet already has. Returns `None`
    /// without touching the file when `rows` is empty.
    ///
    /// # Errors
    ///
    /// `TrialsError::Workbook` when the existing file cannot be read as a workbook
    /// or the result cannot be saved.
    pub fn append(&self, company: &str, rows: &[FormattedRow]) -> Result<Option<AppendSummary>> {
        let Some(first) = rows.first() else {
            tracing::debug!("No rows for {}; leaving {} untouched", company, self.path.display());
            return Ok(None);
        };

        let mut book = self.open()?;
        let wanted = sheet_title(company);
        let title = match existing_sheet(&book, &wanted) {
            Some(name) => name,
            None => {
                book.new_sheet(wanted.as_str())
                    .map_err(|e| TrialsError::workbook(&self.path, e))?;
                wanted
            }
        };
        let sheet = book
            .get_sheet_by_name_mut(&title)
            .ok_or_else(|| TrialsError::workbook(&self.path, format!("sheet {title} missing")))?;

        let header_written = sheet.get_highest_row() == 0;
        if header_written {
            write_row(sheet, 1, first.headers());
        }

        let columns = header_row(sheet);
        let mut next_row = sheet.get_highest_row() + 1;
        for row in rows {
            write_row(sheet, next_row, row.project(columns.iter().map(String::as_str)));
            next_row += 1;
        }

        fit_columns(sheet);
        let total_rows = sheet.get_highest_row();

        umya_spreadsheet::writer::xlsx::write(&book, &self.path)
            .map_err(|e| TrialsError::workbook(&self.path, e))?;

        tracing::info!(
            "Appended {} rows to sheet {} in {}",
            rows.len(),
            title,
            self.path.display()
        );

        Ok(Some(AppendSummary {
            sheet: title,
            header_written,
            rows_appended: rows.len(),
            total_rows,
        }))
    }

    fn open(&self) -> Result<Spreadsheet> {
        if self.path.exists() {
            umya_spreadsheet::reader::xlsx::read(&self.path)
                .map_err(|e| TrialsError::workbook(&self.path, e))
        } else {
            Ok(umya_spreadsheet::new_file_empty_worksheet())
        }
    }
}

/// Name of the sheet whose title equals `title` ignoring case.
fn existing_sheet(book: &Spreadsheet, title: &str) -> Option<String> {
    let wanted = title.to_lowercase();
    book.get_sheet_collection()
        .iter()
        .map(|sheet| sheet.get_name())
        .find(|name| name.to_lowercase() == wanted)
        .map(str::to_string)
}

fn write_row<'a, I>(sheet: &mut Worksheet, row: u32, values: I)
where
    I: IntoIterator<Item = &'a str>,
{
    for (col, value) in (1u32..).zip(values) {
        sheet.get_cell_mut((col, row)).set_value_string(value);
    }
}

fn header_row(sheet: &Worksheet) -> Vec<String> {
    (1..=sheet.get_highest_column())
        .map(|col| sheet.get_value((col, 1)))
        .collect()
}

/// Width of every column: its longest value plus [`COLUMN_PADDING`].
fn column_widths(sheet: &Worksheet) -> Vec<f64> {
    let rows = sheet.get_highest_row();
    (1..=sheet.get_highest_column())
        .map(|col| {
            let widest = (1..=rows)
                .map(|row| sheet.get_value((col, row)).chars().count())
                .max()
                .unwrap_or(0);
            (widest + COLUMN_PADDING) as f64
        })
        .collect()
}

fn fit_columns(sheet: &mut Worksheet) {
    for (col, width) in (1u32..).zip(column_widths(sheet)) {
        sheet
            .get_column_dimension_mut(&column_letter(col))
            .set_width(width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{FIELD_TABLE, format_study};
    use crate::testing::study;

    fn read_sheet_rows(path: &Path, title: &str) -> (u32, Vec<String>) {
        let book = umya_spreadsheet::reader::xlsx::read(path).unwrap();
        let sheet = book.get_sheet_by_name(title).unwrap();
        let rows = sheet.get_highest_row();
        let first_column = (1..=rows).map(|r| sheet.get_value((1, r))).collect();
        (rows, first_column)
    }

    fn rows(ids: &[&str]) -> Vec<FormattedRow> {
        ids.iter().map(|id| format_study(&study(id))).collect()
    }

    #[test]
    fn test_sheet_title_truncation() {
        let name = "A".repeat(40);
        assert_eq!(sheet_title(&name).chars().count(), MAX_SHEET_TITLE);
        assert_eq!(sheet_title("Acme"), "Acme");
    }

    #[test]
    fn test_long_names_sharing_prefix_collide() {
        let prefix = "Pharmaceutical Holdings Interna";
        assert_eq!(prefix.chars().count(), 31);
        assert_eq!(
            sheet_title(&format!("{prefix}tional")),
            sheet_title(&format!("{prefix}l Group"))
        );
    }

    #[test]
    fn test_forbidden_title_characters_are_replaced() {
        assert_eq!(sheet_title("Acme/Beta [EU]: *?"), "Acme_Beta _EU__ __");
    }

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(1), "A");
        assert_eq!(column_letter(19), "S");
        assert_eq!(column_letter(26), "Z");
        assert_eq!(column_letter(27), "AA");
        assert_eq!(column_letter(703), "AAA");
    }

    #[test]
    fn test_empty_rows_leave_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");

        let summary = SheetWriter::new(&path).append("Acme", &[]).unwrap();

        assert!(summary.is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_append_creates_sheet_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        let writer = SheetWriter::new(&path);

        let summary = writer
            .append("Acme", &rows(&["NCT1", "NCT2", "NCT3"]))
            .unwrap()
            .unwrap();

        assert!(summary.header_written);
        assert_eq!(summary.rows_appended, 3);
        assert_eq!(summary.total_rows, 4);

        let (count, first_column) = read_sheet_rows(&path, "Acme");
        assert_eq!(count, 4);
        assert_eq!(first_column, ["NCT Number", "NCT1", "NCT2", "NCT3"]);

        let book = umya_spreadsheet::reader::xlsx::read(&path).unwrap();
        assert_eq!(book.get_sheet_collection().len(), 1);
        let sheet = book.get_sheet_by_name("Acme").unwrap();
        assert_eq!(sheet.get_highest_column(), FIELD_TABLE.len() as u32);
    }

    #[test]
    fn test_second_append_does_not_repeat_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        let writer = SheetWriter::new(&path);

        writer.append("Acme", &rows(&["NCT1", "NCT2", "NCT3"])).unwrap();
        let summary = writer.append("Acme", &rows(&["NCT4"])).unwrap().unwrap();

        assert!(!summary.header_written);
        assert_eq!(summary.total_rows, 5);

        let (count, first_column) = read_sheet_rows(&path, "Acme");
        assert_eq!(count, 5);
        assert_eq!(first_column[0], "NCT Number");
        assert_eq!(first_column[4], "NCT4");
        assert_eq!(
            first_column.iter().filter(|v| *v == "NCT Number").count(),
            1
        );
    }

    #[test]
    fn test_companies_get_separate_sheets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        let writer = SheetWriter::new(&path);

        writer.append("Acme", &rows(&["NCT1"])).unwrap();
        writer.append("Beta Labs", &rows(&["NCT2", "NCT3"])).unwrap();

        assert_eq!(read_sheet_rows(&path, "Acme").0, 2);
        assert_eq!(read_sheet_rows(&path, "Beta Labs").0, 3);
    }

    #[test]
    fn test_names_differing_in_case_share_a_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        let writer = SheetWriter::new(&path);

        writer.append("Acme", &rows(&["NCT1"])).unwrap();
        let summary = writer.append("ACME", &rows(&["NCT2"])).unwrap().unwrap();

        assert_eq!(summary.sheet, "Acme");
        assert!(!summary.header_written);
        assert_eq!(summary.total_rows, 3);

        let book = umya_spreadsheet::reader::xlsx::read(&path).unwrap();
        assert_eq!(book.get_sheet_collection().len(), 1);
        assert_eq!(read_sheet_rows(&path, "Acme").1, ["NCT Number", "NCT1", "NCT2"]);
    }

    #[test]
    fn test_rows_follow_existing_header_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");

        let mut book = umya_spreadsheet::new_file_empty_worksheet();
        let sheet = book.new_sheet("Acme").unwrap();
        sheet.get_cell_mut((1, 1)).set_value_string("Title");
        sheet.get_cell_mut((2, 1)).set_value_string("NCT Number");
        umya_spreadsheet::writer::xlsx::write(&book, &path).unwrap();

        SheetWriter::new(&path)
            .append("Acme", &rows(&["NCT7"]))
            .unwrap();

        let book = umya_spreadsheet::reader::xlsx::read(&path).unwrap();
        let sheet = book.get_sheet_by_name("Acme").unwrap();
        assert_eq!(sheet.get_highest_column(), 2);
        assert_eq!(sheet.get_value((1, 2)), "");
        assert_eq!(sheet.get_value((2, 2)), "NCT7");
    }

    #[test]
    fn test_column_widths_fit_content() {
        let mut book = umya_spreadsheet::new_file_empty_worksheet();
        let sheet = book.new_sheet("Acme").unwrap();
        write_row(sheet, 1, ["NCT Number", "Phase"]);
        write_row(sheet, 2, ["NCT0123456789012345", ""]);
        write_row(sheet, 3, ["NCT1", "PHASE1, PHASE2"]);

        assert_eq!(
            column_widths(sheet),
            vec![(19 + COLUMN_PADDING) as f64, (14 + COLUMN_PADDING) as f64]
        );
    }

    #[test]
    fn test_unreadable_file_is_a_workbook_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        std::fs::write(&path, b"not a zip archive").unwrap();

        let err = SheetWriter::new(&path)
            .append("Acme", &rows(&["NCT1"]))
            .unwrap_err();
        assert!(matches!(err, TrialsError::Workbook { .. }));
    }
}
