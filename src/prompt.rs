//! Operator input: the company list and the output workbook path.
//!
//! The driver asks an [`InputProvider`] and a [`PathProvider`] rather than a
//! terminal directly. [`TerminalPrompt`] implements both over any reader/writer
//! pair, so the prompting itself runs against in-memory buffers in tests.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use super::error::Result;

/// File extension given to output paths typed without one.
pub const DEFAULT_EXTENSION: &str = "xlsx";

/// Supplies the raw comma-separated company list.
pub trait InputProvider {
    fn company_list(&mut self) -> Result<String>;
}

/// Supplies the workbook path; `None` means the operator cancelled.
pub trait PathProvider {
    fn output_path(&mut self) -> Result<Option<PathBuf>>;
}

/// Splits a comma-separated list into trimmed company names, dropping blanks.
pub fn parse_company_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalizes a typed path: blank cancels, a missing extension becomes `.xlsx`.
pub fn normalize_output_path(input: &str) -> Option<PathBuf> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut path = PathBuf::from(trimmed);
    if path.extension().is_none() {
        path.set_extension(DEFAULT_EXTENSION);
    }
    Some(path)
}

/// Line-oriented prompts on a reader/writer pair.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompt<io::StdinLock<'static>, io::Stderr> {
    /// Prompts on stderr and reads answers from stdin.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{question} ")?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line)
    }
}

impl<R: BufRead, W: Write> InputProvider for TerminalPrompt<R, W> {
    fn company_list(&mut self) -> Result<String> {
        self.ask("Enter company names separated by commas:")
    }
}

impl<R: BufRead, W: Write> PathProvider for TerminalPrompt<R, W> {
    fn output_path(&mut self) -> Result<Option<PathBuf>> {
        let answer = self.ask("Save the output Excel file as (.xlsx):")?;
        Ok(normalize_output_path(&answer))
    }
}
