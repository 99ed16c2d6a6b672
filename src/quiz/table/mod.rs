use anyhow::*;
use itertools::Itertools;
use lazy_static::lazy_static;
use log::warn;
use regex::Regex;
use std::fmt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::quiz::row::*;

#[cfg(test)]
mod tests;

lazy_static! {
    static ref OPTION_COLUMN_REGEX: Regex = Regex::new("^option_([0-9]+)$").unwrap();
}

const UTF8_BOM: &str = "\u{feff}";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RowWarning {
    pub line: usize,
    pub reason: String,
}

impl fmt::Display for RowWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.reason)
    }
}

/// Indices of the `option_<n>` columns, ordered by their numeric suffix.
pub fn option_columns(headers: &[String]) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .filter_map(|(index, name)| {
            let captures = OPTION_COLUMN_REGEX.captures(name)?;
            let rank: u64 = captures[1].parse().ok()?;
            Some((rank, index))
        })
        .sorted()
        .map(|(_, index)| index)
        .collect()
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SourceTable {
    headers: Vec<String>,
    records: Vec<Vec<String>>,
}

impl SourceTable {
    pub fn new(headers: Vec<String>, records: Vec<Vec<String>>) -> Self {
        SourceTable { headers, records }
    }

    pub fn open(source: &Path) -> Result<SourceTable> {
        let file = File::open(source).with_context(|| format!("Could not open {:?}", source))?;
        SourceTable::from_reader(file).with_context(|| format!("Could not read CSV from {:?}", source))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<SourceTable> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let headers = csv_reader
            .headers()?
            .iter()
            .map(|name| name.trim_start_matches(UTF8_BOM).trim().to_owned())
            .collect();

        let mut records = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            records.push(record.iter().map(|cell| cell.to_owned()).collect());
        }

        Ok(SourceTable { headers, records })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_option_columns(&self) -> bool {
        !option_columns(&self.headers).is_empty()
    }

    pub fn lowercase_headers(&mut self) {
        for name in self.headers.iter_mut() {
            *name = name.to_lowercase();
        }
    }

    /// Removes records identical to an earlier one. Returns how many were dropped.
    pub fn dedup(&mut self) -> usize {
        let before = self.records.len();
        let records = std::mem::take(&mut self.records);
        self.records = records.into_iter().unique().collect();
        before - self.records.len()
    }

    pub fn map_column<F>(&mut self, name: &str, f: F) -> Result<()>
    where
        F: Fn(&str) -> String,
    {
        let index = self
            .column_index(name)
            .with_context(|| format!("Missing column `{}`", name))?;
        for record in self.records.iter_mut() {
            if let Some(cell) = record.get_mut(index) {
                if !cell.trim().is_empty() {
                    *cell = f(cell);
                }
            }
        }
        Ok(())
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Parses every record into a row. Records missing required fields are
    /// skipped and reported instead of being coerced. When the table has
    /// `option_<n>` columns, every row must carry a valid option list.
    pub fn rows(&self) -> Result<(Vec<QuizRow>, Vec<RowWarning>)> {
        self.parse_rows(true)
    }

    /// Parses every record without looking at `option_<n>` cells, for rows
    /// whose options are about to be synthesized.
    pub fn questions(&self) -> Result<(Vec<QuizRow>, Vec<RowWarning>)> {
        self.parse_rows(false)
    }

    fn parse_rows(&self, read_options: bool) -> Result<(Vec<QuizRow>, Vec<RowWarning>)> {
        let question_index = self
            .column_index(QUESTION_FIELD)
            .with_context(|| format!("Missing column `{}`", QUESTION_FIELD))?;
        let correct_index = self
            .column_index(CORRECT_FIELD)
            .with_context(|| format!("Missing column `{}`", CORRECT_FIELD))?;
        let time_index = self.column_index(TIME_FIELD);
        let difficulty_index = self.column_index(DIFFICULTY_LEVEL_FIELD);
        let area_index = self.column_index(QUIZ_AREA_FIELD);
        let option_indices = if read_options {
            option_columns(&self.headers)
        } else {
            Vec::new()
        };

        let mut rows = Vec::new();
        let mut warnings = Vec::new();
        for (number, record) in self.records.iter().enumerate() {
            // Header is line 1
            let line = number + 2;
            let mut skip = |reason: String| {
                warn!("Skipping line {}: {}", line, reason);
                warnings.push(RowWarning { line, reason });
            };

            let question = match cell(record, Some(question_index)) {
                Some(q) => q,
                None => {
                    skip(format!("missing `{}`", QUESTION_FIELD));
                    continue;
                }
            };
            let correct = match cell(record, Some(correct_index)) {
                Some(c) => c,
                None => {
                    skip(format!("missing `{}`", CORRECT_FIELD));
                    continue;
                }
            };
            let time_cell = cell(record, time_index);
            let time = time_cell
                .and_then(|t| t.trim().parse::<f64>().ok())
                .filter(|t| t.is_finite());
            if time_cell.is_some() && time.is_none() {
                skip(format!("`{}` is not a number", TIME_FIELD));
                continue;
            }
            let options: Vec<String> = option_indices
                .iter()
                .filter_map(|&index| cell(record, Some(index)))
                .map(|o| o.to_owned())
                .collect();

            let row = QuizRow {
                question: question.to_owned(),
                correct: correct.to_owned(),
                time,
                difficulty_level: cell(record, difficulty_index).map(|d| d.to_owned()),
                quiz_area: cell(record, area_index).map(|a| a.to_owned()),
                options,
                cells: record.clone(),
            };
            if !option_indices.is_empty() {
                if row.options.is_empty() {
                    skip("no options".to_owned());
                    continue;
                }
                if !row.has_valid_options() {
                    skip("options must be unique and contain the correct answer once".to_owned());
                    continue;
                }
            }
            rows.push(row);
        }

        Ok((rows, warnings))
    }

    /// Writes rows with their options spread over `option_<n>` columns. Source
    /// option columns are replaced, all other source columns are kept.
    pub fn write_rows<W: Write>(&self, rows: &[QuizRow], mut writer: W) -> Result<()> {
        writer.write_all(UTF8_BOM.as_bytes())?;

        let stale_columns = option_columns(&self.headers);
        let kept_columns: Vec<usize> = (0..self.headers.len())
            .filter(|index| !stale_columns.contains(index))
            .collect();
        let option_count = rows.iter().map(|r| r.options.len()).max().unwrap_or(0);

        let mut csv_writer = csv::Writer::from_writer(writer);
        let header = kept_columns
            .iter()
            .map(|&index| self.headers[index].clone())
            .chain((0..option_count).map(|n| format!("option_{}", n)));
        csv_writer.write_record(header)?;

        for row in rows {
            let kept_cells = kept_columns
                .iter()
                .map(|&index| row.cells.get(index).cloned().unwrap_or_default());
            let option_cells = (0..option_count).map(|n| row.options.get(n).cloned().unwrap_or_default());
            csv_writer.write_record(kept_cells.chain(option_cells))?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn save_rows(&self, rows: &[QuizRow], destination: &Path) -> Result<()> {
        let file = File::create(destination)
            .with_context(|| format!("Could not create {:?}", destination))?;
        self.write_rows(rows, file)
            .with_context(|| format!("Could not write CSV to {:?}", destination))
    }
}

fn cell(record: &[String], index: Option<usize>) -> Option<&str> {
    index
        .and_then(|i| record.get(i))
        .map(|value| value.as_str())
        .filter(|value| !value.trim().is_empty())
}
