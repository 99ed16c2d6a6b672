use anyhow::*;
use log::{debug, warn};
use std::fmt;

use crate::quiz::row::*;
use crate::store::{Collection, DocumentId};


#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WriteMode {
    /// Overwrite the first document with the same question, or insert.
    Upsert,
    /// Always add a new document.
    Insert,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    Inserted(DocumentId),
    Overwritten(DocumentId),
}

#[derive(Debug)]
pub struct RowFailure {
    pub index: usize,
    pub question: String,
    pub error: Error,
}

#[derive(Debug, Default)]
pub struct UpsertReport {
    pub inserted: Vec<DocumentId>,
    pub overwritten: Vec<DocumentId>,
    pub failures: Vec<RowFailure>,
}

impl UpsertReport {
    pub fn written(&self) -> usize {
        self.inserted.len() + self.overwritten.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for UpsertReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} inserted, {} updated, {} failed",
            self.inserted.len(),
            self.overwritten.len(),
            self.failures.len()
        )?;
        for failure in &self.failures {
            write!(
                f,
                "\n  row {} ({:?}): {:#}",
                failure.index, failure.question, failure.error
            )?;
        }
        std::result::Result::Ok(())
    }
}

fn write_row<C>(document: &QuizDocument, collection: &mut C, mode: WriteMode) -> Result<Outcome>
where
    C: Collection + ?Sized,
{
    if mode == WriteMode::Upsert {
        let existing = collection
            .find_equal(QUESTION_FIELD, &document.question)
            .context("Could not look up existing question")?;
        // Only the first match is updated, later duplicates are left as they are
        if let Some((id, _)) = existing.into_iter().next() {
            collection
                .overwrite(&id, document)
                .with_context(|| format!("Could not overwrite document {}", id))?;
            return Ok(Outcome::Overwritten(id));
        }
    }

    let id = collection
        .insert(document)
        .context("Could not insert document")?;
    Ok(Outcome::Inserted(id))
}

/// Writes one document per row. A row that cannot be written is recorded in
/// the report and does not stop the others.
pub fn write<C>(rows: &[QuizRow], collection: &mut C, mode: WriteMode) -> UpsertReport
where
    C: Collection + ?Sized,
{
    let mut report = UpsertReport::default();
    for (index, row) in rows.iter().enumerate() {
        let document = QuizDocument::from(row);
        match write_row(&document, collection, mode) {
            std::result::Result::Ok(Outcome::Inserted(id)) => {
                debug!("Inserted {:?} as {}", document.question, id);
                report.inserted.push(id);
            }
            std::result::Result::Ok(Outcome::Overwritten(id)) => {
                debug!("Updated {} with {:?}", id, document.question);
                report.overwritten.push(id);
            }
            Err(error) => {
                warn!("Could not write {:?}: {:#}", document.question, error);
                report.failures.push(RowFailure {
                    index,
                    question: document.question,
                    error,
                });
            }
        }
    }
    report
}

pub fn upsert<C>(rows: &[QuizRow], collection: &mut C) -> UpsertReport
where
    C: Collection + ?Sized,
{
    write(rows, collection, WriteMode::Upsert)
}
