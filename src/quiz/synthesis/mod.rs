use itertools::Itertools;
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;
use thiserror::Error;

use crate::quiz::row::QuizRow;


#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum SynthesisError {
    #[error("cannot draw {requested} wrong options from a pool of {pool_size} distinct answers")]
    Configuration { requested: usize, pool_size: usize },

    #[error("question {question:?} only has {available} candidate wrong options, {requested} required")]
    InsufficientData {
        question: String,
        requested: usize,
        available: usize,
    },
}

/// Every distinct correct answer of a dataset. Sorted, so that sampling
/// with a seeded generator is reproducible.
#[derive(Clone, Debug, Default)]
pub struct AnswerPool {
    answers: BTreeSet<String>,
}

impl AnswerPool {
    pub fn from_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a QuizRow>,
    {
        AnswerPool {
            answers: rows.into_iter().map(|row| row.correct.clone()).collect(),
        }
    }

    pub fn from_answers<S: AsRef<str>>(answers: &[S]) -> Self {
        AnswerPool {
            answers: answers.iter().map(|a| a.as_ref().to_owned()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn contains(&self, answer: &str) -> bool {
        self.answers.contains(answer)
    }

    fn candidates(&self, correct: &str) -> Vec<&str> {
        self.answers
            .iter()
            .map(|a| a.as_str())
            .filter(|a| *a != correct)
            .collect()
    }
}

/// Picks `wrong_option_count` distinct distractors for one row. The correct
/// answer always comes first.
pub fn draw_options<R>(
    row: &QuizRow,
    pool: &AnswerPool,
    wrong_option_count: usize,
    rng: &mut R,
) -> Result<Vec<String>, SynthesisError>
where
    R: Rng + ?Sized,
{
    let mut candidates = pool.candidates(&row.correct);
    if wrong_option_count > candidates.len() {
        return Err(SynthesisError::InsufficientData {
            question: row.question.clone(),
            requested: wrong_option_count,
            available: candidates.len(),
        });
    }

    let (distractors, _) = candidates.partial_shuffle(rng, wrong_option_count);

    let mut options = Vec::with_capacity(wrong_option_count + 1);
    options.push(row.correct.clone());
    options.extend(distractors.iter().map(|d| d.to_string()));
    Ok(options)
}

/// Fills the options of every distinct row with its correct answer followed
/// by distractors drawn from the other rows' correct answers.
pub fn synthesize<R>(
    rows: &[QuizRow],
    wrong_option_count: usize,
    rng: &mut R,
) -> Result<Vec<QuizRow>, SynthesisError>
where
    R: Rng + ?Sized,
{
    let rows: Vec<&QuizRow> = rows.iter().unique().collect();
    let pool = AnswerPool::from_rows(rows.iter().copied());
    if wrong_option_count >= pool.len() {
        return Err(SynthesisError::Configuration {
            requested: wrong_option_count,
            pool_size: pool.len(),
        });
    }

    debug!(
        "Drawing {} wrong options per question from {} answers",
        wrong_option_count,
        pool.len()
    );

    rows.into_iter()
        .map(|row| {
            let options = draw_options(row, &pool, wrong_option_count, rng)?;
            Ok(QuizRow {
                options,
                ..row.clone()
            })
        })
        .collect()
}
