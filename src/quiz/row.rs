use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

pub const QUESTION_FIELD: &str = "question";
pub const CORRECT_FIELD: &str = "correct";
pub const TIME_FIELD: &str = "time";
pub const DIFFICULTY_LEVEL_FIELD: &str = "difficulty_level";
pub const QUIZ_AREA_FIELD: &str = "quiz_area";
pub const OPTIONS_FIELD: &str = "options";

#[derive(Clone, Debug, Default)]
pub struct QuizRow {
    pub question: String,
    pub correct: String,
    pub time: Option<f64>,
    pub difficulty_level: Option<String>,
    pub quiz_area: Option<String>,
    pub options: Vec<String>,
    // Source cells, aligned with the headers of the table this row was read from
    pub cells: Vec<String>,
}

impl QuizRow {
    pub fn new(question: &str, correct: &str) -> Self {
        QuizRow {
            question: question.to_owned(),
            correct: correct.to_owned(),
            ..Default::default()
        }
    }

    pub fn with_options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|o| o.to_string()).collect();
        self
    }

    /// True when the correct answer appears exactly once and no option is repeated.
    pub fn has_valid_options(&self) -> bool {
        let mut seen = HashSet::new();
        let all_unique = self.options.iter().all(|option| seen.insert(option));
        let correct_count = self.options.iter().filter(|o| **o == self.correct).count();
        all_unique && correct_count == 1
    }
}

impl PartialEq for QuizRow {
    fn eq(&self, other: &Self) -> bool {
        self.question == other.question
            && self.correct == other.correct
            && self.time.map(f64::to_bits) == other.time.map(f64::to_bits)
            && self.difficulty_level == other.difficulty_level
            && self.quiz_area == other.quiz_area
            && self.options == other.options
            && self.cells == other.cells
    }
}
impl Eq for QuizRow {}

impl Hash for QuizRow {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.question.hash(state);
        self.correct.hash(state);
        self.time.map(f64::to_bits).hash(state);
        self.difficulty_level.hash(state);
        self.quiz_area.hash(state);
        self.options.hash(state);
        self.cells.hash(state);
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuizDocument {
    pub question: String,
    pub correct: String,
    pub time: Option<f64>,
    pub difficulty_level: Option<String>,
    pub quiz_area: Option<String>,
    pub options: Vec<String>,
}

impl QuizDocument {
    /// Text value of a document field, as used by equality lookups.
    pub fn text_field(&self, field: &str) -> Option<&str> {
        match field {
            QUESTION_FIELD => Some(&self.question),
            CORRECT_FIELD => Some(&self.correct),
            DIFFICULTY_LEVEL_FIELD => self.difficulty_level.as_deref(),
            QUIZ_AREA_FIELD => self.quiz_area.as_deref(),
            _ => None,
        }
    }
}

impl From<&QuizRow> for QuizDocument {
    fn from(row: &QuizRow) -> Self {
        QuizDocument {
            question: row.question.clone(),
            correct: row.correct.clone(),
            time: row.time,
            difficulty_level: row.difficulty_level.clone(),
            quiz_area: row.quiz_area.clone(),
            options: row.options.clone(),
        }
    }
}
