use anyhow::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

use crate::quiz::row::*;

/// Firestore's typed JSON value, limited to what quiz documents use.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    #[serde(rename = "nullValue")]
    Null(()),
    #[serde(rename = "booleanValue")]
    Boolean(bool),
    #[serde(rename = "integerValue", with = "int64_as_string")]
    Integer(i64),
    #[serde(rename = "doubleValue")]
    Double(f64),
    #[serde(rename = "stringValue")]
    String(String),
    #[serde(rename = "arrayValue")]
    Array(ArrayValue),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrayValue {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Value>,
}

// The REST API carries int64 values as JSON strings
mod int64_as_string {
    use super::*;

    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

pub type Fields = BTreeMap<String, Value>;

fn optional_text(value: &Option<String>) -> Value {
    match value {
        Some(text) => Value::String(text.clone()),
        None => Value::Null(()),
    }
}

fn encode_time(time: Option<f64>) -> Value {
    match time {
        Some(t) if t.is_finite() && t.fract() == 0.0 => Value::Integer(t as i64),
        Some(t) => Value::Double(t),
        None => Value::Null(()),
    }
}

/// Only text that reads back identically is stored as an integer, so "03"
/// or " 2" stay strings.
fn encode_difficulty(difficulty_level: &Option<String>) -> Value {
    let level = difficulty_level
        .as_deref()
        .and_then(|d| d.parse::<i64>().ok().filter(|level| level.to_string() == d));
    match level {
        Some(level) => Value::Integer(level),
        None => optional_text(difficulty_level),
    }
}

pub fn encode_document(document: &QuizDocument) -> Fields {
    let mut fields = Fields::new();
    fields.insert(QUESTION_FIELD.to_owned(), Value::String(document.question.clone()));
    fields.insert(CORRECT_FIELD.to_owned(), Value::String(document.correct.clone()));
    fields.insert(TIME_FIELD.to_owned(), encode_time(document.time));
    fields.insert(
        DIFFICULTY_LEVEL_FIELD.to_owned(),
        encode_difficulty(&document.difficulty_level),
    );
    fields.insert(QUIZ_AREA_FIELD.to_owned(), optional_text(&document.quiz_area));
    fields.insert(
        OPTIONS_FIELD.to_owned(),
        Value::Array(ArrayValue {
            values: document
                .options
                .iter()
                .map(|o| Value::String(o.clone()))
                .collect(),
        }),
    );
    fields
}

fn required_text(fields: &Fields, name: &str) -> Result<String> {
    match fields.get(name) {
        Some(Value::String(text)) => Ok(text.clone()),
        other => Err(anyhow!("Field `{}` is not a string: {:?}", name, other)),
    }
}

fn decode_text(fields: &Fields, name: &str) -> Result<Option<String>> {
    match fields.get(name) {
        None | Some(Value::Null(())) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(Value::Integer(number)) => Ok(Some(number.to_string())),
        Some(other) => Err(anyhow!("Field `{}` is not text: {:?}", name, other)),
    }
}

pub fn decode_document(fields: &Fields) -> Result<QuizDocument> {
    let time = match fields.get(TIME_FIELD) {
        None | Some(Value::Null(())) => None,
        Some(Value::Integer(t)) => Some(*t as f64),
        Some(Value::Double(t)) => Some(*t),
        Some(other) => return Err(anyhow!("Field `{}` is not a number: {:?}", TIME_FIELD, other)),
    };
    let options = match fields.get(OPTIONS_FIELD) {
        None | Some(Value::Null(())) => Vec::new(),
        Some(Value::Array(array)) => array
            .values
            .iter()
            .map(|value| match value {
                Value::String(option) => Ok(option.clone()),
                other => Err(anyhow!("Option is not a string: {:?}", other)),
            })
            .collect::<Result<Vec<String>>>()?,
        Some(other) => return Err(anyhow!("Field `{}` is not a list: {:?}", OPTIONS_FIELD, other)),
    };

    Ok(QuizDocument {
        question: required_text(fields, QUESTION_FIELD)?,
        correct: required_text(fields, CORRECT_FIELD)?,
        time,
        difficulty_level: decode_text(fields, DIFFICULTY_LEVEL_FIELD)?,
        quiz_area: decode_text(fields, QUIZ_AREA_FIELD)?,
        options,
    })
}
