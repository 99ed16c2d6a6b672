use super::*;
use crate::quiz::row::QuizRow;

fn document(question: &str, correct: &str) -> QuizDocument {
    QuizDocument::from(&QuizRow::new(question, correct).with_options(&[correct, "other"]))
}

#[test]
fn insert_assigns_distinct_ids() {
    let mut collection = MemoryCollection::new();
    let first = collection.insert(&document("q1", "a")).unwrap();
    let second = collection.insert(&document("q1", "a")).unwrap();
    assert_ne!(first, second);
    assert_eq!(first.as_str().len(), 20);
    assert_eq!(collection.len(), 2);
}

#[test]
fn find_equal_is_exact_and_ordered() {
    let mut collection = MemoryCollection::new();
    let first = collection.insert(&document("Capital?", "Paris")).unwrap();
    collection.insert(&document("capital?", "Paris")).unwrap();
    collection.insert(&document("Capital? ", "Paris")).unwrap();
    let third = collection.insert(&document("Capital?", "Rome")).unwrap();

    let matches = collection.find_equal("question", "Capital?").unwrap();
    let ids: Vec<DocumentId> = matches.into_iter().map(|(id, _)| id).collect();
    assert_eq!(ids, vec![first, third]);
}

#[test]
fn find_equal_on_optional_field() {
    let mut tagged = document("q", "a");
    tagged.quiz_area = Some("geography".to_owned());
    let mut collection = MemoryCollection::new();
    collection.insert(&tagged).unwrap();
    collection.insert(&document("r", "b")).unwrap();
    assert_eq!(collection.find_equal("quiz_area", "geography").unwrap().len(), 1);
    assert!(collection.find_equal("time", "15").unwrap().is_empty());
}

#[test]
fn overwrite_keeps_id() {
    let mut collection = MemoryCollection::new();
    let id = collection.insert(&document("q", "old")).unwrap();
    collection.overwrite(&id, &document("q", "new")).unwrap();
    assert_eq!(collection.len(), 1);
    assert_eq!(collection.get(&id).unwrap().correct, "new");
}

#[test]
fn overwrite_unknown_id_fails() {
    let mut collection = MemoryCollection::new();
    let result = collection.overwrite(&DocumentId::new("missing"), &document("q", "a"));
    assert!(result.is_err());
}

#[test]
fn clones_share_documents() {
    let collection = MemoryCollection::new();
    let mut writer = collection.clone();
    writer.insert(&document("q", "a")).unwrap();
    assert_eq!(collection.len(), 1);
}
