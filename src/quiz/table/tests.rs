use super::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::quiz::synthesis::synthesize;

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

fn table(csv: &str) -> SourceTable {
    SourceTable::from_reader(csv.as_bytes()).unwrap()
}

#[test]
fn option_columns_sort_by_number() {
    let headers = headers(&["question", "option_10", "correct", "option_2", "option_0"]);
    let ordered: Vec<&str> = option_columns(&headers)
        .into_iter()
        .map(|i| headers[i].as_str())
        .collect();
    assert_eq!(ordered, vec!["option_0", "option_2", "option_10"]);
}

#[test]
fn option_columns_ignore_other_names() {
    let headers = headers(&["Option_1", "option_", "option_x", "my_option_3", "option_-1", "option_4"]);
    let ordered = option_columns(&headers);
    assert_eq!(ordered, vec![5]);
}

#[test]
fn reads_rows_with_options() {
    let table = table(
        "question,correct,time,option_0,option_1,option_2\n\
         Que signifie « CEO » ?,Chief Executive Officer,15,Chief Executive Officer,Central European Office,Chief Engineering Officer\n",
    );
    let (rows, warnings) = table.rows().unwrap();
    assert!(warnings.is_empty());
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.question, "Que signifie « CEO » ?");
    assert_eq!(row.time, Some(15.0));
    assert_eq!(row.difficulty_level, None);
    assert_eq!(
        row.options,
        vec![
            "Chief Executive Officer",
            "Central European Office",
            "Chief Engineering Officer"
        ]
    );
}

#[test]
fn options_follow_numeric_column_order() {
    let mut header = vec!["question".to_owned(), "correct".to_owned()];
    let mut values = vec!["q".to_owned(), "a0".to_owned()];
    for n in (0..=10).rev() {
        header.push(format!("option_{}", n));
        values.push(format!("a{}", n));
    }
    let table = SourceTable::new(header, vec![values]);
    let (rows, _) = table.rows().unwrap();
    let expected: Vec<String> = (0..=10).map(|n| format!("a{}", n)).collect();
    assert_eq!(rows[0].options, expected);
}

#[test]
fn blank_options_are_dropped() {
    let table = table("question,correct,option_0,option_1,option_2\nq,a,a,,b\n");
    let (rows, _) = table.rows().unwrap();
    assert_eq!(rows[0].options, vec!["a", "b"]);
}

#[test]
fn skips_rows_missing_required_fields() {
    let table = table("question,correct,time\n,a,10\nq,  ,10\nq,a,soon\nok,fine,\n");
    let (rows, warnings) = table.rows().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].question, "ok");
    assert_eq!(rows[0].time, None);
    let lines: Vec<usize> = warnings.iter().map(|w| w.line).collect();
    assert_eq!(lines, vec![2, 3, 4]);
}

#[test]
fn skips_rows_with_invalid_options() {
    let table = table("question,correct,option_0,option_1\nq,a,b,c\nr,a,a,a\n");
    let (rows, warnings) = table.rows().unwrap();
    assert!(rows.is_empty());
    assert_eq!(warnings.len(), 2);
}

#[test]
fn missing_required_column_is_an_error() {
    let table = table("question,answer\nq,a\n");
    assert!(table.rows().is_err());
}

#[test]
fn strips_byte_order_mark() {
    let table = table("\u{feff}question,correct\nq,a\n");
    assert_eq!(table.headers()[0], "question");
    assert_eq!(table.rows().unwrap().0.len(), 1);
}

#[test]
fn dedup_keeps_first_occurrence() {
    let mut table = table("question,correct\nq1,a\nq2,b\nq1,a\nq1,c\n");
    assert_eq!(table.dedup(), 1);
    let (rows, _) = table.rows().unwrap();
    let questions: Vec<(&str, &str)> = rows
        .iter()
        .map(|r| (r.question.as_str(), r.correct.as_str()))
        .collect();
    assert_eq!(questions, vec![("q1", "a"), ("q2", "b"), ("q1", "c")]);
}

#[test]
fn lowercases_headers() {
    let mut table = table("Question,CORRECT\nq,a\n");
    table.lowercase_headers();
    assert_eq!(table.headers(), &["question".to_owned(), "correct".to_owned()][..]);
}

#[test]
fn templates_questions() {
    let mut table = table("question,correct\nCEO,Chief Executive Officer\n,blank\n");
    table
        .map_column(QUESTION_FIELD, |q| format!("Que signifie « {} » ?", q))
        .unwrap();
    let (rows, warnings) = table.rows().unwrap();
    assert_eq!(rows[0].question, "Que signifie « CEO » ?");
    assert_eq!(rows[0].cells[0], "Que signifie « CEO » ?");
    assert_eq!(warnings.len(), 1);
    assert!(table.map_column("missing", |q| q.to_owned()).is_err());
}

#[test]
fn writes_options_after_source_columns() {
    let table = table("question,correct,option_0\nq,a,a\n");
    let (mut rows, _) = table.rows().unwrap();
    rows[0].options = vec!["a".to_owned(), "b".to_owned(), "c".to_owned()];

    let mut output = Vec::new();
    table.write_rows(&rows, &mut output).unwrap();
    let output = String::from_utf8(output).unwrap();
    assert_eq!(
        output,
        "\u{feff}question,correct,option_0,option_1,option_2\nq,a,a,b,c\n"
    );
}

#[test]
fn written_file_reads_back() {
    let table = table("question,correct,time\nq,a,15\n");
    let (mut rows, _) = table.rows().unwrap();
    rows[0].options = vec!["a".to_owned(), "b".to_owned()];

    let directory = tempfile::tempdir().unwrap();
    let path = directory.path().join("out.csv");
    table.save_rows(&rows, &path).unwrap();

    let reloaded = SourceTable::open(&path).unwrap();
    let (reloaded_rows, _) = reloaded.rows().unwrap();
    assert_eq!(reloaded_rows[0].options, vec!["a", "b"]);
    assert_eq!(reloaded_rows[0].time, Some(15.0));
}

#[test]
fn skips_rows_with_blank_options() {
    let table = table("question,correct,option_0,option_1\nQ1,A1,A1,B1\nQ2,A2,,\n");
    let (rows, warnings) = table.rows().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].question, "Q1");
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].line, 3);
    assert_eq!(warnings[0].reason, "no options");
}

#[test]
fn questions_ignore_option_cells() {
    let table = table("question,correct,option_0,option_1\nQ1,A1,stale,other\nQ2,A2,,\nQ3,A3,A3,A1\n");
    let (rows, warnings) = table.questions().unwrap();
    assert!(warnings.is_empty());
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|row| row.options.is_empty()));

    let mut rng = StdRng::seed_from_u64(11);
    let synthesized = synthesize(&rows, 1, &mut rng).unwrap();
    assert_eq!(synthesized.len(), 3);
}

#[test]
fn skips_rows_with_non_finite_time() {
    let table = table("question,correct,time\nq1,a,NaN\nq2,b,inf\nq3,c,-infinity\nq4,d,12.5\n");
    let (rows, warnings) = table.rows().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].time, Some(12.5));
    let lines: Vec<usize> = warnings.iter().map(|w| w.line).collect();
    assert_eq!(lines, vec![2, 3, 4]);
}
