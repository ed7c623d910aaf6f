use std::path::Path;

use super::{EvaluationRecord, EvaluatorError};

/// Read the question dataset: one question per row, first column. A
/// leading `question` header row is skipped; blank rows are ignored.
pub fn read_questions(path: &str) -> Result<Vec<String>, EvaluatorError> {
    if !Path::new(path).exists() {
        return Err(EvaluatorError::DatasetNotFound(path.to_string()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut questions = Vec::new();
    for record in reader.records() {
        let record = record?;
        let Some(field) = record.get(0) else { continue };
        let question = field.trim();
        if question.is_empty() {
            continue;
        }
        questions.push(question.to_string());
    }

    if questions
        .first()
        .is_some_and(|q| q.to_lowercase().starts_with("question"))
    {
        questions.remove(0);
    }

    Ok(questions)
}

/// Write the report: one record per input row, header included.
pub fn write_report(path: &str, records: &[EvaluationRecord]) -> Result<(), EvaluatorError> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::RowStatus;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(name)
    }

    #[test]
    fn header_row_is_skipped() {
        let path = temp_path("questions_with_header.csv");
        std::fs::write(&path, "Question\nHow do I scan a file?\n\nWhat ports are used?\n")
            .unwrap();

        let questions = read_questions(path.to_str().unwrap()).unwrap();
        assert_eq!(
            questions,
            vec![
                "How do I scan a file?".to_string(),
                "What ports are used?".to_string()
            ]
        );

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn headerless_dataset_is_read_as_is() {
        let path = temp_path("questions_no_header.csv");
        std::fs::write(&path, "How do I scan a file?\nWhat ports are used?\n").unwrap();

        let questions = read_questions(path.to_str().unwrap()).unwrap();
        assert_eq!(questions.len(), 2);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn missing_dataset_is_an_error() {
        let err = read_questions("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, EvaluatorError::DatasetNotFound(_)));
    }

    #[test]
    fn report_has_one_row_per_record_plus_header() {
        let path = temp_path("evaluation_report_test.csv");
        let records = vec![
            EvaluationRecord {
                question: "q1".to_string(),
                answer: "a1".to_string(),
                grade: 92,
                rationale: "accurate and well formatted".to_string(),
                status: RowStatus::Graded,
                latency_ms: 1200,
            },
            EvaluationRecord {
                question: "q2".to_string(),
                answer: String::new(),
                grade: 0,
                rationale: "Chat endpoint returned 502: upstream failure".to_string(),
                status: RowStatus::Failed,
                latency_ms: 40,
            },
        ];

        write_report(path.to_str().unwrap(), &records).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("question"));
        assert!(lines[0].contains("latency_ms"));
        assert!(lines[2].contains("failed"));

        std::fs::remove_file(path).ok();
    }
}
