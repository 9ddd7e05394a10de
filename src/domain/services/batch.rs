use crate::domain::model::{
    BatchResult, ClassificationOutcome, OutputKind, ReasonCounts, Record, Table,
    INVALID_REASON_FIELD, UNNAMED_MARKER, WARNING_REASON_FIELD,
};
use crate::domain::services::classifier;

const PROGRESS_EVERY: usize = 100;

/// Classifies every record in input order and tallies rejection reasons.
pub fn process(table: Table) -> BatchResult {
    let total = table.records.len();
    let mut result = BatchResult {
        columns: table.columns,
        total_records: total,
        ..BatchResult::default()
    };

    for (index, record) in table.records.into_iter().enumerate() {
        if index % PROGRESS_EVERY == 0 {
            tracing::debug!("Processing row {}/{}", index + 1, total);
        }

        let (record, outcome) = classifier::classify(record);
        match outcome {
            ClassificationOutcome::Valid => result.valid.push(record),
            ClassificationOutcome::ValidWithWarning {
                reason,
                email_original,
            } => {
                tracing::debug!("Row {} kept with warning: {}", index + 1, reason);
                result
                    .warnings
                    .push(classifier::warning_copy(&record, &reason, &email_original));
                result.valid.push(record);
            }
            ClassificationOutcome::Invalid { reason } => {
                result
                    .invalid
                    .push(classifier::annotate_invalid(record, &reason));
            }
        }
    }

    result.invalid_reasons = count_reasons(&result.invalid, INVALID_REASON_FIELD);
    result.warning_reasons = count_reasons(&result.warnings, WARNING_REASON_FIELD);

    tracing::info!(
        "✅ Classified {} records: {} valid, {} invalid, {} warnings",
        total,
        result.valid.len(),
        result.invalid.len(),
        result.warnings.len()
    );
    result
}

fn count_reasons(records: &[Record], field: &str) -> ReasonCounts {
    records.iter().map(|record| record.get(field)).collect()
}

/// 輸出欄位：原始欄位 + 該輸出的附加欄位，去除 "Unnamed" 欄位
pub fn output_columns(source_columns: &[String], kind: OutputKind) -> Vec<String> {
    let mut columns: Vec<String> = source_columns.to_vec();
    for annotation in kind.annotation_columns() {
        if !columns.iter().any(|c| c == annotation) {
            columns.push(annotation.to_string());
        }
    }
    columns.retain(|column| !column.contains(UNNAMED_MARKER));
    columns
}
