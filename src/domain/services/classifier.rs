use crate::domain::model::{
    ClassificationOutcome, Record, DNI_FIELD, EMAIL_FIELD, EMAIL_ORIGINAL_FIELD,
    INVALID_REASON_FIELD, OLD_USER_FIELD, PHONE_FIELD, WARNING_REASON_FIELD,
};
use crate::domain::services::{email, identifier, phone};

/// Normalizes phone and email in place and decides where the record goes.
/// Annotation columns are left to [`annotate_invalid`] and [`warning_copy`].
pub fn classify(mut record: Record) -> (Record, ClassificationOutcome) {
    record.set(OLD_USER_FIELD, "1");

    let phone = phone::normalize(record.get(PHONE_FIELD));
    record.set(PHONE_FIELD, phone);

    let dni_verdict = identifier::validate(record.get(DNI_FIELD));

    let email_verdict = email::validate(record.get(EMAIL_FIELD));
    record.set(EMAIL_FIELD, email_verdict.normalized.clone());

    let outcome = if dni_verdict.is_valid {
        if email_verdict.is_valid {
            ClassificationOutcome::Valid
        } else {
            ClassificationOutcome::ValidWithWarning {
                reason: format!("Email: {}", email_verdict.reason),
                email_original: email_verdict.original,
            }
        }
    } else {
        let mut reasons = vec![format!("DNI: {}", dni_verdict.reason)];
        if !email_verdict.is_valid {
            reasons.push(format!("Email: {}", email_verdict.reason));
        }
        ClassificationOutcome::Invalid {
            reason: reasons.join("; "),
        }
    };

    (record, outcome)
}

pub fn annotate_invalid(mut record: Record, reason: &str) -> Record {
    record.set(INVALID_REASON_FIELD, reason);
    record
}

pub fn warning_copy(record: &Record, reason: &str, email_original: &str) -> Record {
    let mut copy = record.clone();
    copy.set(EMAIL_ORIGINAL_FIELD, email_original);
    copy.set(WARNING_REASON_FIELD, reason);
    copy
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(dni: &str, email: &str, telefono: &str) -> Record {
        [
            ("dni", dni),
            ("email", email),
            ("telefono", telefono),
            ("nombre", "Ana"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_valid_record_is_normalized() {
        let (out, outcome) = classify(record("12345678Z", "A@B.COM", "600111222 / 910111222"));
        assert_eq!(outcome, ClassificationOutcome::Valid);
        assert_eq!(out.get("email"), "a@b.com");
        assert_eq!(out.get("telefono"), "600111222");
        assert_eq!(out.get("old_user"), "1");
        assert_eq!(out.get("nombre"), "Ana");
    }

    #[test]
    fn test_valid_dni_bad_email_is_warning() {
        let (out, outcome) = classify(record("12345678Z", "bad", ""));
        match &outcome {
            ClassificationOutcome::ValidWithWarning {
                reason,
                email_original,
            } => {
                assert!(reason.starts_with("Email: "));
                assert_eq!(email_original, "bad");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(outcome.is_valid());
        // 無效的 email 仍然被覆寫成空字串
        assert_eq!(out.get("email"), "");
    }

    #[test]
    fn test_invalid_dni_with_valid_email() {
        let (_, outcome) = classify(record("00000000X", "ana@example.com", ""));
        assert_eq!(
            outcome,
            ClassificationOutcome::Invalid {
                reason: "DNI: incorrect control letter (expected: T)".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_dni_and_email_reasons_are_joined() {
        let (_, outcome) = classify(record("garbage", "", ""));
        assert_eq!(
            outcome.reason(),
            Some("DNI: invalid format; Email: empty email")
        );
        assert!(!outcome.is_valid());
    }

    #[test]
    fn test_reclassifying_normalized_record_is_stable() {
        let (first, first_outcome) = classify(record("12345678Z", "Ana@Example.com", "600111222"));
        let (second, second_outcome) = classify(first.clone());
        assert_eq!(first_outcome, second_outcome);
        assert_eq!(first, second);
    }

    #[test]
    fn test_annotations() {
        let base = record("12345678Z", "bad", "");
        let invalid = annotate_invalid(base.clone(), "DNI: invalid format");
        assert_eq!(invalid.get("motivo_invalido"), "DNI: invalid format");

        let warning = warning_copy(&base, "Email: oops", "bad");
        assert_eq!(warning.get("email_original"), "bad");
        assert_eq!(warning.get("motivo_warning"), "Email: oops");
        assert!(!base.contains("motivo_warning"));
    }
}
