//! Spanish identity document validation: DNI, NIE and CIF.

use crate::domain::model::ValidationVerdict;
use regex::Regex;
use std::sync::LazyLock;

/// DNI/NIE 控制字母表，以數字部分除以 23 的餘數為索引
const DNI_LETTERS: &[u8; 23] = b"TRWAGMYFPDXBNJZSQVHLCKE";

/// CIF 控制字母表，控制數字 0 對應 'J'
const CIF_LETTERS: &[u8; 10] = b"JABCDEFGHI";

/// 只接受字母形式控制碼的 CIF 開頭字母
const CIF_LETTER_CONTROL: &str = "PQRSNW";
/// 只接受數字形式控制碼的 CIF 開頭字母
const CIF_DIGIT_CONTROL: &str = "ABEH";

static DNI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{8}[A-Z]$").expect("valid DNI pattern"));
static NIE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[XYZ][0-9]{7}[A-Z]$").expect("valid NIE pattern"));
static CIF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ABCDEFGHJKLMNPQRSUVW][0-9]{7}[0-9A-Z]$").expect("valid CIF pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Dni,
    Nie,
    Cif,
}

/// Classifies an already trimmed and upper-cased identifier by shape.
/// Shapes are tried in DNI, NIE, CIF order.
pub fn identify(identifier: &str) -> Option<IdentifierKind> {
    if DNI_RE.is_match(identifier) {
        Some(IdentifierKind::Dni)
    } else if NIE_RE.is_match(identifier) {
        Some(IdentifierKind::Nie)
    } else if CIF_RE.is_match(identifier) {
        Some(IdentifierKind::Cif)
    } else {
        None
    }
}

pub fn validate(identifier: &str) -> ValidationVerdict {
    let identifier = identifier.trim().to_uppercase();

    match identify(&identifier) {
        Some(IdentifierKind::Dni) => check_control_letter(&identifier[..8], &identifier),
        Some(IdentifierKind::Nie) => {
            let prefix = match identifier.as_bytes()[0] {
                b'X' => '0',
                b'Y' => '1',
                _ => '2',
            };
            let number = format!("{}{}", prefix, &identifier[1..8]);
            check_control_letter(&number, &identifier)
        }
        Some(IdentifierKind::Cif) => check_cif(&identifier),
        None => ValidationVerdict::invalid("invalid format"),
    }
}

/// DNI 與 NIE 共用的 mod 23 檢查
fn check_control_letter(number: &str, identifier: &str) -> ValidationVerdict {
    let Some(expected) = dni_control_letter(number) else {
        return ValidationVerdict::invalid("invalid format");
    };
    let actual = identifier.chars().last();

    if actual == Some(expected) {
        ValidationVerdict::valid()
    } else {
        ValidationVerdict::invalid(format!(
            "incorrect control letter (expected: {})",
            expected
        ))
    }
}

/// Control letter for the numeric part of a DNI (or a NIE with its prefix mapped).
pub fn dni_control_letter(number: &str) -> Option<char> {
    let number: u32 = number.parse().ok()?;
    Some(DNI_LETTERS[(number % 23) as usize] as char)
}

/// Control digit for the seven body digits of a CIF.
pub fn cif_control_digit(body: &str) -> Option<u32> {
    if body.len() != 7 {
        return None;
    }

    let mut sum = 0;
    for (position, c) in body.chars().enumerate() {
        let digit = c.to_digit(10)?;
        if position % 2 == 1 {
            sum += digit;
        } else {
            let doubled = digit * 2;
            sum += doubled / 10 + doubled % 10;
        }
    }

    Some((10 - sum % 10) % 10)
}

fn check_cif(identifier: &str) -> ValidationVerdict {
    let mut chars = identifier.chars();
    let (Some(leading), Some(control)) = (chars.next(), chars.next_back()) else {
        return ValidationVerdict::invalid("invalid format");
    };
    let Some(control_digit) = cif_control_digit(chars.as_str()) else {
        return ValidationVerdict::invalid("invalid format");
    };

    let as_digit = char::from_digit(control_digit, 10).unwrap_or('0');
    let as_letter = CIF_LETTERS[control_digit as usize] as char;

    if CIF_LETTER_CONTROL.contains(leading) {
        if control == as_letter {
            ValidationVerdict::valid()
        } else {
            ValidationVerdict::invalid(format!(
                "incorrect CIF control letter (expected: {})",
                as_letter
            ))
        }
    } else if CIF_DIGIT_CONTROL.contains(leading) {
        if control == as_digit {
            ValidationVerdict::valid()
        } else {
            ValidationVerdict::invalid(format!(
                "incorrect CIF control digit (expected: {})",
                as_digit
            ))
        }
    } else if control == as_digit || control == as_letter {
        ValidationVerdict::valid()
    } else {
        ValidationVerdict::invalid(format!(
            "incorrect CIF control character (expected: {} or {})",
            as_digit, as_letter
        ))
    }
}
