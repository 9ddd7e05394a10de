use regex::Regex;
use std::sync::LazyLock;

static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[/\-;,\s]+").expect("valid separator pattern"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhoneCandidate {
    Mobile(String),
    Landline(String),
}

/// Extracts every 9-digit Spanish number from free text, in input order.
pub fn candidates(raw: &str) -> Vec<PhoneCandidate> {
    SEPARATORS
        .split(raw.trim())
        .filter_map(|token| {
            let digits: String = token.chars().filter(|c| c.is_ascii_digit()).collect();
            if digits.len() != 9 {
                return None;
            }
            match digits.as_bytes()[0] {
                b'6' | b'7' => Some(PhoneCandidate::Mobile(digits)),
                b'8' | b'9' => Some(PhoneCandidate::Landline(digits)),
                _ => None,
            }
        })
        .collect()
}

/// 回傳第一個手機號碼；只有市話時回傳空字串
pub fn normalize(raw: &str) -> String {
    let found = candidates(raw);

    let mobile = found.iter().find_map(|candidate| match candidate {
        PhoneCandidate::Mobile(number) => Some(number.clone()),
        PhoneCandidate::Landline(_) => None,
    });

    match mobile {
        Some(number) => number,
        None => {
            if found
                .iter()
                .any(|c| matches!(c, PhoneCandidate::Landline(_)))
            {
                tracing::debug!("Discarding landline-only phone value");
            }
            String::new()
        }
    }
}
