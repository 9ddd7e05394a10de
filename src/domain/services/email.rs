use crate::domain::model::EmailVerdict;
use email_address::{EmailAddress, Options};

/// 需要頂級網域、允許 `[IP]` 網域字面值、不接受 `Name <addr>` 形式
fn parse_options() -> Options {
    Options::default()
        .with_required_tld()
        .with_domain_literal()
        .without_display_text()
}

pub fn validate(raw: &str) -> EmailVerdict {
    let original = raw.to_string();
    let candidate = raw.trim();

    if candidate.is_empty() {
        return EmailVerdict {
            is_valid: false,
            reason: "empty email".to_string(),
            normalized: String::new(),
            original,
        };
    }

    match EmailAddress::parse_with_options(candidate, parse_options()) {
        Ok(address) => EmailVerdict {
            is_valid: true,
            reason: String::new(),
            normalized: normalize_parts(address.local_part(), address.domain()),
            original,
        },
        Err(e) => EmailVerdict {
            is_valid: false,
            reason: e.to_string(),
            normalized: String::new(),
            original,
        },
    }
}

/// Domain names are lowercased, `[...]` literals are kept as written. The
/// local part keeps its case unless it is written entirely in capitals.
fn normalize_parts(local: &str, domain: &str) -> String {
    let shouted =
        local.chars().any(|c| c.is_uppercase()) && !local.chars().any(|c| c.is_lowercase());
    let local = if shouted {
        local.to_lowercase()
    } else {
        local.to_string()
    };
    let domain = if domain.starts_with('[') {
        domain.to_string()
    } else {
        domain.to_lowercase()
    };
    format!("{}@{}", local, domain)
}
