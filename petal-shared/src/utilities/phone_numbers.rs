use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};

pub const SAUDI_COUNTRY_CODE: &str = "966";

static SEPARATORS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\s\-\.\(\)]").expect("separator pattern is valid")
});

/// Strips formatting and the international dialling prefix, leaving digits as typed.
pub fn clean_phone_number(phone_number: &str) -> String {
    let cleaned = SEPARATORS.replace_all(phone_number.trim(), "");

    let mut digits: &str = &cleaned;
    while let Some(rest) = digits.strip_prefix('+').or_else(|| digits.strip_prefix("00")) {
        digits = rest;
    }
    digits.to_string()
}

/// Canonical international form used as the account key.
///
/// `05XXXXXXXX` becomes `9665XXXXXXXX`, a bare 9-digit `5XXXXXXXX` becomes
/// `9665XXXXXXXX`, anything else is returned cleaned but otherwise unchanged.
/// Applying it twice gives the same value.
pub fn normalize_phone(phone_number: &str) -> String {
    let cleaned = clean_phone_number(phone_number);

    if let Some(rest) = cleaned.strip_prefix("05") {
        return format!("{}5{}", SAUDI_COUNTRY_CODE, rest);
    }
    if cleaned.starts_with('5') && cleaned.len() == 9 && cleaned.bytes().all(|b| b.is_ascii_digit()) {
        return format!("{}{}", SAUDI_COUNTRY_CODE, cleaned);
    }
    cleaned
}

/// Every stored form an account's phone may have been saved under.
pub fn phone_lookup_variants(phone_number: &str) -> Vec<String> {
    let cleaned = clean_phone_number(phone_number);
    let normalized = normalize_phone(phone_number);

    let mut variants = vec![normalized.clone()];
    if let Some(local) = normalized.strip_prefix(SAUDI_COUNTRY_CODE).filter(|rest| rest.starts_with('5')) {
        variants.push(format!("0{}", local));
        variants.push(local.to_string());
        variants.push(format!("+{}", normalized));
    }
    variants.push(cleaned);
    variants.push(phone_number.trim().to_string());

    let mut unique = Vec::with_capacity(variants.len());
    for variant in variants {
        if !variant.is_empty() && !unique.contains(&variant) {
            unique.push(variant);
        }
    }
    unique
}

/// Form expected by the OTP provider.
pub fn provider_phone(normalized: &str) -> String {
    if normalized.starts_with('+') {
        normalized.to_string()
    } else {
        format!("+{}", normalized)
    }
}

/// Short stable fingerprint for log lines, so raw numbers stay out of the logs.
pub fn phone_fingerprint(phone_number: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize_phone(phone_number).as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..12].to_string()
}
