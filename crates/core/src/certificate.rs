//! Certificate numbering and verification codes.

use rand::Rng;

/// Prefix of every certificate number.
pub const NUMBER_PREFIX: &str = "CERT";

/// Digits in the per-year sequence part of a certificate number.
pub const SEQUENCE_DIGITS: usize = 6;

/// Largest sequence value that fits in [`SEQUENCE_DIGITS`].
pub const MAX_SEQUENCE: i32 = 999_999;

/// Length of a verification code.
pub const VERIFICATION_CODE_LENGTH: usize = 12;

/// How many fresh codes to try before giving up on a unique-code collision.
pub const MAX_CODE_ATTEMPTS: usize = 5;

/// Format a certificate number: `CERT-2025-000042`.
pub fn format_number(year: i32, sequence: i32) -> Result<String, String> {
    if !(1..=MAX_SEQUENCE).contains(&sequence) {
        return Err(format!(
            "Certificate sequence {sequence} out of range for year {year}"
        ));
    }
    Ok(format!(
        "{NUMBER_PREFIX}-{year:04}-{sequence:0width$}",
        width = SEQUENCE_DIGITS
    ))
}

/// Split a certificate number back into `(year, sequence)`.
pub fn parse_number(number: &str) -> Option<(i32, i32)> {
    let mut parts = number.split('-');
    if parts.next()? != NUMBER_PREFIX {
        return None;
    }
    let year = parts.next()?;
    let seq = parts.next()?;
    if parts.next().is_some() || year.len() != 4 || seq.len() != SEQUENCE_DIGITS {
        return None;
    }
    Some((year.parse().ok()?, seq.parse().ok()?))
}

/// Generate a random uppercase alphanumeric verification code.
pub fn generate_verification_code() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(VERIFICATION_CODE_LENGTH)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect()
}

/// Normalise a user-typed verification code for lookup.
///
/// Returns `None` when the input cannot be a code at all.
pub fn normalize_verification_code(code: &str) -> Option<String> {
    let code = code.trim();
    if code.len() != VERIFICATION_CODE_LENGTH || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(code.to_ascii_uppercase())
}
