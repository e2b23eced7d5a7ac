use async_trait::async_trait;

use crate::ports::cpf_validator::{CpfValidator, ValidatorError};

/// Checks a CPF's shape and both mod-11 check digits.
///
/// Only the bare 11 digits are accepted: the cpf is stored and looked up as
/// given, so a second spelling (`000.000.000-00`, surrounding spaces) would
/// key the same customer twice. Sequences of a single repeated digit pass the
/// checksum but are not issued, so they are rejected.
pub fn is_valid_cpf(raw: &str) -> bool {
    let digits = match parse_digits(raw) {
        Some(d) => d,
        None => return false,
    };
    if digits.iter().all(|d| *d == digits[0]) {
        return false;
    }
    check_digit(&digits[..9]) == digits[9] && check_digit(&digits[..10]) == digits[10]
}

fn parse_digits(raw: &str) -> Option<[u32; 11]> {
    if raw.len() != 11 {
        return None;
    }
    let mut out = [0u32; 11];
    for (slot, c) in out.iter_mut().zip(raw.chars()) {
        *slot = c.to_digit(10)?;
    }
    Some(out)
}

fn check_digit(prefix: &[u32]) -> u32 {
    let weight_start = prefix.len() as u32 + 1;
    let sum: u32 = prefix
        .iter()
        .enumerate()
        .map(|(i, d)| d * (weight_start - i as u32))
        .sum();
    match (sum * 10) % 11 {
        10 => 0,
        r => r,
    }
}

/// Local validator backed by [`is_valid_cpf`]. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChecksumCpfValidator;

#[async_trait]
impl CpfValidator for ChecksumCpfValidator {
    async fn validate(&self, cpf: &str) -> Result<bool, ValidatorError> {
        Ok(is_valid_cpf(cpf))
    }
}
