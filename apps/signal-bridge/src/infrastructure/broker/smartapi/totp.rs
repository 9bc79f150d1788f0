//! One-time passwords for SmartAPI login.
//!
//! SmartAPI expects a 6-digit SHA-1 code with a 30 second step, derived from
//! the base32 seed shown when TOTP is enabled on the account.

use totp_rs::{Algorithm, Secret, TOTP};

use super::error::SmartApiError;

const TOTP_DIGITS: usize = 6;
const TOTP_SKEW: u8 = 1;
const TOTP_STEP: u64 = 30;

fn create_totp(seed: &str) -> Result<TOTP, SmartApiError> {
    let normalized: String = seed
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    let secret = Secret::Encoded(normalized)
        .to_bytes()
        .map_err(|e| SmartApiError::Totp(format!("invalid seed: {e:?}")))?;

    Ok(TOTP::new_unchecked(
        Algorithm::SHA1,
        TOTP_DIGITS,
        TOTP_SKEW,
        TOTP_STEP,
        secret,
    ))
}

/// Code for the current time.
pub fn current_code(seed: &str) -> Result<String, SmartApiError> {
    create_totp(seed)?
        .generate_current()
        .map_err(|e| SmartApiError::Totp(e.to_string()))
}

/// Code for a Unix timestamp.
#[cfg(test)]
fn code_at(seed: &str, unix_time: u64) -> Result<String, SmartApiError> {
    Ok(create_totp(seed)?.generate(unix_time))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Base32 of the RFC 6238 SHA-1 key "12345678901234567890".
    const RFC_SEED: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";

    #[test]
    fn matches_rfc_6238_vector() {
        assert_eq!(code_at(RFC_SEED, 59).unwrap(), "287082");
        assert_eq!(code_at(RFC_SEED, 1_111_111_109).unwrap(), "081804");
    }

    #[test]
    fn seed_is_normalized() {
        let spaced = "gezd gnbv gy3t qojq gezd gnbv gy3t qojq";
        assert_eq!(code_at(spaced, 59).unwrap(), "287082");
    }

    #[test]
    fn current_code_has_six_digits() {
        let code = current_code(RFC_SEED).unwrap();
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn invalid_seed_is_rejected() {
        assert!(matches!(
            code_at("not base32 !!", 59),
            Err(SmartApiError::Totp(_))
        ));
    }
}
