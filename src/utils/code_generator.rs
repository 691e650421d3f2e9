//! Short code generation.
//!
//! Codes are drawn from the OS cryptographically secure random source so they
//! cannot be predicted or enumerated from previously issued codes.

use crate::error::AppError;
use serde_json::json;

/// Alphabet used for generated codes: `a-z`, `A-Z`, `0-9`.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Default short code length.
pub const DEFAULT_CODE_LENGTH: i32 = 6;

/// Largest multiple of 62 representable in a byte. Bytes at or above it are
/// rejected so `byte % 62` stays uniform.
const REJECTION_BOUND: u8 = (u8::MAX / 62) * 62;

/// Random bytes requested per refill.
const CHUNK: usize = 32;

/// Generates a random code of `length` characters from [`ALPHABET`].
///
/// No uniqueness is guaranteed; callers check the store.
///
/// # Errors
///
/// Returns [`AppError::InvalidArgument`] if `length <= 0`.
/// Returns [`AppError::RandomSource`] if the OS random source fails.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code(6)?;
/// assert_eq!(code.len(), 6);
/// ```
pub fn generate_code(length: i32) -> Result<String, AppError> {
    generate_code_with(length, getrandom::fill)
}

/// Same as [`generate_code`], reading entropy from `fill`.
pub fn generate_code_with<F, E>(length: i32, mut fill: F) -> Result<String, AppError>
where
    F: FnMut(&mut [u8]) -> Result<(), E>,
    E: std::fmt::Display,
{
    if length <= 0 {
        return Err(AppError::invalid_argument(
            "Code length must be greater than 0",
            json!({ "length": length }),
        ));
    }

    let length = length as usize;
    let mut code = String::with_capacity(length);
    let mut buffer = [0u8; CHUNK];

    while code.len() < length {
        fill(&mut buffer).map_err(|e| {
            AppError::random_source(
                "Random source failed while generating code",
                json!({ "reason": e.to_string() }),
            )
        })?;

        for &byte in buffer.iter().filter(|&&b| b < REJECTION_BOUND) {
            code.push(ALPHABET[(byte % 62) as usize] as char);
            if code.len() == length {
                break;
            }
        }
    }

    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_code_has_requested_length() {
        for length in [1, 6, 12, 64, 100] {
            let code = generate_code(length).unwrap();
            assert_eq!(code.len(), length as usize);
        }
    }

    #[test]
    fn test_generate_code_uses_alphabet_only() {
        let code = generate_code(500).unwrap();
        assert!(code.bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn test_generate_code_rejects_zero_length() {
        let result = generate_code(0);
        assert!(matches!(result, Err(AppError::InvalidArgument { .. })));
    }

    #[test]
    fn test_generate_code_rejects_negative_length() {
        let result = generate_code(-1);
        assert!(matches!(result, Err(AppError::InvalidArgument { .. })));
    }

    #[test]
    fn test_generate_code_produces_unique_codes() {
        let codes: HashSet<String> = (0..1000).map(|_| generate_code(12).unwrap()).collect();
        assert_eq!(codes.len(), 1000);
    }

    #[test]
    fn test_alphabet_is_62_distinct_characters() {
        let unique: HashSet<_> = ALPHABET.iter().collect();
        assert_eq!(unique.len(), 62);
        assert_eq!(REJECTION_BOUND, 248);
    }

    #[test]
    fn test_biased_bytes_are_rejected() {
        let mut calls = 0;
        let code = generate_code_with(3, |buf: &mut [u8]| {
            calls += 1;
            if calls == 1 {
                buf.fill(255);
            } else {
                buf.fill(0);
                buf[1] = 61;
                buf[2] = 62;
            }
            Ok::<(), String>(())
        })
        .unwrap();

        assert_eq!(calls, 2);
        assert_eq!(code, "a9a");
    }

    #[test]
    fn test_random_source_failure() {
        let result = generate_code_with(6, |_buf: &mut [u8]| Err("entropy exhausted"));

        match result {
            Err(AppError::RandomSource { details, .. }) => {
                assert_eq!(details["reason"], "entropy exhausted");
            }
            other => panic!("expected RandomSource error, got {other:?}"),
        }
    }

    #[test]
    fn test_byte_mapping_boundaries() {
        let code = generate_code_with(2, |buf: &mut [u8]| {
            buf.fill(247);
            buf[0] = 26;
            Ok::<(), String>(())
        })
        .unwrap();

        // 26 -> 'A', 247 % 62 = 61 -> '9'
        assert_eq!(code, "A9");
    }
}
