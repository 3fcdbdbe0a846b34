use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{Result, SqlHwError};

static IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.:-]+$").expect("Invalid identifier regex"));

const MAX_IDENTIFIER_LEN: usize = 64;

/// 校验路径或请求体中的 ID（作业集、学生、题目、提交）
pub fn validate_identifier(kind: &str, value: &str) -> Result<()> {
    if value.is_empty() || value.len() > MAX_IDENTIFIER_LEN {
        return Err(SqlHwError::validation(format!(
            "{kind} length must be between 1 and {MAX_IDENTIFIER_LEN} characters"
        )));
    }
    // 只能包含字母、数字以及 _ . : -
    if !IDENTIFIER_RE.is_match(value) {
        return Err(SqlHwError::validation(format!(
            "{kind} must contain only letters, numbers, '_', '.', ':' or '-'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers() {
        for id in ["retail-analytics", "q1", "student_42", "2b0f9c1e-8a5d-4c1e-9b7a-0f1e2d3c4b5a"] {
            assert!(validate_identifier("id", id).is_ok(), "{id}");
        }
    }

    #[test]
    fn test_invalid_identifiers() {
        assert!(validate_identifier("setId", "").is_err());
        assert!(validate_identifier("setId", "has space").is_err());
        assert!(validate_identifier("setId", "semi;colon").is_err());

        let long = "a".repeat(MAX_IDENTIFIER_LEN + 1);
        let err = validate_identifier("setId", &long).unwrap_err();
        assert_eq!(err.code(), "E004");
    }
}
