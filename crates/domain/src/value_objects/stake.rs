//! Stake amount value object.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A non-negative decimal amount, kept in the caller's string form so the
/// settlement layer sees exactly what the player staked (e.g. `"0.1"`).
///
/// Valid by construction: digits with at most one decimal point. Signs,
/// exponents, `NaN` and `inf` are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StakeAmount(String);

impl StakeAmount {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("Stake amount cannot be empty"));
        }

        let mut seen_point = false;
        let mut seen_digit = false;
        for c in trimmed.chars() {
            match c {
                '0'..='9' => seen_digit = true,
                '.' if !seen_point => seen_point = true,
                _ => {
                    return Err(DomainError::validation(format!(
                        "Stake amount must be a non-negative number, got '{}'",
                        raw
                    )))
                }
            }
        }
        if !seen_digit {
            return Err(DomainError::validation(format!(
                "Stake amount must contain digits, got '{}'",
                raw
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when nothing is actually at risk (`"0"`, `"0.00"`).
    pub fn is_zero(&self) -> bool {
        self.0.chars().all(|c| c == '0' || c == '.')
    }
}

impl fmt::Display for StakeAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for StakeAmount {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for StakeAmount {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StakeAmount> for String {
    fn from(value: StakeAmount) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_decimals() {
        for raw in ["0", "0.1", "12", "3.50", ".5", " 7 "] {
            assert!(StakeAmount::parse(raw).is_ok(), "{raw} should parse");
        }
        assert_eq!(StakeAmount::parse(" 7 ").expect("valid").as_str(), "7");
    }

    #[test]
    fn rejects_malformed_amounts() {
        for raw in ["", "-1", "1e5", "NaN", "inf", "1.2.3", "abc", ".", "+3"] {
            assert!(StakeAmount::parse(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn zero_detection() {
        assert!(StakeAmount::parse("0.00").expect("valid").is_zero());
        assert!(!StakeAmount::parse("0.01").expect("valid").is_zero());
    }

    #[test]
    fn deserialization_validates() {
        let ok: Result<StakeAmount, _> = serde_json::from_str("\"0.1\"");
        assert!(ok.is_ok());
        let bad: Result<StakeAmount, _> = serde_json::from_str("\"-0.1\"");
        assert!(bad.is_err());
    }
}
