use std::{fmt::Display, str::FromStr, sync::OnceLock};

use regex::Regex;
use thiserror::Error;

const MIN_LENGTH: usize = 3;
const MAX_LENGTH: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OwnerNameError {
    #[error("Username must be 3-16 characters")]
    InvalidLength,
    #[error("Username can only contain letters, numbers, and underscores")]
    InvalidCharacters,
}

/// The customer's chosen name. It doubles as the panel username, so it must satisfy the panel's rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerName(String);

impl OwnerName {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

fn pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]+$").ok()).as_ref()
}

impl FromStr for OwnerName {
    type Err = OwnerNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let len = s.chars().count();
        if !(MIN_LENGTH..=MAX_LENGTH).contains(&len) {
            return Err(OwnerNameError::InvalidLength);
        }
        if !pattern().is_some_and(|re| re.is_match(s)) {
            return Err(OwnerNameError::InvalidCharacters);
        }
        Ok(Self(s.to_string()))
    }
}

impl Display for OwnerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
