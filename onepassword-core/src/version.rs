use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::OnePasswordError;

/// Version reported by `op --version`, e.g. `2.23.0` or `2.24.0-beta.01`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CliVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre: Option<String>,
}

impl CliVersion {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            pre: None,
        }
    }

    /// True when this version is at least `min`.
    pub fn supports(&self, min: &CliVersion) -> bool {
        self >= min
    }
}

impl FromStr for CliVersion {
    type Err = OnePasswordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || OnePasswordError::InvalidVersion(s.to_string());

        let trimmed = s.trim();
        let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Err(invalid());
        }

        let (release, pre) = match trimmed.split_once('-') {
            Some((release, pre)) if !pre.is_empty() => (release, Some(pre.to_string())),
            Some(_) => return Err(invalid()),
            None => (trimmed, None),
        };

        let mut parts = [0u64; 3];
        let mut count = 0;
        for component in release.split('.') {
            if count == parts.len() || component.is_empty() {
                return Err(invalid());
            }
            if !component.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            parts[count] = component.parse().map_err(|_| invalid())?;
            count += 1;
        }

        Ok(CliVersion {
            major: parts[0],
            minor: parts[1],
            patch: parts[2],
            pre,
        })
    }
}

impl Ord for CliVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (&self.pre, &other.pre) {
                (None, None) => Ordering::Equal,
                // a pre-release precedes its release
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some(a), Some(b)) => compare_pre(a, b),
            })
    }
}

/// Compares dot-separated pre-release identifiers: numeric ones as integers,
/// numeric before alphanumeric, a shorter prefix first. Falls back to the raw
/// text so ordering agrees with equality (`beta.01` vs `beta.1`).
fn compare_pre(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        let ord = match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => compare_identifier(x, y),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
}

fn compare_identifier(a: &str, b: &str) -> Ordering {
    match (numeric(a), numeric(b)) {
        // length first so arbitrarily long numbers never overflow
        (Some(x), Some(y)) => x.len().cmp(&y.len()).then_with(|| x.cmp(y)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Digits of a numeric identifier with leading zeros removed.
fn numeric(id: &str) -> Option<&str> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let digits = id.trim_start_matches('0');
    Some(if digits.is_empty() { "0" } else { digits })
}

impl PartialOrd for CliVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CliVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre {
            write!(f, "-{pre}")?;
        }
        Ok(())
    }
}
