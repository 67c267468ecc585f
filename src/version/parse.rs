//! Numeric version strings.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::{NodeenvError, Result};

/// A release version as a tuple of non-negative integers.
///
/// Ordering is component-wise and numeric, with missing components treated as
/// zero, so `0.9 < 0.10` and `21.7 == 21.7.0`.
#[derive(Debug, Clone)]
pub struct Version {
    parts: Vec<u64>,
}

impl Version {
    /// Build a three-component version.
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            parts: vec![major, minor, patch],
        }
    }

    /// Parse `vX.Y.Z[+build]`. The leading `v` is optional and build metadata
    /// after `+` is discarded.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let without_prefix = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);
        let core = without_prefix.split('+').next().unwrap_or_default();

        if core.is_empty() {
            return Err(invalid(input, "empty version"));
        }

        let parts = core
            .split('.')
            .map(|part| {
                part.parse::<u64>()
                    .map_err(|_| invalid(input, &format!("'{}' is not a number", part)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { parts })
    }

    /// The parsed components, exactly as written.
    pub fn components(&self) -> &[u64] {
        &self.parts
    }

    /// Major component.
    pub fn major(&self) -> u64 {
        self.component(0)
    }

    /// Minor component (0 when absent).
    pub fn minor(&self) -> u64 {
        self.component(1)
    }

    /// Patch component (0 when absent).
    pub fn patch(&self) -> u64 {
        self.component(2)
    }

    /// Whether the leading components of `self` equal all of `prefix`.
    pub fn starts_with(&self, prefix: &Version) -> bool {
        prefix
            .parts
            .iter()
            .enumerate()
            .all(|(i, part)| self.parts.get(i) == Some(part))
    }

    fn component(&self, index: usize) -> u64 {
        self.parts.get(index).copied().unwrap_or(0)
    }

    fn significant(&self) -> &[u64] {
        let len = self
            .parts
            .iter()
            .rposition(|p| *p != 0)
            .map_or(0, |i| i + 1);
        &self.parts[..len]
    }
}

fn invalid(input: &str, message: &str) -> NodeenvError {
    NodeenvError::Parse {
        what: format!("version '{}'", input),
        message: message.to_string(),
    }
}

impl FromStr for Version {
    type Err = NodeenvError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.parts.iter().map(u64::to_string).collect();
        write!(f, "{}", joined.join("."))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        (0..len)
            .map(|i| self.component(i).cmp(&other.component(i)))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn parses_full_version_with_prefix() {
        assert_eq!(v("v21.7.3").components(), &[21, 7, 3]);
    }

    #[test]
    fn parses_partial_version() {
        assert_eq!(v("v21.7").components(), &[21, 7]);
        assert_eq!(v("18").components(), &[18]);
    }

    #[test]
    fn discards_build_metadata() {
        assert_eq!(v("v21.7.3+0-b20240228T18452699").components(), &[21, 7, 3]);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            Version::parse("latest"),
            Err(NodeenvError::Parse { .. })
        ));
        assert!(Version::parse("").is_err());
        assert!(Version::parse("v").is_err());
        assert!(Version::parse("1..2").is_err());
    }

    #[test]
    fn compares_numerically_not_lexically() {
        assert!(v("0.9") < v("0.10"));
        assert!(v("0.2.1") < v("0.2.10"));
        assert!(v("1") < v("2"));
        assert!(v("9.99.99") < v("10.0.0"));
    }

    #[test]
    fn missing_components_are_zero() {
        assert_eq!(v("21.7"), v("21.7.0"));
        assert!(v("21.7") < v("21.7.1"));
    }

    #[test]
    fn equal_versions_hash_equally() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(v("21.7"));
        assert!(set.contains(&v("21.7.0")));
    }

    #[test]
    fn prefix_matching() {
        assert!(v("18.2.1").starts_with(&v("18")));
        assert!(v("18.2.1").starts_with(&v("18.2")));
        assert!(!v("18.20.1").starts_with(&v("18.2")));
        assert!(!v("1.8.0").starts_with(&v("18")));
    }

    #[test]
    fn accessors_default_to_zero() {
        let version = v("7");
        assert_eq!(version.major(), 7);
        assert_eq!(version.minor(), 0);
        assert_eq!(version.patch(), 0);
    }

    #[test]
    fn display_joins_components() {
        assert_eq!(v("v13.5.0").to_string(), "13.5.0");
        assert_eq!(v("v21.7").to_string(), "21.7");
    }
}
