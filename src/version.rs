// src/version.rs

//! Version string parsing and comparison
//!
//! Package ecosystems encode versions in many shapes (`2:1.0-1`,
//! `44.2-4+b1`, `1.0~rc1`, `2.11.5+dfsg1-1`). Rather than rejecting anything
//! that is not strict semver, versions are decomposed into a fixed tuple of
//! optional fields and compared field by field. Strings that do not fit the
//! grammar degrade to a single `major` field holding the whole string.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:(?P<epoch>\d+):)?",
        r"(?P<major>[0-9A-Za-z]+)",
        r"(?:\.(?P<minor>[0-9A-Za-z]+))?",
        r"(?:\.(?P<patch>[0-9A-Za-z]+))?",
        r"(?:[-~](?P<prerelease>[0-9A-Za-z.+~-]+?))?",
        r"(?:[+.](?P<buildmetadata>[0-9A-Za-z.+~-]+))?$",
    ))
    .expect("version grammar is a valid regex")
});

/// How two values of the same field are ordered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldOrdering {
    /// Byte-wise string ordering (`"9"` sorts after `"10"`)
    #[default]
    Lexical,

    /// All-digit values compare by numeric value, anything else lexically
    Numeric,
}

impl FieldOrdering {
    fn compare(self, a: &str, b: &str) -> Ordering {
        match self {
            FieldOrdering::Lexical => a.cmp(b),
            FieldOrdering::Numeric => {
                if is_digits(a) && is_digits(b) {
                    compare_digits(a, b)
                } else {
                    a.cmp(b)
                }
            }
        }
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Compare two digit strings by value without parsing them into integers,
/// so arbitrarily long components cannot overflow.
fn compare_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Parsed decomposition of a version string
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionComponents {
    pub epoch: Option<String>,
    pub major: String,
    pub minor: Option<String>,
    pub patch: Option<String>,
    pub prerelease: Option<String>,
    pub buildmetadata: Option<String>,
}

impl VersionComponents {
    /// Parse a version string. Never fails: input the grammar does not
    /// recognise is kept whole as `major`.
    pub fn parse(version: &str) -> Self {
        let Some(caps) = VERSION_RE.captures(version) else {
            return Self {
                major: version.to_string(),
                ..Self::default()
            };
        };

        let field = |name: &str| caps.name(name).map(|m| m.as_str().to_string());

        Self {
            epoch: field("epoch"),
            major: field("major").unwrap_or_default(),
            minor: field("minor"),
            patch: field("patch"),
            prerelease: field("prerelease"),
            buildmetadata: field("buildmetadata"),
        }
    }

    /// Whether the string matched no structure and was kept whole
    pub fn is_opaque(&self) -> bool {
        self.epoch.is_none()
            && self.minor.is_none()
            && self.patch.is_none()
            && self.prerelease.is_none()
            && self.buildmetadata.is_none()
            && !VERSION_RE.is_match(&self.major)
    }

    /// Compare against another version using the given field ordering.
    ///
    /// Fields are visited in precedence order and the first difference wins.
    /// A field present on one side only makes that side newer, except for
    /// `prerelease` where presence makes it older.
    pub fn compare_with(&self, other: &Self, ordering: FieldOrdering) -> Ordering {
        let fields = [
            (self.epoch.as_deref(), other.epoch.as_deref(), false),
            (Some(self.major.as_str()), Some(other.major.as_str()), false),
            (self.minor.as_deref(), other.minor.as_deref(), false),
            (self.patch.as_deref(), other.patch.as_deref(), false),
            (self.prerelease.as_deref(), other.prerelease.as_deref(), true),
            (self.buildmetadata.as_deref(), other.buildmetadata.as_deref(), false),
        ];

        for (a, b, is_prerelease) in fields {
            let result = match (a, b) {
                (None, None) => Ordering::Equal,
                (Some(_), None) if is_prerelease => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (None, Some(_)) if is_prerelease => Ordering::Greater,
                (None, Some(_)) => Ordering::Less,
                (Some(a), Some(b)) => ordering.compare(a, b),
            };

            if result != Ordering::Equal {
                return result;
            }
        }

        Ordering::Equal
    }
}

impl Ord for VersionComponents {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare_with(other, FieldOrdering::Lexical)
    }
}

impl PartialOrd for VersionComponents {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for VersionComponents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(epoch) = &self.epoch {
            write!(f, "{}:", epoch)?;
        }
        write!(f, "{}", self.major)?;
        if let Some(minor) = &self.minor {
            write!(f, ".{}", minor)?;
        }
        if let Some(patch) = &self.patch {
            write!(f, ".{}", patch)?;
        }
        if let Some(prerelease) = &self.prerelease {
            write!(f, "-{}", prerelease)?;
        }
        if let Some(build) = &self.buildmetadata {
            write!(f, "+{}", build)?;
        }
        Ok(())
    }
}

/// Parse a version string (see [`VersionComponents::parse`])
pub fn parse(version: &str) -> VersionComponents {
    VersionComponents::parse(version)
}

/// Compare two version strings with lexical field ordering
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    compare_versions_with(a, b, FieldOrdering::Lexical)
}

/// Compare two version strings with the given field ordering
pub fn compare_versions_with(a: &str, b: &str, ordering: FieldOrdering) -> Ordering {
    VersionComponents::parse(a).compare_with(&VersionComponents::parse(b), ordering)
}
