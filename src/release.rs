// src/release.rs

//! Images and their releases
//!
//! An image is a named artifact (e.g. an OS image) with a history of
//! releases. Each release is identified by its content digest and carries
//! the list of packages installed in that snapshot. These are plain values;
//! storing and loading them is left to the caller.

use crate::diff::{self, DiffOptions, DiffResult, PackageSet};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A package installed in a release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    pub version: String,
}

impl Package {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// One content-addressed snapshot of an image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub digest: String,

    /// Release date, defaults to the time of deserialization when missing
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,

    #[serde(default)]
    pub packages: Vec<Package>,
}

impl Release {
    pub fn new(digest: impl Into<String>, date: DateTime<Utc>, packages: Vec<Package>) -> Self {
        Self {
            digest: digest.into(),
            date,
            packages,
        }
    }

    /// Name → version mapping of this release's packages
    pub fn package_set(&self) -> PackageSet {
        self.packages.iter().collect()
    }

    /// Diff this release (current) against `baseline`
    pub fn diff_packages(&self, baseline: &Release) -> DiffResult {
        self.diff_packages_with(baseline, &DiffOptions::default())
    }

    pub fn diff_packages_with(&self, baseline: &Release, options: &DiffOptions) -> DiffResult {
        diff::diff_with(&self.package_set(), &baseline.package_set(), options)
    }
}

/// A named image and its release history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub releases: Vec<Release>,
}

impl Image {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            releases: Vec::new(),
        }
    }

    /// Most recent release by date. When dates tie, the entry listed last wins.
    pub fn latest_release(&self) -> Option<&Release> {
        self.releases.iter().max_by_key(|r| r.date)
    }

    /// Find a release by digest
    pub fn release_by_digest(&self, digest: &str) -> Result<&Release> {
        self.releases
            .iter()
            .find(|r| r.digest == digest)
            .ok_or_else(|| Error::ReleaseNotFound(digest.to_string()))
    }

    /// Diff the release `new_digest` against the release `old_digest`
    pub fn diff_releases(
        &self,
        old_digest: &str,
        new_digest: &str,
        options: &DiffOptions,
    ) -> Result<ReleaseDiff> {
        let old = self.release_by_digest(old_digest)?;
        let new = self.release_by_digest(new_digest)?;

        debug!(
            "Diffing releases of {}: {} -> {}",
            self.name, old_digest, new_digest
        );

        Ok(ReleaseDiff {
            old_digest: old_digest.to_string(),
            new_digest: new_digest.to_string(),
            diff: new.diff_packages_with(old, options),
        })
    }
}

/// Diff between two releases, tagged with the digests it was computed from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseDiff {
    #[serde(rename = "_old_digest")]
    pub old_digest: String,

    #[serde(rename = "_new_digest")]
    pub new_digest: String,

    #[serde(flatten)]
    pub diff: DiffResult,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap()
    }

    fn sample_image() -> Image {
        let mut image = Image::new("vanilla-desktop", "ghcr.io/example/desktop");
        image.releases.push(Release::new(
            "sha256:old",
            date(1),
            vec![
                Package::new("pkg2", "1.0"),
                Package::new("pkg3", "1.0"),
                Package::new("pkg4", "2.0"),
                Package::new("pkg5", "1.0"),
            ],
        ));
        image.releases.push(Release::new(
            "sha256:new",
            date(3),
            vec![
                Package::new("pkg1", "1.0"),
                Package::new("pkg3", "2.0"),
                Package::new("pkg4", "1.0"),
                Package::new("pkg5", "1.0"),
            ],
        ));
        image
    }

    #[test]
    fn test_release_diff_packages() {
        let image = sample_image();
        let old = image.release_by_digest("sha256:old").unwrap();
        let new = image.release_by_digest("sha256:new").unwrap();

        let result = new.diff_packages(old);
        assert_eq!(result.added.len(), 1);
        assert_eq!(result.added[0].name, "pkg1");
        assert_eq!(result.upgraded[0].previous_version.as_deref(), Some("1.0"));
        assert_eq!(result.upgraded[0].new_version.as_deref(), Some("2.0"));
        assert_eq!(result.downgraded[0].name, "pkg4");
        assert_eq!(result.removed[0].name, "pkg2");
    }

    #[test]
    fn test_latest_release() {
        let mut image = sample_image();
        assert_eq!(image.latest_release().unwrap().digest, "sha256:new");

        image.releases.push(Release::new("sha256:middle", date(2), Vec::new()));
        assert_eq!(image.latest_release().unwrap().digest, "sha256:new");

        assert!(Image::new("empty", "none").latest_release().is_none());
    }

    #[test]
    fn test_release_not_found() {
        let image = sample_image();
        let err = image.release_by_digest("sha256:missing").unwrap_err();
        assert!(matches!(err, Error::ReleaseNotFound(ref d) if d == "sha256:missing"));
    }

    #[test]
    fn test_diff_releases_envelope() {
        let image = sample_image();
        let report = image
            .diff_releases("sha256:old", "sha256:new", &DiffOptions::default())
            .unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["_old_digest"], "sha256:old");
        assert_eq!(json["_new_digest"], "sha256:new");
        assert_eq!(json["added"][0]["name"], "pkg1");
        assert_eq!(json["removed"][0]["previous_version"], "1.0");
    }

    #[test]
    fn test_release_date_defaults_when_missing() {
        let before = Utc::now();
        let release: Release =
            serde_json::from_str(r#"{"digest":"sha256:abc","packages":[]}"#).unwrap();
        assert!(release.date >= before);
        assert!(release.packages.is_empty());
    }
}
