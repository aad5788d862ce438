// tests/integration_test.rs

//! Integration tests for differ
//!
//! These tests verify end-to-end functionality across modules.

use differ::packages::{PackageList, dpkg};
use differ::{DiffOptions, FieldOrdering, Image, Package, PackageDiffEntry, Release, diff};
use tempfile::NamedTempFile;

#[test]
fn test_diff_package_list_files() {
    let baseline = NamedTempFile::new().unwrap();
    let current = NamedTempFile::new().unwrap();

    std::fs::write(
        baseline.path(),
        r#"{"packages": [
            {"name": "libwinpr2-2t64", "version": "2.11.5+dfsg1-1"},
            {"name": "xdg-desktop-portal-gnome", "version": "44.2-4+b1"},
            {"name": "libdisplay-info1", "version": "0.1.1-2+b1"},
            {"name": "bash", "version": "5.2.15-2+b2"}
        ]}"#,
    )
    .unwrap();
    std::fs::write(
        current.path(),
        r#"{"packages": [
            {"name": "libei1", "version": "1.2.1-1"},
            {"name": "xdg-desktop-portal-gnome", "version": "46.2-1"},
            {"name": "libdisplay-info1", "version": "0.1.1-1"},
            {"name": "bash", "version": "5.2.15-2+b2"}
        ]}"#,
    )
    .unwrap();

    let baseline = PackageList::load(baseline.path()).unwrap().package_set();
    let current = PackageList::load(current.path()).unwrap().package_set();

    let result = diff(&current, &baseline);

    assert_eq!(result.added, vec![PackageDiffEntry::added("libei1", "1.2.1-1")]);
    assert_eq!(
        result.upgraded,
        vec![PackageDiffEntry::changed(
            "xdg-desktop-portal-gnome",
            "44.2-4+b1",
            "46.2-1"
        )]
    );
    assert_eq!(
        result.downgraded,
        vec![PackageDiffEntry::changed(
            "libdisplay-info1",
            "0.1.1-2+b1",
            "0.1.1-1"
        )]
    );
    assert_eq!(
        result.removed,
        vec![PackageDiffEntry::removed("libwinpr2-2t64", "2.11.5+dfsg1-1")]
    );
}

#[test]
fn test_dpkg_list_to_release_diff() {
    let old_listing = "\
||/ Name           Version      Architecture Description
+++-==============-============-============-==========================
ii  linux-image    6.9.1-1      amd64        Linux kernel
ii  vim            2:9.1.0-1    amd64        Vi IMproved
rc  old-tool       1.0          amd64        leftover config
";
    let new_listing = "\
||/ Name           Version      Architecture Description
+++-==============-============-============-==========================
ii  linux-image    6.10.2-1     amd64        Linux kernel
ii  vim            2:9.1.0-1    amd64        Vi IMproved
ii  htop           3.3.0-4      amd64        interactive processes viewer
";

    let old = Release::new(
        "sha256:aaa",
        chrono::Utc::now(),
        dpkg::parse_dpkg_list(old_listing),
    );
    let new = Release::new(
        "sha256:bbb",
        chrono::Utc::now(),
        dpkg::parse_dpkg_list(new_listing),
    );

    let mut image = Image::new("desktop", "ghcr.io/example/desktop");
    image.releases = vec![old, new];

    // Lexical field ordering puts "6.10" below "6.9"
    let lexical = image
        .diff_releases("sha256:aaa", "sha256:bbb", &DiffOptions::default())
        .unwrap();
    assert_eq!(lexical.diff.added, vec![PackageDiffEntry::added("htop", "3.3.0-4")]);
    assert_eq!(lexical.diff.downgraded.len(), 1);
    assert!(lexical.diff.upgraded.is_empty());
    assert!(lexical.diff.removed.is_empty());

    let numeric = image
        .diff_releases(
            "sha256:aaa",
            "sha256:bbb",
            &DiffOptions::with_ordering(FieldOrdering::Numeric),
        )
        .unwrap();
    assert_eq!(
        numeric.diff.upgraded,
        vec![PackageDiffEntry::changed("linux-image", "6.9.1-1", "6.10.2-1")]
    );
    assert!(numeric.diff.downgraded.is_empty());
}

#[test]
fn test_image_document_roundtrip() {
    let json = r#"{
        "name": "desktop",
        "url": "ghcr.io/example/desktop",
        "releases": [
            {"digest": "sha256:one", "date": "2024-05-01T12:00:00Z", "packages": [{"name": "a", "version": "1"}]},
            {"digest": "sha256:two", "date": "2024-06-01T12:00:00Z", "packages": [{"name": "a", "version": "2"}]}
        ]
    }"#;

    let image: Image = serde_json::from_str(json).unwrap();
    assert_eq!(image.latest_release().unwrap().digest, "sha256:two");

    let report = image
        .diff_releases("sha256:one", "sha256:two", &DiffOptions::default())
        .unwrap();
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["_old_digest"], "sha256:one");
    assert_eq!(value["upgraded"][0]["name"], "a");
    assert_eq!(value["upgraded"][0]["previous_version"], "1");
    assert_eq!(value["upgraded"][0]["new_version"], "2");
}

#[test]
fn test_diff_unknown_release() {
    let image = Image::new("desktop", "ghcr.io/example/desktop");
    let err = image
        .diff_releases("sha256:nope", "sha256:none", &DiffOptions::default())
        .unwrap_err();
    assert!(err.to_string().contains("sha256:nope"));
}

#[test]
fn test_dpkg_import_output_loads_as_package_list() {
    let packages = dpkg::parse_dpkg_list("ii  zsh  5.9-6  amd64  shell\n");
    let json = PackageList::new(packages).to_json_pretty().unwrap();

    let temp_file = NamedTempFile::new().unwrap();
    std::fs::write(temp_file.path(), json).unwrap();

    let loaded = PackageList::load(temp_file.path()).unwrap();
    assert_eq!(loaded.packages, vec![Package::new("zsh", "5.9-6")]);
}
