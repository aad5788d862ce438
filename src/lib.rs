// src/lib.rs

//! Differ
//!
//! Computes package-level deltas between releases of software images.
//!
//! # Architecture
//!
//! - `version`: tolerant version parsing and field-wise comparison
//! - `diff`: classification of two package sets into added, upgraded,
//!   downgraded and removed packages
//! - `release`: images, releases and the packages they carry
//! - `packages`: loaders for package inventories (JSON lists, dpkg output)

pub mod diff;
mod error;
pub mod packages;
pub mod release;
pub mod version;

pub use diff::{DiffOptions, DiffResult, PackageDiffEntry, PackageSet, diff, diff_with};
pub use error::{Error, Result};
pub use release::{Image, Package, Release, ReleaseDiff};
pub use version::{FieldOrdering, VersionComponents, compare_versions, compare_versions_with};
