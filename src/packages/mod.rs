// src/packages/mod.rs

//! Package inventory loaders
//!
//! Turns the package listings collected from an image into [`Package`]
//! lists. Supported sources:
//! - Package-list JSON documents (`{"packages": [{"name", "version"}]}`)
//! - `dpkg -l` output and the dpkg status database (see [`dpkg`])

pub mod dpkg;

use crate::diff::PackageSet;
use crate::error::Result;
use crate::release::Package;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// A flat list of installed packages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageList {
    pub packages: Vec<Package>,
}

impl PackageList {
    pub fn new(packages: Vec<Package>) -> Self {
        Self { packages }
    }

    /// Parse a package-list JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a package-list JSON document from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let list = Self::from_json_str(&content)?;
        debug!("Loaded {} packages from {}", list.packages.len(), path.display());
        Ok(list)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn package_set(&self) -> PackageSet {
        self.packages.iter().collect()
    }
}
