// src/packages/dpkg.rs

//! dpkg inventory parsers
//!
//! Two sources describe the packages installed on a Debian-based image:
//! - the tabular output of `dpkg -l`, where installed rows start with `ii`
//! - the status database (`/var/lib/dpkg/status`), a sequence of RFC 822
//!   stanzas with `Package`, `Status` and `Version` fields

use crate::error::{Error, Result};
use crate::release::Package;
use serde::Deserialize;
use tracing::debug;

/// Parse `dpkg -l` output, keeping only fully installed (`ii`) rows
pub fn parse_dpkg_list(output: &str) -> Vec<Package> {
    let mut packages = Vec::new();

    for line in output.lines() {
        let mut columns = line.split_whitespace();
        if columns.next() != Some("ii") {
            continue;
        }

        match (columns.next(), columns.next()) {
            (Some(name), Some(version)) => packages.push(Package::new(name, version)),
            _ => debug!("Skipping truncated dpkg row: {}", line),
        }
    }

    debug!("Parsed {} installed packages from dpkg -l output", packages.len());
    packages
}

/// Status database stanza
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StatusEntry {
    package: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    version: Option<String>,
}

impl StatusEntry {
    /// `Status` is "<want> <flag> <state>"; only the `installed` state counts
    fn is_installed(&self) -> bool {
        self.status
            .as_deref()
            .and_then(|s| s.split_whitespace().next_back())
            == Some("installed")
    }
}

/// Parse the dpkg status database into the list of installed packages
pub fn parse_status_file(content: &str) -> Result<Vec<Package>> {
    let entries: Vec<StatusEntry> = rfc822_like::from_str(content)
        .map_err(|e| Error::ParseError(format!("Failed to parse dpkg status file: {}", e)))?;

    debug!("Parsed {} status entries", entries.len());

    let packages = entries
        .into_iter()
        .filter(StatusEntry::is_installed)
        .filter_map(|entry| {
            let version = entry.version?;
            Some(Package::new(entry.package, version))
        })
        .collect::<Vec<_>>();

    debug!("Found {} installed packages in status file", packages.len());
    Ok(packages)
}
