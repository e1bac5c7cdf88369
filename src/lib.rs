// Copyright 2024 The InfraSignal Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Helpers for filling a Gettext PO catalog from a lookup table.
//!
//! A run loads a catalog, fixes the fuzzy messages and translates
//! the untranslated messages which the lookup table knows about,
//! appends a set of custom messages, and writes the catalog back.
//! The catalog is then parsed again so that the final statistics
//! reflect what actually ended up on disk.
//!
//! The core logic lives in [`reconcile::reconcile`], which works on
//! an in-memory [`Catalog`] and does no I/O. [`run`] wraps it with
//! loading and saving.

pub mod lookup;
pub mod reconcile;
pub mod report;
pub mod stats;

use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use log::{info, warn};
use polib::catalog::Catalog;
use polib::po_file;

pub use lookup::LookupTable;
pub use reconcile::{reconcile, ReconcileOptions, Reconciliation};
pub use report::RunReport;
pub use stats::CatalogStats;

/// Gettext's format for the `PO-Revision-Date` header.
const REVISION_DATE_FORMAT: &str = "%Y-%m-%d %H:%M%z";

/// Header fields which `polib` expects in every catalog.
const REQUIRED_HEADER_FIELDS: [&str; 9] = [
    "Project-Id-Version",
    "POT-Creation-Date",
    "PO-Revision-Date",
    "Language-Team",
    "MIME-Version",
    "Content-Type",
    "Content-Transfer-Encoding",
    "Language",
    "Plural-Forms",
];

/// Returns the field names of the header entry (`msgid ""`) in `po`,
/// or `None` if the catalog has no header.
fn header_fields(po: &str) -> Option<Vec<String>> {
    let mut lines = po
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'));
    if lines.next()? != "msgid \"\"" {
        return None;
    }
    let first = lines.next()?.strip_prefix("msgstr ")?;
    let mut header = String::new();
    for line in std::iter::once(first).chain(lines.take_while(|line| line.starts_with('"'))) {
        let line = line.strip_prefix('"').unwrap_or(line);
        header.push_str(line.strip_suffix('"').unwrap_or(line));
    }
    Some(
        header
            .split("\\n")
            .filter_map(|field| field.split_once(':'))
            .map(|(name, _)| String::from(name.trim()))
            .collect(),
    )
}

/// Parse the catalog at `path`.
///
/// The header is checked first: `polib` panics on a header with
/// missing fields instead of returning an error.
pub fn load_catalog(path: &Path) -> anyhow::Result<Catalog> {
    let po =
        fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))?;
    let Some(fields) = header_fields(&po) else {
        bail!("Could not parse {}: missing header", path.display());
    };
    let missing = REQUIRED_HEADER_FIELDS
        .iter()
        .filter(|name| !fields.iter().any(|field| field.as_str() == **name))
        .copied()
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        bail!(
            "Could not parse {}: header is missing {}",
            path.display(),
            missing.join(", ")
        );
    }
    let obsolete = po.lines().filter(|line| line.starts_with("#~")).count();
    if obsolete > 0 {
        warn!(
            "{} has {obsolete} obsolete (#~) lines, they will be dropped when writing",
            path.display()
        );
    }
    po_file::parse(path).with_context(|| format!("Could not parse {}", path.display()))
}

/// Write `catalog` to `path`, replacing the file.
pub fn save_catalog(catalog: &Catalog, path: &Path) -> anyhow::Result<()> {
    po_file::write(catalog, path)
        .with_context(|| format!("Could not write catalog to {}", path.display()))
}

/// Reconcile the catalog at `path` and write it back in place.
///
/// The file is written exactly once, even if nothing changed. The
/// `PO-Revision-Date` header is only bumped when some message was
/// translated or added.
pub fn run(
    path: &Path,
    lookup: &LookupTable,
    custom_entries: &[String],
    options: &ReconcileOptions,
) -> anyhow::Result<RunReport> {
    info!("Reading {}", path.display());
    let mut catalog = load_catalog(path)?;
    info!(
        "Read {} messages, {} known translations",
        catalog.count(),
        lookup.len()
    );

    let reconciliation = reconcile(&mut catalog, lookup, custom_entries, options)?;
    if reconciliation.changed() > 0 {
        catalog.metadata.po_revision_date = chrono::Local::now()
            .format(REVISION_DATE_FORMAT)
            .to_string();
    }
    let expected_stats = CatalogStats::for_catalog(&catalog);

    info!("Writing {}", path.display());
    save_catalog(&catalog, path)?;

    let final_stats = CatalogStats::for_catalog(&load_catalog(path)?);
    if final_stats != expected_stats {
        warn!(
            "Statistics of {} changed after writing: expected {:?}, found {:?}",
            path.display(),
            expected_stats,
            final_stats
        );
    }

    Ok(RunReport {
        reconciliation,
        final_stats,
    })
}
