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

//! Fill a PO catalog from a lookup table.
//!
//! This program fixes the fuzzy messages and translates the
//! untranslated messages of a PO file, using a JSON table mapping
//! `msgid` to `msgstr`. Custom messages which are missing from the
//! catalog are appended. The file is rewritten in place and a summary
//! is printed on stdout.
//!
//! Without `--translations`, the built-in Russian tables are used.

use std::path::PathBuf;

use clap::builder::RangedU64ValueParser;
use clap::{Parser, ValueEnum};
use log::info;
use po_reconcile::lookup::{load_custom_entries, read_translations, russian_custom_entries};
use po_reconcile::reconcile::{DEFAULT_DIAGNOSTICS_LIMIT, DEFAULT_PLURAL_FORMS};
use po_reconcile::{run, LookupTable, ReconcileOptions};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum Format {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug, Parser)]
#[command(version, about)]
struct Args {
    /// The PO file to update in place.
    #[arg(id = "catalog.po")]
    catalog: PathBuf,
    /// JSON object mapping msgid to msgstr.
    #[arg(long, value_name = "FILE")]
    translations: Option<PathBuf>,
    /// JSON object consulted before the translations when fixing fuzzy messages.
    #[arg(long, value_name = "FILE")]
    fuzzy_overrides: Option<PathBuf>,
    /// JSON array of msgids to append when missing from the catalog.
    #[arg(long, value_name = "FILE")]
    custom_entries: Option<PathBuf>,
    /// Number of plural forms to fill for plural messages.
    #[arg(
        long,
        value_name = "N",
        default_value_t = DEFAULT_PLURAL_FORMS,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..),
    )]
    plural_forms: usize,
    /// Number of skipped messages to list per section.
    #[arg(long, value_name = "N", default_value_t = DEFAULT_DIAGNOSTICS_LIMIT)]
    show_skipped: usize,
    /// List every skipped message.
    #[arg(long, conflicts_with = "show_skipped")]
    all_skipped: bool,
    /// Format of the summary.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

impl Args {
    fn options(&self) -> ReconcileOptions {
        ReconcileOptions {
            plural_forms: self.plural_forms,
            diagnostics_limit: (!self.all_skipped).then_some(self.show_skipped),
        }
    }

    /// Load the lookup table and custom entries.
    ///
    /// The built-in custom entries only make sense together with the
    /// built-in translations.
    fn tables(&self) -> anyhow::Result<(LookupTable, Vec<String>)> {
        let mut lookup = match &self.translations {
            Some(path) => LookupTable::from_json_file(path)?,
            None => LookupTable::russian()?,
        };
        if let Some(path) = &self.fuzzy_overrides {
            lookup = lookup.with_fuzzy_overrides(read_translations(path)?);
        }
        let custom_entries = match (&self.custom_entries, &self.translations) {
            (Some(path), _) => load_custom_entries(path)?,
            (None, None) => russian_custom_entries()?,
            (None, Some(_)) => Vec::new(),
        };
        Ok((lookup, custom_entries))
    }
}

#[allow(clippy::print_stdout)]
fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().filter_or("RUST_LOG", "info"));
    let args = Args::parse();

    let (lookup, custom_entries) = args.tables()?;
    info!(
        "Using {} translations and {} custom entries",
        lookup.len(),
        custom_entries.len()
    );
    let report = run(&args.catalog, &lookup, &custom_entries, &args.options())?;

    match args.format {
        Format::Text => print!("{report}"),
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::ffi::OsString;

    #[test]
    fn test_verify_args() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() -> anyhow::Result<()> {
        let args = Args::try_parse_from(["po-reconcile", "ru.po"])?;
        assert_eq!(args.catalog, PathBuf::from("ru.po"));
        assert_eq!(args.format, Format::Text);
        assert_eq!(args.options(), ReconcileOptions::default());

        let (lookup, custom_entries) = args.tables()?;
        assert_eq!(lookup, LookupTable::russian()?);
        assert_eq!(custom_entries, russian_custom_entries()?);
        Ok(())
    }

    #[test]
    fn test_all_skipped() -> anyhow::Result<()> {
        let args = Args::try_parse_from(["po-reconcile", "--all-skipped", "ru.po"])?;
        assert_eq!(args.options().diagnostics_limit, None);
        assert!(
            Args::try_parse_from(["po-reconcile", "--all-skipped", "--show-skipped=5", "ru.po"])
                .is_err()
        );
        Ok(())
    }

    #[test]
    fn test_plural_forms_must_be_positive() -> anyhow::Result<()> {
        assert!(Args::try_parse_from(["po-reconcile", "--plural-forms=0", "ru.po"]).is_err());
        let args = Args::try_parse_from(["po-reconcile", "--plural-forms=1", "ru.po"])?;
        assert_eq!(args.options().plural_forms, 1);
        Ok(())
    }

    #[test]
    fn test_custom_translations_have_no_custom_entries() -> anyhow::Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let translations = tmpdir.path().join("de.json");
        std::fs::write(&translations, r#"{"Cancel": "Abbrechen"}"#)?;
        let args = Args::try_parse_from([
            OsString::from("po-reconcile"),
            OsString::from("--translations"),
            translations.into_os_string(),
            OsString::from("--plural-forms=2"),
            OsString::from("de.po"),
        ])?;
        let (lookup, custom_entries) = args.tables()?;
        assert_eq!(lookup.get("Cancel"), Some("Abbrechen"));
        assert!(custom_entries.is_empty());
        assert_eq!(args.options().plural_forms, 2);
        Ok(())
    }
}
