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

//! The summary printed after a run.

use crate::reconcile::{Diagnostics, Reconciliation};
use crate::stats::CatalogStats;
use serde::Serialize;
use std::fmt::{self, Display, Formatter};

/// What a run did to the catalog, and the catalog statistics read
/// back from disk afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub reconciliation: Reconciliation,
    pub final_stats: CatalogStats,
}

fn write_diagnostics(f: &mut Formatter, title: &str, diagnostics: &Diagnostics) -> fmt::Result {
    if diagnostics.is_empty() {
        return Ok(());
    }
    writeln!(f)?;
    if diagnostics.is_truncated() {
        writeln!(
            f,
            "=== {title} (first {} of {}) ===",
            diagnostics.entries().len(),
            diagnostics.total()
        )?;
    } else {
        writeln!(f, "=== {title} ({}) ===", diagnostics.total())?;
    }
    for (idx, msgid) in diagnostics.entries().iter().enumerate() {
        writeln!(f, "  {}. {:?}", idx + 1, msgid)?;
    }
    Ok(())
}

impl Display for RunReport {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let result = &self.reconciliation;
        writeln!(f, "=== RECONCILIATION COMPLETE ===")?;
        writeln!(f, "Translated: {}", result.translated)?;
        writeln!(f, "Fuzzy fixed: {}", result.fuzzy_fixed)?;
        writeln!(f, "Custom entries added: {}", result.custom_added)?;
        writeln!(
            f,
            "Skipped (no translation): {}",
            result.still_untranslated.total()
        )?;
        writeln!(f, "Still fuzzy: {}", result.still_fuzzy.total())?;
        writeln!(f)?;
        writeln!(f, "=== FINAL STATS ===")?;
        writeln!(f, "{}", self.final_stats)?;
        write_diagnostics(f, "REMAINING UNTRANSLATED", &result.still_untranslated)?;
        write_diagnostics(f, "STILL FUZZY", &result.still_fuzzy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::LookupTable;
    use crate::reconcile::{reconcile, ReconcileOptions};
    use polib::catalog::Catalog;
    use polib::message::{Message, MessageMutView};
    use polib::metadata::CatalogMetadata;
    use pretty_assertions::assert_eq;

    fn create_report(messages: &[(&str, &str)], options: &ReconcileOptions) -> RunReport {
        let mut catalog = Catalog::new(CatalogMetadata::new());
        for (msgid, msgstr) in messages {
            let message = Message::build_singular()
                .with_msgid(String::from(*msgid))
                .with_msgstr(String::from(*msgstr))
                .done();
            catalog.append_or_update(message);
        }
        if let Some(mut message) = catalog.messages_mut().next() {
            message.flags_mut().add_flag("fuzzy");
        }
        let lookup = LookupTable::from_iter([("Cancel", "Отмена")]);
        let reconciliation = reconcile(&mut catalog, &lookup, &[], options).unwrap();
        RunReport {
            reconciliation,
            final_stats: CatalogStats::for_catalog(&catalog),
        }
    }

    #[test]
    fn test_text_report() {
        let report = create_report(
            &[("Submit", "Подать"), ("Cancel", ""), ("Frobnicate", "")],
            &ReconcileOptions::default(),
        );
        assert_eq!(
            report.to_string(),
            "=== RECONCILIATION COMPLETE ===\n\
             Translated: 1\n\
             Fuzzy fixed: 0\n\
             Custom entries added: 0\n\
             Skipped (no translation): 1\n\
             Still fuzzy: 1\n\
             \n\
             === FINAL STATS ===\n\
             Total entries: 3\n\
             Translated: 1\n\
             Fuzzy: 1\n\
             Untranslated: 1\n\
             \n\
             === REMAINING UNTRANSLATED (1) ===\n  \
             1. \"Frobnicate\"\n\
             \n\
             === STILL FUZZY (1) ===\n  \
             1. \"Submit\"\n"
        );
    }

    #[test]
    fn test_truncated_diagnostics_header() {
        let options = ReconcileOptions {
            diagnostics_limit: Some(1),
            ..ReconcileOptions::default()
        };
        let report = create_report(&[("Cancel", ""), ("Foo", ""), ("Bar", "")], &options);
        let text = report.to_string();
        assert!(text.contains("=== REMAINING UNTRANSLATED (first 1 of 2) ===\n  1. \"Foo\"\n"));
        assert!(!text.contains("Bar"));
        // The fuzzy "Cancel" was fixed, so there is no fuzzy section.
        assert!(!text.contains("STILL FUZZY"));
    }

    #[test]
    fn test_json_report() -> anyhow::Result<()> {
        let report = create_report(&[("Submit", "")], &ReconcileOptions::default());
        let json = serde_json::to_value(&report)?;
        assert_eq!(
            json,
            serde_json::json!({
                "reconciliation": {
                    "fuzzy_fixed": 0,
                    "translated": 0,
                    "custom_added": 0,
                    "still_fuzzy": {"entries": ["Submit"], "total": 1},
                    "still_untranslated": {"entries": [], "total": 0},
                },
                "final_stats": {
                    "translated_count": 0,
                    "fuzzy_translated_count": 0,
                    "fuzzy_non_translated_count": 1,
                    "non_translated_count": 0,
                },
            })
        );
        Ok(())
    }
}
