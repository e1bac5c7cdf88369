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

//! Lookup tables mapping source text to translations.
//!
//! Tables are plain JSON: an object from `msgid` to `msgstr` for
//! translations, and an array of `msgid`s for custom entries. The
//! Russian tables are compiled into the binary.

use anyhow::Context;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const RUSSIAN_TRANSLATIONS: &str = include_str!("../data/ru/translations.json");
const RUSSIAN_FUZZY_OVERRIDES: &str = include_str!("../data/ru/fuzzy.json");
const RUSSIAN_CUSTOM_ENTRIES: &str = include_str!("../data/ru/custom.json");

/// An immutable mapping from `msgid` to a single translation.
///
/// The optional fuzzy overrides are consulted before the main
/// mapping, but only when fixing fuzzy messages.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LookupTable {
    translations: BTreeMap<String, String>,
    fuzzy_overrides: BTreeMap<String, String>,
}

impl LookupTable {
    pub fn new(translations: BTreeMap<String, String>) -> Self {
        Self {
            translations,
            fuzzy_overrides: BTreeMap::new(),
        }
    }

    /// Adds a mapping which takes precedence while fixing fuzzy messages.
    pub fn with_fuzzy_overrides(mut self, fuzzy_overrides: BTreeMap<String, String>) -> Self {
        self.fuzzy_overrides = fuzzy_overrides;
        self
    }

    /// Reads a table from a JSON object of `msgid` to `msgstr`.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        Ok(Self::new(read_translations(path)?))
    }

    /// The built-in Russian translations, including fuzzy overrides.
    pub fn russian() -> anyhow::Result<Self> {
        let translations = serde_json::from_str(RUSSIAN_TRANSLATIONS)
            .context("Could not parse built-in Russian translations")?;
        let fuzzy_overrides = serde_json::from_str(RUSSIAN_FUZZY_OVERRIDES)
            .context("Could not parse built-in Russian fuzzy overrides")?;
        Ok(Self::new(translations).with_fuzzy_overrides(fuzzy_overrides))
    }

    /// Returns the translation for `msgid`.
    ///
    /// Empty translations are treated as missing: they would leave the
    /// message untranslated.
    pub fn get(&self, msgid: &str) -> Option<&str> {
        non_empty(self.translations.get(msgid))
    }

    /// Returns the translation to use when fixing a fuzzy `msgid`.
    pub fn get_for_fuzzy(&self, msgid: &str) -> Option<&str> {
        non_empty(self.fuzzy_overrides.get(msgid)).or_else(|| self.get(msgid))
    }

    /// Number of entries in the main mapping.
    pub fn len(&self) -> usize {
        self.translations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.translations.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LookupTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(msgid, msgstr)| (msgid.into(), msgstr.into()))
                .collect(),
        )
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|value| !value.is_empty())
}

/// Reads a JSON object of `msgid` to `msgstr` from `path`.
pub fn read_translations(path: &Path) -> anyhow::Result<BTreeMap<String, String>> {
    let json =
        fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Could not parse {}", path.display()))
}

/// Reads a JSON array of custom `msgid`s from `path`.
pub fn load_custom_entries(path: &Path) -> anyhow::Result<Vec<String>> {
    let json =
        fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Could not parse {}", path.display()))
}

/// The built-in custom entries which accompany [`LookupTable::russian`].
pub fn russian_custom_entries() -> anyhow::Result<Vec<String>> {
    serde_json::from_str(RUSSIAN_CUSTOM_ENTRIES)
        .context("Could not parse built-in Russian custom entries")
}
