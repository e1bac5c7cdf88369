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

//! Aggregate message counts for a catalog.

use polib::catalog::Catalog;
use serde::Serialize;
use std::fmt::{self, Display, Formatter};

/// Counts of translation message statuses.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct CatalogStats {
    pub translated_count: u32,
    pub fuzzy_translated_count: u32,
    pub fuzzy_non_translated_count: u32,
    pub non_translated_count: u32,
}

impl CatalogStats {
    /// Returns the total number of messages.
    pub fn total(&self) -> u32 {
        self.translated_count
            + self.fuzzy_translated_count
            + self.fuzzy_non_translated_count
            + self.non_translated_count
    }

    /// Returns the number of messages flagged as fuzzy, translated or not.
    pub fn fuzzy(&self) -> u32 {
        self.fuzzy_translated_count + self.fuzzy_non_translated_count
    }

    /// Returns counts of message statuses in the given catalog.
    ///
    /// A fuzzy message is never counted as translated, even when it
    /// carries a translation.
    pub fn for_catalog(catalog: &Catalog) -> Self {
        let mut stats = Self::default();
        for message in catalog.messages() {
            if message.is_translated() {
                if message.is_fuzzy() {
                    stats.fuzzy_translated_count += 1;
                } else {
                    stats.translated_count += 1;
                }
            } else if message.is_fuzzy() {
                stats.fuzzy_non_translated_count += 1;
            } else {
                stats.non_translated_count += 1;
            }
        }
        stats
    }
}

impl Display for CatalogStats {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(f, "Total entries: {}", self.total())?;
        writeln!(f, "Translated: {}", self.translated_count)?;
        writeln!(f, "Fuzzy: {}", self.fuzzy())?;
        write!(f, "Untranslated: {}", self.non_translated_count)
    }
}
