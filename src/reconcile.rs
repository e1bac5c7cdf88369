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

//! Reconcile a catalog with a lookup table.
//!
//! Every message is classified once, up front, as fuzzy,
//! untranslated or translated. Three passes then run in order:
//!
//! 1. fuzzy messages with a known translation get it and lose the
//!    `fuzzy` flag,
//! 2. untranslated messages with a known translation get it,
//! 3. custom messages missing from the catalog are appended.
//!
//! Because the classification happens before the first pass, a
//! message fixed by the fuzzy pass is never seen again by the
//! translate pass. Messages without a known translation are left
//! alone and recorded in the diagnostics of the [`Reconciliation`].

use std::collections::HashSet;

use crate::lookup::LookupTable;
use anyhow::ensure;
use log::{debug, warn};
use polib::catalog::Catalog;
use polib::message::{Message, MessageMutView, MessageView};
use serde::Serialize;

/// Number of plural forms in Russian (`nplurals=3`).
pub const DEFAULT_PLURAL_FORMS: usize = 3;

/// Number of diagnostic lines kept per list unless configured otherwise.
pub const DEFAULT_DIAGNOSTICS_LIMIT: usize = 30;

/// Diagnostic lines hold at most this many characters of the `msgid`.
const DIAGNOSTIC_WIDTH: usize = 80;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Number of `msgstr[n]` forms written for plural messages.
    pub plural_forms: usize,
    /// Maximum number of lines kept in each diagnostic list, `None`
    /// keeps everything.
    pub diagnostics_limit: Option<usize>,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            plural_forms: DEFAULT_PLURAL_FORMS,
            diagnostics_limit: Some(DEFAULT_DIAGNOSTICS_LIMIT),
        }
    }
}

/// A bounded list of messages which could not be translated.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    entries: Vec<String>,
    total: usize,
    #[serde(skip)]
    limit: Option<usize>,
}

impl Diagnostics {
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            entries: Vec::new(),
            total: 0,
            limit,
        }
    }

    fn record(&mut self, msgid: &str) {
        self.total += 1;
        if self.limit.map_or(true, |limit| self.entries.len() < limit) {
            self.entries.push(msgid.chars().take(DIAGNOSTIC_WIDTH).collect());
        }
    }

    /// The recorded `msgid`s, truncated to 80 characters.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Number of messages recorded, including those beyond the limit.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Returns true if some recorded messages were dropped.
    pub fn is_truncated(&self) -> bool {
        self.entries.len() < self.total
    }
}

/// The outcome of [`reconcile`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub fuzzy_fixed: u32,
    pub translated: u32,
    pub custom_added: u32,
    /// Fuzzy messages without a translation, still flagged.
    pub still_fuzzy: Diagnostics,
    /// Untranslated messages without a translation.
    pub still_untranslated: Diagnostics,
}

impl Reconciliation {
    fn new(options: &ReconcileOptions) -> Self {
        Self {
            still_fuzzy: Diagnostics::with_limit(options.diagnostics_limit),
            still_untranslated: Diagnostics::with_limit(options.diagnostics_limit),
            ..Self::default()
        }
    }

    /// Number of messages changed or added.
    pub fn changed(&self) -> u32 {
        self.fuzzy_fixed + self.translated + self.custom_added
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Status {
    Fuzzy,
    Untranslated,
    Translated,
}

fn classify(message: &dyn MessageView) -> Status {
    if message.is_fuzzy() {
        Status::Fuzzy
    } else if message.is_translated() {
        Status::Translated
    } else {
        Status::Untranslated
    }
}

/// Store `msgstr` as the translation of `message`.
///
/// Plural messages get `plural_forms` copies of `msgstr`: the lookup
/// table has a single translation per `msgid`.
fn set_translation<M>(message: &mut M, msgstr: &str, plural_forms: usize) -> anyhow::Result<()>
where
    M: MessageView + MessageMutView,
{
    if message.is_plural() {
        *message.msgstr_plural_mut()? = vec![String::from(msgstr); plural_forms];
    } else {
        message.set_msgstr(String::from(msgstr))?;
    }
    Ok(())
}

/// Fix fuzzy and untranslated messages in `catalog` and append the
/// `custom_entries` missing from it.
///
/// Only messages with a translation in `lookup` are touched. The
/// catalog is modified in place; writing it back is up to the caller.
pub fn reconcile(
    catalog: &mut Catalog,
    lookup: &LookupTable,
    custom_entries: &[String],
    options: &ReconcileOptions,
) -> anyhow::Result<Reconciliation> {
    ensure!(
        options.plural_forms > 0,
        "Plural messages need at least one plural form"
    );
    let nplurals = catalog.metadata.plural_rules.nplurals;
    if nplurals != options.plural_forms && catalog.messages().any(|msg| msg.is_plural()) {
        warn!(
            "Catalog declares nplurals={nplurals}, filling {} plural forms",
            options.plural_forms
        );
    }

    let statuses = catalog
        .messages()
        .map(|message| classify(message))
        .collect::<Vec<_>>();
    let mut result = Reconciliation::new(options);

    for (mut message, status) in catalog.messages_mut().zip(&statuses) {
        if *status != Status::Fuzzy {
            continue;
        }
        match lookup.get_for_fuzzy(message.msgid()) {
            Some(msgstr) => {
                debug!("Fixing fuzzy message {:?}", message.msgid());
                set_translation(&mut message, msgstr, options.plural_forms)?;
                message.flags_mut().remove_flag("fuzzy");
                result.fuzzy_fixed += 1;
            }
            None => result.still_fuzzy.record(message.msgid()),
        }
    }

    for (mut message, status) in catalog.messages_mut().zip(&statuses) {
        if *status != Status::Untranslated {
            continue;
        }
        match lookup.get(message.msgid()) {
            Some(msgstr) => {
                debug!("Translating {:?}", message.msgid());
                set_translation(&mut message, msgstr, options.plural_forms)?;
                result.translated += 1;
            }
            None => result.still_untranslated.record(message.msgid()),
        }
    }

    let mut existing = catalog
        .messages()
        .map(|message| String::from(message.msgid()))
        .collect::<HashSet<_>>();
    for msgid in custom_entries {
        if existing.contains(msgid) {
            debug!("Custom message {msgid:?} is already in the catalog");
            continue;
        }
        let Some(msgstr) = lookup.get(msgid) else {
            debug!("No translation for custom message {msgid:?}");
            continue;
        };
        let message = Message::build_singular()
            .with_msgid(msgid.clone())
            .with_msgstr(String::from(msgstr))
            .done();
        catalog.append_or_update(message);
        existing.insert(msgid.clone());
        result.custom_added += 1;
    }

    Ok(result)
}
