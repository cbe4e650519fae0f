use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::RecordHost;
use crate::model::{EffectOccurrence, FormId, IngredientFlags, IngredientRecord};
use crate::shuffle::ShuffleError;

/// On-disk shape of a record set: every version of every record, in load
/// order. The first version of an id is its master, the last one wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecordDocument {
    pub records: Vec<IngredientRecord>,
}

/// In-memory record database.
///
/// Writes go to a patch version of the record, created on first write from
/// the current winner and appended so that it becomes the new winner.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    versions: BTreeMap<FormId, Vec<IngredientRecord>>,
    patch_source: String,
    patched: BTreeSet<FormId>,
}

impl MemoryHost {
    pub const DEFAULT_PATCH_SOURCE: &'static str = "IngredientShuffle.esp";

    pub fn new() -> Self {
        Self {
            versions: BTreeMap::new(),
            patch_source: Self::DEFAULT_PATCH_SOURCE.to_string(),
            patched: BTreeSet::new(),
        }
    }

    pub fn from_records(records: impl IntoIterator<Item = IngredientRecord>) -> Self {
        let mut host = Self::new();
        for record in records {
            host.add_record(record);
        }
        host
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ShuffleError> {
        let text = std::fs::read_to_string(path)?;
        let doc: RecordDocument = serde_json::from_str(&text)?;
        Ok(Self::from_records(doc.records))
    }

    /// Name of the source file patch versions are attributed to.
    pub fn with_patch_source(mut self, source: impl Into<String>) -> Self {
        self.patch_source = source.into();
        self
    }

    pub fn patch_source(&self) -> &str {
        &self.patch_source
    }

    /// Append `record` as the newest version of its id.
    pub fn add_record(&mut self, record: IngredientRecord) {
        self.versions.entry(record.form_id).or_default().push(record);
    }

    /// Records written to during this session, in ascending id order.
    pub fn patched_records(&self) -> impl Iterator<Item = &IngredientRecord> {
        self.patched
            .iter()
            .filter_map(|id| self.winning_override(*id))
    }

    pub fn is_patched(&self, id: FormId) -> bool {
        self.patched.contains(&id)
    }

    /// Every version, patches included, as a document.
    pub fn to_document(&self) -> RecordDocument {
        RecordDocument {
            records: self.versions.values().flatten().cloned().collect(),
        }
    }

    fn patch_version_mut(&mut self, id: FormId) -> Result<&mut IngredientRecord, ShuffleError> {
        let versions = self
            .versions
            .get_mut(&id)
            .filter(|v| !v.is_empty())
            .ok_or(ShuffleError::UnknownRecord(id))?;

        if !self.patched.contains(&id) {
            let mut patch = versions[versions.len() - 1].clone();
            patch.source = self.patch_source.clone();
            versions.push(patch);
            self.patched.insert(id);
        }
        versions.last_mut().ok_or(ShuffleError::UnknownRecord(id))
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordHost for MemoryHost {
    fn load_records(&self) -> Vec<FormId> {
        self.versions
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(id, _)| *id)
            .collect()
    }

    fn winning_override(&self, id: FormId) -> Option<&IngredientRecord> {
        self.versions.get(&id).and_then(|v| v.last())
    }

    fn master_version(&self, id: FormId) -> Option<&IngredientRecord> {
        self.versions.get(&id).and_then(|v| v.first())
    }

    fn set_effect_group(
        &mut self,
        id: FormId,
        group: Vec<EffectOccurrence>,
    ) -> Result<(), ShuffleError> {
        self.patch_version_mut(id)?.effects = group;
        Ok(())
    }

    fn set_effect_entry(
        &mut self,
        id: FormId,
        slot: usize,
        occurrence: EffectOccurrence,
    ) -> Result<(), ShuffleError> {
        let record = self.patch_version_mut(id)?;
        let len = record.effects.len();
        match slot.cmp(&len) {
            std::cmp::Ordering::Less => record.effects[slot] = occurrence,
            std::cmp::Ordering::Equal => record.effects.push(occurrence),
            std::cmp::Ordering::Greater => {
                return Err(ShuffleError::InvalidSlot {
                    record: id,
                    slot,
                    len,
                });
            }
        }
        Ok(())
    }

    fn truncate_effects(&mut self, id: FormId, len: usize) -> Result<(), ShuffleError> {
        self.patch_version_mut(id)?.effects.truncate(len);
        Ok(())
    }

    fn set_flags(&mut self, id: FormId, flags: IngredientFlags) -> Result<(), ShuffleError> {
        self.patch_version_mut(id)?.flags = flags;
        Ok(())
    }
}
