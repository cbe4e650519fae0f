use serde::Serialize;

use super::config::RandType;
use crate::model::{EffectOccurrence, FormId};

/// Before and after effects of one patched record.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChangeEntry {
    pub record: FormId,
    pub display_id: String,
    pub original: Vec<EffectOccurrence>,
    pub patched: Vec<EffectOccurrence>,
}

/// Append-only audit trail of a run.
///
/// Entries are collected in patch order, which is random, and rendered in
/// ascending record id order.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChangeLog {
    pub rand_type: RandType,
    pub seed: u64,
    entries: Vec<ChangeEntry>,
}

impl ChangeLog {
    pub fn new(rand_type: RandType, seed: u64) -> Self {
        Self {
            rand_type,
            seed,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: ChangeEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending record id order.
    pub fn sorted_entries(&self) -> Vec<&ChangeEntry> {
        let mut sorted: Vec<&ChangeEntry> = self.entries.iter().collect();
        sorted.sort_by_key(|e| e.record);
        sorted
    }

    /// Plain-text rendering, one line per effect.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!(
                "Ingredient shuffle (mode: {}, seed: {})",
                self.rand_type, self.seed
            ),
            format!("Patched {} records", self.entries.len()),
        ];
        for entry in self.sorted_entries() {
            lines.push(String::new());
            lines.push(entry.display_id.clone());
            lines.push("  Original effects:".to_string());
            lines.extend(entry.original.iter().map(|e| format!("    {e}")));
            lines.push("  New effects:".to_string());
            lines.extend(entry.patched.iter().map(|e| format!("    {e}")));
        }
        lines
    }

    pub fn render(&self) -> String {
        self.lines().join("\n")
    }
}
