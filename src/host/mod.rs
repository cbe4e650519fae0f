//! Boundary between the shuffler and whatever owns the record database.

pub mod memory;

pub use memory::{MemoryHost, RecordDocument};

use crate::model::{EffectOccurrence, FormId, IngredientFlags, IngredientRecord};
use crate::shuffle::ShuffleError;

/// Record storage the shuffler reads from and patches into.
///
/// Records are addressed by [`FormId`]; how versions are located and
/// resolved is up to the implementation.
pub trait RecordHost {
    /// Every ingredient record known to the host, in ascending id order.
    fn load_records(&self) -> Vec<FormId>;

    /// The version of `id` that currently wins, including any patch.
    fn winning_override(&self, id: FormId) -> Option<&IngredientRecord>;

    /// The version of `id` from the file that first defined it.
    fn master_version(&self, id: FormId) -> Option<&IngredientRecord>;

    fn effect_group(&self, id: FormId) -> Option<&[EffectOccurrence]> {
        self.winning_override(id).map(|r| r.effects.as_slice())
    }

    /// Replace the whole effect list of `id`.
    fn set_effect_group(
        &mut self,
        id: FormId,
        group: Vec<EffectOccurrence>,
    ) -> Result<(), ShuffleError>;

    /// Overwrite one effect entry. `slot == len` appends.
    fn set_effect_entry(
        &mut self,
        id: FormId,
        slot: usize,
        occurrence: EffectOccurrence,
    ) -> Result<(), ShuffleError>;

    /// Drop effect entries from `len` onwards.
    fn truncate_effects(&mut self, id: FormId, len: usize) -> Result<(), ShuffleError>;

    fn set_flags(&mut self, id: FormId, flags: IngredientFlags) -> Result<(), ShuffleError>;

    /// Identifier used when rendering `id` in the change log.
    fn display_id(&self, id: FormId) -> String {
        self.winning_override(id)
            .map(IngredientRecord::display_id)
            .unwrap_or_else(|| format!("[INGR:{id}]"))
    }
}
