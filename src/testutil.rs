//! Fixture builders shared by unit tests.

use crate::host::MemoryHost;
use crate::model::{FormId, IngredientFlags, IngredientRecord, Magnitude};
use crate::shuffle::{EffectPool, EffectRecord};

/// An effect record with identity `id` and default parameters.
pub fn effect(id: u32) -> EffectRecord {
    EffectRecord {
        effect_id: FormId::new(id),
        display_name: format!("Effect{id}"),
        magnitude: Magnitude::from(1.0),
        area: 0,
        duration: 0,
    }
}

/// Pool with `count` occurrences of each `(id, count)`, grouped in the order given.
pub fn pool_of(counts: &[(u32, usize)]) -> EffectPool {
    let records = counts
        .iter()
        .flat_map(|&(id, count)| std::iter::repeat_n(effect(id), count))
        .collect();
    EffectPool::new(records)
}

/// A record version whose effects reference `effect_ids`, in order.
pub fn ingredient(form_id: u32, source: &str, effect_ids: &[u32]) -> IngredientRecord {
    IngredientRecord {
        form_id: FormId::new(form_id),
        editor_id: format!("Ingredient{form_id:X}"),
        name: String::new(),
        source: source.to_string(),
        flags: IngredientFlags::empty(),
        effects: effect_ids.iter().map(|&id| effect(id).to_occurrence()).collect(),
    }
}

/// `n` master records from `Skyrim.esm`, ids `0x1000..`, record `i` carrying
/// effects `i..i + 4`. Gives `n + 3` distinct identities.
pub fn sample_host(n: u32) -> MemoryHost {
    MemoryHost::from_records((0..n).map(|i| {
        let ids: Vec<u32> = (i..i + 4).collect();
        ingredient(0x1000 + i, "Skyrim.esm", &ids)
    }))
}
