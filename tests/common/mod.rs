#![allow(dead_code)]

use ingredient_shuffle::*;

pub fn occurrence(
    id: u32,
    name: &str,
    magnitude: f64,
    area: u32,
    duration: u32,
) -> EffectOccurrence {
    EffectOccurrence::new(FormId::new(id), name, Magnitude::from(magnitude), area, duration)
}

pub fn record(form_id: u32, source: &str, effects: Vec<EffectOccurrence>) -> IngredientRecord {
    IngredientRecord {
        form_id: FormId::new(form_id),
        editor_id: format!("Ingr{form_id:04X}"),
        name: String::new(),
        source: source.to_string(),
        flags: IngredientFlags::empty(),
        effects,
    }
}

/// `n` records that each carry effects `i..i + 4` (so `n + 3` identities),
/// with a per-record magnitude so occurrences are distinguishable.
pub fn staggered_host(n: u32) -> MemoryHost {
    MemoryHost::from_records((0..n).map(|i| {
        let effects = (i..i + 4)
            .map(|id| occurrence(0x100 + id, &format!("Effect{id}"), f64::from(i) + 0.5, i, 10 * i))
            .collect();
        record(0x2000 + i, "Skyrim.esm", effects)
    }))
}

/// `n` records that all carry the same four identities.
pub fn uniform_host(n: u32) -> MemoryHost {
    MemoryHost::from_records((0..n).map(|i| {
        let effects = (0..4)
            .map(|id| occurrence(0x100 + id, &format!("Effect{id}"), f64::from(i + 1), 0, i))
            .collect();
        record(0x3000 + i, "Skyrim.esm", effects)
    }))
}

pub fn config(rand_type: RandType, seed: u64) -> ShuffleConfig {
    ShuffleConfig {
        seed: Some(seed),
        ..ShuffleConfig::with_rand_type(rand_type)
    }
}

pub fn effect_ids(effects: &[EffectOccurrence]) -> Vec<FormId> {
    effects.iter().map(|e| e.effect_id).collect()
}

pub fn read_lines(path: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}
