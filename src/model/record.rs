use serde::{Deserialize, Serialize};

use super::effect::EffectOccurrence;
use super::form_id::FormId;

/// Record header flags. Only the bits the shuffler touches are named; any
/// other bits are carried through untouched.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngredientFlags(u32);

impl IngredientFlags {
    /// Keep the stored effect magnitudes instead of recomputing them.
    pub const NO_AUTO_CALC: IngredientFlags = IngredientFlags(0x0000_0001);
    pub const FOOD_ITEM: IngredientFlags = IngredientFlags(0x0000_0002);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, other: IngredientFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: IngredientFlags) {
        self.0 |= other.0;
    }
}

/// One version of an ingredient record as supplied by a single source file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IngredientRecord {
    pub form_id: FormId,
    #[serde(default)]
    pub editor_id: String,
    #[serde(default)]
    pub name: String,
    /// File this version of the record comes from.
    pub source: String,
    #[serde(default)]
    pub flags: IngredientFlags,
    #[serde(default)]
    pub effects: Vec<EffectOccurrence>,
}

impl IngredientRecord {
    /// Log identifier, e.g. `Wheat "Wheat" [INGR:0004B0BA]`.
    pub fn display_id(&self) -> String {
        let editor = if self.editor_id.is_empty() {
            "<unnamed>"
        } else {
            self.editor_id.as_str()
        };
        if self.name.is_empty() {
            format!("{editor} [INGR:{}]", self.form_id)
        } else {
            format!("{editor} \"{}\" [INGR:{}]", self.name, self.form_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_insert_and_contains() {
        let mut flags = IngredientFlags::FOOD_ITEM;
        assert!(!flags.contains(IngredientFlags::NO_AUTO_CALC));
        flags.insert(IngredientFlags::NO_AUTO_CALC);
        assert!(flags.contains(IngredientFlags::NO_AUTO_CALC));
        assert!(flags.contains(IngredientFlags::FOOD_ITEM));
        assert_eq!(flags.bits(), 0x3);
    }

    #[test]
    fn display_id_includes_name_when_present() {
        let rec = IngredientRecord {
            form_id: FormId::new(0x4B0BA),
            editor_id: "Wheat".into(),
            name: "Wheat".into(),
            source: "Skyrim.esm".into(),
            flags: IngredientFlags::empty(),
            effects: vec![],
        };
        assert_eq!(rec.display_id(), "Wheat \"Wheat\" [INGR:0004B0BA]");

        let bare = IngredientRecord {
            editor_id: String::new(),
            name: String::new(),
            ..rec
        };
        assert_eq!(bare.display_id(), "<unnamed> [INGR:0004B0BA]");
    }

    #[test]
    fn deserializes_with_defaults() {
        let json = r#"{"formId": 1, "source": "Test.esp"}"#;
        let rec: IngredientRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.form_id, FormId::new(1));
        assert!(rec.effects.is_empty());
        assert_eq!(rec.flags, IngredientFlags::empty());
    }
}
