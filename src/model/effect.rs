use std::fmt;

use serde::{Deserialize, Serialize};

use super::form_id::FormId;
use super::magnitude::Magnitude;

/// One entry in a record's effect list, as the host stores it: a reference to
/// a shared effect definition plus instance-specific parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EffectOccurrence {
    pub effect_id: FormId,
    pub name: String,
    #[serde(default)]
    pub magnitude: Magnitude,
    #[serde(default)]
    pub area: u32,
    #[serde(default)]
    pub duration: u32,
}

impl EffectOccurrence {
    pub fn new(
        effect_id: FormId,
        name: impl Into<String>,
        magnitude: Magnitude,
        area: u32,
        duration: u32,
    ) -> Self {
        Self {
            effect_id,
            name: name.into(),
            magnitude,
            area,
            duration,
        }
    }
}

/// Log rendering: `name (M: magnitude, A: area, D: duration)`.
impl fmt::Display for EffectOccurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (M: {}, A: {}, D: {})",
            self.name, self.magnitude, self.area, self.duration
        )
    }
}
