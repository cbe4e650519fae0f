use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::ShuffleError;

/// Sampling policy used to redistribute effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum RandType {
    /// Deal whole effect lists between records.
    Groups,
    /// Draw without replacement, most common effect first.
    Distribution,
    /// Every distinct effect leads some record before any repeats.
    Inclusion,
    /// Independent draws for all four slots.
    NoInclusion,
}

impl RandType {
    pub const ALL: [RandType; 4] = [
        RandType::Groups,
        RandType::Distribution,
        RandType::Inclusion,
        RandType::NoInclusion,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RandType::Groups => "groups",
            RandType::Distribution => "distribution",
            RandType::Inclusion => "inclusion",
            RandType::NoInclusion => "noInclusion",
        }
    }
}

impl fmt::Display for RandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<RandType> for String {
    fn from(t: RandType) -> Self {
        t.as_str().into()
    }
}

impl TryFrom<String> for RandType {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_str() {
            "groups" => Ok(RandType::Groups),
            "distribution" => Ok(RandType::Distribution),
            "inclusion" => Ok(RandType::Inclusion),
            "noInclusion" => Ok(RandType::NoInclusion),
            "" => Err("randomization type cannot be empty".into()),
            _ => {
                let expected: Vec<&str> = RandType::ALL.iter().map(|t| t.as_str()).collect();
                Err(format!(
                    "unknown randomization type {s:?} (expected one of {})",
                    expected.join(", ")
                ))
            }
        }
    }
}

/// Settings supplied by the host. Field names match the host's settings keys.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ShuffleConfig {
    /// Raw policy name; checked by [`ShuffleConfig::validate`].
    pub rand_type: Option<String>,
    /// Draw identities uniformly instead of by occurrence count.
    pub ignore_dist: bool,
    /// Mark patched records [`NO_AUTO_CALC`](crate::model::IngredientFlags::NO_AUTO_CALC).
    #[serde(rename = "setFlagX")]
    pub set_flag_x: bool,
    /// Show the change log to the user once written.
    pub log_visible: bool,
    pub output_file_name: String,
    /// Source files whose records are left alone.
    pub excluded_sources: Vec<String>,
    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for ShuffleConfig {
    fn default() -> Self {
        Self {
            rand_type: None,
            ignore_dist: false,
            set_flag_x: false,
            log_visible: false,
            output_file_name: "IngredientShuffle.log".to_string(),
            excluded_sources: Vec::new(),
            seed: None,
        }
    }
}

impl ShuffleConfig {
    pub fn with_rand_type(rand_type: RandType) -> Self {
        Self {
            rand_type: Some(rand_type.into()),
            ..Self::default()
        }
    }

    /// Read settings from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, ShuffleError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Resolve the selected policy. Fails if it is missing or unrecognized.
    pub fn validate(&self) -> Result<RandType, ShuffleError> {
        let raw = self
            .rand_type
            .clone()
            .ok_or_else(|| ShuffleError::Configuration("no randomization type selected".into()))?;
        let rand_type = RandType::try_from(raw).map_err(ShuffleError::Configuration)?;
        if self.output_file_name.trim().is_empty() {
            return Err(ShuffleError::Configuration(
                "output file name cannot be empty".into(),
            ));
        }
        Ok(rand_type)
    }

    /// Whether records from `source` are excluded. Comparison ignores case.
    pub fn is_excluded(&self, source: &str) -> bool {
        self.excluded_sources
            .iter()
            .any(|s| s.eq_ignore_ascii_case(source))
    }
}
