pub mod flush;
pub mod host;
pub mod model;
pub mod shuffle;

#[cfg(test)]
pub(crate) mod testutil;

pub use host::{MemoryHost, RecordHost};
pub use model::{EffectOccurrence, FormId, IngredientFlags, IngredientRecord, Magnitude};
pub use shuffle::{
    ChangeLog, EffectPool, EffectRecord, GroupShuffler, PatchPlanner, Patcher, RandType,
    RunSummary, ShuffleConfig, ShuffleError, run,
};
