//! Effect redistribution engine.

pub mod changelog;
pub mod config;
pub mod error;
pub mod groups;
pub mod planner;
pub mod pool;
pub mod session;

pub use changelog::{ChangeEntry, ChangeLog};
pub use config::{RandType, ShuffleConfig};
pub use error::ShuffleError;
pub use groups::GroupShuffler;
pub use planner::{MAX_DRAW_ATTEMPTS, PLAN_SIZE, PatchPlan, PatchPlanner};
pub use pool::{EffectPool, EffectRecord};
pub use session::{Patcher, RunSummary, run};
