use std::path::{Path, PathBuf};

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::changelog::{ChangeEntry, ChangeLog};
use super::config::{RandType, ShuffleConfig};
use super::error::ShuffleError;
use super::planner::{PLAN_SIZE, PatchPlan, PatchPlanner};
use crate::flush::write_change_log;
use crate::host::RecordHost;
use crate::model::{EffectOccurrence, FormId, IngredientFlags};

/// Outcome of a finished run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub rand_type: RandType,
    pub seed: u64,
    pub patched: usize,
    pub log: ChangeLog,
    /// Where the change log was written, if an output directory was given.
    pub log_path: Option<PathBuf>,
}

/// One shuffling run against a host.
///
/// Phases run in order: [`Patcher::initialize`] builds the shared draw state,
/// [`Patcher::select_targets`] fixes the patch order, [`Patcher::patch_one`]
/// rewrites each target, and [`Patcher::finalize`] emits the change log.
#[derive(Debug)]
pub struct Patcher {
    config: ShuffleConfig,
    seed: u64,
    rng: SmallRng,
    planner: PatchPlanner,
    sources: Vec<FormId>,
    log: ChangeLog,
}

impl Patcher {
    /// Validate `config`, collect every eligible record's effects and build
    /// the pool (or group deck) shared by the whole run.
    pub fn initialize<H: RecordHost + ?Sized>(
        host: &H,
        config: ShuffleConfig,
    ) -> Result<Self, ShuffleError> {
        let rand_type = config.validate()?;
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = SmallRng::seed_from_u64(seed);

        let sources: Vec<FormId> = host
            .load_records()
            .into_iter()
            .filter(|&id| {
                host.winning_override(id)
                    .is_some_and(|r| !config.is_excluded(&r.source))
            })
            .collect();
        if sources.is_empty() {
            return Err(ShuffleError::DataUnavailable);
        }

        let groups: Vec<Vec<EffectOccurrence>> = sources
            .iter()
            .map(|&id| host.effect_group(id).map(|g| g.to_vec()).unwrap_or_default())
            .collect();
        let planner = PatchPlanner::new(rand_type, config.ignore_dist, groups, &mut rng);

        match (planner.pool(), planner.groups()) {
            (Some(pool), _) => info!(
                %rand_type,
                seed,
                records = sources.len(),
                effects = pool.len(),
                distinct = pool.distinct_remaining(),
                "built effect pool"
            ),
            (None, Some(groups)) => info!(
                %rand_type,
                seed,
                records = sources.len(),
                groups = groups.len(),
                "shuffled effect groups"
            ),
            (None, None) => {}
        }

        Ok(Self {
            config,
            seed,
            rng,
            planner,
            sources,
            log: ChangeLog::new(rand_type, seed),
        })
    }

    pub fn rand_type(&self) -> RandType {
        self.planner.rand_type()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &ShuffleConfig {
        &self.config
    }

    pub fn planner(&self) -> &PatchPlanner {
        &self.planner
    }

    pub fn log(&self) -> &ChangeLog {
        &self.log
    }

    /// Records to patch, in the randomized order they should be processed.
    pub fn select_targets(&mut self) -> Vec<FormId> {
        let mut targets = self.sources.clone();
        targets.shuffle(&mut self.rng);
        info!(targets = targets.len(), "selected patch targets");
        targets
    }

    /// Draw new effects for `id` and write them to the host.
    pub fn patch_one<H: RecordHost + ?Sized>(
        &mut self,
        host: &mut H,
        id: FormId,
    ) -> Result<(), ShuffleError> {
        let original = host
            .master_version(id)
            .ok_or(ShuffleError::UnknownRecord(id))?
            .effects
            .clone();

        let plan = self.planner.plan(id, &mut self.rng)?;
        match &plan {
            PatchPlan::Group(group) => host.set_effect_group(id, group.clone())?,
            PatchPlan::Effects(records) => {
                for (slot, record) in records.iter().enumerate() {
                    host.set_effect_entry(id, slot, record.to_occurrence())?;
                }
                host.truncate_effects(id, PLAN_SIZE)?;
            }
        }

        if self.config.set_flag_x {
            let mut flags = host
                .winning_override(id)
                .map(|r| r.flags)
                .unwrap_or_default();
            flags.insert(IngredientFlags::NO_AUTO_CALC);
            host.set_flags(id, flags)?;
        }

        let patched = plan.occurrences();
        debug!(
            record = %id,
            effects = ?patched.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(),
            "patched record"
        );
        self.log.push(ChangeEntry {
            record: id,
            display_id: host.display_id(id),
            original,
            patched,
        });
        Ok(())
    }

    /// Close the run. Writes the change log under `output_dir` when given.
    pub fn finalize(self, output_dir: Option<&Path>) -> Result<RunSummary, ShuffleError> {
        let log_path = match output_dir {
            Some(dir) => {
                let path = write_change_log(&self.log, dir, &self.config.output_file_name)?;
                info!(path = %path.display(), entries = self.log.len(), "wrote change log");
                Some(path)
            }
            None => None,
        };
        Ok(RunSummary {
            rand_type: self.log.rand_type,
            seed: self.seed,
            patched: self.log.len(),
            log: self.log,
            log_path,
        })
    }
}

/// Run every phase against `host`. Aborts on the first error; records
/// already written stay written.
pub fn run<H: RecordHost + ?Sized>(
    host: &mut H,
    config: ShuffleConfig,
    output_dir: Option<&Path>,
) -> Result<RunSummary, ShuffleError> {
    let mut patcher = Patcher::initialize(host, config)?;
    for id in patcher.select_targets() {
        patcher.patch_one(host, id)?;
    }
    patcher.finalize(output_dir)
}
