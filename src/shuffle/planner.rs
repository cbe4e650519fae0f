use rand::RngCore;
use tracing::{trace, warn};

use super::config::RandType;
use super::error::ShuffleError;
use super::groups::GroupShuffler;
use super::pool::{EffectPool, EffectRecord};
use crate::model::{EffectOccurrence, FormId};

/// Effects written to every non-group target.
pub const PLAN_SIZE: usize = 4;

/// Duplicate redraws allowed per slot before giving up on a record.
pub const MAX_DRAW_ATTEMPTS: usize = 10_000;

/// New effects chosen for one target record.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchPlan {
    /// Exactly [`PLAN_SIZE`] records with pairwise distinct effect identities.
    Effects(Vec<EffectRecord>),
    /// A whole effect list taken from another record.
    Group(Vec<EffectOccurrence>),
}

impl PatchPlan {
    /// The host-side effect list this plan writes.
    pub fn occurrences(&self) -> Vec<EffectOccurrence> {
        match self {
            PatchPlan::Effects(records) => {
                records.iter().map(EffectRecord::to_occurrence).collect()
            }
            PatchPlan::Group(group) => group.clone(),
        }
    }
}

#[derive(Debug, Clone)]
enum EffectSource {
    Pool(EffectPool),
    Groups(GroupShuffler),
}

/// Draws effects for target records one at a time from state shared across
/// the whole run.
#[derive(Debug, Clone)]
pub struct PatchPlanner {
    rand_type: RandType,
    ignore_dist: bool,
    source: EffectSource,
    warned_fallback: bool,
}

impl PatchPlanner {
    /// Build the shared draw state from every source record's effect list.
    /// Group mode shuffles the lists themselves; the other modes flatten them
    /// into one shuffled pool.
    pub fn new(
        rand_type: RandType,
        ignore_dist: bool,
        effect_groups: Vec<Vec<EffectOccurrence>>,
        rng: &mut dyn RngCore,
    ) -> Self {
        let source = match rand_type {
            RandType::Groups => EffectSource::Groups(GroupShuffler::shuffled(effect_groups, rng)),
            _ => EffectSource::Pool(EffectPool::shuffled(effect_groups.iter().flatten(), rng)),
        };
        Self {
            rand_type,
            ignore_dist,
            source,
            warned_fallback: false,
        }
    }

    /// Use an already built pool. Group mode deals whole lists and is
    /// rejected here; use [`PatchPlanner::with_groups`] for it.
    pub fn with_pool(
        rand_type: RandType,
        ignore_dist: bool,
        pool: EffectPool,
    ) -> Result<Self, ShuffleError> {
        if rand_type == RandType::Groups {
            return Err(ShuffleError::Configuration(
                "group mode draws from a GroupShuffler, not an effect pool".into(),
            ));
        }
        Ok(Self {
            rand_type,
            ignore_dist,
            source: EffectSource::Pool(pool),
            warned_fallback: false,
        })
    }

    pub fn with_groups(groups: GroupShuffler) -> Self {
        Self {
            rand_type: RandType::Groups,
            ignore_dist: false,
            source: EffectSource::Groups(groups),
            warned_fallback: false,
        }
    }

    pub fn rand_type(&self) -> RandType {
        self.rand_type
    }

    pub fn pool(&self) -> Option<&EffectPool> {
        match &self.source {
            EffectSource::Pool(pool) => Some(pool),
            EffectSource::Groups(_) => None,
        }
    }

    pub fn groups(&self) -> Option<&GroupShuffler> {
        match &self.source {
            EffectSource::Groups(groups) => Some(groups),
            EffectSource::Pool(_) => None,
        }
    }

    /// Choose new effects for `target`.
    pub fn plan(
        &mut self,
        target: FormId,
        rng: &mut dyn RngCore,
    ) -> Result<PatchPlan, ShuffleError> {
        if let EffectSource::Groups(groups) = &mut self.source {
            return groups.next_group().map(PatchPlan::Group);
        }

        let mut chosen: Vec<EffectRecord> = Vec::with_capacity(PLAN_SIZE);
        let mut attempts = 0;
        while chosen.len() < PLAN_SIZE {
            self.ensure_enough_left(target, &chosen, attempts)?;

            let (index, record) = self.draw(chosen.len(), rng)?;
            if chosen.iter().any(|c| c.is_duplicate(&record)) {
                attempts += 1;
                trace!(%target, effect = %record.effect_id, attempts, "duplicate draw, retrying");
                if attempts >= MAX_DRAW_ATTEMPTS {
                    return Err(ShuffleError::PoolInsufficient {
                        record: target,
                        attempts,
                    });
                }
                continue;
            }

            if self.rand_type == RandType::Distribution {
                if let EffectSource::Pool(pool) = &mut self.source {
                    pool.remove(index);
                }
            }
            chosen.push(record);
            attempts = 0;
        }
        Ok(PatchPlan::Effects(chosen))
    }

    /// Fail fast when the pool cannot supply enough identities that are not
    /// already in `chosen`.
    fn ensure_enough_left(
        &self,
        target: FormId,
        chosen: &[EffectRecord],
        attempts: usize,
    ) -> Result<(), ShuffleError> {
        let EffectSource::Pool(pool) = &self.source else {
            return Ok(());
        };
        let already = chosen
            .iter()
            .filter(|c| pool.count(c.effect_id) > 0)
            .count();
        let available = pool.distinct_remaining() - already;
        if available < PLAN_SIZE - chosen.len() {
            return Err(ShuffleError::PoolInsufficient {
                record: target,
                attempts,
            });
        }
        Ok(())
    }

    /// One policy-appropriate draw for `slot`. Returns the pool index and a
    /// copy of the drawn record.
    fn draw(
        &mut self,
        slot: usize,
        rng: &mut dyn RngCore,
    ) -> Result<(usize, EffectRecord), ShuffleError> {
        let EffectSource::Pool(pool) = &mut self.source else {
            unreachable!("group mode never draws single effects");
        };

        let drawn = match (self.rand_type, slot) {
            (RandType::Distribution, 0) => pool.most_frequent()?,
            (RandType::Distribution, _) => pool.random_weighted(rng)?,
            (RandType::Inclusion, 0) => {
                // Cloned out so the pool can be borrowed again for the fallback.
                let next = pool
                    .next_unconsumed_unique()
                    .map(|(i, r)| (i, r.clone()));
                match next {
                    Some(found) => return Ok(found),
                    None => {
                        if !self.warned_fallback {
                            self.warned_fallback = true;
                            warn!(
                                ignore_dist = self.ignore_dist,
                                "every effect has led a record once, falling back to random draws"
                            );
                        }
                        free_draw(pool, self.ignore_dist, rng)?
                    }
                }
            }
            (RandType::Inclusion | RandType::NoInclusion, _) => {
                free_draw(pool, self.ignore_dist, rng)?
            }
            (RandType::Groups, _) => unreachable!("group mode never draws single effects"),
        };
        Ok((drawn.0, drawn.1.clone()))
    }
}

fn free_draw<'p>(
    pool: &'p EffectPool,
    ignore_dist: bool,
    rng: &mut dyn RngCore,
) -> Result<(usize, &'p EffectRecord), ShuffleError> {
    if ignore_dist {
        pool.random_unweighted(rng)
    } else {
        pool.random_weighted(rng)
    }
}
