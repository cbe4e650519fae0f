use std::collections::VecDeque;

use indexmap::IndexMap;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use super::error::ShuffleError;
use crate::model::{EffectOccurrence, FormId, Magnitude};

/// Snapshot of one effect occurrence inside the pool.
///
/// Two records are duplicates iff they reference the same effect definition;
/// magnitude, area and duration do not matter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectRecord {
    pub effect_id: FormId,
    pub display_name: String,
    pub magnitude: Magnitude,
    pub area: u32,
    pub duration: u32,
}

impl EffectRecord {
    pub fn is_duplicate(&self, other: &EffectRecord) -> bool {
        self.effect_id == other.effect_id
    }

    /// Rebuild the host-side entry carrying this record's parameters.
    pub fn to_occurrence(&self) -> EffectOccurrence {
        EffectOccurrence::new(
            self.effect_id,
            self.display_name.clone(),
            self.magnitude,
            self.area,
            self.duration,
        )
    }
}

impl From<&EffectOccurrence> for EffectRecord {
    fn from(e: &EffectOccurrence) -> Self {
        Self {
            effect_id: e.effect_id,
            display_name: e.name.clone(),
            magnitude: e.magnitude,
            area: e.area,
            duration: e.duration,
        }
    }
}

/// Multiset of effect occurrences available for redistribution.
///
/// `entries` keeps duplicate multiplicity, so a uniform pick over it is
/// weighted by how common each effect is. `unique_counts` tracks the remaining
/// count per identity in first-seen order, which also fixes tie-breaking in
/// [`EffectPool::most_frequent`]. The unconsumed queue hands out each identity
/// once and is never refilled.
#[derive(Debug, Clone, Default)]
pub struct EffectPool {
    entries: Vec<EffectRecord>,
    unique_counts: IndexMap<FormId, usize>,
    unconsumed: VecDeque<FormId>,
}

impl EffectPool {
    /// Build a pool that keeps `records` in the given order.
    pub fn new(records: Vec<EffectRecord>) -> Self {
        let mut unique_counts: IndexMap<FormId, usize> = IndexMap::new();
        for record in &records {
            *unique_counts.entry(record.effect_id).or_insert(0) += 1;
        }
        let unconsumed = unique_counts.keys().copied().collect();
        Self {
            entries: records,
            unique_counts,
            unconsumed,
        }
    }

    /// Build a pool from raw occurrences, shuffled once into draw order.
    pub fn shuffled<'a>(
        occurrences: impl IntoIterator<Item = &'a EffectOccurrence>,
        rng: &mut dyn RngCore,
    ) -> Self {
        let mut records: Vec<EffectRecord> =
            occurrences.into_iter().map(EffectRecord::from).collect();
        records.shuffle(rng);
        Self::new(records)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[EffectRecord] {
        &self.entries
    }

    /// Remaining occurrences of `effect_id`.
    pub fn count(&self, effect_id: FormId) -> usize {
        self.unique_counts.get(&effect_id).copied().unwrap_or(0)
    }

    /// Sum of all per-identity counts. Always equals [`EffectPool::len`].
    pub fn total_count(&self) -> usize {
        self.unique_counts.values().sum()
    }

    /// Number of identities with at least one occurrence left.
    pub fn distinct_remaining(&self) -> usize {
        self.unique_counts.values().filter(|&&c| c > 0).count()
    }

    /// Identities not yet handed out by [`EffectPool::next_unconsumed_unique`].
    pub fn unconsumed_len(&self) -> usize {
        self.unconsumed.len()
    }

    /// First occurrence of `effect_id` in draw order.
    pub fn find(&self, effect_id: FormId) -> Option<(usize, &EffectRecord)> {
        self.entries
            .iter()
            .enumerate()
            .find(|(_, r)| r.effect_id == effect_id)
    }

    /// An occurrence of the identity with the highest remaining count.
    /// Ties go to the identity seen first at construction.
    pub fn most_frequent(&self) -> Result<(usize, &EffectRecord), ShuffleError> {
        let mut best: Option<(FormId, usize)> = None;
        for (&id, &count) in &self.unique_counts {
            if count > 0 && best.is_none_or(|(_, c)| count > c) {
                best = Some((id, count));
            }
        }
        best.and_then(|(id, _)| self.find(id))
            .ok_or(ShuffleError::PoolExhausted {
                operation: "most_frequent",
            })
    }

    /// Pop the next never-offered identity and resolve it against the
    /// current entries. `None` once every identity has been offered, or if
    /// the popped identity has since been removed from the pool.
    pub fn next_unconsumed_unique(&mut self) -> Option<(usize, &EffectRecord)> {
        let id = self.unconsumed.pop_front()?;
        self.find(id)
    }

    /// Uniform pick over occurrences, so common effects come up more often.
    pub fn random_weighted(
        &self,
        rng: &mut dyn RngCore,
    ) -> Result<(usize, &EffectRecord), ShuffleError> {
        if self.entries.is_empty() {
            return Err(ShuffleError::PoolExhausted {
                operation: "random_weighted",
            });
        }
        let index = rng.random_range(0..self.entries.len());
        Ok((index, &self.entries[index]))
    }

    /// Uniform pick over identities, then a uniform pick among that
    /// identity's occurrences. Every identity is equally likely no matter how
    /// many times it occurs.
    pub fn random_unweighted(
        &self,
        rng: &mut dyn RngCore,
    ) -> Result<(usize, &EffectRecord), ShuffleError> {
        let exhausted = ShuffleError::PoolExhausted {
            operation: "random_unweighted",
        };
        let available = self.distinct_remaining();
        if available == 0 {
            return Err(exhausted);
        }
        let pick = rng.random_range(0..available);
        let id = self
            .unique_counts
            .iter()
            .filter(|&(_, &c)| c > 0)
            .nth(pick)
            .map(|(&id, _)| id)
            .ok_or(exhausted)?;

        let matches: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, r)| r.effect_id == id)
            .map(|(i, _)| i)
            .collect();
        let index = matches[rng.random_range(0..matches.len())];
        Ok((index, &self.entries[index]))
    }

    /// Remove the occurrence at `index`, keeping the per-identity counts in
    /// step. Returns `None` if `index` is out of range.
    pub fn remove(&mut self, index: usize) -> Option<EffectRecord> {
        let id = self.entries.get(index)?.effect_id;
        if let Some(count) = self.unique_counts.get_mut(&id) {
            *count = count.saturating_sub(1);
        }
        Some(self.entries.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::testutil::{effect, pool_of};

    #[test]
    fn counts_match_entries_after_construction() {
        let pool = pool_of(&[(1, 3), (2, 1), (3, 2)]);
        assert_eq!(pool.len(), 6);
        assert_eq!(pool.total_count(), 6);
        assert_eq!(pool.count(FormId::new(1)), 3);
        assert_eq!(pool.distinct_remaining(), 3);
        assert_eq!(pool.unconsumed_len(), 3);
    }

    #[test]
    fn shuffled_pool_keeps_every_occurrence() {
        let raw: Vec<EffectOccurrence> = (0..20).map(|i| effect(i % 5).to_occurrence()).collect();
        let mut rng = SmallRng::seed_from_u64(7);
        let pool = EffectPool::shuffled(&raw, &mut rng);
        assert_eq!(pool.len(), 20);
        assert_eq!(pool.total_count(), 20);
        for id in 0..5 {
            assert_eq!(pool.count(FormId::new(id)), 4);
        }
    }

    #[test]
    fn is_duplicate_ignores_parameters() {
        let a = effect(1);
        let mut b = effect(1);
        b.magnitude = Magnitude::from(99.0);
        b.area = 40;
        assert!(a.is_duplicate(&b));
        assert!(!a.is_duplicate(&effect(2)));
    }

    #[test]
    fn find_returns_first_match() {
        let pool = EffectPool::new(vec![effect(1), effect(2), effect(2)]);
        assert_eq!(pool.find(FormId::new(2)).map(|(i, _)| i), Some(1));
        assert!(pool.find(FormId::new(9)).is_none());
    }

    #[test]
    fn remove_then_find_moves_or_disappears() {
        let mut pool = EffectPool::new(vec![effect(1), effect(2), effect(1)]);

        let removed = pool.remove(0).unwrap();
        assert_eq!(removed.effect_id, FormId::new(1));
        assert_eq!(pool.total_count(), pool.len());
        // Remaining duplicate now sits at a different index.
        assert_eq!(pool.find(FormId::new(1)).map(|(i, _)| i), Some(1));

        pool.remove(1).unwrap();
        assert_eq!(pool.total_count(), pool.len());
        assert!(pool.find(FormId::new(1)).is_none());
        assert_eq!(pool.count(FormId::new(1)), 0);
        assert_eq!(pool.distinct_remaining(), 1);
    }

    #[test]
    fn remove_out_of_range_is_none() {
        let mut pool = EffectPool::new(vec![effect(1)]);
        assert!(pool.remove(5).is_none());
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.total_count(), 1);
    }

    #[test]
    fn most_frequent_picks_highest_count() {
        let pool = EffectPool::new(vec![effect(2), effect(1), effect(3), effect(1), effect(1)]);
        let (index, record) = pool.most_frequent().unwrap();
        assert_eq!(record.effect_id, FormId::new(1));
        assert_eq!(index, 1);
    }

    #[test]
    fn most_frequent_ties_go_to_first_seen() {
        let pool = EffectPool::new(vec![effect(5), effect(4), effect(4), effect(5)]);
        let (_, record) = pool.most_frequent().unwrap();
        assert_eq!(record.effect_id, FormId::new(5));
    }

    #[test]
    fn most_frequent_skips_drained_identities() {
        let mut pool = EffectPool::new(vec![effect(1), effect(1), effect(2)]);
        pool.remove(0);
        pool.remove(0);
        let (_, record) = pool.most_frequent().unwrap();
        assert_eq!(record.effect_id, FormId::new(2));
    }

    #[test]
    fn empty_pool_retrieval_is_exhaustion() {
        let pool = EffectPool::default();
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(matches!(
            pool.most_frequent(),
            Err(ShuffleError::PoolExhausted { .. })
        ));
        assert!(pool.random_weighted(&mut rng).is_err());
        assert!(pool.random_unweighted(&mut rng).is_err());
    }

    #[test]
    fn unconsumed_queue_yields_each_identity_once() {
        let mut pool = pool_of(&[(1, 2), (2, 1), (3, 4), (4, 1)]);
        let mut seen = Vec::new();
        while let Some((_, record)) = pool.next_unconsumed_unique() {
            seen.push(record.effect_id);
        }
        assert_eq!(
            seen,
            vec![FormId::new(1), FormId::new(2), FormId::new(3), FormId::new(4)]
        );
        assert!(pool.next_unconsumed_unique().is_none());
        assert_eq!(pool.len(), 8);
    }

    #[test]
    fn unconsumed_identity_removed_from_entries_resolves_to_none() {
        let mut pool = EffectPool::new(vec![effect(1), effect(2)]);
        pool.remove(0);
        assert!(pool.next_unconsumed_unique().is_none());
        assert_eq!(pool.unconsumed_len(), 1);
        let (_, record) = pool.next_unconsumed_unique().unwrap();
        assert_eq!(record.effect_id, FormId::new(2));
    }

    #[test]
    fn random_draws_return_matching_index() {
        let pool = pool_of(&[(1, 3), (2, 2), (3, 1)]);
        let mut rng = SmallRng::seed_from_u64(99);
        for _ in 0..50 {
            let (i, r) = pool.random_weighted(&mut rng).unwrap();
            assert_eq!(&pool.entries()[i], r);
            let (j, u) = pool.random_unweighted(&mut rng).unwrap();
            assert_eq!(&pool.entries()[j], u);
        }
    }

    #[test]
    fn weighted_follows_multiplicity_unweighted_does_not() {
        let pool = pool_of(&[(1, 9), (2, 1)]);
        let mut rng = SmallRng::seed_from_u64(2024);
        let trials = 20_000;

        let weighted_a = (0..trials)
            .filter(|_| pool.random_weighted(&mut rng).unwrap().1.effect_id == FormId::new(1))
            .count() as f64
            / trials as f64;
        let unweighted_a = (0..trials)
            .filter(|_| pool.random_unweighted(&mut rng).unwrap().1.effect_id == FormId::new(1))
            .count() as f64
            / trials as f64;

        assert!((weighted_a - 0.9).abs() < 0.03, "weighted share {weighted_a}");
        assert!((unweighted_a - 0.5).abs() < 0.03, "unweighted share {unweighted_a}");
    }

    #[test]
    fn unweighted_never_returns_drained_identity() {
        let mut pool = pool_of(&[(1, 1), (2, 3)]);
        pool.remove(0);
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..100 {
            let (_, r) = pool.random_unweighted(&mut rng).unwrap();
            assert_eq!(r.effect_id, FormId::new(2));
        }
    }
}
