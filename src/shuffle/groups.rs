use rand::RngCore;
use rand::seq::SliceRandom;

use super::error::ShuffleError;
use crate::model::EffectOccurrence;

/// Deals whole effect lists, shuffled once, one per target record.
#[derive(Debug, Clone, Default)]
pub struct GroupShuffler {
    groups: Vec<Vec<EffectOccurrence>>,
    cursor: usize,
}

impl GroupShuffler {
    /// Keep `groups` in the given order.
    pub fn new(groups: Vec<Vec<EffectOccurrence>>) -> Self {
        Self { groups, cursor: 0 }
    }

    pub fn shuffled(mut groups: Vec<Vec<EffectOccurrence>>, rng: &mut dyn RngCore) -> Self {
        groups.shuffle(rng);
        Self::new(groups)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups not yet dealt.
    pub fn remaining(&self) -> usize {
        self.groups.len() - self.cursor
    }

    /// Hand out the next group. Each group is dealt at most once.
    pub fn next_group(&mut self) -> Result<Vec<EffectOccurrence>, ShuffleError> {
        let group = self
            .groups
            .get(self.cursor)
            .cloned()
            .ok_or(ShuffleError::GroupsExhausted {
                requested: self.cursor + 1,
                available: self.groups.len(),
            })?;
        self.cursor += 1;
        Ok(group)
    }
}
