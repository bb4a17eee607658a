use crate::error::Result;
use crate::models::{Measurements, StationMap};
use crate::utils::constants::FINAL_MAP_CAPACITY;
use std::collections::hash_map::Entry;
use tracing::debug;

/// Folds partial station maps, in any order, into the final result
#[derive(Debug)]
pub struct MergeReducer {
    stations: StationMap,
    partials_merged: usize,
}

impl MergeReducer {
    pub fn new() -> Self {
        Self {
            stations: StationMap::with_capacity(FINAL_MAP_CAPACITY),
            partials_merged: 0,
        }
    }

    pub fn merge(&mut self, partial: StationMap) {
        for (name, stats) in partial {
            match self.stations.entry(name) {
                Entry::Occupied(mut existing) => existing.get_mut().merge(&stats),
                Entry::Vacant(slot) => {
                    slot.insert(stats);
                }
            }
        }
        self.partials_merged += 1;
    }

    /// Merge every partial, stopping at the first error
    pub fn reduce<I>(mut self, partials: I) -> Result<Measurements>
    where
        I: IntoIterator<Item = Result<StationMap>>,
    {
        for partial in partials {
            self.merge(partial?);
        }
        debug!("Merged {} partial results", self.partials_merged);
        Ok(self.finish())
    }

    pub fn partials_merged(&self) -> usize {
        self.partials_merged
    }

    pub fn finish(self) -> Measurements {
        Measurements::new(self.stations)
    }
}

impl Default for MergeReducer {
    fn default() -> Self {
        Self::new()
    }
}
