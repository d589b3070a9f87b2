//! Per-level records
//!
//! Best collected-coin count for each level, persisted as JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StoreError, load_or_default, save_json};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRecords {
    /// Level number → best coins
    pub best_coins: BTreeMap<u32, u32>,
}

impl LevelRecords {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "pollo_loco_records";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn best(&self, level: u32) -> Option<u32> {
        self.best_coins.get(&level).copied()
    }

    /// Record a finished level. Returns true if this is a new best.
    pub fn submit(&mut self, level: u32, coins: u32) -> bool {
        match self.best(level) {
            Some(best) if best >= coins => false,
            _ => {
                self.best_coins.insert(level, coins);
                true
            }
        }
    }

    /// Highest level with a record
    pub fn furthest_level(&self) -> Option<u32> {
        self.best_coins.keys().next_back().copied()
    }

    pub fn load(store: &dyn KeyValueStore) -> Self {
        load_or_default(store, Self::STORAGE_KEY)
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        save_json(store, Self::STORAGE_KEY, self)?;
        log::info!("Records saved ({} levels)", self.best_coins.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_submit_keeps_best() {
        let mut records = LevelRecords::new();
        assert!(records.submit(1, 5), "first finish is always a best");
        assert!(!records.submit(1, 5), "ties are not improvements");
        assert!(!records.submit(1, 3));
        assert!(records.submit(1, 9));
        assert_eq!(records.best(1), Some(9));
        assert_eq!(records.best(2), None);
    }

    #[test]
    fn test_zero_coin_finish_is_recorded() {
        let mut records = LevelRecords::new();
        assert!(records.submit(3, 0));
        assert_eq!(records.furthest_level(), Some(3));
    }

    #[test]
    fn test_records_persist() {
        let mut store = MemoryStore::default();
        let mut records = LevelRecords::load(&store);
        records.submit(2, 11);
        records.save(&mut store).unwrap();
        assert_eq!(LevelRecords::load(&store).best(2), Some(11));
    }
}
