//! Bricks caught in a live bomb's blast radius

use serde::{Deserialize, Serialize};

use super::entity::BrickId;

/// Bricks currently overlapping the bomb's blast sensor, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BombBlastHitSet {
    bricks: Vec<BrickId>,
}

impl BombBlastHitSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert if absent; returns whether it was added
    pub fn insert(&mut self, id: BrickId) -> bool {
        if self.bricks.contains(&id) {
            return false;
        }
        self.bricks.push(id);
        true
    }

    pub fn remove(&mut self, id: BrickId) -> bool {
        let before = self.bricks.len();
        self.bricks.retain(|b| *b != id);
        self.bricks.len() != before
    }

    pub fn contains(&self, id: BrickId) -> bool {
        self.bricks.contains(&id)
    }

    /// Take every member for detonation, leaving the set empty
    pub fn detonate(&mut self) -> Vec<BrickId> {
        std::mem::take(&mut self.bricks)
    }

    pub fn clear(&mut self) {
        self.bricks.clear();
    }

    pub fn len(&self) -> usize {
        self.bricks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_idempotent() {
        let mut set = BombBlastHitSet::new();
        assert!(set.insert(BrickId(1)));
        assert!(!set.insert(BrickId(1)));
        assert!(set.insert(BrickId(2)));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_detonate_empties_set() {
        let mut set = BombBlastHitSet::new();
        set.insert(BrickId(3));
        set.insert(BrickId(1));
        assert_eq!(set.detonate(), vec![BrickId(3), BrickId(1)]);
        assert!(set.is_empty());
        assert!(set.detonate().is_empty());
    }

    #[test]
    fn test_remove_on_end_contact() {
        let mut set = BombBlastHitSet::new();
        set.insert(BrickId(1));
        set.insert(BrickId(2));
        assert!(set.remove(BrickId(2)));
        assert!(!set.remove(BrickId(2)));
        assert!(set.contains(BrickId(1)));
        assert!(!set.contains(BrickId(2)));
    }
}
