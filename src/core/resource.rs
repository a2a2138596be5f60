//! Harvestable resource nodes

use crate::core::{EntityId, Pos};
use serde::{Deserialize, Serialize};

/// A finite pile of resources on the grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceNode {
    pub id: EntityId,
    pub pos: Pos,
    pub amount: i64,
}

impl ResourceNode {
    pub fn new(id: EntityId, pos: Pos, amount: i64) -> Self {
        ResourceNode { id, pos, amount }
    }

    pub fn is_depleted(&self) -> bool {
        self.amount <= 0
    }

    /// Take up to `wanted` resources, returning what was taken
    pub fn harvest(&mut self, wanted: i64) -> i64 {
        let taken = wanted.min(self.amount).max(0);
        self.amount -= taken;
        taken
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harvest_until_depleted() {
        let mut node = ResourceNode::new(EntityId::new(0), Pos::new(2, 2), 10);
        assert_eq!(node.harvest(4), 4);
        assert_eq!(node.harvest(4), 4);
        assert_eq!(node.harvest(4), 2);
        assert!(node.is_depleted());
        assert_eq!(node.harvest(4), 0);
    }
}
