use indexmap::IndexSet;

use crate::model::NodeId;

/// Distinct node ids in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct OwnerSet {
    nodes: IndexSet<NodeId>,
}

impl OwnerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_vec(self) -> Vec<NodeId> {
        self.nodes.into_iter().collect()
    }
}

impl Extend<NodeId> for OwnerSet {
    fn extend<T: IntoIterator<Item = NodeId>>(&mut self, iter: T) {
        self.nodes.extend(iter);
    }
}

impl FromIterator<NodeId> for OwnerSet {
    fn from_iter<T: IntoIterator<Item = NodeId>>(iter: T) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}
