use std::collections::HashSet;

use uuid::Uuid;

use catalog_core::{Relation, RelationState};

/// Per-relation change between two record states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationDelta {
    pub relation: Relation,
    /// Ids present after but not before, in their new-list order.
    pub to_add: Vec<Uuid>,
    /// Ids present before but not after, in their old-list order.
    pub to_remove: Vec<Uuid>,
}

impl RelationDelta {
    pub fn between(relation: Relation, old: &[Uuid], new: &[Uuid]) -> Self {
        let old_set: HashSet<&Uuid> = old.iter().collect();
        let new_set: HashSet<&Uuid> = new.iter().collect();

        let mut seen = HashSet::new();
        let to_add = new
            .iter()
            .filter(|id| !old_set.contains(id) && seen.insert(**id))
            .copied()
            .collect();
        seen.clear();
        let to_remove = old
            .iter()
            .filter(|id| !new_set.contains(id) && seen.insert(**id))
            .copied()
            .collect();

        Self {
            relation,
            to_add,
            to_remove,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Diff every relation named on either side. A relation missing from one
/// side counts as empty there. Empty deltas are dropped.
pub fn diff(before: &[RelationState], after: &[RelationState]) -> Vec<RelationDelta> {
    let mut relations: Vec<Relation> = Vec::new();
    for state in before.iter().chain(after) {
        if !relations.contains(&state.relation) {
            relations.push(state.relation);
        }
    }

    let ids_of = |side: &[RelationState], relation: Relation| -> Vec<Uuid> {
        side.iter()
            .filter(|s| s.relation == relation)
            .flat_map(|s| s.ids.iter().copied())
            .collect()
    };

    relations
        .into_iter()
        .map(|relation| RelationDelta::between(relation, &ids_of(before, relation), &ids_of(after, relation)))
        .filter(|delta| !delta.is_empty())
        .collect()
}
