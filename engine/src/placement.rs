use std::collections::BTreeMap;

use crate::prelude::*;

/// Spatial index, used for efficiently finding positions of entities and
/// entities at positions.
#[derive(Clone, Default, Eq, PartialEq, Debug)]
pub struct Placement {
    places: BTreeMap<Entity, IVec2>,
    entities: HashMap<IVec2, IndexSet<Entity>>,
}

impl Placement {
    /// Entities at position in the order they arrived there.
    pub fn entities_at(&self, pos: IVec2) -> impl Iterator<Item = Entity> + '_ {
        self.entities.get(&pos).into_iter().flatten().copied()
    }

    pub fn all_entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.places.keys().cloned()
    }

    pub fn entity_pos(&self, e: &Entity) -> Option<IVec2> {
        self.places.get(e).copied()
    }

    pub fn remove(&mut self, e: &Entity) {
        if let Some(pos) = self.places.remove(e) {
            if let Some(set) = self.entities.get_mut(&pos) {
                set.shift_remove(e);
                if set.is_empty() {
                    self.entities.remove(&pos);
                }
            }
        }
    }

    pub fn insert(&mut self, pos: IVec2, e: Entity) {
        self.remove(&e);
        self.places.insert(e, pos);
        self.entities.entry(pos).or_default().insert(e);
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}
