//! Local Check-State Overlay
//!
//! In-memory set of entity ids the user has ticked. Never sent to the server
//! and never adds or removes list members: it only decorates whatever the
//! latest fetch returned.

use std::collections::HashSet;

use super::entity::Entity;

/// A fetched entity decorated with its local check state
#[derive(Debug, Clone, PartialEq)]
pub struct Checked<T> {
    pub item: T,
    pub checked: bool,
}

pub struct CheckState<T: Entity> {
    checked: HashSet<T::Id>,
}

impl<T: Entity> Default for CheckState<T> {
    fn default() -> Self {
        Self {
            checked: HashSet::new(),
        }
    }
}

impl<T: Entity> CheckState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the state of `id` and return the new value
    pub fn toggle(&mut self, id: &T::Id) -> bool {
        if self.checked.remove(id) {
            false
        } else {
            self.checked.insert(id.clone());
            true
        }
    }

    pub fn set(&mut self, id: &T::Id, checked: bool) {
        if checked {
            self.checked.insert(id.clone());
        } else {
            self.checked.remove(id);
        }
    }

    pub fn is_checked(&self, id: &T::Id) -> bool {
        self.checked.contains(id)
    }

    pub fn checked_ids(&self) -> impl Iterator<Item = &T::Id> {
        self.checked.iter()
    }

    pub fn clear(&mut self) {
        self.checked.clear();
    }

    /// Decorate `items`, preserving their order and membership exactly
    pub fn apply(&self, items: &[T]) -> Vec<Checked<T>> {
        items
            .iter()
            .map(|item| Checked {
                checked: self.is_checked(item.id()),
                item: item.clone(),
            })
            .collect()
    }
}
