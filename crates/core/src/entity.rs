//! Entity trait: identity + continuity across state changes.

use std::collections::HashSet;

/// Entity marker + minimal interface.
///
/// Products and sales are entities: a product keeps its `code` across renames
/// and price changes, a sale keeps its `id` from draft to commit.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}

pub fn find_by_id<E: Entity>(items: &[E], id: E::Id) -> Option<&E> {
    items.iter().find(|e| e.id() == id)
}

pub fn find_by_id_mut<E: Entity>(items: &mut [E], id: E::Id) -> Option<&mut E> {
    items.iter_mut().find(|e| e.id() == id)
}

pub fn position_by_id<E: Entity>(items: &[E], id: E::Id) -> Option<usize> {
    items.iter().position(|e| e.id() == id)
}

/// The first identity that occurs more than once, if any.
pub fn first_duplicate_id<E: Entity>(items: &[E]) -> Option<E::Id> {
    let mut seen = HashSet::with_capacity(items.len());
    items.iter().map(Entity::id).find(|id| !seen.insert(*id))
}
