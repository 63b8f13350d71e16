//! Insertion-ordered map of principals to their cryptors.

use crate::principal::PrincipalId;

/// Who a seal is made for, in the order principals were added.
///
/// Order matters twice: wrapped keys are written in this order, and the
/// first registered principal found in an envelope is the one used to open
/// it. Replacing an existing principal keeps its position.
#[derive(Debug, Clone)]
pub struct Registry<C> {
    entries: Vec<(PrincipalId, C)>,
}

impl<C> Registry<C> {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds or replaces `id`, returning the replaced cryptor.
    pub fn insert(&mut self, id: PrincipalId, cryptor: C) -> Option<C> {
        match self.entries.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, slot)) => Some(std::mem::replace(slot, cryptor)),
            None => {
                self.entries.push((id, cryptor));
                None
            }
        }
    }

    /// Removes `id`, returning its cryptor.
    pub fn remove(&mut self, id: &str) -> Option<C> {
        let pos = self.entries.iter().position(|(existing, _)| existing == id)?;
        Some(self.entries.remove(pos).1)
    }

    /// The cryptor registered for `id`.
    pub fn get(&self, id: &str) -> Option<&C> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, cryptor)| cryptor)
    }

    /// Whether `id` is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Number of principals.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no principal is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates principals and cryptors in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&PrincipalId, &C)> {
        self.entries.iter().map(|(id, cryptor)| (id, cryptor))
    }

    /// Iterates principal ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &PrincipalId> {
        self.entries.iter().map(|(id, _)| id)
    }
}

impl<C> Default for Registry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> FromIterator<(PrincipalId, C)> for Registry<C> {
    fn from_iter<I: IntoIterator<Item = (PrincipalId, C)>>(iter: I) -> Self {
        let mut registry = Self::new();
        for (id, cryptor) in iter {
            registry.insert(id, cryptor);
        }
        registry
    }
}

impl<C> IntoIterator for Registry<C> {
    type Item = (PrincipalId, C);
    type IntoIter = std::vec::IntoIter<(PrincipalId, C)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
