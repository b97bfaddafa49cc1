use std::ops::Index;
use std::slice::Iter;

use super::error::EngineError;

/// Number of slots added each time a registry runs out of room.
pub const GROWTH_INCREMENT: usize = 10;

/// Append-only, insertion-ordered collection that grows in fixed steps.
///
/// Records are addressed by position. Nothing is ever removed; the only
/// reordering allowed is through [`Registry::as_mut_slice`], which the course
/// sort uses.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    items: Vec<T>,
    label: &'static str,
}

impl<T> Registry<T> {
    /// Create an empty registry. `label` names it in resource errors.
    pub fn new(label: &'static str) -> Self {
        Self {
            items: Vec::new(),
            label,
        }
    }

    /// Append `item` and return its position.
    ///
    /// When the buffer is full it grows by exactly [`GROWTH_INCREMENT`] slots.
    /// A failed allocation surfaces as [`EngineError::ResourceExhausted`].
    pub fn push(&mut self, item: T) -> Result<usize, EngineError> {
        if self.items.len() == self.items.capacity() {
            self.items
                .try_reserve_exact(GROWTH_INCREMENT)
                .map_err(|_| EngineError::ResourceExhausted(self.label))?;
        }
        self.items.push(item);
        Ok(self.items.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }
}

impl<T> Index<usize> for Registry<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_returns_insertion_positions() {
        let mut registry = Registry::new("test registry");
        assert_eq!(registry.push("a").unwrap(), 0);
        assert_eq!(registry.push("b").unwrap(), 1);
        assert_eq!(registry[1], "b");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn grows_in_fixed_increments() {
        let mut registry = Registry::new("test registry");
        assert_eq!(registry.capacity(), 0);
        registry.push(0).unwrap();
        assert_eq!(registry.capacity(), GROWTH_INCREMENT);
        for n in 1..GROWTH_INCREMENT {
            registry.push(n).unwrap();
        }
        assert_eq!(registry.capacity(), GROWTH_INCREMENT);
        registry.push(99).unwrap();
        assert_eq!(registry.capacity(), 2 * GROWTH_INCREMENT);
    }
}
