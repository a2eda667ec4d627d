//! Ordered, owning collection of renderables.
//!
//! Models are drawn in insertion order. Each is addressable by its current
//! index, which shifts down when an earlier model is removed, and by a
//! [`ModelKey`] that stays valid until that model is removed.

use std::ops::{Index, IndexMut};

use crate::renderer::Renderable;

/// Stable identity of a registered model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelKey(u64);

struct Entry {
    key: ModelKey,
    model: Box<dyn Renderable>,
}

/// The scene's models, in draw order.
#[derive(Default)]
pub struct ModelRegistry {
    entries: Vec<Entry>,
    next_key: u64,
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ModelRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a model and return its index.
    pub fn add(&mut self, model: Box<dyn Renderable>) -> usize {
        let _ = self.insert(model);
        self.entries.len() - 1
    }

    /// Append a model and return its key.
    pub fn insert(&mut self, model: Box<dyn Renderable>) -> ModelKey {
        let key = ModelKey(self.next_key);
        self.next_key += 1;
        self.entries.push(Entry { key, model });
        key
    }

    /// The model at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&dyn Renderable> {
        self.entries.get(index).map(|e| e.model.as_ref())
    }

    /// The model at `index`, mutably.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut dyn Renderable> {
        match self.entries.get_mut(index) {
            Some(e) => Some(e.model.as_mut()),
            None => None,
        }
    }

    /// The model registered under `key`, if it is still present.
    pub fn find(&mut self, key: ModelKey) -> Option<&mut dyn Renderable> {
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(e) => Some(e.model.as_mut()),
            None => None,
        }
    }

    /// Current index of the model registered under `key`.
    #[must_use]
    pub fn index_of(&self, key: ModelKey) -> Option<usize> {
        self.entries.iter().position(|e| e.key == key)
    }

    /// Key of the model at `index`.
    #[must_use]
    pub fn key_at(&self, index: usize) -> Option<ModelKey> {
        self.entries.get(index).map(|e| e.key)
    }

    /// Remove and return the model at `index`. Later models shift down.
    ///
    /// GPU resources of the model are not released; call
    /// [`Renderable::release`] on the returned model, or remove through
    /// [`Scene::remove_model_at`](crate::scene::Scene::remove_model_at).
    pub fn remove(&mut self, index: usize) -> Option<Box<dyn Renderable>> {
        if index < self.entries.len() {
            Some(self.entries.remove(index).model)
        } else {
            None
        }
    }

    /// Remove and return the model registered under `key`.
    pub fn remove_key(&mut self, key: ModelKey) -> Option<Box<dyn Renderable>> {
        let index = self.index_of(key)?;
        self.remove(index)
    }

    /// Number of models.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no models.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in draw order.
    pub fn keys(&self) -> impl Iterator<Item = ModelKey> + '_ {
        self.entries.iter().map(|e| e.key)
    }

    /// Models in draw order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Renderable> + '_ {
        self.entries.iter().map(|e| e.model.as_ref())
    }

    /// Models in draw order, mutably.
    pub fn iter_mut(
        &mut self,
    ) -> impl Iterator<Item = &mut Box<dyn Renderable>> + '_ {
        self.entries.iter_mut().map(|e| &mut e.model)
    }

    /// Remove every model, returning them in draw order.
    pub fn drain(&mut self) -> Vec<Box<dyn Renderable>> {
        self.entries.drain(..).map(|e| e.model).collect()
    }
}

impl Index<usize> for ModelRegistry {
    type Output = dyn Renderable;

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    fn index(&self, index: usize) -> &Self::Output {
        self.entries[index].model.as_ref()
    }
}

impl IndexMut<usize> for ModelRegistry {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        self.entries[index].model.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::renderer::{MeshData, MeshModel};

    fn model_at(x: f32) -> Box<dyn Renderable> {
        Box::new(MeshModel::new(MeshData::new(), Vec3::new(x, 0.0, 0.0)))
    }

    fn x_of(model: &dyn Renderable) -> f32 {
        model.base().translation.x
    }

    #[test]
    fn removal_shifts_indices_but_not_keys() {
        let mut reg = ModelRegistry::new();
        let a = reg.insert(model_at(0.0));
        let b = reg.insert(model_at(1.0));
        let c = reg.insert(model_at(2.0));

        let removed = reg.remove_key(b).unwrap();
        assert_eq!(x_of(removed.as_ref()), 1.0);

        assert_eq!(reg.len(), 2);
        assert_eq!(reg.index_of(a), Some(0));
        assert_eq!(reg.index_of(c), Some(1));
        assert_eq!(reg.index_of(b), None);
        assert!(reg.find(b).is_none());
        assert_eq!(x_of(&reg[1]), 2.0);
        assert_eq!(x_of(reg.find(c).unwrap()), 2.0);
    }

    #[test]
    fn removing_by_index_shifts_later_models_down() {
        let mut reg = ModelRegistry::new();
        for x in [0.0, 1.0, 2.0] {
            let _ = reg.add(model_at(x));
        }
        let third = reg.key_at(2).unwrap();

        let removed = reg.remove(1).unwrap();
        assert_eq!(x_of(removed.as_ref()), 1.0);
        assert_eq!(reg.len(), 2);
        assert_eq!(x_of(&reg[1]), 2.0);
        assert_eq!(reg.index_of(third), Some(1));
        assert!(reg.remove(2).is_none());
    }

    #[test]
    fn add_returns_index() {
        let mut reg = ModelRegistry::new();
        assert_eq!(reg.add(model_at(0.0)), 0);
        assert_eq!(reg.add(model_at(1.0)), 1);
        assert!(reg.remove(0).is_some());
        assert_eq!(reg.add(model_at(2.0)), 1);
        let xs: Vec<f32> = reg.iter().map(x_of).collect();
        assert_eq!(xs, vec![1.0, 2.0]);
    }

    #[test]
    fn keys_are_never_reused() {
        let mut reg = ModelRegistry::new();
        let a = reg.insert(model_at(0.0));
        assert!(reg.remove_key(a).is_some());
        let b = reg.insert(model_at(0.0));
        assert_ne!(a, b);
        assert!(reg.remove_key(a).is_none());
    }

    #[test]
    fn out_of_range_access_is_none() {
        let mut reg = ModelRegistry::new();
        assert!(reg.get(0).is_none());
        assert!(reg.get_mut(3).is_none());
        assert!(reg.remove(0).is_none());
        assert!(reg.is_empty());
    }

    #[test]
    #[should_panic]
    fn indexing_out_of_range_panics() {
        let reg = ModelRegistry::new();
        let _ = x_of(&reg[0]);
    }
}
