// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Component storage and management
//!
//! Components are plain data records attached to entities. Every component
//! type owns one [`ComponentPool`] inside the world, with one slot per entity
//! index. Which slots are live is tracked by the per-entity
//! [`ComponentMask`], so systems can select entities by bitmask instead of
//! probing every pool.

use crate::ecs::World;
use bitflags::bitflags;

bitflags! {
    /// One bit per component type
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ComponentMask: u16 {
        /// [`Position`](crate::ecs::components::Position)
        const POSITION = 1 << 0;
        /// [`Velocity`](crate::ecs::components::Velocity)
        const VELOCITY = 1 << 1;
        /// [`BoundingBox`](crate::ecs::components::BoundingBox)
        const BOUNDING_BOX = 1 << 2;
        /// [`Renderable`](crate::ecs::components::Renderable)
        const RENDERABLE = 1 << 3;
        /// [`SoundRef`](crate::ecs::components::SoundRef)
        const SOUND = 1 << 4;
        /// [`Score`](crate::ecs::components::Score)
        const SCORE = 1 << 5;
        /// [`PlayerIdentity`](crate::ecs::components::PlayerIdentity)
        const PLAYER = 1 << 6;
    }
}

/// Trait that all components must implement
///
/// Components are data without behavior. `Default` is the pooled reset
/// value: a slot is returned to it whenever its component is detached, so a
/// reused slot never carries state from the previous owner.
pub trait Component: Default + Send + Sync + 'static {
    /// Bit identifying this component type in entity masks
    const MASK: ComponentMask;

    /// The pool holding every instance of this component type
    fn pool(world: &World) -> &ComponentPool<Self>;

    /// Mutable access to the pool holding this component type
    fn pool_mut(world: &mut World) -> &mut ComponentPool<Self>;
}

/// Component-set query: entities holding all of `all` and none of `none`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Family {
    all: ComponentMask,
    none: ComponentMask,
}

impl Family {
    /// Family of entities holding every component in `mask`
    pub fn all(mask: ComponentMask) -> Self {
        Family {
            all: mask,
            none: ComponentMask::empty(),
        }
    }

    /// Exclude entities holding any component in `mask`
    pub fn excluding(mut self, mask: ComponentMask) -> Self {
        self.none |= mask;
        self
    }

    /// Required components
    pub fn required(&self) -> ComponentMask {
        self.all
    }

    /// Excluded components
    pub fn excluded(&self) -> ComponentMask {
        self.none
    }

    /// Check whether an entity with the given mask belongs to this family
    pub fn matches(&self, mask: ComponentMask) -> bool {
        mask.contains(self.all) && !mask.intersects(self.none)
    }
}

/// Pooled component storage indexed by entity slot
///
/// Slots are never shrunk during a session; destroyed entities leave their
/// slot at the default value until the index is reused.
pub struct ComponentPool<T: Component> {
    slots: Vec<T>,
}

impl<T: Component> ComponentPool<T> {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a pool with room for `capacity` entities
    pub fn with_capacity(capacity: usize) -> Self {
        ComponentPool {
            slots: Vec::with_capacity(capacity),
        }
    }

    /// Number of slots, live or not
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check whether the pool has no slots at all
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Grow the pool so that `slot` is addressable
    pub(crate) fn ensure_slot(&mut self, slot: usize) {
        if slot >= self.slots.len() {
            self.slots.resize_with(slot + 1, T::default);
        }
    }

    /// Reset a slot to the pooled default value
    pub(crate) fn reset(&mut self, slot: usize) {
        if let Some(value) = self.slots.get_mut(slot) {
            *value = T::default();
        }
    }

    pub(crate) fn put(&mut self, slot: usize, value: T) {
        self.ensure_slot(slot);
        self.slots[slot] = value;
    }

    pub(crate) fn get(&self, slot: usize) -> Option<&T> {
        self.slots.get(slot)
    }

    pub(crate) fn get_mut(&mut self, slot: usize) -> Option<&mut T> {
        self.slots.get_mut(slot)
    }

    /// Dense slot array, including slots whose component is not attached
    ///
    /// Pair with the world's entity masks to know which slots are live.
    pub fn slots(&self) -> &[T] {
        &self.slots
    }

    /// Mutable dense slot array
    pub fn slots_mut(&mut self) -> &mut [T] {
        &mut self.slots
    }

    /// Drop every slot
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl<T: Component> Default for ComponentPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{Position, Score};

    #[test]
    fn test_family_matching() {
        let family = Family::all(ComponentMask::POSITION | ComponentMask::VELOCITY)
            .excluding(ComponentMask::PLAYER);

        assert!(family.matches(ComponentMask::POSITION | ComponentMask::VELOCITY));
        assert!(family.matches(
            ComponentMask::POSITION | ComponentMask::VELOCITY | ComponentMask::SOUND
        ));
        assert!(!family.matches(ComponentMask::POSITION));
        assert!(!family.matches(
            ComponentMask::POSITION | ComponentMask::VELOCITY | ComponentMask::PLAYER
        ));
    }

    #[test]
    fn test_family_accessors() {
        let family = Family::all(ComponentMask::SCORE).excluding(ComponentMask::SOUND);
        assert_eq!(family.required(), ComponentMask::SCORE);
        assert_eq!(family.excluded(), ComponentMask::SOUND);
    }

    #[test]
    fn test_pool_grows_with_defaults() {
        let mut pool = ComponentPool::<Position>::new();
        assert!(pool.is_empty());

        pool.put(3, Position::new(1.0, 2.0));
        assert_eq!(pool.len(), 4);
        assert_eq!(pool.get(0), Some(&Position::default()));
        assert_eq!(pool.get(3), Some(&Position::new(1.0, 2.0)));
    }

    #[test]
    fn test_pool_reset_restores_default() {
        let mut pool = ComponentPool::<Score>::new();
        pool.put(0, Score::new(7));
        pool.reset(0);
        assert_eq!(pool.get(0).map(|s| s.value()), Some(0));

        // Out-of-range reset is a no-op
        pool.reset(10);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_pool_get_mut() {
        let mut pool = ComponentPool::<Position>::with_capacity(4);
        pool.ensure_slot(1);
        if let Some(pos) = pool.get_mut(1) {
            pos.set_x(5.0);
        }
        assert_eq!(pool.slots()[1].x(), 5.0);

        pool.clear();
        assert_eq!(pool.len(), 0);
    }
}
