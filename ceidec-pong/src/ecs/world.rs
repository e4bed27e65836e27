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
//! World management
//!
//! The World is the central container for all ECS data: the entity registry
//! with its free list, one pooled storage per component type, and an
//! incremental family index that answers "which live entities hold these
//! components" without scanning every entity each frame.

use crate::ecs::components::{
    BoundingBox, PlayerIdentity, Position, Renderable, Score, SoundRef, Velocity,
};
use crate::ecs::{Component, ComponentMask, ComponentPool, Entity, Family};
use crate::error::EngineError;
use std::collections::HashMap;

/// Counters for entity slot reuse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorldStats {
    /// Entities that needed a brand new slot
    pub fresh_slots: usize,
    /// Entities that recycled a slot from the free list
    pub reused_slots: usize,
}

struct FamilyIndex {
    family: Family,
    members: Vec<Entity>,
}

/// The main ECS world container
///
/// World manages entity lifecycles and serves as the central
/// access point for all component reads and writes.
pub struct World {
    generations: Vec<u32>,
    alive: Vec<bool>,
    masks: Vec<ComponentMask>,
    free_slots: Vec<u32>,
    live_count: usize,
    families: Vec<FamilyIndex>,
    family_lookup: HashMap<Family, usize>,
    stats: WorldStats,
    positions: ComponentPool<Position>,
    velocities: ComponentPool<Velocity>,
    bounding_boxes: ComponentPool<BoundingBox>,
    renderables: ComponentPool<Renderable>,
    sounds: ComponentPool<SoundRef>,
    scores: ComponentPool<Score>,
    players: ComponentPool<PlayerIdentity>,
}

macro_rules! pooled_component {
    ($ty:ty, $mask:ident, $field:ident) => {
        impl Component for $ty {
            const MASK: ComponentMask = ComponentMask::$mask;

            fn pool(world: &World) -> &ComponentPool<Self> {
                &world.$field
            }

            fn pool_mut(world: &mut World) -> &mut ComponentPool<Self> {
                &mut world.$field
            }
        }
    };
}

pooled_component!(Position, POSITION, positions);
pooled_component!(Velocity, VELOCITY, velocities);
pooled_component!(BoundingBox, BOUNDING_BOX, bounding_boxes);
pooled_component!(Renderable, RENDERABLE, renderables);
pooled_component!(SoundRef, SOUND, sounds);
pooled_component!(Score, SCORE, scores);
pooled_component!(PlayerIdentity, PLAYER, players);

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a world with slots preallocated for `capacity` entities
    pub fn with_capacity(capacity: usize) -> Self {
        World {
            generations: Vec::with_capacity(capacity),
            alive: Vec::with_capacity(capacity),
            masks: Vec::with_capacity(capacity),
            free_slots: Vec::new(),
            live_count: 0,
            families: Vec::new(),
            family_lookup: HashMap::new(),
            stats: WorldStats::default(),
            positions: ComponentPool::with_capacity(capacity),
            velocities: ComponentPool::with_capacity(capacity),
            bounding_boxes: ComponentPool::with_capacity(capacity),
            renderables: ComponentPool::with_capacity(capacity),
            sounds: ComponentPool::with_capacity(capacity),
            scores: ComponentPool::with_capacity(capacity),
            players: ComponentPool::with_capacity(capacity),
        }
    }

    /// Create a new entity with no components
    ///
    /// Recycles a destroyed entity's slot when one is free.
    pub fn create_entity(&mut self) -> Entity {
        let slot = match self.free_slots.pop() {
            Some(slot) => {
                self.stats.reused_slots += 1;
                slot as usize
            }
            None => {
                self.stats.fresh_slots += 1;
                let slot = self.generations.len();
                self.generations.push(0);
                self.alive.push(false);
                self.masks.push(ComponentMask::empty());
                self.grow_pools(slot);
                slot
            }
        };

        self.alive[slot] = true;
        self.masks[slot] = ComponentMask::empty();
        self.live_count += 1;

        Entity::new(slot as u32, self.generations[slot])
    }

    /// Destroy an entity
    ///
    /// Every attached component is reset to its pooled default, and the
    /// generation is bumped to invalidate old handles.
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        if !self.is_entity_alive(entity) {
            return false;
        }

        let slot = entity.slot();
        let old_mask = self.masks[slot];
        self.reset_slots(slot, old_mask);
        self.masks[slot] = ComponentMask::empty();
        self.update_families(entity, old_mask, ComponentMask::empty());

        self.alive[slot] = false;
        self.generations[slot] = self.generations[slot].wrapping_add(1);
        self.free_slots.push(entity.index());
        self.live_count -= 1;
        true
    }

    /// Check if an entity is alive
    pub fn is_entity_alive(&self, entity: Entity) -> bool {
        let slot = entity.slot();
        slot < self.alive.len()
            && self.alive[slot]
            && self.generations[slot] == entity.generation()
    }

    /// Get the number of alive entities
    pub fn entity_count(&self) -> usize {
        self.live_count
    }

    /// Slot reuse counters
    pub fn stats(&self) -> WorldStats {
        self.stats
    }

    /// Get an iterator over all alive entities in slot order
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(|(slot, _)| Entity::new(slot as u32, self.generations[slot]))
    }

    /// Destroy every entity
    ///
    /// Slots are kept and recycled like after [`destroy_entity`](Self::destroy_entity),
    /// so handles issued before the call stay stale. Registered families
    /// stay registered, with empty member lists.
    pub fn clear(&mut self) {
        for slot in 0..self.alive.len() {
            if !self.alive[slot] {
                continue;
            }
            let mask = self.masks[slot];
            self.reset_slots(slot, mask);
            self.masks[slot] = ComponentMask::empty();
            self.alive[slot] = false;
            self.generations[slot] = self.generations[slot].wrapping_add(1);
            self.free_slots.push(slot as u32);
        }
        self.live_count = 0;
        for index in &mut self.families {
            index.members.clear();
        }
    }

    /// Component mask of a live entity
    pub fn mask(&self, entity: Entity) -> Option<ComponentMask> {
        if self.is_entity_alive(entity) {
            Some(self.masks[entity.slot()])
        } else {
            None
        }
    }

    /// Check whether a live entity holds component `T`
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.mask(entity).map_or(false, |mask| mask.contains(T::MASK))
    }

    /// Attach `component` to an entity, replacing any previous value
    pub fn insert<T: Component>(&mut self, entity: Entity, component: T) -> Result<(), EngineError> {
        self.attach::<T>(entity)?;
        T::pool_mut(self).put(entity.slot(), component);
        Ok(())
    }

    /// Attach a default-initialized component taken from the pool
    ///
    /// If the entity already holds `T`, the existing value is returned untouched.
    pub fn attach<T: Component>(&mut self, entity: Entity) -> Result<&mut T, EngineError> {
        let old_mask = self.mask(entity).ok_or(EngineError::StaleEntity(entity))?;
        let slot = entity.slot();

        if !old_mask.contains(T::MASK) {
            T::pool_mut(self).reset(slot);
            let new_mask = old_mask | T::MASK;
            self.masks[slot] = new_mask;
            self.update_families(entity, old_mask, new_mask);
        }

        T::pool_mut(self)
            .get_mut(slot)
            .ok_or(EngineError::StaleEntity(entity))
    }

    /// Detach component `T`, returning its last value
    ///
    /// The pool slot is reset to the default value.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Option<T> {
        let old_mask = self.mask(entity)?;
        if !old_mask.contains(T::MASK) {
            return None;
        }

        let slot = entity.slot();
        let value = T::pool_mut(self).get_mut(slot).map(std::mem::take);
        let new_mask = old_mask - T::MASK;
        self.masks[slot] = new_mask;
        self.update_families(entity, old_mask, new_mask);
        value
    }

    /// Get a reference to an attached component
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        if self.has::<T>(entity) {
            T::pool(self).get(entity.slot())
        } else {
            None
        }
    }

    /// Get a mutable reference to an attached component
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        if self.has::<T>(entity) {
            T::pool_mut(self).get_mut(entity.slot())
        } else {
            None
        }
    }

    /// Live entities belonging to `family`
    ///
    /// The family is indexed on first use; afterwards membership is kept up
    /// to date as components are attached and detached.
    pub fn family_members(&mut self, family: Family) -> &[Entity] {
        let index = self.register_family(family);
        &self.families[index].members
    }

    /// Start tracking a family, returning its index slot
    pub fn register_family(&mut self, family: Family) -> usize {
        if let Some(&index) = self.family_lookup.get(&family) {
            return index;
        }

        let members: Vec<Entity> = self
            .entities()
            .filter(|entity| family.matches(self.masks[entity.slot()]))
            .collect();
        let index = self.families.len();
        self.families.push(FamilyIndex { family, members });
        self.family_lookup.insert(family, index);
        index
    }

    /// Number of families being tracked
    pub fn family_count(&self) -> usize {
        self.families.len()
    }

    /// Split borrow of the dense kinematic pools for bulk integration
    ///
    /// The three slices are indexed by entity slot and have equal length.
    pub fn motion_view(&mut self) -> (&mut [Position], &mut [Velocity], &[ComponentMask]) {
        (
            self.positions.slots_mut(),
            self.velocities.slots_mut(),
            &self.masks,
        )
    }

    fn update_families(&mut self, entity: Entity, old_mask: ComponentMask, new_mask: ComponentMask) {
        for index in &mut self.families {
            let was_member = index.family.matches(old_mask);
            let is_member = index.family.matches(new_mask);

            if was_member && !is_member {
                if let Some(pos) = index.members.iter().position(|e| *e == entity) {
                    index.members.remove(pos);
                }
            } else if !was_member && is_member {
                index.members.push(entity);
            }
        }
    }

    fn grow_pools(&mut self, slot: usize) {
        self.positions.ensure_slot(slot);
        self.velocities.ensure_slot(slot);
        self.bounding_boxes.ensure_slot(slot);
        self.renderables.ensure_slot(slot);
        self.sounds.ensure_slot(slot);
        self.scores.ensure_slot(slot);
        self.players.ensure_slot(slot);
    }

    fn reset_slots(&mut self, slot: usize, mask: ComponentMask) {
        if mask.contains(ComponentMask::POSITION) {
            self.positions.reset(slot);
        }
        if mask.contains(ComponentMask::VELOCITY) {
            self.velocities.reset(slot);
        }
        if mask.contains(ComponentMask::BOUNDING_BOX) {
            self.bounding_boxes.reset(slot);
        }
        if mask.contains(ComponentMask::RENDERABLE) {
            self.renderables.reset(slot);
        }
        if mask.contains(ComponentMask::SOUND) {
            self.sounds.reset(slot);
        }
        if mask.contains(ComponentMask::SCORE) {
            self.scores.reset(slot);
        }
        if mask.contains(ComponentMask::PLAYER) {
            self.players.reset(slot);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
