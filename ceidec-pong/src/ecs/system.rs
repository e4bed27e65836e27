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
//! System execution framework
//!
//! Systems contain the per-frame logic that operates on entities and
//! components. A system declares the [`Family`] it iterates; the scheduler
//! resolves that family through the world's index and hands the system a
//! snapshot of the matching entities together with the [`Frame`] context.

use crate::assets::SoundCache;
use crate::ecs::{Entity, Family, World};
use crate::error::EngineError;
use crate::messaging::MessageQueue;
use crate::render::Renderer;

/// Everything a system may touch besides the world during one frame
///
/// Systems never reference each other; the message queue is the only
/// channel between them.
pub struct Frame<'a> {
    delta: f32,
    queue: &'a MessageQueue,
    sounds: &'a mut SoundCache,
    renderer: &'a mut dyn Renderer,
}

impl<'a> Frame<'a> {
    /// Bundle the per-frame collaborators
    pub fn new(
        delta: f32,
        queue: &'a MessageQueue,
        sounds: &'a mut SoundCache,
        renderer: &'a mut dyn Renderer,
    ) -> Self {
        Frame {
            delta,
            queue,
            sounds,
            renderer,
        }
    }

    /// Seconds elapsed since the previous frame
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Shared inter-system message queue
    pub fn queue(&self) -> &'a MessageQueue {
        self.queue
    }

    /// Session sound cache
    pub fn sounds(&mut self) -> &mut SoundCache {
        self.sounds
    }

    /// Render collaborator
    pub fn renderer(&mut self) -> &mut dyn Renderer {
        self.renderer
    }
}

/// Trait for systems run by the update pipeline
///
/// Systems keep no gameplay state across frames beyond private caches.
pub trait System: Send {
    /// Components an entity must hold (and must not hold) to be processed
    fn family(&self) -> Family;

    /// Execute the system on the given family members
    ///
    /// Missing components on an entity are skipped, not reported; an `Err`
    /// aborts the frame.
    fn run(
        &mut self,
        world: &mut World,
        entities: &[Entity],
        frame: &mut Frame<'_>,
    ) -> Result<(), EngineError>;

    /// Get the name of this system for debugging
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
