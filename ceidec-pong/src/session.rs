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
//! Game sessions
//!
//! A [`GameSession`] owns everything one game needs for its lifetime: the
//! world, the update pipeline, the message queue, the sound cache and the
//! entity initializer. Nothing is global; collaborators are borrowed only
//! for the call that needs them, and dropping the session releases every
//! cached sound.

use crate::assets::{AssetLoader, AssetSource, AudioBackend, SoundCache};
use crate::config::GameConfig;
use crate::ecs::components::{PlayerIdentity, Position, Score};
use crate::ecs::{stages, ComponentMask, Family, Frame, Scheduler, World};
use crate::error::EngineError;
use crate::initializer::{EntityInitializer, PongInitializer, PrototypeInitializer};
use crate::messaging::{Message, MessageQueue};
use crate::render::{Renderer, Viewport};
use crate::systems::{
    CollisionSystem, ComputerPositioningSystem, HumanPositioningSystem, KinematicsSystem,
    PaddleBoundsSystem, RenderingSystem, ScoringSystem, SoundSystem,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Which game a session plays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameKind {
    /// Human against computer Pong
    Pong,
    /// Unfinished second game: a ball coasting to a stop
    Prototype,
}

/// One running game
pub struct GameSession {
    kind: GameKind,
    world: World,
    scheduler: Scheduler,
    queue: MessageQueue,
    sounds: SoundCache,
    loader: AssetLoader,
    initializer: Box<dyn EntityInitializer>,
    assets_ready: Arc<AtomicBool>,
    assets_assigned: bool,
    frames: u64,
}

impl GameSession {
    /// Start a Pong session
    pub fn pong(config: &GameConfig, audio: Box<dyn AudioBackend>) -> Result<Self, EngineError> {
        config.validate()?;
        Self::start_pong(
            config,
            audio,
            CollisionSystem::new(config),
            PongInitializer::new(config),
        )
    }

    /// Start a Pong session whose serves are reproducible
    pub fn pong_with_seed(
        config: &GameConfig,
        audio: Box<dyn AudioBackend>,
        seed: u64,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        Self::start_pong(
            config,
            audio,
            CollisionSystem::with_seed(config, seed),
            PongInitializer::with_seed(config, seed.wrapping_add(1)),
        )
    }

    fn start_pong(
        config: &GameConfig,
        audio: Box<dyn AudioBackend>,
        collision: CollisionSystem,
        initializer: PongInitializer,
    ) -> Result<Self, EngineError> {
        let bounds = config.bounds();
        let mut scheduler = Scheduler::with_stages(6);
        scheduler.add_system(HumanPositioningSystem::new(bounds), stages::INPUT);
        scheduler.add_system(
            ComputerPositioningSystem::new(bounds, config.computer_paddle_speed),
            stages::INPUT,
        );
        scheduler.add_system(KinematicsSystem::new(), stages::KINEMATICS);
        scheduler.add_system(PaddleBoundsSystem::new(bounds), stages::KINEMATICS);
        scheduler.add_system(collision, stages::COLLISION);
        scheduler.add_system(ScoringSystem::new(), stages::SCORING);
        scheduler.add_system(SoundSystem::new(), stages::SOUND);
        scheduler.add_system(RenderingSystem::new(config), stages::RENDER);

        Self::start(GameKind::Pong, Box::new(initializer), scheduler, audio)
    }

    /// Start a prototype session
    pub fn prototype(config: &GameConfig, audio: Box<dyn AudioBackend>) -> Result<Self, EngineError> {
        config.validate()?;
        let mut scheduler = Scheduler::with_stages(2);
        scheduler.add_system(
            KinematicsSystem::with_friction(config.prototype_friction),
            stages::KINEMATICS,
        );
        scheduler.add_system(RenderingSystem::new(config), stages::RENDER);

        Self::start(
            GameKind::Prototype,
            Box::new(PrototypeInitializer::new(config)),
            scheduler,
            audio,
        )
    }

    fn start(
        kind: GameKind,
        mut initializer: Box<dyn EntityInitializer>,
        scheduler: Scheduler,
        audio: Box<dyn AudioBackend>,
    ) -> Result<Self, EngineError> {
        let mut world = World::with_capacity(8);
        let mut sounds = SoundCache::new(audio);
        let mut loader = AssetLoader::new();
        initializer.create_all_entities(&mut world, &mut sounds, &mut loader)?;

        let assets_ready = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&assets_ready);
        loader.add_listener(move || flag.store(true, Ordering::Release));

        log::debug!(
            "{:?} session started with {} systems and {} entities",
            kind,
            scheduler.system_count(),
            world.entity_count()
        );
        Ok(GameSession {
            kind,
            world,
            scheduler,
            queue: MessageQueue::new(),
            sounds,
            loader,
            initializer,
            assets_ready,
            assets_assigned: false,
            frames: 0,
        })
    }

    /// Game played by this session
    pub fn kind(&self) -> GameKind {
        self.kind
    }

    /// Poll the asset source; assigns sprites to entities once loading ends
    ///
    /// Returns `true` once the session is ready to play.
    pub fn poll_assets(&mut self, source: &mut dyn AssetSource) -> Result<bool, EngineError> {
        if self.assets_assigned {
            return Ok(true);
        }

        self.loader.update(source);
        if self.assets_ready.swap(false, Ordering::AcqRel) {
            self.initializer.set_loadable_assets(&mut self.world, source)?;
            self.assets_assigned = true;
            log::debug!("{:?} assets assigned", self.kind);
        }
        Ok(self.assets_assigned)
    }

    /// Check whether assets have been assigned and frames will run
    pub fn is_ready(&self) -> bool {
        self.assets_assigned
    }

    /// Run one frame of the update pipeline
    ///
    /// Does nothing until assets are ready. The renderer frame is always
    /// closed, even when a system fails.
    pub fn update(&mut self, delta: f32, renderer: &mut dyn Renderer) -> Result<(), EngineError> {
        if !self.assets_assigned {
            return Ok(());
        }

        renderer.begin_frame();
        let result = {
            let mut frame = Frame::new(delta, &self.queue, &mut self.sounds, &mut *renderer);
            self.scheduler.run(&mut self.world, &mut frame)
        };
        renderer.end_frame();

        self.frames += 1;
        result
    }

    /// Feed a pointer-down or drag event in window coordinates
    ///
    /// Events outside the drawn framebuffer are ignored. Returns whether a
    /// paddle position was requested.
    pub fn pointer_input(&self, screen_x: f32, screen_y: f32, viewport: &Viewport) -> Result<bool, EngineError> {
        if self.kind != GameKind::Pong {
            return Ok(false);
        }
        match viewport.to_world_y(screen_x, screen_y) {
            Some(y) => {
                self.queue.push(Message::InputY(y))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Score of every player, human first
    pub fn scoreboard(&mut self) -> Vec<(PlayerIdentity, u32)> {
        let members = self
            .world
            .family_members(Family::all(ComponentMask::SCORE | ComponentMask::PLAYER))
            .to_vec();
        let mut board: Vec<(PlayerIdentity, u32)> = members
            .into_iter()
            .filter_map(|entity| {
                let player = *self.world.get::<PlayerIdentity>(entity)?;
                let score = self.world.get::<Score>(entity)?;
                Some((player, score.value()))
            })
            .collect();
        board.sort_by_key(|(player, _)| *player);
        board
    }

    /// Position of the first moving entity that is not a paddle
    pub fn ball_position(&mut self) -> Option<Position> {
        let family = Family::all(ComponentMask::POSITION | ComponentMask::VELOCITY)
            .excluding(ComponentMask::PLAYER);
        let ball = *self.world.family_members(family).first()?;
        self.world.get::<Position>(ball).copied()
    }

    /// Frames run since the assets became ready
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// The session's world
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the session's world
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The session's message queue
    pub fn queue(&self) -> &MessageQueue {
        &self.queue
    }

    /// The session's sound cache
    pub fn sounds(&self) -> &SoundCache {
        &self.sounds
    }

    /// Tear the session down
    ///
    /// Disposes the initializer when its assets were assigned, destroys every
    /// entity and pending message, then releases the cached sounds.
    pub fn end(mut self) -> Result<(), EngineError> {
        if self.assets_assigned {
            self.initializer.dispose(&mut self.world, &mut self.sounds)?;
        }
        self.world.clear();
        self.queue.clear();
        self.scheduler.clear();
        log::debug!("{:?} session ended after {} frames", self.kind, self.frames);
        Ok(())
    }
}
