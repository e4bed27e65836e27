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
//! Entity initializers
//!
//! An initializer builds every entity a game needs when a session starts.
//! Setup happens in two steps because sprites load in the background:
//! [`EntityInitializer::create_all_entities`] creates the entities with
//! pooled default components and requests their assets, and
//! [`EntityInitializer::set_loadable_assets`] fills in sprites, sizes and
//! starting positions once loading has finished.

use crate::assets::{require_sprite, sfx, AssetLoader, AssetSource, SoundCache};
use crate::config::{GameConfig, ScreenBounds};
use crate::ecs::components::{
    BoundingBox, PlayerIdentity, Position, Renderable, Score, SoundRef, Velocity,
};
use crate::ecs::{Entity, World};
use crate::error::EngineError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Asset keys of the sprites used by the games
pub mod sprites {
    /// Texture atlas holding the ball and both paddles
    pub const PONG_ATLAS: &str = "data/gfx/textures/pong_atlas.atlas";
    /// Pong background texture
    pub const BACKGROUND: &str = "data/gfx/textures/bckg.png";
    /// Pong ball, inside the atlas
    pub const BALL: &str = "ball";
    /// Human paddle, inside the atlas
    pub const HUMAN_PADDLE: &str = "glasspaddle2";
    /// Computer paddle, inside the atlas
    pub const COMPUTER_PADDLE: &str = "paddle";
    /// Ball texture of the prototype game
    pub const PROTOTYPE_BALL: &str = "data/gfx/textures/ball.png";
}

/// Creates and configures the entities of one game
pub trait EntityInitializer: Send {
    /// Create every entity and request the assets they need
    fn create_all_entities(
        &mut self,
        world: &mut World,
        sounds: &mut SoundCache,
        loader: &mut AssetLoader,
    ) -> Result<(), EngineError>;

    /// Attach the loaded assets to the entities
    ///
    /// Fails with a usage error when called before
    /// [`create_all_entities`](Self::create_all_entities).
    fn set_loadable_assets(&mut self, world: &mut World, assets: &dyn AssetSource) -> Result<(), EngineError>;

    /// Release what the initializer acquired
    ///
    /// Fails with a usage error unless entities were created and assets set.
    fn dispose(&mut self, world: &mut World, sounds: &mut SoundCache) -> Result<(), EngineError>;
}

fn ensure_disposable(created: bool, assets_loaded: bool) -> Result<(), EngineError> {
    if !created {
        return Err(EngineError::usage("entities have not been created before disposing assets"));
    }
    if !assets_loaded {
        return Err(EngineError::usage("assets have not been loaded before disposing"));
    }
    Ok(())
}

#[derive(Clone, Copy)]
struct PongEntities {
    victory_sound: Entity,
    defeat_sound: Entity,
    background: Entity,
    ball: Entity,
    human: Entity,
    computer: Entity,
}

/// Builds the Pong table: background, ball, both paddles and the score sounds
pub struct PongInitializer {
    config: GameConfig,
    bounds: ScreenBounds,
    rng: StdRng,
    entities: Option<PongEntities>,
    assets_loaded: bool,
}

impl PongInitializer {
    /// Create an initializer with an entropy-seeded serve
    pub fn new(config: &GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an initializer whose first serve is reproducible
    pub fn with_seed(config: &GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &GameConfig, rng: StdRng) -> Self {
        PongInitializer {
            config: config.clone(),
            bounds: config.bounds(),
            rng,
            entities: None,
            assets_loaded: false,
        }
    }

    /// The ball entity, once created
    pub fn ball(&self) -> Option<Entity> {
        self.entities.as_ref().map(|entities| entities.ball)
    }

    fn serve(&mut self) -> Velocity {
        let limit = self.config.spawn_angle_degrees;
        let angle = if limit > 0.0 { self.rng.gen_range(-limit..=limit) } else { 0.0 };
        let sign = if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        let (sin, cos) = angle.to_radians().sin_cos();
        let speed = self.config.ball_speed;
        Velocity::new(cos * speed * sign, sin * speed * sign)
    }

    fn paddle(world: &mut World) -> Result<Entity, EngineError> {
        let paddle = world.create_entity();
        world.attach::<Position>(paddle)?;
        world.attach::<Velocity>(paddle)?;
        world.attach::<Renderable>(paddle)?;
        world.attach::<BoundingBox>(paddle)?;
        world.attach::<Score>(paddle)?;
        world.attach::<PlayerIdentity>(paddle)?;
        Ok(paddle)
    }

    fn place(world: &mut World, entity: Entity, sprite: Renderable, x: f32, y: f32) -> Result<(), EngineError> {
        let position = Position::new(x, y);
        world.insert(entity, sprite)?;
        world.insert(entity, position)?;
        if world.has::<BoundingBox>(entity) {
            world.insert(entity, sprite.bounds_at(position))?;
        }
        Ok(())
    }
}

impl EntityInitializer for PongInitializer {
    fn create_all_entities(
        &mut self,
        world: &mut World,
        sounds: &mut SoundCache,
        loader: &mut AssetLoader,
    ) -> Result<(), EngineError> {
        loader.add_asset_to_load(sprites::PONG_ATLAS);
        loader.add_asset_to_load(sprites::BACKGROUND);
        for path in [sfx::BOUNCE, sfx::VICTORY, sfx::DEFEAT] {
            sounds.load_or_fetch(path)?;
        }

        let victory_sound = world.create_entity();
        world.attach::<SoundRef>(victory_sound)?;
        let defeat_sound = world.create_entity();
        world.attach::<SoundRef>(defeat_sound)?;

        let background = world.create_entity();
        world.attach::<Position>(background)?;
        world.attach::<Renderable>(background)?;

        let ball = world.create_entity();
        world.attach::<Position>(ball)?;
        world.attach::<Velocity>(ball)?;
        world.attach::<Renderable>(ball)?;
        world.attach::<BoundingBox>(ball)?;
        world.attach::<SoundRef>(ball)?;

        let human = Self::paddle(world)?;
        let computer = Self::paddle(world)?;

        self.entities = Some(PongEntities {
            victory_sound,
            defeat_sound,
            background,
            ball,
            human,
            computer,
        });
        log::debug!("created {} pong entities", world.entity_count());
        Ok(())
    }

    fn set_loadable_assets(&mut self, world: &mut World, assets: &dyn AssetSource) -> Result<(), EngineError> {
        let Some(entities) = self.entities.as_ref() else {
            return Err(EngineError::usage("entities have not been created before setting assets"));
        };
        let PongEntities {
            victory_sound,
            defeat_sound,
            background,
            ball,
            human,
            computer,
        } = *entities;

        let background_sprite = require_sprite(assets, sprites::BACKGROUND)?;
        let ball_sprite = require_sprite(assets, sprites::BALL)?;
        let human_sprite = require_sprite(assets, sprites::HUMAN_PADDLE)?;
        let computer_sprite = require_sprite(assets, sprites::COMPUTER_PADDLE)?;

        world.insert(victory_sound, SoundRef::new(sfx::VICTORY))?;
        world.insert(defeat_sound, SoundRef::new(sfx::DEFEAT))?;

        Self::place(world, background, background_sprite, self.bounds.left, self.bounds.bottom)?;

        Self::place(
            world,
            ball,
            ball_sprite,
            -ball_sprite.width() / 2.0,
            -ball_sprite.height() / 2.0,
        )?;
        let serve = self.serve();
        world.insert(ball, serve)?;
        world.insert(ball, SoundRef::new(sfx::BOUNCE))?;

        let margin = self.config.paddle_margin;
        Self::place(
            world,
            human,
            human_sprite,
            self.bounds.left + margin,
            -human_sprite.height() / 2.0,
        )?;
        world.insert(human, PlayerIdentity::Human)?;

        Self::place(
            world,
            computer,
            computer_sprite,
            self.bounds.right - margin - computer_sprite.width(),
            -computer_sprite.height() / 2.0,
        )?;
        world.insert(computer, PlayerIdentity::Computer)?;

        self.assets_loaded = true;
        Ok(())
    }

    fn dispose(&mut self, _world: &mut World, sounds: &mut SoundCache) -> Result<(), EngineError> {
        ensure_disposable(self.entities.is_some(), self.assets_loaded)?;
        for path in [sfx::BOUNCE, sfx::VICTORY, sfx::DEFEAT] {
            sounds.unload(path);
        }
        Ok(())
    }
}

/// Builds the unfinished second game: a single ball slowed by friction
#[derive(Debug)]
pub struct PrototypeInitializer {
    bounds: ScreenBounds,
    ball: Option<Entity>,
    assets_loaded: bool,
}

impl PrototypeInitializer {
    /// Create an initializer for the configured screen
    pub fn new(config: &GameConfig) -> Self {
        PrototypeInitializer {
            bounds: config.bounds(),
            ball: None,
            assets_loaded: false,
        }
    }

    /// The ball entity, once created
    pub fn ball(&self) -> Option<Entity> {
        self.ball
    }
}

impl EntityInitializer for PrototypeInitializer {
    fn create_all_entities(
        &mut self,
        world: &mut World,
        _sounds: &mut SoundCache,
        loader: &mut AssetLoader,
    ) -> Result<(), EngineError> {
        loader.add_asset_to_load(sprites::PROTOTYPE_BALL);

        let ball = world.create_entity();
        world.attach::<Position>(ball)?;
        world.attach::<Velocity>(ball)?;
        self.ball = Some(ball);
        Ok(())
    }

    fn set_loadable_assets(&mut self, world: &mut World, assets: &dyn AssetSource) -> Result<(), EngineError> {
        let Some(ball) = self.ball else {
            return Err(EngineError::usage("entities have not been created before setting assets"));
        };

        let sprite = require_sprite(assets, sprites::PROTOTYPE_BALL)?;
        world.insert(ball, sprite)?;
        world.insert(
            ball,
            Position::new(-sprite.width() / 2.0, self.bounds.bottom + 128.0),
        )?;

        self.assets_loaded = true;
        Ok(())
    }

    fn dispose(&mut self, world: &mut World, _sounds: &mut SoundCache) -> Result<(), EngineError> {
        ensure_disposable(self.ball.is_some(), self.assets_loaded)?;
        if let Some(ball) = self.ball {
            world.remove::<Renderable>(ball);
        }
        Ok(())
    }
}
