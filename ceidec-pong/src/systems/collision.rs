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
//! Ball collision resolution
//!
//! Runs over every entity with a position, a bounding box and a velocity
//! that is not a player paddle. Per frame and per ball:
//!
//! 1. Crossing the left border respawns the ball and credits the computer.
//! 2. Crossing the right border respawns the ball and credits the human.
//! 3. Touching the bottom or top border clamps the ball back on screen,
//!    points its vertical velocity inward and accelerates it.
//! 4. Each other bounding box (the paddles) is tested against the ball's
//!    left and right edges; a hit points the horizontal velocity away from
//!    the paddle and accelerates.
//! 5. The ball's y coordinate is always published for the computer paddle.
//!
//! Bounces are sign flips, not angle-of-incidence reflections.

use crate::assets::sfx;
use crate::config::{GameConfig, ScreenBounds};
use crate::ecs::components::{BoundingBox, PlayerIdentity, Position, Renderable, SoundRef, Velocity};
use crate::ecs::{ComponentMask, Entity, Family, Frame, System, World};
use crate::error::EngineError;
use crate::messaging::{Message, MessageQueue};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Bounces, scores and respawns balls
pub struct CollisionSystem {
    bounds: ScreenBounds,
    base_speed: f32,
    spawn_angle: f32,
    acceleration: f32,
    max_speed: Option<f32>,
    rng: StdRng,
    collidables: Vec<Entity>,
}

impl CollisionSystem {
    /// Create a system with an entropy-seeded spawn generator
    pub fn new(config: &GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a system whose respawn angles are reproducible
    pub fn with_seed(config: &GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &GameConfig, rng: StdRng) -> Self {
        CollisionSystem {
            bounds: config.bounds(),
            base_speed: config.ball_speed,
            spawn_angle: config.spawn_angle_degrees,
            acceleration: config.ball_acceleration,
            max_speed: config.max_ball_speed,
            rng,
            collidables: Vec::new(),
        }
    }

    /// Put a ball back at the center and serve it in a random direction
    ///
    /// The ball is centered using its sprite extent, or placed at the
    /// origin when it has none.
    pub fn respawn(&mut self, position: &mut Position, velocity: &mut Velocity, sprite: Option<&Renderable>) {
        let velocity_angle = if self.spawn_angle > 0.0 {
            self.rng.gen_range(-self.spawn_angle..=self.spawn_angle)
        } else {
            0.0
        };
        let sign = if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        let (sin, cos) = velocity_angle.to_radians().sin_cos();
        velocity.set_xy(cos * -self.base_speed * sign, sin * self.base_speed * sign);

        match sprite {
            Some(sprite) => position.set_xy(-sprite.width() / 2.0, -sprite.height() / 2.0),
            None => position.set_xy(0.0, 0.0),
        }
        log::debug!(
            "ball respawned heading {:.1} deg at ({:.1}, {:.1})",
            velocity_angle,
            velocity.vx(),
            velocity.vy()
        );
    }

    fn accelerate(&self, velocity: &mut Velocity) {
        velocity.scale(self.acceleration);
        if let Some(cap) = self.max_speed {
            let speed = velocity.magnitude();
            if speed > cap {
                velocity.scale(cap / speed);
            }
        }
    }
}

fn bounce_sound(queue: &MessageQueue, sound: Option<&str>) -> Result<(), EngineError> {
    if let Some(path) = sound {
        queue.push(Message::PlaySound(path.to_string()))?;
    }
    Ok(())
}

/// Left edge of `a` at its bottom, top or middle lies inside `b`
fn collides_left(a: &BoundingBox, b: &BoundingBox) -> bool {
    edge_inside(a.x(), a, b)
}

/// Right edge of `a` at its bottom, top or middle lies inside `b`
fn collides_right(a: &BoundingBox, b: &BoundingBox) -> bool {
    edge_inside(a.right(), a, b)
}

fn edge_inside(x: f32, a: &BoundingBox, b: &BoundingBox) -> bool {
    b.contains(x, a.y()) || b.contains(x, a.top()) || b.contains(x, a.center_y())
}

impl System for CollisionSystem {
    fn family(&self) -> Family {
        Family::all(ComponentMask::POSITION | ComponentMask::BOUNDING_BOX | ComponentMask::VELOCITY)
            .excluding(ComponentMask::PLAYER)
    }

    fn run(
        &mut self,
        world: &mut World,
        entities: &[Entity],
        frame: &mut Frame<'_>,
    ) -> Result<(), EngineError> {
        let queue = frame.queue();

        self.collidables.clear();
        self.collidables
            .extend_from_slice(world.family_members(Family::all(ComponentMask::BOUNDING_BOX)));

        for &entity in entities {
            let (Some(mut position), Some(mut bbox), Some(mut velocity)) = (
                world.get::<Position>(entity).copied(),
                world.get::<BoundingBox>(entity).copied(),
                world.get::<Velocity>(entity).copied(),
            ) else {
                log::warn!("{} lacks a position, bounding box or velocity; skipped", entity);
                continue;
            };
            let sprite = world.get::<Renderable>(entity).copied();
            let sound = world
                .get::<SoundRef>(entity)
                .filter(|sound| sound.is_set())
                .map(|sound| sound.path().to_string());
            let sound = sound.as_deref();

            if position.x() < self.bounds.left {
                self.respawn(&mut position, &mut velocity, sprite.as_ref());
                queue.push(Message::Score(PlayerIdentity::Computer))?;
                queue.push(Message::PlaySound(sfx::DEFEAT.to_string()))?;
            }

            if position.x() + bbox.width() >= self.bounds.right {
                self.respawn(&mut position, &mut velocity, sprite.as_ref());
                queue.push(Message::Score(PlayerIdentity::Human))?;
                queue.push(Message::PlaySound(sfx::VICTORY.to_string()))?;
            }

            if position.y() < self.bounds.bottom {
                position.set_y(self.bounds.bottom);
                velocity.set_vy(velocity.vy().abs());
                self.accelerate(&mut velocity);
                bounce_sound(queue, sound)?;
            }

            if position.y() + bbox.height() >= self.bounds.top {
                position.set_y(self.bounds.top - bbox.height());
                velocity.set_vy(-velocity.vy().abs());
                self.accelerate(&mut velocity);
                bounce_sound(queue, sound)?;
            }

            bbox.set_position(position.x(), position.y());
            for &other in &self.collidables {
                if other == entity {
                    continue;
                }
                let Some(&other_position) = world.get::<Position>(other) else {
                    continue;
                };
                let Some(other_bbox) = world.get_mut::<BoundingBox>(other) else {
                    continue;
                };
                other_bbox.set_position(other_position.x(), other_position.y());
                let other_bbox = *other_bbox;

                if collides_left(&bbox, &other_bbox) {
                    velocity.set_vx(velocity.vx().abs());
                    self.accelerate(&mut velocity);
                    bounce_sound(queue, sound)?;
                } else if collides_right(&bbox, &other_bbox) {
                    velocity.set_vx(-velocity.vx().abs());
                    self.accelerate(&mut velocity);
                    bounce_sound(queue, sound)?;
                }
            }

            queue.push(Message::BallY(position.y()))?;

            world.insert(entity, position)?;
            world.insert(entity, bbox)?;
            world.insert(entity, velocity)?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "CollisionSystem"
    }
}
