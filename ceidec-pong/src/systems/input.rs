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
//! Paddle positioning systems
//!
//! The human paddle follows pointer input delivered as [`Message::InputY`];
//! the computer paddle steers toward the last [`Message::BallY`] published
//! by the collision system. Both keep the paddle between the vertical
//! screen borders, and [`PaddleBoundsSystem`] clamps again once kinematics
//! has moved the paddles for the frame.

use crate::config::ScreenBounds;
use crate::ecs::components::{BoundingBox, PlayerIdentity, Position, Velocity};
use crate::ecs::{ComponentMask, Entity, Family, Frame, System, World};
use crate::error::EngineError;
use crate::messaging::{Message, Recipient};

/// Moves the human paddle to the latest pointer position
#[derive(Debug, Clone)]
pub struct HumanPositioningSystem {
    bounds: ScreenBounds,
}

impl HumanPositioningSystem {
    /// Create a system clamping against `bounds`
    pub fn new(bounds: ScreenBounds) -> Self {
        HumanPositioningSystem { bounds }
    }
}

impl System for HumanPositioningSystem {
    fn family(&self) -> Family {
        Family::all(ComponentMask::PLAYER | ComponentMask::POSITION | ComponentMask::BOUNDING_BOX)
    }

    fn run(
        &mut self,
        world: &mut World,
        entities: &[Entity],
        frame: &mut Frame<'_>,
    ) -> Result<(), EngineError> {
        let queue = frame.queue();

        for &entity in entities {
            if world.get::<PlayerIdentity>(entity) != Some(&PlayerIdentity::Human) {
                continue;
            }
            let height = match world.get::<BoundingBox>(entity) {
                Some(bbox) => bbox.height(),
                None => continue,
            };
            let Some(position) = world.get_mut::<Position>(entity) else {
                continue;
            };

            while let Some(message) = queue.pop(Recipient::HumanPositioning) {
                if let Message::InputY(y) = message {
                    position.set_y(self.bounds.clamp_vertical(y, height));
                }
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "HumanPositioningSystem"
    }
}

/// Steers the computer paddle toward the ball
#[derive(Debug, Clone)]
pub struct ComputerPositioningSystem {
    bounds: ScreenBounds,
    speed: f32,
}

impl ComputerPositioningSystem {
    /// Create a system moving the paddle at `speed` units per second
    pub fn new(bounds: ScreenBounds, speed: f32) -> Self {
        ComputerPositioningSystem { bounds, speed }
    }
}

impl System for ComputerPositioningSystem {
    fn family(&self) -> Family {
        Family::all(
            ComponentMask::PLAYER
                | ComponentMask::VELOCITY
                | ComponentMask::POSITION
                | ComponentMask::BOUNDING_BOX,
        )
    }

    fn run(
        &mut self,
        world: &mut World,
        entities: &[Entity],
        frame: &mut Frame<'_>,
    ) -> Result<(), EngineError> {
        let queue = frame.queue();

        for &entity in entities {
            if world.get::<PlayerIdentity>(entity) != Some(&PlayerIdentity::Computer) {
                continue;
            }
            let height = match world.get::<BoundingBox>(entity) {
                Some(bbox) => bbox.height(),
                None => continue,
            };
            let Some(y) = world.get::<Position>(entity).map(Position::y) else {
                continue;
            };
            let center = y + height / 2.0;

            let mut vy = None;
            while let Some(message) = queue.pop(Recipient::ComputerPositioning) {
                if let Message::BallY(ball_y) = message {
                    if ball_y > center {
                        vy = Some(self.speed);
                    } else if ball_y < center {
                        vy = Some(-self.speed);
                    }
                }
            }

            if let (Some(vy), Some(velocity)) = (vy, world.get_mut::<Velocity>(entity)) {
                velocity.set_vy(vy);
            }
            if let Some(position) = world.get_mut::<Position>(entity) {
                position.set_y(self.bounds.clamp_vertical(y, height));
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "ComputerPositioningSystem"
    }
}

/// Keeps every paddle between the vertical borders after it has moved
#[derive(Debug, Clone)]
pub struct PaddleBoundsSystem {
    bounds: ScreenBounds,
}

impl PaddleBoundsSystem {
    /// Create a system clamping against `bounds`
    pub fn new(bounds: ScreenBounds) -> Self {
        PaddleBoundsSystem { bounds }
    }
}

impl System for PaddleBoundsSystem {
    fn family(&self) -> Family {
        Family::all(ComponentMask::PLAYER | ComponentMask::POSITION | ComponentMask::BOUNDING_BOX)
    }

    fn run(
        &mut self,
        world: &mut World,
        entities: &[Entity],
        _frame: &mut Frame<'_>,
    ) -> Result<(), EngineError> {
        for &entity in entities {
            let Some(height) = world.get::<BoundingBox>(entity).map(BoundingBox::height) else {
                continue;
            };
            if let Some(position) = world.get_mut::<Position>(entity) {
                position.set_y(self.bounds.clamp_vertical(position.y(), height));
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "PaddleBoundsSystem"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;

    fn paddle(world: &mut World, player: PlayerIdentity, y: f32) -> Entity {
        let entity = world.create_entity();
        world.insert(entity, Position::new(-860.0, y)).unwrap();
        world.insert(entity, Velocity::default()).unwrap();
        world.insert(entity, BoundingBox::new(-860.0, y, 32.0, 200.0)).unwrap();
        world.insert(entity, player).unwrap();
        entity
    }

    fn y_of(world: &World, entity: Entity) -> f32 {
        world.get::<Position>(entity).unwrap().y()
    }

    #[test]
    fn test_human_follows_input_inside_bounds() {
        let mut world = World::new();
        let human = paddle(&mut world, PlayerIdentity::Human, 0.0);
        let mut harness = Harness::new();
        let mut system = HumanPositioningSystem::new(ScreenBounds::default());

        harness.queue.push(Message::InputY(300.0)).unwrap();
        harness.run(&mut system, &mut world, 1.0 / 60.0).unwrap();

        assert_eq!(y_of(&world, human), 300.0);
        assert!(harness.queue.is_empty());
    }

    #[test]
    fn test_human_clamps_to_borders() {
        let mut world = World::new();
        let human = paddle(&mut world, PlayerIdentity::Human, 0.0);
        let mut harness = Harness::new();
        let mut system = HumanPositioningSystem::new(ScreenBounds::default());

        harness.queue.push(Message::InputY(500.0)).unwrap();
        harness.run(&mut system, &mut world, 1.0 / 60.0).unwrap();
        assert_eq!(y_of(&world, human), 539.0 - 200.0);

        harness.queue.push(Message::InputY(-900.0)).unwrap();
        harness.run(&mut system, &mut world, 1.0 / 60.0).unwrap();
        assert_eq!(y_of(&world, human), -540.0);
    }

    #[test]
    fn test_human_applies_last_input() {
        let mut world = World::new();
        let human = paddle(&mut world, PlayerIdentity::Human, 0.0);
        let mut harness = Harness::new();
        let mut system = HumanPositioningSystem::new(ScreenBounds::default());

        harness.queue.push(Message::InputY(10.0)).unwrap();
        harness.queue.push(Message::InputY(20.0)).unwrap();
        harness.run(&mut system, &mut world, 1.0 / 60.0).unwrap();

        assert_eq!(y_of(&world, human), 20.0);
    }

    #[test]
    fn test_human_ignores_computer_paddle() {
        let mut world = World::new();
        let computer = paddle(&mut world, PlayerIdentity::Computer, 0.0);
        let mut harness = Harness::new();
        let mut system = HumanPositioningSystem::new(ScreenBounds::default());

        harness.queue.push(Message::InputY(100.0)).unwrap();
        harness.run(&mut system, &mut world, 1.0 / 60.0).unwrap();

        assert_eq!(y_of(&world, computer), 0.0);
        assert_eq!(harness.queue.pending_for(Recipient::HumanPositioning), 1);
    }

    #[test]
    fn test_computer_steers_toward_ball() {
        let mut world = World::new();
        let computer = paddle(&mut world, PlayerIdentity::Computer, -100.0);
        let mut harness = Harness::new();
        let mut system = ComputerPositioningSystem::new(ScreenBounds::default(), 550.0);

        harness.queue.push(Message::BallY(200.0)).unwrap();
        harness.run(&mut system, &mut world, 1.0 / 60.0).unwrap();
        assert_eq!(world.get::<Velocity>(computer).unwrap().vy(), 550.0);

        harness.queue.push(Message::BallY(-400.0)).unwrap();
        harness.run(&mut system, &mut world, 1.0 / 60.0).unwrap();
        assert_eq!(world.get::<Velocity>(computer).unwrap().vy(), -550.0);
    }

    #[test]
    fn test_computer_keeps_velocity_when_aligned() {
        let mut world = World::new();
        let computer = paddle(&mut world, PlayerIdentity::Computer, -100.0);
        world.get_mut::<Velocity>(computer).unwrap().set_vy(550.0);
        let mut harness = Harness::new();
        let mut system = ComputerPositioningSystem::new(ScreenBounds::default(), 550.0);

        harness.queue.push(Message::BallY(0.0)).unwrap();
        harness.run(&mut system, &mut world, 1.0 / 60.0).unwrap();

        assert_eq!(world.get::<Velocity>(computer).unwrap().vy(), 550.0);
    }

    #[test]
    fn test_computer_clamped_without_messages() {
        let mut world = World::new();
        let computer = paddle(&mut world, PlayerIdentity::Computer, 450.0);
        let mut harness = Harness::new();
        let mut system = ComputerPositioningSystem::new(ScreenBounds::default(), 550.0);

        harness.run(&mut system, &mut world, 1.0 / 60.0).unwrap();

        assert_eq!(y_of(&world, computer), 339.0);
    }

    #[test]
    fn test_paddle_clamped_after_moving() {
        use crate::systems::KinematicsSystem;

        let mut world = World::new();
        let computer = paddle(&mut world, PlayerIdentity::Computer, 335.0);
        let human = paddle(&mut world, PlayerIdentity::Human, -538.0);
        world.get_mut::<Velocity>(computer).unwrap().set_vy(550.0);
        world.get_mut::<Velocity>(human).unwrap().set_vy(-550.0);
        let mut harness = Harness::new();
        let mut bounds = PaddleBoundsSystem::new(ScreenBounds::default());

        harness.run(&mut KinematicsSystem::new(), &mut world, 1.0 / 60.0).unwrap();
        assert!(y_of(&world, computer) + 200.0 > 539.0);
        harness.run(&mut bounds, &mut world, 1.0 / 60.0).unwrap();

        assert_eq!(y_of(&world, computer), 339.0);
        assert_eq!(y_of(&world, human), -540.0);
    }
}
