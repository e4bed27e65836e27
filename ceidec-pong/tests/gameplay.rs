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
//! Gameplay properties of the individual systems
//!
//! Drives systems by hand against a world built through the public API.

mod common;

use approx::assert_relative_eq;
use ceidec_pong::assets::sfx;
use ceidec_pong::config::{GameConfig, ScreenBounds};
use ceidec_pong::ecs::components::{
    BoundingBox, PlayerIdentity, Position, Renderable, Score, SoundRef, Velocity,
};
use ceidec_pong::ecs::{Entity, World};
use ceidec_pong::messaging::{Message, Recipient};
use ceidec_pong::render::SpriteHandle;
use ceidec_pong::systems::{
    CollisionSystem, HumanPositioningSystem, KinematicsSystem, ScoringSystem, SoundSystem,
};
use common::Rig;

const DT: f32 = 1.0 / 60.0;

fn ball_at(world: &mut World, x: f32, y: f32, velocity: Velocity) -> Entity {
    let ball = world.create_entity();
    world.insert(ball, Position::new(x, y)).unwrap();
    world.insert(ball, velocity).unwrap();
    world.insert(ball, BoundingBox::new(x, y, 32.0, 32.0)).unwrap();
    world.insert(ball, Renderable::new(SpriteHandle::new(2), 32.0, 32.0)).unwrap();
    world.insert(ball, SoundRef::new(sfx::BOUNCE)).unwrap();
    ball
}

fn drain(rig: &Rig, recipient: Recipient) -> Vec<Message> {
    std::iter::from_fn(|| rig.queue.pop(recipient)).collect()
}

#[test]
fn test_kinematics_step_for_every_moving_entity() {
    let mut world = World::new();
    let entities: Vec<(Entity, Position, Velocity)> = (0..20)
        .map(|i| {
            let entity = world.create_entity();
            let position = Position::new(i as f32 * 10.0, -(i as f32));
            let velocity = Velocity::new(100.0 - i as f32 * 7.0, i as f32 * 3.5);
            world.insert(entity, position).unwrap();
            world.insert(entity, velocity).unwrap();
            (entity, position, velocity)
        })
        .collect();

    let mut rig = Rig::new();
    rig.run(&mut KinematicsSystem::new(), &mut world, DT).unwrap();

    for (entity, before, velocity) in entities {
        let after = world.get::<Position>(entity).unwrap();
        assert_relative_eq!(after.x(), before.x() + velocity.vx() * DT);
        assert_relative_eq!(after.y(), before.y() + velocity.vy() * DT);
    }
}

#[test]
fn test_ball_reflects_off_bottom_border() {
    let mut world = World::new();
    let ball = ball_at(&mut world, 0.0, -545.0, Velocity::new(0.0, -100.0));
    let mut rig = Rig::new();

    rig.run(&mut CollisionSystem::with_seed(&GameConfig::default(), 1), &mut world, DT)
        .unwrap();

    assert_relative_eq!(world.get::<Velocity>(ball).unwrap().vy(), 100.0 * 1.03);
    assert_eq!(world.get::<Position>(ball).unwrap().y(), -540.0);
}

#[test]
fn test_score_claimed_by_owner_only() {
    let mut world = World::new();
    let computer = world.create_entity();
    world.insert(computer, Score::default()).unwrap();
    world.insert(computer, PlayerIdentity::Computer).unwrap();
    let human = world.create_entity();
    world.insert(human, Score::default()).unwrap();
    world.insert(human, PlayerIdentity::Human).unwrap();
    let mut rig = Rig::new();

    rig.queue.push(Message::Score(PlayerIdentity::Human)).unwrap();
    rig.run(&mut ScoringSystem::new(), &mut world, DT).unwrap();
    rig.run(&mut ScoringSystem::new(), &mut world, DT).unwrap();

    assert_eq!(world.get::<Score>(human).unwrap().value(), 1);
    assert_eq!(world.get::<Score>(computer).unwrap().value(), 0);
}

#[test]
fn test_sound_reaches_single_matching_emitter() {
    let mut world = World::new();
    for path in [sfx::VICTORY, sfx::DEFEAT, sfx::BOUNCE] {
        let emitter = world.create_entity();
        world.insert(emitter, SoundRef::new(path)).unwrap();
    }
    let mut rig = Rig::new();

    rig.queue.push(Message::PlaySound(sfx::VICTORY.to_string())).unwrap();
    rig.run(&mut SoundSystem::new(), &mut world, DT).unwrap();

    assert_eq!(rig.audio.played(), vec![sfx::VICTORY.to_string()]);
    assert!(rig.queue.is_empty());
}

#[test]
fn test_left_border_crossing_end_to_end() {
    let mut world = World::new();
    let ball = ball_at(&mut world, -960.0, 0.0, Velocity::new(-475.0, 0.0));
    let mut rig = Rig::new();
    let mut kinematics = KinematicsSystem::new();
    let mut collision = CollisionSystem::with_seed(&GameConfig::default(), 99);

    rig.run(&mut kinematics, &mut world, DT).unwrap();
    rig.run(&mut collision, &mut world, DT).unwrap();

    assert_eq!(*world.get::<Position>(ball).unwrap(), Position::new(-16.0, -16.0));
    assert_eq!(drain(&rig, Recipient::Scoring), vec![Message::Score(PlayerIdentity::Computer)]);
    assert_eq!(PlayerIdentity::Computer.id(), 1);
    assert_eq!(
        drain(&rig, Recipient::Sound),
        vec![Message::PlaySound(sfx::DEFEAT.to_string())]
    );

    let velocity = world.get::<Velocity>(ball).unwrap();
    assert_relative_eq!(velocity.magnitude(), 475.0, epsilon = 0.01);
    let angle = (velocity.vy() / velocity.vx()).atan().to_degrees();
    assert!(angle.abs() <= 60.0 + 1e-3, "serve angle {} out of range", angle);
}

#[test]
fn test_repeated_respawns_stay_on_screen() {
    let bounds = ScreenBounds::default();
    let mut world = World::new();
    let ball = ball_at(&mut world, -970.0, 0.0, Velocity::new(-1.0e5, 3.0e4));
    let mut rig = Rig::new();
    let mut collision = CollisionSystem::with_seed(&GameConfig::default(), 5);

    for _ in 0..50 {
        world.get_mut::<Position>(ball).unwrap().set_x(-970.0);
        rig.run(&mut collision, &mut world, DT).unwrap();

        let bbox = world.get::<BoundingBox>(ball).unwrap();
        assert!(bbox.x() >= bounds.left && bbox.right() < bounds.right);
        assert!(bbox.y() >= bounds.bottom && bbox.top() < bounds.top);
        rig.queue.clear();
    }
}

#[test]
fn test_input_y_sets_or_clamps_paddle() {
    let mut world = World::new();
    let short = world.create_entity();
    world.insert(short, Position::new(-860.0, 0.0)).unwrap();
    world.insert(short, BoundingBox::new(-860.0, 0.0, 32.0, 200.0)).unwrap();
    world.insert(short, PlayerIdentity::Human).unwrap();
    let mut rig = Rig::new();
    let mut human = HumanPositioningSystem::new(ScreenBounds::default());

    rig.queue.push(Message::InputY(300.0)).unwrap();
    rig.run(&mut human, &mut world, DT).unwrap();
    assert_eq!(world.get::<Position>(short).unwrap().y(), 300.0);

    world.insert(short, BoundingBox::new(-860.0, 0.0, 32.0, 256.0)).unwrap();
    rig.queue.push(Message::InputY(300.0)).unwrap();
    rig.run(&mut human, &mut world, DT).unwrap();
    assert_eq!(world.get::<Position>(short).unwrap().y(), 539.0 - 256.0);
}
