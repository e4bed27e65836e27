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
//! Update pipeline scheduler
//!
//! Systems are organized into stages that execute sequentially every frame,
//! giving a deterministic execution order. Inside a stage, systems run in
//! the order they were added. Before a system runs, the entities of its
//! family are copied into a pooled buffer so the system may attach, detach
//! or mutate components while walking them.

use crate::ecs::{Entity, Frame, System, World};
use crate::error::EngineError;
use crate::pool::{BufferPool, PoolConfig, PoolStats};

/// Stage identifier for grouping systems
///
/// Stages execute in ascending order; systems within a stage keep their
/// insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StageId(pub usize);

impl StageId {
    /// Create a new stage ID
    pub fn new(id: usize) -> Self {
        StageId(id)
    }
}

/// Pre-defined stages of a game frame
pub mod stages {
    use super::StageId;

    /// Paddle positioning from pointer input and the computer policy
    pub const INPUT: StageId = StageId(0);

    /// Integration of velocity into position
    pub const KINEMATICS: StageId = StageId(1);

    /// Border and paddle collision resolution
    pub const COLLISION: StageId = StageId(2);

    /// Score accumulation
    pub const SCORING: StageId = StageId(3);

    /// Sound playback
    pub const SOUND: StageId = StageId(4);

    /// Drawing; always last
    pub const RENDER: StageId = StageId(5);
}

/// A system with metadata for scheduling
struct ScheduledSystem {
    system: Box<dyn System>,
    stage: StageId,
}

/// Ordered list of systems run once per frame
///
/// # Examples
///
/// ```
/// use ceidec_pong::ecs::scheduler::{Scheduler, stages};
/// use ceidec_pong::ecs::{ComponentMask, Entity, Family, Frame, System, World};
/// use ceidec_pong::error::EngineError;
///
/// struct Idle;
/// impl System for Idle {
///     fn family(&self) -> Family {
///         Family::all(ComponentMask::empty())
///     }
///
///     fn run(&mut self, _: &mut World, _: &[Entity], _: &mut Frame<'_>) -> Result<(), EngineError> {
///         Ok(())
///     }
/// }
///
/// let mut scheduler = Scheduler::new();
/// scheduler.add_system(Idle, stages::KINEMATICS);
/// assert_eq!(scheduler.system_count(), 1);
/// ```
pub struct Scheduler {
    systems: Vec<ScheduledSystem>,
    buffers: BufferPool<Entity>,
}

impl Scheduler {
    /// Create a new scheduler
    pub fn new() -> Self {
        Self::with_stages(0)
    }

    /// Create a scheduler with room for the given number of stages
    pub fn with_stages(stage_count: usize) -> Self {
        Scheduler {
            systems: Vec::with_capacity(stage_count * 2),
            buffers: BufferPool::with_config(PoolConfig::new(16, 4)),
        }
    }

    /// Add a system to a specific stage
    ///
    /// The system runs after every system already added to the same or an
    /// earlier stage.
    pub fn add_system<S: System + 'static>(&mut self, system: S, stage: StageId) {
        let at = self.systems.partition_point(|s| s.stage <= stage);
        self.systems.insert(
            at,
            ScheduledSystem {
                system: Box::new(system),
                stage,
            },
        );
    }

    /// Get the number of registered systems
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Get the number of stages in use
    pub fn stage_count(&self) -> usize {
        self.systems.last().map_or(0, |s| s.stage.0 + 1)
    }

    /// Names of the registered systems in execution order
    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|s| s.system.name()).collect()
    }

    /// Reuse counters of the snapshot buffers
    pub fn buffer_stats(&self) -> PoolStats {
        self.buffers.stats()
    }

    /// Execute every system once, in stage order
    ///
    /// The first system error aborts the rest of the frame.
    pub fn run(&mut self, world: &mut World, frame: &mut Frame<'_>) -> Result<(), EngineError> {
        for scheduled in &mut self.systems {
            let mut members = self.buffers.acquire();
            members.extend_from_slice(world.family_members(scheduled.system.family()));

            if let Err(err) = scheduled.system.run(world, &members, frame) {
                log::warn!("{} aborted the frame: {}", scheduled.system.name(), err);
                return Err(err);
            }
        }
        Ok(())
    }

    /// Clear all systems from the scheduler
    pub fn clear(&mut self) {
        self.systems.clear();
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::SoundCache;
    use crate::ecs::components::{Position, Velocity};
    use crate::ecs::{ComponentMask, Family};
    use crate::messaging::MessageQueue;
    use crate::render::NullRenderer;
    use crate::testing::RecordingAudio;
    use std::sync::{Arc, Mutex};

    struct TestSystem {
        name: String,
        family: Family,
        log: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl TestSystem {
        fn new(name: &str, log: &Arc<Mutex<Vec<String>>>) -> Self {
            TestSystem {
                name: name.to_string(),
                family: Family::all(ComponentMask::empty()),
                log: Arc::clone(log),
                fail: false,
            }
        }

        fn failing(mut self) -> Self {
            self.fail = true;
            self
        }

        fn with_family(mut self, family: Family) -> Self {
            self.family = family;
            self
        }
    }

    impl System for TestSystem {
        fn family(&self) -> Family {
            self.family
        }

        fn run(
            &mut self,
            _world: &mut World,
            entities: &[Entity],
            _frame: &mut Frame<'_>,
        ) -> Result<(), EngineError> {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.name, entities.len()));
            if self.fail {
                return Err(EngineError::usage("boom"));
            }
            Ok(())
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    fn run_frame(scheduler: &mut Scheduler, world: &mut World) -> Result<(), EngineError> {
        let queue = MessageQueue::new();
        let mut sounds = SoundCache::new(Box::new(RecordingAudio::new()));
        let mut renderer = NullRenderer::new();
        let mut frame = Frame::new(1.0 / 60.0, &queue, &mut sounds, &mut renderer);
        scheduler.run(world, &mut frame)
    }

    fn entries(log: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    #[test]
    fn test_scheduler_creation() {
        let scheduler = Scheduler::new();
        assert_eq!(scheduler.system_count(), 0);
        assert_eq!(scheduler.stage_count(), 0);
    }

    #[test]
    fn test_stage_ordering() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut scheduler = Scheduler::new();
        scheduler.add_system(TestSystem::new("render", &log), stages::RENDER);
        scheduler.add_system(TestSystem::new("input", &log), stages::INPUT);
        scheduler.add_system(TestSystem::new("collision", &log), stages::COLLISION);

        assert_eq!(scheduler.stage_count(), 6);
        assert_eq!(scheduler.system_names(), vec!["input", "collision", "render"]);

        let mut world = World::new();
        run_frame(&mut scheduler, &mut world).unwrap();
        assert_eq!(entries(&log), vec!["input:0", "collision:0", "render:0"]);
    }

    #[test]
    fn test_insertion_order_within_stage() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut scheduler = Scheduler::new();
        scheduler.add_system(TestSystem::new("human", &log), stages::INPUT);
        scheduler.add_system(TestSystem::new("sound", &log), stages::SOUND);
        scheduler.add_system(TestSystem::new("computer", &log), stages::INPUT);

        assert_eq!(scheduler.system_names(), vec!["human", "computer", "sound"]);
    }

    #[test]
    fn test_family_snapshot() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut scheduler = Scheduler::new();
        scheduler.add_system(
            TestSystem::new("moving", &log)
                .with_family(Family::all(ComponentMask::POSITION | ComponentMask::VELOCITY)),
            stages::KINEMATICS,
        );

        let mut world = World::new();
        let ball = world.create_entity();
        world.insert(ball, Position::new(0.0, 0.0)).unwrap();
        world.insert(ball, Velocity::new(1.0, 1.0)).unwrap();
        let wall = world.create_entity();
        world.insert(wall, Position::new(5.0, 5.0)).unwrap();

        run_frame(&mut scheduler, &mut world).unwrap();
        run_frame(&mut scheduler, &mut world).unwrap();

        assert_eq!(entries(&log), vec!["moving:1", "moving:1"]);
        assert!(scheduler.buffer_stats().hits >= 1);
    }

    #[test]
    fn test_error_aborts_frame() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut scheduler = Scheduler::new();
        scheduler.add_system(TestSystem::new("first", &log).failing(), stages::INPUT);
        scheduler.add_system(TestSystem::new("second", &log), stages::RENDER);

        let mut world = World::new();
        let err = run_frame(&mut scheduler, &mut world).unwrap_err();

        assert!(matches!(err, EngineError::Usage(_)));
        assert_eq!(entries(&log), vec!["first:0"]);
    }

    #[test]
    fn test_empty_scheduler() {
        let mut scheduler = Scheduler::new();
        let mut world = World::new();
        assert!(run_frame(&mut scheduler, &mut world).is_ok());
    }

    #[test]
    fn test_clear_scheduler() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut scheduler = Scheduler::new();
        scheduler.add_system(TestSystem::new("test", &log), stages::KINEMATICS);
        assert_eq!(scheduler.system_count(), 1);

        scheduler.clear();
        assert_eq!(scheduler.system_count(), 0);
    }
}
