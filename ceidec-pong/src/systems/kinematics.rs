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
//! Kinematics integration
//!
//! Explicit Euler step over every entity holding a position and a velocity:
//! `p' = p + v * dt`, followed by `v' = v * friction` when damping is
//! configured. The step walks the dense component pools directly; with the
//! `parallel` feature it is split across the rayon thread pool.

use crate::ecs::components::{Position, Velocity};
use crate::ecs::{ComponentMask, Entity, Family, Frame, System, World};
use crate::error::EngineError;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

const MOVING: ComponentMask = ComponentMask::POSITION.union(ComponentMask::VELOCITY);

/// Integrates velocity into position every frame
#[derive(Debug, Clone, Default)]
pub struct KinematicsSystem {
    friction: Option<f32>,
}

impl KinematicsSystem {
    /// Undamped integration
    pub fn new() -> Self {
        KinematicsSystem { friction: None }
    }

    /// Integration that scales velocity by `friction` after each step
    pub fn with_friction(friction: f32) -> Self {
        KinematicsSystem {
            friction: Some(friction),
        }
    }

    /// Configured damping factor
    pub fn friction(&self) -> Option<f32> {
        self.friction
    }
}

impl System for KinematicsSystem {
    fn family(&self) -> Family {
        Family::all(MOVING)
    }

    fn run(
        &mut self,
        world: &mut World,
        entities: &[Entity],
        frame: &mut Frame<'_>,
    ) -> Result<(), EngineError> {
        if entities.is_empty() {
            return Ok(());
        }
        let (positions, velocities, masks) = world.motion_view();
        integrate_motion(positions, velocities, masks, frame.delta(), self.friction);
        Ok(())
    }

    fn name(&self) -> &str {
        "KinematicsSystem"
    }
}

#[inline]
fn step(position: &mut Position, velocity: &mut Velocity, mask: ComponentMask, dt: f32, friction: Option<f32>) {
    if !mask.contains(MOVING) {
        return;
    }
    position.set_xy(
        position.x() + velocity.vx() * dt,
        position.y() + velocity.vy() * dt,
    );
    if let Some(friction) = friction {
        velocity.scale(friction);
    }
}

/// Advance every slot whose mask holds both a position and a velocity
///
/// The slices are indexed by entity slot; slots without both components
/// are left untouched.
pub fn integrate_motion(
    positions: &mut [Position],
    velocities: &mut [Velocity],
    masks: &[ComponentMask],
    dt: f32,
    friction: Option<f32>,
) {
    #[cfg(feature = "parallel")]
    {
        positions
            .par_iter_mut()
            .zip(velocities.par_iter_mut())
            .zip(masks.par_iter())
            .for_each(|((position, velocity), &mask)| step(position, velocity, mask, dt, friction));
    }

    #[cfg(not(feature = "parallel"))]
    {
        for ((position, velocity), &mask) in positions.iter_mut().zip(velocities.iter_mut()).zip(masks) {
            step(position, velocity, mask, dt, friction);
        }
    }
}
