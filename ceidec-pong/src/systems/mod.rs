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
//! Gameplay systems
//!
//! One module per pipeline stage. None of these systems refer to each
//! other; everything they exchange travels through the
//! [`MessageQueue`](crate::messaging::MessageQueue).

mod collision;
mod input;
mod kinematics;
mod render;
mod scoring;
mod sound;

pub use collision::CollisionSystem;
pub use input::{ComputerPositioningSystem, HumanPositioningSystem, PaddleBoundsSystem};
pub use kinematics::{integrate_motion, KinematicsSystem};
pub use render::RenderingSystem;
pub use scoring::ScoringSystem;
pub use sound::SoundSystem;
