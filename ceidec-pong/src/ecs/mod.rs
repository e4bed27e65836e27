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
//! Entity Component System (ECS) core implementation
//!
//! This module provides the foundational ECS architecture including:
//! - Generational entity handles with free-list reuse
//! - Pooled component storage indexed by entity slot
//! - Family queries answered from an incremental index
//! - The staged update pipeline

mod component;
pub mod components;
mod entity;
pub mod scheduler;
mod system;
mod world;

pub use component::{Component, ComponentMask, ComponentPool, Family};
pub use entity::Entity;
pub use scheduler::{stages, Scheduler, StageId};
pub use system::{Frame, System};
pub use world::{World, WorldStats};
