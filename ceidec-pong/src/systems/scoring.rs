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
//! Score accumulation
//!
//! Every paddle holding a [`Score`] claims the score messages naming its own
//! player. A message for another player is pushed back untouched and the
//! entity stops draining for this frame, leaving the message for its owner.

use crate::ecs::components::{PlayerIdentity, Score};
use crate::ecs::{ComponentMask, Entity, Family, Frame, System, World};
use crate::error::EngineError;
use crate::messaging::{Message, Recipient};

/// Credits points to the player they were scored for
#[derive(Debug, Clone, Default)]
pub struct ScoringSystem;

impl ScoringSystem {
    /// Create the system
    pub fn new() -> Self {
        ScoringSystem
    }
}

impl System for ScoringSystem {
    fn family(&self) -> Family {
        Family::all(ComponentMask::SCORE | ComponentMask::PLAYER)
    }

    fn run(
        &mut self,
        world: &mut World,
        entities: &[Entity],
        frame: &mut Frame<'_>,
    ) -> Result<(), EngineError> {
        let queue = frame.queue();

        for &entity in entities {
            let Some(&player) = world.get::<PlayerIdentity>(entity) else {
                continue;
            };
            let Some(score) = world.get_mut::<Score>(entity) else {
                continue;
            };

            while let Some(message) = queue.pop(Recipient::Scoring) {
                match message {
                    Message::Score(scorer) if scorer == player => {
                        score.increment();
                        log::debug!("{} scores, now {}", player, score.value());
                    }
                    other => {
                        queue.push(other)?;
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "ScoringSystem"
    }
}
