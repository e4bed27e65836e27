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
//! Sound triggering
//!
//! Every entity holding a [`SoundRef`] filters the shared sound stream:
//! messages naming its own asset are played, everything else is set aside
//! and re-queued once the stream is drained, for the next entity to inspect.

use crate::ecs::components::SoundRef;
use crate::ecs::{ComponentMask, Entity, Family, Frame, System, World};
use crate::error::EngineError;
use crate::messaging::{Message, Recipient};

/// Plays the sounds requested by other systems
#[derive(Debug, Default)]
pub struct SoundSystem {
    ignored: Vec<Message>,
}

impl SoundSystem {
    /// Create the system
    pub fn new() -> Self {
        Self::default()
    }
}

impl System for SoundSystem {
    fn family(&self) -> Family {
        Family::all(ComponentMask::SOUND)
    }

    fn run(
        &mut self,
        world: &mut World,
        entities: &[Entity],
        frame: &mut Frame<'_>,
    ) -> Result<(), EngineError> {
        let queue = frame.queue();

        for &entity in entities {
            let Some(path) = world.get::<SoundRef>(entity).map(|sound| sound.path().to_string()) else {
                continue;
            };

            let mut played = Ok(());
            while let Some(message) = queue.pop(Recipient::Sound) {
                match message {
                    Message::PlaySound(requested) if requested == path => {
                        log::trace!("playing {}", path);
                        if let Err(err) = frame.sounds().play(&path) {
                            played = Err(err);
                            break;
                        }
                    }
                    other => self.ignored.push(other),
                }
            }

            // Set-aside messages go back even when playback failed
            for message in self.ignored.drain(..) {
                queue.push(message)?;
            }
            played?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "SoundSystem"
    }
}
