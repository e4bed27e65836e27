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
//! Recording collaborators for unit tests

use crate::assets::{AssetError, AudioBackend, SoundCache, SoundHandle};
use crate::ecs::{Frame, System, World};
use crate::error::EngineError;
use crate::messaging::MessageQueue;
use crate::render::{Renderer, SpriteHandle};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct AudioLog {
    loads: Vec<String>,
    played: Vec<String>,
    unloaded: usize,
    paths: HashMap<u32, String>,
}

/// Audio backend that remembers every call; clones share one log
#[derive(Clone, Default)]
pub struct RecordingAudio {
    log: Arc<Mutex<AudioLog>>,
    fail_on: Option<String>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(path: &str) -> Self {
        RecordingAudio {
            log: Arc::default(),
            fail_on: Some(path.to_string()),
        }
    }

    pub fn loads(&self) -> Vec<String> {
        self.log.lock().unwrap().loads.clone()
    }

    pub fn played(&self) -> Vec<String> {
        self.log.lock().unwrap().played.clone()
    }

    pub fn unloaded(&self) -> usize {
        self.log.lock().unwrap().unloaded
    }
}

impl AudioBackend for RecordingAudio {
    fn load(&mut self, path: &str) -> Result<SoundHandle, AssetError> {
        if self.fail_on.as_deref() == Some(path) {
            return Err(AssetError::SoundLoad {
                path: path.to_string(),
                reason: "no such file".to_string(),
            });
        }
        let mut log = self.log.lock().unwrap();
        let id = log.loads.len() as u32;
        log.loads.push(path.to_string());
        log.paths.insert(id, path.to_string());
        Ok(SoundHandle::new(id))
    }

    fn play(&mut self, sound: SoundHandle) {
        let mut log = self.log.lock().unwrap();
        let path = log.paths.get(&sound.raw()).cloned().unwrap_or_default();
        log.played.push(path);
    }

    fn unload(&mut self, _sound: SoundHandle) {
        self.log.lock().unwrap().unloaded += 1;
    }
}

/// Renderer that keeps every draw call of the current session
#[derive(Default)]
pub struct RecordingRenderer {
    pub drawing: bool,
    pub sprites: Vec<(SpriteHandle, f32, f32)>,
    pub texts: Vec<(String, f32, f32)>,
}

impl Renderer for RecordingRenderer {
    fn begin_frame(&mut self) {
        self.drawing = true;
    }

    fn draw_sprite(&mut self, sprite: SpriteHandle, x: f32, y: f32) {
        self.sprites.push((sprite, x, y));
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32) {
        self.texts.push((text.to_string(), x, y));
    }

    fn end_frame(&mut self) {
        self.drawing = false;
    }

    fn is_drawing(&self) -> bool {
        self.drawing
    }
}

/// Runs single systems against a world outside of a scheduler
pub struct Harness {
    pub queue: MessageQueue,
    pub sounds: SoundCache,
    pub audio: RecordingAudio,
    pub renderer: RecordingRenderer,
}

impl Harness {
    pub fn new() -> Self {
        let audio = RecordingAudio::new();
        Harness {
            queue: MessageQueue::new(),
            sounds: SoundCache::new(Box::new(audio.clone())),
            audio,
            renderer: RecordingRenderer::default(),
        }
    }

    pub fn run(
        &mut self,
        system: &mut dyn System,
        world: &mut World,
        delta: f32,
    ) -> Result<(), EngineError> {
        let members = world.family_members(system.family()).to_vec();
        let mut frame = Frame::new(delta, &self.queue, &mut self.sounds, &mut self.renderer);
        system.run(world, &members, &mut frame)
    }
}
