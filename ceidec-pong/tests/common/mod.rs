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
//! Shared fakes for the integration tests

#![allow(dead_code)]

use ceidec_pong::assets::{AssetError, AudioBackend, SoundCache, SoundHandle, StaticAtlas};
use ceidec_pong::ecs::{Frame, System, World};
use ceidec_pong::initializer::sprites;
use ceidec_pong::messaging::MessageQueue;
use ceidec_pong::render::{Renderer, SpriteHandle};
use ceidec_pong::EngineError;
use std::sync::{Arc, Mutex};

/// Audio backend recording loads and plays; clones share the log
#[derive(Clone, Default)]
pub struct RecordingAudio {
    paths: Arc<Mutex<Vec<String>>>,
    played: Arc<Mutex<Vec<String>>>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> Vec<String> {
        self.played.lock().unwrap().clone()
    }

    pub fn played_count(&self, path: &str) -> usize {
        self.played.lock().unwrap().iter().filter(|p| *p == path).count()
    }
}

impl AudioBackend for RecordingAudio {
    fn load(&mut self, path: &str) -> Result<SoundHandle, AssetError> {
        let mut paths = self.paths.lock().unwrap();
        paths.push(path.to_string());
        Ok(SoundHandle::new(paths.len() as u32 - 1))
    }

    fn play(&mut self, sound: SoundHandle) {
        let path = self.paths.lock().unwrap()[sound.raw() as usize].clone();
        self.played.lock().unwrap().push(path);
    }

    fn unload(&mut self, _sound: SoundHandle) {}
}

/// Renderer counting what was drawn in the last frame
#[derive(Default)]
pub struct RecordingRenderer {
    drawing: bool,
    pub sprites: Vec<(SpriteHandle, f32, f32)>,
    pub texts: Vec<String>,
}

impl Renderer for RecordingRenderer {
    fn begin_frame(&mut self) {
        self.drawing = true;
        self.sprites.clear();
        self.texts.clear();
    }

    fn draw_sprite(&mut self, sprite: SpriteHandle, x: f32, y: f32) {
        self.sprites.push((sprite, x, y));
    }

    fn draw_text(&mut self, text: &str, _x: f32, _y: f32) {
        self.texts.push(text.to_string());
    }

    fn end_frame(&mut self) {
        self.drawing = false;
    }

    fn is_drawing(&self) -> bool {
        self.drawing
    }
}

/// Sprites of both games with their shipped sizes
pub fn fixed_atlas() -> StaticAtlas {
    StaticAtlas::new()
        .with_sprite(sprites::BACKGROUND, 1920.0, 1080.0)
        .with_sprite(sprites::BALL, 32.0, 32.0)
        .with_sprite(sprites::HUMAN_PADDLE, 32.0, 256.0)
        .with_sprite(sprites::COMPUTER_PADDLE, 32.0, 256.0)
        .with_sprite(sprites::PROTOTYPE_BALL, 64.0, 64.0)
        .with_load_delay(2)
}

/// Queue and sound cache for driving systems by hand
pub struct Rig {
    pub queue: MessageQueue,
    pub sounds: SoundCache,
    pub audio: RecordingAudio,
    pub renderer: RecordingRenderer,
}

impl Rig {
    pub fn new() -> Self {
        let audio = RecordingAudio::new();
        Rig {
            queue: MessageQueue::new(),
            sounds: SoundCache::new(Box::new(audio.clone())),
            audio,
            renderer: RecordingRenderer::default(),
        }
    }

    pub fn run<S: System>(&mut self, system: &mut S, world: &mut World, delta: f32) -> Result<(), EngineError> {
        let members = world.family_members(system.family()).to_vec();
        let mut frame = Frame::new(delta, &self.queue, &mut self.sounds, &mut self.renderer);
        system.run(world, &members, &mut frame)
    }
}
