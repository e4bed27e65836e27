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
//! Headless Pong runner
//!
//! Plays a fixed number of 60 Hz frames with a null renderer, a pointer
//! that follows the ball, and audio that is only logged.
//!
//! Usage: `ceidec-pong [config.toml] [frames]`

use ceidec_pong::assets::{AssetError, AudioBackend, SoundHandle, StaticAtlas};
use ceidec_pong::config::GameConfig;
use ceidec_pong::initializer::sprites;
use ceidec_pong::render::{NullRenderer, Viewport};
use ceidec_pong::{EngineError, GameSession};
use std::collections::HashMap;

const FRAME_TIME: f32 = 1.0 / 60.0;
const DEFAULT_FRAMES: u64 = 60 * 60;
const WINDOW: (f32, f32) = (1280.0, 720.0);
const PADDLE_HEIGHT: f32 = 256.0;

/// Audio backend that logs instead of playing
#[derive(Default)]
struct LoggingAudio {
    loaded: HashMap<u32, String>,
    next: u32,
}

impl AudioBackend for LoggingAudio {
    fn load(&mut self, path: &str) -> Result<SoundHandle, AssetError> {
        self.next += 1;
        self.loaded.insert(self.next, path.to_string());
        log::debug!("loaded sound {}", path);
        Ok(SoundHandle::new(self.next))
    }

    fn play(&mut self, sound: SoundHandle) {
        if let Some(path) = self.loaded.get(&sound.raw()) {
            log::info!("sfx: {}", path);
        }
    }

    fn unload(&mut self, sound: SoundHandle) {
        self.loaded.remove(&sound.raw());
    }
}

fn atlas(config: &GameConfig) -> StaticAtlas {
    StaticAtlas::new()
        .with_sprite(sprites::BACKGROUND, config.framebuffer_width, config.framebuffer_height)
        .with_sprite(sprites::BALL, 32.0, 32.0)
        .with_sprite(sprites::HUMAN_PADDLE, 32.0, PADDLE_HEIGHT)
        .with_sprite(sprites::COMPUTER_PADDLE, 32.0, PADDLE_HEIGHT)
        .with_load_delay(3)
}

fn screen_y(world_y: f32, config: &GameConfig) -> f32 {
    let rendered_height = WINDOW.0 * config.framebuffer_height / config.framebuffer_width;
    WINDOW.1 / 2.0 - world_y * rendered_height / config.framebuffer_height
}

fn run(config_path: Option<String>, frames: u64) -> Result<(), EngineError> {
    let config = match config_path {
        Some(path) => {
            log::info!("Loading configuration from {}", path);
            GameConfig::load_from_file(&path)?
        }
        None => GameConfig::default(),
    };

    let mut session = GameSession::pong(&config, Box::new(LoggingAudio::default()))?;
    let mut source = atlas(&config);
    let mut renderer = NullRenderer::new();
    let viewport = Viewport::new(WINDOW.0, WINDOW.1, config.framebuffer_width, config.framebuffer_height);

    while !session.poll_assets(&mut source)? {
        log::debug!("waiting for assets");
    }

    for frame in 0..frames {
        if let Some(ball) = session.ball_position() {
            let target = ball.y() - PADDLE_HEIGHT / 2.0;
            session.pointer_input(WINDOW.0 / 2.0, screen_y(target, &config), &viewport)?;
        }
        session.update(FRAME_TIME, &mut renderer)?;

        if frame > 0 && frame % 600 == 0 {
            log::info!("score after {} s: {:?}", frame / 60, session.scoreboard());
        }
    }

    log::info!(
        "Final score after {} frames: {:?}",
        renderer.frames(),
        session.scoreboard()
    );
    session.end()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next();
    let frames = match args.next().map(|n| n.parse::<u64>()) {
        Some(Ok(frames)) => frames,
        Some(Err(e)) => {
            log::error!("Invalid frame count: {}", e);
            std::process::exit(1);
        }
        None => DEFAULT_FRAMES,
    };

    log::info!("Starting ceidec-pong for {} frames", frames);
    if let Err(e) = run(config_path, frames) {
        log::error!("Game error: {}", e);
        std::process::exit(1);
    }
}
