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
//! Inter-system messaging
//!
//! A single FIFO shared by every system of a session. Each message is
//! addressed to a [`Recipient`]; a recipient pops the oldest message
//! addressed to it and leaves everything else in place. Systems that find a
//! message meant for a sibling entity push it back, so several entities can
//! filter one stream.
//!
//! Payloads are typed: each [`Message`] variant is consumed by exactly one
//! recipient, and pushing a variant to a recipient that never reads it is
//! rejected up front instead of sitting in the queue forever.

use crate::ecs::components::PlayerIdentity;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Systems that read from the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recipient {
    /// Pointer-driven paddle positioning
    HumanPositioning,
    /// Ball-tracking paddle AI
    ComputerPositioning,
    /// Score accumulation
    Scoring,
    /// Sound playback
    Sound,
}

impl Recipient {
    /// Check whether this recipient consumes `message`
    pub fn accepts(&self, message: &Message) -> bool {
        matches!(
            (self, message),
            (Recipient::HumanPositioning, Message::InputY(_))
                | (Recipient::ComputerPositioning, Message::BallY(_))
                | (Recipient::Scoring, Message::Score(_))
                | (Recipient::Sound, Message::PlaySound(_))
        )
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Recipient::HumanPositioning => "human-positioning",
            Recipient::ComputerPositioning => "computer-positioning",
            Recipient::Scoring => "scoring",
            Recipient::Sound => "sound",
        };
        f.write_str(name)
    }
}

/// Message payloads
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Requested paddle y in world space
    InputY(f32),
    /// Ball y after this frame's collision pass
    BallY(f32),
    /// A point for the given player
    Score(PlayerIdentity),
    /// Play the sound stored under this asset key
    PlaySound(String),
}

impl Message {
    /// The recipient that consumes this kind of message
    pub fn recipient(&self) -> Recipient {
        match self {
            Message::InputY(_) => Recipient::HumanPositioning,
            Message::BallY(_) => Recipient::ComputerPositioning,
            Message::Score(_) => Recipient::Scoring,
            Message::PlaySound(_) => Recipient::Sound,
        }
    }

    /// Short name of the variant, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Message::InputY(_) => "INPUT_Y",
            Message::BallY(_) => "BALL_Y",
            Message::Score(_) => "SCORE",
            Message::PlaySound(_) => "PLAY",
        }
    }
}

/// A message together with its addressee
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    recipient: Recipient,
    message: Message,
}

impl Envelope {
    /// Address `message` to `recipient`
    pub fn new(recipient: Recipient, message: Message) -> Self {
        Envelope { recipient, message }
    }

    /// Addressee
    pub fn recipient(&self) -> Recipient {
        self.recipient
    }

    /// Payload
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Unwrap the payload
    pub fn into_message(self) -> Message {
        self.message
    }
}

impl From<Message> for Envelope {
    fn from(message: Message) -> Self {
        Envelope::new(message.recipient(), message)
    }
}

/// Messaging failures
#[derive(Debug, Error, PartialEq)]
pub enum MessagingError {
    /// The recipient never consumes this kind of message
    #[error("{recipient} does not accept {kind} messages")]
    Misaddressed {
        /// Addressee of the rejected message
        recipient: Recipient,
        /// Variant name of the rejected message
        kind: &'static str,
    },
}

/// Shared FIFO of addressed messages
///
/// Push and pop are serialized behind a mutex so the queue can be shared by
/// reference between systems and any background collaborator.
#[derive(Debug, Default)]
pub struct MessageQueue {
    queue: Mutex<VecDeque<Envelope>>,
}

impl MessageQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Envelope>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an addressed message to the back of the queue
    pub fn push(&self, envelope: impl Into<Envelope>) -> Result<(), MessagingError> {
        let envelope = envelope.into();
        if !envelope.recipient.accepts(&envelope.message) {
            return Err(MessagingError::Misaddressed {
                recipient: envelope.recipient,
                kind: envelope.message.kind(),
            });
        }

        log::trace!("queue <- {} for {}", envelope.message.kind(), envelope.recipient);
        self.lock().push_back(envelope);
        Ok(())
    }

    /// Remove and return the oldest message addressed to `recipient`
    ///
    /// Messages for other recipients keep their relative order.
    pub fn pop(&self, recipient: Recipient) -> Option<Message> {
        let mut queue = self.lock();
        let index = queue.iter().position(|e| e.recipient == recipient)?;
        queue.remove(index).map(Envelope::into_message)
    }

    /// Number of queued messages for every recipient
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check whether the queue holds no messages at all
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Number of queued messages addressed to `recipient`
    pub fn pending_for(&self, recipient: Recipient) -> usize {
        self.lock().iter().filter(|e| e.recipient == recipient).count()
    }

    /// Drop every queued message
    pub fn clear(&self) {
        self.lock().clear();
    }
}
