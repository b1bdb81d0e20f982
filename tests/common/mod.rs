//! Integration test common infrastructure.
//!
//! Provides a scripted in-memory `Platform` so dispatch and partition flows
//! can be exercised without a Discord connection.

#![allow(dead_code)]

use async_trait::async_trait;
use kbot::platform::{
    ChannelId, Participant, ParticipantId, Platform, PlatformError, VoiceChannel,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// In-memory platform: voice channels, occupancy, and a log of every
/// relocation and outgoing message.
#[derive(Default)]
pub struct MockPlatform {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    channels: Vec<VoiceChannel>,
    occupancy: HashMap<u64, u64>,
    relocations: Vec<(u64, u64)>,
    sent: Vec<(u64, String)>,
    failing: HashSet<u64>,
}

/// The mention string the mock renders for a participant.
pub fn mention(participant: u64) -> String {
    format!("<@{participant}>")
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_voice_channel(&self, id: u64, position: i64) {
        self.state.lock().unwrap().channels.push(VoiceChannel {
            id: ChannelId(id),
            position,
        });
    }

    /// Put a participant into a voice channel.
    pub fn place(&self, participant: u64, channel: u64) {
        self.state
            .lock()
            .unwrap()
            .occupancy
            .insert(participant, channel);
    }

    /// Make every future relocation of this participant fail.
    pub fn fail_relocation(&self, participant: u64) {
        self.state.lock().unwrap().failing.insert(participant);
    }

    pub fn relocations(&self) -> Vec<(u64, u64)> {
        self.state.lock().unwrap().relocations.clone()
    }

    pub fn sent(&self) -> Vec<(u64, String)> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn channel_of(&self, participant: u64) -> Option<u64> {
        self.state.lock().unwrap().occupancy.get(&participant).copied()
    }

    pub fn occupants(&self, channel: u64) -> usize {
        self.state
            .lock()
            .unwrap()
            .occupancy
            .values()
            .filter(|&&ch| ch == channel)
            .count()
    }
}

#[async_trait]
impl Platform for MockPlatform {
    async fn send_text(&self, channel: ChannelId, text: &str) -> Result<(), PlatformError> {
        self.state
            .lock()
            .unwrap()
            .sent
            .push((channel.0, text.to_string()));
        Ok(())
    }

    async fn current_voice_channel(
        &self,
        participant: ParticipantId,
    ) -> Result<Option<VoiceChannel>, PlatformError> {
        let state = self.state.lock().unwrap();
        let Some(&channel) = state.occupancy.get(&participant.0) else {
            return Ok(None);
        };
        Ok(state.channels.iter().find(|ch| ch.id.0 == channel).copied())
    }

    async fn voice_channel_members(
        &self,
        channel: ChannelId,
    ) -> Result<Vec<Participant>, PlatformError> {
        let state = self.state.lock().unwrap();
        let mut members: Vec<u64> = state
            .occupancy
            .iter()
            .filter(|&(_, &ch)| ch == channel.0)
            .map(|(&p, _)| p)
            .collect();
        members.sort_unstable();
        Ok(members
            .into_iter()
            .map(|p| Participant {
                id: ParticipantId(p),
                mention: mention(p),
            })
            .collect())
    }

    async fn ordered_voice_channels(&self) -> Result<Vec<VoiceChannel>, PlatformError> {
        let state = self.state.lock().unwrap();
        let mut channels = state.channels.clone();
        channels.sort_by_key(|ch| (ch.position, ch.id.0));
        Ok(channels)
    }

    async fn relocate(
        &self,
        participant: ParticipantId,
        channel: ChannelId,
    ) -> Result<(), PlatformError> {
        let mut state = self.state.lock().unwrap();
        if state.failing.contains(&participant.0) {
            return Err(PlatformError::Api("scripted relocation failure".into()));
        }
        state.relocations.push((participant.0, channel.0));
        state.occupancy.insert(participant.0, channel.0);
        Ok(())
    }
}
