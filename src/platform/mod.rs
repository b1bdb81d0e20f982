//! Narrow interface to the chat platform.
//!
//! Command handlers never talk to Discord directly; they see only the
//! [`Platform`] trait, scoped to the guild of the triggering message. The
//! real implementation is [`DiscordPlatform`]; tests script an in-memory
//! one.

mod discord;

pub use discord::DiscordPlatform;

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Opaque participant (user) id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParticipantId(pub u64);

/// Opaque channel id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(pub u64);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A guild member, with the mention string used in reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
    pub mention: String,
}

/// A voice channel; `position` establishes a total order within the guild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceChannel {
    pub id: ChannelId,
    pub position: i64,
}

/// Platform call failures.
#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    #[error("platform API call failed: {0}")]
    Api(String),
    #[error("guild not available in cache")]
    GuildUnavailable,
}

/// Operations the command layer needs from the platform.
///
/// One `Platform` value covers one guild. Every call suspends, so
/// concurrent invocations interleave freely; see `commands::teams` for the
/// consequences.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Deliver a text message to a channel.
    async fn send_text(&self, channel: ChannelId, text: &str) -> Result<(), PlatformError>;

    /// The participant's current voice channel, if any.
    async fn current_voice_channel(
        &self,
        participant: ParticipantId,
    ) -> Result<Option<VoiceChannel>, PlatformError>;

    /// Snapshot of the participants currently in a voice channel.
    async fn voice_channel_members(
        &self,
        channel: ChannelId,
    ) -> Result<Vec<Participant>, PlatformError>;

    /// All voice channels of the guild, sorted by position ascending.
    async fn ordered_voice_channels(&self) -> Result<Vec<VoiceChannel>, PlatformError>;

    /// Move a participant into a voice channel.
    async fn relocate(
        &self,
        participant: ParticipantId,
        channel: ChannelId,
    ) -> Result<(), PlatformError>;
}
