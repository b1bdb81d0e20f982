//! Serenity-backed [`Platform`] implementation.

use super::{ChannelId, Participant, ParticipantId, Platform, PlatformError, VoiceChannel};
use async_trait::async_trait;
use serenity::all::{
    Cache, ChannelId as DiscordChannelId, ChannelType, EditMember, GuildId, Http, Mentionable,
    UserId,
};
use std::sync::Arc;

/// Platform implementation over Serenity's HTTP client and gateway cache,
/// scoped to a single guild.
pub struct DiscordPlatform {
    http: Arc<Http>,
    cache: Arc<Cache>,
    guild: GuildId,
}

impl DiscordPlatform {
    pub fn new(http: Arc<Http>, cache: Arc<Cache>, guild: GuildId) -> Self {
        Self { http, cache, guild }
    }

    // Cache reads stay in synchronous helpers: the guild guard must not be
    // held across an await.

    fn voice_channel_of(&self, user: UserId) -> Result<Option<VoiceChannel>, PlatformError> {
        let guild = self
            .cache
            .guild(self.guild)
            .ok_or(PlatformError::GuildUnavailable)?;
        let Some(channel_id) = guild.voice_states.get(&user).and_then(|vs| vs.channel_id) else {
            return Ok(None);
        };
        Ok(guild.channels.get(&channel_id).map(|ch| VoiceChannel {
            id: ChannelId(channel_id.get()),
            position: i64::from(ch.position),
        }))
    }

    fn members_of(&self, channel: ChannelId) -> Result<Vec<Participant>, PlatformError> {
        let guild = self
            .cache
            .guild(self.guild)
            .ok_or(PlatformError::GuildUnavailable)?;
        Ok(guild
            .voice_states
            .iter()
            .filter(|(_, vs)| vs.channel_id.map(DiscordChannelId::get) == Some(channel.0))
            .map(|(user_id, _)| Participant {
                id: ParticipantId(user_id.get()),
                mention: user_id.mention().to_string(),
            })
            .collect())
    }

    fn voice_channels(&self) -> Result<Vec<VoiceChannel>, PlatformError> {
        let guild = self
            .cache
            .guild(self.guild)
            .ok_or(PlatformError::GuildUnavailable)?;
        let mut channels: Vec<VoiceChannel> = guild
            .channels
            .values()
            .filter(|ch| ch.kind == ChannelType::Voice)
            .map(|ch| VoiceChannel {
                id: ChannelId(ch.id.get()),
                position: i64::from(ch.position),
            })
            .collect();
        channels.sort_by_key(|ch| (ch.position, ch.id.0));
        Ok(channels)
    }
}

#[async_trait]
impl Platform for DiscordPlatform {
    async fn send_text(&self, channel: ChannelId, text: &str) -> Result<(), PlatformError> {
        DiscordChannelId::new(channel.0)
            .say(&self.http, text)
            .await
            .map(|_| ())
            .map_err(|e| PlatformError::Api(e.to_string()))
    }

    async fn current_voice_channel(
        &self,
        participant: ParticipantId,
    ) -> Result<Option<VoiceChannel>, PlatformError> {
        self.voice_channel_of(UserId::new(participant.0))
    }

    async fn voice_channel_members(
        &self,
        channel: ChannelId,
    ) -> Result<Vec<Participant>, PlatformError> {
        self.members_of(channel)
    }

    async fn ordered_voice_channels(&self) -> Result<Vec<VoiceChannel>, PlatformError> {
        self.voice_channels()
    }

    async fn relocate(
        &self,
        participant: ParticipantId,
        channel: ChannelId,
    ) -> Result<(), PlatformError> {
        self.guild
            .edit_member(
                &self.http,
                UserId::new(participant.0),
                EditMember::new().voice_channel(DiscordChannelId::new(channel.0)),
            )
            .await
            .map(|_| ())
            .map_err(|e| PlatformError::Api(e.to_string()))
    }
}
