//! `teams` command handler: shuffle the invoker's voice channel into N
//! groups and move each group to its own voice channel.
//!
//! The membership snapshot is taken before any relocation happens and
//! nothing serializes overlapping invocations, so two `teams` runs started
//! close together on the same channel may each shuffle a membership list
//! that the other is already moving. Known and accepted; there is no
//! per-channel lock.

use super::{Context, Handler, ParsedArgs};
use crate::error::{HandlerError, HandlerResult};
use crate::platform::{ChannelId, VoiceChannel};
use async_trait::async_trait;
use rand::seq::SliceRandom;
use tracing::{info, warn};

/// Handler for `teams <number_of_teams:integer>`.
pub struct TeamsHandler;

#[async_trait]
impl Handler for TeamsHandler {
    async fn handle(&self, ctx: &Context<'_>, args: &ParsedArgs) -> HandlerResult {
        let requested = args
            .int("number_of_teams")
            .ok_or_else(|| HandlerError::Internal("missing 'number_of_teams' argument".into()))?;

        // Preconditions, in order. Each is a terminal reply, not an error.
        let Some(current) = ctx.platform.current_voice_channel(ctx.author.id).await? else {
            return Ok(Some(format!(
                "{}, you're not in a voice channel!",
                ctx.author.mention
            )));
        };

        if requested < 2 {
            return Ok(Some(format!(
                "{}, the number of teams must be >= 2!",
                ctx.author.mention
            )));
        }
        let team_count = usize::try_from(requested).unwrap_or(usize::MAX);

        let channels = ctx.platform.ordered_voice_channels().await?;
        let Some(destinations) = destination_slice(&channels, current.id, team_count) else {
            return Ok(Some(format!(
                "{}, not enough voice channels below the current one",
                ctx.author.mention
            )));
        };

        let mut members = ctx.platform.voice_channel_members(current.id).await?;
        members.shuffle(&mut rand::thread_rng());

        let size = team_size(members.len(), team_count);
        let groups = partition(&members, team_count, size);
        info!(
            members = members.len(),
            teams = team_count,
            team_size = size,
            "Partitioning voice channel"
        );

        let mut report = String::from("Teams:\n");
        for (group, destination) in groups.iter().zip(destinations) {
            report.push('[');
            for (i, member) in group.iter().enumerate() {
                if i > 0 {
                    report.push(',');
                }
                report.push_str(&member.mention);
                // Best-effort: a failed move is logged, the rest proceed
                // and the report is produced regardless.
                if let Err(err) = ctx.platform.relocate(member.id, destination.id).await {
                    warn!(
                        participant = %member.id,
                        channel = %destination.id,
                        error = %err,
                        "Relocation failed"
                    );
                }
            }
            report.push_str("]\n");
        }

        Ok(Some(report))
    }
}

/// The `team_count` channels at or after `current` in the position-ordered
/// list, or `None` when fewer remain (or `current` is not a known voice
/// channel).
fn destination_slice(
    channels: &[VoiceChannel],
    current: ChannelId,
    team_count: usize,
) -> Option<&[VoiceChannel]> {
    let start = channels.iter().position(|ch| ch.id == current)?;
    if channels.len() - start < team_count {
        return None;
    }
    Some(&channels[start..start + team_count])
}

/// Round-half-up average team size: `floor(members / teams + 0.5)`.
fn team_size(members: usize, teams: usize) -> usize {
    (2 * members + teams) / (2 * teams)
}

/// Split `members` into `teams` contiguous groups: group `i` is
/// `members[i*size .. (i+1)*size]`, clamped to the member count. Slicing is
/// strictly sequential, with no redistribution: trailing groups may be
/// shorter than `size` or empty.
fn partition<T>(members: &[T], teams: usize, size: usize) -> Vec<&[T]> {
    (0..teams)
        .map(|i| {
            let start = (i * size).min(members.len());
            let end = ((i + 1) * size).min(members.len());
            &members[start..end]
        })
        .collect()
}
