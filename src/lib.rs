//! kbot - a Discord bot that splits voice channel members into random teams.
//!
//! The core is a small command dispatch engine: incoming message lines are
//! tokenized, matched against a read-only [`commands::Registry`], coerced
//! into typed arguments, and handed to a boxed [`commands::Handler`]. The
//! one non-trivial handler is `teams`, which shuffles the invoker's voice
//! channel into N groups and moves each group to its own channel.

pub mod commands;
pub mod config;
pub mod error;
pub mod network;
pub mod platform;
pub mod telemetry;
