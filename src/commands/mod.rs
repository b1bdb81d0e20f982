//! Command dispatch engine.
//!
//! This module contains the [`Handler`] trait, the command [`Registry`], and
//! the per-invocation parse state machine. The registry is populated once at
//! startup, is read-only afterwards, and is shared across tasks behind an
//! `Arc` with no synchronization.
//!
//! Every dispatch-time failure mode (no command, unknown command, bad arity,
//! `-h`/`--help`, coercion failure) terminates the invocation with a single
//! user-facing string; nothing at this layer panics or kills the task.

mod coerce;
mod hello;
mod help;
mod teams;

pub use coerce::{CoerceError, Value, coerce};
pub use hello::HelloHandler;
pub use help::HelpHandler;
pub use teams::TeamsHandler;

use crate::error::HandlerResult;
use crate::platform::{ChannelId, Participant, Platform};
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// The closed set of value kinds a parameter may declare.
///
/// New kinds are added by extending this enum (and [`Value`]), never by
/// branching on ad-hoc string checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Text,
    Int,
}

impl ParamKind {
    /// Type name as rendered in usage strings.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Text => "string",
            Self::Int => "integer",
        }
    }
}

/// One declared parameter. Declaration order is significant: coercion and
/// usage rendering both follow it.
#[derive(Debug, Clone, Copy)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub kind: ParamKind,
}

/// Fully coerced arguments for one handler call, keyed by parameter name.
///
/// Populated in declaration order and complete (one entry per declared
/// parameter) before the handler runs.
#[derive(Debug, Default)]
pub struct ParsedArgs {
    values: HashMap<&'static str, Value>,
}

impl ParsedArgs {
    fn insert(&mut self, name: &'static str, value: Value) {
        self.values.insert(name, value);
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(Value::as_text)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.values.get(name).and_then(Value::as_int)
    }
}

/// Handler context passed to each command handler.
pub struct Context<'a> {
    /// Platform operations, scoped to the guild of the triggering message.
    pub platform: &'a dyn Platform,
    /// Text channel the invocation arrived in.
    pub channel: ChannelId,
    /// The invoking participant.
    pub author: Participant,
    /// The registry, for help rendering.
    pub registry: &'a Registry,
}

/// Trait implemented by all command handlers.
///
/// A handler runs with a fully populated [`ParsedArgs`] and may return an
/// optional trailing reply for the originating channel. Errors it returns
/// are caught and logged at the gateway, never shown to the user.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, ctx: &Context<'_>, args: &ParsedArgs) -> HandlerResult;
}

/// A registered command: unique name, ordered parameters, help text,
/// handler. Created once at startup, never mutated.
pub struct Command {
    pub name: &'static str,
    pub params: &'static [ParameterSpec],
    pub help: &'static str,
    handler: Box<dyn Handler>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("help", &self.help)
            .finish_non_exhaustive()
    }
}

impl Command {
    pub fn new(
        name: &'static str,
        params: &'static [ParameterSpec],
        help: &'static str,
        handler: Box<dyn Handler>,
    ) -> Self {
        Self {
            name,
            params,
            help,
            handler,
        }
    }
}

/// Registration errors. These only occur at startup; dispatch never
/// modifies the registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate command: {0}")]
    DuplicateCommand(&'static str),
}

/// Terminal parse states for one invocation. All are rendered to a single
/// user-facing string; none of them is retried or escalated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("no command given")]
    NoCommandGiven,

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("not enough arguments for command {command}")]
    ArityMismatch { command: &'static str },

    /// Not a fault: `-h`/`--help` short-circuits to the usage string before
    /// any coercion, so it wins over would-be type errors.
    #[error("help requested for {command}")]
    HelpRequested { command: &'static str },

    #[error("{source}")]
    ArgumentInvalid {
        command: &'static str,
        source: CoerceError,
    },
}

/// Registry of commands, in registration order.
pub struct Registry {
    commands: Vec<Command>,
    index: HashMap<&'static str, usize>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Create a registry with the built-in commands registered.
    pub fn builtin() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.register(Command::new(
            "hello",
            &[ParameterSpec {
                name: "name",
                kind: ParamKind::Text,
            }],
            "greets a human",
            Box::new(HelloHandler),
        ))?;
        registry.register(Command::new(
            "help",
            &[],
            "displays this help text",
            Box::new(HelpHandler),
        ))?;
        registry.register(Command::new(
            "teams",
            &[ParameterSpec {
                name: "number_of_teams",
                kind: ParamKind::Int,
            }],
            "group voice channel members into teams",
            Box::new(TeamsHandler),
        ))?;
        Ok(registry)
    }

    /// Add a command. Duplicate names are a configuration error.
    pub fn register(&mut self, command: Command) -> Result<(), RegistryError> {
        if self.index.contains_key(command.name) {
            return Err(RegistryError::DuplicateCommand(command.name));
        }
        self.index.insert(command.name, self.commands.len());
        self.commands.push(command);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&Command> {
        self.index.get(name).map(|&i| &self.commands[i])
    }

    /// All commands, in registration order.
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Parse one command line into a matched command and its coerced
    /// arguments.
    ///
    /// The line is first whitespace-split to find the command name and count
    /// the supplied arguments, then re-split so that the final token absorbs
    /// any remaining text verbatim. A `Text` parameter may therefore contain
    /// spaces only when it is the last declared parameter.
    pub fn parse(&self, line: &str) -> Result<(&Command, ParsedArgs), DispatchError> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(DispatchError::NoCommandGiven);
        };
        let supplied = words.count();

        let command = self
            .lookup(name)
            .ok_or_else(|| DispatchError::UnknownCommand(name.to_string()))?;

        if supplied < command.params.len() {
            return Err(DispatchError::ArityMismatch {
                command: command.name,
            });
        }

        let tokens = split_limit(line, command.params.len() + 1);
        let args = &tokens[1..];

        // Help markers win over everything, including tokens that would
        // fail coercion.
        if args.iter().any(|t| *t == "-h" || *t == "--help") {
            return Err(DispatchError::HelpRequested {
                command: command.name,
            });
        }

        let mut parsed = ParsedArgs::default();
        for (spec, token) in command.params.iter().zip(args) {
            let value = coerce(token, spec).map_err(|source| DispatchError::ArgumentInvalid {
                command: command.name,
                source,
            })?;
            parsed.insert(spec.name, value);
        }

        Ok((command, parsed))
    }

    /// Parse a line and invoke the matched handler.
    ///
    /// Terminal parse states become `Ok(Some(text))`; only faults from a
    /// running handler surface as `Err`.
    pub async fn dispatch(&self, ctx: &Context<'_>, line: &str) -> HandlerResult {
        match self.parse(line) {
            Ok((command, args)) => {
                debug!(command = command.name, "Dispatching command");
                command.handler.handle(ctx, &args).await
            }
            Err(err) => Ok(Some(self.render_dispatch_error(&err))),
        }
    }

    /// Render the help listing: every command in registration order, then
    /// the per-command help hint.
    pub fn render_help(&self) -> String {
        let mut text = String::from("Available commands:");
        for command in &self.commands {
            text.push_str(&format!(
                "\n\t\t:white_small_square: {} - {}",
                command.name, command.help
            ));
        }
        text.push_str("\n\nType `!k <command> --help` for more information!");
        text
    }

    fn usage_for(&self, name: &str) -> String {
        self.lookup(name).map(usage).unwrap_or_default()
    }

    fn render_dispatch_error(&self, err: &DispatchError) -> String {
        match err {
            DispatchError::NoCommandGiven => {
                format!("Please specify a command!\n{}", self.render_help())
            }
            DispatchError::UnknownCommand(name) => format!("Unknown command: {name}"),
            DispatchError::ArityMismatch { command } => format!(
                "Not enough arguments for command {command}\n{}",
                self.usage_for(command)
            ),
            DispatchError::HelpRequested { command } => self.usage_for(command),
            DispatchError::ArgumentInvalid { command, source } => format!(
                "Invalid argument format '{}' for {}\n{}",
                source.token,
                source.parameter,
                self.usage_for(command)
            ),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Usage string for a command: `usage: <name> <param:type>...` with the
/// parameter stanzas concatenated in declaration order, no separator.
pub fn usage(command: &Command) -> String {
    let mut text = format!("usage: {} ", command.name);
    for spec in command.params {
        text.push_str(&format!("<{}:{}>", spec.name, spec.kind.type_name()));
    }
    text
}

/// Split on runs of whitespace, yielding at most `limit` tokens; the final
/// token keeps the remaining text verbatim (trailing whitespace trimmed).
fn split_limit(line: &str, limit: usize) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = line.trim_start();
    while !rest.is_empty() {
        if tokens.len() + 1 == limit {
            tokens.push(rest.trim_end());
            return tokens;
        }
        match rest.find(char::is_whitespace) {
            Some(idx) => {
                tokens.push(&rest[..idx]);
                rest = rest[idx..].trim_start();
            }
            None => {
                tokens.push(rest);
                return tokens;
            }
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopHandler;

    #[async_trait]
    impl Handler for NoopHandler {
        async fn handle(&self, _ctx: &Context<'_>, _args: &ParsedArgs) -> HandlerResult {
            Ok(None)
        }
    }

    fn test_registry() -> Registry {
        let mut registry = Registry::builtin().unwrap();
        // Extra command with a non-final Int and a final Text parameter, to
        // exercise multi-parameter tokenization.
        registry
            .register(Command::new(
                "echo",
                &[
                    ParameterSpec {
                        name: "count",
                        kind: ParamKind::Int,
                    },
                    ParameterSpec {
                        name: "message",
                        kind: ParamKind::Text,
                    },
                ],
                "repeats a message",
                Box::new(NoopHandler),
            ))
            .unwrap();
        registry
    }

    #[test]
    fn test_split_limit_collapses_runs() {
        assert_eq!(split_limit("a  b   c d", 3), vec!["a", "b", "c d"]);
        assert_eq!(split_limit("  a b ", 5), vec!["a", "b"]);
        assert_eq!(split_limit("hello", 2), vec!["hello"]);
        assert_eq!(split_limit("one two three", 1), vec!["one two three"]);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = Registry::builtin().unwrap();
        let err = registry
            .register(Command::new("hello", &[], "again", Box::new(NoopHandler)))
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateCommand("hello"));
        // The failed registration must not disturb the table.
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_registration_order_preserved_and_idempotent() {
        let registry = test_registry();
        let first: Vec<&str> = registry.commands().map(|c| c.name).collect();
        let second: Vec<&str> = registry.commands().map(|c| c.name).collect();
        assert_eq!(first, vec!["hello", "help", "teams", "echo"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_line_is_no_command() {
        let registry = test_registry();
        assert_eq!(
            registry.parse("   ").unwrap_err(),
            DispatchError::NoCommandGiven
        );
    }

    #[test]
    fn test_unknown_command_named() {
        let registry = test_registry();
        assert_eq!(
            registry.parse("frobnicate now").unwrap_err(),
            DispatchError::UnknownCommand("frobnicate".to_string())
        );
    }

    #[test]
    fn test_arity_mismatch() {
        let registry = test_registry();
        assert_eq!(
            registry.parse("hello").unwrap_err(),
            DispatchError::ArityMismatch { command: "hello" }
        );
        assert_eq!(
            registry.parse("echo 3").unwrap_err(),
            DispatchError::ArityMismatch { command: "echo" }
        );
    }

    #[test]
    fn test_usage_lists_params_in_order() {
        let registry = test_registry();
        let command = registry.lookup("echo").unwrap();
        assert_eq!(usage(command), "usage: echo <count:integer><message:string>");
        let teams = registry.lookup("teams").unwrap();
        assert_eq!(usage(teams), "usage: teams <number_of_teams:integer>");
    }

    #[test]
    fn test_final_text_param_absorbs_whitespace() {
        let registry = test_registry();
        let (_, args) = registry.parse("hello John Ronald Reuel").unwrap();
        assert_eq!(args.text("name"), Some("John Ronald Reuel"));

        let (_, args) = registry.parse("echo 3 to be   or not").unwrap();
        assert_eq!(args.int("count"), Some(3));
        assert_eq!(args.text("message"), Some("to be   or not"));
    }

    #[test]
    fn test_help_marker_short_circuits() {
        let registry = test_registry();
        assert_eq!(
            registry.parse("teams --help").unwrap_err(),
            DispatchError::HelpRequested { command: "teams" }
        );
        assert_eq!(
            registry.parse("teams -h").unwrap_err(),
            DispatchError::HelpRequested { command: "teams" }
        );
    }

    #[test]
    fn test_help_marker_beats_coercion_failure() {
        let registry = test_registry();
        // "oops" would fail Int coercion, but --help is checked first.
        assert_eq!(
            registry.parse("echo oops --help").unwrap_err(),
            DispatchError::HelpRequested { command: "echo" }
        );
    }

    #[test]
    fn test_coercion_fails_fast() {
        let registry = test_registry();
        let err = registry.parse("teams zero").unwrap_err();
        match err {
            DispatchError::ArgumentInvalid { command, source } => {
                assert_eq!(command, "teams");
                assert_eq!(source.token, "zero");
                assert_eq!(source.parameter, "number_of_teams");
            }
            other => panic!("expected ArgumentInvalid, got {other:?}"),
        }
    }

    #[test]
    fn test_render_arity_message_contains_usage() {
        let registry = test_registry();
        let err = registry.parse("echo 1").unwrap_err();
        let text = registry.render_dispatch_error(&err);
        assert!(text.starts_with("Not enough arguments for command echo\n"));
        assert!(text.contains("<count:integer>"));
        assert!(text.contains("<message:string>"));
        assert!(text.find("<count:integer>").unwrap() < text.find("<message:string>").unwrap());
    }

    #[test]
    fn test_render_help_lists_all_commands() {
        let registry = test_registry();
        let text = registry.render_help();
        assert!(text.starts_with("Available commands:"));
        for name in ["hello", "help", "teams", "echo"] {
            assert!(text.contains(&format!(":white_small_square: {name} - ")));
        }
        assert!(text.ends_with("Type `!k <command> --help` for more information!"));
    }

    #[test]
    fn test_coerced_int_round_trip() {
        let registry = test_registry();
        let (_, args) = registry.parse("teams 42").unwrap();
        assert_eq!(args.int("number_of_teams"), Some(42));
    }
}
