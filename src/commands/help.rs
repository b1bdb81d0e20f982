//! `help` command handler.

use super::{Context, Handler, ParsedArgs};
use crate::error::HandlerResult;
use async_trait::async_trait;

/// Handler for `help`.
///
/// Replies with the registry's command listing in registration order.
pub struct HelpHandler;

#[async_trait]
impl Handler for HelpHandler {
    async fn handle(&self, ctx: &Context<'_>, _args: &ParsedArgs) -> HandlerResult {
        Ok(Some(ctx.registry.render_help()))
    }
}
