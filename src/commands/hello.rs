//! `hello` command handler.

use super::{Context, Handler, ParsedArgs};
use crate::error::{HandlerError, HandlerResult};
use async_trait::async_trait;

/// Handler for `hello <name:string>`.
///
/// Greets the named human. The final (and only) parameter is Text, so the
/// name may contain spaces.
pub struct HelloHandler;

#[async_trait]
impl Handler for HelloHandler {
    async fn handle(&self, _ctx: &Context<'_>, args: &ParsedArgs) -> HandlerResult {
        let name = args
            .text("name")
            .ok_or_else(|| HandlerError::Internal("missing 'name' argument".into()))?;
        Ok(Some(format!("hello {name}!")))
    }
}
