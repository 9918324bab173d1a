//! Local-development transport that prints messages to stdout.

use async_trait::async_trait;

use socialhub_core::result::AppResult;
use socialhub_core::traits::Notifier;

/// Writes each message to standard output instead of delivering it.
///
/// Meant for local runs without a delivery service; the message (including
/// any activation link) is shown to the operator, never logged.
#[derive(Debug, Clone, Default)]
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn send(
        &self,
        template_id: &str,
        display_name: &str,
        email: &str,
        vars: &serde_json::Value,
        _sandbox: bool,
    ) -> AppResult<u16> {
        println!("[{template_id}] to {display_name} <{email}>");
        println!("{}", serde_json::to_string_pretty(vars)?);
        Ok(200)
    }
}
