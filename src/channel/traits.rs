/*!
 * Transport Traits
 * Seam for the driver that exchanges bytes with the modem
 */

use crate::channel::types::{CommandReply, CommandRequest};
use crate::core::errors::ChannelResult;

/// The system-call boundary to the modem driver.
///
/// Implementations own the handle lifecycle (open, transmit, block for
/// completion, close) per call and hold no protocol state between calls.
/// An open or transmit failure must surface the negated OS error through
/// [`ChannelError::Transport`](crate::ChannelError).
pub trait ModemTransport: Send + Sync {
    /// Execute one command descriptor, blocking until the peer completes it.
    fn execute(&self, request: &CommandRequest) -> ChannelResult<CommandReply>;
}
