/*!
 * Command Gate
 * Blocking request path over a transport
 */

use crate::channel::traits::ModemTransport;
use crate::channel::types::{CommandReply, CommandRequest};
use crate::core::errors::ChannelResult;
use log::{debug, warn};

/// The synchronous call gate.
///
/// Stateless between calls: each `send` is one blocking round trip through
/// the transport. Callbacks are never invoked here; registration happens in
/// the callback registry before the send, and the descriptor only carries a
/// marker.
pub struct CommandChannel<T: ModemTransport> {
    transport: T,
}

impl<T: ModemTransport> CommandChannel<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Send one command descriptor and block for its completion.
    pub fn send(&self, request: &CommandRequest) -> ChannelResult<CommandReply> {
        debug!("send {} ({} args)", request.id, request.inputs.len());

        let reply = self.transport.execute(request)?;
        if let Some(errno) = reply.code.errno() {
            // Surfaced verbatim; remapping is the caller's concern
            warn!("{} completed with peer code {}", request.id, errno);
        }

        Ok(reply)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}
