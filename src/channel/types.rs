/*!
 * Command Channel Types
 * Descriptor and reply crossing the system-call boundary
 */

use crate::channel::marshal::ArgList;
use crate::core::payload::EventPayload;
use crate::core::types::{CommandId, CompletionCode};
use serde::{Deserialize, Serialize};

/// Command descriptor handed to the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRequest {
    pub id: CommandId,
    pub inputs: ArgList,
}

impl CommandRequest {
    pub fn new(id: CommandId, inputs: ArgList) -> Self {
        Self { id, inputs }
    }
}

/// Peer reply to one command descriptor.
///
/// Synchronous operations carry their typed output back in `output`;
/// callback-driven operations reply with a bare completion code and deliver
/// output later through the event slot table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandReply {
    pub code: CompletionCode,
    pub output: Option<EventPayload>,
}

impl CommandReply {
    /// Success with no synchronous output
    pub fn ok() -> Self {
        Self {
            code: CompletionCode::OK,
            output: None,
        }
    }

    /// Success carrying a synchronous output payload
    pub fn with_output(output: EventPayload) -> Self {
        Self {
            code: CompletionCode::OK,
            output: Some(output),
        }
    }

    /// Failure with a negative peer completion code
    pub fn failed(code: i64) -> Self {
        Self {
            code: CompletionCode(code),
            output: None,
        }
    }
}
