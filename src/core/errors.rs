/*!
 * Error Types
 * Per-domain error enums with thiserror and serde support
 */

use crate::core::types::CommandId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Command channel result
pub type ChannelResult<T> = Result<T, ChannelError>;

/// Command channel errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelError {
    /// The system-call boundary failed to open or transmit.
    /// Carries the negated OS error code.
    #[error("transport failure: errno {0}")]
    Transport(i32),
}

/// Callback registry result
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Callback registry errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryError {
    #[error("callback table has no free row")]
    TableFull,

    #[error("one-shot command {0} already has a pending registration")]
    InProgress(CommandId),

    #[error("report command {0} is already registered; clear it first")]
    AlreadyRegistered(CommandId),
}

/// Event slot result
pub type SlotResult<T> = Result<T, SlotError>;

/// Event slot errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotError {
    /// Deposit attempted while the slot still holds undelivered data;
    /// the peer discards the event
    #[error("event slot for {0} is locked; event discarded")]
    Busy(CommandId),

    /// The command id has no event slot (synchronous-only command)
    #[error("command {0} has no event slot")]
    NoSlot(CommandId),
}

/// Event delivery bridge result
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Event delivery bridge errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BridgeError {
    /// The consumer side is gone (bridge stopped or dropped)
    #[error("event channel is disconnected")]
    Disconnected,

    /// Zero is reserved as the stop sentinel; use `send_stop` to stop
    #[error("refusing to send an empty event bitmap")]
    Empty,

    #[error("failed to spawn bridge thread: {0}")]
    Spawn(String),
}

/// Typed operation result
pub type ApiResult<T> = Result<T, ApiError>;

/// Typed operation (api layer) errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiError {
    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Negative peer completion code, surfaced verbatim
    #[error("command failed with peer code {0}")]
    Command(i32),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The peer replied without the output payload the operation requires
    #[error("peer reply missing expected output for {0}")]
    UnexpectedReply(CommandId),
}
