/*!
 * Modemlink Library
 * Command/event correlation core for driving a cellular modem
 */

pub mod api;
pub mod channel;
pub mod core;
pub mod events;

// Re-exports
pub use crate::api::ModemApi;
pub use crate::channel::{
    ArgList, ArgValue, CommandChannel, CommandReply, CommandRequest, ModemTransport,
};
pub use crate::core::config::CoreConfig;
pub use crate::core::errors::{ApiError, BridgeError, ChannelError, RegistryError, SlotError};
pub use crate::core::payload::EventPayload;
pub use crate::core::types::{CmdResult, CommandId, CommandKind, CompletionCode, EventBitmap};
pub use crate::events::{
    Callback, CallbackRegistry, ClearMode, DispatcherCore, EventBridge, EventSender, SlotState,
    SlotTable,
};
