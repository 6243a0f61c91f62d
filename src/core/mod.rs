/*!
 * Core Module
 * Shared types, payloads, errors, limits and configuration
 */

pub mod config;
pub mod data;
pub mod errors;
pub mod limits;
pub mod payload;
pub mod types;

pub use config::CoreConfig;
pub use data::{
    ApnSettings, AuthType, CellInfo, EdrxActType, EdrxSettings, IpType, LocalTime, NeighborCell,
    NetInfo, NetworkState, PdnInfo, PsmSettings, PsmTimer, PsmTimerUnit, QueryFamily,
    RestartReason, SignalQuality, SimInfo, SimState, VersionInfo,
};
pub use errors::{
    ApiError, ApiResult, BridgeError, BridgeResult, ChannelError, ChannelResult, RegistryError,
    RegistryResult, SlotError, SlotResult,
};
pub use payload::EventPayload;
pub use types::{CmdResult, CommandId, CommandKind, CompletionCode, EventBitmap};
