/*!
 * Events Module
 * Slot table, callback registry, adapters, dispatcher and delivery bridge
 */

mod adapters;
mod bridge;
mod dispatcher;
mod dns;
mod registry;
mod slots;

pub use bridge::{BridgeHandle, EventBridge, EventSender, PumpOutcome, STOP_SENTINEL};
pub use dispatcher::DispatcherCore;
pub use dns::{DnsCache, DnsSnapshot};
pub use registry::{
    Callback, CallbackRegistry, CellInfoReportCb, ClearMode, EdrxCb, LocalTimeCb,
    LocalTimeReportCb, NetInfoReportCb, PdnCb, PsmCb, QualityCb, QualityReportCb, RestartCb,
    ResultCb, SimInfoCb, SimStateReportCb, TlsVerifyCb, VersionCb,
};
pub use slots::{SlotState, SlotTable};
