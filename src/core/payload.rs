/*!
 * Event Payloads
 * Typed per-command output storage, one arm per command kind
 */

use crate::core::data::{
    CellInfo, EdrxSettings, LocalTime, NetInfo, PdnInfo, PsmSettings, RestartReason,
    SignalQuality, SimInfo, SimState, VersionInfo,
};
use crate::core::types::CommandId;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Typed output payload deposited into an event slot by the peer and
/// consumed by the matching execution adapter.
///
/// Replaces the original design's per-command `void*` argument arrays with a
/// closed sum type: only the matching adapter pattern-matches an arm, the
/// dispatcher treats the payload as opaque.
///
/// `raw_result` fields hold the peer's completion code before remapping;
/// adapters convert them with [`CmdResult::from_raw`](crate::CmdResult) just
/// before invoking the user callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventPayload {
    Restart {
        reason: RestartReason,
    },
    GetVersion {
        raw_result: i32,
        version: VersionInfo,
    },
    RadioOn {
        raw_result: i32,
    },
    RadioOff {
        raw_result: i32,
    },
    ActivatePdn {
        raw_result: i32,
        pdn: PdnInfo,
    },
    DeactivatePdn {
        raw_result: i32,
    },
    GetLocalTime {
        raw_result: i32,
        time: LocalTime,
    },
    GetSimInfo {
        raw_result: i32,
        info: SimInfo,
    },
    GetQuality {
        raw_result: i32,
        quality: SignalQuality,
    },
    GetEdrx {
        raw_result: i32,
        settings: EdrxSettings,
        /// True when the notification belongs to this command rather than
        /// its "get current" sibling (the pair shares one wire event)
        own_event: bool,
    },
    SetEdrx {
        raw_result: i32,
    },
    GetPsm {
        raw_result: i32,
        settings: PsmSettings,
        own_event: bool,
    },
    SetPsm {
        raw_result: i32,
    },
    GetCurrentEdrx {
        raw_result: i32,
        settings: EdrxSettings,
        own_event: bool,
    },
    GetCurrentPsm {
        raw_result: i32,
        settings: PsmSettings,
        own_event: bool,
    },
    ReportNetInfo {
        info: NetInfo,
        dns_servers: Vec<SocketAddr>,
    },
    ReportSimState {
        state: SimState,
    },
    ReportLocalTime {
        time: LocalTime,
    },
    ReportQuality {
        quality: SignalQuality,
    },
    ReportCellInfo {
        info: CellInfo,
    },
    TlsVerify {
        cert: u32,
        depth: i32,
    },
}

impl EventPayload {
    /// The command identifier this payload belongs to
    pub fn command_id(&self) -> CommandId {
        match self {
            EventPayload::Restart { .. } => CommandId::Restart,
            EventPayload::GetVersion { .. } => CommandId::GetVersion,
            EventPayload::RadioOn { .. } => CommandId::RadioOn,
            EventPayload::RadioOff { .. } => CommandId::RadioOff,
            EventPayload::ActivatePdn { .. } => CommandId::ActivatePdn,
            EventPayload::DeactivatePdn { .. } => CommandId::DeactivatePdn,
            EventPayload::GetLocalTime { .. } => CommandId::GetLocalTime,
            EventPayload::GetSimInfo { .. } => CommandId::GetSimInfo,
            EventPayload::GetQuality { .. } => CommandId::GetQuality,
            EventPayload::GetEdrx { .. } => CommandId::GetEdrx,
            EventPayload::SetEdrx { .. } => CommandId::SetEdrx,
            EventPayload::GetPsm { .. } => CommandId::GetPsm,
            EventPayload::SetPsm { .. } => CommandId::SetPsm,
            EventPayload::GetCurrentEdrx { .. } => CommandId::GetCurrentEdrx,
            EventPayload::GetCurrentPsm { .. } => CommandId::GetCurrentPsm,
            EventPayload::ReportNetInfo { .. } => CommandId::ReportNetInfo,
            EventPayload::ReportSimState { .. } => CommandId::ReportSimState,
            EventPayload::ReportLocalTime { .. } => CommandId::ReportLocalTime,
            EventPayload::ReportQuality { .. } => CommandId::ReportQuality,
            EventPayload::ReportCellInfo { .. } => CommandId::ReportCellInfo,
            EventPayload::TlsVerify { .. } => CommandId::TlsVerify,
        }
    }

    /// Initial storage contents for a slot, before any deposit.
    ///
    /// Returns `None` for identifiers that have no event slot
    /// (`PowerOn`/`PowerOff` complete synchronously).
    pub fn initial(id: CommandId) -> Option<EventPayload> {
        let payload = match id {
            CommandId::Restart => EventPayload::Restart {
                reason: RestartReason::default(),
            },
            CommandId::GetVersion => EventPayload::GetVersion {
                raw_result: 0,
                version: VersionInfo::default(),
            },
            CommandId::RadioOn => EventPayload::RadioOn { raw_result: 0 },
            CommandId::RadioOff => EventPayload::RadioOff { raw_result: 0 },
            CommandId::ActivatePdn => EventPayload::ActivatePdn {
                raw_result: 0,
                pdn: PdnInfo::default(),
            },
            CommandId::DeactivatePdn => EventPayload::DeactivatePdn { raw_result: 0 },
            CommandId::GetLocalTime => EventPayload::GetLocalTime {
                raw_result: 0,
                time: LocalTime::default(),
            },
            CommandId::GetSimInfo => EventPayload::GetSimInfo {
                raw_result: 0,
                info: SimInfo::default(),
            },
            CommandId::GetQuality => EventPayload::GetQuality {
                raw_result: 0,
                quality: SignalQuality::default(),
            },
            CommandId::GetEdrx => EventPayload::GetEdrx {
                raw_result: 0,
                settings: EdrxSettings::default(),
                own_event: true,
            },
            CommandId::SetEdrx => EventPayload::SetEdrx { raw_result: 0 },
            CommandId::GetPsm => EventPayload::GetPsm {
                raw_result: 0,
                settings: PsmSettings::default(),
                own_event: true,
            },
            CommandId::SetPsm => EventPayload::SetPsm { raw_result: 0 },
            CommandId::GetCurrentEdrx => EventPayload::GetCurrentEdrx {
                raw_result: 0,
                settings: EdrxSettings::default(),
                own_event: true,
            },
            CommandId::GetCurrentPsm => EventPayload::GetCurrentPsm {
                raw_result: 0,
                settings: PsmSettings::default(),
                own_event: true,
            },
            CommandId::ReportNetInfo => EventPayload::ReportNetInfo {
                info: NetInfo::default(),
                dns_servers: Vec::new(),
            },
            CommandId::ReportSimState => EventPayload::ReportSimState {
                state: SimState::default(),
            },
            CommandId::ReportLocalTime => EventPayload::ReportLocalTime {
                time: LocalTime::default(),
            },
            CommandId::ReportQuality => EventPayload::ReportQuality {
                quality: SignalQuality::default(),
            },
            CommandId::ReportCellInfo => EventPayload::ReportCellInfo {
                info: CellInfo::default(),
            },
            CommandId::TlsVerify => EventPayload::TlsVerify { cert: 0, depth: 0 },
            CommandId::PowerOn | CommandId::PowerOff => return None,
        };
        Some(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_command_id_roundtrip() {
        for id in CommandId::ALL {
            match EventPayload::initial(id) {
                Some(payload) => assert_eq!(payload.command_id(), id),
                None => assert!(matches!(id, CommandId::PowerOn | CommandId::PowerOff)),
            }
        }
    }
}
