/*!
 * Core Types
 * Command identifiers, event bitmaps and callback result codes
 */

use nix::errno::Errno;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable tag naming one modem operation or report subscription.
///
/// Identifiers are partitioned into three disjoint kinds: one-shot requests,
/// standing report subscriptions, and the restart sentinel (see
/// [`CommandKind`]). The partition never changes at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandId {
    /// Modem restart notification (new session invalidates in-flight state)
    Restart,
    /// Firmware/package version query
    GetVersion,
    /// Enable the radio
    RadioOn,
    /// Disable the radio
    RadioOff,
    /// Activate a packet data network session
    ActivatePdn,
    /// Deactivate a packet data network session
    DeactivatePdn,
    /// Network-provided local time query
    GetLocalTime,
    /// SIM card information query
    GetSimInfo,
    /// Instantaneous signal quality query
    GetQuality,
    /// Requested eDRX settings query
    GetEdrx,
    /// Apply eDRX settings
    SetEdrx,
    /// Requested PSM settings query
    GetPsm,
    /// Apply PSM settings
    SetPsm,
    /// Network-granted ("current") eDRX settings query
    GetCurrentEdrx,
    /// Network-granted ("current") PSM settings query
    GetCurrentPsm,
    /// Network information report subscription
    ReportNetInfo,
    /// SIM state report subscription
    ReportSimState,
    /// Local time report subscription
    ReportLocalTime,
    /// Signal quality report subscription
    ReportQuality,
    /// Cell information report subscription
    ReportCellInfo,
    /// TLS certificate verification request from the modem
    TlsVerify,
    /// Power the modem on (no event slot; completes synchronously)
    PowerOn,
    /// Power the modem off (no event slot; completes synchronously)
    PowerOff,
}

/// Kind partition for a command identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandKind {
    /// At most one pending instance at a time; registration cleared on completion
    OneShot,
    /// Standing subscription that may deliver many events
    Report,
    /// Restart sentinel; survives the teardown sweep
    Restart,
}

impl CommandId {
    /// All identifiers, in stable declaration order.
    pub const ALL: [CommandId; 23] = [
        CommandId::Restart,
        CommandId::GetVersion,
        CommandId::RadioOn,
        CommandId::RadioOff,
        CommandId::ActivatePdn,
        CommandId::DeactivatePdn,
        CommandId::GetLocalTime,
        CommandId::GetSimInfo,
        CommandId::GetQuality,
        CommandId::GetEdrx,
        CommandId::SetEdrx,
        CommandId::GetPsm,
        CommandId::SetPsm,
        CommandId::GetCurrentEdrx,
        CommandId::GetCurrentPsm,
        CommandId::ReportNetInfo,
        CommandId::ReportSimState,
        CommandId::ReportLocalTime,
        CommandId::ReportQuality,
        CommandId::ReportCellInfo,
        CommandId::TlsVerify,
        CommandId::PowerOn,
        CommandId::PowerOff,
    ];

    /// Get the kind partition for this identifier
    pub fn kind(&self) -> CommandKind {
        match self {
            CommandId::Restart => CommandKind::Restart,
            CommandId::ReportNetInfo
            | CommandId::ReportSimState
            | CommandId::ReportLocalTime
            | CommandId::ReportQuality
            | CommandId::ReportCellInfo
            | CommandId::TlsVerify => CommandKind::Report,
            _ => CommandKind::OneShot,
        }
    }

    /// Check if the identifier is report-like (reports and the restart sentinel)
    pub fn is_report(&self) -> bool {
        !matches!(self.kind(), CommandKind::OneShot)
    }

    /// Check if the identifier is a one-shot request
    pub fn is_one_shot(&self) -> bool {
        matches!(self.kind(), CommandKind::OneShot)
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A 64-bit set of event-slot indices.
///
/// Bit 63 is the RESET sentinel and never names a slot. Bits are processed in
/// ascending index order within one dispatch pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventBitmap(u64);

impl EventBitmap {
    /// The empty set
    pub const EMPTY: EventBitmap = EventBitmap(0);

    /// Restart sentinel bit; short-circuits a dispatch pass
    pub const RESET: EventBitmap = EventBitmap(1 << 63);

    /// Build from a raw 64-bit value
    pub fn from_raw(raw: u64) -> Self {
        EventBitmap(raw)
    }

    /// Raw 64-bit value
    pub fn raw(&self) -> u64 {
        self.0
    }

    /// Bitmap with a single slot index set
    pub fn single(index: usize) -> Self {
        debug_assert!(index < 63, "slot index {} collides with RESET", index);
        EventBitmap(1u64 << index)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn contains(&self, index: usize) -> bool {
        index < 64 && self.0 & (1u64 << index) != 0
    }

    pub fn insert(&mut self, index: usize) {
        debug_assert!(index < 63, "slot index {} collides with RESET", index);
        self.0 |= 1u64 << index;
    }

    /// Union with another bitmap
    pub fn merge(&mut self, other: EventBitmap) {
        self.0 |= other.0;
    }

    pub fn has_reset(&self) -> bool {
        self.0 & Self::RESET.0 != 0
    }

    /// Copy with the RESET sentinel cleared
    pub fn without_reset(&self) -> EventBitmap {
        EventBitmap(self.0 & !Self::RESET.0)
    }

    /// Set bit indices in ascending order, RESET excluded
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        let bits = self.without_reset().0;
        (0..63).filter(move |i| bits & (1u64 << i) != 0)
    }

    /// Number of set bits, RESET included
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }
}

impl fmt::Display for EventBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.0)
    }
}

/// Signed completion code returned across the system-call boundary.
///
/// Zero is success, negative values are OS-style error codes, and positive
/// values are command-specific results that select commands interpret as an
/// event bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionCode(pub i64);

impl CompletionCode {
    pub const OK: CompletionCode = CompletionCode(0);

    pub fn is_success(&self) -> bool {
        self.0 >= 0
    }

    /// Negative OS error code, if the completion failed
    pub fn errno(&self) -> Option<i32> {
        (self.0 < 0).then_some(self.0 as i32)
    }

    /// Positive completion codes double as an event bitmap for select commands
    pub fn as_bitmap(&self) -> Option<EventBitmap> {
        (self.0 > 0).then(|| EventBitmap::from_raw(self.0 as u64))
    }
}

/// Result delivered to a one-shot command's callback.
///
/// The closed remapping of raw peer completion codes: user code never sees
/// raw OS error numbers. A non-negative code passes through unchanged
/// (`Ok` for zero, `Other` for positive values).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CmdResult {
    /// Operation completed successfully
    Ok,
    /// Operation failed
    Error,
    /// Operation was cancelled by the peer
    Cancel,
    /// Command-specific positive result code
    Other(i32),
}

impl CmdResult {
    /// Remap a raw peer completion code into the closed result enum.
    ///
    /// `-ECANCELED` is the domain cancellation sentinel; any other negative
    /// value collapses to `Error`.
    pub fn from_raw(raw: i32) -> Self {
        if raw == 0 {
            CmdResult::Ok
        } else if raw == -(Errno::ECANCELED as i32) {
            CmdResult::Cancel
        } else if raw < 0 {
            CmdResult::Error
        } else {
            CmdResult::Other(raw)
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, CmdResult::Ok)
    }
}
