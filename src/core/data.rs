/*!
 * Modem Data Types
 * Plain data carried by command results and report events
 */

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Why the modem restarted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RestartReason {
    /// Restart requested by the application (power-on included)
    #[default]
    UserInitiated,
    /// Modem rebooted on its own (crash, watchdog, firmware update)
    ModemInitiated,
}

/// SIM card state as delivered by SIM state reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SimState {
    #[default]
    Removed,
    Inserted,
    WaitPin,
    WaitPuk,
    Deactivated,
    Activated,
}

/// Modem firmware/package version information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub baseband_product: String,
    pub np_package: String,
    pub firmware: String,
}

/// Network-provided local time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalTime {
    pub year: u32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// Offset from UTC in seconds
    pub tz_offset_secs: i32,
}

/// One activated packet data network session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdnInfo {
    pub session_id: u8,
    pub active: bool,
    pub addresses: Vec<IpAddr>,
}

/// Network registration state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NetworkState {
    #[default]
    Detached,
    Searching,
    Attached,
    /// Attach rejected by the network
    Rejected,
}

/// Network information snapshot (registration state plus active PDNs)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetInfo {
    pub state: NetworkState,
    pub pdns: Vec<PdnInfo>,
}

impl NetInfo {
    /// Preferred DNS query family derived from the first PDN's addressing.
    /// The modem can only hold one PDN, so only the first entry matters.
    pub fn query_family(&self) -> QueryFamily {
        let Some(pdn) = self.pdns.first() else {
            return QueryFamily::Unspecified;
        };
        match pdn.addresses.as_slice() {
            [IpAddr::V4(_)] => QueryFamily::V4,
            [IpAddr::V6(_)] => QueryFamily::V6,
            _ => QueryFamily::Unspecified,
        }
    }
}

/// Address family preference for DNS queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QueryFamily {
    #[default]
    Unspecified,
    V4,
    V6,
}

/// Instantaneous signal quality
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalQuality {
    /// False when the modem could not produce a measurement
    pub valid: bool,
    /// Reference signal received power, dBm
    pub rsrp: i16,
    /// Reference signal received quality, dB
    pub rsrq: i16,
    /// Signal to interference plus noise ratio, dB
    pub sinr: i16,
    /// Received signal strength, dBm
    pub rssi: i16,
}

/// A neighboring cell measurement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborCell {
    pub cell_id: u32,
    pub earfcn: u32,
    pub rsrp: i16,
    pub rsrq: i16,
}

/// Serving cell information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellInfo {
    pub valid: bool,
    pub cell_id: u32,
    pub earfcn: u32,
    pub mcc: String,
    pub mnc: String,
    pub neighbors: Vec<NeighborCell>,
}

/// SIM card identity information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimInfo {
    pub mcc: String,
    pub mnc: String,
    pub iccid: String,
    pub imsi: String,
}

/// Radio access technology mode eDRX applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EdrxActType {
    /// eDRX is not running
    #[default]
    NotUse,
    EcGsmIot,
    Gsm,
    Iu,
    /// E-UTRAN WB-S1 (Cat-M)
    Wbs1,
    /// E-UTRAN NB-S1 (NB-IoT)
    Nbs1,
}

/// eDRX settings (requested or network-granted)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdrxSettings {
    pub enable: bool,
    pub act_type: EdrxActType,
    /// eDRX cycle length code (see `api::validate` for the valid ranges)
    pub cycle: u32,
    /// Paging time window code
    pub ptw: u32,
}

/// Unit for a PSM timer value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PsmTimerUnit {
    #[default]
    Sec2,
    Sec30,
    Min1,
    Min6,
    Min10,
    Hour1,
    Hour10,
    Hour320,
    Deactivated,
}

/// One PSM timer (unit + multiplier)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsmTimer {
    pub unit: PsmTimerUnit,
    pub value: u8,
}

/// PSM settings (requested or network-granted)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsmSettings {
    pub enable: bool,
    /// T3324: how long the modem stays reachable after going idle
    pub active_time: PsmTimer,
    /// T3412: extended periodic tracking area update timer
    pub tau_time: PsmTimer,
}

/// IP version requested for a PDN
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IpType {
    #[default]
    V4,
    V6,
    V4V6,
}

/// PDN authentication scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AuthType {
    #[default]
    None,
    Pap,
    Chap,
}

/// Access point configuration for PDN activation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApnSettings {
    pub name: String,
    pub ip_type: IpType,
    pub auth: AuthType,
    pub user: Option<String>,
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn test_query_family_from_pdn() {
        let mut info = NetInfo::default();
        assert_eq!(info.query_family(), QueryFamily::Unspecified);

        info.pdns.push(PdnInfo {
            session_id: 1,
            active: true,
            addresses: vec![IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2))],
        });
        assert_eq!(info.query_family(), QueryFamily::V4);

        info.pdns[0].addresses = vec![IpAddr::V6(Ipv6Addr::LOCALHOST)];
        assert_eq!(info.query_family(), QueryFamily::V6);

        // dual stack falls back to unspecified
        info.pdns[0]
            .addresses
            .push(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2)));
        assert_eq!(info.query_family(), QueryFamily::Unspecified);
    }
}
