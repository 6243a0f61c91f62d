/*!
 * Callback Registry
 * Fixed-capacity table binding command identifiers to typed callbacks
 */

use crate::core::data::{
    CellInfo, EdrxSettings, LocalTime, NetInfo, PdnInfo, PsmSettings, RestartReason,
    SignalQuality, SimInfo, SimState, VersionInfo,
};
use crate::core::errors::{RegistryError, RegistryResult};
use crate::core::limits::NCBTABLES;
use crate::core::types::{CmdResult, CommandId, CommandKind};
use log::{debug, info};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Restart notification callback
pub type RestartCb = Arc<dyn Fn(RestartReason) + Send + Sync>;
/// Bare-result callback (radio on/off, setters, PDN deactivation)
pub type ResultCb = Arc<dyn Fn(CmdResult) + Send + Sync>;
pub type VersionCb = Arc<dyn Fn(CmdResult, VersionInfo) + Send + Sync>;
pub type PdnCb = Arc<dyn Fn(CmdResult, PdnInfo) + Send + Sync>;
pub type LocalTimeCb = Arc<dyn Fn(CmdResult, LocalTime) + Send + Sync>;
pub type SimInfoCb = Arc<dyn Fn(CmdResult, SimInfo) + Send + Sync>;
pub type QualityCb = Arc<dyn Fn(CmdResult, SignalQuality) + Send + Sync>;
pub type EdrxCb = Arc<dyn Fn(CmdResult, EdrxSettings) + Send + Sync>;
pub type PsmCb = Arc<dyn Fn(CmdResult, PsmSettings) + Send + Sync>;
pub type NetInfoReportCb = Arc<dyn Fn(NetInfo) + Send + Sync>;
pub type SimStateReportCb = Arc<dyn Fn(SimState) + Send + Sync>;
pub type LocalTimeReportCb = Arc<dyn Fn(LocalTime) + Send + Sync>;
pub type QualityReportCb = Arc<dyn Fn(SignalQuality) + Send + Sync>;
pub type CellInfoReportCb = Arc<dyn Fn(CellInfo) + Send + Sync>;
/// TLS certificate verification callback: (certificate handle, chain depth)
pub type TlsVerifyCb = Arc<dyn Fn(u32, i32) + Send + Sync>;

/// A caller-supplied callback, one arm per callback signature.
///
/// The typed replacement for the original design's opaque function pointers
/// cast per command: adapters pattern-match the arm they expect and skip a
/// mismatch instead of misinterpreting it.
#[derive(Clone)]
pub enum Callback {
    Restart(RestartCb),
    Result(ResultCb),
    Version(VersionCb),
    Pdn(PdnCb),
    LocalTime(LocalTimeCb),
    SimInfo(SimInfoCb),
    Quality(QualityCb),
    Edrx(EdrxCb),
    Psm(PsmCb),
    NetInfoReport(NetInfoReportCb),
    SimStateReport(SimStateReportCb),
    LocalTimeReport(LocalTimeReportCb),
    QualityReport(QualityReportCb),
    CellInfoReport(CellInfoReportCb),
    TlsVerify(TlsVerifyCb),
}

impl Callback {
    fn variant_name(&self) -> &'static str {
        match self {
            Callback::Restart(_) => "Restart",
            Callback::Result(_) => "Result",
            Callback::Version(_) => "Version",
            Callback::Pdn(_) => "Pdn",
            Callback::LocalTime(_) => "LocalTime",
            Callback::SimInfo(_) => "SimInfo",
            Callback::Quality(_) => "Quality",
            Callback::Edrx(_) => "Edrx",
            Callback::Psm(_) => "Psm",
            Callback::NetInfoReport(_) => "NetInfoReport",
            Callback::SimStateReport(_) => "SimStateReport",
            Callback::LocalTimeReport(_) => "LocalTimeReport",
            Callback::QualityReport(_) => "QualityReport",
            Callback::CellInfoReport(_) => "CellInfoReport",
            Callback::TlsVerify(_) => "TlsVerify",
        }
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback::{}", self.variant_name())
    }
}

/// Which registrations a teardown sweep removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearMode {
    /// Remove everything except the restart-notification entry
    WithoutRestart,
    /// Remove everything
    All,
}

struct Entry {
    id: CommandId,
    cb: Callback,
}

/// The registration table: a small fixed row array behind one coarse lock.
/// Every operation is an O(N) scan over `NCBTABLES` rows, which is cheaper
/// than any clever structure at this size.
pub struct CallbackRegistry {
    rows: Mutex<Vec<Option<Entry>>>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::with_capacity(NCBTABLES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut rows = Vec::with_capacity(capacity);
        rows.resize_with(capacity, || None);
        Self {
            rows: Mutex::new(rows),
        }
    }

    /// Bind `cb` to `id` in the first free row.
    ///
    /// An existing registration is never replaced implicitly: a one-shot id
    /// reports `InProgress`, a report id reports `AlreadyRegistered`
    /// (clear first to re-subscribe).
    pub fn register(&self, id: CommandId, cb: Callback) -> RegistryResult<()> {
        let mut rows = self.rows.lock();

        if rows.iter().flatten().any(|entry| entry.id == id) {
            return Err(if id.is_report() {
                RegistryError::AlreadyRegistered(id)
            } else {
                RegistryError::InProgress(id)
            });
        }

        let free = rows
            .iter_mut()
            .find(|row| row.is_none())
            .ok_or(RegistryError::TableFull)?;
        *free = Some(Entry { id, cb });
        debug!("registered callback for {}", id);
        Ok(())
    }

    /// Remove any registration for `id`. Succeeds even if none existed.
    pub fn clear(&self, id: CommandId) {
        let mut rows = self.rows.lock();
        for row in rows.iter_mut() {
            if matches!(row, Some(entry) if entry.id == id) {
                *row = None;
                debug!("cleared callback for {}", id);
                break;
            }
        }
    }

    /// Public routing entry mirroring the original single register surface:
    /// `Some` registers, `None` clears.
    pub fn set(&self, id: CommandId, cb: Option<Callback>) -> RegistryResult<()> {
        match cb {
            Some(cb) => self.register(id, cb),
            None => {
                self.clear(id);
                Ok(())
            }
        }
    }

    /// Read-only lookup used by the dispatcher; never removes the entry.
    pub fn lookup(&self, id: CommandId) -> Option<Callback> {
        let rows = self.rows.lock();
        rows.iter()
            .flatten()
            .find(|entry| entry.id == id)
            .map(|entry| entry.cb.clone())
    }

    /// Teardown sweep.
    pub fn clear_all(&self, mode: ClearMode) {
        let mut rows = self.rows.lock();
        for row in rows.iter_mut() {
            let keep = matches!(mode, ClearMode::WithoutRestart)
                && matches!(row, Some(entry) if entry.id.kind() == CommandKind::Restart);
            if !keep {
                *row = None;
            }
        }
        info!("registry cleared ({:?})", mode);
    }

    /// Report-kind identifiers with a live registration, used to re-issue
    /// subscriptions after a modem restart.
    pub fn registered_reports(&self) -> Vec<CommandId> {
        let rows = self.rows.lock();
        rows.iter()
            .flatten()
            .filter(|entry| entry.id.kind() == CommandKind::Report)
            .map(|entry| entry.id)
            .collect()
    }

    /// Number of live registrations
    pub fn len(&self) -> usize {
        self.rows.lock().iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop_result_cb() -> Callback {
        Callback::Result(Arc::new(|_| {}))
    }

    fn noop_quality_report_cb() -> Callback {
        Callback::QualityReport(Arc::new(|_| {}))
    }

    #[test]
    fn test_one_shot_in_progress() {
        let registry = CallbackRegistry::new();
        registry
            .register(CommandId::ActivatePdn, Callback::Pdn(Arc::new(|_, _| {})))
            .unwrap();
        let err = registry
            .register(CommandId::ActivatePdn, Callback::Pdn(Arc::new(|_, _| {})))
            .unwrap_err();
        assert_eq!(err, RegistryError::InProgress(CommandId::ActivatePdn));
    }

    #[test]
    fn test_report_replace_requires_clear() {
        let registry = CallbackRegistry::new();
        registry
            .register(CommandId::ReportQuality, noop_quality_report_cb())
            .unwrap();
        let err = registry
            .register(CommandId::ReportQuality, noop_quality_report_cb())
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::AlreadyRegistered(CommandId::ReportQuality)
        );

        registry.clear(CommandId::ReportQuality);
        registry
            .register(CommandId::ReportQuality, noop_quality_report_cb())
            .unwrap();
    }

    #[test]
    fn test_table_full() {
        let registry = CallbackRegistry::with_capacity(2);
        registry
            .register(CommandId::RadioOn, noop_result_cb())
            .unwrap();
        registry
            .register(CommandId::RadioOff, noop_result_cb())
            .unwrap();
        let err = registry
            .register(CommandId::SetEdrx, noop_result_cb())
            .unwrap_err();
        assert_eq!(err, RegistryError::TableFull);
    }

    #[test]
    fn test_clear_missing_is_ok() {
        let registry = CallbackRegistry::new();
        registry.clear(CommandId::RadioOn);
        assert!(registry.set(CommandId::RadioOn, None).is_ok());
    }

    #[test]
    fn test_clear_all_modes() {
        let registry = CallbackRegistry::new();
        registry
            .register(CommandId::Restart, Callback::Restart(Arc::new(|_| {})))
            .unwrap();
        registry
            .register(CommandId::RadioOn, noop_result_cb())
            .unwrap();
        registry
            .register(CommandId::ReportQuality, noop_quality_report_cb())
            .unwrap();

        registry.clear_all(ClearMode::WithoutRestart);
        assert_eq!(registry.len(), 1);
        assert!(registry.lookup(CommandId::Restart).is_some());

        registry.clear_all(ClearMode::All);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_registered_reports_excludes_restart_and_one_shots() {
        let registry = CallbackRegistry::new();
        registry
            .register(CommandId::Restart, Callback::Restart(Arc::new(|_| {})))
            .unwrap();
        registry
            .register(CommandId::RadioOn, noop_result_cb())
            .unwrap();
        registry
            .register(CommandId::ReportQuality, noop_quality_report_cb())
            .unwrap();
        registry
            .register(
                CommandId::ReportSimState,
                Callback::SimStateReport(Arc::new(|_| {})),
            )
            .unwrap();

        let mut reports = registry.registered_reports();
        reports.sort_by_key(|id| format!("{:?}", id));
        assert_eq!(
            reports,
            vec![CommandId::ReportQuality, CommandId::ReportSimState]
        );
    }
}
