/*!
 * Typed Operations
 * One marshaling shim per modem operation
 */

use crate::api::validate::{validate_edrx, validate_psm};
use crate::channel::{ArgList, ArgValue, CommandChannel, CommandRequest, ModemTransport};
use crate::core::config::CoreConfig;
use crate::core::data::{
    ApnSettings, EdrxSettings, LocalTime, PdnInfo, PsmSettings, SignalQuality, SimInfo,
    VersionInfo,
};
use crate::core::errors::{ApiError, ApiResult};
use crate::core::payload::EventPayload;
use crate::core::types::{CommandId, CompletionCode};
use crate::events::{
    Callback, CellInfoReportCb, ClearMode, DispatcherCore, EdrxCb, LocalTimeCb, LocalTimeReportCb,
    NetInfoReportCb, PdnCb, PsmCb, QualityCb, QualityReportCb, RestartCb, ResultCb, SimInfoCb,
    SimStateReportCb, TlsVerifyCb, VersionCb,
};
use log::{info, warn};
use std::sync::Arc;

/// The public operation surface: thin typed shims that marshal arguments,
/// register callbacks, and issue one blocking request each.
///
/// Synchronous variants (`*_sync`) bypass the registry entirely — the peer
/// carries the typed output back in the reply. Callback variants register
/// first and roll the registration back if the send fails, so a failed
/// request never leaves a dangling pending entry.
pub struct ModemApi<T: ModemTransport> {
    core: Arc<DispatcherCore>,
    channel: CommandChannel<T>,
}

impl<T: ModemTransport> ModemApi<T> {
    pub fn new(core: Arc<DispatcherCore>, transport: T) -> Self {
        Self {
            core,
            channel: CommandChannel::new(transport),
        }
    }

    pub fn core(&self) -> &Arc<DispatcherCore> {
        &self.core
    }

    fn config(&self) -> &CoreConfig {
        self.core.config()
    }

    // ---------------------------------------------------------------
    // request helpers
    // ---------------------------------------------------------------

    /// Issue a request and require a typed output in the reply.
    fn request_sync(&self, id: CommandId, inputs: ArgList) -> ApiResult<EventPayload> {
        let reply = self.channel.send(&CommandRequest::new(id, inputs))?;
        if let Some(errno) = reply.code.errno() {
            return Err(ApiError::Command(errno));
        }
        reply.output.ok_or(ApiError::UnexpectedReply(id))
    }

    /// Issue a request where only the completion code matters.
    fn request_status(&self, id: CommandId, inputs: ArgList) -> ApiResult<CompletionCode> {
        let reply = self.channel.send(&CommandRequest::new(id, inputs))?;
        if let Some(errno) = reply.code.errno() {
            return Err(ApiError::Command(errno));
        }
        Ok(reply.code)
    }

    /// Register a one-shot callback, then issue the request; the
    /// registration is rolled back if the request fails.
    fn invoke_one_shot(&self, id: CommandId, inputs: ArgList, cb: Callback) -> ApiResult<()> {
        self.core.set_callback(id, Some(cb))?;
        let request = CommandRequest::new(id, inputs.with_callback(true));
        match self.channel.send(&request) {
            Ok(reply) => {
                if let Some(errno) = reply.code.errno() {
                    self.core.clear_callback(id);
                    return Err(ApiError::Command(errno));
                }
                Ok(())
            }
            Err(err) => {
                self.core.clear_callback(id);
                Err(err.into())
            }
        }
    }

    /// Arm or disarm a report subscription. `None` clears the registration
    /// and tells the peer to stop reporting.
    fn subscribe(&self, id: CommandId, inputs: ArgList, cb: Option<Callback>) -> ApiResult<()> {
        match cb {
            Some(cb) => {
                self.core.set_callback(id, Some(cb))?;
                let request = CommandRequest::new(id, inputs.with_callback(true));
                match self.channel.send(&request) {
                    Ok(reply) => {
                        if let Some(errno) = reply.code.errno() {
                            self.core.clear_callback(id);
                            return Err(ApiError::Command(errno));
                        }
                        Ok(())
                    }
                    Err(err) => {
                        self.core.clear_callback(id);
                        Err(err.into())
                    }
                }
            }
            None => {
                self.core.clear_callback(id);
                let request = CommandRequest::new(id, inputs.with_callback(false));
                let reply = self.channel.send(&request)?;
                if let Some(errno) = reply.code.errno() {
                    return Err(ApiError::Command(errno));
                }
                Ok(())
            }
        }
    }

    // ---------------------------------------------------------------
    // power sequencing
    // ---------------------------------------------------------------

    /// Power the modem on.
    ///
    /// The completion code for power-on doubles as an event bitmap (the
    /// restart notification may already be pending); it is dispatched inline
    /// before returning. Retry-on-failure is a caller policy, not handled
    /// here.
    pub fn power_on(&self) -> ApiResult<()> {
        let code = self.request_status(CommandId::PowerOn, ArgList::new())?;
        if let Some(bitmap) = code.as_bitmap() {
            self.core.dispatch(bitmap);
        }
        info!("modem powered on");
        Ok(())
    }

    /// Power the modem off and drop every registration except the restart
    /// notification.
    pub fn power_off(&self) -> ApiResult<()> {
        self.request_status(CommandId::PowerOff, ArgList::new())?;
        self.core.clear_all(ClearMode::WithoutRestart);
        info!("modem powered off");
        Ok(())
    }

    // ---------------------------------------------------------------
    // synchronous operations
    // ---------------------------------------------------------------

    pub fn get_version_sync(&self) -> ApiResult<VersionInfo> {
        match self.request_sync(CommandId::GetVersion, ArgList::new())? {
            EventPayload::GetVersion {
                raw_result,
                version,
            } => ok_or_command(raw_result, version),
            _ => Err(ApiError::UnexpectedReply(CommandId::GetVersion)),
        }
    }

    pub fn radio_on_sync(&self) -> ApiResult<()> {
        match self.request_sync(CommandId::RadioOn, ArgList::new())? {
            EventPayload::RadioOn { raw_result } => ok_or_command(raw_result, ()),
            _ => Err(ApiError::UnexpectedReply(CommandId::RadioOn)),
        }
    }

    pub fn radio_off_sync(&self) -> ApiResult<()> {
        match self.request_sync(CommandId::RadioOff, ArgList::new())? {
            EventPayload::RadioOff { raw_result } => ok_or_command(raw_result, ()),
            _ => Err(ApiError::UnexpectedReply(CommandId::RadioOff)),
        }
    }

    pub fn activate_pdn_sync(&self, apn: &ApnSettings) -> ApiResult<PdnInfo> {
        let inputs = ArgList::new().push(ArgValue::Apn(apn.clone()));
        match self.request_sync(CommandId::ActivatePdn, inputs)? {
            EventPayload::ActivatePdn { raw_result, pdn } => ok_or_command(raw_result, pdn),
            _ => Err(ApiError::UnexpectedReply(CommandId::ActivatePdn)),
        }
    }

    pub fn deactivate_pdn_sync(&self, session_id: u8) -> ApiResult<()> {
        let inputs = ArgList::new().push(ArgValue::U8(session_id));
        match self.request_sync(CommandId::DeactivatePdn, inputs)? {
            EventPayload::DeactivatePdn { raw_result } => ok_or_command(raw_result, ()),
            _ => Err(ApiError::UnexpectedReply(CommandId::DeactivatePdn)),
        }
    }

    pub fn get_local_time_sync(&self) -> ApiResult<LocalTime> {
        match self.request_sync(CommandId::GetLocalTime, ArgList::new())? {
            EventPayload::GetLocalTime { raw_result, time } => ok_or_command(raw_result, time),
            _ => Err(ApiError::UnexpectedReply(CommandId::GetLocalTime)),
        }
    }

    pub fn get_sim_info_sync(&self) -> ApiResult<SimInfo> {
        match self.request_sync(CommandId::GetSimInfo, ArgList::new())? {
            EventPayload::GetSimInfo { raw_result, info } => ok_or_command(raw_result, info),
            _ => Err(ApiError::UnexpectedReply(CommandId::GetSimInfo)),
        }
    }

    pub fn get_quality_sync(&self) -> ApiResult<SignalQuality> {
        match self.request_sync(CommandId::GetQuality, ArgList::new())? {
            EventPayload::GetQuality {
                raw_result,
                quality,
            } => ok_or_command(raw_result, quality),
            _ => Err(ApiError::UnexpectedReply(CommandId::GetQuality)),
        }
    }

    pub fn get_edrx_sync(&self) -> ApiResult<EdrxSettings> {
        match self.request_sync(CommandId::GetEdrx, ArgList::new())? {
            EventPayload::GetEdrx {
                raw_result,
                settings,
                ..
            } => ok_or_command(raw_result, settings),
            _ => Err(ApiError::UnexpectedReply(CommandId::GetEdrx)),
        }
    }

    pub fn set_edrx_sync(&self, settings: &EdrxSettings) -> ApiResult<()> {
        validate_edrx(settings)?;
        let inputs = ArgList::new().push(ArgValue::Edrx(*settings));
        match self.request_sync(CommandId::SetEdrx, inputs)? {
            EventPayload::SetEdrx { raw_result } => ok_or_command(raw_result, ()),
            _ => Err(ApiError::UnexpectedReply(CommandId::SetEdrx)),
        }
    }

    pub fn get_psm_sync(&self) -> ApiResult<PsmSettings> {
        // The shared wire event needs the requester's identity
        let inputs = ArgList::new().push(ArgValue::CommandTag(CommandId::GetPsm));
        match self.request_sync(CommandId::GetPsm, inputs)? {
            EventPayload::GetPsm {
                raw_result,
                settings,
                ..
            } => ok_or_command(raw_result, settings),
            _ => Err(ApiError::UnexpectedReply(CommandId::GetPsm)),
        }
    }

    pub fn set_psm_sync(&self, settings: &PsmSettings) -> ApiResult<()> {
        validate_psm(settings)?;
        let inputs = ArgList::new().push(ArgValue::Psm(*settings));
        match self.request_sync(CommandId::SetPsm, inputs)? {
            EventPayload::SetPsm { raw_result } => ok_or_command(raw_result, ()),
            _ => Err(ApiError::UnexpectedReply(CommandId::SetPsm)),
        }
    }

    pub fn get_current_edrx_sync(&self) -> ApiResult<EdrxSettings> {
        match self.request_sync(CommandId::GetCurrentEdrx, ArgList::new())? {
            EventPayload::GetCurrentEdrx {
                raw_result,
                settings,
                ..
            } => ok_or_command(raw_result, settings),
            _ => Err(ApiError::UnexpectedReply(CommandId::GetCurrentEdrx)),
        }
    }

    pub fn get_current_psm_sync(&self) -> ApiResult<PsmSettings> {
        let inputs = ArgList::new().push(ArgValue::CommandTag(CommandId::GetCurrentPsm));
        match self.request_sync(CommandId::GetCurrentPsm, inputs)? {
            EventPayload::GetCurrentPsm {
                raw_result,
                settings,
                ..
            } => ok_or_command(raw_result, settings),
            _ => Err(ApiError::UnexpectedReply(CommandId::GetCurrentPsm)),
        }
    }

    // ---------------------------------------------------------------
    // callback operations
    // ---------------------------------------------------------------

    pub fn radio_on(&self, cb: ResultCb) -> ApiResult<()> {
        self.invoke_one_shot(CommandId::RadioOn, ArgList::new(), Callback::Result(cb))
    }

    pub fn radio_off(&self, cb: ResultCb) -> ApiResult<()> {
        self.invoke_one_shot(CommandId::RadioOff, ArgList::new(), Callback::Result(cb))
    }

    pub fn get_version(&self, cb: VersionCb) -> ApiResult<()> {
        self.invoke_one_shot(CommandId::GetVersion, ArgList::new(), Callback::Version(cb))
    }

    pub fn activate_pdn(&self, apn: &ApnSettings, cb: PdnCb) -> ApiResult<()> {
        let inputs = ArgList::new().push(ArgValue::Apn(apn.clone()));
        self.invoke_one_shot(CommandId::ActivatePdn, inputs, Callback::Pdn(cb))
    }

    pub fn deactivate_pdn(&self, session_id: u8, cb: ResultCb) -> ApiResult<()> {
        let inputs = ArgList::new().push(ArgValue::U8(session_id));
        self.invoke_one_shot(CommandId::DeactivatePdn, inputs, Callback::Result(cb))
    }

    pub fn get_local_time(&self, cb: LocalTimeCb) -> ApiResult<()> {
        self.invoke_one_shot(
            CommandId::GetLocalTime,
            ArgList::new(),
            Callback::LocalTime(cb),
        )
    }

    pub fn get_sim_info(&self, cb: SimInfoCb) -> ApiResult<()> {
        self.invoke_one_shot(CommandId::GetSimInfo, ArgList::new(), Callback::SimInfo(cb))
    }

    pub fn get_quality(&self, cb: QualityCb) -> ApiResult<()> {
        self.invoke_one_shot(CommandId::GetQuality, ArgList::new(), Callback::Quality(cb))
    }

    pub fn get_edrx(&self, cb: EdrxCb) -> ApiResult<()> {
        self.invoke_one_shot(CommandId::GetEdrx, ArgList::new(), Callback::Edrx(cb))
    }

    pub fn get_current_edrx(&self, cb: EdrxCb) -> ApiResult<()> {
        self.invoke_one_shot(CommandId::GetCurrentEdrx, ArgList::new(), Callback::Edrx(cb))
    }

    pub fn set_edrx(&self, settings: &EdrxSettings, cb: ResultCb) -> ApiResult<()> {
        validate_edrx(settings)?;
        let inputs = ArgList::new().push(ArgValue::Edrx(*settings));
        self.invoke_one_shot(CommandId::SetEdrx, inputs, Callback::Result(cb))
    }

    pub fn get_psm(&self, cb: PsmCb) -> ApiResult<()> {
        let inputs = ArgList::new().push(ArgValue::CommandTag(CommandId::GetPsm));
        self.invoke_one_shot(CommandId::GetPsm, inputs, Callback::Psm(cb))
    }

    pub fn get_current_psm(&self, cb: PsmCb) -> ApiResult<()> {
        let inputs = ArgList::new().push(ArgValue::CommandTag(CommandId::GetCurrentPsm));
        self.invoke_one_shot(CommandId::GetCurrentPsm, inputs, Callback::Psm(cb))
    }

    pub fn set_psm(&self, settings: &PsmSettings, cb: ResultCb) -> ApiResult<()> {
        validate_psm(settings)?;
        let inputs = ArgList::new().push(ArgValue::Psm(*settings));
        self.invoke_one_shot(CommandId::SetPsm, inputs, Callback::Result(cb))
    }

    // ---------------------------------------------------------------
    // report subscriptions
    // ---------------------------------------------------------------

    /// Restart notifications survive `power_off`; register once at startup.
    pub fn set_report_restart(&self, cb: Option<RestartCb>) -> ApiResult<()> {
        self.subscribe(
            CommandId::Restart,
            ArgList::new(),
            cb.map(Callback::Restart),
        )
    }

    pub fn set_report_net_info(&self, cb: Option<NetInfoReportCb>) -> ApiResult<()> {
        self.subscribe(
            CommandId::ReportNetInfo,
            ArgList::new(),
            cb.map(Callback::NetInfoReport),
        )
    }

    pub fn set_report_sim_state(&self, cb: Option<SimStateReportCb>) -> ApiResult<()> {
        let inputs = ArgList::new().push(ArgValue::CommandTag(CommandId::ReportSimState));
        self.subscribe(
            CommandId::ReportSimState,
            inputs,
            cb.map(Callback::SimStateReport),
        )
    }

    pub fn set_report_local_time(&self, cb: Option<LocalTimeReportCb>) -> ApiResult<()> {
        let inputs = ArgList::new().push(ArgValue::CommandTag(CommandId::ReportLocalTime));
        self.subscribe(
            CommandId::ReportLocalTime,
            inputs,
            cb.map(Callback::LocalTimeReport),
        )
    }

    pub fn set_report_quality(
        &self,
        cb: Option<QualityReportCb>,
        period_secs: u32,
    ) -> ApiResult<()> {
        let inputs = ArgList::new().push(ArgValue::Period(period_secs));
        self.subscribe(
            CommandId::ReportQuality,
            inputs,
            cb.map(Callback::QualityReport),
        )
    }

    pub fn set_report_cell_info(
        &self,
        cb: Option<CellInfoReportCb>,
        period_secs: u32,
    ) -> ApiResult<()> {
        let inputs = ArgList::new().push(ArgValue::Period(period_secs));
        self.subscribe(
            CommandId::ReportCellInfo,
            inputs,
            cb.map(Callback::CellInfoReport),
        )
    }

    pub fn set_tls_verify(&self, cb: Option<TlsVerifyCb>) -> ApiResult<()> {
        self.subscribe(
            CommandId::TlsVerify,
            ArgList::new(),
            cb.map(Callback::TlsVerify),
        )
    }

    /// Re-issue every live report subscription after a modem restart.
    ///
    /// Registrations survive the restart on our side; the modem does not. A
    /// failed re-issue is logged and skipped so one broken subscription does
    /// not strand the rest. Returns the number re-armed.
    pub fn resubscribe_reports(&self) -> usize {
        let mut rearmed = 0;
        for id in self.core.registry().registered_reports() {
            let inputs = match id {
                CommandId::ReportNetInfo => ArgList::new(),
                CommandId::ReportSimState | CommandId::ReportLocalTime => {
                    ArgList::new().push(ArgValue::CommandTag(id))
                }
                CommandId::ReportQuality => ArgList::new()
                    .push(ArgValue::Period(self.config().quality_report_period_secs)),
                CommandId::ReportCellInfo => ArgList::new()
                    .push(ArgValue::Period(self.config().cellinfo_report_period_secs)),
                // TLS verification is renegotiated per connection, not
                // re-armed with the report set
                _ => continue,
            };

            let request = CommandRequest::new(id, inputs.with_callback(true));
            match self.channel.send(&request) {
                Ok(reply) if reply.code.is_success() => rearmed += 1,
                Ok(reply) => warn!("resubscribe {} refused: {:?}", id, reply.code),
                Err(err) => warn!("resubscribe {} failed: {}", id, err),
            }
        }
        rearmed
    }
}

/// Map a raw in-payload result to the sync-path return convention:
/// negative codes surface verbatim as `ApiError::Command`.
fn ok_or_command<V>(raw_result: i32, value: V) -> ApiResult<V> {
    if raw_result < 0 {
        Err(ApiError::Command(raw_result))
    } else {
        Ok(value)
    }
}
