/*!
 * Execution Adapters
 * One function per command: re-type the slot payload, invoke the callback
 */

use crate::core::payload::EventPayload;
use crate::core::types::{CmdResult, CommandId, EventBitmap};
use crate::events::dns::DnsCache;
use crate::events::registry::Callback;
use crate::events::slots::SlotTable;
use log::warn;

/// Per-invocation context handed to adapters.
pub(crate) struct AdapterCtx<'a> {
    slots: &'a SlotTable,
    dns: &'a DnsCache,
    index: usize,
    released: bool,
}

impl<'a> AdapterCtx<'a> {
    pub(crate) fn new(slots: &'a SlotTable, dns: &'a DnsCache, index: usize) -> Self {
        Self {
            slots,
            dns,
            index,
            released: false,
        }
    }

    /// Mark the adapter's own slot Writable before its callback runs,
    /// overriding the dispatcher's mark-writable-after default. Needed when
    /// the peer may legitimately resend the same event while the callback is
    /// still executing.
    fn release_now(&mut self) {
        self.slots.mark_writable_index(self.index);
        self.released = true;
    }

    /// Whether the adapter already recycled its slot
    pub(crate) fn released(&self) -> bool {
        self.released
    }

    fn slots(&self) -> &SlotTable {
        self.slots
    }
}

/// Adapter signature: the returned bitmap is the redirect set; empty means
/// the event was consumed here.
pub(crate) type ExecFn = fn(Option<&Callback>, &EventPayload, &mut AdapterCtx<'_>) -> EventBitmap;

/// Static/dynamic command pairs aliasing one wire event. A protocol quirk,
/// kept in one table so the redirect logic is not duplicated per pair.
const SIBLINGS: &[(CommandId, CommandId)] = &[
    (CommandId::GetEdrx, CommandId::GetCurrentEdrx),
    (CommandId::GetCurrentEdrx, CommandId::GetEdrx),
    (CommandId::GetPsm, CommandId::GetCurrentPsm),
    (CommandId::GetCurrentPsm, CommandId::GetPsm),
];

/// Redirect bitmap for the sibling of an aliased command
fn sibling_redirect(ctx: &AdapterCtx<'_>, id: CommandId) -> EventBitmap {
    SIBLINGS
        .iter()
        .find(|(own, _)| *own == id)
        .map(|(_, sibling)| ctx.slots().bit_for(*sibling))
        .unwrap_or(EventBitmap::EMPTY)
}

fn mismatch(id: CommandId, cb: &Callback) {
    warn!("{}: callback variant mismatch ({:?}); skipped", id, cb);
}

fn exec_restart(cb: Option<&Callback>, payload: &EventPayload, _ctx: &mut AdapterCtx<'_>) -> EventBitmap {
    let EventPayload::Restart { reason } = payload else {
        return EventBitmap::EMPTY;
    };
    match cb {
        Some(Callback::Restart(f)) => f(*reason),
        Some(other) => mismatch(CommandId::Restart, other),
        None => {}
    }
    EventBitmap::EMPTY
}

fn exec_get_version(cb: Option<&Callback>, payload: &EventPayload, _ctx: &mut AdapterCtx<'_>) -> EventBitmap {
    let EventPayload::GetVersion { raw_result, version } = payload else {
        return EventBitmap::EMPTY;
    };
    match cb {
        Some(Callback::Version(f)) => f(CmdResult::from_raw(*raw_result), version.clone()),
        Some(other) => mismatch(CommandId::GetVersion, other),
        None => {}
    }
    EventBitmap::EMPTY
}

fn exec_radio_on(cb: Option<&Callback>, payload: &EventPayload, _ctx: &mut AdapterCtx<'_>) -> EventBitmap {
    let EventPayload::RadioOn { raw_result } = payload else {
        return EventBitmap::EMPTY;
    };
    match cb {
        Some(Callback::Result(f)) => f(CmdResult::from_raw(*raw_result)),
        Some(other) => mismatch(CommandId::RadioOn, other),
        None => {}
    }
    EventBitmap::EMPTY
}

fn exec_radio_off(cb: Option<&Callback>, payload: &EventPayload, _ctx: &mut AdapterCtx<'_>) -> EventBitmap {
    let EventPayload::RadioOff { raw_result } = payload else {
        return EventBitmap::EMPTY;
    };
    match cb {
        Some(Callback::Result(f)) => f(CmdResult::from_raw(*raw_result)),
        Some(other) => mismatch(CommandId::RadioOff, other),
        None => {}
    }
    EventBitmap::EMPTY
}

fn exec_activate_pdn(cb: Option<&Callback>, payload: &EventPayload, _ctx: &mut AdapterCtx<'_>) -> EventBitmap {
    let EventPayload::ActivatePdn { raw_result, pdn } = payload else {
        return EventBitmap::EMPTY;
    };
    match cb {
        Some(Callback::Pdn(f)) => f(CmdResult::from_raw(*raw_result), pdn.clone()),
        Some(other) => mismatch(CommandId::ActivatePdn, other),
        None => {}
    }
    EventBitmap::EMPTY
}

fn exec_deactivate_pdn(cb: Option<&Callback>, payload: &EventPayload, _ctx: &mut AdapterCtx<'_>) -> EventBitmap {
    let EventPayload::DeactivatePdn { raw_result } = payload else {
        return EventBitmap::EMPTY;
    };
    match cb {
        Some(Callback::Result(f)) => f(CmdResult::from_raw(*raw_result)),
        Some(other) => mismatch(CommandId::DeactivatePdn, other),
        None => {}
    }
    EventBitmap::EMPTY
}

fn exec_get_local_time(cb: Option<&Callback>, payload: &EventPayload, _ctx: &mut AdapterCtx<'_>) -> EventBitmap {
    let EventPayload::GetLocalTime { raw_result, time } = payload else {
        return EventBitmap::EMPTY;
    };
    match cb {
        Some(Callback::LocalTime(f)) => f(CmdResult::from_raw(*raw_result), *time),
        Some(other) => mismatch(CommandId::GetLocalTime, other),
        None => {}
    }
    EventBitmap::EMPTY
}

fn exec_get_sim_info(cb: Option<&Callback>, payload: &EventPayload, _ctx: &mut AdapterCtx<'_>) -> EventBitmap {
    let EventPayload::GetSimInfo { raw_result, info } = payload else {
        return EventBitmap::EMPTY;
    };
    match cb {
        Some(Callback::SimInfo(f)) => f(CmdResult::from_raw(*raw_result), info.clone()),
        Some(other) => mismatch(CommandId::GetSimInfo, other),
        None => {}
    }
    EventBitmap::EMPTY
}

fn exec_get_quality(cb: Option<&Callback>, payload: &EventPayload, _ctx: &mut AdapterCtx<'_>) -> EventBitmap {
    let EventPayload::GetQuality { raw_result, quality } = payload else {
        return EventBitmap::EMPTY;
    };
    match cb {
        Some(Callback::Quality(f)) => f(CmdResult::from_raw(*raw_result), *quality),
        Some(other) => mismatch(CommandId::GetQuality, other),
        None => {}
    }
    EventBitmap::EMPTY
}

fn exec_get_edrx(cb: Option<&Callback>, payload: &EventPayload, ctx: &mut AdapterCtx<'_>) -> EventBitmap {
    let EventPayload::GetEdrx { raw_result, settings, own_event } = payload else {
        return EventBitmap::EMPTY;
    };
    if !own_event {
        return sibling_redirect(ctx, CommandId::GetEdrx);
    }
    match cb {
        Some(Callback::Edrx(f)) => f(CmdResult::from_raw(*raw_result), *settings),
        Some(other) => mismatch(CommandId::GetEdrx, other),
        None => {}
    }
    EventBitmap::EMPTY
}

fn exec_set_edrx(cb: Option<&Callback>, payload: &EventPayload, _ctx: &mut AdapterCtx<'_>) -> EventBitmap {
    let EventPayload::SetEdrx { raw_result } = payload else {
        return EventBitmap::EMPTY;
    };
    match cb {
        Some(Callback::Result(f)) => f(CmdResult::from_raw(*raw_result)),
        Some(other) => mismatch(CommandId::SetEdrx, other),
        None => {}
    }
    EventBitmap::EMPTY
}

fn exec_get_psm(cb: Option<&Callback>, payload: &EventPayload, ctx: &mut AdapterCtx<'_>) -> EventBitmap {
    let EventPayload::GetPsm { raw_result, settings, own_event } = payload else {
        return EventBitmap::EMPTY;
    };
    if !own_event {
        return sibling_redirect(ctx, CommandId::GetPsm);
    }
    match cb {
        Some(Callback::Psm(f)) => f(CmdResult::from_raw(*raw_result), *settings),
        Some(other) => mismatch(CommandId::GetPsm, other),
        None => {}
    }
    EventBitmap::EMPTY
}

fn exec_set_psm(cb: Option<&Callback>, payload: &EventPayload, _ctx: &mut AdapterCtx<'_>) -> EventBitmap {
    let EventPayload::SetPsm { raw_result } = payload else {
        return EventBitmap::EMPTY;
    };
    match cb {
        Some(Callback::Result(f)) => f(CmdResult::from_raw(*raw_result)),
        Some(other) => mismatch(CommandId::SetPsm, other),
        None => {}
    }
    EventBitmap::EMPTY
}

fn exec_get_current_edrx(cb: Option<&Callback>, payload: &EventPayload, ctx: &mut AdapterCtx<'_>) -> EventBitmap {
    let EventPayload::GetCurrentEdrx { raw_result, settings, own_event } = payload else {
        return EventBitmap::EMPTY;
    };
    if !own_event {
        return sibling_redirect(ctx, CommandId::GetCurrentEdrx);
    }
    match cb {
        Some(Callback::Edrx(f)) => f(CmdResult::from_raw(*raw_result), *settings),
        Some(other) => mismatch(CommandId::GetCurrentEdrx, other),
        None => {}
    }
    EventBitmap::EMPTY
}

fn exec_get_current_psm(cb: Option<&Callback>, payload: &EventPayload, ctx: &mut AdapterCtx<'_>) -> EventBitmap {
    let EventPayload::GetCurrentPsm { raw_result, settings, own_event } = payload else {
        return EventBitmap::EMPTY;
    };
    if !own_event {
        return sibling_redirect(ctx, CommandId::GetCurrentPsm);
    }
    match cb {
        Some(Callback::Psm(f)) => f(CmdResult::from_raw(*raw_result), *settings),
        Some(other) => mismatch(CommandId::GetCurrentPsm, other),
        None => {}
    }
    EventBitmap::EMPTY
}

fn exec_report_net_info(cb: Option<&Callback>, payload: &EventPayload, ctx: &mut AdapterCtx<'_>) -> EventBitmap {
    let EventPayload::ReportNetInfo { info, dns_servers } = payload else {
        return EventBitmap::EMPTY;
    };

    // Resolver state tracks the modem's PDN regardless of user interest
    ctx.dns.refresh(dns_servers, info);

    match cb {
        Some(Callback::NetInfoReport(f)) => f(info.clone()),
        Some(other) => mismatch(CommandId::ReportNetInfo, other),
        None => {}
    }
    EventBitmap::EMPTY
}

fn exec_report_sim_state(cb: Option<&Callback>, payload: &EventPayload, _ctx: &mut AdapterCtx<'_>) -> EventBitmap {
    let EventPayload::ReportSimState { state } = payload else {
        return EventBitmap::EMPTY;
    };
    match cb {
        Some(Callback::SimStateReport(f)) => f(*state),
        Some(other) => mismatch(CommandId::ReportSimState, other),
        None => {}
    }
    EventBitmap::EMPTY
}

fn exec_report_local_time(cb: Option<&Callback>, payload: &EventPayload, _ctx: &mut AdapterCtx<'_>) -> EventBitmap {
    let EventPayload::ReportLocalTime { time } = payload else {
        return EventBitmap::EMPTY;
    };
    match cb {
        Some(Callback::LocalTimeReport(f)) => f(*time),
        Some(other) => mismatch(CommandId::ReportLocalTime, other),
        None => {}
    }
    EventBitmap::EMPTY
}

fn exec_report_quality(cb: Option<&Callback>, payload: &EventPayload, _ctx: &mut AdapterCtx<'_>) -> EventBitmap {
    let EventPayload::ReportQuality { quality } = payload else {
        return EventBitmap::EMPTY;
    };
    match cb {
        Some(Callback::QualityReport(f)) => f(*quality),
        Some(other) => mismatch(CommandId::ReportQuality, other),
        None => {}
    }
    EventBitmap::EMPTY
}

fn exec_report_cell_info(cb: Option<&Callback>, payload: &EventPayload, _ctx: &mut AdapterCtx<'_>) -> EventBitmap {
    let EventPayload::ReportCellInfo { info } = payload else {
        return EventBitmap::EMPTY;
    };
    match cb {
        Some(Callback::CellInfoReport(f)) => f(info.clone()),
        Some(other) => mismatch(CommandId::ReportCellInfo, other),
        None => {}
    }
    EventBitmap::EMPTY
}

fn exec_tls_verify(cb: Option<&Callback>, payload: &EventPayload, ctx: &mut AdapterCtx<'_>) -> EventBitmap {
    let EventPayload::TlsVerify { cert, depth } = payload else {
        return EventBitmap::EMPTY;
    };

    // The callback answers the modem over the command channel, and the modem
    // may resend this event before the answer lands. The slot must be
    // writable again before the callback runs or the resend gets discarded.
    ctx.release_now();

    match cb {
        Some(Callback::TlsVerify(f)) => f(*cert, *depth),
        Some(other) => mismatch(CommandId::TlsVerify, other),
        None => {}
    }
    EventBitmap::EMPTY
}

/// Adapter table, scanned linearly like the registration tables.
const ADAPTERS: &[(CommandId, ExecFn)] = &[
    (CommandId::Restart, exec_restart),
    (CommandId::GetVersion, exec_get_version),
    (CommandId::RadioOn, exec_radio_on),
    (CommandId::RadioOff, exec_radio_off),
    (CommandId::ActivatePdn, exec_activate_pdn),
    (CommandId::DeactivatePdn, exec_deactivate_pdn),
    (CommandId::GetLocalTime, exec_get_local_time),
    (CommandId::GetSimInfo, exec_get_sim_info),
    (CommandId::GetQuality, exec_get_quality),
    (CommandId::GetEdrx, exec_get_edrx),
    (CommandId::SetEdrx, exec_set_edrx),
    (CommandId::GetPsm, exec_get_psm),
    (CommandId::SetPsm, exec_set_psm),
    (CommandId::GetCurrentEdrx, exec_get_current_edrx),
    (CommandId::GetCurrentPsm, exec_get_current_psm),
    (CommandId::ReportNetInfo, exec_report_net_info),
    (CommandId::ReportSimState, exec_report_sim_state),
    (CommandId::ReportLocalTime, exec_report_local_time),
    (CommandId::ReportQuality, exec_report_quality),
    (CommandId::ReportCellInfo, exec_report_cell_info),
    (CommandId::TlsVerify, exec_tls_verify),
];

/// Look up the adapter for a command id
pub(crate) fn adapter_for(id: CommandId) -> Option<ExecFn> {
    ADAPTERS
        .iter()
        .find(|(adapter_id, _)| *adapter_id == id)
        .map(|(_, exec)| *exec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_slot_command_has_an_adapter() {
        use crate::core::payload::EventPayload;
        for id in CommandId::ALL {
            if EventPayload::initial(id).is_some() {
                assert!(adapter_for(id).is_some(), "missing adapter for {}", id);
            }
        }
    }

    #[test]
    fn test_sibling_table_is_symmetric() {
        for (own, sibling) in SIBLINGS {
            assert!(SIBLINGS.contains(&(*sibling, *own)));
        }
    }
}
