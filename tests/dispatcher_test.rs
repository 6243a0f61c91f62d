/*!
 * Dispatcher Tests
 * Slot recycling, redirects, reset sweep and error remapping
 */

use modemlink::core::data::{NetInfo, PdnInfo, QueryFamily, RestartReason, SignalQuality};
use modemlink::{
    Callback, CmdResult, CommandId, DispatcherCore, EventBitmap, EventPayload, SlotState,
};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn cancel_code() -> i32 {
    -(nix::errno::Errno::ECANCELED as i32)
}

#[test]
fn test_radio_on_scenario() {
    init_logging();
    let core = DispatcherCore::new();

    let results = Arc::new(Mutex::new(Vec::new()));
    let sink = results.clone();
    core.set_callback(
        CommandId::RadioOn,
        Some(Callback::Result(Arc::new(move |result| {
            sink.lock().unwrap().push(result);
        }))),
    )
    .unwrap();

    let bit = core
        .deposit(EventPayload::RadioOn { raw_result: 0 })
        .unwrap();
    core.dispatch(bit);

    // callback invoked exactly once with success
    assert_eq!(*results.lock().unwrap(), vec![CmdResult::Ok]);
    // one-shot registration removed
    assert!(core.registry().lookup(CommandId::RadioOn).is_none());
    // slot recycled
    assert_eq!(
        core.slots().state(CommandId::RadioOn),
        Some(SlotState::Writable)
    );

    // a fresh registration is accepted after completion
    core.set_callback(
        CommandId::RadioOn,
        Some(Callback::Result(Arc::new(|_| {}))),
    )
    .unwrap();
}

#[test]
fn test_recycle_invariant_for_reports() {
    init_logging();
    let core = DispatcherCore::new();

    let count = Arc::new(AtomicUsize::new(0));
    let sink = count.clone();
    core.set_callback(
        CommandId::ReportQuality,
        Some(Callback::QualityReport(Arc::new(move |_| {
            sink.fetch_add(1, Ordering::SeqCst);
        }))),
    )
    .unwrap();

    for _ in 0..3 {
        let bit = core
            .deposit(EventPayload::ReportQuality {
                quality: SignalQuality::default(),
            })
            .unwrap();
        core.dispatch(bit);
        assert_eq!(
            core.slots().state(CommandId::ReportQuality),
            Some(SlotState::Writable)
        );
    }

    // report registration survives every delivery
    assert_eq!(count.load(Ordering::SeqCst), 3);
    assert!(core.registry().lookup(CommandId::ReportQuality).is_some());
}

#[test]
fn test_unregistered_bit_is_skipped_and_recycled() {
    init_logging();
    let core = DispatcherCore::new();

    let bit = core
        .deposit(EventPayload::ReportCellInfo {
            info: Default::default(),
        })
        .unwrap();
    core.dispatch(bit);

    // nobody listening: not an error, slot simply recycled
    assert_eq!(
        core.slots().state(CommandId::ReportCellInfo),
        Some(SlotState::Writable)
    );
}

#[test]
fn test_always_driven_netinfo_refreshes_dns_without_callback() {
    init_logging();
    let core = DispatcherCore::new();

    let server = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 53)), 53);
    let info = NetInfo {
        pdns: vec![PdnInfo {
            session_id: 1,
            active: true,
            addresses: vec![IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2))],
        }],
        ..Default::default()
    };

    let bit = core
        .deposit(EventPayload::ReportNetInfo {
            info,
            dns_servers: vec![server],
        })
        .unwrap();
    core.dispatch(bit);

    let dns = core.dns_snapshot();
    assert_eq!(dns.servers, vec![server]);
    assert_eq!(dns.family, QueryFamily::V4);
    assert_eq!(
        core.slots().state(CommandId::ReportNetInfo),
        Some(SlotState::Writable)
    );
}

#[test]
fn test_reset_sweep() {
    init_logging();
    let core = DispatcherCore::new();

    let restarts = Arc::new(Mutex::new(Vec::new()));
    let sink = restarts.clone();
    core.set_callback(
        CommandId::Restart,
        Some(Callback::Restart(Arc::new(move |reason| {
            sink.lock().unwrap().push(reason);
        }))),
    )
    .unwrap();

    let radio_calls = Arc::new(AtomicUsize::new(0));
    let radio_sink = radio_calls.clone();
    core.set_callback(
        CommandId::RadioOn,
        Some(Callback::Result(Arc::new(move |_| {
            radio_sink.fetch_add(1, Ordering::SeqCst);
        }))),
    )
    .unwrap();
    core.set_callback(
        CommandId::ReportQuality,
        Some(Callback::QualityReport(Arc::new(|_| {}))),
    )
    .unwrap();

    core.deposit(EventPayload::Restart {
        reason: RestartReason::ModemInitiated,
    })
    .unwrap();
    let radio_bit = core
        .deposit(EventPayload::RadioOn { raw_result: 0 })
        .unwrap();

    // RESET short-circuits: the radio bit in the same bitmap is ignored
    let mut bitmap = EventBitmap::RESET;
    bitmap.merge(radio_bit);
    core.dispatch(bitmap);

    assert_eq!(
        *restarts.lock().unwrap(),
        vec![RestartReason::ModemInitiated]
    );
    assert_eq!(radio_calls.load(Ordering::SeqCst), 0);

    // every slot writable again
    for id in CommandId::ALL {
        if let Some(state) = core.slots().state(id) {
            assert_eq!(state, SlotState::Writable, "slot {} not recycled", id);
        }
    }

    // only the restart registration survives
    assert_eq!(core.registry().len(), 1);
    assert!(core.registry().lookup(CommandId::Restart).is_some());
}

#[test]
fn test_redirect_closure_for_edrx_pair() {
    init_logging();

    let run = |core: &DispatcherCore, bitmap: EventBitmap| {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = calls.clone();
        core.set_callback(
            CommandId::GetEdrx,
            Some(Callback::Edrx(Arc::new(move |result, settings| {
                sink.lock().unwrap().push((result, settings));
            }))),
        )
        .unwrap();
        core.dispatch(bitmap);
        Arc::try_unwrap(calls).unwrap().into_inner().unwrap()
    };

    // redirected: the dynamic slot's event actually belongs to the static
    // sibling
    let redirected_core = DispatcherCore::new();
    let dynamic_calls = Arc::new(AtomicUsize::new(0));
    let dynamic_sink = dynamic_calls.clone();
    redirected_core
        .set_callback(
            CommandId::GetCurrentEdrx,
            Some(Callback::Edrx(Arc::new(move |_, _| {
                dynamic_sink.fetch_add(1, Ordering::SeqCst);
            }))),
        )
        .unwrap();
    let bit = redirected_core
        .deposit(EventPayload::GetCurrentEdrx {
            raw_result: 0,
            settings: Default::default(),
            own_event: false,
        })
        .unwrap();
    let via_redirect = run(&redirected_core, bit);

    // direct: dispatch the static slot's bit outright
    let direct_core = DispatcherCore::new();
    let direct_bit = direct_core.slots().bit_for(CommandId::GetEdrx);
    let direct = run(&direct_core, direct_bit);

    assert_eq!(via_redirect, direct);
    assert_eq!(via_redirect.len(), 1);

    // the dynamic callback never ran, its registration is untouched, and
    // the dynamic slot was recycled
    assert_eq!(dynamic_calls.load(Ordering::SeqCst), 0);
    assert!(redirected_core
        .registry()
        .lookup(CommandId::GetCurrentEdrx)
        .is_some());
    assert_eq!(
        redirected_core.slots().state(CommandId::GetCurrentEdrx),
        Some(SlotState::Writable)
    );
}

#[test]
fn test_inconsistent_sibling_flags_terminate() {
    init_logging();
    let core = DispatcherCore::new();

    // both slots claim the event belongs to the other: the pass bound must
    // end the ping-pong
    core.deposit(EventPayload::GetEdrx {
        raw_result: 0,
        settings: Default::default(),
        own_event: false,
    })
    .unwrap();
    core.deposit(EventPayload::GetCurrentEdrx {
        raw_result: 0,
        settings: Default::default(),
        own_event: false,
    })
    .unwrap();

    let bit = core.slots().bit_for(CommandId::GetEdrx);
    core.dispatch(bit);
}

#[test]
fn test_error_remapping_in_callback() {
    init_logging();
    let core = DispatcherCore::new();

    let cases = [
        (0, CmdResult::Ok),
        (cancel_code(), CmdResult::Cancel),
        (-13, CmdResult::Error),
        (4, CmdResult::Other(4)),
    ];

    for (raw, expected) in cases {
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        core.set_callback(
            CommandId::RadioOff,
            Some(Callback::Result(Arc::new(move |result| {
                *sink.lock().unwrap() = Some(result);
            }))),
        )
        .unwrap();

        let bit = core
            .deposit(EventPayload::RadioOff { raw_result: raw })
            .unwrap();
        core.dispatch(bit);

        assert_eq!(seen.lock().unwrap().take(), Some(expected), "raw {}", raw);
    }
}

#[test]
fn test_tls_verify_slot_is_reentrant() {
    init_logging();
    let core = Arc::new(DispatcherCore::new());

    let redeposit = Arc::new(Mutex::new(None));
    let redeposit_sink = redeposit.clone();
    let inner_core = core.clone();
    core.set_callback(
        CommandId::TlsVerify,
        Some(Callback::TlsVerify(Arc::new(move |cert, _depth| {
            // the modem resends while we are still inside the callback; the
            // adapter must have released the slot already
            let outcome = inner_core.deposit(EventPayload::TlsVerify {
                cert: cert + 1,
                depth: 1,
            });
            *redeposit_sink.lock().unwrap() = Some(outcome.is_ok());
        }))),
    )
    .unwrap();

    let bit = core
        .deposit(EventPayload::TlsVerify { cert: 7, depth: 0 })
        .unwrap();
    core.dispatch(bit);

    assert_eq!(*redeposit.lock().unwrap(), Some(true));
    // the resent event is pending delivery now
    assert_eq!(
        core.slots().state(CommandId::TlsVerify),
        Some(SlotState::Locked)
    );
}
