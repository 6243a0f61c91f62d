/*!
 * Registry Tests
 * At-most-one, replace-only and teardown sweep semantics
 */

use modemlink::{Callback, CallbackRegistry, ClearMode, CommandId, RegistryError};
use std::sync::Arc;

fn result_cb() -> Callback {
    Callback::Result(Arc::new(|_| {}))
}

fn quality_cb() -> Callback {
    Callback::QualityReport(Arc::new(|_| {}))
}

#[test]
fn test_at_most_one_for_one_shot() {
    let registry = CallbackRegistry::new();

    registry.register(CommandId::ActivatePdn, Callback::Pdn(Arc::new(|_, _| {}))).unwrap();
    assert_eq!(
        registry.register(CommandId::ActivatePdn, Callback::Pdn(Arc::new(|_, _| {}))),
        Err(RegistryError::InProgress(CommandId::ActivatePdn))
    );

    // completion clears the entry; a new registration then succeeds
    registry.clear(CommandId::ActivatePdn);
    registry.register(CommandId::ActivatePdn, Callback::Pdn(Arc::new(|_, _| {}))).unwrap();
}

#[test]
fn test_replace_only_for_reports() {
    let registry = CallbackRegistry::new();

    registry.register(CommandId::ReportQuality, quality_cb()).unwrap();
    assert_eq!(
        registry.register(CommandId::ReportQuality, quality_cb()),
        Err(RegistryError::AlreadyRegistered(CommandId::ReportQuality))
    );

    registry.clear(CommandId::ReportQuality);
    registry.register(CommandId::ReportQuality, quality_cb()).unwrap();
}

#[test]
fn test_restart_counts_as_report_like() {
    let registry = CallbackRegistry::new();

    registry.register(CommandId::Restart, Callback::Restart(Arc::new(|_| {}))).unwrap();
    assert_eq!(
        registry.register(CommandId::Restart, Callback::Restart(Arc::new(|_| {}))),
        Err(RegistryError::AlreadyRegistered(CommandId::Restart))
    );
}

#[test]
fn test_table_full_reports_cleanly() {
    let registry = CallbackRegistry::with_capacity(3);

    registry.register(CommandId::RadioOn, result_cb()).unwrap();
    registry.register(CommandId::RadioOff, result_cb()).unwrap();
    registry.register(CommandId::SetEdrx, result_cb()).unwrap();
    assert_eq!(
        registry.register(CommandId::SetPsm, result_cb()),
        Err(RegistryError::TableFull)
    );

    // a freed row becomes usable again
    registry.clear(CommandId::RadioOff);
    registry.register(CommandId::SetPsm, result_cb()).unwrap();
}

#[test]
fn test_set_routes_none_to_clear() {
    let registry = CallbackRegistry::new();

    registry.set(CommandId::ReportQuality, Some(quality_cb())).unwrap();
    assert!(registry.lookup(CommandId::ReportQuality).is_some());

    // clearing succeeds even when repeated
    registry.set(CommandId::ReportQuality, None).unwrap();
    registry.set(CommandId::ReportQuality, None).unwrap();
    assert!(registry.lookup(CommandId::ReportQuality).is_none());
}

#[test]
fn test_clear_all_without_restart_keeps_restart_only() {
    let registry = CallbackRegistry::new();

    registry.register(CommandId::Restart, Callback::Restart(Arc::new(|_| {}))).unwrap();
    registry.register(CommandId::RadioOn, result_cb()).unwrap();
    registry.register(CommandId::ReportQuality, quality_cb()).unwrap();

    registry.clear_all(ClearMode::WithoutRestart);
    assert_eq!(registry.len(), 1);
    assert!(registry.lookup(CommandId::Restart).is_some());

    registry.clear_all(ClearMode::All);
    assert!(registry.is_empty());
}
