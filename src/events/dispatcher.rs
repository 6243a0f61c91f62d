/*!
 * Event Dispatcher
 * Bitmap-driven delivery: resolve slot, run adapter, recycle
 */

use crate::core::config::CoreConfig;
use crate::core::errors::{RegistryResult, SlotResult};
use crate::core::payload::EventPayload;
use crate::core::types::{CommandId, EventBitmap};
use crate::events::adapters::{adapter_for, AdapterCtx};
use crate::events::dns::{DnsCache, DnsSnapshot};
use crate::events::registry::{Callback, CallbackRegistry, ClearMode};
use crate::events::slots::SlotTable;
use log::{debug, warn};

/// The correlation core: slot table, callback registry and dispatch loop as
/// one explicitly constructed value.
///
/// The original kept these as process-wide globals; an owned instance gives
/// deterministic teardown and lets tests run independent cores side by side.
/// Share it behind an `Arc` between the request path and the delivery
/// bridge.
pub struct DispatcherCore {
    slots: SlotTable,
    registry: CallbackRegistry,
    dns: DnsCache,
    config: CoreConfig,
}

impl DispatcherCore {
    pub fn new() -> Self {
        Self::with_config(CoreConfig::default())
    }

    pub fn with_config(config: CoreConfig) -> Self {
        Self {
            slots: SlotTable::new(),
            registry: CallbackRegistry::with_capacity(config.registry_capacity),
            dns: DnsCache::new(),
            config,
        }
    }

    pub fn slots(&self) -> &SlotTable {
        &self.slots
    }

    pub fn registry(&self) -> &CallbackRegistry {
        &self.registry
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Resolver state maintained by net-info reports
    pub fn dns_snapshot(&self) -> DnsSnapshot {
        self.dns.snapshot()
    }

    /// Peer-side deposit; returns the bit to notify through the bridge
    pub fn deposit(&self, payload: EventPayload) -> SlotResult<EventBitmap> {
        self.slots.deposit(payload)
    }

    /// Register or clear a callback (`None` clears)
    pub fn set_callback(&self, id: CommandId, cb: Option<Callback>) -> RegistryResult<()> {
        self.registry.set(id, cb)
    }

    pub fn clear_callback(&self, id: CommandId) {
        self.registry.clear(id);
    }

    pub fn clear_all(&self, mode: ClearMode) {
        self.registry.clear_all(mode);
    }

    /// Process one event bitmap to completion.
    ///
    /// The RESET sentinel short-circuits the pass: only the restart adapter
    /// runs, then every registration except the restart notification is
    /// dropped and every slot is recycled — a new modem session invalidates
    /// all in-flight state. Otherwise bits are handled in ascending index
    /// order, and adapters may redirect to sibling slots, which loops the
    /// dispatcher on the redirect set up to the configured pass bound.
    pub fn dispatch(&self, bitmap: EventBitmap) {
        if bitmap.has_reset() {
            debug!("dispatch: RESET");
            self.run_pass(self.slots.bit_for(CommandId::Restart));
            self.registry.clear_all(ClearMode::WithoutRestart);
            self.slots.mark_writable_all();
            return;
        }

        let mut pending = bitmap;
        let mut passes = 0;
        while !pending.is_empty() {
            if passes >= self.config.redirect_pass_limit {
                warn!("redirect pass limit hit; dropping {}", pending);
                break;
            }
            pending = self.run_pass(pending);
            passes += 1;
        }
    }

    /// One pass over a bitmap; returns the union of adapter redirects.
    fn run_pass(&self, bitmap: EventBitmap) -> EventBitmap {
        let mut redirects = EventBitmap::EMPTY;

        for index in bitmap.indices() {
            let Some(id) = self.slots.id_at(index) else {
                debug!("bit {} names no slot; skipped", index);
                continue;
            };

            let callback = self.registry.lookup(id);
            if callback.is_none() && !self.config.always_driven.contains(&id) {
                // Nobody is listening: a normal case, not an error. The
                // deposited data is dropped and the slot recycled.
                self.slots.mark_writable_index(index);
                continue;
            }

            let Some(exec) = adapter_for(id) else {
                self.slots.mark_writable_index(index);
                continue;
            };

            let Some(payload) = self.slots.snapshot(index) else {
                continue;
            };

            debug!("dispatch slot {} ({})", index, id);
            let mut ctx = AdapterCtx::new(&self.slots, &self.dns, index);
            let redirect = exec(callback.as_ref(), &payload, &mut ctx);

            if redirect.is_empty() {
                // Consumed: one-shot registrations are single-use
                if id.is_one_shot() {
                    self.registry.clear(id);
                }
                if !ctx.released() {
                    self.slots.mark_writable_index(index);
                }
            } else {
                // Redirected: the event belongs to a sibling slot; recycle
                // this one and leave its registration untouched
                redirects.merge(redirect);
                self.slots.mark_writable_index(index);
            }
        }

        if !redirects.is_empty() {
            debug!("redirects: {}", redirects);
        }
        redirects
    }
}

impl Default for DispatcherCore {
    fn default() -> Self {
        Self::new()
    }
}
