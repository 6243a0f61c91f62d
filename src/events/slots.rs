/*!
 * Event Slot Table
 * Fixed per-command output storage with independent writable/locked locks
 */

use crate::core::errors::{SlotError, SlotResult};
use crate::core::payload::EventPayload;
use crate::core::types::{CommandId, EventBitmap};
use log::{debug, warn};
use parking_lot::Mutex;

/// Delivery state of one event slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// The peer may deposit new data
    Writable,
    /// Data is deposited and awaiting delivery
    Locked,
}

/// One slot: command id, typed payload storage, and its state flag.
/// Both the flag and the storage sit behind the slot's own locks so one
/// command kind's completion never blocks another's.
struct EventSlot {
    id: CommandId,
    state: Mutex<SlotState>,
    payload: Mutex<EventPayload>,
}

/// The fixed event slot table: one entry per command identifier that can
/// produce an event, allocated once and never resized.
pub struct SlotTable {
    slots: Vec<EventSlot>,
}

impl SlotTable {
    /// Build the table; all slots start Writable.
    pub fn new() -> Self {
        let slots: Vec<EventSlot> = CommandId::ALL
            .iter()
            .filter_map(|&id| {
                EventPayload::initial(id).map(|payload| EventSlot {
                    id,
                    state: Mutex::new(SlotState::Writable),
                    payload: Mutex::new(payload),
                })
            })
            .collect();
        // bit 63 is the RESET sentinel; the table must fit below it
        debug_assert!(slots.len() < 63);
        SlotTable { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Stable index of the slot for `id`; `None` for slot-less commands
    pub fn index_of(&self, id: CommandId) -> Option<usize> {
        self.slots.iter().position(|slot| slot.id == id)
    }

    /// Command id stored at a slot index
    pub fn id_at(&self, index: usize) -> Option<CommandId> {
        self.slots.get(index).map(|slot| slot.id)
    }

    /// Bitmap with only the slot for `id` set; empty if `id` has no slot
    pub fn bit_for(&self, id: CommandId) -> EventBitmap {
        match self.index_of(id) {
            Some(index) => EventBitmap::single(index),
            None => EventBitmap::EMPTY,
        }
    }

    /// Peer-side write: store a payload and lock its slot.
    ///
    /// Rejected with `Busy` while the slot still holds undelivered data;
    /// the peer discards the event in that case. On success returns the
    /// slot's bit for notification.
    pub fn deposit(&self, payload: EventPayload) -> SlotResult<EventBitmap> {
        let id = payload.command_id();
        let index = self.index_of(id).ok_or(SlotError::NoSlot(id))?;
        let slot = &self.slots[index];

        let mut state = slot.state.lock();
        if *state == SlotState::Locked {
            warn!("slot {} busy; event discarded", id);
            return Err(SlotError::Busy(id));
        }

        *slot.payload.lock() = payload;
        *state = SlotState::Locked;
        debug!("deposit {} -> slot {}", id, index);

        Ok(EventBitmap::single(index))
    }

    /// Clone out the payload at a slot index for adapter consumption
    pub fn snapshot(&self, index: usize) -> Option<EventPayload> {
        self.slots.get(index).map(|slot| slot.payload.lock().clone())
    }

    /// Current state of the slot for `id`
    pub fn state(&self, id: CommandId) -> Option<SlotState> {
        self.index_of(id).map(|index| *self.slots[index].state.lock())
    }

    /// Recycle one slot back to Writable
    pub fn mark_writable(&self, id: CommandId) {
        if let Some(index) = self.index_of(id) {
            self.mark_writable_index(index);
        }
    }

    pub(crate) fn mark_writable_index(&self, index: usize) {
        if let Some(slot) = self.slots.get(index) {
            *slot.state.lock() = SlotState::Writable;
        }
    }

    /// Recycle every slot. Used when a restart event invalidates all
    /// in-flight state.
    pub fn mark_writable_all(&self) {
        for slot in &self.slots {
            *slot.state.lock() = SlotState::Writable;
        }
    }
}

impl Default for SlotTable {
    fn default() -> Self {
        Self::new()
    }
}
