/*!
 * Event Delivery Bridge
 * Bounded channel feeding peer bitmaps into the dispatcher
 */

use crate::core::errors::{BridgeError, BridgeResult};
use crate::core::limits::BRIDGE_THREAD_NAME;
use crate::core::types::EventBitmap;
use crate::events::dispatcher::DispatcherCore;
use log::{debug, info, warn};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Graceful-stop sentinel: a received zero is "stop", never an event
pub const STOP_SENTINEL: u64 = 0;

/// Producer handle for the peer side. Cloneable; sends block while the
/// bounded channel is full.
#[derive(Clone)]
pub struct EventSender {
    tx: flume::Sender<u64>,
}

impl EventSender {
    /// Push an event bitmap toward the bridge consumer.
    ///
    /// An empty bitmap is refused: zero is reserved as the stop sentinel.
    pub fn send(&self, bitmap: EventBitmap) -> BridgeResult<()> {
        if bitmap.is_empty() {
            return Err(BridgeError::Empty);
        }
        self.tx
            .send(bitmap.raw())
            .map_err(|_| BridgeError::Disconnected)
    }

    /// Ask the consumer to stop.
    pub fn send_stop(&self) -> BridgeResult<()> {
        self.tx
            .send(STOP_SENTINEL)
            .map_err(|_| BridgeError::Disconnected)
    }
}

/// Outcome of one bridge receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpOutcome {
    /// A bitmap arrived and was dispatched
    Dispatched(EventBitmap),
    /// The stop sentinel arrived
    Stopped,
    /// Bounded receive elapsed without a message
    TimedOut,
}

/// The delivery bridge: decouples "a result is ready" from "run the
/// callback". Consume it on a caller thread via [`pump`](EventBridge::pump),
/// or hand it a dedicated thread via [`spawn`](EventBridge::spawn).
pub struct EventBridge {
    core: Arc<DispatcherCore>,
    tx: flume::Sender<u64>,
    rx: flume::Receiver<u64>,
}

impl EventBridge {
    pub fn new(core: Arc<DispatcherCore>) -> Self {
        let capacity = core.config().bridge_capacity;
        let (tx, rx) = flume::bounded(capacity);
        Self { core, tx, rx }
    }

    pub fn sender(&self) -> EventSender {
        EventSender {
            tx: self.tx.clone(),
        }
    }

    /// Block for one message (or up to `timeout`) and dispatch it.
    pub fn pump(&self, timeout: Option<Duration>) -> BridgeResult<PumpOutcome> {
        let received = match timeout {
            Some(timeout) => match self.rx.recv_timeout(timeout) {
                Ok(raw) => raw,
                Err(flume::RecvTimeoutError::Timeout) => return Ok(PumpOutcome::TimedOut),
                Err(flume::RecvTimeoutError::Disconnected) => {
                    return Err(BridgeError::Disconnected)
                }
            },
            None => self
                .rx
                .recv()
                .map_err(|_| BridgeError::Disconnected)?,
        };

        if received == STOP_SENTINEL {
            return Ok(PumpOutcome::Stopped);
        }

        let bitmap = EventBitmap::from_raw(received);
        debug!("bridge received {}", bitmap);
        self.core.dispatch(bitmap);
        Ok(PumpOutcome::Dispatched(bitmap))
    }

    /// Move the consumer side onto a dedicated thread. Callbacks then run in
    /// that thread's context until the stop sentinel arrives.
    pub fn spawn(self) -> BridgeResult<BridgeHandle> {
        let tx = self.tx.clone();
        let thread = std::thread::Builder::new()
            .name(BRIDGE_THREAD_NAME.into())
            .spawn(move || {
                info!("event bridge running");
                loop {
                    match self.pump(None) {
                        Ok(PumpOutcome::Stopped) => {
                            info!("event bridge stopped");
                            break;
                        }
                        Ok(_) => {}
                        Err(err) => {
                            warn!("event bridge exiting: {}", err);
                            break;
                        }
                    }
                }
            })
            .map_err(|err| BridgeError::Spawn(err.to_string()))?;

        Ok(BridgeHandle {
            tx,
            thread: Some(thread),
        })
    }
}

/// Handle to a spawned bridge thread.
pub struct BridgeHandle {
    tx: flume::Sender<u64>,
    thread: Option<JoinHandle<()>>,
}

impl BridgeHandle {
    pub fn sender(&self) -> EventSender {
        EventSender {
            tx: self.tx.clone(),
        }
    }

    /// Send the stop sentinel and join the consumer thread.
    pub fn stop(mut self) {
        let _ = self.tx.send(STOP_SENTINEL);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for BridgeHandle {
    fn drop(&mut self) {
        // Unblock the consumer if the handle is dropped without stop()
        let _ = self.tx.send(STOP_SENTINEL);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
