//=========================================================================
// Event Collector
//=========================================================================
//
// Render-thread side of the platform channel.
//
// Architecture:
//   Receiver<PlatformEvent> → collect() → pending events → TickControl
//
// Blocks for the first event (the render thread has nothing to do until
// the host speaks), then drains whatever else is queued, bounded to
// prevent starvation.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::warn;

//=== Internal Dependencies ===============================================

use super::PlatformEvent;

//=== TickControl =========================================================

/// Render loop control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Exit,
}

//=== EventCollector ======================================================

/// Collects platform events in arrival order.
pub(crate) struct EventCollector {
    receiver: Receiver<PlatformEvent>,
    pending: Vec<PlatformEvent>,
}

impl EventCollector {
    const MAX_EVENTS_PER_PASS: usize = 100;

    pub(crate) fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self {
            receiver,
            pending: Vec::with_capacity(4),
        }
    }

    /// Waits for at least one event and drains the rest of the queue.
    ///
    /// Returns `Exit` once the channel is disconnected; events received
    /// before the disconnect are still available via [`Self::take_events`].
    pub(crate) fn collect(&mut self) -> TickControl {
        match self.receiver.recv() {
            Ok(event) => self.pending.push(event),
            Err(_) => return TickControl::Exit,
        }

        let mut drained = 1;
        while drained < Self::MAX_EVENTS_PER_PASS {
            match self.receiver.try_recv() {
                Ok(event) => {
                    self.pending.push(event);
                    drained += 1;
                }
                Err(TryRecvError::Disconnected) => return TickControl::Exit,
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= Self::MAX_EVENTS_PER_PASS {
            warn!(target: "core", "Event queue backlog: drained {} events this pass", drained);
        }

        TickControl::Continue
    }

    /// Returns collected events.
    #[cfg(test)]
    pub(crate) fn events(&self) -> &[PlatformEvent] {
        &self.pending
    }

    /// Takes ownership of collected events, leaving an empty vec.
    pub(crate) fn take_events(&mut self) -> Vec<PlatformEvent> {
        std::mem::take(&mut self.pending)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
