//=========================================================================
// Input Buffer
//
// Collects raw input records on the UI thread between two frames.
// Acts as a transient aggregator between the winit callbacks and the
// `Frame` intent sent to the render thread.
//
// Responsibilities:
// - Store incoming records in arrival order
// - Hand the whole batch over at the frame boundary via `drain()`
//
// Notes:
// Records are never de-duplicated or coalesced: dropping a repeated move
// or merging two contacts' updates would break per-pointer ordering.
//=========================================================================

//=== Internal Modules ====================================================
use crate::core::input::event::InputRecord;

//=== InputBuffer Struct ==================================================
//
// Represents the transient record store for one frame of input.
//
pub(crate) struct InputBuffer {
    records: Vec<InputRecord>,
}

impl InputBuffer {
    //--- Construction -----------------------------------------------------
    //
    // Preallocates for a busy multi-touch frame to minimize reallocations.
    //
    pub(crate) fn new() -> Self {
        const RECORDS_BASE: usize = 64;

        Self {
            records: Vec::with_capacity(RECORDS_BASE),
        }
    }

    //--- Record Handling -------------------------------------------------
    pub(crate) fn push(&mut self, record: InputRecord) {
        self.records.push(record);
    }

    //--- Drain ------------------------------------------------------------
    //
    // Returns all collected records for this frame and clears the buffer.
    //
    pub(crate) fn drain(&mut self) -> Vec<InputRecord> {
        std::mem::take(&mut self.records)
    }

    //--- Utilities --------------------------------------------------------
    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
