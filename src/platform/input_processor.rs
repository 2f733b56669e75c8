//=========================================================================
// Input Processor
//=========================================================================
//
// Converts winit touch and mouse callbacks into host-neutral input records.
//
// Architecture:
//   Winit Events → InputProcessor → InputRecord → InputBuffer
//
// Stateful contact tracking: winit reports one contact per callback, while
// the render side expects motion records describing every contact on the
// surface. The processor keeps the live contacts (in touch-down order,
// which becomes the record index order) and rebuilds a full record for
// each callback. Mouse input follows the left button only; hover motion
// is filtered.
//
// winit touch ids are opaque u64 values (a growing sequence number on some
// backends). Each contact is given the lowest free pointer slot when it
// starts, and the slot is returned when the contact ends.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::time::Duration;

//=== External Dependencies ===============================================

use log::trace;
use winit::event::{ElementState, MouseButton as WinitMouseButton, TouchPhase};

//=== Internal Dependencies ===============================================

use crate::core::input::event::{
    InputRecord, MotionAction, MotionRecord, MouseAction, MouseRecord, PointerId, PointerSample,
};

//=== InputProcessor ======================================================

/// A live winit contact and the pointer slot it was given.
#[derive(Debug, Clone, Copy)]
struct Contact {
    touch_id: u64,
    sample: PointerSample,
}

/// Converts winit callbacks to input records with contact tracking.
pub(crate) struct InputProcessor {
    contacts: Vec<Contact>,
    cursor: (f32, f32),
    left_pressed: bool,
}

impl InputProcessor {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self {
            contacts: Vec::with_capacity(10),
            cursor: (0.0, 0.0),
            left_pressed: false,
        }
    }

    //--- State ------------------------------------------------------------

    pub(crate) fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    /// Forgets all contacts and button state (surface lost).
    pub(crate) fn reset(&mut self) {
        self.contacts.clear();
        self.left_pressed = false;
    }

    //--- Touch ------------------------------------------------------------

    /// Lowest pointer slot not held by a live contact.
    fn free_slot(&self) -> Option<PointerId> {
        (0..=PointerId::MAX.0)
            .map(PointerId)
            .find(|slot| self.contacts.iter().all(|c| c.sample.id != *slot))
    }

    fn samples(&self) -> Vec<PointerSample> {
        self.contacts.iter().map(|c| c.sample).collect()
    }

    /// Converts one winit touch callback into a full motion record.
    ///
    /// A new contact is dropped only when every pointer slot is in use.
    pub(crate) fn process_touch(
        &mut self,
        touch_id: u64,
        phase: TouchPhase,
        x: f64,
        y: f64,
        time: Duration,
    ) -> Option<InputRecord> {
        let (x, y) = (x as f32, y as f32);
        let index = self.contacts.iter().position(|c| c.touch_id == touch_id);

        let record = match (phase, index) {
            (TouchPhase::Started, None) => {
                let Some(slot) = self.free_slot() else {
                    trace!(target: "platform::input", "No pointer slot free for touch {}", touch_id);
                    return None;
                };
                let action = if self.contacts.is_empty() {
                    MotionAction::Down
                } else {
                    MotionAction::PointerDown
                };
                self.contacts.push(Contact {
                    touch_id,
                    sample: PointerSample::new(slot, x, y),
                });
                MotionRecord::new(action, self.contacts.len() - 1, self.samples(), time)
            }
            (TouchPhase::Moved, Some(index)) => {
                let contact = &mut self.contacts[index].sample;
                contact.x = x;
                contact.y = y;
                MotionRecord::new(MotionAction::Move, index, self.samples(), time)
            }
            (TouchPhase::Ended | TouchPhase::Cancelled, Some(index)) => {
                let contact = &mut self.contacts[index].sample;
                contact.x = x;
                contact.y = y;
                let action = if self.contacts.len() == 1 {
                    MotionAction::Up
                } else {
                    MotionAction::PointerUp
                };
                let record = MotionRecord::new(action, index, self.samples(), time);
                self.contacts.remove(index);
                record
            }
            (phase, _) => {
                trace!(target: "platform::input", "Touch {:?} for id {} out of sequence", phase, touch_id);
                return None;
            }
        };

        Some(InputRecord::Touch(record))
    }

    //--- Mouse ------------------------------------------------------------

    /// Converts a button callback; only the left button is a pointer.
    pub(crate) fn process_mouse_button(
        &mut self,
        button: WinitMouseButton,
        state: ElementState,
        time: Duration,
    ) -> Option<InputRecord> {
        if button != WinitMouseButton::Left {
            return None;
        }

        let action = match (state, self.left_pressed) {
            (ElementState::Pressed, false) => MouseAction::Down,
            (ElementState::Released, true) => MouseAction::Up,
            _ => return None,
        };
        self.left_pressed = state == ElementState::Pressed;

        let (x, y) = self.cursor;
        Some(InputRecord::Mouse(MouseRecord::new(action, x, y, time)))
    }

    /// Tracks the cursor; emits a move only while the left button is held.
    pub(crate) fn process_cursor_moved(&mut self, x: f64, y: f64, time: Duration) -> Option<InputRecord> {
        self.cursor = (x as f32, y as f32);

        if !self.left_pressed {
            return None;
        }
        Some(InputRecord::Mouse(MouseRecord::new(
            MouseAction::Move,
            self.cursor.0,
            self.cursor.1,
            time,
        )))
    }
}

//=========================================================================
// Tests
//=========================================================================
