//=========================================================================
// Pointer Normalizer
//=========================================================================
//
// Maps raw motion records to canonical down/move/up calls per pointer id.
//
// Architecture:
//   MotionRecord ─┬─ Down/PointerDown → track + pointer_down
//                 ├─ Move            → pointer_move for each tracked contact
//                 └─ Up/PointerUp    → pointer_up + retire
//   MouseRecord ───→ same lifecycle, implicit PointerId::MOUSE
//
// Per-id ordering is down → (move)* → up. Duplicate downs, moves for
// untracked ids and ups for untracked ids are dropped, which keeps that
// ordering intact even when the host misbehaves.
//
// The touch and mouse paths are exclusive: a down on one path is dropped
// while the other path holds a pointer, so no two live pointers share an
// id.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use super::event::{MotionAction, MotionRecord, MouseAction, MouseRecord, PointerId, PointerSample};
use crate::core::sink::CoreEventSink;

//=== Pointer =============================================================

/// A live contact. Exists only between its down and its up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub id: PointerId,
    pub x: f32,
    pub y: f32,
}

impl From<&PointerSample> for Pointer {
    fn from(sample: &PointerSample) -> Self {
        Self {
            id: sample.id,
            x: sample.x,
            y: sample.y,
        }
    }
}

//=== PointerNormalizer ===================================================

/// Tracks live pointers and emits normalized pointer calls.
pub struct PointerNormalizer {
    //--- Multi-touch contacts, in order of arrival ----------------------
    touches: Vec<Pointer>,

    //--- Single-pointer mouse path --------------------------------------
    mouse: Option<Pointer>,
}

impl PointerNormalizer {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        const TYPICAL_CONTACTS: usize = 10;

        Self {
            touches: Vec::with_capacity(TYPICAL_CONTACTS),
            mouse: None,
        }
    }

    //--- Queries ----------------------------------------------------------

    /// Returns true if a touch contact with `id` is live.
    pub fn is_tracking(&self, id: PointerId) -> bool {
        self.touches.iter().any(|p| p.id == id)
    }

    /// Number of live touch contacts (the mouse pointer is not counted).
    pub fn tracked_count(&self) -> usize {
        self.touches.len()
    }

    pub fn touch(&self, id: PointerId) -> Option<&Pointer> {
        self.touches.iter().find(|p| p.id == id)
    }

    pub fn mouse(&self) -> Option<&Pointer> {
        self.mouse.as_ref()
    }

    //--- Touch Path -------------------------------------------------------

    /// Normalizes one touch record. `None` is a no-op.
    pub fn process_touch<S>(&mut self, record: Option<&MotionRecord>, sink: &mut S)
    where
        S: CoreEventSink + ?Sized,
    {
        let Some(record) = record else {
            return;
        };

        let Some(action) = record.action() else {
            trace!(target: "core::input", "Ignoring action code {}", record.action_code());
            return;
        };

        match action {
            MotionAction::Down | MotionAction::PointerDown => self.touch_down(record, sink),
            MotionAction::Move => self.touch_move(record, sink),
            MotionAction::Up | MotionAction::PointerUp => self.touch_up(record, sink),
        }
    }

    fn touch_down<S: CoreEventSink + ?Sized>(&mut self, record: &MotionRecord, sink: &mut S) {
        let Some(sample) = Self::acting_sample(record) else {
            return;
        };

        if self.mouse.is_some() {
            trace!(target: "core::input", "Touch down for pointer {} ignored while mouse is held", sample.id);
            return;
        }

        if self.is_tracking(sample.id) {
            trace!(target: "core::input", "Duplicate down for pointer {} ignored", sample.id);
            return;
        }

        let pointer = Pointer::from(sample);
        self.touches.push(pointer);
        sink.pointer_down(pointer.x, pointer.y, pointer.id);
    }

    fn touch_move<S: CoreEventSink + ?Sized>(&mut self, record: &MotionRecord, sink: &mut S) {
        // Platform index order, not id order
        for sample in record.pointers() {
            let Some(pointer) = self.touches.iter_mut().find(|p| p.id == sample.id) else {
                continue;
            };
            pointer.x = sample.x;
            pointer.y = sample.y;
            sink.pointer_move(pointer.x, pointer.y, pointer.id);
        }
    }

    fn touch_up<S: CoreEventSink + ?Sized>(&mut self, record: &MotionRecord, sink: &mut S) {
        let Some(sample) = Self::acting_sample(record) else {
            return;
        };

        let Some(index) = self.touches.iter().position(|p| p.id == sample.id) else {
            trace!(target: "core::input", "Up for untracked pointer {} ignored", sample.id);
            return;
        };

        self.touches.remove(index);
        sink.pointer_up(sample.x, sample.y, sample.id);
    }

    /// The acting contact, if its index and id are both in range.
    fn acting_sample(record: &MotionRecord) -> Option<&PointerSample> {
        let Some(sample) = record.acting_pointer() else {
            trace!(
                target: "core::input",
                "Action index {} out of range ({} contacts)",
                record.action_index(),
                record.pointers().len()
            );
            return None;
        };

        if !sample.id.is_valid() {
            trace!(target: "core::input", "Pointer id {} out of range", sample.id);
            return None;
        }

        Some(sample)
    }

    //--- Mouse Path -------------------------------------------------------

    /// Normalizes one mouse record under [`PointerId::MOUSE`]. `None` is a no-op.
    pub fn process_mouse<S>(&mut self, record: Option<&MouseRecord>, sink: &mut S)
    where
        S: CoreEventSink + ?Sized,
    {
        let Some(record) = record else {
            return;
        };

        let id = PointerId::MOUSE;
        let pointer = Pointer { id, x: record.x, y: record.y };
        match (record.action, self.mouse.is_some()) {
            (MouseAction::Down, false) if !self.touches.is_empty() => {
                trace!(target: "core::input", "Mouse down ignored while {} touches held", self.touches.len());
            }
            (MouseAction::Down, false) => {
                self.mouse = Some(pointer);
                sink.pointer_down(record.x, record.y, id);
            }
            (MouseAction::Move, true) => {
                self.mouse = Some(pointer);
                sink.pointer_move(record.x, record.y, id);
            }
            (MouseAction::Up, true) => {
                self.mouse = None;
                sink.pointer_up(record.x, record.y, id);
            }
            (action, _) => {
                trace!(target: "core::input", "Mouse {:?} out of sequence ignored", action);
            }
        }
    }

    //--- Contact Loss -----------------------------------------------------

    /// Retires every live pointer at its last known position.
    ///
    /// Used when the host loses its contacts without reporting their ups.
    /// Touches are released in arrival order, then the mouse.
    pub fn release_all<S: CoreEventSink + ?Sized>(&mut self, sink: &mut S) {
        for pointer in self.touches.drain(..) {
            sink.pointer_up(pointer.x, pointer.y, pointer.id);
        }
        if let Some(pointer) = self.mouse.take() {
            sink.pointer_up(pointer.x, pointer.y, pointer.id);
        }
    }
}

impl Default for PointerNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sink::{SinkCall, TraceSink};
    use std::time::Duration;

    fn sample(id: u32, x: f32, y: f32) -> PointerSample {
        PointerSample::new(PointerId(id), x, y)
    }

    fn record(action: MotionAction, index: usize, pointers: Vec<PointerSample>) -> MotionRecord {
        MotionRecord::new(action, index, pointers, Duration::ZERO)
    }

    fn down(id: u32, x: f32, y: f32) -> MotionRecord {
        record(MotionAction::Down, 0, vec![sample(id, x, y)])
    }

    fn mv(id: u32, x: f32, y: f32) -> MotionRecord {
        record(MotionAction::Move, 0, vec![sample(id, x, y)])
    }

    fn up(id: u32, x: f32, y: f32) -> MotionRecord {
        record(MotionAction::Up, 0, vec![sample(id, x, y)])
    }

    fn pdown(id: u32, x: f32, y: f32) -> SinkCall {
        SinkCall::PointerDown { x, y, pointer_id: PointerId(id) }
    }

    fn pmove(id: u32, x: f32, y: f32) -> SinkCall {
        SinkCall::PointerMove { x, y, pointer_id: PointerId(id) }
    }

    fn pup(id: u32, x: f32, y: f32) -> SinkCall {
        SinkCall::PointerUp { x, y, pointer_id: PointerId(id) }
    }

    //=====================================================================
    // Single Contact
    //=====================================================================

    #[test]
    fn down_move_up_produces_exact_sequence() {
        let mut normalizer = PointerNormalizer::new();
        let mut sink = TraceSink::new();

        normalizer.process_touch(Some(&down(0, 10.0, 10.0)), &mut sink);
        normalizer.process_touch(Some(&mv(0, 12.0, 11.0)), &mut sink);
        normalizer.process_touch(Some(&up(0, 12.0, 11.0)), &mut sink);

        assert_eq!(
            sink.calls(),
            &[pdown(0, 10.0, 10.0), pmove(0, 12.0, 11.0), pup(0, 12.0, 11.0)]
        );
        assert_eq!(normalizer.tracked_count(), 0);
    }

    #[test]
    fn absent_record_is_noop() {
        let mut normalizer = PointerNormalizer::new();
        let mut sink = TraceSink::new();

        normalizer.process_touch(None, &mut sink);
        normalizer.process_mouse(None, &mut sink);

        assert!(sink.calls().is_empty());
    }

    #[test]
    fn unknown_action_code_ignored() {
        let mut normalizer = PointerNormalizer::new();
        let mut sink = TraceSink::new();

        normalizer.process_touch(Some(&down(0, 1.0, 1.0)), &mut sink);
        let cancel = MotionRecord::from_raw(
            MotionAction::ACTION_CANCEL,
            0,
            vec![sample(0, 1.0, 1.0)],
            Duration::ZERO,
        );
        normalizer.process_touch(Some(&cancel), &mut sink);

        assert_eq!(sink.calls().len(), 1);
        assert!(normalizer.is_tracking(PointerId(0)));
    }

    #[test]
    fn duplicate_down_emits_once() {
        let mut normalizer = PointerNormalizer::new();
        let mut sink = TraceSink::new();

        normalizer.process_touch(Some(&down(2, 1.0, 1.0)), &mut sink);
        normalizer.process_touch(Some(&down(2, 3.0, 3.0)), &mut sink);

        assert_eq!(sink.calls(), &[pdown(2, 1.0, 1.0)]);
    }

    #[test]
    fn move_and_up_for_untracked_id_ignored() {
        let mut normalizer = PointerNormalizer::new();
        let mut sink = TraceSink::new();

        normalizer.process_touch(Some(&mv(4, 1.0, 1.0)), &mut sink);
        normalizer.process_touch(Some(&up(4, 1.0, 1.0)), &mut sink);

        assert!(sink.calls().is_empty());
    }

    #[test]
    fn out_of_range_index_and_id_ignored() {
        let mut normalizer = PointerNormalizer::new();
        let mut sink = TraceSink::new();

        let bad_index = record(MotionAction::Down, 3, vec![sample(0, 1.0, 1.0)]);
        let bad_id = down(99, 1.0, 1.0);
        normalizer.process_touch(Some(&bad_index), &mut sink);
        normalizer.process_touch(Some(&bad_id), &mut sink);

        assert!(sink.calls().is_empty());
        assert_eq!(normalizer.tracked_count(), 0);
    }

    #[test]
    fn id_reusable_after_retirement() {
        let mut normalizer = PointerNormalizer::new();
        let mut sink = TraceSink::new();

        normalizer.process_touch(Some(&down(0, 1.0, 1.0)), &mut sink);
        normalizer.process_touch(Some(&up(0, 1.0, 1.0)), &mut sink);
        normalizer.process_touch(Some(&down(0, 5.0, 5.0)), &mut sink);

        assert_eq!(
            sink.calls(),
            &[pdown(0, 1.0, 1.0), pup(0, 1.0, 1.0), pdown(0, 5.0, 5.0)]
        );
    }

    //=====================================================================
    // Multi-touch
    //=====================================================================

    #[test]
    fn multi_pointer_move_fans_out_in_index_order() {
        let mut normalizer = PointerNormalizer::new();
        let mut sink = TraceSink::new();

        normalizer.process_touch(Some(&down(5, 0.0, 0.0)), &mut sink);
        normalizer.process_touch(
            Some(&record(
                MotionAction::PointerDown,
                1,
                vec![sample(5, 0.0, 0.0), sample(1, 50.0, 50.0)],
            )),
            &mut sink,
        );
        normalizer.process_touch(
            Some(&record(
                MotionAction::PointerDown,
                2,
                vec![sample(5, 0.0, 0.0), sample(1, 50.0, 50.0), sample(3, 90.0, 90.0)],
            )),
            &mut sink,
        );
        sink.take();

        normalizer.process_touch(
            Some(&record(
                MotionAction::Move,
                0,
                vec![sample(5, 1.0, 1.0), sample(1, 51.0, 51.0), sample(3, 91.0, 91.0)],
            )),
            &mut sink,
        );

        // Index order 5, 1, 3, not sorted by id
        assert_eq!(
            sink.calls(),
            &[pmove(5, 1.0, 1.0), pmove(1, 51.0, 51.0), pmove(3, 91.0, 91.0)]
        );
    }

    #[test]
    fn pointer_up_retires_only_acting_contact() {
        let mut normalizer = PointerNormalizer::new();
        let mut sink = TraceSink::new();

        normalizer.process_touch(Some(&down(0, 0.0, 0.0)), &mut sink);
        normalizer.process_touch(
            Some(&record(
                MotionAction::PointerDown,
                1,
                vec![sample(0, 0.0, 0.0), sample(1, 20.0, 20.0)],
            )),
            &mut sink,
        );
        normalizer.process_touch(
            Some(&record(
                MotionAction::PointerUp,
                0,
                vec![sample(0, 2.0, 2.0), sample(1, 20.0, 20.0)],
            )),
            &mut sink,
        );

        assert!(!normalizer.is_tracking(PointerId(0)));
        assert!(normalizer.is_tracking(PointerId(1)));
        assert_eq!(sink.calls().last(), Some(&pup(0, 2.0, 2.0)));

        sink.take();
        normalizer.process_touch(
            Some(&record(MotionAction::Move, 0, vec![sample(1, 22.0, 21.0)])),
            &mut sink,
        );
        assert_eq!(sink.calls(), &[pmove(1, 22.0, 21.0)]);
    }

    #[test]
    fn per_id_sequences_stay_well_formed_when_interleaved() {
        let mut normalizer = PointerNormalizer::new();
        let mut sink = TraceSink::new();

        normalizer.process_touch(Some(&down(0, 0.0, 0.0)), &mut sink);
        normalizer.process_touch(
            Some(&record(
                MotionAction::PointerDown,
                1,
                vec![sample(0, 0.0, 0.0), sample(1, 10.0, 0.0)],
            )),
            &mut sink,
        );
        normalizer.process_touch(
            Some(&record(
                MotionAction::Move,
                0,
                vec![sample(0, 1.0, 0.0), sample(1, 11.0, 0.0)],
            )),
            &mut sink,
        );
        normalizer.process_touch(
            Some(&record(
                MotionAction::PointerUp,
                1,
                vec![sample(0, 1.0, 0.0), sample(1, 11.0, 0.0)],
            )),
            &mut sink,
        );
        normalizer.process_touch(Some(&up(0, 1.0, 0.0)), &mut sink);

        for id in [PointerId(0), PointerId(1)] {
            let kinds: Vec<&str> = sink
                .calls()
                .iter()
                .filter_map(|call| match call {
                    SinkCall::PointerDown { pointer_id, .. } if *pointer_id == id => Some("down"),
                    SinkCall::PointerMove { pointer_id, .. } if *pointer_id == id => Some("move"),
                    SinkCall::PointerUp { pointer_id, .. } if *pointer_id == id => Some("up"),
                    _ => None,
                })
                .collect();
            assert_eq!(kinds, vec!["down", "move", "up"], "sequence for {}", id);
        }
    }

    //=====================================================================
    // Mouse Path
    //=====================================================================

    #[test]
    fn mouse_path_uses_implicit_id() {
        let mut normalizer = PointerNormalizer::new();
        let mut sink = TraceSink::new();
        let t = Duration::ZERO;

        normalizer.process_mouse(Some(&MouseRecord::new(MouseAction::Down, 3.0, 4.0, t)), &mut sink);
        normalizer.process_mouse(Some(&MouseRecord::new(MouseAction::Move, 5.0, 6.0, t)), &mut sink);
        normalizer.process_mouse(Some(&MouseRecord::new(MouseAction::Up, 5.0, 6.0, t)), &mut sink);

        assert_eq!(
            sink.calls(),
            &[pdown(0, 3.0, 4.0), pmove(0, 5.0, 6.0), pup(0, 5.0, 6.0)]
        );
        assert!(normalizer.mouse().is_none());
    }

    #[test]
    fn mouse_hover_and_stray_up_ignored() {
        let mut normalizer = PointerNormalizer::new();
        let mut sink = TraceSink::new();
        let t = Duration::ZERO;

        normalizer.process_mouse(Some(&MouseRecord::new(MouseAction::Move, 5.0, 6.0, t)), &mut sink);
        normalizer.process_mouse(Some(&MouseRecord::new(MouseAction::Up, 5.0, 6.0, t)), &mut sink);

        assert!(sink.calls().is_empty());
    }

    #[test]
    fn mouse_does_not_join_touch_fan_out() {
        let mut normalizer = PointerNormalizer::new();
        let mut sink = TraceSink::new();
        let t = Duration::ZERO;

        normalizer.process_touch(Some(&down(3, 1.0, 1.0)), &mut sink);
        normalizer.process_mouse(Some(&MouseRecord::new(MouseAction::Down, 0.0, 0.0, t)), &mut sink);
        sink.take();

        normalizer.process_touch(Some(&mv(3, 2.0, 2.0)), &mut sink);
        normalizer.process_mouse(Some(&MouseRecord::new(MouseAction::Move, 9.0, 9.0, t)), &mut sink);

        assert_eq!(sink.calls(), &[pmove(3, 2.0, 2.0)]);
        assert_eq!(normalizer.tracked_count(), 1);
        assert!(normalizer.mouse().is_none());
    }

    #[test]
    fn touch_down_ignored_while_mouse_held() {
        let mut normalizer = PointerNormalizer::new();
        let mut sink = TraceSink::new();
        let t = Duration::ZERO;

        normalizer.process_mouse(Some(&MouseRecord::new(MouseAction::Down, 1.0, 1.0, t)), &mut sink);
        normalizer.process_touch(Some(&down(0, 50.0, 50.0)), &mut sink);
        normalizer.process_touch(Some(&up(0, 50.0, 50.0)), &mut sink);
        normalizer.process_mouse(Some(&MouseRecord::new(MouseAction::Up, 1.0, 1.0, t)), &mut sink);
        normalizer.process_touch(Some(&down(0, 60.0, 60.0)), &mut sink);

        assert_eq!(
            sink.calls(),
            &[pdown(0, 1.0, 1.0), pup(0, 1.0, 1.0), pdown(0, 60.0, 60.0)]
        );
    }

    //=====================================================================
    // Contact Loss
    //=====================================================================

    #[test]
    fn release_all_ups_every_pointer_at_last_position() {
        let mut normalizer = PointerNormalizer::new();
        let mut sink = TraceSink::new();

        normalizer.process_touch(Some(&down(4, 0.0, 0.0)), &mut sink);
        normalizer.process_touch(
            Some(&record(
                MotionAction::PointerDown,
                1,
                vec![sample(4, 0.0, 0.0), sample(2, 30.0, 30.0)],
            )),
            &mut sink,
        );
        normalizer.process_touch(
            Some(&record(
                MotionAction::Move,
                0,
                vec![sample(4, 5.0, 6.0), sample(2, 31.0, 32.0)],
            )),
            &mut sink,
        );
        sink.take();

        normalizer.release_all(&mut sink);

        assert_eq!(sink.calls(), &[pup(4, 5.0, 6.0), pup(2, 31.0, 32.0)]);
        assert_eq!(normalizer.tracked_count(), 0);

        sink.take();
        normalizer.process_touch(Some(&down(4, 100.0, 100.0)), &mut sink);
        assert_eq!(sink.calls(), &[pdown(4, 100.0, 100.0)]);
    }

    #[test]
    fn release_all_covers_mouse_and_is_idempotent() {
        let mut normalizer = PointerNormalizer::new();
        let mut sink = TraceSink::new();
        let t = Duration::ZERO;

        normalizer.process_mouse(Some(&MouseRecord::new(MouseAction::Down, 3.0, 4.0, t)), &mut sink);
        sink.take();

        normalizer.release_all(&mut sink);
        normalizer.release_all(&mut sink);

        assert_eq!(sink.calls(), &[pup(0, 3.0, 4.0)]);
        assert!(normalizer.mouse().is_none());
    }
}
