//=========================================================================
// Gesture Classifier
//=========================================================================
//
// Recognizes higher-level gestures on the same raw stream the normalizer
// consumes: press, show-press, drag-scroll, fling and long-press.
//
// Architecture:
//   MotionRecord → observe() ─┬→ Gesture::Down / Scroll / Fling
//   frame time   → poll()    ─┴→ Gesture::ShowPress / LongPress
//
// Only the primary contact (the one that started the gesture) drives
// scroll, fling and long-press. Timers are evaluated against event and
// frame timestamps, never wall-clock, so classification is deterministic.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::collections::VecDeque;
use std::time::Duration;

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use super::event::{MotionAction, MotionRecord, PointerId, PointerSample};

//=== Gesture =============================================================

/// Gesture categories the bridge acts on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// A contact touched the surface (interrupts kinetic scrolling).
    Down { x: f32, y: f32 },

    /// Press held long enough for visual feedback. Not forwarded.
    ShowPress { x: f32, y: f32 },

    /// Drag past the touch slop. Distances are previous minus current
    /// position, origin is where the drag started.
    Scroll {
        origin_x: f32,
        origin_y: f32,
        distance_x: f32,
        distance_y: f32,
    },

    /// Drag released with enough velocity (px/s) to coast.
    Fling {
        x: f32,
        y: f32,
        velocity_x: f32,
        velocity_y: f32,
        time: Duration,
    },

    /// Press held still past the long-press timeout.
    LongPress { x: f32, y: f32 },
}

//=== GestureConfig =======================================================

/// Thresholds for gesture recognition (Android `ViewConfiguration` defaults).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    /// Distance a contact may wander before a press becomes a drag.
    pub touch_slop: f32,

    /// Release speed (px/s, per axis) required for a fling.
    pub min_fling_velocity: f32,

    /// Fling velocities are clamped to this magnitude (px/s, per axis).
    pub max_fling_velocity: f32,

    pub show_press_timeout: Duration,

    pub long_press_timeout: Duration,

    /// Only samples this recent contribute to release velocity.
    pub velocity_horizon: Duration,

    /// A pause this long before release means the contact had stopped.
    pub assume_stopped: Duration,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            touch_slop: 8.0,
            min_fling_velocity: 50.0,
            max_fling_velocity: 8_000.0,
            show_press_timeout: Duration::from_millis(100),
            long_press_timeout: Duration::from_millis(500),
            velocity_horizon: Duration::from_millis(100),
            assume_stopped: Duration::from_millis(40),
        }
    }
}

//=== VelocityTracker =====================================================

/// Estimates release velocity from recent primary-contact samples.
#[derive(Debug, Default)]
pub(crate) struct VelocityTracker {
    samples: VecDeque<(Duration, f32, f32)>,
}

impl VelocityTracker {
    const HISTORY: usize = 20;

    pub(crate) fn clear(&mut self) {
        self.samples.clear();
    }

    pub(crate) fn add(&mut self, time: Duration, x: f32, y: f32) {
        if self.samples.len() == Self::HISTORY {
            self.samples.pop_front();
        }
        self.samples.push_back((time, x, y));
    }

    /// Velocity in px/s between the oldest in-horizon sample and the newest.
    pub(crate) fn velocity(&self, horizon: Duration, assume_stopped: Duration) -> (f32, f32) {
        let Some(&(newest_t, newest_x, newest_y)) = self.samples.back() else {
            return (0.0, 0.0);
        };

        // Contact paused before lifting
        if let Some(&(previous_t, _, _)) = self.samples.iter().rev().nth(1) {
            if newest_t.saturating_sub(previous_t) > assume_stopped {
                return (0.0, 0.0);
            }
        }

        let oldest = self
            .samples
            .iter()
            .find(|(t, _, _)| newest_t.saturating_sub(*t) <= horizon);

        match oldest {
            Some(&(oldest_t, oldest_x, oldest_y)) if oldest_t < newest_t => {
                let dt = (newest_t - oldest_t).as_secs_f32();
                ((newest_x - oldest_x) / dt, (newest_y - oldest_y) / dt)
            }
            _ => (0.0, 0.0),
        }
    }
}

//=== Press ===============================================================

/// State of the primary contact between its down and its release.
#[derive(Debug, Clone, Copy)]
struct Press {
    id: PointerId,
    down_x: f32,
    down_y: f32,
    down_time: Duration,
    last_x: f32,
    last_y: f32,
    scrolling: bool,
    show_pressed: bool,
    long_pressed: bool,
    long_press_allowed: bool,
}

//=== GestureClassifier ===================================================

/// Stateful recognizer fed with every raw record.
pub struct GestureClassifier {
    config: GestureConfig,
    press: Option<Press>,
    velocity: VelocityTracker,
}

impl GestureClassifier {
    //--- Construction -----------------------------------------------------

    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            press: None,
            velocity: VelocityTracker::default(),
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Returns true while a primary contact is held.
    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    /// Abandons the current press without recognizing anything.
    pub fn reset(&mut self) {
        self.press = None;
        self.velocity.clear();
    }

    //--- Timers -----------------------------------------------------------

    /// Fires show-press and long-press once their timeouts pass.
    pub fn poll(&mut self, now: Duration, out: &mut Vec<Gesture>) {
        let Some(press) = self.press.as_mut() else {
            return;
        };
        if press.scrolling {
            return;
        }

        let held = now.saturating_sub(press.down_time);

        if !press.show_pressed && held >= self.config.show_press_timeout {
            press.show_pressed = true;
            out.push(Gesture::ShowPress { x: press.down_x, y: press.down_y });
        }

        if press.long_press_allowed && !press.long_pressed && held >= self.config.long_press_timeout {
            press.long_pressed = true;
            out.push(Gesture::LongPress { x: press.down_x, y: press.down_y });
        }
    }

    //--- Record Observation -----------------------------------------------

    /// Classifies one raw record, appending recognized gestures to `out`.
    pub fn observe(&mut self, record: &MotionRecord, out: &mut Vec<Gesture>) {
        let Some(action) = record.action() else {
            return;
        };

        match action {
            MotionAction::Down => self.on_down(record, out),
            MotionAction::PointerDown => self.on_pointer_down(record, out),
            MotionAction::Move => self.on_move(record, out),
            MotionAction::Up => self.on_up(record, out),
            MotionAction::PointerUp => self.on_pointer_up(record),
        }
    }

    /// Acting contact, if its id is one the normalizer would track.
    fn acting_sample(record: &MotionRecord) -> Option<&PointerSample> {
        record.acting_pointer().filter(|sample| sample.id.is_valid())
    }

    fn on_down(&mut self, record: &MotionRecord, out: &mut Vec<Gesture>) {
        let Some(sample) = Self::acting_sample(record) else {
            return;
        };
        let time = record.event_time();

        self.velocity.clear();
        self.velocity.add(time, sample.x, sample.y);
        self.press = Some(Press {
            id: sample.id,
            down_x: sample.x,
            down_y: sample.y,
            down_time: time,
            last_x: sample.x,
            last_y: sample.y,
            scrolling: false,
            show_pressed: false,
            long_pressed: false,
            long_press_allowed: true,
        });

        out.push(Gesture::Down { x: sample.x, y: sample.y });
    }

    fn on_pointer_down(&mut self, record: &MotionRecord, out: &mut Vec<Gesture>) {
        let Some(sample) = Self::acting_sample(record) else {
            return;
        };

        // A second finger turns the press into a multi-touch gesture
        if let Some(press) = self.press.as_mut() {
            press.long_press_allowed = false;
        }

        out.push(Gesture::Down { x: sample.x, y: sample.y });
    }

    fn on_move(&mut self, record: &MotionRecord, out: &mut Vec<Gesture>) {
        let Some(press) = self.press.as_mut() else {
            return;
        };
        let Some(sample) = record.pointer_by_id(press.id) else {
            return;
        };
        if press.long_pressed {
            return;
        }

        self.velocity.add(record.event_time(), sample.x, sample.y);

        let distance_x = press.last_x - sample.x;
        let distance_y = press.last_y - sample.y;

        if !press.scrolling {
            let dx = sample.x - press.down_x;
            let dy = sample.y - press.down_y;
            if dx.hypot(dy) <= self.config.touch_slop {
                return;
            }
            trace!(target: "core::input", "Pointer {} began dragging", press.id);
            press.scrolling = true;
            press.long_press_allowed = false;
        } else if distance_x.abs() < 1.0 && distance_y.abs() < 1.0 {
            return;
        }

        press.last_x = sample.x;
        press.last_y = sample.y;
        out.push(Gesture::Scroll {
            origin_x: press.down_x,
            origin_y: press.down_y,
            distance_x,
            distance_y,
        });
    }

    fn on_up(&mut self, record: &MotionRecord, out: &mut Vec<Gesture>) {
        let Some(sample) = Self::acting_sample(record) else {
            return;
        };
        let Some(press) = self.press.take() else {
            return;
        };
        if sample.id != press.id || !press.scrolling || press.long_pressed {
            return;
        }

        self.velocity.add(record.event_time(), sample.x, sample.y);
        let (vx, vy) = self
            .velocity
            .velocity(self.config.velocity_horizon, self.config.assume_stopped);

        let min = self.config.min_fling_velocity;
        if vx.abs() <= min && vy.abs() <= min {
            trace!(target: "core::input", "Release too slow for fling ({:.1}, {:.1})", vx, vy);
            return;
        }

        let max = self.config.max_fling_velocity;
        out.push(Gesture::Fling {
            x: sample.x,
            y: sample.y,
            velocity_x: vx.clamp(-max, max),
            velocity_y: vy.clamp(-max, max),
            time: record.event_time(),
        });
    }

    fn on_pointer_up(&mut self, record: &MotionRecord) {
        let Some(sample) = Self::acting_sample(record) else {
            return;
        };

        // Primary lifted while others stay down: the gesture is over
        if self.press.map_or(false, |press| press.id == sample.id) {
            self.press = None;
            self.velocity.clear();
        }
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn at(action: MotionAction, id: u32, x: f32, y: f32, time: u64) -> MotionRecord {
        MotionRecord::single(action, PointerSample::new(PointerId(id), x, y), ms(time))
    }

    fn observe_all(classifier: &mut GestureClassifier, records: &[MotionRecord]) -> Vec<Gesture> {
        let mut out = Vec::new();
        for record in records {
            classifier.observe(record, &mut out);
        }
        out
    }

    //=====================================================================
    // Press / Tap
    //=====================================================================

    #[test]
    fn down_reports_press() {
        let mut classifier = GestureClassifier::default();
        let out = observe_all(&mut classifier, &[at(MotionAction::Down, 0, 4.0, 5.0, 0)]);

        assert_eq!(out, vec![Gesture::Down { x: 4.0, y: 5.0 }]);
        assert!(classifier.is_pressed());
    }

    #[test]
    fn tap_within_slop_produces_no_scroll_or_fling() {
        let mut classifier = GestureClassifier::default();
        let out = observe_all(
            &mut classifier,
            &[
                at(MotionAction::Down, 0, 10.0, 10.0, 0),
                at(MotionAction::Move, 0, 12.0, 11.0, 16),
                at(MotionAction::Up, 0, 12.0, 11.0, 32),
            ],
        );

        assert_eq!(out, vec![Gesture::Down { x: 10.0, y: 10.0 }]);
        assert!(!classifier.is_pressed());
    }

    #[test]
    fn unknown_action_ignored() {
        let mut classifier = GestureClassifier::default();
        let record = MotionRecord::from_raw(
            MotionAction::ACTION_CANCEL,
            0,
            vec![PointerSample::new(PointerId(0), 0.0, 0.0)],
            ms(0),
        );
        let out = observe_all(&mut classifier, &[record]);
        assert!(out.is_empty());
    }

    #[test]
    fn out_of_range_id_starts_no_press() {
        let mut classifier = GestureClassifier::default();
        let out = observe_all(&mut classifier, &[at(MotionAction::Down, 99, 1.0, 1.0, 0)]);

        assert!(out.is_empty());
        assert!(!classifier.is_pressed());

        let mut out = Vec::new();
        classifier.poll(ms(600), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn out_of_range_up_keeps_press() {
        let mut classifier = GestureClassifier::default();
        let mut out = Vec::new();
        classifier.observe(&at(MotionAction::Down, 0, 1.0, 1.0, 0), &mut out);
        classifier.observe(&at(MotionAction::Up, 40, 1.0, 1.0, 10), &mut out);

        assert!(classifier.is_pressed());
    }

    #[test]
    fn reset_abandons_press() {
        let mut classifier = GestureClassifier::default();
        let mut out = Vec::new();
        classifier.observe(&at(MotionAction::Down, 0, 10.0, 10.0, 0), &mut out);
        classifier.reset();
        out.clear();

        classifier.poll(ms(600), &mut out);
        assert!(out.is_empty());
        assert!(!classifier.is_pressed());
    }

    //=====================================================================
    // Scroll
    //=====================================================================

    #[test]
    fn drag_past_slop_reports_scroll_distances() {
        let mut classifier = GestureClassifier::default();
        let out = observe_all(
            &mut classifier,
            &[
                at(MotionAction::Down, 0, 100.0, 100.0, 0),
                at(MotionAction::Move, 0, 100.0, 80.0, 16),
                at(MotionAction::Move, 0, 100.0, 70.0, 32),
            ],
        );

        assert_eq!(
            &out[1..],
            &[
                Gesture::Scroll { origin_x: 100.0, origin_y: 100.0, distance_x: 0.0, distance_y: 20.0 },
                Gesture::Scroll { origin_x: 100.0, origin_y: 100.0, distance_x: 0.0, distance_y: 10.0 },
            ]
        );
    }

    #[test]
    fn sub_pixel_drag_motion_suppressed() {
        let mut classifier = GestureClassifier::default();
        let out = observe_all(
            &mut classifier,
            &[
                at(MotionAction::Down, 0, 0.0, 0.0, 0),
                at(MotionAction::Move, 0, 20.0, 0.0, 16),
                at(MotionAction::Move, 0, 20.5, 0.0, 32),
            ],
        );
        let scrolls = out.iter().filter(|g| matches!(g, Gesture::Scroll { .. })).count();
        assert_eq!(scrolls, 1);
    }

    //=====================================================================
    // Fling
    //=====================================================================

    #[test]
    fn fast_release_reports_fling_at_release_position() {
        let mut classifier = GestureClassifier::default();
        let out = observe_all(
            &mut classifier,
            &[
                at(MotionAction::Down, 0, 100.0, 500.0, 0),
                at(MotionAction::Move, 0, 100.0, 450.0, 10),
                at(MotionAction::Move, 0, 100.0, 400.0, 20),
                at(MotionAction::Up, 0, 100.0, 350.0, 30),
            ],
        );

        match out.last() {
            Some(Gesture::Fling { x, y, velocity_x, velocity_y, time }) => {
                assert_eq!((*x, *y), (100.0, 350.0));
                assert_eq!(*velocity_x, 0.0);
                assert!((*velocity_y + 5_000.0).abs() < 1.0, "got {}", velocity_y);
                assert_eq!(*time, ms(30));
            }
            other => panic!("Expected Fling, got {:?}", other),
        }
    }

    #[test]
    fn fling_velocity_clamped() {
        let mut classifier = GestureClassifier::default();
        let out = observe_all(
            &mut classifier,
            &[
                at(MotionAction::Down, 0, 0.0, 0.0, 0),
                at(MotionAction::Move, 0, 200.0, 0.0, 5),
                at(MotionAction::Up, 0, 400.0, 0.0, 10),
            ],
        );

        match out.last() {
            Some(Gesture::Fling { velocity_x, .. }) => assert_eq!(*velocity_x, 8_000.0),
            other => panic!("Expected Fling, got {:?}", other),
        }
    }

    #[test]
    fn slow_release_is_not_a_fling() {
        let mut classifier = GestureClassifier::default();
        let out = observe_all(
            &mut classifier,
            &[
                at(MotionAction::Down, 0, 0.0, 0.0, 0),
                at(MotionAction::Move, 0, 20.0, 0.0, 500),
                at(MotionAction::Move, 0, 21.0, 0.0, 530),
                at(MotionAction::Up, 0, 21.5, 0.0, 560),
            ],
        );
        assert!(!out.iter().any(|g| matches!(g, Gesture::Fling { .. })));
    }

    #[test]
    fn pause_before_release_is_not_a_fling() {
        let mut classifier = GestureClassifier::default();
        let out = observe_all(
            &mut classifier,
            &[
                at(MotionAction::Down, 0, 0.0, 0.0, 0),
                at(MotionAction::Move, 0, 100.0, 0.0, 10),
                at(MotionAction::Up, 0, 100.0, 0.0, 200),
            ],
        );
        assert!(!out.iter().any(|g| matches!(g, Gesture::Fling { .. })));
    }

    #[test]
    fn primary_lifting_first_ends_gesture_without_fling() {
        let mut classifier = GestureClassifier::default();
        let two = |action, index, t| {
            MotionRecord::new(
                action,
                index,
                vec![
                    PointerSample::new(PointerId(0), 0.0, 0.0),
                    PointerSample::new(PointerId(1), 50.0, 0.0),
                ],
                ms(t),
            )
        };
        let mut out = Vec::new();
        classifier.observe(&at(MotionAction::Down, 0, 0.0, 0.0, 0), &mut out);
        classifier.observe(&two(MotionAction::PointerDown, 1, 5), &mut out);
        classifier.observe(&two(MotionAction::PointerUp, 0, 10), &mut out);

        assert!(!classifier.is_pressed());
        assert_eq!(out.len(), 2);
        assert!(matches!(out[1], Gesture::Down { x, .. } if x == 50.0));
    }

    //=====================================================================
    // Timed Gestures
    //=====================================================================

    #[test]
    fn long_press_fires_once_at_press_coordinates() {
        let mut classifier = GestureClassifier::default();
        let mut out = Vec::new();
        classifier.observe(&at(MotionAction::Down, 0, 30.7, 40.2, 0), &mut out);
        out.clear();

        classifier.poll(ms(200), &mut out);
        classifier.poll(ms(499), &mut out);
        assert_eq!(out, vec![Gesture::ShowPress { x: 30.7, y: 40.2 }]);

        out.clear();
        classifier.poll(ms(500), &mut out);
        classifier.poll(ms(900), &mut out);
        assert_eq!(out, vec![Gesture::LongPress { x: 30.7, y: 40.2 }]);
    }

    #[test]
    fn dragging_prevents_long_press() {
        let mut classifier = GestureClassifier::default();
        let mut out = Vec::new();
        classifier.observe(&at(MotionAction::Down, 0, 0.0, 0.0, 0), &mut out);
        classifier.observe(&at(MotionAction::Move, 0, 50.0, 0.0, 50), &mut out);
        out.clear();

        classifier.poll(ms(1_000), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn second_finger_prevents_long_press() {
        let mut classifier = GestureClassifier::default();
        let mut out = Vec::new();
        classifier.observe(&at(MotionAction::Down, 0, 0.0, 0.0, 0), &mut out);
        classifier.observe(
            &MotionRecord::new(
                MotionAction::PointerDown,
                1,
                vec![
                    PointerSample::new(PointerId(0), 0.0, 0.0),
                    PointerSample::new(PointerId(1), 9.0, 9.0),
                ],
                ms(10),
            ),
            &mut out,
        );
        out.clear();

        classifier.poll(ms(1_000), &mut out);
        assert!(!out.iter().any(|g| matches!(g, Gesture::LongPress { .. })));
    }

    #[test]
    fn long_press_suppresses_fling() {
        let mut classifier = GestureClassifier::default();
        let mut out = Vec::new();
        classifier.observe(&at(MotionAction::Down, 0, 0.0, 0.0, 0), &mut out);
        classifier.poll(ms(600), &mut out);
        classifier.observe(&at(MotionAction::Move, 0, 200.0, 0.0, 610), &mut out);
        classifier.observe(&at(MotionAction::Up, 0, 400.0, 0.0, 620), &mut out);

        assert!(!out.iter().any(|g| matches!(g, Gesture::Fling { .. } | Gesture::Scroll { .. })));
    }

    //=====================================================================
    // VelocityTracker
    //=====================================================================

    #[test]
    fn velocity_empty_is_zero() {
        let tracker = VelocityTracker::default();
        assert_eq!(tracker.velocity(ms(100), ms(40)), (0.0, 0.0));
    }

    #[test]
    fn velocity_ignores_samples_outside_horizon() {
        let mut tracker = VelocityTracker::default();
        tracker.add(ms(0), 0.0, 0.0);
        tracker.add(ms(500), 1_000.0, 0.0);
        tracker.add(ms(520), 1_010.0, 0.0);
        tracker.add(ms(540), 1_020.0, 0.0);

        let (vx, vy) = tracker.velocity(ms(100), ms(40));
        assert!((vx - 500.0).abs() < 0.01, "got {}", vx);
        assert_eq!(vy, 0.0);
    }

    #[test]
    fn velocity_history_is_bounded() {
        let mut tracker = VelocityTracker::default();
        for i in 0..100 {
            tracker.add(ms(i), i as f32, 0.0);
        }
        assert_eq!(tracker.samples.len(), VelocityTracker::HISTORY);
    }
}
