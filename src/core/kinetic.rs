//=========================================================================
// Kinetic Scroll Simulator
//=========================================================================
//
// Decaying-velocity scroll physics started by a fling and advanced once
// per render tick.
//
// Architecture:
//   Gesture::Fling → fling()  → ScrollState (replaces any previous one)
//   render tick    → tick()   → kinetic_scroll(x, y) | silent completion
//   touch-down     → cancel() → ScrollState discarded
//
// Decay model:
//   Constant deceleration along the release direction. The deceleration
//   is derived from friction and screen density the same way Android's
//   scroller derives it from physical constants. Positions are clamped to
//   [FLING_MIN, FLING_MAX] on each axis, which in practice leaves the
//   fling unconstrained; region clamping belongs to the core.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::time::Duration;

//=== External Dependencies ===============================================

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use crate::core::sink::CoreEventSink;

//=== Constants ===========================================================

/// Lower displacement bound on each axis.
pub const FLING_MIN: i32 = 0;

/// Upper displacement bound on each axis (effectively unbounded).
pub const FLING_MAX: i32 = 999_999_999;

const GRAVITY_EARTH: f32 = 9.806_65;
const INCHES_PER_METER: f32 = 39.37;
const BASELINE_PPI: f32 = 160.0;
const PHYSICAL_COEFFICIENT: f32 = 0.84;

//=== DecayConfig =========================================================

/// Physical parameters of the decay model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayConfig {
    /// Scroll friction (Android default 0.015).
    pub friction: f32,

    /// Display density relative to a 160 ppi baseline.
    pub density: f32,
}

impl DecayConfig {
    /// Deceleration in px/s².
    pub fn deceleration(&self) -> f32 {
        GRAVITY_EARTH * INCHES_PER_METER * BASELINE_PPI * self.density * PHYSICAL_COEFFICIENT * self.friction
    }
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            friction: 0.015,
            density: 1.0,
        }
    }
}

//=== ScrollState =========================================================

/// One in-flight fling.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollState {
    origin: (f32, f32),
    velocity: (f32, f32),
    start_time: Duration,
    duration: Duration,
    deceleration: f32,
    current: (i32, i32),
    finished: bool,
}

impl ScrollState {
    //--- Construction -----------------------------------------------------

    /// Seeds a fling at `origin` with `velocity` (px/s) starting at `start_time`.
    pub fn new(origin: (f32, f32), velocity: (f32, f32), start_time: Duration, deceleration: f32) -> Self {
        let speed = velocity.0.hypot(velocity.1);
        // Near-zero deceleration coasts for longer than a Duration can hold
        let duration = if speed > 0.0 && deceleration > 0.0 {
            Duration::try_from_secs_f32(speed / deceleration).unwrap_or(Duration::MAX)
        } else {
            Duration::ZERO
        };

        Self {
            origin,
            velocity,
            start_time,
            duration,
            deceleration,
            current: (clamp_axis(origin.0), clamp_axis(origin.1)),
            finished: duration.is_zero(),
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn origin(&self) -> (f32, f32) {
        self.origin
    }

    /// Last simulated position.
    pub fn current(&self) -> (i32, i32) {
        self.current
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Position the fling comes to rest at.
    pub fn final_position(&self) -> (i32, i32) {
        self.position_at(self.duration.as_secs_f32())
    }

    //--- Simulation -------------------------------------------------------

    /// Advances the model to `now`.
    ///
    /// Returns true while there is displacement to report; the tick that
    /// crosses the duration reports the resting position once, after
    /// which the state is finished and this returns false.
    pub fn compute_offset(&mut self, now: Duration) -> bool {
        if self.finished {
            return false;
        }

        let elapsed = now.saturating_sub(self.start_time);
        if elapsed < self.duration {
            self.current = self.position_at(elapsed.as_secs_f32());
        } else {
            self.current = self.final_position();
            self.finished = true;
        }
        true
    }

    fn position_at(&self, t: f32) -> (i32, i32) {
        let speed = self.velocity.0.hypot(self.velocity.1);
        if speed == 0.0 {
            return (clamp_axis(self.origin.0), clamp_axis(self.origin.1));
        }

        let travelled = speed * t - 0.5 * self.deceleration * t * t;
        let (ux, uy) = (self.velocity.0 / speed, self.velocity.1 / speed);

        (
            clamp_axis(self.origin.0 + ux * travelled),
            clamp_axis(self.origin.1 + uy * travelled),
        )
    }
}

fn clamp_axis(value: f32) -> i32 {
    (value.round() as i32).clamp(FLING_MIN, FLING_MAX)
}

//=== KineticTick =========================================================

/// Outcome of one physics tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KineticTick {
    /// No fling in flight.
    Idle,
    /// Emitted a kinetic-scroll event; another tick is wanted.
    Scrolled,
    /// The fling came to rest and was discarded without an event.
    Finished,
}

impl KineticTick {
    pub fn wants_next_frame(self) -> bool {
        self == Self::Scrolled
    }
}

//=== KineticScroller =====================================================

/// Owns the (at most one) active ScrollState of a surface.
pub struct KineticScroller {
    config: DecayConfig,
    active: Option<ScrollState>,
}

impl KineticScroller {
    pub fn new(config: DecayConfig) -> Self {
        Self { config, active: None }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn state(&self) -> Option<&ScrollState> {
        self.active.as_ref()
    }

    /// Starts a fling, discarding any fling already in flight.
    pub fn fling(&mut self, x: f32, y: f32, velocity_x: f32, velocity_y: f32, start_time: Duration) {
        if self.active.is_some() {
            debug!(target: "core::kinetic", "Replacing in-flight fling");
        }

        let state = ScrollState::new(
            (x, y),
            (velocity_x, velocity_y),
            start_time,
            self.config.deceleration(),
        );
        debug!(
            target: "core::kinetic",
            "Fling from ({}, {}) at ({:.0}, {:.0}) px/s for {:?}",
            x,
            y,
            velocity_x,
            velocity_y,
            state.duration()
        );
        self.active = Some(state);
    }

    /// Drops the active fling. Returns true if one was in flight.
    pub fn cancel(&mut self) -> bool {
        let cancelled = self.active.take().is_some();
        if cancelled {
            debug!(target: "core::kinetic", "Fling cancelled by touch-down");
        }
        cancelled
    }

    /// Runs one physics tick at frame time `now`.
    pub fn tick<S>(&mut self, now: Duration, sink: &mut S) -> KineticTick
    where
        S: CoreEventSink + ?Sized,
    {
        let Some(state) = self.active.as_mut() else {
            return KineticTick::Idle;
        };

        if state.compute_offset(now) {
            let (x, y) = state.current();
            sink.kinetic_scroll(x, y);
            KineticTick::Scrolled
        } else {
            trace!(target: "core::kinetic", "Fling finished at {:?}", state.current());
            self.active = None;
            KineticTick::Finished
        }
    }
}

impl Default for KineticScroller {
    fn default() -> Self {
        Self::new(DecayConfig::default())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
