//=========================================================================
// Core Event Sink
//=========================================================================
//
// The fixed set of one-way entry points into the external rendering core.
//
// Architecture:
//   RenderCoordinator ─┬─ PointerNormalizer ─┐
//                      ├─ KineticScroller ───┼─→ CoreEventSink
//                      └─ (init/resize/redraw)┘
//
// All calls are fire-and-forget notifications made from the render thread
// only. Nothing returned by the core is consumed.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::input::event::PointerId;

//=== CoreEventSink =======================================================

/// Entry points of the rendering core.
///
/// Implementations are moved onto the render thread and called from there
/// exclusively, hence `Send` but not `Sync`.
pub trait CoreEventSink: Send {
    /// Called once, before the first redraw.
    fn init(&mut self, storage_path: &str);

    /// Called on every surface dimension change.
    fn resize(&mut self, width: i32, height: i32);

    /// Called once per render tick, always last in the tick.
    fn redraw(&mut self);

    fn pointer_down(&mut self, x: f32, y: f32, pointer_id: PointerId);

    fn pointer_move(&mut self, x: f32, y: f32, pointer_id: PointerId);

    fn pointer_up(&mut self, x: f32, y: f32, pointer_id: PointerId);

    fn long_press(&mut self, x: i32, y: i32);

    /// Direct drag-scroll pass-through (distance since the previous scroll).
    fn scroll(&mut self, origin_x: i32, origin_y: i32, velocity_x: f32, velocity_y: f32);

    /// One call per active physics tick.
    fn kinetic_scroll(&mut self, x: i32, y: i32);
}

impl<S: CoreEventSink + ?Sized> CoreEventSink for Box<S> {
    fn init(&mut self, storage_path: &str) {
        (**self).init(storage_path)
    }

    fn resize(&mut self, width: i32, height: i32) {
        (**self).resize(width, height)
    }

    fn redraw(&mut self) {
        (**self).redraw()
    }

    fn pointer_down(&mut self, x: f32, y: f32, pointer_id: PointerId) {
        (**self).pointer_down(x, y, pointer_id)
    }

    fn pointer_move(&mut self, x: f32, y: f32, pointer_id: PointerId) {
        (**self).pointer_move(x, y, pointer_id)
    }

    fn pointer_up(&mut self, x: f32, y: f32, pointer_id: PointerId) {
        (**self).pointer_up(x, y, pointer_id)
    }

    fn long_press(&mut self, x: i32, y: i32) {
        (**self).long_press(x, y)
    }

    fn scroll(&mut self, origin_x: i32, origin_y: i32, velocity_x: f32, velocity_y: f32) {
        (**self).scroll(origin_x, origin_y, velocity_x, velocity_y)
    }

    fn kinetic_scroll(&mut self, x: i32, y: i32) {
        (**self).kinetic_scroll(x, y)
    }
}

//=== SinkCall ============================================================

/// One recorded entry-point invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    Init { storage_path: String },
    Resize { width: i32, height: i32 },
    Redraw,
    PointerDown { x: f32, y: f32, pointer_id: PointerId },
    PointerMove { x: f32, y: f32, pointer_id: PointerId },
    PointerUp { x: f32, y: f32, pointer_id: PointerId },
    LongPress { x: i32, y: i32 },
    Scroll { origin_x: i32, origin_y: i32, velocity_x: f32, velocity_y: f32 },
    KineticScroll { x: i32, y: i32 },
}

impl SinkCall {
    /// True for calls produced by pointer input or scrolling.
    pub fn is_input(&self) -> bool {
        !matches!(self, Self::Init { .. } | Self::Resize { .. } | Self::Redraw)
    }
}

//=== TraceSink ===========================================================

/// Sink that records every call in order, for inspection.
#[derive(Debug, Default)]
pub struct TraceSink {
    calls: Vec<SinkCall>,
}

impl TraceSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls recorded so far, oldest first.
    pub fn calls(&self) -> &[SinkCall] {
        &self.calls
    }

    /// Takes the recorded calls, leaving the trace empty.
    pub fn take(&mut self) -> Vec<SinkCall> {
        std::mem::take(&mut self.calls)
    }

    fn record(&mut self, call: SinkCall) {
        self.calls.push(call);
    }
}

impl CoreEventSink for TraceSink {
    fn init(&mut self, storage_path: &str) {
        self.record(SinkCall::Init {
            storage_path: storage_path.to_owned(),
        });
    }

    fn resize(&mut self, width: i32, height: i32) {
        self.record(SinkCall::Resize { width, height });
    }

    fn redraw(&mut self) {
        self.record(SinkCall::Redraw);
    }

    fn pointer_down(&mut self, x: f32, y: f32, pointer_id: PointerId) {
        self.record(SinkCall::PointerDown { x, y, pointer_id });
    }

    fn pointer_move(&mut self, x: f32, y: f32, pointer_id: PointerId) {
        self.record(SinkCall::PointerMove { x, y, pointer_id });
    }

    fn pointer_up(&mut self, x: f32, y: f32, pointer_id: PointerId) {
        self.record(SinkCall::PointerUp { x, y, pointer_id });
    }

    fn long_press(&mut self, x: i32, y: i32) {
        self.record(SinkCall::LongPress { x, y });
    }

    fn scroll(&mut self, origin_x: i32, origin_y: i32, velocity_x: f32, velocity_y: f32) {
        self.record(SinkCall::Scroll {
            origin_x,
            origin_y,
            velocity_x,
            velocity_y,
        });
    }

    fn kinetic_scroll(&mut self, x: i32, y: i32) {
        self.record(SinkCall::KineticScroll { x, y });
    }
}

//=== LogSink =============================================================

/// Sink that logs each call at debug level under `core::sink`.
///
/// Useful as a stand-in core when wiring a new host.
#[derive(Debug, Default)]
pub struct LogSink {
    redraws: u64,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CoreEventSink for LogSink {
    fn init(&mut self, storage_path: &str) {
        debug!(target: "core::sink", "init(storage_path={})", storage_path);
    }

    fn resize(&mut self, width: i32, height: i32) {
        debug!(target: "core::sink", "resize({}x{})", width, height);
    }

    fn redraw(&mut self) {
        self.redraws += 1;
        if self.redraws % 600 == 0 {
            debug!(target: "core::sink", "redraw #{}", self.redraws);
        }
    }

    fn pointer_down(&mut self, x: f32, y: f32, pointer_id: PointerId) {
        debug!(target: "core::sink", "pointer_down({}, {}, id={})", x, y, pointer_id);
    }

    fn pointer_move(&mut self, x: f32, y: f32, pointer_id: PointerId) {
        debug!(target: "core::sink", "pointer_move({}, {}, id={})", x, y, pointer_id);
    }

    fn pointer_up(&mut self, x: f32, y: f32, pointer_id: PointerId) {
        debug!(target: "core::sink", "pointer_up({}, {}, id={})", x, y, pointer_id);
    }

    fn long_press(&mut self, x: i32, y: i32) {
        debug!(target: "core::sink", "long_press({}, {})", x, y);
    }

    fn scroll(&mut self, origin_x: i32, origin_y: i32, velocity_x: f32, velocity_y: f32) {
        debug!(
            target: "core::sink",
            "scroll(origin=({}, {}), delta=({}, {}))",
            origin_x,
            origin_y,
            velocity_x,
            velocity_y
        );
    }

    fn kinetic_scroll(&mut self, x: i32, y: i32) {
        debug!(target: "core::sink", "kinetic_scroll({}, {})", x, y);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
