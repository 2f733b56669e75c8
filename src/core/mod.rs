//=========================================================================
// Render-Tick Coordinator
//
// Central coordinator for everything that runs on the render thread.
//
// Responsibilities:
// - Own the surface, pointer tracking, gesture recognition and the
//   kinetic scroller exclusively on one thread
// - Apply host intents received over the platform channel in order
// - Sequence each frame: physics tick → buffered input → redraw
// - Guarantee `init` precedes every `resize` and `redraw`
//
// Notes:
// The coordinator never talks to the host directly. Input arrives as
// `PlatformEvent`s and further frames are requested through an explicit
// `FrameRequester` handle.
//
// State machine:
// ```text
//   Uninitialized ──SurfaceCreated──> Ready ──(resize | frame | contacts lost)*──> Ready
// ```
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::thread;
use std::time::Duration;

//=== External Crates =====================================================

use crossbeam_channel::Receiver;
use log::{debug, info, trace};

//=== Module Declarations =================================================

pub mod input;
pub mod kinetic;
pub mod platform_bridge;
pub mod sink;

//=== Internal Modules ====================================================

use input::event::{InputRecord, MotionRecord, MouseRecord};
use input::gesture::{Gesture, GestureClassifier, GestureConfig};
use input::normalizer::PointerNormalizer;
use kinetic::{DecayConfig, KineticScroller};
use platform_bridge::{EventCollector, FrameRequester, PlatformEvent, TickControl};
use sink::CoreEventSink;

//=== CoordinatorState ====================================================

/// Lifecycle of the core as seen from this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    /// `init` has not been delivered yet.
    Uninitialized,
    /// `init` delivered; resize and redraw may flow.
    Ready,
}

//=== Surface =============================================================

/// Rendering target dimensions as last reported by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Surface {
    size: Option<(i32, i32)>,
    reported: bool,
}

impl Surface {
    /// Current pixel size, if the host has announced one.
    pub fn size(&self) -> Option<(i32, i32)> {
        self.size
    }

    /// True once the current size has been delivered to the core.
    pub fn is_reported(&self) -> bool {
        self.reported
    }

    fn set_size(&mut self, width: i32, height: i32) {
        self.size = Some((width, height));
        self.reported = false;
    }
}

//=== RenderCoordinator ===================================================

/// Drives the core event sink from host intents on the render thread.
pub struct RenderCoordinator<S: CoreEventSink> {
    state: CoordinatorState,
    sink: S,
    surface: Surface,
    normalizer: PointerNormalizer,
    classifier: GestureClassifier,
    scroller: KineticScroller,
    requester: Box<dyn FrameRequester>,
    gestures: Vec<Gesture>,
    frames: u64,
}

impl<S: CoreEventSink> RenderCoordinator<S> {
    //--- Construction -----------------------------------------------------

    pub fn new(
        sink: S,
        requester: Box<dyn FrameRequester>,
        gesture_config: GestureConfig,
        decay_config: DecayConfig,
    ) -> Self {
        Self {
            state: CoordinatorState::Uninitialized,
            sink,
            surface: Surface::default(),
            normalizer: PointerNormalizer::new(),
            classifier: GestureClassifier::new(gesture_config),
            scroller: KineticScroller::new(decay_config),
            requester,
            gestures: Vec::with_capacity(4),
            frames: 0,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn state(&self) -> CoordinatorState {
        self.state
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn normalizer(&self) -> &PointerNormalizer {
        &self.normalizer
    }

    pub fn scroller(&self) -> &KineticScroller {
        &self.scroller
    }

    /// Frames rendered since init.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Consumes the coordinator, handing the sink back.
    pub fn into_sink(self) -> S {
        self.sink
    }

    //--- Event Dispatch ---------------------------------------------------

    /// Applies one host intent.
    ///
    /// Hosts other than the bundled winit platform drive the coordinator
    /// through this entry point. Returns [`TickControl::Exit`] once the
    /// surface is destroyed.
    pub fn handle_event(&mut self, event: PlatformEvent) -> TickControl {
        match event {
            PlatformEvent::SurfaceCreated { storage_path } => self.surface_created(&storage_path),
            PlatformEvent::SurfaceResized { width, height } => self.surface_resized(width, height),
            PlatformEvent::Frame { frame_time, inputs } => self.frame(frame_time, inputs),
            PlatformEvent::ContactsLost => self.contacts_lost(),
            PlatformEvent::SurfaceDestroyed => return TickControl::Exit,
        }
        TickControl::Continue
    }

    //--- Surface Lifecycle ------------------------------------------------

    /// Delivers `init` on the first surface creation only.
    ///
    /// A re-created surface means the host went away in between, so any
    /// contact still tracked from before is released.
    pub fn surface_created(&mut self, storage_path: &str) {
        if self.state == CoordinatorState::Ready {
            debug!(target: "core", "Surface re-created, core already initialized");
            self.contacts_lost();
            return;
        }

        info!(target: "core", "Initializing core (storage: {})", storage_path);
        self.sink.init(storage_path);
        self.state = CoordinatorState::Ready;

        // A size seen before init is delivered now
        self.report_size();
    }

    /// Records the new size and reports it once the core is ready.
    pub fn surface_resized(&mut self, width: i32, height: i32) {
        debug!(target: "core", "Surface resized to {}x{}", width, height);
        self.surface.set_size(width, height);

        if self.state == CoordinatorState::Ready {
            self.report_size();
        }
    }

    /// Releases every tracked pointer and abandons the current press.
    ///
    /// Each live pointer gets its `pointer_up` at its last known position.
    pub fn contacts_lost(&mut self) {
        self.classifier.reset();
        if self.state != CoordinatorState::Ready {
            return;
        }

        let live = self.normalizer.tracked_count() + usize::from(self.normalizer.mouse().is_some());
        if live > 0 {
            debug!(target: "core", "Contacts lost, releasing {} pointers", live);
        }
        self.normalizer.release_all(&mut self.sink);
    }

    fn report_size(&mut self) {
        if self.surface.reported {
            return;
        }
        if let Some((width, height)) = self.surface.size {
            self.sink.resize(width, height);
            self.surface.reported = true;
        }
    }

    //--- Frame ------------------------------------------------------------

    /// Runs one render tick: physics, then buffered input, then redraw.
    pub fn frame(&mut self, frame_time: Duration, inputs: Vec<InputRecord>) {
        if self.state != CoordinatorState::Ready {
            trace!(
                target: "core",
                "Frame before init dropped ({} inputs)",
                inputs.len()
            );
            return;
        }

        //--- (a) Physics tick ---------------------------------------------
        let outcome = self.scroller.tick(frame_time, &mut self.sink);
        if outcome.wants_next_frame() {
            self.requester.request_frame();
        }

        //--- (b) Accumulated input ----------------------------------------
        for record in inputs {
            self.dispatch_input(record);
        }
        self.poll_gestures(frame_time);

        // A fling started by this frame's input needs a frame to coast
        if !outcome.wants_next_frame() && self.scroller.is_active() {
            self.requester.request_frame();
        }

        //--- (c) Redraw ---------------------------------------------------
        self.sink.redraw();
        self.frames += 1;
    }

    //--- Input ------------------------------------------------------------

    fn dispatch_input(&mut self, record: InputRecord) {
        match record {
            InputRecord::Touch(record) => self.dispatch_touch(&record),
            InputRecord::Mouse(record) => self.dispatch_mouse(&record),
        }
    }

    fn dispatch_touch(&mut self, record: &MotionRecord) {
        self.poll_gestures(record.event_time());

        if self.normalizer.mouse().is_some() {
            trace!(target: "core::input", "Touch record ignored while mouse is held");
            return;
        }

        let mut gestures = std::mem::take(&mut self.gestures);
        self.classifier.observe(record, &mut gestures);
        self.cancel_on_down(&gestures);
        self.normalizer.process_touch(Some(record), &mut self.sink);
        self.apply_gestures(&mut gestures);
        self.gestures = gestures;
    }

    fn dispatch_mouse(&mut self, record: &MouseRecord) {
        self.poll_gestures(record.event_time);

        if self.normalizer.tracked_count() > 0 {
            trace!(target: "core::input", "Mouse record ignored while touches are held");
            return;
        }

        let mut gestures = std::mem::take(&mut self.gestures);
        self.classifier.observe(&record.to_motion(), &mut gestures);
        self.cancel_on_down(&gestures);
        self.normalizer.process_mouse(Some(record), &mut self.sink);
        self.apply_gestures(&mut gestures);
        self.gestures = gestures;
    }

    /// A new contact interrupts kinetic scrolling before it is tracked.
    fn cancel_on_down(&mut self, gestures: &[Gesture]) {
        if gestures.iter().any(|g| matches!(g, Gesture::Down { .. })) {
            self.scroller.cancel();
        }
    }

    fn poll_gestures(&mut self, now: Duration) {
        let mut gestures = std::mem::take(&mut self.gestures);
        self.classifier.poll(now, &mut gestures);
        self.apply_gestures(&mut gestures);
        self.gestures = gestures;
    }

    fn apply_gestures(&mut self, gestures: &mut Vec<Gesture>) {
        for gesture in gestures.drain(..) {
            match gesture {
                Gesture::Down { .. } | Gesture::ShowPress { .. } => {}
                Gesture::Scroll {
                    origin_x,
                    origin_y,
                    distance_x,
                    distance_y,
                } => {
                    self.sink
                        .scroll(origin_x as i32, origin_y as i32, distance_x, distance_y);
                }
                Gesture::Fling {
                    x,
                    y,
                    velocity_x,
                    velocity_y,
                    time,
                } => {
                    self.scroller.fling(x, y, velocity_x, velocity_y, time);
                }
                Gesture::LongPress { x, y } => {
                    self.sink.long_press(x as i32, y as i32);
                }
            }
        }
    }
}

//=== Render Thread =======================================================

/// Spawns the render thread.
///
/// The thread applies host intents until `SurfaceDestroyed` arrives or the
/// channel disconnects, then hands the sink back through the join handle.
pub(crate) fn spawn_render_thread<S>(
    mut coordinator: RenderCoordinator<S>,
    receiver: Receiver<PlatformEvent>,
) -> thread::JoinHandle<S>
where
    S: CoreEventSink + 'static,
{
    thread::spawn(move || {
        let mut collector = EventCollector::new(receiver);

        loop {
            let control = collector.collect();

            for event in collector.take_events() {
                if coordinator.handle_event(event) == TickControl::Exit {
                    info!(target: "core", "Surface destroyed, render thread exiting");
                    return coordinator.into_sink();
                }
            }

            if control == TickControl::Exit {
                info!(target: "core", "Platform channel closed, render thread exiting");
                return coordinator.into_sink();
            }
        }
    })
}

//=========================================================================
// Unit Tests
//=========================================================================
