//=========================================================================
// Platform Subsystem
//
// Bridges winit (OS-level events) with the render thread via a bounded
// channel.
//
// Architecture:
// ```text
//  UI Thread:                       Render Thread:
//  ┌──────────────────────────┐    ┌────────────────────┐
//  │  Winit Event Loop        │    │  RenderCoordinator │
//  │   ↓                      │    │   ├─ KineticScroll │
//  │  InputProcessor          │    │   ├─ Normalizer    │
//  │   └─ Tracks contacts     │    │   ├─ Gestures      │
//  │   ↓                      │    │   └─ Sink          │
//  │  InputBuffer             │    │                    │
//  │   ↓                      │    └────────────────────┘
//  │  RedrawRequested         │        ↑          │
//  │   ↓ (flush)              │        │          │ request_frame()
//  │  Channel ────────────────┼────────┘          │
//  │                          │    PlatformEvent  │
//  │  user_event(Frame) <─────┼───────────────────┘
//  └──────────────────────────┘    EventLoopProxy
// ```
//
// Frame Boundary: RedrawRequested
//   → All buffered input sent with the frame, in arrival order
//   → Empty frames ARE sent (the core redraws every frame)
//
// Key Design Decisions:
// - **UI thread never mutates render state**: it only enqueues intents
// - **Graceful channel disconnect**: if the render thread dies, the
//   platform logs a warning and keeps running so the window can close
// - **Main thread requirement**: winit mandates the main thread on
//   macOS/iOS, so this runs on the thread that called `Bridge::run()`
//
//=========================================================================

//=== Submodules ==========================================================

mod input_buffer;
mod input_processor;

//=== Standard Library Imports ============================================

use std::time::Instant;

//=== External Crates =====================================================

use crossbeam_channel::Sender;
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{Touch, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::input::event::InputRecord;
use crate::core::platform_bridge::{FrameRequester, PlatformError, PlatformEvent};
use input_buffer::InputBuffer;
use input_processor::InputProcessor;

//=== HostRequest =========================================================

/// User events delivered back into the winit loop from other threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HostRequest {
    /// Render thread wants another frame.
    Frame,
}

//=== ProxyRequester ======================================================

/// [`FrameRequester`] backed by the winit event loop proxy.
///
/// A continuous host already redraws every frame, so requests are only
/// forwarded in [`RenderMode::OnDemand`].
pub(crate) struct ProxyRequester {
    proxy: EventLoopProxy<HostRequest>,
    render_mode: RenderMode,
}

impl ProxyRequester {
    pub(crate) fn new(proxy: EventLoopProxy<HostRequest>, render_mode: RenderMode) -> Self {
        Self { proxy, render_mode }
    }
}

impl FrameRequester for ProxyRequester {
    fn request_frame(&self) {
        if !self.render_mode.needs_frame_requests() {
            return;
        }
        if self.proxy.send_event(HostRequest::Frame).is_err() {
            warn!(target: "platform", "Event loop closed, frame request dropped");
        }
    }
}

//=== RenderMode ==========================================================

/// When the host schedules frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Redraw after every frame.
    #[default]
    Continuous,

    /// Redraw only on input, resize, or an explicit frame request.
    OnDemand,
}

impl RenderMode {
    /// Whether the render side must ask for frames to keep animating.
    pub fn needs_frame_requests(self) -> bool {
        self == Self::OnDemand
    }
}

//=== PlatformSettings ====================================================

#[derive(Debug, Clone)]
pub(crate) struct PlatformSettings {
    pub storage_path: String,
    pub render_mode: RenderMode,
    pub title: String,
    pub initial_size: (u32, u32),
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            storage_path: String::new(),
            render_mode: RenderMode::default(),
            title: String::from("Touch Bridge"),
            initial_size: (800, 600),
        }
    }
}

//=== Platform ============================================================

/// Window manager and input aggregator.
///
/// Runs on the main thread and talks to the render thread exclusively
/// through the channel sender.
///
/// # Lifecycle
///
/// 1. **Construction**: `Platform::new(sender, settings)`
/// 2. **Execution**: `platform.run(event_loop)` blocks until the window closes
/// 3. **Shutdown**: close → `SurfaceDestroyed` → loop exits
pub(crate) struct Platform {
    /// OS window handle (None until `resumed()`, or after `suspended()`).
    window: Option<Window>,

    /// Buffers input records until the frame boundary.
    buffer: InputBuffer,

    /// Channel to the render thread.
    event_sender: Sender<PlatformEvent>,

    /// Converts winit callbacks to input records.
    input_processor: InputProcessor,

    settings: PlatformSettings,

    /// Time base for frame and input timestamps.
    clock: Instant,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    /// Creates the platform; the window is created lazily in `resumed()`.
    pub(crate) fn new(event_sender: Sender<PlatformEvent>, settings: PlatformSettings) -> Self {
        info!(target: "platform", "Platform subsystem initialized ({:?})", settings.render_mode);
        Self {
            window: None,
            buffer: InputBuffer::new(),
            event_sender,
            input_processor: InputProcessor::new(),
            settings,
            clock: Instant::now(),
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the winit event loop until the window is closed.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::EventLoopExecution`] if winit reports a
    /// failure while running.
    pub(crate) fn run(mut self, event_loop: EventLoop<HostRequest>) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting winit event loop");

        event_loop
            .run_app(&mut self)
            .map_err(|e| PlatformError::EventLoopExecution(e.to_string()))
    }

    //--- Internal Helpers -------------------------------------------------

    /// Sends an intent, tolerating a dead render thread.
    fn send(&self, event: PlatformEvent) -> bool {
        match self.event_sender.send(event) {
            Ok(()) => true,
            Err(_) => {
                warn!(target: "platform", "Channel disconnected, render thread gone");
                false
            }
        }
    }

    fn send_resize(&self, size: PhysicalSize<u32>) {
        let width = i32::try_from(size.width).unwrap_or(i32::MAX);
        let height = i32::try_from(size.height).unwrap_or(i32::MAX);
        debug!(target: "platform", "Surface resized to {}x{}", width, height);
        self.send(PlatformEvent::SurfaceResized { width, height });
    }

    /// Sends a frame with every record buffered since the previous one.
    fn flush_frame(&mut self) {
        let count = self.buffer.len();
        let inputs = self.buffer.drain();
        let frame_time = self.clock.elapsed();

        trace!(target: "platform::input", "Flushing frame with {} records", count);

        if !self.send(PlatformEvent::Frame { frame_time, inputs }) && count > 0 {
            warn!(target: "platform::input", "Dropped {} input records", count);
        }
    }

    /// Buffers a converted record and schedules a frame to carry it.
    fn buffer_input(&mut self, record: Option<InputRecord>) {
        let Some(record) = record else {
            return;
        };
        self.buffer.push(record);

        if self.settings.render_mode == RenderMode::OnDemand {
            self.request_redraw();
        }
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    /// Forgets every contact and tells the render side they are gone.
    ///
    /// Buffered records are dropped; the render thread releases whatever
    /// pointers it still tracks.
    fn lose_contacts(&mut self) {
        info!(
            target: "platform",
            "Releasing {} contacts, {} buffered records dropped",
            self.input_processor.contact_count(),
            self.buffer.len()
        );
        self.buffer.clear();
        self.input_processor.reset();
        self.send(PlatformEvent::ContactsLost);
    }

    fn handle_touch(&mut self, touch: &Touch) {
        let record = self.input_processor.process_touch(
            touch.id,
            touch.phase,
            touch.location.x,
            touch.location.y,
            self.clock.elapsed(),
        );
        self.buffer_input(record);
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler<HostRequest> for Platform {
    /// Creates the window and announces the surface.
    ///
    /// On mobile this runs again after every suspend; the render side
    /// treats repeated surface announcements as resizes only.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists");
            return;
        }

        let (width, height) = self.settings.initial_size;
        let attrs = WindowAttributes::default()
            .with_title(self.settings.title.clone())
            .with_inner_size(LogicalSize::new(width, height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                let size = window.inner_size();
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    size.width,
                    size.height,
                    window.scale_factor()
                );

                self.send(PlatformEvent::SurfaceCreated {
                    storage_path: self.settings.storage_path.clone(),
                });
                self.send_resize(size);

                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.send(PlatformEvent::SurfaceDestroyed);
                event_loop.exit();
            }
        }
    }

    /// Drops the window; contacts in flight are lost with the surface.
    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        info!(target: "platform", "Suspended, releasing window");
        self.window = None;
        self.lose_contacts();
    }

    /// Render thread asked for another frame.
    fn user_event(&mut self, _event_loop: &ActiveEventLoop, request: HostRequest) {
        match request {
            HostRequest::Frame => self.request_redraw(),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.send(PlatformEvent::SurfaceDestroyed);
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                self.send_resize(*size);
                self.request_redraw();
            }

            WindowEvent::Touch(touch) => self.handle_touch(touch),

            WindowEvent::CursorMoved { position, .. } => {
                let record =
                    self.input_processor
                        .process_cursor_moved(position.x, position.y, self.clock.elapsed());
                self.buffer_input(record);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let record =
                    self.input_processor
                        .process_mouse_button(*button, *state, self.clock.elapsed());
                self.buffer_input(record);
            }

            WindowEvent::RedrawRequested => {
                self.flush_frame();

                if self.settings.render_mode == RenderMode::Continuous {
                    self.request_redraw();
                }
            }

            _ => {
                // Focus, keyboard, theme: not part of the pointer pipeline
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
