//=========================================================================
// Touch Bridge
//
// Main entry point: wires a host window to a core through the render
// thread.
//
// Architecture:
// ```text
//     BridgeBuilder  ──build(sink)──>  Bridge  ──run()──>  [Runtime]
//         │                              │
//         ├─ with_channel_capacity()     ├─ spawns render thread
//         ├─ with_render_mode()          ├─ runs platform
//         └─ with_gesture_config() ...   └─ blocks until exit
// ```
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::path::PathBuf;

//=== External Dependencies ===============================================

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{error, info};
use winit::event_loop::EventLoop;

//=== Internal Dependencies ===============================================

use crate::core::input::gesture::GestureConfig;
use crate::core::kinetic::DecayConfig;
use crate::core::platform_bridge::{PlatformError, PlatformEvent};
use crate::core::sink::CoreEventSink;
use crate::core::{spawn_render_thread, RenderCoordinator};
use crate::platform::{HostRequest, Platform, PlatformSettings, ProxyRequester, RenderMode};

//=== BridgeBuilder =======================================================

/// Builder for configuring and constructing a [`Bridge`].
///
/// # Default Values
///
/// - **Channel capacity**: 128 events
/// - **Render mode**: [`RenderMode::Continuous`]
/// - **Window**: "Touch Bridge", 800x600 logical pixels
/// - **Gestures / decay**: Android defaults
///
/// # Examples
///
/// ```no_run
/// use touch_bridge::BridgeBuilder;
/// use touch_bridge::core::sink::LogSink;
///
/// BridgeBuilder::new()
///     .with_storage_path("/tmp/app")
///     .build(LogSink::new())
///     .run()
///     .expect("bridge failed");
/// ```
#[derive(Debug, Clone)]
pub struct BridgeBuilder {
    channel_capacity: usize,
    storage_path: PathBuf,
    settings: PlatformSettings,
    gesture_config: GestureConfig,
    decay_config: DecayConfig,
}

impl BridgeBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            channel_capacity: 128,
            storage_path: PathBuf::new(),
            settings: PlatformSettings::default(),
            gesture_config: GestureConfig::default(),
            decay_config: DecayConfig::default(),
        }
    }

    /// Sets the channel capacity for host → render communication.
    ///
    /// A full channel blocks the UI thread until the render thread catches
    /// up; intents are never dropped.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Directory handed to the core's `init`.
    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = path.into();
        self
    }

    pub fn with_render_mode(mut self, mode: RenderMode) -> Self {
        self.settings.render_mode = mode;
        self
    }

    pub fn with_window_title(mut self, title: impl Into<String>) -> Self {
        self.settings.title = title.into();
        self
    }

    /// Sets the initial window size in logical pixels.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        assert!(
            width > 0 && height > 0,
            "Window size must be positive, got {}x{}",
            width,
            height
        );
        self.settings.initial_size = (width, height);
        self
    }

    /// Overrides gesture thresholds and timeouts.
    ///
    /// # Panics
    ///
    /// Panics if the fling velocity bounds are inverted or the slop is
    /// negative.
    pub fn with_gesture_config(mut self, config: GestureConfig) -> Self {
        assert!(config.touch_slop >= 0.0, "Touch slop must not be negative, got {}", config.touch_slop);
        assert!(
            config.min_fling_velocity <= config.max_fling_velocity,
            "Fling velocity bounds inverted: {} > {}",
            config.min_fling_velocity,
            config.max_fling_velocity
        );
        self.gesture_config = config;
        self
    }

    /// Overrides the kinetic decay model.
    ///
    /// # Panics
    ///
    /// Panics if friction or density is not positive.
    pub fn with_decay_config(mut self, config: DecayConfig) -> Self {
        assert!(config.friction > 0.0, "Friction must be positive, got {}", config.friction);
        assert!(config.density > 0.0, "Density must be positive, got {}", config.density);
        self.decay_config = config;
        self
    }

    /// Builds the bridge around the core's event sink.
    pub fn build<S: CoreEventSink + 'static>(mut self, sink: S) -> Bridge<S> {
        self.settings.storage_path = self.storage_path.to_string_lossy().into_owned();

        info!(
            "Building bridge (channel: {}, mode: {:?}, storage: {:?})",
            self.channel_capacity, self.settings.render_mode, self.settings.storage_path
        );

        Bridge {
            sink,
            channel_capacity: self.channel_capacity,
            settings: self.settings,
            gesture_config: self.gesture_config,
            decay_config: self.decay_config,
        }
    }
}

impl Default for BridgeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Bridge ==============================================================

/// Touch bridge runtime.
///
/// # Architecture
///
/// ```text
/// Bridge (Main Thread)
///   ├─► RenderCoordinator (Render Thread)
///   │     └─► KineticScroller, PointerNormalizer, GestureClassifier, Sink
///   │
///   └─► Platform (Event Loop)
///         └─► Window, Touch/Mouse Input
///
/// Communication: bounded channel (PlatformEvent) + EventLoopProxy (frames)
/// ```
pub struct Bridge<S: CoreEventSink + 'static> {
    sink: S,
    channel_capacity: usize,
    settings: PlatformSettings,
    gesture_config: GestureConfig,
    decay_config: DecayConfig,
}

impl<S: CoreEventSink + 'static> Bridge<S> {
    /// Starts the runtime and blocks until the window closes.
    ///
    /// # Lifecycle
    ///
    /// 1. Creates the winit event loop and its frame-request proxy
    /// 2. Creates the bounded host → render channel
    /// 3. Spawns the render thread owning the sink
    /// 4. Runs the platform event loop (blocks here)
    /// 5. On close: `SurfaceDestroyed` → render thread exits → joined
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails while running.
    pub fn run(self) -> Result<(), PlatformError> {
        info!("Starting bridge runtime");

        //--- 1. Create the event loop ------------------------------------
        let event_loop = EventLoop::<HostRequest>::with_user_event()
            .build()
            .map_err(|e| PlatformError::EventLoopCreation(e.to_string()))?;
        let requester = ProxyRequester::new(event_loop.create_proxy(), self.settings.render_mode);

        //--- 2. Create communication channel -----------------------------
        let (tx, rx): (Sender<PlatformEvent>, Receiver<PlatformEvent>) =
            bounded(self.channel_capacity);

        info!("Channel created (capacity: {})", self.channel_capacity);

        //--- 3. Spawn the render thread -----------------------------------
        let coordinator = RenderCoordinator::new(
            self.sink,
            Box::new(requester),
            self.gesture_config,
            self.decay_config,
        );
        let render_handle = spawn_render_thread(coordinator, rx);
        info!("Render thread spawned");

        //--- 4. Launch the platform subsystem -----------------------------
        let platform = Platform::new(tx, self.settings);
        info!("Platform initialized, entering event loop");

        let result = platform.run(event_loop);
        if let Err(e) = &result {
            error!("Platform error: {}", e);
        }

        info!("Platform event loop exited");

        //--- 5. Cleanup: wait for the render thread -----------------------
        match render_handle.join() {
            Ok(_sink) => {
                info!("Render thread terminated cleanly");
            }
            Err(e) => {
                error!("Render thread panicked: {:?}", e);
            }
        }

        info!("Bridge shutdown complete");
        result
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
