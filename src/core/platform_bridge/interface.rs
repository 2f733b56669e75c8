//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Platform-to-core interface types (events, errors, frame requests).
//
// Defines the contract between the host UI thread and the render thread.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::time::Duration;

//=== Internal Dependencies ===============================================

use crate::core::input::event::InputRecord;

//=== PlatformEvent =======================================================

/// Intents sent from the host UI thread to the render thread.
///
/// The UI thread never touches pointers or scroll state; it only enqueues
/// these and the render thread applies them in order.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    /// Rendering surface became available.
    SurfaceCreated { storage_path: String },

    /// Rendering surface changed size (pixels).
    SurfaceResized { width: i32, height: i32 },

    /// Host frame callback, carrying input buffered since the last frame.
    Frame {
        frame_time: Duration,
        inputs: Vec<InputRecord>,
    },

    /// The host lost its contacts without reporting their ups (app
    /// suspended, window lost focus mid-gesture).
    ContactsLost,

    /// Surface torn down; the render thread should stop.
    SurfaceDestroyed,
}

//=== FrameRequester ======================================================

/// Handle through which the render thread asks the host for another frame.
///
/// Replaces any global "current surface" lookup: whoever needs to request
/// a redraw is handed one of these explicitly.
pub trait FrameRequester: Send {
    fn request_frame(&self);
}

impl<F> FrameRequester for F
where
    F: Fn() + Send,
{
    fn request_frame(&self) {
        self()
    }
}

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
#[derive(Debug)]
pub enum PlatformError {
    /// Event loop creation failed (OS-level issue).
    EventLoopCreation(String),

    /// Event loop execution error.
    EventLoopExecution(String),
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EventLoopCreation(e) => write!(f, "Event loop creation failed: {}", e),
            Self::EventLoopExecution(e) => write!(f, "Event loop error: {}", e),
        }
    }
}

impl std::error::Error for PlatformError {}

//=========================================================================
// Unit Tests
//=========================================================================
