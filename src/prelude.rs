//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use touch_bridge::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Runtime
pub use crate::{Bridge, BridgeBuilder, RenderMode};

// Core contract
pub use crate::core::sink::{CoreEventSink, LogSink, SinkCall, TraceSink};
pub use crate::core::RenderCoordinator;

// Input
pub use crate::core::input::{Gesture, GestureConfig, InputRecord, MotionAction, MotionRecord, PointerId};

// Kinetic scrolling
pub use crate::core::kinetic::{DecayConfig, KineticScroller};

// Host contract
pub use crate::core::platform_bridge::{FrameRequester, PlatformError, PlatformEvent, TickControl};
