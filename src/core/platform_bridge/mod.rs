//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges the host layer (winit or any embedding host) with the render
// thread.
//
// This module defines the contract between host implementations and the
// render-side coordinator. A different host feeds the same coordinator by
// passing `PlatformEvent`s to `RenderCoordinator::handle_event`.
//
// Components:
// - `interface`: Events, frame requests and error definitions (the contract)
// - `event_collector`: Render-side event collection
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub mod interface;

//=== Internal API ========================================================

pub(crate) use event_collector::EventCollector;
pub use event_collector::TickControl;
pub use interface::{FrameRequester, PlatformError, PlatformEvent};
