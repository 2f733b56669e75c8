//=========================================================================
// Touch Bridge — Library Root
//
// Touch and pointer input normalization, gesture recognition and kinetic
// scrolling in front of an external rendering core.
//
// Responsibilities:
// - Expose the runtime facade (`Bridge`, `BridgeBuilder`)
// - Expose the render-side building blocks (`core`) so other hosts can
//   drive a `RenderCoordinator` directly
// - Keep the winit host (`platform`) hidden from end users
//
// Typical usage:
// ```no_run
// use touch_bridge::BridgeBuilder;
// use touch_bridge::core::sink::LogSink;
//
// fn main() {
//     let _ = BridgeBuilder::new().build(LogSink::new()).run();
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains everything that runs on the render thread: the sink
// contract, pointer normalization, gesture recognition, kinetic scrolling
// and the coordinator sequencing them.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` contains the winit host (window, event loop, input
// conversion) and is kept private.
//
// `bridge` wires the host and the render thread together.
//
mod bridge;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use bridge::{Bridge, BridgeBuilder};
pub use platform::RenderMode;
