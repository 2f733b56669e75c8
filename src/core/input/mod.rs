//=========================================================================
// Input Module
//=========================================================================
//
// Render-side input translation: raw records in, normalized pointer and
// gesture calls out.
//
// Architecture:
// ```text
//  InputRecord ──┬──> PointerNormalizer ──> pointer_down/move/up
//                └──> GestureClassifier ──> Gesture (scroll, fling,
//                                           long-press, ...)
// ```
//
//=========================================================================

//=== Module Declarations =================================================

pub mod event;
pub mod gesture;
pub mod normalizer;

//=== Public API ==========================================================

pub use event::{InputRecord, MotionAction, MotionRecord, MouseAction, MouseRecord, PointerId, PointerSample};
pub use gesture::{Gesture, GestureClassifier, GestureConfig};
pub use normalizer::{Pointer, PointerNormalizer};
