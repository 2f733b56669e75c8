//=========================================================================
// Input Record Types
//
// Defines the host-neutral representation of raw touch and mouse input.
//
// This module abstracts platform motion callbacks (winit touches, Android
// style motion events, desktop mouse buttons) into records the render
// thread can normalize without knowing where they came from.
//
// Responsibilities:
// - Represent multi-contact motion records (action + acting index + contacts)
// - Represent the single-pointer mouse path
// - Decode raw platform action codes, rejecting unknown ones
//
// Design:
// A `MotionRecord` mirrors what touch hosts actually deliver: every
// contact currently on the surface, in platform index order, plus one
// action describing what happened to the contact at `action_index`.
//
// Event Flow:
// ```text
// Platform Layer (Winit / host)
//         ↓
//    InputRecord (this module)
//         ↓
//    PointerNormalizer + GestureClassifier
//         ↓
//    CoreEventSink
// ```
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::fmt;
use std::time::Duration;

//=== PointerId ===========================================================

/// Identity of one contact, stable from its down until its up.
///
/// Ids are small non-negative integers assigned by the host and reused
/// once the contact is retired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub u32);

impl PointerId {
    /// Largest id a host may assign (matches Android's `MAX_POINTER_ID`).
    pub const MAX: PointerId = PointerId(31);

    /// Implicit id used by the single-pointer mouse path.
    pub const MOUSE: PointerId = PointerId(0);

    /// Returns true if the id lies in the accepted range.
    pub fn is_valid(self) -> bool {
        self <= Self::MAX
    }
}

impl fmt::Display for PointerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//=== MotionAction ========================================================

/// Recognized motion actions.
///
/// `Down`/`Up` begin and end the whole gesture (first and last contact),
/// `PointerDown`/`PointerUp` add or remove further contacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionAction {
    Down,
    Up,
    Move,
    PointerDown,
    PointerUp,
}

impl MotionAction {
    //--- Raw Codes --------------------------------------------------------

    /// Mask selecting the action from a packed action word.
    pub const ACTION_MASK: u32 = 0xff;

    pub const ACTION_DOWN: u32 = 0;
    pub const ACTION_UP: u32 = 1;
    pub const ACTION_MOVE: u32 = 2;
    pub const ACTION_CANCEL: u32 = 3;
    pub const ACTION_POINTER_DOWN: u32 = 5;
    pub const ACTION_POINTER_UP: u32 = 6;

    /// Decodes a raw action word. Codes outside the recognized set
    /// (including cancel) yield `None`.
    pub fn from_code(code: u32) -> Option<Self> {
        match code & Self::ACTION_MASK {
            Self::ACTION_DOWN => Some(Self::Down),
            Self::ACTION_UP => Some(Self::Up),
            Self::ACTION_MOVE => Some(Self::Move),
            Self::ACTION_POINTER_DOWN => Some(Self::PointerDown),
            Self::ACTION_POINTER_UP => Some(Self::PointerUp),
            _ => None,
        }
    }

    /// Raw code for this action.
    pub fn code(self) -> u32 {
        match self {
            Self::Down => Self::ACTION_DOWN,
            Self::Up => Self::ACTION_UP,
            Self::Move => Self::ACTION_MOVE,
            Self::PointerDown => Self::ACTION_POINTER_DOWN,
            Self::PointerUp => Self::ACTION_POINTER_UP,
        }
    }

    /// True for actions that put a new contact on the surface.
    pub fn is_down(self) -> bool {
        matches!(self, Self::Down | Self::PointerDown)
    }

    /// True for actions that lift a contact off the surface.
    pub fn is_up(self) -> bool {
        matches!(self, Self::Up | Self::PointerUp)
    }
}

//=== PointerSample =======================================================

/// One contact inside a motion record (surface-local pixels).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub id: PointerId,
    pub x: f32,
    pub y: f32,
}

impl PointerSample {
    pub fn new(id: PointerId, x: f32, y: f32) -> Self {
        Self { id, x, y }
    }
}

//=== MotionRecord ========================================================

/// A single platform touch record.
///
/// Holds every contact on the surface in platform index order. The action
/// applies to the contact at `action_index` (for moves, to all of them).
#[derive(Debug, Clone, PartialEq)]
pub struct MotionRecord {
    action_code: u32,
    action_index: usize,
    pointers: Vec<PointerSample>,
    event_time: Duration,
}

impl MotionRecord {
    //--- Construction -----------------------------------------------------

    /// Builds a record from a recognized action.
    pub fn new(
        action: MotionAction,
        action_index: usize,
        pointers: Vec<PointerSample>,
        event_time: Duration,
    ) -> Self {
        Self::from_raw(action.code(), action_index, pointers, event_time)
    }

    /// Builds a record from a raw platform action word (may be unknown).
    pub fn from_raw(
        action_code: u32,
        action_index: usize,
        pointers: Vec<PointerSample>,
        event_time: Duration,
    ) -> Self {
        Self {
            action_code,
            action_index,
            pointers,
            event_time,
        }
    }

    /// Convenience constructor for a record with exactly one contact.
    pub fn single(action: MotionAction, sample: PointerSample, event_time: Duration) -> Self {
        Self::new(action, 0, vec![sample], event_time)
    }

    //--- Accessors --------------------------------------------------------

    /// Decoded action, `None` for unrecognized codes.
    pub fn action(&self) -> Option<MotionAction> {
        MotionAction::from_code(self.action_code)
    }

    pub fn action_code(&self) -> u32 {
        self.action_code
    }

    pub fn action_index(&self) -> usize {
        self.action_index
    }

    pub fn pointers(&self) -> &[PointerSample] {
        &self.pointers
    }

    /// The contact the action applies to, if the index is in range.
    pub fn acting_pointer(&self) -> Option<&PointerSample> {
        self.pointers.get(self.action_index)
    }

    /// Finds a contact by id.
    pub fn pointer_by_id(&self, id: PointerId) -> Option<&PointerSample> {
        self.pointers.iter().find(|p| p.id == id)
    }

    pub fn event_time(&self) -> Duration {
        self.event_time
    }
}

//=== Mouse Path ==========================================================

/// Actions of the single-pointer mouse path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseAction {
    Down,
    Move,
    Up,
}

/// A mouse-style record: no explicit id, always [`PointerId::MOUSE`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseRecord {
    pub action: MouseAction,
    pub x: f32,
    pub y: f32,
    pub event_time: Duration,
}

impl MouseRecord {
    pub fn new(action: MouseAction, x: f32, y: f32, event_time: Duration) -> Self {
        Self {
            action,
            x,
            y,
            event_time,
        }
    }

    /// Re-expresses the record as a one-contact motion record so the
    /// gesture classifier can observe mouse drags too.
    pub fn to_motion(&self) -> MotionRecord {
        let action = match self.action {
            MouseAction::Down => MotionAction::Down,
            MouseAction::Move => MotionAction::Move,
            MouseAction::Up => MotionAction::Up,
        };
        MotionRecord::single(
            action,
            PointerSample::new(PointerId::MOUSE, self.x, self.y),
            self.event_time,
        )
    }
}

//=== InputRecord =========================================================

/// Any raw input record crossing from the host thread to the render thread.
#[derive(Debug, Clone, PartialEq)]
pub enum InputRecord {
    Touch(MotionRecord),
    Mouse(MouseRecord),
}

impl InputRecord {
    pub fn event_time(&self) -> Duration {
        match self {
            Self::Touch(record) => record.event_time(),
            Self::Mouse(record) => record.event_time,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
