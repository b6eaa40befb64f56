//=========================================================================
// Input Processor
//=========================================================================
//
// Converts platform-specific Winit events into engine InputEvents.
//
// Architecture:
//   Winit Events → InputProcessor → InputEvent (engine type) → InputBuffer
//
// Stateful cursor tracking: Winit reports button presses without a
// position, so the last CursorMoved position is cached and stamped onto
// every press and release. Unsupported buttons (Other(n)) are filtered
// (returns None).
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::event::{ElementState, MouseButton as WinitMouseButton};

//=== Internal Dependencies ===============================================

use crate::core::input::event::{InputEvent, MouseButton};
use crate::core::spatial::Point;

//=== InputProcessor ======================================================

/// Converts Winit events to engine InputEvents with cursor tracking.
pub(crate) struct InputProcessor {
    cursor: Point,
}

impl InputProcessor {
    //--- Construction -----------------------------------------------------
    pub(crate) fn new() -> Self {
        Self {
            cursor: Point::default(),
        }
    }

    //--- Cursor State -----------------------------------------------------

    #[cfg(test)]
    pub(crate) fn cursor(&self) -> Point {
        self.cursor
    }

    //--- Event Processing -------------------------------------------------

    /// Records the cursor position (logical pixels) and returns the move
    /// event for it.
    pub(crate) fn process_mouse_move(&mut self, x: f64, y: f64) -> InputEvent {
        self.cursor = Point::new(x.floor() as i32, y.floor() as i32);
        InputEvent::MouseMoved {
            position: self.cursor,
        }
    }

    /// Converts a Winit mouse button event, stamped with the cursor
    /// position. Returns `None` for buttons the engine does not track.
    pub(crate) fn process_mouse_button(
        &self,
        button: WinitMouseButton,
        state: ElementState,
    ) -> Option<InputEvent> {
        let button = map_mouse_button(button)?;
        let position = self.cursor;
        Some(match state {
            ElementState::Pressed => InputEvent::MouseButtonDown { button, position },
            ElementState::Released => InputEvent::MouseButtonUp { button, position },
        })
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Maps Winit mouse buttons to engine buttons.
///
/// Left/Right/Middle/Back/Forward map directly; `Other(n)` has no slot.
fn map_mouse_button(button: WinitMouseButton) -> Option<MouseButton> {
    match button {
        WinitMouseButton::Left => Some(MouseButton::Left),
        WinitMouseButton::Right => Some(MouseButton::Right),
        WinitMouseButton::Middle => Some(MouseButton::Middle),
        WinitMouseButton::Back => Some(MouseButton::Back),
        WinitMouseButton::Forward => Some(MouseButton::Forward),
        WinitMouseButton::Other(_) => None,
    }
}

//=========================================================================
// Tests
//=========================================================================
