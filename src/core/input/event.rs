//=========================================================================
// Pointer Event Types
//
// Defines the internal representation of low-level pointer input.
//
// This module abstracts platform-specific input (e.g. Winit) into a
// unified, engine-friendly format consumed by the gesture recognizer.
//
// Responsibilities:
// - Represent mouse buttons and presses in a stable, portable way
// - Carry the cursor position with every press/release
// - Provide equality and hashing semantics for deduplication
// - Enable event coalescing (e.g., multiple MouseMoved → last position)
//
// Event Flow:
// ```text
// Platform Layer (Winit)
//         ↓
//    InputEvent (this module)
//         ↓
//    GestureRecognizer (per-button state machine)
//         ↓
//    Click / DoubleClick / LongClick messages
// ```
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::hash::{Hash, Hasher};

//=== Internal Dependencies ===============================================

use crate::core::spatial::Point;

//=== MouseButton =========================================================

/// Physical mouse button identifier.
///
/// Abstracts platform-specific button representations into a stable,
/// portable enum. Each variant owns one click-tracking slot in the
/// gesture recognizer, indexed by [`MouseButton::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Secondary button (typically right).
    Right,

    /// Middle button (wheel click).
    Middle,

    /// Thumb button, usually "back".
    Back,

    /// Thumb button, usually "forward".
    Forward,
}

impl MouseButton {
    /// Number of distinct buttons.
    pub const COUNT: usize = 5;

    /// Every button, in slot order.
    pub const ALL: [MouseButton; Self::COUNT] = [
        Self::Left,
        Self::Right,
        Self::Middle,
        Self::Back,
        Self::Forward,
    ];

    /// Dense index in `0..COUNT`.
    pub const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
            Self::Middle => 2,
            Self::Back => 3,
            Self::Forward => 4,
        }
    }
}

//=== InputEvent ==========================================================

/// Low-level pointer event from the platform layer.
///
/// # Equality & Hashing Semantics
///
/// Button events compare by type, button and position. `MouseMoved`
/// events are equal regardless of coordinates, allowing efficient
/// coalescing (last position wins).
///
/// ```text
/// Equality Rules:
/// Down{Left, (1,1)} == Down{Left, (1,1)}     ✓
/// Down{Left, (1,1)} == Down{Left, (2,2)}     ✗ (different position)
/// Down{Left, ..}    == Up{Left, ..}          ✗ (different type)
/// MouseMoved{...}   == MouseMoved{...}       ✓ (always equal)
/// ```
#[derive(Debug, Clone, Copy)]
pub enum InputEvent {
    /// Mouse button pressed at `position`.
    MouseButtonDown { button: MouseButton, position: Point },

    /// Mouse button released at `position`.
    MouseButtonUp { button: MouseButton, position: Point },

    /// Mouse cursor moved to a new position.
    ///
    /// Coordinates are in window space (pixels, top-left origin).
    MouseMoved { position: Point },
}

//--- Trait Implementations -----------------------------------------------

impl PartialEq for InputEvent {
    fn eq(&self, other: &Self) -> bool {
        use InputEvent::*;
        match (self, other) {
            (
                MouseButtonDown { button: a, position: pa },
                MouseButtonDown { button: b, position: pb },
            ) => a == b && pa == pb,
            (
                MouseButtonUp { button: a, position: pa },
                MouseButtonUp { button: b, position: pb },
            ) => a == b && pa == pb,
            // MouseMoved: coordinates ignored, always equal
            (MouseMoved { .. }, MouseMoved { .. }) => true,
            _ => false,
        }
    }
}

impl Eq for InputEvent {}

/// Hashes discriminant + button + position. Coordinates are NOT hashed
/// for `MouseMoved` (consistent with equality).
impl Hash for InputEvent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);

        match self {
            Self::MouseButtonDown { button, position }
            | Self::MouseButtonUp { button, position } => {
                button.hash(state);
                position.hash(state);
            }
            Self::MouseMoved { .. } => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    //--- Test Helpers -----------------------------------------------------

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    fn mouse_down(button: MouseButton, x: i32, y: i32) -> InputEvent {
        InputEvent::MouseButtonDown {
            button,
            position: Point::new(x, y),
        }
    }

    fn mouse_up(button: MouseButton, x: i32, y: i32) -> InputEvent {
        InputEvent::MouseButtonUp {
            button,
            position: Point::new(x, y),
        }
    }

    fn mouse_move(x: i32, y: i32) -> InputEvent {
        InputEvent::MouseMoved {
            position: Point::new(x, y),
        }
    }

    //=====================================================================
    // MouseButton
    //=====================================================================

    #[test]
    fn button_indices_are_dense() {
        for (i, button) in MouseButton::ALL.iter().enumerate() {
            assert_eq!(button.index(), i);
        }
    }

    //=====================================================================
    // Equality
    //=====================================================================

    #[test]
    fn equality_same_button_same_position() {
        assert_eq!(
            mouse_down(MouseButton::Left, 4, 4),
            mouse_down(MouseButton::Left, 4, 4)
        );
    }

    #[test]
    fn equality_position_matters_for_buttons() {
        assert_ne!(
            mouse_down(MouseButton::Left, 4, 4),
            mouse_down(MouseButton::Left, 5, 4)
        );
    }

    #[test]
    fn equality_different_discriminant() {
        assert_ne!(
            mouse_down(MouseButton::Left, 0, 0),
            mouse_up(MouseButton::Left, 0, 0)
        );
    }

    #[test]
    fn equality_different_buttons() {
        assert_ne!(
            mouse_up(MouseButton::Left, 0, 0),
            mouse_up(MouseButton::Right, 0, 0)
        );
    }

    /// MouseMoved ignores coordinates (always equal).
    #[test]
    fn equality_mousemoved_ignores_coordinates() {
        assert_eq!(mouse_move(10, 10), mouse_move(200, 300));
    }

    //=====================================================================
    // Hashing
    //=====================================================================

    #[test]
    fn hash_mousemoved_stable() {
        assert_eq!(hash_of(&mouse_move(1, 2)), hash_of(&mouse_move(300, 400)));
    }

    #[test]
    fn hash_different_buttons() {
        assert_ne!(
            hash_of(&mouse_down(MouseButton::Left, 0, 0)),
            hash_of(&mouse_down(MouseButton::Middle, 0, 0))
        );
    }

    /// a == b → hash(a) == hash(b).
    #[test]
    fn hash_equality_contract() {
        let a = mouse_up(MouseButton::Back, 7, 9);
        let b = mouse_up(MouseButton::Back, 7, 9);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }
}
