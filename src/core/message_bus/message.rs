//=========================================================================
// Messages
//=========================================================================
//
// Closed set of messages routed through the MessageBus.
//
// Pointer gestures carry where they happened and which button produced
// them. Game-state messages carry no payload; the game shell and board
// logic react to the kind alone.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::event::MouseButton;
use crate::core::spatial::Point;

//=== PointerGesture ======================================================

/// Payload shared by the three pointer gesture messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerGesture {
    /// Position of the press that started the gesture.
    pub position: Point,

    /// Button that produced the gesture.
    pub button: MouseButton,
}

//=== Message =============================================================

/// A message delivered to subscribed handlers.
///
/// Immutable once constructed; a broadcast shares one allocation between
/// every recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Press and release, no second press within the click-confirm timeout.
    Click(PointerGesture),

    /// Two press/release pairs on the same element within the timeout.
    DoubleClick(PointerGesture),

    /// Press held longer than the long-press threshold.
    LongClick(PointerGesture),

    /// A new round started.
    GameStart,

    /// A mine was revealed.
    GameOver,

    /// Every safe cell was revealed.
    GameWon,

    /// The board should be rebuilt.
    GameReset,

    /// The application should shut down.
    Quit,
}

impl Message {
    /// Returns the payload-free tag of this message.
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Click(_) => MessageKind::Click,
            Self::DoubleClick(_) => MessageKind::DoubleClick,
            Self::LongClick(_) => MessageKind::LongClick,
            Self::GameStart => MessageKind::GameStart,
            Self::GameOver => MessageKind::GameOver,
            Self::GameWon => MessageKind::GameWon,
            Self::GameReset => MessageKind::GameReset,
            Self::Quit => MessageKind::Quit,
        }
    }

    /// Returns the gesture payload for pointer messages.
    pub fn gesture(&self) -> Option<&PointerGesture> {
        match self {
            Self::Click(g) | Self::DoubleClick(g) | Self::LongClick(g) => Some(g),
            _ => None,
        }
    }
}

//=== MessageKind =========================================================

/// Tag identifying a [`Message`] variant, used for broadcast fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Click,
    DoubleClick,
    LongClick,
    GameStart,
    GameOver,
    GameWon,
    GameReset,
    Quit,
}

//=========================================================================
// Unit Tests
//=========================================================================
