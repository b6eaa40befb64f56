//=========================================================================
// Message Bus
//
// Publish/subscribe routing between the input system, game logic and the
// application shell.
//
// Responsibilities:
// - Address messages to one recipient (send) or to every subscriber of a
//   message kind (broadcast)
// - Queue messages per recipient until the driving thread drains them
// - Deliver without holding any bus lock, so handlers may publish
//
//=========================================================================

//=== Submodules ==========================================================
mod mailbox;
mod message;
mod bus;

//=== Public API ==========================================================
pub use message::{Message, MessageKind, PointerGesture};
pub use bus::{Handler, MessageBus};
