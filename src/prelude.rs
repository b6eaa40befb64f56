//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use sweeper_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::engine::{Engine, EngineBuilder};

// Global systems and identifiers
pub use crate::core::globals::GlobalSystems;
pub use crate::core::id::{ElementId, IdGenerator};

// Spatial index
pub use crate::core::spatial::{Bounds, Interactive, Point, SpatialIndex};

// Message bus
pub use crate::core::message_bus::{Message, MessageBus, MessageKind, PointerGesture};

// Input system
pub use crate::core::input::clock::{Clock, ManualClock, SystemClock};
pub use crate::core::input::event::{InputEvent, MouseButton};
pub use crate::core::input::gesture::{GestureConfig, GestureKind};
