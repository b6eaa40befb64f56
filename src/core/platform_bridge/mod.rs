//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges the windowing layer (winit) with core systems.
//
// This module defines the contract between the platform implementation
// and core logic, so the windowing backend can change without touching
// the input system or the message bus.
//
// Components:
// - `interface`: Event types and error definitions (the contract)
// - `event_collector`: Core-side event collection and buffering
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod interface;

//=== Internal API ========================================================

pub(crate) use event_collector::{EventCollector, TickControl};
pub(crate) use interface::{PlatformError, PlatformEvent};
