//=========================================================================
// Sweeper Engine: Library Root
//
// Event-routing core for a minesweeper game: pointer input goes in, typed
// messages come out at the element under the cursor.
//
// Responsibilities:
// - Expose the engine facade (`EngineBuilder`, `Engine`)
// - Expose the core systems (spatial index, message bus, gestures) for
//   game code to enrol elements and subscribe handlers
// - Keep the Winit integration (`platform`) hidden from end users
//
// Typical usage:
// ```no_run
// use sweeper_engine::EngineBuilder;
//
// fn main() {
//     EngineBuilder::new().build().run();
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the engine systems: ids, spatial index, message bus,
// gesture recognition. It is public so game code can use the systems
// directly and drive them in tests without a window.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` contains the window and Winit event loop and is kept private.
//
// `engine` defines the main engine entry point and initialization logic.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------
pub use engine::{Engine, EngineBuilder};
