//=========================================================================
// Global Engine State
//=========================================================================
//
// Systems handed to application code at initialization and driven by the
// orchestrator every tick.
//
// Architecture:
//   GlobalSystems: InputSystem + Arc<MessageBus> + Arc<IdGenerator>
//
//=========================================================================

//=== Module Declarations =================================================

mod global_systems;

//=== Public API ==========================================================

pub use global_systems::GlobalSystems;
