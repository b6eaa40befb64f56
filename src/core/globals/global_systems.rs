//=========================================================================
// Global Systems
//=========================================================================
//
// Container for engine-level systems.
//
// The input system is owned here and only ever touched by the driving
// thread. The bus and the id generator are shared: handlers registered on
// the bus capture clones of them to publish or mint ids of their own.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

//=== Internal Dependencies ===============================================

use crate::core::id::IdGenerator;
use crate::core::input::clock::{Clock, SystemClock};
use crate::core::input::event::InputEvent;
use crate::core::input::gesture::GestureConfig;
use crate::core::input::InputSystem;
use crate::core::message_bus::MessageBus;
use crate::core::spatial::Bounds;

//=== GlobalSystems =======================================================

/// Container for engine-level logic systems.
///
/// # Available Systems
///
/// - `input`: Hit-testing, gesture recognition and gesture publication
/// - `bus`: Publish/subscribe routing for every message
/// - `ids`: Source of element identifiers
pub struct GlobalSystems<C: Clock = SystemClock> {
    /// Enrol elements here to receive Click / DoubleClick / LongClick.
    pub input: InputSystem<C>,

    /// Subscribe handlers here, under the same id used for enrolment.
    pub bus: Arc<MessageBus>,

    /// Mint element ids here so they never collide.
    pub ids: Arc<IdGenerator>,
}

impl<C: Clock> GlobalSystems<C> {
    /// Creates the systems around a fresh bus and id generator.
    ///
    /// This is typically called internally by the engine. Users should access
    /// systems via [`crate::Engine::init`] instead.
    pub fn new(world: Bounds, clock: C, config: GestureConfig) -> Self {
        let bus = Arc::new(MessageBus::new());
        Self {
            input: InputSystem::new(world, Arc::clone(&bus), clock, config),
            bus,
            ids: Arc::new(IdGenerator::new()),
        }
    }

    //--- Update Loop ------------------------------------------------------

    /// Runs one tick of input processing and message delivery.
    ///
    /// # Processing Pipeline
    ///
    /// 1. **Input**: Feed the frame's raw events to the input system,
    ///    which publishes completed gestures and confirms single clicks
    ///    whose window has elapsed
    /// 2. **Delivery**: Drain the bus into subscribed handlers
    ///
    /// Returns the number of delivered messages.
    pub(crate) fn update(&mut self, batches: &[Vec<InputEvent>]) -> usize {
        self.input.update(batches);
        self.bus.drain()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
