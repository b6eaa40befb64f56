//=========================================================================
// Input System
//
// Turns raw pointer events into gestures addressed to UI elements.
//
// Responsibilities:
// - Own the spatial index used to resolve which element was pressed
// - Drive the gesture recognizer with every raw event of the frame
// - Filter gestures by per-element enrolment
// - Publish the surviving gestures through the message bus
//
// Notes:
// This system is owned and updated by the CoreSystemsOrchestrator on the
// driving thread, so the index needs no lock. Publication is a plain
// `send`; delivery happens when the orchestrator drains the bus.
//
//=========================================================================

//=== Submodules ==========================================================
pub mod clock;
pub mod event;
pub mod gesture;

//=== Internal Imports ====================================================
use crate::core::id::ElementId;
use crate::core::message_bus::MessageBus;
use crate::core::spatial::{Bounds, Interactive, SpatialIndex};
use clock::{Clock, SystemClock};
use event::{InputEvent, MouseButton};
use gesture::{Gesture, GestureConfig, GestureKind, GestureRecognizer};

//=== External Crates =====================================================
use log::{debug, trace};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

//=== InputSystem =========================================================
//
// Public-facing API for enrolling elements and feeding pointer input.
//
pub struct InputSystem<C: Clock = SystemClock> {
    index: SpatialIndex,
    recognizer: GestureRecognizer<C>,
    enrolled: HashMap<GestureKind, HashSet<ElementId>>,
    bus: Arc<MessageBus>,
    scratch: Vec<Gesture>,
}

impl<C: Clock> InputSystem<C> {
    //--- Construction -----------------------------------------------------
    pub fn new(world: Bounds, bus: Arc<MessageBus>, clock: C, config: GestureConfig) -> Self {
        Self {
            index: SpatialIndex::new(world),
            recognizer: GestureRecognizer::new(config, clock),
            enrolled: HashMap::new(),
            bus,
            scratch: Vec::with_capacity(MouseButton::COUNT),
        }
    }

    //--- Enrolment --------------------------------------------------------

    /// Makes `element` hit-testable and enrols it for every gesture kind.
    pub fn enrol(&mut self, element: &impl Interactive) {
        self.enrol_for(element, &GestureKind::ALL);
    }

    /// Makes `element` hit-testable and enrols it for `kinds` only.
    ///
    /// Re-enrolling updates the element's rectangle and adds kinds; it never
    /// removes existing enrolments.
    pub fn enrol_for(&mut self, element: &impl Interactive, kinds: &[GestureKind]) {
        let id = element.id();
        self.index.insert(id, element.bounds());
        for kind in kinds {
            self.enrolled.entry(*kind).or_default().insert(id);
        }
        debug!(target: "input", "Enrolled {} for {:?}", id, kinds);
    }

    /// Removes the element from hit-testing and every enrolment.
    ///
    /// Any gesture in progress on it is dropped. Returns `false` if the
    /// element was unknown.
    pub fn cancel(&mut self, id: ElementId) -> bool {
        let indexed = self.index.remove(id);
        let mut enrolled = false;
        for ids in self.enrolled.values_mut() {
            enrolled |= ids.remove(&id);
        }
        self.recognizer.forget(id);

        if indexed || enrolled {
            debug!(target: "input", "Cancelled {}", id);
        }
        indexed || enrolled
    }

    /// Withdraws one gesture kind; the element stays hit-testable.
    pub fn cancel_kind(&mut self, id: ElementId, kind: GestureKind) -> bool {
        self.enrolled
            .get_mut(&kind)
            .is_some_and(|ids| ids.remove(&id))
    }

    /// Returns `true` if `id` receives gestures of `kind`.
    pub fn is_enrolled(&self, id: ElementId, kind: GestureKind) -> bool {
        self.enrolled
            .get(&kind)
            .is_some_and(|ids| ids.contains(&id))
    }

    //--- update() ---------------------------------------------------------
    //
    // Consumes all input batches received during the current frame.
    // Timeouts are checked before every event so a slow frame cannot turn
    // two separate clicks into a double click.
    //
    pub fn update(&mut self, batches: &[Vec<InputEvent>]) {
        for event in batches.iter().flatten() {
            self.poll();
            trace!(target: "input", "Event {:?}", event);
            if let Some(gesture) = self.recognizer.handle(event, &self.index) {
                self.publish(gesture);
            }
        }
        self.poll();
    }

    /// Publishes single clicks whose confirmation window has elapsed.
    pub fn poll(&mut self) {
        let mut confirmed = std::mem::take(&mut self.scratch);
        self.recognizer.poll(&mut confirmed);
        for gesture in confirmed.drain(..) {
            self.publish(gesture);
        }
        self.scratch = confirmed;
    }

    fn publish(&self, gesture: Gesture) {
        if !self.is_enrolled(gesture.target, gesture.kind) {
            trace!(
                target: "input",
                "{:?} on {} ignored: not enrolled",
                gesture.kind, gesture.target
            );
            return;
        }

        debug!(
            target: "input",
            "{:?} {:?} on {} at ({}, {})",
            gesture.button, gesture.kind, gesture.target, gesture.position.x, gesture.position.y
        );
        self.bus.send(gesture.target, gesture.into_message());
    }

    //--- Query Methods ----------------------------------------------------

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    pub fn recognizer(&self) -> &GestureRecognizer<C> {
        &self.recognizer
    }

    pub fn bus(&self) -> &Arc<MessageBus> {
        &self.bus
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
