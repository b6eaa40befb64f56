//=========================================================================
// Input Buffer
//
// Collects pointer events between two frame boundaries, split into two
// categories: discrete and continuous.
//
// Responsibilities:
// - Keep presses and releases in arrival order
// - Drop an exact repeat of the previous discrete event
// - Coalesce continuous inputs (MouseMoved: last position wins)
// - Hand both sets to the platform via `drain()`
//
// Notes:
// The buffer lives for one frame and is emptied when flushed to the
// core thread on RedrawRequested.
//=========================================================================

//=== Standard Library Imports ============================================
use std::collections::HashSet;

//=== Internal Modules ====================================================
use crate::core::input::event::InputEvent;

//=== InputBuffer Struct ==================================================
//
// Internally maintains:
// - `discrete`: one-shot inputs (button down / up), order significant
// - `continuous`: last-known state of continuous inputs (MouseMoved)
//
pub(crate) struct InputBuffer {
    discrete: Vec<InputEvent>,
    continuous: HashSet<InputEvent>,
}

impl InputBuffer {
    //--- Construction -----------------------------------------------------
    pub(crate) fn new() -> Self {
        const DISCRETE_BASE: usize = 32;
        const CONTINUOUS_BASE: usize = 4;

        Self {
            discrete: Vec::with_capacity(DISCRETE_BASE),
            continuous: HashSet::with_capacity(CONTINUOUS_BASE),
        }
    }

    //--- Continuous Event Handling ---------------------------------------
    //
    // Inserts or replaces a continuous input. Equality ignores the
    // coordinates, so the latest position always replaces the previous one.
    //
    pub(crate) fn push_continuous(&mut self, event: InputEvent) {
        self.continuous.replace(event);
    }

    //--- Discrete Event Handling -----------------------------------------
    //
    // Appends a discrete input. An event identical to the last one (same
    // button, same position) is a platform repeat and is ignored.
    //
    pub(crate) fn push_discrete(&mut self, event: InputEvent) {
        if self.discrete.last() != Some(&event) {
            self.discrete.push(event);
        }
    }

    //--- Drain ------------------------------------------------------------
    //
    // Returns the frame's events and empties the buffer, or `None` when
    // nothing was collected.
    //
    pub(crate) fn drain(&mut self) -> Option<(Vec<InputEvent>, Vec<InputEvent>)> {
        if self.is_empty() {
            return None;
        }
        let discrete = std::mem::take(&mut self.discrete);
        let continuous = self.continuous.drain().collect();
        Some((discrete, continuous))
    }

    //--- Utilities --------------------------------------------------------
    pub(crate) fn is_empty(&self) -> bool {
        self.discrete.is_empty() && self.continuous.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
