//=========================================================================
// Gesture Recognizer
//=========================================================================
//
// Per-button timing state machine turning press/release pairs into
// Click, DoubleClick and LongClick gestures.
//
// Architecture:
//   MouseButtonDown ──> SpatialIndex::query_point ──> ClickSlot[button]
//   MouseButtonUp   ──> ClickSlot[button] ──> LongClick | DoubleClick
//   poll()          ──> ClickSlot[button] ──> Click (after timeout)
//
// Slot lifecycle (one per button):
//
//   (none) ──press on element──> Pressed
//   Pressed ──release, held > long-press──> LongClick, (none)
//   Pressed ──release──> Released (clock restarted)
//   Released ──timeout, button up──> Click, (none)
//   Released ──press on same element──> Repressed (clock restarted)
//   Repressed ──release, held > long-press──> LongClick, (none)
//   Repressed ──release──> DoubleClick, (none)
//
//   Any press on another element replaces the slot with a fresh Pressed
//   one; a press over empty space clears it. A press at exactly the
//   recorded position only restarts the clock.
//
// All threshold comparisons are strict: elapsed > threshold.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, trace};
use std::time::{Duration, Instant};

//=== Internal Dependencies ===============================================

use super::clock::{Clock, SystemClock};
use super::event::{InputEvent, MouseButton};
use crate::core::id::ElementId;
use crate::core::message_bus::{Message, MessageKind, PointerGesture};
use crate::core::spatial::{Point, SpatialIndex};

//=== GestureConfig =======================================================

/// Gesture timing thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureConfig {
    /// Window after a release in which a second press turns the interaction
    /// into a double click (default: 120ms).
    pub click_timeout: Duration,

    /// Hold duration after which a release is a long click (default: 300ms).
    pub long_press_threshold: Duration,
}

impl GestureConfig {
    pub const DEFAULT_CLICK_TIMEOUT: Duration = Duration::from_millis(120);
    pub const DEFAULT_LONG_PRESS_THRESHOLD: Duration = Duration::from_millis(300);
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            click_timeout: Self::DEFAULT_CLICK_TIMEOUT,
            long_press_threshold: Self::DEFAULT_LONG_PRESS_THRESHOLD,
        }
    }
}

//=== GestureKind =========================================================

/// Classification of a completed interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureKind {
    Click,
    DoubleClick,
    LongClick,
}

impl GestureKind {
    pub const ALL: [GestureKind; 3] = [Self::Click, Self::DoubleClick, Self::LongClick];

    /// Bus tag of the message this gesture is published as.
    pub fn message_kind(self) -> MessageKind {
        match self {
            Self::Click => MessageKind::Click,
            Self::DoubleClick => MessageKind::DoubleClick,
            Self::LongClick => MessageKind::LongClick,
        }
    }
}

//=== Gesture =============================================================

/// A classified gesture addressed to the element it started on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gesture {
    pub kind: GestureKind,
    pub target: ElementId,

    /// Position of the press that opened the slot.
    pub position: Point,
    pub button: MouseButton,
}

impl Gesture {
    /// Converts into the bus message delivered to `target`.
    pub fn into_message(self) -> Message {
        let payload = PointerGesture {
            position: self.position,
            button: self.button,
        };
        match self.kind {
            GestureKind::Click => Message::Click(payload),
            GestureKind::DoubleClick => Message::DoubleClick(payload),
            GestureKind::LongClick => Message::LongClick(payload),
        }
    }
}

//=== ClickSlot ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    /// First press held.
    Pressed,

    /// Released once, waiting for a second press or the timeout.
    Released,

    /// Second press held.
    Repressed,
}

#[derive(Debug, Clone, Copy)]
struct ClickSlot {
    target: ElementId,
    position: Point,
    started: Instant,
    stage: Stage,
}

impl ClickSlot {
    fn new(target: ElementId, position: Point, now: Instant) -> Self {
        Self {
            target,
            position,
            started: now,
            stage: Stage::Pressed,
        }
    }

    /// Clock restart on a press that keeps the current target.
    fn repressed(self, now: Instant) -> Self {
        let stage = match self.stage {
            Stage::Released => Stage::Repressed,
            other => other,
        };
        Self {
            started: now,
            stage,
            ..self
        }
    }

    fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started)
    }

    fn finish(self, kind: GestureKind, button: MouseButton) -> Gesture {
        Gesture {
            kind,
            target: self.target,
            position: self.position,
            button,
        }
    }
}

//=== GestureRecognizer ===================================================

/// Classifies pointer interactions, one independent slot per button.
///
/// Owned by the input system on the driving thread. The recognizer does
/// not publish anything itself; it returns [`Gesture`]s.
pub struct GestureRecognizer<C: Clock = SystemClock> {
    config: GestureConfig,
    clock: C,
    slots: [Option<ClickSlot>; MouseButton::COUNT],
}

impl<C: Clock> GestureRecognizer<C> {
    pub fn new(config: GestureConfig, clock: C) -> Self {
        Self {
            config,
            clock,
            slots: [None; MouseButton::COUNT],
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Returns `true` while `button` has an open slot.
    pub fn is_tracking(&self, button: MouseButton) -> bool {
        self.slots[button.index()].is_some()
    }

    /// Element the open slot for `button` is addressed to.
    pub fn tracked_target(&self, button: MouseButton) -> Option<ElementId> {
        self.slots[button.index()].map(|slot| slot.target)
    }

    //--- Event Handling ---------------------------------------------------

    /// Feeds one raw event. Only a release can complete a gesture here;
    /// single clicks complete in [`poll`](Self::poll).
    pub fn handle(&mut self, event: &InputEvent, index: &SpatialIndex) -> Option<Gesture> {
        match *event {
            InputEvent::MouseButtonDown { button, position } => {
                self.press(button, position, index);
                None
            }
            InputEvent::MouseButtonUp { button, .. } => self.release(button),
            InputEvent::MouseMoved { .. } => None,
        }
    }

    /// Handles a press of `button` at `position`.
    pub fn press(&mut self, button: MouseButton, position: Point, index: &SpatialIndex) {
        let now = self.clock.now();
        let i = button.index();

        let next = match self.slots[i] {
            // Same spot: no need to hit-test again.
            Some(slot) if slot.position == position => Some(slot.repressed(now)),
            Some(slot) => match index.query_point(position) {
                None => {
                    debug!(
                        target: "input",
                        "{:?} pressed over empty space, dropping slot for {}",
                        button, slot.target
                    );
                    None
                }
                Some(hit) if hit == slot.target => Some(slot.repressed(now)),
                Some(hit) => {
                    debug!(
                        target: "input",
                        "{:?} retargeted from {} to {}",
                        button, slot.target, hit
                    );
                    Some(ClickSlot::new(hit, position, now))
                }
            },
            None => index
                .query_point(position)
                .map(|hit| ClickSlot::new(hit, position, now)),
        };

        if let Some(slot) = &next {
            trace!(
                target: "input",
                "{:?} slot -> {} {:?}",
                button, slot.target, slot.stage
            );
        }
        self.slots[i] = next;
    }

    /// Handles a release of `button`. Returns a gesture if the release
    /// completes a long click or a double click.
    pub fn release(&mut self, button: MouseButton) -> Option<Gesture> {
        let i = button.index();
        let slot = self.slots[i]?;
        let now = self.clock.now();

        if slot.elapsed(now) > self.config.long_press_threshold {
            self.slots[i] = None;
            return Some(slot.finish(GestureKind::LongClick, button));
        }

        match slot.stage {
            Stage::Pressed => {
                self.slots[i] = Some(ClickSlot {
                    started: now,
                    stage: Stage::Released,
                    ..slot
                });
                None
            }
            Stage::Repressed => {
                self.slots[i] = None;
                Some(slot.finish(GestureKind::DoubleClick, button))
            }
            // Release without a matching press; keep waiting.
            Stage::Released => None,
        }
    }

    /// Completes single clicks whose confirmation window has elapsed.
    ///
    /// Appends to `out` in button order and returns how many were added.
    pub fn poll(&mut self, out: &mut Vec<Gesture>) -> usize {
        let now = self.clock.now();
        let before = out.len();

        for button in MouseButton::ALL {
            let i = button.index();
            let Some(slot) = self.slots[i] else {
                continue;
            };
            if slot.stage == Stage::Released && slot.elapsed(now) > self.config.click_timeout {
                self.slots[i] = None;
                out.push(slot.finish(GestureKind::Click, button));
            }
        }

        out.len() - before
    }

    //--- Maintenance ------------------------------------------------------

    /// Drops any slot addressed to `target`.
    pub fn forget(&mut self, target: ElementId) {
        for slot in &mut self.slots {
            if slot.is_some_and(|s| s.target == target) {
                *slot = None;
            }
        }
    }

    /// Drops every open slot.
    pub fn reset(&mut self) {
        self.slots = [None; MouseButton::COUNT];
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
