//=========================================================================
// Element Identifiers
//=========================================================================
//
// Unique, monotonically increasing identifiers for interactive elements.
//
// Architecture:
//   IdGenerator (AtomicU32) ──next()──> ElementId(1), ElementId(2), ...
//
// Zero is reserved as "no element" and is never handed out.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

//=== ElementId ===========================================================

/// Opaque identifier of an element tracked by the spatial index and
/// addressable through the message bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u32);

impl ElementId {
    /// Reserved "no element" identifier.
    pub const INVALID: Self = Self(0);

    /// Wraps a raw identifier value.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier value.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns `false` for [`ElementId::INVALID`].
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//=== IdGenerator =========================================================

/// Thread-safe source of fresh [`ElementId`]s.
///
/// The engine creates one generator and shares it (`Arc<IdGenerator>`) with
/// everything that mints ids, so identifiers stay unique for the lifetime
/// of the engine.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicU32,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            last: AtomicU32::new(0),
        }
    }

    /// Issues the next identifier. Never returns [`ElementId::INVALID`].
    ///
    /// # Panics
    ///
    /// Panics once all `u32::MAX` identifiers have been issued since the
    /// last [`reset`](Self::reset). Use [`try_next`](Self::try_next) to
    /// handle exhaustion instead.
    pub fn next(&self) -> ElementId {
        match self.try_next() {
            Some(id) => id,
            None => panic!("Element ids exhausted after {} allocations", u32::MAX),
        }
    }

    /// Issues the next identifier, or `None` once the id space is
    /// exhausted. Exhaustion is sticky until [`reset`](Self::reset); an
    /// issued id is never handed out twice.
    pub fn try_next(&self) -> Option<ElementId> {
        self.last
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |last| last.checked_add(1))
            .ok()
            .map(|last| ElementId(last + 1))
    }

    /// Returns the identifier the next call to [`next`](Self::next) will
    /// issue, or [`ElementId::INVALID`] if the id space is exhausted.
    pub fn peek_next(&self) -> ElementId {
        self.last
            .load(Ordering::Relaxed)
            .checked_add(1)
            .map_or(ElementId::INVALID, ElementId)
    }

    /// Restarts numbering from 1.
    ///
    /// Only safe once every previously issued id has been retired (e.g. a
    /// full board rebuild), otherwise ids collide.
    pub fn reset(&self) {
        self.last.store(0, Ordering::Relaxed);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
