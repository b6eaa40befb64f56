//=========================================================================
// Spatial Index
//=========================================================================
//
// Hit-testing of pointer positions against element rectangles.
//
// Architecture:
//   Interactive element ──(id, Bounds)──> SpatialIndex (quadtree)
//                                              ↓
//   pointer Point ────────query_point()──> Option<ElementId>
//
//=========================================================================

//=== Module Declarations =================================================

mod bounds;
mod quad_tree;

//=== Public API ==========================================================

pub use bounds::{Bounds, BoundsError, Point};
pub use quad_tree::{SpatialIndex, NODE_CAPACITY};

//=== Interactive Trait ===================================================

use crate::core::id::ElementId;

/// Capability contract for anything that can be hit by the pointer.
///
/// Implementors expose a stable identifier and their hit region. Message
/// handling is registered separately on the
/// [`MessageBus`](crate::core::message_bus::MessageBus) under the same id.
///
/// ```
/// use sweeper_engine::core::id::ElementId;
/// use sweeper_engine::core::spatial::{Bounds, Interactive};
///
/// struct Cell {
///     id: ElementId,
///     bounds: Bounds,
/// }
///
/// impl Interactive for Cell {
///     fn id(&self) -> ElementId { self.id }
///     fn bounds(&self) -> Bounds { self.bounds }
/// }
/// ```
pub trait Interactive {
    /// Identifier used both for hit-testing and message addressing.
    fn id(&self) -> ElementId;

    /// Current hit region.
    fn bounds(&self) -> Bounds;
}
