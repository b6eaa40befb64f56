//=========================================================================
// Region Quadtree
//=========================================================================
//
// Dynamic (id, rectangle) set answering point-containment queries.
//
// Architecture:
//   QuadNode
//     ├─ objects: up to NODE_CAPACITY (id, bounds), insertion order
//     └─ children: None | [top-left, top-right, bottom-left, bottom-right]
//
// A node keeps its first NODE_CAPACITY objects. The next insert splits it
// once; from then on new objects are pushed into every child they
// intersect, so an element straddling a quadrant edge lives in several
// leaves. Nodes are never merged back, the tree only grows.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::bounds::{Bounds, Point};
use crate::core::id::ElementId;

//=== Constants ===========================================================

/// Objects stored in a node before it subdivides.
pub const NODE_CAPACITY: usize = 4;

//=== QuadNode ============================================================

#[derive(Debug)]
struct QuadNode {
    bounds: Bounds,
    objects: Vec<(ElementId, Bounds)>,
    children: Option<Box<[QuadNode; 4]>>,
}

impl QuadNode {
    fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            objects: Vec::with_capacity(NODE_CAPACITY),
            children: None,
        }
    }

    fn subdivide(&mut self) -> &mut [QuadNode; 4] {
        let bounds = self.bounds;
        self.children
            .get_or_insert_with(|| Box::new(bounds.quadrants().map(QuadNode::new)))
    }

    fn insert(&mut self, id: ElementId, bounds: Bounds) {
        if !self.bounds.intersects(&bounds) {
            return;
        }

        if self.objects.len() < NODE_CAPACITY {
            self.objects.push((id, bounds));
            return;
        }

        for child in self.subdivide().iter_mut() {
            child.insert(id, bounds);
        }
    }

    fn query_point(&self, point: Point) -> Option<ElementId> {
        if !self.bounds.contains(point) {
            return None;
        }

        let local = self
            .objects
            .iter()
            .find(|(id, bounds)| id.is_valid() && bounds.contains(point))
            .map(|(id, _)| *id);

        if local.is_some() {
            return local;
        }

        self.children
            .as_ref()?
            .iter()
            .find_map(|child| child.query_point(point))
    }

    fn query_point_all(&self, point: Point, found: &mut Vec<ElementId>) {
        if !self.bounds.contains(point) {
            return;
        }

        for (id, bounds) in &self.objects {
            if id.is_valid() && bounds.contains(point) && !found.contains(id) {
                found.push(*id);
            }
        }

        if let Some(children) = &self.children {
            for child in children.iter() {
                child.query_point_all(point, found);
            }
        }
    }

    fn query_id(&self, id: ElementId) -> Option<Bounds> {
        if let Some((_, bounds)) = self.objects.iter().find(|(obj, _)| *obj == id) {
            return Some(*bounds);
        }

        self.children
            .as_ref()?
            .iter()
            .find_map(|child| child.query_id(id))
    }

    fn remove(&mut self, id: ElementId) -> bool {
        let before = self.objects.len();
        self.objects.retain(|(obj, _)| *obj != id);
        let mut removed = self.objects.len() != before;

        // Straddling elements have a copy in every child they touch.
        if let Some(children) = &mut self.children {
            for child in children.iter_mut() {
                removed |= child.remove(id);
            }
        }

        removed
    }

    fn node_count(&self) -> usize {
        1 + self
            .children
            .as_ref()
            .map_or(0, |children| children.iter().map(QuadNode::node_count).sum())
    }

    fn is_empty(&self) -> bool {
        self.objects.is_empty()
            && self
                .children
                .as_ref()
                .map_or(true, |children| children.iter().all(QuadNode::is_empty))
    }
}

//=== SpatialIndex ========================================================

/// Point hit-testing over a dynamic set of element rectangles.
///
/// When several elements contain the same point, [`query_point`] returns
/// the first one met by a fixed traversal (a node's own objects in
/// insertion order, then quadrants 0..3). That order is deterministic but
/// is not a visual z-order.
///
/// [`query_point`]: SpatialIndex::query_point
#[derive(Debug)]
pub struct SpatialIndex {
    root: QuadNode,
}

impl SpatialIndex {
    /// Creates an empty index covering `bounds`.
    ///
    /// Elements outside these bounds are silently ignored by [`insert`].
    ///
    /// [`insert`]: SpatialIndex::insert
    pub fn new(bounds: Bounds) -> Self {
        Self {
            root: QuadNode::new(bounds),
        }
    }

    /// Returns the region covered by the index.
    pub fn bounds(&self) -> Bounds {
        self.root.bounds
    }

    //--- Mutation ---------------------------------------------------------

    /// Records `id` with its hit region, replacing any previous region.
    pub fn insert(&mut self, id: ElementId, bounds: Bounds) {
        self.root.remove(id);
        self.root.insert(id, bounds);
    }

    /// Removes every copy of `id`. Returns `false` if it was never stored.
    pub fn remove(&mut self, id: ElementId) -> bool {
        self.root.remove(id)
    }

    //--- Queries ----------------------------------------------------------

    /// Returns the first element whose region contains `point`.
    pub fn query_point(&self, point: Point) -> Option<ElementId> {
        self.root.query_point(point)
    }

    /// Returns every element whose region contains `point`, each once.
    pub fn query_point_all(&self, point: Point) -> Vec<ElementId> {
        let mut found = Vec::new();
        self.root.query_point_all(point, &mut found);
        found
    }

    /// Returns the region stored for `id`.
    pub fn query_id(&self, id: ElementId) -> Option<Bounds> {
        self.root.query_id(id)
    }

    /// Total number of nodes, root included. Never decreases.
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //--- Test Helpers -----------------------------------------------------

    fn rect(x: i32, y: i32, w: i32, h: i32) -> Bounds {
        Bounds::new(x, y, w, h).unwrap()
    }

    fn id(raw: u32) -> ElementId {
        ElementId::from_raw(raw)
    }

    /// 16x16 grid of 30px cells, ids 1..=256 in row-major order.
    fn board() -> (SpatialIndex, Vec<(ElementId, Bounds)>) {
        let mut index = SpatialIndex::new(rect(0, 0, 480, 480));
        let mut cells = Vec::new();
        for row in 0..16 {
            for col in 0..16 {
                let cell_id = id((row * 16 + col + 1) as u32);
                let cell = rect(col * 30, row * 30, 30, 30);
                index.insert(cell_id, cell);
                cells.push((cell_id, cell));
            }
        }
        (index, cells)
    }

    //=====================================================================
    // Insert / Query
    //=====================================================================

    #[test]
    fn empty_index_finds_nothing() {
        let index = SpatialIndex::new(rect(0, 0, 100, 100));
        assert!(index.is_empty());
        assert_eq!(index.query_point(Point::new(50, 50)), None);
        assert!(index.query_point_all(Point::new(50, 50)).is_empty());
        assert_eq!(index.node_count(), 1);
    }

    #[test]
    fn finds_single_element() {
        let mut index = SpatialIndex::new(rect(0, 0, 100, 100));
        index.insert(id(1), rect(10, 10, 20, 20));

        assert_eq!(index.query_point(Point::new(15, 15)), Some(id(1)));
        assert_eq!(index.query_point(Point::new(50, 50)), None);
    }

    #[test]
    fn point_outside_index_is_none() {
        let mut index = SpatialIndex::new(rect(0, 0, 100, 100));
        index.insert(id(1), rect(0, 0, 100, 100));
        assert_eq!(index.query_point(Point::new(-1, 5)), None);
        assert_eq!(index.query_point(Point::new(100, 5)), None);
    }

    #[test]
    fn element_outside_index_is_ignored() {
        let mut index = SpatialIndex::new(rect(0, 0, 100, 100));
        index.insert(id(1), rect(200, 200, 10, 10));
        assert!(index.is_empty());
        assert_eq!(index.query_id(id(1)), None);
    }

    #[test]
    fn far_edge_element_is_ignored_without_overflow() {
        let mut index = SpatialIndex::new(rect(0, 0, 100, 100));
        index.insert(id(1), rect(i32::MAX - 10, 0, 10, 10));
        assert!(index.is_empty());
        assert_eq!(index.query_point(Point::new(i32::MAX - 1, 5)), None);
    }

    #[test]
    fn every_cell_center_resolves_to_its_cell() {
        let (index, cells) = board();
        for (cell_id, cell) in &cells {
            assert_eq!(index.query_point(cell.center()), Some(*cell_id));
        }
    }

    #[test]
    fn every_cell_corner_resolves_to_its_cell() {
        let (index, cells) = board();
        for (cell_id, cell) in &cells {
            let last = Point::new(cell.right() - 1, cell.bottom() - 1);
            assert_eq!(index.query_point(cell.origin()), Some(*cell_id));
            assert_eq!(index.query_point(last), Some(*cell_id));
        }
    }

    #[test]
    fn subdivision_keeps_earlier_elements() {
        let mut index = SpatialIndex::new(rect(0, 0, 100, 100));
        let regions = [
            rect(0, 0, 10, 10),
            rect(60, 0, 10, 10),
            rect(0, 60, 10, 10),
            rect(60, 60, 10, 10),
            rect(30, 30, 10, 10),
            rect(80, 80, 10, 10),
        ];

        for (i, region) in regions.iter().enumerate() {
            index.insert(id(i as u32 + 1), *region);
        }

        assert!(index.node_count() > 1, "Fifth insert should subdivide");
        for (i, region) in regions.iter().enumerate() {
            assert_eq!(index.query_point(region.center()), Some(id(i as u32 + 1)));
        }
    }

    #[test]
    fn root_subdivides_exactly_once() {
        let mut index = SpatialIndex::new(rect(0, 0, 100, 100));
        for i in 0..4 {
            index.insert(id(i + 1), rect(0, 0, 5, 5));
        }
        assert_eq!(index.node_count(), 1);

        index.insert(id(5), rect(90, 90, 5, 5));
        assert_eq!(index.node_count(), 5);

        index.insert(id(6), rect(80, 80, 5, 5));
        assert_eq!(index.node_count(), 5, "Second overflow must reuse the children");
    }

    #[test]
    fn straddling_element_found_in_every_quadrant() {
        let mut index = SpatialIndex::new(rect(0, 0, 100, 100));
        for i in 0..4 {
            index.insert(id(i + 1), rect(0, 0, 1, 1));
        }
        // Lands in all four children.
        index.insert(id(9), rect(40, 40, 20, 20));

        for p in [(45, 45), (55, 45), (45, 55), (55, 55)] {
            assert_eq!(index.query_point(Point::from(p)), Some(id(9)));
        }
    }

    #[test]
    fn overlap_tie_breaks_by_insertion_order() {
        let mut index = SpatialIndex::new(rect(0, 0, 100, 100));
        index.insert(id(1), rect(0, 0, 50, 50));
        index.insert(id(2), rect(10, 10, 10, 10));

        assert_eq!(index.query_point(Point::new(15, 15)), Some(id(1)));
        assert_eq!(index.query_point_all(Point::new(15, 15)), vec![id(1), id(2)]);
    }

    #[test]
    fn local_objects_win_over_children() {
        let mut index = SpatialIndex::new(rect(0, 0, 100, 100));
        index.insert(id(7), rect(90, 90, 5, 5));
        for i in 0..3 {
            index.insert(id(i + 1), rect(0, 0, 5, 5));
        }
        // Overflow: goes to a child, overlapping id 7.
        index.insert(id(8), rect(85, 85, 15, 15));

        assert_eq!(index.query_point(Point::new(92, 92)), Some(id(7)));
        assert_eq!(index.query_point(Point::new(86, 86)), Some(id(8)));
    }

    #[test]
    fn query_all_reports_straddler_once() {
        let mut index = SpatialIndex::new(rect(0, 0, 100, 100));
        for i in 0..4 {
            index.insert(id(i + 1), rect(0, 0, 1, 1));
        }
        index.insert(id(9), rect(0, 0, 100, 100));

        assert_eq!(index.query_point_all(Point::new(0, 0)), vec![id(1), id(2), id(3), id(4), id(9)]);
        assert_eq!(index.query_point_all(Point::new(70, 70)), vec![id(9)]);
    }

    #[test]
    fn invalid_id_is_never_returned() {
        let mut index = SpatialIndex::new(rect(0, 0, 100, 100));
        index.insert(ElementId::INVALID, rect(0, 0, 50, 50));
        assert_eq!(index.query_point(Point::new(10, 10)), None);
        assert!(index.query_point_all(Point::new(10, 10)).is_empty());
    }

    //=====================================================================
    // query_id
    //=====================================================================

    #[test]
    fn query_id_returns_stored_bounds() {
        let (index, cells) = board();
        for (cell_id, cell) in &cells {
            assert_eq!(index.query_id(*cell_id), Some(*cell));
        }
    }

    #[test]
    fn query_id_unknown_is_none() {
        let (index, _) = board();
        assert_eq!(index.query_id(id(9999)), None);
    }

    #[test]
    fn reinsert_replaces_region() {
        let mut index = SpatialIndex::new(rect(0, 0, 100, 100));
        index.insert(id(1), rect(0, 0, 10, 10));
        index.insert(id(1), rect(50, 50, 10, 10));

        assert_eq!(index.query_id(id(1)), Some(rect(50, 50, 10, 10)));
        assert_eq!(index.query_point(Point::new(5, 5)), None);
        assert_eq!(index.query_point(Point::new(55, 55)), Some(id(1)));
    }

    //=====================================================================
    // remove
    //=====================================================================

    #[test]
    fn remove_unknown_returns_false() {
        let (mut index, _) = board();
        assert!(!index.remove(id(9999)));
        assert!(!index.remove(ElementId::INVALID));
    }

    #[test]
    fn remove_makes_point_miss() {
        let (mut index, cells) = board();
        let (victim, cell) = cells[37];

        assert!(index.remove(victim));
        assert_eq!(index.query_point(cell.center()), None);
        assert_eq!(index.query_id(victim), None);
        assert!(!index.remove(victim), "Second removal has nothing to remove");
    }

    #[test]
    fn remove_clears_every_copy_of_straddler() {
        let mut index = SpatialIndex::new(rect(0, 0, 100, 100));
        for i in 0..4 {
            index.insert(id(i + 1), rect(0, 0, 1, 1));
        }
        index.insert(id(9), rect(40, 40, 20, 20));

        assert!(index.remove(id(9)));
        for p in [(45, 45), (55, 45), (45, 55), (55, 55)] {
            assert_eq!(index.query_point(Point::from(p)), None);
        }
    }

    #[test]
    fn remove_leaves_neighbours_intact() {
        let (mut index, cells) = board();
        index.remove(cells[0].0);

        for (cell_id, cell) in cells.iter().skip(1) {
            assert_eq!(index.query_point(cell.center()), Some(*cell_id));
        }
    }

    #[test]
    fn remove_never_shrinks_tree() {
        let (mut index, cells) = board();
        let nodes = index.node_count();

        for (cell_id, _) in &cells {
            index.remove(*cell_id);
        }

        assert!(index.is_empty());
        assert_eq!(index.node_count(), nodes);
    }

    //=====================================================================
    // Edge Cases
    //=====================================================================

    #[test]
    fn many_stacked_elements_on_one_pixel() {
        let mut index = SpatialIndex::new(rect(0, 0, 64, 64));
        for i in 1..=40 {
            index.insert(id(i), rect(10, 10, 1, 1));
        }

        let all = index.query_point_all(Point::new(10, 10));
        assert_eq!(all.len(), 40);
        assert_eq!(index.query_point(Point::new(10, 10)), Some(id(1)));
    }

    #[test]
    fn odd_sized_index_covers_every_pixel() {
        let mut index = SpatialIndex::new(rect(0, 0, 7, 5));
        for i in 0..4 {
            index.insert(id(i + 1), rect(0, 0, 1, 1));
        }
        // Root is full: this one is split across odd-sized quadrants.
        index.insert(id(9), rect(0, 0, 7, 5));

        for y in 0..5 {
            for x in 0..7 {
                let found = index.query_point_all(Point::new(x, y));
                assert!(found.contains(&id(9)), "({}, {}) lost the element", x, y);
            }
        }
    }
}
