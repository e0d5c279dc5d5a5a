//! Octant indexing shared by both octree variants.
//!
//! Both trees must agree on which octant a point belongs to, because growing
//! the root places the old root into the octant slot [`best_fit_child`]
//! computes for its center. [`OCTANT_OFFSETS`] and [`best_fit_child`] encode
//! the same layout; changing one without the other silently corrupts grow.

use glam::Vec3;

/// Direct entries a node may hold before it splits, unless its children
/// would fall below the minimum node size.
pub(crate) const NUM_OBJECTS_ALLOWED: usize = 8;

/// How many times an add may double the root before giving up on a
/// position. Guards against NaN and infinite coordinates.
pub(crate) const MAX_GROW_ATTEMPTS: usize = 20;

/// Unit offsets from a node's center to its eight child centers, in octant
/// order.
pub(crate) const OCTANT_OFFSETS: [Vec3; 8] = [
	Vec3::new(-1.0, 1.0, -1.0),  // 0: -x +y -z
	Vec3::new(1.0, 1.0, -1.0),   // 1: +x +y -z
	Vec3::new(-1.0, 1.0, 1.0),   // 2: -x +y +z
	Vec3::new(1.0, 1.0, 1.0),    // 3: +x +y +z
	Vec3::new(-1.0, -1.0, -1.0), // 4: -x -y -z
	Vec3::new(1.0, -1.0, -1.0),  // 5: +x -y -z
	Vec3::new(-1.0, -1.0, 1.0),  // 6: -x -y +z
	Vec3::new(1.0, -1.0, 1.0),   // 7: +x -y +z
];

/// Octant of `point` relative to `center`:
/// `(x > cx → +1) + (z > cz → +2) + (y < cy → +4)`.
#[inline]
pub(crate) fn best_fit_child(center: Vec3, point: Vec3) -> usize {
	let mut index = 0;
	if point.x > center.x {
		index += 1;
	}
	if point.z > center.z {
		index += 2;
	}
	if point.y < center.y {
		index += 4;
	}
	index
}
