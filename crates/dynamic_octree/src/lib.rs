//! dynamic_octree - dynamic point and loose-bounds octrees for 3D spatial
//! indexing.
//!
//! Two independent trees:
//!
//! - [`PointOctree`]: each object lives at a single 3D point; query by
//!   nearest-within-distance from a point or along a ray.
//! - [`BoundsOctree`]: each object occupies an AABB; node containment boxes
//!   are inflated by a *looseness* factor so small objects near octant
//!   boundaries don't get stuck in oversized nodes; query by AABB or ray
//!   intersection, or by frustum.
//!
//! Both grow automatically when an insertion falls outside the root and
//! shrink when removals leave the tree sparse. There is no fixed maximum
//! depth; subdivision stops at a configurable minimum node size.
//!
//! Trees are single-threaded: no operation blocks, and callers serialize
//! access externally.
//!
//! # Example
//!
//! ```
//! use dynamic_octree::PointOctree;
//! use glam::Vec3;
//!
//! let mut tree = PointOctree::new(16.0, Vec3::ZERO, 1.0);
//! tree.add("a", Vec3::new(0.5, 0.5, 0.5));
//! tree.add("b", Vec3::new(-3.0, 2.0, 1.0));
//!
//! let near_origin = tree.get_nearby_point(Vec3::ZERO, 1.0);
//! assert_eq!(near_origin, vec![&"a"]);
//! ```

pub mod bounds;
pub mod geometry;
mod octant;
pub mod point;

// Re-exports
pub use bounds::BoundsOctree;
pub use geometry::{test_planes_aabb, Aabb, Plane, Ray};
pub use point::PointOctree;
