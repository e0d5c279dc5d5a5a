//! Geometric primitives consumed by the octrees.
//!
//! Only the contracts the trees need are implemented: containment and
//! intersection of axis-aligned boxes, closest point, ray entry distance,
//! perpendicular distance from a point to a ray, and the six-plane frustum
//! test.

pub mod aabb;
pub mod plane;
pub mod ray;

pub use aabb::Aabb;
pub use plane::{test_planes_aabb, Plane};
pub use ray::Ray;
