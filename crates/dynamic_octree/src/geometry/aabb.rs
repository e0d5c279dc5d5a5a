//! Axis-aligned bounding box over single-precision world coordinates.

use glam::Vec3;

use super::Ray;

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
	/// Minimum corner (inclusive).
	pub min: Vec3,
	/// Maximum corner (inclusive).
	pub max: Vec3,
}

impl Aabb {
	/// Create a new AABB from min and max corners.
	///
	/// # Panics
	/// Debug-asserts that min <= max on all axes.
	pub fn new(min: Vec3, max: Vec3) -> Self {
		debug_assert!(
			min.x <= max.x && min.y <= max.y && min.z <= max.z,
			"AABB min must be <= max on all axes"
		);
		Self { min, max }
	}

	/// Create an AABB from its center and full per-axis size.
	pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
		let half = size * 0.5;
		Self {
			min: center - half,
			max: center + half,
		}
	}

	/// Get the center of the AABB.
	#[inline]
	pub fn center(&self) -> Vec3 {
		(self.min + self.max) * 0.5
	}

	/// Get the size of the AABB (max - min).
	#[inline]
	pub fn size(&self) -> Vec3 {
		self.max - self.min
	}

	/// Check if this AABB contains a point.
	#[inline]
	pub fn contains_point(&self, point: Vec3) -> bool {
		point.x >= self.min.x
			&& point.x <= self.max.x
			&& point.y >= self.min.y
			&& point.y <= self.max.y
			&& point.z >= self.min.z
			&& point.z <= self.max.z
	}

	/// Check if this AABB fully contains another.
	///
	/// A box is encapsulated when both its corners are inside.
	#[inline]
	pub fn encapsulates(&self, other: &Aabb) -> bool {
		self.contains_point(other.min) && self.contains_point(other.max)
	}

	/// Check if this AABB overlaps with another.
	///
	/// Boxes that share only boundary points still count as intersecting.
	#[inline]
	pub fn intersects(&self, other: &Aabb) -> bool {
		self.min.x <= other.max.x
			&& self.max.x >= other.min.x
			&& self.min.y <= other.max.y
			&& self.max.y >= other.min.y
			&& self.min.z <= other.max.z
			&& self.max.z >= other.min.z
	}

	/// Closest point on or inside the AABB to `point`.
	#[inline]
	pub fn closest_point(&self, point: Vec3) -> Vec3 {
		point.clamp(self.min, self.max)
	}

	/// A copy of this AABB inflated by `amount` on every side.
	#[inline]
	pub fn expanded_by(&self, amount: f32) -> Self {
		Self {
			min: self.min - Vec3::splat(amount),
			max: self.max + Vec3::splat(amount),
		}
	}

	/// Slab-method ray intersection.
	///
	/// Returns the entry distance along the ray, or `None` when the ray
	/// misses. An origin inside the box reports distance `0.0`.
	pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
		let inv = ray.direction.recip();
		let t1 = (self.min - ray.origin) * inv;
		let t2 = (self.max - ray.origin) * inv;
		let t_near = t1.min(t2).max_element();
		let t_far = t1.max(t2).min_element();
		if t_far < 0.0 || t_near > t_far {
			return None;
		}
		Some(t_near.max(0.0))
	}
}
