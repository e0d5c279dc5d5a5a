//! Ray with an origin and a direction.

use glam::Vec3;

/// Ray in 3D space.
///
/// Distance queries assume `direction` is unit length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
	/// Starting point of the ray.
	pub origin: Vec3,
	/// Direction the ray travels in. Must be normalized for distances to be
	/// meaningful.
	pub direction: Vec3,
}

impl Ray {
	/// Create a new ray.
	pub fn new(origin: Vec3, direction: Vec3) -> Self {
		Self { origin, direction }
	}

	/// Point at distance `t` along the ray.
	#[inline]
	pub fn at(&self, t: f32) -> Vec3 {
		self.origin + self.direction * t
	}

	/// Squared perpendicular distance from `point` to the ray's line.
	#[inline]
	pub fn sqr_distance_to_point(&self, point: Vec3) -> f32 {
		self.direction.cross(point - self.origin).length_squared()
	}
}
