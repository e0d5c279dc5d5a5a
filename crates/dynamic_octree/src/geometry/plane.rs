//! Plane in constant-normal form and the frustum visibility test.

use glam::Vec3;

use super::Aabb;

/// Plane satisfying `normal · p + distance = 0`.
///
/// `normal` must be unit length. Points with positive signed distance lie on
/// the side the normal faces; for frustum planes that is the inside.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
	/// Unit normal of the plane.
	pub normal: Vec3,
	/// Signed distance from the origin along the normal, negated.
	pub distance: f32,
}

impl Plane {
	/// Create a plane from its normal and distance term.
	pub fn new(normal: Vec3, distance: f32) -> Self {
		Self { normal, distance }
	}

	/// Create a plane through `point` with the given `normal`.
	pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
		Self {
			normal,
			distance: -normal.dot(point),
		}
	}

	/// Signed distance from `point` to the plane.
	#[inline]
	pub fn signed_distance(&self, point: Vec3) -> f32 {
		self.normal.dot(point) + self.distance
	}
}

/// Test an AABB against six frustum planes.
///
/// Returns false iff the box lies entirely behind any single plane, so boxes
/// inside or intersecting the frustum pass. Only the corner furthest along
/// each plane normal (the positive vertex) is checked per plane.
pub fn test_planes_aabb(planes: &[Plane; 6], aabb: &Aabb) -> bool {
	for plane in planes {
		let positive = Vec3::new(
			if plane.normal.x >= 0.0 { aabb.max.x } else { aabb.min.x },
			if plane.normal.y >= 0.0 { aabb.max.y } else { aabb.min.y },
			if plane.normal.z >= 0.0 { aabb.max.z } else { aabb.min.z },
		);
		if plane.signed_distance(positive) < 0.0 {
			return false;
		}
	}
	true
}
