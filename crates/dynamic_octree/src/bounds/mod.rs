//! Dynamic loose bounds octree: one AABB per stored object.
//!
//! Node containment boxes are inflated by a looseness factor in [1.0, 2.0],
//! so children overlap and small objects near octant boundaries do not get
//! stuck in disproportionately large nodes. Objects that fit no single
//! child's loose bounds stay at the parent as spillover.

pub(crate) mod node;

use glam::Vec3;
use tracing::{error, warn};

use crate::geometry::{Aabb, Plane, Ray};
use crate::octant::{MAX_GROW_ATTEMPTS, OCTANT_OFFSETS};
use node::BoundsNode;

/// Dynamic loose octree over AABB-located objects.
///
/// Grows when an insertion falls outside the root and shrinks when removals
/// leave the tree sparse. There is no fixed depth limit; subdivision stops
/// when children would fall below the minimum node size.
///
/// Payloads are compared by equality and each payload is assumed to appear
/// at most once.
pub struct BoundsOctree<T> {
	root: BoundsNode<T>,
	count: usize,
	/// Side length at construction; the root never shrinks below this.
	initial_size: f32,
	min_size: f32,
	/// Multiplier from nominal to actual containment side length, in
	/// [1.0, 2.0].
	looseness: f32,
}

impl<T> BoundsOctree<T> {
	/// Create an octree.
	///
	/// * `initial_world_size` - nominal side length of the initial root.
	/// * `initial_world_pos` - center of the initial root.
	/// * `min_node_size` - smallest allowed nominal node side length;
	///   clamped down to `initial_world_size` (with a warning) when larger.
	/// * `looseness` - containment inflation factor, clamped into
	///   [1.0, 2.0].
	pub fn new(
		initial_world_size: f32,
		initial_world_pos: Vec3,
		min_node_size: f32,
		looseness: f32,
	) -> Self {
		let min_node_size = if min_node_size > initial_world_size {
			warn!(
				min_node_size,
				initial_world_size, "minimum node size cannot exceed the initial world size; clamping"
			);
			initial_world_size
		} else {
			min_node_size
		};
		let looseness = looseness.clamp(1.0, 2.0);
		Self {
			root: BoundsNode::new(
				initial_world_size,
				min_node_size,
				looseness,
				initial_world_pos,
			),
			count: 0,
			initial_size: initial_world_size,
			min_size: min_node_size,
			looseness,
		}
	}

	/// Number of objects currently stored.
	#[inline]
	pub fn count(&self) -> usize {
		self.count
	}

	/// Loose AABB of the current root node.
	pub fn get_max_bounds(&self) -> Aabb {
		self.root.bounds
	}

	/// Add `obj` occupying `obj_bounds`, doubling the root until the bounds
	/// fit.
	///
	/// Degenerate bounds (NaN, infinite, or unreachable within the grow
	/// attempt limit) are dropped with an error log and leave the tree
	/// unchanged.
	pub fn add(&mut self, obj: T, obj_bounds: Aabb) {
		let mut grow_attempts = 0;
		while !self.root.encapsulates(&obj_bounds) {
			if grow_attempts >= MAX_GROW_ATTEMPTS {
				error!(
					grow_attempts,
					?obj_bounds,
					"aborting add: root failed to encapsulate the bounds after growing"
				);
				return;
			}
			self.grow(obj_bounds.center() - self.root.center);
			grow_attempts += 1;
		}
		self.root.insert(obj, obj_bounds);
		self.count += 1;
	}

	/// Remove `obj`, scanning the whole tree. Prefer [`Self::remove_at`]
	/// when the stored bounds are known.
	pub fn remove(&mut self, obj: &T) -> bool
	where
		T: PartialEq,
	{
		let removed = self.root.remove(obj);
		if removed {
			self.count -= 1;
			self.shrink();
		}
		removed
	}

	/// Remove `obj` using the bounds it was added with, pruning the search
	/// to one octant per level.
	pub fn remove_at(&mut self, obj: &T, obj_bounds: &Aabb) -> bool
	where
		T: PartialEq,
	{
		let removed = self.root.remove_at(obj, obj_bounds);
		if removed {
			self.count -= 1;
			self.shrink();
		}
		removed
	}

	/// Whether any stored bounds intersect `check_bounds`.
	pub fn is_colliding_bounds(&self, check_bounds: &Aabb) -> bool {
		self.root.is_colliding_bounds(check_bounds)
	}

	/// Whether any stored bounds are hit by `ray` within `max_distance`.
	/// Pass `f32::INFINITY` for an unbounded ray.
	pub fn is_colliding_ray(&self, ray: &Ray, max_distance: f32) -> bool {
		self.root.is_colliding_ray(ray, max_distance)
	}

	/// Append objects whose bounds intersect `check_bounds` to `result`.
	pub fn get_colliding_bounds_into<'a>(&'a self, check_bounds: &Aabb, result: &mut Vec<&'a T>) {
		self.root.get_colliding_bounds(check_bounds, result);
	}

	/// Objects whose bounds intersect `check_bounds`.
	pub fn get_colliding_bounds(&self, check_bounds: &Aabb) -> Vec<&T> {
		let mut result = Vec::new();
		self.root.get_colliding_bounds(check_bounds, &mut result);
		result
	}

	/// Append objects whose bounds are hit by `ray` within `max_distance`
	/// to `result`. Pass `f32::INFINITY` for an unbounded ray.
	pub fn get_colliding_ray_into<'a>(
		&'a self,
		ray: &Ray,
		max_distance: f32,
		result: &mut Vec<&'a T>,
	) {
		self.root.get_colliding_ray(ray, max_distance, result);
	}

	/// Objects whose bounds are hit by `ray` within `max_distance`.
	pub fn get_colliding_ray(&self, ray: &Ray, max_distance: f32) -> Vec<&T> {
		let mut result = Vec::new();
		self.root.get_colliding_ray(ray, max_distance, &mut result);
		result
	}

	/// Objects whose bounds are inside or intersect the frustum described
	/// by six inward-facing planes.
	pub fn get_within_frustum(&self, planes: &[Plane; 6]) -> Vec<&T> {
		let mut result = Vec::new();
		self.root.get_within_frustum(planes, &mut result);
		result
	}

	/// Every stored object, in unspecified order.
	pub fn get_all(&self) -> Vec<&T> {
		let mut result = Vec::with_capacity(self.count);
		self.root.get_all(&mut result);
		result
	}

	/// Double the root's nominal side length, shifting the new center
	/// toward `direction`. The old root becomes the matching octant of the
	/// new root; seven fresh siblings fill the remaining slots. An empty old
	/// root is discarded outright.
	fn grow(&mut self, direction: Vec3) {
		let x_dir = if direction.x >= 0.0 { 1.0 } else { -1.0 };
		let y_dir = if direction.y >= 0.0 { 1.0 } else { -1.0 };
		let z_dir = if direction.z >= 0.0 { 1.0 } else { -1.0 };
		let old_length = self.root.base_length;
		let half = old_length / 2.0;
		let new_center = self.root.center + Vec3::new(x_dir, y_dir, z_dir) * half;

		let old_root = std::mem::replace(
			&mut self.root,
			BoundsNode::new(old_length * 2.0, self.min_size, self.looseness, new_center),
		);
		if old_root.has_any_objects() {
			let root_pos = self.root.best_fit_child(old_root.center);
			let mut children = Box::new(OCTANT_OFFSETS.map(|offset| {
				BoundsNode::new(
					old_length,
					self.min_size,
					self.looseness,
					new_center + offset * half,
				)
			}));
			children[root_pos] = old_root;
			self.root.set_children(children);
		}
	}

	/// Shrink the root once if all content fits within a single octant.
	fn shrink(&mut self) {
		self.root.shrink_if_possible(self.initial_size);
	}
}
