//! Dynamic point octree: one 3D point per stored object.
//!
//! The facade owns the root node and the tree-level policy: growing the root
//! toward out-of-bounds insertions, shrinking it once per removal, and the
//! object count. All recursive work lives in [`node`].

pub(crate) mod node;

use glam::Vec3;
use tracing::{error, warn};

use crate::geometry::{Aabb, Ray};
use crate::octant::{MAX_GROW_ATTEMPTS, OCTANT_OFFSETS};
use node::PointNode;

/// Dynamic octree over point-located objects.
///
/// Grows when an insertion falls outside the root and shrinks when removals
/// leave the tree sparse. There is no fixed depth limit; subdivision stops
/// when children would fall below the minimum node size.
///
/// Payloads are compared by equality and each payload is assumed to appear
/// at most once.
pub struct PointOctree<T> {
	root: PointNode<T>,
	count: usize,
	/// Side length at construction; the root never shrinks below this.
	initial_size: f32,
	min_size: f32,
}

impl<T> PointOctree<T> {
	/// Create an octree.
	///
	/// * `initial_world_size` - side length of the initial root.
	/// * `initial_world_pos` - center of the initial root.
	/// * `min_node_size` - smallest allowed node side length; clamped down
	///   to `initial_world_size` (with a warning) when larger.
	pub fn new(initial_world_size: f32, initial_world_pos: Vec3, min_node_size: f32) -> Self {
		let min_node_size = if min_node_size > initial_world_size {
			warn!(
				min_node_size,
				initial_world_size, "minimum node size cannot exceed the initial world size; clamping"
			);
			initial_world_size
		} else {
			min_node_size
		};
		Self {
			root: PointNode::new(initial_world_size, min_node_size, initial_world_pos),
			count: 0,
			initial_size: initial_world_size,
			min_size: min_node_size,
		}
	}

	/// Number of objects currently stored.
	#[inline]
	pub fn count(&self) -> usize {
		self.count
	}

	/// AABB of the current root node.
	pub fn get_max_bounds(&self) -> Aabb {
		self.root.bounds
	}

	/// Add `obj` at `pos`, doubling the root until the position fits.
	///
	/// Degenerate positions (NaN, infinite, or unreachable within the grow
	/// attempt limit) are dropped with an error log and leave the tree
	/// unchanged.
	pub fn add(&mut self, obj: T, pos: Vec3) {
		let mut grow_attempts = 0;
		while !self.root.encapsulates(pos) {
			if grow_attempts >= MAX_GROW_ATTEMPTS {
				error!(
					grow_attempts,
					?pos,
					"aborting add: root failed to encapsulate the position after growing"
				);
				return;
			}
			self.grow(pos - self.root.center);
			grow_attempts += 1;
		}
		self.root.insert(obj, pos);
		self.count += 1;
	}

	/// Remove `obj`, scanning the whole tree. Prefer [`Self::remove_at`]
	/// when the stored position is known.
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

	/// Remove `obj` using the position it was added at, pruning the search
	/// to one octant per level.
	pub fn remove_at(&mut self, obj: &T, pos: Vec3) -> bool
	where
		T: PartialEq,
	{
		let removed = self.root.remove_at(obj, pos);
		if removed {
			self.count -= 1;
			self.shrink();
		}
		removed
	}

	/// Objects within `max_distance` of `ray`. `ray.direction` must be unit
	/// length.
	pub fn get_nearby_ray(&self, ray: &Ray, max_distance: f32) -> Vec<&T> {
		let mut result = Vec::new();
		self.root.get_nearby_ray(ray, max_distance, &mut result);
		result
	}

	/// Append objects within `max_distance` of `ray` to `result`. Returns
	/// true when at least one was appended.
	pub fn get_nearby_ray_into<'a>(
		&'a self,
		ray: &Ray,
		max_distance: f32,
		result: &mut Vec<&'a T>,
	) -> bool {
		let before = result.len();
		self.root.get_nearby_ray(ray, max_distance, result);
		result.len() > before
	}

	/// Objects within `max_distance` of `position`.
	pub fn get_nearby_point(&self, position: Vec3, max_distance: f32) -> Vec<&T> {
		let mut result = Vec::new();
		self.root.get_nearby_point(position, max_distance, &mut result);
		result
	}

	/// Append objects within `max_distance` of `position` to `result`.
	/// Returns true when at least one was appended.
	pub fn get_nearby_point_into<'a>(
		&'a self,
		position: Vec3,
		max_distance: f32,
		result: &mut Vec<&'a T>,
	) -> bool {
		let before = result.len();
		self.root.get_nearby_point(position, max_distance, result);
		result.len() > before
	}

	/// Every stored object, in unspecified order.
	pub fn get_all(&self) -> Vec<&T> {
		let mut result = Vec::with_capacity(self.count);
		self.root.get_all(&mut result);
		result
	}

	/// Double the root's side length, shifting the new center toward
	/// `direction`. The old root becomes the matching octant of the new
	/// root; seven fresh siblings fill the remaining slots. An empty old
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
			PointNode::new(old_length * 2.0, self.min_size, new_center),
		);
		if old_root.has_any_objects() {
			let root_pos = self.root.best_fit_child(old_root.center);
			let mut children = Box::new(OCTANT_OFFSETS.map(|offset| {
				PointNode::new(old_length, self.min_size, new_center + offset * half)
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
