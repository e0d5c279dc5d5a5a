//! Recursive node of the loose bounds octree.

use glam::Vec3;
use smallvec::SmallVec;

use crate::geometry::{test_planes_aabb, Aabb, Plane, Ray};
use crate::octant::{best_fit_child, NUM_OBJECTS_ALLOWED, OCTANT_OFFSETS};

/// A stored payload together with the AABB it occupies.
#[derive(Clone, Debug)]
pub(crate) struct BoundsEntry<T> {
	pub(crate) obj: T,
	pub(crate) bounds: Aabb,
}

/// Recursive unit of the bounds octree.
///
/// The containment AABB is the nominal side length times the looseness
/// factor, so children overlap and small objects near octant boundaries
/// still fit a child. A node with children may keep direct entries that
/// straddle octant boundaries and fit no single child's loose bounds
/// (spillover).
pub(crate) struct BoundsNode<T> {
	pub(crate) center: Vec3,
	/// Nominal side length, without looseness.
	pub(crate) base_length: f32,
	/// Actual containment side length: `base_length * looseness`.
	pub(crate) adj_length: f32,
	pub(crate) looseness: f32,
	pub(crate) min_size: f32,
	pub(crate) bounds: Aabb,
	/// Loose bounds the eight children have (or would have after a split).
	pub(crate) child_bounds: [Aabb; 8],
	pub(crate) objects: SmallVec<[BoundsEntry<T>; NUM_OBJECTS_ALLOWED]>,
	pub(crate) children: Option<Box<[BoundsNode<T>; 8]>>,
}

impl<T> BoundsNode<T> {
	pub(crate) fn new(base_length: f32, min_size: f32, looseness: f32, center: Vec3) -> Self {
		let mut node = Self {
			center,
			base_length,
			adj_length: looseness * base_length,
			looseness,
			min_size,
			bounds: Aabb::from_center_size(center, Vec3::splat(looseness * base_length)),
			child_bounds: [Aabb::from_center_size(center, Vec3::ZERO); 8],
			objects: SmallVec::new(),
			children: None,
		};
		node.set_values(base_length, center);
		node
	}

	/// Re-parameterize this node in place. Entries and children are kept and
	/// must still fit the new bounds.
	fn set_values(&mut self, base_length: f32, center: Vec3) {
		self.base_length = base_length;
		self.center = center;
		self.adj_length = self.looseness * base_length;
		self.bounds = Aabb::from_center_size(center, Vec3::splat(self.adj_length));
		let quarter = base_length / 4.0;
		let child_size = Vec3::splat((base_length / 2.0) * self.looseness);
		for (i, offset) in OCTANT_OFFSETS.iter().enumerate() {
			self.child_bounds[i] = Aabb::from_center_size(center + *offset * quarter, child_size);
		}
	}

	/// Whether `obj_bounds` fits entirely inside this node's loose bounds.
	#[inline]
	pub(crate) fn encapsulates(&self, obj_bounds: &Aabb) -> bool {
		self.bounds.encapsulates(obj_bounds)
	}

	/// Octant of `point` relative to this node's center.
	#[inline]
	pub(crate) fn best_fit_child(&self, point: Vec3) -> usize {
		best_fit_child(self.center, point)
	}

	/// Whether this node or any descendant stores at least one entry.
	pub(crate) fn has_any_objects(&self) -> bool {
		if !self.objects.is_empty() {
			return true;
		}
		if let Some(children) = self.children.as_ref() {
			return children.iter().any(|child| child.has_any_objects());
		}
		false
	}

	/// Install pre-built children. Their bounds must line up with this
	/// node's child octants.
	pub(crate) fn set_children(&mut self, children: Box<[BoundsNode<T>; 8]>) {
		self.children = Some(children);
	}

	/// Insert into this node or the deepest child whose loose bounds still
	/// encapsulate `obj_bounds`. The bounds must already fit this node.
	pub(crate) fn insert(&mut self, obj: T, obj_bounds: Aabb) {
		if self.children.is_none() {
			// Leaf: keep the entry here while below the threshold, or when
			// splitting would create children smaller than the minimum size.
			if self.objects.len() < NUM_OBJECTS_ALLOWED || self.base_length / 2.0 < self.min_size {
				self.objects.push(BoundsEntry { obj, bounds: obj_bounds });
				return;
			}
			self.split();
		}

		let best_fit = self.best_fit_child(obj_bounds.center());
		match self.children.as_mut() {
			Some(children) if children[best_fit].encapsulates(&obj_bounds) => {
				children[best_fit].insert(obj, obj_bounds);
			}
			// Straddles octant boundaries: the entry stays at this level as
			// spillover.
			_ => self.objects.push(BoundsEntry { obj, bounds: obj_bounds }),
		}
	}

	/// Create the eight children and move down every entry that fits a
	/// child's loose bounds. The rest remain here as spillover.
	fn split(&mut self) {
		let quarter = self.base_length / 4.0;
		let child_length = self.base_length / 2.0;
		let mut children = Box::new(OCTANT_OFFSETS.map(|offset| {
			BoundsNode::new(
				child_length,
				self.min_size,
				self.looseness,
				self.center + offset * quarter,
			)
		}));
		for entry in std::mem::take(&mut self.objects) {
			let BoundsEntry { obj, bounds } = entry;
			let best_fit = best_fit_child(self.center, bounds.center());
			if children[best_fit].encapsulates(&bounds) {
				children[best_fit].insert(obj, bounds);
			} else {
				self.objects.push(BoundsEntry { obj, bounds });
			}
		}
		self.children = Some(children);
	}

	/// Remove by equality anywhere below this node.
	pub(crate) fn remove(&mut self, obj: &T) -> bool
	where
		T: PartialEq,
	{
		let mut removed = false;
		if let Some(index) = self.objects.iter().position(|entry| entry.obj == *obj) {
			self.objects.remove(index);
			removed = true;
		}
		if !removed {
			if let Some(children) = self.children.as_mut() {
				for child in children.iter_mut() {
					if child.remove(obj) {
						removed = true;
						break;
					}
				}
			}
		}
		if removed && self.children.is_some() && self.should_merge() {
			self.merge();
		}
		removed
	}

	/// Remove by equality, walking only the octant the bounds' center
	/// belongs to.
	pub(crate) fn remove_at(&mut self, obj: &T, obj_bounds: &Aabb) -> bool
	where
		T: PartialEq,
	{
		if !self.encapsulates(obj_bounds) {
			return false;
		}
		self.sub_remove(obj, obj_bounds)
	}

	fn sub_remove(&mut self, obj: &T, obj_bounds: &Aabb) -> bool
	where
		T: PartialEq,
	{
		let mut removed = false;
		if let Some(index) = self.objects.iter().position(|entry| entry.obj == *obj) {
			self.objects.remove(index);
			removed = true;
		}
		if !removed {
			if let Some(children) = self.children.as_mut() {
				let best_fit = best_fit_child(self.center, obj_bounds.center());
				removed = children[best_fit].sub_remove(obj, obj_bounds);
			}
		}
		if removed && self.children.is_some() && self.should_merge() {
			self.merge();
		}
		removed
	}

	/// Merging is allowed only when no grandchildren exist and everything
	/// fits back into a single node.
	fn should_merge(&self) -> bool {
		let mut total = self.objects.len();
		if let Some(children) = self.children.as_ref() {
			for child in children.iter() {
				if child.children.is_some() {
					return false;
				}
				total += child.objects.len();
			}
		}
		total <= NUM_OBJECTS_ALLOWED
	}

	/// Fold every child's entries back into this node and drop the children.
	fn merge(&mut self) {
		if let Some(children) = self.children.take() {
			for mut child in *children {
				self.objects.append(&mut child.objects);
			}
		}
	}

	/// Collapse the root one level when all content fits a single octant's
	/// loose bounds. Replaces `self` with the surviving child where
	/// possible; a no-op when the tree cannot shrink.
	pub(crate) fn shrink_if_possible(&mut self, min_length: f32) {
		if self.base_length < 2.0 * min_length {
			return;
		}
		if self.objects.is_empty() && self.children.is_none() {
			return;
		}

		// All direct entries must agree on a single octant, and each must
		// fit that octant's loose bounds for the smaller root to contain it.
		let mut best_fit: Option<usize> = None;
		for entry in &self.objects {
			let octant = best_fit_child(self.center, entry.bounds.center());
			match best_fit {
				Some(previous) if previous != octant => return,
				_ => {
					if !self.child_bounds[octant].encapsulates(&entry.bounds) {
						return;
					}
					best_fit = Some(octant);
				}
			}
		}

		// At most one child may hold content, and it must be that same
		// octant.
		if let Some(children) = self.children.as_ref() {
			let mut content_child: Option<usize> = None;
			for (i, child) in children.iter().enumerate() {
				if child.has_any_objects() {
					if content_child.is_some() {
						return;
					}
					if best_fit.is_some_and(|octant| octant != i) {
						return;
					}
					content_child = Some(i);
				}
			}
			if content_child.is_some() {
				best_fit = content_child;
			}
		}

		match (self.children.take(), best_fit) {
			(None, Some(octant)) => {
				// Leaf root: halve in place around the octant the entries
				// share.
				let center = self.child_bounds[octant].center();
				self.set_values(self.base_length / 2.0, center);
			}
			(Some(mut children), Some(octant)) => {
				// The surviving child becomes the new root; the empty
				// siblings and the old shell are dropped.
				std::mem::swap(self, &mut children[octant]);
			}
			(children, None) => {
				// Nothing stored anywhere: keep the root as it is.
				self.children = children;
			}
		}
	}

	/// Whether anything below this node intersects `check_bounds`.
	/// Short-circuits on the first hit.
	pub(crate) fn is_colliding_bounds(&self, check_bounds: &Aabb) -> bool {
		if !self.bounds.intersects(check_bounds) {
			return false;
		}
		if self
			.objects
			.iter()
			.any(|entry| entry.bounds.intersects(check_bounds))
		{
			return true;
		}
		if let Some(children) = self.children.as_ref() {
			return children
				.iter()
				.any(|child| child.is_colliding_bounds(check_bounds));
		}
		false
	}

	/// Whether anything below this node is hit by `ray` within
	/// `max_distance`. Short-circuits on the first hit.
	pub(crate) fn is_colliding_ray(&self, ray: &Ray, max_distance: f32) -> bool {
		match self.bounds.intersect_ray(ray) {
			Some(distance) if distance <= max_distance => {}
			_ => return false,
		}
		if self.objects.iter().any(|entry| {
			entry
				.bounds
				.intersect_ray(ray)
				.is_some_and(|distance| distance <= max_distance)
		}) {
			return true;
		}
		if let Some(children) = self.children.as_ref() {
			return children
				.iter()
				.any(|child| child.is_colliding_ray(ray, max_distance));
		}
		false
	}

	/// Append entries intersecting `check_bounds` to `result`.
	pub(crate) fn get_colliding_bounds<'a>(&'a self, check_bounds: &Aabb, result: &mut Vec<&'a T>) {
		if !self.bounds.intersects(check_bounds) {
			return;
		}

		for entry in &self.objects {
			if entry.bounds.intersects(check_bounds) {
				result.push(&entry.obj);
			}
		}

		if let Some(children) = self.children.as_ref() {
			for child in children.iter() {
				child.get_colliding_bounds(check_bounds, result);
			}
		}
	}

	/// Append entries hit by `ray` within `max_distance` to `result`.
	pub(crate) fn get_colliding_ray<'a>(
		&'a self,
		ray: &Ray,
		max_distance: f32,
		result: &mut Vec<&'a T>,
	) {
		match self.bounds.intersect_ray(ray) {
			Some(distance) if distance <= max_distance => {}
			_ => return,
		}

		for entry in &self.objects {
			if entry
				.bounds
				.intersect_ray(ray)
				.is_some_and(|distance| distance <= max_distance)
			{
				result.push(&entry.obj);
			}
		}

		if let Some(children) = self.children.as_ref() {
			for child in children.iter() {
				child.get_colliding_ray(ray, max_distance, result);
			}
		}
	}

	/// Append entries inside or intersecting the frustum to `result`.
	pub(crate) fn get_within_frustum<'a>(&'a self, planes: &[Plane; 6], result: &mut Vec<&'a T>) {
		if !test_planes_aabb(planes, &self.bounds) {
			return;
		}

		for entry in &self.objects {
			if test_planes_aabb(planes, &entry.bounds) {
				result.push(&entry.obj);
			}
		}

		if let Some(children) = self.children.as_ref() {
			for child in children.iter() {
				child.get_within_frustum(planes, result);
			}
		}
	}

	/// Append every entry below this node to `result`.
	pub(crate) fn get_all<'a>(&'a self, result: &mut Vec<&'a T>) {
		for entry in &self.objects {
			result.push(&entry.obj);
		}
		if let Some(children) = self.children.as_ref() {
			for child in children.iter() {
				child.get_all(result);
			}
		}
	}
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
