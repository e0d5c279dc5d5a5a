//! Recursive node of the point octree.

use glam::Vec3;
use smallvec::SmallVec;

use crate::geometry::{Aabb, Ray};
use crate::octant::{best_fit_child, NUM_OBJECTS_ALLOWED, OCTANT_OFFSETS};

/// A stored payload together with the point it lives at.
#[derive(Clone, Debug)]
pub(crate) struct PointEntry<T> {
	pub(crate) obj: T,
	pub(crate) pos: Vec3,
}

/// Recursive unit of the point octree.
///
/// Owns the entries stored directly at this level plus either zero or eight
/// children. A node with children holds no direct entries; adds always push
/// down into the best-fit octant.
pub(crate) struct PointNode<T> {
	pub(crate) center: Vec3,
	pub(crate) base_length: f32,
	pub(crate) min_size: f32,
	pub(crate) bounds: Aabb,
	/// Bounds the eight children have (or would have after a split).
	pub(crate) child_bounds: [Aabb; 8],
	pub(crate) objects: SmallVec<[PointEntry<T>; NUM_OBJECTS_ALLOWED]>,
	pub(crate) children: Option<Box<[PointNode<T>; 8]>>,
}

impl<T> PointNode<T> {
	pub(crate) fn new(base_length: f32, min_size: f32, center: Vec3) -> Self {
		let mut node = Self {
			center,
			base_length,
			min_size,
			bounds: Aabb::from_center_size(center, Vec3::splat(base_length)),
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
		self.bounds = Aabb::from_center_size(center, Vec3::splat(base_length));
		let quarter = base_length / 4.0;
		let child_size = Vec3::splat(base_length / 2.0);
		for (i, offset) in OCTANT_OFFSETS.iter().enumerate() {
			self.child_bounds[i] = Aabb::from_center_size(center + *offset * quarter, child_size);
		}
	}

	/// Whether `pos` falls inside this node's bounds.
	#[inline]
	pub(crate) fn encapsulates(&self, pos: Vec3) -> bool {
		self.bounds.contains_point(pos)
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
	pub(crate) fn set_children(&mut self, children: Box<[PointNode<T>; 8]>) {
		self.children = Some(children);
	}

	/// Insert into this node or the best-fit descendant. `pos` must already
	/// be inside this node's bounds.
	pub(crate) fn insert(&mut self, obj: T, pos: Vec3) {
		if self.children.is_none() {
			// Leaf: keep the entry here while below the threshold, or when
			// splitting would create children smaller than the minimum size.
			if self.objects.len() < NUM_OBJECTS_ALLOWED || self.base_length / 2.0 < self.min_size {
				self.objects.push(PointEntry { obj, pos });
				return;
			}
			self.split();
		}

		let best_fit = self.best_fit_child(pos);
		match self.children.as_mut() {
			Some(children) => children[best_fit].insert(obj, pos),
			// split() above always installs children; keep the entry rather
			// than lose it
			None => self.objects.push(PointEntry { obj, pos }),
		}
	}

	/// Create the eight children and re-sort this node's entries into them.
	fn split(&mut self) {
		let quarter = self.base_length / 4.0;
		let child_length = self.base_length / 2.0;
		let mut children = Box::new(OCTANT_OFFSETS.map(|offset| {
			PointNode::new(child_length, self.min_size, self.center + offset * quarter)
		}));
		for entry in std::mem::take(&mut self.objects) {
			let best_fit = best_fit_child(self.center, entry.pos);
			children[best_fit].insert(entry.obj, entry.pos);
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

	/// Remove by equality, walking only the octant `pos` belongs to.
	pub(crate) fn remove_at(&mut self, obj: &T, pos: Vec3) -> bool
	where
		T: PartialEq,
	{
		if !self.encapsulates(pos) {
			return false;
		}
		self.sub_remove(obj, pos)
	}

	fn sub_remove(&mut self, obj: &T, pos: Vec3) -> bool
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
				let best_fit = best_fit_child(self.center, pos);
				removed = children[best_fit].sub_remove(obj, pos);
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

	/// Collapse the root one level when all content fits a single octant.
	/// Replaces `self` with the surviving child where possible; a no-op when
	/// the tree cannot shrink.
	pub(crate) fn shrink_if_possible(&mut self, min_length: f32) {
		if self.base_length < 2.0 * min_length {
			return;
		}
		if self.objects.is_empty() && self.children.is_none() {
			return;
		}

		// All direct entries must agree on a single octant.
		let mut best_fit: Option<usize> = None;
		for entry in &self.objects {
			let octant = best_fit_child(self.center, entry.pos);
			match best_fit {
				Some(previous) if previous != octant => return,
				_ => best_fit = Some(octant),
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

	/// Append entries within `max_distance` of `ray` to `result`.
	pub(crate) fn get_nearby_ray<'a>(
		&'a self,
		ray: &Ray,
		max_distance: f32,
		result: &mut Vec<&'a T>,
	) {
		// Expanded-AABB prune: over-approximates, the per-entry distance
		// test filters the false positives.
		if self.bounds.expanded_by(max_distance).intersect_ray(ray).is_none() {
			return;
		}

		let sqr_max = max_distance * max_distance;
		for entry in &self.objects {
			if ray.sqr_distance_to_point(entry.pos) <= sqr_max {
				result.push(&entry.obj);
			}
		}

		if let Some(children) = self.children.as_ref() {
			for child in children.iter() {
				child.get_nearby_ray(ray, max_distance, result);
			}
		}
	}

	/// Append entries within `max_distance` of `position` to `result`.
	pub(crate) fn get_nearby_point<'a>(
		&'a self,
		position: Vec3,
		max_distance: f32,
		result: &mut Vec<&'a T>,
	) {
		let sqr_max = max_distance * max_distance;
		if self.bounds.closest_point(position).distance_squared(position) > sqr_max {
			return;
		}

		for entry in &self.objects {
			if entry.pos.distance_squared(position) <= sqr_max {
				result.push(&entry.obj);
			}
		}

		if let Some(children) = self.children.as_ref() {
			for child in children.iter() {
				child.get_nearby_point(position, max_distance, result);
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
