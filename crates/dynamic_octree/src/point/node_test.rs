use glam::Vec3;

use super::*;

fn leaf(base_length: f32, min_size: f32) -> PointNode<i32> {
  PointNode::new(base_length, min_size, Vec3::ZERO)
}

/// All 8 octants must resolve per the index formula:
/// +1 for x > cx, +2 for z > cz, +4 for y < cy.
#[test]
fn test_best_fit_child_all_octants() {
  let node = leaf(2.0, 1.0);

  assert_eq!(node.best_fit_child(Vec3::new(-0.5, 0.5, -0.5)), 0);
  assert_eq!(node.best_fit_child(Vec3::new(0.5, 0.5, -0.5)), 1);
  assert_eq!(node.best_fit_child(Vec3::new(-0.5, 0.5, 0.5)), 2);
  assert_eq!(node.best_fit_child(Vec3::new(0.5, 0.5, 0.5)), 3);
  assert_eq!(node.best_fit_child(Vec3::new(-0.5, -0.5, -0.5)), 4);
  assert_eq!(node.best_fit_child(Vec3::new(0.5, -0.5, -0.5)), 5);
  assert_eq!(node.best_fit_child(Vec3::new(-0.5, -0.5, 0.5)), 6);
  assert_eq!(node.best_fit_child(Vec3::new(0.5, -0.5, 0.5)), 7);
}

/// Child bounds must be centered a quarter of the side length away from the
/// node center, with half the side length.
#[test]
fn test_child_bounds_layout() {
  let node = leaf(4.0, 1.0);

  for (i, child_bounds) in node.child_bounds.iter().enumerate() {
    assert_eq!(child_bounds.size(), Vec3::splat(2.0), "octant {} size", i);
    let offset = child_bounds.center() - node.center;
    assert_eq!(
      node.best_fit_child(node.center + offset),
      i,
      "octant {} center {:?} must map back to its own index",
      i,
      child_bounds.center()
    );
  }
}

/// Up to 8 entries stay direct; the 9th forces a split and the point
/// variant redistributes every entry into the children.
#[test]
fn test_insert_splits_at_threshold() {
  let mut node = leaf(2.0, 1.0);

  for i in 0..8 {
    node.insert(i, Vec3::splat(-0.5) + Vec3::splat(0.1) * i as f32);
  }
  assert!(node.children.is_none());
  assert_eq!(node.objects.len(), 8);

  node.insert(8, Vec3::splat(0.5));
  assert!(node.children.is_some());
  assert!(
    node.objects.is_empty(),
    "point nodes hold no direct entries once split"
  );

  let children = node.children.as_ref().unwrap();
  let total: usize = children.iter().map(|child| child.objects.len()).sum();
  assert_eq!(total, 9);
}

/// Splitting is suppressed when children would fall below the minimum node
/// size; the node then holds any number of entries.
#[test]
fn test_min_size_suppresses_split() {
  let mut node = leaf(1.5, 1.0);

  for i in 0..20 {
    node.insert(i, Vec3::splat(-0.7) + Vec3::splat(0.07) * i as f32);
  }
  assert!(node.children.is_none());
  assert_eq!(node.objects.len(), 20);
}

/// Removing below the threshold folds the children back into the parent.
#[test]
fn test_remove_triggers_merge() {
  let mut node = leaf(2.0, 1.0);

  // One entry per octant corner plus one extra: 9 entries force a split.
  for (i, offset) in crate::octant::OCTANT_OFFSETS.iter().enumerate() {
    node.insert(i as i32, *offset * 0.5);
  }
  node.insert(8, Vec3::splat(0.25));
  assert!(node.children.is_some());

  assert!(node.remove(&8));
  assert!(
    node.children.is_none(),
    "8 remaining entries must merge back into one node"
  );
  assert_eq!(node.objects.len(), 8);
}

/// A node with grandchildren must not merge, no matter the counts.
#[test]
fn test_grandchildren_block_merge() {
  let mut node = leaf(4.0, 1.0);

  // 10 clustered entries: the root splits, everything lands in one child,
  // which immediately splits again.
  for i in 0..10 {
    node.insert(i, Vec3::new(0.5, 0.5, 0.5 + 0.001 * i as f32));
  }
  let children = node.children.as_ref().unwrap();
  assert!(
    children.iter().any(|child| child.children.is_some()),
    "expected a grandchild level"
  );

  // 9 entries remain below the split child, so neither it nor the root may
  // merge.
  assert!(node.remove(&0));
  let children = node.children.as_ref().unwrap();
  assert!(
    children.iter().any(|child| child.children.is_some()),
    "root must not merge while a child still has children"
  );
}

/// Dropping to the threshold merges every level whose condition holds, in
/// one removal.
#[test]
fn test_merge_cascades_to_root() {
  let mut node = leaf(4.0, 1.0);

  for i in 0..9 {
    node.insert(i, Vec3::new(0.5, 0.5, 0.5 + 0.001 * i as f32));
  }
  assert!(node.children.is_some());

  // 8 remain: the grandchild level folds into the child, which lets the
  // root fold as well.
  assert!(node.remove(&0));
  assert!(node.children.is_none());
  assert_eq!(node.objects.len(), 8);
}

/// A leaf root whose entries share an octant halves in place around that
/// octant's center.
#[test]
fn test_shrink_reparameterizes_leaf() {
  let mut node = leaf(4.0, 1.0);
  node.insert(1, Vec3::new(1.0, 1.0, -1.0));
  node.insert(2, Vec3::new(0.5, 1.5, -0.5));

  node.shrink_if_possible(1.0);

  assert_eq!(node.base_length, 2.0);
  assert_eq!(node.center, Vec3::new(1.0, 1.0, -1.0));
  assert_eq!(node.objects.len(), 2);
  for entry in &node.objects {
    assert!(node.bounds.contains_point(entry.pos));
  }
}

/// Entries in different octants keep the root as it is.
#[test]
fn test_shrink_refuses_disagreeing_octants() {
  let mut node = leaf(4.0, 1.0);
  node.insert(1, Vec3::new(1.0, 1.0, -1.0));
  node.insert(2, Vec3::new(-1.0, 1.0, -1.0));

  node.shrink_if_possible(1.0);

  assert_eq!(node.base_length, 4.0);
  assert_eq!(node.center, Vec3::ZERO);
}

/// Shrinking promotes the single non-empty child to be the new root.
#[test]
fn test_shrink_promotes_content_child() {
  let mut node = leaf(4.0, 1.0);
  for i in 0..9 {
    node.insert(i, Vec3::new(0.5, 0.5, 0.5 + 0.001 * i as f32));
  }
  assert!(node.children.is_some());

  node.shrink_if_possible(1.0);

  // Child 3 (+x +y +z) of a side-4 root is centered at (1, 1, 1).
  assert_eq!(node.base_length, 2.0);
  assert_eq!(node.center, Vec3::new(1.0, 1.0, 1.0));
  assert!(node.has_any_objects());
}

/// Shrinking stops at twice the minimum length.
#[test]
fn test_shrink_respects_min_length() {
  let mut node = leaf(2.0, 1.0);
  node.insert(1, Vec3::new(0.5, 0.5, 0.5));

  node.shrink_if_possible(1.5);

  assert_eq!(node.base_length, 2.0, "2.0 < 2 * 1.5 so no shrink");
}

/// remove_at prunes by encapsulation: a position outside the node finds
/// nothing even when the payload is stored.
#[test]
fn test_remove_at_outside_bounds() {
  let mut node = leaf(2.0, 1.0);
  node.insert(1, Vec3::splat(0.5));

  assert!(!node.remove_at(&1, Vec3::splat(10.0)));
  assert_eq!(node.objects.len(), 1);

  assert!(node.remove_at(&1, Vec3::splat(0.5)));
  assert!(node.objects.is_empty());
}
