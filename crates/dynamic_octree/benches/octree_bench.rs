//! Benchmarks for octree insertion, queries, and removal.
//!
//! All benchmarks use the same workload: a fixed set of pseudo-random
//! positions (or boxes) spread over a 80-unit cube, inserted into a tree
//! with an 8-unit initial root so growth paths are exercised too.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use dynamic_octree::{Aabb, BoundsOctree, PointOctree, Ray};

const OBJECT_COUNT: usize = 1_000;

fn random_positions(seed: u64) -> Vec<Vec3> {
	let mut rng = StdRng::seed_from_u64(seed);
	(0..OBJECT_COUNT)
		.map(|_| {
			Vec3::new(
				rng.gen_range(-40.0..40.0),
				rng.gen_range(-40.0..40.0),
				rng.gen_range(-40.0..40.0),
			)
		})
		.collect()
}

fn random_boxes(seed: u64) -> Vec<Aabb> {
	let mut rng = StdRng::seed_from_u64(seed);
	(0..OBJECT_COUNT)
		.map(|_| {
			let center = Vec3::new(
				rng.gen_range(-40.0..40.0),
				rng.gen_range(-40.0..40.0),
				rng.gen_range(-40.0..40.0),
			);
			Aabb::from_center_size(center, Vec3::splat(rng.gen_range(0.2..4.0)))
		})
		.collect()
}

fn bench_point_octree(c: &mut Criterion) {
	let positions = random_positions(1);

	let mut group = c.benchmark_group("point_octree");
	group.throughput(Throughput::Elements(OBJECT_COUNT as u64));

	group.bench_function("insert", |b| {
		b.iter(|| {
			let mut tree = PointOctree::new(8.0, Vec3::ZERO, 1.0);
			for (i, pos) in positions.iter().enumerate() {
				tree.add(i, *pos);
			}
			black_box(tree.count())
		})
	});

	let mut tree = PointOctree::new(8.0, Vec3::ZERO, 1.0);
	for (i, pos) in positions.iter().enumerate() {
		tree.add(i, *pos);
	}

	group.bench_function("get_nearby_point", |b| {
		b.iter(|| black_box(tree.get_nearby_point(Vec3::new(5.0, -3.0, 1.0), 10.0).len()))
	});

	let ray = Ray::new(Vec3::new(-50.0, 0.0, 0.0), Vec3::X);
	group.bench_function("get_nearby_ray", |b| {
		b.iter(|| black_box(tree.get_nearby_ray(&ray, 5.0).len()))
	});

	group.bench_function("remove_at", |b| {
		b.iter(|| {
			let mut tree = PointOctree::new(8.0, Vec3::ZERO, 1.0);
			for (i, pos) in positions.iter().enumerate() {
				tree.add(i, *pos);
			}
			for (i, pos) in positions.iter().enumerate() {
				tree.remove_at(&i, *pos);
			}
			black_box(tree.count())
		})
	});

	group.finish();
}

fn bench_bounds_octree(c: &mut Criterion) {
	let boxes = random_boxes(2);

	let mut group = c.benchmark_group("bounds_octree");
	group.throughput(Throughput::Elements(OBJECT_COUNT as u64));

	group.bench_function("insert", |b| {
		b.iter(|| {
			let mut tree = BoundsOctree::new(8.0, Vec3::ZERO, 1.0, 1.2);
			for (i, bounds) in boxes.iter().enumerate() {
				tree.add(i, *bounds);
			}
			black_box(tree.count())
		})
	});

	let mut tree = BoundsOctree::new(8.0, Vec3::ZERO, 1.0, 1.2);
	for (i, bounds) in boxes.iter().enumerate() {
		tree.add(i, *bounds);
	}

	let query = Aabb::from_center_size(Vec3::new(5.0, -3.0, 1.0), Vec3::splat(12.0));
	group.bench_function("get_colliding_bounds", |b| {
		b.iter(|| black_box(tree.get_colliding_bounds(&query).len()))
	});

	let ray = Ray::new(Vec3::new(-50.0, 0.0, 0.0), Vec3::X);
	group.bench_function("is_colliding_ray", |b| {
		b.iter(|| black_box(tree.is_colliding_ray(&ray, f32::INFINITY)))
	});

	group.finish();
}

criterion_group!(benches, bench_point_octree, bench_bounds_octree);
criterion_main!(benches);
