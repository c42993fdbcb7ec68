//! Collision pipeline benchmarks (criterion).
//!
//! Run: cargo bench --bench collision_bench -- narrow_phase

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use phys_contact::collision::NarrowPhase;
use phys_contact::math::{Quaternion, Transform, Vector3};
use phys_contact::shapes::{Shape, WorldShape};
use phys_contact::{Collider, PhysicsWorld, RigidBody};

fn at(shape: Shape, position: Vector3) -> WorldShape {
    shape.to_world(&Transform::from_position(position))
}

fn bench_narrow_phase(c: &mut Criterion) {
    let mut group = c.benchmark_group("narrow_phase");

    let cases = [
        ("sphere_sphere", at(Shape::sphere(1.0), Vector3::zeros()), at(Shape::sphere(1.0), Vector3::new(1.5, 0.0, 0.0))),
        (
            "box_box",
            at(Shape::cuboid(Vector3::new(1.0, 1.0, 1.0)), Vector3::zeros()),
            Shape::cuboid(Vector3::new(1.0, 1.0, 1.0)).to_world(&Transform::from_position_rotation(
                Vector3::new(0.0, 1.8, 0.0),
                Quaternion::from_euler_angles(0.1, 0.3, 0.0),
            )),
        ),
        (
            "capsule_cylinder",
            at(Shape::capsule(0.5, 1.0), Vector3::new(2.4, 0.0, 0.0)),
            at(Shape::cylinder(2.0, 2.0), Vector3::zeros()),
        ),
        (
            "polytope_polytope",
            at(Shape::polytope(&cube(1.0)), Vector3::zeros()),
            at(Shape::polytope(&cube(1.0)), Vector3::new(1.5, 0.2, 0.1)),
        ),
    ];

    for (name, a, b) in &cases {
        group.bench_function(*name, |bench| {
            bench.iter(|| NarrowPhase::collide(black_box(a), black_box(b)));
        });
    }

    group.finish();
}

fn bench_world_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_step/falling_spheres");

    for &n in &[10usize, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |bench, &n| {
            bench.iter_batched(
                || sphere_pile(n),
                |mut world| {
                    for _ in 0..10 {
                        let _ = world.step(1.0 / 60.0);
                    }
                    world
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn sphere_pile(n: usize) -> PhysicsWorld {
    let mut world = PhysicsWorld::new();

    let ground = world.add_body(RigidBody::new_static(Vector3::new(0.0, -0.5, 0.0)));
    let _ = world.add_collider(Collider::attached(Shape::cuboid(Vector3::new(50.0, 0.5, 50.0)), ground));

    for i in 0..n {
        let position = Vector3::new((i % 5) as f32 * 0.9, 0.5 + (i / 5) as f32 * 1.1, 0.0);
        let body = world.add_body(RigidBody::new_dynamic(position));
        let _ = world.add_collider(Collider::attached(Shape::sphere(0.5), body));
    }

    world
}

fn cube(h: f32) -> Vec<Vector3> {
    (0..8)
        .map(|i| Vector3::new(if i & 1 == 0 { -h } else { h }, if i & 2 == 0 { -h } else { h }, if i & 4 == 0 { -h } else { h }))
        .collect()
}

criterion_group!(benches, bench_narrow_phase, bench_world_step);
criterion_main!(benches);
