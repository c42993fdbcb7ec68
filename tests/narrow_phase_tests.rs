use phys_contact::{
    collision::{ContactBuffer, NarrowPhase, ReferenceSide},
    error::PhysicsError,
    math::{Quaternion, Transform, Vector3},
    shapes::{Shape, ShapeType, WorldShape},
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::f32::consts::FRAC_PI_2;
use approx::assert_relative_eq;

fn at(shape: Shape, position: Vector3) -> WorldShape {
    shape.to_world(&Transform::from_position(position))
}

fn posed(shape: Shape, position: Vector3, rotation: Quaternion) -> WorldShape {
    shape.to_world(&Transform::from_position_rotation(position, rotation))
}

fn contacts(a: &WorldShape, b: &WorldShape) -> ContactBuffer {
    let result = NarrowPhase::collide(a, b).expect("supported pair");
    let mut out = ContactBuffer::new();
    NarrowPhase::calculate_contacts(a, b, &result, &mut out).expect("supported pair");
    out
}

fn random_pose(rng: &mut StdRng) -> (Vector3, Quaternion) {
    let position = Vector3::new(rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0));
    let rotation = Quaternion::from_euler_angles(
        rng.gen_range(-3.1..3.1),
        rng.gen_range(-1.5..1.5),
        rng.gen_range(-3.1..3.1),
    );
    (position, rotation)
}

/// Swapping the arguments must flip the direction and the contact normals and keep everything else
fn assert_symmetric(a: &WorldShape, b: &WorldShape) {
    let ab = NarrowPhase::collide(a, b).expect("supported pair");
    let ba = NarrowPhase::collide(b, a).expect("supported pair");

    assert_eq!(ab.collision_found, ba.collision_found);
    if !ab.collision_found {
        return;
    }

    assert_relative_eq!(ab.penetration, ba.penetration, epsilon = 1e-5);
    assert_relative_eq!(ab.direction, -ba.direction, epsilon = 1e-5);
    assert_eq!(ab.reference, ba.reference.flipped());

    let contacts_ab = contacts(a, b);
    let contacts_ba = contacts(b, a);
    assert_eq!(contacts_ab.len(), contacts_ba.len());

    for (p, q) in contacts_ab.iter().zip(contacts_ba.iter()) {
        assert_relative_eq!(p.position, q.position, epsilon = 1e-5);
        assert_relative_eq!(p.normal, -q.normal, epsilon = 1e-5);
        assert_relative_eq!(p.penetration, q.penetration, epsilon = 1e-5);
    }
}

#[test]
fn test_sphere_sphere_penetration() {
    let a = at(Shape::sphere(1.0), Vector3::zeros());
    let b = at(Shape::sphere(1.0), Vector3::new(1.5, 0.0, 0.0));

    let result = NarrowPhase::collide(&a, &b).unwrap();
    assert!(result.collision_found);
    assert_relative_eq!(result.penetration, 0.5, epsilon = 1e-6);
    assert_relative_eq!(result.direction, Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-6);

    let points = contacts(&a, &b);
    assert_eq!(points.len(), 1);
    assert_relative_eq!(points[0].position, Vector3::new(0.75, 0.0, 0.0), epsilon = 1e-6);
    assert_relative_eq!(points[0].normal, Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
}

#[test]
fn test_touching_spheres_do_not_collide() {
    let a = at(Shape::sphere(1.0), Vector3::zeros());
    let b = at(Shape::sphere(1.0), Vector3::new(2.0, 0.0, 0.0));

    let result = NarrowPhase::collide(&a, &b).unwrap();
    assert!(!result.collision_found);
    assert_eq!(result.penetration, f32::MAX);

    let points = contacts(&a, &b);
    assert!(points.is_empty());
}

#[test]
fn test_box_box_separating_axis() {
    let a = at(Shape::cuboid(Vector3::new(1.0, 1.0, 1.0)), Vector3::zeros());

    let far = at(Shape::cuboid(Vector3::new(1.0, 1.0, 1.0)), Vector3::new(3.0, 0.0, 0.0));
    assert!(!NarrowPhase::collide(&a, &far).unwrap().collision_found);

    let touching = at(Shape::cuboid(Vector3::new(1.0, 1.0, 1.0)), Vector3::new(2.0, 0.0, 0.0));
    assert!(!NarrowPhase::collide(&a, &touching).unwrap().collision_found);

    let near = at(Shape::cuboid(Vector3::new(1.0, 1.0, 1.0)), Vector3::new(1.5, 0.0, 0.0));
    let result = NarrowPhase::collide(&a, &near).unwrap();
    assert!(result.collision_found);
    assert_relative_eq!(result.penetration, 0.5, epsilon = 1e-5);
    assert_relative_eq!(result.direction, Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-5);
    assert_eq!(result.reference, ReferenceSide::First);
}

#[test]
fn test_box_resting_on_box_gives_face_contacts() {
    let ground = at(Shape::cuboid(Vector3::new(1.0, 1.0, 1.0)), Vector3::zeros());
    let crate_box = at(Shape::cuboid(Vector3::new(1.0, 1.0, 1.0)), Vector3::new(0.0, 1.9, 0.0));

    let points = contacts(&ground, &crate_box);
    assert_eq!(points.len(), 4);

    for point in &points {
        assert_relative_eq!(point.penetration, 0.1, epsilon = 1e-4);
        assert_relative_eq!(point.normal, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(point.position.y, 0.95, epsilon = 1e-4);
    }

    // Every corner gets its own feature id
    for (i, p) in points.iter().enumerate() {
        for q in points.iter().skip(i + 1) {
            assert_ne!(p.feature, q.feature);
        }
    }
}

#[test]
fn test_sphere_box_face_contact() {
    let sphere = at(Shape::sphere(1.0), Vector3::new(1.5, 0.0, 0.0));
    let cube = at(Shape::cuboid(Vector3::new(1.0, 1.0, 1.0)), Vector3::zeros());

    let result = NarrowPhase::collide(&sphere, &cube).unwrap();
    assert!(result.collision_found);
    assert_relative_eq!(result.penetration, 0.5, epsilon = 1e-5);
    assert_relative_eq!(result.direction, Vector3::new(-1.0, 0.0, 0.0), epsilon = 1e-5);

    let far = at(Shape::sphere(1.0), Vector3::new(2.5, 0.0, 0.0));
    assert!(!NarrowPhase::collide(&far, &cube).unwrap().collision_found);
}

#[test]
fn test_sphere_capsule_and_capsule_capsule() {
    let capsule = at(Shape::capsule(0.5, 2.0), Vector3::zeros());

    // Beside the spine
    let sphere = at(Shape::sphere(0.5), Vector3::new(0.8, 0.5, 0.0));
    let result = NarrowPhase::collide(&sphere, &capsule).unwrap();
    assert!(result.collision_found);
    assert_relative_eq!(result.penetration, 0.2, epsilon = 1e-5);
    assert_relative_eq!(result.direction, Vector3::new(-1.0, 0.0, 0.0), epsilon = 1e-5);

    // Two parallel capsules side by side
    let other = at(Shape::capsule(0.5, 2.0), Vector3::new(0.9, 0.0, 0.0));
    let result = NarrowPhase::collide(&capsule, &other).unwrap();
    assert!(result.collision_found);
    assert_relative_eq!(result.penetration, 0.1, epsilon = 1e-5);
    assert_relative_eq!(result.direction, Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-5);
}

#[test]
fn test_capsule_lying_flush_on_cylinder_cap() {
    let cylinder = at(Shape::cylinder(2.0, 2.0), Vector3::zeros());
    let capsule = posed(
        Shape::capsule(0.5, 1.0),
        Vector3::new(0.0, 1.3, 0.0),
        Quaternion::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2),
    );

    let result = NarrowPhase::collide(&capsule, &cylinder).unwrap();
    assert!(result.collision_found);
    assert_relative_eq!(result.penetration, 0.2, epsilon = 1e-4);
    assert_relative_eq!(result.direction, Vector3::new(0.0, -1.0, 0.0), epsilon = 1e-5);
    assert_eq!(result.reference, ReferenceSide::Second);

    let points = contacts(&capsule, &cylinder);
    assert_eq!(points.len(), 2);
    for point in &points {
        assert_relative_eq!(point.penetration, 0.2, epsilon = 1e-4);
        assert_relative_eq!(point.position.y, 0.9, epsilon = 1e-4);
        assert_relative_eq!(point.position.x.abs(), 0.5, epsilon = 1e-4);
    }
}

#[test]
fn test_capsule_beside_cylinder_side() {
    let cylinder = at(Shape::cylinder(2.0, 2.0), Vector3::zeros());
    let capsule = at(Shape::capsule(0.5, 1.0), Vector3::new(2.4, 0.0, 0.0));

    let result = NarrowPhase::collide(&capsule, &cylinder).unwrap();
    assert!(result.collision_found);
    assert_relative_eq!(result.penetration, 0.1, epsilon = 1e-4);
    assert_relative_eq!(result.direction, Vector3::new(-1.0, 0.0, 0.0), epsilon = 1e-5);

    let points = contacts(&capsule, &cylinder);
    assert_eq!(points.len(), 1);

    // Mirrored order reports the opposite direction
    let mirrored = NarrowPhase::collide(&cylinder, &capsule).unwrap();
    assert_relative_eq!(mirrored.direction, Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-5);

    let apart = at(Shape::capsule(0.5, 1.0), Vector3::new(3.0, 0.0, 0.0));
    assert!(!NarrowPhase::collide(&apart, &cylinder).unwrap().collision_found);
}

#[test]
fn test_single_capsule_endpoint_over_cylinder_cap() {
    let cylinder = at(Shape::cylinder(2.0, 2.0), Vector3::zeros());
    // Standing upright, lower spine end 0.3 above the top cap
    let capsule = at(Shape::capsule(0.5, 1.0), Vector3::new(0.5, 1.8, 0.0));

    let result = NarrowPhase::collide(&capsule, &cylinder).unwrap();
    assert!(result.collision_found);
    assert_relative_eq!(result.penetration, 0.2, epsilon = 1e-4);
    assert_relative_eq!(result.direction, Vector3::new(0.0, -1.0, 0.0), epsilon = 1e-5);

    let points = contacts(&capsule, &cylinder);
    assert_eq!(points.len(), 1);
    assert_relative_eq!(points[0].penetration, 0.2, epsilon = 1e-4);
    assert_relative_eq!(points[0].position, Vector3::new(0.5, 0.9, 0.0), epsilon = 1e-4);
}

#[test]
fn test_capsule_across_cylinder_rim() {
    let cylinder = at(Shape::cylinder(2.0, 2.0), Vector3::zeros());
    // Spine along Z, above the cap plane and outside the disc
    let capsule = posed(
        Shape::capsule(0.5, 1.0),
        Vector3::new(2.3, 1.3, 0.0),
        Quaternion::from_axis_angle(&Vector3::x_axis(), FRAC_PI_2),
    );

    let result = NarrowPhase::collide(&capsule, &cylinder).unwrap();
    assert!(result.collision_found);
    assert_relative_eq!(result.penetration, 0.5 - 0.18f32.sqrt(), epsilon = 1e-4);
    let diagonal = Vector3::new(-1.0, -1.0, 0.0).normalize();
    assert_relative_eq!(result.direction, diagonal, epsilon = 1e-4);

    let points = contacts(&capsule, &cylinder);
    assert_eq!(points.len(), 1);
    assert_relative_eq!(points[0].normal, diagonal, epsilon = 1e-4);

    // Pulled away from the rim, the capsule clears it
    let clear = posed(
        Shape::capsule(0.5, 1.0),
        Vector3::new(2.4, 1.4, 0.0),
        Quaternion::from_axis_angle(&Vector3::x_axis(), FRAC_PI_2),
    );
    assert!(!NarrowPhase::collide(&clear, &cylinder).unwrap().collision_found);
}

#[test]
fn test_round_shapes_against_boxes_through_gjk_epa() {
    let cube = at(Shape::cuboid(Vector3::new(1.0, 1.0, 1.0)), Vector3::zeros());

    let capsule = at(Shape::capsule(0.5, 1.0), Vector3::new(1.3, 0.0, 0.0));
    let cylinder = at(Shape::cylinder(0.5, 1.0), Vector3::new(1.3, 0.0, 0.0));
    for other in [&capsule, &cylinder] {
        let result = NarrowPhase::collide(&cube, other).unwrap();
        assert!(result.collision_found);
        assert_relative_eq!(result.penetration, 0.2, epsilon = 1e-2);
        assert_relative_eq!(result.direction, Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-2);

        let points = contacts(other, &cube);
        assert_eq!(points.len(), 1);
        assert!(points[0].is_finite());
    }

    // Sphere resting on a cylinder cap
    let drum = at(Shape::cylinder(2.0, 2.0), Vector3::zeros());
    let sphere = at(Shape::sphere(0.5), Vector3::new(0.0, 1.3, 0.0));
    let result = NarrowPhase::collide(&sphere, &drum).unwrap();
    assert!(result.collision_found);
    assert_relative_eq!(result.penetration, 0.2, epsilon = 1e-2);
    assert_relative_eq!(result.direction, Vector3::new(0.0, -1.0, 0.0), epsilon = 1e-2);

    let far = at(Shape::capsule(0.5, 1.0), Vector3::new(2.0, 0.0, 0.0));
    assert!(!NarrowPhase::collide(&cube, &far).unwrap().collision_found);
}

#[test]
fn test_polytope_cubes_through_gjk_epa() {
    let a = at(Shape::polytope(&cube_points(1.0)), Vector3::zeros());
    let b = at(Shape::polytope(&cube_points(1.0)), Vector3::new(1.5, 0.0, 0.0));

    let result = NarrowPhase::collide(&a, &b).unwrap();
    assert!(result.collision_found);
    assert_relative_eq!(result.penetration, 0.5, epsilon = 1e-3);
    assert_relative_eq!(result.direction, Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-3);

    let points = contacts(&a, &b);
    assert_eq!(points.len(), 1);
    assert!(points[0].is_finite());

    let far = at(Shape::polytope(&cube_points(1.0)), Vector3::new(3.0, 0.0, 0.0));
    assert!(!NarrowPhase::collide(&a, &far).unwrap().collision_found);
}

#[test]
fn test_box_polytope_agrees_with_box_box() {
    let cube = at(Shape::cuboid(Vector3::new(1.0, 1.0, 1.0)), Vector3::zeros());
    let hull = at(Shape::polytope(&cube_points(1.0)), Vector3::new(0.0, 1.6, 0.0));
    let boxed = at(Shape::cuboid(Vector3::new(1.0, 1.0, 1.0)), Vector3::new(0.0, 1.6, 0.0));

    let via_gjk = NarrowPhase::collide(&cube, &hull).unwrap();
    let via_sat = NarrowPhase::collide(&cube, &boxed).unwrap();

    assert!(via_gjk.collision_found && via_sat.collision_found);
    assert_relative_eq!(via_gjk.penetration, via_sat.penetration, epsilon = 1e-3);
    assert_relative_eq!(via_gjk.direction, via_sat.direction, epsilon = 1e-3);
}

#[test]
fn test_mirrored_routines_are_symmetric() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..200 {
        let (pa, ra) = random_pose(&mut rng);
        let (pb, rb) = random_pose(&mut rng);

        let sphere = posed(Shape::sphere(rng.gen_range(0.2..1.5)), pa, ra);
        let cube = posed(Shape::cuboid(Vector3::new(1.0, 0.5, 0.75)), pb, rb);
        assert_symmetric(&sphere, &cube);

        let capsule = posed(Shape::capsule(0.4, 1.2), pb, rb);
        assert_symmetric(&sphere, &capsule);

        let cylinder = posed(Shape::cylinder(0.8, 1.5), pa, ra);
        assert_symmetric(&capsule, &cylinder);

        let hull = posed(Shape::polytope(&cube_points(0.7)), pb, rb);
        assert_symmetric(&sphere, &hull);
    }
}

#[test]
fn test_degenerate_shapes_produce_finite_results() {
    let point_sphere = at(Shape::sphere(0.0), Vector3::zeros());
    let unit_sphere = at(Shape::sphere(1.0), Vector3::zeros());
    let flat_capsule = at(Shape::capsule(0.5, 0.0), Vector3::zeros());
    let cube = at(Shape::cuboid(Vector3::new(1.0, 1.0, 1.0)), Vector3::zeros());

    // Two zero-radius spheres at the same spot only touch
    assert!(!NarrowPhase::collide(&point_sphere, &point_sphere).unwrap().collision_found);

    let pairs = [
        (&point_sphere, &unit_sphere),
        (&point_sphere, &cube),
        (&point_sphere, &flat_capsule),
        (&flat_capsule, &flat_capsule),
        (&unit_sphere, &flat_capsule),
    ];

    for (a, b) in pairs {
        let result = NarrowPhase::collide(a, b).unwrap();
        assert!(result.collision_found);
        assert!(result.direction.iter().all(|v| v.is_finite()));
        assert!(result.penetration.is_finite());

        for point in contacts(a, b).iter() {
            assert!(point.is_finite());
        }
    }
}

#[test]
fn test_unsupported_pairs_are_errors() {
    let hull = at(Shape::polytope(&cube_points(1.0)), Vector3::zeros());
    let capsule = at(Shape::capsule(0.5, 1.0), Vector3::zeros());
    let cylinder = at(Shape::cylinder(0.5, 1.0), Vector3::zeros());

    for (a, b) in [(&hull, &capsule), (&capsule, &hull), (&cylinder, &cylinder), (&cylinder, &hull)] {
        match NarrowPhase::collide(a, b) {
            Err(PhysicsError::UnsupportedShapePair { a: ta, b: tb }) => {
                assert_eq!(ta, a.shape_type());
                assert_eq!(tb, b.shape_type());
            }
            other => panic!("expected an unsupported pair error, got {other:?}"),
        }
    }

    assert!(!NarrowPhase::is_supported(ShapeType::Capsule, ShapeType::Polytope));
    assert!(NarrowPhase::is_supported(ShapeType::Box, ShapeType::Capsule));
    assert!(NarrowPhase::is_supported(ShapeType::Cylinder, ShapeType::Sphere));
    assert!(NarrowPhase::is_supported(ShapeType::Cylinder, ShapeType::Capsule));
    assert!(NarrowPhase::is_supported(ShapeType::Polytope, ShapeType::Box));
}

fn cube_points(h: f32) -> Vec<Vector3> {
    let mut points = Vec::with_capacity(8);
    for &x in &[-h, h] {
        for &y in &[-h, h] {
            for &z in &[-h, h] {
                points.push(Vector3::new(x, y, z));
            }
        }
    }
    points
}
