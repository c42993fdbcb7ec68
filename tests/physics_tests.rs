use phys_contact::{
    core::{BodyStorage, GravityType},
    debug::DebugLines,
    error::PhysicsError,
    math::{Quaternion, Transform, Vector3},
    Collider, Material, PhysicsWorld, RigidBody, RigidBodyType, Shape, SimulationConfig,
};
use approx::assert_relative_eq;
use std::f32::consts::PI;

const DT: f32 = 1.0 / 60.0;

fn ground(world: &mut PhysicsWorld) -> phys_contact::ColliderHandle {
    let body = world.add_body(RigidBody::new_static(Vector3::new(0.0, -0.5, 0.0)));
    world
        .add_collider(Collider::attached(Shape::cuboid(Vector3::new(10.0, 0.5, 10.0)), body))
        .unwrap()
}

fn ball(world: &mut PhysicsWorld, position: Vector3, radius: f32) -> (phys_contact::BodyHandle, phys_contact::ColliderHandle) {
    let shape = Shape::sphere(radius);
    let mut body = RigidBody::new_dynamic(position);
    body.set_mass_properties_from_shape(&shape);
    let handle = world.add_body(body);
    let collider = world.add_collider(Collider::attached(shape, handle)).unwrap();
    (handle, collider)
}

#[test]
fn test_rigid_body_creation() {
    let body = RigidBody::new_dynamic(Vector3::new(0.0, 10.0, 0.0));

    assert_eq!(body.get_position(), Vector3::new(0.0, 10.0, 0.0));
    assert_eq!(body.get_body_type(), RigidBodyType::Dynamic);
    assert_eq!(body.get_linear_velocity(), Vector3::zeros());
    assert!(body.has_finite_mass());
    assert!(body.is_awake());

    let fixed = RigidBody::new_static(Vector3::zeros());
    assert!(!fixed.has_finite_mass());
    assert_eq!(fixed.get_inverse_mass(), 0.0);
}

#[test]
fn test_mass_from_shape_and_density() {
    let shape = Shape::cuboid(Vector3::new(0.5, 0.5, 0.5));
    let mut body = RigidBody::new_dynamic(Vector3::zeros());
    body.set_material(Material::new(2.0, 0.5, 0.0));
    body.set_mass_properties_from_shape(&shape);

    // 1 m^3 at density 2
    assert_relative_eq!(body.get_mass(), 2.0, epsilon = 1e-5);
    assert_relative_eq!(body.get_inverse_mass(), 0.5, epsilon = 1e-5);
}

#[test]
fn test_gravity_integration() {
    let mut world = PhysicsWorld::new();
    world.set_gravity(GravityType::Constant(Vector3::new(0.0, -10.0, 0.0)));

    let handle = world.add_body(RigidBody::new_dynamic(Vector3::new(0.0, 10.0, 0.0)));

    for _ in 0..60 {
        world.step(DT).unwrap();
    }

    // Explicit Euler: velocity after n steps is g * n * dt
    let body = world.get_body(handle).unwrap();
    assert_relative_eq!(body.get_linear_velocity().y, -10.0, epsilon = 1e-3);

    // Position lags one step behind the velocity: sum of g * k * dt^2 for k in 0..60
    let expected = 10.0 - 10.0 * DT * DT * (59.0 * 60.0 / 2.0);
    assert_relative_eq!(body.get_position().y, expected, epsilon = 1e-3);
    assert_relative_eq!(world.get_time(), 1.0, epsilon = 1e-4);
}

#[test]
fn test_static_body_does_not_move() {
    let mut world = PhysicsWorld::new();
    let handle = world.add_body(RigidBody::new_static(Vector3::new(1.0, 2.0, 3.0)));

    for _ in 0..30 {
        world.step(DT).unwrap();
    }

    assert_eq!(world.get_body(handle).unwrap().get_position(), Vector3::new(1.0, 2.0, 3.0));
}

#[test]
fn test_ball_settles_on_ground() {
    let mut world = PhysicsWorld::new();
    ground(&mut world);
    let (ball, _) = ball(&mut world, Vector3::new(0.0, 2.0, 0.0), 0.5);

    for _ in 0..240 {
        world.step(DT).unwrap();
    }

    let body = world.get_body(ball).unwrap();
    assert_relative_eq!(body.get_position().y, 0.5, epsilon = 0.05);
    assert_relative_eq!(body.get_position().x, 0.0, epsilon = 1e-3);
    assert!(body.get_linear_velocity().norm() < 0.2);
    assert_eq!(world.collision_system().manifold_count(), 1);
}

#[test]
fn test_resting_ball_falls_asleep() {
    let mut world = PhysicsWorld::new();
    ground(&mut world);
    let (ball, _) = ball(&mut world, Vector3::new(0.0, 0.5, 0.0), 0.5);

    for _ in 0..300 {
        world.step(DT).unwrap();
    }

    assert!(!world.get_body(ball).unwrap().is_awake());

    // Pushing it wakes it up again
    world
        .get_body_mut(ball)
        .unwrap()
        .set_linear_velocity(Vector3::new(1.0, 0.0, 0.0));
    assert!(world.get_body(ball).unwrap().is_awake());
}

#[test]
fn test_ball_on_static_floor_stays_asleep() {
    let mut world = PhysicsWorld::new();
    let floor = world.add_body(RigidBody::new_static(Vector3::new(0.0, -0.5, 0.0)));
    world
        .add_collider(Collider::attached(Shape::cuboid(Vector3::new(10.0, 0.5, 10.0)), floor))
        .unwrap();
    let (ball, _) = ball(&mut world, Vector3::new(0.0, 0.5, 0.0), 0.5);

    let mut fell_asleep_at = None;
    for step in 0..1200 {
        world.step(DT).unwrap();
        let awake = world.get_body(ball).unwrap().is_awake();

        match fell_asleep_at {
            None if !awake => fell_asleep_at = Some(step),
            Some(first) => assert!(!awake, "asleep since step {first}, awake again at step {step}"),
            None => {}
        }
    }

    assert!(fell_asleep_at.is_some());
    assert_relative_eq!(world.get_body(ball).unwrap().get_position().y, 0.5, epsilon = 0.05);
}

#[test]
fn test_sleeping_can_be_disabled() {
    let config = SimulationConfig {
        allow_sleeping: false,
        ..SimulationConfig::default()
    };
    let mut world = PhysicsWorld::with_config(config);
    ground(&mut world);
    let (ball, _) = ball(&mut world, Vector3::new(0.0, 0.5, 0.0), 0.5);

    for _ in 0..300 {
        world.step(DT).unwrap();
    }

    assert!(world.get_body(ball).unwrap().is_awake());
}

#[test]
fn test_manifold_query_through_world() {
    let mut world = PhysicsWorld::new();
    let floor = ground(&mut world);
    let (_, sphere) = ball(&mut world, Vector3::new(0.0, 0.45, 0.0), 0.5);

    world.step(DT).unwrap();

    let manifold = world
        .collision_system()
        .get_manifold_for_colliders(sphere, floor)
        .expect("ball resting on the floor");
    assert!(manifold.is_colliding());
    assert!(!manifold.is_empty());
}

#[test]
fn test_duplicate_collider_registration_fails() {
    let mut world = PhysicsWorld::new();
    let handle = ground(&mut world);

    let mut system = phys_contact::CollisionSystem::new();
    system.add_collider(handle).unwrap();
    assert!(matches!(system.add_collider(handle), Err(PhysicsError::DuplicateCollider(_))));
}

#[test]
fn test_collider_for_missing_body_is_rejected() {
    let mut world = PhysicsWorld::new();
    let body = world.add_body(RigidBody::new_dynamic(Vector3::zeros()));
    world.remove_body(body).unwrap();

    let result = world.add_collider(Collider::attached(Shape::sphere(1.0), body));
    assert!(matches!(result, Err(PhysicsError::ResourceNotFound(_))));
}

#[test]
fn test_removing_missing_collider_returns_false() {
    let mut world = PhysicsWorld::new();
    let handle = ground(&mut world);

    assert!(world.remove_collider(handle));
    assert!(!world.remove_collider(handle));
    assert_eq!(world.collider_count(), 0);
}

#[test]
fn test_removing_body_removes_its_colliders() {
    let mut world = PhysicsWorld::new();
    let floor = ground(&mut world);
    let (ball, sphere) = ball(&mut world, Vector3::new(0.0, 0.45, 0.0), 0.5);
    world.step(DT).unwrap();
    assert_eq!(world.collision_system().manifold_count(), 1);

    world.remove_body(ball).unwrap();

    assert!(world.get_collider(sphere).is_err());
    assert!(world.get_collider(floor).is_ok());
    assert_eq!(world.collision_system().manifold_count(), 0);
    assert!(world.remove_body(ball).is_err());
}

#[test]
fn test_unsupported_pair_aborts_the_step() {
    let mut world = PhysicsWorld::new();
    world.add_collider(Collider::new(Shape::polytope(&cube_points(1.0)), Transform::identity())).unwrap();
    world.add_collider(Collider::new(Shape::capsule(0.5, 1.0), Transform::identity())).unwrap();

    assert!(matches!(world.step(DT), Err(PhysicsError::UnsupportedShapePair { .. })));
}

#[test]
fn test_boxes_capsules_and_cylinders_share_a_world() {
    let mut world = PhysicsWorld::new();
    ground(&mut world);

    let mut spawn = |shape: Shape, position: Vector3| {
        let mut body = RigidBody::new_dynamic(position);
        body.set_mass_properties_from_shape(&shape);
        let handle = world.add_body(body);
        world.add_collider(Collider::attached(shape, handle)).unwrap();
        handle
    };

    let capsule = spawn(Shape::capsule(0.5, 1.0), Vector3::new(-3.0, 1.5, 0.0));
    let cylinder = spawn(Shape::cylinder(0.5, 1.0), Vector3::new(3.0, 1.0, 0.0));
    spawn(Shape::cuboid(Vector3::new(0.5, 0.5, 0.5)), Vector3::new(0.0, 1.0, 0.0));

    for _ in 0..120 {
        world.step(DT).unwrap();
    }

    // Standing or toppled, neither sinks below its radius
    assert!(world.get_body(capsule).unwrap().get_position().y > 0.4);
    assert!(world.get_body(cylinder).unwrap().get_position().y > 0.4);
}

fn crate_box(world: &mut PhysicsWorld, position: Vector3, rotation: Quaternion) -> phys_contact::BodyHandle {
    let shape = Shape::cuboid(Vector3::new(0.5, 0.5, 0.5));
    let mut body = RigidBody::new_dynamic(position);
    body.set_rotation(rotation);
    body.set_mass_properties_from_shape(&shape);
    let handle = world.add_body(body);
    world.add_collider(Collider::attached(shape, handle)).unwrap();
    handle
}

#[test]
fn test_box_settles_on_static_box() {
    let mut world = PhysicsWorld::new();
    ground(&mut world);
    let cube = crate_box(&mut world, Vector3::new(0.0, 1.0, 0.0), Quaternion::identity());

    for _ in 0..300 {
        world.step(DT).unwrap();
    }

    let body = world.get_body(cube).unwrap();
    assert_relative_eq!(body.get_position().y, 0.5, epsilon = 0.03);
    assert_relative_eq!(body.get_position().x, 0.0, epsilon = 1e-3);
    assert_relative_eq!(body.get_position().z, 0.0, epsilon = 1e-3);
    assert!(body.get_linear_velocity().norm() < 0.1);
    assert!(body.get_angular_velocity().norm() < 0.1);
}

#[test]
fn test_tilted_box_tips_onto_a_face() {
    let mut world = PhysicsWorld::new();
    ground(&mut world);
    let tilt = Quaternion::from_axis_angle(&Vector3::z_axis(), PI / 9.0);
    let cube = crate_box(&mut world, Vector3::new(0.0, 1.2, 0.0), tilt);

    for _ in 0..600 {
        world.step(DT).unwrap();
    }

    let body = world.get_body(cube).unwrap();
    assert_relative_eq!(body.get_position().y, 0.5, epsilon = 0.03);
    assert!(body.get_linear_velocity().norm() < 0.1);
    assert!(body.get_angular_velocity().norm() < 0.1);

    // One of the box's local axes ends up vertical
    let rotation = body.get_rotation();
    let upright = [Vector3::x(), Vector3::y(), Vector3::z()]
        .into_iter()
        .map(|axis| (rotation * axis).dot(&Vector3::y()).abs())
        .fold(0.0, f32::max);
    assert!(upright > 0.99, "box came to rest on an edge: {upright}");
}

#[test]
fn test_body_storage_pair_access() {
    let mut bodies = BodyStorage::<RigidBody>::new();
    let a = bodies.add(RigidBody::new_dynamic(Vector3::new(1.0, 0.0, 0.0)));
    let b = bodies.add(RigidBody::new_dynamic(Vector3::new(2.0, 0.0, 0.0)));
    let c = bodies.add(RigidBody::new_dynamic(Vector3::new(3.0, 0.0, 0.0)));

    let (x, y) = bodies.get_pair_mut(a, c);
    x.unwrap().set_position(Vector3::new(10.0, 0.0, 0.0));
    y.unwrap().set_position(Vector3::new(30.0, 0.0, 0.0));

    // Reversed order: the higher slot comes first
    let (x, y) = bodies.get_pair_mut(c, a);
    assert_eq!(x.unwrap().get_position(), Vector3::new(30.0, 0.0, 0.0));
    assert_eq!(y.unwrap().get_position(), Vector3::new(10.0, 0.0, 0.0));

    assert_eq!(bodies.get(a).unwrap().get_position(), Vector3::new(10.0, 0.0, 0.0));
    assert_eq!(bodies.get(b).unwrap().get_position(), Vector3::new(2.0, 0.0, 0.0));

    let (x, y) = bodies.get_pair_mut(b, b);
    assert!(x.is_some() && y.is_none());

    bodies.remove(b);
    let (x, y) = bodies.get_pair_mut(a, b);
    assert!(x.is_some() && y.is_none());
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

#[test]
fn test_debug_draw_records_lines() {
    let mut world = PhysicsWorld::new();
    ground(&mut world);
    ball(&mut world, Vector3::new(0.0, 0.45, 0.0), 0.5);
    world.step(DT).unwrap();

    let mut lines = DebugLines::new();
    world.debug_draw(&mut lines);
    assert!(!lines.lines.is_empty());
}
